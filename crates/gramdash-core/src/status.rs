//! Complaint status normalisation.
//!
//! The backend reports statuses in several spellings (`"DISPOSED"`,
//! `"In Progress"`, `"closed"`). Everything that filters, counts or colours a
//! complaint goes through [`normalize_status`] first so the four dashboard
//! buckets line up.

use std::fmt;

/// One of the four dashboard buckets, or an unrecognised status kept verbatim
/// (trimmed and uppercased).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NormalizedStatus {
    Open,
    Verified,
    Resolved,
    Closed,
    Other(String),
}

impl NormalizedStatus {
    pub const NAMED: [NormalizedStatus; 4] = [
        NormalizedStatus::Open,
        NormalizedStatus::Verified,
        NormalizedStatus::Resolved,
        NormalizedStatus::Closed,
    ];

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            NormalizedStatus::Open => "OPEN",
            NormalizedStatus::Verified => "VERIFIED",
            NormalizedStatus::Resolved => "RESOLVED",
            NormalizedStatus::Closed => "CLOSED",
            NormalizedStatus::Other(raw) => raw,
        }
    }

    #[must_use]
    pub fn is_named(&self) -> bool {
        !matches!(self, NormalizedStatus::Other(_))
    }

    /// Display colour for table rows. Anything that is not open, verified or
    /// resolved renders as closed.
    #[must_use]
    pub fn color(&self) -> &'static str {
        match self {
            NormalizedStatus::Open => "#ef4444",
            NormalizedStatus::Verified => "#f97316",
            NormalizedStatus::Resolved => "#8b5cf6",
            NormalizedStatus::Closed | NormalizedStatus::Other(_) => "#10b981",
        }
    }
}

impl fmt::Display for NormalizedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Folds a raw backend status into a [`NormalizedStatus`].
///
/// Case-insensitive and whitespace-trimmed. `DISPOSED` and `CLOSE`/`CLOS`
/// map to closed, `IN PROGRESS` to verified. Anything else passes through
/// uppercased, so it will never match one of the four filter buttons.
#[must_use]
pub fn normalize_status(raw: &str) -> NormalizedStatus {
    let upper = raw.trim().to_uppercase();
    match upper.as_str() {
        "OPEN" => NormalizedStatus::Open,
        "VERIFIED" | "IN PROGRESS" => NormalizedStatus::Verified,
        "RESOLVED" => NormalizedStatus::Resolved,
        "CLOSED" | "DISPOSED" => NormalizedStatus::Closed,
        // Seen in upstream data. Possibly a data-entry bug rather than a real
        // synonym, so don't grow this list.
        "CLOSE" | "CLOS" => NormalizedStatus::Closed,
        _ => NormalizedStatus::Other(upper),
    }
}
