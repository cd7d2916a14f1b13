//! Per-status complaint counts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::status::{normalize_status, NormalizedStatus};

/// A record that contributes `count()` complaints under `raw_status()`.
pub trait StatusCounted {
    fn raw_status(&self) -> &str;
    fn count(&self) -> u64;
}

/// One `{status, count}` row of a complaints analytics response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub count: u64,
}

impl StatusCounted for StatusCount {
    fn raw_status(&self) -> &str {
        &self.status
    }

    fn count(&self) -> u64 {
        self.count
    }
}

/// Complaint counts keyed by normalised status.
///
/// Unrecognised statuses keep their own bucket, so [`total`](Self::total)
/// can exceed the sum of the four named buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyticsAggregate {
    buckets: BTreeMap<NormalizedStatus, u64>,
}

impl AnalyticsAggregate {
    #[must_use]
    pub fn count(&self, status: &NormalizedStatus) -> u64 {
        self.buckets.get(status).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn open(&self) -> u64 {
        self.count(&NormalizedStatus::Open)
    }

    #[must_use]
    pub fn verified(&self) -> u64 {
        self.count(&NormalizedStatus::Verified)
    }

    #[must_use]
    pub fn resolved(&self) -> u64 {
        self.count(&NormalizedStatus::Resolved)
    }

    #[must_use]
    pub fn closed(&self) -> u64 {
        self.count(&NormalizedStatus::Closed)
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.buckets.values().sum()
    }

    /// Complaints whose status matched none of the named buckets.
    #[must_use]
    pub fn unrecognized(&self) -> u64 {
        self.buckets
            .iter()
            .filter(|(status, _)| !status.is_named())
            .map(|(_, n)| n)
            .sum()
    }

    fn add(&mut self, status: NormalizedStatus, n: u64) {
        *self.buckets.entry(status).or_insert(0) += n;
    }
}

/// Sums `count` per normalised status.
#[must_use]
pub fn aggregate_by_status<T: StatusCounted>(records: &[T]) -> AnalyticsAggregate {
    let mut aggregate = AnalyticsAggregate::default();
    for record in records {
        aggregate.add(normalize_status(record.raw_status()), record.count());
    }
    aggregate
}
