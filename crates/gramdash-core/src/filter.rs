use crate::status::{normalize_status, NormalizedStatus};

/// A row that can be narrowed by the status buttons and the search box.
pub trait Filterable {
    fn normalized_status(&self) -> NormalizedStatus;

    /// Title, description and id, in that order.
    fn search_fields(&self) -> [&str; 3];
}

/// Rows whose normalised status equals `status_filter` AND whose title,
/// description or id contains `search_term` (case-insensitive).
///
/// An empty `status_filter` disables status filtering; the filter string is
/// normalised the same way as the rows, so `"Closed"` also matches
/// `"DISPOSED"` rows.
#[must_use]
pub fn filter_records<'a, T: Filterable>(
    records: &'a [T],
    status_filter: &str,
    search_term: &str,
) -> Vec<&'a T> {
    let wanted = Some(normalize_status(status_filter))
        .filter(|s| !matches!(s, NormalizedStatus::Other(raw) if raw.is_empty()));
    let needle = search_term.to_lowercase();

    records
        .iter()
        .filter(|record| {
            wanted
                .as_ref()
                .is_none_or(|status| record.normalized_status() == *status)
        })
        .filter(|record| {
            record
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}
