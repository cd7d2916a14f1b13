//! `complaints` endpoints.

use gramdash_core::complaints::sort_newest_first;
use gramdash_core::{ComplaintAnalyticsQuery, ComplaintQuery, ComplaintRecord};

use crate::client::GramdashClient;
use crate::error::ApiError;
use crate::normalize::complaint_record;
use crate::types::{ComplaintAnalyticsResponse, ComplaintWire, ListEnvelope};

impl GramdashClient {
    /// Fetches complaints matching `query`, normalised and sorted newest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status or decode failure.
    pub async fn list_complaints(&self, query: &ComplaintQuery) -> Result<Vec<ComplaintRecord>, ApiError> {
        let url = self.build_url("complaints", &query.query_pairs())?;
        let rows: ListEnvelope<ComplaintWire> = self.get_json(url, "complaints").await?;
        let mut records: Vec<ComplaintRecord> =
            rows.into_vec().into_iter().map(complaint_record).collect();
        sort_newest_first(&mut records);
        tracing::info!(count = records.len(), "fetched complaints");
        Ok(records)
    }

    /// Fetches per-status complaint counts for a scope and date range.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status or decode failure.
    pub async fn complaint_analytics(
        &self,
        query: &ComplaintAnalyticsQuery,
    ) -> Result<ComplaintAnalyticsResponse, ApiError> {
        let url = self.build_url("complaints/analytics/geo", &query.query_pairs())?;
        let response: ComplaintAnalyticsResponse =
            self.get_json(url, "complaint analytics").await?;
        tracing::debug!(
            geo_type = response.geo_type.as_deref().unwrap_or("-"),
            rows = response.response.len(),
            "fetched complaint analytics"
        );
        Ok(response)
    }
}
