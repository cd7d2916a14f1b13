//! `geography/*` endpoints.

use gramdash_core::{GeoId, GeoNode};

use crate::client::GramdashClient;
use crate::error::ApiError;
use crate::normalize::{block_node, district_node, gram_panchayat_node};
use crate::types::{BlockWire, DistrictWire, GramPanchayatWire, ListEnvelope};

impl GramdashClient {
    /// Lists districts. Only the first page of `limit` rows is requested.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status or decode failure.
    pub async fn list_districts(&self, limit: u32) -> Result<Vec<GeoNode>, ApiError> {
        let url = self.build_url(
            "geography/districts",
            &[("skip", "0".to_string()), ("limit", limit.to_string())],
        )?;
        let rows: ListEnvelope<DistrictWire> = self.get_json(url, "districts").await?;
        let nodes: Vec<GeoNode> = rows.into_vec().into_iter().map(district_node).collect();
        tracing::debug!(count = nodes.len(), "fetched districts");
        Ok(nodes)
    }

    /// Lists the blocks of `district_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status or decode failure.
    pub async fn list_blocks(&self, district_id: GeoId, limit: u32) -> Result<Vec<GeoNode>, ApiError> {
        let url = self.build_url(
            "geography/blocks",
            &[
                ("district_id", district_id.to_string()),
                ("skip", "0".to_string()),
                ("limit", limit.to_string()),
            ],
        )?;
        let rows: ListEnvelope<BlockWire> = self.get_json(url, "blocks").await?;
        let nodes: Vec<GeoNode> = rows
            .into_vec()
            .into_iter()
            .map(|row| block_node(row, district_id))
            .collect();
        tracing::debug!(district_id, count = nodes.len(), "fetched blocks");
        Ok(nodes)
    }

    /// Lists the gram panchayats of `block_id` within `district_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status or decode failure.
    pub async fn list_gram_panchayats(
        &self,
        district_id: GeoId,
        block_id: GeoId,
        limit: u32,
    ) -> Result<Vec<GeoNode>, ApiError> {
        let url = self.build_url(
            "geography/grampanchayats",
            &[
                ("district_id", district_id.to_string()),
                ("block_id", block_id.to_string()),
                ("skip", "0".to_string()),
                ("limit", limit.to_string()),
            ],
        )?;
        let rows: ListEnvelope<GramPanchayatWire> = self.get_json(url, "gram panchayats").await?;
        let nodes: Vec<GeoNode> = rows
            .into_vec()
            .into_iter()
            .map(|row| gram_panchayat_node(row, block_id))
            .collect();
        tracing::debug!(district_id, block_id, count = nodes.len(), "fetched gram panchayats");
        Ok(nodes)
    }
}
