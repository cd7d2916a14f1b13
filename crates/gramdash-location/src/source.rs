use std::sync::Arc;

use async_trait::async_trait;
use gramdash_client::{ApiError, GramdashClient};
use gramdash_core::{GeoId, GeoNode};

/// Where geography lists come from.
///
/// Implementations return already-normalised nodes with `rank` and
/// `parent_id` filled in.
#[async_trait]
pub trait GeographySource: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn list_districts(&self, limit: u32) -> Result<Vec<GeoNode>, Self::Error>;

    async fn list_blocks(&self, district_id: GeoId, limit: u32) -> Result<Vec<GeoNode>, Self::Error>;

    async fn list_gram_panchayats(
        &self,
        district_id: GeoId,
        block_id: GeoId,
        limit: u32,
    ) -> Result<Vec<GeoNode>, Self::Error>;
}

#[async_trait]
impl GeographySource for GramdashClient {
    type Error = ApiError;

    async fn list_districts(&self, limit: u32) -> Result<Vec<GeoNode>, ApiError> {
        GramdashClient::list_districts(self, limit).await
    }

    async fn list_blocks(&self, district_id: GeoId, limit: u32) -> Result<Vec<GeoNode>, ApiError> {
        GramdashClient::list_blocks(self, district_id, limit).await
    }

    async fn list_gram_panchayats(
        &self,
        district_id: GeoId,
        block_id: GeoId,
        limit: u32,
    ) -> Result<Vec<GeoNode>, ApiError> {
        GramdashClient::list_gram_panchayats(self, district_id, block_id, limit).await
    }
}

#[async_trait]
impl<T: GeographySource + ?Sized> GeographySource for Arc<T> {
    type Error = T::Error;

    async fn list_districts(&self, limit: u32) -> Result<Vec<GeoNode>, Self::Error> {
        (**self).list_districts(limit).await
    }

    async fn list_blocks(&self, district_id: GeoId, limit: u32) -> Result<Vec<GeoNode>, Self::Error> {
        (**self).list_blocks(district_id, limit).await
    }

    async fn list_gram_panchayats(
        &self,
        district_id: GeoId,
        block_id: GeoId,
        limit: u32,
    ) -> Result<Vec<GeoNode>, Self::Error> {
        (**self).list_gram_panchayats(district_id, block_id, limit).await
    }
}
