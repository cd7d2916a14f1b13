use thiserror::Error;

use crate::cache::CacheKey;

/// A geography list could not be loaded.
///
/// Stored in the failed cache slot so the view can render it; the cause is
/// kept as text so the error stays `Clone`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to load {key}: {cause}")]
pub struct FetchError {
    pub key: CacheKey,
    pub cause: String,
}
