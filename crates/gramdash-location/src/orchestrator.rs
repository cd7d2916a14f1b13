//! Issues geography fetches on behalf of the selector and writes the
//! responses into the cache.

use std::sync::{Mutex, MutexGuard, PoisonError};

use gramdash_core::{GeoId, GeoNode};

use crate::cache::{CacheKey, Completion, FetchTicket, GeographyCache};
use crate::error::FetchError;
use crate::source::GeographySource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Already cached; no request was made.
    Cached,
    /// An earlier request for the key is still in flight.
    Pending,
    Applied { key: CacheKey, count: usize },
    Failed(FetchError),
    /// The response arrived after a newer request for the key was issued
    /// (or the request was cancelled) and was thrown away.
    Superseded { key: CacheKey, seq: u64 },
}

/// Deduplicating, last-issued-wins fetcher in front of a [`GeographyCache`].
///
/// The cache lock is only taken between awaits, so concurrent callers never
/// block one another on a network round trip.
pub struct FetchOrchestrator<S> {
    source: S,
    cache: Mutex<GeographyCache>,
    page_limit: u32,
}

impl<S: GeographySource> FetchOrchestrator<S> {
    pub fn new(source: S, page_limit: u32) -> Self {
        Self {
            source,
            cache: Mutex::new(GeographyCache::new()),
            page_limit,
        }
    }

    fn lock(&self) -> MutexGuard<'_, GeographyCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` against a snapshot of the cache.
    pub fn read<R>(&self, f: impl FnOnce(&GeographyCache) -> R) -> R {
        f(&self.lock())
    }

    /// Fetches `key` unless it is cached or already in flight.
    pub async fn ensure(&self, key: CacheKey) -> FetchOutcome {
        let ticket = {
            let mut cache = self.lock();
            match cache.begin(key) {
                Some(ticket) => ticket,
                None if cache.is_pending(key) => return FetchOutcome::Pending,
                None => return FetchOutcome::Cached,
            }
        };
        self.run(ticket).await
    }

    /// Fetches `key` again, superseding any request already in flight.
    pub async fn refresh(&self, key: CacheKey) -> FetchOutcome {
        let ticket = self.lock().begin_refresh(key);
        self.run(ticket).await
    }

    /// Forgets in-flight requests matching `predicate`; their responses
    /// will be discarded.
    pub fn cancel_pending(&self, predicate: impl FnMut(CacheKey) -> bool) -> usize {
        self.lock().cancel_pending(predicate)
    }

    async fn run(&self, ticket: FetchTicket) -> FetchOutcome {
        let key = ticket.key();
        let limit = self.page_limit;
        let result = match key {
            CacheKey::Districts => self.source.list_districts(limit).await,
            CacheKey::Blocks { district_id } => self.source.list_blocks(district_id, limit).await,
            CacheKey::GramPanchayats {
                district_id,
                block_id,
            } => {
                self.source
                    .list_gram_panchayats(district_id, block_id, limit)
                    .await
            }
        }
        .map_err(|e| e.to_string());

        let completion = self.lock().complete(ticket, result);
        match completion {
            Completion::Applied { count, .. } => {
                tracing::info!(key = %key, count, "geography loaded");
                FetchOutcome::Applied { key, count }
            }
            Completion::Failed(error) => {
                tracing::warn!(key = %key, cause = %error.cause, "geography fetch failed");
                FetchOutcome::Failed(error)
            }
            Completion::Superseded => FetchOutcome::Superseded {
                key,
                seq: ticket.seq(),
            },
        }
    }

    /// Districts, fetching them first if needed. Empty on failure.
    pub async fn get_districts(&self) -> Vec<GeoNode> {
        self.ensure(CacheKey::Districts).await;
        self.read(|cache| cache.get_districts().to_vec())
    }

    pub async fn get_blocks(&self, district_id: GeoId) -> Vec<GeoNode> {
        self.ensure(CacheKey::Blocks { district_id }).await;
        self.read(|cache| cache.get_blocks(district_id).to_vec())
    }

    /// Gram panchayats of `block_id`. Empty without a block, or when the
    /// block does not belong to `district_id`.
    pub async fn get_gram_panchayats(&self, district_id: GeoId, block_id: Option<GeoId>) -> Vec<GeoNode> {
        let Some(block_id) = block_id else {
            return Vec::new();
        };
        self.ensure(CacheKey::Blocks { district_id }).await;
        let belongs = self.read(|cache| cache.get_blocks(district_id).iter().any(|b| b.id == block_id));
        if !belongs {
            return Vec::new();
        }
        self.ensure(CacheKey::GramPanchayats {
            district_id,
            block_id,
        })
        .await;
        self.read(|cache| cache.get_gram_panchayats(district_id, Some(block_id)).to_vec())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cache::SlotView;
    use crate::test_support::{blocks_of, districts, gps_of, jodhpur_blocks, luni_gps, FakeSource};

    fn orchestrator(source: &Arc<FakeSource>) -> Arc<FetchOrchestrator<Arc<FakeSource>>> {
        Arc::new(FetchOrchestrator::new(Arc::clone(source), 100))
    }

    async fn wait_until_pending(fetcher: &FetchOrchestrator<Arc<FakeSource>>, key: CacheKey) {
        while !fetcher.read(|c| c.is_pending(key)) {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn second_ensure_is_served_from_cache() {
        let source = Arc::new(FakeSource::new());
        source.respond(CacheKey::Districts, districts());
        let fetcher = orchestrator(&source);

        assert_eq!(
            fetcher.ensure(CacheKey::Districts).await,
            FetchOutcome::Applied {
                key: CacheKey::Districts,
                count: 2
            }
        );
        assert_eq!(fetcher.ensure(CacheKey::Districts).await, FetchOutcome::Cached);
        assert_eq!(source.calls_for(CacheKey::Districts), 1);
    }

    #[tokio::test]
    async fn concurrent_misses_share_one_request() {
        let source = Arc::new(FakeSource::new());
        let gate = source.gate(blocks_of(1));
        let fetcher = orchestrator(&source);

        let first = tokio::spawn({
            let fetcher = Arc::clone(&fetcher);
            async move { fetcher.ensure(blocks_of(1)).await }
        });
        wait_until_pending(&fetcher, blocks_of(1)).await;

        assert_eq!(fetcher.ensure(blocks_of(1)).await, FetchOutcome::Pending);
        gate.send(Ok(jodhpur_blocks())).unwrap();

        assert!(matches!(first.await.unwrap(), FetchOutcome::Applied { count: 2, .. }));
        assert_eq!(source.calls_for(blocks_of(1)), 1);
    }

    #[tokio::test]
    async fn superseded_response_is_discarded() {
        let source = Arc::new(FakeSource::new());
        let slow = source.gate(blocks_of(1));
        source.respond(blocks_of(1), vec![GeoNode::block(12, "Osian", 1)]);
        let fetcher = orchestrator(&source);

        let stale = tokio::spawn({
            let fetcher = Arc::clone(&fetcher);
            async move { fetcher.ensure(blocks_of(1)).await }
        });
        wait_until_pending(&fetcher, blocks_of(1)).await;

        let fresh = fetcher.refresh(blocks_of(1)).await;
        assert!(matches!(fresh, FetchOutcome::Applied { count: 1, .. }));

        slow.send(Ok(jodhpur_blocks())).unwrap();
        assert!(matches!(stale.await.unwrap(), FetchOutcome::Superseded { .. }));

        let names: Vec<String> = fetcher.read(|c| c.get_blocks(1).iter().map(|b| b.name.clone()).collect());
        assert_eq!(names, vec!["Osian"]);
    }

    #[tokio::test]
    async fn failure_leaves_error_slot_and_manual_retry_refetches() {
        let source = Arc::new(FakeSource::new());
        source.fail(CacheKey::Districts, "503 from backend");
        source.respond(CacheKey::Districts, districts());
        let fetcher = orchestrator(&source);

        let outcome = fetcher.ensure(CacheKey::Districts).await;
        assert!(matches!(outcome, FetchOutcome::Failed(ref e) if e.cause.contains("503")));
        fetcher.read(|c| {
            assert!(c.get_districts().is_empty());
            assert!(matches!(c.view(CacheKey::Districts), SlotView::Failed(_)));
        });

        assert_eq!(fetcher.get_districts().await.len(), 2);
        assert_eq!(source.calls_for(CacheKey::Districts), 2);
    }

    #[tokio::test]
    async fn gram_panchayats_for_foreign_block_are_empty_without_fetching() {
        let source = Arc::new(FakeSource::new());
        source.respond(blocks_of(1), jodhpur_blocks());
        source.respond(gps_of(1, 10), luni_gps());
        let fetcher = orchestrator(&source);

        assert!(fetcher.get_gram_panchayats(1, Some(20)).await.is_empty());
        assert_eq!(source.calls_for(gps_of(1, 20)), 0);
        assert!(fetcher.get_gram_panchayats(1, None).await.is_empty());
        assert_eq!(fetcher.get_gram_panchayats(1, Some(10)).await.len(), 2);
    }
}
