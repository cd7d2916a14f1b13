//! In-memory geography cache.
//!
//! One slot per parent: the district list, the blocks of each district and
//! the gram panchayats of each block. Every fetch is issued a ticket carrying
//! a monotonic sequence number, and a response is applied only if its ticket
//! is still the latest one issued for the slot. Entries for other parents
//! are kept when the selection moves on, so returning to a district shows its
//! blocks without another round trip.

use std::collections::HashMap;
use std::fmt;

use gramdash_core::{GeoId, GeoNode, GeoRank};

use crate::error::FetchError;

/// Identifies one cached child list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Districts,
    Blocks { district_id: GeoId },
    GramPanchayats { district_id: GeoId, block_id: GeoId },
}

impl CacheKey {
    /// Rank of the nodes stored under this key.
    #[must_use]
    pub fn rank(self) -> GeoRank {
        match self {
            CacheKey::Districts => GeoRank::District,
            CacheKey::Blocks { .. } => GeoRank::Block,
            CacheKey::GramPanchayats { .. } => GeoRank::GramPanchayat,
        }
    }

    /// The `parent_id` every node under this key must carry.
    #[must_use]
    pub fn parent_id(self) -> Option<GeoId> {
        match self {
            CacheKey::Districts => None,
            CacheKey::Blocks { district_id } => Some(district_id),
            CacheKey::GramPanchayats { block_id, .. } => Some(block_id),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Districts => write!(f, "districts"),
            CacheKey::Blocks { district_id } => write!(f, "blocks of district {district_id}"),
            CacheKey::GramPanchayats {
                district_id,
                block_id,
            } => write!(
                f,
                "gram panchayats of block {block_id} (district {district_id})"
            ),
        }
    }
}

/// Permission to write one response into a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    key: CacheKey,
    seq: u64,
}

impl FetchTicket {
    #[must_use]
    pub fn key(&self) -> CacheKey {
        self.key
    }

    #[must_use]
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug, Clone)]
enum Slot {
    Loading { seq: u64 },
    Ready { seq: u64, nodes: Vec<GeoNode> },
    Failed { seq: u64, error: FetchError },
}

impl Slot {
    fn seq(&self) -> u64 {
        match self {
            Slot::Loading { seq } | Slot::Ready { seq, .. } | Slot::Failed { seq, .. } => *seq,
        }
    }
}

/// Read-only view of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotView<'a> {
    Missing,
    Loading,
    Failed(&'a FetchError),
    Ready(&'a [GeoNode]),
}

/// What happened to a completed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The nodes replaced the slot. `dropped` counts rows whose rank or
    /// parent did not match the key.
    Applied { count: usize, dropped: usize },
    /// The slot now holds the error and reads as empty.
    Failed(FetchError),
    /// A newer ticket was issued, or the slot was cancelled; nothing changed.
    Superseded,
}

#[derive(Debug, Default)]
pub struct GeographyCache {
    slots: HashMap<CacheKey, Slot>,
    next_seq: u64,
}

impl GeographyCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fetch for `key` unless one is in flight or the data is
    /// already here. Failed slots may be fetched again.
    pub fn begin(&mut self, key: CacheKey) -> Option<FetchTicket> {
        match self.slots.get(&key) {
            Some(Slot::Loading { .. } | Slot::Ready { .. }) => None,
            Some(Slot::Failed { .. }) | None => Some(self.issue(key)),
        }
    }

    /// Starts a fetch for `key` unconditionally. Any in-flight fetch for
    /// the key is superseded and cached data stops being served.
    pub fn begin_refresh(&mut self, key: CacheKey) -> FetchTicket {
        self.issue(key)
    }

    fn issue(&mut self, key: CacheKey) -> FetchTicket {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.slots.insert(key, Slot::Loading { seq });
        tracing::debug!(key = %key, seq, "geography fetch issued");
        FetchTicket { key, seq }
    }

    /// Applies a response if `ticket` is still the latest for its slot.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<GeoNode>, String>,
    ) -> Completion {
        let key = ticket.key;
        let current = self.slots.get(&key).map(Slot::seq);
        if current != Some(ticket.seq) {
            tracing::debug!(key = %key, seq = ticket.seq, "discarding superseded geography response");
            return Completion::Superseded;
        }

        match result {
            Ok(nodes) => {
                let received = nodes.len();
                let nodes: Vec<GeoNode> = nodes
                    .into_iter()
                    .filter(|n| n.rank == key.rank() && n.parent_id == key.parent_id())
                    .collect();
                let dropped = received - nodes.len();
                if dropped > 0 {
                    tracing::warn!(key = %key, dropped, "ignored geography rows outside the requested parent");
                }
                let count = nodes.len();
                self.slots.insert(
                    key,
                    Slot::Ready {
                        seq: ticket.seq,
                        nodes,
                    },
                );
                Completion::Applied { count, dropped }
            }
            Err(cause) => {
                let error = FetchError { key, cause };
                self.slots.insert(
                    key,
                    Slot::Failed {
                        seq: ticket.seq,
                        error: error.clone(),
                    },
                );
                Completion::Failed(error)
            }
        }
    }

    /// Drops every in-flight slot matching `predicate`, so their responses
    /// are discarded on arrival. Returns how many were dropped.
    pub fn cancel_pending<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(CacheKey) -> bool,
    {
        let before = self.slots.len();
        self.slots
            .retain(|key, slot| !(matches!(slot, Slot::Loading { .. }) && predicate(*key)));
        before - self.slots.len()
    }

    #[must_use]
    pub fn view(&self, key: CacheKey) -> SlotView<'_> {
        match self.slots.get(&key) {
            None => SlotView::Missing,
            Some(Slot::Loading { .. }) => SlotView::Loading,
            Some(Slot::Failed { error, .. }) => SlotView::Failed(error),
            Some(Slot::Ready { nodes, .. }) => SlotView::Ready(nodes),
        }
    }

    #[must_use]
    pub fn is_pending(&self, key: CacheKey) -> bool {
        matches!(self.slots.get(&key), Some(Slot::Loading { .. }))
    }

    fn nodes(&self, key: CacheKey) -> &[GeoNode] {
        match self.slots.get(&key) {
            Some(Slot::Ready { nodes, .. }) => nodes,
            _ => &[],
        }
    }

    /// Cached districts; empty while loading or after a failure.
    #[must_use]
    pub fn get_districts(&self) -> &[GeoNode] {
        self.nodes(CacheKey::Districts)
    }

    /// Cached blocks of `district_id`; empty until they have been fetched.
    #[must_use]
    pub fn get_blocks(&self, district_id: GeoId) -> &[GeoNode] {
        self.nodes(CacheKey::Blocks { district_id })
    }

    /// Cached gram panchayats of `block_id`.
    ///
    /// Empty when no block is given or when the block is not one of the
    /// district's cached blocks.
    #[must_use]
    pub fn get_gram_panchayats(&self, district_id: GeoId, block_id: Option<GeoId>) -> &[GeoNode] {
        let Some(block_id) = block_id else {
            return &[];
        };
        if !self.get_blocks(district_id).iter().any(|b| b.id == block_id) {
            return &[];
        }
        self.nodes(CacheKey::GramPanchayats {
            district_id,
            block_id,
        })
    }

    #[must_use]
    pub fn find_district(&self, district_id: GeoId) -> Option<&GeoNode> {
        self.get_districts().iter().find(|d| d.id == district_id)
    }

    /// Looks a block up across every cached district.
    #[must_use]
    pub fn find_block(&self, block_id: GeoId) -> Option<&GeoNode> {
        self.slots.iter().find_map(|(key, slot)| match (key, slot) {
            (CacheKey::Blocks { .. }, Slot::Ready { nodes, .. }) => {
                nodes.iter().find(|b| b.id == block_id)
            }
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jodhpur_blocks() -> Vec<GeoNode> {
        vec![GeoNode::block(10, "Luni", 1), GeoNode::block(11, "Mandore", 1)]
    }

    fn load(cache: &mut GeographyCache, key: CacheKey, nodes: Vec<GeoNode>) {
        let ticket = cache.begin(key).expect("slot should be free");
        cache.complete(ticket, Ok(nodes));
    }

    #[test]
    fn begin_dedups_in_flight_and_cached_keys() {
        let mut cache = GeographyCache::new();
        let key = CacheKey::Blocks { district_id: 1 };
        let ticket = cache.begin(key).unwrap();
        assert!(cache.begin(key).is_none(), "in-flight key must not refetch");
        assert!(cache.is_pending(key));

        cache.complete(ticket, Ok(jodhpur_blocks()));
        assert!(cache.begin(key).is_none(), "cached key must not refetch");
        assert_eq!(cache.get_blocks(1).len(), 2);
    }

    #[test]
    fn newer_ticket_wins_regardless_of_arrival_order() {
        let mut cache = GeographyCache::new();
        let key = CacheKey::Blocks { district_id: 1 };
        let stale = cache.begin(key).unwrap();
        let fresh = cache.begin_refresh(key);

        assert_eq!(
            cache.complete(fresh, Ok(vec![GeoNode::block(12, "Osian", 1)])),
            Completion::Applied { count: 1, dropped: 0 }
        );
        assert_eq!(cache.complete(stale, Ok(jodhpur_blocks())), Completion::Superseded);
        assert_eq!(cache.get_blocks(1)[0].name, "Osian");
    }

    #[test]
    fn refresh_hides_old_data_until_it_lands() {
        let mut cache = GeographyCache::new();
        load(&mut cache, CacheKey::Districts, vec![GeoNode::district(1, "Jodhpur")]);
        let _ticket = cache.begin_refresh(CacheKey::Districts);
        assert!(cache.get_districts().is_empty());
        assert_eq!(cache.view(CacheKey::Districts), SlotView::Loading);
    }

    #[test]
    fn failure_reads_empty_and_allows_retry() {
        let mut cache = GeographyCache::new();
        let key = CacheKey::Districts;
        let ticket = cache.begin(key).unwrap();
        let outcome = cache.complete(ticket, Err("connection reset".into()));
        assert!(matches!(outcome, Completion::Failed(ref e) if e.cause == "connection reset"));
        assert!(cache.get_districts().is_empty());
        assert!(matches!(cache.view(key), SlotView::Failed(_)));
        assert!(cache.begin(key).is_some(), "failed slot can be retried");
    }

    #[test]
    fn rows_for_another_parent_are_dropped() {
        let mut cache = GeographyCache::new();
        let key = CacheKey::Blocks { district_id: 1 };
        let ticket = cache.begin(key).unwrap();
        let outcome = cache.complete(
            ticket,
            Ok(vec![GeoNode::block(10, "Luni", 1), GeoNode::block(20, "Balotra", 2)]),
        );
        assert_eq!(outcome, Completion::Applied { count: 1, dropped: 1 });
    }

    #[test]
    fn gram_panchayats_require_a_block_of_the_district() {
        let mut cache = GeographyCache::new();
        load(&mut cache, CacheKey::Blocks { district_id: 1 }, jodhpur_blocks());
        load(
            &mut cache,
            CacheKey::Blocks { district_id: 2 },
            vec![GeoNode::block(20, "Balotra", 2)],
        );
        load(
            &mut cache,
            CacheKey::GramPanchayats {
                district_id: 1,
                block_id: 10,
            },
            vec![GeoNode::gram_panchayat(100, "Salawas", 10)],
        );

        assert_eq!(cache.get_gram_panchayats(1, Some(10)).len(), 1);
        assert!(cache.get_gram_panchayats(1, None).is_empty());
        assert!(cache.get_gram_panchayats(2, Some(10)).is_empty());
        assert!(cache.get_gram_panchayats(1, Some(20)).is_empty());
        assert!(cache.get_gram_panchayats(9, Some(99)).is_empty());
    }

    #[test]
    fn entries_for_other_parents_survive() {
        let mut cache = GeographyCache::new();
        load(&mut cache, CacheKey::Blocks { district_id: 1 }, jodhpur_blocks());
        let _pending = cache.begin(CacheKey::Blocks { district_id: 2 }).unwrap();
        assert_eq!(cache.get_blocks(1).len(), 2);
        assert!(cache.get_blocks(2).is_empty());
        assert_eq!(cache.find_block(11).map(|b| b.name.as_str()), Some("Mandore"));
    }

    #[test]
    fn cancelled_fetch_is_discarded() {
        let mut cache = GeographyCache::new();
        let ticket = cache.begin(CacheKey::Blocks { district_id: 1 }).unwrap();
        let cancelled = cache.cancel_pending(|key| key.rank() == GeoRank::Block);
        assert_eq!(cancelled, 1);
        assert_eq!(cache.complete(ticket, Ok(jodhpur_blocks())), Completion::Superseded);
        assert_eq!(cache.view(CacheKey::Blocks { district_id: 1 }), SlotView::Missing);
    }
}
