//! Scripted in-process geography source for async tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use gramdash_core::{GeoId, GeoNode};
use tokio::sync::oneshot;

use crate::cache::CacheKey;
use crate::source::GeographySource;

type Reply = Result<Vec<GeoNode>, String>;

enum Gate {
    Ready(Reply),
    Wait(oneshot::Receiver<Reply>),
}

/// Answers each call with the next scripted reply for its key, or an empty
/// list when nothing is scripted.
#[derive(Default)]
pub(crate) struct FakeSource {
    script: Mutex<HashMap<CacheKey, VecDeque<Gate>>>,
    calls: Mutex<Vec<CacheKey>>,
}

impl FakeSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(&self, key: CacheKey, gate: Gate) {
        self.script
            .lock()
            .unwrap()
            .entry(key)
            .or_default()
            .push_back(gate);
    }

    pub(crate) fn respond(&self, key: CacheKey, nodes: Vec<GeoNode>) {
        self.push(key, Gate::Ready(Ok(nodes)));
    }

    pub(crate) fn fail(&self, key: CacheKey, cause: &str) {
        self.push(key, Gate::Ready(Err(cause.to_string())));
    }

    /// The next call for `key` blocks until the returned sender fires.
    pub(crate) fn gate(&self, key: CacheKey) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.push(key, Gate::Wait(rx));
        tx
    }

    pub(crate) fn calls_for(&self, key: CacheKey) -> usize {
        self.calls.lock().unwrap().iter().filter(|k| **k == key).count()
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    async fn answer(&self, key: CacheKey) -> Result<Vec<GeoNode>, std::io::Error> {
        self.calls.lock().unwrap().push(key);
        let gate = self
            .script
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(VecDeque::pop_front);
        let reply = match gate {
            None => Ok(Vec::new()),
            Some(Gate::Ready(reply)) => reply,
            Some(Gate::Wait(rx)) => rx.await.unwrap_or_else(|_| Err("gate dropped".into())),
        };
        reply.map_err(std::io::Error::other)
    }
}

#[async_trait]
impl GeographySource for FakeSource {
    type Error = std::io::Error;

    async fn list_districts(&self, _limit: u32) -> Result<Vec<GeoNode>, Self::Error> {
        self.answer(CacheKey::Districts).await
    }

    async fn list_blocks(&self, district_id: GeoId, _limit: u32) -> Result<Vec<GeoNode>, Self::Error> {
        self.answer(CacheKey::Blocks { district_id }).await
    }

    async fn list_gram_panchayats(
        &self,
        district_id: GeoId,
        block_id: GeoId,
        _limit: u32,
    ) -> Result<Vec<GeoNode>, Self::Error> {
        self.answer(CacheKey::GramPanchayats {
            district_id,
            block_id,
        })
        .await
    }
}

pub(crate) fn districts() -> Vec<GeoNode> {
    vec![GeoNode::district(1, "Jodhpur"), GeoNode::district(2, "Barmer")]
}

pub(crate) fn jodhpur_blocks() -> Vec<GeoNode> {
    vec![GeoNode::block(10, "Luni", 1), GeoNode::block(11, "Mandore", 1)]
}

pub(crate) fn barmer_blocks() -> Vec<GeoNode> {
    vec![GeoNode::block(20, "Balotra", 2)]
}

pub(crate) fn luni_gps() -> Vec<GeoNode> {
    vec![
        GeoNode::gram_panchayat(100, "Salawas", 10),
        GeoNode::gram_panchayat(101, "Dhundhara", 10),
    ]
}

pub(crate) fn mandore_gps() -> Vec<GeoNode> {
    vec![GeoNode::gram_panchayat(110, "Banar", 11)]
}

pub(crate) fn blocks_of(district_id: GeoId) -> CacheKey {
    CacheKey::Blocks { district_id }
}

pub(crate) fn gps_of(district_id: GeoId, block_id: GeoId) -> CacheKey {
    CacheKey::GramPanchayats {
        district_id,
        block_id,
    }
}
