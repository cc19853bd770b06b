//! Replay cache: per-device bounded set of recently observed identifiers.
//!
//! Process-local and volatile: a restart re-admits previously seen
//! identifiers. That is documented behavior, not a bug - the freshness check
//! bounds the re-admission window to the skew budget, so an identifier old
//! enough to have been evicted from a live cache cannot pass freshness
//! anyway.

use parking_lot::Mutex;
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::{Hash, Hasher};

const SHARD_COUNT: usize = 16;

/// Per-device membership set plus insertion order for FIFO eviction.
#[derive(Debug, Default)]
struct DeviceWindow {
    seen: HashSet<String>,
    order: VecDeque<String>,
}

/// Bounded per-device replay detection, sharded by device identifier.
///
/// `check_and_insert` is the whole public contract of the hot path: a single
/// atomic check-and-add under the device's shard lock, so two concurrent
/// submissions of the same identifier can never both pass.
#[derive(Debug)]
pub struct ReplayCache {
    shards: Vec<Mutex<HashMap<String, DeviceWindow>>>,
    capacity: usize,
}

impl ReplayCache {
    /// Create a cache retaining up to `capacity` identifiers per device.
    pub fn new(capacity: usize) -> Self {
        let shards = (0..SHARD_COUNT)
            .map(|_| Mutex::new(HashMap::new()))
            .collect();
        Self { shards, capacity }
    }

    fn shard(&self, device_id: &str) -> &Mutex<HashMap<String, DeviceWindow>> {
        let mut hasher = DefaultHasher::new();
        device_id.hash(&mut hasher);
        &self.shards[hasher.finish() as usize % self.shards.len()]
    }

    /// Atomically record an identifier, returning `false` if it was already
    /// present. On insertion the oldest identifiers are evicted until the
    /// per-device count is back within the cap.
    pub fn check_and_insert(&self, device_id: &str, message_id: &str) -> bool {
        let mut shard = self.shard(device_id).lock();
        let window = shard.entry(device_id.to_string()).or_default();
        if window.seen.contains(message_id) {
            return false;
        }
        window.seen.insert(message_id.to_string());
        window.order.push_back(message_id.to_string());
        while window.order.len() > self.capacity {
            if let Some(oldest) = window.order.pop_front() {
                window.seen.remove(&oldest);
            }
        }
        true
    }

    /// Whether an identifier is currently held for a device.
    pub fn contains(&self, device_id: &str, message_id: &str) -> bool {
        self.shard(device_id)
            .lock()
            .get(device_id)
            .is_some_and(|window| window.seen.contains(message_id))
    }

    /// Number of identifiers currently held for a device.
    pub fn len(&self, device_id: &str) -> usize {
        self.shard(device_id)
            .lock()
            .get(device_id)
            .map_or(0, |window| window.order.len())
    }

    /// Whether nothing has been recorded for a device.
    pub fn is_empty(&self, device_id: &str) -> bool {
        self.len(device_id) == 0
    }
}
