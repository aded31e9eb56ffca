// src/core/cluster/hash_ring.rs

//! Implements the consistent-hash ring used for client-side sharding.

use crc::{CRC_32_ISO_HDLC, Crc};
use std::collections::BTreeMap;

/// Virtual replicas contributed by each node. More replicas smooth the key
/// distribution across nodes.
pub const DEFAULT_REPLICAS: usize = 64;

/// The CRC32 algorithm used for ring placement and for routing keys.
const CRC32_ALGO: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Hashes a routing key (the first argument of a shardable command).
pub fn hash_key(key: &[u8]) -> u32 {
    CRC32_ALGO.checksum(key)
}

/// A consistent-hash ring.
///
/// Each node id contributes `replicas` entries keyed `crc32("<id>:<i>")`,
/// kept sorted by hash. Lookup walks clockwise: the first entry at or after
/// the key's hash wins, wrapping around to the smallest entry. Two rings
/// built from the same ordered node set route every key identically.
#[derive(Debug, Clone)]
pub struct HashRing<T> {
    entries: BTreeMap<u32, T>,
    replicas: usize,
}

impl<T: Clone> Default for HashRing<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> HashRing<T> {
    pub fn new() -> Self {
        Self::with_replicas(DEFAULT_REPLICAS)
    }

    pub fn with_replicas(replicas: usize) -> Self {
        HashRing {
            entries: BTreeMap::new(),
            replicas: replicas.max(1),
        }
    }

    /// Inserts a node under `id`. Existing entries keep their hashes; only
    /// the new node's virtual replicas are added.
    pub fn add(&mut self, id: &str, node: T) {
        for i in 0..self.replicas {
            self.entries.insert(replica_hash(id, i), node.clone());
        }
    }

    /// Removes the virtual replicas contributed by `id`. Uses the same key
    /// derivation as `add`, so every entry a node contributed is erased.
    pub fn remove(&mut self, id: &str) {
        for i in 0..self.replicas {
            self.entries.remove(&replica_hash(id, i));
        }
    }

    /// Returns the node owning `key`, or `None` on an empty ring.
    pub fn get(&self, key: &[u8]) -> Option<&T> {
        if self.entries.is_empty() {
            return None;
        }
        let hash = hash_key(key);
        self.entries
            .range(hash..)
            .next()
            .or_else(|| self.entries.iter().next())
            .map(|(_, node)| node)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The hash of one virtual replica: `crc32("<id>:<i>")`. Add and remove both
/// derive keys through here, so they can never disagree on the separator.
fn replica_hash(id: &str, index: usize) -> u32 {
    CRC32_ALGO.checksum(format!("{id}:{index}").as_bytes())
}
