// src/core/cluster/mod.rs

//! Client-side sharding: the consistent-hash ring and routing-key hashing.

pub mod hash_ring;

pub use hash_ring::{DEFAULT_REPLICAS, HashRing, hash_key};
