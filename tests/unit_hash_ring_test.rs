use citrine::core::cluster::{DEFAULT_REPLICAS, HashRing, hash_key};
use rand::Rng;
use rand::distributions::Alphanumeric;
use std::collections::HashMap;

fn ring_of(nodes: &[&str]) -> HashRing<String> {
    let mut ring = HashRing::new();
    for node in nodes {
        ring.add(node, node.to_string());
    }
    ring
}

fn random_keys(count: usize) -> Vec<String> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let len = rng.gen_range(1..24);
            (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(len)
                .map(char::from)
                .collect()
        })
        .collect()
}

#[tokio::test]
async fn test_hash_key_is_crc32() {
    // CRC-32/ISO-HDLC of "foo".
    assert_eq!(hash_key(b"foo"), 0x8c73_6521);
}

#[tokio::test]
async fn test_each_node_contributes_replicas() {
    let ring = ring_of(&["a:1"]);
    assert_eq!(ring.len(), DEFAULT_REPLICAS);
    let ring = ring_of(&["a:1", "b:2", "c:3"]);
    assert_eq!(ring.len(), 3 * DEFAULT_REPLICAS);
}

#[tokio::test]
async fn test_empty_ring_has_no_owner() {
    let ring: HashRing<String> = HashRing::new();
    assert!(ring.get(b"anything").is_none());
}

#[tokio::test]
async fn test_single_node_owns_every_key() {
    let ring = ring_of(&["only:6379"]);
    for key in random_keys(100) {
        assert_eq!(ring.get(key.as_bytes()), Some(&"only:6379".to_string()));
    }
}

#[tokio::test]
async fn test_routing_is_deterministic() {
    // Two rings built from the same ordered node set route identically.
    let nodes = ["a:6379", "b:6379", "c:6379"];
    let first = ring_of(&nodes);
    let second = ring_of(&nodes);
    for key in random_keys(1_000) {
        assert_eq!(first.get(key.as_bytes()), second.get(key.as_bytes()));
    }
}

#[tokio::test]
async fn test_lookup_wraps_around() {
    // Every key has an owner, including keys whose hash exceeds the ring's
    // largest entry (those wrap to the smallest).
    let ring = ring_of(&["a:6379", "b:6379"]);
    for key in random_keys(5_000) {
        assert!(ring.get(key.as_bytes()).is_some());
    }
}

#[tokio::test]
async fn test_removal_reassigns_only_the_removed_nodes_keys() {
    let mut ring = ring_of(&["a:6379", "b:6379", "c:6379"]);
    let keys = random_keys(2_000);
    let before: Vec<String> = keys
        .iter()
        .map(|k| ring.get(k.as_bytes()).unwrap().clone())
        .collect();

    ring.remove("b:6379");
    assert_eq!(ring.len(), 2 * DEFAULT_REPLICAS);

    for (key, owner) in keys.iter().zip(before.iter()) {
        let after = ring.get(key.as_bytes()).unwrap();
        if owner != "b:6379" {
            assert_eq!(after, owner, "key '{key}' moved although its node stayed");
        } else {
            assert_ne!(after, "b:6379");
        }
    }
}

#[tokio::test]
async fn test_adding_a_node_only_steals_keys() {
    // Entries for existing nodes keep their hashes, so a key either moves to
    // the new node or keeps its previous owner.
    let smaller = ring_of(&["a:6379", "b:6379"]);
    let larger = ring_of(&["a:6379", "b:6379", "c:6379"]);
    for key in random_keys(2_000) {
        let after = larger.get(key.as_bytes()).unwrap();
        if after != "c:6379" {
            assert_eq!(after, smaller.get(key.as_bytes()).unwrap());
        }
    }
}

#[tokio::test]
async fn test_distribution_balance() {
    // 10k random keys over 10 nodes with 64 replicas each: no node may see
    // more than 3x the mean share.
    let nodes: Vec<String> = (0..10).map(|i| format!("node{i}:6379")).collect();
    let node_refs: Vec<&str> = nodes.iter().map(String::as_str).collect();
    let ring = ring_of(&node_refs);

    let mut counts: HashMap<String, usize> = HashMap::new();
    for key in random_keys(10_000) {
        *counts.entry(ring.get(key.as_bytes()).unwrap().clone()).or_default() += 1;
    }

    let mean = 10_000 / 10;
    for (node, count) in counts {
        assert!(
            count <= 3 * mean,
            "node {node} received {count} keys, more than 3x the mean"
        );
    }
}
