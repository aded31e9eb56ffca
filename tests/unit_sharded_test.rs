#[path = "support/mock_server.rs"]
mod mock_server;

use bytes::Bytes;
use citrine::connection::{Connection, ShardedConnection};
use citrine::core::cluster::HashRing;
use citrine::core::commands::CommandCatalog;
use citrine::{CitrineError, Client, ClientConfig, NodeConfig};
use mock_server::MockServer;

fn sharded_config(ports: &[u16]) -> ClientConfig {
    ClientConfig {
        nodes: ports
            .iter()
            .map(|&port| NodeConfig::new("127.0.0.1", port))
            .collect(),
        io_timeout_ms: 500,
        ..ClientConfig::default()
    }
}

/// The reference ring for a node list, mapping each key to its pool index.
fn reference_ring(ports: &[u16]) -> HashRing<usize> {
    let mut ring = HashRing::new();
    for (index, port) in ports.iter().enumerate() {
        ring.add(&format!("127.0.0.1:{port}"), index);
    }
    ring
}

#[tokio::test]
async fn test_connect_fans_out_and_disconnect_clears() {
    let a = MockServer::start_silent().await;
    let b = MockServer::start_silent().await;
    let mut client = Client::sharded(sharded_config(&[a.port(), b.port()]));

    assert!(!client.is_connected());
    client.connect().await.unwrap();
    assert!(client.is_connected());
    client.disconnect().await;
    assert!(!client.is_connected());
    a.abort();
    b.abort();
}

#[tokio::test]
async fn test_member_connect_failure_propagates() {
    let alive = MockServer::start_silent().await;
    // Bind-then-drop leaves a dead port; connecting to it must fail the
    // whole fan-out, with no fallback.
    let dead = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_port = dead.local_addr().unwrap().port();
    drop(dead);

    let mut client = Client::sharded(sharded_config(&[alive.port(), dead_port]));
    let err = client.connect().await.unwrap_err();
    assert!(matches!(err, CitrineError::Io(_) | CitrineError::Timeout));
    alive.abort();
}

#[tokio::test]
async fn test_non_shardable_commands_pin_to_the_first_node() {
    let first = MockServer::start("+PONG\r\n+PONG\r\n").await;
    let second = MockServer::start_silent().await;
    let mut client = Client::sharded(sharded_config(&[first.port(), second.port()]));
    client.connect().await.unwrap();

    assert!(client.ping().await.unwrap());
    assert!(client.ping().await.unwrap());
    client.disconnect().await;

    assert_eq!(first.received().await, b"PING\r\nPING\r\n");
    assert!(second.received().await.is_empty());
}

#[tokio::test]
async fn test_shardable_commands_follow_the_ring() {
    let labels = [b"n0", b"n1"];
    let a = MockServer::start("$2\r\nn0\r\n".repeat(32)).await;
    let b = MockServer::start("$2\r\nn1\r\n".repeat(32)).await;
    let ports = [a.port(), b.port()];
    let ring = reference_ring(&ports);

    let mut client = Client::sharded(sharded_config(&ports));
    client.connect().await.unwrap();

    for i in 0..16 {
        let key = format!("key-{i}");
        let expected = labels[*ring.get(key.as_bytes()).unwrap()];
        let value = client.get(key.as_bytes()).await.unwrap();
        assert_eq!(
            value,
            Some(Bytes::copy_from_slice(expected)),
            "key '{key}' was answered by the wrong node"
        );
    }
    client.disconnect().await;
    a.abort();
    b.abort();
}

#[tokio::test]
async fn test_pipeline_reads_pair_with_the_written_node() {
    let labels = [b"n0", b"n1"];
    let a = MockServer::start("$2\r\nn0\r\n".repeat(32)).await;
    let b = MockServer::start("$2\r\nn1\r\n".repeat(32)).await;
    let ports = [a.port(), b.port()];
    let ring = reference_ring(&ports);

    let mut client = Client::sharded(sharded_config(&ports));
    client.connect().await.unwrap();

    let keys: Vec<String> = (0..12).map(|i| format!("pipeline-key-{i}")).collect();
    let results = client
        .pipeline(|pipe| {
            for key in &keys {
                pipe.call("get", &[key.as_bytes()])?;
            }
            Ok(())
        })
        .await
        .unwrap();

    assert_eq!(results.len(), keys.len());
    for (key, value) in keys.iter().zip(results) {
        let expected = labels[*ring.get(key.as_bytes()).unwrap()];
        assert_eq!(
            value,
            citrine::Value::Blob(Bytes::copy_from_slice(expected)),
            "pipelined reply for '{key}' came from the wrong node"
        );
    }
    client.disconnect().await;
    a.abort();
    b.abort();
}

#[tokio::test]
async fn test_raw_command_is_rejected_on_a_sharded_client() {
    let a = MockServer::start_silent().await;
    let mut client = Client::sharded(sharded_config(&[a.port()]));
    client.connect().await.unwrap();

    let err = client.raw_command(b"PING\r\n", true).await.unwrap_err();
    assert_eq!(err, CitrineError::RawCommandUnsupported);
    client.disconnect().await;
    a.abort();
}

#[tokio::test]
async fn test_read_without_write_is_a_client_error() {
    let a = MockServer::start_silent().await;
    let config = sharded_config(&[a.port()]);
    let mut conn = ShardedConnection::new(&config.nodes, &config);
    conn.connect().await.unwrap();

    let catalog = CommandCatalog::default();
    let cmd = catalog
        .resolve("get", vec![Bytes::from_static(b"k")])
        .unwrap();
    assert_eq!(
        conn.read_reply(&cmd).await.unwrap_err(),
        CitrineError::NoPendingReply
    );
    conn.disconnect().await;
    a.abort();
}
