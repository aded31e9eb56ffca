// tests/support/mock_server.rs

//! An in-process mock server speaking the wire protocol.
//!
//! The server accepts exactly one connection, immediately writes its canned
//! reply bytes, then records everything the client sends until the client
//! hangs up. Tests drive the real client against it and assert on both the
//! shaped results and the exact request bytes that reached the server.

// Each test binary compiles its own copy; not all of them use every helper.
#![allow(dead_code)]

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub struct MockServer {
    port: u16,
    received: oneshot::Receiver<Vec<u8>>,
    handle: JoinHandle<()>,
}

impl MockServer {
    /// Binds on an ephemeral port and serves `canned` to the first client.
    pub async fn start(canned: impl Into<Vec<u8>>) -> MockServer {
        let canned = canned.into();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            if !canned.is_empty() {
                socket.write_all(&canned).await.unwrap();
            }
            let mut received = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => received.extend_from_slice(&buf[..n]),
                }
            }
            let _ = tx.send(received);
        });

        MockServer {
            port,
            received: rx,
            handle,
        }
    }

    /// A server that accepts and then stays silent (for timeout tests).
    pub async fn start_silent() -> MockServer {
        MockServer::start(Vec::new()).await
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Everything the client sent, available once the client disconnected.
    pub async fn received(self) -> Vec<u8> {
        let bytes = self.received.await.unwrap();
        self.handle.await.unwrap();
        bytes
    }

    /// Shuts the server down without waiting for the client.
    pub fn abort(self) {
        self.handle.abort();
    }
}

/// A mock that closes the connection as soon as it is accepted
/// (for connection-reset tests).
pub struct SlammingServer {
    pub port: u16,
    handle: JoinHandle<()>,
}

impl SlammingServer {
    pub async fn start() -> SlammingServer {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            drop(socket);
        });
        SlammingServer { port, handle }
    }

    pub fn abort(self) {
        self.handle.abort();
    }
}
