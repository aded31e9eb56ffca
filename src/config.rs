// src/config.rs

//! Client configuration: endpoints, timeouts, and the sharded node set.
//!
//! Configuration is plain data; the crate never loads files or reads the
//! environment. Applications that persist settings can lean on the serde
//! derives.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// The port a Redis-compatible server conventionally listens on.
pub const DEFAULT_PORT: u16 = 6379;

/// One server endpoint. Its `Display` form (`host:port`) doubles as the
/// node id on the hash ring, so identical node lists build identical rings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl NodeConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        NodeConfig {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for NodeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Configuration shared by single-endpoint and sharded clients.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ClientConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Bound on establishing the TCP connection.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Bound on each read and write once connected.
    #[serde(default = "default_io_timeout_ms")]
    pub io_timeout_ms: u64,
    /// The ordered node set for a sharded client. Ignored by
    /// single-endpoint clients.
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
}

impl ClientConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            host: default_host(),
            port: default_port(),
            connect_timeout_ms: default_connect_timeout_ms(),
            io_timeout_ms: default_io_timeout_ms(),
            nodes: Vec::new(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_connect_timeout_ms() -> u64 {
    2_000
}

fn default_io_timeout_ms() -> u64 {
    5_000
}
