// src/lib.rs

//! An asynchronous client for Redis-compatible servers.
//!
//! The library speaks the line-oriented wire protocol (status / error /
//! bulk / multibulk / integer replies), pipelines multiple commands over one
//! connection, and can route per-command across a consistent-hash-sharded
//! pool of connections.
//!
//! The main components are:
//!
//! * [`Client`]: the facade. Dispatches by command name through the catalog,
//!   offers typed helpers for the common verbs, and scopes pipelines.
//! * [`core::commands`]: the command catalog. A command is a data entry
//!   (wire verb, request encoding, response shaper, routing flags), not a
//!   type; clients can register their own at runtime.
//! * [`core::protocol`]: the wire codec. Requests in three encodings,
//!   replies decoded through a `tokio_util` codec.
//! * [`connection`]: the transport contract, implemented by a single TCP
//!   endpoint and by a ring-routed pool with identical semantics.
//! * [`core::cluster`]: the consistent-hash ring (CRC32, 64 virtual
//!   replicas per node).

pub mod client;
pub mod config;
pub mod connection;
pub mod core;

pub use crate::client::Client;
pub use crate::config::{ClientConfig, DEFAULT_PORT, NodeConfig};
pub use crate::connection::{Connection, Pipeline, ShardedConnection, Transport};
pub use crate::core::commands::{Command, CommandCatalog, CommandFlags, CommandSpec};
pub use crate::core::errors::CitrineError;
pub use crate::core::protocol::{RequestEncoding, RespReply, Value};
