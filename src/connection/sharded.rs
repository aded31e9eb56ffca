// src/connection/sharded.rs

//! A ring-routed pool of transports with the same contract as one.
//!
//! Each shardable command is routed by the CRC32 of its first argument
//! through the consistent-hash ring; commands without a deterministic key
//! pin to a fixed fallback member. A FIFO of written-to members pairs every
//! deferred read with the transport that took the write, which keeps
//! pipelined reads correct: replies are consumed in submission order, each
//! from its own node's stream.

use crate::config::{ClientConfig, NodeConfig};
use crate::connection::{Connection, Transport};
use crate::core::CitrineError;
use crate::core::cluster::HashRing;
use crate::core::commands::Command;
use crate::core::protocol::{RespReply, Value};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Commands that cannot be routed by key go to the first pool member.
const FALLBACK_SLOT: usize = 0;

/// An ordered pool of transports plus the ring that routes between them.
///
/// The ring maps key hashes to pool indices; node ids are the `host:port`
/// display form, so two clients configured with the same ordered node set
/// route every key identically.
#[derive(Debug)]
pub struct ShardedConnection {
    pool: Vec<Transport>,
    ring: HashRing<usize>,
    pending: VecDeque<usize>,
}

impl ShardedConnection {
    pub fn new(nodes: &[NodeConfig], config: &ClientConfig) -> Self {
        let mut ring = HashRing::new();
        let mut pool = Vec::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            ring.add(&node.to_string(), index);
            pool.push(Transport::for_node(node, config));
        }
        debug!(nodes = pool.len(), replicas = ring.len(), "sharded connection built");
        ShardedConnection {
            pool,
            ring,
            pending: VecDeque::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.pool.len()
    }

    /// The pool index a command routes to.
    fn slot_for(&self, cmd: &Command) -> usize {
        match cmd.routing_key() {
            Some(key) => *self.ring.get(key).unwrap_or(&FALLBACK_SLOT),
            None => FALLBACK_SLOT,
        }
    }
}

#[async_trait]
impl Connection for ShardedConnection {
    async fn connect(&mut self) -> Result<(), CitrineError> {
        // Member failures propagate; there is no fallback across nodes.
        for transport in &mut self.pool {
            transport.connect().await?;
        }
        Ok(())
    }

    async fn disconnect(&mut self) {
        for transport in &mut self.pool {
            transport.disconnect().await;
        }
        self.pending.clear();
    }

    fn is_connected(&self) -> bool {
        self.pool.iter().any(Transport::is_connected)
    }

    async fn write_command(&mut self, cmd: &Command) -> Result<(), CitrineError> {
        let slot = self.slot_for(cmd);
        let transport = self
            .pool
            .get_mut(slot)
            .ok_or(CitrineError::NotConnected)?;
        trace!(verb = cmd.verb(), slot, addr = %transport.addr(), "routing command");
        transport.write_command(cmd).await?;
        if !cmd.closes_connection() {
            self.pending.push_back(slot);
        }
        Ok(())
    }

    async fn read_reply(&mut self, cmd: &Command) -> Result<Value, CitrineError> {
        let slot = self
            .pending
            .pop_front()
            .ok_or(CitrineError::NoPendingReply)?;
        self.pool[slot].read_reply(cmd).await
    }

    async fn raw_command(
        &mut self,
        _payload: Bytes,
        _expect_reply: bool,
    ) -> Result<Option<RespReply>, CitrineError> {
        Err(CitrineError::RawCommandUnsupported)
    }
}
