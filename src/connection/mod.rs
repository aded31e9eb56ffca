// src/connection/mod.rs

//! The connection layer: a polymorphic contract over one TCP endpoint or a
//! consistent-hash ring of them, plus the pipeline coordinator.

pub mod pipeline;
pub mod sharded;
pub mod transport;

pub use pipeline::Pipeline;
pub use sharded::ShardedConnection;
pub use transport::Transport;

use crate::core::commands::Command;
use crate::core::protocol::{RespReply, Value};
use crate::core::CitrineError;
use async_trait::async_trait;
use bytes::Bytes;

/// The capability set shared by the single-endpoint transport and the
/// sharded connection. The client facade and the pipeline coordinator only
/// ever talk through this contract.
#[async_trait]
pub trait Connection: Send {
    /// Establishes the underlying socket(s). Connecting while connected is a
    /// client error; member failures of a sharded pool propagate as-is.
    async fn connect(&mut self) -> Result<(), CitrineError>;

    /// Drops the underlying socket(s). Idempotent.
    async fn disconnect(&mut self);

    /// True iff at least one underlying socket is present.
    fn is_connected(&self) -> bool;

    /// Serializes and writes one command. A command flagged as closing the
    /// connection leaves the transport disconnected afterwards.
    async fn write_command(&mut self, cmd: &Command) -> Result<(), CitrineError>;

    /// Reads one reply for a previously written command, converts server `-`
    /// replies into errors, and applies the command's response shaper.
    async fn read_reply(&mut self, cmd: &Command) -> Result<Value, CitrineError>;

    /// Escape hatch: writes caller-provided bytes verbatim and optionally
    /// reads one unshaped reply. Only the single-endpoint transport supports
    /// this; routing raw bytes through a ring is not meaningful.
    async fn raw_command(
        &mut self,
        payload: Bytes,
        expect_reply: bool,
    ) -> Result<Option<RespReply>, CitrineError>;

    /// One full request/response exchange. Commands that close the
    /// connection return `Nil` without reading.
    async fn execute(&mut self, cmd: &Command) -> Result<Value, CitrineError> {
        self.write_command(cmd).await?;
        if cmd.closes_connection() {
            return Ok(Value::Nil);
        }
        self.read_reply(cmd).await
    }
}
