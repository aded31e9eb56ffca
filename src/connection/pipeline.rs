// src/connection/pipeline.rs

//! The pipeline coordinator: buffered submission, batched write, in-order
//! read, aggregate failure.
//!
//! A `Pipeline` only collects commands; no bytes move until the user's block
//! returns successfully. The coordinator then writes every buffered command
//! in submission order and reads the replies back in the same order. Any
//! failure discards the result list and surfaces a pipeline error carrying
//! the underlying cause. After a server error the remaining replies are
//! still drained so the stream stays aligned; the first error wins.

use crate::connection::Connection;
use crate::core::CitrineError;
use crate::core::commands::{Command, CommandCatalog};
use crate::core::protocol::Value;
use bytes::Bytes;
use tracing::trace;

/// The buffered submission scope handed to the user's block.
///
/// Borrowing the catalog (and nothing else) for the duration of the block
/// makes the scoping lexical: the buffer cannot outlive the pipeline call,
/// and a nested pipeline cannot be started because the client itself is not
/// reachable from here.
pub struct Pipeline<'a> {
    catalog: &'a CommandCatalog,
    buffer: Vec<Command>,
}

impl<'a> Pipeline<'a> {
    pub(crate) fn new(catalog: &'a CommandCatalog) -> Self {
        Pipeline {
            catalog,
            buffer: Vec::new(),
        }
    }

    /// Resolves `name` through the catalog and buffers the command. No I/O
    /// happens here.
    pub fn call(&mut self, name: &str, args: &[&[u8]]) -> Result<(), CitrineError> {
        let args = args.iter().map(|a| Bytes::copy_from_slice(a)).collect();
        let cmd = self.catalog.resolve(name, args)?;
        trace!(verb = cmd.verb(), buffered = self.buffer.len() + 1, "pipeline buffering");
        self.buffer.push(cmd);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub(crate) fn into_commands(self) -> Vec<Command> {
        self.buffer
    }
}

/// Replays buffered commands through a connection: all writes, then all
/// reads, in submission order. The result list always has one entry per
/// submitted command.
pub(crate) async fn run_pipeline<C: Connection>(
    conn: &mut C,
    commands: Vec<Command>,
) -> Result<Vec<Value>, CitrineError> {
    for cmd in &commands {
        conn.write_command(cmd)
            .await
            .map_err(|e| CitrineError::Pipeline(Box::new(e)))?;
    }

    let mut results = Vec::with_capacity(commands.len());
    let mut first_error: Option<CitrineError> = None;
    for cmd in &commands {
        // A closing command never produced a reply; its slot stays nil.
        if cmd.closes_connection() {
            results.push(Value::Nil);
            continue;
        }
        match conn.read_reply(cmd).await {
            Ok(value) => results.push(value),
            // The stream is gone; draining further is pointless.
            Err(e) if e.invalidates_connection() => {
                return Err(CitrineError::Pipeline(Box::new(e)));
            }
            Err(e) => {
                if first_error.is_none() {
                    first_error = Some(e);
                }
                results.push(Value::Nil);
            }
        }
    }

    match first_error {
        Some(e) => Err(CitrineError::Pipeline(Box::new(e))),
        None => Ok(results),
    }
}
