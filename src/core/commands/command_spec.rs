// src/core/commands/command_spec.rs

//! Defines the command descriptor and the per-call command instance.
//!
//! A `CommandSpec` is the immutable registry entry for one verb: how its
//! request is encoded, how its reply is shaped, and how it routes. A
//! `Command` is a spec joined with one call's arguments; the transport
//! serializes it once per send.

use crate::core::CitrineError;
use crate::core::protocol::{RequestEncoding, RespReply, Value, encode_request};
use bitflags::bitflags;
use bytes::{Bytes, BytesMut};

bitflags! {
    /// Flags that describe the properties and behavior of a command.
    /// These are used by the sharded connection and the transport to handle
    /// commands appropriately.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct CommandFlags: u32 {
        /// The command's target node is fully determined by hashing its
        /// first argument.
        const SHARDABLE = 1 << 0;
        /// The server closes the connection after this command; the
        /// transport drops its socket after the write and reads no reply.
        const CLOSES_CONNECTION = 1 << 1;
    }
}

/// A pure function transforming a parsed reply into the logical value
/// returned to the caller.
pub type ResponseShaper = fn(RespReply) -> Result<Value, CitrineError>;

/// A pure transform of the raw argument list, applied at resolution time
/// (e.g. SORT option normalization).
pub type ArgFilter = fn(Vec<Bytes>) -> Result<Vec<Bytes>, CitrineError>;

/// The immutable descriptor for one registered verb.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// The wire verb, uppercase ASCII (e.g. `GET`).
    pub verb: String,
    pub encoding: RequestEncoding,
    pub shaper: ResponseShaper,
    pub flags: CommandFlags,
    pub filter: Option<ArgFilter>,
}

impl CommandSpec {
    /// A descriptor with the default shaper and default routing (shardable).
    /// Most catalog entries start here and narrow with the builder methods.
    pub fn new(verb: &str, encoding: RequestEncoding) -> Self {
        CommandSpec {
            verb: verb.to_ascii_uppercase(),
            encoding,
            shaper: crate::core::commands::shapers::shape_value,
            flags: CommandFlags::SHARDABLE,
            filter: None,
        }
    }

    pub fn shaped(mut self, shaper: ResponseShaper) -> Self {
        self.shaper = shaper;
        self
    }

    /// Commands without a single deterministic key argument never route
    /// through the ring; they pin to the fallback slot instead.
    pub fn not_shardable(mut self) -> Self {
        self.flags.remove(CommandFlags::SHARDABLE);
        self
    }

    pub fn closes_connection(mut self) -> Self {
        self.flags.insert(CommandFlags::CLOSES_CONNECTION);
        self
    }

    pub fn filtered(mut self, filter: ArgFilter) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// A command instance: descriptor plus one call's ordered argument list.
#[derive(Debug, Clone)]
pub struct Command {
    spec: CommandSpec,
    args: Vec<Bytes>,
}

impl Command {
    /// Joins a resolved spec with its (already filtered) arguments.
    pub fn new(spec: CommandSpec, args: Vec<Bytes>) -> Self {
        Command { spec, args }
    }

    pub fn verb(&self) -> &str {
        &self.spec.verb
    }

    pub fn args(&self) -> &[Bytes] {
        &self.args
    }

    pub fn is_shardable(&self) -> bool {
        self.spec.flags.contains(CommandFlags::SHARDABLE)
    }

    pub fn closes_connection(&self) -> bool {
        self.spec.flags.contains(CommandFlags::CLOSES_CONNECTION)
    }

    /// The first argument, when present, routes shardable commands.
    pub fn routing_key(&self) -> Option<&Bytes> {
        if self.is_shardable() {
            self.args.first()
        } else {
            None
        }
    }

    /// Serializes the request frame for this command.
    pub fn serialize(&self) -> Result<Bytes, CitrineError> {
        let mut buf = BytesMut::new();
        encode_request(&self.spec.verb, &self.args, self.spec.encoding, &mut buf)?;
        Ok(buf.freeze())
    }

    /// Runs the command's response shaper over a parsed reply.
    pub fn shape(&self, reply: RespReply) -> Result<Value, CitrineError> {
        (self.spec.shaper)(reply)
    }
}
