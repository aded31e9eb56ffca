// src/client.rs

//! The client facade: name dispatch through the catalog, typed convenience
//! helpers, runtime command registration, and the pipeline entry point.

use crate::config::ClientConfig;
use crate::connection::pipeline::{Pipeline, run_pipeline};
use crate::connection::{Connection, ShardedConnection, Transport};
use crate::core::CitrineError;
use crate::core::commands::{CommandCatalog, CommandSpec};
use crate::core::protocol::{RespReply, Value};
use bytes::Bytes;

/// A client over a single endpoint (`Client::new`) or a sharded node set
/// (`Client::sharded`). One instance exclusively owns its transport; the
/// `&mut self` methods make concurrent use on one connection impossible.
pub struct Client<C: Connection = Transport> {
    conn: C,
    catalog: CommandCatalog,
}

impl Client<Transport> {
    /// A client for the single endpoint named by `config`.
    pub fn new(config: ClientConfig) -> Self {
        Client {
            conn: Transport::from_config(&config),
            catalog: CommandCatalog::default(),
        }
    }
}

impl Client<ShardedConnection> {
    /// A client routing over `config.nodes` through the consistent-hash
    /// ring. Shardable commands go to the node owning their first argument;
    /// everything else pins to the first node.
    pub fn sharded(config: ClientConfig) -> Self {
        Client {
            conn: ShardedConnection::new(&config.nodes, &config),
            catalog: CommandCatalog::default(),
        }
    }
}

impl<C: Connection> Client<C> {
    pub async fn connect(&mut self) -> Result<(), CitrineError> {
        self.conn.connect().await
    }

    pub async fn disconnect(&mut self) {
        self.conn.disconnect().await;
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_connected()
    }

    /// Dynamic dispatch by name: resolves through the catalog, executes, and
    /// returns the shaped value.
    pub async fn call(&mut self, name: &str, args: &[&[u8]]) -> Result<Value, CitrineError> {
        let args = args.iter().map(|a| Bytes::copy_from_slice(a)).collect();
        self.dispatch(name, args).await
    }

    async fn dispatch(&mut self, name: &str, args: Vec<Bytes>) -> Result<Value, CitrineError> {
        let cmd = self.catalog.resolve(name, args)?;
        self.conn.execute(&cmd).await
    }

    /// Registers (or replaces) one command descriptor under `name`.
    pub fn register_command(&mut self, name: &str, spec: CommandSpec) {
        self.catalog.register(name, spec);
    }

    /// Registers a batch of descriptors.
    pub fn register_commands<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, CommandSpec)>,
    {
        self.catalog.register_many(entries);
    }

    pub fn catalog(&self) -> &CommandCatalog {
        &self.catalog
    }

    /// Runs `build` against a buffered pipeline, then replays the buffer:
    /// all writes in submission order, then all reads in the same order.
    /// Every failure path surfaces as `CitrineError::Pipeline` carrying the
    /// underlying cause.
    pub async fn pipeline<F>(&mut self, build: F) -> Result<Vec<Value>, CitrineError>
    where
        F: FnOnce(&mut Pipeline<'_>) -> Result<(), CitrineError>,
    {
        let mut pipe = Pipeline::new(&self.catalog);
        build(&mut pipe).map_err(|e| CitrineError::Pipeline(Box::new(e)))?;
        let commands = pipe.into_commands();
        run_pipeline(&mut self.conn, commands).await
    }

    /// Escape hatch: sends caller-provided bytes, optionally reading one
    /// unshaped reply. A sharded client rejects this.
    pub async fn raw_command(
        &mut self,
        payload: &[u8],
        expect_reply: bool,
    ) -> Result<Option<RespReply>, CitrineError> {
        self.conn
            .raw_command(Bytes::copy_from_slice(payload), expect_reply)
            .await
    }

    // --- Typed helpers over `call` ---

    /// Fetches a value; `None` when the key is missing.
    pub async fn get(&mut self, key: &[u8]) -> Result<Option<Bytes>, CitrineError> {
        self.call("get", &[key]).await?.into_blob()
    }

    pub async fn set(&mut self, key: &[u8], value: &[u8]) -> Result<bool, CitrineError> {
        self.call("set", &[key, value]).await?.into_bool()
    }

    /// SETNX: sets only when the key is absent; true when the write won.
    pub async fn set_preserve(&mut self, key: &[u8], value: &[u8]) -> Result<bool, CitrineError> {
        self.call("setnx", &[key, value]).await?.into_bool()
    }

    /// GETSET: atomically replaces the value, returning the previous one.
    pub async fn get_set(
        &mut self,
        key: &[u8],
        value: &[u8],
    ) -> Result<Option<Bytes>, CitrineError> {
        self.call("getset", &[key, value]).await?.into_blob()
    }

    pub async fn delete(&mut self, key: &[u8]) -> Result<bool, CitrineError> {
        self.call("del", &[key]).await?.into_bool()
    }

    pub async fn exists(&mut self, key: &[u8]) -> Result<bool, CitrineError> {
        self.call("exists", &[key]).await?.into_bool()
    }

    pub async fn incr(&mut self, key: &[u8]) -> Result<i64, CitrineError> {
        self.call("incr", &[key]).await?.into_int()
    }

    pub async fn incr_by(&mut self, key: &[u8], delta: i64) -> Result<i64, CitrineError> {
        let delta = delta.to_string();
        self.call("incrby", &[key, delta.as_bytes()]).await?.into_int()
    }

    pub async fn decr(&mut self, key: &[u8]) -> Result<i64, CitrineError> {
        self.call("decr", &[key]).await?.into_int()
    }

    pub async fn decr_by(&mut self, key: &[u8], delta: i64) -> Result<i64, CitrineError> {
        let delta = delta.to_string();
        self.call("decrby", &[key, delta.as_bytes()]).await?.into_int()
    }

    pub async fn expire(&mut self, key: &[u8], seconds: u64) -> Result<bool, CitrineError> {
        let seconds = seconds.to_string();
        self.call("expire", &[key, seconds.as_bytes()]).await?.into_bool()
    }

    /// Seconds to live; servers answer `-1` for keys without expiry.
    pub async fn ttl(&mut self, key: &[u8]) -> Result<i64, CitrineError> {
        self.call("ttl", &[key]).await?.into_int()
    }

    pub async fn keys(&mut self, pattern: &[u8]) -> Result<Vec<Bytes>, CitrineError> {
        let names = self.call("keys", &[pattern]).await?.into_list()?;
        names
            .into_iter()
            .map(|value| {
                value
                    .into_blob()?
                    .ok_or(CitrineError::UnexpectedResponse)
            })
            .collect()
    }

    pub async fn random_key(&mut self) -> Result<Option<Bytes>, CitrineError> {
        self.call("randomkey", &[]).await?.into_blob()
    }

    /// True iff the server answered `PONG`.
    pub async fn ping(&mut self) -> Result<bool, CitrineError> {
        self.call("ping", &[]).await?.into_bool()
    }

    pub async fn echo(&mut self, message: &[u8]) -> Result<Bytes, CitrineError> {
        self.call("echo", &[message])
            .await?
            .into_blob()?
            .ok_or(CitrineError::UnexpectedResponse)
    }

    /// The server's INFO report as ordered field/value pairs.
    pub async fn info(&mut self) -> Result<Vec<(String, String)>, CitrineError> {
        self.call("info", &[]).await?.into_map()
    }

    pub async fn mget(&mut self, keys: &[&[u8]]) -> Result<Vec<Option<Bytes>>, CitrineError> {
        let values = self.call("mget", keys).await?.into_list()?;
        values.into_iter().map(Value::into_blob).collect()
    }

    /// MSET: the key/value mapping is flattened into an even-length argument
    /// list, preserving the given order.
    pub async fn mset(&mut self, pairs: &[(&[u8], &[u8])]) -> Result<bool, CitrineError> {
        let mut args = Vec::with_capacity(pairs.len() * 2);
        for (key, value) in pairs {
            args.push(Bytes::copy_from_slice(key));
            args.push(Bytes::copy_from_slice(value));
        }
        self.dispatch("mset", args).await?.into_bool()
    }
}
