// src/core/commands/mod.rs

//! The command catalog: a registry mapping call names to command
//! descriptors.
//!
//! Names cover the protocol verbs in lowercase plus stable snake_case
//! aliases (`get_set` for GETSET, `push_tail` for RPUSH, ...). Adding a
//! command is a data entry in `default_entries`, not a design change;
//! clients may also register their own descriptors at runtime.

pub mod command_spec;
pub mod filters;
pub mod shapers;

pub use command_spec::{ArgFilter, Command, CommandFlags, CommandSpec, ResponseShaper};

use crate::core::CitrineError;
use crate::core::protocol::RequestEncoding::{Bulk, Inline, MultiBulk};
use bytes::Bytes;
use filters::{slaveof_filter, sort_filter};
use shapers::{shape_bool, shape_info, shape_keys, shape_pong, shape_randomkey};
use std::collections::HashMap;

/// The name → descriptor registry. One per client; starts from the default
/// catalog and grows through runtime registration.
#[derive(Debug, Clone)]
pub struct CommandCatalog {
    specs: HashMap<String, CommandSpec>,
}

impl Default for CommandCatalog {
    fn default() -> Self {
        let mut catalog = CommandCatalog::empty();
        for (names, spec) in default_entries() {
            for name in names {
                catalog.register(name, spec.clone());
            }
        }
        catalog
    }
}

impl CommandCatalog {
    /// A catalog with no registered commands.
    pub fn empty() -> Self {
        CommandCatalog {
            specs: HashMap::new(),
        }
    }

    /// Looks up `name` and joins the descriptor with `args`, applying the
    /// command's argument filter. Unknown names are a client error.
    pub fn resolve(&self, name: &str, args: Vec<Bytes>) -> Result<Command, CitrineError> {
        let spec = self
            .get(name)
            .ok_or_else(|| CitrineError::UnknownCommand(name.to_string()))?
            .clone();
        let args = match spec.filter {
            Some(filter) => filter(args)?,
            None => args,
        };
        Ok(Command::new(spec, args))
    }

    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        match self.specs.get(name) {
            Some(spec) => Some(spec),
            // Registered names are lowercase; accept GET for get.
            None => self.specs.get(&name.to_ascii_lowercase()),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn register(&mut self, name: &str, spec: CommandSpec) {
        self.specs.insert(name.to_string(), spec);
    }

    pub fn register_many<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, CommandSpec)>,
    {
        for (name, spec) in entries {
            self.register(&name, spec);
        }
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// The default catalog, grouped by category. Each entry lists every name the
/// descriptor answers to; the first is the protocol verb in lowercase.
#[allow(clippy::type_complexity)]
fn default_entries() -> Vec<(&'static [&'static str], CommandSpec)> {
    vec![
        // --- Connection and server control ---
        (
            &["ping"],
            CommandSpec::new("PING", Inline).shaped(shape_pong).not_shardable(),
        ),
        (&["auth"], CommandSpec::new("AUTH", Inline).not_shardable()),
        (&["echo"], CommandSpec::new("ECHO", Bulk).not_shardable()),
        (
            &["quit"],
            CommandSpec::new("QUIT", Inline).not_shardable().closes_connection(),
        ),
        (&["select"], CommandSpec::new("SELECT", Inline).not_shardable()),
        (
            &["info"],
            CommandSpec::new("INFO", Inline).shaped(shape_info).not_shardable(),
        ),
        (
            &["slaveof", "slave_of"],
            CommandSpec::new("SLAVEOF", Inline)
                .not_shardable()
                .filtered(slaveof_filter),
        ),
        (&["save"], CommandSpec::new("SAVE", Inline).not_shardable()),
        (
            &["bgsave", "background_save"],
            CommandSpec::new("BGSAVE", Inline).not_shardable(),
        ),
        (
            &["lastsave", "last_save"],
            CommandSpec::new("LASTSAVE", Inline).not_shardable(),
        ),
        (
            &["shutdown"],
            CommandSpec::new("SHUTDOWN", Inline)
                .not_shardable()
                .closes_connection(),
        ),
        (
            &["flushdb", "flush_db"],
            CommandSpec::new("FLUSHDB", Inline).not_shardable(),
        ),
        (
            &["flushall", "flush_all"],
            CommandSpec::new("FLUSHALL", Inline).not_shardable(),
        ),
        (
            &["dbsize", "database_size"],
            CommandSpec::new("DBSIZE", Inline).not_shardable(),
        ),

        // --- Strings ---
        (&["get"], CommandSpec::new("GET", Inline)),
        (&["set"], CommandSpec::new("SET", MultiBulk)),
        (&["getset", "get_set"], CommandSpec::new("GETSET", Bulk)),
        (
            &["setnx", "set_preserve"],
            CommandSpec::new("SETNX", Bulk).shaped(shape_bool),
        ),
        (&["mget"], CommandSpec::new("MGET", Inline).not_shardable()),
        (
            &["mset"],
            CommandSpec::new("MSET", MultiBulk).not_shardable(),
        ),
        (
            &["msetnx"],
            CommandSpec::new("MSETNX", MultiBulk)
                .shaped(shape_bool)
                .not_shardable(),
        ),
        (&["incr"], CommandSpec::new("INCR", Inline)),
        (&["incrby", "incr_by"], CommandSpec::new("INCRBY", Inline)),
        (&["decr"], CommandSpec::new("DECR", Inline)),
        (&["decrby", "decr_by"], CommandSpec::new("DECRBY", Inline)),

        // --- Key space ---
        (
            &["exists"],
            CommandSpec::new("EXISTS", Inline).shaped(shape_bool),
        ),
        (
            &["del", "delete"],
            CommandSpec::new("DEL", Inline).shaped(shape_bool),
        ),
        (&["type", "key_type"], CommandSpec::new("TYPE", Inline)),
        (
            &["keys"],
            CommandSpec::new("KEYS", Inline).shaped(shape_keys).not_shardable(),
        ),
        (
            &["randomkey", "random_key"],
            CommandSpec::new("RANDOMKEY", Inline)
                .shaped(shape_randomkey)
                .not_shardable(),
        ),
        (&["rename"], CommandSpec::new("RENAME", Inline).not_shardable()),
        (
            &["renamenx", "rename_preserve"],
            CommandSpec::new("RENAMENX", Inline)
                .shaped(shape_bool)
                .not_shardable(),
        ),
        (
            &["expire"],
            CommandSpec::new("EXPIRE", Inline).shaped(shape_bool),
        ),
        (
            &["expireat", "expire_at"],
            CommandSpec::new("EXPIREAT", Inline).shaped(shape_bool),
        ),
        (&["ttl"], CommandSpec::new("TTL", Inline)),
        (
            &["move"],
            CommandSpec::new("MOVE", Inline).shaped(shape_bool).not_shardable(),
        ),
        (
            &["sort"],
            CommandSpec::new("SORT", Inline).filtered(sort_filter),
        ),

        // --- Lists ---
        (
            &["rpush", "push_tail"],
            CommandSpec::new("RPUSH", Bulk),
        ),
        (
            &["lpush", "push_head"],
            CommandSpec::new("LPUSH", Bulk),
        ),
        (&["rpop", "pop_tail"], CommandSpec::new("RPOP", Inline)),
        (&["lpop", "pop_head"], CommandSpec::new("LPOP", Inline)),
        (
            &["llen", "list_length"],
            CommandSpec::new("LLEN", Inline),
        ),
        (
            &["lrange", "list_range"],
            CommandSpec::new("LRANGE", Inline),
        ),
        (
            &["ltrim", "list_trim"],
            CommandSpec::new("LTRIM", Inline),
        ),
        (
            &["lindex", "list_index"],
            CommandSpec::new("LINDEX", Inline),
        ),
        (&["lset", "list_set"], CommandSpec::new("LSET", Bulk)),
        (&["lrem", "list_rm"], CommandSpec::new("LREM", Bulk)),

        // --- Sets ---
        (
            &["sadd", "set_add"],
            CommandSpec::new("SADD", Bulk).shaped(shape_bool),
        ),
        (
            &["srem", "set_delete"],
            CommandSpec::new("SREM", Bulk).shaped(shape_bool),
        ),
        (&["spop", "set_pop"], CommandSpec::new("SPOP", Inline)),
        (
            &["smove", "set_move"],
            CommandSpec::new("SMOVE", Bulk)
                .shaped(shape_bool)
                .not_shardable(),
        ),
        (
            &["scard", "set_count"],
            CommandSpec::new("SCARD", Inline),
        ),
        (
            &["sismember", "set_member"],
            CommandSpec::new("SISMEMBER", Bulk).shaped(shape_bool),
        ),
        (
            &["smembers", "set_members"],
            CommandSpec::new("SMEMBERS", Inline),
        ),
        (
            &["sinter", "set_intersect"],
            CommandSpec::new("SINTER", Inline),
        ),
        (
            &["sinterstore", "set_inter_store"],
            CommandSpec::new("SINTERSTORE", Inline),
        ),
        (
            &["sunion", "set_union"],
            CommandSpec::new("SUNION", Inline),
        ),
        (
            &["sunionstore", "set_union_store"],
            CommandSpec::new("SUNIONSTORE", Inline),
        ),
        (&["sdiff", "set_diff"], CommandSpec::new("SDIFF", Inline)),
        (
            &["sdiffstore", "set_diff_store"],
            CommandSpec::new("SDIFFSTORE", Inline),
        ),

        // --- Sorted sets ---
        (
            &["zadd", "zset_add"],
            CommandSpec::new("ZADD", Bulk).shaped(shape_bool),
        ),
        (
            &["zrem", "zset_delete"],
            CommandSpec::new("ZREM", Bulk).shaped(shape_bool),
        ),
        (
            &["zincrby", "zset_incr_by"],
            CommandSpec::new("ZINCRBY", Bulk),
        ),
        (
            &["zscore", "zset_score"],
            CommandSpec::new("ZSCORE", Bulk),
        ),
        (
            &["zcard", "zset_count"],
            CommandSpec::new("ZCARD", Inline),
        ),
        (
            &["zrange", "zset_range"],
            CommandSpec::new("ZRANGE", Inline),
        ),
        (
            &["zrevrange", "zset_rev_range"],
            CommandSpec::new("ZREVRANGE", Inline),
        ),
        (
            &["zrangebyscore", "zset_range_by_score"],
            CommandSpec::new("ZRANGEBYSCORE", Inline),
        ),
    ]
}
