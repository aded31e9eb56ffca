// src/core/protocol/value.rs

//! Defines the shaped value type returned to callers.

use crate::core::CitrineError;
use crate::core::protocol::RespReply;
use bytes::Bytes;
use std::fmt;

/// `Value` is the logical form of a server reply, after the command's
/// response shaper has run.
///
/// The wire-level `RespReply` stays inside the protocol layer; callers see
/// this type instead, with the protocol's sentinels already applied (`+OK`
/// becomes `Bool(true)`, the nil forms become `Nil`).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Status(String),
    Blob(Bytes),
    List(Vec<Value>),
    /// Ordered key/value pairs, as produced by the INFO shaper.
    Map(Vec<(String, String)>),
}

impl Value {
    /// The canonical structural conversion from a wire reply. Command-specific
    /// shapers start from this and narrow further.
    pub fn from_reply(reply: RespReply) -> Value {
        match reply {
            RespReply::Status(s) if s == "OK" => Value::Bool(true),
            RespReply::Status(s) => Value::Status(s),
            // Top-level errors become `Err` before shaping; an error nested
            // inside a multibulk degrades to its message text.
            RespReply::Error(s) => Value::Status(s),
            RespReply::Integer(Some(i)) => Value::Int(i),
            RespReply::Integer(None) => Value::Nil,
            RespReply::Bulk(Some(data)) => Value::Blob(data),
            RespReply::Bulk(None) => Value::Nil,
            RespReply::MultiBulk(Some(items)) => {
                Value::List(items.into_iter().map(Value::from_reply).collect())
            }
            RespReply::MultiBulk(None) => Value::Nil,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Narrows to a boolean, as produced by the status and coercion shapers.
    pub fn into_bool(self) -> Result<bool, CitrineError> {
        match self {
            Value::Bool(b) => Ok(b),
            _ => Err(CitrineError::UnexpectedResponse),
        }
    }

    pub fn into_int(self) -> Result<i64, CitrineError> {
        match self {
            Value::Int(i) => Ok(i),
            _ => Err(CitrineError::UnexpectedResponse),
        }
    }

    /// Narrows to an optional payload; `Nil` reads as a missing value.
    pub fn into_blob(self) -> Result<Option<Bytes>, CitrineError> {
        match self {
            Value::Blob(data) => Ok(Some(data)),
            Value::Nil => Ok(None),
            _ => Err(CitrineError::UnexpectedResponse),
        }
    }

    /// Narrows to a list; an absent multibulk reads as an empty one.
    pub fn into_list(self) -> Result<Vec<Value>, CitrineError> {
        match self {
            Value::List(items) => Ok(items),
            Value::Nil => Ok(Vec::new()),
            _ => Err(CitrineError::UnexpectedResponse),
        }
    }

    pub fn into_map(self) -> Result<Vec<(String, String)>, CitrineError> {
        match self {
            Value::Map(pairs) => Ok(pairs),
            _ => Err(CitrineError::UnexpectedResponse),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => "(nil)".fmt(f),
            Value::Bool(b) => b.fmt(f),
            Value::Int(i) => i.fmt(f),
            Value::Status(s) => s.fmt(f),
            Value::Blob(data) => match std::str::from_utf8(data) {
                Ok(text) => text.fmt(f),
                Err(_) => write!(f, "{data:?}"),
            },
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    item.fmt(f)?;
                }
                Ok(())
            }
            Value::Map(pairs) => {
                for (i, (field, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{field}:{value}")?;
                }
                Ok(())
            }
        }
    }
}
