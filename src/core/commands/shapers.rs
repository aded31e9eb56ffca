// src/core/commands/shapers.rs

//! Response shapers: pure functions from a wire reply to the logical value
//! a command returns.
//!
//! Server `-` replies never reach a shaper; the transport converts them to
//! errors first.

use crate::core::CitrineError;
use crate::core::protocol::{RespReply, Value};
use bytes::Bytes;

/// The default shaper: the canonical structural conversion, with `+OK`
/// lifted to `true` and nil forms to `Nil`.
pub fn shape_value(reply: RespReply) -> Result<Value, CitrineError> {
    Ok(Value::from_reply(reply))
}

/// Integer-to-boolean coercion for commands that answer a yes/no question
/// with a count (EXISTS, DEL, SETNX, EXPIRE, SADD, ...). Any non-zero
/// integer reads as true, so deleting several keys still reads as success.
pub fn shape_bool(reply: RespReply) -> Result<Value, CitrineError> {
    match reply {
        RespReply::Integer(Some(n)) => Ok(Value::Bool(n != 0)),
        other => Ok(Value::from_reply(other)),
    }
}

/// PING: true iff the server answered `PONG`.
pub fn shape_pong(reply: RespReply) -> Result<Value, CitrineError> {
    let pong = match &reply {
        RespReply::Status(s) => s == "PONG",
        RespReply::Bulk(Some(data)) => data.as_ref() == b"PONG",
        _ => false,
    };
    Ok(Value::Bool(pong))
}

/// KEYS: a list of key names.
///
/// The protocol's actual reply shape is a multibulk of keys; historical
/// servers answered with one space-separated bulk string instead. Both are
/// accepted, and an empty reply of either shape yields an empty list.
pub fn shape_keys(reply: RespReply) -> Result<Value, CitrineError> {
    match reply {
        RespReply::Bulk(Some(data)) => {
            let keys = data
                .split(|b| *b == b' ')
                .filter(|segment| !segment.is_empty())
                .map(|segment| Value::Blob(Bytes::copy_from_slice(segment)))
                .collect();
            Ok(Value::List(keys))
        }
        RespReply::Bulk(None) | RespReply::MultiBulk(None) => Ok(Value::List(Vec::new())),
        RespReply::MultiBulk(Some(items)) => {
            Ok(Value::List(items.into_iter().map(Value::from_reply).collect()))
        }
        _ => Err(CitrineError::UnexpectedResponse),
    }
}

/// RANDOMKEY: an empty or absent reply means the database has no keys.
pub fn shape_randomkey(reply: RespReply) -> Result<Value, CitrineError> {
    match reply {
        RespReply::Status(s) if s.is_empty() => Ok(Value::Nil),
        RespReply::Status(s) => Ok(Value::Blob(Bytes::from(s))),
        RespReply::Bulk(Some(data)) if data.is_empty() => Ok(Value::Nil),
        RespReply::Bulk(Some(data)) => Ok(Value::Blob(data)),
        RespReply::Bulk(None) => Ok(Value::Nil),
        _ => Err(CitrineError::UnexpectedResponse),
    }
}

/// INFO: the server's report, split on CRLF and then on the first colon of
/// each non-empty line, preserving the server's ordering.
pub fn shape_info(reply: RespReply) -> Result<Value, CitrineError> {
    let data = match reply {
        RespReply::Bulk(Some(data)) => data,
        RespReply::Bulk(None) => return Ok(Value::Map(Vec::new())),
        _ => return Err(CitrineError::UnexpectedResponse),
    };
    let text = String::from_utf8_lossy(&data);
    let mut pairs = Vec::new();
    for line in text.split("\r\n") {
        if line.is_empty() {
            continue;
        }
        if let Some((field, value)) = line.split_once(':') {
            pairs.push((field.to_string(), value.to_string()));
        }
    }
    Ok(Value::Map(pairs))
}
