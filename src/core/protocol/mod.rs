// src/core/protocol/mod.rs

pub mod request;
pub mod resp_reply;
pub mod value;

pub use request::{RequestEncoding, encode_request};
pub use resp_reply::{RespReply, RespReplyCodec, parse_reply};
pub use value::Value;
