// src/core/protocol/resp_reply.rs

//! Implements the RESP reply structure and the corresponding `Encoder` and
//! `Decoder` for network communication.
//!
//! The decoder is the client-side half of the wire protocol: it turns the
//! server's byte stream into `RespReply` trees. The encoder half exists for
//! request bytes (already serialized by the command layer) and for whole
//! `RespReply` values, which test fixtures use to play the server's role.

use crate::core::CitrineError;
use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

/// The CRLF (Carriage Return, Line Feed) sequence used to terminate lines in RESP.
const CRLF: &[u8] = b"\r\n";
const CRLF_LEN: usize = 2;

// Protocol-level limits to prevent unbounded allocation from malformed frames.
const MAX_MULTIBULK_ELEMENTS: usize = 1_024 * 1_024;
const MAX_BULK_SIZE: usize = 512 * 1024 * 1024; // 512MB max bulk payload.

/// A single reply on the wire. Nil forms are represented as `None`:
/// a `$-1` bulk, a `*-1` multibulk, and the historical `nil` text that some
/// servers emit in place of a bulk length or an integer.
#[derive(Debug, Clone, PartialEq)]
pub enum RespReply {
    /// `+...` status line. The literal `OK` is lifted to a boolean at shaping
    /// time; the parser preserves the text.
    Status(String),
    /// `-...` error line, with a leading `ERR ` prefix already stripped.
    Error(String),
    /// `:...` integer line.
    Integer(Option<i64>),
    /// `$...` bulk payload.
    Bulk(Option<Bytes>),
    /// `*...` array of replies, in order.
    MultiBulk(Option<Vec<RespReply>>),
}

impl RespReply {
    /// A convenience method to encode a reply into a `Vec<u8>`.
    /// Test servers use this to produce canned wire responses.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>, CitrineError> {
        let mut buf = BytesMut::new();
        RespReplyCodec.encode(self.clone(), &mut buf)?;
        Ok(buf.to_vec())
    }
}

/// A `tokio_util::codec` implementation for the client side of the protocol:
/// decodes `RespReply`s off the stream, encodes request bytes onto it.
#[derive(Debug)]
pub struct RespReplyCodec;

impl Decoder for RespReplyCodec {
    type Item = RespReply;
    type Error = CitrineError;

    /// Decodes a `RespReply` from a `BytesMut` buffer.
    ///
    /// It returns `Ok(None)` if the buffer does not contain a full reply yet,
    /// allowing the `Framed` stream to wait for more data from the network.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match parse_reply(src) {
            Ok((reply, len)) => {
                // Advance the buffer past the successfully parsed reply.
                src.advance(len);
                Ok(Some(reply))
            }
            // If the data is incomplete, wait for more data.
            Err(CitrineError::IncompleteData) => Ok(None),
            // For other errors, propagate them up to the transport.
            Err(e) => Err(e),
        }
    }
}

/// Requests are serialized by the command layer; the encoder just moves the
/// finished bytes into the outgoing buffer.
impl Encoder<Bytes> for RespReplyCodec {
    type Error = CitrineError;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.extend_from_slice(&item);
        Ok(())
    }
}

/// Encodes a whole `RespReply`. The client never sends these; mock servers in
/// the test suite do, and the parser round-trip property is checked against
/// this encoding.
impl Encoder<RespReply> for RespReplyCodec {
    type Error = CitrineError;

    fn encode(&mut self, item: RespReply, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            RespReply::Status(s) => {
                dst.extend_from_slice(b"+");
                dst.extend_from_slice(s.as_bytes());
                dst.extend_from_slice(CRLF);
            }
            RespReply::Error(s) => {
                dst.extend_from_slice(b"-");
                dst.extend_from_slice(s.as_bytes());
                dst.extend_from_slice(CRLF);
            }
            RespReply::Integer(Some(i)) => {
                dst.extend_from_slice(b":");
                dst.extend_from_slice(i.to_string().as_bytes());
                dst.extend_from_slice(CRLF);
            }
            RespReply::Integer(None) => {
                dst.extend_from_slice(b":nil\r\n");
            }
            RespReply::Bulk(Some(b)) => {
                dst.extend_from_slice(b"$");
                dst.extend_from_slice(b.len().to_string().as_bytes());
                dst.extend_from_slice(CRLF);
                dst.extend_from_slice(&b);
                dst.extend_from_slice(CRLF);
            }
            RespReply::Bulk(None) => {
                dst.extend_from_slice(b"$-1\r\n");
            }
            RespReply::MultiBulk(Some(items)) => {
                dst.extend_from_slice(b"*");
                dst.extend_from_slice(items.len().to_string().as_bytes());
                dst.extend_from_slice(CRLF);
                for reply in items {
                    // Recursively encode each element of the array.
                    self.encode(reply, dst)?;
                }
            }
            RespReply::MultiBulk(None) => {
                dst.extend_from_slice(b"*-1\r\n");
            }
        }
        Ok(())
    }
}

/// The main parsing entry point. It inspects the first byte (the type prefix)
/// and dispatches to the appropriate parsing function.
pub fn parse_reply(src: &[u8]) -> Result<(RespReply, usize), CitrineError> {
    if src.is_empty() {
        return Err(CitrineError::IncompleteData);
    }
    match src[0] {
        b'+' => parse_status(src),
        b'-' => parse_error(src),
        b':' => parse_integer(src),
        b'$' => parse_bulk(src),
        b'*' => parse_multibulk(src),
        other => Err(CitrineError::MalformedResponse(format!(
            "invalid reply type byte `{}`",
            other as char
        ))),
    }
}

/// Helper function to find the next CRLF sequence in a buffer.
fn find_crlf(src: &[u8]) -> Option<usize> {
    src.windows(CRLF_LEN).position(|window| window == CRLF)
}

/// Parses a single line (up to CRLF) from a buffer.
fn parse_line(src: &[u8]) -> Result<(&[u8], usize), CitrineError> {
    find_crlf(src)
        .map(|pos| (&src[..pos], pos + CRLF_LEN))
        .ok_or(CitrineError::IncompleteData)
}

/// Parses a status line (e.g., `+OK\r\n`).
fn parse_status(src: &[u8]) -> Result<(RespReply, usize), CitrineError> {
    let (line, len) = parse_line(&src[1..])?;
    Ok((
        RespReply::Status(String::from_utf8_lossy(line).to_string()),
        len + 1,
    ))
}

/// Parses an error line (e.g., `-ERR message\r\n`). The conventional `ERR `
/// prefix is stripped when present; other prefixes (`WRONGTYPE`, ...) are
/// part of the message and survive intact.
fn parse_error(src: &[u8]) -> Result<(RespReply, usize), CitrineError> {
    let (line, len) = parse_line(&src[1..])?;
    let message = String::from_utf8_lossy(line);
    let message = message.strip_prefix("ERR ").unwrap_or(&message);
    Ok((RespReply::Error(message.to_string()), len + 1))
}

/// Parses an integer line (e.g., `:1000\r\n`). Some historical servers send
/// the literal text `nil` where an integer would go; that maps to absent.
fn parse_integer(src: &[u8]) -> Result<(RespReply, usize), CitrineError> {
    let (line, len) = parse_line(&src[1..])?;
    if line == b"nil" {
        return Ok((RespReply::Integer(None), len + 1));
    }
    let s = String::from_utf8_lossy(line);
    let i = s.parse::<i64>().map_err(|_| {
        CitrineError::MalformedResponse(format!("invalid integer reply `{s}`"))
    })?;
    Ok((RespReply::Integer(Some(i)), len + 1))
}

/// Parses a bulk reply (e.g., `$5\r\nhello\r\n`).
fn parse_bulk(src: &[u8]) -> Result<(RespReply, usize), CitrineError> {
    let (line, len_of_line) = parse_line(&src[1..])?;
    // `$-1` and the historical `$nil` both mean an absent value.
    if line == b"nil" {
        return Ok((RespReply::Bulk(None), len_of_line + 1));
    }
    let s = String::from_utf8_lossy(line);
    let payload_len = s.parse::<isize>().map_err(|_| {
        CitrineError::MalformedResponse(format!("invalid bulk length `{s}`"))
    })?;

    if payload_len < 0 {
        return Ok((RespReply::Bulk(None), len_of_line + 1));
    }

    let payload_len = payload_len as usize;
    if payload_len > MAX_BULK_SIZE {
        return Err(CitrineError::MalformedResponse(format!(
            "bulk length {payload_len} exceeds limit"
        )));
    }

    let total_len_prefix = len_of_line + 1;
    // Check that the whole payload plus its trailing CRLF is in the buffer.
    if src.len() < total_len_prefix + payload_len + CRLF_LEN {
        return Err(CitrineError::IncompleteData);
    }

    // Validate the trailing CRLF.
    if &src[total_len_prefix + payload_len..total_len_prefix + payload_len + CRLF_LEN] != CRLF {
        return Err(CitrineError::MalformedResponse(
            "bulk payload not terminated by CRLF".into(),
        ));
    }

    let data = Bytes::copy_from_slice(&src[total_len_prefix..total_len_prefix + payload_len]);
    Ok((
        RespReply::Bulk(Some(data)),
        total_len_prefix + payload_len + CRLF_LEN,
    ))
}

/// Parses a multibulk reply (e.g., `*2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n`).
fn parse_multibulk(src: &[u8]) -> Result<(RespReply, usize), CitrineError> {
    let (line, len_of_line) = parse_line(&src[1..])?;
    let s = String::from_utf8_lossy(line);
    let count = s.parse::<isize>().map_err(|_| {
        CitrineError::MalformedResponse(format!("invalid multibulk length `{s}`"))
    })?;

    if count < 0 {
        return Ok((RespReply::MultiBulk(None), len_of_line + 1));
    }

    let count = count as usize;
    if count > MAX_MULTIBULK_ELEMENTS {
        return Err(CitrineError::MalformedResponse(format!(
            "multibulk length {count} exceeds limit"
        )));
    }

    let mut replies = Vec::with_capacity(count);
    let mut cursor = len_of_line + 1;

    // Recursively parse each element of the array, preserving order.
    for _ in 0..count {
        let (reply, reply_len) = parse_reply(&src[cursor..])?;
        replies.push(reply);
        cursor += reply_len;
    }

    Ok((RespReply::MultiBulk(Some(replies)), cursor))
}
