// src/core/protocol/request.rs

//! Serializes client requests into the three wire encodings.
//!
//! Inline and bulk requests have no length framing for their leading
//! arguments, so those arguments must be free of whitespace and newlines;
//! the serializer rejects violations before any bytes reach the socket.
//! Multi-bulk frames every argument and is 8-bit clean throughout.

use crate::core::CitrineError;
use bytes::{Bytes, BytesMut};

const CRLF: &[u8] = b"\r\n";

/// The request encoding a command uses on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestEncoding {
    /// `VERB arg1 arg2\r\n` - no framing, arguments must be plain tokens.
    Inline,
    /// Like inline, but the final argument is sent as a length-prefixed
    /// binary payload: `VERB arg1 LEN\r\npayload\r\n`.
    Bulk,
    /// `*<N+1>\r\n` followed by N+1 length-prefixed bulks, the verb first.
    MultiBulk,
}

/// Serializes one request frame into `dst`.
pub fn encode_request(
    verb: &str,
    args: &[Bytes],
    encoding: RequestEncoding,
    dst: &mut BytesMut,
) -> Result<(), CitrineError> {
    match encoding {
        RequestEncoding::Inline => encode_inline(verb, args, dst),
        RequestEncoding::Bulk => encode_bulk(verb, args, dst),
        RequestEncoding::MultiBulk => {
            encode_multibulk(verb, args, dst);
            Ok(())
        }
    }
}

fn encode_inline(verb: &str, args: &[Bytes], dst: &mut BytesMut) -> Result<(), CitrineError> {
    dst.extend_from_slice(verb.as_bytes());
    for arg in args {
        check_unframed(verb, arg)?;
        dst.extend_from_slice(b" ");
        dst.extend_from_slice(arg);
    }
    dst.extend_from_slice(CRLF);
    Ok(())
}

fn encode_bulk(verb: &str, args: &[Bytes], dst: &mut BytesMut) -> Result<(), CitrineError> {
    // The payload is the final argument; a bulk request without one is a
    // catalog mistake surfaced as a client error.
    let (payload, head) = args
        .split_last()
        .ok_or_else(|| CitrineError::WrongArgumentCount(verb.to_string()))?;

    dst.extend_from_slice(verb.as_bytes());
    for arg in head {
        check_unframed(verb, arg)?;
        dst.extend_from_slice(b" ");
        dst.extend_from_slice(arg);
    }
    dst.extend_from_slice(b" ");
    dst.extend_from_slice(payload.len().to_string().as_bytes());
    dst.extend_from_slice(CRLF);
    dst.extend_from_slice(payload);
    dst.extend_from_slice(CRLF);
    Ok(())
}

fn encode_multibulk(verb: &str, args: &[Bytes], dst: &mut BytesMut) {
    // The verb itself counts, hence N+1.
    dst.extend_from_slice(b"*");
    dst.extend_from_slice((args.len() + 1).to_string().as_bytes());
    dst.extend_from_slice(CRLF);
    write_framed(verb.as_bytes(), dst);
    for arg in args {
        write_framed(arg, dst);
    }
}

fn write_framed(data: &[u8], dst: &mut BytesMut) {
    dst.extend_from_slice(b"$");
    dst.extend_from_slice(data.len().to_string().as_bytes());
    dst.extend_from_slice(CRLF);
    dst.extend_from_slice(data);
    dst.extend_from_slice(CRLF);
}

/// Unframed arguments share the request line with the verb; whitespace or a
/// newline inside one would desynchronize the stream.
fn check_unframed(verb: &str, arg: &[u8]) -> Result<(), CitrineError> {
    if arg
        .iter()
        .any(|&b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
    {
        return Err(CitrineError::InvalidArgument(format!(
            "argument for '{verb}' contains whitespace; this command cannot frame it"
        )));
    }
    Ok(())
}
