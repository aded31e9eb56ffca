// src/core/commands/filters.rs

//! Argument filters: pure transforms of a command's raw argument list,
//! applied when the command is resolved.

use crate::core::CitrineError;
use bytes::Bytes;

/// SORT accepts its options in any order but the server is picky about the
/// suffix layout. The filter walks the given tokens and rewrites them into
/// the fixed order `[BY pat] [GET pat]... [LIMIT off cnt] [ASC|DESC]
/// [ALPHA] [STORE dst]` after the key.
pub fn sort_filter(args: Vec<Bytes>) -> Result<Vec<Bytes>, CitrineError> {
    if args.is_empty() {
        return Err(CitrineError::WrongArgumentCount("SORT".to_string()));
    }

    let mut by_pattern: Option<Bytes> = None;
    let mut get_patterns: Vec<Bytes> = Vec::new();
    let mut limit: Option<(Bytes, Bytes)> = None;
    let mut order: Option<Bytes> = None;
    let mut alpha = false;
    let mut store: Option<Bytes> = None;

    let mut i = 1;
    while i < args.len() {
        let option = String::from_utf8_lossy(&args[i]).to_ascii_lowercase();
        match option.as_str() {
            "by" => {
                i += 1;
                by_pattern = Some(take_operand(&args, i, "SORT")?);
            }
            "get" => {
                i += 1;
                get_patterns.push(take_operand(&args, i, "SORT")?);
            }
            "limit" => {
                let offset = take_operand(&args, i + 1, "SORT")?;
                let count = take_operand(&args, i + 2, "SORT")?;
                limit = Some((offset, count));
                i += 2;
            }
            "asc" | "desc" => {
                order = Some(Bytes::copy_from_slice(option.to_ascii_uppercase().as_bytes()));
            }
            "alpha" => alpha = true,
            "store" => {
                i += 1;
                store = Some(take_operand(&args, i, "SORT")?);
            }
            other => {
                return Err(CitrineError::InvalidArgument(format!(
                    "unknown SORT option '{other}'"
                )));
            }
        }
        i += 1;
    }

    let mut out = Vec::with_capacity(args.len());
    out.push(args[0].clone());
    if let Some(pattern) = by_pattern {
        out.push(Bytes::from_static(b"BY"));
        out.push(pattern);
    }
    for pattern in get_patterns {
        out.push(Bytes::from_static(b"GET"));
        out.push(pattern);
    }
    if let Some((offset, count)) = limit {
        out.push(Bytes::from_static(b"LIMIT"));
        out.push(offset);
        out.push(count);
    }
    if let Some(order) = order {
        out.push(order);
    }
    if alpha {
        out.push(Bytes::from_static(b"ALPHA"));
    }
    if let Some(destination) = store {
        out.push(Bytes::from_static(b"STORE"));
        out.push(destination);
    }
    Ok(out)
}

/// SLAVEOF with no arguments turns replication off: the wire form is the
/// literal `NO ONE`.
pub fn slaveof_filter(args: Vec<Bytes>) -> Result<Vec<Bytes>, CitrineError> {
    if args.is_empty() {
        Ok(vec![Bytes::from_static(b"NO"), Bytes::from_static(b"ONE")])
    } else {
        Ok(args)
    }
}

fn take_operand(args: &[Bytes], index: usize, verb: &str) -> Result<Bytes, CitrineError> {
    args.get(index)
        .cloned()
        .ok_or_else(|| CitrineError::WrongArgumentCount(verb.to_string()))
}
