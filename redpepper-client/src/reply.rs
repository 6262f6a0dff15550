//! # Reply Validation and Result Mapping
//!
//! Purpose: Check an untyped reply against the shape a command is
//! documented to return, then project it into the typed result.
//!
//! One entry point per shape serves every command of that shape; commands
//! never carry their own validation code. Each entry point applies the same
//! rule ladder: a store error reply wins first, then the concrete variant
//! must match the expected shape exactly — an integer-shaped command never
//! accepts a string reply, and a paired array must have even length.

use std::fmt;

use redpepper_wire::RespValue;

use crate::error::{ClientError, ClientResult};
use crate::types::KeyValuePair;

/// Expected reply shape classes, one per command family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyShape {
    /// `+OK` status line.
    Status,
    /// Signed 64-bit integer: counts, lengths, increments, 0/1 verdicts.
    Integer,
    /// Bulk string that is nil when the key or field is absent.
    Bulk,
    /// Flat array of bulk strings, possibly with nil placeholders.
    Array,
    /// Flat array of alternating key/value elements.
    PairArray,
}

impl fmt::Display for ReplyShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReplyShape::Status => "status",
            ReplyShape::Integer => "integer",
            ReplyShape::Bulk => "bulk string",
            ReplyShape::Array => "array",
            ReplyShape::PairArray => "pair array",
        };
        f.write_str(name)
    }
}

/// Maps a status reply. Success is `true` exactly when the payload is the
/// literal `OK`; any other status payload is success-false, not an error.
pub(crate) fn expect_status(reply: RespValue) -> ClientResult<bool> {
    match checked(reply)? {
        RespValue::Simple(payload) => Ok(payload == b"OK"),
        other => Err(mismatch(ReplyShape::Status, &other)),
    }
}

/// Maps an integer reply unmodified. Zero is a success value — for mutation
/// commands it means "nothing changed", which callers distinguish from
/// ">0 changed" themselves.
pub(crate) fn expect_integer(reply: RespValue) -> ClientResult<i64> {
    match checked(reply)? {
        RespValue::Integer(value) => Ok(value),
        other => Err(mismatch(ReplyShape::Integer, &other)),
    }
}

/// Maps a 0/1 integer verdict (`setnx`, `sismember`, ...) to a boolean.
/// These replies are flags, not counts; anything outside 0/1 violates the
/// command's contract.
pub(crate) fn expect_flag(reply: RespValue) -> ClientResult<bool> {
    match expect_integer(reply)? {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(ClientError::UnexpectedShape {
            expected: ReplyShape::Integer,
            actual: "out-of-range integer",
        }),
    }
}

/// Maps a bulk-or-nil reply. Nil means the key or field is absent and maps
/// to `None`; a present zero-length value maps to `Some(vec![])`.
pub(crate) fn expect_bulk(reply: RespValue) -> ClientResult<Option<Vec<u8>>> {
    match checked(reply)? {
        RespValue::Bulk(data) => Ok(data),
        other => Err(mismatch(ReplyShape::Bulk, &other)),
    }
}

/// Maps an array-of-strings reply, preserving element order. An empty array
/// is a valid success, not an error.
pub(crate) fn expect_strings(reply: RespValue) -> ClientResult<Vec<Vec<u8>>> {
    match checked(reply)? {
        RespValue::Array(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(element_bytes(item, ReplyShape::Array)?);
            }
            Ok(values)
        }
        other => Err(mismatch(ReplyShape::Array, &other)),
    }
}

/// Maps a paired-array reply into `(element[2i], element[2i+1])` records.
/// An odd-length array is a contract violation, never a truncated result.
pub(crate) fn expect_pairs(reply: RespValue) -> ClientResult<Vec<KeyValuePair>> {
    match checked(reply)? {
        RespValue::Array(items) => {
            if items.len() % 2 != 0 {
                return Err(ClientError::UnexpectedShape {
                    expected: ReplyShape::PairArray,
                    actual: "odd-length array",
                });
            }
            let mut pairs = Vec::with_capacity(items.len() / 2);
            let mut elements = items.into_iter();
            while let (Some(key), Some(value)) = (elements.next(), elements.next()) {
                pairs.push(KeyValuePair {
                    key: element_bytes(key, ReplyShape::PairArray)?,
                    value: element_bytes(value, ReplyShape::PairArray)?,
                });
            }
            Ok(pairs)
        }
        other => Err(mismatch(ReplyShape::PairArray, &other)),
    }
}

/// Maps a ping-style reply, which comes back as `+PONG` or as a bulk echo
/// of the payload.
pub(crate) fn expect_text(reply: RespValue) -> ClientResult<Vec<u8>> {
    match checked(reply)? {
        RespValue::Simple(text) => Ok(text),
        RespValue::Bulk(Some(data)) => Ok(data),
        other => Err(mismatch(ReplyShape::Status, &other)),
    }
}

// A store error reply outranks every shape rule.
fn checked(reply: RespValue) -> ClientResult<RespValue> {
    match reply {
        RespValue::Error(message) => {
            Err(ClientError::Store(String::from_utf8_lossy(&message).into_owned()))
        }
        other => Ok(other),
    }
}

// Absent fields come back as nil elements inside an array reply; they
// surface as empty strings at their position, not as shape errors.
fn element_bytes(item: RespValue, shape: ReplyShape) -> ClientResult<Vec<u8>> {
    match item {
        RespValue::Bulk(Some(data)) => Ok(data),
        RespValue::Bulk(None) => Ok(Vec::new()),
        other => Err(mismatch(shape, &other)),
    }
}

fn mismatch(expected: ReplyShape, actual: &RespValue) -> ClientError {
    ClientError::UnexpectedShape {
        expected,
        actual: actual.kind(),
    }
}
