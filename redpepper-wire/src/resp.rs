//! # RESP2 Encoding and Parsing
//!
//! Purpose: Encode request token sequences and parse server replies.
//!
//! Requests are always encoded as arrays of bulk strings
//! (`*<n>\r\n$<len>\r\n<token>\r\n...`), which keeps every token
//! length-prefixed and therefore binary-safe. Replies are parsed top-down
//! into [`RespValue`] with minimal state; the caller provides the line
//! buffer so repeated reads do not allocate.

use std::io::BufRead;

use bytes::{BufMut, BytesMut};

use crate::error::{WireError, WireResult};

/// One reply from the store, as a shape-tagged union.
///
/// Arrays are recursive in the protocol; the commands this crate serves only
/// ever produce depth-1 arrays of scalars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RespValue {
    /// `+...` status line, e.g. `+OK`.
    Simple(Vec<u8>),
    /// `-...` error reported by the store.
    Error(Vec<u8>),
    /// `:n` signed 64-bit integer.
    Integer(i64),
    /// `$n` bulk string; `None` is the nil reply (`$-1`).
    Bulk(Option<Vec<u8>>),
    /// `*n` array of nested replies.
    Array(Vec<RespValue>),
}

impl RespValue {
    /// Short variant name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            RespValue::Simple(_) => "simple string",
            RespValue::Error(_) => "error",
            RespValue::Integer(_) => "integer",
            RespValue::Bulk(None) => "nil",
            RespValue::Bulk(Some(_)) => "bulk string",
            RespValue::Array(_) => "array",
        }
    }

    /// True for the nil bulk reply.
    pub fn is_nil(&self) -> bool {
        matches!(self, RespValue::Bulk(None))
    }
}

/// Encodes a command (ordered token sequence, keyword first) into `out`.
pub fn encode_command(args: &[&[u8]], out: &mut BytesMut) {
    out.put_u8(b'*');
    put_len(out, args.len());
    out.put_slice(b"\r\n");
    for arg in args {
        out.put_u8(b'$');
        put_len(out, arg.len());
        out.put_slice(b"\r\n");
        out.put_slice(arg);
        out.put_slice(b"\r\n");
    }
}

/// Reads one reply from the buffered reader.
pub fn read_reply<R: BufRead>(reader: &mut R, line_buf: &mut Vec<u8>) -> WireResult<RespValue> {
    read_line(reader, line_buf)?;

    match line_buf.first() {
        Some(&b'+') => Ok(RespValue::Simple(line_buf[1..].to_vec())),
        Some(&b'-') => Ok(RespValue::Error(line_buf[1..].to_vec())),
        Some(&b':') => Ok(RespValue::Integer(parse_i64(&line_buf[1..])?)),
        Some(&b'$') => {
            let len = parse_i64(&line_buf[1..])?;
            read_bulk(reader, len, line_buf)
        }
        Some(&b'*') => {
            let len = parse_i64(&line_buf[1..])?;
            read_array(reader, len, line_buf)
        }
        _ => Err(WireError::Frame("unknown reply tag")),
    }
}

fn read_bulk<R: BufRead>(reader: &mut R, len: i64, line_buf: &mut Vec<u8>) -> WireResult<RespValue> {
    if len < 0 {
        return Ok(RespValue::Bulk(None));
    }

    let mut data = vec![0u8; len as usize];
    reader.read_exact(&mut data)?;

    let mut crlf = [0u8; 2];
    reader.read_exact(&mut crlf)?;
    if crlf != *b"\r\n" {
        return Err(WireError::Frame("bulk payload missing terminator"));
    }

    line_buf.clear();
    Ok(RespValue::Bulk(Some(data)))
}

fn read_array<R: BufRead>(reader: &mut R, len: i64, line_buf: &mut Vec<u8>) -> WireResult<RespValue> {
    if len <= 0 {
        return Ok(RespValue::Array(Vec::new()));
    }

    let mut items = Vec::with_capacity(len as usize);
    for _ in 0..len {
        items.push(read_reply(reader, line_buf)?);
    }
    Ok(RespValue::Array(items))
}

fn read_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> WireResult<()> {
    buf.clear();
    let read = reader.read_until(b'\n', buf)?;
    if read == 0 {
        return Err(WireError::Frame("connection closed mid-reply"));
    }
    if buf.len() < 2 || buf[buf.len() - 2] != b'\r' {
        return Err(WireError::Frame("line missing crlf terminator"));
    }
    buf.truncate(buf.len() - 2);
    Ok(())
}

fn parse_i64(digits: &[u8]) -> WireResult<i64> {
    let (negative, digits) = match digits.split_first() {
        Some((&b'-', rest)) => (true, rest),
        _ => (false, digits),
    };
    if digits.is_empty() {
        return Err(WireError::Frame("empty integer"));
    }

    let mut value: i64 = 0;
    for &b in digits {
        if !b.is_ascii_digit() {
            return Err(WireError::Frame("non-digit in integer"));
        }
        value = value.saturating_mul(10).saturating_add((b - b'0') as i64);
    }

    Ok(if negative { -value } else { value })
}

// Digits go into a small stack buffer first to keep encoding allocation-free.
fn put_len(out: &mut BytesMut, mut len: usize) {
    let mut digits = [0u8; 20];
    let mut n = 0;
    loop {
        digits[n] = b'0' + (len % 10) as u8;
        len /= 10;
        n += 1;
        if len == 0 {
            break;
        }
    }
    digits[..n].reverse();
    out.put_slice(&digits[..n]);
}
