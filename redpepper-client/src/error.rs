//! Typed-layer error taxonomy.
//!
//! Every failure is surfaced to the immediate caller as part of the result;
//! this layer never logs, retries, or swallows an error.

use redpepper_wire::WireError;
use thiserror::Error;

use crate::reply::ReplyShape;

/// Result type for typed client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by the typed command layer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport handle missing, or the transport failed mid-command.
    /// Fatal to the call; reconnection policy belongs to the caller.
    #[error("not connected: {0}")]
    NotConnected(#[from] WireError),

    /// The store itself returned an error reply, surfaced verbatim.
    #[error("store error: {0}")]
    Store(String),

    /// Reply variant or pair arity did not match the command's contract.
    /// Indicates a protocol/version mismatch or a client bug; never coerced.
    #[error("unexpected {actual} reply, expected {expected}")]
    UnexpectedShape {
        expected: ReplyShape,
        actual: &'static str,
    },

    /// Caller supplied an odd-length interleaved batch; nothing was sent.
    #[error("malformed batch input: {0}")]
    MalformedBatch(&'static str),
}
