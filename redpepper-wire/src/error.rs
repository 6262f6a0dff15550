//! Transport-level errors: connection lifecycle, socket I/O, and framing.

use thiserror::Error;

/// Result type for wire-level operations.
pub type WireResult<T> = Result<T, WireError>;

/// Errors raised by the transport.
///
/// Everything here is fatal to the call in flight; retry and reconnect
/// policy belongs to the caller.
#[derive(Debug, Error)]
pub enum WireError {
    /// No connection has been established.
    #[error("connection not established")]
    NotEstablished,

    /// The server address could not be parsed into a socket address.
    #[error("invalid server address: {0}")]
    InvalidAddress(String),

    /// Socket failure, including timeouts and mid-command drops.
    #[error("io failure: {0}")]
    Io(#[from] std::io::Error),

    /// The reply stream violated RESP2 framing.
    #[error("malformed frame: {0}")]
    Frame(&'static str),
}
