//! # RedPepper Wire Layer
//!
//! Purpose: Provide the RESP2 transport consumed by the typed client — the
//! reply value union, the request/reply frame codec, and a blocking TCP
//! connection that dispatches one command at a time.
//!
//! ## Design Principles
//! 1. **By-Value Replies**: Every dispatch returns an owned [`RespValue`];
//!    no reply buffer is shared between calls.
//! 2. **Binary-Safe Framing**: Request tokens are length-prefixed bulk
//!    strings, so keys and values may contain any bytes.
//! 3. **Minimal Allocation**: Connections reuse their line and write buffers.
//! 4. **Fail Fast**: Invalid framing surfaces immediately as [`WireError`].

mod conn;
mod error;
mod resp;

pub use conn::{Connection, ConnectionConfig};
pub use error::{WireError, WireResult};
pub use resp::{encode_command, read_reply, RespValue};
