//! # RedPepper Typed Client
//!
//! Purpose: Expose the store's command set (strings, hashes, sets, lists,
//! sorted sets, key management) as strongly-typed per-command functions
//! over the RESP2 wire layer, with a uniform success / empty / failure
//! result convention.
//!
//! ## Design Principles
//! 1. **Facade Pattern**: One function per store command, each the same
//!    encode → dispatch → validate → map composition.
//! 2. **Declarative Catalog**: A static [`CommandSpec`] per command drives
//!    one shared validator per reply shape instead of per-command checks.
//! 3. **Strict Shapes**: Replies are never coerced across variants; every
//!    mismatch surfaces as a typed failure.
//! 4. **Tri-State Results**: `Ok(value)` / `Ok(None)` (or an empty
//!    collection) / `Err` — callers never inspect protocol internals.

mod client;
mod command;
mod error;
mod reply;
mod types;

pub use client::Client;
pub use command::{Command, CommandSpec};
pub use error::{ClientError, ClientResult};
pub use redpepper_wire::{ConnectionConfig, RespValue, WireError};
pub use reply::ReplyShape;
pub use types::{KeyValuePair, ScoredMember};
