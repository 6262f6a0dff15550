//! # Blocking Connection
//!
//! Purpose: Own one TCP connection to the store and expose the single
//! operation the typed layer consumes: dispatch one command, return one
//! reply by value.
//!
//! There is no pooling, no retry, and no background work here; one command
//! is in flight per connection at a time and the calling thread blocks
//! until the reply has been read.

use std::io::{BufReader, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use bytes::BytesMut;
use tracing::trace;

use crate::error::{WireError, WireResult};
use crate::resp::{encode_command, read_reply, RespValue};

/// Connection settings for the blocking transport.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Server address, e.g. "127.0.0.1:6379".
    pub addr: String,
    /// Optional TCP read timeout.
    pub read_timeout: Option<Duration>,
    /// Optional TCP write timeout.
    pub write_timeout: Option<Duration>,
    /// Optional TCP connect timeout.
    pub connect_timeout: Option<Duration>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        ConnectionConfig {
            addr: "127.0.0.1:6379".to_string(),
            read_timeout: None,
            write_timeout: None,
            connect_timeout: None,
        }
    }
}

/// Single blocking TCP connection with reusable buffers.
pub struct Connection {
    // Buffered reader reduces syscalls while still allowing direct writes.
    reader: BufReader<TcpStream>,
    line_buf: Vec<u8>,
    write_buf: BytesMut,
}

impl Connection {
    /// Establishes a TCP connection using the provided configuration.
    pub fn connect(config: &ConnectionConfig) -> WireResult<Self> {
        let stream = connect_stream(config)?;
        if let Some(timeout) = config.read_timeout {
            stream.set_read_timeout(Some(timeout))?;
        }
        if let Some(timeout) = config.write_timeout {
            stream.set_write_timeout(Some(timeout))?;
        }
        // Request/reply frames are small; Nagle only adds latency.
        stream.set_nodelay(true)?;
        trace!(addr = %config.addr, "connection established");

        Ok(Connection {
            reader: BufReader::new(stream),
            line_buf: Vec::with_capacity(128),
            write_buf: BytesMut::with_capacity(256),
        })
    }

    /// Sends one command (ordered token sequence, keyword first) and reads
    /// one reply.
    pub fn dispatch(&mut self, args: &[&[u8]]) -> WireResult<RespValue> {
        self.write_buf.clear();
        encode_command(args, &mut self.write_buf);

        if let Some(name) = args.first() {
            trace!(
                command = %String::from_utf8_lossy(name),
                argc = args.len(),
                "dispatching command"
            );
        }

        let stream = self.reader.get_mut();
        stream.write_all(&self.write_buf)?;
        stream.flush()?;

        read_reply(&mut self.reader, &mut self.line_buf)
    }
}

fn connect_stream(config: &ConnectionConfig) -> WireResult<TcpStream> {
    let addr: SocketAddr = config
        .addr
        .parse()
        .map_err(|_| WireError::InvalidAddress(config.addr.clone()))?;
    let stream = match config.connect_timeout {
        Some(timeout) => TcpStream::connect_timeout(&addr, timeout)?,
        None => TcpStream::connect(addr)?,
    };
    Ok(stream)
}
