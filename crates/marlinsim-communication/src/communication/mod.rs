//! Line-oriented transports
//!
//! The simulated firmware talks to its host over a newline-terminated text
//! link. Every transport implements `LineTransport`:
//! - Serial/USB (`SerialTransport`)
//! - Any reader/writer pair, including stdin/stdout (`StreamTransport`)
//! - In-memory scripted input for tests (`MemoryTransport`)

pub mod memory;
pub mod serial;
pub mod stream;

pub use memory::{MemoryTransport, OutputLog};
pub use serial::{find_host_port, list_ports, SerialParams, SerialPortInfo, SerialTransport};
pub use stream::{StdioTransport, StreamTransport};

use marlinsim_core::Result;

/// Write side of a line transport
///
/// Writes are fire-and-forget from the firmware's point of view: a failed
/// write surfaces as an error but nothing is retried.
pub trait LineSink {
    /// Send one line; the transport appends the `\n` terminator
    fn send_line(&mut self, line: &str) -> Result<()>;
}

/// Bidirectional line transport
pub trait LineTransport: LineSink + Send {
    /// Read one complete line without its terminator
    ///
    /// Returns `Ok(None)` when no complete line is available yet.
    fn read_line(&mut self) -> Result<Option<String>>;

    /// Whether more input can still arrive
    fn is_open(&self) -> bool {
        true
    }

    /// Human-readable transport name for logging
    fn name(&self) -> String;
}

impl<T: LineSink + ?Sized> LineSink for Box<T> {
    fn send_line(&mut self, line: &str) -> Result<()> {
        (**self).send_line(line)
    }
}

/// Accumulates raw bytes and yields complete lines
///
/// Partial data stays buffered until its newline arrives. A trailing `\r` is
/// dropped so CRLF hosts look the same as LF hosts.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append received bytes
    pub fn push(&mut self, data: &[u8]) {
        self.pending.extend_from_slice(data);
    }

    /// Take the next complete line, if any
    ///
    /// Lines are decoded only once complete, so a character split across
    /// reads survives. Invalid UTF-8 is replaced rather than rejected.
    pub fn next_line(&mut self) -> Option<String> {
        let idx = self.pending.iter().position(|&b| b == b'\n')?;
        let mut raw: Vec<u8> = self.pending.drain(..=idx).collect();
        raw.pop();
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }
        Some(String::from_utf8_lossy(&raw).into_owned())
    }
}
