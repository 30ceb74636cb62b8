//! In-memory transport
//!
//! Feeds scripted host lines to the firmware and records every line it
//! writes back. The output log is shared so a test can keep a handle after
//! the transport has been moved into a session.

use super::{LineSink, LineTransport};
use marlinsim_core::Result;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Shared, append-only record of written lines
#[derive(Debug, Clone, Default)]
pub struct OutputLog {
    lines: Arc<Mutex<Vec<String>>>,
}

impl OutputLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }

    /// Snapshot of every line written so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Count lines exactly equal to `line`
    pub fn count(&self, line: &str) -> usize {
        self.lines.lock().iter().filter(|l| *l == line).count()
    }
}

/// Scripted transport for tests and demos
#[derive(Debug, Default)]
pub struct MemoryTransport {
    input: VecDeque<String>,
    output: OutputLog,
}

impl MemoryTransport {
    /// Create a transport that will deliver `lines` in order
    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            output: OutputLog::new(),
        }
    }

    /// Handle to the written lines
    pub fn output(&self) -> OutputLog {
        self.output.clone()
    }
}

impl LineSink for MemoryTransport {
    fn send_line(&mut self, line: &str) -> Result<()> {
        self.output.push(line);
        Ok(())
    }
}

impl LineTransport for MemoryTransport {
    fn read_line(&mut self) -> Result<Option<String>> {
        Ok(self.input.pop_front())
    }

    fn is_open(&self) -> bool {
        !self.input.is_empty()
    }

    fn name(&self) -> String {
        "memory".to_string()
    }
}

impl LineSink for OutputLog {
    fn send_line(&mut self, line: &str) -> Result<()> {
        self.push(line);
        Ok(())
    }
}
