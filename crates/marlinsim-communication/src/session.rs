//! Host session loop
//!
//! Reads lines from a transport, drops host log lines, hands everything else
//! to the firmware and writes back any non-empty response. Runs until the
//! cancel token fires or the transport reports end of input.

use crate::communication::LineTransport;
use crate::firmware::Firmware;
use marlinsim_core::{CancelToken, Error, Result};
use std::time::Duration;

/// Session loop settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Lines starting with this prefix are host log output, not commands
    pub ignore_prefix: String,
    /// Sleep between reads while the link is idle
    pub poll_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ignore_prefix: "[".to_string(),
            poll_interval: Duration::from_millis(10),
        }
    }
}

/// Why a session stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The cancel token fired
    Cancelled,
    /// The transport will deliver no more lines
    EndOfInput,
}

/// Counters reported when a session ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub lines_received: u64,
    pub lines_ignored: u64,
    pub responses_sent: u64,
    pub end: SessionEnd,
}

/// One transport driving one firmware
pub struct Session {
    transport: Box<dyn LineTransport>,
    firmware: Box<dyn Firmware>,
    config: SessionConfig,
    cancel: CancelToken,
    lines_received: u64,
    lines_ignored: u64,
    responses_sent: u64,
}

impl Session {
    pub fn new(
        transport: Box<dyn LineTransport>,
        firmware: Box<dyn Firmware>,
        config: SessionConfig,
    ) -> Self {
        Self {
            transport,
            firmware,
            config,
            cancel: CancelToken::new(),
            lines_received: 0,
            lines_ignored: 0,
            responses_sent: 0,
        }
    }

    /// Stop the loop when `cancel` fires; share it with the firmware too so
    /// busy sequences stop early
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run until cancelled or out of input
    pub fn run(&mut self) -> Result<SessionSummary> {
        tracing::info!(
            "{} simulator listening on {}",
            self.firmware.name(),
            self.transport.name()
        );

        let end = loop {
            if self.cancel.is_cancelled() {
                break SessionEnd::Cancelled;
            }

            match self.transport.read_line()? {
                Some(line) => match self.handle_line(&line) {
                    Ok(()) => {}
                    Err(Error::Cancelled) => break SessionEnd::Cancelled,
                    Err(e) => return Err(e),
                },
                None if !self.transport.is_open() => break SessionEnd::EndOfInput,
                None => std::thread::sleep(self.config.poll_interval),
            }
        };

        let summary = self.summary(end);
        tracing::info!(
            "Session ended ({:?}): {} lines received, {} ignored, {} responses",
            summary.end,
            summary.lines_received,
            summary.lines_ignored,
            summary.responses_sent
        );
        Ok(summary)
    }

    /// Process one raw received line
    pub fn handle_line(&mut self, raw: &str) -> Result<()> {
        let line = raw.trim();
        self.lines_received += 1;
        tracing::info!("<< {}", line);

        if !self.config.ignore_prefix.is_empty() && line.starts_with(&self.config.ignore_prefix) {
            self.lines_ignored += 1;
            return Ok(());
        }

        let response = self.firmware.process_line(line, &mut self.transport)?;
        if !response.is_empty() {
            self.transport.send_line(&response)?;
            self.responses_sent += 1;
        }
        Ok(())
    }

    fn summary(&self, end: SessionEnd) -> SessionSummary {
        SessionSummary {
            lines_received: self.lines_received,
            lines_ignored: self.lines_ignored,
            responses_sent: self.responses_sent,
            end,
        }
    }
}
