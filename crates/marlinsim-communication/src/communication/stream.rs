//! Reader/writer transport
//!
//! Drives the simulator from any buffered reader and writer pair, most
//! usefully stdin/stdout when piping G-code by hand or from a script.
//! Reads block until a full line or end of input; EOF closes the transport.

use super::{LineSink, LineTransport};
use marlinsim_core::{ConnectionError, Error, FirmwareError, Result};
use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

/// Line transport over a buffered reader and a writer
pub struct StreamTransport<R, W> {
    reader: R,
    writer: W,
    name: String,
    open: bool,
}

/// Transport bound to the process's stdin and stdout
pub type StdioTransport = StreamTransport<BufReader<Stdin>, Stdout>;

impl StreamTransport<BufReader<Stdin>, Stdout> {
    /// Attach to stdin/stdout
    pub fn stdio() -> StdioTransport {
        StreamTransport::new(BufReader::new(io::stdin()), io::stdout(), "stdio")
    }
}

impl<R: BufRead + Send, W: Write + Send> StreamTransport<R, W> {
    pub fn new(reader: R, writer: W, name: impl Into<String>) -> Self {
        Self {
            reader,
            writer,
            name: name.into(),
            open: true,
        }
    }

    /// Give back the writer, e.g. to inspect what was sent
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<R: BufRead + Send, W: Write + Send> LineSink for StreamTransport<R, W> {
    fn send_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{}", line)
            .and_then(|_| self.writer.flush())
            .map_err(|e| {
                Error::from(FirmwareError::ResponseNotSent {
                    line: line.to_string(),
                    reason: e.to_string(),
                })
            })
    }
}

impl<R: BufRead + Send, W: Write + Send> LineTransport for StreamTransport<R, W> {
    fn read_line(&mut self) -> Result<Option<String>> {
        if !self.open {
            return Ok(None);
        }

        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => {
                tracing::debug!("{}: end of input", self.name);
                self.open = false;
                Ok(None)
            }
            Ok(_) => {
                let trimmed = line.trim_end_matches(&['\r', '\n'][..]).len();
                line.truncate(trimmed);
                Ok(Some(line))
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
            Err(e) => Err(ConnectionError::ConnectionLost {
                reason: e.to_string(),
            }
            .into()),
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}
