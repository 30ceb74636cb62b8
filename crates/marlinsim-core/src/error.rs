//! Error handling for marlinsim
//!
//! The simulated firmware never reports errors to the host: malformed lines
//! degrade to a bare acknowledgement or silence. The types here cover the
//! simulator's own failure paths:
//! - Connection errors (serial port, stdio, in-memory links)
//! - Firmware errors (writing responses, interrupted sequences)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Connection error type
///
/// Represents failures of the line transport the simulator is attached to.
#[derive(Error, Debug, Clone)]
pub enum ConnectionError {
    /// No port matched the host discovery rule
    #[error("No host serial port detected")]
    NoHostPort,

    /// Failed to open port
    #[error("Failed to open port {port}: {reason}")]
    FailedToOpen {
        /// The name of the port that failed to open.
        port: String,
        /// The reason the port failed to open.
        reason: String,
    },

    /// Connection lost
    #[error("Connection lost: {reason}")]
    ConnectionLost {
        /// The reason the connection was lost.
        reason: String,
    },

    /// Serial port error
    #[error("Serial port error: {reason}")]
    SerialError {
        /// The reason for the serial port error.
        reason: String,
    },

    /// Invalid connection parameters
    #[error("Invalid connection parameters: {reason}")]
    InvalidParameters {
        /// The reason the parameters are invalid.
        reason: String,
    },
}

/// Firmware error type
///
/// Errors raised while the simulated firmware is producing output.
#[derive(Error, Debug, Clone)]
pub enum FirmwareError {
    /// A response line could not be delivered to the host
    #[error("Failed to send response '{line}': {reason}")]
    ResponseNotSent {
        /// The line that was being written.
        line: String,
        /// The reason the write failed.
        reason: String,
    },

    /// Invalid firmware configuration
    #[error("Firmware configuration error: {reason}")]
    ConfigurationError {
        /// The reason for the configuration error.
        reason: String,
    },
}

/// Main error type for marlinsim
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Connection error
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Firmware error
    #[error(transparent)]
    Firmware(#[from] FirmwareError),

    /// A busy sequence or blocking wait was cancelled between steps
    #[error("Operation cancelled")]
    Cancelled,
}

impl Error {
    /// Check if this is a connection error
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Error::Connection(_))
    }

    /// Check if this is a firmware error
    pub fn is_firmware_error(&self) -> bool {
        matches!(self, Error::Firmware(_))
    }

    /// Check if the operation was cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
