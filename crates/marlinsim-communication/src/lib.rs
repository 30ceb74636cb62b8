//! # marlinsim Communication
//!
//! Line transports and the simulated firmware for marlinsim.
//! Supports Serial/USB, stdin/stdout and in-memory links, and drives them
//! with a session loop that feeds host lines to the simulated Marlin board.

pub mod communication;
pub mod firmware;
pub mod session;

pub use communication::{
    find_host_port, list_ports, LineBuffer, LineSink, LineTransport, MemoryTransport, OutputLog,
    SerialParams, SerialPortInfo, SerialTransport, StdioTransport, StreamTransport,
};

pub use firmware::{Firmware, FirmwareConfig, MarlinFirmware};
pub use session::{Session, SessionConfig, SessionEnd, SessionSummary};
