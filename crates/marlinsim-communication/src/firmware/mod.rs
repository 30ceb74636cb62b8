//! Simulated firmware implementations
//!
//! Supported firmware:
//! - Marlin: 3D-printer firmware (as seen by ESP3D-TFT style hosts)

pub mod marlin;

pub use marlin::{FirmwareConfig, MarlinFirmware};

use crate::communication::LineSink;
use marlinsim_core::Result;

/// A firmware that answers host lines
pub trait Firmware: Send {
    /// Handle one received line, writing intermediate output to `out` and
    /// returning the final response (possibly empty)
    fn process_line(&mut self, line: &str, out: &mut dyn LineSink) -> Result<String>;

    /// Firmware name for logging
    fn name(&self) -> &'static str;
}
