//! # marlinsim Core
//!
//! Core types for the Marlin firmware simulator.
//! Provides the printer-side state record, the first-order thermal model,
//! the clock and cancellation primitives used to pace busy sequences, and
//! the error types shared by every crate in the workspace.

pub mod clock;
pub mod error;
pub mod state;
pub mod thermal;

pub use clock::{CancelToken, Clock, ManualClock, SystemClock};
pub use error::{ConnectionError, Error, FirmwareError, Result};
pub use state::{
    Axis, AxisMode, Heater, HeaterId, HeaterProfile, Heaters, Position, PrinterState,
};
pub use thermal::{
    FixedNoise, NoiseSource, RandomNoise, ThermalModel, ThermalRegime, ROOM_TEMPERATURE,
};
