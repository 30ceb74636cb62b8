//! Printer-side state
//!
//! The mutable record the simulated firmware keeps between lines:
//! - Axis positions (X, Y, Z in millimeters)
//! - Axis interpretation mode (G90 absolute / G91 relative)
//! - Per-heater thermal state (hotend and bed)
//!
//! One `PrinterState` belongs to exactly one firmware instance and is never
//! shared between instances.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate interpretation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisMode {
    /// Coordinates replace the current position (G90)
    #[default]
    Absolute,
    /// Coordinates are added to the current position (G91)
    Relative,
}

impl fmt::Display for AxisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisMode::Absolute => write!(f, "absolute"),
            AxisMode::Relative => write!(f, "relative"),
        }
    }
}

/// Linear axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All simulated axes, in report order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// The G-code word letter for this axis
    pub fn letter(self) -> char {
        match self {
            Axis::X => 'X',
            Axis::Y => 'Y',
            Axis::Z => 'Z',
        }
    }
}

/// Tool position in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    /// Create a position from explicit coordinates
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Mutable access to one axis
    pub fn axis_mut(&mut self, axis: Axis) -> &mut f64 {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }
}

/// Heater identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeaterId {
    /// Extruder hotend (E0)
    Hotend,
    /// Heated bed
    Bed,
}

impl HeaterId {
    /// Every simulated heater, in the order the model is advanced
    pub const ALL: [HeaterId; 2] = [HeaterId::Hotend, HeaterId::Bed];

    /// Label used in temperature reports (`T:` / `B:`)
    pub fn report_label(self) -> &'static str {
        match self {
            HeaterId::Hotend => "T",
            HeaterId::Bed => "B",
        }
    }
}

impl fmt::Display for HeaterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaterId::Hotend => write!(f, "hotend"),
            HeaterId::Bed => write!(f, "bed"),
        }
    }
}

/// Fixed ramp and noise constants of one heater
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeaterProfile {
    /// Heating ramp in °C per second
    pub heat_rate: f64,
    /// Cooling ramp in °C per second
    pub cool_rate: f64,
    /// Amplitude of the steady-state jitter in °C
    pub noise: f64,
}

impl HeaterProfile {
    /// Hotend (E0) ramps
    pub const HOTEND: HeaterProfile = HeaterProfile {
        heat_rate: 0.6,
        cool_rate: 0.8,
        noise: 0.5,
    };

    /// Bed ramps: slow to heat, quick to cool
    pub const BED: HeaterProfile = HeaterProfile {
        heat_rate: 0.2,
        cool_rate: 0.8,
        noise: 0.5,
    };

    /// Default profile for a heater
    pub fn default_for(id: HeaterId) -> Self {
        match id {
            HeaterId::Hotend => Self::HOTEND,
            HeaterId::Bed => Self::BED,
        }
    }
}

/// Simulated heater
///
/// `value` stays at 0.0 until the thermal model first touches the heater,
/// which initializes it to room temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct Heater {
    /// Current simulated temperature (°C)
    pub value: f64,
    /// Requested setpoint (°C); 0.0 means no active target
    pub target: f64,
    /// Timestamp of the last model application (ms)
    pub last_update_ms: Option<u64>,
    profile: HeaterProfile,
}

impl Heater {
    /// Create a cold, uninitialized heater
    pub fn new(profile: HeaterProfile) -> Self {
        Self {
            value: 0.0,
            target: 0.0,
            last_update_ms: None,
            profile,
        }
    }

    /// Ramp and noise constants
    pub fn profile(&self) -> &HeaterProfile {
        &self.profile
    }

    /// Whether the thermal model has initialized this heater yet
    pub fn is_initialized(&self) -> bool {
        self.value != 0.0
    }
}

/// The fixed set of heaters
#[derive(Debug, Clone, PartialEq)]
pub struct Heaters {
    hotend: Heater,
    bed: Heater,
}

impl Heaters {
    /// Create both heaters from their profiles
    pub fn new(hotend: HeaterProfile, bed: HeaterProfile) -> Self {
        Self {
            hotend: Heater::new(hotend),
            bed: Heater::new(bed),
        }
    }

    pub fn get(&self, id: HeaterId) -> &Heater {
        match id {
            HeaterId::Hotend => &self.hotend,
            HeaterId::Bed => &self.bed,
        }
    }

    pub fn get_mut(&mut self, id: HeaterId) -> &mut Heater {
        match id {
            HeaterId::Hotend => &mut self.hotend,
            HeaterId::Bed => &mut self.bed,
        }
    }
}

impl Default for Heaters {
    fn default() -> Self {
        Self::new(HeaterProfile::HOTEND, HeaterProfile::BED)
    }
}

/// Complete printer-side state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrinterState {
    /// Current tool position
    pub position: Position,
    /// G90/G91 mode
    pub axis_mode: AxisMode,
    /// Heater records
    pub heaters: Heaters,
}

impl PrinterState {
    /// Create a state with custom heater profiles
    pub fn new(hotend: HeaterProfile, bed: HeaterProfile) -> Self {
        Self {
            position: Position::default(),
            axis_mode: AxisMode::default(),
            heaters: Heaters::new(hotend, bed),
        }
    }

    /// Apply one axis word of a move according to the current mode
    pub fn apply_axis(&mut self, axis: Axis, value: f64) {
        let coordinate = self.position.axis_mut(axis);
        match self.axis_mode {
            AxisMode::Absolute => *coordinate = value,
            AxisMode::Relative => *coordinate += value,
        }
    }

    /// Zero the given axes
    pub fn home(&mut self, axes: &[Axis]) {
        for &axis in axes {
            *self.position.axis_mut(axis) = 0.0;
        }
    }
}
