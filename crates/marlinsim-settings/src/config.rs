//! Configuration management for marlinsim
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats, chosen by file extension.
//!
//! Configuration is organized into logical sections:
//! - Connection settings (link kind, port, baud rate, polling)
//! - Timing (busy interval, per-line latency)
//! - Thermal constants (room temperature, heater ramps, noise seed)
//! - Session filtering (host log prefix)

use crate::error::{ConfigError, SettingsError, SettingsResult};
use marlinsim_core::{HeaterId, HeaterProfile, ROOM_TEMPERATURE};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Port value that requests host port discovery
pub const AUTO_PORT: &str = "Auto";

/// Environment variable overriding the default config path
pub const CONFIG_ENV_VAR: &str = "MARLINSIM_CONFIG";

/// Link the simulator is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    /// Serial/USB port
    #[default]
    Serial,
    /// Process stdin/stdout
    Stdio,
}

impl std::fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serial => write!(f, "serial"),
            Self::Stdio => write!(f, "stdio"),
        }
    }
}

/// Connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Link kind
    pub kind: ConnectionKind,
    /// Serial port name, or "Auto" for discovery
    pub port: String,
    /// Baud rate for serial connections
    pub baud_rate: u32,
    /// Serial read timeout in milliseconds
    pub read_timeout_ms: u64,
    /// Idle sleep between reads in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            kind: ConnectionKind::Serial,
            port: AUTO_PORT.to_string(),
            baud_rate: 115200,
            read_timeout_ms: 10,
            poll_interval_ms: 10,
        }
    }
}

impl ConnectionSettings {
    /// Whether the port should be discovered rather than opened by name
    pub fn is_auto_port(&self) -> bool {
        self.port.is_empty() || self.port.eq_ignore_ascii_case(AUTO_PORT)
    }
}

/// Timing of simulated work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Length of one busy notification step in milliseconds
    pub busy_interval_ms: u64,
    /// Latency before each line is handled in milliseconds
    pub line_delay_ms: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            busy_interval_ms: 1000,
            line_delay_ms: 10,
        }
    }
}

impl TimingSettings {
    pub fn busy_interval(&self) -> Duration {
        Duration::from_millis(self.busy_interval_ms)
    }

    pub fn line_delay(&self) -> Duration {
        Duration::from_millis(self.line_delay_ms)
    }
}

/// Thermal model constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermalSettings {
    /// Ambient temperature (°C)
    pub room_temperature: f64,
    /// Fixed noise seed for reproducible runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Hotend ramps and noise
    #[serde(deserialize_with = "hotend_profile")]
    pub hotend: HeaterProfile,
    /// Bed ramps and noise
    #[serde(deserialize_with = "bed_profile")]
    pub bed: HeaterProfile,
}

impl Default for ThermalSettings {
    fn default() -> Self {
        Self {
            room_temperature: ROOM_TEMPERATURE,
            seed: None,
            hotend: HeaterProfile::default_for(HeaterId::Hotend),
            bed: HeaterProfile::default_for(HeaterId::Bed),
        }
    }
}

/// Heater table as written in a file; omitted keys keep the heater's defaults
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HeaterProfileTable {
    heat_rate: Option<f64>,
    cool_rate: Option<f64>,
    noise: Option<f64>,
}

impl HeaterProfileTable {
    fn resolve(self, id: HeaterId) -> HeaterProfile {
        let base = HeaterProfile::default_for(id);
        HeaterProfile {
            heat_rate: self.heat_rate.unwrap_or(base.heat_rate),
            cool_rate: self.cool_rate.unwrap_or(base.cool_rate),
            noise: self.noise.unwrap_or(base.noise),
        }
    }
}

fn hotend_profile<'de, D: Deserializer<'de>>(deserializer: D) -> Result<HeaterProfile, D::Error> {
    HeaterProfileTable::deserialize(deserializer).map(|table| table.resolve(HeaterId::Hotend))
}

fn bed_profile<'de, D: Deserializer<'de>>(deserializer: D) -> Result<HeaterProfile, D::Error> {
    HeaterProfileTable::deserialize(deserializer).map(|table| table.resolve(HeaterId::Bed))
}

/// Session loop settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Received lines with this prefix are host log output and are dropped
    pub ignore_prefix: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ignore_prefix: "[".to_string(),
        }
    }
}

/// Complete simulator configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Connection settings
    pub connection: ConnectionSettings,
    /// Busy timing
    pub timing: TimingSettings,
    /// Thermal constants
    pub thermal: ThermalSettings,
    /// Session filtering
    pub session: SessionSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into()),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Default config location: `$MARLINSIM_CONFIG`, else
    /// `<config dir>/marlinsim/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Ok(PathBuf::from(path));
        }

        dirs::config_dir()
            .map(|dir| dir.join("marlinsim").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no configuration directory on this platform".into())
            })
    }

    /// Load an explicit file, or the default file when it exists, or defaults
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }

        match Self::default_path() {
            Ok(path) if path.exists() => Self::load_from_file(&path),
            Ok(_) => Ok(Self::default()),
            Err(e) => {
                tracing::warn!("{}; using default configuration", e);
                Ok(Self::default())
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        // Validate connection settings
        if self.connection.baud_rate == 0 {
            return Err(SettingsError::invalid("connection.baud_rate", "must be > 0"));
        }

        if self.connection.kind == ConnectionKind::Serial && self.connection.read_timeout_ms == 0 {
            return Err(SettingsError::invalid(
                "connection.read_timeout_ms",
                "must be > 0 for serial links",
            ));
        }

        // Validate timing
        if self.timing.busy_interval_ms == 0 {
            return Err(SettingsError::invalid("timing.busy_interval_ms", "must be > 0"));
        }

        // Validate thermal constants
        let profiles = [("hotend", &self.thermal.hotend), ("bed", &self.thermal.bed)];
        for (name, profile) in profiles {
            // ramps must be positive, noise may be zero
            let values = [
                ("heat_rate", profile.heat_rate, false),
                ("cool_rate", profile.cool_rate, false),
                ("noise", profile.noise, true),
            ];
            for (field, value, zero_ok) in values {
                if !value.is_finite() || value < 0.0 || (value == 0.0 && !zero_ok) {
                    return Err(ConfigError::ValueOutOfRange {
                        key: format!("thermal.{}.{}", name, field),
                        value: value.to_string(),
                    }
                    .into());
                }
            }
        }

        if !self.thermal.room_temperature.is_finite() {
            return Err(SettingsError::invalid(
                "thermal.room_temperature",
                "must be a finite number",
            ));
        }

        Ok(())
    }
}
