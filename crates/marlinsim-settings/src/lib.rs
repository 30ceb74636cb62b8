//! marlinsim Settings Crate
//!
//! Handles simulator configuration: link parameters, busy timing, thermal
//! constants and session filtering, loaded from TOML or JSON.

pub mod config;
pub mod error;

pub use config::{
    Config, ConnectionKind, ConnectionSettings, SessionSettings, ThermalSettings, TimingSettings,
    AUTO_PORT, CONFIG_ENV_VAR,
};
pub use error::{ConfigError, SettingsError, SettingsResult};
