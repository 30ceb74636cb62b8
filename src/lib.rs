//! # marlinsim
//!
//! A Marlin firmware simulator for developing serial host controllers
//! (such as ESP3D-TFT screens) without printer hardware.
//!
//! ## Architecture
//!
//! marlinsim is organized as a workspace with multiple crates:
//!
//! 1. **marlinsim-core** - Printer state, thermal model, clocks, errors
//! 2. **marlinsim-communication** - Line transports, simulated Marlin firmware, session loop
//! 3. **marlinsim-settings** - TOML/JSON configuration
//! 4. **marlinsim** - Main binary that wires configuration, logging and the session together

use anyhow::Context;
use std::path::Path;

pub use marlinsim_communication::{
    find_host_port, list_ports, Firmware, FirmwareConfig, LineSink, LineTransport, MarlinFirmware,
    MemoryTransport, SerialParams, SerialPortInfo, SerialTransport, Session, SessionConfig,
    SessionEnd, SessionSummary, StreamTransport,
};
pub use marlinsim_core::{
    CancelToken, ConnectionError, Error, FirmwareError, PrinterState, Result,
};
pub use marlinsim_settings::{Config, ConnectionKind, ConnectionSettings, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - RUST_LOG environment variable support (default level INFO)
/// - Output on stderr, leaving stdout to the stdio transport
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_names(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Command-line values that take precedence over the configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub port: Option<String>,
    pub baud_rate: Option<u32>,
    pub stdio: bool,
    pub seed: Option<u64>,
    pub busy_interval_ms: Option<u64>,
}

impl Overrides {
    /// Apply every set override to `config`
    pub fn apply(&self, config: &mut Config) {
        if let Some(port) = &self.port {
            config.connection.port = port.clone();
        }
        if let Some(baud_rate) = self.baud_rate {
            config.connection.baud_rate = baud_rate;
        }
        if self.stdio {
            config.connection.kind = ConnectionKind::Stdio;
        }
        if let Some(seed) = self.seed {
            config.thermal.seed = Some(seed);
        }
        if let Some(busy_interval_ms) = self.busy_interval_ms {
            config.timing.busy_interval_ms = busy_interval_ms;
        }
    }
}

/// Load the configuration file (or defaults), apply overrides, validate
pub fn load_config(path: Option<&Path>, overrides: &Overrides) -> anyhow::Result<Config> {
    let mut config = Config::load_or_default(path).context("Failed to load configuration")?;
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

/// Firmware parameters derived from the configuration
pub fn firmware_config(config: &Config) -> FirmwareConfig {
    FirmwareConfig {
        room_temperature: config.thermal.room_temperature,
        hotend: config.thermal.hotend,
        bed: config.thermal.bed,
        busy_interval: config.timing.busy_interval(),
        line_delay: config.timing.line_delay(),
        seed: config.thermal.seed,
    }
}

/// Session parameters derived from the configuration
pub fn session_config(config: &Config) -> SessionConfig {
    SessionConfig {
        ignore_prefix: config.session.ignore_prefix.clone(),
        poll_interval: std::time::Duration::from_millis(config.connection.poll_interval_ms),
    }
}

/// Serial port to open: the configured name, or the first host candidate
pub fn resolve_port(settings: &ConnectionSettings, ports: &[SerialPortInfo]) -> Result<String> {
    if !settings.is_auto_port() {
        return Ok(settings.port.clone());
    }

    for port in ports {
        tracing::info!("{}: {}", port.port_name, port.description);
    }
    match find_host_port(ports) {
        Some(port) => {
            tracing::info!("Found {} for host", port.port_name);
            Ok(port.port_name.clone())
        }
        None => Err(ConnectionError::NoHostPort.into()),
    }
}

/// Open the configured link
pub fn open_transport(config: &Config) -> Result<Box<dyn LineTransport>> {
    match config.connection.kind {
        ConnectionKind::Stdio => Ok(Box::new(StreamTransport::stdio())),
        ConnectionKind::Serial => {
            let ports = if config.connection.is_auto_port() {
                list_ports()?
            } else {
                Vec::new()
            };
            let port = resolve_port(&config.connection, &ports)?;
            let params = SerialParams::new(port, config.connection.baud_rate).with_read_timeout(
                std::time::Duration::from_millis(config.connection.read_timeout_ms),
            );
            Ok(Box::new(SerialTransport::open(&params)?))
        }
    }
}

/// Build a ready-to-run session on `transport`, cancellable through `cancel`
pub fn build_session(
    config: &Config,
    transport: Box<dyn LineTransport>,
    cancel: CancelToken,
) -> Result<Session> {
    let firmware_config = firmware_config(config);
    firmware_config.validate()?;

    let firmware = MarlinFirmware::new(firmware_config).with_cancel_token(cancel.clone());
    let session = Session::new(transport, Box::new(firmware), session_config(config));
    Ok(session.with_cancel_token(cancel))
}
