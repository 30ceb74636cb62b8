//! Simulated Marlin firmware
//!
//! Answers host lines the way a Marlin 3D-printer board does:
//! - Motion (G0/G1/G28/G90/G91) against a position model
//! - Heater setpoints, reports and blocking heats (M104/M105/M109/M140/M190)
//! - Fan and feed-rate echoes (M106/M107/M220)
//! - A canned bilinear bed-leveling session (G29 V4)
//!
//! Long operations emit `echo:busy: processing` once per busy interval.
//! Unknown G/M/N lines are acknowledged with `ok`; anything else is ignored.

pub mod dispatch;
pub mod handlers;
pub mod leveling;
pub mod params;
pub mod responses;

use super::Firmware;
use crate::communication::LineSink;
use marlinsim_core::{
    CancelToken, Clock, Error, FirmwareError, HeaterId, HeaterProfile, NoiseSource, PrinterState,
    RandomNoise, Result, SystemClock, ThermalModel, ROOM_TEMPERATURE,
};
use std::time::Duration;

/// Construction parameters for `MarlinFirmware`
#[derive(Debug, Clone, PartialEq)]
pub struct FirmwareConfig {
    /// Ambient temperature (°C)
    pub room_temperature: f64,
    /// Hotend ramp and noise constants
    pub hotend: HeaterProfile,
    /// Bed ramp and noise constants
    pub bed: HeaterProfile,
    /// Length of one busy notification step
    pub busy_interval: Duration,
    /// Latency applied before each line is handled
    pub line_delay: Duration,
    /// Seed for the thermal noise; entropy when unset
    pub seed: Option<u64>,
}

impl Default for FirmwareConfig {
    fn default() -> Self {
        Self {
            room_temperature: ROOM_TEMPERATURE,
            hotend: HeaterProfile::HOTEND,
            bed: HeaterProfile::BED,
            busy_interval: Duration::from_secs(1),
            line_delay: Duration::from_millis(10),
            seed: None,
        }
    }
}

impl FirmwareConfig {
    /// Reject parameters the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.busy_interval.is_zero() {
            return Err(config_error("busy interval must be non-zero"));
        }
        for (id, profile) in [(HeaterId::Hotend, &self.hotend), (HeaterId::Bed, &self.bed)] {
            // M109/M190 only terminate with non-zero ramps
            let ramps = [profile.heat_rate, profile.cool_rate];
            if ramps.iter().any(|rate| !rate.is_finite() || *rate <= 0.0) {
                return Err(config_error(format!("{} ramp rates must be positive", id)));
            }
            if !profile.noise.is_finite() || profile.noise < 0.0 {
                return Err(config_error(format!("{} noise must not be negative", id)));
            }
        }
        Ok(())
    }
}

fn config_error(reason: impl Into<String>) -> Error {
    FirmwareError::ConfigurationError {
        reason: reason.into(),
    }
    .into()
}

/// The simulated board
///
/// Owns its printer state exclusively; lines are processed one at a time.
pub struct MarlinFirmware {
    state: PrinterState,
    thermal: ThermalModel,
    noise: Box<dyn NoiseSource>,
    clock: Box<dyn Clock>,
    cancel: CancelToken,
    busy_interval: Duration,
    line_delay: Duration,
}

impl MarlinFirmware {
    /// Create a firmware on the system clock
    pub fn new(config: FirmwareConfig) -> Self {
        let noise = match config.seed {
            Some(seed) => RandomNoise::seeded(seed),
            None => RandomNoise::new(),
        };

        Self {
            state: PrinterState::new(config.hotend, config.bed),
            thermal: ThermalModel::new(config.room_temperature),
            noise: Box::new(noise),
            clock: Box::new(SystemClock::new()),
            cancel: CancelToken::new(),
            busy_interval: config.busy_interval,
            line_delay: config.line_delay,
        }
    }

    /// Replace the clock (e.g. with a `ManualClock` in tests)
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replace the noise source
    pub fn with_noise(mut self, noise: impl NoiseSource + 'static) -> Self {
        self.noise = Box::new(noise);
        self
    }

    /// Share a cancellation token with the caller
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Current printer state
    pub fn state(&self) -> &PrinterState {
        &self.state
    }

    /// Handle one host line
    ///
    /// Intermediate lines (busy notifications, probe results, temperature
    /// reports during blocking heats) are written to `out` before this
    /// returns. The returned response may span several lines joined by
    /// `\n`, and is empty when nothing should be sent. Errors are limited to
    /// write failures and cancellation.
    pub fn process_line(&mut self, line: &str, out: &mut dyn LineSink) -> Result<String> {
        self.clock.sleep(self.line_delay);

        let response = match dispatch::lookup(line) {
            Some(entry) => {
                tracing::debug!("{} -> {}", line, entry.prefix);
                (entry.handler)(self, line, out)?
            }
            None => dispatch::fallback(line).to_string(),
        };

        if !response.is_empty() {
            tracing::debug!("Response: {}", response.replace('\n', "\\n"));
        }
        Ok(response)
    }

    /// Emit `count` busy notifications, one per busy interval
    pub(crate) fn send_busy(&mut self, count: usize, out: &mut dyn LineSink) -> Result<()> {
        for _ in 0..count {
            self.checkpoint()?;
            out.send_line(responses::BUSY)?;
            self.clock.sleep(self.busy_interval);
        }
        Ok(())
    }

    /// Sleep one busy interval unless cancelled
    fn pause(&self) -> Result<()> {
        self.checkpoint()?;
        self.clock.sleep(self.busy_interval);
        Ok(())
    }

    fn checkpoint(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            tracing::info!("Cancelled between busy steps");
            return Err(Error::Cancelled);
        }
        Ok(())
    }

    pub(crate) fn set_target(&mut self, id: HeaterId, target: f64) {
        tracing::debug!("{} target -> {:.2}", id, target);
        self.state.heaters.get_mut(id).target = target;
    }

    /// Advance every heater to the current time
    pub(crate) fn update_temperatures(&mut self) {
        let now = self.clock.now_ms();
        for id in HeaterId::ALL {
            self.thermal
                .advance(self.state.heaters.get_mut(id), now, self.noise.as_mut());
        }
    }

    /// Block until heater `id` is within ±2 °C of its target, reporting
    /// temperatures twice per loop
    pub(crate) fn wait_for_heater(&mut self, id: HeaterId, out: &mut dyn LineSink) -> Result<()> {
        while !self.thermal.is_settled(self.state.heaters.get(id)) {
            self.send_busy(1, out)?;
            self.update_temperatures();
            out.send_line(&responses::temperature_report(&self.state.heaters, false))?;

            self.pause()?;
            self.update_temperatures();
            out.send_line(&responses::temperature_report(&self.state.heaters, false))?;
        }
        tracing::debug!("{} reached {:.2}", id, self.state.heaters.get(id).value);
        Ok(())
    }
}

impl Default for MarlinFirmware {
    fn default() -> Self {
        Self::new(FirmwareConfig::default())
    }
}

impl Firmware for MarlinFirmware {
    fn process_line(&mut self, line: &str, out: &mut dyn LineSink) -> Result<String> {
        MarlinFirmware::process_line(self, line, out)
    }

    fn name(&self) -> &'static str {
        "Marlin"
    }
}
