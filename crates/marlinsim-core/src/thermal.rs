//! First-order heater model
//!
//! Advances a heater's simulated temperature from the elapsed wall time and
//! its target. Rates are applied as `rate * elapsed_ms / 1000` with no
//! thermal mass.
//!
//! Regimes, first match wins:
//! 1. uninitialized heater: set to room temperature plus a little jitter
//! 2. more than 5 °C below target: full heating ramp
//! 3. more than 5 °C above target: full cooling ramp
//! 4. within 2 °C of target: snap to target plus noise
//! 5. below target: one third of the heating ramp
//! 6. above target: one third of the cooling ramp

use crate::state::Heater;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Ambient temperature used for initialization and for "no target"
pub const ROOM_TEMPERATURE: f64 = 20.0;

/// Distance from target beyond which the full ramp applies
const FAR_BAND: f64 = 5.0;

/// Distance from target inside which the heater is considered settled
const SETTLE_BAND: f64 = 2.0;

/// Divisor applied to the ramps between the settle and far bands
const SLOW_RAMP_DIVISOR: f64 = 3.0;

/// Span of the uniform perturbation used when a heater is first initialized
const INITIAL_JITTER_SPAN: f64 = 5.0;

/// Source of uniform random values in `[0, 1)`
pub trait NoiseSource: Send {
    /// Next uniform sample in `[0, 1)`
    fn sample(&mut self) -> f64;
}

/// Pseudo-random noise backed by `StdRng`
#[derive(Debug)]
pub struct RandomNoise {
    rng: StdRng,
}

impl RandomNoise {
    /// Seed from the operating system
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomNoise {
    fn default() -> Self {
        Self::new()
    }
}

impl NoiseSource for RandomNoise {
    fn sample(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Constant noise, for deterministic runs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedNoise(pub f64);

impl NoiseSource for FixedNoise {
    fn sample(&mut self) -> f64 {
        self.0
    }
}

/// The regime selected by one model step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThermalRegime {
    /// Heater was uninitialized and has been set to room temperature
    Initialized,
    /// Far below target, full heating ramp
    Heating,
    /// Far above target, full cooling ramp
    Cooling,
    /// Near target, value snapped to target plus noise
    Settled,
    /// Slightly below target, reduced heating ramp
    ApproachingFromBelow,
    /// Slightly above target, reduced cooling ramp
    ApproachingFromAbove,
}

/// Thermal model parameters shared by all heaters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalModel {
    room_temperature: f64,
}

impl ThermalModel {
    /// Create a model with a custom ambient temperature
    pub fn new(room_temperature: f64) -> Self {
        Self { room_temperature }
    }

    /// The target the heater is driven towards; room temperature when unset
    pub fn effective_target(&self, heater: &Heater) -> f64 {
        if heater.target == 0.0 {
            self.room_temperature
        } else {
            heater.target
        }
    }

    /// Whether the heater is within ±2 °C (inclusive) of its effective target
    pub fn is_settled(&self, heater: &Heater) -> bool {
        let target = self.effective_target(heater);
        heater.value >= target - SETTLE_BAND && heater.value <= target + SETTLE_BAND
    }

    /// Advance one heater to `now_ms`
    ///
    /// Elapsed time is measured from the heater's last update and is zero on
    /// the very first call. `last_update_ms` is always moved to `now_ms`.
    pub fn advance(
        &self,
        heater: &mut Heater,
        now_ms: u64,
        noise: &mut dyn NoiseSource,
    ) -> ThermalRegime {
        let target = self.effective_target(heater);
        let elapsed_s = heater
            .last_update_ms
            .map(|last| now_ms.saturating_sub(last) as f64 / 1000.0)
            .unwrap_or(0.0);
        let profile = *heater.profile();

        let regime = if heater.value == 0.0 {
            heater.value = self.room_temperature + noise.sample() * INITIAL_JITTER_SPAN / 2.0;
            ThermalRegime::Initialized
        } else if heater.value + FAR_BAND < target {
            heater.value += profile.heat_rate * elapsed_s;
            ThermalRegime::Heating
        } else if heater.value - FAR_BAND > target {
            heater.value -= profile.cool_rate * elapsed_s;
            ThermalRegime::Cooling
        } else if (heater.value - target).abs() < SETTLE_BAND {
            heater.value = target + profile.noise * (noise.sample() - 0.5);
            ThermalRegime::Settled
        } else if heater.value < target {
            heater.value += profile.heat_rate / SLOW_RAMP_DIVISOR * elapsed_s;
            ThermalRegime::ApproachingFromBelow
        } else {
            heater.value -= profile.cool_rate / SLOW_RAMP_DIVISOR * elapsed_s;
            ThermalRegime::ApproachingFromAbove
        };

        heater.last_update_ms = Some(now_ms);
        tracing::trace!(?regime, value = heater.value, target, "thermal step");
        regime
    }
}

impl Default for ThermalModel {
    fn default() -> Self {
        Self::new(ROOM_TEMPERATURE)
    }
}
