//! Microphone sampling: raw voltage to an approximate dBA level.
//!
//! The microphone amplifier output is mapped linearly so that `V_LOW` reads
//! as `LEVEL_OFFSET` dBA and every further `(V_HIGH - V_LOW)` volts adds
//! 100 dBA, then clamped to `[LEVEL_MIN, LEVEL_MAX]`.

use log::debug;
use thiserror::Error;

use crate::config::{LEVEL_MAX, LEVEL_MIN, LEVEL_OFFSET, V_HIGH, V_LOW};

/// Anything that can produce one analog voltage reading.
pub trait VoltageSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the current channel voltage in volts.
    fn read_voltage(&mut self) -> Result<f32, Self::Error>;
}

/// Linear voltage to level mapping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Calibration {
    pub v_low: f32,
    pub v_high: f32,
    pub offset: f32,
}

impl Calibration {
    /// Map a voltage to a level clamped to `[LEVEL_MIN, LEVEL_MAX]`.
    ///
    /// NaN maps to `LEVEL_MIN`.
    pub fn level(
        &self,
        voltage: f32,
    ) -> f32 {
        let level = (voltage - self.v_low) * 100.0 / (self.v_high - self.v_low) + self.offset;
        if level.is_nan() {
            return LEVEL_MIN;
        }
        level.clamp(LEVEL_MIN, LEVEL_MAX)
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            v_low: V_LOW,
            v_high: V_HIGH,
            offset: LEVEL_OFFSET,
        }
    }
}

/// One sample: the measured voltage and the level derived from it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    pub voltage: f32,
    pub level: f32,
}

#[derive(Debug, Error)]
pub enum SampleError<E> {
    #[error("voltage source failed")]
    Source(#[source] E),
    #[error("voltage source returned a non-finite value: {0}")]
    NonFinite(f32),
}

/// Reads a [`VoltageSource`] and converts each reading to a level.
pub struct NoiseSampler<S> {
    source: S,
    calibration: Calibration,
}

impl<S: VoltageSource> NoiseSampler<S> {
    pub const fn new(
        source: S,
        calibration: Calibration,
    ) -> Self {
        Self { source, calibration }
    }

    /// Take one reading.
    pub fn sample(&mut self) -> Result<Reading, SampleError<S::Error>> {
        let voltage = self.source.read_voltage().map_err(SampleError::Source)?;
        if !voltage.is_finite() {
            return Err(SampleError::NonFinite(voltage));
        }
        let level = self.calibration.level(voltage);
        debug!("Voltage: {voltage:.3} V -> dBA: {level:.2}");
        Ok(Reading { voltage, level })
    }
}
