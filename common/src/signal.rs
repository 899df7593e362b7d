//! Simulated microphone for running without the ADC.
//!
//! Sweeps the voltage slowly up and down so the level passes through every
//! severity zone and dwells in each long enough to escalate.

use std::convert::Infallible;
use std::time::Instant;

use crate::sampler::VoltageSource;

/// One sweep from quiet to loud and back, in seconds.
const SWEEP_PERIOD_SECS: f32 = 90.0;

/// Voltage at the quiet end (~60 dBA with the default calibration).
const QUIET_VOLTS: f32 = 1.2;

/// Voltage at the loud end (~126 dBA with the default calibration).
const LOUD_VOLTS: f32 = 2.52;

/// Time-driven sine sweep between `QUIET_VOLTS` and `LOUD_VOLTS`.
pub struct SimulatedMicrophone {
    started: Instant,
}

impl SimulatedMicrophone {
    pub fn new() -> Self { Self { started: Instant::now() } }
}

impl Default for SimulatedMicrophone {
    fn default() -> Self { Self::new() }
}

impl VoltageSource for SimulatedMicrophone {
    type Error = Infallible;

    fn read_voltage(&mut self) -> Result<f32, Self::Error> {
        let t = self.started.elapsed().as_secs_f32();
        Ok(fake_signal(
            t,
            QUIET_VOLTS,
            LOUD_VOLTS,
            core::f32::consts::TAU / SWEEP_PERIOD_SECS,
        ))
    }
}

/// Sine between `min` and `max`, starting at the midpoint.
fn fake_signal(
    t: f32,
    min: f32,
    max: f32,
    freq: f32,
) -> f32 {
    let normalized = (t * freq).sin().mul_add(0.5, 0.5);
    min + normalized * (max - min)
}
