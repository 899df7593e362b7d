//! One iteration of the sampling loop.
//!
//! [`Monitor::step`] reads the sampler, feeds the level into the shared
//! escalation state and reports what should be on screen. A failed read is
//! logged and the previous display is kept, but the pending debounce is
//! dropped since the level was not observed. Only a run of
//! `max_consecutive_failures` failures in a row ends the loop.
//!
//! The shared state is locked only to read and update it; logging happens
//! after the guard is released.

use std::time::Instant;

use log::{debug, error, info, trace, warn};
use thiserror::Error;

use crate::escalation::{SharedEscalation, Transition};
use crate::sampler::{NoiseSampler, Reading, VoltageSource};
use crate::thresholds::Severity;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("voltage source failed {failures} times in a row")]
    Sensor {
        failures: u32,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result of one [`Monitor::step`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepOutcome {
    /// `None` when the read failed and was tolerated.
    pub reading: Option<Reading>,
    /// `None` when there was no reading to feed.
    pub transition: Option<Transition>,
    /// What the renderer should show after this step.
    pub displayed: Option<Severity>,
}

/// Sampler plus the shared escalation state.
pub struct Monitor<S> {
    sampler: NoiseSampler<S>,
    state: SharedEscalation,
    consecutive_failures: u32,
    max_consecutive_failures: u32,
}

impl<S: VoltageSource> Monitor<S> {
    pub const fn new(
        sampler: NoiseSampler<S>,
        state: SharedEscalation,
        max_consecutive_failures: u32,
    ) -> Self {
        Self {
            sampler,
            state,
            consecutive_failures: 0,
            max_consecutive_failures,
        }
    }

    /// Sample once and update the escalation state as of `now`.
    pub fn step(
        &mut self,
        now: Instant,
    ) -> Result<StepOutcome, MonitorError> {
        let reading = match self.sampler.sample() {
            Ok(reading) => {
                self.consecutive_failures = 0;
                reading
            }
            Err(err) => {
                self.consecutive_failures += 1;
                if self.consecutive_failures >= self.max_consecutive_failures {
                    error!("Giving up after {} failed reads: {err}", self.consecutive_failures);
                    return Err(MonitorError::Sensor {
                        failures: self.consecutive_failures,
                        source: Box::new(err),
                    });
                }
                let displayed = {
                    let mut state = self.state.lock();
                    state.interrupt();
                    state.displayed()
                };
                warn!(
                    "Read failed ({}/{}): {err}",
                    self.consecutive_failures, self.max_consecutive_failures
                );
                return Ok(StepOutcome {
                    reading: None,
                    transition: None,
                    displayed,
                });
            }
        };

        let (transition, displayed) = {
            let mut state = self.state.lock();
            let transition = state.update(reading.level, now);
            (transition, state.displayed())
        };
        log_transition(transition, reading.level);

        Ok(StepOutcome {
            reading: Some(reading),
            transition: Some(transition),
            displayed,
        })
    }

    #[inline]
    pub fn state(&self) -> &SharedEscalation { &self.state }
}

fn log_transition(
    transition: Transition,
    level: f32,
) {
    match transition {
        Transition::Started(severity) => debug!("{severity} threshold met at {level:.1} dBA, debounce started"),
        Transition::Escalated(severity) => info!("Escalated to {severity} at {level:.1} dBA"),
        Transition::Suppressed { matched, displayed } => trace!("{matched} sustained but {displayed} already shown"),
        Transition::Idle | Transition::Holding(_) => {}
    }
}
