//! Periodic idle reset of the displayed warning.
//!
//! Every `period` counted from when the task was spawned (not from the last
//! escalation), the shared state's display is cleared. The task sleeps on a
//! stop channel rather than `thread::sleep`, so [`IdleResetTask::stop`]
//! returns promptly instead of waiting out a half-hour period.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam::channel::{self, RecvTimeoutError, Sender};
use log::{debug, info, warn};

use crate::escalation::SharedEscalation;
use crate::thresholds::Severity;

/// Handle to the running reset thread.
pub struct IdleResetTask {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<u32>>,
}

impl IdleResetTask {
    /// Start clearing `state` every `period`.
    pub fn spawn(
        state: SharedEscalation,
        period: Duration,
    ) -> std::io::Result<Self> {
        let (stop_tx, stop_rx) = channel::bounded::<()>(1);

        let handle = thread::Builder::new()
            .name("idle-reset".into())
            .spawn(move || {
                let started = Instant::now();
                let mut cycles = 0u32;
                loop {
                    let deadline = started + period * (cycles + 1);
                    match stop_rx.recv_deadline(deadline) {
                        Err(RecvTimeoutError::Timeout) => {
                            reset_display(&state);
                            cycles += 1;
                            debug!("Idle reset cycle {cycles} complete");
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                cycles
            })?;

        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Stop the task and wait for it to exit.
    ///
    /// Returns the number of reset cycles that ran.
    pub fn stop(mut self) -> u32 { self.shutdown() }

    fn shutdown(&mut self) -> u32 {
        // Dropping the sender disconnects the channel and wakes the thread
        self.stop_tx.take();
        match self.handle.take().map(JoinHandle::join) {
            Some(Ok(cycles)) => cycles,
            Some(Err(_)) => {
                warn!("Idle reset thread panicked");
                0
            }
            None => 0,
        }
    }
}

impl Drop for IdleResetTask {
    fn drop(&mut self) { self.shutdown(); }
}

/// Clear the display, logging what was cleared once the lock is released.
pub(crate) fn reset_display(state: &SharedEscalation) -> Option<Severity> {
    let cleared = state.lock().clear_display();
    if let Some(previous) = cleared {
        info!("Display reset (was {previous})");
    }
    cleared
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escalation::EscalationState;

    fn escalated_state() -> SharedEscalation {
        let shared = EscalationState::shared(Duration::ZERO);
        let now = Instant::now();
        {
            let mut state = shared.lock();
            state.update(105.0, now);
            state.update(105.0, now);
        }
        assert_eq!(shared.lock().displayed(), Some(Severity::Red));
        shared
    }

    #[test]
    fn test_reset_clears_display_after_period() {
        let shared = escalated_state();
        let task = IdleResetTask::spawn(shared.clone(), Duration::from_millis(30)).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while shared.lock().displayed().is_some() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(shared.lock().displayed(), None, "display should be cleared by the reset task");
        assert!(task.stop() >= 1);
    }

    #[test]
    fn test_display_survives_until_period_elapses() {
        let shared = escalated_state();
        let task = IdleResetTask::spawn(shared.clone(), Duration::from_secs(3600)).unwrap();
        thread::sleep(Duration::from_millis(50));
        assert_eq!(shared.lock().displayed(), Some(Severity::Red));
        assert_eq!(task.stop(), 0);
    }

    #[test]
    fn test_stop_is_prompt_with_long_period() {
        let shared = EscalationState::shared(Duration::ZERO);
        let task = IdleResetTask::spawn(shared, Duration::from_secs(1800)).unwrap();
        let started = Instant::now();
        task.stop();
        assert!(started.elapsed() < Duration::from_secs(1), "stop must not wait for the period");
    }

    #[test]
    fn test_drop_stops_task() {
        let shared = EscalationState::shared(Duration::ZERO);
        let task = IdleResetTask::spawn(shared.clone(), Duration::from_secs(1800)).unwrap();
        drop(task);
        // Only the test's handle remains once the thread has exited
        assert_eq!(std::sync::Arc::strong_count(&shared), 1);
    }

    /// Poll until `shared` shows nothing, returning when that was seen.
    fn wait_for_clear(
        shared: &SharedEscalation,
        timeout: Duration,
    ) -> Instant {
        let deadline = Instant::now() + timeout;
        while shared.lock().displayed().is_some() {
            assert!(Instant::now() < deadline, "display was never cleared");
            thread::sleep(Duration::from_millis(1));
        }
        Instant::now()
    }

    #[test]
    fn test_resets_stay_anchored_to_start_across_escalations() {
        let period = Duration::from_millis(300);
        let shared = escalated_state();
        let start = Instant::now();
        let task = IdleResetTask::spawn(shared.clone(), period).unwrap();

        let first = wait_for_clear(&shared, Duration::from_secs(5)) - start;
        assert!(first >= period, "first reset came early: {first:?}");
        assert!(first < period + Duration::from_millis(80), "first reset late: {first:?}");

        // Escalate again a third of the way into the second period
        thread::sleep((start + period + Duration::from_millis(100)).saturating_duration_since(Instant::now()));
        shared.lock().update(105.0, Instant::now());
        assert_eq!(shared.lock().displayed(), Some(Severity::Red));

        // Anchored: start + 2 * period (600ms), not escalation + period (700ms)
        let second = wait_for_clear(&shared, Duration::from_secs(5)) - start;
        assert!(second >= period * 2, "second reset came early: {second:?}");
        assert!(
            second < period * 2 + Duration::from_millis(80),
            "second reset drifted to {second:?}"
        );
        assert_eq!(task.stop(), 2);
    }

    #[test]
    fn test_reset_display_returns_cleared_severity() {
        let shared = escalated_state();
        assert_eq!(reset_display(&shared), Some(Severity::Red));
        assert_eq!(reset_display(&shared), None);
        assert_eq!(shared.lock().displayed(), None);
    }

    #[test]
    fn test_resets_repeat_on_fixed_period() {
        let shared = escalated_state();
        let task = IdleResetTask::spawn(shared, Duration::from_millis(20)).unwrap();
        thread::sleep(Duration::from_millis(150));
        assert!(task.stop() >= 3);
    }
}
