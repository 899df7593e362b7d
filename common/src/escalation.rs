//! Debounced threshold escalation.
//!
//! Each sample's level is matched against the threshold table. A matched
//! severity must be seen on every sample for the debounce duration before it
//! can be shown; any change of match (including dropping below all
//! thresholds) restarts the clock. Once shown, the display only moves to
//! strictly more severe warnings until [`EscalationState::clear_display`]
//! runs from the idle reset task.
//!
//! ```text
//!            no match                 match L
//!   Idle <-------------- any ------------------> Pending(L, t)
//!                                                    |
//!                        held >= debounce, L > max   v
//!                                               display = L, max = L
//! ```
//!
//! Time is passed in by the caller, so the machine itself never reads a clock.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::config::DEBOUNCE_DURATION;
use crate::thresholds::{Severity, severity_for_level};

/// Escalation state shared between the sampling loop and the reset task.
pub type SharedEscalation = Arc<Mutex<EscalationState>>;

/// Which severity the current run of samples is matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tracking {
    /// No threshold met on the last sample.
    Idle,
    /// `severity` has matched on every sample since `since`.
    Pending { severity: Severity, since: Instant },
}

/// What a single [`EscalationState::update`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Below every threshold.
    Idle,
    /// A new severity started matching; debounce clock restarted.
    Started(Severity),
    /// Same severity still matching, debounce not yet satisfied.
    Holding(Severity),
    /// Debounce satisfied and the display moved up to this severity.
    Escalated(Severity),
    /// Debounce satisfied but the display already shows this or worse.
    Suppressed { matched: Severity, displayed: Severity },
}

/// Debounce tracking plus the highest severity shown since the last reset.
#[derive(Clone, Debug)]
pub struct EscalationState {
    tracking: Tracking,
    max_severity: Option<Severity>,
    debounce: Duration,
}

impl EscalationState {
    pub const fn new(debounce: Duration) -> Self {
        Self {
            tracking: Tracking::Idle,
            max_severity: None,
            debounce,
        }
    }

    /// Wrap a fresh state for sharing with the reset task.
    pub fn shared(debounce: Duration) -> SharedEscalation { Arc::new(Mutex::new(Self::new(debounce))) }

    /// Feed one level sampled at `now`.
    pub fn update(
        &mut self,
        level: f32,
        now: Instant,
    ) -> Transition {
        let Some(matched) = severity_for_level(level) else {
            self.tracking = Tracking::Idle;
            return Transition::Idle;
        };

        let since = match self.tracking {
            Tracking::Pending { severity, since } if severity == matched => since,
            _ => {
                self.tracking = Tracking::Pending {
                    severity: matched,
                    since: now,
                };
                return Transition::Started(matched);
            }
        };

        if now.saturating_duration_since(since) < self.debounce {
            return Transition::Holding(matched);
        }

        match self.max_severity {
            Some(displayed) if matched <= displayed => Transition::Suppressed { matched, displayed },
            _ => {
                self.max_severity = Some(matched);
                Transition::Escalated(matched)
            }
        }
    }

    /// Severity whose image is on screen, `None` for the blank frame.
    #[inline]
    pub const fn displayed(&self) -> Option<Severity> { self.max_severity }

    #[inline]
    pub const fn tracking(&self) -> Tracking { self.tracking }

    /// How far the pending severity is through its debounce, in `[0, 1]`.
    ///
    /// `None` when nothing is pending.
    pub fn debounce_progress(
        &self,
        now: Instant,
    ) -> Option<(Severity, f32)> {
        match self.tracking {
            Tracking::Idle => None,
            Tracking::Pending { severity, since } => {
                if self.debounce.is_zero() {
                    return Some((severity, 1.0));
                }
                let held = now.saturating_duration_since(since).as_secs_f32();
                Some((severity, (held / self.debounce.as_secs_f32()).min(1.0)))
            }
        }
    }

    /// Drop back to the blank frame and forget the highest severity shown.
    ///
    /// Returns the severity that was on screen. Debounce tracking is left
    /// alone: a level that is still being held escalates again on its next
    /// sample.
    pub fn clear_display(&mut self) -> Option<Severity> { self.max_severity.take() }

    /// Forget the pending severity after a sample was missed.
    ///
    /// The debounce requires a match on every sample, so the next matching
    /// sample starts a fresh clock. The display is untouched.
    pub fn interrupt(&mut self) { self.tracking = Tracking::Idle; }
}

impl Default for EscalationState {
    fn default() -> Self { Self::new(DEBOUNCE_DURATION) }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: Duration = Duration::from_millis(100);

    /// Feed `level` every 100ms for `duration`, starting at `*t`.
    fn hold(
        state: &mut EscalationState,
        t: &mut Instant,
        level: f32,
        duration: Duration,
    ) -> Vec<Transition> {
        let end = *t + duration;
        let mut transitions = Vec::new();
        while *t < end {
            transitions.push(state.update(level, *t));
            *t += STEP;
        }
        transitions
    }

    #[test]
    fn test_starts_blank_and_idle() {
        let state = EscalationState::default();
        assert_eq!(state.displayed(), None);
        assert_eq!(state.tracking(), Tracking::Idle);
    }

    #[test]
    fn test_below_threshold_stays_idle() {
        let mut state = EscalationState::default();
        let mut t = Instant::now();
        let transitions = hold(&mut state, &mut t, 70.0, Duration::from_secs(10));
        assert!(transitions.iter().all(|tr| *tr == Transition::Idle));
        assert_eq!(state.displayed(), None);
    }

    #[test]
    fn test_amber_escalates_after_three_seconds() {
        let mut state = EscalationState::default();
        let start = Instant::now();

        assert_eq!(state.update(90.0, start), Transition::Started(Severity::Amber));
        assert_eq!(
            state.update(90.0, start + Duration::from_millis(2900)),
            Transition::Holding(Severity::Amber)
        );
        assert_eq!(state.displayed(), None, "2.9s is not enough");
        assert_eq!(
            state.update(90.0, start + Duration::from_secs(3)),
            Transition::Escalated(Severity::Amber)
        );
        assert_eq!(state.displayed(), Some(Severity::Amber));
    }

    #[test]
    fn test_amber_then_red_then_amber_scenario() {
        let mut state = EscalationState::default();
        let mut t = Instant::now();

        let transitions = hold(&mut state, &mut t, 90.0, Duration::from_millis(3500));
        assert!(transitions.contains(&Transition::Escalated(Severity::Amber)));
        assert_eq!(state.displayed(), Some(Severity::Amber));

        hold(&mut state, &mut t, 105.0, Duration::from_millis(2900));
        assert_eq!(state.displayed(), Some(Severity::Amber), "red not yet debounced");
        hold(&mut state, &mut t, 105.0, Duration::from_millis(200));
        assert_eq!(state.displayed(), Some(Severity::Red));

        let transitions = hold(&mut state, &mut t, 90.0, Duration::from_secs(5));
        assert_eq!(state.displayed(), Some(Severity::Red), "amber must not downgrade red");
        assert!(transitions.contains(&Transition::Suppressed {
            matched: Severity::Amber,
            displayed: Severity::Red,
        }));
    }

    #[test]
    fn test_oscillation_never_escalates() {
        let mut state = EscalationState::default();
        let mut t = Instant::now();
        for _ in 0..5 {
            hold(&mut state, &mut t, 95.0, Duration::from_secs(1));
            hold(&mut state, &mut t, 70.0, Duration::from_secs(1));
        }
        assert_eq!(state.displayed(), None);
    }

    #[test]
    fn test_dropout_restarts_debounce() {
        let mut state = EscalationState::default();
        let start = Instant::now();

        state.update(90.0, start);
        state.update(90.0, start + Duration::from_millis(2900));
        assert_eq!(state.update(50.0, start + Duration::from_millis(2950)), Transition::Idle);
        assert_eq!(
            state.update(90.0, start + Duration::from_millis(3000)),
            Transition::Started(Severity::Amber)
        );
        assert_eq!(
            state.update(90.0, start + Duration::from_millis(5900)),
            Transition::Holding(Severity::Amber)
        );
        assert_eq!(state.displayed(), None);
        assert_eq!(
            state.update(90.0, start + Duration::from_millis(6000)),
            Transition::Escalated(Severity::Amber)
        );
    }

    #[test]
    fn test_flicker_between_adjacent_thresholds_restarts_debounce() {
        let mut state = EscalationState::default();
        let start = Instant::now();

        state.update(99.0, start);
        assert_eq!(
            state.update(101.0, start + Duration::from_secs(2)),
            Transition::Started(Severity::Red)
        );
        assert_eq!(
            state.update(99.0, start + Duration::from_secs(4)),
            Transition::Started(Severity::Amber)
        );
        assert_eq!(state.displayed(), None);
    }

    #[test]
    fn test_direct_jump_to_extreme() {
        let mut state = EscalationState::default();
        let mut t = Instant::now();
        hold(&mut state, &mut t, 125.0, Duration::from_millis(3100));
        assert_eq!(state.displayed(), Some(Severity::Extreme));

        hold(&mut state, &mut t, 116.0, Duration::from_secs(4));
        assert_eq!(state.displayed(), Some(Severity::Extreme));
    }

    #[test]
    fn test_same_severity_after_escalation_is_suppressed() {
        let mut state = EscalationState::default();
        let mut t = Instant::now();
        hold(&mut state, &mut t, 105.0, Duration::from_millis(3100));
        assert_eq!(
            state.update(105.0, t),
            Transition::Suppressed {
                matched: Severity::Red,
                displayed: Severity::Red,
            }
        );
    }

    #[test]
    fn test_clear_display_keeps_tracking() {
        let mut state = EscalationState::default();
        let mut t = Instant::now();
        hold(&mut state, &mut t, 105.0, Duration::from_millis(3100));
        assert_eq!(state.displayed(), Some(Severity::Red));

        assert_eq!(state.clear_display(), Some(Severity::Red));
        assert_eq!(state.displayed(), None);
        assert_eq!(state.clear_display(), None);
        assert!(matches!(state.tracking(), Tracking::Pending { severity: Severity::Red, .. }));

        // Still held, so the next sample escalates again straight away
        assert_eq!(state.update(105.0, t), Transition::Escalated(Severity::Red));
    }

    #[test]
    fn test_clear_display_allows_lower_severity() {
        let mut state = EscalationState::default();
        let mut t = Instant::now();
        hold(&mut state, &mut t, 118.0, Duration::from_millis(3100));
        state.clear_display();

        hold(&mut state, &mut t, 90.0, Duration::from_millis(3100));
        assert_eq!(state.displayed(), Some(Severity::Amber));
    }

    #[test]
    fn test_interrupt_restarts_debounce_and_keeps_display() {
        let mut state = EscalationState::default();
        let mut t = Instant::now();
        hold(&mut state, &mut t, 90.0, Duration::from_millis(3100));
        assert_eq!(state.displayed(), Some(Severity::Amber));

        hold(&mut state, &mut t, 105.0, Duration::from_millis(2500));
        state.interrupt();
        assert_eq!(state.tracking(), Tracking::Idle);
        assert_eq!(state.displayed(), Some(Severity::Amber));

        assert_eq!(state.update(105.0, t), Transition::Started(Severity::Red));
        hold(&mut state, &mut t, 105.0, Duration::from_millis(2900));
        assert_eq!(state.displayed(), Some(Severity::Amber), "clock restarted after the gap");
    }

    #[test]
    fn test_debounce_progress() {
        let mut state = EscalationState::default();
        let start = Instant::now();
        assert_eq!(state.debounce_progress(start), None);

        state.update(90.0, start);
        let (severity, progress) = state.debounce_progress(start + Duration::from_millis(1500)).unwrap();
        assert_eq!(severity, Severity::Amber);
        assert!((progress - 0.5).abs() < 1e-3);

        let (_, progress) = state.debounce_progress(start + Duration::from_secs(10)).unwrap();
        assert_eq!(progress, 1.0);
    }

    #[test]
    fn test_shared_state_starts_blank() {
        let shared = EscalationState::shared(DEBOUNCE_DURATION);
        assert_eq!(shared.lock().displayed(), None);
    }
}
