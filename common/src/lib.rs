//! Core logic for the noise level warning display.
//!
//! This crate contains everything that does not need a window, so it can be
//! built and tested on any host:
//!
//! - [`config`]: Timing, calibration and display constants
//! - [`thresholds`]: Severity levels and the descending threshold table
//! - [`sampler`]: Voltage to dBA conversion and the [`VoltageSource`] seam
//! - [`ads1115`]: Minimal ADS1115 driver over `embedded-hal` I2C
//! - [`escalation`]: Debounced, monotonic escalation state machine
//! - [`reset`]: Cancellable idle reset task
//! - [`monitor`]: One sampling step combining the pieces above
//! - [`assets`]: Warning image loading
//! - [`logger`]: `log` backend with an on-screen ring buffer
//! - [`overlay`]: Diagnostic overlay drawn over the warning image
//! - [`signal`]: Simulated microphone for running without the ADC
//! - [`colors`] and [`styles`]: RGB565 colors and text styles

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod ads1115;
pub mod assets;
pub mod colors;
pub mod config;
pub mod escalation;
pub mod logger;
pub mod monitor;
pub mod overlay;
pub mod reset;
pub mod sampler;
pub mod signal;
pub mod styles;
pub mod thresholds;

// Re-export commonly used items
pub use assets::{ImageSet, WarningImage};
pub use config::MonitorConfig;
pub use escalation::{EscalationState, SharedEscalation, Transition};
pub use monitor::{Monitor, MonitorError, StepOutcome};
pub use reset::IdleResetTask;
pub use sampler::{NoiseSampler, Reading, VoltageSource};
pub use thresholds::Severity;
