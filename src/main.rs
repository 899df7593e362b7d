//! Noise level warning display.
//!
//! Samples the microphone channel about ten times a second, escalates the
//! on-screen warning once a threshold has been held for the debounce
//! duration, and clears it on a fixed idle period. Press `Q` to quit and `D`
//! to toggle the diagnostic overlay.
//!
//! Build with `--features hardware` to read an ADS1115 on `/dev/i2c-1`;
//! otherwise a simulated microphone sweeps through the severity zones.

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

#[cfg(feature = "hardware")]
mod hardware;
mod render;

use std::time::Instant;

use anyhow::Context;
use log::info;
use noise_common::logger::MonitorLogger;
use noise_common::overlay::OverlayData;
use noise_common::{EscalationState, IdleResetTask, ImageSet, Monitor, MonitorConfig, NoiseSampler};

use crate::render::{Command, Renderer};

fn main() -> anyhow::Result<()> {
    MonitorLogger::init(MonitorLogger::default_level()).context("failed to install logger")?;

    let config = MonitorConfig::from_executable_dir().context("failed to locate image directory")?;
    let images = ImageSet::load(&config.image_dir)?;

    #[cfg(feature = "hardware")]
    let source = hardware::open_microphone()?;
    #[cfg(not(feature = "hardware"))]
    let source = noise_common::signal::SimulatedMicrophone::new();

    let state = EscalationState::shared(config.debounce);
    let reset_task =
        IdleResetTask::spawn(state.clone(), config.idle_reset_period).context("failed to start idle reset task")?;

    let sampler = NoiseSampler::new(source, config.calibration);
    let mut monitor = Monitor::new(sampler, state, config.max_consecutive_failures);
    let mut renderer = Renderer::new(images);
    let mut show_overlay = false;

    info!("System started");

    let result = loop {
        let now = Instant::now();
        let outcome = match monitor.step(now) {
            Ok(outcome) => outcome,
            Err(err) => break Err(err),
        };

        let overlay = show_overlay.then(|| OverlayData {
            reading: outcome.reading,
            displayed: outcome.displayed,
            pending: monitor.state().lock().debounce_progress(now),
        });
        renderer.draw_frame(outcome.displayed, overlay.as_ref());

        match renderer.wait_key(config.poll_interval) {
            Some(Command::Quit) => break Ok(()),
            Some(Command::ToggleOverlay) => {
                show_overlay = !show_overlay;
                info!("Overlay {}", if show_overlay { "on" } else { "off" });
            }
            None => {}
        }
    };

    let cycles = reset_task.stop();
    info!("Shut down after {cycles} idle resets");
    result.map_err(Into::into)
}
