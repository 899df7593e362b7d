//! Application configuration constants.
//!
//! All tunables are compile-time constants with ordering assertions, bundled
//! into [`MonitorConfig`] for code that wants them at runtime (tests shrink
//! the durations rather than waiting out half an hour).

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crate::sampler::Calibration;

// =============================================================================
// Timing Configuration
// =============================================================================

/// A matched severity must hold continuously for this long before it is shown.
pub const DEBOUNCE_DURATION: Duration = Duration::from_secs(3);

/// The displayed warning is cleared on this fixed period, counted from startup.
pub const IDLE_RESET_PERIOD: Duration = Duration::from_secs(1800);

/// Key poll timeout per loop iteration. Sets the ~10 Hz sampling cadence.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Consecutive failed voltage reads tolerated before the loop gives up.
pub const MAX_CONSECUTIVE_READ_FAILURES: u32 = 5;

const _: () = assert!(POLL_INTERVAL.as_millis() < DEBOUNCE_DURATION.as_millis());
const _: () = assert!(DEBOUNCE_DURATION.as_secs() < IDLE_RESET_PERIOD.as_secs());
const _: () = assert!(MAX_CONSECUTIVE_READ_FAILURES > 0);

// =============================================================================
// Microphone Calibration
// =============================================================================

/// Voltage that maps to `LEVEL_OFFSET` dBA.
pub const V_LOW: f32 = 0.6;

/// Voltage that maps to `LEVEL_OFFSET + 100` dBA.
pub const V_HIGH: f32 = 2.6;

/// dBA value at `V_LOW`.
pub const LEVEL_OFFSET: f32 = 30.0;

/// Lower clamp for the computed level.
pub const LEVEL_MIN: f32 = 0.0;

/// Upper clamp for the computed level.
pub const LEVEL_MAX: f32 = 130.0;

const _: () = assert!(V_LOW < V_HIGH);
const _: () = assert!(LEVEL_MIN < LEVEL_MAX);

// =============================================================================
// Display Configuration
// =============================================================================

/// Window width in pixels. Also the width of the blank frame.
pub const SCREEN_WIDTH: u32 = 320;

/// Window height in pixels.
pub const SCREEN_HEIGHT: u32 = 240;

/// Screen center X coordinate.
pub const CENTER_X: i32 = (SCREEN_WIDTH / 2) as i32;

/// Screen center Y coordinate.
pub const CENTER_Y: i32 = (SCREEN_HEIGHT / 2) as i32;

/// Title of the display window.
pub const WINDOW_TITLE: &str = "Noise Level Display";

/// Directory holding the warning images, next to the executable.
pub const IMAGE_DIR_NAME: &str = "Images";

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Runtime view of the constants above.
#[derive(Clone, Debug, PartialEq)]
pub struct MonitorConfig {
    pub debounce: Duration,
    pub idle_reset_period: Duration,
    pub poll_interval: Duration,
    pub max_consecutive_failures: u32,
    pub calibration: Calibration,
    pub image_dir: PathBuf,
}

impl MonitorConfig {
    /// Configuration with the image directory resolved next to the executable.
    pub fn from_executable_dir() -> io::Result<Self> {
        Ok(Self {
            image_dir: default_image_dir()?,
            ..Self::default()
        })
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            debounce: DEBOUNCE_DURATION,
            idle_reset_period: IDLE_RESET_PERIOD,
            poll_interval: POLL_INTERVAL,
            max_consecutive_failures: MAX_CONSECUTIVE_READ_FAILURES,
            calibration: Calibration::default(),
            image_dir: PathBuf::from(IMAGE_DIR_NAME),
        }
    }
}

/// `Images/` in the directory containing the running executable.
pub fn default_image_dir() -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let dir = exe
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "executable has no parent directory"))?;
    Ok(dir.join(IMAGE_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_constants() {
        let config = MonitorConfig::default();
        assert_eq!(config.debounce, Duration::from_secs(3));
        assert_eq!(config.idle_reset_period, Duration::from_secs(1800));
        assert_eq!(config.poll_interval, Duration::from_millis(100));
        assert_eq!(config.image_dir, PathBuf::from("Images"));
    }

    #[test]
    fn test_image_dir_is_next_to_executable() {
        let config = MonitorConfig::from_executable_dir().unwrap();
        assert!(config.image_dir.ends_with(IMAGE_DIR_NAME));
        let exe_dir = std::env::current_exe().unwrap().parent().unwrap().to_path_buf();
        assert_eq!(config.image_dir.parent(), Some(exe_dir.as_path()));
    }

    #[test]
    fn test_center_is_half_screen() {
        assert_eq!(CENTER_X, 160);
        assert_eq!(CENTER_Y, 120);
    }
}
