//! Color constants for the noise display.
//!
//! Standard colors come from the `RgbColor` trait constants so they hit the
//! exact RGB565 extremes; the rest are hand-picked.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

// =============================================================================
// Standard Colors
// =============================================================================

/// Pure black. Blank frame and overlay backgrounds.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Pure white. Overlay text.
pub const WHITE: Rgb565 = Rgb565::WHITE;

/// Pure red. Red severity accent and error log lines.
pub const RED: Rgb565 = Rgb565::RED;

/// Pure green. Info log lines.
pub const GREEN: Rgb565 = Rgb565::GREEN;

/// Pure yellow. Warning log lines.
pub const YELLOW: Rgb565 = Rgb565::YELLOW;

/// Magenta. Extreme severity accent.
pub const PINK: Rgb565 = Rgb565::MAGENTA;

// =============================================================================
// Custom Colors
// =============================================================================

/// Amber severity accent.
/// RGB565: (31, 40, 0) - between orange and yellow.
pub const AMBER: Rgb565 = Rgb565::new(31, 40, 0);

/// Mid gray. Black severity accent (pure black would vanish on the overlay).
/// RGB565: (16, 32, 16) - roughly 50% brightness.
pub const GRAY: Rgb565 = Rgb565::new(16, 32, 16);

/// Dark gray for the debounce progress track.
/// RGB565: (8, 16, 8) - roughly 25% brightness.
pub const DARK_GRAY: Rgb565 = Rgb565::new(8, 16, 8);
