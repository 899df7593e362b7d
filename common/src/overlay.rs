//! Diagnostic overlay drawn on top of the warning image.
//!
//! Toggled with `D`. The top band shows the current level, the severity on
//! screen and the debounce progress of whatever is pending; the bottom band
//! shows the most recent `Info`+ log lines.

use core::fmt::Write;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;
use heapless::String;
use log::Level;

use crate::colors::{BLACK, DARK_GRAY, GREEN, RED, WHITE, YELLOW};
use crate::config::{CENTER_X, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::logger::{DebugLog, LOG_BUFFER_SIZE};
use crate::sampler::Reading;
use crate::styles::{CENTERED, LABEL_FONT, LABEL_STYLE_WHITE, LEFT_ALIGNED, RIGHT_ALIGNED, VALUE_STYLE_WHITE};
use crate::thresholds::Severity;

// =============================================================================
// Layout Constants
// =============================================================================

const TOP_BAND_HEIGHT: u32 = 62;
const VALUE_POS: Point = Point::new(CENTER_X, 28);
const STATUS_Y: i32 = 46;
const STATUS_LEFT_POS: Point = Point::new(6, STATUS_Y);
const STATUS_RIGHT_POS: Point = Point::new(SCREEN_WIDTH as i32 - 6, STATUS_Y);
const PROGRESS_POS: Point = Point::new(0, 54);
const PROGRESS_HEIGHT: u32 = 4;

const LOG_LINE_HEIGHT: i32 = 12;
const LOG_BAND_HEIGHT: u32 = LOG_BUFFER_SIZE as u32 * LOG_LINE_HEIGHT as u32 + 6;
const LOG_BAND_Y: i32 = (SCREEN_HEIGHT - LOG_BAND_HEIGHT) as i32;
const LOG_X: i32 = 6;

const BLACK_FILL: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_fill(BLACK);
const TRACK_FILL: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_fill(DARK_GRAY);

/// Everything the overlay shows for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OverlayData {
    pub reading: Option<Reading>,
    pub displayed: Option<Severity>,
    pub pending: Option<(Severity, f32)>,
}

pub fn draw_overlay<D>(
    display: &mut D,
    data: &OverlayData,
    log: &DebugLog,
) where
    D: DrawTarget<Color = Rgb565>,
{
    draw_status_band(display, data);
    draw_log_band(display, log);
}

fn draw_status_band<D>(
    display: &mut D,
    data: &OverlayData,
) where
    D: DrawTarget<Color = Rgb565>,
{
    Rectangle::new(Point::zero(), Size::new(SCREEN_WIDTH, TOP_BAND_HEIGHT))
        .into_styled(BLACK_FILL)
        .draw(display)
        .ok();

    let mut value: String<16> = String::new();
    match data.reading {
        Some(reading) => {
            let _ = write!(value, "{:.1} dBA", reading.level);
        }
        None => {
            let _ = value.push_str("-- dBA");
        }
    }
    Text::with_text_style(&value, VALUE_POS, VALUE_STYLE_WHITE, CENTERED)
        .draw(display)
        .ok();

    let mut showing: String<24> = String::new();
    let showing_color = match data.displayed {
        Some(severity) => {
            let _ = write!(showing, "SHOWING {}", severity.label());
            severity.color()
        }
        None => {
            let _ = showing.push_str("SHOWING none");
            WHITE
        }
    };
    Text::with_text_style(
        &showing,
        STATUS_LEFT_POS,
        MonoTextStyle::new(LABEL_FONT, showing_color),
        LEFT_ALIGNED,
    )
    .draw(display)
    .ok();

    Rectangle::new(PROGRESS_POS, Size::new(SCREEN_WIDTH, PROGRESS_HEIGHT))
        .into_styled(TRACK_FILL)
        .draw(display)
        .ok();

    if let Some((severity, progress)) = data.pending {
        let mut pending: String<24> = String::new();
        let _ = write!(pending, "{} {:>3.0}%", severity.label(), progress * 100.0);
        Text::with_text_style(&pending, STATUS_RIGHT_POS, LABEL_STYLE_WHITE, RIGHT_ALIGNED)
            .draw(display)
            .ok();

        let filled = progress_width(progress);
        if filled > 0 {
            Rectangle::new(PROGRESS_POS, Size::new(filled, PROGRESS_HEIGHT))
                .into_styled(PrimitiveStyle::with_fill(severity.color()))
                .draw(display)
                .ok();
        }
    }
}

fn draw_log_band<D>(
    display: &mut D,
    log: &DebugLog,
) where
    D: DrawTarget<Color = Rgb565>,
{
    Rectangle::new(Point::new(0, LOG_BAND_Y), Size::new(SCREEN_WIDTH, LOG_BAND_HEIGHT))
        .into_styled(BLACK_FILL)
        .draw(display)
        .ok();
    Line::new(Point::new(0, LOG_BAND_Y), Point::new(SCREEN_WIDTH as i32 - 1, LOG_BAND_Y))
        .into_styled(PrimitiveStyle::with_stroke(DARK_GRAY, 1))
        .draw(display)
        .ok();

    for (i, (level, line)) in log.iter().enumerate() {
        let y = LOG_BAND_Y + 12 + i as i32 * LOG_LINE_HEIGHT;
        let style = MonoTextStyle::new(LABEL_FONT, level_color(level));
        Text::with_text_style(line, Point::new(LOG_X, y), style, LEFT_ALIGNED)
            .draw(display)
            .ok();
    }
}

/// Width in pixels of the debounce progress fill.
fn progress_width(progress: f32) -> u32 { (progress.clamp(0.0, 1.0) * SCREEN_WIDTH as f32) as u32 }

const fn level_color(level: Level) -> Rgb565 {
    match level {
        Level::Error => RED,
        Level::Warn => YELLOW,
        Level::Info => GREEN,
        Level::Debug | Level::Trace => WHITE,
    }
}

#[cfg(test)]
mod tests {
    use embedded_graphics::mock_display::MockDisplay;

    use super::*;

    #[test]
    fn test_progress_width_bounds() {
        assert_eq!(progress_width(0.0), 0);
        assert_eq!(progress_width(0.5), SCREEN_WIDTH / 2);
        assert_eq!(progress_width(1.0), SCREEN_WIDTH);
        assert_eq!(progress_width(2.0), SCREEN_WIDTH);
        assert_eq!(progress_width(-1.0), 0);
    }

    #[test]
    fn test_log_band_fits_screen() {
        assert!(LOG_BAND_Y > TOP_BAND_HEIGHT as i32);
        assert_eq!(LOG_BAND_Y + LOG_BAND_HEIGHT as i32, SCREEN_HEIGHT as i32);
    }

    #[test]
    fn test_level_colors() {
        assert_eq!(level_color(Level::Error), RED);
        assert_eq!(level_color(Level::Warn), YELLOW);
        assert_eq!(level_color(Level::Info), GREEN);
    }

    #[test]
    fn test_progress_fill_uses_severity_color() {
        let mut display: MockDisplay<Rgb565> = MockDisplay::new();
        display.set_allow_out_of_bounds_drawing(true);
        display.set_allow_overdraw(true);

        let data = OverlayData {
            reading: None,
            displayed: None,
            pending: Some((Severity::Red, 0.1)),
        };
        draw_status_band(&mut display, &data);
        // 10% of 320 = 32px, MockDisplay is 64x64
        assert_eq!(display.get_pixel(Point::new(0, PROGRESS_POS.y)), Some(RED));
        assert_eq!(display.get_pixel(Point::new(40, PROGRESS_POS.y)), Some(DARK_GRAY));
    }
}
