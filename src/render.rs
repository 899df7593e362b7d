//! Window output and key polling.
//!
//! Wraps the simulator display and window. Each frame is either the blank
//! 320x240 black frame or the current warning image centered on black, with
//! the overlay optionally drawn on top.

use std::thread;
use std::time::{Duration, Instant};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use noise_common::colors::BLACK;
use noise_common::config::{SCREEN_HEIGHT, SCREEN_WIDTH, WINDOW_TITLE};
use noise_common::overlay::{OverlayData, draw_overlay};
use noise_common::{ImageSet, Severity, logger};

/// How often `wait_key` checks for events while blocking.
const EVENT_SLICE: Duration = Duration::from_millis(10);

/// User input surfaced by [`Renderer::wait_key`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    ToggleOverlay,
}

pub struct Renderer {
    display: SimulatorDisplay<Rgb565>,
    window: Window,
    images: ImageSet,
}

impl Renderer {
    pub fn new(images: ImageSet) -> Self {
        let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
        let output_settings = OutputSettingsBuilder::new().scale(2).build();
        let mut window = Window::new(WINDOW_TITLE, &output_settings);

        display.clear(BLACK).ok();
        window.update(&display);

        Self {
            display,
            window,
            images,
        }
    }

    /// Draw the frame for `displayed` and push it to the window.
    pub fn draw_frame(
        &mut self,
        displayed: Option<Severity>,
        overlay: Option<&OverlayData>,
    ) {
        self.display.clear(BLACK).ok();

        if let Some(severity) = displayed {
            let image = self.images.get(severity);
            let top_left = image.centered_in(self.display.size());
            image.draw_at(&mut self.display, top_left).ok();
        }

        if let Some(data) = overlay {
            logger::with_recent(|log| draw_overlay(&mut self.display, data, log));
        }

        self.window.update(&self.display);
    }

    /// Block for up to `timeout`, returning early on a recognised key.
    pub fn wait_key(
        &mut self,
        timeout: Duration,
    ) -> Option<Command> {
        let deadline = Instant::now() + timeout;
        loop {
            for ev in self.window.events() {
                match ev {
                    SimulatorEvent::Quit => return Some(Command::Quit),
                    SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                        if repeat {
                            continue;
                        }
                        match keycode {
                            Keycode::Q => return Some(Command::Quit),
                            Keycode::D => return Some(Command::ToggleOverlay),
                            _ => {}
                        }
                    }
                    _ => {}
                }
            }

            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            thread::sleep(EVENT_SLICE.min(deadline - now));
        }
    }
}
