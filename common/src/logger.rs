//! `log` backend for the noise monitor.
//!
//! Every enabled record goes to stderr with the time since startup. Records
//! at `Info` and above are also kept in a small ring buffer that the display
//! overlay draws, so escalations and resets are visible on screen.
//!
//! # Usage
//!
//! ```ignore
//! MonitorLogger::init(LevelFilter::Info)?;
//! log::info!("System started");
//!
//! logger::with_recent(|log| {
//!     for line in log.iter() {
//!         println!("{line}");
//!     }
//! });
//! ```

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use heapless::{Deque, String};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, set_logger, set_max_level};
use parking_lot::Mutex;

// =============================================================================
// Debug Log Configuration
// =============================================================================

/// Maximum number of log lines to keep in the ring buffer.
pub const LOG_BUFFER_SIZE: usize = 6;

/// Maximum characters per log line.
pub const LOG_LINE_LENGTH: usize = 48;

// =============================================================================
// Debug Log Ring Buffer
// =============================================================================

/// Ring buffer for recent log messages.
///
/// Stores the last `LOG_BUFFER_SIZE` messages. Old messages are dropped when
/// the buffer is full, long ones are truncated.
pub struct DebugLog {
    buffer: Deque<(Level, String<LOG_LINE_LENGTH>), LOG_BUFFER_SIZE>,
}

impl DebugLog {
    pub const fn new() -> Self { Self { buffer: Deque::new() } }

    /// Push a message. If the buffer is full, the oldest message is dropped.
    pub fn push(
        &mut self,
        level: Level,
        msg: &str,
    ) {
        if self.buffer.is_full() {
            self.buffer.pop_front();
        }

        let mut line: String<LOG_LINE_LENGTH> = String::new();
        for c in msg.chars() {
            if line.push(c).is_err() {
                break;
            }
        }

        self.buffer.push_back((level, line)).ok();
    }

    /// Iterate over messages, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = (Level, &str)> {
        self.buffer.iter().map(|(level, line)| (*level, line.as_str()))
    }

    #[inline]
    pub fn len(&self) -> usize { self.buffer.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.buffer.is_empty() }
}

impl Default for DebugLog {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Logger
// =============================================================================

static RECENT: Mutex<DebugLog> = parking_lot::const_mutex(DebugLog::new());
static STARTED: OnceLock<Instant> = OnceLock::new();
static LOGGER: MonitorLogger = MonitorLogger;

/// Stderr logger that mirrors `Info` and above into [`DebugLog`].
pub struct MonitorLogger;

impl MonitorLogger {
    /// Install as the global logger.
    pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        STARTED.get_or_init(Instant::now);
        set_logger(&LOGGER)?;
        set_max_level(level);
        Ok(())
    }

    /// `Debug` in debug builds, `Info` in release builds.
    pub const fn default_level() -> LevelFilter {
        if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

impl Log for MonitorLogger {
    fn enabled(
        &self,
        metadata: &Metadata<'_>,
    ) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(
        &self,
        record: &Record<'_>,
    ) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed = STARTED.get_or_init(Instant::now).elapsed().as_secs_f32();
        let _ = writeln!(
            std::io::stderr().lock(),
            "[{elapsed:>9.3}s {:<5} {}] {}",
            record.level(),
            record.target(),
            record.args()
        );

        if record.level() <= Level::Info {
            RECENT.lock().push(record.level(), &record.args().to_string());
        }
    }

    fn flush(&self) { let _ = std::io::stderr().flush(); }
}

/// Run `f` with the recent log lines.
pub fn with_recent<R>(f: impl FnOnce(&DebugLog) -> R) -> R { f(&RECENT.lock()) }

// =============================================================================
// Tests
// =============================================================================
