//! Centralized noise threshold configuration.
//!
//! Thresholds are compile-time constants with validation assertions. The
//! lookup table is stored highest threshold first, so the first entry a level
//! reaches is the one that applies.
//!
//! # Compile-Time Validation
//!
//! If thresholds are configured out of order (e.g., `RED_DB < AMBER_DB`),
//! compilation fails. The same ordering backs the derived `Ord` on
//! [`Severity`], so "more severe" and "higher threshold" never disagree.

use embedded_graphics::pixelcolor::Rgb565;

use crate::colors::{AMBER, GRAY, PINK, RED};

// =============================================================================
// Noise Thresholds (dBA)
// =============================================================================

/// Prolonged exposure warning (85-100 dBA = AMBER).
pub const AMBER_DB: f32 = 85.0;

/// Hearing protection required (100-115 dBA = RED).
pub const RED_DB: f32 = 100.0;

/// Short exposure only (115-120 dBA = BLACK).
pub const BLACK_DB: f32 = 115.0;

/// Immediate damage risk (>=120 dBA = EXTREME).
pub const EXTREME_DB: f32 = 120.0;

const _: () = assert!(AMBER_DB < RED_DB);
const _: () = assert!(RED_DB < BLACK_DB);
const _: () = assert!(BLACK_DB < EXTREME_DB);

// =============================================================================
// Severity
// =============================================================================

/// Warning severity, ordered from least to most severe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Amber,
    Red,
    Black,
    Extreme,
}

impl Severity {
    /// All severities, least severe first.
    pub const ALL: [Self; 4] = [Self::Amber, Self::Red, Self::Black, Self::Extreme];

    /// Lowest level (inclusive) that selects this severity.
    pub const fn threshold(self) -> f32 {
        match self {
            Self::Amber => AMBER_DB,
            Self::Red => RED_DB,
            Self::Black => BLACK_DB,
            Self::Extreme => EXTREME_DB,
        }
    }

    /// Lowercase label, also the image file stem.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Amber => "amber",
            Self::Red => "red",
            Self::Black => "black",
            Self::Extreme => "extreme",
        }
    }

    /// Accent color for the overlay.
    pub const fn color(self) -> Rgb565 {
        match self {
            Self::Amber => AMBER,
            Self::Red => RED,
            Self::Black => GRAY,
            Self::Extreme => PINK,
        }
    }

    /// Position in [`Severity::ALL`].
    #[inline]
    pub const fn index(self) -> usize { self as usize }
}

impl core::fmt::Display for Severity {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Threshold Table
// =============================================================================

/// Threshold table sorted by descending threshold, built once at compile time.
pub const SEVERITY_TABLE: [(f32, Severity); 4] = [
    (EXTREME_DB, Severity::Extreme),
    (BLACK_DB, Severity::Black),
    (RED_DB, Severity::Red),
    (AMBER_DB, Severity::Amber),
];

const _: () = assert!(SEVERITY_TABLE[0].0 > SEVERITY_TABLE[1].0);
const _: () = assert!(SEVERITY_TABLE[1].0 > SEVERITY_TABLE[2].0);
const _: () = assert!(SEVERITY_TABLE[2].0 > SEVERITY_TABLE[3].0);

/// Severity whose threshold `level` reaches, or `None` below `AMBER_DB`.
///
/// A level exactly on a threshold selects that threshold's severity.
#[inline]
pub fn severity_for_level(level: f32) -> Option<Severity> {
    SEVERITY_TABLE
        .iter()
        .find(|(threshold, _)| level >= *threshold)
        .map(|(_, severity)| *severity)
}

// =============================================================================
// Unit Tests
// =============================================================================
