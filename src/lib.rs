//! Canvas Demos - interactive visual demos for a portfolio projects page
//!
//! Core modules:
//! - `data`: Deterministic synthetic datasets (scatter points, stitch patterns)
//! - `store`: Per-demo reactive state stores with named actions
//! - `sim`: Particle simulation (emitter and repulsion fields)
//! - `projection`: Filtering, domains, scales and density binning
//! - `renderer`: 2D surface abstraction and scene painters
//! - `platform`: Frame scheduling and browser glue
//! - `api`: Simulated latency backend and query cache for the table demo
//! - `demos`: Composition roots wiring a store, a model and a painter together

pub mod api;
pub mod data;
pub mod demos;
pub mod error;
pub mod platform;
pub mod projection;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod store;

pub use error::{DemoError, Result};
pub use settings::{RangeLimits, Settings};

/// Shared tuning constants
pub mod consts {
    /// Converts elapsed milliseconds into simulation steps (not physical units)
    pub const TIME_SCALE: f32 = 0.06;

    /// Particles added per pointer move in emitter mode
    pub const SPAWN_BURST: usize = 5;

    /// Pointer influence radius in repulsion mode (pixels)
    pub const POINTER_RADIUS: f32 = 60.0;
    /// Fraction of the particle/pointer offset applied per tick
    pub const POINTER_PULL: f32 = 0.02;

    /// Surface used when a repulsion canvas has not been laid out yet
    pub const FALLBACK_WIDTH: f32 = 300.0;
    pub const FALLBACK_HEIGHT: f32 = 150.0;

    /// Chart padding around the plotting rectangle (pixels)
    pub const CHART_PADDING: f64 = 26.0;
    /// Scatter/density canvas height and minimum width
    pub const CHART_HEIGHT: f64 = 220.0;
    pub const CHART_MIN_WIDTH: f64 = 260.0;

    /// Scatter marker radius range (pixels)
    pub const MARKER_MIN_RADIUS: f64 = 3.0;
    pub const MARKER_RADIUS_SPAN: f64 = 8.0;

    /// Modulus used when bumping the seed on regeneration
    pub const SEED_BUMP_MODULUS: usize = 97;
}

/// Clamp helper that tolerates an inverted range by preferring `max`
#[inline]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Parse an integer control value, ignoring surrounding whitespace
///
/// Returns `None` for anything that is not a base-10 integer so callers can
/// keep their previous value.
pub fn parse_control_int(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok()
}

/// Parse a floating point control value; non-finite input is rejected
pub fn parse_control_float(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a toggle control value (`on`/`off`, `true`/`false`, `1`/`0`)
pub fn parse_control_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "1" | "enabled" => Some(true),
        "off" | "false" | "0" | "disabled" => Some(false),
        _ => None,
    }
}
