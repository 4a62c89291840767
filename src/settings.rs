//! Demo configuration
//!
//! Supplied by the host page (or defaults). Kept in memory only.

use serde::{Deserialize, Serialize};

use crate::Result;

/// Inclusive bounds for a control
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeLimits {
    pub min: f64,
    pub max: f64,
}

impl RangeLimits {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp a value into these limits
    pub fn clamp(&self, value: f64) -> f64 {
        crate::clamp(value, self.min, self.max)
    }

    /// Clamp and round to the nearest integer step
    pub fn clamp_count(&self, value: i64) -> usize {
        self.clamp(value as f64).round().max(0.0) as usize
    }
}

/// Repulsion field defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepulsionSettings {
    pub particle_count: usize,
    pub particle_count_limits: RangeLimits,
    /// Seed for the particle RNG (spawn/seed randomness)
    pub rng_seed: u64,
    /// Pull particles toward the pointer (false pushes them away)
    pub attract: bool,
}

impl Default for RepulsionSettings {
    fn default() -> Self {
        Self {
            particle_count: 100,
            particle_count_limits: RangeLimits::new(20.0, 400.0),
            rng_seed: 0x5eed,
            attract: true,
        }
    }
}

/// Emitter field defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterSettings {
    /// Emitter starts idle and wakes on the first pointer move
    pub start_enabled: bool,
    pub rng_seed: u64,
}

impl Default for EmitterSettings {
    fn default() -> Self {
        Self {
            start_enabled: false,
            rng_seed: 0xe111,
        }
    }
}

/// Scatter/density chart defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterSettings {
    pub point_count: usize,
    pub seed: i32,
    pub value_limits: RangeLimits,
    pub cell_size_px: u32,
    pub cell_size_limits: RangeLimits,
}

impl Default for ScatterSettings {
    fn default() -> Self {
        Self {
            point_count: 650,
            seed: 1,
            value_limits: RangeLimits::new(0.0, 100.0),
            cell_size_px: 18,
            cell_size_limits: RangeLimits::new(8.0, 50.0),
        }
    }
}

/// Stitch pattern defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StitchSettings {
    pub initial_count: usize,
    pub seed: i32,
    pub amount: usize,
    pub amount_limits: RangeLimits,
    /// Count used by the "Regenerate" button
    pub regenerate_count: usize,
}

impl Default for StitchSettings {
    fn default() -> Self {
        Self {
            initial_count: 60,
            seed: 1,
            amount: 40,
            amount_limits: RangeLimits::new(3.0, 60.0),
            regenerate_count: 40,
        }
    }
}

/// Table demo and simulated backend defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    pub count: usize,
    pub seed: i32,
    /// Count used when the backend is initialised without parameters
    pub backend_default_count: usize,
    pub min_value_limits: RangeLimits,
    /// Injected latency window in milliseconds
    pub latency_min_ms: u32,
    pub latency_max_ms: u32,
    pub latency_seed: u64,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            count: 20,
            seed: 1,
            backend_default_count: 200,
            min_value_limits: RangeLimits::new(0.0, 100.0),
            latency_min_ms: 250,
            latency_max_ms: 800,
            latency_seed: 0x1a7e,
        }
    }
}

/// All demo settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub repulsion: RepulsionSettings,
    pub emitter: EmitterSettings,
    pub scatter: ScatterSettings,
    pub stitches: StitchSettings,
    pub table: TableSettings,
}

impl Settings {
    /// Parse host-supplied JSON; missing sections keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        log::debug!("Loaded settings from JSON");
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_control_ranges() {
        let s = Settings::default();
        assert_eq!(s.repulsion.particle_count_limits, RangeLimits::new(20.0, 400.0));
        assert_eq!(s.scatter.value_limits, RangeLimits::new(0.0, 100.0));
        assert_eq!(s.scatter.cell_size_limits, RangeLimits::new(8.0, 50.0));
        assert_eq!(s.stitches.amount_limits, RangeLimits::new(3.0, 60.0));
        assert_eq!(s.table.latency_min_ms, 250);
        assert_eq!(s.table.latency_max_ms, 800);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let s = Settings::from_json(r#"{"scatter": {"point_count": 10}}"#).unwrap();
        assert_eq!(s.scatter.point_count, 10);
        assert_eq!(s.scatter.cell_size_px, 18);
        assert_eq!(s.repulsion.particle_count, 100);
    }

    #[test]
    fn test_json_roundtrip_and_bad_json() {
        let json = Settings::default().to_json().unwrap();
        assert!(Settings::from_json(&json).is_ok());
        assert!(Settings::from_json("{").is_err());
    }

    #[test]
    fn test_clamp_count() {
        let limits = RangeLimits::new(20.0, 400.0);
        assert_eq!(limits.clamp_count(5), 20);
        assert_eq!(limits.clamp_count(1000), 400);
        assert_eq!(limits.clamp_count(123), 123);
    }
}
