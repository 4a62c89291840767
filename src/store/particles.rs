//! Particle demo state (repulsion and emitter fields)

use super::Store;
use crate::settings::{EmitterSettings, RangeLimits, RepulsionSettings};
use crate::sim::SimFlags;

/// Repulsion field controls
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleState {
    pub enabled: bool,
    pub particle_count: usize,
    pub interaction_enabled: bool,
    pub count_limits: RangeLimits,
}

impl ParticleState {
    pub fn from_settings(settings: &RepulsionSettings) -> Self {
        let limits = settings.particle_count_limits;
        Self {
            enabled: true,
            particle_count: limits.clamp_count(settings.particle_count as i64),
            interaction_enabled: true,
            count_limits: limits,
        }
    }

    pub fn flags(&self) -> SimFlags {
        SimFlags {
            enabled: self.enabled,
            interaction_enabled: self.interaction_enabled,
        }
    }
}

impl Default for ParticleState {
    fn default() -> Self {
        Self::from_settings(&RepulsionSettings::default())
    }
}

impl Store<ParticleState> {
    pub fn set_enabled(&mut self, enabled: bool) {
        self.update(|s| s.enabled = enabled);
    }

    pub fn toggle_enabled(&mut self) {
        self.update(|s| s.enabled = !s.enabled);
    }

    pub fn set_interaction_enabled(&mut self, enabled: bool) {
        self.update(|s| s.interaction_enabled = enabled);
    }

    pub fn toggle_interaction(&mut self) {
        self.update(|s| s.interaction_enabled = !s.interaction_enabled);
    }

    /// Set the particle count, clamped to the slider range
    pub fn set_particle_count(&mut self, count: i64) {
        self.update(|s| s.particle_count = s.count_limits.clamp_count(count));
        log::debug!("particle count -> {}", self.state().particle_count);
    }

    /// Slider text input; unparseable text keeps the previous count
    pub fn set_particle_count_text(&mut self, text: &str) {
        match crate::parse_control_int(text) {
            Some(count) => self.set_particle_count(count),
            None => log::debug!("ignoring particle count input {text:?}"),
        }
    }
}

/// Emitter field controls
#[derive(Debug, Clone, PartialEq)]
pub struct EmitterState {
    pub enabled: bool,
    pub interaction_enabled: bool,
}

impl EmitterState {
    pub fn from_settings(settings: &EmitterSettings) -> Self {
        Self {
            enabled: settings.start_enabled,
            interaction_enabled: true,
        }
    }

    pub fn flags(&self) -> SimFlags {
        SimFlags {
            enabled: self.enabled,
            interaction_enabled: self.interaction_enabled,
        }
    }
}

impl Default for EmitterState {
    fn default() -> Self {
        Self::from_settings(&EmitterSettings::default())
    }
}

impl Store<EmitterState> {
    pub fn set_enabled(&mut self, enabled: bool) {
        self.update(|s| s.enabled = enabled);
    }

    pub fn set_interaction_enabled(&mut self, enabled: bool) {
        self.update(|s| s.interaction_enabled = enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_defaults() {
        let state = ParticleState::default();
        assert!(state.enabled);
        assert!(state.interaction_enabled);
        assert_eq!(state.particle_count, 100);
    }

    #[test]
    fn test_particle_count_clamped() {
        let mut store = Store::new(ParticleState::default());
        store.set_particle_count(5);
        assert_eq!(store.state().particle_count, 20);
        store.set_particle_count(9000);
        assert_eq!(store.state().particle_count, 400);
        store.set_particle_count(-3);
        assert_eq!(store.state().particle_count, 20);
    }

    #[test]
    fn test_particle_count_text_invalid_is_ignored() {
        let mut store = Store::new(ParticleState::default());
        store.set_particle_count_text("250");
        assert_eq!(store.state().particle_count, 250);
        let version = store.version();
        store.set_particle_count_text("lots");
        assert_eq!(store.state().particle_count, 250);
        assert_eq!(store.version(), version);
    }

    #[test]
    fn test_toggles() {
        let mut store = Store::new(ParticleState::default());
        store.toggle_enabled();
        store.toggle_interaction();
        assert_eq!(
            store.state().flags(),
            SimFlags {
                enabled: false,
                interaction_enabled: false
            }
        );
    }

    #[test]
    fn test_emitter_starts_idle() {
        let mut store = Store::new(EmitterState::default());
        assert!(!store.state().enabled);
        store.set_enabled(true);
        assert!(store.state().flags().enabled);
    }
}
