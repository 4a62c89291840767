//! Emitter: particles burst from the pointer and fall off the canvas

use glam::Vec2;

use super::Demo;
use crate::error::Result;
use crate::renderer::{Color, Surface, scene};
use crate::settings::EmitterSettings;
use crate::sim::{BoundaryPolicy, Bounds, ParticleField};
use crate::store::{EmitterState, Store};

pub struct EmitterDemo {
    store: Store<EmitterState>,
    field: ParticleField,
}

impl EmitterDemo {
    pub fn new(settings: &EmitterSettings) -> Self {
        let store = Store::new(EmitterState::from_settings(settings));
        let mut field = ParticleField::new(BoundaryPolicy::Remove, settings.rng_seed);
        field.flags = store.state().flags();
        Self { store, field }
    }

    pub fn store(&self) -> &Store<EmitterState> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store<EmitterState> {
        &mut self.store
    }

    pub fn particle_count(&self) -> usize {
        self.field.len()
    }
}

impl Default for EmitterDemo {
    fn default() -> Self {
        Self::new(&EmitterSettings::default())
    }
}

impl Demo for EmitterDemo {
    fn name(&self) -> &'static str {
        "emitter"
    }

    fn resize(&mut self, width: f64, height: f64) -> (f64, f64) {
        (width, height)
    }

    /// Any movement wakes the emitter, then spawns a burst at the pointer
    fn pointer_move(&mut self, x: f64, y: f64) {
        if !self.store.state().enabled {
            self.store.set_enabled(true);
        }
        self.field.flags = self.store.state().flags();
        self.field.spawn(Vec2::new(x as f32, y as f32));
    }

    fn control(&mut self, name: &str, value: &str) -> bool {
        match name {
            "enabled" => {
                if let Some(on) = crate::parse_control_bool(value) {
                    self.store.set_enabled(on);
                }
                true
            }
            "interaction" => {
                if let Some(on) = crate::parse_control_bool(value) {
                    self.store.set_interaction_enabled(on);
                }
                true
            }
            _ => false,
        }
    }

    fn frame(&mut self, elapsed_ms: f64, surface: &mut dyn Surface) -> Result<()> {
        let flags = self.store.state().flags();
        self.field.flags = flags;
        let (w, h) = surface.size();
        self.field.advance(elapsed_ms as f32, Bounds::new(w as f32, h as f32), None);
        scene::draw_particles(surface, &self.field.particles, Color::WHITE, flags.enabled);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RecordingSurface;

    #[test]
    fn test_pointer_move_enables_and_spawns() {
        let mut demo = EmitterDemo::default();
        assert!(!demo.store().state().enabled);
        demo.pointer_move(100.0, 100.0);
        assert!(demo.store().state().enabled);
        assert_eq!(demo.particle_count(), 5);
        demo.pointer_move(50.0, 50.0);
        assert_eq!(demo.particle_count(), 10);
        assert_eq!(demo.store().version(), 1);
    }

    #[test]
    fn test_interaction_off_spawns_nothing() {
        let mut demo = EmitterDemo::default();
        assert!(demo.control("interaction", "off"));
        demo.pointer_move(10.0, 10.0);
        assert_eq!(demo.particle_count(), 0);
        assert!(demo.store().state().enabled);
    }

    #[test]
    fn test_particles_fall_out() {
        let mut demo = EmitterDemo::default();
        let mut surface = RecordingSurface::new(200.0, 120.0);
        demo.pointer_move(100.0, 100.0);
        demo.frame(0.0, &mut surface).unwrap();
        assert_eq!(surface.circles().count(), 5);
        assert!(surface.circles().all(|(_, _, c)| c == Color::WHITE));

        // vy >= 1, so 100 steps of 100ms moves every particle at least 600px down
        for _ in 0..100 {
            demo.frame(100.0, &mut surface).unwrap();
        }
        assert_eq!(demo.particle_count(), 0);
        assert_eq!(surface.circles().count(), 0);
    }

    #[test]
    fn test_unknown_control() {
        let mut demo = EmitterDemo::default();
        assert!(!demo.control("particle_count", "10"));
        assert!(demo.control("enabled", "nonsense"));
        assert!(!demo.store().state().enabled);
    }
}
