//! Repulsion: a persistent field that bounces off the edges and reacts to the pointer

use glam::Vec2;

use super::Demo;
use crate::error::Result;
use crate::renderer::{Color, Surface, scene};
use crate::settings::RepulsionSettings;
use crate::sim::{BoundaryPolicy, Bounds, ParticleField, PointerResponse};
use crate::store::{ParticleState, Store};

pub struct RepulsionDemo {
    store: Store<ParticleState>,
    field: ParticleField,
    pointer: Option<Vec2>,
    /// Surface size and count the field was last seeded for
    seeded_for: Option<(Bounds, usize)>,
}

impl RepulsionDemo {
    pub fn new(settings: &RepulsionSettings) -> Self {
        let response = if settings.attract {
            PointerResponse::Attract
        } else {
            PointerResponse::Repel
        };
        Self {
            store: Store::new(ParticleState::from_settings(settings)),
            field: ParticleField::new(BoundaryPolicy::Reflect, settings.rng_seed).with_pointer_response(response),
            pointer: None,
            seeded_for: None,
        }
    }

    pub fn store(&self) -> &Store<ParticleState> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store<ParticleState> {
        &mut self.store
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Re-seed when the surface size or the requested count changed
    fn sync_field(&mut self, bounds: Bounds) {
        let count = self.store.state().particle_count;
        if self.seeded_for == Some((bounds, count)) {
            return;
        }
        self.field.seed(bounds.or_fallback(), count);
        self.seeded_for = Some((bounds, count));
    }
}

impl Default for RepulsionDemo {
    fn default() -> Self {
        Self::new(&RepulsionSettings::default())
    }
}

impl Demo for RepulsionDemo {
    fn name(&self) -> &'static str {
        "repulsion"
    }

    fn resize(&mut self, width: f64, height: f64) -> (f64, f64) {
        (width, height)
    }

    fn pointer_move(&mut self, x: f64, y: f64) {
        if self.store.state().interaction_enabled {
            self.pointer = Some(Vec2::new(x as f32, y as f32));
        }
    }

    fn pointer_leave(&mut self) {
        self.pointer = None;
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
            "particle_count" => {
                self.store.set_particle_count_text(value);
                true
            }
            _ => false,
        }
    }

    fn frame(&mut self, elapsed_ms: f64, surface: &mut dyn Surface) -> Result<()> {
        let (w, h) = surface.size();
        let bounds = Bounds::new(w as f32, h as f32);
        self.sync_field(bounds);

        let flags = self.store.state().flags();
        self.field.flags = flags;
        self.field.advance(elapsed_ms as f32, bounds.or_fallback(), self.pointer);
        scene::draw_particles(surface, &self.field.particles, Color::BLACK, flags.enabled);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RecordingSurface;

    #[test]
    fn test_first_frame_seeds_default_count() {
        let mut demo = RepulsionDemo::default();
        let mut surface = RecordingSurface::new(400.0, 200.0);
        demo.frame(0.0, &mut surface).unwrap();
        assert_eq!(demo.field().len(), 100);
        assert_eq!(surface.circles().count(), 100);
        assert!(surface.circles().all(|(_, _, c)| c == Color::BLACK));
    }

    #[test]
    fn test_count_change_reseeds() {
        let mut demo = RepulsionDemo::default();
        let mut surface = RecordingSurface::new(400.0, 200.0);
        demo.frame(16.0, &mut surface).unwrap();
        assert!(demo.control("particle_count", "250"));
        demo.frame(16.0, &mut surface).unwrap();
        assert_eq!(demo.field().len(), 250);

        demo.control("particle_count", "many");
        demo.frame(16.0, &mut surface).unwrap();
        assert_eq!(demo.field().len(), 250);

        demo.control("particle_count", "5");
        demo.frame(16.0, &mut surface).unwrap();
        assert_eq!(demo.field().len(), 20);
    }

    #[test]
    fn test_zero_surface_seeds_fallback() {
        let mut demo = RepulsionDemo::default();
        let mut surface = RecordingSurface::default();
        demo.frame(16.0, &mut surface).unwrap();
        assert_eq!(demo.field().len(), 100);
        assert!(demo.field().particles.iter().all(|p| p.pos.x <= 301.0 && p.pos.y <= 151.0));
        assert_eq!(surface.frames(), 0);
    }

    #[test]
    fn test_pointer_tracking() {
        let mut demo = RepulsionDemo::default();
        demo.pointer_move(10.0, 20.0);
        assert_eq!(demo.pointer(), Some(Vec2::new(10.0, 20.0)));
        demo.pointer_leave();
        assert_eq!(demo.pointer(), None);

        demo.control("interaction", "off");
        demo.pointer_move(10.0, 20.0);
        assert_eq!(demo.pointer(), None);
    }

    #[test]
    fn test_disabled_clears_without_drawing() {
        let mut demo = RepulsionDemo::default();
        let mut surface = RecordingSurface::new(400.0, 200.0);
        demo.control("enabled", "off");
        demo.frame(16.0, &mut surface).unwrap();
        assert_eq!(surface.frames(), 1);
        assert_eq!(surface.circles().count(), 0);
    }
}
