//! Particle records and the field that owns them

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A single particle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Always > 0
    pub radius: f32,
}

/// Drawing-surface extent the particles live in
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Substitute the default canvas extent for unset axes
    pub fn or_fallback(self) -> Self {
        Self {
            width: if self.width > 0.0 { self.width } else { FALLBACK_WIDTH },
            height: if self.height > 0.0 { self.height } else { FALLBACK_HEIGHT },
        }
    }

    /// Removal test for emitter particles (top edge is open)
    pub fn has_left(&self, pos: Vec2) -> bool {
        pos.y > self.height || pos.x < 0.0 || pos.x > self.width
    }
}

/// What happens at the surface edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryPolicy {
    /// Emitter: particles that leave are dropped
    Remove,
    /// Repulsion: particles bounce and live forever
    Reflect,
}

/// Direction of the pointer influence in reflect mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PointerResponse {
    /// Pull toward the pointer
    #[default]
    Attract,
    /// Push away from the pointer
    Repel,
}

impl PointerResponse {
    pub fn sign(self) -> f32 {
        match self {
            PointerResponse::Attract => 1.0,
            PointerResponse::Repel => -1.0,
        }
    }
}

/// Flags mirrored from the demo's store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimFlags {
    pub enabled: bool,
    pub interaction_enabled: bool,
}

impl Default for SimFlags {
    fn default() -> Self {
        Self {
            enabled: true,
            interaction_enabled: true,
        }
    }
}

/// A demo's live particle collection
#[derive(Debug, Clone)]
pub struct ParticleField {
    pub particles: Vec<Particle>,
    pub policy: BoundaryPolicy,
    pub pointer_response: PointerResponse,
    pub flags: SimFlags,
    rng: Pcg32,
}

impl ParticleField {
    pub fn new(policy: BoundaryPolicy, seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            policy,
            pointer_response: PointerResponse::default(),
            flags: SimFlags::default(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn with_pointer_response(mut self, response: PointerResponse) -> Self {
        self.pointer_response = response;
        self
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Emit a burst at `at`; returns how many particles were added
    ///
    /// Nothing is spawned while interaction is disabled.
    pub fn spawn(&mut self, at: Vec2) -> usize {
        if !self.flags.interaction_enabled {
            return 0;
        }
        self.particles.reserve(SPAWN_BURST);
        for _ in 0..SPAWN_BURST {
            let vx = (self.rng.random::<f32>() - 0.5) * 2.0;
            let vy = self.rng.random::<f32>() * 2.0 + 1.0;
            let radius = 1.0 + self.rng.random::<f32>() * 2.0;
            self.particles.push(Particle {
                pos: at,
                vel: Vec2::new(vx, vy),
                radius,
            });
        }
        SPAWN_BURST
    }

    /// Replace the collection with `count` particles spread over `bounds`
    pub fn seed(&mut self, bounds: Bounds, count: usize) {
        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            let x = self.rng.random::<f32>() * bounds.width;
            let y = self.rng.random::<f32>() * bounds.height;
            let vx = (self.rng.random::<f32>() - 0.5) * 0.5;
            let vy = (self.rng.random::<f32>() - 0.5) * 0.5;
            let radius = 1.0 + self.rng.random::<f32>() * 2.0;
            self.particles.push(Particle {
                pos: Vec2::new(x, y),
                vel: Vec2::new(vx, vy),
                radius,
            });
        }
        log::debug!(
            "seeded {} particles over {}x{}",
            count,
            bounds.width,
            bounds.height
        );
    }
}
