//! Per-frame particle advance
//!
//! One call per scheduled frame. Order within a frame is fixed:
//! integrate, then apply the boundary policy, then the pointer influence.

use glam::Vec2;

use super::state::{Bounds, BoundaryPolicy, Particle, ParticleField, PointerResponse};
use crate::consts::*;

/// Inputs for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Current drawing-surface extent
    pub bounds: Bounds,
    /// Pointer position in surface coordinates, if the pointer is over it
    pub pointer: Option<Vec2>,
}

/// Advance `field` by `elapsed_ms`
///
/// Disabled fields do not move. Negative elapsed time is treated as zero.
pub fn tick(field: &mut ParticleField, input: &TickInput, elapsed_ms: f32) {
    if !field.flags.enabled {
        return;
    }

    let step = elapsed_ms.max(0.0) * TIME_SCALE;
    for p in &mut field.particles {
        p.pos += p.vel * step;
    }

    match field.policy {
        BoundaryPolicy::Remove => {
            let bounds = input.bounds;
            let before = field.particles.len();
            field.particles.retain(|p| !bounds.has_left(p.pos));
            let removed = before - field.particles.len();
            if removed > 0 {
                log::trace!("removed {removed} particles");
            }
        }
        BoundaryPolicy::Reflect => {
            for p in &mut field.particles {
                reflect(p, input.bounds);
            }
            let pointer = if field.flags.interaction_enabled {
                input.pointer
            } else {
                None
            };
            if let Some(pointer) = pointer {
                let response = field.pointer_response;
                for p in &mut field.particles {
                    p.pos += pointer_offset(p.pos, pointer, response);
                }
            }
        }
    }
}

impl ParticleField {
    /// Convenience wrapper over [`tick`]
    pub fn advance(&mut self, elapsed_ms: f32, bounds: Bounds, pointer: Option<Vec2>) {
        tick(self, &TickInput { bounds, pointer }, elapsed_ms);
    }
}

/// Flip the velocity on any axis where the particle is outside and still heading out
///
/// A particle that overshoots is flipped once; on the next frame it is moving
/// back inward and is left alone until it crosses again.
fn reflect(p: &mut Particle, bounds: Bounds) {
    if (p.pos.x < 0.0 && p.vel.x < 0.0) || (p.pos.x > bounds.width && p.vel.x > 0.0) {
        p.vel.x = -p.vel.x;
    }
    if (p.pos.y < 0.0 && p.vel.y < 0.0) || (p.pos.y > bounds.height && p.vel.y > 0.0) {
        p.vel.y = -p.vel.y;
    }
}

/// Displacement the pointer applies to a particle at `pos` in one frame
pub fn pointer_offset(pos: Vec2, pointer: Vec2, response: PointerResponse) -> Vec2 {
    let to_pointer = pointer - pos;
    if to_pointer.length() < POINTER_RADIUS {
        to_pointer * POINTER_PULL * response.sign()
    } else {
        Vec2::ZERO
    }
}
