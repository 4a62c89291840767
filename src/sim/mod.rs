//! Particle simulation module
//!
//! Stylized motion, not physics:
//! - Position advances by `velocity * elapsed_ms * TIME_SCALE`
//! - Seeded RNG only, so a field is reproducible from its seed
//! - Stable iteration order (insertion order, removal preserves it)
//! - No rendering or platform dependencies

pub mod state;
pub mod tick;

pub use state::{Bounds, BoundaryPolicy, Particle, ParticleField, PointerResponse, SimFlags};
pub use tick::{TickInput, pointer_offset, tick};
