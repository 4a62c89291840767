//! Demo composition roots
//!
//! Each demo owns its store, its model (particle field, projection cache or
//! query cache) and paints through a [`Surface`]. The [`Scheduler`] drives
//! them; hosts feed pointer and control events in between frames.
//!
//! [`Scheduler`]: crate::platform::Scheduler

pub mod emitter;
pub mod repulsion;
pub mod scatter;
pub mod stitches;
pub mod table;

pub use emitter::EmitterDemo;
pub use repulsion::RepulsionDemo;
pub use scatter::ScatterDemo;
pub use stitches::StitchesDemo;
pub use table::{TableDemo, TableView};

use std::cell::Cell;
use std::rc::Rc;

use crate::error::Result;
use crate::renderer::Surface;

/// One interactive visualization
pub trait Demo {
    fn name(&self) -> &'static str;

    /// The host laid the canvas out at `width x height`; returns the pixel
    /// size the surface should take
    fn resize(&mut self, width: f64, height: f64) -> (f64, f64);

    fn pointer_move(&mut self, _x: f64, _y: f64) {}

    fn pointer_leave(&mut self) {}

    /// Apply a named control change from the host page. Returns false for
    /// controls this demo does not have; unparseable values are ignored.
    fn control(&mut self, _name: &str, _value: &str) -> bool {
        false
    }

    /// Advance by `elapsed_ms` and repaint if anything changed
    fn frame(&mut self, elapsed_ms: f64, surface: &mut dyn Surface) -> Result<()>;
}

impl<D: Demo + ?Sized> Demo for Box<D> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn resize(&mut self, width: f64, height: f64) -> (f64, f64) {
        (**self).resize(width, height)
    }

    fn pointer_move(&mut self, x: f64, y: f64) {
        (**self).pointer_move(x, y)
    }

    fn pointer_leave(&mut self) {
        (**self).pointer_leave()
    }

    fn control(&mut self, name: &str, value: &str) -> bool {
        (**self).control(name, value)
    }

    fn frame(&mut self, elapsed_ms: f64, surface: &mut dyn Surface) -> Result<()> {
        (**self).frame(elapsed_ms, surface)
    }
}

/// Tracks whether a repaint is owed: store changes set the flag, size changes
/// are compared against the last painted size
#[derive(Debug)]
pub(crate) struct RepaintGate {
    dirty: Rc<Cell<bool>>,
    painted_size: Option<(f64, f64)>,
}

impl RepaintGate {
    pub(crate) fn new() -> Self {
        Self {
            dirty: Rc::new(Cell::new(true)),
            painted_size: None,
        }
    }

    /// Shared flag for a store subscription to set
    pub(crate) fn flag(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.dirty)
    }

    pub(crate) fn mark(&self) {
        self.dirty.set(true);
    }

    pub(crate) fn needs_paint(&self, size: (f64, f64)) -> bool {
        self.dirty.get() || self.painted_size != Some(size)
    }

    pub(crate) fn painted(&mut self, size: (f64, f64)) {
        self.dirty.set(false);
        self.painted_size = Some(size);
    }
}
