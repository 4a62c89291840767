//! 2D surface rendering
//!
//! Every frame is a full repaint: clear, then draw from current state.
//! Painters only talk to the [`Surface`] trait, so the same scene code drives
//! a browser canvas and the in-memory [`RecordingSurface`] used headless.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod recording;
pub mod scene;

use glam::DVec2;
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use recording::{DrawOp, RecordingSurface};

/// sRGB colour with straight alpha
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Axis lines and placeholder text
    pub const MUTED: Color = Color::rgb(0x88, 0x88, 0x88);
    /// Density cell base colour
    pub const DENSITY: Color = Color::rgb(198, 28, 115);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// `0xRRGGBB`
    pub const fn from_hex(hex: u32) -> Self {
        Self::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS colour string for canvas fill/stroke styles
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

/// A 2D drawing target
pub trait Surface {
    /// Pixel size `(width, height)`
    fn size(&self) -> (f64, f64);

    /// Resize the backing store; clears the surface
    fn set_size(&mut self, width: f64, height: f64);

    fn clear(&mut self);

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Color);

    fn fill_rect(&mut self, origin: DVec2, size: DVec2, color: Color);

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Color);

    /// Single line of 12px UI text with its baseline at `at`
    fn fill_text(&mut self, text: &str, at: DVec2, color: Color);

    fn is_empty(&self) -> bool {
        let (w, h) = self.size();
        w <= 0.0 || h <= 0.0
    }
}
