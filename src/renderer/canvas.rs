//! Browser canvas surface (wasm only)

use std::f64::consts::TAU;

use glam::DVec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Color, Surface};
use crate::error::{DemoError, Result};

const UI_FONT: &str = "12px system-ui, -apple-system, BlinkMacSystemFont, sans-serif";

/// [`Surface`] backed by an `HtmlCanvasElement` 2D context
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| {
                log::warn!("get_context failed: {e:?}");
                DemoError::SurfaceUnavailable
            })?
            .ok_or(DemoError::SurfaceUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| DemoError::SurfaceUnavailable)?;
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Laid-out CSS size of the canvas element
    pub fn client_size(&self) -> (f64, f64) {
        let rect = self.canvas.get_bounding_client_rect();
        (rect.width(), rect.height())
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (f64, f64) {
        (f64::from(self.canvas.width()), f64::from(self.canvas.height()))
    }

    fn set_size(&mut self, width: f64, height: f64) {
        self.canvas.set_width(width.max(0.0) as u32);
        self.canvas.set_height(height.max(0.0) as u32);
    }

    fn clear(&mut self) {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, w, h);
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Color) {
        self.ctx.begin_path();
        if self.ctx.arc(center.x, center.y, radius.max(0.0), 0.0, TAU).is_err() {
            return;
        }
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }

    fn fill_rect(&mut self, origin: DVec2, size: DVec2, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(origin.x, origin.y, size.x, size.y);
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Color) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width);
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
    }

    fn fill_text(&mut self, text: &str, at: DVec2, color: Color) {
        self.ctx.set_font(UI_FONT);
        self.ctx.set_fill_style_str(&color.to_css());
        if let Err(e) = self.ctx.fill_text(text, at.x, at.y) {
            log::debug!("fill_text failed: {e:?}");
        }
    }
}
