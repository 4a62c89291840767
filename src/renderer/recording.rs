//! In-memory surface that records draw calls

use glam::DVec2;

use super::{Color, Surface};

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    Circle {
        center: DVec2,
        radius: f64,
        color: Color,
    },
    Rect {
        origin: DVec2,
        size: DVec2,
        color: Color,
    },
    Line {
        from: DVec2,
        to: DVec2,
        width: f64,
        color: Color,
    },
    Text {
        text: String,
        at: DVec2,
        color: Color,
    },
}

/// Headless [`Surface`]: keeps the ops of the current frame
///
/// `clear` starts a new frame, so `ops()` always describes the last repaint.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    ops: Vec<DrawOp>,
    frames: usize,
    resizes: usize,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Number of clears seen (one per full repaint)
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn resizes(&self) -> usize {
        self.resizes
    }

    pub fn circles(&self) -> impl Iterator<Item = (DVec2, f64, Color)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Circle {
                center,
                radius,
                color,
            } => Some((*center, *radius, *color)),
            _ => None,
        })
    }

    pub fn rect_count(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Rect { .. })).count()
    }

    pub fn line_count(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Line { .. })).count()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.resizes += 1;
        self.ops.clear();
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.ops.push(DrawOp::Clear);
        self.frames += 1;
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Color) {
        self.ops.push(DrawOp::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_rect(&mut self, origin: DVec2, size: DVec2, color: Color) {
        self.ops.push(DrawOp::Rect {
            origin,
            size,
            color,
        });
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Color) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn fill_text(&mut self, text: &str, at: DVec2, color: Color) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            at,
            color,
        });
    }
}
