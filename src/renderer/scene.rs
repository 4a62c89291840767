//! Scene painters
//!
//! Each `draw_*` function repaints a whole surface. Painting into a zero-sized
//! surface is a no-op; the next frame after layout paints normally.

use glam::DVec2;

use super::{Color, Surface};
use crate::consts::CHART_PADDING;
use crate::data::{DataPoint, Kind, Stitch, StitchPoint};
use crate::projection::{CategoryBar, ChartView, table::BAR_WIDTH};
use crate::sim::Particle;
use crate::store::ViewMode;

pub const EMPTY_FILTER_MESSAGE: &str = "No points in current filter";

const AXIS_WIDTH: f64 = 0.5;
const SCATTER_ALPHA: f64 = 0.9;
const DENSITY_MAX_ALPHA: f64 = 0.85;

const STITCH_SIZE: f64 = 12.0;
const STITCH_LINE_WIDTH: f64 = 2.0;

/// Chart view box used by the category bars
const BAR_VIEW_WIDTH: f64 = 120.0;
const BAR_VIEW_HEIGHT: f64 = 80.0;
const BAR_LABEL_Y: f64 = 77.0;

const TEXT_LEFT: f64 = 8.0;
const LINE_HEIGHT: f64 = 18.0;
const SELECTED_ALPHA: f64 = 0.2;

pub const TABLE_HEADER: &str = "ID           X      Y  Value  Category";

/// Clear and, when `visible`, draw every particle as a filled disc
pub fn draw_particles(surface: &mut dyn Surface, particles: &[Particle], color: Color, visible: bool) {
    if surface.is_empty() {
        log::trace!("particle surface not laid out yet");
        return;
    }
    surface.clear();
    if !visible {
        return;
    }
    for p in particles {
        surface.fill_circle(p.pos.as_dvec2(), f64::from(p.radius), color);
    }
}

/// Scatter or density chart with reference axes
pub fn draw_chart(surface: &mut dyn Surface, view: &ChartView<'_>, mode: ViewMode) {
    if surface.is_empty() {
        log::trace!("chart surface not laid out yet");
        return;
    }
    surface.clear();

    let (width, height) = surface.size();
    draw_axes(surface, width, height);

    if view.points.is_empty() {
        surface.fill_text(
            EMPTY_FILTER_MESSAGE,
            DVec2::new(CHART_PADDING + 8.0, height / 2.0),
            Color::MUTED,
        );
        return;
    }

    match mode {
        ViewMode::Scatter => {
            for p in view.points {
                let center = DVec2::new(view.projector.project_x(p.x), view.projector.project_y(p.y));
                let radius = view.projector.project_radius(p.value);
                surface.fill_circle(center, radius, p.category.color().with_alpha(SCATTER_ALPHA));
            }
        }
        ViewMode::Density => {
            let Some(grid) = view.grid else {
                log::warn!("density view requested without a grid");
                return;
            };
            let size = DVec2::splat(grid.cell_size);
            for cell in grid.filled() {
                let origin = DVec2::new(
                    CHART_PADDING + cell.col as f64 * grid.cell_size,
                    CHART_PADDING + cell.row as f64 * grid.cell_size,
                );
                let color = Color::DENSITY.with_alpha(cell.intensity * DENSITY_MAX_ALPHA);
                surface.fill_rect(origin, size, color);
            }
        }
    }
}

fn draw_axes(surface: &mut dyn Surface, width: f64, height: f64) {
    let origin = DVec2::new(CHART_PADDING, height - CHART_PADDING);
    surface.stroke_line(
        origin,
        DVec2::new(width - CHART_PADDING, height - CHART_PADDING),
        AXIS_WIDTH,
        Color::MUTED,
    );
    surface.stroke_line(origin, DVec2::new(CHART_PADDING, CHART_PADDING), AXIS_WIDTH, Color::MUTED);
}

/// Stitches in percentage space, scaled to the surface
pub fn draw_stitches(surface: &mut dyn Surface, stitches: &[StitchPoint]) {
    if surface.is_empty() {
        return;
    }
    surface.clear();
    let (width, height) = surface.size();
    for s in stitches {
        let at = DVec2::new(s.x / 100.0 * width, s.y / 100.0 * height);
        draw_stitch(surface, s.stitch, at);
    }
}

fn draw_stitch(surface: &mut dyn Surface, stitch: Stitch, at: DVec2) {
    let half = STITCH_SIZE / 2.0;
    let color = stitch.color();
    match stitch {
        Stitch::Cross => {
            surface.stroke_line(at + DVec2::new(-half, -half), at + DVec2::new(half, half), STITCH_LINE_WIDTH, color);
            surface.stroke_line(at + DVec2::new(half, -half), at + DVec2::new(-half, half), STITCH_LINE_WIDTH, color);
        }
        Stitch::Back => {
            surface.stroke_line(at - DVec2::X * half, at + DVec2::X * half, STITCH_LINE_WIDTH, color);
        }
        Stitch::French => {
            surface.fill_circle(at, STITCH_SIZE / 4.0, color);
        }
    }
    surface.fill_circle(at, STITCH_SIZE / 10.0, color);
}

/// Category count bars, the 120x80 chart view box stretched over the surface
pub fn draw_category_bars(surface: &mut dyn Surface, bars: &[CategoryBar]) {
    if surface.is_empty() {
        return;
    }
    surface.clear();
    let (width, height) = surface.size();
    let scale = DVec2::new(width / BAR_VIEW_WIDTH, height / BAR_VIEW_HEIGHT);
    for bar in bars {
        let color = bar.category.color();
        if bar.height > 0.0 {
            surface.fill_rect(
                DVec2::new(bar.x, bar.y) * scale,
                DVec2::new(BAR_WIDTH, bar.height) * scale,
                color,
            );
        }
        let label_x = bar.x + BAR_WIDTH / 2.0;
        surface.fill_text(bar.category.label(), DVec2::new(label_x, BAR_LABEL_Y) * scale, Color::MUTED);
        surface.fill_text(&bar.count.to_string(), DVec2::new(label_x, bar.y - 2.0) * scale, Color::MUTED);
    }
}

/// One muted line, vertically centred (loading, error and empty states)
pub fn draw_message(surface: &mut dyn Surface, message: &str) {
    if surface.is_empty() {
        return;
    }
    surface.clear();
    let (_, height) = surface.size();
    surface.fill_text(message, DVec2::new(TEXT_LEFT, height / 2.0), Color::MUTED);
}

/// Fixed-width text line for one table row
pub fn format_row(row: &DataPoint) -> String {
    format!(
        "{:<10} {:>5.1}  {:>5.1}  {:>5.1}  {}",
        row.id,
        row.x,
        row.y,
        row.value,
        row.category.label()
    )
}

/// Header plus one line per row, starting at line `first_line`; the selected
/// row sits on a tinted band
pub fn draw_table(surface: &mut dyn Surface, rows: &[DataPoint], selected: Option<&str>, first_line: usize) {
    if surface.is_empty() {
        return;
    }
    surface.clear();
    let (width, _) = surface.size();
    let line_y = |line: usize| (first_line + line + 1) as f64 * LINE_HEIGHT;

    surface.fill_text(TABLE_HEADER, DVec2::new(TEXT_LEFT, line_y(0)), Color::MUTED);
    for (i, row) in rows.iter().enumerate() {
        let y = line_y(i + 1);
        let color = row.category.color();
        if selected == Some(row.id.as_str()) {
            surface.fill_rect(
                DVec2::new(0.0, y - LINE_HEIGHT + 4.0),
                DVec2::new(width, LINE_HEIGHT),
                color.with_alpha(SELECTED_ALPHA),
            );
        }
        surface.fill_text(&format_row(row), DVec2::new(TEXT_LEFT, y), color);
    }
}

/// Status lines over whatever was painted, from the top
pub fn draw_status_lines(surface: &mut dyn Surface, lines: &[String]) {
    if surface.is_empty() {
        return;
    }
    for (i, line) in lines.iter().enumerate() {
        surface.fill_text(line, DVec2::new(TEXT_LEFT, (i + 1) as f64 * LINE_HEIGHT), Color::MUTED);
    }
}
