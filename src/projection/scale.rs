//! Data-space to pixel-space projection

use crate::consts::*;
use crate::projection::Domains;

/// Linear map from a data interval onto a pixel interval
///
/// `range_len` may be negative (the y axis grows downward on screen).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain_min: f64,
    pub domain_span: f64,
    pub range_start: f64,
    pub range_len: f64,
}

impl LinearScale {
    pub fn map(&self, v: f64) -> f64 {
        self.range_start + (v - self.domain_min) / self.domain_span * self.range_len
    }
}

/// Canvas size in pixels plus the padded plotting rectangle inside it
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlotArea {
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width left for data; the right margin is one padding wider than the left
    pub fn inner_width(&self) -> f64 {
        self.width - CHART_PADDING * 3.0
    }

    pub fn inner_height(&self) -> f64 {
        self.height - CHART_PADDING * 2.0
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Baseline of the x axis
    pub fn bottom(&self) -> f64 {
        self.height - CHART_PADDING
    }
}

/// Projects records of one filtered set into one plot area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    pub area: PlotArea,
    pub x: LinearScale,
    pub y: LinearScale,
    pub radius: LinearScale,
}

impl Projector {
    pub fn new(domains: &Domains, area: PlotArea) -> Self {
        Self {
            area,
            x: LinearScale {
                domain_min: domains.x.min,
                domain_span: domains.x.span(),
                range_start: CHART_PADDING,
                range_len: area.inner_width(),
            },
            y: LinearScale {
                domain_min: domains.y.min,
                domain_span: domains.y.span(),
                range_start: area.bottom(),
                range_len: -area.inner_height(),
            },
            radius: LinearScale {
                domain_min: domains.value.min,
                domain_span: domains.value.span(),
                range_start: MARKER_MIN_RADIUS,
                range_len: MARKER_RADIUS_SPAN,
            },
        }
    }

    pub fn project_x(&self, x: f64) -> f64 {
        self.x.map(x)
    }

    pub fn project_y(&self, y: f64) -> f64 {
        self.y.map(y)
    }

    pub fn project_radius(&self, value: f64) -> f64 {
        self.radius.map(value)
    }

    /// Position relative to the top-left corner of the plotting rectangle
    pub fn project_local(&self, x: f64, y: f64) -> (f64, f64) {
        (self.project_x(x) - CHART_PADDING, self.project_y(y) - CHART_PADDING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::Extent;

    fn domains() -> Domains {
        Domains {
            x: Extent::new(10.0, 20.0),
            y: Extent::new(0.0, 50.0),
            value: Extent::new(5.0, 70.0),
        }
    }

    #[test]
    fn test_corners_land_on_padded_rect() {
        let area = PlotArea::new(400.0, 220.0);
        let p = Projector::new(&domains(), area);
        assert_eq!(p.project_x(10.0), CHART_PADDING);
        assert_eq!(p.project_x(20.0), CHART_PADDING + area.inner_width());
        assert_eq!(p.project_y(0.0), 220.0 - CHART_PADDING);
        assert_eq!(p.project_y(50.0), CHART_PADDING);
    }

    #[test]
    fn test_radius_range() {
        let p = Projector::new(&domains(), PlotArea::new(400.0, 220.0));
        assert_eq!(p.project_radius(5.0), 3.0);
        assert_eq!(p.project_radius(70.0), 11.0);
    }

    #[test]
    fn test_local_coordinates() {
        let area = PlotArea::new(400.0, 220.0);
        let p = Projector::new(&domains(), area);
        assert_eq!(p.project_local(10.0, 50.0), (0.0, 0.0));
        let (lx, ly) = p.project_local(20.0, 0.0);
        assert_eq!(lx, area.inner_width());
        assert_eq!(ly, area.inner_height());
    }
}
