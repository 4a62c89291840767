//! Axis and value domains

use serde::{Deserialize, Serialize};

use crate::data::DataPoint;

/// Closed numeric interval observed over a set of records
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Width of the interval; a degenerate interval reports 1 so projections never divide by zero
    pub fn span(&self) -> f64 {
        let span = self.max - self.min;
        if span == 0.0 { 1.0 } else { span }
    }

    fn include(&mut self, v: f64) {
        if v < self.min {
            self.min = v;
        }
        if v > self.max {
            self.max = v;
        }
    }
}

/// Domains of the plotted axes and of the value field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domains {
    pub x: Extent,
    pub y: Extent,
    pub value: Extent,
}

impl Default for Domains {
    /// Used when nothing passes the filters
    fn default() -> Self {
        Self {
            x: Extent::new(0.0, 100.0),
            y: Extent::new(0.0, 100.0),
            value: Extent::new(0.0, 1.0),
        }
    }
}

/// Single pass over `points`; empty input yields [`Domains::default`]
pub fn compute_domains(points: &[DataPoint]) -> Domains {
    let Some(first) = points.first() else {
        return Domains::default();
    };

    let mut domains = Domains {
        x: Extent::new(first.x, first.x),
        y: Extent::new(first.y, first.y),
        value: Extent::new(first.value, first.value),
    };
    for p in &points[1..] {
        domains.x.include(p.x);
        domains.y.include(p.y);
        domains.value.include(p.value);
    }
    domains
}
