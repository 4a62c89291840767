//! Density binning

use crate::data::DataPoint;
use crate::projection::Projector;

/// Point counts over a uniform grid covering the plotting rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct DensityGrid {
    pub cols: usize,
    pub rows: usize,
    pub cell_size: f64,
    /// Row-major counts
    cells: Vec<u32>,
    max: u32,
}

/// One non-empty cell, ready to paint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityCell {
    pub col: usize,
    pub row: usize,
    pub count: u32,
    /// `count / densest cell`, in (0, 1]
    pub intensity: f64,
}

impl DensityGrid {
    /// Bin every point; points outside the rectangle clamp to the nearest edge cell
    pub fn bin(points: &[DataPoint], projector: &Projector, cell_size: f64) -> Self {
        let cell_size = cell_size.max(1.0);
        let cols = ((projector.area.inner_width() / cell_size).floor() as usize).max(1);
        let rows = ((projector.area.inner_height() / cell_size).floor() as usize).max(1);
        let mut cells = vec![0u32; cols * rows];

        for p in points {
            let (sx, sy) = projector.project_local(p.x, p.y);
            let col = clamp_index(sx / cell_size, cols);
            let row = clamp_index(sy / cell_size, rows);
            cells[row * cols + col] += 1;
        }

        let max = cells.iter().copied().max().unwrap_or(0);
        Self {
            cols,
            rows,
            cell_size,
            cells,
            max,
        }
    }

    pub fn count(&self, col: usize, row: usize) -> u32 {
        if col >= self.cols || row >= self.rows {
            return 0;
        }
        self.cells[row * self.cols + col]
    }

    /// Count of the densest cell
    pub fn max_count(&self) -> u32 {
        self.max
    }

    /// Sum over all cells
    pub fn total(&self) -> usize {
        self.cells.iter().map(|&c| c as usize).sum()
    }

    /// Non-empty cells in row-major order
    pub fn filled(&self) -> impl Iterator<Item = DensityCell> + '_ {
        let max = f64::from(self.max.max(1));
        self.cells.iter().enumerate().filter(|(_, c)| **c > 0).map(move |(i, &count)| DensityCell {
            col: i % self.cols,
            row: i / self.cols,
            count,
            intensity: f64::from(count) / max,
        })
    }
}

fn clamp_index(cell: f64, len: usize) -> usize {
    if cell.is_nan() || cell < 0.0 {
        0
    } else {
        (cell.floor() as usize).min(len - 1)
    }
}
