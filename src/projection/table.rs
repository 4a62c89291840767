//! Table demo projections: row filtering, sorting and per-category counts

use serde::{Deserialize, Serialize};

use crate::data::{Category, DataPoint, Kind, KindSet};

/// Bar chart geometry, in the chart's 120x80 view box
const BAR_MAX_HEIGHT: f64 = 60.0;
const BAR_BASELINE: f64 = 70.0;
const BAR_LEFT: f64 = 20.0;
const BAR_STRIDE: f64 = 30.0;
pub const BAR_WIDTH: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Local (client-side) table filters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableQuery {
    pub categories: KindSet<Category>,
    /// Rows with `value >= min_value` are shown
    pub min_value: f64,
    pub sort: SortOrder,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            categories: KindSet::all(),
            min_value: 0.0,
            sort: SortOrder::Ascending,
        }
    }
}

/// Filtered rows sorted by value; ties keep dataset order
pub fn table_rows(data: &[DataPoint], query: &TableQuery) -> Vec<DataPoint> {
    let mut rows: Vec<DataPoint> = data
        .iter()
        .filter(|row| query.categories.contains(row.category) && row.value >= query.min_value)
        .cloned()
        .collect();
    match query.sort {
        SortOrder::Ascending => rows.sort_by(|a, b| a.value.total_cmp(&b.value)),
        SortOrder::Descending => rows.sort_by(|a, b| b.value.total_cmp(&a.value)),
    }
    rows
}

/// Row count per category, in category order
pub fn category_counts(rows: &[DataPoint]) -> [(Category, usize); 3] {
    let mut counts = [(Category::A, 0), (Category::B, 0), (Category::C, 0)];
    for row in rows {
        counts[row.category.index()].1 += 1;
    }
    counts
}

/// One bar of the category chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryBar {
    pub category: Category,
    pub count: usize,
    pub x: f64,
    pub y: f64,
    pub height: f64,
}

/// Bars scaled so the largest count reaches the full height; all-zero counts give flat bars
pub fn category_bars(counts: &[(Category, usize)]) -> Vec<CategoryBar> {
    let max = counts.iter().map(|(_, n)| *n).max().unwrap_or(0);
    counts
        .iter()
        .enumerate()
        .map(|(i, &(category, count))| {
            let height = if max == 0 {
                0.0
            } else {
                count as f64 / max as f64 * BAR_MAX_HEIGHT
            };
            CategoryBar {
                category,
                count,
                x: BAR_LEFT + i as f64 * BAR_STRIDE,
                y: BAR_BASELINE - height,
                height,
            }
        })
        .collect()
}
