//! Record filtering

use serde::{Deserialize, Serialize};

use crate::data::{Category, DataPoint, KindSet, Stitch, StitchPoint, Tagged};

/// Inclusive value window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Chart filter state: value window plus active categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filters {
    pub value_range: ValueRange,
    pub categories: KindSet<Category>,
}

impl Filters {
    /// All categories active
    pub fn new(value_range: ValueRange) -> Self {
        Self {
            value_range,
            categories: KindSet::all(),
        }
    }

    pub fn passes(&self, point: &DataPoint) -> bool {
        self.value_range.contains(point.value) && self.categories.contains(point.category)
    }

    pub fn apply(&self, data: &[DataPoint]) -> Vec<DataPoint> {
        filter_by(data, Some(self.value_range), &self.categories)
    }
}

/// Keep records whose kind is active and, when a range is given, whose value
/// lies inside it. Input order is preserved.
pub fn filter_by<T>(records: &[T], range: Option<ValueRange>, kinds: &KindSet<T::Kind>) -> Vec<T>
where
    T: Tagged + Clone,
{
    records
        .iter()
        .filter(|r| kinds.contains(r.kind()))
        .filter(|r| range.is_none_or(|range| range.contains(r.value())))
        .cloned()
        .collect()
}

/// Stitches are filtered by kind only
pub fn filter_stitches(data: &[StitchPoint], active: &KindSet<Stitch>) -> Vec<StitchPoint> {
    filter_by(data, None, active)
}
