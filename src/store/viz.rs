//! Scatter/density chart state

use std::rc::Rc;

use super::Store;
use crate::data::{Category, DataPoint, generate_dataset, next_seed};
use crate::settings::{RangeLimits, ScatterSettings};

pub use crate::projection::{Filters, ValueRange};

/// Chart rendering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Scatter,
    Density,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DensitySettings {
    pub cell_size_px: u32,
}

/// Everything the chart demo renders from
#[derive(Debug, Clone)]
pub struct VizState {
    /// Shared so snapshots stay cheap; replaced wholesale on regeneration
    pub data: Rc<Vec<DataPoint>>,
    pub filters: Filters,
    pub view_mode: ViewMode,
    pub density: DensitySettings,
    pub value_limits: RangeLimits,
    pub cell_size_limits: RangeLimits,
}

impl VizState {
    pub fn from_settings(settings: &ScatterSettings) -> Self {
        let limits = settings.value_limits;
        Self {
            data: Rc::new(generate_dataset(settings.point_count, settings.seed)),
            filters: Filters::new(ValueRange::new(limits.min, limits.max)),
            view_mode: ViewMode::Scatter,
            density: DensitySettings {
                cell_size_px: settings
                    .cell_size_limits
                    .clamp_count(i64::from(settings.cell_size_px)) as u32,
            },
            value_limits: limits,
            cell_size_limits: settings.cell_size_limits,
        }
    }
}

impl Default for VizState {
    fn default() -> Self {
        Self::from_settings(&ScatterSettings::default())
    }
}

impl Store<VizState> {
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.update(|s| s.view_mode = mode);
    }

    /// Set both ends; each end is clamped to the slider limits and `max >= min`
    pub fn set_value_range(&mut self, min: f64, max: f64) {
        self.update(|s| {
            let min = s.value_limits.clamp(min);
            let max = crate::clamp(max, min, s.value_limits.max);
            s.filters.value_range = ValueRange::new(min, max);
        });
    }

    /// Move the lower handle; it cannot pass the upper handle
    pub fn set_value_min(&mut self, min: f64) {
        self.update(|s| {
            let current = s.filters.value_range;
            let min = crate::clamp(min, s.value_limits.min, current.max);
            s.filters.value_range = ValueRange::new(min, current.max);
        });
    }

    /// Move the upper handle; it cannot pass the lower handle
    pub fn set_value_max(&mut self, max: f64) {
        self.update(|s| {
            let current = s.filters.value_range;
            let max = crate::clamp(max, current.min, s.value_limits.max);
            s.filters.value_range = ValueRange::new(current.min, max);
        });
    }

    pub fn set_value_min_text(&mut self, text: &str) {
        match crate::parse_control_float(text) {
            Some(v) => self.set_value_min(v),
            None => log::debug!("ignoring value min input {text:?}"),
        }
    }

    pub fn set_value_max_text(&mut self, text: &str) {
        match crate::parse_control_float(text) {
            Some(v) => self.set_value_max(v),
            None => log::debug!("ignoring value max input {text:?}"),
        }
    }

    pub fn toggle_category(&mut self, category: Category) {
        self.update(|s| s.filters.categories.toggle(category));
    }

    /// Replace the dataset with `count` points, seeded from the current size
    pub fn regenerate_data(&mut self, count: usize) {
        let seed = next_seed(self.state().data.len());
        log::debug!("regenerating {count} points with seed {seed}");
        self.update(|s| s.data = Rc::new(generate_dataset(count, seed)));
    }

    pub fn set_density_cell_size(&mut self, cell_size_px: i64) {
        self.update(|s| s.density.cell_size_px = s.cell_size_limits.clamp_count(cell_size_px) as u32);
    }

    pub fn set_density_cell_size_text(&mut self, text: &str) {
        match crate::parse_control_int(text) {
            Some(v) => self.set_density_cell_size(v),
            None => log::debug!("ignoring cell size input {text:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = VizState::default();
        assert_eq!(state.data.len(), 650);
        assert_eq!(state.filters.value_range, ValueRange::new(0.0, 100.0));
        assert_eq!(state.filters.categories.len(), 3);
        assert_eq!(state.view_mode, ViewMode::Scatter);
        assert_eq!(state.density.cell_size_px, 18);
    }

    #[test]
    fn test_value_handles_cannot_cross() {
        let mut store = Store::new(VizState::default());
        store.set_value_max(40.0);
        store.set_value_min(70.0);
        assert_eq!(store.state().filters.value_range, ValueRange::new(40.0, 40.0));
        store.set_value_max(-5.0);
        assert_eq!(store.state().filters.value_range.max, 40.0);
        store.set_value_max(500.0);
        assert_eq!(store.state().filters.value_range.max, 100.0);
    }

    #[test]
    fn test_set_value_range_clamps() {
        let mut store = Store::new(VizState::default());
        store.set_value_range(-10.0, 150.0);
        assert_eq!(store.state().filters.value_range, ValueRange::new(0.0, 100.0));
        store.set_value_range(60.0, 20.0);
        assert_eq!(store.state().filters.value_range, ValueRange::new(60.0, 60.0));
    }

    #[test]
    fn test_invalid_text_keeps_value() {
        let mut store = Store::new(VizState::default());
        store.set_value_min_text("30");
        store.set_value_min_text("thirty");
        assert_eq!(store.state().filters.value_range.min, 30.0);
        store.set_density_cell_size_text("x");
        assert_eq!(store.state().density.cell_size_px, 18);
    }

    #[test]
    fn test_cell_size_clamped() {
        let mut store = Store::new(VizState::default());
        store.set_density_cell_size(2);
        assert_eq!(store.state().density.cell_size_px, 8);
        store.set_density_cell_size(80);
        assert_eq!(store.state().density.cell_size_px, 50);
    }

    #[test]
    fn test_regenerate_is_reproducible() {
        let mut a = Store::new(VizState::default());
        let mut b = Store::new(VizState::default());
        let before = a.get_state();
        a.regenerate_data(650);
        b.regenerate_data(650);
        assert_eq!(*a.state().data, *b.state().data);
        assert!(!Rc::ptr_eq(&before.data, &a.state().data));
        assert!(a.state().data[0].id.starts_with("p_69_0_"));
    }

    #[test]
    fn test_toggle_category() {
        let mut store = Store::new(VizState::default());
        store.toggle_category(Category::A);
        assert!(!store.state().filters.categories.contains(Category::A));
    }
}
