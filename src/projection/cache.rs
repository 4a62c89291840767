//! Layered memoization for the chart demo
//!
//! Layer 1: filtered records, keyed by dataset identity and filter state.
//! Layer 2: domains, recomputed with layer 1.
//! Layer 3: density grid, keyed by layer 1 generation, cell size and area.

use std::rc::Rc;

use crate::data::DataPoint;
use crate::projection::{DensityGrid, Domains, Filters, PlotArea, Projector, compute_domains};

#[derive(Debug, Clone, Copy, PartialEq)]
struct GridKey {
    generation: u64,
    cell_size_px: u32,
    area: PlotArea,
}

/// Borrowed view over the cached layers
#[derive(Debug, Clone, Copy)]
pub struct ChartView<'a> {
    pub points: &'a [DataPoint],
    pub domains: Domains,
    pub projector: Projector,
    pub grid: Option<&'a DensityGrid>,
}

#[derive(Debug, Default)]
pub struct ProjectionCache {
    source: Option<Rc<Vec<DataPoint>>>,
    filters: Option<Filters>,
    filtered: Vec<DataPoint>,
    domains: Domains,
    generation: u64,
    grid_key: Option<GridKey>,
    grid: Option<DensityGrid>,
    grid_passes: u64,
}

impl ProjectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Times layer 1 has been recomputed
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Times layer 3 has been recomputed
    pub fn grid_passes(&self) -> u64 {
        self.grid_passes
    }

    fn refresh(&mut self, data: &Rc<Vec<DataPoint>>, filters: &Filters) {
        let same_source = self.source.as_ref().is_some_and(|s| Rc::ptr_eq(s, data));
        let same_filters = self.filters.as_ref() == Some(filters);
        if same_source && same_filters {
            return;
        }
        self.filtered = filters.apply(data);
        self.domains = compute_domains(&self.filtered);
        self.source = Some(Rc::clone(data));
        self.filters = Some(filters.clone());
        self.generation += 1;
        log::debug!(
            "projection refreshed: {} of {} points pass",
            self.filtered.len(),
            data.len()
        );
    }

    /// Filtered records for `(data, filters)`
    pub fn filtered(&mut self, data: &Rc<Vec<DataPoint>>, filters: &Filters) -> &[DataPoint] {
        self.refresh(data, filters);
        &self.filtered
    }

    pub fn domains(&mut self, data: &Rc<Vec<DataPoint>>, filters: &Filters) -> Domains {
        self.refresh(data, filters);
        self.domains
    }

    /// Every layer needed to paint one frame; the grid is built only when a
    /// cell size is given
    pub fn view(
        &mut self,
        data: &Rc<Vec<DataPoint>>,
        filters: &Filters,
        area: PlotArea,
        cell_size_px: Option<u32>,
    ) -> ChartView<'_> {
        self.refresh(data, filters);
        let projector = Projector::new(&self.domains, area);

        if let Some(cell_size_px) = cell_size_px {
            let key = GridKey {
                generation: self.generation,
                cell_size_px,
                area,
            };
            if self.grid_key != Some(key) {
                self.grid = Some(DensityGrid::bin(
                    &self.filtered,
                    &projector,
                    f64::from(cell_size_px),
                ));
                self.grid_key = Some(key);
                self.grid_passes += 1;
            }
        }

        ChartView {
            points: &self.filtered,
            domains: self.domains,
            projector,
            grid: cell_size_px.and(self.grid.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Category, generate_dataset};
    use crate::projection::ValueRange;

    fn setup() -> (Rc<Vec<DataPoint>>, Filters) {
        (
            Rc::new(generate_dataset(200, 3)),
            Filters::new(ValueRange::new(0.0, 100.0)),
        )
    }

    #[test]
    fn test_same_inputs_do_not_recompute() {
        let (data, filters) = setup();
        let mut cache = ProjectionCache::new();
        assert_eq!(cache.filtered(&data, &filters).len(), 200);
        cache.domains(&data, &filters);
        cache.view(&data, &filters, PlotArea::new(400.0, 220.0), None);
        assert_eq!(cache.generation(), 1);
    }

    #[test]
    fn test_filter_change_recomputes() {
        let (data, mut filters) = setup();
        let mut cache = ProjectionCache::new();
        cache.filtered(&data, &filters);
        filters.categories.toggle(Category::A);
        let n = cache.filtered(&data, &filters).len();
        assert_eq!(cache.generation(), 2);
        assert!(n < 200);
        assert!(cache.filtered(&data, &filters).iter().all(|p| p.category != Category::A));
    }

    #[test]
    fn test_new_dataset_identity_recomputes() {
        let (data, filters) = setup();
        let mut cache = ProjectionCache::new();
        cache.filtered(&data, &filters);
        let copy = Rc::new((*data).clone());
        cache.filtered(&copy, &filters);
        assert_eq!(cache.generation(), 2);
    }

    #[test]
    fn test_grid_layer_keys() {
        let (data, filters) = setup();
        let mut cache = ProjectionCache::new();
        let area = PlotArea::new(400.0, 220.0);

        assert!(cache.view(&data, &filters, area, None).grid.is_none());
        assert_eq!(cache.grid_passes(), 0);

        let total = cache.view(&data, &filters, area, Some(18)).grid.map(|g| g.total());
        assert_eq!(total, Some(200));
        cache.view(&data, &filters, area, Some(18));
        assert_eq!(cache.grid_passes(), 1);

        cache.view(&data, &filters, area, Some(20));
        assert_eq!(cache.grid_passes(), 2);
        cache.view(&data, &filters, PlotArea::new(500.0, 220.0), Some(20));
        assert_eq!(cache.grid_passes(), 3);
        assert_eq!(cache.generation(), 1);
    }
}
