//! Scatter/density chart over a filtered synthetic dataset
//!
//! Event-driven: frames repaint only after a store change or a resize.

use super::{Demo, RepaintGate};
use crate::consts::{CHART_HEIGHT, CHART_MIN_WIDTH};
use crate::data::{Category, Kind};
use crate::error::Result;
use crate::projection::{PlotArea, ProjectionCache};
use crate::renderer::{Surface, scene};
use crate::settings::ScatterSettings;
use crate::store::{Store, ViewMode, VizState};

pub struct ScatterDemo {
    store: Store<VizState>,
    cache: ProjectionCache,
    gate: RepaintGate,
    regenerate_count: usize,
    paints: u64,
}

impl ScatterDemo {
    pub fn new(settings: &ScatterSettings) -> Self {
        let mut store = Store::new(VizState::from_settings(settings));
        let gate = RepaintGate::new();
        let flag = gate.flag();
        store.subscribe(move |_| flag.set(true));
        Self {
            store,
            cache: ProjectionCache::new(),
            gate,
            regenerate_count: settings.point_count,
            paints: 0,
        }
    }

    pub fn store(&self) -> &Store<VizState> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store<VizState> {
        &mut self.store
    }

    pub fn cache(&self) -> &ProjectionCache {
        &self.cache
    }

    /// Number of full repaints so far
    pub fn paints(&self) -> u64 {
        self.paints
    }

    /// Points currently passing the filters
    pub fn visible_points(&mut self) -> usize {
        let state = self.store.get_state();
        self.cache.filtered(&state.data, &state.filters).len()
    }
}

impl Default for ScatterDemo {
    fn default() -> Self {
        Self::new(&ScatterSettings::default())
    }
}

impl Demo for ScatterDemo {
    fn name(&self) -> &'static str {
        "scatter"
    }

    fn resize(&mut self, width: f64, _height: f64) -> (f64, f64) {
        self.gate.mark();
        (width.max(CHART_MIN_WIDTH), CHART_HEIGHT)
    }

    fn control(&mut self, name: &str, value: &str) -> bool {
        match name {
            "view" => {
                match value.trim().to_ascii_lowercase().as_str() {
                    "scatter" => self.store.set_view_mode(ViewMode::Scatter),
                    "density" => self.store.set_view_mode(ViewMode::Density),
                    other => log::debug!("ignoring view mode {other:?}"),
                }
                true
            }
            "value_min" => {
                self.store.set_value_min_text(value);
                true
            }
            "value_max" => {
                self.store.set_value_max_text(value);
                true
            }
            "category" => {
                if let Some(category) = Category::from_label(value) {
                    self.store.toggle_category(category);
                }
                true
            }
            "cell_size" => {
                self.store.set_density_cell_size_text(value);
                true
            }
            "regenerate" => {
                self.store.regenerate_data(self.regenerate_count);
                true
            }
            _ => false,
        }
    }

    fn frame(&mut self, _elapsed_ms: f64, surface: &mut dyn Surface) -> Result<()> {
        let size = surface.size();
        if surface.is_empty() || !self.gate.needs_paint(size) {
            return Ok(());
        }

        let state = self.store.get_state();
        let cell_size = match state.view_mode {
            ViewMode::Density => Some(state.density.cell_size_px),
            ViewMode::Scatter => None,
        };
        let view = self
            .cache
            .view(&state.data, &state.filters, PlotArea::new(size.0, size.1), cell_size);
        scene::draw_chart(surface, &view, state.view_mode);

        self.gate.painted(size);
        self.paints += 1;
        Ok(())
    }
}
