//! Query-driven table over the simulated backend
//!
//! Server data lives in a [`QueryCache`]; filters, sort order, selection and
//! the edit buffer are local. Requests run as spawned tasks that write their
//! result back into the shared model and flag a repaint.

use std::cell::RefCell;
use std::rc::Rc;

use super::{Demo, RepaintGate};
use crate::api::{
    DataApi, DatasetParams, LocalFuture, MutationState, NoDelay, QueryCache, QueryKey, QueryStatus, Sleep,
    UpdateDataPointInput,
};
use crate::data::{Category, DataPoint, Kind};
use crate::error::{DemoError, Result};
use crate::platform;
use crate::projection::{CategoryBar, SortOrder, TableQuery, category_bars, category_counts, table_rows};
use crate::renderer::{Surface, scene};
use crate::settings::{RangeLimits, TableSettings};

pub const QUERY_SOURCE: &str = "state-driven-viz";
pub const LOADING_MESSAGE: &str = "Loading dataset…";
pub const EMPTY_MESSAGE: &str = "No data available";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableView {
    #[default]
    Table,
    Chart,
}

struct TableModel {
    queries: QueryCache,
    key: QueryKey,
    params: DatasetParams,
    query: TableQuery,
    view: TableView,
    selected_id: Option<String>,
    editing_value: String,
    update: MutationState,
    /// Last update failure, shown until an update succeeds
    update_error: Option<String>,
    regenerate: MutationState,
    min_value_limits: RangeLimits,
}

impl TableModel {
    fn data(&self) -> Option<&[DataPoint]> {
        self.queries.data(&self.key)
    }

    fn rows(&self) -> Vec<DataPoint> {
        self.data()
            .map(|data| table_rows(data, &self.query))
            .unwrap_or_default()
    }
}

pub struct TableDemo<S: Sleep + 'static = NoDelay> {
    api: Rc<DataApi<S>>,
    model: Rc<RefCell<TableModel>>,
    gate: RepaintGate,
}

impl TableDemo<NoDelay> {
    /// Backend that answers immediately
    pub fn immediate(settings: &TableSettings) -> Self {
        Self::new(settings, NoDelay)
    }
}

impl Default for TableDemo<NoDelay> {
    fn default() -> Self {
        Self::immediate(&TableSettings::default())
    }
}

impl<S: Sleep + 'static> TableDemo<S> {
    pub fn new(settings: &TableSettings, sleep: S) -> Self {
        let model = TableModel {
            queries: QueryCache::new(),
            key: QueryKey::new(QUERY_SOURCE, settings.count),
            params: DatasetParams {
                count: Some(settings.count),
                seed: Some(settings.seed),
            },
            query: TableQuery::default(),
            view: TableView::default(),
            selected_id: None,
            editing_value: String::new(),
            update: MutationState::default(),
            update_error: None,
            regenerate: MutationState::default(),
            min_value_limits: settings.min_value_limits,
        };
        Self {
            api: Rc::new(DataApi::new(settings, sleep)),
            model: Rc::new(RefCell::new(model)),
            gate: RepaintGate::new(),
        }
    }

    pub fn api(&self) -> &DataApi<S> {
        &self.api
    }

    pub fn status(&self) -> QueryStatus {
        let model = self.model.borrow();
        model.queries.status(&model.key)
    }

    pub fn needs_fetch(&self) -> bool {
        let model = self.model.borrow();
        model.queries.needs_fetch(&model.key)
    }

    /// Unfiltered dataset as last fetched
    pub fn data(&self) -> Option<Vec<DataPoint>> {
        self.model.borrow().data().map(<[DataPoint]>::to_vec)
    }

    /// Filtered and sorted rows
    pub fn rows(&self) -> Vec<DataPoint> {
        self.model.borrow().rows()
    }

    pub fn bars(&self) -> Vec<CategoryBar> {
        category_bars(&category_counts(&self.rows()))
    }

    pub fn query(&self) -> TableQuery {
        self.model.borrow().query.clone()
    }

    pub fn view(&self) -> TableView {
        self.model.borrow().view
    }

    pub fn selected(&self) -> Option<DataPoint> {
        let model = self.model.borrow();
        let id = model.selected_id.as_deref()?;
        model.data()?.iter().find(|row| row.id == id).cloned()
    }

    pub fn editing_value(&self) -> String {
        self.model.borrow().editing_value.clone()
    }

    pub fn is_update_pending(&self) -> bool {
        self.model.borrow().update.is_pending()
    }

    pub fn is_regenerate_pending(&self) -> bool {
        self.model.borrow().regenerate.is_pending()
    }

    /// Message of the last failed update, cleared by the next success
    pub fn error_message(&self) -> Option<String> {
        self.model.borrow().update_error.clone()
    }

    /// `HH:MM:SS` of the last successful fetch
    pub fn last_updated_label(&self) -> Option<String> {
        let model = self.model.borrow();
        model.queries.updated_at_ms(&model.key).map(platform::clock_label)
    }

    fn changed(&self) {
        self.gate.mark();
    }

    pub fn toggle_category(&mut self, category: Category) {
        self.model.borrow_mut().query.categories.toggle(category);
        self.changed();
    }

    /// Whole numbers only: fractions are truncated, anything else keeps the
    /// current minimum
    pub fn set_min_value_text(&mut self, text: &str) {
        let Some(value) = crate::parse_control_float(text).map(f64::trunc) else {
            log::debug!("ignoring min value input {text:?}");
            return;
        };
        let model = &mut *self.model.borrow_mut();
        model.query.min_value = model.min_value_limits.clamp(value);
        self.changed();
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.model.borrow_mut().query.sort = sort;
        self.changed();
    }

    pub fn set_view(&mut self, view: TableView) {
        self.model.borrow_mut().view = view;
        self.changed();
    }

    /// Select a row by id and load its value into the edit buffer
    pub fn select(&mut self, id: &str) -> bool {
        let model = &mut *self.model.borrow_mut();
        let Some(value) = model.data().and_then(|data| data.iter().find(|row| row.id == id)).map(|row| row.value)
        else {
            log::debug!("no row {id:?} to select");
            return false;
        };
        model.selected_id = Some(id.to_string());
        model.editing_value = value.to_string();
        self.changed();
        true
    }

    pub fn deselect(&mut self) {
        self.model.borrow_mut().selected_id = None;
        self.changed();
    }

    pub fn set_editing_value(&mut self, text: &str) {
        self.model.borrow_mut().editing_value = text.to_string();
        self.changed();
    }

    /// Start the dataset query unless one is already in flight
    pub fn load(&self) -> LocalFuture<()> {
        let (key, params) = {
            let model = &mut *self.model.borrow_mut();
            if !model.queries.begin_fetch(&model.key) {
                return Box::pin(std::future::ready(()));
            }
            (model.key.clone(), model.params)
        };
        self.changed();

        let api = Rc::clone(&self.api);
        let model = Rc::clone(&self.model);
        let dirty = self.gate.flag();
        Box::pin(async move {
            let result = api.fetch_dataset(params).await;
            if let Ok(data) = &result {
                log::info!("table dataset loaded: {} records", data.len());
            }
            model
                .borrow_mut()
                .queries
                .settle(&key, result, platform::wall_clock_ms());
            dirty.set(true);
        })
    }

    /// Refetch the dataset on the next frame, typically after a failed load.
    /// Rejected with [`DemoError::RequestPending`] while a fetch is in flight.
    pub fn retry(&mut self) -> Result<()> {
        let accepted = {
            let model = &mut *self.model.borrow_mut();
            model.queries.retry(&model.key)
        };
        if !accepted {
            log::warn!("retry rejected: dataset still loading");
            return Err(DemoError::RequestPending);
        }
        log::info!("retrying table dataset");
        self.changed();
        Ok(())
    }

    /// Send a patch for one record. Rejected with [`DemoError::RequestPending`]
    /// while another update is unsettled.
    pub fn update(&self, input: UpdateDataPointInput) -> Result<LocalFuture<Result<DataPoint>>> {
        if let Err(e) = self.model.borrow_mut().update.begin() {
            log::warn!("update of {} rejected: {e}", input.id);
            return Err(e);
        }
        self.changed();

        let api = Rc::clone(&self.api);
        let model = Rc::clone(&self.model);
        let dirty = self.gate.flag();
        Ok(Box::pin(async move {
            let result = api.update_data_point(input).await;
            {
                let model = &mut *model.borrow_mut();
                model.update.settle(&result);
                match &result {
                    Ok(updated) => {
                        model.queries.replace_record(&model.key, updated);
                        model.editing_value = updated.value.to_string();
                        model.update_error = None;
                    }
                    Err(e) => model.update_error = Some(e.to_string()),
                }
            }
            dirty.set(true);
            result
        }))
    }

    /// Update the selected row's value from the edit buffer
    pub fn update_value(&self) -> Result<LocalFuture<Result<DataPoint>>> {
        let input = {
            let model = self.model.borrow();
            let id = model
                .selected_id
                .clone()
                .ok_or_else(|| DemoError::InvalidInput("no row selected".into()))?;
            let value = crate::parse_control_float(&model.editing_value)
                .ok_or_else(|| DemoError::InvalidInput(format!("{:?} is not a number", model.editing_value)))?;
            UpdateDataPointInput::value(id, value)
        };
        self.update(input)
    }

    /// Move the selected row to another category
    pub fn update_category(&self, category: Category) -> Result<LocalFuture<Result<DataPoint>>> {
        let id = self
            .model
            .borrow()
            .selected_id
            .clone()
            .ok_or_else(|| DemoError::InvalidInput("no row selected".into()))?;
        self.update(UpdateDataPointInput::category(id, category))
    }

    /// Replace the backend dataset, then invalidate the query so it refetches
    pub fn regenerate(&self) -> Result<LocalFuture<Result<Vec<DataPoint>>>> {
        let count = {
            let model = &mut *self.model.borrow_mut();
            if model.queries.is_fetching(&model.key) {
                log::warn!("regenerate rejected: dataset still loading");
                return Err(DemoError::RequestPending);
            }
            if let Err(e) = model.regenerate.begin() {
                log::warn!("regenerate rejected: {e}");
                return Err(e);
            }
            model.key.count
        };
        self.changed();

        let api = Rc::clone(&self.api);
        let model = Rc::clone(&self.model);
        let dirty = self.gate.flag();
        Ok(Box::pin(async move {
            let params = DatasetParams {
                count: Some(count),
                seed: None,
            };
            let result = api.regenerate_dataset(params).await;
            {
                let model = &mut *model.borrow_mut();
                model.regenerate.settle(&result);
                if result.is_ok() {
                    model.queries.invalidate(&model.key);
                }
            }
            dirty.set(true);
            result
        }))
    }

    fn status_lines(&self) -> Vec<String> {
        let model = self.model.borrow();
        let mut lines = Vec::new();
        if model.update.is_pending() {
            lines.push("Updating...".to_string());
        }
        if model.regenerate.is_pending() {
            lines.push("Regenerating…".to_string());
        }
        if let Some(message) = &model.update_error {
            lines.push(format!("Error updating: {message}"));
        }
        drop(model);
        if let Some(label) = self.last_updated_label() {
            lines.push(format!("Last updated: {label}"));
        }
        lines
    }

    fn paint(&self, surface: &mut dyn Surface) {
        match self.status() {
            QueryStatus::Loading | QueryStatus::Idle => {
                scene::draw_message(surface, LOADING_MESSAGE);
                return;
            }
            QueryStatus::Error => {
                let model = self.model.borrow();
                let message = model.queries.error(&model.key).unwrap_or("Unknown error");
                scene::draw_message(surface, &format!("Error loading dataset: {message}"));
                return;
            }
            QueryStatus::Success => {}
        }

        let rows = self.rows();
        let status = self.status_lines();
        if rows.is_empty() {
            scene::draw_message(surface, EMPTY_MESSAGE);
        } else {
            match self.view() {
                TableView::Table => {
                    let selected = self.model.borrow().selected_id.clone();
                    scene::draw_table(surface, &rows, selected.as_deref(), status.len());
                }
                TableView::Chart => {
                    scene::draw_category_bars(surface, &category_bars(&category_counts(&rows)));
                }
            }
        }
        scene::draw_status_lines(surface, &status);
    }
}

/// Spawn a mutation; the outcome is read back from the model
fn spawn_mutation<T: 'static>(what: &str, task: Result<LocalFuture<Result<T>>>) {
    match task {
        Ok(task) => platform::spawn_local(async move {
            let _ = task.await;
        }),
        Err(e) => log::debug!("{what} not started: {e}"),
    }
}

impl<S: Sleep + 'static> Demo for TableDemo<S> {
    fn name(&self) -> &'static str {
        "table"
    }

    fn resize(&mut self, width: f64, height: f64) -> (f64, f64) {
        self.changed();
        (width, height)
    }

    fn control(&mut self, name: &str, value: &str) -> bool {
        match name {
            "category" => match Category::from_label(value) {
                Some(category) => self.toggle_category(category),
                None => log::debug!("ignoring category {value:?}"),
            },
            "min_value" => self.set_min_value_text(value),
            "sort" => match value.trim().to_ascii_lowercase().as_str() {
                "asc" | "ascending" => self.set_sort(SortOrder::Ascending),
                "desc" | "descending" => self.set_sort(SortOrder::Descending),
                other => log::debug!("ignoring sort order {other:?}"),
            },
            "view" => match value.trim().to_ascii_lowercase().as_str() {
                "table" => self.set_view(TableView::Table),
                "chart" => self.set_view(TableView::Chart),
                other => log::debug!("ignoring table view {other:?}"),
            },
            "select" => {
                self.select(value.trim());
            }
            "deselect" => self.deselect(),
            "edit" => self.set_editing_value(value),
            "update_value" => spawn_mutation("update", self.update_value()),
            "set_category" => match Category::from_label(value) {
                Some(category) => spawn_mutation("update", self.update_category(category)),
                None => log::debug!("ignoring category {value:?}"),
            },
            "regenerate" => spawn_mutation("regenerate", self.regenerate()),
            "retry" | "refetch" => {
                if let Err(e) = self.retry() {
                    log::debug!("retry not started: {e}");
                }
            }
            _ => return false,
        }
        true
    }

    fn frame(&mut self, _elapsed_ms: f64, surface: &mut dyn Surface) -> Result<()> {
        if self.needs_fetch() {
            platform::spawn_local(self.load());
        }
        let size = surface.size();
        if surface.is_empty() || !self.gate.needs_paint(size) {
            return Ok(());
        }
        self.paint(surface);
        self.gate.painted(size);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::generate_dataset;
    use crate::renderer::RecordingSurface;
    use crate::renderer::scene::{TABLE_HEADER, format_row};
    use pollster::block_on;

    fn loaded() -> TableDemo {
        let demo = TableDemo::default();
        block_on(demo.load());
        demo
    }

    #[test]
    fn test_first_frame_loads_and_paints() {
        let mut demo = TableDemo::default();
        assert_eq!(demo.status(), QueryStatus::Idle);
        let mut surface = RecordingSurface::new(400.0, 600.0);
        demo.frame(0.0, &mut surface).unwrap();

        assert_eq!(demo.status(), QueryStatus::Success);
        assert_eq!(demo.data(), Some(generate_dataset(20, 1)));
        let texts = surface.texts();
        assert!(texts.contains(&TABLE_HEADER));
        let rows = demo.rows();
        assert_eq!(rows.len(), 20);
        assert!(rows.windows(2).all(|w| w[0].value <= w[1].value));
        assert!(texts.contains(&format_row(&rows[0]).as_str()));
        assert!(texts.iter().any(|t| t.starts_with("Last updated: ")));
    }

    #[test]
    fn test_loading_state_while_in_flight() {
        let mut demo = TableDemo::default();
        let _pending = demo.load();
        assert_eq!(demo.status(), QueryStatus::Loading);
        assert!(!demo.needs_fetch());

        let mut surface = RecordingSurface::new(400.0, 300.0);
        demo.frame(0.0, &mut surface).unwrap();
        assert_eq!(surface.texts(), vec![LOADING_MESSAGE]);

        // A second load while the first is unsettled does nothing
        block_on(demo.load());
        assert_eq!(demo.status(), QueryStatus::Loading);
    }

    #[test]
    fn test_local_filters_and_sort() {
        let mut demo = loaded();
        demo.control("min_value", "40");
        demo.control("min_value", "abc");
        assert_eq!(demo.query().min_value, 40.0);
        demo.control("sort", "desc");
        demo.control("category", "a");

        let rows = demo.rows();
        assert!(rows.iter().all(|r| r.value >= 40.0 && r.category != Category::A));
        assert!(rows.windows(2).all(|w| w[0].value >= w[1].value));

        demo.control("min_value", "500");
        assert_eq!(demo.query().min_value, 100.0);
        assert!(demo.rows().is_empty());

        let mut surface = RecordingSurface::new(400.0, 300.0);
        demo.frame(0.0, &mut surface).unwrap();
        assert!(surface.texts().contains(&EMPTY_MESSAGE));
    }

    #[test]
    fn test_select_and_update_value() {
        let mut demo = loaded();
        let target = demo.rows()[3].clone();
        assert!(demo.select(&target.id));
        assert_eq!(demo.editing_value(), target.value.to_string());
        assert!(!demo.select("missing"));

        demo.set_editing_value("42.5");
        let updated = block_on(demo.update_value().unwrap()).unwrap();
        assert_eq!(updated.value, 42.5);
        assert_eq!(demo.selected().map(|r| r.value), Some(42.5));
        assert_eq!(demo.editing_value(), "42.5");
        assert!(!demo.is_update_pending());
    }

    #[test]
    fn test_update_category() {
        let mut demo = loaded();
        let id = demo.rows()[0].id.clone();
        demo.select(&id);
        let updated = block_on(demo.update_category(Category::C).unwrap()).unwrap();
        assert_eq!(updated.category, Category::C);
        assert_eq!(demo.selected().map(|r| r.category), Some(Category::C));
    }

    #[test]
    fn test_update_requires_selection_and_number() {
        let mut demo = loaded();
        assert!(matches!(demo.update_value(), Err(DemoError::InvalidInput(_))));
        let id = demo.rows()[0].id.clone();
        demo.select(&id);
        demo.set_editing_value("");
        assert!(matches!(demo.update_value(), Err(DemoError::InvalidInput(_))));
        demo.deselect();
        assert!(matches!(demo.update_category(Category::A), Err(DemoError::InvalidInput(_))));
    }

    #[test]
    fn test_missing_id_surfaces_message() {
        let mut demo = loaded();
        let err = block_on(demo.update(UpdateDataPointInput::value("missing", 1.0)).unwrap()).unwrap_err();
        assert!(matches!(err, DemoError::NotFound { .. }));
        assert_eq!(
            demo.error_message().as_deref(),
            Some("Data point with id \"missing\" not found")
        );

        let mut surface = RecordingSurface::new(400.0, 600.0);
        demo.frame(0.0, &mut surface).unwrap();
        assert!(
            surface
                .texts()
                .contains(&"Error updating: Data point with id \"missing\" not found")
        );

        // Cleared by the next successful update
        let id = demo.rows()[0].id.clone();
        block_on(demo.update(UpdateDataPointInput::value(id, 10.0)).unwrap()).unwrap();
        assert_eq!(demo.error_message(), None);
    }

    #[test]
    fn test_overlapping_update_rejected() {
        let demo = loaded();
        let id = demo.rows()[0].id.clone();
        let first = demo.update(UpdateDataPointInput::value(&id, 1.0)).unwrap();
        assert!(demo.is_update_pending());
        assert!(matches!(
            demo.update(UpdateDataPointInput::value(&id, 2.0)),
            Err(DemoError::RequestPending)
        ));
        block_on(first).unwrap();
        assert!(demo.update(UpdateDataPointInput::value(&id, 2.0)).is_ok());
    }

    #[test]
    fn test_regenerate_invalidates_and_refetches() {
        let mut demo = loaded();
        block_on(demo.regenerate().unwrap()).unwrap();
        assert!(demo.needs_fetch());
        assert_eq!(demo.api().current_seed(), 21);

        let mut surface = RecordingSurface::new(400.0, 600.0);
        demo.frame(0.0, &mut surface).unwrap();
        assert!(!demo.needs_fetch());
        assert_eq!(demo.data(), Some(generate_dataset(20, 21)));
    }

    #[test]
    fn test_regenerate_rejected_while_loading() {
        let demo = TableDemo::default();
        let _pending = demo.load();
        assert!(matches!(demo.regenerate(), Err(DemoError::RequestPending)));
    }

    #[test]
    fn test_retry_recovers_from_failed_load() {
        let mut demo = TableDemo::default();
        {
            let model = &mut *demo.model.borrow_mut();
            model.queries.begin_fetch(&model.key);
        }
        assert!(matches!(demo.retry(), Err(DemoError::RequestPending)));
        {
            let model = &mut *demo.model.borrow_mut();
            let key = model.key.clone();
            model.queries.settle(&key, Err(DemoError::SurfaceUnavailable), 0.0);
        }
        assert_eq!(demo.status(), QueryStatus::Error);
        assert!(!demo.needs_fetch());

        let mut surface = RecordingSurface::new(400.0, 600.0);
        demo.frame(0.0, &mut surface).unwrap();
        assert!(
            surface
                .texts()
                .contains(&"Error loading dataset: Drawing surface unavailable")
        );

        assert!(demo.control("retry", ""));
        assert!(demo.needs_fetch());
        demo.frame(16.0, &mut surface).unwrap();
        assert_eq!(demo.status(), QueryStatus::Success);
        assert_eq!(demo.data(), Some(generate_dataset(20, 1)));
        assert!(surface.texts().contains(&TABLE_HEADER));
    }

    #[test]
    fn test_min_value_truncates_fractions() {
        let mut demo = loaded();
        demo.control("min_value", "12.9");
        assert_eq!(demo.query().min_value, 12.0);
        demo.control("min_value", "-3.5");
        assert_eq!(demo.query().min_value, 0.0);
        demo.control("min_value", "twelve");
        assert_eq!(demo.query().min_value, 0.0);
    }

    #[test]
    fn test_chart_view_paints_bars() {
        let mut demo = loaded();
        assert!(demo.control("view", "chart"));
        assert_eq!(demo.view(), TableView::Chart);
        let mut surface = RecordingSurface::new(240.0, 160.0);
        demo.frame(0.0, &mut surface).unwrap();

        let bars = demo.bars();
        assert_eq!(bars.iter().map(|b| b.count).sum::<usize>(), 20);
        assert_eq!(surface.rect_count(), bars.iter().filter(|b| b.count > 0).count());
        let texts = surface.texts();
        for label in ["A", "B", "C"] {
            assert!(texts.contains(&label));
        }
    }

    #[test]
    fn test_repaints_only_when_changed() {
        let mut demo = loaded();
        let mut surface = RecordingSurface::new(400.0, 600.0);
        demo.frame(0.0, &mut surface).unwrap();
        demo.frame(16.0, &mut surface).unwrap();
        assert_eq!(surface.frames(), 1);
        demo.control("sort", "desc");
        demo.frame(32.0, &mut surface).unwrap();
        assert_eq!(surface.frames(), 2);
        assert!(!demo.control("particle_count", "10"));
    }
}
