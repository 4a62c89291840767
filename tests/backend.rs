//! Simulated backend and query cache working together

use std::cell::Cell;
use std::rc::Rc;

use canvas_demos::DemoError;
use canvas_demos::api::{
    DataApi, DatasetParams, LocalFuture, QueryCache, QueryKey, QueryStatus, Sleep, UpdateDataPointInput,
};
use canvas_demos::data::{Category, generate_dataset};
use canvas_demos::settings::TableSettings;
use pollster::block_on;

/// Records every requested delay and resolves immediately
#[derive(Clone, Default)]
struct CountingSleep {
    calls: Rc<Cell<usize>>,
    total_ms: Rc<Cell<f64>>,
}

impl Sleep for CountingSleep {
    fn sleep(&self, ms: f64) -> LocalFuture<()> {
        self.calls.set(self.calls.get() + 1);
        self.total_ms.set(self.total_ms.get() + ms);
        Box::pin(std::future::ready(()))
    }
}

fn table_params() -> DatasetParams {
    DatasetParams {
        count: Some(20),
        seed: Some(1),
    }
}

#[test]
fn every_call_waits_inside_the_latency_window() {
    let sleep = CountingSleep::default();
    let api = DataApi::new(&TableSettings::default(), sleep.clone());

    let data = block_on(api.fetch_dataset(table_params())).unwrap();
    block_on(api.update_data_point(UpdateDataPointInput::value(&data[0].id, 5.0))).unwrap();
    block_on(api.regenerate_dataset(DatasetParams::default())).unwrap();

    assert_eq!(sleep.calls.get(), 3);
    let total = sleep.total_ms.get();
    assert!((750.0..=2400.0).contains(&total), "total latency {total}");
}

#[test]
fn failed_update_still_waits() {
    let sleep = CountingSleep::default();
    let api = DataApi::new(&TableSettings::default(), sleep.clone());
    block_on(api.fetch_dataset(table_params())).unwrap();
    let err = block_on(api.update_data_point(UpdateDataPointInput::category("nope", Category::A))).unwrap_err();
    assert!(matches!(err, DemoError::NotFound { .. }));
    assert_eq!(sleep.calls.get(), 2);
}

#[test]
fn cache_write_through_matches_backend() {
    let api = DataApi::new(&TableSettings::default(), canvas_demos::api::NoDelay);
    let key = QueryKey::new("state-driven-viz", 20);
    let mut cache = QueryCache::new();

    assert!(cache.begin_fetch(&key));
    let result = block_on(api.fetch_dataset(table_params()));
    cache.settle(&key, result, 1.0);
    assert_eq!(cache.status(&key), QueryStatus::Success);

    let id = cache.data(&key).unwrap()[7].id.clone();
    let updated = block_on(api.update_data_point(UpdateDataPointInput::value(&id, 66.0))).unwrap();
    assert!(cache.replace_record(&key, &updated));

    let backend = block_on(api.fetch_dataset(DatasetParams::default())).unwrap();
    assert_eq!(cache.data(&key).unwrap(), backend.as_slice());
}

#[test]
fn regenerate_then_refetch_sees_new_seed() {
    let api = DataApi::new(&TableSettings::default(), canvas_demos::api::NoDelay);
    let key = QueryKey::new("state-driven-viz", 20);
    let mut cache = QueryCache::new();
    cache.begin_fetch(&key);
    cache.settle(&key, block_on(api.fetch_dataset(table_params())), 1.0);

    block_on(api.regenerate_dataset(DatasetParams {
        count: Some(20),
        seed: None,
    }))
    .unwrap();
    cache.invalidate(&key);
    assert!(cache.needs_fetch(&key));
    // Old rows stay visible while the refetch runs
    assert_eq!(cache.data(&key).unwrap(), generate_dataset(20, 1).as_slice());

    assert!(cache.begin_fetch(&key));
    cache.settle(&key, block_on(api.fetch_dataset(DatasetParams::default())), 2.0);
    assert_eq!(cache.data(&key).unwrap(), generate_dataset(20, 21).as_slice());
    assert_eq!(cache.updated_at_ms(&key), Some(2.0));
}
