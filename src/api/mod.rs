//! Simulated backend for the table demo
//!
//! An in-memory dataset behind async calls that wait 250-800 ms before
//! answering. The wait goes through the [`Sleep`] seam so tests and the
//! headless runner can resolve immediately.

pub mod query;

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::SEED_BUMP_MODULUS;
use crate::data::{Category, DataPoint, generate_dataset};
use crate::error::{DemoError, Result};
use crate::settings::TableSettings;

pub use query::{MutationState, QueryCache, QueryKey, QueryStatus};

/// Boxed local future, the return type of [`Sleep::sleep`]
pub type LocalFuture<T> = Pin<Box<dyn Future<Output = T>>>;

/// Waits for a number of milliseconds without blocking the UI thread
pub trait Sleep {
    fn sleep(&self, ms: f64) -> LocalFuture<()>;
}

/// Resolves immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Sleep for NoDelay {
    fn sleep(&self, _ms: f64) -> LocalFuture<()> {
        Box::pin(std::future::ready(()))
    }
}

/// `setTimeout` wrapped in a promise
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTimer;

#[cfg(target_arch = "wasm32")]
impl Sleep for BrowserTimer {
    fn sleep(&self, ms: f64) -> LocalFuture<()> {
        use wasm_bindgen::JsValue;

        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            let scheduled = web_sys::window().is_some_and(|w| {
                w.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms as i32)
                    .is_ok()
            });
            if !scheduled {
                let _ = resolve.call0(&JsValue::UNDEFINED);
            }
        });
        Box::pin(async move {
            let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
        })
    }
}

/// Query parameters for dataset calls; unset fields use backend defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetParams {
    pub count: Option<usize>,
    pub seed: Option<i32>,
}

/// Partial update for one record; unset fields are left alone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateDataPointInput {
    pub id: String,
    pub value: Option<f64>,
    pub category: Option<Category>,
}

impl UpdateDataPointInput {
    pub fn value(id: impl Into<String>, value: f64) -> Self {
        Self {
            id: id.into(),
            value: Some(value),
            category: None,
        }
    }

    pub fn category(id: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            value: None,
            category: Some(category),
        }
    }
}

/// In-memory dataset with injected latency
pub struct DataApi<S = NoDelay> {
    db: RefCell<Option<Vec<DataPoint>>>,
    current_seed: Cell<i32>,
    default_count: usize,
    latency_min_ms: f64,
    latency_max_ms: f64,
    latency_rng: RefCell<Pcg32>,
    sleep: S,
}

impl<S: Sleep> DataApi<S> {
    pub fn new(settings: &TableSettings, sleep: S) -> Self {
        let min = f64::from(settings.latency_min_ms);
        let max = f64::from(settings.latency_max_ms).max(min);
        Self {
            db: RefCell::new(None),
            current_seed: Cell::new(settings.seed),
            default_count: settings.backend_default_count,
            latency_min_ms: min,
            latency_max_ms: max,
            latency_rng: RefCell::new(Pcg32::seed_from_u64(settings.latency_seed)),
            sleep,
        }
    }

    /// Number of records held, or `None` before the first call initialises the store
    pub fn len(&self) -> Option<usize> {
        self.db.borrow().as_ref().map(Vec::len)
    }

    pub fn current_seed(&self) -> i32 {
        self.current_seed.get()
    }

    /// Draw the next simulated round trip, in ms
    pub fn next_latency_ms(&self) -> f64 {
        let r: f64 = self.latency_rng.borrow_mut().random();
        self.latency_min_ms + r * (self.latency_max_ms - self.latency_min_ms)
    }

    async fn with_latency(&self) {
        let ms = self.next_latency_ms();
        log::trace!("simulated latency {ms:.0}ms");
        self.sleep.sleep(ms).await;
    }

    fn init_db(&self, params: DatasetParams) {
        let count = params.count.unwrap_or(self.default_count);
        let seed = params.seed.unwrap_or(self.current_seed.get());
        self.current_seed.set(seed);
        *self.db.borrow_mut() = Some(generate_dataset(count, seed));
        log::info!("backend dataset initialised: {count} records, seed {seed}");
    }

    fn snapshot(&self) -> Vec<DataPoint> {
        self.db.borrow().clone().unwrap_or_default()
    }

    /// Current dataset; the first call initialises it from `params`
    pub async fn fetch_dataset(&self, params: DatasetParams) -> Result<Vec<DataPoint>> {
        self.with_latency().await;
        if self.db.borrow().is_none() {
            self.init_db(params);
        }
        Ok(self.snapshot())
    }

    /// Replace the dataset; the seed defaults to a bump of the current size
    pub async fn regenerate_dataset(&self, params: DatasetParams) -> Result<Vec<DataPoint>> {
        self.with_latency().await;
        let len = self.len();
        let seed = params
            .seed
            .unwrap_or_else(|| (len.unwrap_or(self.default_count) % SEED_BUMP_MODULUS) as i32 + 1);
        let count = params.count.or(len).unwrap_or(self.default_count);
        self.init_db(DatasetParams {
            count: Some(count),
            seed: Some(seed),
        });
        Ok(self.snapshot())
    }

    /// Patch one record by id; unknown ids fail with [`DemoError::NotFound`]
    pub async fn update_data_point(&self, input: UpdateDataPointInput) -> Result<DataPoint> {
        self.with_latency().await;
        if self.db.borrow().is_none() {
            self.init_db(DatasetParams::default());
        }

        let mut db = self.db.borrow_mut();
        let record = db
            .as_mut()
            .and_then(|records| records.iter_mut().find(|p| p.id == input.id))
            .ok_or_else(|| DemoError::NotFound { id: input.id.clone() })?;

        if let Some(value) = input.value {
            record.value = value;
        }
        if let Some(category) = input.category {
            record.category = category;
        }
        log::debug!("updated {}", record.id);
        Ok(record.clone())
    }
}
