//! Client-side request state for the table demo
//!
//! Kept separate from the synchronous demo stores: entries change only when a
//! request starts or settles.

use std::collections::HashMap;

use crate::data::DataPoint;
use crate::error::{DemoError, Result};

/// Cache key: which dataset and how many records
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub source: String,
    pub count: usize,
}

impl QueryKey {
    pub fn new(source: impl Into<String>, count: usize) -> Self {
        Self {
            source: source.into(),
            count,
        }
    }
}

/// What the UI should show for one query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// First fetch in flight, nothing to show yet
    Loading,
    /// Fetch failed and there is no earlier data
    Error,
    /// Data available (possibly refetching in the background)
    Success,
    /// Never requested
    Idle,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Entry {
    data: Option<Vec<DataPoint>>,
    updated_at_ms: Option<f64>,
    error: Option<String>,
    fetching: bool,
    stale: bool,
}

#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<QueryKey, Entry>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, key: &QueryKey) -> QueryStatus {
        match self.entries.get(key) {
            None => QueryStatus::Idle,
            Some(e) if e.data.is_some() => QueryStatus::Success,
            Some(e) if e.fetching => QueryStatus::Loading,
            Some(e) if e.error.is_some() => QueryStatus::Error,
            Some(_) => QueryStatus::Idle,
        }
    }

    pub fn data(&self, key: &QueryKey) -> Option<&[DataPoint]> {
        self.entries.get(key).and_then(|e| e.data.as_deref())
    }

    pub fn error(&self, key: &QueryKey) -> Option<&str> {
        self.entries.get(key).and_then(|e| e.error.as_deref())
    }

    pub fn updated_at_ms(&self, key: &QueryKey) -> Option<f64> {
        self.entries.get(key).and_then(|e| e.updated_at_ms)
    }

    pub fn is_fetching(&self, key: &QueryKey) -> bool {
        self.entries.get(key).is_some_and(|e| e.fetching)
    }

    /// True when the entry is missing or was invalidated
    pub fn needs_fetch(&self, key: &QueryKey) -> bool {
        self.entries.get(key).is_none_or(|e| e.stale || (e.data.is_none() && !e.fetching && e.error.is_none()))
    }

    /// Mark a fetch as started; returns false when one is already in flight
    pub fn begin_fetch(&mut self, key: &QueryKey) -> bool {
        let entry = self.entries.entry(key.clone()).or_default();
        if entry.fetching {
            return false;
        }
        entry.fetching = true;
        true
    }

    /// Settle a fetch. A failure keeps any earlier data.
    pub fn settle(&mut self, key: &QueryKey, result: Result<Vec<DataPoint>>, now_ms: f64) {
        let entry = self.entries.entry(key.clone()).or_default();
        entry.fetching = false;
        entry.stale = false;
        match result {
            Ok(data) => {
                entry.data = Some(data);
                entry.updated_at_ms = Some(now_ms);
                entry.error = None;
            }
            Err(e) => {
                log::warn!("query {:?} failed: {e}", key.source);
                entry.error = Some(e.to_string());
            }
        }
    }

    /// Write a confirmed record into the cached data
    pub fn replace_record(&mut self, key: &QueryKey, updated: &DataPoint) -> bool {
        let Some(data) = self.entries.get_mut(key).and_then(|e| e.data.as_mut()) else {
            return false;
        };
        match data.iter_mut().find(|row| row.id == updated.id) {
            Some(row) => {
                *row = updated.clone();
                true
            }
            None => false,
        }
    }

    /// Ask for a refetch after a settled request, failed or not. Returns false
    /// while a fetch is still in flight.
    pub fn retry(&mut self, key: &QueryKey) -> bool {
        let entry = self.entries.entry(key.clone()).or_default();
        if entry.fetching {
            return false;
        }
        entry.stale = true;
        true
    }

    /// Mark the entry stale; the next poll refetches
    pub fn invalidate(&mut self, key: &QueryKey) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.stale = true;
        }
    }
}

/// One mutation slot: at most one request in flight
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MutationState {
    #[default]
    Idle,
    Pending,
    Success,
    Error(String),
}

impl MutationState {
    pub fn is_pending(&self) -> bool {
        matches!(self, MutationState::Pending)
    }

    /// Enter `Pending`; rejected while a previous request is unsettled
    pub fn begin(&mut self) -> Result<()> {
        if self.is_pending() {
            return Err(DemoError::RequestPending);
        }
        *self = MutationState::Pending;
        Ok(())
    }

    pub fn settle<T>(&mut self, result: &Result<T>) {
        *self = match result {
            Ok(_) => MutationState::Success,
            Err(e) => MutationState::Error(e.to_string()),
        };
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            MutationState::Error(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::generate_dataset;

    fn key() -> QueryKey {
        QueryKey::new("state-driven-viz", 20)
    }

    #[test]
    fn test_query_lifecycle() {
        let mut cache = QueryCache::new();
        let key = key();
        assert_eq!(cache.status(&key), QueryStatus::Idle);
        assert!(cache.needs_fetch(&key));

        assert!(cache.begin_fetch(&key));
        assert!(!cache.begin_fetch(&key));
        assert_eq!(cache.status(&key), QueryStatus::Loading);

        cache.settle(&key, Ok(generate_dataset(20, 1)), 1234.0);
        assert_eq!(cache.status(&key), QueryStatus::Success);
        assert_eq!(cache.updated_at_ms(&key), Some(1234.0));
        assert!(!cache.needs_fetch(&key));

        cache.invalidate(&key);
        assert!(cache.needs_fetch(&key));
        assert_eq!(cache.status(&key), QueryStatus::Success);
    }

    #[test]
    fn test_first_fetch_failure_is_error() {
        let mut cache = QueryCache::new();
        let key = key();
        cache.begin_fetch(&key);
        cache.settle(&key, Err(DemoError::SurfaceUnavailable), 0.0);
        assert_eq!(cache.status(&key), QueryStatus::Error);
        assert!(cache.error(&key).is_some());
        assert!(!cache.needs_fetch(&key));
    }

    #[test]
    fn test_retry_after_failure_refetches() {
        let mut cache = QueryCache::new();
        let key = key();
        cache.begin_fetch(&key);
        assert!(!cache.retry(&key));
        cache.settle(&key, Err(DemoError::SurfaceUnavailable), 0.0);

        assert!(cache.retry(&key));
        assert!(cache.needs_fetch(&key));
        // The error stays up until the refetch settles
        assert_eq!(cache.status(&key), QueryStatus::Error);

        assert!(cache.begin_fetch(&key));
        assert_eq!(cache.status(&key), QueryStatus::Loading);
        cache.settle(&key, Ok(generate_dataset(20, 1)), 5.0);
        assert_eq!(cache.status(&key), QueryStatus::Success);
        assert_eq!(cache.error(&key), None);
        assert!(!cache.needs_fetch(&key));
    }

    #[test]
    fn test_replace_record_uses_same_key() {
        let mut cache = QueryCache::new();
        let key = key();
        cache.begin_fetch(&key);
        cache.settle(&key, Ok(generate_dataset(20, 1)), 0.0);

        let mut updated = cache.data(&key).unwrap()[2].clone();
        updated.value = 99.0;
        assert!(cache.replace_record(&key, &updated));
        assert_eq!(cache.data(&key).unwrap()[2].value, 99.0);

        updated.id = "missing".into();
        assert!(!cache.replace_record(&key, &updated));
        assert!(!cache.replace_record(&QueryKey::new("other", 20), &updated));
    }

    #[test]
    fn test_mutation_rejects_overlap() {
        let mut m = MutationState::default();
        m.begin().unwrap();
        assert!(matches!(m.begin(), Err(DemoError::RequestPending)));
        m.settle::<()>(&Err(DemoError::NotFound { id: "x".into() }));
        assert_eq!(m.error(), Some("Data point with id \"x\" not found"));
        m.begin().unwrap();
        m.settle(&Ok(()));
        assert_eq!(m, MutationState::Success);
    }
}
