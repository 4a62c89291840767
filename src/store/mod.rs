//! Reactive state stores
//!
//! One `Store` per demo. Every mutation produces a fresh snapshot (previously
//! handed-out snapshots never change) and notifies subscribers synchronously,
//! before the mutating call returns. No batching, no deferred dispatch.

pub mod particles;
pub mod stitches;
pub mod viz;

use std::rc::Rc;

pub use particles::{EmitterState, ParticleState};
pub use stitches::StitchesState;
pub use viz::{DensitySettings, Filters, ValueRange, ViewMode, VizState};

/// Handle returned by [`Store::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Listener<S> = Box<dyn FnMut(&S)>;

/// State holder with subscribe/notify
pub struct Store<S> {
    state: Rc<S>,
    listeners: Vec<(Subscription, Listener<S>)>,
    next_id: u64,
    version: u64,
}

impl<S> Store<S> {
    pub fn new(initial: S) -> Self {
        Self {
            state: Rc::new(initial),
            listeners: Vec::new(),
            next_id: 1,
            version: 0,
        }
    }

    /// Current snapshot
    pub fn get_state(&self) -> Rc<S> {
        Rc::clone(&self.state)
    }

    /// Borrow the current snapshot without bumping the refcount
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Number of snapshots produced so far
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replace the state with the snapshot produced by `f`
    pub fn set_state(&mut self, f: impl FnOnce(&S) -> S) {
        let next = f(&self.state);
        self.state = Rc::new(next);
        self.version += 1;
        self.notify();
    }

    /// Register a listener; it runs after every mutation until unsubscribed
    pub fn subscribe(&mut self, listener: impl FnMut(&S) + 'static) -> Subscription {
        let id = Subscription(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns false if it was already gone
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != subscription);
        self.listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    fn notify(&mut self) {
        let state = Rc::clone(&self.state);
        for (_, listener) in &mut self.listeners {
            listener(&state);
        }
    }
}

impl<S: Clone> Store<S> {
    /// Copy-on-write update: clone the current snapshot, mutate the copy
    pub fn update(&mut self, f: impl FnOnce(&mut S)) {
        self.set_state(|current| {
            let mut next = current.clone();
            f(&mut next);
            next
        });
    }
}

impl<S: Default> Default for Store<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("subscribers", &self.listeners.len())
            .field("version", &self.version)
            .finish()
    }
}
