//! # Store Events
//!
//! Views learn about store changes through an observer instead of watching
//! fields. Every tracked operation emits `Loading` when it starts and either
//! `Settled` or `Failed` when it ends.

/// What happened to a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Loading,
    Settled,
    Failed,
}

/// A state change of one store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEvent {
    /// Store name: `"session"`, `"book"`, `"category"`, `"role"`, `"borrow"`.
    pub store: &'static str,
    /// Operation that caused the change, e.g. `"login"` or `"list"`.
    pub operation: &'static str,
    pub change: Change,
}

/// Trait for observing store changes (implemented by the view layer).
pub trait StoreObserver: Send + Sync {
    fn state_changed(&self, event: &StoreEvent);
}

/// No-op observer for headless use and tests.
pub struct NoOpObserver;

impl StoreObserver for NoOpObserver {
    fn state_changed(&self, _event: &StoreEvent) {}
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Observer that remembers every event it sees.
    #[derive(Default)]
    pub struct RecordingObserver {
        events: Mutex<Vec<StoreEvent>>,
    }

    impl RecordingObserver {
        pub fn events(&self) -> Vec<StoreEvent> {
            self.events.lock().unwrap().clone()
        }

        pub fn changes(&self) -> Vec<Change> {
            self.events().into_iter().map(|e| e.change).collect()
        }
    }

    impl StoreObserver for RecordingObserver {
        fn state_changed(&self, event: &StoreEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }
}
