//! In-memory implementation of `SnapshotStore`.
//!
//! `InMemorySnapshotStore` is the reference implementation of the trait:
//! one slot holding the last saved snapshot, behind a `Mutex`.  Useful for
//! tests and for running the monitor without durability.

use std::sync::{Arc, Mutex};

use vigil_contracts::{error::VigilResult, snapshot::MonitorSnapshot};
use vigil_core::traits::SnapshotStore;

/// The mutable interior of an `InMemorySnapshotStore`.
///
/// Kept behind `Arc<Mutex<_>>` so clones of the `Arc` can observe saves made
/// through the store, which is how tests assert persistence behavior.
pub(crate) struct InMemoryState {
    /// The most recently saved snapshot, if any.
    pub(crate) snapshot: Option<MonitorSnapshot>,
    /// How many times `save()` has been called.
    pub(crate) save_count: u64,
}

/// A `SnapshotStore` holding the last snapshot in memory.
#[derive(Clone)]
pub struct InMemorySnapshotStore {
    pub(crate) state: Arc<Mutex<InMemoryState>>,
}

impl InMemorySnapshotStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(InMemoryState {
                snapshot: None,
                save_count: 0,
            })),
        }
    }

    /// The most recently saved snapshot, if any.
    pub fn last_snapshot(&self) -> Option<MonitorSnapshot> {
        self.state
            .lock()
            .expect("snapshot slot lock poisoned")
            .snapshot
            .clone()
    }

    /// How many saves have happened.
    pub fn save_count(&self) -> u64 {
        self.state
            .lock()
            .expect("snapshot slot lock poisoned")
            .save_count
    }
}

impl Default for InMemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn save(&self, snapshot: &MonitorSnapshot) -> VigilResult<()> {
        let mut state = self.state.lock().expect("snapshot slot lock poisoned");
        state.snapshot = Some(snapshot.clone());
        state.save_count += 1;
        Ok(())
    }

    fn load(&self) -> VigilResult<Option<MonitorSnapshot>> {
        Ok(self
            .state
            .lock()
            .expect("snapshot slot lock poisoned")
            .snapshot
            .clone())
    }
}
