//! Trait seams between the monitor and its collaborators.
//!
//! - `SnapshotStore` — the durability boundary (JSON file in production,
//!   in-memory in tests)
//! - `EventSink`     — the notification boundary (a dashboard refresher or
//!   any other interested listener)
//!
//! The monitor owns a `SnapshotStore` and calls `save()` inside its state
//! lock on every mutation; sinks are invoked strictly after the lock is
//! released.

use vigil_contracts::{error::VigilResult, event::MonitorEvent, snapshot::MonitorSnapshot};

/// Durable storage for the full monitor state.
///
/// Every save is a complete overwrite — implementations never append or
/// merge.  A failed save is reported to the monitor but does not roll back
/// the in-memory mutation; the next save rewrites everything anyway.
pub trait SnapshotStore: Send + Sync {
    /// Overwrite the stored document with `snapshot`.
    fn save(&self, snapshot: &MonitorSnapshot) -> VigilResult<()>;

    /// Load the stored document, if any.
    ///
    /// Returns `Ok(None)` when no snapshot has ever been saved.  Returns
    /// `Err(SnapshotFailed)` for an unreadable or unparsable document — the
    /// monitor treats that as "start empty", not as fatal.
    fn load(&self) -> VigilResult<Option<MonitorSnapshot>>;
}

/// A listener for monitor events.
///
/// Sinks run on the mutating caller's thread, after the state lock has been
/// released.  A sink may call back into the monitor — including mutations —
/// without deadlocking.  A panicking sink is caught and logged; it never
/// propagates to the mutation caller.
pub trait EventSink: Send + Sync {
    /// Receive one event.  Must not block for long; every mutation on the
    /// monitor waits for all sinks to return.
    fn on_event(&self, event: &MonitorEvent);
}
