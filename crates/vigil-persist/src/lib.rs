//! # vigil-persist
//!
//! Snapshot store implementations for the VIGIL agent monitor.
//!
//! - `JsonSnapshotStore` — the production store: one JSON document on disk,
//!   fully rewritten on every save via atomic rename
//! - `InMemorySnapshotStore` — the reference/test store: the last snapshot
//!   held in memory

pub mod file;
pub mod memory;

pub use file::JsonSnapshotStore;
pub use memory::InMemorySnapshotStore;

// ── Tests ─────────────────────────────────────────────────────────────────────
