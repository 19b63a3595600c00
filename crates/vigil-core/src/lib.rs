//! # vigil-core
//!
//! The VIGIL agent/task monitor: an in-process bookkeeping ledger for
//! extraction workers.
//!
//! ## Overview
//!
//! An extraction worker registers itself as an agent, gets tasks assigned,
//! and reports status transitions, progress fractions, and heartbeats.  A
//! dashboard-facing caller polls the summary views and stall detection.  The
//! monitor records all of it under one lock, snapshots the full state to a
//! `SnapshotStore` on every mutation, and fans events out to registered
//! `EventSink`s after the lock is released.
//!
//! The monitor observes; it never schedules, dispatches, or retries work.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vigil_core::{AgentMonitor, MonitorConfig};
//! use vigil_persist::JsonSnapshotStore;
//!
//! let config = MonitorConfig::default();
//! let store = JsonSnapshotStore::new(&config.snapshot_path);
//! let monitor = AgentMonitor::with_config(Box::new(store), config);
//!
//! let agent_id = monitor.register_agent("Extractor-Primary", "gemini_extractor", Default::default());
//! let task_id = monitor.assign_task(&agent_id, "Extract pages 6-50", "page_extraction",
//!     Default::default(), (6..=50).collect(), Default::default())?;
//! monitor.update_task_progress(&task_id, 0.5, (6..=28).collect())?;
//! println!("{:.0}%", monitor.summary().overall_progress * 100.0);
//! ```

pub mod config;
pub mod monitor;
pub mod summary;
pub mod traits;

pub use config::MonitorConfig;
pub use monitor::AgentMonitor;
pub use summary::{ActivityEntry, ActivityKind, AgentSummary, MonitorSummary};
pub use traits::{EventSink, SnapshotStore};
