//! The durable snapshot document.
//!
//! Every successful mutation serializes the full entity store to a single
//! JSON document and overwrites the previous one — no appends, no partial
//! writes.  On startup the monitor seeds itself from this document if it
//! exists and parses; a corrupt file falls back cleanly to empty state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{agent::AgentRecord, task::TaskRecord};

/// The full serialized state of the monitor: all agents and all tasks.
///
/// Timestamps serialize as ISO-8601 strings and enumerations as lowercase
/// literals, so the document is directly inspectable by an operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorSnapshot {
    /// Every registered agent, in id order.
    pub agents: Vec<AgentRecord>,
    /// Every assigned task, in id order.
    pub tasks: Vec<TaskRecord>,
    /// When this snapshot was taken (UTC).
    pub saved_at: DateTime<Utc>,
}

impl MonitorSnapshot {
    /// An empty snapshot timestamped now.
    pub fn empty() -> Self {
        Self {
            agents: Vec::new(),
            tasks: Vec::new(),
            saved_at: Utc::now(),
        }
    }
}
