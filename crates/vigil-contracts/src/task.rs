//! The task record: one unit of work assigned to exactly one agent.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    agent::Metadata,
    ident::{AgentId, TaskId},
    status::{AgentStatus, TaskPriority},
};

/// Everything the monitor knows about one assigned task.
///
/// Created by `assign_task` and owned by exactly one agent for its whole
/// lifetime.  Like agents, tasks are append-only: they are never deleted,
/// only transitioned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Opaque unique identifier, assigned at creation, immutable.
    pub task_id: TaskId,
    /// The owning agent.  Validated to exist at assignment time.
    pub agent_id: AgentId,
    /// Caller-supplied free-text description.
    pub description: String,
    /// Caller-supplied classification (e.g. "page_extraction", "validation").
    pub task_type: String,
    /// Advisory priority.  Never used to order execution.
    pub priority: TaskPriority,
    /// Current lifecycle status.  Starts as `pending`.
    pub status: AgentStatus,
    /// Completion fraction in [0.0, 1.0].  Out-of-range reports are rejected.
    pub progress: f64,
    /// Page numbers the task was assigned to process, fixed at creation.
    pub pages_assigned: BTreeSet<u32>,
    /// Page numbers reported done so far.  Accumulates by union; re-reporting
    /// a page is a no-op.
    pub pages_completed: BTreeSet<u32>,
    /// When the task was assigned (UTC).
    pub created_at: DateTime<Utc>,
    /// Bumped on every status or progress mutation.
    pub updated_at: DateTime<Utc>,
    /// Stamped the first time status becomes `running`.
    pub started_at: Option<DateTime<Utc>>,
    /// Stamped whenever status transitions to a terminal value.
    pub completed_at: Option<DateTime<Utc>>,
    /// Failure detail.  Recorded only when status becomes `failed`.
    pub error: Option<String>,
    /// Caller-defined key/value data, opaque to the monitor.
    pub metadata: Metadata,
}
