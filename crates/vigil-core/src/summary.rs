//! Read-only aggregation views over the entity store.
//!
//! These types are computed fresh on every call — the monitor caches
//! nothing.  They are plain data: serializable so an HTTP or dashboard
//! layer can hand them straight to a renderer.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vigil_contracts::{agent::AgentRecord, status::AgentStatus, task::TaskRecord};

/// A zero-filled per-status count map covering every status variant.
///
/// Zero-filling keeps the summary shape stable for consumers regardless of
/// which statuses are currently in use.
pub type StatusCounts = BTreeMap<AgentStatus, usize>;

/// One entry in the recent-activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// When the activity happened (task start or completion time).
    pub timestamp: DateTime<Utc>,
    /// What kind of activity this was.
    pub event: ActivityKind,
    /// Display name of the agent that owns the task, or "unknown" if the
    /// owning agent record is missing.
    pub agent: String,
    /// The task's description.
    pub description: String,
}

/// The activity feed's event vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    TaskStarted,
    TaskCompleted,
    TaskFailed,
}

/// The overall monitor summary: everything a dashboard needs in one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorSummary {
    /// Total number of registered agents.
    pub total_agents: usize,
    /// Agents per status, zero-filled across all variants.
    pub agents_by_status: StatusCounts,
    /// Total number of assigned tasks.
    pub total_tasks: usize,
    /// Tasks per status, zero-filled across all variants.
    pub tasks_by_status: StatusCounts,
    /// Arithmetic mean of all tasks' progress; 0.0 when there are no tasks.
    pub overall_progress: f64,
    /// Every registered agent, in id order.
    pub agents: Vec<AgentRecord>,
    /// Most recent task transitions, newest first, bounded by the configured
    /// recent-activity limit.
    pub recent_activity: Vec<ActivityEntry>,
}

/// A focused summary of one agent and its tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSummary {
    /// The agent record itself.
    pub agent: AgentRecord,
    /// Total number of tasks ever assigned to this agent.
    pub total_tasks: usize,
    /// This agent's tasks per status, zero-filled across all variants.
    pub tasks_by_status: StatusCounts,
    /// The task the agent last heartbeat against, if it still resolves.
    pub current_task: Option<TaskRecord>,
    /// The most recently created tasks, newest first, bounded by the
    /// configured recent-tasks limit.
    pub recent_tasks: Vec<TaskRecord>,
}

/// Build a zero-filled status count map from an iterator of statuses.
pub(crate) fn count_by_status(statuses: impl Iterator<Item = AgentStatus>) -> StatusCounts {
    let mut counts: StatusCounts = AgentStatus::ALL.into_iter().map(|s| (s, 0)).collect();
    for status in statuses {
        *counts.entry(status).or_insert(0) += 1;
    }
    counts
}
