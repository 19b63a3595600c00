//! Status and priority vocabularies.
//!
//! Both enums are closed: the monitor never stores a free-form status string,
//! so an invalid status is unrepresentable.  On the wire (snapshot file,
//! summary JSON) variants appear as lowercase string literals.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status shared by agents and tasks.
///
/// The monitor records transitions without enforcing a state machine — any
/// status may follow any other.  The only statuses it interprets are the
/// terminal ones, which stop liveness tracking and stamp `completed_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Pending,
    Initializing,
    Running,
    Paused,
    Completed,
    Failed,
    Cancelled,
}

impl AgentStatus {
    /// Every status variant, in declaration order.
    ///
    /// Used by the summary views to produce zero-filled per-status counts.
    pub const ALL: [AgentStatus; 7] = [
        AgentStatus::Pending,
        AgentStatus::Initializing,
        AgentStatus::Running,
        AgentStatus::Paused,
        AgentStatus::Completed,
        AgentStatus::Failed,
        AgentStatus::Cancelled,
    ];

    /// Return true for `completed`, `failed`, and `cancelled`.
    ///
    /// Terminal agents are excluded from stall detection; terminal tasks are
    /// excluded from the incomplete-task list.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            AgentStatus::Completed | AgentStatus::Failed | AgentStatus::Cancelled
        )
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AgentStatus::Pending => "pending",
            AgentStatus::Initializing => "initializing",
            AgentStatus::Running => "running",
            AgentStatus::Paused => "paused",
            AgentStatus::Completed => "completed",
            AgentStatus::Failed => "failed",
            AgentStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Advisory priority attached to a task at assignment time.
///
/// The monitor stores and reports it; it never orders execution by it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Normal,
    High,
    Critical,
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskPriority::Low => "low",
            TaskPriority::Normal => "normal",
            TaskPriority::High => "high",
            TaskPriority::Critical => "critical",
        };
        f.write_str(s)
    }
}
