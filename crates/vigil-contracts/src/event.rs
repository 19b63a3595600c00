//! Monitor event notifications.
//!
//! Every mutation queues one of these while the state lock is held; the
//! monitor dispatches them to registered sinks after the lock is released.
//! Events carry a clone of the record as it looked immediately after the
//! mutation, so sinks never need to re-query the store.

use serde::{Deserialize, Serialize};

use crate::{agent::AgentRecord, ident::AgentId, status::AgentStatus, task::TaskRecord};

/// A notification fanned out to registered event sinks after a mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MonitorEvent {
    /// A new agent was registered.
    AgentRegistered { agent: AgentRecord },

    /// An agent's status (and possibly activity text) changed.
    AgentStatusUpdated { agent: AgentRecord },

    /// An agent sent a liveness signal.
    Heartbeat { agent_id: AgentId },

    /// A new task was assigned to an agent.
    TaskAssigned { task: TaskRecord },

    /// A task's status changed.  `old_status` is the status before the
    /// mutation, so sinks can observe the transition itself.
    TaskStatusUpdated {
        task: TaskRecord,
        old_status: AgentStatus,
    },

    /// A task's progress fraction or completed-page set changed.
    TaskProgressUpdated { task: TaskRecord },

    /// The snapshot write that followed a mutation failed.  The in-memory
    /// mutation itself committed; the next mutation retries the write.
    SnapshotFailed { reason: String },
}

impl MonitorEvent {
    /// Stable discriminant name, used in structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            MonitorEvent::AgentRegistered { .. } => "agent_registered",
            MonitorEvent::AgentStatusUpdated { .. } => "agent_status_updated",
            MonitorEvent::Heartbeat { .. } => "heartbeat",
            MonitorEvent::TaskAssigned { .. } => "task_assigned",
            MonitorEvent::TaskStatusUpdated { .. } => "task_status_updated",
            MonitorEvent::TaskProgressUpdated { .. } => "task_progress_updated",
            MonitorEvent::SnapshotFailed { .. } => "snapshot_failed",
        }
    }
}
