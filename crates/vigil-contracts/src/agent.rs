//! The agent record: one tracked extraction worker.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    ident::{AgentId, TaskId},
    status::AgentStatus,
};

/// Caller-defined key/value data attached to agents and tasks.
///
/// The schema is genuinely caller-defined; the monitor stores and returns it
/// without ever interpreting it.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Everything the monitor knows about one registered agent.
///
/// Created by `register_agent` and mutated only through the monitor's
/// mutation API.  Records live for the lifetime of the process (or until the
/// snapshot file is deleted); the monitor never removes an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    /// Opaque unique identifier, assigned at registration, immutable.
    pub agent_id: AgentId,
    /// Caller-supplied display label (e.g. "Extractor-Primary").
    pub name: String,
    /// Caller-supplied classification (e.g. "gemini_extractor", "validator").
    pub agent_type: String,
    /// Current lifecycle status.  Starts as `pending`.
    pub status: AgentStatus,
    /// Free-form text describing what the agent reported it is doing now.
    pub current_activity: Option<String>,
    /// The task the agent last heartbeat against.  A weak back-reference for
    /// lookup only — task ownership is recorded on the task itself.
    pub current_task_id: Option<TaskId>,
    /// Count of tasks this agent drove to `completed`.  Only increases.
    pub tasks_completed: u64,
    /// Count of tasks this agent drove to `failed`.  Only increases.
    pub tasks_failed: u64,
    /// When the agent was registered (UTC).
    pub registered_at: DateTime<Utc>,
    /// Most recent liveness signal, absent until the first heartbeat or
    /// status update.  Only increases.
    pub last_heartbeat_at: Option<DateTime<Utc>>,
    /// Caller-defined key/value data.  The monitor stores and returns it but
    /// never interprets it.
    pub metadata: Metadata,
}
