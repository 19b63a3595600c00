//! The agent/task monitor: entity store, mutation API, and liveness view.
//!
//! One `AgentMonitor` tracks every extraction worker in the process.  The
//! discipline on every mutation is:
//!
//!   lock store → validate → mutate → snapshot save (still locked) →
//!   unlock → dispatch queued events
//!
//! A single mutex covers the whole entity store, so every mutation is atomic
//! and serialized system-wide, including the synchronous snapshot write.
//! Call volume is page-level progress reporting, not a hot path; the coarse
//! lock is the point, not a limitation.
//!
//! Events are dispatched strictly after the state lock is released, over a
//! clone of the sink list, so a sink may re-enter the monitor — including
//! mutations — without deadlocking.

use std::collections::{BTreeMap, BTreeSet};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use tracing::{debug, info, warn};

use vigil_contracts::{
    agent::{AgentRecord, Metadata},
    error::{VigilError, VigilResult},
    event::MonitorEvent,
    ident::{AgentId, TaskId},
    snapshot::MonitorSnapshot,
    status::{AgentStatus, TaskPriority},
    task::TaskRecord,
};

use crate::{
    config::MonitorConfig,
    summary::{count_by_status, ActivityEntry, ActivityKind, AgentSummary, MonitorSummary},
    traits::{EventSink, SnapshotStore},
};

// ── Internal mutable state ────────────────────────────────────────────────────

/// The canonical entity store: id → record, for agents and tasks.
///
/// Only the mutation API and the query views touch this, and only through
/// the monitor's mutex.  `BTreeMap` keeps listing and snapshot order
/// deterministic.
struct MonitorState {
    agents: BTreeMap<AgentId, AgentRecord>,
    tasks: BTreeMap<TaskId, TaskRecord>,
}

impl MonitorState {
    fn empty() -> Self {
        Self {
            agents: BTreeMap::new(),
            tasks: BTreeMap::new(),
        }
    }

    fn from_snapshot(snapshot: MonitorSnapshot) -> Self {
        Self {
            agents: snapshot
                .agents
                .into_iter()
                .map(|a| (a.agent_id.clone(), a))
                .collect(),
            tasks: snapshot
                .tasks
                .into_iter()
                .map(|t| (t.task_id.clone(), t))
                .collect(),
        }
    }

    fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            agents: self.agents.values().cloned().collect(),
            tasks: self.tasks.values().cloned().collect(),
            saved_at: Utc::now(),
        }
    }
}

// ── The monitor ───────────────────────────────────────────────────────────────

/// Central bookkeeping ledger for all extraction agents and their tasks.
///
/// Construct one per process at the entry point and pass it by reference (or
/// `Arc`) to every caller — there is deliberately no global accessor.
///
/// ```rust,ignore
/// use vigil_core::AgentMonitor;
/// use vigil_persist::JsonSnapshotStore;
///
/// let store = JsonSnapshotStore::new("data/monitor_state.json");
/// let monitor = AgentMonitor::new(Box::new(store));
/// let agent_id = monitor.register_agent("Extractor-Primary", "gemini_extractor", Default::default());
/// ```
pub struct AgentMonitor {
    state: Mutex<MonitorState>,
    store: Box<dyn SnapshotStore>,
    sinks: Mutex<Vec<Arc<dyn EventSink>>>,
    config: MonitorConfig,
}

impl AgentMonitor {
    /// Create a monitor with default configuration, seeding from `store` if
    /// it holds a snapshot.
    pub fn new(store: Box<dyn SnapshotStore>) -> Self {
        Self::with_config(store, MonitorConfig::default())
    }

    /// Create a monitor, seeding the entity store from a previously saved
    /// snapshot when one loads successfully.
    ///
    /// A load failure (unreadable or corrupt document) is not fatal: the
    /// monitor starts empty and logs the reason.  The operator resets state
    /// by deleting the snapshot file.
    pub fn with_config(store: Box<dyn SnapshotStore>, config: MonitorConfig) -> Self {
        let state = match store.load() {
            Ok(Some(snapshot)) => {
                info!(
                    agents = snapshot.agents.len(),
                    tasks = snapshot.tasks.len(),
                    "restored monitor state from snapshot"
                );
                MonitorState::from_snapshot(snapshot)
            }
            Ok(None) => MonitorState::empty(),
            Err(e) => {
                warn!(error = %e, "snapshot load failed; starting with empty state");
                MonitorState::empty()
            }
        };

        Self {
            state: Mutex::new(state),
            store,
            sinks: Mutex::new(Vec::new()),
            config,
        }
    }

    /// Register an event sink.  Sinks receive every subsequent event, in
    /// registration order, on the mutating caller's thread.
    pub fn register_sink(&self, sink: Arc<dyn EventSink>) {
        self.sinks.lock().expect("sink list lock poisoned").push(sink);
    }

    // ── Mutation API ─────────────────────────────────────────────────────────

    /// Register a new agent and return its freshly generated id.
    ///
    /// The agent starts as `pending` with no heartbeat.  Always succeeds.
    pub fn register_agent(
        &self,
        name: impl Into<String>,
        agent_type: impl Into<String>,
        metadata: Metadata,
    ) -> AgentId {
        let agent = AgentRecord {
            agent_id: AgentId::new(),
            name: name.into(),
            agent_type: agent_type.into(),
            status: AgentStatus::Pending,
            current_activity: None,
            current_task_id: None,
            tasks_completed: 0,
            tasks_failed: 0,
            registered_at: Utc::now(),
            last_heartbeat_at: None,
            metadata,
        };
        let agent_id = agent.agent_id.clone();

        debug!(agent_id = %agent_id, name = %agent.name, agent_type = %agent.agent_type, "registering agent");

        let mut events = Vec::new();
        {
            let mut state = self.lock_state();
            state.agents.insert(agent_id.clone(), agent.clone());
            events.push(MonitorEvent::AgentRegistered { agent });
            self.save_locked(&state, &mut events);
        }
        self.dispatch(&events);

        agent_id
    }

    /// Overwrite an agent's status and, when given, its activity text.
    ///
    /// A status report is itself a liveness signal, so this also refreshes
    /// `last_heartbeat_at`.  Counters are never touched here.
    pub fn update_agent_status(
        &self,
        agent_id: &AgentId,
        status: AgentStatus,
        activity: Option<&str>,
    ) -> VigilResult<()> {
        let mut events = Vec::new();
        {
            let mut state = self.lock_state();
            let agent = state
                .agents
                .get_mut(agent_id)
                .ok_or_else(|| VigilError::AgentNotFound {
                    agent_id: agent_id.to_string(),
                })?;

            agent.status = status;
            agent.last_heartbeat_at = Some(Utc::now());
            if let Some(activity) = activity {
                agent.current_activity = Some(activity.to_string());
            }

            debug!(agent_id = %agent_id, status = %status, "agent status updated");

            events.push(MonitorEvent::AgentStatusUpdated {
                agent: agent.clone(),
            });
            self.save_locked(&state, &mut events);
        }
        self.dispatch(&events);
        Ok(())
    }

    /// Record a liveness signal from an agent.
    ///
    /// When `task_id` is given it must exist, and it becomes the agent's
    /// `current_task_id`.  An unknown agent or task leaves the store
    /// untouched.
    pub fn heartbeat(&self, agent_id: &AgentId, task_id: Option<&TaskId>) -> VigilResult<()> {
        let mut events = Vec::new();
        {
            let mut state = self.lock_state();

            // Validate the task reference before touching the agent, so a
            // failed call has no partial effect.
            if let Some(task_id) = task_id {
                if !state.tasks.contains_key(task_id) {
                    return Err(VigilError::TaskNotFound {
                        task_id: task_id.to_string(),
                    });
                }
            }

            let agent = state
                .agents
                .get_mut(agent_id)
                .ok_or_else(|| VigilError::AgentNotFound {
                    agent_id: agent_id.to_string(),
                })?;

            agent.last_heartbeat_at = Some(Utc::now());
            if let Some(task_id) = task_id {
                agent.current_task_id = Some(task_id.clone());
            }

            events.push(MonitorEvent::Heartbeat {
                agent_id: agent_id.clone(),
            });
            self.save_locked(&state, &mut events);
        }
        self.dispatch(&events);
        Ok(())
    }

    /// Assign a new task to a registered agent and return its id.
    ///
    /// The task starts as `pending` with zero progress.  `pages` fixes the
    /// page numbers the task is expected to process; completed pages
    /// accumulate against it via `update_task_progress`.
    pub fn assign_task(
        &self,
        agent_id: &AgentId,
        description: impl Into<String>,
        task_type: impl Into<String>,
        priority: TaskPriority,
        pages: BTreeSet<u32>,
        metadata: Metadata,
    ) -> VigilResult<TaskId> {
        let mut events = Vec::new();
        let task_id = {
            let mut state = self.lock_state();
            if !state.agents.contains_key(agent_id) {
                return Err(VigilError::AgentNotFound {
                    agent_id: agent_id.to_string(),
                });
            }

            let now = Utc::now();
            let task = TaskRecord {
                task_id: TaskId::new(),
                agent_id: agent_id.clone(),
                description: description.into(),
                task_type: task_type.into(),
                priority,
                status: AgentStatus::Pending,
                progress: 0.0,
                pages_assigned: pages,
                pages_completed: BTreeSet::new(),
                created_at: now,
                updated_at: now,
                started_at: None,
                completed_at: None,
                error: None,
                metadata,
            };
            let task_id = task.task_id.clone();

            debug!(
                task_id = %task_id,
                agent_id = %agent_id,
                task_type = %task.task_type,
                priority = %priority,
                "task assigned"
            );

            state.tasks.insert(task_id.clone(), task.clone());
            events.push(MonitorEvent::TaskAssigned { task });
            self.save_locked(&state, &mut events);
            task_id
        };
        self.dispatch(&events);
        Ok(task_id)
    }

    /// Transition a task to a new status.
    ///
    /// Transitions are deliberately unconstrained: any status may follow any
    /// other, including moving a `completed` task back to `running`.  The
    /// monitor records, it does not validate causality.
    ///
    /// Bookkeeping on specific statuses:
    /// - first transition to `running` stamps `started_at`
    /// - any terminal status stamps `completed_at`
    /// - `completed` increments the owner's `tasks_completed`
    /// - `failed` increments `tasks_failed` and records `error` (or a
    ///   generic message when the caller supplied none)
    pub fn update_task_status(
        &self,
        task_id: &TaskId,
        status: AgentStatus,
        error: Option<&str>,
    ) -> VigilResult<()> {
        let mut events = Vec::new();
        {
            let mut state = self.lock_state();
            let task = state
                .tasks
                .get_mut(task_id)
                .ok_or_else(|| VigilError::TaskNotFound {
                    task_id: task_id.to_string(),
                })?;

            let now = Utc::now();
            let old_status = task.status;
            task.status = status;
            task.updated_at = now;

            if status == AgentStatus::Running && task.started_at.is_none() {
                task.started_at = Some(now);
            }
            if status.is_terminal() {
                task.completed_at = Some(now);
            }
            if status == AgentStatus::Failed {
                task.error = Some(
                    error
                        .map(str::to_string)
                        .unwrap_or_else(|| "task failed without error detail".to_string()),
                );
            }

            let owner = task.agent_id.clone();
            let task_clone = task.clone();

            // Counter updates live on the owning agent, inside the same
            // locked mutation so the cross-entity invariant holds atomically.
            if let Some(agent) = state.agents.get_mut(&owner) {
                match status {
                    AgentStatus::Completed => agent.tasks_completed += 1,
                    AgentStatus::Failed => agent.tasks_failed += 1,
                    _ => {}
                }
            }

            debug!(
                task_id = %task_id,
                old_status = %old_status,
                status = %status,
                "task status updated"
            );

            events.push(MonitorEvent::TaskStatusUpdated {
                task: task_clone,
                old_status,
            });
            self.save_locked(&state, &mut events);
        }
        self.dispatch(&events);
        Ok(())
    }

    /// Report task progress and newly completed pages.
    ///
    /// `progress` outside [0.0, 1.0] (NaN included) is rejected and the
    /// store is left unmodified — never clamped.  `pages_completed` merges
    /// into the existing set by union, so re-reporting a page is a no-op.
    ///
    /// A running task reaching full progress flips to `completed` (without
    /// touching the owner's counters — only an explicit status update does
    /// that).
    pub fn update_task_progress(
        &self,
        task_id: &TaskId,
        progress: f64,
        pages_completed: BTreeSet<u32>,
    ) -> VigilResult<()> {
        if !(0.0..=1.0).contains(&progress) {
            return Err(VigilError::InvalidProgress { value: progress });
        }

        let mut events = Vec::new();
        {
            let mut state = self.lock_state();
            let task = state
                .tasks
                .get_mut(task_id)
                .ok_or_else(|| VigilError::TaskNotFound {
                    task_id: task_id.to_string(),
                })?;

            let now = Utc::now();
            task.progress = progress;
            task.pages_completed.extend(pages_completed);
            task.updated_at = now;

            if progress >= 1.0 && task.status == AgentStatus::Running {
                task.status = AgentStatus::Completed;
                task.completed_at = Some(now);
            }

            debug!(
                task_id = %task_id,
                progress = progress,
                pages_completed = task.pages_completed.len(),
                "task progress updated"
            );

            events.push(MonitorEvent::TaskProgressUpdated { task: task.clone() });
            self.save_locked(&state, &mut events);
        }
        self.dispatch(&events);
        Ok(())
    }

    // ── Liveness ─────────────────────────────────────────────────────────────

    /// Return the ids of agents whose last liveness signal is older than
    /// `timeout`.
    ///
    /// Agents in a terminal status never stall.  An agent that has never
    /// heartbeat is measured from `registered_at`.  Pure view — mutates
    /// nothing.
    pub fn stalled_agents(&self, timeout: Duration) -> Vec<AgentId> {
        let state = self.lock_state();
        let now = Utc::now();

        state
            .agents
            .values()
            .filter(|agent| !agent.status.is_terminal())
            .filter(|agent| {
                let baseline = agent.last_heartbeat_at.unwrap_or(agent.registered_at);
                now.signed_duration_since(baseline) > timeout
            })
            .map(|agent| agent.agent_id.clone())
            .collect()
    }

    // ── Query views ──────────────────────────────────────────────────────────

    /// Look up one agent.
    pub fn get_agent(&self, agent_id: &AgentId) -> Option<AgentRecord> {
        self.lock_state().agents.get(agent_id).cloned()
    }

    /// Look up one task.
    pub fn get_task(&self, task_id: &TaskId) -> Option<TaskRecord> {
        self.lock_state().tasks.get(task_id).cloned()
    }

    /// Every registered agent, in id order.
    pub fn list_agents(&self) -> Vec<AgentRecord> {
        self.lock_state().agents.values().cloned().collect()
    }

    /// Tasks, optionally filtered by owning agent and/or status.
    pub fn list_tasks(
        &self,
        agent_id: Option<&AgentId>,
        status: Option<AgentStatus>,
    ) -> Vec<TaskRecord> {
        self.lock_state()
            .tasks
            .values()
            .filter(|t| agent_id.is_none_or(|id| &t.agent_id == id))
            .filter(|t| status.is_none_or(|s| t.status == s))
            .cloned()
            .collect()
    }

    /// All tasks not yet in a terminal status.
    pub fn incomplete_tasks(&self) -> Vec<TaskRecord> {
        self.lock_state()
            .tasks
            .values()
            .filter(|t| !t.status.is_terminal())
            .cloned()
            .collect()
    }

    /// The overall summary: per-status counts, mean progress, the full agent
    /// list, and a bounded recent-activity feed.  Computed fresh on every
    /// call.
    pub fn summary(&self) -> MonitorSummary {
        let state = self.lock_state();

        let overall_progress = if state.tasks.is_empty() {
            0.0
        } else {
            state.tasks.values().map(|t| t.progress).sum::<f64>() / state.tasks.len() as f64
        };

        MonitorSummary {
            total_agents: state.agents.len(),
            agents_by_status: count_by_status(state.agents.values().map(|a| a.status)),
            total_tasks: state.tasks.len(),
            tasks_by_status: count_by_status(state.tasks.values().map(|t| t.status)),
            overall_progress,
            agents: state.agents.values().cloned().collect(),
            recent_activity: recent_activity(&state, self.config.recent_activity_limit),
        }
    }

    /// A focused summary of one agent: its record, per-status task counts,
    /// the current task, and its most recently created tasks.
    pub fn agent_summary(&self, agent_id: &AgentId) -> Option<AgentSummary> {
        let state = self.lock_state();
        let agent = state.agents.get(agent_id)?.clone();

        let mut agent_tasks: Vec<&TaskRecord> = state
            .tasks
            .values()
            .filter(|t| &t.agent_id == agent_id)
            .collect();

        let tasks_by_status = count_by_status(agent_tasks.iter().map(|t| t.status));
        let total_tasks = agent_tasks.len();

        let current_task = agent
            .current_task_id
            .as_ref()
            .and_then(|id| state.tasks.get(id))
            .cloned();

        agent_tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let recent_tasks = agent_tasks
            .into_iter()
            .take(self.config.recent_tasks_limit)
            .cloned()
            .collect();

        Some(AgentSummary {
            agent,
            total_tasks,
            tasks_by_status,
            current_task,
            recent_tasks,
        })
    }

    // ── Internals ────────────────────────────────────────────────────────────

    fn lock_state(&self) -> std::sync::MutexGuard<'_, MonitorState> {
        self.state.lock().expect("monitor state lock poisoned")
    }

    /// Save a snapshot while the state lock is held.
    ///
    /// A failed save never aborts the mutation: live state wins over
    /// durability, the failure is logged, and a `SnapshotFailed` event is
    /// queued for the sinks.  The next mutation rewrites the full snapshot.
    fn save_locked(&self, state: &MonitorState, events: &mut Vec<MonitorEvent>) {
        if let Err(e) = self.store.save(&state.snapshot()) {
            warn!(error = %e, "snapshot save failed; in-memory state is ahead of disk");
            events.push(MonitorEvent::SnapshotFailed {
                reason: e.to_string(),
            });
        }
    }

    /// Fan events out to the registered sinks.
    ///
    /// Runs without the state lock, over a clone of the sink list, so sinks
    /// may re-enter the monitor.  A panicking sink is caught and logged; the
    /// remaining sinks still run.
    fn dispatch(&self, events: &[MonitorEvent]) {
        if events.is_empty() {
            return;
        }
        let sinks: Vec<Arc<dyn EventSink>> =
            self.sinks.lock().expect("sink list lock poisoned").clone();

        for event in events {
            for sink in &sinks {
                let outcome = catch_unwind(AssertUnwindSafe(|| sink.on_event(event)));
                if outcome.is_err() {
                    warn!(event = event.kind(), "event sink panicked; continuing");
                }
            }
        }
    }
}

/// Build the recent-activity feed: one entry per task start and one per task
/// completion, newest first, truncated to `limit`.
fn recent_activity(state: &MonitorState, limit: usize) -> Vec<ActivityEntry> {
    let mut entries = Vec::new();

    for task in state.tasks.values() {
        let agent_name = state
            .agents
            .get(&task.agent_id)
            .map(|a| a.name.clone())
            .unwrap_or_else(|| "unknown".to_string());

        if let Some(started_at) = task.started_at {
            entries.push(ActivityEntry {
                timestamp: started_at,
                event: ActivityKind::TaskStarted,
                agent: agent_name.clone(),
                description: task.description.clone(),
            });
        }
        if let Some(completed_at) = task.completed_at {
            let event = if task.status == AgentStatus::Completed {
                ActivityKind::TaskCompleted
            } else {
                ActivityKind::TaskFailed
            };
            entries.push(ActivityEntry {
                timestamp: completed_at,
                event,
                agent: agent_name,
                description: task.description.clone(),
            });
        }
    }

    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries.truncate(limit);
    entries
}

// ── Tests ────────────────────────────────────────────────────────────────────
