//! # vigil-contracts
//!
//! Shared types and the error taxonomy for the VIGIL agent monitor.
//!
//! All crates in the workspace import from here.  No business logic lives in
//! this crate — only data definitions and error types.

pub mod agent;
pub mod error;
pub mod event;
pub mod ident;
pub mod snapshot;
pub mod status;
pub mod task;

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;

    use super::*;
    use agent::AgentRecord;
    use error::VigilError;
    use ident::{AgentId, TaskId};
    use status::{AgentStatus, TaskPriority};

    // ── AgentStatus ──────────────────────────────────────────────────────────

    #[test]
    fn terminal_statuses_are_exactly_completed_failed_cancelled() {
        let terminal: Vec<AgentStatus> = AgentStatus::ALL
            .into_iter()
            .filter(|s| s.is_terminal())
            .collect();

        assert_eq!(
            terminal,
            vec![
                AgentStatus::Completed,
                AgentStatus::Failed,
                AgentStatus::Cancelled
            ]
        );
    }

    #[test]
    fn status_serializes_as_lowercase_literal() {
        let json = serde_json::to_string(&AgentStatus::Initializing).unwrap();
        assert_eq!(json, "\"initializing\"");

        let decoded: AgentStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(decoded, AgentStatus::Cancelled);
    }

    #[test]
    fn status_all_covers_every_variant_once() {
        let unique: std::collections::HashSet<AgentStatus> =
            AgentStatus::ALL.into_iter().collect();
        assert_eq!(unique.len(), AgentStatus::ALL.len());
    }

    // ── TaskPriority ─────────────────────────────────────────────────────────

    #[test]
    fn priority_defaults_to_normal() {
        assert_eq!(TaskPriority::default(), TaskPriority::Normal);
    }

    #[test]
    fn priority_serializes_as_lowercase_literal() {
        let json = serde_json::to_string(&TaskPriority::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
    }

    // ── Identifiers ──────────────────────────────────────────────────────────

    #[test]
    fn agent_ids_are_unique() {
        let ids: std::collections::HashSet<String> =
            (0..100).map(|_| AgentId::new().to_string()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn task_ids_are_unique() {
        let ids: std::collections::HashSet<String> =
            (0..100).map(|_| TaskId::new().to_string()).collect();
        assert_eq!(ids.len(), 100);
    }

    // ── Snapshot document shape ──────────────────────────────────────────────

    #[test]
    fn snapshot_round_trips_through_json() {
        let agent = AgentRecord {
            agent_id: AgentId::new(),
            name: "Extractor-Primary".to_string(),
            agent_type: "gemini_extractor".to_string(),
            status: AgentStatus::Running,
            current_activity: Some("extracting page 12".to_string()),
            current_task_id: None,
            tasks_completed: 3,
            tasks_failed: 1,
            registered_at: Utc::now(),
            last_heartbeat_at: Some(Utc::now()),
            metadata: BTreeMap::from([(
                "model".to_string(),
                serde_json::json!("gemini-2.5-pro"),
            )]),
        };

        let snapshot = snapshot::MonitorSnapshot {
            agents: vec![agent],
            tasks: vec![],
            saved_at: Utc::now(),
        };

        let json = serde_json::to_string_pretty(&snapshot).unwrap();
        let decoded: snapshot::MonitorSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, snapshot);

        // The document carries the two top-level arrays and lowercase enums.
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["agents"].is_array());
        assert!(value["tasks"].is_array());
        assert_eq!(value["agents"][0]["status"], "running");
    }

    // ── Error display messages ───────────────────────────────────────────────

    #[test]
    fn error_agent_not_found_display() {
        let err = VigilError::AgentNotFound {
            agent_id: "a-123".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("a-123"));
        assert!(msg.contains("not registered"));
    }

    #[test]
    fn error_invalid_progress_display() {
        let err = VigilError::InvalidProgress { value: 1.5 };
        let msg = err.to_string();
        assert!(msg.contains("1.5"));
        assert!(msg.contains("[0.0, 1.0]"));
    }

    #[test]
    fn error_snapshot_failed_display() {
        let err = VigilError::SnapshotFailed {
            reason: "disk full".to_string(),
        };
        assert!(err.to_string().contains("disk full"));
    }

    // ── Event kinds ──────────────────────────────────────────────────────────

    #[test]
    fn event_kind_names_are_stable() {
        let event = event::MonitorEvent::Heartbeat {
            agent_id: AgentId::new(),
        };
        assert_eq!(event.kind(), "heartbeat");

        let event = event::MonitorEvent::SnapshotFailed {
            reason: "x".to_string(),
        };
        assert_eq!(event.kind(), "snapshot_failed");
    }
}
