//! Error types for the VIGIL monitor.
//!
//! All fallible monitor operations return `VigilResult<T>`.  Variants carry
//! enough context to surface directly to a caller (a worker or an HTTP
//! binding mapping `NotFound`-class errors to 404s and invalid input to 400s).

use thiserror::Error;

/// The unified error type for the VIGIL crates.
#[derive(Debug, Error)]
pub enum VigilError {
    /// The referenced agent id is not registered.
    #[error("agent '{agent_id}' is not registered")]
    AgentNotFound { agent_id: String },

    /// The referenced task id does not exist.
    #[error("task '{task_id}' does not exist")]
    TaskNotFound { task_id: String },

    /// A reported progress value fell outside [0.0, 1.0].
    ///
    /// The store is left unmodified — out-of-range input is rejected,
    /// never clamped.
    #[error("progress {value} is outside the valid range [0.0, 1.0]")]
    InvalidProgress { value: f64 },

    /// The snapshot store could not save or load the state document.
    ///
    /// On save this is non-fatal to the mutation: live state wins over
    /// durability, and the next mutation rewrites the full snapshot anyway.
    #[error("snapshot store failure: {reason}")]
    SnapshotFailed { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

/// Convenience alias used throughout the VIGIL crates.
pub type VigilResult<T> = Result<T, VigilError>;
