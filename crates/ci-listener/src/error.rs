use std::path::PathBuf;

use crate::job::JobId;

/// Errors surfaced by listener event handlers.
///
/// Nothing is recovered locally: every variant propagates to the orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    /// A job id was referenced before `new_job` registered it, or after `remove`.
    #[error("unknown job: {id}")]
    UnknownJob { id: JobId },

    /// A SUT section references a formatter that is not registered.
    #[error("sut '{sut}': unknown formatter '{name}'")]
    UnknownFormatter { sut: String, name: String },

    /// Issue file pattern could not be parsed.
    #[error("invalid issue file pattern '{pattern}': {reason}")]
    Pattern { pattern: String, reason: String },

    /// Issue record has no string `sut` field.
    #[error("issue has no 'sut' field")]
    MissingSut,

    /// Configured formatter template could not be parsed.
    #[error("invalid formatter template '{template}': {reason}")]
    Template { template: String, reason: String },

    /// Issue payload is not a JSON object.
    #[error("invalid issue: {reason}")]
    InvalidIssue { reason: String },

    /// Formatter could not render the issue.
    #[error("render failed: {reason}")]
    Render { reason: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Issue file could not be created or written.
    #[error("failed to write issue file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Marker stream write or flush failed.
    #[error("progress stream error: {0}")]
    Progress(#[source] std::io::Error),

    #[error("lock poisoned")]
    LockPoisoned,
}

pub type ListenerResult<T> = Result<T, ListenerError>;
