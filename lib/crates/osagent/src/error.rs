//! Typed errors surfaced by agent operations.
//!
//! The `Display` text of every variant is what the HTTP layer hands back to
//! the caller, so messages are written for an operator reading a JSON body.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = AgentError> = std::result::Result<T, E>;

/// Failures of a host operation.
///
/// Negative answers ("not mounted", "service stopped", "no volume matches")
/// are never represented here; they are ordinary return values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    /// The command could not be started or exited abnormally.
    #[error("command `{command}` failed: {reason}")]
    Execution { command: String, reason: String },

    /// A lookup matched nothing.
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    /// A required argument was empty.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Command output did not have the expected shape.
    #[error("cannot parse {input:?}: {reason}")]
    Parse { input: String, reason: String },
}

impl AgentError {
    pub(crate) fn execution(command: &str, reason: impl Into<String>) -> Self {
        Self::Execution {
            command: command.trim().to_string(),
            reason: reason.into(),
        }
    }
}
