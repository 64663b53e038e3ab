//! Error types for interview sessions and report scoring

use serde::Serialize;
use thiserror::Error;

/// Reasons a session ends in `Errored`
///
/// These are surfaced verbatim to the caller for display, so they are
/// cloneable and serializable rather than wrapping source errors.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SessionError {
    /// Required credential or agent identity missing before start
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Voice agent reported a failure (or could not be started)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Call ended before a real conversation took place
    #[error("Call ended too quickly: terminated before sufficient exchange ({messages} messages)")]
    PrematureTermination { messages: usize },
}

impl SessionError {
    pub fn is_premature_termination(&self) -> bool {
        matches!(self, SessionError::PrematureTermination { .. })
    }
}

/// Failures talking to the scoring service
///
/// Never leaves the scoring module: the requester degrades to a fallback report.
#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("Scoring request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Scoring service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Scoring service returned no content")]
    EmptyResponse,

    #[error("Scoring response is not a valid analysis: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ScoringError {
    fn from(e: reqwest::Error) -> Self {
        // Request URLs may carry credentials; keep them out of logs
        ScoringError::Request(e.without_url())
    }
}
