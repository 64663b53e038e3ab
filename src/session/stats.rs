use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

use super::config::SessionConfig;
use super::state::SessionState;
use super::transcript::{Message, Transcript};
use crate::error::SessionError;

/// Point-in-time view of a session, published after every applied event
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub interview_id: String,

    pub state: SessionState,

    /// Why the session errored, if it did
    pub failure: Option<SessionError>,

    /// When the session was created
    pub started_at: DateTime<Utc>,

    /// Seconds since the call connected (0 before call-start)
    pub duration_secs: f64,

    /// Number of final transcript messages
    pub message_count: usize,

    /// Latest interim fragment, not part of the transcript
    pub live_preview: Option<Message>,

    pub muted: bool,

    /// Whether the voice agent has been asked to shut down
    pub teardown_requested: bool,

    #[serde(skip)]
    pub transcript: Transcript,
}

impl SessionStatus {
    pub fn initial(interview_id: &str, started_at: DateTime<Utc>) -> Self {
        Self {
            interview_id: interview_id.to_string(),
            state: SessionState::Initializing,
            failure: None,
            started_at,
            duration_secs: 0.0,
            message_count: 0,
            live_preview: None,
            muted: false,
            teardown_requested: false,
            transcript: Transcript::default(),
        }
    }
}

/// Final result of a session, returned when its event loop exits
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub interview_id: String,

    pub config: SessionConfig,

    /// Always `Completed` or `Errored`
    pub state: SessionState,

    pub failure: Option<SessionError>,

    pub transcript: Transcript,

    /// Connected call duration, if the call ever started
    pub duration: Option<Duration>,
}

impl SessionOutcome {
    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Completed
    }
}
