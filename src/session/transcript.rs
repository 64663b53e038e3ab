use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Speaker of a transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    Assistant,
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::System => "system",
            Role::Assistant => "assistant",
            Role::User => "user",
        };
        f.write_str(s)
    }
}

/// A single settled line of the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,

    pub text: String,

    /// When the line arrived at the controller
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Read-only copy of a session's transcript, in arrival order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript(Vec<Message>);

impl Transcript {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self) -> &[Message] {
        &self.0
    }

    pub fn last(&self) -> Option<&Message> {
        self.0.last()
    }

    /// Newline-joined `role: text` lines
    pub fn to_role_tagged(&self) -> String {
        self.0
            .iter()
            .map(|m| format!("{}: {}", m.role, m.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<Vec<Message>> for Transcript {
    fn from(messages: Vec<Message>) -> Self {
        Self(messages)
    }
}

/// Append-only log of final transcript fragments
///
/// Interim fragments never enter the log; the most recent one is kept as a
/// live preview until a final fragment from the same speaker replaces it.
#[derive(Debug, Default)]
pub struct TranscriptAggregator {
    log: Vec<Message>,
    preview: Option<Message>,
    interim_discarded: u64,
}

impl TranscriptAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a settled message to the end of the log
    pub fn append(&mut self, message: Message) {
        if self.preview.as_ref().is_some_and(|p| p.role == message.role) {
            self.preview = None;
        }
        debug!("Transcript [{}] {}: {}", self.log.len(), message.role, message.text);
        self.log.push(message);
    }

    /// Record an interim fragment for live display only
    pub fn preview(&mut self, message: Message) {
        self.interim_discarded += 1;
        self.preview = Some(message);
    }

    pub fn live_preview(&self) -> Option<&Message> {
        self.preview.as_ref()
    }

    /// Number of interim fragments kept out of the log
    pub fn interim_discarded(&self) -> u64 {
        self.interim_discarded
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Owned copy of the log, independent of later appends
    pub fn snapshot(&self) -> Transcript {
        Transcript(self.log.clone())
    }
}
