use serde::{Deserialize, Serialize};

use crate::session::Role;

/// Whether a transcript fragment is settled or may still be revised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptType {
    Final,
    Interim,
}

/// Payload of a `message` event, as sent by the voice agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AgentMessage {
    Transcript {
        #[serde(rename = "transcriptType")]
        transcript_type: TranscriptType,
        role: Role,
        transcript: String,
    },
    /// Any other message type (function calls, status updates, ...)
    #[serde(other)]
    Other,
}

impl AgentMessage {
    pub fn final_transcript(role: Role, text: impl Into<String>) -> Self {
        AgentMessage::Transcript {
            transcript_type: TranscriptType::Final,
            role,
            transcript: text.into(),
        }
    }

    pub fn interim_transcript(role: Role, text: impl Into<String>) -> Self {
        AgentMessage::Transcript {
            transcript_type: TranscriptType::Interim,
            role,
            transcript: text.into(),
        }
    }
}

/// Lifecycle and transcript events delivered by a voice agent
///
/// Wire form: `{"event": "call-start"}`, `{"event": "message", "data": {...}}`,
/// `{"event": "error", "data": "detail"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum AgentEvent {
    CallStart,
    SpeechStart,
    SpeechEnd,
    Message(AgentMessage),
    Error(String),
    CallEnd,
}

impl AgentEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AgentEvent::CallStart => "call-start",
            AgentEvent::SpeechStart => "speech-start",
            AgentEvent::SpeechEnd => "speech-end",
            AgentEvent::Message(_) => "message",
            AgentEvent::Error(_) => "error",
            AgentEvent::CallEnd => "call-end",
        }
    }
}
