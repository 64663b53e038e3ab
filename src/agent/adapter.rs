use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::mpsc;

use super::events::AgentEvent;
use crate::session::SessionConfig;

/// Per-call customization passed to the voice agent on start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentOverrides {
    /// Opening line spoken by the agent
    pub first_message: String,

    /// Template variables available to the agent's prompt
    pub variables: HashMap<String, String>,
}

impl AgentOverrides {
    /// Build the interview greeting and prompt variables for a session
    pub fn for_session(config: &SessionConfig) -> Self {
        let variables = HashMap::from([
            ("name".to_string(), "Candidate".to_string()),
            ("role".to_string(), config.role.clone()),
            ("tech_stack".to_string(), config.tech_stack.clone()),
            (
                "experience_level".to_string(),
                config.experience_level.to_string(),
            ),
        ]);

        Self {
            first_message: format!(
                "Hello! I see you're applying for a {} position. Let's begin.",
                config.role
            ),
            variables,
        }
    }
}

/// Real-time conversational voice agent
///
/// Implementations:
/// - Mock: scripted interviewer for development and tests
/// - Relay: agent runs in the candidate's browser, events are forwarded over HTTP
///
/// Events are pushed into the channel handed over at `start`; the session
/// controller is the single consumer.
#[async_trait::async_trait]
pub trait VoiceAgent: Send + Sync {
    /// Connect to the agent identified by `identity`
    async fn start(
        &mut self,
        identity: &str,
        overrides: AgentOverrides,
        events: mpsc::Sender<AgentEvent>,
    ) -> Result<()>;

    /// End the call and release the agent
    async fn stop(&mut self) -> Result<()>;

    /// Mute or unmute the candidate's microphone
    async fn set_muted(&mut self, muted: bool) -> Result<()>;

    /// Get agent name for logging
    fn name(&self) -> &str;
}
