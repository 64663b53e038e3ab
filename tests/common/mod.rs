// Shared test doubles for the voice agent

#![allow(dead_code)]

use anyhow::{bail, Result};
use prep_coach::agent::{AgentEvent, AgentMessage, AgentOverrides, VoiceAgent};
use prep_coach::session::{CompletionPolicy, ExperienceLevel, Role, SessionConfig, SessionSettings};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Voice agent that replays a fixed list of events and counts calls
pub struct ScriptedAgent {
    pub script: Vec<AgentEvent>,
    pub fail_start: bool,
    pub counters: Counters,
}

#[derive(Clone, Default)]
pub struct Counters {
    pub starts: Arc<AtomicUsize>,
    pub stops: Arc<AtomicUsize>,
}

impl Counters {
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

impl ScriptedAgent {
    pub fn new(script: Vec<AgentEvent>) -> (Self, Counters) {
        let counters = Counters::default();
        let agent = Self {
            script,
            fail_start: false,
            counters: counters.clone(),
        };
        (agent, counters)
    }

    pub fn failing() -> (Self, Counters) {
        let (mut agent, counters) = Self::new(Vec::new());
        agent.fail_start = true;
        (agent, counters)
    }
}

#[async_trait::async_trait]
impl VoiceAgent for ScriptedAgent {
    async fn start(
        &mut self,
        _identity: &str,
        _overrides: AgentOverrides,
        events: mpsc::Sender<AgentEvent>,
    ) -> Result<()> {
        self.counters.starts.fetch_add(1, Ordering::SeqCst);
        if self.fail_start {
            bail!("assistant not found");
        }

        let script = std::mem::take(&mut self.script);
        tokio::spawn(async move {
            for event in script {
                if events.send(event).await.is_err() {
                    break;
                }
            }
        });
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        self.counters.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn set_muted(&mut self, _muted: bool) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub fn say(role: Role, text: &str) -> AgentEvent {
    AgentEvent::Message(AgentMessage::final_transcript(role, text))
}

pub fn murmur(role: Role, text: &str) -> AgentEvent {
    AgentEvent::Message(AgentMessage::interim_transcript(role, text))
}

pub fn interview_config() -> SessionConfig {
    SessionConfig {
        role: "Backend Developer".to_string(),
        tech_stack: "Rust, PostgreSQL".to_string(),
        experience_level: ExperienceLevel::Mid,
    }
}

/// Real-agent settings with every credential present
pub fn live_settings() -> SessionSettings {
    SessionSettings {
        mock: false,
        agent_identity: Some("assistant-123".to_string()),
        agent_public_key: Some("pk-test".to_string()),
        scoring_configured: true,
        event_buffer: 16,
        policy: CompletionPolicy::default(),
    }
}

pub fn mock_settings() -> SessionSettings {
    SessionSettings {
        mock: true,
        ..live_settings()
    }
}
