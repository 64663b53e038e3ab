use anyhow::{bail, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::adapter::{AgentOverrides, VoiceAgent};
use super::events::{AgentEvent, AgentMessage};
use crate::session::Role;

/// Script played by the mock interviewer
#[derive(Debug, Clone)]
pub struct MockScript {
    /// Questions asked in order (the first is the opening line)
    pub questions: Vec<String>,

    /// Candidate answers, matched to questions by index
    pub answers: Vec<String>,

    /// Closing remark before the call ends
    pub closing: String,

    /// Time the agent "speaks" and the candidate "thinks" per turn
    pub turn_delay: Duration,

    /// Pause between the closing remark and hanging up
    pub closing_delay: Duration,
}

impl Default for MockScript {
    fn default() -> Self {
        Self {
            questions: vec![
                "Let's start with an introduction. Tell me about yourself and your experience.".into(),
                "Can you explain a challenging technical problem you solved recently?".into(),
                "What are your strengths and weaknesses in this tech stack?".into(),
                "Do you have any questions for us?".into(),
            ],
            answers: vec![
                "I have a few years of experience building backend services and I enjoy working on APIs.".into(),
                "We had a slow reporting query, so I profiled it, added an index and cached the hot path.".into(),
                "I am strong at debugging, but I am still improving my system design skills.".into(),
                "Yes, how does the team approach code review?".into(),
            ],
            closing: "Thank you for your time. We have finished the interview.".into(),
            turn_delay: Duration::from_secs(1),
            closing_delay: Duration::from_secs(3),
        }
    }
}

impl MockScript {
    /// Same script with no pauses, for tests
    pub fn instant() -> Self {
        Self {
            turn_delay: Duration::ZERO,
            closing_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Deterministic stand-in for the external voice agent
pub struct MockAgent {
    script: MockScript,
    active: Arc<AtomicBool>,
    events: Option<mpsc::Sender<AgentEvent>>,
    script_task: Option<JoinHandle<()>>,
    muted: bool,
}

impl MockAgent {
    pub fn new(script: MockScript) -> Self {
        Self {
            script,
            active: Arc::new(AtomicBool::new(false)),
            events: None,
            script_task: None,
            muted: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    async fn play(
        script: MockScript,
        first_message: String,
        active: Arc<AtomicBool>,
        events: mpsc::Sender<AgentEvent>,
    ) {
        let say = |role: Role, text: String| {
            AgentEvent::Message(AgentMessage::final_transcript(role, text))
        };

        if events.send(AgentEvent::CallStart).await.is_err() {
            return;
        }

        let mut lines = vec![first_message];
        lines.extend(script.questions.iter().cloned());

        for (turn, question) in lines.into_iter().enumerate() {
            // The greeting is followed straight away by the first question
            let answer = turn
                .checked_sub(1)
                .and_then(|i| script.answers.get(i))
                .cloned();

            let mut batch = vec![say(Role::Assistant, question), AgentEvent::SpeechStart];
            if answer.is_none() {
                batch.push(AgentEvent::SpeechEnd);
            }
            for event in batch {
                if events.send(event).await.is_err() {
                    return;
                }
            }

            let Some(answer) = answer else {
                continue;
            };

            tokio::time::sleep(script.turn_delay).await;

            let partial: String = answer.split_whitespace().take(3).collect::<Vec<_>>().join(" ");
            let turn_events = [
                AgentEvent::Message(AgentMessage::interim_transcript(Role::User, partial)),
                say(Role::User, answer),
                AgentEvent::SpeechEnd,
            ];
            for event in turn_events {
                if events.send(event).await.is_err() {
                    return;
                }
            }

            tokio::time::sleep(script.turn_delay).await;
        }

        if events.send(say(Role::Assistant, script.closing)).await.is_err() {
            return;
        }
        tokio::time::sleep(script.closing_delay).await;

        if active.swap(false, Ordering::SeqCst) {
            debug!("Mock interview script finished");
            let _ = events.send(AgentEvent::CallEnd).await;
        }
    }
}

impl Default for MockAgent {
    fn default() -> Self {
        Self::new(MockScript::default())
    }
}

#[async_trait::async_trait]
impl VoiceAgent for MockAgent {
    async fn start(
        &mut self,
        identity: &str,
        overrides: AgentOverrides,
        events: mpsc::Sender<AgentEvent>,
    ) -> Result<()> {
        if self.active.swap(true, Ordering::SeqCst) {
            bail!("Mock agent already started");
        }

        info!("Mock voice session started (identity: {})", identity);

        let task = tokio::spawn(Self::play(
            self.script.clone(),
            overrides.first_message,
            Arc::clone(&self.active),
            events.clone(),
        ));

        self.events = Some(events);
        self.script_task = Some(task);

        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        if !self.active.swap(false, Ordering::SeqCst) {
            debug!("Mock agent not active, nothing to stop");
            return Ok(());
        }

        info!("Stopping mock voice session");

        if let Some(task) = self.script_task.take() {
            task.abort();
        }
        if let Some(events) = self.events.take() {
            // The controller may already be gone; a closed channel is fine
            let _ = events.try_send(AgentEvent::CallEnd);
        }

        Ok(())
    }

    async fn set_muted(&mut self, muted: bool) -> Result<()> {
        info!("Mock microphone muted: {}", muted);
        self.muted = muted;
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
