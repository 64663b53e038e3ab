use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::config::{SessionConfig, SessionSettings};
use super::gate::{CompletionGate, GateVerdict};
use super::state::{SessionState, Transition};
use super::stats::{SessionOutcome, SessionStatus};
use super::transcript::{Message, Transcript, TranscriptAggregator};
use crate::agent::{AgentEvent, AgentMessage, AgentOverrides, TranscriptType, VoiceAgent};
use crate::error::SessionError;

const COMMAND_BUFFER: usize = 8;

/// Requests from the caller, applied by the event loop between agent events
#[derive(Debug)]
enum SessionCommand {
    Stop { ack: oneshot::Sender<SessionState> },
    SetMuted { muted: bool, ack: oneshot::Sender<bool> },
}

/// Owns one interview session: its voice agent, transcript and state machine
///
/// All agent events and caller commands are applied one at a time by a single
/// task, and a fresh `SessionStatus` is published after each one.
pub struct SessionController {
    interview_id: String,
    config: SessionConfig,
    settings: SessionSettings,
    agent: Box<dyn VoiceAgent>,
    gate: CompletionGate,
    aggregator: TranscriptAggregator,
    state: SessionState,
    failure: Option<SessionError>,
    started_at: DateTime<Utc>,
    call_started: Option<Instant>,
    call_ended: Option<Instant>,
    muted: bool,
    agent_started: bool,
    teardown_requested: bool,
    status_tx: watch::Sender<SessionStatus>,
}

impl SessionController {
    /// Start a session on its own task
    ///
    /// The agent is started from inside the task. Returns a handle for the
    /// caller and the task's join handle, which yields the final outcome.
    pub fn spawn(
        interview_id: String,
        config: SessionConfig,
        settings: SessionSettings,
        agent: Box<dyn VoiceAgent>,
    ) -> (SessionHandle, JoinHandle<SessionOutcome>) {
        let (event_tx, event_rx) = mpsc::channel(settings.event_buffer.max(1));
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);

        let started_at = Utc::now();
        let (status_tx, status_rx) =
            watch::channel(SessionStatus::initial(&interview_id, started_at));

        let controller = Self {
            interview_id: interview_id.clone(),
            config,
            gate: CompletionGate::new(settings.policy.clone()),
            settings,
            agent,
            aggregator: TranscriptAggregator::new(),
            state: SessionState::Initializing,
            failure: None,
            started_at,
            call_started: None,
            call_ended: None,
            muted: false,
            agent_started: false,
            teardown_requested: false,
            status_tx,
        };

        let task = tokio::spawn(controller.run(event_tx.clone(), event_rx, command_rx));

        let handle = SessionHandle {
            interview_id,
            commands: command_tx,
            events: event_tx,
            status: status_rx,
        };

        (handle, task)
    }

    async fn run(
        mut self,
        agent_events: mpsc::Sender<AgentEvent>,
        mut events: mpsc::Receiver<AgentEvent>,
        mut commands: mpsc::Receiver<SessionCommand>,
    ) -> SessionOutcome {
        info!(
            "Starting interview session {} ({} / {} / {}) with {} agent",
            self.interview_id,
            self.config.role,
            self.config.tech_stack,
            self.config.experience_level,
            self.agent.name()
        );

        self.launch(agent_events).await;

        while !self.state.is_terminal() {
            tokio::select! {
                biased;

                Some(command) = commands.recv() => {
                    self.handle_command(command, &mut events).await;
                }

                event = events.recv() => match event {
                    Some(event) => self.handle_event(event),
                    None => {
                        error!("Event stream closed for session {}", self.interview_id);
                        self.fail(SessionError::Connection(
                            "Voice agent event stream closed".into(),
                        ));
                    }
                },
            }
            self.publish();
        }

        self.request_teardown().await;
        self.publish();

        info!(
            "Interview session {} finished: {} ({} messages)",
            self.interview_id,
            self.state,
            self.aggregator.len()
        );

        SessionOutcome {
            interview_id: self.interview_id.clone(),
            config: self.config.clone(),
            state: self.state,
            failure: self.failure.clone(),
            transcript: self.aggregator.snapshot(),
            duration: self.call_duration(),
        }
    }

    /// Check credentials and start the voice agent
    async fn launch(&mut self, events: mpsc::Sender<AgentEvent>) {
        let missing = self.settings.missing_credentials();
        if !missing.is_empty() {
            error!("Cannot start session {}: missing {}", self.interview_id, missing.join(", "));
            self.fail(SessionError::Configuration(format!(
                "Missing required settings: {}",
                missing.join(", ")
            )));
            self.publish();
            return;
        }

        let identity = self
            .settings
            .agent_identity
            .clone()
            .unwrap_or_else(|| "mock-assistant".to_string());
        let overrides = AgentOverrides::for_session(&self.config);

        self.agent_started = true;
        if let Err(e) = self.agent.start(&identity, overrides, events).await {
            error!("Failed to start voice agent: {:#}", e);
            self.fail(SessionError::Connection(format!(
                "Failed to initialize voice agent: {:#}",
                e
            )));
        }
        self.publish();
    }

    fn handle_event(&mut self, event: AgentEvent) {
        let transition = self.state.transition(&event);
        let name = event.name();

        match (transition, event) {
            (Transition::Enter(next), event) => {
                if event == AgentEvent::CallStart {
                    info!("Call connected for session {}", self.interview_id);
                    self.failure = None;
                    self.call_started = Some(Instant::now());
                }
                debug!("{} -> {} on {}", self.state, next, name);
                self.state = next;
            }
            (Transition::Record, AgentEvent::Message(message)) => self.record(message),
            (Transition::Fail, AgentEvent::Error(detail)) => {
                error!("Voice agent error in session {}: {}", self.interview_id, detail);
                self.fail(SessionError::Connection(detail));
            }
            (Transition::Finish, _) => self.finish(),
            (Transition::Ignore, _) => {
                warn!(
                    "Ignoring {} event in state {} for session {}",
                    name, self.state, self.interview_id
                );
            }
            (transition, _) => {
                warn!("Unexpected transition {:?} for {} event", transition, name);
            }
        }
    }

    fn record(&mut self, message: AgentMessage) {
        match message {
            AgentMessage::Transcript {
                transcript_type: TranscriptType::Final,
                role,
                transcript,
            } => self.aggregator.append(Message::new(role, transcript)),
            AgentMessage::Transcript {
                transcript_type: TranscriptType::Interim,
                role,
                transcript,
            } => self.aggregator.preview(Message::new(role, transcript)),
            AgentMessage::Other => debug!("Skipping non-transcript agent message"),
        }
    }

    /// Apply the completion gate to a call that ended
    fn finish(&mut self) {
        let transcript = self.aggregator.snapshot();
        let elapsed = self.call_started.map(|started| started.elapsed());

        match self.gate.evaluate(&transcript, elapsed, self.settings.mock) {
            GateVerdict::Completed => self.complete(),
            GateVerdict::Errored(reason) => self.fail(reason),
        }
    }

    async fn handle_command(
        &mut self,
        command: SessionCommand,
        events: &mut mpsc::Receiver<AgentEvent>,
    ) {
        match command {
            SessionCommand::Stop { ack } => {
                // Events delivered before the stop still count
                while !self.state.is_terminal() {
                    match events.try_recv() {
                        Ok(event) => self.handle_event(event),
                        Err(_) => break,
                    }
                }

                if self.state.is_terminal() {
                    debug!("Stop requested after session already {}", self.state);
                } else {
                    info!("Stopping interview session {}", self.interview_id);
                    self.request_teardown().await;
                    self.complete();
                }
                self.publish();
                let _ = ack.send(self.state);
            }
            SessionCommand::SetMuted { muted, ack } => {
                match self.agent.set_muted(muted).await {
                    Ok(()) => self.muted = muted,
                    Err(e) => warn!("Failed to set mute on voice agent: {:#}", e),
                }
                self.publish();
                let _ = ack.send(self.muted);
            }
        }
    }

    /// Ask the agent to shut down, at most once per session
    async fn request_teardown(&mut self) {
        if self.teardown_requested || !self.agent_started {
            return;
        }
        self.teardown_requested = true;

        if let Err(e) = self.agent.stop().await {
            warn!("Failed to stop voice agent: {:#}", e);
        }
    }

    fn complete(&mut self) {
        self.state = SessionState::Completed;
        self.call_ended = Some(Instant::now());
    }

    fn fail(&mut self, reason: SessionError) {
        self.state = SessionState::Errored;
        self.failure = Some(reason);
        self.call_ended = Some(Instant::now());
    }

    fn call_duration(&self) -> Option<Duration> {
        let started = self.call_started?;
        Some(match self.call_ended {
            Some(ended) => ended.saturating_duration_since(started),
            None => started.elapsed(),
        })
    }

    fn publish(&self) {
        self.status_tx.send_replace(SessionStatus {
            interview_id: self.interview_id.clone(),
            state: self.state,
            failure: self.failure.clone(),
            started_at: self.started_at,
            duration_secs: self.call_duration().map_or(0.0, |d| d.as_secs_f64()),
            message_count: self.aggregator.len(),
            live_preview: self.aggregator.live_preview().cloned(),
            muted: self.muted,
            teardown_requested: self.teardown_requested,
            transcript: self.aggregator.snapshot(),
        });
    }
}

/// Caller-side handle to a running session
#[derive(Clone)]
pub struct SessionHandle {
    interview_id: String,
    commands: mpsc::Sender<SessionCommand>,
    events: mpsc::Sender<AgentEvent>,
    status: watch::Receiver<SessionStatus>,
}

impl SessionHandle {
    pub fn interview_id(&self) -> &str {
        &self.interview_id
    }

    /// Latest published status
    pub fn status(&self) -> SessionStatus {
        self.status.borrow().clone()
    }

    pub fn state(&self) -> SessionState {
        self.status.borrow().state
    }

    /// Snapshot of the transcript as of the last applied event
    pub fn transcript(&self) -> Transcript {
        self.status.borrow().transcript.clone()
    }

    /// End the session
    ///
    /// Safe to call any number of times, from any task. Once the session is
    /// terminal this is a no-op that returns the existing terminal state.
    pub async fn stop(&self) -> SessionState {
        let (ack, reply) = oneshot::channel();
        if self.commands.send(SessionCommand::Stop { ack }).await.is_err() {
            return self.state();
        }
        match reply.await {
            Ok(state) => state,
            // Loop exited before reading the command; the session is terminal
            Err(_) => self.state(),
        }
    }

    /// Mute the candidate's microphone; returns the resulting mute state,
    /// or `None` if the session has already ended
    pub async fn set_muted(&self, muted: bool) -> Option<bool> {
        let (ack, reply) = oneshot::channel();
        self.commands
            .send(SessionCommand::SetMuted { muted, ack })
            .await
            .ok()?;
        reply.await.ok()
    }

    /// Feed an event from an out-of-process voice agent into the session
    pub async fn forward(&self, event: AgentEvent) -> Result<()> {
        if self.state().is_terminal() {
            bail!("Session {} has already ended", self.interview_id);
        }
        self.events
            .send(event)
            .await
            .context("Session is no longer accepting events")
    }

    /// Wait until the session reaches `Completed` or `Errored`
    pub async fn finished(&self) -> SessionStatus {
        let mut status = self.status.clone();
        let terminal = match status.wait_for(|s| s.state.is_terminal()).await {
            Ok(terminal) => terminal.clone(),
            Err(_) => self.status(),
        };
        terminal
    }
}
