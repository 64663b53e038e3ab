//! Interview orchestration
//!
//! Wires a voice agent and a scoring service around each session: starts the
//! controller, waits for its outcome and, for completed interviews only,
//! requests the written report.

use anyhow::Result;
use serde::Serialize;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};
use tokio::sync::{watch, RwLock};
use tracing::{error, info};

use crate::agent::{MockAgent, MockScript, RelayAgent, RelayDirective, VoiceAgent};
use crate::config::Config;
use crate::scoring::{AnalysisResult, ScoringRequester};
use crate::session::{SessionConfig, SessionController, SessionHandle, SessionSettings};

/// Progress of the written report, separate from the session state machine
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "analysis", rename_all = "snake_case")]
pub enum ReportStatus {
    /// Interview still running
    Pending,
    /// Waiting on the scoring service
    Generating,
    Ready(AnalysisResult),
    /// Interview errored; no report is produced
    Unavailable,
}

impl ReportStatus {
    pub fn is_settled(&self) -> bool {
        matches!(self, ReportStatus::Ready(_) | ReportStatus::Unavailable)
    }
}

/// Builds a custom voice agent per session
pub type AgentBuilder = Arc<dyn Fn() -> Box<dyn VoiceAgent> + Send + Sync>;

/// Which voice agent each session gets
#[derive(Clone)]
pub enum AgentMode {
    /// Scripted interviewer
    Mock(MockScript),
    /// Browser-hosted agent relayed over HTTP
    Relay,
    Custom(AgentBuilder),
}

/// One interview: the running session plus its report
pub struct Interview {
    config: SessionConfig,
    handle: SessionHandle,
    report: watch::Receiver<ReportStatus>,
    relay: Option<Arc<RwLock<RelayDirective>>>,
    settled_at: Arc<OnceLock<Instant>>,
}

impl Interview {
    pub fn id(&self) -> &str {
        self.handle.interview_id()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionHandle {
        &self.handle
    }

    pub fn report(&self) -> ReportStatus {
        self.report.borrow().clone()
    }

    /// Wait until the report is ready or known to be unavailable
    pub async fn settled_report(&self) -> ReportStatus {
        let mut report = self.report.clone();
        let settled = match report.wait_for(ReportStatus::is_settled).await {
            Ok(status) => status.clone(),
            Err(_) => self.report(),
        };
        settled
    }

    /// Time since the report became ready or unavailable
    pub fn settled_for(&self) -> Option<Duration> {
        self.settled_at.get().map(|at| at.elapsed())
    }

    /// What the browser client should do, for relayed agents
    pub async fn relay_directive(&self) -> Option<RelayDirective> {
        match &self.relay {
            Some(directive) => Some(directive.read().await.clone()),
            None => None,
        }
    }
}

/// Starts interviews and hands completed ones to scoring
pub struct InterviewCoach {
    settings: SessionSettings,
    agents: AgentMode,
    scorer: ScoringRequester,
}

impl InterviewCoach {
    pub fn new(settings: SessionSettings, agents: AgentMode, scorer: ScoringRequester) -> Self {
        Self {
            settings,
            agents,
            scorer,
        }
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        let settings = cfg.session_settings();
        let agents = if settings.mock {
            AgentMode::Mock(MockScript::default())
        } else {
            AgentMode::Relay
        };
        let scorer = ScoringRequester::new(cfg.scoring_service()?);
        Ok(Self::new(settings, agents, scorer))
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Start a new interview session
    pub fn begin(&self, config: SessionConfig) -> Arc<Interview> {
        let interview_id = format!("interview-{}", uuid::Uuid::new_v4());

        let (agent, relay): (Box<dyn VoiceAgent>, Option<Arc<RwLock<RelayDirective>>>) =
            match &self.agents {
                AgentMode::Mock(script) => {
                    let agent = MockAgent::new(script.clone());
                    (Box::new(agent) as Box<dyn VoiceAgent>, None)
                }
                AgentMode::Relay => {
                    let agent = RelayAgent::new(self.settings.agent_public_key.clone());
                    let directive = agent.directive();
                    (Box::new(agent) as Box<dyn VoiceAgent>, Some(directive))
                }
                AgentMode::Custom(build) => ((**build)(), None),
            };

        let (handle, session_task) = SessionController::spawn(
            interview_id.clone(),
            config.clone(),
            self.settings.clone(),
            agent,
        );

        let (report_tx, report_rx) = watch::channel(ReportStatus::Pending);
        let settled_at = Arc::new(OnceLock::new());
        let scorer = self.scorer.clone();
        let settled = settled_at.clone();

        tokio::spawn(async move {
            let outcome = match session_task.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Session task for {} failed: {}", interview_id, e);
                    let _ = settled.set(Instant::now());
                    report_tx.send_replace(ReportStatus::Unavailable);
                    return;
                }
            };

            if !outcome.is_completed() {
                info!("No report for {}: session errored", interview_id);
                let _ = settled.set(Instant::now());
                report_tx.send_replace(ReportStatus::Unavailable);
                return;
            }

            report_tx.send_replace(ReportStatus::Generating);
            let analysis = scorer
                .score(Some(&outcome.config), &outcome.transcript)
                .await;
            info!(
                "Report ready for {} ({:.1}s call)",
                interview_id,
                outcome.duration.unwrap_or(Duration::ZERO).as_secs_f64()
            );
            let _ = settled.set(Instant::now());
            report_tx.send_replace(ReportStatus::Ready(analysis));
        });

        Arc::new(Interview {
            config,
            handle,
            report: report_rx,
            relay,
            settled_at,
        })
    }
}
