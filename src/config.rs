use anyhow::{Context, Result};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::scoring::{
    GeminiScoringService, MockScoringService, ScoringService, DEFAULT_BASE_URL, DEFAULT_MODEL,
};
use crate::session::{CompletionPolicy, SessionSettings};

/// Environment variables override file values, e.g. `PREP__AGENT__PUBLIC_KEY`
pub const ENV_PREFIX: &str = "PREP";

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub interview: InterviewConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    pub scoring: ScoringConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct InterviewConfig {
    /// Use the scripted agent and canned scorer instead of real services
    pub mock: bool,
    pub event_buffer: usize,
    pub min_messages: usize,
    pub min_duration_secs: Option<u64>,
    /// How long settled interviews stay queryable over HTTP
    pub retention_secs: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct AgentConfig {
    pub public_key: Option<String>,
    pub assistant_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScoringConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Artificial latency of the mock scorer
    pub mock_delay_ms: u64,
}

impl Config {
    /// Load defaults, then `path` (if present), then environment overrides
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("service.name", "prep-coach")?
            .set_default("service.http.bind", "127.0.0.1")?
            .set_default("service.http.port", 8085)?
            .set_default("interview.mock", true)?
            .set_default("interview.event_buffer", 64)?
            .set_default("interview.min_messages", 2)?
            .set_default("interview.retention_secs", 3600)?
            .set_default("scoring.model", DEFAULT_MODEL)?
            .set_default("scoring.base_url", DEFAULT_BASE_URL)?
            .set_default("scoring.timeout_secs", 30)?
            .set_default("scoring.mock_delay_ms", 2500)?
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to load config from {}", path))?;

        Ok(settings.try_deserialize()?)
    }

    /// Settings applied to every interview session
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            mock: self.interview.mock,
            agent_identity: self.agent.assistant_id.clone(),
            agent_public_key: self.agent.public_key.clone(),
            scoring_configured: self
                .scoring
                .api_key
                .as_deref()
                .is_some_and(|k| !k.trim().is_empty()),
            event_buffer: self.interview.event_buffer,
            policy: CompletionPolicy {
                min_messages: self.interview.min_messages,
                min_duration: self.interview.min_duration_secs.map(Duration::from_secs),
            },
        }
    }

    /// Scoring collaborator matching the configured mode
    pub fn scoring_service(&self) -> Result<Arc<dyn ScoringService>> {
        if self.interview.mock {
            return Ok(Arc::new(MockScoringService::new(Duration::from_millis(
                self.scoring.mock_delay_ms,
            ))));
        }

        let api_key = self.scoring.api_key.clone().unwrap_or_default();
        if api_key.trim().is_empty() {
            // Sessions refuse to start without it, so no request is ever sent
            warn!("scoring.api_key is not set; interviews will fail configuration checks");
        }

        let service = GeminiScoringService::new(
            api_key,
            self.scoring.model.clone(),
            self.scoring.base_url.clone(),
            Duration::from_secs(self.scoring.timeout_secs),
        )?;
        Ok(Arc::new(service))
    }
}
