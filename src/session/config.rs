use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::gate::CompletionPolicy;

/// Candidate seniority targeted by the interview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    #[default]
    Junior,
    Mid,
    Senior,
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExperienceLevel::Junior => "junior",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
        };
        f.write_str(s)
    }
}

impl FromStr for ExperienceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "junior" => Ok(ExperienceLevel::Junior),
            "mid" => Ok(ExperienceLevel::Mid),
            "senior" => Ok(ExperienceLevel::Senior),
            other => Err(format!("unknown experience level: {}", other)),
        }
    }
}

/// What the candidate is interviewing for
///
/// Immutable once a session starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Target role (e.g., "Backend Developer")
    pub role: String,

    /// Technologies the interview should focus on
    pub tech_stack: String,

    #[serde(default)]
    pub experience_level: ExperienceLevel,
}

/// Runtime settings shared by every session, derived from the service config
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Deterministic stand-ins replace the real agent and scorer
    pub mock: bool,

    /// Identity of the external voice agent (assistant id)
    pub agent_identity: Option<String>,

    /// Public credential handed to the voice agent client
    pub agent_public_key: Option<String>,

    /// Whether a scoring credential is available
    pub scoring_configured: bool,

    /// Capacity of the per-session event channel
    pub event_buffer: usize,

    /// Completion gate policy applied at call-end
    pub policy: CompletionPolicy,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            mock: true,
            agent_identity: None,
            agent_public_key: None,
            scoring_configured: false,
            event_buffer: 64,
            policy: CompletionPolicy::default(),
        }
    }
}

impl SessionSettings {
    /// Check that everything a real session needs is present
    ///
    /// Mock sessions never need credentials.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        if self.mock {
            return Vec::new();
        }

        let mut missing = Vec::new();
        if blank(&self.agent_public_key) {
            missing.push("agent.public_key");
        }
        if blank(&self.agent_identity) {
            missing.push("agent.assistant_id");
        }
        if !self.scoring_configured {
            missing.push("scoring.api_key");
        }
        missing
    }
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}
