use std::sync::Arc;
use tracing::{info, warn};

use super::analysis::AnalysisResult;
use crate::error::ScoringError;
use crate::session::{SessionConfig, Transcript};

/// External text-generation service that writes the report
#[async_trait::async_trait]
pub trait ScoringService: Send + Sync {
    /// Send a prompt, return the raw text reply
    async fn generate(&self, prompt: &str) -> Result<String, ScoringError>;

    fn name(&self) -> &str;
}

/// Turns a finished transcript into an `AnalysisResult`
#[derive(Clone)]
pub struct ScoringRequester {
    service: Arc<dyn ScoringService>,
}

impl ScoringRequester {
    pub fn new(service: Arc<dyn ScoringService>) -> Self {
        Self { service }
    }

    /// Score a transcript
    ///
    /// Never fails: service or parse errors degrade to `AnalysisResult::fallback()`.
    pub async fn score(
        &self,
        config: Option<&SessionConfig>,
        transcript: &Transcript,
    ) -> AnalysisResult {
        let prompt = build_prompt(config, transcript);

        info!(
            "Requesting analysis from {} ({} messages)",
            self.service.name(),
            transcript.len()
        );

        match self.request(&prompt).await {
            Ok(result) => {
                info!("Analysis ready: overall score {:.1}", result.overall_score);
                result
            }
            Err(e) => {
                warn!("Scoring degraded to fallback report: {}", e);
                AnalysisResult::fallback()
            }
        }
    }

    async fn request(&self, prompt: &str) -> Result<AnalysisResult, ScoringError> {
        let raw = self.service.generate(prompt).await?;
        if raw.trim().is_empty() {
            return Err(ScoringError::EmptyResponse);
        }
        AnalysisResult::parse(&raw)
    }
}

/// Build the analysis prompt from role-tagged transcript lines
pub fn build_prompt(config: Option<&SessionConfig>, transcript: &Transcript) -> String {
    let mut prompt = String::new();

    if let Some(config) = config {
        prompt.push_str(&format!(
            "Role: {}\nTech stack: {}\nExperience level: {}\n",
            config.role, config.tech_stack, config.experience_level
        ));
    }

    prompt.push_str(&format!(
        "Analyze interview:\n{}\nOutput JSON: {{overallScore, summary, strengths[], improvements[], techScores[{{skill, score}}]}}",
        transcript.to_role_tagged()
    ));

    prompt
}
