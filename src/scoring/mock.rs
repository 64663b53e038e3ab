use std::time::Duration;

use super::requester::ScoringService;
use crate::error::ScoringError;

/// Deterministic stand-in for the scoring service
pub struct MockScoringService {
    delay: Duration,
}

impl MockScoringService {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait::async_trait]
impl ScoringService for MockScoringService {
    async fn generate(&self, _prompt: &str) -> Result<String, ScoringError> {
        tokio::time::sleep(self.delay).await;

        let canned = serde_json::json!({
            "overallScore": 7.8,
            "summary": "The candidate showed promise but lacked depth in specific areas. Communication was clear, but technical examples could be more concrete.",
            "strengths": ["Clear Voice/Audio", "Professional Demeanor", "Basic Concept Awareness"],
            "improvements": [
                "Provide deeper technical examples",
                "Use the STAR method for behavioral questions",
                "Reduce hesitation"
            ],
            "techScores": [
                { "skill": "Technical Depth", "score": 7 },
                { "skill": "Communication", "score": 8 },
                { "skill": "Problem Solving", "score": 7 }
            ]
        });

        Ok(canned.to_string())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
