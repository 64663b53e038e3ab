// Tests for report scoring: prompt building, response parsing and fallback

use prep_coach::error::ScoringError;
use prep_coach::scoring::{
    build_prompt, AnalysisResult, MockScoringService, ScoringRequester, ScoringService,
    FALLBACK_SUMMARY,
};
use prep_coach::session::{ExperienceLevel, Message, Role, SessionConfig, Transcript};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scoring service returning a fixed reply and remembering the prompt
struct CannedService {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl CannedService {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait::async_trait]
impl ScoringService for CannedService {
    async fn generate(&self, prompt: &str) -> Result<String, ScoringError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(ScoringError::Status {
                status: 503,
                body: "unavailable".to_string(),
            }),
        }
    }

    fn name(&self) -> &str {
        "canned"
    }
}

fn transcript() -> Transcript {
    Transcript::from(vec![
        Message::new(Role::Assistant, "Tell me about yourself."),
        Message::new(Role::User, "I build APIs in Rust."),
    ])
}

fn assert_fallback(result: &AnalysisResult) {
    assert_eq!(result.overall_score, 0.0);
    assert_eq!(result.summary, FALLBACK_SUMMARY);
    assert!(result.strengths.is_empty());
    assert!(result.improvements.is_empty());
    assert!(result.tech_scores.is_empty());
}

#[tokio::test]
async fn test_fenced_json_is_parsed() {
    let reply = r#"```json
{
  "overallScore": 8.5,
  "summary": "Solid answers.",
  "strengths": ["Clear communication"],
  "improvements": ["More depth on databases"],
  "techScores": [{"skill": "Rust", "score": 9}]
}
```"#;
    let requester = ScoringRequester::new(CannedService::replying(reply));

    let result = requester.score(None, &transcript()).await;

    assert_eq!(result.overall_score, 8.5);
    assert_eq!(result.summary, "Solid answers.");
    assert_eq!(result.strengths, vec!["Clear communication"]);
    assert_eq!(result.improvements, vec!["More depth on databases"]);
    assert_eq!(result.tech_scores.len(), 1);
    assert_eq!(result.tech_scores[0].skill, "Rust");
    assert_eq!(result.tech_scores[0].score, 9.0);
}

#[tokio::test]
async fn test_unparsable_reply_falls_back() {
    let requester = ScoringRequester::new(CannedService::replying("I'm sorry, I can't do that."));
    let result = requester.score(None, &transcript()).await;
    assert_fallback(&result);
}

#[tokio::test]
async fn test_wrong_shape_falls_back() {
    let requester = ScoringRequester::new(CannedService::replying(r#"{"score": "great"}"#));
    let result = requester.score(None, &transcript()).await;
    assert_fallback(&result);
}

#[tokio::test]
async fn test_empty_reply_falls_back() {
    let requester = ScoringRequester::new(CannedService::replying("   "));
    let result = requester.score(None, &transcript()).await;
    assert_fallback(&result);
}

#[tokio::test]
async fn test_service_failure_falls_back() {
    let requester = ScoringRequester::new(CannedService::failing());
    let result = requester.score(None, &transcript()).await;
    assert_fallback(&result);
}

#[tokio::test]
async fn test_scores_are_clamped_and_lists_defaulted() {
    let reply = r#"Here is the analysis: {"overallScore": 14, "summary": " ok ", "techScores": [{"skill": "SQL", "score": -3}]}"#;
    let requester = ScoringRequester::new(CannedService::replying(reply));

    let result = requester.score(None, &transcript()).await;

    assert_eq!(result.overall_score, 10.0);
    assert_eq!(result.summary, "ok");
    assert!(result.strengths.is_empty());
    assert!(result.improvements.is_empty());
    assert_eq!(result.tech_scores[0].score, 0.0);
}

#[tokio::test]
async fn test_prompt_contains_role_tagged_transcript() {
    let service = CannedService::replying(r#"{"overallScore": 5, "summary": "fine"}"#);
    let requester = ScoringRequester::new(service.clone());
    let config = SessionConfig {
        role: "Backend Developer".to_string(),
        tech_stack: "Rust".to_string(),
        experience_level: ExperienceLevel::Senior,
    };

    requester.score(Some(&config), &transcript()).await;

    let prompts = service.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    let prompt = &prompts[0];
    assert!(prompt.contains("Role: Backend Developer"));
    assert!(prompt.contains("Experience level: senior"));
    assert!(prompt.contains("assistant: Tell me about yourself.\nuser: I build APIs in Rust."));
    assert!(prompt.contains(
        "Output JSON: {overallScore, summary, strengths[], improvements[], techScores[{skill, score}]}"
    ));
}

#[test]
fn test_prompt_without_config() {
    let prompt = build_prompt(None, &transcript());
    assert!(prompt.starts_with("Analyze interview:\n"));
}

#[tokio::test]
async fn test_mock_service_produces_canned_report() {
    let requester = ScoringRequester::new(Arc::new(MockScoringService::new(Duration::ZERO)));
    let result = requester.score(None, &transcript()).await;

    assert_eq!(result.overall_score, 7.8);
    assert_eq!(result.strengths.len(), 3);
    assert_eq!(result.improvements.len(), 3);
    assert_eq!(result.tech_scores.len(), 3);
}
