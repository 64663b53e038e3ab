//! Report generation for completed interviews
//!
//! The scoring service itself is an external collaborator; this module
//! builds its prompt, parses its reply and degrades to a fallback report
//! when anything goes wrong.

mod analysis;
mod gemini;
mod mock;
mod requester;

pub use analysis::{AnalysisResult, TechScore, FALLBACK_SUMMARY, MAX_SCORE};
pub use gemini::{GeminiScoringService, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use mock::MockScoringService;
pub use requester::{build_prompt, ScoringRequester, ScoringService};
