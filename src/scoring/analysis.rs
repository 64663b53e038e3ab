use serde::{Deserialize, Serialize};

use crate::error::ScoringError;

pub const MAX_SCORE: f64 = 10.0;

pub const FALLBACK_SUMMARY: &str = "Error generating feedback.";

/// Score for one skill area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechScore {
    pub skill: String,
    pub score: f64,
}

/// Written performance report for a completed interview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// 0 to 10
    pub overall_score: f64,

    pub summary: String,

    #[serde(default)]
    pub strengths: Vec<String>,

    #[serde(default)]
    pub improvements: Vec<String>,

    #[serde(default)]
    pub tech_scores: Vec<TechScore>,
}

impl AnalysisResult {
    /// Report used when the scoring service fails or returns garbage
    pub fn fallback() -> Self {
        Self {
            overall_score: 0.0,
            summary: FALLBACK_SUMMARY.to_string(),
            strengths: Vec::new(),
            improvements: Vec::new(),
            tech_scores: Vec::new(),
        }
    }

    /// Parse the service's raw text reply
    ///
    /// Code fences (```json ... ```) and surrounding prose are tolerated.
    pub fn parse(raw: &str) -> Result<Self, ScoringError> {
        let cleaned = strip_code_fences(raw);
        let json = match (cleaned.find('{'), cleaned.rfind('}')) {
            (Some(start), Some(end)) if start < end => &cleaned[start..=end],
            _ => cleaned.as_str(),
        };

        let parsed: AnalysisResult = serde_json::from_str(json)?;
        Ok(parsed.normalized())
    }

    /// Clamp scores into range and drop blank entries
    fn normalized(self) -> Self {
        let clean_list = |items: Vec<String>| -> Vec<String> {
            items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        };

        Self {
            overall_score: clamp_score(self.overall_score),
            summary: self.summary.trim().to_string(),
            strengths: clean_list(self.strengths),
            improvements: clean_list(self.improvements),
            tech_scores: self
                .tech_scores
                .into_iter()
                .filter(|t| !t.skill.trim().is_empty())
                .map(|t| TechScore {
                    skill: t.skill.trim().to_string(),
                    score: clamp_score(t.score),
                })
                .collect(),
        }
    }
}

fn clamp_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, MAX_SCORE)
    } else {
        0.0
    }
}

fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}
