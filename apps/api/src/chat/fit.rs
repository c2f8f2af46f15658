//! Structured fit-analysis output: the schema the model is asked to emit
//! and the strict parse of what it actually emitted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm_client::strip_json_fences;

#[derive(Debug, Error)]
#[error("model output did not match the fit analysis schema: {0}")]
pub struct FitParseError(#[from] serde_json::Error);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitLevel {
    Good,
    Maybe,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingSkill {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingExperience {
    pub role: String,
    pub company: String,
    pub date_range: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub relevance: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToAction {
    pub text: String,
    pub link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitAnalysis {
    pub fit_score: u8,
    pub fit_level: FitLevel,
    pub confidence: Confidence,
    pub matching_skills: Vec<MatchingSkill>,
    pub matching_experience: Vec<MatchingExperience>,
    pub gaps: Vec<String>,
    pub analysis: String,
    pub resume_variant_recommendation: String,
    pub cta: CallToAction,
}

/// Parses the model's terminal text into a `FitAnalysis`, tolerating code
/// fences but nothing else. Schema violations surface as parse errors so
/// the caller can map them to a model-output failure.
pub fn parse_fit_analysis(raw: &str) -> Result<FitAnalysis, FitParseError> {
    let cleaned = strip_json_fences(raw);
    Ok(serde_json::from_str(cleaned)?)
}
