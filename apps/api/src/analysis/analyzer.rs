//! Primary analyzer adapter: asks the completion service for a structured analysis
//! and falls back to the deterministic analyzer on any failure.
//!
//! The fallback is total: a primary reply is either accepted whole or discarded.
//! The only error a caller can see is an empty resume, which is rejected before
//! any analysis runs.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::fallback::fallback_analyze;
use crate::analysis::models::{
    AnalysisResult, ContextualInsights, KeywordMatch, Suggestion, SuggestionCategory,
    SuggestionImpact, SuggestionType,
};
use crate::analysis::prompts::{analysis_system_prompt, build_analysis_prompt};
use crate::errors::AppError;
use crate::llm_client::{decode_json, CompletionClient, LlmError};

/// Which path produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisSource {
    Primary,
    Fallback,
}

impl AnalysisSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisSource::Primary => "primary",
            AnalysisSource::Fallback => "fallback",
        }
    }
}

/// Why the primary path was abandoned. Logged, never returned to HTTP callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    NotConfigured,
    Timeout,
    Quota,
    ModelAccess,
    EmptyContent,
    Transport(String),
    MalformedJson(String),
    SchemaViolation(String),
}

impl FallbackReason {
    fn from_llm_error(err: &LlmError) -> Self {
        match err {
            LlmError::Api { code, .. } if code.as_deref() == Some("insufficient_quota") => {
                FallbackReason::Quota
            }
            LlmError::Api { status: 404, .. } => FallbackReason::ModelAccess,
            LlmError::Api { code, .. } if code.as_deref() == Some("model_not_found") => {
                FallbackReason::ModelAccess
            }
            LlmError::EmptyContent => FallbackReason::EmptyContent,
            LlmError::Parse(e) => FallbackReason::MalformedJson(e.to_string()),
            other => FallbackReason::Transport(other.to_string()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FallbackReason::NotConfigured => "not_configured",
            FallbackReason::Timeout => "timeout",
            FallbackReason::Quota => "quota",
            FallbackReason::ModelAccess => "model_access",
            FallbackReason::EmptyContent => "empty_content",
            FallbackReason::Transport(_) => "transport",
            FallbackReason::MalformedJson(_) => "malformed_json",
            FallbackReason::SchemaViolation(_) => "schema_violation",
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Transport(detail)
            | FallbackReason::MalformedJson(detail)
            | FallbackReason::SchemaViolation(detail) => write!(f, "{}: {}", self.kind(), detail),
            _ => f.write_str(self.kind()),
        }
    }
}

enum PrimaryOutcome {
    Succeeded(AnalysisResult),
    Failed(FallbackReason),
}

/// An analysis plus how it was obtained.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub result: AnalysisResult,
    pub source: AnalysisSource,
    pub fallback_reason: Option<FallbackReason>,
}

/// Owns the (optional) completion client. Constructed once at startup and shared.
#[derive(Clone)]
pub struct Analyzer {
    client: Option<Arc<dyn CompletionClient>>,
    timeout: Duration,
}

impl Analyzer {
    pub fn new(client: Option<Arc<dyn CompletionClient>>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn has_primary(&self) -> bool {
        self.client.is_some()
    }

    pub async fn analyze(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<Analysis, AppError> {
        if resume_text.trim().is_empty() {
            return Err(AppError::UnprocessableEntity(
                "Resume text is empty".to_string(),
            ));
        }

        match self.run_primary(resume_text, job_description).await {
            PrimaryOutcome::Succeeded(result) => {
                info!(
                    analysis_source = AnalysisSource::Primary.as_str(),
                    match_score = result.match_score,
                    suggestions = result.suggestions.len(),
                    "Analysis completed"
                );
                Ok(Analysis {
                    result,
                    source: AnalysisSource::Primary,
                    fallback_reason: None,
                })
            }
            PrimaryOutcome::Failed(reason) => {
                if reason == FallbackReason::NotConfigured {
                    info!(
                        analysis_source = AnalysisSource::Fallback.as_str(),
                        reason = reason.kind(),
                        "No completion client configured, using fallback analysis"
                    );
                } else {
                    warn!(
                        analysis_source = AnalysisSource::Fallback.as_str(),
                        reason = reason.kind(),
                        detail = %reason,
                        "Primary analysis failed, using fallback analysis"
                    );
                }
                Ok(Analysis {
                    result: fallback_analyze(resume_text, job_description),
                    source: AnalysisSource::Fallback,
                    fallback_reason: Some(reason),
                })
            }
        }
    }

    async fn run_primary(&self, resume_text: &str, job_description: &str) -> PrimaryOutcome {
        let Some(client) = &self.client else {
            return PrimaryOutcome::Failed(FallbackReason::NotConfigured);
        };

        let prompt = build_analysis_prompt(resume_text, job_description);
        let system = analysis_system_prompt();
        let reply =
            match tokio::time::timeout(self.timeout, client.complete(&prompt, &system)).await {
                Err(_) => return PrimaryOutcome::Failed(FallbackReason::Timeout),
                Ok(Err(e)) => return PrimaryOutcome::Failed(FallbackReason::from_llm_error(&e)),
                Ok(Ok(text)) => text,
            };

        match parse_primary_reply(&reply, resume_text) {
            Ok(result) => PrimaryOutcome::Succeeded(result),
            Err(reason) => PrimaryOutcome::Failed(reason),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Reply parsing and validation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrimaryPayload {
    match_score: f64,
    matched_keywords: Vec<KeywordMatch>,
    missing_keywords: Vec<String>,
    suggestions: Vec<PrimarySuggestion>,
    #[serde(default)]
    contextual_insights: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrimarySuggestion {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "type")]
    suggestion_type: SuggestionType,
    keyword: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    original_text: String,
    suggested_text: String,
    #[serde(default)]
    reason: String,
    impact: SuggestionImpact,
    category: SuggestionCategory,
}

fn parse_primary_reply(reply: &str, resume_text: &str) -> Result<AnalysisResult, FallbackReason> {
    let value: Value =
        decode_json(reply).map_err(|e| FallbackReason::MalformedJson(e.to_string()))?;
    validate_shape(&value)?;

    let payload: PrimaryPayload = serde_json::from_value(value)
        .map_err(|e| FallbackReason::SchemaViolation(e.to_string()))?;

    Ok(AnalysisResult {
        match_score: payload.match_score.round() as u8,
        matched_keywords: tidy_matched_keywords(payload.matched_keywords),
        missing_keywords: payload.missing_keywords,
        suggestions: assign_unique_ids(payload.suggestions),
        // Insights are optional; a malformed block is dropped rather than failing the reply.
        contextual_insights: payload
            .contextual_insights
            .and_then(|v| serde_json::from_value::<ContextualInsights>(v).ok()),
        resume_text: resume_text.to_string(),
    })
}

fn validate_shape(value: &Value) -> Result<(), FallbackReason> {
    let object = value
        .as_object()
        .ok_or_else(|| FallbackReason::SchemaViolation("reply is not a JSON object".to_string()))?;

    match object.get("matchScore").and_then(Value::as_f64) {
        Some(score) if (0.0..=100.0).contains(&score) => {}
        Some(score) => {
            return Err(FallbackReason::SchemaViolation(format!(
                "matchScore {score} outside 0-100"
            )))
        }
        None => {
            return Err(FallbackReason::SchemaViolation(
                "matchScore missing or not a number".to_string(),
            ))
        }
    }

    for field in ["matchedKeywords", "missingKeywords", "suggestions"] {
        if !object.get(field).is_some_and(Value::is_array) {
            return Err(FallbackReason::SchemaViolation(format!(
                "{field} missing or not an array"
            )));
        }
    }

    Ok(())
}

/// Drops zero counts and case-insensitive duplicates, then sorts descending by count.
fn tidy_matched_keywords(matched: Vec<KeywordMatch>) -> Vec<KeywordMatch> {
    let mut seen = HashSet::new();
    let mut tidy: Vec<KeywordMatch> = matched
        .into_iter()
        .filter(|m| m.count > 0 && !m.keyword.trim().is_empty())
        .filter(|m| seen.insert(m.keyword.trim().to_lowercase()))
        .collect();
    tidy.sort_by(|a, b| b.count.cmp(&a.count));
    tidy
}

/// Keeps model-provided ids when present and unique; otherwise generates one.
/// `replace` suggestions without original text cannot be applied and are dropped.
fn assign_unique_ids(suggestions: Vec<PrimarySuggestion>) -> Vec<Suggestion> {
    let mut seen = HashSet::new();
    suggestions
        .into_iter()
        .filter(|s| {
            s.suggestion_type != SuggestionType::Replace || !s.original_text.trim().is_empty()
        })
        .enumerate()
        .map(|(index, s)| {
            let id = match s.id.filter(|id| !id.trim().is_empty()) {
                Some(id) if !seen.contains(&id) => id,
                _ => format!("ai_{index}_{}", Uuid::new_v4().simple()),
            };
            seen.insert(id.clone());
            Suggestion {
                id,
                suggestion_type: s.suggestion_type,
                keyword: s.keyword,
                location: s.location,
                original_text: s.original_text,
                suggested_text: s.suggested_text,
                reason: s.reason,
                impact: s.impact,
                category: s.category,
            }
        })
        .collect()
}
