//! Axum route handlers for the Analysis API.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::analyzer::Analysis;
use crate::analysis::applicator::{apply_suggestion, AppliedSuggestions};
use crate::analysis::models::{
    ContextualInsights, Suggestion, SuggestionCategory, SuggestionImpact,
};
use crate::documents::extract::{extract_upload, UploadedDocument};
use crate::errors::AppError;
use crate::state::AppState;

pub const MAX_JOB_DESCRIPTION_CHARS: usize = 10_000;
/// Response header naming the analyzer path that produced the body.
pub const ANALYSIS_SOURCE_HEADER: &str = "x-analysis-source";

const RESUME_FIELD: &str = "resume";
const JOB_DESCRIPTION_FIELD: &str = "jobDescription";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReanalyzeRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SuggestionPreferences {
    pub focus: Option<SuggestionCategory>,
    pub impact: Option<SuggestionImpact>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub preferences: Option<SuggestionPreferences>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateResponse {
    pub suggestions: Vec<Suggestion>,
    pub contextual_insights: Option<ContextualInsights>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplySuggestionRequest {
    #[serde(default)]
    pub resume_text: String,
    pub suggestion: Option<Suggestion>,
    #[serde(default)]
    pub applied_suggestion_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplySuggestionResponse {
    pub updated_resume: String,
    pub applied_suggestion: Suggestion,
    pub applied_suggestion_ids: AppliedSuggestions,
}

// ────────────────────────────────────────────────────────────────────────────
// Input validation
// ────────────────────────────────────────────────────────────────────────────

/// Boundary check for job descriptions: present, non-blank, at most 10,000 characters.
pub fn validate_job_description(job_description: &str) -> Result<(), AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Job description is required".to_string(),
        ));
    }
    let chars = job_description.chars().count();
    if chars > MAX_JOB_DESCRIPTION_CHARS {
        return Err(AppError::Validation(format!(
            "Job description too long ({chars} characters, max 10,000)"
        )));
    }
    Ok(())
}

fn require_resume_text(resume_text: &str) -> Result<(), AppError> {
    if resume_text.trim().is_empty() {
        return Err(AppError::Validation("Resume text is required".to_string()));
    }
    Ok(())
}

/// Keeps the body-limit rejection distinguishable from a malformed form.
fn multipart_error(context: &str, err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("{context}: {}", err.body_text()))
    } else {
        AppError::Validation(format!("{context}: {}", err.body_text()))
    }
}

fn analysis_response(analysis: Analysis) -> Response {
    (
        [(ANALYSIS_SOURCE_HEADER, analysis.source.as_str())],
        Json(analysis.result),
    )
        .into_response()
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Multipart upload: `resume` file (PDF or Word) plus `jobDescription` text.
/// Extracts and normalizes the resume text, then returns a full AnalysisResult.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut upload: Option<UploadedDocument> = None;
    let mut job_description = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Invalid multipart body", e))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            RESUME_FIELD => {
                let file_name = field.file_name().unwrap_or("resume").to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error("Failed to read upload", e))?;
                upload = Some(UploadedDocument {
                    file_name,
                    mime_type,
                    bytes,
                });
            }
            JOB_DESCRIPTION_FIELD => {
                job_description = field
                    .text()
                    .await
                    .map_err(|e| multipart_error("Failed to read job description", e))?;
            }
            _ => {}
        }
    }

    let upload =
        upload.ok_or_else(|| AppError::Validation("Resume file is required".to_string()))?;
    validate_job_description(&job_description)?;

    info!(
        file_name = %upload.file_name,
        mime_type = %upload.mime_type,
        size = upload.bytes.len(),
        job_description_chars = job_description.chars().count(),
        "Resume received for analysis"
    );

    let resume_text = extract_upload(upload).await?;
    if resume_text.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "Could not extract text from resume file".to_string(),
        ));
    }

    let analysis = state.analyzer.analyze(&resume_text, &job_description).await?;
    Ok(analysis_response(analysis))
}

/// POST /api/v1/re-analyze
///
/// Scores edited resume text against the same job description. Returns a fresh result.
pub async fn handle_reanalyze(
    State(state): State<AppState>,
    Json(request): Json<ReanalyzeRequest>,
) -> Result<Response, AppError> {
    require_resume_text(&request.resume_text)?;
    validate_job_description(&request.job_description)?;

    let analysis = state
        .analyzer
        .analyze(&request.resume_text, &request.job_description)
        .await?;
    Ok(analysis_response(analysis))
}

/// POST /api/v1/regenerate-suggestions
///
/// Re-runs the analysis and returns only suggestions (optionally filtered by
/// category and impact) plus insights.
pub async fn handle_regenerate_suggestions(
    State(state): State<AppState>,
    Json(request): Json<RegenerateRequest>,
) -> Result<Json<RegenerateResponse>, AppError> {
    require_resume_text(&request.resume_text)?;
    validate_job_description(&request.job_description)?;

    let analysis = state
        .analyzer
        .analyze(&request.resume_text, &request.job_description)
        .await?;

    let preferences = request.preferences.unwrap_or_default();
    let total = analysis.result.suggestions.len();
    let suggestions: Vec<Suggestion> = analysis
        .result
        .suggestions
        .into_iter()
        .filter(|s| preferences.focus.map_or(true, |focus| s.category == focus))
        .filter(|s| preferences.impact.map_or(true, |impact| s.impact == impact))
        .collect();

    info!(
        analysis_source = analysis.source.as_str(),
        total,
        kept = suggestions.len(),
        "Suggestions regenerated"
    );

    Ok(Json(RegenerateResponse {
        suggestions,
        contextual_insights: analysis.result.contextual_insights,
    }))
}

/// POST /api/v1/apply-suggestion
///
/// Applies one suggestion to the given text. The caller owns the applied-id set and
/// gets it back with this suggestion recorded.
pub async fn handle_apply_suggestion(
    Json(request): Json<ApplySuggestionRequest>,
) -> Result<Json<ApplySuggestionResponse>, AppError> {
    let suggestion = match request.suggestion {
        Some(s) if !request.resume_text.is_empty() => s,
        _ => {
            return Err(AppError::Validation(
                "Resume text and suggestion are required".to_string(),
            ))
        }
    };

    let updated_resume = apply_suggestion(&request.resume_text, &suggestion);
    let mut applied = AppliedSuggestions::from_ids(request.applied_suggestion_ids);
    applied.mark(suggestion.id.clone());

    info!(
        suggestion_id = %suggestion.id,
        text_changed = updated_resume != request.resume_text,
        new_length = updated_resume.len(),
        "Suggestion applied"
    );

    Ok(Json(ApplySuggestionResponse {
        updated_resume,
        applied_suggestion: suggestion,
        applied_suggestion_ids: applied,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_description_required() {
        assert!(matches!(
            validate_job_description("   "),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_job_description_length_bound_counts_chars() {
        assert!(validate_job_description(&"a".repeat(MAX_JOB_DESCRIPTION_CHARS)).is_ok());
        assert!(validate_job_description(&"a".repeat(MAX_JOB_DESCRIPTION_CHARS + 1)).is_err());
        // multi-byte characters count once each
        assert!(validate_job_description(&"é".repeat(MAX_JOB_DESCRIPTION_CHARS)).is_ok());
    }

    #[test]
    fn test_preferences_deserialize() {
        let request: RegenerateRequest = serde_json::from_str(
            r#"{"resumeText": "r", "jobDescription": "j", "preferences": {"focus": "skills", "impact": "high"}}"#,
        )
        .unwrap();
        let preferences = request.preferences.unwrap();
        assert_eq!(preferences.focus, Some(SuggestionCategory::Skills));
        assert_eq!(preferences.impact, Some(SuggestionImpact::High));
    }
}
