//! Analysis value objects. Serialized with the camelCase field names the web client reads.
//!
//! Every value here is immutable once returned from the analyzer: re-analysis builds a
//! fresh `AnalysisResult`, and applied-suggestion tracking lives outside these types.

use serde::{Deserialize, Serialize};

/// A keyword found in both documents, with its whole-word count in the resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordMatch {
    pub keyword: String,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionType {
    /// Rewrite an existing passage.
    Replace,
    /// Append new material.
    Add,
    /// Expand an existing passage, or append when it cannot be found.
    Enhance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionImpact {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionCategory {
    Skills,
    Experience,
    Keywords,
    Formatting,
}

/// One actionable rewrite produced by either analyzer path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    #[serde(rename = "type")]
    pub suggestion_type: SuggestionType,
    pub keyword: String,
    pub location: String,
    pub original_text: String,
    pub suggested_text: String,
    pub reason: String,
    pub impact: SuggestionImpact,
    pub category: SuggestionCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextualInsights {
    pub resume_strengths: Vec<String>,
    pub improvement_areas: Vec<String>,
    pub overall_tone: String,
    pub experience_level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// 0 – 100
    pub match_score: u8,
    /// Sorted descending by count.
    pub matched_keywords: Vec<KeywordMatch>,
    pub missing_keywords: Vec<String>,
    pub suggestions: Vec<Suggestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contextual_insights: Option<ContextualInsights>,
    /// The text this result was computed against.
    pub resume_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_serializes_with_wire_names() {
        let suggestion = Suggestion {
            id: "s1".to_string(),
            suggestion_type: SuggestionType::Replace,
            keyword: "Kubernetes".to_string(),
            location: "Experience section".to_string(),
            original_text: "Deployed services".to_string(),
            suggested_text: "Deployed services on Kubernetes".to_string(),
            reason: "Mentioned in the job description".to_string(),
            impact: SuggestionImpact::High,
            category: SuggestionCategory::Experience,
        };

        let value = serde_json::to_value(&suggestion).unwrap();
        assert_eq!(value["type"], "replace");
        assert_eq!(value["originalText"], "Deployed services");
        assert_eq!(value["suggestedText"], "Deployed services on Kubernetes");
        assert_eq!(value["impact"], "high");
        assert_eq!(value["category"], "experience");
    }

    #[test]
    fn test_analysis_result_field_names() {
        let result = AnalysisResult {
            match_score: 42,
            matched_keywords: vec![KeywordMatch {
                keyword: "Rust".to_string(),
                count: 2,
            }],
            missing_keywords: vec!["Kafka".to_string()],
            suggestions: vec![],
            contextual_insights: Some(ContextualInsights {
                resume_strengths: vec![],
                improvement_areas: vec![],
                overall_tone: "professional".to_string(),
                experience_level: "senior".to_string(),
            }),
            resume_text: "Rust engineer".to_string(),
        };

        let value = serde_json::to_value(&result).unwrap();
        for field in [
            "matchScore",
            "matchedKeywords",
            "missingKeywords",
            "suggestions",
            "contextualInsights",
            "resumeText",
        ] {
            assert!(value.get(field).is_some(), "missing field {field}");
        }
        assert_eq!(value["contextualInsights"]["overallTone"], "professional");
    }

    #[test]
    fn test_unknown_suggestion_type_is_rejected() {
        let json = r#"{
            "id": "x", "type": "rewrite", "keyword": "k", "location": "l",
            "originalText": "", "suggestedText": "", "reason": "",
            "impact": "high", "category": "skills"
        }"#;
        assert!(serde_json::from_str::<Suggestion>(json).is_err());
    }
}
