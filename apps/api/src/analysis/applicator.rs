//! Suggestion Applicator: applies one accepted suggestion to resume text.
//!
//! | type    | original found | action                          |
//! |---------|----------------|---------------------------------|
//! | replace | yes            | replace first occurrence        |
//! | replace | no             | unchanged                       |
//! | add     | n/a            | append as a new trailing line   |
//! | enhance | yes            | replace first occurrence        |
//! | enhance | no             | append as a new trailing line   |
//!
//! Never fails. Not idempotent for `add`/append paths: applying twice appends twice.

use serde::{Deserialize, Serialize};

use crate::analysis::models::{Suggestion, SuggestionType};

pub fn apply_suggestion(resume_text: &str, suggestion: &Suggestion) -> String {
    let original = suggestion.original_text.as_str();
    let found = !original.is_empty() && resume_text.contains(original);

    match suggestion.suggestion_type {
        SuggestionType::Replace if found => {
            resume_text.replacen(original, &suggestion.suggested_text, 1)
        }
        SuggestionType::Replace => resume_text.to_string(),
        SuggestionType::Add => append_line(resume_text, &suggestion.suggested_text),
        SuggestionType::Enhance if found => {
            resume_text.replacen(original, &suggestion.suggested_text, 1)
        }
        SuggestionType::Enhance => append_line(resume_text, &suggestion.suggested_text),
    }
}

fn append_line(resume_text: &str, line: &str) -> String {
    format!("{resume_text}\n{line}")
}

/// Ids of suggestions the user has applied, in application order.
///
/// Owned by the session layer (the client round-trips it), never stored on a
/// `Suggestion` or `AnalysisResult`, so analysis history stays replayable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppliedSuggestions(Vec<String>);

impl AppliedSuggestions {
    pub fn from_ids(ids: impl IntoIterator<Item = String>) -> Self {
        let mut applied = Self::default();
        for id in ids {
            applied.mark(id);
        }
        applied
    }

    /// Records `id`; returns false if it was already recorded.
    pub fn mark(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.contains(&id) {
            return false;
        }
        self.0.push(id);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|existing| existing == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
