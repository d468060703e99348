//! Deterministic fallback analyzer: pure string matching, no external calls.
//!
//! Algorithm:
//! 1. Candidate universe = curated vocabularies ∪ filtered job-description tokens.
//! 2. Per candidate, count whole-word occurrences in resume and job description.
//!    - both > 0            → matched (title-cased, count = resume occurrences)
//!    - job > 0, resume = 0 → missing
//! 3. score = round(Σ matched counts / max(job_tokens × 0.1, 1) × 100), capped at 100,
//!    then floored at 25 so the result never reads as broken.
//! 4. Top 8 matched, first 6 missing, up to 4 templated suggestions.
//!
//! Suggestion metadata is assigned round-robin by index, so the same input always
//! produces the same result apart from suggestion ids.

use uuid::Uuid;

use crate::analysis::keywords::{
    candidate_universe, classify, job_tokens, title_case, KeywordClass, WordCounter,
};
use crate::analysis::models::{
    AnalysisResult, ContextualInsights, KeywordMatch, Suggestion, SuggestionCategory,
    SuggestionImpact, SuggestionType,
};

pub const SCORE_FLOOR: u8 = 25;
pub const MAX_MATCHED_KEYWORDS: usize = 8;
pub const MAX_MISSING_KEYWORDS: usize = 6;
pub const MAX_SUGGESTIONS: usize = 4;

pub const SUGGESTION_LOCATIONS: [&str; 4] = [
    "Skills section",
    "Experience section",
    "Summary section",
    "Projects section",
];

const SUGGESTION_TYPES: [SuggestionType; 3] = [
    SuggestionType::Add,
    SuggestionType::Enhance,
    SuggestionType::Replace,
];

const SUGGESTION_IMPACTS: [SuggestionImpact; 3] = [
    SuggestionImpact::High,
    SuggestionImpact::Medium,
    SuggestionImpact::Low,
];

/// Runs the full fallback analysis. Never fails; empty inputs yield the floor score.
pub fn fallback_analyze(resume_text: &str, job_description: &str) -> AnalysisResult {
    let resume_lower = resume_text.to_lowercase();
    let job_lower = job_description.to_lowercase();

    let tokens = job_tokens(&job_lower);
    let universe = candidate_universe(&tokens);

    let resume_counter = WordCounter::new(&resume_lower);
    let job_counter = WordCounter::new(&job_lower);

    let mut matched_keywords = Vec::new();
    let mut missing_keywords = Vec::new();
    let mut missing_classes = Vec::new();

    for keyword in &universe {
        let job_matches = job_counter.count(keyword);
        if job_matches == 0 {
            continue;
        }
        let resume_matches = resume_counter.count(keyword);
        if resume_matches > 0 {
            matched_keywords.push(KeywordMatch {
                keyword: title_case(keyword),
                count: resume_matches,
            });
        } else {
            missing_keywords.push(title_case(keyword));
            missing_classes.push(classify(keyword));
        }
    }

    // Vec::sort_by is stable: ties keep discovery order
    matched_keywords.sort_by(|a, b| b.count.cmp(&a.count));

    let match_score = compute_match_score(&matched_keywords, tokens.len());

    let suggestions = missing_keywords
        .iter()
        .zip(&missing_classes)
        .take(MAX_SUGGESTIONS)
        .enumerate()
        .map(|(index, (keyword, class))| build_suggestion(index, keyword, *class))
        .collect();

    matched_keywords.truncate(MAX_MATCHED_KEYWORDS);
    missing_keywords.truncate(MAX_MISSING_KEYWORDS);

    AnalysisResult {
        match_score,
        matched_keywords,
        missing_keywords,
        suggestions,
        contextual_insights: Some(generic_insights()),
        resume_text: resume_text.to_string(),
    }
}

/// Weighted-overlap score in [SCORE_FLOOR, 100].
pub fn compute_match_score(matched: &[KeywordMatch], total_job_keywords: usize) -> u8 {
    let matched_weight: u64 = matched.iter().map(|m| u64::from(m.count)).sum();
    let denominator = (total_job_keywords as f64 * 0.1).max(1.0);
    let raw = ((matched_weight as f64 / denominator) * 100.0).round().min(100.0);
    (raw as u8).max(SCORE_FLOOR)
}

fn build_suggestion(index: usize, keyword: &str, class: KeywordClass) -> Suggestion {
    let location = SUGGESTION_LOCATIONS[index % SUGGESTION_LOCATIONS.len()];
    let category = match class {
        KeywordClass::Technical => SuggestionCategory::Skills,
        KeywordClass::SoftSkill => SuggestionCategory::Experience,
        KeywordClass::Discovered => SuggestionCategory::Keywords,
    };

    Suggestion {
        id: format!("fallback_{index}_{}", Uuid::new_v4().simple()),
        suggestion_type: SUGGESTION_TYPES[index % SUGGESTION_TYPES.len()],
        keyword: keyword.to_string(),
        location: location.to_string(),
        // No prompt to locate a real passage, so this is a placeholder, not a quote.
        original_text: format!("[Original text from {}]", location.to_lowercase()),
        suggested_text: format!("[Enhanced text including {keyword}]"),
        reason: format!(
            "Adding \"{keyword}\" will improve ATS matching as it appears in the job description"
        ),
        impact: SUGGESTION_IMPACTS[index % SUGGESTION_IMPACTS.len()],
        category,
    }
}

/// Fixed insights: the fallback does not infer tone or seniority from content.
fn generic_insights() -> ContextualInsights {
    ContextualInsights {
        resume_strengths: vec![
            "Well-structured format".to_string(),
            "Clear experience presentation".to_string(),
        ],
        improvement_areas: vec![
            "Keyword optimization".to_string(),
            "ATS compatibility".to_string(),
        ],
        overall_tone: "professional".to_string(),
        experience_level: "mid-level".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const RESUME: &str = "I have experience with JavaScript and React.";
    const JOB: &str = "Looking for a developer skilled in JavaScript, React, and Leadership.";

    fn occurs_whole_word(text: &str, keyword: &str) -> bool {
        WordCounter::new(&text.to_lowercase()).count(&keyword.to_lowercase()) > 0
    }

    #[test]
    fn test_javascript_react_leadership_scenario() {
        let result = fallback_analyze(RESUME, JOB);

        assert!(result.matched_keywords.contains(&KeywordMatch {
            keyword: "Javascript".to_string(),
            count: 1,
        }));
        assert!(result.matched_keywords.contains(&KeywordMatch {
            keyword: "React".to_string(),
            count: 1,
        }));
        assert!(result.missing_keywords.contains(&"Leadership".to_string()));
        assert_eq!(result.resume_text, RESUME);
    }

    #[test]
    fn test_empty_job_description_hits_floor() {
        let result = fallback_analyze(RESUME, "");
        assert_eq!(result.match_score, SCORE_FLOOR);
        assert!(result.matched_keywords.is_empty());
        assert!(result.missing_keywords.is_empty());
        assert!(result.suggestions.is_empty());
    }

    #[test]
    fn test_empty_inputs_do_not_panic() {
        let result = fallback_analyze("", "");
        assert_eq!(result.match_score, SCORE_FLOOR);

        let result = fallback_analyze("", JOB);
        assert_eq!(result.match_score, SCORE_FLOOR);
        assert!(result.matched_keywords.is_empty());
        assert!(!result.missing_keywords.is_empty());
    }

    #[test]
    fn test_score_is_capped_at_100() {
        let resume = "python ".repeat(50);
        let result = fallback_analyze(&resume, "Python");
        assert_eq!(result.match_score, 100);
    }

    #[test]
    fn test_score_formula() {
        // 20 tokens → denominator 2.0; matched weight 1 → 50
        let matched = vec![KeywordMatch {
            keyword: "Rust".to_string(),
            count: 1,
        }];
        assert_eq!(compute_match_score(&matched, 20), 50);
        // weight 3 over 40 tokens → 3 / 4 → 75
        let matched = vec![KeywordMatch {
            keyword: "Rust".to_string(),
            count: 3,
        }];
        assert_eq!(compute_match_score(&matched, 40), 75);
        // below the floor
        assert_eq!(compute_match_score(&[], 40), SCORE_FLOOR);
    }

    #[test]
    fn test_matched_sorted_descending_and_unique() {
        let resume = "Rust rust RUST. Docker docker. Kubernetes. Terraform terraform terraform terraform.";
        let job = "Rust, Docker, Kubernetes, Terraform and Ansible.";
        let result = fallback_analyze(resume, job);

        let counts: Vec<u32> = result.matched_keywords.iter().map(|m| m.count).collect();
        let mut sorted = counts.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(counts, sorted);
        assert_eq!(result.matched_keywords[0].keyword, "Terraform");

        let unique: HashSet<String> = result
            .matched_keywords
            .iter()
            .map(|m| m.keyword.to_lowercase())
            .collect();
        assert_eq!(unique.len(), result.matched_keywords.len());
    }

    #[test]
    fn test_ties_keep_discovery_order() {
        // docker precedes kubernetes in the technical vocabulary
        let result = fallback_analyze("kubernetes docker", "kubernetes docker");
        let names: Vec<&str> = result
            .matched_keywords
            .iter()
            .map(|m| m.keyword.as_str())
            .collect();
        assert_eq!(names, vec!["Docker", "Kubernetes"]);
    }

    #[test]
    fn test_matched_and_missing_classification_invariants() {
        let resume = "Backend engineer: Python, Django, PostgreSQL, mentoring juniors, agile teams.";
        let job = "We need a Python engineer with Django, Redis, Kubernetes, leadership, \
                   mentoring and strong communication. Agile experience preferred.";
        let result = fallback_analyze(resume, job);

        for matched in &result.matched_keywords {
            assert!(occurs_whole_word(resume, &matched.keyword), "{matched:?}");
            assert!(occurs_whole_word(job, &matched.keyword), "{matched:?}");
        }
        for missing in &result.missing_keywords {
            assert!(occurs_whole_word(job, missing), "{missing}");
            assert!(!occurs_whole_word(resume, missing), "{missing}");
        }
    }

    #[test]
    fn test_substring_does_not_count_as_match() {
        let result = fallback_analyze("JavaScript developer", "Java developer");
        assert!(result.missing_keywords.contains(&"Java".to_string()));
        assert!(!result
            .matched_keywords
            .iter()
            .any(|m| m.keyword == "Java"));
    }

    #[test]
    fn test_truncation_limits() {
        let job = "alpha1 bravo2 charlie3 delta4 echo5 foxtrot6 golf7 hotel8 india9 juliet10";
        let resume = job;
        let result = fallback_analyze(resume, job);
        assert_eq!(result.matched_keywords.len(), MAX_MATCHED_KEYWORDS);

        let result = fallback_analyze("", job);
        assert_eq!(result.missing_keywords.len(), MAX_MISSING_KEYWORDS);
        assert_eq!(result.suggestions.len(), MAX_SUGGESTIONS);
    }

    #[test]
    fn test_suggestions_target_first_missing_keywords() {
        let result = fallback_analyze("", "kubernetes leadership fintech payments");
        let keywords: Vec<&str> = result.suggestions.iter().map(|s| s.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["Kubernetes", "Leadership", "Fintech", "Payments"]);

        assert_eq!(result.suggestions[0].category, SuggestionCategory::Skills);
        assert_eq!(result.suggestions[1].category, SuggestionCategory::Experience);
        assert_eq!(result.suggestions[2].category, SuggestionCategory::Keywords);

        for suggestion in &result.suggestions {
            assert!(SUGGESTION_LOCATIONS.contains(&suggestion.location.as_str()));
            assert!(!suggestion.original_text.is_empty());
            assert!(suggestion.suggested_text.contains(&suggestion.keyword));
            assert!(suggestion.reason.contains(&suggestion.keyword));
        }

        let ids: HashSet<&str> = result.suggestions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), result.suggestions.len());
    }

    #[test]
    fn test_round_robin_metadata_is_deterministic() {
        let job = "kubernetes leadership fintech payments";
        let first = fallback_analyze("", job);
        let second = fallback_analyze("", job);
        for (a, b) in first.suggestions.iter().zip(&second.suggestions) {
            assert_eq!(a.location, b.location);
            assert_eq!(a.suggestion_type, b.suggestion_type);
            assert_eq!(a.impact, b.impact);
            assert_eq!(a.category, b.category);
        }
        assert_eq!(first.suggestions[0].suggestion_type, SuggestionType::Add);
        assert_eq!(first.suggestions[1].suggestion_type, SuggestionType::Enhance);
        assert_eq!(first.suggestions[2].suggestion_type, SuggestionType::Replace);
    }

    #[test]
    fn test_generic_insights_are_fixed() {
        let insights = fallback_analyze(RESUME, JOB).contextual_insights.unwrap();
        assert_eq!(insights.overall_tone, "professional");
        assert_eq!(insights.experience_level, "mid-level");
        assert_eq!(
            insights.resume_strengths,
            vec!["Well-structured format", "Clear experience presentation"]
        );
    }

    #[test]
    fn test_score_always_within_bounds() {
        let cases = [
            ("", ""),
            (RESUME, JOB),
            ("x", "the and for"),
            ("Rust Rust Rust", "Rust"),
            ("!!!", "???"),
        ];
        for (resume, job) in cases {
            let score = fallback_analyze(resume, job).match_score;
            assert!((SCORE_FLOOR..=100).contains(&score), "{score} for {resume:?}/{job:?}");
        }
    }
}
