//! Keyword Extractor: builds the candidate keyword universe for a job description
//! and counts whole-word occurrences.
//!
//! The universe is the curated technical and soft-skill vocabularies followed by the
//! job description's own filtered tokens, deduplicated in that discovery order. The
//! curated lists catch multi-word terms ("problem solving") that raw tokens miss.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

pub const TECHNICAL_KEYWORDS: &[&str] = &[
    "javascript",
    "python",
    "java",
    "react",
    "node.js",
    "typescript",
    "angular",
    "vue",
    "sql",
    "mysql",
    "postgresql",
    "mongodb",
    "redis",
    "git",
    "github",
    "gitlab",
    "aws",
    "azure",
    "gcp",
    "docker",
    "kubernetes",
    "jenkins",
    "terraform",
    "html",
    "css",
    "sass",
    "bootstrap",
    "tailwind",
    "webpack",
    "vite",
    "express",
    "nestjs",
    "django",
    "flask",
    "spring",
    "laravel",
];

pub const SOFT_SKILLS: &[&str] = &[
    "leadership",
    "communication",
    "problem solving",
    "teamwork",
    "collaboration",
    "analytical",
    "creative",
    "organized",
    "detail oriented",
    "time management",
    "agile",
    "scrum",
    "project management",
    "mentoring",
    "training",
];

const STOPWORDS: &[&str] = &[
    "this", "that", "with", "from", "they", "have", "will", "been", "your", "their", "would",
    "should", "could",
];

/// Tokens of this many characters or fewer are dropped.
const MIN_TOKEN_CHARS: usize = 3;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("valid non-word regex"));
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("valid word regex"));

/// Where a candidate keyword came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordClass {
    Technical,
    SoftSkill,
    /// Found only as a raw job-description token.
    Discovered,
}

pub fn classify(keyword: &str) -> KeywordClass {
    let keyword = keyword.to_lowercase();
    if TECHNICAL_KEYWORDS.contains(&keyword.as_str()) {
        KeywordClass::Technical
    } else if SOFT_SKILLS.contains(&keyword.as_str()) {
        KeywordClass::SoftSkill
    } else {
        KeywordClass::Discovered
    }
}

/// Lowercased job-description tokens surviving the length and stopword filter,
/// duplicates included. Its length is the score denominator.
pub fn job_tokens(job_description: &str) -> Vec<String> {
    let lowered = job_description.to_lowercase();
    NON_WORD
        .replace_all(&lowered, " ")
        .split_whitespace()
        .filter(|token| token.chars().count() > MIN_TOKEN_CHARS)
        .filter(|token| !STOPWORDS.contains(token))
        .map(str::to_string)
        .collect()
}

/// The deduplicated candidate universe, in discovery order.
pub fn extract_candidate_keywords(job_description: &str) -> Vec<String> {
    candidate_universe(&job_tokens(job_description))
}

pub(crate) fn candidate_universe(tokens: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    TECHNICAL_KEYWORDS
        .iter()
        .chain(SOFT_SKILLS)
        .map(|k| k.to_string())
        .chain(tokens.iter().cloned())
        .filter(|k| seen.insert(k.clone()))
        .collect()
}

/// Whole-word occurrence counter over one lowercased text.
///
/// Single-word keywords are looked up in a precomputed word histogram, which gives
/// the same answer as a `\bkeyword\b` search. Keywords containing spaces or
/// punctuation fall back to a word-boundary regex.
pub struct WordCounter<'a> {
    text: &'a str,
    words: HashMap<&'a str, u32>,
}

impl<'a> WordCounter<'a> {
    /// `text` must already be lowercased.
    pub fn new(text: &'a str) -> Self {
        let mut words = HashMap::new();
        for word in WORD.find_iter(text) {
            *words.entry(word.as_str()).or_insert(0) += 1;
        }
        Self { text, words }
    }

    pub fn count(&self, keyword: &str) -> u32 {
        if keyword.is_empty() {
            return 0;
        }
        if WORD.find(keyword).map(|m| m.as_str()) == Some(keyword) {
            return self.words.get(keyword).copied().unwrap_or(0);
        }
        match Regex::new(&format!(r"\b{}\b", regex::escape(keyword))) {
            Ok(pattern) => pattern.find_iter(self.text).count() as u32,
            Err(_) => 0,
        }
    }
}

/// Uppercases the first character: "node.js" → "Node.js", "problem solving" → "Problem solving".
/// Uppercases the first character. Display only: aimed at ASCII keywords, so Unicode
/// digraphs get their uppercase form (`ǆ` → `Ǆ`) rather than a true titlecase.
pub fn title_case(keyword: &str) -> String {
    let mut chars = keyword.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_tokens_filters_short_words_and_stopwords() {
        let tokens = job_tokens("We will work with your team on Rust and Kubernetes, this year.");
        assert_eq!(tokens, vec!["work", "team", "rust", "kubernetes", "year"]);
    }

    #[test]
    fn test_job_tokens_keeps_duplicates() {
        let tokens = job_tokens("Python python PYTHON");
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_job_tokens_splits_on_punctuation() {
        let tokens = job_tokens("node.js/express experience");
        assert_eq!(tokens, vec!["node", "express", "experience"]);
    }

    #[test]
    fn test_candidate_universe_deduplicates_in_discovery_order() {
        let universe = extract_candidate_keywords("React developer, React expert, leadership");
        let react_positions: Vec<_> = universe
            .iter()
            .enumerate()
            .filter(|(_, k)| k.as_str() == "react")
            .collect();
        assert_eq!(react_positions.len(), 1);
        assert_eq!(universe[0], "javascript");
        assert_eq!(universe.last().map(String::as_str), Some("expert"));
        assert!(universe.contains(&"developer".to_string()));
    }

    #[test]
    fn test_candidate_universe_for_empty_description_is_curated_lists() {
        let universe = extract_candidate_keywords("");
        assert_eq!(universe.len(), TECHNICAL_KEYWORDS.len() + SOFT_SKILLS.len());
    }

    #[test]
    fn test_word_counter_is_whole_word() {
        let counter = WordCounter::new("java and javascript, java.");
        assert_eq!(counter.count("java"), 2);
        assert_eq!(counter.count("javascript"), 1);
        assert_eq!(counter.count("script"), 0);
    }

    #[test]
    fn test_word_counter_multi_word_and_dotted_keywords() {
        let counter = WordCounter::new("strong problem solving; node.js and nodeXjs; problem solvings");
        assert_eq!(counter.count("problem solving"), 1);
        assert_eq!(counter.count("node.js"), 1);
    }

    #[test]
    fn test_word_counter_empty_keyword() {
        assert_eq!(WordCounter::new("anything").count(""), 0);
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("Kubernetes"), KeywordClass::Technical);
        assert_eq!(classify("time management"), KeywordClass::SoftSkill);
        assert_eq!(classify("fintech"), KeywordClass::Discovered);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("javascript"), "Javascript");
        assert_eq!(title_case("node.js"), "Node.js");
        assert_eq!(title_case("problem solving"), "Problem solving");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_title_case_non_ascii_is_uppercase_only() {
        assert_eq!(title_case("ǆungla"), "Ǆungla");
        assert_eq!(title_case("émigré"), "Émigré");
        // combining marks after the first char are left untouched
        assert_eq!(title_case("i\u{307}stanbul"), "I\u{307}stanbul");
    }
}
