// Analysis module: keyword matching, primary/fallback analysis and suggestion application.

pub mod analyzer;
pub mod applicator;
pub mod fallback;
pub mod handlers;
pub mod keywords;
pub mod models;
pub mod normalizer;
pub mod prompts;
