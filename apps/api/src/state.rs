use crate::analysis::analyzer::Analyzer;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Primary-with-fallback analyzer. Holds the completion client, if one is configured.
    pub analyzer: Analyzer,
    pub config: Config,
}
