use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-wide application configuration, loaded from env vars.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Base URL of the financial text-classification inference service.
    pub classifier_url: String,
    /// User agent sent on all outbound HTTP requests.
    pub user_agent: String,
    /// Per-request timeout for feed fetches and content extraction.
    pub request_timeout_secs: u64,
    /// Tighter timeout for redirect resolution so one bad link cannot
    /// stall a batch.
    pub resolve_timeout_secs: u64,
    /// Feed entries taken per search query.
    pub articles_per_query: usize,
    /// Maximum concurrent per-article workers.
    pub max_workers: usize,
    /// Extracted bodies shorter than this degrade to headline-only.
    pub min_content_length: usize,
    /// Character budget for classifier input; longer text is truncated.
    pub max_text_length: usize,
    /// Global wall-clock budget for one analysis run.
    pub analysis_timeout_secs: u64,
    /// How long the server keeps a completed report per query.
    pub cache_ttl_secs: u64,
}
