//! Shared domain types and configuration for the marketpulse workspace.
//!
//! Holds the article/sentiment/report data model used across the news,
//! sentiment, pipeline, server, and CLI crates, plus the env-driven
//! application configuration and instrument-category query expansion.

pub mod app_config;
pub mod config;
pub mod queries;
pub mod types;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use queries::{queries_for_category, Category};
pub use types::{
    AnalysisReport, AnalyzedArticle, Article, ContentSentiment, HeadlineSentiment, MarketSignal,
    SentimentLabel, SourceType,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
