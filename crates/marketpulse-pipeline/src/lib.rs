//! Analysis pipeline orchestration.
//!
//! Sequences news discovery, two-stage sentiment scoring, and signal
//! aggregation under a global wall-clock budget and a bounded worker
//! pool, emitting coarse progress along the way. The caller always gets
//! either a complete-or-partial [`AnalysisReport`] or one descriptive
//! error — per-article failures never propagate.
//!
//! [`AnalysisReport`]: marketpulse_core::AnalysisReport

pub mod progress;

use std::time::Duration;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::Instant;

use marketpulse_core::{AnalysisReport, AnalyzedArticle, AppConfig};
use marketpulse_news::{NewsAggregator, NewsError};
use marketpulse_sentiment::{signal, ContentOutcome, SentimentEngine};

pub use progress::{Phase, Progress};

/// Extra time an in-flight article may take past the deadline before it
/// is abandoned.
const SCORING_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("news discovery failed: {0}")]
    News(#[from] NewsError),
}

/// Process-wide analysis pipeline.
///
/// Holds the news aggregator and the sentiment engine (with its
/// lazily-initialized classifier client) so repeated runs share HTTP
/// connection pools and model state.
pub struct Pipeline {
    aggregator: NewsAggregator,
    engine: SentimentEngine,
    max_workers: usize,
    progress: watch::Sender<Progress>,
}

impl Pipeline {
    /// Build a pipeline from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::News`] if the HTTP clients cannot be
    /// constructed.
    pub fn new(config: &AppConfig) -> Result<Self, PipelineError> {
        let (progress, _) = watch::channel(Progress::idle());
        Ok(Self {
            aggregator: NewsAggregator::new(config)?,
            engine: SentimentEngine::new(config),
            max_workers: config.max_workers,
            progress,
        })
    }

    /// Point news discovery at a different feed host (used by tests).
    #[must_use]
    pub fn with_feed_base(mut self, feed_base: impl Into<String>) -> Self {
        self.aggregator = self.aggregator.with_feed_base(feed_base);
        self
    }

    /// Subscribe to progress updates for the current and future runs.
    #[must_use]
    pub fn subscribe_progress(&self) -> watch::Receiver<Progress> {
        self.progress.subscribe()
    }

    /// Run one full analysis: discover articles for the queries, score
    /// each one, and aggregate into a report.
    ///
    /// The Fetching and Scoring phases together are bounded by
    /// `time_budget`: once it elapses no new per-article work is
    /// admitted, in-flight work gets a short grace period, and
    /// unfinished articles are dropped from the report rather than
    /// delaying it.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::InvalidQuery`] — empty query set, blank
    ///   queries, or a zero article limit, rejected before any fetch.
    /// - [`PipelineError::News`] — every feed query failed outright.
    pub async fn run_analysis(
        &self,
        queries: &[String],
        article_limit: usize,
        time_budget: Duration,
    ) -> Result<AnalysisReport, PipelineError> {
        if queries.is_empty() || queries.iter().all(|q| q.trim().is_empty()) {
            return Err(PipelineError::InvalidQuery(
                "at least one non-empty query is required".to_string(),
            ));
        }
        if article_limit == 0 {
            return Err(PipelineError::InvalidQuery(
                "article limit must be positive".to_string(),
            ));
        }

        let started = Instant::now();
        let deadline = started + time_budget;

        self.set_progress(Phase::Fetching, 10);
        tracing::info!(queries = queries.len(), article_limit, "analysis run started");

        let articles = match tokio::time::timeout_at(
            deadline,
            self.aggregator.fetch_articles(queries, article_limit),
        )
        .await
        {
            Ok(Ok(articles)) => articles,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "news discovery failed — run aborted");
                self.set_progress(Phase::Failed, 100);
                return Err(e.into());
            }
            Err(_) => {
                tracing::warn!("time budget exhausted during fetch — continuing with no articles");
                Vec::new()
            }
        };

        self.set_progress(Phase::Scoring, 40);
        let discovered = articles.len();
        let analyzed = self.score_articles(articles, deadline).await;

        self.set_progress(Phase::Aggregating, 90);
        let report = signal::aggregate(analyzed, Utc::now(), started.elapsed().as_secs_f64());

        tracing::info!(
            discovered,
            analyzed = report.total_articles,
            signal = %report.market_signal,
            net_score = report.net_sentiment_score,
            elapsed_secs = report.processing_time,
            "analysis run completed"
        );
        self.set_progress(Phase::Done, 100);
        Ok(report)
    }

    /// Score articles under the worker pool, honoring the deadline.
    ///
    /// Articles whose scoring has not started by the deadline are
    /// skipped; in-flight scoring is abandoned after the grace period.
    /// Output preserves the input (discovery) order.
    async fn score_articles(
        &self,
        articles: Vec<marketpulse_core::Article>,
        deadline: Instant,
    ) -> Vec<AnalyzedArticle> {
        let abandon_at = deadline + SCORING_GRACE;

        let results: Vec<Result<(usize, AnalyzedArticle), ContentOutcome>> =
            stream::iter(articles.into_iter().enumerate())
                .map(|(idx, article)| async move {
                    if Instant::now() >= deadline {
                        return Err(ContentOutcome::Skipped {
                            reason: "time budget exhausted before scoring".to_string(),
                        });
                    }
                    match tokio::time::timeout_at(abandon_at, self.engine.analyze_article(article))
                        .await
                    {
                        Ok(analyzed) => Ok((idx, analyzed)),
                        Err(_) => Err(ContentOutcome::Skipped {
                            reason: "scoring abandoned past the grace period".to_string(),
                        }),
                    }
                })
                .buffer_unordered(self.max_workers.max(1))
                .collect()
                .await;

        let mut scored = Vec::new();
        let mut skipped = 0usize;
        for result in results {
            match result {
                Ok(entry) => scored.push(entry),
                Err(ContentOutcome::Skipped { reason }) => {
                    skipped += 1;
                    tracing::debug!(reason = %reason, "article dropped from report");
                }
                Err(_) => {}
            }
        }
        if skipped > 0 {
            tracing::warn!(skipped, "articles dropped by the time budget");
        }

        scored.sort_by_key(|(idx, _)| *idx);
        scored.into_iter().map(|(_, analyzed)| analyzed).collect()
    }

    /// Best-effort progress emission; a missing or slow consumer never
    /// stalls the pipeline.
    fn set_progress(&self, phase: Phase, percent: u8) {
        let _ = self.progress.send(Progress::new(phase, percent));
    }
}
