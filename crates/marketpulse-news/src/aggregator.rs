//! Multi-query news aggregation with deduplication.

use std::collections::HashSet;

use futures::stream::{self, StreamExt};
use reqwest::Client;
use tokio::sync::Mutex;

use marketpulse_core::{AppConfig, Article};

use crate::client::{build_http_client, build_resolver_client};
use crate::error::NewsError;
use crate::feed::{self, FeedItem, DEFAULT_FEED_BASE};
use crate::{extract, resolve};

/// Titles and resolved URLs already accepted in the current batch.
///
/// Workers claim both keys under one lock acquisition so the
/// read-then-write cannot race; the first claimant wins and later
/// duplicates are dropped.
#[derive(Debug, Default)]
struct DedupState {
    titles: HashSet<String>,
    urls: HashSet<String>,
}

/// Fetches feed entries for a set of queries and turns them into
/// deduplicated, content-extracted [`Article`]s.
pub struct NewsAggregator {
    http_client: Client,
    resolver_client: Client,
    feed_base: String,
    max_workers: usize,
    min_content_length: usize,
}

impl NewsAggregator {
    /// Build an aggregator from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError::Http`] if an HTTP client cannot be constructed.
    pub fn new(config: &AppConfig) -> Result<Self, NewsError> {
        Ok(Self {
            http_client: build_http_client(config.request_timeout_secs, &config.user_agent)?,
            resolver_client: build_resolver_client(
                config.resolve_timeout_secs,
                &config.user_agent,
            )?,
            feed_base: DEFAULT_FEED_BASE.to_string(),
            max_workers: config.max_workers,
            min_content_length: config.min_content_length,
        })
    }

    /// Point the aggregator at a different feed host (used by tests).
    #[must_use]
    pub fn with_feed_base(mut self, feed_base: impl Into<String>) -> Self {
        self.feed_base = feed_base.into();
        self
    }

    /// Fetch up to `per_query_limit` articles for each query.
    ///
    /// Each query's feed is fetched independently; a failing query logs
    /// a warning and contributes zero entries. Surviving entries are
    /// resolved and extracted under a bounded worker pool, deduplicated
    /// by normalized title and resolved URL across the whole batch, and
    /// returned in first-seen discovery order.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError::AllQueriesFailed`] only when every feed
    /// query failed — a partial failure is not an error.
    pub async fn fetch_articles(
        &self,
        queries: &[String],
        per_query_limit: usize,
    ) -> Result<Vec<Article>, NewsError> {
        let mut seen_links: HashSet<String> = HashSet::new();
        let mut entries: Vec<FeedItem> = Vec::new();
        let mut failed_queries = 0usize;

        for query in queries {
            match feed::search_news(&self.http_client, &self.feed_base, query, per_query_limit)
                .await
            {
                Ok(items) => {
                    tracing::debug!(query = %query, count = items.len(), "collected feed entries");
                    for item in items {
                        if seen_links.insert(item.link.clone()) {
                            entries.push(item);
                        }
                    }
                }
                Err(e) => {
                    failed_queries += 1;
                    tracing::warn!(query = %query, error = %e, "feed query failed — continuing");
                }
            }
        }

        if !queries.is_empty() && failed_queries == queries.len() {
            return Err(NewsError::AllQueriesFailed {
                attempted: queries.len(),
            });
        }

        tracing::info!(
            queries = queries.len(),
            entries = entries.len(),
            "processing unique feed entries"
        );

        let dedup = Mutex::new(DedupState::default());
        let mut processed: Vec<(usize, Article)> = stream::iter(entries.into_iter().enumerate())
            .map(|(idx, entry)| {
                let dedup = &dedup;
                async move {
                    let article = self.process_entry(entry, dedup).await?;
                    Some((idx, article))
                }
            })
            .buffer_unordered(self.max_workers.max(1))
            .filter_map(|result| async move { result })
            .collect()
            .await;

        // Workers complete out of order; restore discovery order.
        processed.sort_by_key(|(idx, _)| *idx);
        Ok(processed.into_iter().map(|(_, article)| article).collect())
    }

    /// Resolve, claim, and extract one feed entry.
    ///
    /// Returns `None` when the entry loses the dedup claim or has a
    /// blank title. Extraction failure does not drop the entry — it
    /// becomes a headline-only article with empty content.
    async fn process_entry(&self, entry: FeedItem, dedup: &Mutex<DedupState>) -> Option<Article> {
        let normalized = normalize_title(&entry.title);
        if normalized.is_empty() {
            return None;
        }

        let resolved = resolve::resolve_url(&self.resolver_client, &entry.link).await;

        {
            let mut state = dedup.lock().await;
            if state.titles.contains(&normalized) || state.urls.contains(&resolved) {
                tracing::debug!(title = %entry.title, url = %resolved, "duplicate dropped");
                return None;
            }
            state.titles.insert(normalized);
            state.urls.insert(resolved.clone());
        }

        let content =
            extract::extract_content(&self.http_client, &resolved, self.min_content_length)
                .await
                .unwrap_or_default();

        Some(Article::new(
            entry.title,
            resolved,
            entry.published,
            content,
            self.min_content_length,
        ))
    }
}

/// Case-fold a title and collapse internal whitespace for dedup matching.
fn normalize_title(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
