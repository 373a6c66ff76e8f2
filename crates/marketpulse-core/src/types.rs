//! Article and sentiment data model.
//!
//! Everything that crosses a crate boundary lives here: discovered
//! articles, per-article sentiment results, and the final analysis
//! report handed to the transport layer. All wire-visible types derive
//! serde with the exact JSON field names the dashboard consumes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Headline score at or above this value classifies as Positive.
pub const HEADLINE_POSITIVE_THRESHOLD: f64 = 0.05;
/// Headline score at or below the negation of this classifies as Negative.
pub const HEADLINE_NEGATIVE_THRESHOLD: f64 = -0.05;

/// Net sentiment above this value signals Bullish.
pub const SIGNAL_BULLISH_THRESHOLD: f64 = 0.15;
/// Net sentiment below the negation of this signals Bearish.
pub const SIGNAL_BEARISH_THRESHOLD: f64 = -0.15;

/// Per-article sentiment class shared by both scorers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Signed direction used for confidence weighting: +1, -1, or 0.
    #[must_use]
    pub fn direction(self) -> f64 {
        match self {
            SentimentLabel::Positive => 1.0,
            SentimentLabel::Negative => -1.0,
            SentimentLabel::Neutral => 0.0,
        }
    }

    /// All labels, in distribution-reporting order.
    #[must_use]
    pub fn all() -> [SentimentLabel; 3] {
        [
            SentimentLabel::Positive,
            SentimentLabel::Negative,
            SentimentLabel::Neutral,
        ]
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "Positive"),
            SentimentLabel::Negative => write!(f, "Negative"),
            SentimentLabel::Neutral => write!(f, "Neutral"),
        }
    }
}

/// Final categorical market verdict derived from the net sentiment score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketSignal {
    Bullish,
    Bearish,
    Neutral,
}

impl MarketSignal {
    /// Classify a net sentiment score using the fixed symmetric thresholds.
    #[must_use]
    pub fn from_net_score(net: f64) -> Self {
        if net > SIGNAL_BULLISH_THRESHOLD {
            MarketSignal::Bullish
        } else if net < SIGNAL_BEARISH_THRESHOLD {
            MarketSignal::Bearish
        } else {
            MarketSignal::Neutral
        }
    }
}

impl std::fmt::Display for MarketSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketSignal::Bullish => write!(f, "BULLISH"),
            MarketSignal::Bearish => write!(f, "BEARISH"),
            MarketSignal::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Whether an article carries extracted body text or only its headline.
///
/// Computed from content length, never set independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    #[serde(rename = "Full Article")]
    FullArticle,
    #[serde(rename = "Headline Only")]
    HeadlineOnly,
}

impl SourceType {
    /// Classify content: body text at or above `min_content_length`
    /// characters counts as a full article.
    #[must_use]
    pub fn classify(content: &str, min_content_length: usize) -> Self {
        if content.trim().len() >= min_content_length {
            SourceType::FullArticle
        } else {
            SourceType::HeadlineOnly
        }
    }
}

/// One discovered news item, immutable once handed to the sentiment stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    /// Resolved publisher URL, or the original feed link when resolution failed.
    pub url: String,
    /// Feed-supplied publication timestamp, unvalidated.
    pub published: Option<String>,
    /// Extracted body text; empty when extraction failed or fell short.
    pub content: String,
    pub source_type: SourceType,
}

impl Article {
    /// Build an article, deriving `source_type` from the content length rule.
    #[must_use]
    pub fn new(
        title: String,
        url: String,
        published: Option<String>,
        content: String,
        min_content_length: usize,
    ) -> Self {
        let source_type = SourceType::classify(&content, min_content_length);
        Self {
            title,
            url,
            published,
            content,
            source_type,
        }
    }
}

/// Lexical sentiment of a headline: compound score plus derived label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlineSentiment {
    /// Compound score, clipped to [-1, 1].
    pub score: f64,
    pub label: SentimentLabel,
}

impl HeadlineSentiment {
    /// Derive the label from a compound score via the fixed thresholds.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        let label = if score >= HEADLINE_POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if score <= HEADLINE_NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };
        Self { score, label }
    }
}

/// Classifier sentiment of article content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSentiment {
    /// Probability mass on the chosen label, in [0, 1].
    pub confidence: f64,
    pub label: SentimentLabel,
    /// Per-label probabilities summing to 1 within floating tolerance.
    pub probabilities: BTreeMap<SentimentLabel, f64>,
}

/// An article paired with both sentiment judgments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzedArticle {
    pub article: Article,
    pub headline_sentiment: HeadlineSentiment,
    pub content_sentiment: ContentSentiment,
    /// True when the content scorer fell back to the lexicon path.
    pub degraded: bool,
}

/// Aggregate result of one completed analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub timestamp: DateTime<Utc>,
    pub total_articles: usize,
    /// Counts per label; the three labels are always present and the
    /// counts sum to `total_articles`.
    pub sentiment_distribution: BTreeMap<SentimentLabel, usize>,
    /// Confidence-weighted mean direction, in [-1, 1].
    pub net_sentiment_score: f64,
    pub market_signal: MarketSignal,
    /// Analyzed articles in discovery order.
    pub articles: Vec<AnalyzedArticle>,
    /// Elapsed wall-clock seconds for the run.
    pub processing_time: f64,
}
