//! Confidence-weighted aggregation into a market signal.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use marketpulse_core::{AnalysisReport, AnalyzedArticle, MarketSignal, SentimentLabel};

/// Combine per-article judgments into one [`AnalysisReport`].
///
/// The content label is the canonical per-article sentiment (it is the
/// higher-fidelity signal); each article contributes its label
/// direction weighted by classifier confidence, so higher-confidence
/// predictions have greater influence. With zero total confidence the
/// net score is 0.0. Never fails; an empty input yields a zeroed
/// Neutral report.
#[must_use]
pub fn aggregate(
    articles: Vec<AnalyzedArticle>,
    timestamp: DateTime<Utc>,
    processing_time: f64,
) -> AnalysisReport {
    let mut sentiment_distribution: BTreeMap<SentimentLabel, usize> =
        SentimentLabel::all().into_iter().map(|l| (l, 0)).collect();

    let mut weighted_sum = 0.0_f64;
    let mut total_weight = 0.0_f64;

    for analyzed in &articles {
        let content = &analyzed.content_sentiment;
        *sentiment_distribution.entry(content.label).or_insert(0) += 1;
        weighted_sum += content.label.direction() * content.confidence;
        total_weight += content.confidence;
    }

    let net_sentiment_score = if total_weight > 0.0 {
        weighted_sum / total_weight
    } else {
        0.0
    };

    AnalysisReport {
        timestamp,
        total_articles: articles.len(),
        sentiment_distribution,
        net_sentiment_score,
        market_signal: MarketSignal::from_net_score(net_sentiment_score),
        articles,
        processing_time,
    }
}
