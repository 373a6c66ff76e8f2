//! Two-stage per-article sentiment analysis.

use std::collections::BTreeMap;

use tokio::sync::OnceCell;

use marketpulse_core::{
    AnalyzedArticle, AppConfig, Article, ContentSentiment, HeadlineSentiment, SentimentLabel,
};

use crate::classifier::{empty_text_sentiment, truncate_text, ClassifierClient};
use crate::error::SentimentError;
use crate::lexicon;

/// Outcome of one article's content-scoring attempt.
///
/// Modeled as a tagged result rather than an error so callers can count
/// degraded and skipped outcomes explicitly.
#[derive(Debug, Clone)]
pub enum ContentOutcome {
    /// The classifier produced a result.
    Scored(ContentSentiment),
    /// The classifier failed; the lexicon fallback scored the text.
    Degraded {
        sentiment: ContentSentiment,
        reason: String,
    },
    /// Scoring never ran (e.g. abandoned at the time budget).
    Skipped { reason: String },
}

/// Process-wide sentiment engine: lexical headline scorer plus the
/// lazily-initialized classification client shared across workers.
pub struct SentimentEngine {
    classifier_url: String,
    request_timeout_secs: u64,
    max_text_length: usize,
    classifier: OnceCell<ClassifierClient>,
}

impl SentimentEngine {
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self {
            classifier_url: config.classifier_url.clone(),
            request_timeout_secs: config.request_timeout_secs,
            max_text_length: config.max_text_length,
            classifier: OnceCell::new(),
        }
    }

    /// The shared classifier client, built on first use.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the client cannot be built.
    async fn classifier(&self) -> Result<&ClassifierClient, SentimentError> {
        self.classifier
            .get_or_try_init(|| async {
                tracing::info!(url = %self.classifier_url, "initializing classifier client");
                ClassifierClient::new(&self.classifier_url, self.request_timeout_secs)
            })
            .await
    }

    /// Score a headline with the lexical scorer. Pure and infallible.
    #[must_use]
    pub fn analyze_headline(&self, text: &str) -> HeadlineSentiment {
        lexicon::score_headline(text)
    }

    /// Score article content with the classifier, degrading to the
    /// lexicon on any failure.
    ///
    /// Empty text short-circuits to the deterministic neutral result
    /// without touching the service.
    pub async fn analyze_content(&self, text: &str) -> ContentOutcome {
        if text.trim().is_empty() {
            return ContentOutcome::Scored(empty_text_sentiment());
        }

        let truncated = truncate_text(text, self.max_text_length);

        let classify = async {
            let client = self.classifier().await?;
            client.classify(&truncated).await
        };

        match classify.await {
            Ok(sentiment) => ContentOutcome::Scored(sentiment),
            Err(e) => {
                tracing::warn!(error = %e, "classifier failed — degrading to lexicon scorer");
                ContentOutcome::Degraded {
                    sentiment: lexicon_content_sentiment(&truncated),
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Run both scorers for one article.
    ///
    /// Never fails: every failure mode resolves to a degraded or
    /// neutral sentiment, flagged on the returned article.
    pub async fn analyze_article(&self, article: Article) -> AnalyzedArticle {
        let headline_sentiment = self.analyze_headline(&article.title);
        let outcome = self.analyze_content(&article.content).await;

        let (content_sentiment, degraded) = match outcome {
            ContentOutcome::Scored(sentiment) => (sentiment, false),
            ContentOutcome::Degraded { sentiment, .. } => (sentiment, true),
            ContentOutcome::Skipped { .. } => (empty_text_sentiment(), true),
        };

        AnalyzedArticle {
            article,
            headline_sentiment,
            content_sentiment,
            degraded,
        }
    }
}

/// Build a [`ContentSentiment`] from the lexicon scorer for the
/// degraded path.
///
/// The winning label gets probability mass proportional to the compound
/// magnitude, floored at a uniform-ish 0.34 so a near-zero compound
/// still yields a valid distribution; the remainder splits evenly.
fn lexicon_content_sentiment(text: &str) -> ContentSentiment {
    let headline = lexicon::score_headline(text);
    let winner_mass = (headline.score.abs().mul_add(0.66, 0.34)).min(1.0);
    let other_mass = (1.0 - winner_mass) / 2.0;

    let probabilities: BTreeMap<SentimentLabel, f64> = SentimentLabel::all()
        .into_iter()
        .map(|label| {
            let mass = if label == headline.label {
                winner_mass
            } else {
                other_mass
            };
            (label, mass)
        })
        .collect();

    ContentSentiment {
        confidence: winner_mass,
        label: headline.label,
        probabilities,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicon_content_sentiment_is_valid_distribution() {
        for text in ["gold rallies on strong gains", "markets crash", "plain day"] {
            let sentiment = lexicon_content_sentiment(text);
            let sum: f64 = sentiment.probabilities.values().sum();
            assert!((sum - 1.0).abs() < 1e-9, "sum for {text:?} was {sum}");
            assert!((0.0..=1.0).contains(&sentiment.confidence));
            assert_eq!(sentiment.confidence, sentiment.probabilities[&sentiment.label]);
        }
    }

    #[test]
    fn lexicon_content_sentiment_tracks_lexicon_label() {
        let bullish = lexicon_content_sentiment("profits surge to record high");
        assert_eq!(bullish.label, SentimentLabel::Positive);
        assert!(bullish.confidence > 0.34);

        let bearish = lexicon_content_sentiment("bankruptcy fears trigger selloff");
        assert_eq!(bearish.label, SentimentLabel::Negative);
    }
}
