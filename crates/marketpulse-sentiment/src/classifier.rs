//! Financial text-classification service client.
//!
//! The content scorer talks to a pretrained sequence-classification
//! model served over HTTP. The client is created once per process and
//! shared read-only across workers; one inference call occupies its
//! worker fully.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use marketpulse_core::{ContentSentiment, SentimentLabel};

use crate::error::SentimentError;

/// Probability-sum tolerance accepted from the service before
/// renormalization kicks in.
const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// HTTP client for the classification service's `/predict` endpoint.
pub struct ClassifierClient {
    client: reqwest::Client,
    url: String,
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    label: String,
    score: f64,
}

impl ClassifierClient {
    /// Create a new `ClassifierClient` for a service base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, SentimentError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: format!("{}/predict", base_url.trim_end_matches('/')),
        })
    }

    /// Classify one text, returning label, confidence, and the full
    /// probability distribution.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Classifier`] if the request fails, the
    /// service answers non-2xx, the response cannot be parsed, or the
    /// returned distribution is unusable. Callers degrade to the
    /// lexicon path on any of these.
    pub async fn classify(&self, text: &str) -> Result<ContentSentiment, SentimentError> {
        let request = PredictRequest { inputs: text };
        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SentimentError::Classifier(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SentimentError::Classifier(format!(
                "service returned status {status}"
            )));
        }

        let predictions: Vec<Prediction> = response
            .json()
            .await
            .map_err(|e| SentimentError::Classifier(format!("response parse error: {e}")))?;

        sentiment_from_predictions(&predictions)
    }
}

/// Turn raw per-label predictions into a [`ContentSentiment`].
///
/// Unknown labels are rejected, missing labels fill in at zero, and the
/// distribution is renormalized whenever it drifts from summing to one.
/// Label choice is the argmax; ties break in the fixed
/// Positive/Negative/Neutral order for determinism.
fn sentiment_from_predictions(
    predictions: &[Prediction],
) -> Result<ContentSentiment, SentimentError> {
    let mut probabilities: BTreeMap<SentimentLabel, f64> =
        SentimentLabel::all().into_iter().map(|l| (l, 0.0)).collect();

    for prediction in predictions {
        let label = parse_label(&prediction.label)?;
        probabilities.insert(label, prediction.score.max(0.0));
    }

    let sum: f64 = probabilities.values().sum();
    if sum <= 0.0 {
        return Err(SentimentError::Classifier(
            "service returned no probability mass".to_string(),
        ));
    }
    if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
        for value in probabilities.values_mut() {
            *value /= sum;
        }
    }

    let mut best = SentimentLabel::Neutral;
    let mut best_mass = f64::MIN;
    for label in SentimentLabel::all() {
        let mass = probabilities[&label];
        if mass > best_mass {
            best = label;
            best_mass = mass;
        }
    }

    Ok(ContentSentiment {
        confidence: best_mass,
        label: best,
        probabilities,
    })
}

fn parse_label(raw: &str) -> Result<SentimentLabel, SentimentError> {
    match raw.to_lowercase().as_str() {
        "positive" => Ok(SentimentLabel::Positive),
        "negative" => Ok(SentimentLabel::Negative),
        "neutral" => Ok(SentimentLabel::Neutral),
        other => Err(SentimentError::Classifier(format!(
            "unknown label from service: {other}"
        ))),
    }
}

/// Deterministic result for empty input: Neutral at zero confidence
/// with a uniform-ish distribution, produced without a service call.
#[must_use]
pub fn empty_text_sentiment() -> ContentSentiment {
    let probabilities: BTreeMap<SentimentLabel, f64> = [
        (SentimentLabel::Negative, 0.33),
        (SentimentLabel::Neutral, 0.34),
        (SentimentLabel::Positive, 0.33),
    ]
    .into_iter()
    .collect();
    ContentSentiment {
        confidence: 0.0,
        label: SentimentLabel::Neutral,
        probabilities,
    }
}

/// Truncate text to the model's input budget, keeping the leading
/// portion. Prefers whole sentences, then whole words, then a plain
/// character cut. Never fails and never drops the whole text.
#[must_use]
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let mut truncated = String::new();
    let mut used = 0usize;
    for sentence in text.split(". ") {
        let len = sentence.chars().count() + 2;
        if used + len > max_chars {
            break;
        }
        truncated.push_str(sentence);
        truncated.push_str(". ");
        used += len;
    }

    if truncated.is_empty() {
        for word in text.split_whitespace() {
            let len = word.chars().count() + 1;
            if used + len > max_chars {
                break;
            }
            truncated.push_str(word);
            truncated.push(' ');
            used += len;
        }
    }

    if truncated.is_empty() {
        truncated = text.chars().take(max_chars).collect();
    }

    truncated.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(label: &str, score: f64) -> Prediction {
        Prediction {
            label: label.to_string(),
            score,
        }
    }

    #[test]
    fn argmax_label_and_confidence() {
        let sentiment = sentiment_from_predictions(&[
            prediction("Positive", 0.7),
            prediction("Negative", 0.1),
            prediction("Neutral", 0.2),
        ])
        .expect("valid predictions");
        assert_eq!(sentiment.label, SentimentLabel::Positive);
        assert!((sentiment.confidence - 0.7).abs() < 1e-9);
    }

    #[test]
    fn probabilities_renormalized_when_sum_off() {
        let sentiment = sentiment_from_predictions(&[
            prediction("positive", 2.0),
            prediction("negative", 1.0),
            prediction("neutral", 1.0),
        ])
        .expect("valid predictions");
        let sum: f64 = sentiment.probabilities.values().sum();
        assert!((sum - 1.0).abs() < 1e-6, "sum was {sum}");
        assert!((sentiment.confidence - 0.5).abs() < 1e-9);
    }

    #[test]
    fn missing_labels_fill_in_at_zero() {
        let sentiment = sentiment_from_predictions(&[prediction("negative", 1.0)])
            .expect("valid predictions");
        assert_eq!(sentiment.label, SentimentLabel::Negative);
        assert_eq!(sentiment.probabilities[&SentimentLabel::Positive], 0.0);
        assert_eq!(sentiment.probabilities[&SentimentLabel::Neutral], 0.0);
    }

    #[test]
    fn unknown_label_is_rejected() {
        let result = sentiment_from_predictions(&[prediction("euphoric", 1.0)]);
        assert!(matches!(result, Err(SentimentError::Classifier(_))));
    }

    #[test]
    fn zero_mass_is_rejected() {
        let result = sentiment_from_predictions(&[prediction("positive", 0.0)]);
        assert!(matches!(result, Err(SentimentError::Classifier(_))));
    }

    #[test]
    fn empty_text_sentiment_shape() {
        let sentiment = empty_text_sentiment();
        assert_eq!(sentiment.label, SentimentLabel::Neutral);
        assert_eq!(sentiment.confidence, 0.0);
        let sum: f64 = sentiment.probabilities.values().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn truncate_keeps_short_text_intact() {
        assert_eq!(truncate_text("short text", 512), "short text");
    }

    #[test]
    fn truncate_prefers_sentence_boundary() {
        let text = "First sentence here. Second sentence follows. Third is long and gets cut.";
        let truncated = truncate_text(text, 50);
        assert_eq!(truncated, "First sentence here. Second sentence follows.");
    }

    #[test]
    fn truncate_falls_back_to_word_boundary() {
        let text = "one two three four five six seven eight nine ten";
        let truncated = truncate_text(text, 18);
        assert_eq!(truncated, "one two three");
    }

    #[test]
    fn truncate_falls_back_to_char_cut_for_unbroken_text() {
        let text = "a".repeat(100);
        let truncated = truncate_text(&text, 10);
        assert_eq!(truncated.chars().count(), 10);
    }

    #[test]
    fn truncate_never_exceeds_budget() {
        let text = "Sentence one is modest. Sentence two stretches a bit longer. Tail.";
        for budget in [5, 10, 25, 40, 60, 200] {
            let truncated = truncate_text(text, budget);
            assert!(
                truncated.chars().count() <= budget,
                "budget {budget} exceeded: {} chars",
                truncated.chars().count()
            );
        }
    }
}
