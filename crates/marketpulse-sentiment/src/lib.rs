//! Two-stage sentiment engine for the marketpulse analysis pipeline.
//!
//! Headlines are scored with a fast lexical scorer; article bodies go
//! through a financial text-classification service with a degraded
//! lexicon fallback. Per-article judgments are combined into a
//! confidence-weighted market signal by [`signal::aggregate`].

pub mod classifier;
pub mod engine;
pub mod error;
pub mod lexicon;
pub mod signal;

pub use classifier::ClassifierClient;
pub use engine::{ContentOutcome, SentimentEngine};
pub use error::SentimentError;
pub use lexicon::score_headline;
pub use signal::aggregate;
