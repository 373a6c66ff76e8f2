//! Lexical sentiment scorer for financial headlines.

use marketpulse_core::HeadlineSentiment;

/// Normalization constant for the compound score: `x / sqrt(x² + ALPHA)`
/// maps an unbounded valence sum into (-1, 1), the conventional lexical
/// compound-score transform.
const ALPHA: f64 = 15.0;

/// Scalar applied to a word's valence when it is preceded by a negator.
const NEGATION_SCALAR: f64 = -0.74;

/// Words that invert the valence of the following word.
const NEGATORS: &[&str] = &[
    "not", "no", "never", "without", "isn't", "wasn't", "aren't", "doesn't", "don't", "didn't",
    "won't", "can't", "cannot", "couldn't", "shouldn't",
];

/// Financial-news word valences.
///
/// Keys are lowercase single words; values are raw valences on a
/// roughly [-3, 3] scale, positive for bullish language and negative
/// for bearish. The summed valence is normalized into [-1, 1] by
/// [`compound`].
const LEXICON: &[(&str, f64)] = &[
    // Bullish signals
    ("rally", 1.8),
    ("rallies", 1.8),
    ("rallied", 1.8),
    ("surge", 2.0),
    ("surges", 2.0),
    ("surged", 2.0),
    ("soar", 2.2),
    ("soars", 2.2),
    ("soared", 2.2),
    ("gain", 1.5),
    ("gains", 1.5),
    ("gained", 1.5),
    ("jump", 1.3),
    ("jumps", 1.3),
    ("jumped", 1.3),
    ("rise", 1.2),
    ("rises", 1.2),
    ("rose", 1.2),
    ("climb", 1.2),
    ("climbs", 1.2),
    ("climbed", 1.2),
    ("rebound", 1.4),
    ("rebounds", 1.4),
    ("recovery", 1.5),
    ("record", 1.2),
    ("high", 0.9),
    ("highs", 0.9),
    ("strong", 1.6),
    ("strength", 1.4),
    ("growth", 1.5),
    ("profit", 1.6),
    ("profits", 1.6),
    ("beat", 1.4),
    ("beats", 1.4),
    ("bullish", 2.4),
    ("boom", 1.9),
    ("upgrade", 1.5),
    ("upgraded", 1.5),
    ("outperform", 1.7),
    ("optimism", 1.7),
    ("optimistic", 1.6),
    ("positive", 1.5),
    ("demand", 1.0),
    ("breakthrough", 1.6),
    ("milestone", 1.2),
    ("win", 1.5),
    ("wins", 1.5),
    ("safe", 0.9),
    // Bearish signals
    ("crash", -2.8),
    ("crashes", -2.8),
    ("crashed", -2.8),
    ("plunge", -2.4),
    ("plunges", -2.4),
    ("plunged", -2.4),
    ("slump", -2.0),
    ("slumps", -2.0),
    ("tumble", -1.9),
    ("tumbles", -1.9),
    ("tumbled", -1.9),
    ("fall", -1.4),
    ("falls", -1.4),
    ("fell", -1.4),
    ("drop", -1.4),
    ("drops", -1.4),
    ("dropped", -1.4),
    ("decline", -1.5),
    ("declines", -1.5),
    ("declined", -1.5),
    ("slide", -1.4),
    ("slides", -1.4),
    ("loss", -1.7),
    ("losses", -1.7),
    ("weak", -1.5),
    ("weakness", -1.4),
    ("bearish", -2.4),
    ("fear", -1.8),
    ("fears", -1.8),
    ("concern", -1.2),
    ("concerns", -1.2),
    ("risk", -1.0),
    ("risks", -1.0),
    ("warning", -1.4),
    ("warns", -1.3),
    ("downgrade", -1.6),
    ("downgraded", -1.6),
    ("selloff", -1.9),
    ("recession", -2.2),
    ("crisis", -2.3),
    ("default", -1.9),
    ("fraud", -2.5),
    ("lawsuit", -1.6),
    ("bankruptcy", -2.7),
    ("miss", -1.3),
    ("misses", -1.3),
    ("missed", -1.3),
    ("cut", -1.1),
    ("cuts", -1.1),
    ("negative", -1.5),
    ("volatile", -1.2),
    ("volatility", -1.1),
    ("uncertainty", -1.4),
    ("slowdown", -1.6),
];

/// Score a headline and derive its label from the fixed thresholds.
///
/// Deterministic and pure: the only state is the fixed lexicon. Any
/// string is accepted; empty or unknown text scores 0.0, Neutral.
#[must_use]
pub fn score_headline(text: &str) -> HeadlineSentiment {
    HeadlineSentiment::from_score(compound_score(text))
}

/// Raw valence sum over matched words, with single-token negation
/// ("not strong" counts against strength), normalized to [-1, 1].
#[must_use]
pub fn compound_score(text: &str) -> f64 {
    let mut sum = 0.0_f64;
    let mut previous_negates = false;

    for word in text.split_whitespace() {
        let token = word
            .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
            .to_lowercase();
        if token.is_empty() {
            continue;
        }

        if let Some(&(_, valence)) = LEXICON.iter().find(|(w, _)| *w == token) {
            sum += if previous_negates {
                valence * NEGATION_SCALAR
            } else {
                valence
            };
        }

        previous_negates = NEGATORS.contains(&token.as_str());
    }

    compound(sum)
}

/// Normalize a raw valence sum into (-1, 1), clamped for safety.
fn compound(sum: f64) -> f64 {
    if sum == 0.0 {
        return 0.0;
    }
    (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0)
}
