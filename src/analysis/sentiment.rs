//! Lexicon-based sentiment scoring.
//!
//! Each sentiment-bearing token contributes its valence from
//! [`lexicon`](super::lexicon), adjusted by:
//!
//! - **boosters/dampeners** up to three tokens back (decaying with distance)
//! - **negation** up to three tokens back (valence × −0.74)
//! - **contrast**: with a "but" present, valences before it are halved and
//!   valences after it weighted ×1.5
//!
//! The summed valence `s` is mapped into `[-1, 1]` with `s / sqrt(s² + 15)`,
//! the conventional compound normalization.

use super::lexicon::{
    BOOSTER_INCREMENT, NEGATION_SCALAR, NORMALIZATION_ALPHA, booster_direction, is_negation,
    valence,
};
use crate::text::clean_text;

/// How many preceding tokens boosters and negations reach.
const WINDOW: usize = 3;
const BOOSTER_DECAY: [f64; WINDOW] = [1.0, 0.95, 0.9];

/// Stateless compound-score sentiment analyzer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Compound polarity of `text` in `[-1, 1]`; `0.0` for text without
    /// sentiment-bearing words.
    pub fn compound(&self, text: &str) -> f64 {
        let cleaned = clean_text(text);
        let tokens: Vec<&str> = cleaned.split_whitespace().collect();
        if tokens.is_empty() {
            return 0.0;
        }

        let but_at = tokens.iter().position(|t| *t == "but");
        let mut sum = 0.0;

        for (i, token) in tokens.iter().enumerate() {
            let Some(mut v) = valence(token) else {
                continue;
            };

            for distance in 1..=WINDOW.min(i) {
                let direction = booster_direction(tokens[i - distance]);
                if direction != 0.0 {
                    // A booster pushes away from zero in the word's own direction.
                    let scalar = direction * BOOSTER_INCREMENT * v.signum();
                    v += scalar * BOOSTER_DECAY[distance - 1];
                }
            }

            if (1..=WINDOW.min(i)).any(|distance| is_negation(&tokens, i - distance)) {
                v *= NEGATION_SCALAR;
            }

            if let Some(b) = but_at {
                if i < b {
                    v *= 0.5;
                } else if i > b {
                    v *= 1.5;
                }
            }

            sum += v;
        }

        normalize(sum)
    }
}

fn normalize(score: f64) -> f64 {
    if score == 0.0 {
        return 0.0;
    }
    (score / (score * score + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

/// Compound sentiment of every text, in order.
pub fn compute_sentiment<S: AsRef<str>>(texts: &[S]) -> Vec<f64> {
    let analyzer = SentimentAnalyzer::new();
    texts.iter().map(|t| analyzer.compound(t.as_ref())).collect()
}
