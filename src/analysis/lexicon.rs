//! Valence lexicon for the sentiment scorer.
//!
//! Ratings follow the usual human-rated scale from -4 (extremely negative)
//! to +4 (extremely positive). The word list covers general English plus the
//! vocabulary that dominates writing about attention, planning and time.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Added to (or subtracted from) a sentiment word's valence by a booster.
pub const BOOSTER_INCREMENT: f64 = 0.293;
/// Multiplier applied to a valence preceded by a negation.
pub const NEGATION_SCALAR: f64 = -0.74;
/// Normalization constant for the compound score.
pub const NORMALIZATION_ALPHA: f64 = 15.0;

const VALENCES: &[(&str, f64)] = &[
    ("able", 0.9),
    ("abuse", -3.2),
    ("accept", 1.6),
    ("accomplish", 1.8),
    ("accomplished", 1.9),
    ("achieve", 1.8),
    ("achievement", 2.1),
    ("afraid", -2.2),
    ("agree", 1.5),
    ("alone", -1.0),
    ("amazing", 2.8),
    ("anger", -2.7),
    ("angry", -2.3),
    ("annoyed", -1.6),
    ("annoying", -1.8),
    ("anxiety", -0.7),
    ("anxious", -1.0),
    ("appreciate", 1.7),
    ("ashamed", -2.1),
    ("awesome", 3.1),
    ("awful", -2.0),
    ("bad", -2.5),
    ("beautiful", 2.9),
    ("benefit", 2.0),
    ("benefits", 1.6),
    ("best", 3.2),
    ("better", 1.9),
    ("blame", -1.4),
    ("bored", -1.1),
    ("boring", -1.3),
    ("brilliant", 2.8),
    ("burden", -1.9),
    ("calm", 1.3),
    ("care", 2.2),
    ("chaos", -2.2),
    ("chaotic", -1.8),
    ("cheerful", 2.5),
    ("clear", 1.6),
    ("comfortable", 1.5),
    ("confident", 2.2),
    ("confused", -1.3),
    ("confusion", -1.2),
    ("conflict", -1.3),
    ("crisis", -3.1),
    ("critical", -1.3),
    ("criticism", -1.9),
    ("cry", -2.1),
    ("damage", -2.2),
    ("danger", -2.4),
    ("dangerous", -2.1),
    ("delay", -1.3),
    ("delayed", -0.9),
    ("depressed", -2.3),
    ("depression", -2.7),
    ("despair", -2.8),
    ("difficult", -1.5),
    ("difficulty", -1.4),
    ("disappointed", -1.9),
    ("disappointment", -2.3),
    ("disaster", -3.1),
    ("distracted", -1.4),
    ("distraction", -1.1),
    ("easier", 1.8),
    ("easy", 1.9),
    ("effective", 2.1),
    ("efficient", 1.8),
    ("embarrassed", -1.5),
    ("embarrassing", -1.6),
    ("encourage", 2.3),
    ("encouraging", 2.4),
    ("energy", 1.1),
    ("enjoy", 2.2),
    ("enough", 0.6),
    ("error", -1.7),
    ("excellent", 2.7),
    ("excited", 1.4),
    ("exciting", 2.2),
    ("exhausted", -1.5),
    ("fail", -2.5),
    ("failed", -2.3),
    ("failure", -2.3),
    ("fair", 1.3),
    ("fantastic", 2.6),
    ("fear", -2.2),
    ("fine", 0.8),
    ("focus", 1.1),
    ("focused", 1.6),
    ("forget", -0.9),
    ("forgetful", -1.3),
    ("forgot", -0.9),
    ("free", 2.3),
    ("freedom", 3.2),
    ("friendly", 2.2),
    ("frustrated", -2.4),
    ("frustrating", -1.9),
    ("frustration", -2.1),
    ("fun", 2.3),
    ("glad", 2.0),
    ("good", 1.9),
    ("great", 3.1),
    ("guilt", -1.1),
    ("guilty", -1.8),
    ("happy", 2.7),
    ("hard", -0.4),
    ("harm", -2.5),
    ("hate", -2.7),
    ("healthy", 1.7),
    ("help", 1.7),
    ("helped", 1.6),
    ("helpful", 1.8),
    ("helping", 1.2),
    ("helps", 1.6),
    ("hope", 1.9),
    ("hopeful", 2.3),
    ("hopeless", -2.0),
    ("hurt", -2.4),
    ("ideal", 2.4),
    ("important", 0.8),
    ("impossible", -1.3),
    ("improve", 1.9),
    ("improved", 2.1),
    ("improvement", 2.0),
    ("inspire", 2.7),
    ("interest", 2.0),
    ("interesting", 1.7),
    ("irritable", -2.1),
    ("joy", 2.8),
    ("kind", 2.4),
    ("lack", -1.3),
    ("lazy", -1.5),
    ("like", 1.5),
    ("lose", -1.6),
    ("losing", -1.6),
    ("loss", -1.3),
    ("lost", -1.3),
    ("love", 3.2),
    ("lucky", 1.8),
    ("mess", -1.5),
    ("messy", -1.5),
    ("miss", -0.6),
    ("missed", -1.2),
    ("mistake", -1.4),
    ("mistakes", -1.5),
    ("motivated", 1.8),
    ("motivation", 1.4),
    ("nervous", -1.1),
    ("nice", 1.8),
    ("overwhelm", -1.6),
    ("overwhelmed", -1.6),
    ("overwhelming", -1.1),
    ("pain", -2.3),
    ("panic", -2.3),
    ("peace", 2.5),
    ("perfect", 2.7),
    ("pleasant", 2.3),
    ("pleased", 1.9),
    ("poor", -2.1),
    ("positive", 2.3),
    ("praise", 2.6),
    ("pressure", -1.2),
    ("pride", 1.4),
    ("problem", -1.7),
    ("problems", -1.7),
    ("procrastinate", -1.2),
    ("procrastination", -1.3),
    ("productive", 1.9),
    ("progress", 1.8),
    ("proud", 2.1),
    ("punish", -2.4),
    ("reassure", 1.5),
    ("regret", -1.8),
    ("reject", -1.7),
    ("rejection", -2.5),
    ("relax", 1.9),
    ("relaxed", 2.2),
    ("relief", 2.1),
    ("reward", 2.0),
    ("rewarding", 2.4),
    ("rewards", 1.9),
    ("risk", -1.1),
    ("sad", -2.1),
    ("safe", 1.9),
    ("satisfied", 1.8),
    ("scared", -1.9),
    ("shame", -2.1),
    ("simple", 0.5),
    ("smart", 1.7),
    ("sorry", -0.3),
    ("strength", 2.2),
    ("strengths", 1.9),
    ("stress", -1.8),
    ("stressed", -1.4),
    ("stressful", -2.3),
    ("strong", 2.3),
    ("struggle", -1.3),
    ("struggles", -1.5),
    ("struggling", -1.6),
    ("stuck", -1.0),
    ("succeed", 2.2),
    ("success", 2.7),
    ("successful", 2.8),
    ("suffer", -2.1),
    ("support", 1.7),
    ("supportive", 1.2),
    ("terrible", -2.1),
    ("thank", 1.5),
    ("thanks", 1.9),
    ("tired", -1.9),
    ("trouble", -1.7),
    ("trust", 2.3),
    ("ugly", -2.3),
    ("unable", -1.2),
    ("unhappy", -1.8),
    ("upset", -1.6),
    ("useful", 1.9),
    ("valuable", 2.1),
    ("waste", -1.8),
    ("wasted", -2.2),
    ("wasting", -1.7),
    ("weak", -1.9),
    ("welcome", 2.0),
    ("win", 2.8),
    ("wonderful", 2.7),
    ("worried", -1.2),
    ("worry", -1.9),
    ("worse", -2.1),
    ("worst", -3.1),
    ("worthless", -1.9),
    ("wrong", -2.1),
];

/// Words that intensify the following sentiment word.
const BOOSTERS: &[&str] = &[
    "absolutely", "completely", "deeply", "enormously", "especially", "extremely",
    "highly", "hugely", "incredibly", "most", "particularly", "purely", "quite",
    "really", "remarkably", "so", "substantially", "thoroughly", "totally",
    "tremendously", "truly", "utterly", "very",
];

/// Words that soften the following sentiment word.
const DAMPENERS: &[&str] = &[
    "almost", "barely", "hardly", "less", "little", "marginally", "occasionally",
    "partly", "scarcely", "slightly", "somewhat",
];

/// Stand-alone negations.
const NEGATIONS: &[&str] = &[
    "aint", "cannot", "dont", "doesnt", "didnt", "isnt", "neither", "never", "no", "nobody",
    "none", "nope", "nor", "not", "nothing", "nowhere", "rarely", "seldom", "without",
    "wont",
];

/// Stems left behind when "n't" contractions lose their apostrophe
/// ("don't" cleans to "don t").
const CONTRACTION_STEMS: &[&str] = &[
    "ain", "aren", "can", "couldn", "didn", "doesn", "don", "hadn", "hasn", "haven", "isn",
    "mightn", "mustn", "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn",
];

static VALENCE_MAP: Lazy<HashMap<&'static str, f64>> =
    Lazy::new(|| VALENCES.iter().copied().collect());
static BOOSTER_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| BOOSTERS.iter().copied().collect());
static DAMPENER_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| DAMPENERS.iter().copied().collect());
static NEGATION_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| NEGATIONS.iter().copied().collect());
static CONTRACTION_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| CONTRACTION_STEMS.iter().copied().collect());

/// Valence of `word`, if it carries sentiment.
pub fn valence(word: &str) -> Option<f64> {
    VALENCE_MAP.get(word).copied()
}

/// `+1` for boosters, `-1` for dampeners, `0` otherwise.
pub fn booster_direction(word: &str) -> f64 {
    if BOOSTER_SET.contains(word) {
        1.0
    } else if DAMPENER_SET.contains(word) {
        -1.0
    } else {
        0.0
    }
}

/// Whether `tokens[i]` negates what follows.
///
/// Besides plain negations this recognizes a lone `t` after a contraction
/// stem, which is what "can't" or "doesn't" look like after cleaning.
pub fn is_negation(tokens: &[&str], i: usize) -> bool {
    let token = tokens[i];
    if NEGATION_SET.contains(token) {
        return true;
    }
    token == "t" && i > 0 && CONTRACTION_SET.contains(tokens[i - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valences_in_range_and_unique() {
        let mut seen = HashSet::new();
        for (word, v) in VALENCES {
            assert!((-4.0..=4.0).contains(v), "{word} out of range");
            assert!(seen.insert(*word), "{word} listed twice");
        }
    }

    #[test]
    fn test_modifiers_do_not_carry_valence() {
        for word in BOOSTERS.iter().chain(DAMPENERS).chain(NEGATIONS) {
            assert!(valence(word).is_none(), "{word} has a valence");
        }
    }

    #[test]
    fn test_contraction_negation() {
        let tokens = ["it", "doesn", "t", "help"];
        assert!(is_negation(&tokens, 2));
        assert!(!is_negation(&tokens, 3));
        let bare = ["t", "help"];
        assert!(!is_negation(&bare, 0));
    }

    #[test]
    fn test_booster_direction() {
        assert_eq!(booster_direction("very"), 1.0);
        assert_eq!(booster_direction("slightly"), -1.0);
        assert_eq!(booster_direction("time"), 0.0);
    }
}
