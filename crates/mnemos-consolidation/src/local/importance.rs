use std::sync::LazyLock;

use regex::Regex;

use mnemos_core::errors::MnemosResult;
use mnemos_core::traits::IImportanceScorer;

use crate::algorithms::tfidf::tokenize;

const BASE_SCORE: f64 = 0.25;

macro_rules! signal {
    ($name:ident, $regex:expr) => {
        static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex).ok());
    };
}

signal!(
    DECISION,
    r"(?i)\b(decided|decision|agreed|approved|chose|committed|must|deadline|due|owns?)\b"
);
signal!(
    PREFERENCE,
    r"(?i)\b(prefers?|likes?|dislikes?|hates?|loves?|favou?rite|allergic|wants?)\b"
);
signal!(
    EMPHASIS,
    r"(?i)\b(important|remember|never|always|critical|urgent|password|key)\b"
);
signal!(
    DATE,
    r"(?i)\b(\d{4}-\d{2}-\d{2}|jan(uary)?|feb(ruary)?|mar(ch)?|apr(il)?|may|june?|july?|aug(ust)?|sep(tember)?|oct(ober)?|nov(ember)?|dec(ember)?|monday|tuesday|wednesday|thursday|friday|saturday|sunday|tomorrow)\b"
);
signal!(DETAIL, r"\b\d+\b|[\w.+-]+@[\w-]+\.[\w.]+|https?://\S+");
signal!(
    SMALL_TALK,
    r"(?i)^\s*(ok(ay)?|thanks?( you)?|thx|lol|hi|hello|hey|sure|cool|nice|great)[\s.!]*$"
);

/// (signal, weight) pairs summed on top of the base score.
static SIGNALS: [(&LazyLock<Option<Regex>>, f64); 5] = [
    (&DECISION, 0.2),
    (&PREFERENCE, 0.15),
    (&EMPHASIS, 0.2),
    (&DATE, 0.1),
    (&DETAIL, 0.05),
];

/// Keyword and length heuristics. Deterministic, offline, always in [0, 1].
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicImportanceScorer;

impl HeuristicImportanceScorer {
    fn matches(signal: &LazyLock<Option<Regex>>, text: &str) -> bool {
        signal.as_ref().is_some_and(|re| re.is_match(text))
    }
}

impl IImportanceScorer for HeuristicImportanceScorer {
    fn score(&self, text: &str, context: Option<&str>) -> MnemosResult<f64> {
        if Self::matches(&SMALL_TALK, text) {
            return Ok(0.05);
        }

        let mut score = BASE_SCORE;
        for (signal, weight) in &SIGNALS {
            if Self::matches(signal, text) {
                score += weight;
            }
        }

        let words = text.split_whitespace().count();
        if words >= 8 {
            score += 0.05;
        }
        if words >= 20 {
            score += 0.05;
        }

        if let Some(context) = context {
            let ctx = tokenize(context);
            if tokenize(text).iter().any(|t| ctx.contains(t)) {
                score += 0.05;
            }
        }

        Ok(score.clamp(0.0, 1.0))
    }
}
