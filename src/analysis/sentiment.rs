// Lexicon-overlap sentiment scorer

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use super::types::Sentiment;

const POSITIVE_WORDS: &[&str] = &[
    "happy", "joy", "excited", "great", "good", "wonderful", "amazing", "love", "excellent",
    "better", "proud",
];

const NEGATIVE_WORDS: &[&str] = &[
    "sad", "depressed", "anxious", "worried", "scared", "angry", "hurt", "pain", "terrible",
    "awful",
];

/// Scores strictly above this magnitude leave neutral
const POLARITY_THRESHOLD: f64 = 0.3;

static WORD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w+\b").expect("word pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentScore {
    pub sentiment: Sentiment,
    /// (pos - neg) / (pos + neg), in [-1, 1]
    pub score: f64,
}

#[derive(Debug, Clone)]
pub struct SentimentScorer {
    positive: HashSet<&'static str>,
    negative: HashSet<&'static str>,
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer {
    pub fn new() -> Self {
        Self {
            positive: POSITIVE_WORDS.iter().copied().collect(),
            negative: NEGATIVE_WORDS.iter().copied().collect(),
        }
    }

    pub fn analyze(&self, text: &str) -> SentimentScore {
        let lower = text.to_lowercase();
        let words: HashSet<&str> = WORD_PATTERN.find_iter(&lower).map(|m| m.as_str()).collect();

        let pos = words.iter().filter(|w| self.positive.contains(*w)).count();
        let neg = words.iter().filter(|w| self.negative.contains(*w)).count();

        let total = pos + neg;
        if total == 0 {
            return SentimentScore {
                sentiment: Sentiment::Neutral,
                score: 0.0,
            };
        }

        let score = (pos as f64 - neg as f64) / total as f64;
        let sentiment = if score > POLARITY_THRESHOLD {
            Sentiment::Positive
        } else if score < -POLARITY_THRESHOLD {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        };

        SentimentScore { sentiment, score }
    }
}
