// Message analysis
//
// Emotion, sentiment and intent classifiers. Each is independent of the
// others and holds no mutable state, so they may run in any order once the
// crisis gate has passed.

mod emotion;
mod intent;
mod sentiment;
mod types;

pub use emotion::{
    EmotionClassifier, EmotionPrediction, KeywordEmotionClassifier, PredictionSource,
    DEFAULT_CONFIDENCE, KEYWORD_CONFIDENCE,
};
pub use intent::IntentClassifier;
pub use sentiment::{SentimentScore, SentimentScorer};
pub use types::{round_confidence, Analysis, Emotion, Intent, Sentiment};
