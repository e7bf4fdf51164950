// Analysis labels and the per-message analysis record

use serde::{Deserialize, Serialize};
use std::fmt;

/// Emotion label attached to a user message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Sadness,
    Joy,
    Love,
    Anger,
    Fear,
    Surprise,
    /// Synthetic label used when the crisis gate fires
    Crisis,
}

impl Emotion {
    /// Output order of the six-way emotion model
    pub const MODEL_LABELS: [Emotion; 6] = [
        Emotion::Sadness,
        Emotion::Joy,
        Emotion::Love,
        Emotion::Anger,
        Emotion::Fear,
        Emotion::Surprise,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Sadness => "sadness",
            Emotion::Joy => "joy",
            Emotion::Love => "love",
            Emotion::Anger => "anger",
            Emotion::Fear => "fear",
            Emotion::Surprise => "surprise",
            Emotion::Crisis => "crisis",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "sadness" => Some(Emotion::Sadness),
            "joy" => Some(Emotion::Joy),
            "love" => Some(Emotion::Love),
            "anger" => Some(Emotion::Anger),
            "fear" => Some(Emotion::Fear),
            "surprise" => Some(Emotion::Surprise),
            "crisis" => Some(Emotion::Crisis),
            _ => None,
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Crisis,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Crisis => "crisis",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Farewell,
    Gratitude,
    SeekingHelp,
    SharingFeelings,
    General,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Farewell => "farewell",
            Intent::Gratitude => "gratitude",
            Intent::SeekingHelp => "seeking_help",
            Intent::SharingFeelings => "sharing_feelings",
            Intent::General => "general",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of analyzing one user message
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub emotion: Emotion,
    /// Probability in [0, 1]
    pub confidence: f64,
    pub sentiment: Sentiment,
    pub intent: Intent,
}

impl Analysis {
    /// Fixed analysis substituted when the crisis gate fires
    pub fn crisis() -> Self {
        Self {
            emotion: Emotion::Crisis,
            confidence: 1.0,
            sentiment: Sentiment::Crisis,
            intent: Intent::SeekingHelp,
        }
    }

    pub fn is_crisis(&self) -> bool {
        self.emotion == Emotion::Crisis
    }
}

/// Round a confidence to two decimals for reporting
pub fn round_confidence(confidence: f64) -> f64 {
    (confidence.clamp(0.0, 1.0) * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_serialize_snake_case() {
        let analysis = Analysis {
            emotion: Emotion::Fear,
            confidence: 0.7,
            sentiment: Sentiment::Negative,
            intent: Intent::SeekingHelp,
        };
        let json = serde_json::to_value(analysis).unwrap();
        assert_eq!(json["emotion"], "fear");
        assert_eq!(json["sentiment"], "negative");
        assert_eq!(json["intent"], "seeking_help");
    }

    #[test]
    fn test_from_label() {
        assert_eq!(Emotion::from_label("Joy"), Some(Emotion::Joy));
        assert_eq!(Emotion::from_label(" surprise "), Some(Emotion::Surprise));
        assert_eq!(Emotion::from_label("boredom"), None);
    }

    #[test]
    fn test_crisis_analysis() {
        let analysis = Analysis::crisis();
        assert!(analysis.is_crisis());
        assert_eq!(analysis.confidence, 1.0);
        assert_eq!(analysis.sentiment, Sentiment::Crisis);
        assert_eq!(analysis.intent, Intent::SeekingHelp);
    }

    #[test]
    fn test_round_confidence() {
        assert_eq!(round_confidence(0.98765), 0.99);
        assert_eq!(round_confidence(0.5), 0.5);
        assert_eq!(round_confidence(1.7), 1.0);
    }
}
