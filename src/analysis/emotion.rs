// Emotion classification: model-backed with keyword fallback
//
// The pipeline only talks to `EmotionClassifier`. It owns an optional
// `EmotionModel` and a `KeywordEmotionClassifier`, and turns every model
// failure into a fallback prediction.

use std::sync::Arc;
use std::time::Duration;

use super::types::Emotion;
use crate::errors::ClassifierError;
use crate::models::{EmotionModel, ModelStatus};

/// Confidence reported for any keyword hit
pub const KEYWORD_CONFIDENCE: f64 = 0.7;
/// Confidence reported when no keyword bucket matched
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Buckets in priority order: the first bucket with a hit wins
const EMOTION_KEYWORDS: &[(Emotion, &[&str])] = &[
    (
        Emotion::Sadness,
        &["sad", "depressed", "down", "unhappy", "miserable", "crying"],
    ),
    (
        Emotion::Joy,
        &["happy", "excited", "great", "awesome", "amazing", "wonderful"],
    ),
    (
        Emotion::Anger,
        &["angry", "mad", "furious", "annoyed", "frustrated", "hate"],
    ),
    (
        Emotion::Fear,
        &["scared", "afraid", "anxious", "worried", "nervous", "panic"],
    ),
    (
        Emotion::Love,
        &["love", "care", "adore", "appreciate", "grateful", "thankful"],
    ),
    (
        Emotion::Surprise,
        &["wow", "omg", "shocked", "surprised", "unexpected"],
    ),
];

/// Where a prediction came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionSource {
    Model,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmotionPrediction {
    pub emotion: Emotion,
    pub confidence: f64,
    pub source: PredictionSource,
}

impl EmotionPrediction {
    pub fn from_model(emotion: Emotion, confidence: f64) -> Self {
        Self {
            emotion,
            confidence,
            source: PredictionSource::Model,
        }
    }
}

/// Deterministic keyword-based emotion detector
#[derive(Debug, Clone, Default)]
pub struct KeywordEmotionClassifier;

impl KeywordEmotionClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn predict(&self, text: &str) -> EmotionPrediction {
        let lower = text.to_lowercase();

        let hit = EMOTION_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)));

        match hit {
            Some((emotion, _)) => EmotionPrediction {
                emotion: *emotion,
                confidence: KEYWORD_CONFIDENCE,
                source: PredictionSource::Fallback,
            },
            None => EmotionPrediction {
                emotion: Emotion::Sadness,
                confidence: DEFAULT_CONFIDENCE,
                source: PredictionSource::Fallback,
            },
        }
    }
}

enum ModelSlot {
    Ready(Arc<dyn EmotionModel>),
    /// Initialization failed or the model is disabled; never retried
    Unavailable(String),
}

/// Emotion classifier front used by the pipeline
pub struct EmotionClassifier {
    model: ModelSlot,
    fallback: KeywordEmotionClassifier,
    inference_timeout: Option<Duration>,
}

impl EmotionClassifier {
    /// Classifier that only ever uses keyword buckets
    pub fn keyword_only(reason: impl Into<String>) -> Self {
        Self {
            model: ModelSlot::Unavailable(reason.into()),
            fallback: KeywordEmotionClassifier::new(),
            inference_timeout: None,
        }
    }

    pub fn with_model(model: Arc<dyn EmotionModel>, inference_timeout: Option<Duration>) -> Self {
        Self {
            model: ModelSlot::Ready(model),
            fallback: KeywordEmotionClassifier::new(),
            inference_timeout,
        }
    }

    /// Build from the outcome of model initialization.
    ///
    /// A failed load is logged here, once, and the model is not attempted
    /// again for the lifetime of this classifier.
    pub fn from_load_result(
        loaded: Result<Arc<dyn EmotionModel>, ClassifierError>,
        inference_timeout: Option<Duration>,
    ) -> Self {
        match loaded {
            Ok(model) => {
                tracing::info!(model = %model.name(), "Emotion model loaded");
                Self::with_model(model, inference_timeout)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not load emotion model, using keyword detection");
                Self::keyword_only(e.to_string())
            }
        }
    }

    pub fn model_loaded(&self) -> bool {
        matches!(self.model, ModelSlot::Ready(_))
    }

    pub fn model_status(&self) -> ModelStatus {
        match &self.model {
            ModelSlot::Ready(model) => ModelStatus::Ready {
                model_name: model.name().to_string(),
            },
            ModelSlot::Unavailable(reason) => ModelStatus::Unavailable {
                reason: reason.clone(),
            },
        }
    }

    /// Run the model only, with the configured time budget
    pub async fn try_model(&self, text: &str) -> Result<EmotionPrediction, ClassifierError> {
        let model = match &self.model {
            ModelSlot::Ready(model) => model,
            ModelSlot::Unavailable(reason) => {
                return Err(ClassifierError::Unavailable(reason.clone()))
            }
        };

        let prediction = match self.inference_timeout {
            Some(budget) => tokio::time::timeout(budget, model.predict(text))
                .await
                .map_err(|_| ClassifierError::Timeout(budget))??,
            None => model.predict(text).await?,
        };

        if !(0.0..=1.0).contains(&prediction.confidence) || prediction.emotion == Emotion::Crisis
        {
            return Err(ClassifierError::Inference(format!(
                "model returned out-of-contract prediction {} ({})",
                prediction.emotion, prediction.confidence
            )));
        }

        Ok(prediction)
    }

    /// Predict an emotion; never fails
    pub async fn predict(&self, text: &str) -> EmotionPrediction {
        match self.try_model(text).await {
            Ok(prediction) => prediction,
            // Already reported when the load failed
            Err(ClassifierError::Unavailable(_)) => self.fallback.predict(text),
            Err(e) => {
                tracing::warn!(error = %e, "Emotion model failed, using keyword detection for this message");
                self.fallback.predict(text)
            }
        }
    }
}
