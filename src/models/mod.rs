// Emotion model capability
//
// The pipeline depends only on `EmotionModel`. The ONNX Runtime
// implementation is compiled with the `onnx` feature; without it every load
// attempt reports the model as unavailable and the keyword fallback is used.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use crate::analysis::EmotionPrediction;
use crate::config::ModelConfig;
use crate::errors::ClassifierError;

#[cfg(feature = "onnx")]
mod onnx;

#[cfg(feature = "onnx")]
pub use onnx::OnnxEmotionModel;

/// External text -> (emotion, confidence) capability
#[async_trait]
pub trait EmotionModel: Send + Sync {
    /// Classify one message. May block on inference; callers bound it with a timeout.
    async fn predict(&self, text: &str) -> Result<EmotionPrediction, ClassifierError>;

    /// Model identifier for logs and health output
    fn name(&self) -> &str;
}

/// Model state reported by the health endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ModelStatus {
    Ready { model_name: String },
    Unavailable { reason: String },
}

/// Initialize the configured emotion model.
///
/// Blocking: may download model files and build an inference session.
pub fn load_emotion_model(config: &ModelConfig) -> Result<Arc<dyn EmotionModel>, ClassifierError> {
    if !config.enabled {
        return Err(ClassifierError::Unavailable(
            "emotion model disabled in configuration".to_string(),
        ));
    }

    #[cfg(feature = "onnx")]
    {
        let model = OnnxEmotionModel::load(config)?;
        Ok(Arc::new(model))
    }

    #[cfg(not(feature = "onnx"))]
    {
        Err(ClassifierError::Unavailable(
            "built without the `onnx` feature".to_string(),
        ))
    }
}
