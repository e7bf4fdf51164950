// ONNX Runtime emotion model
//
// Sequence-classification export of a DistilBERT emotion model:
// `model.onnx` taking `input_ids` + `attention_mask` and producing
// `logits` of shape [1, 6] in `Emotion::MODEL_LABELS` order.

use async_trait::async_trait;
use hf_hub::{api::sync::Api, Repo, RepoType};
use ort::{
    session::{builder::GraphOptimizationLevel, Session},
    value::Value,
};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

use crate::analysis::{Emotion, EmotionPrediction};
use crate::config::ModelConfig;
use crate::errors::ClassifierError;

fn unavailable(e: impl Display) -> ClassifierError {
    ClassifierError::Unavailable(e.to_string())
}

fn inference(e: impl Display) -> ClassifierError {
    ClassifierError::Inference(e.to_string())
}

/// Loaded ONNX emotion model with tokenizer
pub struct OnnxEmotionModel {
    // ort sessions need exclusive access to run
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    model_name: String,
}

impl OnnxEmotionModel {
    /// Load from `model_dir` if set, otherwise from the Hugging Face Hub
    pub fn load(config: &ModelConfig) -> Result<Self, ClassifierError> {
        let (model_path, tokenizer_path, model_name) = match &config.model_dir {
            Some(dir) => {
                let (model_path, tokenizer_path) = Self::local_files(dir, &config.onnx_file)?;
                (model_path, tokenizer_path, dir.display().to_string())
            }
            None => {
                let (model_path, tokenizer_path) =
                    Self::download_files(&config.hf_repo, &config.onnx_file)?;
                (model_path, tokenizer_path, config.hf_repo.clone())
            }
        };

        let tokenizer = Self::load_tokenizer(&tokenizer_path, config.max_length)?;
        let session = Self::create_session(&model_path, config.intra_threads)?;

        info!(model = %model_name, "ONNX emotion model ready");

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            model_name,
        })
    }

    fn local_files(dir: &Path, onnx_file: &str) -> Result<(PathBuf, PathBuf), ClassifierError> {
        let tokenizer_path = dir.join("tokenizer.json");
        if !tokenizer_path.exists() {
            return Err(ClassifierError::Unavailable(format!(
                "tokenizer.json not found in {}",
                dir.display()
            )));
        }

        // Exports keep the graph either at the root or under onnx/
        let candidates = [dir.join(onnx_file), dir.join("model.onnx")];
        let model_path = candidates
            .into_iter()
            .find(|p| p.exists())
            .ok_or_else(|| {
                ClassifierError::Unavailable(format!(
                    "{} not found in {}",
                    onnx_file,
                    dir.display()
                ))
            })?;

        Ok((model_path, tokenizer_path))
    }

    fn download_files(repo_id: &str, onnx_file: &str) -> Result<(PathBuf, PathBuf), ClassifierError> {
        info!(repo = %repo_id, "Fetching emotion model from HuggingFace");

        let api = Api::new().map_err(unavailable)?;
        let repo = api.repo(Repo::new(repo_id.to_string(), RepoType::Model));

        let tokenizer_path = repo.get("tokenizer.json").map_err(unavailable)?;
        let model_path = repo.get(onnx_file).map_err(unavailable)?;

        Ok((model_path, tokenizer_path))
    }

    fn load_tokenizer(path: &Path, max_length: usize) -> Result<Tokenizer, ClassifierError> {
        let mut tokenizer = Tokenizer::from_file(path).map_err(|e| {
            ClassifierError::Unavailable(format!(
                "Failed to load tokenizer from {:?}: {}",
                path, e
            ))
        })?;

        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(unavailable)?;

        debug!("Tokenizer loaded successfully");
        Ok(tokenizer)
    }

    fn create_session(model_path: &Path, intra_threads: usize) -> Result<Session, ClassifierError> {
        info!("Creating ONNX session from: {:?}", model_path);

        let builder = Session::builder().map_err(unavailable)?;
        let builder = builder
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(unavailable)?;
        let mut builder = builder
            .with_intra_threads(intra_threads.max(1))
            .map_err(unavailable)?;

        builder.commit_from_file(model_path).map_err(unavailable)
    }

    /// Tokenize, run the graph and softmax the logits (blocking)
    fn classify_blocking(
        session: &Mutex<Session>,
        tokenizer: &Tokenizer,
        text: &str,
    ) -> Result<EmotionPrediction, ClassifierError> {
        let encoding = tokenizer.encode(text, true).map_err(inference)?;

        let ids: Vec<i64> = encoding.get_ids().iter().map(|&t| t as i64).collect();
        let mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        let seq_len = ids.len();

        let input_ids = Value::from_array(
            ndarray::Array2::from_shape_vec((1, seq_len), ids).map_err(inference)?,
        )
        .map_err(inference)?;
        let attention_mask = Value::from_array(
            ndarray::Array2::from_shape_vec((1, seq_len), mask).map_err(inference)?,
        )
        .map_err(inference)?;

        let mut session = lock_session(session);

        let outputs = session
            .run(ort::inputs![
                "input_ids" => input_ids,
                "attention_mask" => attention_mask
            ])
            .map_err(inference)?;

        let output_tensor = outputs
            .get("logits")
            .or_else(|| outputs.get("output"))
            .ok_or_else(|| ClassifierError::Inference("no logits output".to_string()))?;

        let (shape, data) = output_tensor
            .try_extract_tensor::<f32>()
            .map_err(inference)?;

        let labels = Emotion::MODEL_LABELS.len();
        if data.len() < labels {
            return Err(ClassifierError::Inference(format!(
                "expected {} logits, got shape {:?}",
                labels, shape
            )));
        }

        let probs = softmax(&data[..labels]);
        let (label_id, confidence) = argmax(&probs)
            .ok_or_else(|| ClassifierError::Inference("empty logits".to_string()))?;

        Ok(EmotionPrediction::from_model(
            Emotion::MODEL_LABELS[label_id],
            confidence,
        ))
    }
}

#[async_trait]
impl crate::models::EmotionModel for OnnxEmotionModel {
    async fn predict(&self, text: &str) -> Result<EmotionPrediction, ClassifierError> {
        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let text = text.to_string();

        tokio::task::spawn_blocking(move || Self::classify_blocking(&session, &tokenizer, &text))
            .await
            .map_err(inference)?
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}

/// Lock the session, recovering it if a previous holder panicked
fn lock_session<T>(session: &Mutex<T>) -> MutexGuard<'_, T> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

fn softmax(logits: &[f32]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max) as f64;
    let exps: Vec<f64> = logits.iter().map(|&l| (l as f64 - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

fn argmax(probs: &[f64]) -> Option<(usize, f64)> {
    probs
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (idx, p)| match best {
            Some((_, top)) if top >= p => best,
            _ => Some((idx, p)),
        })
}
