// Configuration structs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub memory: MemoryConfig,
    pub features: FeaturesConfig,
}

/// Configuration for the HTTP server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:5000")
    pub bind_address: String,
    /// Origins allowed by CORS; empty allows any origin
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5000".to_string(),
            allowed_origins: vec![],
        }
    }
}

/// Emotion model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Set false to run on keyword detection only
    pub enabled: bool,
    /// Local directory holding the ONNX graph and tokenizer.json
    pub model_dir: Option<PathBuf>,
    /// Hub repository used when `model_dir` is not set
    pub hf_repo: String,
    /// Graph path relative to the model directory / repository
    pub onnx_file: String,
    /// Tokens kept per message
    pub max_length: usize,
    /// Per-message inference budget; 0 disables the limit
    pub inference_timeout_ms: u64,
    pub intra_threads: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model_dir: None,
            hf_repo: "bhadresh-savani/distilbert-base-uncased-emotion".to_string(),
            onnx_file: "onnx/model.onnx".to_string(),
            max_length: 512,
            inference_timeout_ms: 5_000,
            intra_threads: 2,
        }
    }
}

impl ModelConfig {
    pub fn inference_timeout(&self) -> Option<Duration> {
        (self.inference_timeout_ms > 0).then(|| Duration::from_millis(self.inference_timeout_ms))
    }
}

/// Conversation memory bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Soft cap; the least recently active session is evicted past it
    pub max_sessions: usize,
    /// Sessions idle this long are swept
    pub session_ttl_minutes: u64,
    pub cleanup_interval_secs: u64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_sessions: 10_000,
            session_ttl_minutes: 24 * 60,
            cleanup_interval_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    /// Raise the default log level to debug
    pub debug_logging: bool,
    /// JSON file replacing the built-in crisis phrases
    pub crisis_keywords_path: Option<PathBuf>,
}
