// Error types and user-friendly error messages
//
// Typed errors for the analysis pipeline, plus helpers that turn startup
// failures into actionable messages for the operator.

use std::time::Duration;
use thiserror::Error;

/// Failure of the model-backed emotion classifier.
///
/// None of these ever reach an HTTP caller: the classifier front routes every
/// variant to the keyword fallback.
#[derive(Debug, Clone, Error)]
pub enum ClassifierError {
    /// Model could not be initialized; fallback is used for the process lifetime
    #[error("emotion model unavailable: {0}")]
    Unavailable(String),

    /// A single inference call failed; the model is retried on the next call
    #[error("emotion model inference failed: {0}")]
    Inference(String),

    /// A single inference call exceeded its time budget
    #[error("emotion model inference timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors surfaced by the pipeline to its caller.
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    /// Rejected before the pipeline runs; nothing is written to memory
    #[error("{0}")]
    InvalidInput(String),

    /// Response assembly failed; nothing is written to memory
    #[error("internal error: {0}")]
    Internal(String),
}

impl PipelineError {
    pub fn empty_message() -> Self {
        PipelineError::InvalidInput("Message cannot be empty".to_string())
    }
}

/// Format a config parse error with helpful suggestions
pub fn config_parse_error(path: &str, error: &str) -> String {
    format!(
        "Failed to parse config file {}\n\n\
        \x1b[1;33mError:\x1b[0m {}\n\n\
        \x1b[1;32mTry:\x1b[0m\n\
        1. Check config file syntax:\n\
           \x1b[36mcat {}\x1b[0m\n\n\
        2. Move the file aside to run with defaults:\n\
           \x1b[36mmv {} {}.backup\x1b[0m\n\n\
        3. Common mistakes:\n\
           • Missing quotes around strings\n\
           • Unclosed brackets []\n\
           • Unknown section names",
        path, error, path, path, path
    )
}

/// Format a bind failure with helpful suggestions
pub fn bind_failed_error(address: &str, error: &str) -> String {
    format!(
        "Could not bind to {}\n\n\
        \x1b[1;33mError:\x1b[0m {}\n\n\
        \x1b[1;32mTry:\x1b[0m\n\
        1. Check whether another process holds the port:\n\
           \x1b[36mlsof -i :{}\x1b[0m\n\n\
        2. Pick another address:\n\
           \x1b[36msoulcare serve --bind 127.0.0.1:5050\x1b[0m",
        address,
        error,
        address.rsplit(':').next().unwrap_or(address)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_message_text() {
        let err = PipelineError::empty_message();
        assert_eq!(err.to_string(), "Message cannot be empty");
    }

    #[test]
    fn test_config_parse_error_mentions_path() {
        let msg = config_parse_error("/tmp/soulcare.toml", "expected `=`");
        assert!(msg.contains("/tmp/soulcare.toml"));
        assert!(msg.contains("expected `=`"));
    }

    #[test]
    fn test_bind_failed_error_extracts_port() {
        let msg = bind_failed_error("127.0.0.1:5000", "address in use");
        assert!(msg.contains("lsof -i :5000"));
    }
}
