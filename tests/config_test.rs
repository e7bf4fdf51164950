// Integration tests for building the pipeline from a config file

use soulcare::{config::load_config, models::ModelStatus, pipeline::WellnessPipeline};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

#[tokio::test]
async fn test_pipeline_from_config_file() {
    let dir = TempDir::new().unwrap();

    let keywords_path = dir.path().join("crisis.json");
    std::fs::write(&keywords_path, r#"{"self_harm": ["can't go on"]}"#).unwrap();

    let config_path = dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        format!(
            "[model]\nenabled = false\n\n[memory]\nmax_sessions = 2\n\n[features]\ncrisis_keywords_path = {:?}\n",
            keywords_path.display().to_string()
        ),
    )
    .unwrap();

    let config = load_config(Some(&config_path)).unwrap();
    assert!(!config.model.enabled);
    assert_eq!(config.memory.max_sessions, 2);

    let pipeline = WellnessPipeline::from_config(&config).await.unwrap();
    assert!(!pipeline.model_loaded());
    assert!(matches!(
        pipeline.model_status(),
        ModelStatus::Unavailable { .. }
    ));

    let reply = pipeline.submit_message("a", "I can't go on").await.unwrap();
    assert!(reply.crisis_detected);

    // Soft cap of two sessions
    pipeline.submit_message("b", "hello").await.unwrap();
    pipeline.submit_message("c", "hello").await.unwrap();
    assert!(pipeline.memory().active_count() <= 2);
    assert_eq!(pipeline.history("c", 10).len(), 2);
}

#[tokio::test]
async fn test_missing_keywords_file_fails_startup() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[model]\nenabled = false\n\n[features]\ncrisis_keywords_path = \"/nonexistent/crisis.json\""
    )
    .unwrap();

    let config = load_config(Some(file.path())).unwrap();
    assert!(WellnessPipeline::from_config(&config).await.is_err());
}

#[test]
fn test_missing_explicit_config_is_error() {
    let dir = TempDir::new().unwrap();
    assert!(load_config(Some(&dir.path().join("absent.toml"))).is_err());
}
