// Configuration loader
// Loads ~/.soulcare/config.toml (or an explicit path), then applies environment overrides

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::settings::Config;
use crate::errors::config_parse_error;

/// Default config location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".soulcare").join("config.toml"))
}

/// Load configuration from the given file or the default location.
///
/// A missing default file yields built-in defaults; a missing explicit file
/// is an error.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => load_from_file(path)?,
        None => match default_config_path() {
            Some(path) if path.exists() => load_from_file(&path)?,
            _ => Config::default(),
        },
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

fn load_from_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config: Config = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!(config_parse_error(&path.display().to_string(), &e.to_string())))?;

    tracing::debug!(path = %path.display(), "Loaded configuration file");
    Ok(config)
}

/// Apply SOULCARE_* overrides read through `lookup`
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(bind) = lookup("SOULCARE_BIND_ADDRESS").filter(|v| !v.is_empty()) {
        config.server.bind_address = bind;
    }

    if let Some(dir) = lookup("SOULCARE_MODEL_DIR").filter(|v| !v.is_empty()) {
        config.model.model_dir = Some(PathBuf::from(dir));
    }

    if let Some(disabled) = lookup("SOULCARE_MODEL_DISABLED") {
        if matches!(disabled.to_lowercase().as_str(), "1" | "true" | "yes") {
            config.model.enabled = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.bind_address, "127.0.0.1:5000");
        assert!(config.model.enabled);
        assert_eq!(config.memory.max_sessions, 10_000);
        assert!(!config.features.debug_logging);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nbind_address = \"0.0.0.0:8080\"\n\n[memory]\nmax_sessions = 5"
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.memory.max_sessions, 5);
        assert_eq!(config.memory.session_ttl_minutes, 24 * 60);
        assert_eq!(config.model.max_length, 512);
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nbind_address = ").unwrap();

        let err = load_config(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("SOULCARE_BIND_ADDRESS", "0.0.0.0:9000"),
            ("SOULCARE_MODEL_DIR", "/opt/models/emotion"),
            ("SOULCARE_MODEL_DISABLED", "true"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        apply_env_overrides(&mut config, |key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.bind_address, "0.0.0.0:9000");
        assert_eq!(
            config.model.model_dir,
            Some(PathBuf::from("/opt/models/emotion"))
        );
        assert!(!config.model.enabled);
    }

    #[test]
    fn test_inference_timeout_zero_disables() {
        let mut config = Config::default();
        assert!(config.model.inference_timeout().is_some());
        config.model.inference_timeout_ms = 0;
        assert!(config.model.inference_timeout().is_none());
    }
}
