// Crisis keyword detector

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Phrases that flag self-harm risk, checked in order.
///
/// Matching is plain substring on lower-cased text, so "die" also fires on
/// words like "diet". Over-reporting is accepted here.
pub const DEFAULT_CRISIS_PHRASES: &[&str] = &[
    "hurt myself",
    "kill myself",
    "end my life",
    "suicide",
    "don't want to live",
    "die",
    "self harm",
    "not worth living",
    "end it all",
    "give up on life",
    "better off dead",
];

/// On-disk keyword file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrisisKeywords {
    pub self_harm: Vec<String>,
}

impl Default for CrisisKeywords {
    fn default() -> Self {
        Self {
            self_harm: DEFAULT_CRISIS_PHRASES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CrisisDetector {
    keywords: CrisisKeywords,
}

impl CrisisDetector {
    pub fn new(keywords: CrisisKeywords) -> Self {
        // Stored lower-cased so detection only lowers the query
        let self_harm = keywords
            .self_harm
            .into_iter()
            .map(|k| k.to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self {
            keywords: CrisisKeywords { self_harm },
        }
    }

    /// Load crisis keywords from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read crisis keywords file: {}", path.display()))?;

        let keywords: CrisisKeywords =
            serde_json::from_str(&contents).context("Failed to parse crisis keywords file")?;

        if keywords.self_harm.is_empty() {
            anyhow::bail!("Crisis keywords file {} has no phrases", path.display());
        }

        Ok(Self::new(keywords))
    }

    /// Returns the first phrase found in the query, if any
    pub fn matched_phrase(&self, query: &str) -> Option<&str> {
        let query_lower = query.to_lowercase();
        self.keywords
            .self_harm
            .iter()
            .find(|keyword| query_lower.contains(keyword.as_str()))
            .map(|keyword| keyword.as_str())
    }

    /// Detect if query contains crisis keywords
    pub fn detect_crisis(&self, query: &str) -> bool {
        match self.matched_phrase(query) {
            Some(keyword) => {
                tracing::warn!(keyword = %keyword, "Crisis detected: self-harm keyword");
                true
            }
            None => false,
        }
    }

    /// Get all keywords (for display purposes)
    pub fn all_keywords(&self) -> &[String] {
        &self.keywords.self_harm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_crisis_detection() {
        let detector = CrisisDetector::default();

        assert!(detector.detect_crisis("I'm thinking about suicide"));
        assert!(detector.detect_crisis("I want to kill myself"));
        assert!(detector.detect_crisis("sometimes I feel like I'd be better off dead"));
        assert!(!detector.detect_crisis("What is the meaning of life?"));
        assert!(!detector.detect_crisis("I had a good morning"));
    }

    #[test]
    fn test_case_insensitive() {
        let detector = CrisisDetector::default();

        assert!(detector.detect_crisis("SUICIDE"));
        assert!(detector.detect_crisis("SuIcIdE"));
        assert!(detector.detect_crisis("I Want To End It All"));
    }

    #[test]
    fn test_substring_is_over_inclusive() {
        let detector = CrisisDetector::default();

        // "die" has no word-boundary requirement
        assert_eq!(detector.matched_phrase("starting a new diet"), Some("die"));
    }

    #[test]
    fn test_first_phrase_in_order_wins() {
        let detector = CrisisDetector::default();

        assert_eq!(
            detector.matched_phrase("i want to kill myself, suicide"),
            Some("kill myself")
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"self_harm": ["Hopeless Forever"]}}"#).unwrap();

        let detector = CrisisDetector::load_from_file(file.path()).unwrap();
        assert!(detector.detect_crisis("i feel hopeless forever"));
        assert!(!detector.detect_crisis("suicide"));
        assert_eq!(detector.all_keywords(), &["hopeless forever".to_string()]);
    }

    #[test]
    fn test_load_from_file_rejects_empty_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"self_harm": []}}"#).unwrap();

        assert!(CrisisDetector::load_from_file(file.path()).is_err());
    }
}
