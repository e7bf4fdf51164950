// Keyword-bucket intent classifier

use super::types::Intent;

/// Buckets in tie-break order: on equal scores the earlier bucket wins
const INTENT_KEYWORDS: &[(Intent, &[&str])] = &[
    (
        Intent::Greeting,
        &["hello", "hi", "hey", "good morning", "good evening", "sup", "yo"],
    ),
    (
        Intent::Farewell,
        &["bye", "goodbye", "see you", "take care", "gotta go", "later"],
    ),
    (Intent::Gratitude, &["thank", "thanks", "grateful", "appreciate"]),
    (
        Intent::SeekingHelp,
        &["help", "need", "don't know", "struggling", "difficult"],
    ),
    (Intent::SharingFeelings, &["feel", "feeling", "emotion", "mood"]),
];

/// Intent classifier using substring keyword counts
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    buckets: &'static [(Intent, &'static [&'static str])],
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    pub fn new() -> Self {
        Self {
            buckets: INTENT_KEYWORDS,
        }
    }

    /// Number of bucket keywords occurring anywhere in the lower-cased text
    pub fn scores(&self, text: &str) -> Vec<(Intent, usize)> {
        let lower = text.to_lowercase();
        self.buckets
            .iter()
            .map(|(intent, keywords)| {
                let score = keywords.iter().filter(|k| lower.contains(*k)).count();
                (*intent, score)
            })
            .collect()
    }

    pub fn classify(&self, text: &str) -> Intent {
        let mut best: Option<(Intent, usize)> = None;
        for (intent, score) in self.scores(text) {
            if score == 0 {
                continue;
            }
            // Strictly greater keeps the earlier bucket on ties
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((intent, score));
            }
        }
        best.map(|(intent, _)| intent).unwrap_or(Intent::General)
    }
}
