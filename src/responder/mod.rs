// Reply selection
//
// Maps (crisis flag, intent, emotion) to reply text drawn from the template
// pools in `templates`.

mod templates;

pub use templates::{
    emotion_pool, CRISIS_RESPONSE, DEFAULT_POOL, FAREWELL_RESPONSES, GREETING_RESPONSES,
};

use rand::Rng;
use std::sync::Arc;

use crate::analysis::{Emotion, Intent};

/// Source of uniform picks; swap in a fixed one for deterministic tests
pub trait ReplyRng: Send + Sync {
    /// Index in `0..len`. `len` is never zero.
    fn pick_index(&self, len: usize) -> usize;
}

/// Thread-local RNG, one independent draw per call
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadReplyRng;

impl ReplyRng for ThreadReplyRng {
    fn pick_index(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Always picks the same position (clamped to the pool)
#[derive(Debug, Clone, Copy)]
pub struct FixedReplyRng(pub usize);

impl ReplyRng for FixedReplyRng {
    fn pick_index(&self, len: usize) -> usize {
        self.0.min(len - 1)
    }
}

#[derive(Clone)]
pub struct ResponseSelector {
    rng: Arc<dyn ReplyRng>,
}

impl Default for ResponseSelector {
    fn default() -> Self {
        Self::new(Arc::new(ThreadReplyRng))
    }
}

impl ResponseSelector {
    pub fn new(rng: Arc<dyn ReplyRng>) -> Self {
        Self { rng }
    }

    /// Choose a reply.
    ///
    /// `_confidence` does not influence selection yet.
    pub fn select(
        &self,
        emotion: Emotion,
        _confidence: f64,
        is_crisis: bool,
        intent: Intent,
    ) -> &'static str {
        if is_crisis {
            return CRISIS_RESPONSE;
        }

        let pool = match intent {
            Intent::Greeting => GREETING_RESPONSES,
            Intent::Farewell => FAREWELL_RESPONSES,
            _ => emotion_pool(emotion),
        };

        self.pick(pool)
    }

    fn pick(&self, pool: &'static [&'static str]) -> &'static str {
        let idx = self.rng.pick_index(pool.len());
        pool[idx.min(pool.len() - 1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(idx: usize) -> ResponseSelector {
        ResponseSelector::new(Arc::new(FixedReplyRng(idx)))
    }

    #[test]
    fn test_crisis_overrides_everything() {
        let selector = fixed(0);
        for intent in [Intent::Greeting, Intent::Farewell, Intent::General] {
            assert_eq!(
                selector.select(Emotion::Joy, 0.99, true, intent),
                CRISIS_RESPONSE
            );
        }
        assert!(CRISIS_RESPONSE.contains("988"));
        assert!(CRISIS_RESPONSE.contains("9152987821"));
        assert!(CRISIS_RESPONSE.contains("741741"));
    }

    #[test]
    fn test_crisis_response_text() {
        let lines: Vec<&str> = CRISIS_RESPONSE.split('\n').collect();
        assert_eq!(lines.len(), 9);
        // Markdown hard break after the first line
        assert_eq!(
            lines[0],
            "hey… I'm really sorry you're in this much pain.  "
        );
        assert_eq!(
            lines[1],
            "I'm here with you, but I need you to reach out to someone who can help right now."
        );
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "📞 India: 9152987821 (AASRA)");
        assert_eq!(lines[8], "You deserve help, love, and safety.");
    }

    #[test]
    fn test_greeting_and_farewell_beat_emotion() {
        let selector = fixed(1);
        assert_eq!(
            selector.select(Emotion::Anger, 0.9, false, Intent::Greeting),
            GREETING_RESPONSES[1]
        );
        assert_eq!(
            selector.select(Emotion::Anger, 0.9, false, Intent::Farewell),
            FAREWELL_RESPONSES[1]
        );
    }

    #[test]
    fn test_emotion_pool_for_other_intents() {
        let selector = fixed(2);
        let reply = selector.select(Emotion::Fear, 0.7, false, Intent::SeekingHelp);
        assert_eq!(reply, emotion_pool(Emotion::Fear)[2]);
    }

    #[test]
    fn test_crisis_emotion_without_flag_uses_default_pool() {
        let selector = fixed(0);
        let reply = selector.select(Emotion::Crisis, 1.0, false, Intent::General);
        assert_eq!(reply, DEFAULT_POOL[0]);
    }

    #[test]
    fn test_fixed_rng_clamps() {
        let selector = fixed(999);
        let reply = selector.select(Emotion::Joy, 0.7, false, Intent::General);
        let pool = emotion_pool(Emotion::Joy);
        assert_eq!(reply, pool[pool.len() - 1]);
    }

    #[test]
    fn test_random_reply_is_pool_member() {
        let selector = ResponseSelector::default();
        for _ in 0..50 {
            let reply = selector.select(Emotion::Surprise, 0.7, false, Intent::General);
            assert!(emotion_pool(Emotion::Surprise).contains(&reply));
        }
    }

    #[test]
    fn test_every_pool_is_non_empty() {
        for emotion in Emotion::MODEL_LABELS {
            assert!(!emotion_pool(emotion).is_empty());
        }
        assert!(!GREETING_RESPONSES.is_empty());
        assert!(!FAREWELL_RESPONSES.is_empty());
    }
}
