// Per-message orchestration: crisis gate, classifiers, reply, memory write

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::analysis::{
    round_confidence, Analysis, Emotion, EmotionClassifier, IntentClassifier, PredictionSource,
    SentimentScorer,
};
use crate::config::Config;
use crate::crisis::CrisisDetector;
use crate::errors::PipelineError;
use crate::memory::{ConversationMemory, Message};
use crate::metrics::PipelineMetrics;
use crate::models::{load_emotion_model, ModelStatus};
use crate::responder::{ResponseSelector, CRISIS_RESPONSE};

/// Result of one `submit_message` call
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    #[serde(rename = "response")]
    pub reply: String,
    pub analysis: Analysis,
    pub crisis_detected: bool,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Emotion timeline plus per-label counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmotionPattern {
    #[serde(rename = "emotion_timeline")]
    pub timeline: Vec<Emotion>,
    #[serde(rename = "emotion_distribution")]
    pub distribution: BTreeMap<Emotion, usize>,
}

impl EmotionPattern {
    pub fn from_timeline(timeline: Vec<Emotion>) -> Self {
        let mut distribution = BTreeMap::new();
        for emotion in &timeline {
            *distribution.entry(*emotion).or_insert(0) += 1;
        }
        Self {
            timeline,
            distribution,
        }
    }
}

/// The analysis pipeline and the memory it writes to.
///
/// Constructed once at startup and shared behind an `Arc`.
pub struct WellnessPipeline {
    crisis: CrisisDetector,
    emotion: EmotionClassifier,
    sentiment: SentimentScorer,
    intent: IntentClassifier,
    responder: ResponseSelector,
    memory: Arc<ConversationMemory>,
    metrics: PipelineMetrics,
}

impl WellnessPipeline {
    pub fn new(
        crisis: CrisisDetector,
        emotion: EmotionClassifier,
        memory: Arc<ConversationMemory>,
        metrics: PipelineMetrics,
    ) -> Self {
        Self {
            crisis,
            emotion,
            sentiment: SentimentScorer::new(),
            intent: IntentClassifier::new(),
            responder: ResponseSelector::default(),
            memory,
            metrics,
        }
    }

    /// Replace the reply selector (e.g. with a fixed RNG)
    pub fn with_responder(mut self, responder: ResponseSelector) -> Self {
        self.responder = responder;
        self
    }

    /// Build every component from configuration.
    ///
    /// Model initialization runs on the blocking pool; a failure leaves the
    /// pipeline on keyword detection for good.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let crisis = match &config.features.crisis_keywords_path {
            Some(path) => CrisisDetector::load_from_file(path)?,
            None => CrisisDetector::default(),
        };
        tracing::info!(
            phrases = crisis.all_keywords().len(),
            "Loaded crisis detection keywords"
        );

        let model_config = config.model.clone();
        let loaded = tokio::task::spawn_blocking(move || load_emotion_model(&model_config))
            .await
            .context("Emotion model loader panicked")?;
        let emotion = EmotionClassifier::from_load_result(loaded, config.model.inference_timeout());

        let memory = Arc::new(ConversationMemory::from_config(&config.memory));
        let metrics = PipelineMetrics::new()?;

        Ok(Self::new(crisis, emotion, memory, metrics))
    }

    /// Run one user message through the pipeline and record the exchange.
    ///
    /// Memory is written only after the reply is fully assembled.
    pub async fn submit_message(
        &self,
        session_id: &str,
        text: &str,
    ) -> Result<ChatReply, PipelineError> {
        if text.trim().is_empty() {
            self.metrics.record_rejected();
            return Err(PipelineError::empty_message());
        }

        let crisis_detected = self.crisis.detect_crisis(text);

        let (analysis, reply) = if crisis_detected {
            tracing::warn!(session_id = %session_id, "Crisis gate triggered, returning crisis resources");
            self.metrics.record_crisis();
            (Analysis::crisis(), CRISIS_RESPONSE)
        } else {
            let (analysis, source) = self.analyze(text).await;
            self.metrics
                .record_analysis(analysis.emotion, analysis.intent, source);

            let reply = self.responder.select(
                analysis.emotion,
                analysis.confidence,
                false,
                analysis.intent,
            );
            (analysis, reply)
        };

        Self::check_assembled(&analysis, reply)?;

        let (user, _) = self
            .memory
            .record_exchange(session_id, text, analysis, reply);
        self.metrics.set_active_sessions(self.memory.active_count());

        tracing::info!(
            session_id = %session_id,
            emotion = %analysis.emotion,
            sentiment = %analysis.sentiment,
            intent = %analysis.intent,
            crisis = crisis_detected,
            "Processed message"
        );

        Ok(ChatReply {
            reply: reply.to_string(),
            analysis,
            crisis_detected,
            session_id: session_id.to_string(),
            timestamp: user.timestamp,
        })
    }

    /// Emotion, sentiment and intent for a message that passed the crisis gate
    async fn analyze(&self, text: &str) -> (Analysis, PredictionSource) {
        let prediction = self.emotion.predict(text).await;
        let sentiment = self.sentiment.analyze(text);
        let intent = self.intent.classify(text);

        tracing::debug!(
            emotion = %prediction.emotion,
            confidence = prediction.confidence,
            source = ?prediction.source,
            sentiment_score = sentiment.score,
            "Analyzed message"
        );

        let analysis = Analysis {
            emotion: prediction.emotion,
            confidence: round_confidence(prediction.confidence),
            sentiment: sentiment.sentiment,
            intent,
        };
        (analysis, prediction.source)
    }

    fn check_assembled(analysis: &Analysis, reply: &str) -> Result<(), PipelineError> {
        if reply.trim().is_empty() {
            return Err(PipelineError::Internal("empty reply selected".to_string()));
        }
        if !(0.0..=1.0).contains(&analysis.confidence) {
            return Err(PipelineError::Internal(format!(
                "confidence {} outside [0, 1]",
                analysis.confidence
            )));
        }
        Ok(())
    }

    /// Most recent `limit` messages of a session
    pub fn history(&self, session_id: &str, limit: usize) -> Vec<Message> {
        self.memory.get_history(session_id, limit)
    }

    pub fn emotion_pattern(&self, session_id: &str) -> EmotionPattern {
        EmotionPattern::from_timeline(self.memory.get_emotion_pattern(session_id))
    }

    pub fn model_loaded(&self) -> bool {
        self.emotion.model_loaded()
    }

    pub fn model_status(&self) -> ModelStatus {
        self.emotion.model_status()
    }

    pub fn memory(&self) -> &Arc<ConversationMemory> {
        &self.memory
    }

    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Intent, Sentiment};
    use crate::responder::{emotion_pool, FixedReplyRng, GREETING_RESPONSES};

    fn pipeline() -> WellnessPipeline {
        WellnessPipeline::new(
            CrisisDetector::default(),
            EmotionClassifier::keyword_only("test"),
            Arc::new(ConversationMemory::default()),
            PipelineMetrics::new().unwrap(),
        )
        .with_responder(ResponseSelector::new(Arc::new(FixedReplyRng(0))))
    }

    #[tokio::test]
    async fn test_empty_message_rejected_without_write() {
        let pipeline = pipeline();
        for text in ["", "   ", "\n\t"] {
            let err = pipeline.submit_message("s", text).await.unwrap_err();
            assert!(matches!(err, PipelineError::InvalidInput(_)));
        }
        assert!(pipeline.history("s", 10).is_empty());
        assert_eq!(pipeline.memory().active_count(), 0);
    }

    #[tokio::test]
    async fn test_crisis_short_circuit() {
        let pipeline = pipeline();
        let reply = pipeline
            .submit_message("s", "hey thanks, I'm so happy but I want to end it all")
            .await
            .unwrap();

        assert!(reply.crisis_detected);
        assert_eq!(reply.reply, CRISIS_RESPONSE);
        assert_eq!(reply.analysis, Analysis::crisis());
        assert_eq!(pipeline.emotion_pattern("s").timeline, vec![Emotion::Crisis]);
        assert_eq!(pipeline.metrics().crisis_total(), 1);
    }

    #[tokio::test]
    async fn test_regular_message() {
        let pipeline = pipeline();
        let reply = pipeline
            .submit_message("s", "I am so scared and anxious")
            .await
            .unwrap();

        assert!(!reply.crisis_detected);
        assert_eq!(reply.analysis.emotion, Emotion::Fear);
        assert_eq!(reply.analysis.confidence, 0.7);
        assert_eq!(reply.analysis.sentiment, Sentiment::Negative);
        assert_eq!(reply.analysis.intent, Intent::General);
        assert_eq!(reply.reply, emotion_pool(Emotion::Fear)[0]);
    }

    #[tokio::test]
    async fn test_greeting_reply() {
        let pipeline = pipeline();
        let reply = pipeline.submit_message("s", "hello!").await.unwrap();
        assert_eq!(reply.analysis.intent, Intent::Greeting);
        assert_eq!(reply.reply, GREETING_RESPONSES[0]);
    }

    #[tokio::test]
    async fn test_exchange_written_to_memory() {
        let pipeline = pipeline();
        pipeline.submit_message("s", "wow").await.unwrap();
        pipeline.submit_message("s", "so sad today").await.unwrap();

        let history = pipeline.history("s", 10);
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].text, "wow");
        assert!(history[0].analysis.is_some());
        assert!(history[1].analysis.is_none());
        assert_eq!(history[2].text, "so sad today");

        let pattern = pipeline.emotion_pattern("s");
        assert_eq!(pattern.timeline, vec![Emotion::Surprise, Emotion::Sadness]);
        assert_eq!(pattern.distribution.get(&Emotion::Surprise), Some(&1));
        assert_eq!(pattern.distribution.get(&Emotion::Sadness), Some(&1));
    }

    #[test]
    fn test_pattern_distribution_counts() {
        let pattern = EmotionPattern::from_timeline(vec![
            Emotion::Joy,
            Emotion::Fear,
            Emotion::Joy,
        ]);
        assert_eq!(pattern.distribution.len(), 2);
        assert_eq!(pattern.distribution[&Emotion::Joy], 2);

        let json = serde_json::to_value(&pattern).unwrap();
        assert_eq!(json["emotion_timeline"][1], "fear");
        assert_eq!(json["emotion_distribution"]["joy"], 2);
    }

    #[test]
    fn test_check_assembled() {
        assert!(WellnessPipeline::check_assembled(&Analysis::crisis(), "ok").is_ok());
        assert!(matches!(
            WellnessPipeline::check_assembled(&Analysis::crisis(), "  "),
            Err(PipelineError::Internal(_))
        ));
    }
}
