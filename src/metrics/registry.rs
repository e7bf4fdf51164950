// Prometheus counters for the analysis pipeline

use anyhow::{Context, Result};
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

use crate::analysis::{Emotion, Intent, PredictionSource};

/// Pipeline metrics, registered on a private registry
#[derive(Clone)]
pub struct PipelineMetrics {
    registry: Registry,
    messages_total: IntCounter,
    crisis_total: IntCounter,
    emotions_total: IntCounterVec,
    intents_total: IntCounterVec,
    fallback_predictions_total: IntCounter,
    rejected_total: IntCounter,
    active_sessions: IntGauge,
}

impl PipelineMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new_custom(Some("soulcare".to_string()), None)
            .context("Failed to create metrics registry")?;

        let messages_total =
            IntCounter::new("messages_total", "User messages processed by the pipeline")?;
        let crisis_total =
            IntCounter::new("crisis_total", "Messages that triggered the crisis gate")?;
        let emotions_total = IntCounterVec::new(
            Opts::new("emotions_total", "Emotion labels assigned to user messages"),
            &["emotion"],
        )?;
        let intents_total = IntCounterVec::new(
            Opts::new("intents_total", "Intents assigned to user messages"),
            &["intent"],
        )?;
        let fallback_predictions_total = IntCounter::new(
            "fallback_predictions_total",
            "Emotion predictions served by keyword detection",
        )?;
        let rejected_total =
            IntCounter::new("rejected_total", "Messages rejected as invalid input")?;
        let active_sessions = IntGauge::new("active_sessions", "Sessions held in memory")?;

        registry.register(Box::new(messages_total.clone()))?;
        registry.register(Box::new(crisis_total.clone()))?;
        registry.register(Box::new(emotions_total.clone()))?;
        registry.register(Box::new(intents_total.clone()))?;
        registry.register(Box::new(fallback_predictions_total.clone()))?;
        registry.register(Box::new(rejected_total.clone()))?;
        registry.register(Box::new(active_sessions.clone()))?;

        Ok(Self {
            registry,
            messages_total,
            crisis_total,
            emotions_total,
            intents_total,
            fallback_predictions_total,
            rejected_total,
            active_sessions,
        })
    }

    pub fn record_crisis(&self) {
        self.messages_total.inc();
        self.crisis_total.inc();
        self.emotions_total
            .with_label_values(&[Emotion::Crisis.as_str()])
            .inc();
    }

    pub fn record_analysis(&self, emotion: Emotion, intent: Intent, source: PredictionSource) {
        self.messages_total.inc();
        self.emotions_total.with_label_values(&[emotion.as_str()]).inc();
        self.intents_total.with_label_values(&[intent.as_str()]).inc();
        if source == PredictionSource::Fallback {
            self.fallback_predictions_total.inc();
        }
    }

    pub fn record_rejected(&self) {
        self.rejected_total.inc();
    }

    pub fn set_active_sessions(&self, count: usize) {
        self.active_sessions.set(count as i64);
    }

    pub fn messages_total(&self) -> u64 {
        self.messages_total.get()
    }

    pub fn crisis_total(&self) -> u64 {
        self.crisis_total.get()
    }

    /// Prometheus text exposition format
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .context("Failed to encode metrics")?;
        String::from_utf8(buffer).context("Metrics output was not UTF-8")
    }
}
