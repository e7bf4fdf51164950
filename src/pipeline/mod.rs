// Analysis pipeline orchestrator

mod orchestrator;

pub use orchestrator::{ChatReply, EmotionPattern, WellnessPipeline};
