// Crisis gate: first stage of every message

mod detector;

pub use detector::{CrisisDetector, CrisisKeywords, DEFAULT_CRISIS_PHRASES};
