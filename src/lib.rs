// SoulCare - Mental wellness companion
// Library exports

pub mod analysis; // Emotion, sentiment and intent classifiers
pub mod config;
pub mod crisis;
pub mod errors;
pub mod memory; // Per-session conversation store
pub mod metrics;
pub mod models; // Model-backed emotion classifiers
pub mod pipeline;
pub mod resources;
pub mod responder;
pub mod server; // HTTP API
