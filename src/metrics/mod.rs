// Metrics module
// Prometheus counters exposed on /metrics

mod registry;

pub use registry::PipelineMetrics;
