//! Downstream evaluation for Mirage stories.
//!
//! Consumes the plot point sequence and final path state the engine
//! emits: deterministic pacing metrics, suspense curve analysis, and the
//! interface a model-backed reader simulation plugs in behind.

mod metrics;
mod reader;

pub use metrics::{
    CurveIssue, CurveIssueKind, MetricsCalculator, StoryMetrics, SuspenseTrend, analyze_curve,
};
pub use reader::{
    CriminalPrediction, PredictionConfidence, ReaderEvaluation, ReaderSimulator, check_layer_leak,
};
