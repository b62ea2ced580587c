//! Reader-simulation interface.
//!
//! Reader simulation is model-judged and lives outside the core engine;
//! only its input/output shapes and the consumer trait are defined here,
//! so a model-backed simulator can plug in downstream.

use async_trait::async_trait;
use mirage_core::{CrimeFacts, PlotPoint};
use mirage_error::GenerationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Confidence attached to a reader's criminal prediction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PredictionConfidence {
    Low,
    Medium,
    High,
}

/// A reader's guess at the criminal at one checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriminalPrediction {
    /// Who the reader suspects
    pub prediction: String,
    /// Why
    pub reasoning: String,
    /// How sure they are
    pub confidence: PredictionConfidence,
}

/// One simulated reader's evaluation of a finished story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReaderEvaluation {
    /// The reading persona (e.g. "casual", "genre-savvy", "critic")
    pub reader_role: String,
    /// Suspense score per plot point sequence number
    pub suspense_scores: BTreeMap<u32, f64>,
    /// Criminal predictions per checkpoint sequence number
    pub criminal_predictions: BTreeMap<u32, CriminalPrediction>,
    /// Freeform engagement commentary
    pub comments: String,
    /// Overall quality score (0-10)
    pub overall_score: f64,
}

/// Simulates an audience reading the plot point sequence.
#[async_trait]
pub trait ReaderSimulator: Send + Sync {
    /// Evaluates the story from each configured persona.
    ///
    /// # Errors
    ///
    /// Returns a [`GenerationError`] when the backing judge fails.
    async fn evaluate(
        &mut self,
        plot_points: &[PlotPoint],
    ) -> Result<Vec<ReaderEvaluation>, GenerationError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str {
        "reader-simulator"
    }
}

/// Whether any reader saw through the fabricated layer.
///
/// A leak is a prediction naming the real criminal with at least medium
/// confidence: the dual-layer structure failed to keep the truth on the
/// reader's side of the irony gap in a way the story did not intend.
pub fn check_layer_leak(evaluations: &[ReaderEvaluation], crime: &CrimeFacts) -> bool {
    let real_criminal = crime.criminal.name.to_lowercase();

    for evaluation in evaluations {
        for prediction in evaluation.criminal_predictions.values() {
            if prediction.prediction.to_lowercase() == real_criminal
                && prediction.confidence >= PredictionConfidence::Medium
            {
                tracing::warn!(
                    reader = %evaluation.reader_role,
                    confidence = %prediction.confidence,
                    "Layer leak detected"
                );
                return true;
            }
        }
    }
    false
}
