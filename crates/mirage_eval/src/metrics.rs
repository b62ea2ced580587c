//! Deterministic metrics over a finished plot point sequence.

use crate::ReaderEvaluation;
use mirage_core::{DiscoveryPath, PlotPoint};
use serde::{Deserialize, Serialize};

/// Direction of the suspense curve across the story.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SuspenseTrend {
    Ascending,
    Descending,
    Flat,
    Unknown,
}

/// A structural problem in the suspense curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveIssue {
    /// What kind of problem
    pub kind: CurveIssueKind,
    /// Plot point index where it shows (0-indexed)
    pub position: usize,
    /// Human-readable description
    pub detail: String,
}

/// Kinds of suspense curve problems.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CurveIssueKind {
    /// Suspense plateaus in the middle third
    FlatMiddle,
    /// The peak lands before sixty percent of the story
    PrematurePeak,
    /// A drop of more than two points between neighbors
    SuddenDrop,
}

/// Comprehensive metrics for a generated story.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StoryMetrics {
    /// Plot points emitted
    pub num_plot_points: usize,
    /// Points where a conspirator acted
    pub num_interventions: usize,
    /// Points where a mundane obstacle interfered
    pub num_obstacles: usize,

    /// Mean suspense across the story
    pub avg_suspense: f64,
    /// Suspense variance
    pub suspense_variance: f64,
    /// Curve direction, judged half against half
    pub suspense_trend: SuspenseTrend,
    /// Highest suspense reached
    pub peak_suspense: f64,
    /// Where the peak lands, normalized to [0, 1]
    pub peak_position: f64,

    /// Paths the scenario opened with
    pub initial_paths: usize,
    /// Paths still open at the end
    pub final_open_paths: usize,
    /// Paths closed by plot points
    pub paths_closed: usize,
    /// Paths closed per plot point
    pub path_close_rate: f64,

    /// Share of plot points that were collisions
    pub collision_rate: f64,

    /// Mean overall score across reader evaluations
    pub avg_reader_score: f64,

    /// Curve problems found
    pub curve_issues: Vec<CurveIssue>,
}

impl Default for SuspenseTrend {
    fn default() -> Self {
        SuspenseTrend::Unknown
    }
}

/// Calculates metrics for story evaluation.
#[derive(Debug, Default)]
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// Creates a calculator.
    pub fn new() -> Self {
        Self
    }

    /// Computes the full metric set for one story.
    ///
    /// Reader scores are preferred for the suspense statistics when
    /// evaluations are present; otherwise the plot points' own levels are
    /// used.
    #[tracing::instrument(skip_all, fields(plot_points = plot_points.len()))]
    pub fn calculate(
        &self,
        plot_points: &[PlotPoint],
        paths: &[DiscoveryPath],
        evaluations: &[ReaderEvaluation],
    ) -> StoryMetrics {
        let mut metrics = StoryMetrics {
            num_plot_points: plot_points.len(),
            num_interventions: plot_points.iter().filter(|p| p.has_intervention()).count(),
            num_obstacles: plot_points.iter().filter(|p| p.obstacle().is_some()).count(),
            // Mid-story emergent leads carry the "lead_" prefix; everything
            // else was part of the scenario's opening path set.
            initial_paths: paths
                .iter()
                .filter(|p| !p.id().starts_with("lead_"))
                .count(),
            final_open_paths: paths.iter().filter(|p| p.is_open()).count(),
            paths_closed: plot_points.iter().map(|p| p.paths_closed().len()).sum(),
            ..StoryMetrics::default()
        };

        if metrics.num_plot_points > 0 {
            metrics.path_close_rate =
                metrics.paths_closed as f64 / metrics.num_plot_points as f64;
            metrics.collision_rate = plot_points.iter().filter(|p| *p.collision()).count() as f64
                / metrics.num_plot_points as f64;
        }

        let point_scores: Vec<f64> = plot_points
            .iter()
            .map(|p| f64::from(*p.suspense()))
            .collect();
        let reader_scores: Vec<f64> = evaluations
            .iter()
            .flat_map(|e| e.suspense_scores.values().copied())
            .collect();
        let scores = if reader_scores.is_empty() {
            &point_scores
        } else {
            &reader_scores
        };

        if !scores.is_empty() {
            let mean = scores.iter().sum::<f64>() / scores.len() as f64;
            metrics.avg_suspense = mean;
            metrics.suspense_variance =
                scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / scores.len() as f64;
            metrics.suspense_trend = trend(scores);

            let (peak_index, peak) = scores
                .iter()
                .copied()
                .enumerate()
                .fold((0, f64::MIN), |best, (i, s)| {
                    if s > best.1 { (i, s) } else { best }
                });
            metrics.peak_suspense = peak;
            metrics.peak_position = peak_index as f64 / scores.len() as f64;
        }

        if !evaluations.is_empty() {
            metrics.avg_reader_score = evaluations.iter().map(|e| e.overall_score).sum::<f64>()
                / evaluations.len() as f64;
        }

        // Structural flags come from the plot points' own levels: they
        // judge the controller's pacing, not the readers' perception.
        metrics.curve_issues = analyze_curve(&point_scores);

        metrics
    }
}

/// Judges curve direction by comparing the halves.
fn trend(scores: &[f64]) -> SuspenseTrend {
    if scores.len() < 2 {
        return SuspenseTrend::Unknown;
    }
    let half = scores.len() / 2;
    let first = scores[..half].iter().sum::<f64>() / half as f64;
    let second = scores[half..].iter().sum::<f64>() / (scores.len() - half) as f64;

    if second > first + 0.5 {
        SuspenseTrend::Ascending
    } else if second < first - 0.5 {
        SuspenseTrend::Descending
    } else {
        SuspenseTrend::Flat
    }
}

/// Scans a suspense curve for pacing problems.
pub fn analyze_curve(scores: &[f64]) -> Vec<CurveIssue> {
    let mut issues = Vec::new();

    if scores.len() >= 6 {
        let start = scores.len() / 3;
        let end = 2 * scores.len() / 3;
        let middle = &scores[start..end];
        let min = middle.iter().copied().fold(f64::MAX, f64::min);
        let max = middle.iter().copied().fold(f64::MIN, f64::max);
        if max - min < 1.5 {
            issues.push(CurveIssue {
                kind: CurveIssueKind::FlatMiddle,
                position: start,
                detail: "Suspense plateaus in the middle section".to_string(),
            });
        }
    }

    if scores.len() >= 5 {
        let (peak_index, _) = scores
            .iter()
            .copied()
            .enumerate()
            .fold((0, f64::MIN), |best, (i, s)| {
                if s > best.1 { (i, s) } else { best }
            });
        if (peak_index as f64) < scores.len() as f64 * 0.6 {
            issues.push(CurveIssue {
                kind: CurveIssueKind::PrematurePeak,
                position: peak_index,
                detail: "Suspense peaks too early".to_string(),
            });
        }
    }

    for i in 1..scores.len() {
        if scores[i] < scores[i - 1] - 2.0 {
            issues.push(CurveIssue {
                kind: CurveIssueKind::SuddenDrop,
                position: i,
                detail: format!("Sharp suspense drop at plot point {}", i + 1),
            });
        }
    }

    issues
}
