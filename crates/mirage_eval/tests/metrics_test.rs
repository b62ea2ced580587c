//! Tests for story metrics and curve analysis.

use mirage_core::{DiscoveryPath, PlotPoint};
use mirage_eval::{
    CriminalPrediction, CurveIssueKind, MetricsCalculator, PredictionConfidence,
    ReaderEvaluation, SuspenseTrend, analyze_curve, check_layer_leak,
};
use std::collections::BTreeMap;

fn point(sequence: u32, suspense: u8, collision: bool) -> PlotPoint {
    let mut builder = PlotPoint::builder();
    builder
        .sequence(sequence)
        .description(format!("beat {}", sequence))
        .detective_action("press the inquiry")
        .suspense(suspense)
        .collision(collision);
    if collision {
        builder.conspirator_intervention("someone steps in");
    }
    builder.build().expect("complete plot point")
}

fn rising_story() -> Vec<PlotPoint> {
    [3u8, 3, 4, 5, 5, 6, 7, 9, 10]
        .iter()
        .enumerate()
        .map(|(i, s)| point(i as u32 + 1, *s, i == 3 || i == 7))
        .collect()
}

#[test]
fn test_basic_counts_and_rates() {
    let points = rising_story();
    let mut paths = vec![
        DiscoveryPath::new("p1", "route one", ["E1"]),
        DiscoveryPath::new("p2", "route two", ["E2"]),
        DiscoveryPath::new("p3", "route three", Vec::<String>::new()),
    ];
    paths[0].close("plot_point_4");
    paths[1].close("plot_point_8");

    let metrics = MetricsCalculator::new().calculate(&points, &paths, &[]);

    assert_eq!(metrics.num_plot_points, 9);
    assert_eq!(metrics.num_interventions, 2);
    assert_eq!(metrics.initial_paths, 3);
    assert_eq!(metrics.final_open_paths, 1);
    assert!((metrics.collision_rate - 2.0 / 9.0).abs() < 1e-9);
}

#[test]
fn test_ascending_trend_detected() {
    let points = rising_story();
    let metrics = MetricsCalculator::new().calculate(&points, &[], &[]);

    assert_eq!(metrics.suspense_trend, SuspenseTrend::Ascending);
    assert_eq!(metrics.peak_suspense, 10.0);
    assert!(metrics.peak_position > 0.6);
    assert!(
        !metrics
            .curve_issues
            .iter()
            .any(|i| i.kind == CurveIssueKind::PrematurePeak)
    );
}

#[test]
fn test_reader_scores_override_plot_levels() {
    let points = rising_story();
    let mut suspense_scores = BTreeMap::new();
    for sequence in 1..=9u32 {
        suspense_scores.insert(sequence, 8.0);
    }
    let evaluation = ReaderEvaluation {
        reader_role: "casual".to_string(),
        suspense_scores,
        criminal_predictions: BTreeMap::new(),
        comments: String::new(),
        overall_score: 7.5,
    };

    let metrics = MetricsCalculator::new().calculate(&points, &[], &[evaluation]);
    assert!((metrics.avg_suspense - 8.0).abs() < 1e-9);
    assert_eq!(metrics.suspense_trend, SuspenseTrend::Flat);
    assert!((metrics.avg_reader_score - 7.5).abs() < 1e-9);
}

#[test]
fn test_curve_analysis_flags_problems() {
    // Early peak, flat middle, and a cliff near the end.
    let scores = [9.0, 5.0, 5.0, 5.5, 5.0, 5.5, 5.0, 6.0, 3.0];
    let issues = analyze_curve(&scores);

    assert!(issues.iter().any(|i| i.kind == CurveIssueKind::PrematurePeak));
    assert!(issues.iter().any(|i| i.kind == CurveIssueKind::FlatMiddle));
    assert!(
        issues
            .iter()
            .any(|i| i.kind == CurveIssueKind::SuddenDrop && i.position == 1)
    );
    assert!(
        issues
            .iter()
            .any(|i| i.kind == CurveIssueKind::SuddenDrop && i.position == 8)
    );
}

#[test]
fn test_layer_leak_requires_confident_correct_prediction() {
    let scenario = sample_crime();

    let mut low = BTreeMap::new();
    low.insert(
        5u32,
        CriminalPrediction {
            prediction: "Celia Harrow".to_string(),
            reasoning: "a hunch".to_string(),
            confidence: PredictionConfidence::Low,
        },
    );
    let mut high_wrong = BTreeMap::new();
    high_wrong.insert(
        5u32,
        CriminalPrediction {
            prediction: "Tom Brask".to_string(),
            reasoning: "the planted glove".to_string(),
            confidence: PredictionConfidence::High,
        },
    );

    let evaluations = vec![
        reader_with_predictions("casual", low.clone()),
        reader_with_predictions("genre-savvy", high_wrong),
    ];
    assert!(!check_layer_leak(&evaluations, &scenario));

    let mut high_right = low;
    high_right.get_mut(&5).unwrap().confidence = PredictionConfidence::High;
    let evaluations = vec![reader_with_predictions("critic", high_right)];
    assert!(check_layer_leak(&evaluations, &scenario));
}

fn reader_with_predictions(
    role: &str,
    criminal_predictions: BTreeMap<u32, CriminalPrediction>,
) -> ReaderEvaluation {
    ReaderEvaluation {
        reader_role: role.to_string(),
        suspense_scores: BTreeMap::new(),
        criminal_predictions,
        comments: String::new(),
        overall_score: 5.0,
    }
}

fn sample_crime() -> mirage_core::CrimeFacts {
    use mirage_core::{Character, CharacterRole};
    mirage_core::CrimeFacts::builder()
        .crime_type("poisoning")
        .location("Harrowgate Manor")
        .victim(Character::new(
            "Edmund Harrow",
            CharacterRole::Victim,
            "shipping magnate",
        ))
        .criminal(Character::new(
            "Celia Harrow",
            CharacterRole::Criminal,
            "estate manager",
        ))
        .conspirators(Vec::<Character>::new())
        .motive("inheritance")
        .method("aconite in the evening tonic")
        .coordination_plan("point everything at the groundskeeper")
        .build()
        .expect("complete crime facts")
}
