//! Tests for the keyword collision oracle.

mod common;

use common::sample_scenario;
use mirage_suspense::{
    CollisionOracle, CollisionOutcome, FactStore, KeywordOracle, PathTracker, ProposedAction,
};

fn fixtures() -> (FactStore, PathTracker) {
    let scenario = sample_scenario();
    let tracker = PathTracker::new(scenario.paths.clone());
    let store = FactStore::new(scenario.crime, scenario.fabricated, scenario.cover);
    (store, tracker)
}

#[tokio::test]
async fn test_interviewing_a_conspirator_collides() {
    let (store, tracker) = fixtures();
    let mut oracle = KeywordOracle::new(1.0, 1);

    let action = ProposedAction::new("confront Dr. Pell about his whereabouts that night");
    let outcome = oracle.detect(&action, &store, &tracker).await.unwrap();

    match outcome {
        CollisionOutcome::Collision(report) => {
            assert_eq!(report.threatened_conspirator, "Dr. Pell");
            assert!(report.vulnerable_evidence.is_none());
            assert_eq!(report.affected_paths, vec!["p1".to_string()]);
            assert!(report.exposed.contains("alibi"));
        }
        CollisionOutcome::Clear => panic!("expected a collision"),
    }
}

#[tokio::test]
async fn test_final_evidence_step_collides_partial_does_not() {
    let (mut store, tracker) = fixtures();
    let mut oracle = KeywordOracle::new(1.0, 1);
    let action = ProposedAction::targeting("analyze the residue in the tonic glass", "E1");

    // Two steps remaining: the meaning is not yet at risk, but the action
    // still follows an open path's next unresolved step.
    let outcome = oracle.detect(&action, &store, &tracker).await.unwrap();
    match outcome {
        CollisionOutcome::Collision(report) => {
            assert!(report.vulnerable_evidence.is_some());
            assert_eq!(report.affected_paths, vec!["p1".to_string()]);
            assert_eq!(report.exposed, "trace the tonic residue back to the cabinet");
        }
        CollisionOutcome::Clear => panic!("expected a path-step collision"),
    }

    // One step remaining: now the true meaning itself is the exposure.
    store.advance_evidence("E1", 1).unwrap();
    let outcome = oracle.detect(&action, &store, &tracker).await.unwrap();
    match outcome {
        CollisionOutcome::Collision(report) => {
            assert_eq!(report.vulnerable_evidence.as_deref(), Some("E1"));
            assert!(report.exposed.contains("true meaning"));
        }
        CollisionOutcome::Clear => panic!("expected a meaning collision"),
    }
}

#[tokio::test]
async fn test_affected_paths_lead_with_fewest_remaining_steps() {
    let (mut store, tracker) = fixtures();
    let mut oracle = KeywordOracle::new(1.0, 1);

    // E2 sits on both p1 (4 steps total chain) and p2 (2 steps). Once E2
    // is one step from done, the meaning rule fires and must report the
    // closest route first.
    store.advance_evidence("E2", 1).unwrap();
    let action = ProposedAction::targeting("cross-check the cabinet key log", "E2");
    let outcome = oracle.detect(&action, &store, &tracker).await.unwrap();

    match outcome {
        CollisionOutcome::Collision(report) => {
            assert_eq!(report.vulnerable_evidence.as_deref(), Some("E2"));
            assert_eq!(
                report.affected_paths,
                vec!["p2".to_string(), "p1".to_string()]
            );
        }
        CollisionOutcome::Clear => panic!("expected a collision"),
    }
}

#[tokio::test]
async fn test_zero_sensitivity_never_collides() {
    let (store, tracker) = fixtures();
    let mut oracle = KeywordOracle::new(0.0, 1);

    for action in [
        ProposedAction::new("confront Dr. Pell about his whereabouts"),
        ProposedAction::targeting("analyze the residue in the tonic glass", "E1"),
        ProposedAction::new("search Harrowgate Manor top to bottom"),
    ] {
        let outcome = oracle.detect(&action, &store, &tracker).await.unwrap();
        assert!(!outcome.is_collision());
    }
}

#[tokio::test]
async fn test_bland_action_is_clear() {
    let (store, tracker) = fixtures();
    let mut oracle = KeywordOracle::new(1.0, 1);

    let action = ProposedAction::new("file the morning report with the captain");
    let outcome = oracle.detect(&action, &store, &tracker).await.unwrap();
    assert_eq!(outcome, CollisionOutcome::Clear);
}

#[tokio::test]
async fn test_closed_paths_do_not_collide_by_next_step() {
    let scenario = sample_scenario();
    let mut tracker = PathTracker::new(scenario.paths.clone());
    let store = FactStore::new(scenario.crime, scenario.fabricated, scenario.cover);
    let mut oracle = KeywordOracle::new(1.0, 1);

    tracker.close_path("p1", "plot_point_1").unwrap();
    tracker.close_path("p2", "plot_point_2").unwrap();

    // E2 is now only on closed paths; following it is no longer a risk
    // for the path rule (and its meaning is still two steps away).
    let action = ProposedAction::targeting("pull the cabinet key log", "E2");
    let outcome = oracle.detect(&action, &store, &tracker).await.unwrap();
    assert_eq!(outcome, CollisionOutcome::Clear);
}
