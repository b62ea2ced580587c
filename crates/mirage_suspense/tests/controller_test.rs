//! End-to-end tests for the suspense meta-controller.

mod common;

use async_trait::async_trait;
use common::{
    AlwaysCoverSelector, FixedPolicy, ScriptedGenerator, ScriptedOracle, quiet_config, report,
    sample_scenario,
};
use mirage_core::DetectiveProfile;
use mirage_error::{
    GenerationError, GenerationErrorKind, MirageErrorKind,
};
use mirage_suspense::{
    ActionGenerator, AgendaGenerator, CollisionOutcome, KeywordOracle, LeverageSelector,
    ProposedAction, RisingTensionPolicy, StoryPhase, StoryView, SuspenseController,
};

#[tokio::test]
async fn test_three_paths_two_collisions_resolve_at_threshold() {
    let scenario = sample_scenario();
    let generator = ScriptedGenerator::new([
        ProposedAction::new("walk the grounds at first light"),
        ProposedAction::new("pull the staff rota for the evening"),
        ProposedAction::new("canvas the village for sightings"),
        ProposedAction::new("press the physician on the timeline"),
        ProposedAction::new("lean on the housekeeper's story"),
    ]);
    let oracle = ScriptedOracle::new([
        CollisionOutcome::Clear,
        CollisionOutcome::Clear,
        CollisionOutcome::Clear,
        CollisionOutcome::Collision(report(
            "Dr. Pell",
            None,
            &["p1"],
            "the cabinet key routine",
        )),
        CollisionOutcome::Collision(report(
            "Mara Voss",
            None,
            &["p3"],
            "the east wing timeline",
        )),
    ]);

    let controller = SuspenseController::new(
        scenario,
        DetectiveProfile::default(),
        quiet_config(),
        generator,
        oracle,
        AlwaysCoverSelector,
        FixedPolicy,
    );
    let story = controller.generate().await.expect("story generates");

    // Two defused collisions close p1 and p3, leaving exactly one route.
    assert_eq!(story.open_path_count(), 1);
    assert_eq!(story.plot_points().len(), 6);
    assert_eq!(*story.state().phase(), StoryPhase::Done);

    assert!(story.plot_points()[3].collision());
    assert!(story.plot_points()[4].collision());
    assert_eq!(story.plot_points()[3].paths_closed(), &["p1".to_string()]);
    assert_eq!(story.plot_points()[4].paths_closed(), &["p3".to_string()]);

    let resolution = story.plot_points().last().unwrap();
    assert!(!resolution.collision());
    let reveal = resolution.reveal().as_deref().expect("resolution carries a reveal");
    assert!(reveal.contains("secret is safe"));

    assert_eq!(story.suspense_curve(), vec![3, 3, 3, 5, 7, 10]);

    // Every action the detective tried rides along in the history, in order.
    let history = story.state().action_history();
    assert_eq!(history.len(), 5);
    assert_eq!(history[0].action, "walk the grounds at first light");
    assert!(history[3].was_blocked);
    assert_eq!(history[3].blocked_by.as_deref(), Some("Dr. Pell"));
}

#[tokio::test]
async fn test_collision_on_shared_evidence_closes_every_touched_path() {
    let scenario = sample_scenario();
    let generator = ScriptedGenerator::new([
        ProposedAction::targeting("pull the cabinet key log", "E2"),
        ProposedAction::targeting("read the key log against the rota", "E2"),
    ]);
    // E2 sits at 1/2 steps when the second action lands; both p1 and p2
    // touch it, so the intervention's blast radius covers both.
    let oracle = ScriptedOracle::new([
        CollisionOutcome::Clear,
        CollisionOutcome::Collision(report(
            "Dr. Pell",
            Some("E2"),
            &["p2", "p1"],
            "what the key log actually shows",
        )),
    ]);

    let controller = SuspenseController::new(
        scenario,
        DetectiveProfile::default(),
        quiet_config(),
        generator,
        oracle,
        AlwaysCoverSelector,
        FixedPolicy,
    );
    let story = controller.generate().await.expect("story generates");

    let collision_point = &story.plot_points()[1];
    assert!(collision_point.collision());
    assert_eq!(
        collision_point.paths_closed(),
        &["p2".to_string(), "p1".to_string()]
    );

    let closed: Vec<_> = story.paths().iter().filter(|p| !p.is_open()).collect();
    assert_eq!(closed.len(), 2);

    // Collisions raise tension even when defused.
    let before = *story.plot_points()[0].suspense();
    let after = *collision_point.suspense();
    assert!(after > before);
}

#[tokio::test]
async fn test_exhausted_conspiracy_forces_resolution() {
    let scenario = sample_scenario();
    let mut selector = LeverageSelector::new(&scenario.crime, 1);
    selector.spend_all("Dr. Pell");
    selector.spend_all("Mara Voss");

    let generator = ScriptedGenerator::new([ProposedAction::new(
        "press the physician on the timeline",
    )]);
    let oracle = ScriptedOracle::new([CollisionOutcome::Collision(report(
        "Dr. Pell",
        None,
        &["p1"],
        "the cabinet key routine",
    ))]);

    let controller = SuspenseController::new(
        scenario,
        DetectiveProfile::default(),
        quiet_config(),
        generator,
        oracle,
        selector,
        FixedPolicy,
    );
    let story = controller.generate().await.expect("story generates");

    // Nothing was defused, so no path closed; resolution is forced on the
    // next termination check regardless of the open path count.
    assert_eq!(story.open_path_count(), 3);
    assert_eq!(story.plot_points().len(), 2);
    assert!(story.plot_points()[0].collision());
    assert!(story.plot_points()[0].conspirator_intervention().is_none());
    assert!(!story.plot_points()[1].collision());
    assert_eq!(*story.state().phase(), StoryPhase::Done);
}

#[tokio::test]
async fn test_plot_point_sequence_is_contiguous() {
    let scenario = sample_scenario();
    let config = quiet_config();
    let controller = SuspenseController::new(
        scenario.clone(),
        DetectiveProfile::default(),
        config.clone(),
        AgendaGenerator::new(),
        KeywordOracle::new(1.0, config.seed),
        LeverageSelector::new(&scenario.crime, config.suspense.cover_capacity),
        RisingTensionPolicy::new(config.suspense.max_level, config.seed),
    );
    let story = controller.generate().await.expect("story generates");

    for (index, point) in story.plot_points().iter().enumerate() {
        assert_eq!(*point.sequence(), index as u32 + 1);
    }
    assert_eq!(*story.state().phase(), StoryPhase::Done);
    assert!(!story.plot_points().last().unwrap().collision());
}

#[tokio::test]
async fn test_controller_terminates_within_plot_point_bound() {
    let scenario = sample_scenario();
    let mut config = quiet_config();
    config.generation.max_plot_points = 8;
    config.generation.discovery_paths_threshold = 0;

    // Oracle never fires and probabilities are pinned off, so nothing can
    // close paths; only the cap ends the loop.
    let controller = SuspenseController::new(
        scenario,
        DetectiveProfile::default(),
        config,
        ScriptedGenerator::new([]),
        ScriptedOracle::new([]),
        AlwaysCoverSelector,
        FixedPolicy,
    );
    let story = controller.generate().await.expect("story generates");

    assert_eq!(story.plot_points().len(), 9); // cap plus the resolution point
    assert_eq!(*story.state().phase(), StoryPhase::Done);
    assert_eq!(story.open_path_count(), 3);

    let probability = *story.state().success_probability();
    assert!((0.05..=0.8).contains(&probability));
}

#[tokio::test]
async fn test_countdown_expiry_forces_the_deadline_resolution() {
    let scenario = sample_scenario();
    let mut config = quiet_config();
    config.generation.max_plot_points = 10;
    config.generation.countdown_slack = 0;
    config.generation.discovery_paths_threshold = 0;

    let controller = SuspenseController::new(
        scenario,
        DetectiveProfile::default(),
        config,
        ScriptedGenerator::new([]),
        ScriptedOracle::new([]),
        AlwaysCoverSelector,
        FixedPolicy,
    );
    let story = controller.generate().await.expect("story generates");

    // With zero slack the clock runs out exactly as the cap is reached;
    // the countdown check fires first and the story still ends cleanly.
    assert_eq!(*story.state().time_remaining(), 0);
    assert_eq!(story.plot_points().len(), 11);
    assert_eq!(*story.state().phase(), StoryPhase::Done);
}

/// Generator that always fails with a transient error.
struct FailingGenerator;

#[async_trait]
impl ActionGenerator for FailingGenerator {
    async fn next_action(
        &mut self,
        _view: &StoryView<'_>,
    ) -> Result<ProposedAction, GenerationError> {
        Err(GenerationError::new(GenerationErrorKind::Transient(
            "model unavailable".to_string(),
        )))
    }
}

/// Generator that fails transiently a set number of times, then recovers.
struct FlakyGenerator {
    failures_left: u32,
}

#[async_trait]
impl ActionGenerator for FlakyGenerator {
    async fn next_action(
        &mut self,
        _view: &StoryView<'_>,
    ) -> Result<ProposedAction, GenerationError> {
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(GenerationError::new(GenerationErrorKind::Timeout(5_000)));
        }
        Ok(ProposedAction::new("go back over the case file"))
    }
}

#[tokio::test]
async fn test_persistent_generation_failure_is_fatal_after_retries() {
    let scenario = sample_scenario();
    let config = quiet_config(); // max_retries = 2

    let controller = SuspenseController::new(
        scenario,
        DetectiveProfile::default(),
        config,
        FailingGenerator,
        ScriptedOracle::new([]),
        AlwaysCoverSelector,
        FixedPolicy,
    );
    let err = controller.generate().await.expect_err("expected fatal failure");

    match err.kind() {
        MirageErrorKind::Generation(e) => match &e.kind {
            GenerationErrorKind::ActionFailed { attempts, .. } => assert_eq!(*attempts, 3),
            other => panic!("unexpected generation error kind: {:?}", other),
        },
        other => panic!("unexpected error kind: {:?}", other),
    }
}

#[tokio::test]
async fn test_transient_failures_within_bound_recover() {
    let scenario = sample_scenario();
    let config = quiet_config(); // max_retries = 2

    let controller = SuspenseController::new(
        scenario,
        DetectiveProfile::default(),
        config,
        FlakyGenerator { failures_left: 2 },
        ScriptedOracle::new([]),
        AlwaysCoverSelector,
        FixedPolicy,
    );
    let story = controller.generate().await.expect("retries should absorb the failures");
    assert_eq!(*story.state().phase(), StoryPhase::Done);
}
