//! Shared fixtures for the engine tests.
#![allow(dead_code)]

use async_trait::async_trait;
use mirage_core::{CrimeScenario, MirageConfig};
use mirage_error::{GenerationError, InterventionError};
use mirage_suspense::{
    ActionGenerator, CollisionOracle, CollisionOutcome, CollisionReport, FactStore,
    Intervention, InterventionKind, InterventionSelector, PathTracker, ProposedAction,
    StoryView, SuspensePolicy,
};
use std::collections::VecDeque;

/// Three-path scenario used across the controller tests.
pub fn sample_scenario() -> CrimeScenario {
    let toml = r#"
        [crime]
        crime_type = "poisoning"
        location = "Harrowgate Manor"
        motive = "inheritance"
        method = "aconite in the evening tonic"
        coordination_plan = "keep every question pointed at the groundskeeper"

        [crime.victim]
        name = "Edmund Harrow"
        role = "victim"
        occupation = "shipping magnate"

        [crime.criminal]
        name = "Celia Harrow"
        role = "criminal"
        occupation = "estate manager"

        [[crime.conspirators]]
        name = "Dr. Pell"
        role = "conspirator"
        occupation = "family physician"
        leverage = "a falsified death certificate in his past"
        alibi = "at the county medical board all evening"
        is_conspirator = true

        [[crime.conspirators]]
        name = "Mara Voss"
        role = "conspirator"
        occupation = "housekeeper"
        leverage = "gambling debts Celia quietly covers"
        alibi = "polishing silver in the east wing"
        is_conspirator = true

        [[crime.evidence]]
        id = "E1"
        description = "residue in the tonic glass"
        evidence_type = "physical"
        location = "the study"
        steps_total = 2
        real_meaning = "aconite administered by someone with cabinet access"
        fabricated_meaning = "sediment from an herbal remedy"

        [[crime.evidence]]
        id = "E2"
        description = "cabinet key log"
        evidence_type = "documentary"
        location = "the butler's pantry"
        steps_total = 2
        real_meaning = "only Celia signed the key out that day"
        fabricated_meaning = "log page smudged beyond reading"

        [[crime.evidence]]
        id = "E3"
        description = "torn glove by the garden door"
        evidence_type = "physical"
        location = "the garden"
        real_meaning = "planted after the fact by Mara Voss"
        fabricated_meaning = "dropped by an intruder"

        [fabricated]
        fake_motive = "an old grudge over unpaid wages"
        fake_method = "intruder through the garden door"
        cover_story = "a dismissed groundskeeper came back for revenge"

        [fabricated.fake_suspect]
        name = "Tom Brask"
        role = "suspect"
        occupation = "groundskeeper"

        [fabricated.alibis]
        "Dr. Pell" = "at the county medical board all evening"
        "Mara Voss" = "polishing silver in the east wing"

        [[paths]]
        id = "p1"
        description = "trace the tonic residue back to the cabinet"
        evidence_chain = ["E1", "E2"]
        involves_character = "Dr. Pell"
        difficulty = 6

        [[paths]]
        id = "p2"
        description = "read the key log against the house schedule"
        evidence_chain = ["E2"]
        difficulty = 4

        [[paths]]
        id = "p3"
        description = "break the housekeeper's account of the evening"
        involves_character = "Mara Voss"
        difficulty = 7
    "#;
    CrimeScenario::from_toml_str(toml).expect("sample scenario parses")
}

/// Config with every stochastic gate pinned off, for deterministic runs.
pub fn quiet_config() -> MirageConfig {
    let mut config = MirageConfig::default();
    config.generation.min_plot_points = 0;
    config.generation.max_plot_points = 25;
    config.generation.discovery_paths_threshold = 1;
    config.generation.max_retries = 2;
    config.suspense.path_close_probability = 0.0;
    config.suspense.new_path_probability = 0.0;
    config.suspense.obstacle_probability = 0.0;
    config.suspense.collision_sensitivity = 1.0;
    config.seed = 7;
    config
}

/// Generator that replays a fixed list of actions, then repeats a filler.
pub struct ScriptedGenerator {
    actions: VecDeque<ProposedAction>,
}

impl ScriptedGenerator {
    pub fn new(actions: impl IntoIterator<Item = ProposedAction>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
        }
    }
}

#[async_trait]
impl ActionGenerator for ScriptedGenerator {
    async fn next_action(
        &mut self,
        _view: &StoryView<'_>,
    ) -> Result<ProposedAction, GenerationError> {
        Ok(self
            .actions
            .pop_front()
            .unwrap_or_else(|| ProposedAction::new("go back over the case file")))
    }

    fn name(&self) -> &str {
        "scripted-generator"
    }
}

/// Oracle that replays a fixed list of outcomes, then stays clear.
pub struct ScriptedOracle {
    outcomes: VecDeque<CollisionOutcome>,
}

impl ScriptedOracle {
    pub fn new(outcomes: impl IntoIterator<Item = CollisionOutcome>) -> Self {
        Self {
            outcomes: outcomes.into_iter().collect(),
        }
    }
}

#[async_trait]
impl CollisionOracle for ScriptedOracle {
    async fn detect(
        &mut self,
        _action: &ProposedAction,
        _store: &FactStore,
        _tracker: &PathTracker,
    ) -> Result<CollisionOutcome, GenerationError> {
        Ok(self.outcomes.pop_front().unwrap_or(CollisionOutcome::Clear))
    }

    fn name(&self) -> &str {
        "scripted-oracle"
    }
}

/// Selector that always lets the threatened conspirator act.
pub struct AlwaysCoverSelector;

#[async_trait]
impl InterventionSelector for AlwaysCoverSelector {
    async fn select(
        &mut self,
        report: &CollisionReport,
        _store: &FactStore,
    ) -> Result<Intervention, InterventionError> {
        Ok(Intervention {
            conspirator: report.threatened_conspirator.clone(),
            kind: InterventionKind::ClosePath,
            justification: "keeps the inquiry pointed elsewhere".to_string(),
        })
    }
}

/// Deterministic policy: collisions +2, everything else holds.
pub struct FixedPolicy;

impl SuspensePolicy for FixedPolicy {
    fn on_collision(&mut self, current: u8) -> u8 {
        (current + 2).min(10)
    }

    fn on_progress(&mut self, current: u8) -> u8 {
        current
    }

    fn on_obstacle(&mut self, current: u8) -> u8 {
        current
    }

    fn resolution_level(&self) -> u8 {
        10
    }
}

/// Convenience constructor for a collision report.
pub fn report(
    conspirator: &str,
    evidence: Option<&str>,
    affected: &[&str],
    exposed: &str,
) -> CollisionReport {
    CollisionReport {
        vulnerable_evidence: evidence.map(ToString::to_string),
        threatened_conspirator: conspirator.to_string(),
        affected_paths: affected.iter().map(ToString::to_string).collect(),
        exposed: exposed.to_string(),
    }
}
