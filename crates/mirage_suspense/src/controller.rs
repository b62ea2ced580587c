//! The suspense meta-controller.
//!
//! Drives the iterative plot loop: propose a detective action, classify
//! it against the truth, defuse or let through, update suspense and the
//! path set, and decide continuation or resolution. One story is strictly
//! sequential; every plot point depends on the state the previous one
//! produced.

use crate::{
    ActionGenerator, ActionRecord, CollisionOracle, CollisionOutcome, CollisionReport, FactStore,
    InterventionKind, InterventionSelector, PathTracker, ProposedAction, StoryPhase, StoryState,
    StoryView, SuspensePolicy,
};
use mirage_core::{
    CrimeScenario, DetectiveProfile, DiscoveryPath, MirageConfig, PlotPoint,
};
use mirage_error::{GenerationError, GenerationErrorKind, MirageResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Mundane setbacks that slow an investigation without touching the truth.
const OBSTACLES: &[&str] = &[
    "a warrant is delayed until morning",
    "a witness stops returning calls",
    "the lab backlog swallows the request",
    "jurisdictional pushback stalls the canvass",
    "the records office closes early for the holiday",
];

/// A finished story: the plot point sequence plus final state.
///
/// Consumed downstream by a story assembler (prose) and the evaluation
/// stage (suspense curve, leak detection).
#[derive(Debug, Clone, Serialize, Deserialize, derive_getters::Getters)]
pub struct GeneratedStory {
    /// Final story state, including the plot points in order
    state: StoryState,
    /// Final snapshot of every discovery path, open and closed
    paths: Vec<DiscoveryPath>,
}

impl GeneratedStory {
    /// The plot points, in sequence order.
    pub fn plot_points(&self) -> &[PlotPoint] {
        self.state.plot_points()
    }

    /// The suspense level of each plot point, in order.
    pub fn suspense_curve(&self) -> Vec<u8> {
        self.state.plot_points().iter().map(|p| *p.suspense()).collect()
    }

    /// How many paths remained open at the end.
    pub fn open_path_count(&self) -> usize {
        self.paths.iter().filter(|p| p.is_open()).count()
    }
}

/// Orchestrates one story generation run.
///
/// Owns the fact store, the path tracker, and the mutable story state;
/// the pluggable seams (generator, oracle, selector, policy) are supplied
/// by the caller. Consuming `generate` finalizes the state: cancellation
/// is dropping the future, and there is no checkpoint to resume from.
pub struct SuspenseController<G, O, S, P> {
    store: FactStore,
    tracker: PathTracker,
    profile: DetectiveProfile,
    config: MirageConfig,
    generator: G,
    oracle: O,
    selector: S,
    policy: P,
    state: StoryState,
    rng: StdRng,
}

impl<G, O, S, P> SuspenseController<G, O, S, P>
where
    G: ActionGenerator,
    O: CollisionOracle,
    S: InterventionSelector,
    P: SuspensePolicy,
{
    /// Creates a controller over a validated scenario.
    pub fn new(
        scenario: CrimeScenario,
        profile: DetectiveProfile,
        config: MirageConfig,
        generator: G,
        oracle: O,
        selector: S,
        policy: P,
    ) -> Self {
        let conspirators: Vec<String> = scenario
            .crime
            .conspirators
            .iter()
            .map(|c| c.name.clone())
            .collect();
        let time_total = config.generation.max_plot_points + config.generation.countdown_slack;
        let state = StoryState::new(config.suspense.initial_level, conspirators, time_total);
        let rng = StdRng::seed_from_u64(config.seed);

        Self {
            store: FactStore::new(scenario.crime, scenario.fabricated, scenario.cover),
            tracker: PathTracker::new(scenario.paths),
            profile,
            config,
            generator,
            oracle,
            selector,
            policy,
            state,
            rng,
        }
    }

    /// Generates the complete story.
    ///
    /// Loops until open paths fall to the configured threshold, the
    /// countdown expires, the conspiracy cracks, or the plot point cap is
    /// reached; then emits exactly one resolution point and finishes in
    /// [`StoryPhase::Done`].
    ///
    /// # Errors
    ///
    /// Fatal [`GenerationErrorKind::ActionFailed`] / `OracleFailed` after
    /// retry exhaustion, or invariant violations from the store/tracker.
    #[tracing::instrument(skip(self), fields(
        crime_type = %self.store.crime().crime_type,
        paths = self.tracker.paths().len(),
        max_plot_points = self.config.generation.max_plot_points,
    ))]
    pub async fn generate(mut self) -> MirageResult<GeneratedStory> {
        tracing::info!(detective = %self.profile.name, "Starting suspense meta-controller");

        loop {
            let points = self.state.plot_points().len() as u32;
            let open = self.tracker.open_path_count();

            if *self.state.forced_resolution() {
                self.resolve("conspiracy cracking");
                break;
            }
            if self.state.out_of_time() {
                self.resolve("countdown expired");
                break;
            }
            if open <= self.config.generation.discovery_paths_threshold
                && points >= self.config.generation.min_plot_points
            {
                self.resolve("discovery paths exhausted");
                break;
            }
            if points >= self.config.generation.max_plot_points {
                self.resolve("plot point cap reached");
                break;
            }

            let phase = if open <= self.config.generation.discovery_paths_threshold + 1 {
                StoryPhase::Tightening
            } else {
                StoryPhase::Building
            };
            self.state.set_phase(phase);

            self.state.tick();
            tracing::info!(
                plot_point = points + 1,
                time_remaining = self.state.time_remaining(),
                open_paths = open,
                success_probability = self.state.success_probability(),
                "Generating plot point"
            );

            let action = self.next_action().await?;
            let outcome = self.classify(&action).await?;

            match outcome {
                CollisionOutcome::Collision(report) => {
                    self.handle_collision(action, report).await?;
                }
                CollisionOutcome::Clear => {
                    self.handle_clear(action)?;
                }
            }

            // Time decay: each passing beat makes success a little less likely.
            self.state.cut_success(0.01);
        }

        Ok(GeneratedStory {
            state: self.state,
            paths: self.tracker.paths().to_vec(),
        })
    }

    /// Requests the next detective action, retrying transient failures.
    async fn next_action(&mut self) -> MirageResult<ProposedAction> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            let view = StoryView::snapshot(&self.profile, &self.state, &self.store, &self.tracker);
            match self.generator.next_action(&view).await {
                Ok(action) => {
                    tracing::debug!(action = %action.description, "Detective action proposed");
                    return Ok(action);
                }
                Err(e) if e.is_transient() && attempts <= self.config.generation.max_retries => {
                    tracing::warn!(attempt = attempts, error = %e, "Retrying action generation");
                }
                Err(e) => {
                    return Err(GenerationError::new(GenerationErrorKind::ActionFailed {
                        attempts,
                        message: e.to_string(),
                    })
                    .into());
                }
            }
        }
    }

    /// Runs the collision oracle, retrying transient failures.
    async fn classify(&mut self, action: &ProposedAction) -> MirageResult<CollisionOutcome> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.oracle.detect(action, &self.store, &self.tracker).await {
                Ok(outcome) => return Ok(outcome),
                Err(e) if e.is_transient() && attempts <= self.config.generation.max_retries => {
                    tracing::warn!(attempt = attempts, error = %e, "Retrying collision check");
                }
                Err(e) => {
                    return Err(GenerationError::new(GenerationErrorKind::OracleFailed {
                        attempts,
                        message: e.to_string(),
                    })
                    .into());
                }
            }
        }
    }

    /// Defuses a collision through an intervention, or latches forced
    /// resolution when the conspiracy has nothing left.
    async fn handle_collision(
        &mut self,
        action: ProposedAction,
        report: CollisionReport,
    ) -> MirageResult<()> {
        let sequence = self.state.next_sequence();
        match self.selector.select(&report, &self.store).await {
            Ok(intervention) => {
                let closer = format!("plot_point_{}", sequence);
                let mut closed = Vec::new();
                for path_id in &report.affected_paths {
                    if self.tracker.path(path_id).is_some_and(|p| p.is_open()) {
                        self.tracker.close_path(path_id, &closer)?;
                        self.state.cut_success(self.rng.gen_range(0.03..0.07));
                        closed.push(path_id.clone());
                    }
                }

                let suspense = self.policy.on_collision(*self.state.suspense_level());
                self.state.cut_success(self.rng.gen_range(0.06..0.12));

                let move_text = match intervention.kind {
                    InterventionKind::Misdirect => "steers the inquiry elsewhere",
                    InterventionKind::FalseExplanation => "offers an innocent explanation",
                    InterventionKind::ClosePath => "quietly shuts the route down",
                    InterventionKind::PlantEvidence => "salts the trail with fresh evidence",
                };
                let description = format!(
                    "Detective {} but {} {}",
                    action.description, intervention.conspirator, move_text
                );
                let learns = format!("Accepts {}'s explanation", intervention.conspirator);
                let reveal = format!(
                    "The reader sees {} actively protecting the conspiracy",
                    intervention.conspirator
                );

                let point = PlotPoint::builder()
                    .sequence(sequence)
                    .description(description.clone())
                    .detective_action(action.description.clone())
                    .conspirator_intervention(format!(
                        "{}: {}",
                        intervention.conspirator, intervention.justification
                    ))
                    .reveal(reveal)
                    .detective_learns(learns.clone())
                    .paths_closed(closed)
                    .suspense(suspense)
                    .collision(true)
                    .build()
                    .expect("complete plot point");

                self.state.record_action(ActionRecord {
                    action: action.description,
                    outcome: description,
                    was_blocked: true,
                    blocked_by: Some(intervention.conspirator),
                    obstacle: None,
                    detective_learned: Some(learns.clone()),
                });
                self.state.learn(learns);
                self.state.push_plot_point(point);
                Ok(())
            }
            Err(e) if e.is_exhausted() => {
                tracing::warn!(exposed = %report.exposed, "No cover left; forcing resolution");
                let suspense = self.policy.on_collision(*self.state.suspense_level());
                let description = format!(
                    "Detective {} and no one moves to stop it",
                    action.description
                );
                let learns = format!(
                    "Senses the explanations around {} are thinner than they should be",
                    report.exposed
                );
                let reveal = format!(
                    "No cover remains for {}; the conspiracy is cracking",
                    report.exposed
                );

                let point = PlotPoint::builder()
                    .sequence(sequence)
                    .description(description.clone())
                    .detective_action(action.description.clone())
                    .reveal(reveal)
                    .detective_learns(learns.clone())
                    .suspense(suspense)
                    .collision(true)
                    .build()
                    .expect("complete plot point");

                self.state.record_action(ActionRecord {
                    action: action.description,
                    outcome: description,
                    was_blocked: false,
                    blocked_by: None,
                    obstacle: None,
                    detective_learned: Some(learns.clone()),
                });
                self.state.learn(learns);
                self.state.push_plot_point(point);
                self.state.force_resolution();
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Standard progress: obstacle, evidence advance, or alibi check.
    fn handle_clear(&mut self, action: ProposedAction) -> MirageResult<()> {
        let sequence = self.state.next_sequence();

        if self.rng.gen_range(0.0..1.0) < self.config.suspense.obstacle_probability {
            let obstacle = OBSTACLES[self.rng.gen_range(0..OBSTACLES.len())].to_string();
            let suspense = self.policy.on_obstacle(*self.state.suspense_level());
            self.state.cut_success(self.rng.gen_range(0.02..0.05));

            let description = format!("Detective {} but {}", action.description, obstacle);
            let point = PlotPoint::builder()
                .sequence(sequence)
                .description(description.clone())
                .detective_action(action.description.clone())
                .obstacle(obstacle.clone())
                .suspense(suspense)
                .build()
                .expect("complete plot point");

            self.state.record_action(ActionRecord {
                action: action.description,
                outcome: description,
                was_blocked: false,
                blocked_by: None,
                obstacle: Some(obstacle),
                detective_learned: None,
            });
            self.state.push_plot_point(point);
            return Ok(());
        }

        let (description, learns, reveal) = self.progress(&action)?;

        let mut closed = Vec::new();
        if self.rng.gen_range(0.0..1.0) < self.config.suspense.path_close_probability {
            let open = self.tracker.open_paths();
            if !open.is_empty() {
                let pick = self.rng.gen_range(0..open.len());
                let path_id = open[pick].id().clone();
                let closer = format!("plot_point_{}", sequence);
                self.tracker.close_path(&path_id, &closer)?;
                self.state.cut_success(self.rng.gen_range(0.03..0.07));
                closed.push(path_id);
            }
        }

        if self.rng.gen_range(0.0..1.0) < self.config.suspense.new_path_probability {
            let lead_id = format!("lead_{}", self.tracker.paths().len() + 1);
            let difficulty = self.rng.gen_range(6..=9);
            self.tracker.open_new_path(
                DiscoveryPath::new(lead_id, "A new potential lead emerges", Vec::<String>::new())
                    .with_difficulty(difficulty),
            );
            self.state.restore_success(0.02);
        }

        self.state.restore_success(self.rng.gen_range(0.01..0.03));
        let suspense = self.policy.on_progress(*self.state.suspense_level());

        let mut builder = PlotPoint::builder();
        builder
            .sequence(sequence)
            .description(description.clone())
            .detective_action(action.description.clone())
            .detective_learns(learns.clone())
            .paths_closed(closed)
            .suspense(suspense);
        if let Some(reveal) = reveal.clone() {
            builder.reveal(reveal);
        }
        let point = builder.build().expect("complete plot point");

        self.state.record_action(ActionRecord {
            action: action.description,
            outcome: description,
            was_blocked: false,
            blocked_by: None,
            obstacle: None,
            detective_learned: Some(learns.clone()),
        });
        self.state.learn(learns);
        self.state.push_plot_point(point);
        Ok(())
    }

    /// Concrete progress against the pre-generated facts.
    ///
    /// Returns (description, detective_learns, reveal).
    fn progress(
        &mut self,
        action: &ProposedAction,
    ) -> MirageResult<(String, String, Option<String>)> {
        // Targeted evidence advances through the fact store, one step per
        // action; the final step hands the detective the cover meaning.
        if let Some(evidence_id) = action.target_evidence.as_deref() {
            if let Some(evidence) = self.store.crime().evidence_by_id(evidence_id).cloned() {
                if self.store.remaining_steps(evidence_id)? > 0 {
                    let done = self.store.advance_evidence(evidence_id, 1)?;
                    let total = *evidence.steps_total();

                    if done >= total {
                        let cover_meaning = evidence
                            .fabricated_meaning()
                            .clone()
                            .unwrap_or_else(|| {
                                format!(
                                    "evidence implicating {}",
                                    self.store.fabricated().fake_suspect.name
                                )
                            });
                        let learns = format!(
                            "Fully obtained {} at {}: {}",
                            evidence.description(),
                            evidence.location(),
                            cover_meaning
                        );
                        let reveal = evidence
                            .real_meaning()
                            .clone()
                            .map(|m| format!("The reader knows the true meaning: {}", m));
                        let description = format!(
                            "Detective {} and fully obtains {}",
                            action.description,
                            evidence.description()
                        );
                        return Ok((description, learns, reveal));
                    }

                    let learns = format!(
                        "Partial progress on {} ({}/{} steps)",
                        evidence.description(),
                        done,
                        total
                    );
                    let reveal = Some(
                        "The reader knows this evidence runs deeper than the detective has dug"
                            .to_string(),
                    );
                    let description = format!(
                        "Detective {} and makes partial progress examining {} ({}/{})",
                        action.description,
                        evidence.description(),
                        done,
                        total
                    );
                    return Ok((description, learns, reveal));
                }
            }
        }

        // Alibi verification: the claim holds on the surface.
        if let Some(name) = self.state.next_unverified_alibi().map(ToString::to_string) {
            self.state.challenge_alibi(&name);
            let claim = self
                .store
                .fabricated()
                .alibi_for(&name)
                .unwrap_or("claims to have been elsewhere")
                .to_string();
            let learns = format!(
                "Checked {}'s alibi: \"{}\" holds up on the surface",
                name, claim
            );
            let reveal = Some(format!("The reader knows {}'s alibi is manufactured", name));
            let description = format!(
                "Detective {} and verifies {}'s account",
                action.description, name
            );
            return Ok((description, learns, reveal));
        }

        // Generic progress keeps pointing at the fake suspect.
        let learns = format!(
            "Evidence pointing toward {}",
            self.store.fabricated().fake_suspect.name
        );
        let description = format!("Detective {} and finds {}", action.description, learns);
        Ok((description, learns, None))
    }

    /// Emits the single resolution plot point and finishes the story.
    fn resolve(&mut self, reason: &str) {
        self.state.set_phase(StoryPhase::Resolving);
        let sequence = self.state.next_sequence();
        let suspense = self.policy.resolution_level();

        let learns = format!(
            "Concludes {} is the primary suspect",
            self.store.fabricated().fake_suspect.name
        );
        let reveal = format!(
            "The reader watches the truth stay hidden; {}'s secret is safe",
            self.store.crime().criminal.name
        );

        let point = PlotPoint::builder()
            .sequence(sequence)
            .description("The investigation reaches its conclusion".to_string())
            .detective_action(
                "review every thread of evidence and make the final determination".to_string(),
            )
            .reveal(reveal)
            .detective_learns(learns.clone())
            .suspense(suspense)
            .build()
            .expect("complete plot point");

        self.state.learn(learns);
        self.state.push_plot_point(point);
        self.state.set_phase(StoryPhase::Done);
        tracing::info!(
            reason,
            plot_points = self.state.plot_points().len(),
            open_paths = self.tracker.open_path_count(),
            "Story resolved"
        );
    }
}
