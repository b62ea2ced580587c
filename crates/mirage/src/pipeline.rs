//! Pipeline entry point.
//!
//! The pipeline carries its configuration explicitly; nothing reads
//! ambient process state. One call generates one story; batch generation
//! runs fully independent stories as parallel tasks, the only safe
//! parallelism boundary in the system.

use mirage_core::{CrimeScenario, DetectiveProfile, MirageConfig};
use mirage_error::{GenerationError, GenerationErrorKind, MirageResult};
use mirage_suspense::{
    ActionGenerator, AgendaGenerator, CollisionOracle, GeneratedStory, InterventionSelector,
    KeywordOracle, LeverageSelector, RisingTensionPolicy, SuspenseController, SuspensePolicy,
};
use tokio::task::JoinHandle;

/// Runs the full generation pipeline for crime scenarios.
#[derive(Debug, Clone)]
pub struct StoryPipeline {
    config: MirageConfig,
}

impl StoryPipeline {
    /// Creates a pipeline with the given configuration.
    pub fn new(config: MirageConfig) -> Self {
        Self { config }
    }

    /// The configuration this pipeline runs with.
    pub fn config(&self) -> &MirageConfig {
        &self.config
    }

    /// Generates one story with the built-in capabilities: the
    /// agenda-driven generator, the keyword oracle, the leverage
    /// selector, and the rising-tension policy, all seeded from config.
    pub async fn generate(
        &self,
        scenario: CrimeScenario,
        profile: DetectiveProfile,
    ) -> MirageResult<GeneratedStory> {
        let seed = self.config.seed;
        let oracle = KeywordOracle::new(self.config.suspense.collision_sensitivity, seed);
        let selector =
            LeverageSelector::new(&scenario.crime, self.config.suspense.cover_capacity);
        let policy = RisingTensionPolicy::new(self.config.suspense.max_level, seed);
        self.generate_with(scenario, profile, AgendaGenerator::new(), oracle, selector, policy)
            .await
    }

    /// Generates one story with caller-supplied capabilities.
    pub async fn generate_with<G, O, S, P>(
        &self,
        scenario: CrimeScenario,
        profile: DetectiveProfile,
        generator: G,
        oracle: O,
        selector: S,
        policy: P,
    ) -> MirageResult<GeneratedStory>
    where
        G: ActionGenerator,
        O: CollisionOracle,
        S: InterventionSelector,
        P: SuspensePolicy,
    {
        let controller = SuspenseController::new(
            scenario,
            profile,
            self.config.clone(),
            generator,
            oracle,
            selector,
            policy,
        );
        controller.generate().await
    }

    /// Generates `count` independent stories in parallel.
    ///
    /// Each story gets its own seed offset so batches produce distinct
    /// plots. Stories never share state; a failed story surfaces as a
    /// failed entry without poisoning the rest of the batch.
    #[tracing::instrument(skip(self, scenario))]
    pub async fn generate_batch(
        &self,
        scenario: CrimeScenario,
        count: usize,
    ) -> Vec<MirageResult<GeneratedStory>> {
        let handles: Vec<JoinHandle<MirageResult<GeneratedStory>>> = (0..count)
            .map(|index| {
                let mut config = self.config.clone();
                config.seed = config.seed.wrapping_add(index as u64);
                let scenario = scenario.clone();
                tokio::spawn(async move {
                    StoryPipeline::new(config)
                        .generate(scenario, DetectiveProfile::default())
                        .await
                })
            })
            .collect();

        let mut stories = Vec::with_capacity(count);
        for (index, handle) in handles.into_iter().enumerate() {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(GenerationError::new(GenerationErrorKind::Transient(
                    format!("story task {} aborted: {}", index, e),
                ))
                .into()),
            };
            if let Err(e) = &result {
                tracing::warn!(story = index, error = %e, "Batch story failed");
            }
            stories.push(result);
        }
        stories
    }
}
