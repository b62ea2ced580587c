//! Mirage: dual-layer mystery story generation.
//!
//! A crime scenario defines two parallel realities: the real crime the
//! reader is shown, and the fabricated narrative a conspiracy feeds the
//! detective. The suspense meta-controller walks the investigation
//! forward beat by beat, detecting when the detective would collide with
//! the truth and letting conspirators intervene, until the routes to the
//! truth run out and the story resolves.
//!
//! This crate is the facade: it re-exports the workspace API and adds the
//! pipeline entry point, story assembly, and the embedded sample
//! scenario used by the `mirage` binary.

mod assemble;
mod pipeline;
mod sample;

pub use assemble::{MarkdownAssembler, StoryAssembler};
pub use pipeline::StoryPipeline;
pub use sample::{HARROWGATE_TOML, harrowgate};

pub use mirage_core::{
    Character, CharacterRole, CoverEntry, CoverMap, CrimeFacts, CrimeScenario, DetectiveProfile,
    DiscoveryPath, Evidence, EvidenceType, FabricatedFacts, GenerationConfig, MirageConfig,
    OutputConfig, OutputFormat, PathState, PlotPoint, ScenarioValidation, SuspenseConfig,
    Timeline, TimelineEvent,
};
pub use mirage_error::{MirageError, MirageErrorKind, MirageResult};
pub use mirage_eval::{
    MetricsCalculator, ReaderEvaluation, ReaderSimulator, StoryMetrics, SuspenseTrend,
    check_layer_leak,
};
pub use mirage_suspense::{
    ActionGenerator, AgendaGenerator, CollisionOracle, CollisionOutcome, CollisionReport,
    FactStore, GeneratedStory, Intervention, InterventionKind, InterventionSelector,
    KeywordOracle, LeverageSelector, PathTracker, ProposedAction, RisingTensionPolicy,
    StoryPhase, StoryState, StoryView, SuspenseController, SuspensePolicy,
};
