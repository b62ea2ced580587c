//! Core data types for the Mirage story generation library.
//!
//! This crate provides the dual-layer data model shared across the
//! Mirage workspace: the real crime facts the reader sees, the
//! fabricated narrative the detective sees, the discovery paths between
//! them, and the plot point records the engine emits.

mod character;
mod config;
mod detective;
mod evidence;
mod facts;
mod path;
mod plot;
mod role;
mod scenario;
mod timeline;

pub use character::Character;
pub use config::{GenerationConfig, MirageConfig, OutputConfig, OutputFormat, SuspenseConfig};
pub use detective::DetectiveProfile;
pub use evidence::{Evidence, EvidenceBuilder, EvidenceType};
pub use facts::{
    CoverEntry, CoverMap, CrimeFacts, CrimeFactsBuilder, FabricatedFacts, FabricatedFactsBuilder,
};
pub use path::{DiscoveryPath, PathState};
pub use plot::{PlotPoint, PlotPointBuilder};
pub use role::CharacterRole;
pub use scenario::{CrimeScenario, ScenarioValidation};
pub use timeline::{Timeline, TimelineEvent};
