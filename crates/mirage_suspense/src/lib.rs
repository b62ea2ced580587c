//! Suspense meta-controller and dual-layer plot engine for Mirage.
//!
//! The engine tracks two parallel fact layers, detects when the
//! detective's next action would expose the truth, and decides whether a
//! conspirator intervenes, how suspense moves, and when the story must
//! resolve. External capabilities (action generation, collision judgment,
//! intervention choice, suspense scoring) plug in behind traits.

mod action;
mod collision;
mod controller;
mod intervention;
mod policy;
mod state;
mod store;
mod tracker;
mod view;

pub use action::{ActionGenerator, AgendaGenerator, ProposedAction};
pub use collision::{CollisionOracle, CollisionOutcome, CollisionReport, KeywordOracle};
pub use controller::{GeneratedStory, SuspenseController};
pub use intervention::{
    Intervention, InterventionKind, InterventionSelector, LeverageSelector,
};
pub use policy::{RisingTensionPolicy, SuspensePolicy};
pub use state::{ActionRecord, AlibiStatus, StoryPhase, StoryState};
pub use store::FactStore;
pub use tracker::PathTracker;
pub use view::{AlibiLead, EvidenceLead, InvestigationAgenda, StoryView, Urgency};
