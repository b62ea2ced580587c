//! Evidence types.

use serde::{Deserialize, Serialize};

/// Types of evidence in the story.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EvidenceType {
    Physical,
    Testimonial,
    Documentary,
    Digital,
    Circumstantial,
}

/// A piece of evidence in the crime world.
///
/// The record itself is immutable ground truth; discovery progress is
/// tracked separately in the fact store ledger so nothing outside that
/// single accessor can move `steps_completed`.
///
/// `real_meaning` is reader-only: it must never reach detective-facing
/// output until the reveal annotation on a plot point exposes it.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct Evidence {
    /// Unique identifier within a scenario (e.g. "E1")
    id: String,
    /// What the evidence looks like to an investigator
    description: String,
    /// Evidence category
    evidence_type: EvidenceType,
    /// Where it can be found
    location: String,
    /// How many investigative actions fully reveal it
    #[serde(default = "default_steps_total")]
    #[builder(default = "1")]
    steps_total: u32,
    /// What the evidence actually proves (reader layer)
    #[serde(default)]
    #[builder(setter(into, strip_option), default)]
    real_meaning: Option<String>,
    /// What conspirators want the detective to conclude from it
    #[serde(default)]
    #[builder(setter(into, strip_option), default)]
    fabricated_meaning: Option<String>,
    /// Whether the conspirators planted it
    #[serde(default)]
    #[builder(default)]
    is_planted: bool,
}

fn default_steps_total() -> u32 {
    1
}

impl Evidence {
    /// Returns a builder for constructing evidence.
    pub fn builder() -> EvidenceBuilder {
        EvidenceBuilder::default()
    }

    /// Whether the true and cover interpretations diverge.
    ///
    /// Evidence without both meanings carries no dramatic-irony gap and
    /// cannot trigger a meaning-exposure collision.
    pub fn is_double_coded(&self) -> bool {
        self.real_meaning.is_some() && self.fabricated_meaning.is_some()
    }
}
