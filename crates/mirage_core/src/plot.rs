//! Plot point records.

use serde::{Deserialize, Serialize};

/// A single plot point in the generated story.
///
/// Plot points are append-only: the controller assigns contiguous
/// sequence numbers starting at 1 and never rewrites an emitted point.
/// `reveal` carries the reader-layer truth annotation and is present only
/// when the dramatic-irony gap is being made visible.
///
/// # Examples
///
/// ```
/// use mirage_core::PlotPoint;
///
/// let point = PlotPoint::builder()
///     .sequence(1u32)
///     .description("Detective canvases the marina at dawn")
///     .detective_action("canvas the marina")
///     .suspense(3u8)
///     .build()
///     .unwrap();
/// assert!(!point.collision());
/// ```
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
pub struct PlotPoint {
    /// Position in the story, 1-indexed and contiguous
    sequence: u32,
    /// Narrative description of what happened
    description: String,
    /// What the detective did
    detective_action: String,
    /// Conspirator counter-move, when a collision was defused
    #[serde(default)]
    #[builder(setter(into, strip_option), default)]
    conspirator_intervention: Option<String>,
    /// Mundane obstacle that slowed the investigation
    #[serde(default)]
    #[builder(setter(into, strip_option), default)]
    obstacle: Option<String>,
    /// Reader-layer truth annotation
    #[serde(default)]
    #[builder(setter(into, strip_option), default)]
    reveal: Option<String>,
    /// What the detective takes away (fabricated layer only)
    #[serde(default)]
    #[builder(setter(into, strip_option), default)]
    detective_learns: Option<String>,
    /// Discovery paths closed by this point
    #[serde(default)]
    #[builder(default)]
    paths_closed: Vec<String>,
    /// Suspense level (1-10)
    suspense: u8,
    /// Whether the detective brushed against the truth here
    #[serde(default)]
    #[builder(default)]
    collision: bool,
}

impl PlotPoint {
    /// Returns a builder for constructing a plot point.
    pub fn builder() -> PlotPointBuilder {
        PlotPointBuilder::default()
    }

    /// Whether a conspirator acted in this point.
    pub fn has_intervention(&self) -> bool {
        self.conspirator_intervention.is_some()
    }
}
