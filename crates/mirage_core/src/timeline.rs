//! Timeline of events for a fact layer.

use serde::{Deserialize, Serialize};

/// A single event on a timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// When the event occurred, freeform (e.g. "23:40")
    pub time: String,
    /// What happened
    pub description: String,
    /// Who did it
    pub actor: String,
    /// Where it happened
    pub location: String,
}

/// An ordered sequence of events.
///
/// Each fact layer carries its own timeline; the real one is ground truth
/// and the fabricated one is the cover chronology.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Timeline {
    /// Events in story order
    #[serde(default)]
    pub events: Vec<TimelineEvent>,
}

impl Timeline {
    /// Creates an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn add_event(
        &mut self,
        time: impl Into<String>,
        description: impl Into<String>,
        actor: impl Into<String>,
        location: impl Into<String>,
    ) {
        self.events.push(TimelineEvent {
            time: time.into(),
            description: description.into(),
            actor: actor.into(),
            location: location.into(),
        });
    }

    /// Iterates events in order.
    pub fn iter(&self) -> impl Iterator<Item = &TimelineEvent> {
        self.events.iter()
    }
}
