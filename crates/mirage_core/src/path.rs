//! Discovery paths toward the truth.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a discovery path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathState {
    /// The detective can still traverse this route to the truth
    Open,
    /// An intervention shut the route; it never reopens
    Closed,
}

impl Default for PathState {
    fn default() -> Self {
        PathState::Open
    }
}

/// A potential route from evidence to the true criminal.
///
/// Paths transition open to closed exactly once, via [`DiscoveryPath::close`];
/// there is no way to reopen one. The story may only reach a truth-discovered
/// terminal state while at least one path remains open.
///
/// # Examples
///
/// ```
/// use mirage_core::DiscoveryPath;
///
/// let mut path = DiscoveryPath::new("p1", "Trace the ledger", ["E1", "E2"]);
/// assert!(path.is_open());
/// path.close("plot_point_4");
/// path.close("plot_point_9"); // no-op, keeps the original closer
/// assert_eq!(path.closed_by().as_deref(), Some("plot_point_4"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct DiscoveryPath {
    /// Unique identifier within a scenario
    id: String,
    /// What following this route looks like
    description: String,
    /// Ordered evidence ids that must be resolved to reach the truth
    #[serde(default)]
    evidence_chain: Vec<String>,
    /// Conspirator or witness this route runs through
    #[serde(default)]
    involves_character: Option<String>,
    /// How hard the route is to discover (1-10)
    #[serde(default = "default_difficulty")]
    difficulty: u8,
    /// Current lifecycle state
    #[serde(default)]
    state: PathState,
    /// Which plot point closed the path
    #[serde(default)]
    closed_by: Option<String>,
}

fn default_difficulty() -> u8 {
    5
}

impl DiscoveryPath {
    /// Creates an open path with the given evidence chain.
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        evidence_chain: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            evidence_chain: evidence_chain.into_iter().map(Into::into).collect(),
            involves_character: None,
            difficulty: 5,
            state: PathState::Open,
            closed_by: None,
        }
    }

    /// Sets the character the route runs through.
    pub fn with_character(mut self, name: impl Into<String>) -> Self {
        self.involves_character = Some(name.into());
        self
    }

    /// Sets the discovery difficulty.
    pub fn with_difficulty(mut self, difficulty: u8) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Whether the path is still open.
    pub fn is_open(&self) -> bool {
        self.state == PathState::Open
    }

    /// Whether the path's chain includes the given evidence.
    pub fn touches(&self, evidence_id: &str) -> bool {
        self.evidence_chain.iter().any(|e| e == evidence_id)
    }

    /// Closes the path, recording what closed it.
    ///
    /// Idempotent: closing an already-closed path is a no-op and keeps
    /// the original closer.
    pub fn close(&mut self, closed_by: impl Into<String>) {
        if self.state == PathState::Open {
            self.state = PathState::Closed;
            self.closed_by = Some(closed_by.into());
        }
    }
}
