//! Detective protagonist profile.

use serde::{Deserialize, Serialize};

/// The investigator driving the story, with personal stakes.
///
/// Stakes, consequence, and deadline are the reader-affinity levers: a
/// protagonist worth caring about, an objective with personal meaning,
/// and a specific bad outcome if they fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectiveProfile {
    /// Detective's name
    pub name: String,
    /// Professional background
    pub background: String,
    /// Why this case matters to them personally
    pub personal_stakes: String,
    /// What happens if the investigation fails
    pub dire_consequence: String,
    /// Why the clock is running
    pub deadline_reason: String,
}

impl Default for DetectiveProfile {
    fn default() -> Self {
        Self {
            name: "Detective Morgan".to_string(),
            background: "Veteran detective with fifteen years on the force".to_string(),
            personal_stakes: "This case mirrors an unsolved one that still haunts them"
                .to_string(),
            dire_consequence: "The real criminal escapes and an innocent person is convicted"
                .to_string(),
            deadline_reason: "Key evidence will be destroyed in seventy-two hours".to_string(),
        }
    }
}
