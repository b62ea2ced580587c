//! Character types for both fact layers.

use crate::CharacterRole;
use serde::{Deserialize, Serialize};

/// A character in the story world.
///
/// The same type serves both layers: real characters live in
/// [`crate::CrimeFacts`], while the fabricated layer reuses it for the
/// fake suspect so the two structures stay parallel without inheritance.
///
/// # Examples
///
/// ```
/// use mirage_core::{Character, CharacterRole};
///
/// let porter = Character::new("Ada Quill", CharacterRole::Conspirator, "night porter");
/// assert!(!porter.has_mmo());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Character name, unique within a scenario
    pub name: String,
    /// Narrative role
    pub role: CharacterRole,
    /// Day job, used to flavor interventions and alibis
    pub occupation: String,
    /// Why they would commit the crime
    #[serde(default)]
    pub motive: Option<String>,
    /// How they could have done it
    #[serde(default)]
    pub means: Option<String>,
    /// When they could have done it
    #[serde(default)]
    pub opportunity: Option<String>,
    /// The story they tell about their whereabouts
    #[serde(default)]
    pub alibi: Option<String>,
    /// Hidden information about the character
    #[serde(default)]
    pub secret: Option<String>,
    /// What keeps a conspirator loyal to the cover-up
    #[serde(default)]
    pub leverage: Option<String>,
    /// Connection to the victim
    #[serde(default)]
    pub relationship_to_victim: Option<String>,
    /// Whether the character actively protects the conspiracy
    #[serde(default)]
    pub is_conspirator: bool,
}

impl Character {
    /// Creates a character with only the required fields set.
    pub fn new(
        name: impl Into<String>,
        role: CharacterRole,
        occupation: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            role,
            occupation: occupation.into(),
            motive: None,
            means: None,
            opportunity: None,
            alibi: None,
            secret: None,
            leverage: None,
            relationship_to_victim: None,
            is_conspirator: false,
        }
    }

    /// Whether the character has means, motive, and opportunity.
    pub fn has_mmo(&self) -> bool {
        self.means.is_some() && self.motive.is_some() && self.opportunity.is_some()
    }
}
