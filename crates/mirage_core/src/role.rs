//! Character role types.

use serde::{Deserialize, Serialize};

/// Roles a character can play in the story.
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
pub enum CharacterRole {
    Criminal,
    Conspirator,
    Victim,
    Detective,
    Witness,
    Suspect,
    Bystander,
}
