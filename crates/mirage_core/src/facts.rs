//! The two parallel fact layers.
//!
//! `CrimeFacts` is the reader's ground truth and `FabricatedFacts` is the
//! conspiracy's substitute reality. They are independent structures bound
//! by an explicit [`CoverMap`] rather than one object with hidden fields,
//! so real meanings cannot leak into detective-facing output by accident.

use crate::{Character, Evidence, Timeline};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The real crime facts.
///
/// Immutable after initial generation: later phases read it but never
/// write it. Discovery progress lives in the fact store ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
pub struct CrimeFacts {
    /// Kind of crime (e.g. "poisoning")
    pub crime_type: String,
    /// Where the crime took place
    pub location: String,
    /// Who was wronged
    pub victim: Character,
    /// Who actually did it
    pub criminal: Character,
    /// Everyone actively shielding the criminal
    pub conspirators: Vec<Character>,
    /// Why the crime happened
    pub motive: String,
    /// How the crime was carried out
    pub method: String,
    /// How conspirators coordinate their cover-up
    pub coordination_plan: String,
    /// What actually happened, in order
    #[serde(default)]
    #[builder(default)]
    pub timeline: Timeline,
    /// All real evidence in the world
    #[serde(default)]
    #[builder(default)]
    pub evidence: Vec<Evidence>,
}

impl CrimeFacts {
    /// Returns a builder for constructing crime facts.
    pub fn builder() -> CrimeFactsBuilder {
        CrimeFactsBuilder::default()
    }

    /// Looks up evidence by id.
    pub fn evidence_by_id(&self, id: &str) -> Option<&Evidence> {
        self.evidence.iter().find(|e| e.id() == id)
    }

    /// Looks up a conspirator by name.
    pub fn conspirator_by_name(&self, name: &str) -> Option<&Character> {
        self.conspirators.iter().find(|c| c.name == name)
    }
}

/// The fabricated crime narrative shown to the detective.
///
/// Generated once from [`CrimeFacts`], then a read-only baseline;
/// interventions reference its alibi strings but never mutate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
pub struct FabricatedFacts {
    /// Who the conspirators frame
    pub fake_suspect: Character,
    /// The invented motive pinned on the fake suspect
    pub fake_motive: String,
    /// The invented method
    pub fake_method: String,
    /// The cover chronology
    #[serde(default)]
    #[builder(default)]
    pub fake_timeline: Timeline,
    /// Evidence the conspirators planted
    #[serde(default)]
    #[builder(default)]
    pub planted_evidence: Vec<Evidence>,
    /// Conspirator name to assigned alibi statement
    #[serde(default)]
    #[builder(default)]
    pub alibis: BTreeMap<String, String>,
    /// The overall story the conspiracy tells
    pub cover_story: String,
}

impl FabricatedFacts {
    /// Returns a builder for constructing fabricated facts.
    pub fn builder() -> FabricatedFactsBuilder {
        FabricatedFactsBuilder::default()
    }

    /// The alibi assigned to a conspirator, if any.
    pub fn alibi_for(&self, name: &str) -> Option<&str> {
        self.alibis.get(name).map(String::as_str)
    }
}

/// One real fact covered by one fabricated element.
///
/// Both sides are tagged references ("evidence:E2", "alibi:Ada Quill",
/// "planted:P1", "motive") rather than struct pointers, keeping the map
/// serializable alongside the scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverEntry {
    /// Reference into the real layer
    pub real_fact: String,
    /// Reference into the fabricated layer that covers it
    pub covered_by: String,
}

/// Explicit binding between the two layers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CoverMap {
    /// Cover bindings in scenario order
    #[serde(default)]
    pub entries: Vec<CoverEntry>,
}

impl CoverMap {
    /// Creates an empty cover map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a binding.
    pub fn bind(&mut self, real_fact: impl Into<String>, covered_by: impl Into<String>) {
        self.entries.push(CoverEntry {
            real_fact: real_fact.into(),
            covered_by: covered_by.into(),
        });
    }

    /// All fabricated elements covering the given real fact.
    pub fn covers_of(&self, real_fact: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.real_fact == real_fact)
            .map(|e| e.covered_by.as_str())
            .collect()
    }

    /// Whether any fabricated element covers the given real fact.
    pub fn is_covered(&self, real_fact: &str) -> bool {
        self.entries.iter().any(|e| e.real_fact == real_fact)
    }
}
