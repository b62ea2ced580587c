//! Crime scenario loading and validation.
//!
//! A scenario bundles both fact layers, their cover bindings, and the
//! initial discovery paths, defined in a TOML file. Validation catches
//! cross-layer inconsistencies before the engine ever sees them.

use crate::{CoverMap, CrimeFacts, DiscoveryPath, FabricatedFacts};
use mirage_error::{ScenarioError, ScenarioErrorKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A complete story premise: both layers plus the routes to the truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrimeScenario {
    /// The real layer (reader ground truth)
    pub crime: CrimeFacts,
    /// The fabricated layer (detective baseline)
    pub fabricated: FabricatedFacts,
    /// Explicit binding between the layers
    #[serde(default)]
    pub cover: CoverMap,
    /// Initial discovery paths
    pub paths: Vec<DiscoveryPath>,
}

/// Result of validating a crime scenario.
#[derive(Debug, Clone, Default)]
pub struct ScenarioValidation {
    /// Validation errors (must be fixed)
    pub errors: Vec<ScenarioErrorKind>,
    /// Validation warnings (should be reviewed)
    pub warnings: Vec<String>,
}

impl ScenarioValidation {
    /// Returns true if validation passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Formats errors as a human-readable string.
    pub fn format_errors(&self) -> String {
        self.errors
            .iter()
            .enumerate()
            .map(|(i, e)| format!("Error {}: {}", i + 1, e))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl CrimeScenario {
    /// Parses a scenario from TOML text.
    ///
    /// # Errors
    ///
    /// Returns a `TomlParse` error when the text is not a valid scenario
    /// document. Parsing does not validate cross-layer consistency; call
    /// [`CrimeScenario::validate`] or load via [`CrimeScenario::load`].
    pub fn from_toml_str(text: &str) -> Result<Self, ScenarioError> {
        toml::from_str(text)
            .map_err(|e| ScenarioError::new(ScenarioErrorKind::TomlParse(e.to_string())))
    }

    /// Reads and parses a scenario file, then validates it.
    ///
    /// # Errors
    ///
    /// Returns the read/parse error, or the first validation error when
    /// the scenario is internally inconsistent.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ScenarioError::new(ScenarioErrorKind::FileRead(e.to_string())))?;
        let scenario = Self::from_toml_str(&text)?;

        let validation = scenario.validate();
        for warning in &validation.warnings {
            tracing::warn!(warning = %warning, "Scenario warning");
        }
        if let Some(first) = validation.errors.into_iter().next() {
            return Err(ScenarioError::new(first));
        }

        tracing::info!(
            evidence = scenario.crime.evidence.len(),
            conspirators = scenario.crime.conspirators.len(),
            paths = scenario.paths.len(),
            "Loaded crime scenario"
        );
        Ok(scenario)
    }

    /// Checks cross-layer consistency, reporting every problem found.
    pub fn validate(&self) -> ScenarioValidation {
        let mut result = ScenarioValidation::default();

        if self.crime.conspirators.is_empty() {
            result.errors.push(ScenarioErrorKind::NoConspirators);
        }
        if self.paths.is_empty() {
            result.errors.push(ScenarioErrorKind::NoDiscoveryPaths);
        }

        // Evidence ids must be unique across both layers.
        let mut seen = HashSet::new();
        for evidence in self
            .crime
            .evidence
            .iter()
            .chain(self.fabricated.planted_evidence.iter())
        {
            if !seen.insert(evidence.id().clone()) {
                result
                    .errors
                    .push(ScenarioErrorKind::DuplicateEvidence(evidence.id().clone()));
            }
            if *evidence.steps_total() == 0 {
                result
                    .errors
                    .push(ScenarioErrorKind::ZeroStepEvidence(evidence.id().clone()));
            }
        }

        // Path chains may only reference real evidence.
        let real_ids: HashSet<&str> = self.crime.evidence.iter().map(|e| e.id().as_str()).collect();
        for path in &self.paths {
            for evidence_id in path.evidence_chain() {
                if !real_ids.contains(evidence_id.as_str()) {
                    result.errors.push(ScenarioErrorKind::UnknownEvidenceRef {
                        path: path.id().clone(),
                        evidence: evidence_id.clone(),
                    });
                }
            }
        }

        // Every conspirator needs a cover alibi in the fabricated layer.
        for conspirator in &self.crime.conspirators {
            if self.fabricated.alibi_for(&conspirator.name).is_none() {
                result
                    .errors
                    .push(ScenarioErrorKind::MissingAlibi(conspirator.name.clone()));
            }
        }

        if self.fabricated.fake_suspect.name == self.crime.criminal.name {
            result.errors.push(ScenarioErrorKind::SuspectNotDistinct(
                self.fabricated.fake_suspect.name.clone(),
            ));
        }

        // Soft checks: the story still works, but the irony gap is thin.
        for evidence in &self.crime.evidence {
            if evidence.real_meaning().is_some() && evidence.fabricated_meaning().is_none() {
                result.warnings.push(format!(
                    "Evidence '{}' has a real meaning but no fabricated cover meaning",
                    evidence.id()
                ));
            }
            if evidence.is_double_coded()
                && !self.cover.is_covered(&format!("evidence:{}", evidence.id()))
            {
                result.warnings.push(format!(
                    "Evidence '{}' is double-coded but has no cover binding",
                    evidence.id()
                ));
            }
        }
        for path in &self.paths {
            if path.evidence_chain().is_empty() && path.involves_character().is_none() {
                result.warnings.push(format!(
                    "Path '{}' has no evidence chain and no character; it can only close by chance",
                    path.id()
                ));
            }
        }

        result
    }
}
