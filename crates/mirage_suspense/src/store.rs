//! Fact store: read access to both layers, controlled writes to progress.

use mirage_core::{CoverMap, CrimeFacts, Evidence, FabricatedFacts};
use mirage_error::{FactError, FactErrorKind};
use std::collections::BTreeMap;

/// Owns both fact layers and the evidence-progress ledger.
///
/// The layers themselves are immutable after construction. The only
/// mutation the store permits is [`FactStore::advance_evidence`], which is
/// the single point enforcing the `0 <= steps_completed <= steps_total`
/// invariant. Nothing else in the workspace can move evidence progress.
pub struct FactStore {
    crime: CrimeFacts,
    fabricated: FabricatedFacts,
    cover: CoverMap,
    progress: BTreeMap<String, u32>,
}

impl FactStore {
    /// Creates a store with zeroed progress for every real evidence item.
    pub fn new(crime: CrimeFacts, fabricated: FabricatedFacts, cover: CoverMap) -> Self {
        let progress = crime
            .evidence
            .iter()
            .map(|e| (e.id().clone(), 0))
            .collect();
        Self {
            crime,
            fabricated,
            cover,
            progress,
        }
    }

    /// The real layer.
    pub fn crime(&self) -> &CrimeFacts {
        &self.crime
    }

    /// The fabricated layer.
    pub fn fabricated(&self) -> &FabricatedFacts {
        &self.fabricated
    }

    /// The explicit binding between the layers.
    pub fn cover(&self) -> &CoverMap {
        &self.cover
    }

    /// Steps completed for the given evidence.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEvidence` when the id is not in the real layer.
    pub fn steps_completed(&self, evidence_id: &str) -> Result<u32, FactError> {
        self.progress.get(evidence_id).copied().ok_or_else(|| {
            FactError::new(FactErrorKind::UnknownEvidence(evidence_id.to_string()))
        })
    }

    /// Steps still needed to fully resolve the given evidence.
    pub fn remaining_steps(&self, evidence_id: &str) -> Result<u32, FactError> {
        let evidence = self.require(evidence_id)?;
        let done = self.steps_completed(evidence_id)?;
        Ok(evidence.steps_total().saturating_sub(done))
    }

    /// Whether the evidence is fully resolved.
    pub fn is_resolved(&self, evidence_id: &str) -> Result<bool, FactError> {
        Ok(self.remaining_steps(evidence_id)? == 0)
    }

    /// Advances (or rewinds) evidence progress by `delta` steps.
    ///
    /// Returns the new `steps_completed`. On failure the ledger is left
    /// untouched: an out-of-range advance is a caller error, never a
    /// clamp, because progress accounting feeds the collision and
    /// suspense logic downstream.
    ///
    /// # Errors
    ///
    /// `UnknownEvidence` for ids absent from the real layer; `OutOfRange`
    /// when the result would leave `[0, steps_total]`.
    #[tracing::instrument(skip(self))]
    pub fn advance_evidence(&mut self, evidence_id: &str, delta: i32) -> Result<u32, FactError> {
        let steps_total = *self.require(evidence_id)?.steps_total();
        let current = self.steps_completed(evidence_id)?;

        let next = i64::from(current) + i64::from(delta);
        if next < 0 || next > i64::from(steps_total) {
            return Err(FactError::new(FactErrorKind::OutOfRange {
                evidence: evidence_id.to_string(),
                steps_completed: current,
                delta,
                steps_total,
            }));
        }

        let next = next as u32;
        self.progress.insert(evidence_id.to_string(), next);
        tracing::debug!(
            evidence = evidence_id,
            steps_completed = next,
            steps_total,
            "Evidence progress advanced"
        );
        Ok(next)
    }

    /// Real evidence not yet fully resolved, in scenario order.
    pub fn unresolved_evidence(&self) -> Vec<&Evidence> {
        self.crime
            .evidence
            .iter()
            .filter(|e| {
                self.progress
                    .get(e.id())
                    .is_some_and(|done| done < e.steps_total())
            })
            .collect()
    }

    fn require(&self, evidence_id: &str) -> Result<&Evidence, FactError> {
        self.crime.evidence_by_id(evidence_id).ok_or_else(|| {
            FactError::new(FactErrorKind::UnknownEvidence(evidence_id.to_string()))
        })
    }
}
