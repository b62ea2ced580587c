//! Conspirator interventions that defuse collisions.

use crate::{CollisionReport, FactStore};
use async_trait::async_trait;
use mirage_error::{InterventionError, InterventionErrorKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a conspirator responds to a collision.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InterventionKind {
    /// Steer the detective toward a different lead
    Misdirect,
    /// Offer an innocent explanation for what was found
    FalseExplanation,
    /// Remove the route to the truth outright
    ClosePath,
    /// Seed new evidence pointing at the fake suspect
    PlantEvidence,
}

/// A conspirator's counter-move.
///
/// The selector only chooses; the controller applies the path closures
/// and suspense effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intervention {
    /// Who acts
    pub conspirator: String,
    /// What shape the counter-move takes
    pub kind: InterventionKind,
    /// In-world justification for why it works
    pub justification: String,
}

/// Chooses a misdirection response to a detected collision.
#[async_trait]
pub trait InterventionSelector: Send + Sync {
    /// Selects an intervention for the given collision.
    ///
    /// # Errors
    ///
    /// Returns an exhausted-kind [`InterventionError`] when no conspirator
    /// has cover capacity left; the controller treats that as a forced
    /// escalation toward resolution rather than an abort.
    async fn select(
        &mut self,
        report: &CollisionReport,
        store: &FactStore,
    ) -> Result<Intervention, InterventionError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str {
        "intervention-selector"
    }
}

/// Default selector driven by conspirator leverage.
///
/// Each conspirator can cover a bounded number of collisions before their
/// leverage is spent. The threatened conspirator acts when they still
/// can; otherwise whoever has the most cover left steps in. Once nobody
/// can act, the conspiracy is cracking.
pub struct LeverageSelector {
    capacity: BTreeMap<String, u32>,
}

impl LeverageSelector {
    /// Creates a selector giving every conspirator the same cover budget.
    pub fn new(crime: &mirage_core::CrimeFacts, cover_capacity: u32) -> Self {
        let capacity = crime
            .conspirators
            .iter()
            .map(|c| (c.name.clone(), cover_capacity))
            .collect();
        Self { capacity }
    }

    /// Remaining cover for a conspirator.
    pub fn remaining_cover(&self, name: &str) -> u32 {
        self.capacity.get(name).copied().unwrap_or(0)
    }

    /// Marks a conspirator's leverage as fully spent.
    pub fn spend_all(&mut self, name: &str) {
        if let Some(capacity) = self.capacity.get_mut(name) {
            *capacity = 0;
        }
    }

    fn pick_actor(&self, threatened: &str) -> Option<(String, u32)> {
        if let Some(&remaining) = self.capacity.get(threatened) {
            if remaining > 0 {
                return Some((threatened.to_string(), remaining));
            }
        }
        self.capacity
            .iter()
            .filter(|&(_, &remaining)| remaining > 0)
            .max_by_key(|&(_, &remaining)| remaining)
            .map(|(name, &remaining)| (name.clone(), remaining))
    }
}

#[async_trait]
impl InterventionSelector for LeverageSelector {
    #[tracing::instrument(skip_all, fields(threatened = %report.threatened_conspirator))]
    async fn select(
        &mut self,
        report: &CollisionReport,
        store: &FactStore,
    ) -> Result<Intervention, InterventionError> {
        let (actor, remaining) =
            self.pick_actor(&report.threatened_conspirator).ok_or_else(|| {
                InterventionError::new(InterventionErrorKind::Exhausted {
                    exposed: report.exposed.clone(),
                })
            })?;

        let conspirator = store.crime().conspirator_by_name(&actor).ok_or_else(|| {
            InterventionError::new(InterventionErrorKind::UnknownConspirator(actor.clone()))
        })?;

        // Escalate as cover runs out: explanations first, then the
        // heavier moves that actively reshape the evidence landscape.
        let kind = if report.vulnerable_evidence.is_some() {
            InterventionKind::FalseExplanation
        } else if remaining == 1 {
            if store.fabricated().planted_evidence.is_empty() {
                InterventionKind::ClosePath
            } else {
                InterventionKind::PlantEvidence
            }
        } else if report.affected_paths.is_empty() {
            InterventionKind::Misdirect
        } else {
            InterventionKind::ClosePath
        };

        let leverage = conspirator
            .leverage
            .as_deref()
            .unwrap_or("a position of trust");
        let justification = format!(
            "{} leans on {} to keep {} buried",
            conspirator.name, leverage, report.exposed
        );

        if let Some(capacity) = self.capacity.get_mut(&actor) {
            *capacity = capacity.saturating_sub(1);
        }
        tracing::info!(
            actor = %actor,
            kind = %kind,
            cover_left = self.remaining_cover(&actor),
            "Intervention selected"
        );

        Ok(Intervention {
            conspirator: actor,
            kind,
            justification,
        })
    }

    fn name(&self) -> &str {
        "leverage-selector"
    }
}
