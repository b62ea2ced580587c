//! Detective action generation.
//!
//! The engine never assumes how action text is produced (model, template,
//! human); it only sees the [`ActionGenerator`] interface. A built-in
//! agenda-driven generator covers tests and the CLI without a model.

use crate::{StoryView, Urgency};
use async_trait::async_trait;
use mirage_error::GenerationError;
use serde::{Deserialize, Serialize};

/// An action the detective proposes to take next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedAction {
    /// Free-text description of the action
    pub description: String,
    /// Evidence the action is aimed at, when it targets a specific item
    pub target_evidence: Option<String>,
}

impl ProposedAction {
    /// Creates an untargeted action.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            target_evidence: None,
        }
    }

    /// Creates an action aimed at a specific evidence item.
    pub fn targeting(description: impl Into<String>, evidence_id: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            target_evidence: Some(evidence_id.into()),
        }
    }
}

/// Produces the detective's next investigative action.
///
/// Implementations see only the detective-facing [`StoryView`]; the real
/// fact layer is never part of the snapshot. Transient failures should be
/// reported as such so the controller can retry within its bound; a
/// timeout must surface as an error, never as a silent default action.
#[async_trait]
pub trait ActionGenerator: Send + Sync {
    /// Proposes the next action for the given snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`GenerationError`]; `is_transient` errors are retried
    /// by the controller up to its configured bound.
    async fn next_action(&mut self, view: &StoryView<'_>) -> Result<ProposedAction, GenerationError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str {
        "action-generator"
    }
}

/// Deterministic generator that walks the investigation agenda.
///
/// Picks, in order: evidence already in progress, untouched evidence, an
/// unverified alibi, then case-file review. Mirrors what a competent
/// investigator would do with the same menu, which keeps CLI runs and
/// tests meaningful without a model in the loop.
#[derive(Debug, Default)]
pub struct AgendaGenerator;

impl AgendaGenerator {
    /// Creates the generator.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ActionGenerator for AgendaGenerator {
    async fn next_action(&mut self, view: &StoryView<'_>) -> Result<ProposedAction, GenerationError> {
        // Finish what is already started before opening new threads.
        if let Some(lead) = view
            .agenda
            .evidence
            .iter()
            .find(|e| e.steps_completed > 0)
            .or_else(|| view.agenda.evidence.first())
        {
            let verb = match view.urgency() {
                Urgency::Critical | Urgency::Urgent => "push hard on",
                _ => "examine",
            };
            return Ok(ProposedAction::targeting(
                format!("{} the {} at {}", verb, lead.description, lead.location),
                lead.id.clone(),
            ));
        }

        if let Some(alibi) = view
            .agenda
            .alibis
            .iter()
            .find(|a| a.status == crate::AlibiStatus::Unverified)
        {
            return Ok(ProposedAction::new(format!(
                "verify {}'s claim of being {}",
                alibi.name, alibi.claim
            )));
        }

        Ok(ProposedAction::new(format!(
            "review the case file against {}'s alleged motive",
            view.agenda.prime_suspect
        )))
    }

    fn name(&self) -> &str {
        "agenda-generator"
    }
}
