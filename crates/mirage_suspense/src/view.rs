//! Read-only snapshots handed to the action generator.
//!
//! The view carries only the detective-facing surface: evidence
//! descriptions and progress, alibi claims, the fabricated suspect, and
//! the accumulated history. Real meanings never enter a view, so a
//! model-backed generator cannot leak them into detective output.

use crate::{ActionRecord, AlibiStatus, FactStore, PathTracker, StoryState};
use mirage_core::DetectiveProfile;
use serde::{Deserialize, Serialize};

/// One evidence item on the investigation agenda.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceLead {
    /// Evidence id
    pub id: String,
    /// What it looks like to an investigator
    pub description: String,
    /// Where to find it
    pub location: String,
    /// Investigative steps already spent on it
    pub steps_completed: u32,
    /// Steps required to fully obtain it
    pub steps_total: u32,
}

impl EvidenceLead {
    /// Whether more work on this item remains.
    pub fn needs_work(&self) -> bool {
        self.steps_completed < self.steps_total
    }
}

/// One alibi to verify on the investigation agenda.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlibiLead {
    /// Character name
    pub name: String,
    /// Their occupation
    pub occupation: String,
    /// The alibi statement as claimed
    pub claim: String,
    /// Verification status so far
    pub status: AlibiStatus,
}

/// The concrete menu of investigative work still open to the detective.
///
/// Built fresh for every iteration from pre-generated facts, so the
/// generator is always steered toward specific evidence, suspects, and
/// alibis rather than freewheeling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestigationAgenda {
    /// Evidence not yet fully obtained
    pub evidence: Vec<EvidenceLead>,
    /// Alibis and their verification status
    pub alibis: Vec<AlibiLead>,
    /// The suspect the detective currently believes in
    pub prime_suspect: String,
    /// The motive attributed to that suspect
    pub alleged_motive: String,
    /// Where the crime happened
    pub crime_scene: String,
    /// What kind of crime it was
    pub crime_type: String,
}

/// Read-only story snapshot for one generator call.
#[derive(Debug, Clone)]
pub struct StoryView<'a> {
    /// Detective protagonist
    pub profile: &'a DetectiveProfile,
    /// Concrete investigative menu
    pub agenda: InvestigationAgenda,
    /// Descriptions of leads still open
    pub open_leads: Vec<String>,
    /// Every previous action and outcome, in order
    pub history: &'a [ActionRecord],
    /// Facts the detective has accumulated
    pub detective_knowledge: &'a [String],
    /// Current suspense level
    pub suspense_level: u8,
    /// Countdown ticks left
    pub time_remaining: u32,
    /// Countdown length at story start
    pub time_total: u32,
    /// Detective's estimated chance of success
    pub success_probability: f64,
}

impl<'a> StoryView<'a> {
    /// Builds the snapshot for the current iteration.
    pub fn snapshot(
        profile: &'a DetectiveProfile,
        state: &'a StoryState,
        store: &FactStore,
        tracker: &PathTracker,
    ) -> Self {
        let evidence = store
            .crime()
            .evidence
            .iter()
            .map(|e| EvidenceLead {
                id: e.id().clone(),
                description: e.description().clone(),
                location: e.location().clone(),
                steps_completed: store.steps_completed(e.id()).unwrap_or(0),
                steps_total: *e.steps_total(),
            })
            .filter(EvidenceLead::needs_work)
            .collect();

        let alibis = state
            .alibi_status()
            .iter()
            .map(|(name, status)| {
                let occupation = store
                    .crime()
                    .conspirator_by_name(name)
                    .map(|c| c.occupation.clone())
                    .unwrap_or_default();
                let claim = store
                    .fabricated()
                    .alibi_for(name)
                    .unwrap_or("claims to have been elsewhere")
                    .to_string();
                AlibiLead {
                    name: name.clone(),
                    occupation,
                    claim,
                    status: *status,
                }
            })
            .collect();

        let agenda = InvestigationAgenda {
            evidence,
            alibis,
            prime_suspect: store.fabricated().fake_suspect.name.clone(),
            alleged_motive: store.fabricated().fake_motive.clone(),
            crime_scene: store.crime().location.clone(),
            crime_type: store.crime().crime_type.clone(),
        };

        let open_leads = tracker
            .open_paths()
            .iter()
            .map(|p| p.description().clone())
            .collect();

        Self {
            profile,
            agenda,
            open_leads,
            history: state.action_history(),
            detective_knowledge: state.detective_knowledge(),
            suspense_level: *state.suspense_level(),
            time_remaining: *state.time_remaining(),
            time_total: *state.time_total(),
            success_probability: *state.success_probability(),
        }
    }

    /// How pressing the countdown feels right now.
    pub fn urgency(&self) -> Urgency {
        let ratio = if self.time_total == 0 {
            0.0
        } else {
            f64::from(self.time_remaining) / f64::from(self.time_total)
        };
        if ratio <= 0.15 {
            Urgency::Critical
        } else if ratio <= 0.3 {
            Urgency::Urgent
        } else if ratio <= 0.5 {
            Urgency::Ticking
        } else {
            Urgency::Manageable
        }
    }
}

/// Countdown pressure bands, from the deadline's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Urgency {
    Manageable,
    Ticking,
    Urgent,
    Critical,
}
