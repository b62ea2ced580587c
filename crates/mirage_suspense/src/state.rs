//! Mutable story state owned by the meta-controller.

use mirage_core::PlotPoint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Phases of the controller's state machine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StoryPhase {
    /// Paths comfortably above the threshold; the story is accumulating
    Building,
    /// Paths approaching the threshold; the net is closing
    Tightening,
    /// Threshold reached; the final plot point is being emitted
    Resolving,
    /// Terminal
    Done,
}

/// Verification status of a conspirator's alibi, as the detective sees it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlibiStatus {
    Unverified,
    Challenged,
}

/// One prior detective action and what came of it.
///
/// The full history rides along in every generator snapshot so each new
/// action can be distinct from everything already tried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// What the detective did
    pub action: String,
    /// Narrative outcome
    pub outcome: String,
    /// Whether a conspirator blocked it
    pub was_blocked: bool,
    /// Who blocked it, when blocked
    pub blocked_by: Option<String>,
    /// Mundane obstacle, when one interfered
    pub obstacle: Option<String>,
    /// What the detective took away
    pub detective_learned: Option<String>,
}

/// Current state of one story generation run.
///
/// Owned exclusively by the controller and destroyed when the loop
/// terminates; there is no checkpoint/resume for a partial plot, because
/// suspense and path state are only valid as a complete causal chain.
#[derive(Debug, Clone, Serialize, Deserialize, derive_getters::Getters)]
pub struct StoryState {
    /// Current suspense level (1-10)
    suspense_level: u8,
    /// Facts the detective has accumulated (fabricated layer only)
    detective_knowledge: Vec<String>,
    /// Every action tried so far, in order
    action_history: Vec<ActionRecord>,
    /// Conspirator name to alibi verification status
    alibi_status: BTreeMap<String, AlibiStatus>,
    /// Countdown ticks left before forced resolution
    time_remaining: u32,
    /// Countdown length at story start
    time_total: u32,
    /// Detective's estimated chance of cracking the case
    success_probability: f64,
    /// Plot points emitted so far
    plot_points: Vec<PlotPoint>,
    /// Current controller phase
    phase: StoryPhase,
    /// Latched when the conspiracy can no longer respond
    forced_resolution: bool,
}

/// Success probability never leaves this band; the story keeps a sliver
/// of hope and never promises certainty.
const SUCCESS_FLOOR: f64 = 0.05;
const SUCCESS_CEIL: f64 = 0.8;

impl StoryState {
    /// Creates the opening state for a story.
    pub fn new(
        initial_suspense: u8,
        conspirators: impl IntoIterator<Item = impl Into<String>>,
        time_total: u32,
    ) -> Self {
        Self {
            suspense_level: initial_suspense.max(1),
            detective_knowledge: Vec::new(),
            action_history: Vec::new(),
            alibi_status: conspirators
                .into_iter()
                .map(|name| (name.into(), AlibiStatus::Unverified))
                .collect(),
            time_remaining: time_total,
            time_total,
            success_probability: 0.7,
            plot_points: Vec::new(),
            phase: StoryPhase::Building,
            forced_resolution: false,
        }
    }

    /// Sequence number the next plot point must carry.
    pub fn next_sequence(&self) -> u32 {
        self.plot_points.len() as u32 + 1
    }

    /// Appends a plot point; the sequence is append-only and contiguous.
    pub fn push_plot_point(&mut self, point: PlotPoint) {
        debug_assert_eq!(*point.sequence(), self.next_sequence());
        self.suspense_level = (*point.suspense()).max(1);
        self.plot_points.push(point);
    }

    /// Records an action and its outcome in the accumulated history.
    pub fn record_action(&mut self, record: ActionRecord) {
        self.action_history.push(record);
    }

    /// Adds a fact to the detective's accumulated knowledge.
    pub fn learn(&mut self, fact: impl Into<String>) {
        self.detective_knowledge.push(fact.into());
    }

    /// Marks a conspirator's alibi as challenged; returns false when the
    /// name is unknown or already challenged.
    pub fn challenge_alibi(&mut self, name: &str) -> bool {
        match self.alibi_status.get_mut(name) {
            Some(status @ AlibiStatus::Unverified) => {
                *status = AlibiStatus::Challenged;
                true
            }
            _ => false,
        }
    }

    /// First conspirator whose alibi is still unverified.
    pub fn next_unverified_alibi(&self) -> Option<&str> {
        self.alibi_status
            .iter()
            .find(|(_, status)| **status == AlibiStatus::Unverified)
            .map(|(name, _)| name.as_str())
    }

    /// Burns one countdown tick.
    pub fn tick(&mut self) {
        self.time_remaining = self.time_remaining.saturating_sub(1);
    }

    /// Whether the countdown has run out.
    pub fn out_of_time(&self) -> bool {
        self.time_remaining == 0
    }

    /// Lowers the success estimate, clamped to the floor.
    pub fn cut_success(&mut self, amount: f64) {
        self.success_probability = (self.success_probability - amount).max(SUCCESS_FLOOR);
    }

    /// Raises the success estimate, clamped to the ceiling.
    pub fn restore_success(&mut self, amount: f64) {
        self.success_probability = (self.success_probability + amount).min(SUCCESS_CEIL);
    }

    /// Moves the controller to a new phase.
    pub fn set_phase(&mut self, phase: StoryPhase) {
        if self.phase != phase {
            tracing::info!(from = %self.phase, to = %phase, "Story phase transition");
            self.phase = phase;
        }
    }

    /// Latches forced resolution; the next termination check resolves the
    /// story regardless of open path count.
    pub fn force_resolution(&mut self) {
        self.forced_resolution = true;
    }
}
