//! Story assembly from plot points.
//!
//! Prose-level assembly is a model-backed concern behind the
//! [`StoryAssembler`] trait; the markdown assembler here renders the
//! dual-layer transcript deterministically, keeping the reader
//! annotations visually separate from what the detective believes.

use async_trait::async_trait;
use mirage_core::{CrimeScenario, DetectiveProfile};
use mirage_error::GenerationError;
use mirage_suspense::GeneratedStory;

/// Weaves a finished plot point sequence into a presentable story.
#[async_trait]
pub trait StoryAssembler: Send + Sync {
    /// Renders the story.
    ///
    /// # Errors
    ///
    /// Returns a [`GenerationError`] when the backing renderer fails.
    async fn assemble(
        &self,
        scenario: &CrimeScenario,
        profile: &DetectiveProfile,
        story: &GeneratedStory,
    ) -> Result<String, GenerationError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str {
        "story-assembler"
    }
}

/// Deterministic markdown transcript of the dual-layer story.
#[derive(Debug, Default)]
pub struct MarkdownAssembler;

impl MarkdownAssembler {
    /// Creates the assembler.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StoryAssembler for MarkdownAssembler {
    async fn assemble(
        &self,
        scenario: &CrimeScenario,
        profile: &DetectiveProfile,
        story: &GeneratedStory,
    ) -> Result<String, GenerationError> {
        let mut out = String::new();
        let crime = &scenario.crime;

        out.push_str(&format!("# The {} at {}\n\n", crime.crime_type, crime.location));
        out.push_str("## What the reader knows\n\n");
        out.push_str(&format!(
            "{} killed {}. Motive: {}. Method: {}. The conspiracy: {}.\n\n",
            crime.criminal.name,
            crime.victim.name,
            crime.motive,
            crime.method,
            crime.coordination_plan
        ));
        out.push_str(&format!(
            "## What {} is told\n\n{}\n\n",
            profile.name, scenario.fabricated.cover_story
        ));
        out.push_str(&format!(
            "Stakes: {}. If the case fails: {}. Deadline: {}.\n\n",
            profile.personal_stakes, profile.dire_consequence, profile.deadline_reason
        ));
        out.push_str("---\n");

        for point in story.plot_points() {
            out.push_str(&format!(
                "\n## Plot point {} (suspense {}/10{})\n\n",
                point.sequence(),
                point.suspense(),
                if *point.collision() { ", collision" } else { "" }
            ));
            out.push_str(&format!("{}\n", point.description()));
            if let Some(intervention) = point.conspirator_intervention() {
                out.push_str(&format!("\n*Intervention:* {}\n", intervention));
            }
            if let Some(obstacle) = point.obstacle() {
                out.push_str(&format!("\n*Obstacle:* {}\n", obstacle));
            }
            if let Some(learns) = point.detective_learns() {
                out.push_str(&format!("\n*The detective believes:* {}\n", learns));
            }
            if let Some(reveal) = point.reveal() {
                out.push_str(&format!("\n> *The reader sees:* {}\n", reveal));
            }
            if !point.paths_closed().is_empty() {
                out.push_str(&format!(
                    "\n*Routes to the truth closed:* {}\n",
                    point.paths_closed().join(", ")
                ));
            }
        }

        out.push_str("\n---\n\n## Where it ends\n\n");
        let open: Vec<_> = story
            .paths()
            .iter()
            .filter(|p| p.is_open())
            .map(|p| p.description().clone())
            .collect();
        if open.is_empty() {
            out.push_str("Every route to the truth is closed.\n");
        } else {
            out.push_str(&format!(
                "Still open, for a sharper eye than {}'s: {}\n",
                profile.name,
                open.join("; ")
            ));
        }

        Ok(out)
    }

    fn name(&self) -> &str {
        "markdown-assembler"
    }
}
