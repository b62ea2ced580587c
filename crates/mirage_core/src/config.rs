//! Configuration for the generation pipeline.
//!
//! All knobs travel in one explicit [`MirageConfig`] object passed into
//! the pipeline entry point. Nothing reads process-global state; the
//! binary decides where the file lives and which environment prefix
//! applies.

use mirage_error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Story shape configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Fewest plot points before path exhaustion may end the story
    pub min_plot_points: u32,
    /// Hard cap on plot points (termination bound)
    pub max_plot_points: u32,
    /// Resolve once open paths fall to this count
    pub discovery_paths_threshold: usize,
    /// Retries for transient generation failures before aborting
    pub max_retries: u32,
    /// Extra countdown ticks beyond max_plot_points
    pub countdown_slack: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            min_plot_points: 15,
            max_plot_points: 25,
            discovery_paths_threshold: 1,
            max_retries: 3,
            countdown_slack: 3,
        }
    }
}

/// Suspense controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuspenseConfig {
    /// Suspense level the story opens at
    pub initial_level: u8,
    /// Ceiling for the suspense scale
    pub max_level: u8,
    /// Chance an intervention-free progress point closes a path anyway
    pub path_close_probability: f64,
    /// Chance a fresh minor lead opens after a plot point
    pub new_path_probability: f64,
    /// Collision oracle sensitivity in [0, 1]; 1.0 is deterministic
    pub collision_sensitivity: f64,
    /// Chance a clear action runs into a mundane obstacle instead of progress
    pub obstacle_probability: f64,
    /// How many collisions each conspirator can cover for
    pub cover_capacity: u32,
}

impl Default for SuspenseConfig {
    fn default() -> Self {
        Self {
            initial_level: 3,
            max_level: 10,
            path_close_probability: 0.7,
            new_path_probability: 0.2,
            collision_sensitivity: 0.5,
            obstacle_probability: 0.4,
            cover_capacity: 2,
        }
    }
}

/// Output format for assembled stories.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OutputFormat {
    Markdown,
    Json,
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Transcript format
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Markdown,
        }
    }
}

/// Main configuration object for the pipeline.
///
/// # Examples
///
/// ```
/// use mirage_core::MirageConfig;
///
/// let config = MirageConfig::default();
/// assert_eq!(config.generation.discovery_paths_threshold, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MirageConfig {
    /// Story shape knobs
    pub generation: GenerationConfig,
    /// Suspense policy knobs
    pub suspense: SuspenseConfig,
    /// Output knobs
    pub output: OutputConfig,
    /// RNG seed for the stochastic policy gates
    pub seed: u64,
}

impl MirageConfig {
    /// Loads configuration, layering defaults, an optional TOML file, and
    /// `MIRAGE_*` environment overrides (e.g. `MIRAGE_GENERATION__MAX_PLOT_POINTS`).
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the file or an override cannot be
    /// read into the config shape.
    #[tracing::instrument(skip_all)]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = config::Config::try_from(&Self::default())
            .map_err(|e| ConfigError::new(e.to_string()))?;

        let mut builder = config::Config::builder().add_source(defaults);
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("MIRAGE")
                .separator("__")
                .try_parsing(true),
        );

        let loaded = builder
            .build()
            .map_err(|e| ConfigError::new(e.to_string()))?
            .try_deserialize::<Self>()
            .map_err(|e| ConfigError::new(e.to_string()))?;

        tracing::debug!(
            max_plot_points = loaded.generation.max_plot_points,
            threshold = loaded.generation.discovery_paths_threshold,
            seed = loaded.seed,
            "Configuration resolved"
        );
        Ok(loaded)
    }
}
