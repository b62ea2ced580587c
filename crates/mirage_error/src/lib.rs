//! Error types for the Mirage story generation library.
//!
//! This crate provides the foundation error types used throughout the
//! Mirage ecosystem. Each domain gets a kind enum plus a location-tracking
//! error struct; the `MirageError` aggregate wraps all of them behind a
//! single boxed kind for cheap propagation with `?`.

mod config;
mod fact;
mod generation;
mod intervention;
mod path;
mod scenario;

pub use config::ConfigError;
pub use fact::{FactError, FactErrorKind};
pub use generation::{GenerationError, GenerationErrorKind};
pub use intervention::{InterventionError, InterventionErrorKind};
pub use path::{PathError, PathErrorKind};
pub use scenario::{ScenarioError, ScenarioErrorKind};

/// Kind discrimination for the aggregate error.
#[derive(Debug, Clone, derive_more::From)]
pub enum MirageErrorKind {
    /// Fact store error
    Fact(FactError),
    /// Discovery path error
    Path(PathError),
    /// Generation error
    Generation(GenerationError),
    /// Intervention error
    Intervention(InterventionError),
    /// Scenario loading or validation error
    Scenario(ScenarioError),
    /// Configuration error
    Config(ConfigError),
}

impl std::fmt::Display for MirageErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MirageErrorKind::Fact(e) => write!(f, "{}", e),
            MirageErrorKind::Path(e) => write!(f, "{}", e),
            MirageErrorKind::Generation(e) => write!(f, "{}", e),
            MirageErrorKind::Intervention(e) => write!(f, "{}", e),
            MirageErrorKind::Scenario(e) => write!(f, "{}", e),
            MirageErrorKind::Config(e) => write!(f, "{}", e),
        }
    }
}

/// Mirage error with kind discrimination.
#[derive(Debug)]
pub struct MirageError(Box<MirageErrorKind>);

impl MirageError {
    /// Create a new error from a kind.
    pub fn new(kind: MirageErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &MirageErrorKind {
        &self.0
    }
}

impl std::fmt::Display for MirageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Mirage Error: {}", self.0)
    }
}

impl std::error::Error for MirageError {}

// Generic From implementation for any type that converts to MirageErrorKind
impl<T> From<T> for MirageError
where
    T: Into<MirageErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Mirage operations.
pub type MirageResult<T> = std::result::Result<T, MirageError>;
