//! Crime scenario error types.

/// Specific error conditions for scenario loading and validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScenarioErrorKind {
    /// Failed to read scenario file
    FileRead(String),
    /// Failed to parse TOML content
    TomlParse(String),
    /// Scenario declares no conspirators
    NoConspirators,
    /// Scenario declares no discovery paths
    NoDiscoveryPaths,
    /// Evidence id appears more than once
    DuplicateEvidence(String),
    /// Discovery path references evidence that does not exist
    UnknownEvidenceRef {
        /// Path id
        path: String,
        /// Missing evidence id
        evidence: String,
    },
    /// Evidence declares zero total steps
    ZeroStepEvidence(String),
    /// Conspirator has no alibi in the fabricated layer
    MissingAlibi(String),
    /// The fake suspect duplicates the real criminal
    SuspectNotDistinct(String),
}

impl std::fmt::Display for ScenarioErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioErrorKind::FileRead(msg) => {
                write!(f, "Failed to read scenario file: {}", msg)
            }
            ScenarioErrorKind::TomlParse(msg) => write!(f, "Failed to parse TOML: {}", msg),
            ScenarioErrorKind::NoConspirators => {
                write!(f, "Scenario must declare at least one conspirator")
            }
            ScenarioErrorKind::NoDiscoveryPaths => {
                write!(f, "Scenario must declare at least one discovery path")
            }
            ScenarioErrorKind::DuplicateEvidence(id) => {
                write!(f, "Evidence id '{}' appears more than once", id)
            }
            ScenarioErrorKind::UnknownEvidenceRef { path, evidence } => write!(
                f,
                "Discovery path '{}' references unknown evidence '{}'",
                path, evidence
            ),
            ScenarioErrorKind::ZeroStepEvidence(id) => {
                write!(f, "Evidence '{}' requires at least one discovery step", id)
            }
            ScenarioErrorKind::MissingAlibi(name) => {
                write!(f, "Conspirator '{}' has no alibi in the fabricated layer", name)
            }
            ScenarioErrorKind::SuspectNotDistinct(name) => write!(
                f,
                "Fake suspect '{}' must be distinct from the real criminal",
                name
            ),
        }
    }
}

/// Error type for scenario operations.
///
/// # Examples
///
/// ```
/// use mirage_error::{ScenarioError, ScenarioErrorKind};
///
/// let err = ScenarioError::new(ScenarioErrorKind::NoConspirators);
/// assert!(format!("{}", err).contains("conspirator"));
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioError {
    /// The specific error condition
    pub kind: ScenarioErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ScenarioError {
    /// Create a new ScenarioError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ScenarioErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl std::fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scenario Error: {} at line {} in {}",
            self.kind, self.line, self.file
        )
    }
}

impl std::error::Error for ScenarioError {}
