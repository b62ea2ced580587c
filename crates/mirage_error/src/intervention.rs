//! Intervention selection error types.

/// Kinds of intervention errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum InterventionErrorKind {
    /// No conspirator has cover capacity left to defuse the collision.
    ///
    /// Recoverable at the controller level: the conspiracy is cracking,
    /// and the story is forced toward resolution instead of aborting.
    #[display("Intervention exhausted: no conspirator can cover '{}'", exposed)]
    Exhausted {
        /// What the detective action threatened to expose
        exposed: String,
    },
    /// The collision names a conspirator absent from the crime facts
    #[display("Unknown conspirator: {}", _0)]
    UnknownConspirator(String),
}

/// Intervention error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Intervention Error: {} at line {} in {}", kind, line, file)]
pub struct InterventionError {
    /// The kind of error that occurred
    pub kind: InterventionErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl InterventionError {
    /// Create a new intervention error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: InterventionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether this error signals spent cover capacity rather than a bug.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.kind, InterventionErrorKind::Exhausted { .. })
    }
}
