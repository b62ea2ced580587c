//! Generation error types.

/// Kinds of generation errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GenerationErrorKind {
    /// Detective action generation failed after exhausting retries.
    ///
    /// A story with a broken plot sequence has no partial-success value,
    /// so this is fatal to the whole generation run.
    #[display("Action generation failed after {} attempt(s): {}", attempts, message)]
    ActionFailed {
        /// Number of attempts made before giving up
        attempts: u32,
        /// Last underlying failure message
        message: String,
    },
    /// Collision oracle failed after exhausting retries
    #[display("Collision detection failed after {} attempt(s): {}", attempts, message)]
    OracleFailed {
        /// Number of attempts made before giving up
        attempts: u32,
        /// Last underlying failure message
        message: String,
    },
    /// A single transient generation failure, retryable by the controller
    #[display("Transient generation failure: {}", _0)]
    Transient(String),
    /// The external call exceeded its deadline; mapped to the retry path,
    /// never to silent continuation with a default action
    #[display("Generation timed out after {}ms", _0)]
    Timeout(u64),
}

/// Generation error with location tracking.
///
/// # Examples
///
/// ```
/// use mirage_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::Transient("model hiccup".to_string()));
/// assert!(err.is_transient());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new generation error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether the controller may retry the failed call.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind,
            GenerationErrorKind::Transient(_) | GenerationErrorKind::Timeout(_)
        )
    }
}
