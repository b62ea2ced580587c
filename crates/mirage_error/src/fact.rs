//! Fact store error types.

/// Kinds of fact store errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum FactErrorKind {
    /// Advancing evidence would leave progress outside its valid range.
    ///
    /// Never clamped: progress accounting feeds collision and suspense
    /// logic, so a silently corrected value would corrupt the plot.
    #[display(
        "Evidence '{}' progress out of range: {} {:+} not in [0, {}]",
        evidence,
        steps_completed,
        delta,
        steps_total
    )]
    OutOfRange {
        /// Evidence identifier
        evidence: String,
        /// Progress before the rejected advance
        steps_completed: u32,
        /// Requested signed step delta
        delta: i32,
        /// Total steps required to resolve the evidence
        steps_total: u32,
    },
    /// Evidence id is not present in the crime facts
    #[display("Unknown evidence id: {}", _0)]
    UnknownEvidence(String),
}

/// Fact store error with location tracking.
///
/// # Examples
///
/// ```
/// use mirage_error::{FactError, FactErrorKind};
///
/// let err = FactError::new(FactErrorKind::UnknownEvidence("E9".to_string()));
/// assert!(format!("{}", err).contains("E9"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Fact Error: {} at line {} in {}", kind, line, file)]
pub struct FactError {
    /// The kind of error that occurred
    pub kind: FactErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl FactError {
    /// Create a new fact error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: FactErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
