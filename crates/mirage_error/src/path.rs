//! Discovery path error types.

/// Kinds of discovery path errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PathErrorKind {
    /// Path id is not registered with the tracker
    #[display("Unknown discovery path id: {}", _0)]
    UnknownPath(String),
}

/// Discovery path error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Path Error: {} at line {} in {}", kind, line, file)]
pub struct PathError {
    /// The kind of error that occurred
    pub kind: PathErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PathError {
    /// Create a new path error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PathErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
