//! Path-specific error types.

/// Errors that can occur while parsing or applying a state path.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PathError {
    /// Path was empty or contained an empty segment
    #[error("Malformed path '{0}': empty segment")]
    EmptySegment(String),

    /// Path did not start at a writable state slot
    #[error("Unknown state slot '{slot}' in path '{path}'")]
    UnknownSlot { slot: String, path: String },

    /// A segment traversed a value that is not a mapping
    #[error("Cannot traverse '{segment}' in path '{path}': value is not a mapping")]
    NotAMapping { segment: String, path: String },
}
