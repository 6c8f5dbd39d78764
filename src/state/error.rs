//! Form state-specific error types.

/// Errors that can occur during form state operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StateError {
    /// Submission requires a mounted validation surface
    #[error("Form is not mounted")]
    NotMounted,

    /// Change handler called on a binding without a name
    #[error("Field has no name to bind changes to")]
    UnnamedField,
}
