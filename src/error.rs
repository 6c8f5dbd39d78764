//! Crate-wide error types.
//!
//! This module defines the top-level error type, allowing for type-safe error
//! handling across the path, state and configuration modules.

pub use crate::config::ConfigError;
pub use crate::path::PathError;
pub use crate::state::StateError;

/// Main error type.
///
/// Encompasses every module error. It uses `thiserror` for automatic error
/// derivation and conversion.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// State path errors
    #[error("Path error: {0}")]
    Path(#[from] PathError),

    /// Form state errors
    #[error("State error: {0}")]
    State(#[from] StateError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Result with FormError
pub type FormResult<T> = Result<T, FormError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_error_from_config_error() {
        let config_error = ConfigError::FilePathNotSet;
        let form_error: FormError = config_error.into();
        assert!(matches!(form_error, FormError::Config(_)));
        assert!(form_error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_form_error_from_path_error() {
        let path_error = PathError::EmptySegment("data.".to_string());
        let form_error: FormError = path_error.into();
        assert!(matches!(form_error, FormError::Path(_)));
        assert!(form_error.to_string().contains("Path error"));
    }

    #[test]
    fn test_form_error_from_state_error() {
        let state_error = StateError::NotMounted;
        let form_error: FormError = state_error.into();
        assert!(matches!(form_error, FormError::State(_)));
        assert!(form_error.to_string().contains("State error"));
    }

    #[test]
    fn test_form_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let form_error: FormError = io_error.into();
        assert!(matches!(form_error, FormError::Io(_)));
        assert!(form_error.to_string().contains("I/O error"));
    }
}
