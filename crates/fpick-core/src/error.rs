//! Error types for `fpick-core`.
//!
//! Fallible operations in the core return [`CoreResult<T>`], an alias for
//! `Result<T, CoreError>`. Provider implementations report failures with
//! [`ProviderError`], which converts into [`CoreError::Provider`].

use std::path::PathBuf;
use std::time::Duration;

/// Failure reported by a [`Provider`](crate::provider::Provider) operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The requested path does not exist.
    #[error("path not found: {0}")]
    NotFound(String),

    /// The provider lacks permission to read the path.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// A directory was expected but the path points to a file.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// The provider answered with data the core cannot use.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// An I/O failure on the provider side.
    #[error("i/o error: {0}")]
    Io(String),

    /// The provider could not be reached or refused the call.
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// Unified error type for all core operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A path or query was rejected before any provider call.
    #[error("invalid input: {0}")]
    Validation(String),

    /// A provider call exceeded its time budget.
    #[error("{operation} timed out after {} seconds", after.as_secs())]
    Timeout {
        /// Human-readable name of the operation.
        operation: &'static str,
        /// The budget that elapsed.
        after: Duration,
    },

    /// A provider call failed or returned a malformed listing.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The target path does not exist.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// The process lacks permission to access the path.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Failed to parse a TOML configuration file.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// An I/O error that doesn't fit a more specific variant.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout `fpick-core`.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_displays_message() {
        let err = CoreError::Validation("directory path is empty".to_string());
        assert_eq!(err.to_string(), "invalid input: directory path is empty");
    }

    #[test]
    fn timeout_displays_operation_and_budget() {
        let err = CoreError::Timeout {
            operation: "directory listing",
            after: Duration::from_secs(30),
        };
        assert_eq!(err.to_string(), "directory listing timed out after 30 seconds");
    }

    #[test]
    fn provider_error_converts_transparently() {
        let err: CoreError = ProviderError::NotFound("/gone".to_string()).into();
        assert!(matches!(err, CoreError::Provider(_)));
        assert_eq!(err.to_string(), "path not found: /gone");
    }

    #[test]
    fn malformed_displays_message() {
        let err = ProviderError::Malformed("entry without a path".to_string());
        assert_eq!(err.to_string(), "malformed response: entry without a path");
    }

    #[test]
    fn config_parse_displays_message() {
        let err = CoreError::ConfigParse("unexpected token".to_string());
        assert_eq!(err.to_string(), "config parse error: unexpected token");
    }

    #[test]
    fn io_error_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let core_err: CoreError = io_err.into();
        assert!(matches!(core_err, CoreError::Io(_)));
        assert!(core_err.to_string().contains("disk on fire"));
    }

    #[test]
    fn error_is_debug() {
        let err = CoreError::NotFound(PathBuf::from("/test"));
        let debug = format!("{:?}", err);
        assert!(debug.contains("NotFound"));
    }
}
