//! Error types for MQTT client configuration.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```
//! use mqtt_client_config::{ClientBuilder, ClientBuilderBase, Result};
//!
//! fn example() -> Result<()> {
//!     let mut builder = ClientBuilder::new();
//!     builder.server_host("broker.example")?.server_port(1883)?;
//!     let config = builder.use_mqtt_version_5().build()?;
//!     assert_eq!(config.server_port(), 1883);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Setter arguments | [`Error::Validation`] |
//! | Build step | [`Error::Config`] |
//! | External | [`Error::InvalidUri`] |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Every error is local and synchronous. A rejected setter leaves the
/// builder exactly as it was, so the caller may retry with a valid value.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Setter Errors
    // ========================================================================
    /// A setter argument violated its precondition.
    ///
    /// Returned for empty hosts or identifiers, port `0`, malformed
    /// identifiers and out-of-range sub-configuration values.
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the rejected argument.
        message: String,
    },

    // ========================================================================
    // Build Errors
    // ========================================================================
    /// The builder state could not be frozen into a configuration.
    ///
    /// Returned by the build step when no server endpoint is available.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// WebSocket URI could not be composed.
    #[error("Invalid URI: {0}")]
    InvalidUri(#[from] url::ParseError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a validation error.
    #[inline]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if a setter rejected its argument.
    #[inline]
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns `true` if the build step failed.
    #[inline]
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = Error::validation("Server host must not be empty");
        assert_eq!(
            err.to_string(),
            "Validation error: Server host must not be empty"
        );
    }

    #[test]
    fn test_config_display() {
        let err = Error::config("no server endpoint");
        assert_eq!(err.to_string(), "Configuration error: no server endpoint");
    }

    #[test]
    fn test_predicates() {
        let validation = Error::validation("test");
        let config = Error::config("test");

        assert!(validation.is_validation_error());
        assert!(!validation.is_config_error());
        assert!(config.is_config_error());
        assert!(!config.is_validation_error());
    }

    #[test]
    fn test_from_url_error() {
        let parse_err = url::Url::parse("not a uri").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::InvalidUri(_)));
    }
}
