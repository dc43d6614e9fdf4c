//! Client identity types.
//!
//! A client either presents its own [`ClientIdentifier`] when connecting,
//! or leaves the choice to the broker, which then assigns one in its
//! connection acknowledgement.
//!
//! # Example
//!
//! ```
//! use mqtt_client_config::{ClientIdentifier, ClientIdentifierSetting};
//!
//! let id = ClientIdentifier::new("sensor-17").unwrap();
//! assert_eq!(id.as_str(), "sensor-17");
//!
//! assert!(ClientIdentifierSetting::default().is_request_from_server());
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Maximum encoded length of an MQTT UTF-8 string.
pub const MAX_CLIENT_IDENTIFIER_LEN: usize = u16::MAX as usize;

// ============================================================================
// ClientIdentifier
// ============================================================================

/// Validated MQTT client identifier.
///
/// Holds a well-formed MQTT UTF-8 string: at most 65 535 bytes and free of
/// the NUL character. The empty identifier is representable because a
/// broker may legally assign one, but builders refuse it as an explicit
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientIdentifier(String);

impl ClientIdentifier {
    /// Creates an identifier after checking the MQTT string rules.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the value is too long or contains
    /// a NUL character.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();

        if value.len() > MAX_CLIENT_IDENTIFIER_LEN {
            return Err(Error::validation(format!(
                "Client identifier must not be longer than {MAX_CLIENT_IDENTIFIER_LEN} bytes, \
                 but was {} bytes",
                value.len()
            )));
        }

        if value.contains('\u{0}') {
            return Err(Error::validation(
                "Client identifier must not contain the null character",
            ));
        }

        Ok(Self(value))
    }

    /// Returns the identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the identifier is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ClientIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ClientIdentifier {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ClientIdentifier> for String {
    fn from(id: ClientIdentifier) -> Self {
        id.0
    }
}

// ============================================================================
// ClientIdentifierSetting
// ============================================================================

/// How the client obtains its identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ClientIdentifierSetting {
    /// Connect with an empty identifier and let the broker assign one.
    #[default]
    RequestFromServer,

    /// Connect with a caller-supplied identifier.
    Explicit(ClientIdentifier),
}

impl ClientIdentifierSetting {
    /// Returns `true` if identity assignment is left to the broker.
    #[inline]
    #[must_use]
    pub fn is_request_from_server(&self) -> bool {
        matches!(self, Self::RequestFromServer)
    }

    /// Returns the explicit identifier, if one was supplied.
    #[inline]
    #[must_use]
    pub fn explicit(&self) -> Option<&ClientIdentifier> {
        match self {
            Self::RequestFromServer => None,
            Self::Explicit(id) => Some(id),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_plain_identifier() {
        let id = ClientIdentifier::new("client-1").unwrap();
        assert_eq!(id.as_str(), "client-1");
        assert_eq!(id.to_string(), "client-1");
        assert!(!id.is_empty());
    }

    #[test]
    fn test_new_rejects_null_character() {
        let err = ClientIdentifier::new("bad\u{0}id").unwrap_err();
        assert!(err.is_validation_error());
    }

    #[test]
    fn test_new_rejects_oversized_identifier() {
        let long = "x".repeat(MAX_CLIENT_IDENTIFIER_LEN + 1);
        assert!(ClientIdentifier::new(long).is_err());

        let max = "x".repeat(MAX_CLIENT_IDENTIFIER_LEN);
        assert!(ClientIdentifier::new(max).is_ok());
    }

    #[test]
    fn test_setting_default_requests_from_server() {
        let setting = ClientIdentifierSetting::default();
        assert!(setting.is_request_from_server());
        assert!(setting.explicit().is_none());
    }

    #[test]
    fn test_setting_explicit() {
        let id = ClientIdentifier::new("abc").unwrap();
        let setting = ClientIdentifierSetting::Explicit(id.clone());
        assert!(!setting.is_request_from_server());
        assert_eq!(setting.explicit(), Some(&id));
    }

    #[test]
    fn test_serde_roundtrip_validates() {
        let json = serde_json::to_string(&ClientIdentifier::new("abc").unwrap()).unwrap();
        assert_eq!(json, r#""abc""#);

        let bad: std::result::Result<ClientIdentifier, _> = serde_json::from_str("\"a\\u0000b\"");
        assert!(bad.is_err());
    }
}
