//! Protocol version and version-specific options.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// MqttVersion
// ============================================================================

/// MQTT protocol version spoken by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MqttVersion {
    /// MQTT 3.1.1.
    #[serde(rename = "3.1.1")]
    Mqtt3_1_1,

    /// MQTT 5.0.
    #[serde(rename = "5.0")]
    Mqtt5_0,
}

impl MqttVersion {
    /// Returns the protocol level byte sent in CONNECT.
    #[inline]
    #[must_use]
    pub const fn protocol_level(self) -> u8 {
        match self {
            Self::Mqtt3_1_1 => 4,
            Self::Mqtt5_0 => 5,
        }
    }
}

impl fmt::Display for MqttVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mqtt3_1_1 => f.write_str("3.1.1"),
            Self::Mqtt5_0 => f.write_str("5.0"),
        }
    }
}

// ============================================================================
// AdvancedConfig
// ============================================================================

/// Advanced MQTT 5 options.
///
/// MQTT 3 clients always use [`AdvancedConfig::default`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedConfig {
    /// Accept re-authentication initiated by the server.
    pub allow_server_re_auth: bool,

    /// Reject payloads flagged as UTF-8 that are not.
    pub validate_payload_format: bool,
}

impl AdvancedConfig {
    /// Creates the default advanced configuration.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            allow_server_re_auth: false,
            validate_payload_format: false,
        }
    }

    /// Allows server-initiated re-authentication.
    #[inline]
    #[must_use]
    pub const fn with_allow_server_re_auth(mut self, allow: bool) -> Self {
        self.allow_server_re_auth = allow;
        self
    }

    /// Enables payload format validation.
    #[inline]
    #[must_use]
    pub const fn with_validate_payload_format(mut self, validate: bool) -> Self {
        self.validate_payload_format = validate;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
