//! Optional transport layer configurations.
//!
//! These values are carried through to the connection engine unchanged.
//! Their presence (not their content) decides the default server port.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use mqtt_client_config::{SslConfig, WebSocketConfig};
//!
//! let ssl = SslConfig::new()
//!     .with_handshake_timeout(Duration::from_secs(5))
//!     .with_protocols(["TLSv1.3"]);
//!
//! let ws = WebSocketConfig::new().with_server_path("mqtt");
//! assert_eq!(ws.subprotocol, "mqtt");
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::num::NonZeroUsize;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use url::Url;

use crate::error::{Error, Result};

use super::endpoint::ServerAddress;

// ============================================================================
// Constants
// ============================================================================

/// Default TLS and WebSocket handshake timeout.
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Default WebSocket subprotocol.
pub const DEFAULT_WEBSOCKET_SUBPROTOCOL: &str = "mqtt";

// ============================================================================
// Duration Serialization
// ============================================================================

/// Serializes a [`Duration`] as whole milliseconds.
///
/// Sub-millisecond precision is truncated.
pub(crate) mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let ms = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(ms)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

// ============================================================================
// SslConfig
// ============================================================================

/// TLS configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SslConfig {
    /// Maximum time for the TLS handshake.
    ///
    /// Serialized as whole milliseconds; finer precision is dropped.
    #[serde(with = "millis")]
    pub handshake_timeout: Duration,

    /// Allowed protocol versions, or `None` for the transport defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocols: Option<Vec<String>>,

    /// Allowed cipher suites, or `None` for the transport defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cipher_suites: Option<Vec<String>>,

    /// Whether the server certificate must match the host.
    pub verify_hostname: bool,
}

impl Default for SslConfig {
    fn default() -> Self {
        Self {
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
            protocols: None,
            cipher_suites: None,
            verify_hostname: true,
        }
    }
}

impl SslConfig {
    /// Creates the default TLS configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the handshake timeout.
    #[inline]
    #[must_use]
    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// Restricts the protocol versions.
    #[must_use]
    pub fn with_protocols(mut self, protocols: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.protocols = Some(protocols.into_iter().map(Into::into).collect());
        self
    }

    /// Restricts the cipher suites.
    #[must_use]
    pub fn with_cipher_suites(
        mut self,
        cipher_suites: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.cipher_suites = Some(cipher_suites.into_iter().map(Into::into).collect());
        self
    }

    /// Enables or disables hostname verification.
    #[inline]
    #[must_use]
    pub fn with_verify_hostname(mut self, verify: bool) -> Self {
        self.verify_hostname = verify;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if a protocol or cipher-suite list is
    /// present but empty.
    pub fn validate(&self) -> Result<()> {
        if self.protocols.as_ref().is_some_and(Vec::is_empty) {
            return Err(Error::validation("SSL protocols must not be empty"));
        }
        if self.cipher_suites.as_ref().is_some_and(Vec::is_empty) {
            return Err(Error::validation("SSL cipher suites must not be empty"));
        }
        Ok(())
    }
}

// ============================================================================
// WebSocketConfig
// ============================================================================

/// WebSocket transport configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSocketConfig {
    /// Request path, without the leading slash.
    pub server_path: String,

    /// Query string, without the leading `?`.
    pub query_string: String,

    /// Subprotocol offered in the upgrade request.
    pub subprotocol: String,

    /// Maximum time for the upgrade handshake.
    ///
    /// Serialized as whole milliseconds; finer precision is dropped.
    #[serde(with = "millis")]
    pub handshake_timeout: Duration,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            server_path: String::new(),
            query_string: String::new(),
            subprotocol: DEFAULT_WEBSOCKET_SUBPROTOCOL.to_string(),
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
        }
    }
}

impl WebSocketConfig {
    /// Creates the default WebSocket configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request path. A leading `/` is stripped.
    #[must_use]
    pub fn with_server_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.server_path = path.strip_prefix('/').unwrap_or(&path).to_string();
        self
    }

    /// Sets the query string. A leading `?` is stripped.
    #[must_use]
    pub fn with_query_string(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.query_string = query.strip_prefix('?').unwrap_or(&query).to_string();
        self
    }

    /// Sets the subprotocol.
    #[inline]
    #[must_use]
    pub fn with_subprotocol(mut self, subprotocol: impl Into<String>) -> Self {
        self.subprotocol = subprotocol.into();
        self
    }

    /// Sets the handshake timeout.
    #[inline]
    #[must_use]
    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the subprotocol is empty.
    pub fn validate(&self) -> Result<()> {
        if self.subprotocol.is_empty() {
            return Err(Error::validation("WebSocket subprotocol must not be empty"));
        }
        Ok(())
    }

    /// Builds the upgrade URI for `address`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUri`] if the pieces do not form a valid URI.
    pub fn uri(&self, address: &ServerAddress, secure: bool) -> Result<Url> {
        let scheme = if secure { "wss" } else { "ws" };
        let mut uri = Url::parse(&format!("{scheme}://{address}/{}", self.server_path))?;
        if !self.query_string.is_empty() {
            uri.set_query(Some(&self.query_string));
        }
        Ok(uri)
    }
}

// ============================================================================
// ExecutorConfig
// ============================================================================

/// Where the client does its work.
#[derive(Debug, Clone, Default)]
pub struct ExecutorConfig {
    /// Number of I/O threads, or `None` for the engine default.
    pub io_threads: Option<NonZeroUsize>,

    /// Runtime on which listener callbacks are run, or `None` for the
    /// engine's own runtime.
    pub application_runtime: Option<Handle>,
}

impl ExecutorConfig {
    /// Creates the default executor configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of I/O threads.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `threads` is `0`.
    pub fn with_io_threads(mut self, threads: usize) -> Result<Self> {
        let threads = NonZeroUsize::new(threads)
            .ok_or_else(|| Error::validation("Number of I/O threads must be greater than zero"))?;
        self.io_threads = Some(threads);
        Ok(self)
    }

    /// Runs listener callbacks on the given runtime.
    #[inline]
    #[must_use]
    pub fn with_application_runtime(mut self, handle: Handle) -> Self {
        self.application_runtime = Some(handle);
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
