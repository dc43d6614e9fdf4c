//! Immutable client configuration.
//!
//! A [`ClientConfig`] is produced once by a version builder and handed to
//! the connection engine. Its fields never change after construction;
//! cloning it is cheap and every clone shares the same state. Only the
//! engine-owned [`LiveState`] is updated later.
//!
//! # Example
//!
//! ```
//! use mqtt_client_config::{ClientBuilderBase, ClientConfig, ClientState, MqttVersion};
//!
//! let mut builder = ClientConfig::builder();
//! builder.server_host("broker.example").unwrap().use_ssl_with_default_config();
//!
//! let config = builder.use_mqtt_version_5().build().unwrap();
//! assert_eq!(config.mqtt_version(), MqttVersion::Mqtt5_0);
//! assert_eq!(config.server_host(), "broker.example");
//! assert_eq!(config.server_port(), 8883);
//! assert_eq!(config.state(), ClientState::Disconnected);
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::error::Result;
use crate::identifiers::{ClientIdentifier, ClientIdentifierSetting};

use super::advanced::{AdvancedConfig, MqttVersion};
use super::builder::ClientBuilder;
use super::endpoint::{ServerAddress, TransportFlags};
use super::listener::{SharedConnectedListener, SharedDisconnectedListener};
use super::reconnect::AutoReconnect;
use super::state::{ClientState, ConnectionConfig, LiveState};
use super::transport::{ExecutorConfig, SslConfig, WebSocketConfig};

// ============================================================================
// Types
// ============================================================================

/// Frozen configuration shared by all clones of a [`ClientConfig`].
pub(crate) struct ClientConfigInner {
    /// Protocol version.
    pub mqtt_version: MqttVersion,

    /// Identity requested at build time.
    pub identifier: ClientIdentifierSetting,

    /// Resolved server address.
    pub server_address: ServerAddress,

    /// Executor configuration.
    pub executor_config: ExecutorConfig,

    /// TLS configuration, if enabled.
    pub ssl_config: Option<SslConfig>,

    /// WebSocket configuration, if enabled.
    pub web_socket_config: Option<WebSocketConfig>,

    /// Version-specific options.
    pub advanced_config: AdvancedConfig,

    /// Reconnect policy, also the first disconnected listener when set.
    pub auto_reconnect: Option<Arc<AutoReconnect>>,

    /// Connected listeners in notification order.
    pub connected_listeners: Arc<[SharedConnectedListener]>,

    /// Disconnected listeners in notification order.
    pub disconnected_listeners: Arc<[SharedDisconnectedListener]>,

    /// Engine-owned runtime state.
    pub live: LiveState,
}

// ============================================================================
// ClientConfig
// ============================================================================

/// Immutable, fully resolved client configuration.
///
/// `ClientConfig` is `Send + Sync`; clones share one frozen value.
#[derive(Clone)]
pub struct ClientConfig {
    /// Shared inner state.
    pub(crate) inner: Arc<ClientConfigInner>,
}

// ============================================================================
// ClientConfig - Display
// ============================================================================

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("mqtt_version", &self.inner.mqtt_version)
            .field("identifier", &self.inner.identifier)
            .field("server_address", &self.inner.server_address)
            .field("ssl", &self.inner.ssl_config.is_some())
            .field("web_socket", &self.inner.web_socket_config.is_some())
            .field("auto_reconnect", &self.inner.auto_reconnect)
            .field("connected_listeners", &self.inner.connected_listeners.len())
            .field(
                "disconnected_listeners",
                &self.inner.disconnected_listeners.len(),
            )
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// ClientConfig - Public API
// ============================================================================

impl ClientConfig {
    /// Creates a builder for choosing the protocol version and settings.
    #[inline]
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Returns the protocol version.
    #[inline]
    #[must_use]
    pub fn mqtt_version(&self) -> MqttVersion {
        self.inner.mqtt_version
    }

    /// Returns the client identifier.
    ///
    /// `None` while the identifier is to be assigned by the broker and the
    /// broker has not yet told it.
    #[must_use]
    pub fn client_identifier(&self) -> Option<ClientIdentifier> {
        match &self.inner.identifier {
            ClientIdentifierSetting::Explicit(id) => Some(id.clone()),
            ClientIdentifierSetting::RequestFromServer => self.inner.live.assigned_identifier(),
        }
    }

    /// Returns how the identifier was configured.
    #[inline]
    #[must_use]
    pub fn identifier_setting(&self) -> &ClientIdentifierSetting {
        &self.inner.identifier
    }

    /// Returns the server address the client connects to.
    #[inline]
    #[must_use]
    pub fn server_address(&self) -> &ServerAddress {
        &self.inner.server_address
    }

    /// Returns the server host.
    #[inline]
    #[must_use]
    pub fn server_host(&self) -> String {
        self.inner.server_address.host_string()
    }

    /// Returns the server port.
    #[inline]
    #[must_use]
    pub fn server_port(&self) -> u16 {
        self.inner.server_address.port()
    }

    /// Returns the executor configuration.
    #[inline]
    #[must_use]
    pub fn executor_config(&self) -> &ExecutorConfig {
        &self.inner.executor_config
    }

    /// Returns the TLS configuration, if enabled.
    #[inline]
    #[must_use]
    pub fn ssl_config(&self) -> Option<&SslConfig> {
        self.inner.ssl_config.as_ref()
    }

    /// Returns the WebSocket configuration, if enabled.
    #[inline]
    #[must_use]
    pub fn web_socket_config(&self) -> Option<&WebSocketConfig> {
        self.inner.web_socket_config.as_ref()
    }

    /// Returns the version-specific options.
    #[inline]
    #[must_use]
    pub fn advanced_config(&self) -> &AdvancedConfig {
        &self.inner.advanced_config
    }

    /// Returns the automatic reconnect policy, if set.
    #[inline]
    #[must_use]
    pub fn automatic_reconnect(&self) -> Option<&Arc<AutoReconnect>> {
        self.inner.auto_reconnect.as_ref()
    }

    /// Returns the connected listeners in notification order.
    #[inline]
    #[must_use]
    pub fn connected_listeners(&self) -> &[SharedConnectedListener] {
        &self.inner.connected_listeners
    }

    /// Returns the disconnected listeners in notification order.
    ///
    /// The automatic reconnect policy, if set, is always first.
    #[inline]
    #[must_use]
    pub fn disconnected_listeners(&self) -> &[SharedDisconnectedListener] {
        &self.inner.disconnected_listeners
    }

    /// Returns the current client state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ClientState {
        self.inner.live.state()
    }

    /// Returns the negotiated session parameters while connected.
    #[inline]
    #[must_use]
    pub fn connection_config(&self) -> Option<Arc<ConnectionConfig>> {
        self.inner.live.connection_config()
    }

    /// Returns the engine-owned runtime state.
    #[inline]
    #[must_use]
    pub fn live(&self) -> &LiveState {
        &self.inner.live
    }

    /// Returns which transport layers are enabled.
    #[inline]
    #[must_use]
    pub fn transport_flags(&self) -> TransportFlags {
        TransportFlags::new(
            self.inner.ssl_config.is_some(),
            self.inner.web_socket_config.is_some(),
        )
    }

    /// Returns the WebSocket upgrade URI, if WebSocket is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUri`](crate::Error::InvalidUri) if the
    /// configured path or query do not form a valid URI.
    pub fn web_socket_uri(&self) -> Result<Option<Url>> {
        self.inner
            .web_socket_config
            .as_ref()
            .map(|ws| ws.uri(&self.inner.server_address, self.inner.ssl_config.is_some()))
            .transpose()
    }
}

// ============================================================================
// ClientConfig - Internal API
// ============================================================================

impl ClientConfig {
    /// Wraps frozen state.
    pub(crate) fn from_inner(inner: ClientConfigInner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::client::ClientBuilderBase;

    #[test]
    fn test_config_is_send_sync_clone_debug() {
        fn assert_traits<T: Send + Sync + Clone + fmt::Debug>() {}
        assert_traits::<ClientConfig>();
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::builder().use_mqtt_version_3().build().unwrap();

        assert_eq!(config.mqtt_version(), MqttVersion::Mqtt3_1_1);
        assert!(config.client_identifier().is_none());
        assert_eq!(config.server_host(), "localhost");
        assert_eq!(config.server_port(), 1883);
        assert!(config.ssl_config().is_none());
        assert!(config.web_socket_config().is_none());
        assert!(config.automatic_reconnect().is_none());
        assert!(config.connected_listeners().is_empty());
        assert!(config.disconnected_listeners().is_empty());
        assert_eq!(config.state(), ClientState::Disconnected);
        assert!(config.connection_config().is_none());
        assert_eq!(config.transport_flags(), TransportFlags::default());
        assert!(config.web_socket_uri().unwrap().is_none());
    }

    #[test]
    fn test_assigned_identifier_becomes_visible() {
        let config = ClientConfig::builder().use_mqtt_version_5().build().unwrap();
        assert!(config.client_identifier().is_none());

        config
            .live()
            .set_assigned_identifier(ClientIdentifier::new("auto-42").unwrap());
        assert_eq!(config.client_identifier().unwrap().as_str(), "auto-42");
        assert!(config.identifier_setting().is_request_from_server());
    }

    #[test]
    fn test_explicit_identifier_wins_over_assigned() {
        let mut builder = ClientConfig::builder();
        builder.identifier("mine").unwrap();
        let config = builder.use_mqtt_version_5().build().unwrap();

        config
            .live()
            .set_assigned_identifier(ClientIdentifier::new("theirs").unwrap());
        assert_eq!(config.client_identifier().unwrap().as_str(), "mine");
    }

    #[test]
    fn test_clones_share_live_state() {
        let config = ClientConfig::builder().use_mqtt_version_5().build().unwrap();
        let clone = config.clone();

        config.live().set_state(ClientState::Connected);
        assert_eq!(clone.state(), ClientState::Connected);
    }

    #[test]
    fn test_web_socket_uri() {
        let mut builder = ClientConfig::builder();
        builder
            .server_host("broker.example")
            .unwrap()
            .use_web_socket(Some(WebSocketConfig::new().with_server_path("mqtt")))
            .unwrap()
            .use_ssl_with_default_config();
        let config = builder.use_mqtt_version_5().build().unwrap();

        let uri = config.web_socket_uri().unwrap().unwrap();
        assert_eq!(uri.as_str(), "wss://broker.example:8443/mqtt");
    }

    #[test]
    fn test_web_socket_uri_with_ipv6_host() {
        let mut builder = ClientConfig::builder();
        builder
            .server_host("::1")
            .unwrap()
            .use_web_socket_with_default_config();
        let config = builder.use_mqtt_version_3().build().unwrap();

        assert_eq!(config.server_host(), "::1");
        assert_eq!(config.server_address().to_string(), "[::1]:8000");
        let uri = config.web_socket_uri().unwrap().unwrap();
        assert_eq!(uri.as_str(), "ws://[::1]:8000/");
    }

    #[test]
    fn test_debug_output() {
        let config = ClientConfig::builder().use_mqtt_version_3().build().unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("ClientConfig"));
        assert!(debug.contains("localhost"));
    }
}
