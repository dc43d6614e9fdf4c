//! Builders for [`ClientConfig`].
//!
//! Configuration starts on a [`ClientBuilder`], which chooses the protocol
//! version. Choosing copies everything configured so far into a
//! [`Mqtt3ClientBuilder`] or [`Mqtt5ClientBuilder`]; later changes to the
//! original builder do not affect the copy.
//!
//! All three share their setters through [`ClientBuilderBase`]. Setters
//! take `&mut self` and return `&mut Self` for chaining. Setters that
//! validate return [`Result`] and leave the builder untouched on error.
//!
//! # Example
//!
//! ```
//! use std::net::{Ipv4Addr, SocketAddr};
//!
//! use mqtt_client_config::{ClientBuilder, ClientBuilderBase, Result};
//!
//! # fn example() -> Result<()> {
//! let mut builder = ClientBuilder::new();
//! builder
//!     .identifier("sensor-17")?
//!     .server_address(SocketAddr::from((Ipv4Addr::new(10, 0, 0, 5), 9001)))
//!     .server_port(9002)?
//!     .automatic_reconnect_with_default_config();
//!
//! let config = builder.use_mqtt_version_5().build()?;
//! assert_eq!(config.server_host(), "10.0.0.5");
//! assert_eq!(config.server_port(), 9002);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::net::IpAddr;
use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::identifiers::{ClientIdentifier, ClientIdentifierSetting};

use super::advanced::{AdvancedConfig, MqttVersion};
use super::config::{ClientConfig, ClientConfigInner};
use super::endpoint::{Endpoint, ServerAddress, ServerHost, TransportFlags};
use super::listener::{
    ConnectedListener, DisconnectedListener, ListenerChain, SharedConnectedListener,
    SharedDisconnectedListener,
};
use super::reconnect::AutoReconnect;
use super::state::LiveState;
use super::transport::{ExecutorConfig, SslConfig, WebSocketConfig};

// ============================================================================
// BuilderState
// ============================================================================

/// Mutable configuration accumulated by a builder.
///
/// Not meant to be shared between threads while being mutated.
#[derive(Debug, Clone)]
pub struct BuilderState {
    /// Client identity.
    identifier: ClientIdentifierSetting,
    /// Server endpoint, `None` only if cleared.
    endpoint: Option<Endpoint>,
    /// TLS configuration.
    ssl_config: Option<SslConfig>,
    /// WebSocket configuration.
    web_socket_config: Option<WebSocketConfig>,
    /// Executor configuration.
    executor_config: ExecutorConfig,
    /// Automatic reconnect policy.
    auto_reconnect: Option<Arc<AutoReconnect>>,
    /// Registered listeners.
    listeners: ListenerChain,
}

impl Default for BuilderState {
    fn default() -> Self {
        Self {
            identifier: ClientIdentifierSetting::default(),
            endpoint: Some(Endpoint::default()),
            ssl_config: None,
            web_socket_config: None,
            executor_config: ExecutorConfig::default(),
            auto_reconnect: None,
            listeners: ListenerChain::default(),
        }
    }
}

impl BuilderState {
    /// Returns which transport layers are enabled.
    #[inline]
    #[must_use]
    pub fn transport_flags(&self) -> TransportFlags {
        TransportFlags::new(self.ssl_config.is_some(), self.web_socket_config.is_some())
    }

    /// Resolves the current endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no endpoint is set.
    pub fn resolve(&self) -> Result<ServerAddress> {
        self.endpoint
            .as_ref()
            .map(|endpoint| endpoint.resolve(self.transport_flags()))
            .ok_or_else(|| Error::config("No server address or host is configured"))
    }

    /// Returns the connected listeners as they would be frozen now.
    #[must_use]
    pub fn build_connected_listeners(&self) -> Arc<[SharedConnectedListener]> {
        self.listeners.build_connected()
    }

    /// Returns the disconnected listeners as they would be frozen now.
    #[must_use]
    pub fn build_disconnected_listeners(&self) -> Arc<[SharedDisconnectedListener]> {
        self.listeners.build_disconnected(self.auto_reconnect.as_ref())
    }

    /// Returns the endpoint, starting from the default one if cleared.
    fn endpoint_mut(&mut self) -> &mut Endpoint {
        self.endpoint.get_or_insert_with(Endpoint::default)
    }

    /// Freezes the state into a configuration.
    fn freeze(
        &self,
        mqtt_version: MqttVersion,
        advanced_config: AdvancedConfig,
    ) -> Result<ClientConfig> {
        let server_address = self.resolve()?;
        let connected_listeners = self.build_connected_listeners();
        let disconnected_listeners = self.build_disconnected_listeners();

        debug!(
            version = %mqtt_version,
            server = %server_address,
            ssl = self.ssl_config.is_some(),
            web_socket = self.web_socket_config.is_some(),
            connected_listeners = connected_listeners.len(),
            disconnected_listeners = disconnected_listeners.len(),
            "Client configuration built"
        );

        Ok(ClientConfig::from_inner(ClientConfigInner {
            mqtt_version,
            identifier: self.identifier.clone(),
            server_address,
            executor_config: self.executor_config.clone(),
            ssl_config: self.ssl_config.clone(),
            web_socket_config: self.web_socket_config.clone(),
            advanced_config,
            auto_reconnect: self.auto_reconnect.clone(),
            connected_listeners,
            disconnected_listeners,
            live: LiveState::default(),
        }))
    }
}

// ============================================================================
// ClientBuilderBase
// ============================================================================

/// Setters shared by every client builder.
pub trait ClientBuilderBase: Sized {
    /// Returns the accumulated state.
    fn state(&self) -> &BuilderState;

    /// Returns the accumulated state for mutation.
    fn state_mut(&mut self) -> &mut BuilderState;

    /// Sets an explicit client identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `identifier` is empty or not a valid
    /// MQTT string.
    fn identifier(&mut self, identifier: &str) -> Result<&mut Self> {
        self.client_identifier(ClientIdentifier::new(identifier)?)
    }

    /// Sets an explicit, already validated client identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `identifier` is empty.
    fn client_identifier(&mut self, identifier: ClientIdentifier) -> Result<&mut Self> {
        if identifier.is_empty() {
            return Err(Error::validation("Client identifier must not be empty"));
        }
        self.state_mut().identifier = ClientIdentifierSetting::Explicit(identifier);
        Ok(self)
    }

    /// Lets the broker assign the client identifier.
    fn request_identifier_from_server(&mut self) -> &mut Self {
        self.state_mut().identifier = ClientIdentifierSetting::RequestFromServer;
        self
    }

    /// Sets the server address, replacing any host and port.
    fn server_address(&mut self, address: impl Into<ServerAddress>) -> &mut Self {
        self.state_mut().endpoint_mut().set_explicit_address(address.into());
        self
    }

    /// Sets the server host name.
    ///
    /// If a server address was set, its port is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `host` is empty.
    fn server_host(&mut self, host: &str) -> Result<&mut Self> {
        let host = ServerHost::name(host)?;
        self.state_mut().endpoint_mut().set_host(host);
        Ok(self)
    }

    /// Sets the server host to a literal address.
    ///
    /// If a server address was set, its port is kept.
    fn server_ip(&mut self, ip: impl Into<IpAddr>) -> &mut Self {
        self.state_mut()
            .endpoint_mut()
            .set_host(ServerHost::Ip(ip.into()));
        self
    }

    /// Sets the server port.
    ///
    /// If a server address was set, its host is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `port` is `0`.
    fn server_port(&mut self, port: u16) -> Result<&mut Self> {
        self.state_mut().endpoint_mut().set_port(port)?;
        Ok(self)
    }

    /// Enables TLS with the default configuration.
    fn use_ssl_with_default_config(&mut self) -> &mut Self {
        self.state_mut().ssl_config = Some(SslConfig::default());
        self
    }

    /// Enables TLS with `config`, or disables it with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `config` is invalid.
    fn use_ssl(&mut self, config: Option<SslConfig>) -> Result<&mut Self> {
        if let Some(config) = &config {
            config.validate()?;
        }
        self.state_mut().ssl_config = config;
        Ok(self)
    }

    /// Enables WebSocket with the default configuration.
    fn use_web_socket_with_default_config(&mut self) -> &mut Self {
        self.state_mut().web_socket_config = Some(WebSocketConfig::default());
        self
    }

    /// Enables WebSocket with `config`, or disables it with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `config` is invalid.
    fn use_web_socket(&mut self, config: Option<WebSocketConfig>) -> Result<&mut Self> {
        if let Some(config) = &config {
            config.validate()?;
        }
        self.state_mut().web_socket_config = config;
        Ok(self)
    }

    /// Sets the executor configuration.
    fn executor_config(&mut self, config: ExecutorConfig) -> &mut Self {
        self.state_mut().executor_config = config;
        self
    }

    /// Enables automatic reconnect with the default delays.
    fn automatic_reconnect_with_default_config(&mut self) -> &mut Self {
        self.automatic_reconnect(Some(AutoReconnect::default()))
    }

    /// Sets the automatic reconnect policy, or disables it with `None`.
    fn automatic_reconnect(&mut self, policy: Option<AutoReconnect>) -> &mut Self {
        self.state_mut().auto_reconnect = policy.map(Arc::new);
        self
    }

    /// Appends a connected listener.
    fn add_connected_listener<L>(&mut self, listener: L) -> &mut Self
    where
        L: ConnectedListener + 'static,
    {
        self.add_shared_connected_listener(Arc::new(listener))
    }

    /// Appends a shared connected listener.
    fn add_shared_connected_listener(&mut self, listener: SharedConnectedListener) -> &mut Self {
        self.state_mut().listeners.add_connected(listener);
        self
    }

    /// Appends a disconnected listener.
    fn add_disconnected_listener<L>(&mut self, listener: L) -> &mut Self
    where
        L: DisconnectedListener + 'static,
    {
        self.add_shared_disconnected_listener(Arc::new(listener))
    }

    /// Appends a shared disconnected listener.
    fn add_shared_disconnected_listener(
        &mut self,
        listener: SharedDisconnectedListener,
    ) -> &mut Self {
        self.state_mut().listeners.add_disconnected(listener);
        self
    }

    /// Resolves the server address from the current settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no endpoint is set.
    fn resolve_server_address(&self) -> Result<ServerAddress> {
        self.state().resolve()
    }
}

// ============================================================================
// ClientBuilder
// ============================================================================

/// Entry builder; choose a protocol version to finish configuration.
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    /// Accumulated state.
    state: BuilderState,
}

impl ClientBuilder {
    /// Creates a builder with every setting at its default.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Continues as an MQTT 3.1.1 builder with a copy of the current state.
    #[must_use]
    pub fn use_mqtt_version_3(&self) -> Mqtt3ClientBuilder {
        Mqtt3ClientBuilder {
            state: self.state.clone(),
        }
    }

    /// Continues as an MQTT 5.0 builder with a copy of the current state.
    #[must_use]
    pub fn use_mqtt_version_5(&self) -> Mqtt5ClientBuilder {
        Mqtt5ClientBuilder {
            state: self.state.clone(),
            advanced_config: AdvancedConfig::default(),
        }
    }
}

impl ClientBuilderBase for ClientBuilder {
    fn state(&self) -> &BuilderState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut BuilderState {
        &mut self.state
    }
}

// ============================================================================
// Mqtt3ClientBuilder
// ============================================================================

/// Builder for MQTT 3.1.1 client configurations.
#[derive(Debug, Clone, Default)]
pub struct Mqtt3ClientBuilder {
    /// Accumulated state.
    state: BuilderState,
}

impl Mqtt3ClientBuilder {
    /// Creates a builder with every setting at its default.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no endpoint is set.
    pub fn build(&self) -> Result<ClientConfig> {
        self.state
            .freeze(MqttVersion::Mqtt3_1_1, AdvancedConfig::default())
    }
}

impl ClientBuilderBase for Mqtt3ClientBuilder {
    fn state(&self) -> &BuilderState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut BuilderState {
        &mut self.state
    }
}

// ============================================================================
// Mqtt5ClientBuilder
// ============================================================================

/// Builder for MQTT 5.0 client configurations.
#[derive(Debug, Clone, Default)]
pub struct Mqtt5ClientBuilder {
    /// Accumulated state.
    state: BuilderState,
    /// Version-specific options.
    advanced_config: AdvancedConfig,
}

impl Mqtt5ClientBuilder {
    /// Creates a builder with every setting at its default.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the advanced options.
    pub fn advanced_config(&mut self, config: AdvancedConfig) -> &mut Self {
        self.advanced_config = config;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no endpoint is set.
    pub fn build(&self) -> Result<ClientConfig> {
        self.state.freeze(MqttVersion::Mqtt5_0, self.advanced_config)
    }
}

impl ClientBuilderBase for Mqtt5ClientBuilder {
    fn state(&self) -> &BuilderState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut BuilderState {
        &mut self.state
    }
}

// ============================================================================
// Tests
// ============================================================================
