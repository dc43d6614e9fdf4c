//! MQTT client configuration - resolution and assembly of client settings.
//!
//! This library turns a sequence of mutually overriding builder calls into
//! one immutable, internally consistent [`ClientConfig`] that a connection
//! engine can share across threads.
//!
//! # Architecture
//!
//! Configuration happens in two steps:
//!
//! - **Builder (mutable)**: setters validate their arguments and update a
//!   single-owner [`BuilderState`]
//! - **Client configuration (immutable)**: the build step resolves the
//!   server endpoint, freezes the listener chains and copies everything
//!   into a [`ClientConfig`]
//!
//! Key rules:
//!
//! - An explicit server address and a host/port pair exclude each other;
//!   switching keeps the already known host or port
//! - An unset port defaults from the enabled transports (1883, 8000, 8883, 8443)
//! - The automatic reconnect policy is always the first disconnected listener
//!
//! # Quick Start
//!
//! ```
//! use mqtt_client_config::{ClientConfig, ClientBuilderBase, Result};
//!
//! fn main() -> Result<()> {
//!     let mut builder = ClientConfig::builder();
//!     builder
//!         .identifier("sensor-17")?
//!         .server_host("broker.example")?
//!         .use_ssl_with_default_config()
//!         .automatic_reconnect_with_default_config();
//!
//!     let config = builder.use_mqtt_version_5().build()?;
//!     assert_eq!(config.server_port(), 8883);
//!     assert_eq!(config.disconnected_listeners().len(), 1);
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Builders, endpoint resolution, listeners, [`ClientConfig`] |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Client identifier types |

// ============================================================================
// Modules
// ============================================================================

/// Client configuration: builders, endpoint, listeners.
///
/// Use [`ClientConfig::builder()`] to start configuring a client.
pub mod client;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Client identity types.
pub mod identifiers;

// ============================================================================
// Re-exports
// ============================================================================

// Client types
pub use client::{
    AdvancedConfig, AutoReconnect, AutoReconnectBuilder, BuilderState, ClientBuilder,
    ClientBuilderBase, ClientConfig, ClientState, ConnectedContext, ConnectedListener,
    ConnectionConfig, DisconnectCause, DisconnectSource, DisconnectedContext,
    DisconnectedListener, Endpoint, ExecutorConfig, ListenerChain, LiveState, Mqtt3ClientBuilder,
    Mqtt5ClientBuilder, MqttVersion, Reconnector, ServerAddress, ServerHost,
    SharedConnectedListener, SharedDisconnectedListener, SslConfig, TransportFlags,
    WebSocketConfig,
};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{ClientIdentifier, ClientIdentifierSetting};
