//! MQTT client configuration module.
//!
//! This module turns a sequence of builder calls into one immutable
//! [`ClientConfig`] for the connection engine.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ClientBuilder`] | Entry builder, chooses the protocol version |
//! | [`Mqtt3ClientBuilder`] / [`Mqtt5ClientBuilder`] | Version builders |
//! | [`ClientBuilderBase`] | Setters shared by all builders |
//! | [`Endpoint`] | Explicit address or host/port, with default ports |
//! | [`ListenerChain`] | Ordered connected/disconnected listeners |
//! | [`AutoReconnect`] | Reconnect policy, always first to hear of a disconnect |
//! | [`ClientConfig`] | The frozen result |
//!
//! # Example
//!
//! ```
//! use mqtt_client_config::{ClientBuilder, ClientBuilderBase, Result};
//!
//! # fn example() -> Result<()> {
//! let mut builder = ClientBuilder::new();
//! builder
//!     .server_host("broker.example")?
//!     .use_web_socket_with_default_config()
//!     .automatic_reconnect_with_default_config();
//!
//! let config = builder.use_mqtt_version_3().build()?;
//! assert_eq!(config.server_port(), 8000);
//! assert!(config.automatic_reconnect().is_some());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Protocol version and advanced options.
pub mod advanced;

/// Builders and the shared setter trait.
pub mod builder;

/// Immutable client configuration.
pub mod config;

/// Server endpoint representation and default ports.
pub mod endpoint;

/// Lifecycle listeners and listener chain assembly.
pub mod listener;

/// Automatic reconnect policy.
pub mod reconnect;

/// Engine-owned client state.
pub mod state;

/// TLS, WebSocket and executor configurations.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

pub use advanced::{AdvancedConfig, MqttVersion};
pub use builder::{
    BuilderState, ClientBuilder, ClientBuilderBase, Mqtt3ClientBuilder, Mqtt5ClientBuilder,
};
pub use config::ClientConfig;
pub use endpoint::{Endpoint, ServerAddress, ServerHost, TransportFlags};
pub use listener::{
    ConnectedContext, ConnectedListener, DisconnectCause, DisconnectSource, DisconnectedContext,
    DisconnectedListener, ListenerChain, Reconnector, SharedConnectedListener,
    SharedDisconnectedListener,
};
pub use reconnect::{AutoReconnect, AutoReconnectBuilder};
pub use state::{ClientState, ConnectionConfig, LiveState};
pub use transport::{ExecutorConfig, SslConfig, WebSocketConfig};
