//! Connection state owned by the connection engine.
//!
//! A [`ClientConfig`](super::ClientConfig) is frozen at build time, but
//! three facts about a client only become known once it runs: its state,
//! the identifier the broker assigned, and the negotiated session
//! parameters. [`LiveState`] holds them behind locks so the engine can
//! publish updates while readers share the configuration freely.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::identifiers::ClientIdentifier;

// ============================================================================
// ClientState
// ============================================================================

/// Lifecycle state of a client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientState {
    /// Not connected and no attempt in progress.
    #[default]
    Disconnected,

    /// First connection attempt in progress.
    Connecting,

    /// Connected and acknowledged.
    Connected,

    /// Disconnected, waiting for a scheduled reconnect.
    DisconnectedReconnect,

    /// Reconnect attempt in progress.
    ConnectingReconnect,
}

impl ClientState {
    /// Returns `true` if connected.
    #[inline]
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Returns `true` if connected or a reconnect is pending.
    #[inline]
    #[must_use]
    pub const fn is_connected_or_reconnect(self) -> bool {
        matches!(
            self,
            Self::Connected | Self::DisconnectedReconnect | Self::ConnectingReconnect
        )
    }
}

// ============================================================================
// ConnectionConfig
// ============================================================================

/// Session parameters negotiated with the broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfig {
    /// Keep alive interval in seconds, `0` if disabled.
    pub keep_alive: u16,

    /// Session expiry interval in seconds.
    pub session_expiry_interval: u32,

    /// Maximum in-flight QoS 1/2 messages the client accepts.
    pub receive_maximum: u16,

    /// Largest packet the broker accepts, in bytes.
    pub maximum_packet_size: u32,
}

// ============================================================================
// LiveState
// ============================================================================

/// Runtime facts about a client, updated by the connection engine.
#[derive(Debug, Default)]
pub struct LiveState {
    /// Lifecycle state.
    state: RwLock<ClientState>,
    /// Identifier assigned by the broker.
    assigned_identifier: RwLock<Option<ClientIdentifier>>,
    /// Negotiated session parameters while connected.
    connection: RwLock<Option<Arc<ConnectionConfig>>>,
}

impl LiveState {
    /// Returns the current state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ClientState {
        *self.state.read()
    }

    /// Publishes a new state.
    pub fn set_state(&self, state: ClientState) {
        let previous = std::mem::replace(&mut *self.state.write(), state);
        trace!(?previous, current = ?state, "Client state changed");
    }

    /// Returns the identifier assigned by the broker, if any.
    #[must_use]
    pub fn assigned_identifier(&self) -> Option<ClientIdentifier> {
        self.assigned_identifier.read().clone()
    }

    /// Records the identifier assigned by the broker.
    pub fn set_assigned_identifier(&self, identifier: ClientIdentifier) {
        trace!(identifier = %identifier, "Broker assigned client identifier");
        *self.assigned_identifier.write() = Some(identifier);
    }

    /// Returns the negotiated session parameters, if connected.
    #[must_use]
    pub fn connection_config(&self) -> Option<Arc<ConnectionConfig>> {
        self.connection.read().clone()
    }

    /// Publishes or clears the negotiated session parameters.
    pub fn set_connection_config(&self, config: Option<ConnectionConfig>) {
        *self.connection.write() = config.map(Arc::new);
    }
}

// ============================================================================
// Tests
// ============================================================================
