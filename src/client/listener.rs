//! Connection lifecycle listeners and their assembly.
//!
//! Listeners are registered on a builder in order and frozen into the
//! [`ClientConfig`] as immutable sequences. When an automatic reconnect
//! policy is configured it always heads the disconnected sequence, so it
//! has decided whether to reconnect before any user listener runs.
//!
//! Any `Fn(&ConnectedContext)` or `Fn(&DisconnectedContext)` closure that
//! is `Send + Sync` is a listener.
//!
//! # Example
//!
//! ```
//! use mqtt_client_config::{ClientBuilder, ClientBuilderBase, DisconnectedContext};
//!
//! let mut builder = ClientBuilder::new();
//! builder
//!     .automatic_reconnect_with_default_config()
//!     .add_disconnected_listener(|ctx: &DisconnectedContext| {
//!         println!("disconnected by {:?}", ctx.source());
//!     });
//!
//! let config = builder.use_mqtt_version_5().build().unwrap();
//! assert_eq!(config.disconnected_listeners().len(), 2);
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::error::Error as StdError;
use std::fmt;
use std::iter;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::config::ClientConfig;
use super::reconnect::AutoReconnect;

// ============================================================================
// Types
// ============================================================================

/// Shared handle to a connected listener.
pub type SharedConnectedListener = Arc<dyn ConnectedListener>;

/// Shared handle to a disconnected listener.
pub type SharedDisconnectedListener = Arc<dyn DisconnectedListener>;

/// Error that caused a disconnection.
pub type DisconnectCause = Arc<dyn StdError + Send + Sync>;

// ============================================================================
// Listener Traits
// ============================================================================

/// Notified when the client has connected.
pub trait ConnectedListener: Send + Sync {
    /// Called once the broker acknowledged the connection.
    fn on_connected(&self, context: &ConnectedContext);
}

/// Notified when the client has disconnected or a connection attempt failed.
pub trait DisconnectedListener: Send + Sync {
    /// Called in registration order after every disconnection.
    fn on_disconnected(&self, context: &DisconnectedContext);
}

impl<F> ConnectedListener for F
where
    F: Fn(&ConnectedContext) + Send + Sync,
{
    fn on_connected(&self, context: &ConnectedContext) {
        self(context);
    }
}

impl<F> DisconnectedListener for F
where
    F: Fn(&DisconnectedContext) + Send + Sync,
{
    fn on_disconnected(&self, context: &DisconnectedContext) {
        self(context);
    }
}

// ============================================================================
// DisconnectSource
// ============================================================================

/// Who triggered a disconnection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisconnectSource {
    /// The application asked to disconnect.
    User,

    /// The client itself gave up, e.g. on a protocol error or lost socket.
    Client,

    /// The broker closed the connection.
    Server,
}

// ============================================================================
// Reconnector
// ============================================================================

/// Reconnect decision shared by the disconnected listeners of one event.
#[derive(Debug, Default)]
struct ReconnectDecision {
    /// Whether to reconnect.
    reconnect: bool,
    /// Delay before reconnecting.
    delay: Duration,
}

/// Lets disconnected listeners request a reconnect.
///
/// The decision is read by the connection engine once every listener has
/// run. Later listeners see and may override earlier decisions.
#[derive(Debug, Default)]
pub struct Reconnector {
    /// Reconnect attempts made since the last successful connection.
    attempts: u32,
    /// Current decision.
    decision: Mutex<ReconnectDecision>,
}

impl Reconnector {
    /// Creates a reconnector for the given attempt count.
    #[inline]
    #[must_use]
    pub fn new(attempts: u32) -> Self {
        Self {
            attempts,
            decision: Mutex::default(),
        }
    }

    /// Returns the number of reconnect attempts since the last connection.
    #[inline]
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Requests or cancels a reconnect.
    pub fn set_reconnect(&self, reconnect: bool) -> &Self {
        self.decision.lock().reconnect = reconnect;
        self
    }

    /// Returns `true` if a reconnect is requested.
    #[inline]
    #[must_use]
    pub fn is_reconnect(&self) -> bool {
        self.decision.lock().reconnect
    }

    /// Sets the delay before reconnecting.
    pub fn set_delay(&self, delay: Duration) -> &Self {
        self.decision.lock().delay = delay;
        self
    }

    /// Returns the delay before reconnecting.
    #[inline]
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.decision.lock().delay
    }
}

// ============================================================================
// Contexts
// ============================================================================

/// Passed to [`ConnectedListener::on_connected`].
#[derive(Debug, Clone)]
pub struct ConnectedContext {
    /// Configuration of the connected client.
    client_config: ClientConfig,
}

impl ConnectedContext {
    /// Creates a connected context.
    #[inline]
    #[must_use]
    pub fn new(client_config: ClientConfig) -> Self {
        Self { client_config }
    }

    /// Returns the configuration of the connected client.
    #[inline]
    #[must_use]
    pub fn client_config(&self) -> &ClientConfig {
        &self.client_config
    }
}

/// Passed to [`DisconnectedListener::on_disconnected`].
pub struct DisconnectedContext {
    /// Configuration of the disconnected client.
    client_config: ClientConfig,
    /// Who triggered the disconnection.
    source: DisconnectSource,
    /// Why the connection ended.
    cause: DisconnectCause,
    /// Reconnect decision for this event.
    reconnector: Reconnector,
}

impl fmt::Debug for DisconnectedContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisconnectedContext")
            .field("source", &self.source)
            .field("cause", &self.cause.to_string())
            .field("reconnector", &self.reconnector)
            .finish_non_exhaustive()
    }
}

impl DisconnectedContext {
    /// Creates a disconnected context.
    #[must_use]
    pub fn new(
        client_config: ClientConfig,
        source: DisconnectSource,
        cause: DisconnectCause,
        reconnector: Reconnector,
    ) -> Self {
        Self {
            client_config,
            source,
            cause,
            reconnector,
        }
    }

    /// Returns the configuration of the disconnected client.
    #[inline]
    #[must_use]
    pub fn client_config(&self) -> &ClientConfig {
        &self.client_config
    }

    /// Returns who triggered the disconnection.
    #[inline]
    #[must_use]
    pub fn source(&self) -> DisconnectSource {
        self.source
    }

    /// Returns why the connection ended.
    #[inline]
    #[must_use]
    pub fn cause(&self) -> &(dyn StdError + Send + Sync) {
        self.cause.as_ref()
    }

    /// Returns the reconnector for this event.
    #[inline]
    #[must_use]
    pub fn reconnector(&self) -> &Reconnector {
        &self.reconnector
    }
}

// ============================================================================
// ListenerChain
// ============================================================================

/// Listeners accumulated by a builder, in registration order.
///
/// Cloning a chain copies the sequences; the listeners themselves are
/// shared.
#[derive(Clone, Default)]
pub struct ListenerChain {
    /// Connected listeners.
    connected: Vec<SharedConnectedListener>,
    /// Disconnected listeners, without the reconnect policy.
    disconnected: Vec<SharedDisconnectedListener>,
}

impl fmt::Debug for ListenerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerChain")
            .field("connected", &self.connected.len())
            .field("disconnected", &self.disconnected.len())
            .finish()
    }
}

impl ListenerChain {
    /// Creates an empty chain.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a connected listener.
    pub fn add_connected(&mut self, listener: SharedConnectedListener) {
        self.connected.push(listener);
    }

    /// Appends a disconnected listener.
    pub fn add_disconnected(&mut self, listener: SharedDisconnectedListener) {
        self.disconnected.push(listener);
    }

    /// Returns the number of registered connected listeners.
    #[inline]
    #[must_use]
    pub fn connected_len(&self) -> usize {
        self.connected.len()
    }

    /// Returns the number of registered disconnected listeners.
    #[inline]
    #[must_use]
    pub fn disconnected_len(&self) -> usize {
        self.disconnected.len()
    }

    /// Freezes the connected listeners.
    #[must_use]
    pub fn build_connected(&self) -> Arc<[SharedConnectedListener]> {
        Arc::from(self.connected.as_slice())
    }

    /// Freezes the disconnected listeners, with `auto_reconnect` first if set.
    #[must_use]
    pub fn build_disconnected(
        &self,
        auto_reconnect: Option<&Arc<AutoReconnect>>,
    ) -> Arc<[SharedDisconnectedListener]> {
        match auto_reconnect {
            None => Arc::from(self.disconnected.as_slice()),
            Some(policy) => {
                let policy: SharedDisconnectedListener = policy.clone();
                iter::once(policy)
                    .chain(self.disconnected.iter().cloned())
                    .collect()
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
