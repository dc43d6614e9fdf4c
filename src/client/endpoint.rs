//! Server endpoint representation and resolution.
//!
//! The server can be named in two mutually exclusive ways:
//!
//! - an explicit [`ServerAddress`] whose port is always authoritative
//! - a [`ServerHost`] with an optional port, defaulted from the enabled
//!   transport layers when unset
//!
//! [`Endpoint`] is the sum of both. Setting one representation converts
//! the other so that the last written host and port win.
//!
//! # Default Ports
//!
//! | Secure | WebSocket | Port |
//! |--------|-----------|------|
//! | no | no | [`DEFAULT_SERVER_PORT`] (1883) |
//! | no | yes | [`DEFAULT_SERVER_PORT_WEBSOCKET`] (8000) |
//! | yes | no | [`DEFAULT_SERVER_PORT_SSL`] (8883) |
//! | yes | yes | [`DEFAULT_SERVER_PORT_WEBSOCKET_SSL`] (8443) |
//!
//! # Example
//!
//! ```
//! use mqtt_client_config::{Endpoint, ServerAddress, ServerHost, TransportFlags};
//!
//! let mut endpoint = Endpoint::default();
//! endpoint.set_explicit_address(ServerAddress::unresolved("broker.example", 1000).unwrap());
//! endpoint.set_host(ServerHost::name("other.example").unwrap());
//!
//! let address = endpoint.resolve(TransportFlags::default());
//! assert_eq!(address.host_string(), "other.example");
//! assert_eq!(address.port(), 1000);
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use tracing::debug;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Host used when none was configured.
pub const DEFAULT_SERVER_HOST: &str = "localhost";

/// Plain TCP port.
pub const DEFAULT_SERVER_PORT: u16 = 1883;

/// WebSocket port.
pub const DEFAULT_SERVER_PORT_WEBSOCKET: u16 = 8000;

/// TLS port.
pub const DEFAULT_SERVER_PORT_SSL: u16 = 8883;

/// WebSocket over TLS port.
pub const DEFAULT_SERVER_PORT_WEBSOCKET_SSL: u16 = 8443;

// ============================================================================
// ServerHost
// ============================================================================

/// Host identity of the server: a name to be looked up, or a literal address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServerHost {
    /// Hostname, resolved by the transport at connect time.
    Name(String),

    /// Literal IP address.
    Ip(IpAddr),
}

impl ServerHost {
    /// Creates a named host.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `host` is empty.
    pub fn name(host: impl Into<String>) -> Result<Self> {
        let host = host.into();
        if host.is_empty() {
            return Err(Error::validation("Server host must not be empty"));
        }
        Ok(Self::Name(host))
    }

    /// Returns the host as it would appear in a URI authority, without brackets.
    #[must_use]
    pub fn host_string(&self) -> String {
        match self {
            Self::Name(name) => name.clone(),
            Self::Ip(ip) => ip.to_string(),
        }
    }

    /// Returns the literal address, if this host is one.
    #[inline]
    #[must_use]
    pub fn ip(&self) -> Option<IpAddr> {
        match self {
            Self::Name(_) => None,
            Self::Ip(ip) => Some(*ip),
        }
    }

    /// Pairs this host with a port.
    #[must_use]
    pub fn with_port(self, port: u16) -> ServerAddress {
        match self {
            Self::Name(host) => ServerAddress::Unresolved { host, port },
            Self::Ip(ip) => ServerAddress::Resolved(SocketAddr::new(ip, port)),
        }
    }
}

impl Default for ServerHost {
    fn default() -> Self {
        Self::Name(DEFAULT_SERVER_HOST.to_string())
    }
}

impl fmt::Display for ServerHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Ip(ip) => write!(f, "{ip}"),
        }
    }
}

impl From<IpAddr> for ServerHost {
    fn from(ip: IpAddr) -> Self {
        Self::Ip(ip)
    }
}

impl From<Ipv4Addr> for ServerHost {
    fn from(ip: Ipv4Addr) -> Self {
        Self::Ip(IpAddr::V4(ip))
    }
}

impl From<Ipv6Addr> for ServerHost {
    fn from(ip: Ipv6Addr) -> Self {
        Self::Ip(IpAddr::V6(ip))
    }
}

// ============================================================================
// ServerAddress
// ============================================================================

/// Fully specified server address: host identity plus port.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServerAddress {
    /// Socket address with a literal IP.
    Resolved(SocketAddr),

    /// Hostname and port that have not been looked up.
    Unresolved {
        /// Hostname.
        host: String,
        /// Port.
        port: u16,
    },
}

impl ServerAddress {
    /// Creates an unresolved address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `host` is empty.
    pub fn unresolved(host: impl Into<String>, port: u16) -> Result<Self> {
        let host = host.into();
        if host.is_empty() {
            return Err(Error::validation("Server address host must not be empty"));
        }
        Ok(Self::Unresolved { host, port })
    }

    /// Returns the port.
    #[inline]
    #[must_use]
    pub fn port(&self) -> u16 {
        match self {
            Self::Resolved(addr) => addr.port(),
            Self::Unresolved { port, .. } => *port,
        }
    }

    /// Returns the literal address, if resolved.
    #[inline]
    #[must_use]
    pub fn ip(&self) -> Option<IpAddr> {
        match self {
            Self::Resolved(addr) => Some(addr.ip()),
            Self::Unresolved { .. } => None,
        }
    }

    /// Returns the host part as a string.
    #[must_use]
    pub fn host_string(&self) -> String {
        match self {
            Self::Resolved(addr) => addr.ip().to_string(),
            Self::Unresolved { host, .. } => host.clone(),
        }
    }

    /// Returns the host part, preferring the literal address over the name.
    #[must_use]
    pub fn host(&self) -> ServerHost {
        match self {
            Self::Resolved(addr) => ServerHost::Ip(addr.ip()),
            Self::Unresolved { host, .. } => ServerHost::Name(host.clone()),
        }
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved(addr) => write!(f, "{addr}"),
            Self::Unresolved { host, port } if host.contains(':') && !host.starts_with('[') => {
                write!(f, "[{host}]:{port}")
            }
            Self::Unresolved { host, port } => write!(f, "{host}:{port}"),
        }
    }
}

impl From<SocketAddr> for ServerAddress {
    fn from(addr: SocketAddr) -> Self {
        Self::Resolved(addr)
    }
}

// ============================================================================
// TransportFlags
// ============================================================================

/// Which optional transport layers are enabled.
///
/// Only used to pick a default port.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransportFlags {
    /// TLS is configured.
    pub secure: bool,
    /// WebSocket framing is configured.
    pub web_socket: bool,
}

impl TransportFlags {
    /// Creates flags from the two transport switches.
    #[inline]
    #[must_use]
    pub const fn new(secure: bool, web_socket: bool) -> Self {
        Self { secure, web_socket }
    }

    /// Returns the port used when none was set explicitly.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match (self.secure, self.web_socket) {
            (false, false) => DEFAULT_SERVER_PORT,
            (false, true) => DEFAULT_SERVER_PORT_WEBSOCKET,
            (true, false) => DEFAULT_SERVER_PORT_SSL,
            (true, true) => DEFAULT_SERVER_PORT_WEBSOCKET_SSL,
        }
    }
}

// ============================================================================
// Endpoint
// ============================================================================

/// Current representation of the server endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Explicit socket address; its port is never defaulted.
    Explicit(ServerAddress),

    /// Host with an optional port.
    HostPort {
        /// Host identity.
        host: ServerHost,
        /// Port, or `None` to use the transport default.
        port: Option<u16>,
    },
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::HostPort {
            host: ServerHost::default(),
            port: None,
        }
    }
}

impl Endpoint {
    /// Replaces the endpoint with an explicit address.
    ///
    /// Any stored host and port are discarded.
    pub fn set_explicit_address(&mut self, address: ServerAddress) {
        debug!(address = %address, "Server address set explicitly");
        *self = Self::Explicit(address);
    }

    /// Sets the host.
    ///
    /// An explicit address is converted to host/port form and its port is
    /// kept.
    pub fn set_host(&mut self, host: ServerHost) {
        match self {
            Self::Explicit(address) => {
                let port = address.port();
                debug!(
                    from = %address,
                    host = %host,
                    port,
                    "Converted explicit address on host change"
                );
                *self = Self::HostPort {
                    host,
                    port: Some(port),
                };
            }
            Self::HostPort { host: current, .. } => *current = host,
        }
    }

    /// Sets the port.
    ///
    /// An explicit address is converted to host/port form and its host is
    /// kept, as a literal IP when it has one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `port` is `0`. The endpoint is left
    /// unchanged.
    pub fn set_port(&mut self, port: u16) -> Result<()> {
        if port == 0 {
            return Err(Error::validation(
                "Server port must be in the range 1..=65535, but was 0",
            ));
        }

        match self {
            Self::Explicit(address) => {
                let host = address.host();
                debug!(
                    from = %address,
                    host = %host,
                    port,
                    "Converted explicit address on port change"
                );
                *self = Self::HostPort {
                    host,
                    port: Some(port),
                };
            }
            Self::HostPort { port: current, .. } => *current = Some(port),
        }
        Ok(())
    }

    /// Returns `true` if an explicit address is current.
    #[inline]
    #[must_use]
    pub fn is_explicit(&self) -> bool {
        matches!(self, Self::Explicit(_))
    }

    /// Resolves the endpoint to a concrete address.
    ///
    /// An explicit address is returned verbatim. Otherwise the stored host
    /// is paired with the stored port, or the default for `flags`.
    #[must_use]
    pub fn resolve(&self, flags: TransportFlags) -> ServerAddress {
        match self {
            Self::Explicit(address) => address.clone(),
            Self::HostPort { host, port } => host
                .clone()
                .with_port(port.unwrap_or_else(|| flags.default_port())),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn v4(a: u8, b: u8, c: u8, d: u8, port: u16) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::new(a, b, c, d)), port)
    }

    // ------------------------------------------------------------------------
    // Default Port Tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_default_port_table() {
        assert_eq!(TransportFlags::new(false, false).default_port(), 1883);
        assert_eq!(TransportFlags::new(false, true).default_port(), 8000);
        assert_eq!(TransportFlags::new(true, false).default_port(), 8883);
        assert_eq!(TransportFlags::new(true, true).default_port(), 8443);
    }

    #[test]
    fn test_default_endpoint_resolves_localhost() {
        let address = Endpoint::default().resolve(TransportFlags::default());
        assert_eq!(
            address,
            ServerAddress::Unresolved {
                host: "localhost".into(),
                port: 1883
            }
        );
    }

    // ------------------------------------------------------------------------
    // ServerHost / ServerAddress Tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_server_host_rejects_empty() {
        assert!(ServerHost::name("").unwrap_err().is_validation_error());
    }

    #[test]
    fn test_server_host_with_port() {
        let named = ServerHost::name("broker").unwrap().with_port(1);
        assert_eq!(named.to_string(), "broker:1");

        let ip = ServerHost::from(Ipv4Addr::LOCALHOST).with_port(2);
        assert_eq!(ip, ServerAddress::Resolved(v4(127, 0, 0, 1, 2)));
    }

    #[test]
    fn test_server_address_accessors() {
        let resolved = ServerAddress::from(v4(10, 0, 0, 5, 9001));
        assert_eq!(resolved.port(), 9001);
        assert_eq!(resolved.host_string(), "10.0.0.5");
        assert!(resolved.ip().is_some());

        let unresolved = ServerAddress::unresolved("broker", 7).unwrap();
        assert_eq!(unresolved.port(), 7);
        assert_eq!(unresolved.host(), ServerHost::Name("broker".into()));
        assert!(unresolved.ip().is_none());

        assert!(ServerAddress::unresolved("", 7).is_err());
    }

    #[test]
    fn test_ipv6_display_is_bracketed() {
        let address = ServerHost::from(Ipv6Addr::LOCALHOST).with_port(8883);
        assert_eq!(address.to_string(), "[::1]:8883");
    }

    #[test]
    fn test_ipv6_name_display_is_bracketed() {
        let address = ServerAddress::unresolved("::1", 8000).unwrap();
        assert_eq!(address.to_string(), "[::1]:8000");
        assert_eq!(address.host_string(), "::1");

        let address = ServerAddress::unresolved("[::1]", 8000).unwrap();
        assert_eq!(address.to_string(), "[::1]:8000");
    }

    // ------------------------------------------------------------------------
    // Transition Tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_explicit_address_is_verbatim() {
        let mut endpoint = Endpoint::default();
        endpoint.set_explicit_address(v4(10, 0, 0, 5, 9001).into());

        for flags in [
            TransportFlags::new(false, false),
            TransportFlags::new(true, true),
        ] {
            assert_eq!(endpoint.resolve(flags).port(), 9001);
        }
    }

    #[test]
    fn test_explicit_address_discards_host_and_port() {
        let mut endpoint = Endpoint::default();
        endpoint.set_host(ServerHost::name("old").unwrap());
        endpoint.set_port(1234).unwrap();
        endpoint.set_explicit_address(ServerAddress::unresolved("new", 4321).unwrap());

        assert!(endpoint.is_explicit());
        assert_eq!(endpoint.resolve(TransportFlags::default()).to_string(), "new:4321");
    }

    #[test]
    fn test_host_after_explicit_keeps_port() {
        let mut endpoint = Endpoint::default();
        endpoint.set_explicit_address(v4(10, 0, 0, 5, 1000).into());
        endpoint.set_host(ServerHost::name("h").unwrap());

        let address = endpoint.resolve(TransportFlags::new(true, true));
        assert_eq!(address.host_string(), "h");
        assert_eq!(address.port(), 1000);
    }

    #[test]
    fn test_port_after_explicit_keeps_literal_host() {
        let mut endpoint = Endpoint::default();
        endpoint.set_explicit_address(v4(10, 0, 0, 5, 9001).into());
        endpoint.set_port(9002).unwrap();

        assert_eq!(
            endpoint,
            Endpoint::HostPort {
                host: ServerHost::Ip(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5))),
                port: Some(9002),
            }
        );
    }

    #[test]
    fn test_port_after_unresolved_explicit_keeps_name() {
        let mut endpoint = Endpoint::default();
        endpoint.set_explicit_address(ServerAddress::unresolved("broker", 1).unwrap());
        endpoint.set_port(2).unwrap();

        let address = endpoint.resolve(TransportFlags::default());
        assert_eq!(address, ServerAddress::unresolved("broker", 2).unwrap());
    }

    #[test]
    fn test_zero_port_rejected_without_mutation() {
        let mut endpoint = Endpoint::default();
        endpoint.set_explicit_address(v4(1, 2, 3, 4, 5).into());
        let before = endpoint.clone();

        assert!(endpoint.set_port(0).is_err());
        assert_eq!(endpoint, before);
    }

    #[test]
    fn test_host_without_port_uses_default() {
        let mut endpoint = Endpoint::default();
        endpoint.set_host(ServerHost::name("broker.example").unwrap());

        let address = endpoint.resolve(TransportFlags::new(true, false));
        assert_eq!(address.to_string(), "broker.example:8883");
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let mut endpoint = Endpoint::default();
        endpoint.set_port(42).unwrap();
        let flags = TransportFlags::new(false, true);
        assert_eq!(endpoint.resolve(flags), endpoint.resolve(flags));
    }
}
