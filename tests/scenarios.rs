//! End-to-end configuration scenarios.

use std::io::{Error as IoError, ErrorKind};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::thread;

use mqtt_client_config::{
    ClientBuilder, ClientBuilderBase, ClientConfig, ClientState, ConnectedContext,
    DisconnectSource, DisconnectedContext, MqttVersion, Reconnector,
};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Helpers
// ============================================================================

/// Installs a log subscriber once; honours `RUST_LOG`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Runs every disconnected listener in order, as the engine would.
fn notify_disconnected(config: &ClientConfig, source: DisconnectSource) -> DisconnectedContext {
    let context = DisconnectedContext::new(
        config.clone(),
        source,
        Arc::new(IoError::new(ErrorKind::ConnectionReset, "connection reset")),
        Reconnector::new(0),
    );
    for listener in config.disconnected_listeners() {
        listener.on_disconnected(&context);
    }
    context
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_secure_host_scenario() -> anyhow::Result<()> {
    init_tracing();

    let mut builder = ClientBuilder::new();
    builder
        .server_host("broker.example")?
        .use_ssl_with_default_config();
    let config = builder.use_mqtt_version_5().build()?;

    assert_eq!(config.mqtt_version(), MqttVersion::Mqtt5_0);
    assert_eq!(config.server_host(), "broker.example");
    assert_eq!(config.server_port(), 8883);
    Ok(())
}

#[test]
fn test_explicit_address_then_port_scenario() -> anyhow::Result<()> {
    init_tracing();

    let mut builder = ClientBuilder::new();
    builder
        .server_address(SocketAddr::from((Ipv4Addr::new(10, 0, 0, 5), 9001)))
        .server_port(9002)?;
    let config = builder.use_mqtt_version_3().build()?;

    assert_eq!(config.server_host(), "10.0.0.5");
    assert_eq!(config.server_port(), 9002);
    Ok(())
}

#[test]
fn test_reconnect_decides_before_user_listeners() -> anyhow::Result<()> {
    init_tracing();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let observer = Arc::clone(&seen);

    let mut builder = ClientBuilder::new();
    builder
        .add_disconnected_listener(move |ctx: &DisconnectedContext| {
            observer
                .lock()
                .unwrap()
                .push(ctx.reconnector().is_reconnect());
        })
        .automatic_reconnect_with_default_config();
    let config = builder.use_mqtt_version_5().build()?;

    let context = notify_disconnected(&config, DisconnectSource::Server);
    assert!(context.reconnector().is_reconnect());
    assert_eq!(*seen.lock().unwrap(), vec![true]);

    notify_disconnected(&config, DisconnectSource::User);
    assert_eq!(*seen.lock().unwrap(), vec![true, false]);
    Ok(())
}

#[test]
fn test_connected_listeners_see_config() -> anyhow::Result<()> {
    init_tracing();

    let hosts = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&hosts);

    let mut builder = ClientBuilder::new();
    builder
        .identifier("sensor-17")?
        .add_connected_listener(move |ctx: &ConnectedContext| {
            sink.lock().unwrap().push(ctx.client_config().server_host());
        });
    let config = builder.use_mqtt_version_5().build()?;

    let context = ConnectedContext::new(config.clone());
    for listener in config.connected_listeners() {
        listener.on_connected(&context);
    }

    assert_eq!(*hosts.lock().unwrap(), vec!["localhost".to_string()]);
    assert_eq!(
        config.client_identifier().map(|id| id.to_string()),
        Some("sensor-17".to_string())
    );
    Ok(())
}

#[test]
fn test_config_shared_across_threads() -> anyhow::Result<()> {
    init_tracing();

    let mut builder = ClientBuilder::new();
    builder.use_web_socket_with_default_config();
    let config = builder.use_mqtt_version_3().build()?;
    config.live().set_state(ClientState::Connected);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let config = config.clone();
            thread::spawn(move || (config.server_port(), config.state()))
        })
        .collect();

    for handle in handles {
        let (port, state) = handle.join().expect("reader thread panicked");
        assert_eq!(port, 8000);
        assert_eq!(state, ClientState::Connected);
    }
    Ok(())
}

#[test]
fn test_rejected_setters_are_recoverable() -> anyhow::Result<()> {
    init_tracing();

    let mut builder = ClientBuilder::new();
    assert!(builder.server_host("").is_err());
    assert!(builder.server_port(0).is_err());
    assert!(builder.identifier("").is_err());

    builder.server_host("broker.example")?.server_port(1884)?;
    let config = builder.use_mqtt_version_5().build()?;
    assert_eq!(config.server_address().to_string(), "broker.example:1884");
    Ok(())
}
