//! Build step benchmark.
//!
//! Measures freezing a builder into a `ClientConfig` with growing
//! listener counts.
//!
//! Run with: cargo bench --bench build_config
//! Results saved to: target/criterion/

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use mqtt_client_config::{ClientBuilder, ClientBuilderBase, DisconnectedContext};

// ============================================================================
// Benchmark Parameters
// ============================================================================

const LISTENER_COUNTS: &[usize] = &[0, 8, 64];

// ============================================================================
// Benchmark: Build
// ============================================================================

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_config");

    for &count in LISTENER_COUNTS {
        let mut builder = ClientBuilder::new();
        builder
            .server_host("broker.example")
            .expect("valid host")
            .use_ssl_with_default_config()
            .automatic_reconnect_with_default_config();
        for _ in 0..count {
            builder.add_disconnected_listener(|_: &DisconnectedContext| {});
        }
        let v5 = builder.use_mqtt_version_5();

        group.bench_with_input(BenchmarkId::new("listeners", count), &v5, |b, v5| {
            b.iter(|| black_box(v5.build().expect("build")));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Endpoint Resolution
// ============================================================================

fn bench_resolve(c: &mut Criterion) {
    let mut builder = ClientBuilder::new();
    builder
        .server_address(std::net::SocketAddr::from(([10, 0, 0, 5], 9001)))
        .server_port(9002)
        .expect("valid port");

    c.bench_function("resolve_server_address", |b| {
        b.iter(|| black_box(builder.resolve_server_address().expect("resolve")));
    });
}

criterion_group!(benches, bench_build, bench_resolve);
criterion_main!(benches);
