//! Criterion benchmarks for device-list decoding and peer-address layout.
//!
//! Run with:
//! ```bash
//! cargo bench --package irda-core --bench device_list_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use irda_core::{
    AddressLayout, DiscoveredDevice, HintFlags, LinuxLayout, ServiceSelector, WinsockLayout,
    DISCOVER_MAX_DEVICES,
};

// ── Fixtures ──────────────────────────────────────────────────────────────────

fn make_devices(count: usize) -> Vec<DiscoveredDevice> {
    (0..count)
        .map(|i| DiscoveredDevice {
            address: 0x1000_0000 + i as u32,
            name: format!("device-{i:02}"),
            charset: 0,
            hints: HintFlags(HintFlags::COMPUTER | HintFlags::OBEX),
        })
        .collect()
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_device_list");
    for count in [1usize, 4, DISCOVER_MAX_DEVICES] {
        let devices = make_devices(count);
        let linux = LinuxLayout::encode_device_list(&devices);
        let winsock = WinsockLayout::encode_device_list(&devices);

        group.bench_with_input(BenchmarkId::new("linux", count), &linux, |b, buf| {
            b.iter(|| LinuxLayout::decode_device_list(black_box(buf)))
        });
        group.bench_with_input(BenchmarkId::new("winsock", count), &winsock, |b, buf| {
            b.iter(|| WinsockLayout::decode_device_list(black_box(buf)))
        });
    }
    group.finish();
}

fn bench_peer_address(c: &mut Criterion) {
    c.bench_function("build_peer_address/linux/name", |b| {
        b.iter(|| {
            LinuxLayout::build_peer_address(black_box(0x0102_0304), ServiceSelector::Name(Some("OBEX")))
        })
    });
    c.bench_function("build_peer_address/winsock/lsap", |b| {
        b.iter(|| WinsockLayout::build_peer_address(black_box(0x0102_0304), ServiceSelector::Lsap(18)))
    });
}

criterion_group!(benches, bench_decode, bench_peer_address);
criterion_main!(benches);
