// benches/protocol_bench.rs

//! Hot-path benchmarks: request serialization, reply parsing, and ring
//! lookup.

use bytes::{Bytes, BytesMut};
use citrine::core::cluster::HashRing;
use citrine::core::commands::CommandCatalog;
use citrine::core::protocol::{RequestEncoding, encode_request, parse_reply};
use criterion::{Criterion, criterion_group, criterion_main};

fn bench_encode_multibulk(c: &mut Criterion) {
    let args: Vec<Bytes> = vec![
        Bytes::from_static(b"user:1000:profile"),
        Bytes::from_static(&[0x42; 512]),
    ];
    c.bench_function("encode_multibulk_set", |b| {
        b.iter(|| {
            let mut buf = BytesMut::with_capacity(600);
            encode_request("SET", &args, RequestEncoding::MultiBulk, &mut buf).unwrap();
            buf
        })
    });
}

fn bench_encode_inline(c: &mut Criterion) {
    let args: Vec<Bytes> = vec![Bytes::from_static(b"user:1000:profile")];
    c.bench_function("encode_inline_get", |b| {
        b.iter(|| {
            let mut buf = BytesMut::with_capacity(64);
            encode_request("GET", &args, RequestEncoding::Inline, &mut buf).unwrap();
            buf
        })
    });
}

fn bench_parse_reply(c: &mut Criterion) {
    let bulk = {
        let mut frame = b"$512\r\n".to_vec();
        frame.extend_from_slice(&[0x42; 512]);
        frame.extend_from_slice(b"\r\n");
        frame
    };
    c.bench_function("parse_bulk_reply", |b| {
        b.iter(|| parse_reply(&bulk).unwrap())
    });

    let multibulk = b"*4\r\n$3\r\nfoo\r\n:42\r\n+OK\r\n$-1\r\n".to_vec();
    c.bench_function("parse_multibulk_reply", |b| {
        b.iter(|| parse_reply(&multibulk).unwrap())
    });
}

fn bench_catalog_resolve(c: &mut Criterion) {
    let catalog = CommandCatalog::default();
    c.bench_function("catalog_resolve_get", |b| {
        b.iter(|| {
            catalog
                .resolve("get", vec![Bytes::from_static(b"user:1000:profile")])
                .unwrap()
        })
    });
}

fn bench_ring_lookup(c: &mut Criterion) {
    let mut ring = HashRing::new();
    for i in 0..10 {
        ring.add(&format!("10.0.0.{i}:6379"), i);
    }
    let keys: Vec<String> = (0..128).map(|i| format!("session:{i}")).collect();
    c.bench_function("ring_lookup", |b| {
        let mut cursor = 0usize;
        b.iter(|| {
            cursor = (cursor + 1) % keys.len();
            *ring.get(keys[cursor].as_bytes()).unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_encode_multibulk,
    bench_encode_inline,
    bench_parse_reply,
    bench_catalog_resolve,
    bench_ring_lookup
);
criterion_main!(benches);
