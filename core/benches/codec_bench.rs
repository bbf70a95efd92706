//! Criterion benchmarks for the intent envelope codec.
//!
//! The codec sits on the hot path of every device-to-device exchange;
//! these benches keep an eye on encode/decode cost so a serialization
//! change that regresses tap latency shows up in numbers, not anecdotes.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use setu_core::intent::{decode, encode, PaymentIntent};

fn bench_encode(c: &mut Criterion) {
    let intent = PaymentIntent {
        amount: 99.5,
        payee_upi: "bob@pay".to_string(),
        timestamp: 1_700_000_000_000,
    };
    c.bench_function("intent_encode", |b| {
        b.iter(|| encode(black_box(&intent)));
    });
}

fn bench_decode(c: &mut Criterion) {
    let envelope = encode(&PaymentIntent {
        amount: 99.5,
        payee_upi: "bob@pay".to_string(),
        timestamp: 1_700_000_000_000,
    });
    c.bench_function("intent_decode", |b| {
        b.iter(|| decode(black_box(&envelope)).expect("valid envelope"));
    });
}

fn bench_round_trip(c: &mut Criterion) {
    let intent = PaymentIntent {
        amount: 123_456.78,
        payee_upi: "merchant.settlements@bigbank".to_string(),
        timestamp: 1_700_000_000_000,
    };
    c.bench_function("intent_round_trip", |b| {
        b.iter(|| decode(&encode(black_box(&intent))).expect("round trip"));
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_round_trip);
criterion_main!(benches);
