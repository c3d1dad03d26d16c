//! Throughput of concurrent submitters as the instrument count grows
//!
//! Each thread owns one instrument and submits a fixed number of crossing
//! orders. With per-instrument locking the wall time should stay roughly
//! flat as threads and instruments are added together.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use matching_engine::MatchingEngine;
use std::thread;
use types::order::Side;

const ORDERS_PER_INSTRUMENT: u64 = 2_000;

fn submit_stream(engine: &MatchingEngine, instrument: usize) {
    for i in 0..ORDERS_PER_INSTRUMENT {
        let (side, price) = if i % 2 == 0 {
            (Side::Sell, 100 + i % 7)
        } else {
            (Side::Buy, 100 + i % 11)
        };
        let id = engine.submit(side, instrument, 1 + i % 5, price).unwrap();
        black_box(id);
    }
}

fn bench_instrument_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("instrument_isolation");

    for instruments in [1usize, 2, 4, 8] {
        group.throughput(Throughput::Elements(ORDERS_PER_INSTRUMENT * instruments as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(instruments),
            &instruments,
            |b, &instruments| {
                b.iter(|| {
                    let engine = MatchingEngine::new(instruments);
                    thread::scope(|scope| {
                        for instrument in 0..instruments {
                            let engine = &engine;
                            scope.spawn(move || submit_stream(engine, instrument));
                        }
                    });
                });
            },
        );
    }

    group.finish();
}

fn bench_shared_instrument(c: &mut Criterion) {
    let mut group = c.benchmark_group("shared_instrument");

    // Same total load as above, but every thread contends on instrument 0
    for threads in [1usize, 2, 4, 8] {
        group.throughput(Throughput::Elements(ORDERS_PER_INSTRUMENT * threads as u64));
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            b.iter(|| {
                let engine = MatchingEngine::new(1);
                thread::scope(|scope| {
                    for _ in 0..threads {
                        let engine = &engine;
                        scope.spawn(move || submit_stream(engine, 0));
                    }
                });
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_instrument_scaling, bench_shared_instrument);
criterion_main!(benches);
