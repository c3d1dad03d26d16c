//! Concurrency tests
//!
//! Many submitter threads hammer the engine; afterwards ids must be
//! distinct, no book may be crossed, quantity must be conserved per order
//! and each instrument's trades must arrive in sequence order.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::thread;

use matching_engine::{EngineConfig, MatchingEngine, TradeLog};
use types::ids::{InstrumentId, OrderId};
use types::order::Side;

struct Placed {
    order_id: OrderId,
    instrument: usize,
    quantity: u64,
}

/// Cheap deterministic per-thread pseudo random stream
fn lcg(state: &mut u64) -> u64 {
    *state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    *state >> 33
}

fn run_submitters(engine: &MatchingEngine, threads: usize, orders: usize, instruments: usize) -> Vec<Placed> {
    thread::scope(|scope| {
        let handles: Vec<_> = (0..threads)
            .map(|t| {
                scope.spawn(move || {
                    let mut state = 0x9E37_79B9_7F4A_7C15 ^ t as u64;
                    let mut placed = Vec::with_capacity(orders);
                    for _ in 0..orders {
                        let side = if lcg(&mut state) % 2 == 0 { Side::Buy } else { Side::Sell };
                        let instrument = (lcg(&mut state) % instruments as u64) as usize;
                        let quantity = lcg(&mut state) % 100 + 1;
                        let price = lcg(&mut state) % 20 + 90;
                        let order_id = engine.submit(side, instrument, quantity, price).unwrap();
                        placed.push(Placed { order_id, instrument, quantity });
                    }
                    placed
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    })
}

#[test]
fn test_concurrent_ids_are_unique() {
    let engine = MatchingEngine::new(16);
    let placed = run_submitters(&engine, 8, 500, 16);

    let ids: HashSet<OrderId> = placed.iter().map(|p| p.order_id).collect();
    assert_eq!(ids.len(), 8 * 500);
    assert_eq!(engine.orders_accepted(), 8 * 500);
}

#[test]
fn test_contended_instrument_keeps_invariants() {
    let log = Arc::new(TradeLog::new());
    let engine = MatchingEngine::with_sink(EngineConfig::new(2), log.clone());

    // Two instruments, eight threads: heavy contention on each book
    let placed = run_submitters(&engine, 8, 400, 2);

    for instrument in 0..2 {
        assert!(!engine.is_crossed(instrument).unwrap(), "book {instrument} left crossed");

        let sequences: Vec<u64> = log
            .for_instrument(InstrumentId::new(instrument))
            .iter()
            .map(|t| t.sequence)
            .collect();
        let expected: Vec<u64> = (1..=sequences.len() as u64).collect();
        assert_eq!(sequences, expected, "trades out of match order on {instrument}");
    }

    let mut traded: HashMap<OrderId, u64> = HashMap::new();
    for trade in log.snapshot() {
        *traded.entry(trade.buy_order_id).or_default() += trade.quantity.as_u64();
        *traded.entry(trade.sell_order_id).or_default() += trade.quantity.as_u64();
    }

    for p in &placed {
        let filled = traded.get(&p.order_id).copied().unwrap_or(0);
        let remaining = engine
            .resting_order(p.instrument, p.order_id)
            .unwrap()
            .map_or(0, |o| o.remaining_quantity.as_u64());
        assert_eq!(
            remaining + filled,
            p.quantity,
            "quantity not conserved for order {}",
            p.order_id
        );
    }
}

#[test]
fn test_concurrent_trades_price_inside_limits() {
    let log = Arc::new(TradeLog::new());
    let engine = MatchingEngine::with_sink(EngineConfig::new(4), log.clone());

    thread::scope(|scope| {
        for t in 0..4u64 {
            let engine = &engine;
            scope.spawn(move || {
                for i in 0..250u64 {
                    let (side, price) = if (i + t) % 2 == 0 {
                        (Side::Buy, 100 + i % 5)
                    } else {
                        (Side::Sell, 98 + i % 5)
                    };
                    engine.submit(side, (i % 4) as usize, 1 + i % 3, price).unwrap();
                }
            });
        }
    });

    for trade in log.snapshot() {
        assert!((98..=104).contains(&trade.price.as_u64()));
        assert!(trade.quantity.as_u64() >= 1);
    }
    for instrument in 0..4 {
        assert!(!engine.is_crossed(instrument).unwrap());
    }
}

#[test]
fn test_disjoint_instruments_proceed_independently() {
    let engine = MatchingEngine::new(4);

    // Hold instrument 0's lock while other threads trade elsewhere; they
    // must finish without waiting for it.
    engine
        .with_book(0, |_| {
            thread::scope(|scope| {
                for instrument in 1..4 {
                    let engine = &engine;
                    scope.spawn(move || {
                        for _ in 0..100 {
                            engine.submit(Side::Sell, instrument, 1, 100).unwrap();
                            engine.submit(Side::Buy, instrument, 1, 100).unwrap();
                        }
                    });
                }
            });
        })
        .unwrap();

    for instrument in 1..4 {
        assert_eq!(
            engine.with_book(instrument, |b| (b.order_count(), b.trade_count())).unwrap(),
            (0, 100)
        );
    }
}
