//! Concurrent broker harness
//!
//! Spawns one scoped thread per broker against a shared engine. Each thread
//! keeps its own metrics and submission record; they are merged after all
//! brokers finish, so the hot path shares nothing but the engine.

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use matching_engine::{EngineConfig, MatchingEngine, TradeLog};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use types::errors::EngineError;
use types::ids::OrderId;
use types::order::Side;
use types::trade::Trade;

use crate::broker::{Broker, BrokerConfig, OrderIntent};
use crate::metrics::SimMetrics;

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of concurrent broker threads
    pub brokers: usize,
    /// Orders each broker submits
    pub orders_per_broker: usize,
    /// Instrument universe of the engine built by [`simulate`]
    pub instrument_capacity: usize,
    /// Broker `i` is seeded with `seed + i`
    pub seed: u64,
    pub broker: BrokerConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            brokers: 10,
            orders_per_broker: 200,
            instrument_capacity: matching_engine::config::DEFAULT_INSTRUMENT_CAPACITY,
            seed: 42,
            broker: BrokerConfig::default(),
        }
    }
}

/// An order the engine accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedOrder {
    pub order_id: OrderId,
    pub broker: usize,
    pub side: Side,
    pub instrument: usize,
    pub quantity: u64,
    pub price: u64,
}

/// An order the engine refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub broker: usize,
    pub intent: OrderIntent,
    pub error: EngineError,
}

/// Outcome of [`run_simulation`].
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub submitted: Vec<SubmittedOrder>,
    pub rejections: Vec<Rejection>,
    pub metrics: SimMetrics,
}

/// Engine, trades and report of a self-contained run.
#[derive(Debug)]
pub struct SimulationOutcome {
    pub engine: MatchingEngine,
    pub trades: Vec<Trade>,
    pub report: SimulationReport,
}

#[derive(Default)]
struct BrokerRun {
    submitted: Vec<SubmittedOrder>,
    rejections: Vec<Rejection>,
    metrics: SimMetrics,
}

fn run_broker(engine: &MatchingEngine, mut broker: Broker, orders: usize) -> BrokerRun {
    let mut run = BrokerRun::default();

    for _ in 0..orders {
        let started = Instant::now();
        let (intent, result) = broker.submit_next(engine);
        run.metrics
            .record_latency(u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX));

        match result {
            Ok(order_id) => {
                run.metrics.record_order();
                run.submitted.push(SubmittedOrder {
                    order_id,
                    broker: broker.broker_id,
                    side: intent.side,
                    instrument: intent.instrument,
                    quantity: intent.quantity,
                    price: intent.price,
                });
            }
            Err(error) => {
                run.metrics.record_rejection();
                let fatal = error.is_fatal();
                run.rejections.push(Rejection {
                    broker: broker.broker_id,
                    intent,
                    error,
                });
                if fatal {
                    warn!(broker = broker.broker_id, "Engine halted; broker stopping early");
                    break;
                }
            }
        }
    }

    debug!(
        broker = broker.broker_id,
        accepted = run.metrics.total_orders,
        rejected = run.metrics.total_rejections,
        "Broker finished"
    );
    run
}

/// Drive `engine` with `config.brokers` concurrent brokers.
///
/// Brokers draw instruments from the engine's own capacity. Trades are not
/// captured here; they go to whatever sink the engine was built with.
pub fn run_simulation(engine: &MatchingEngine, config: &SimulationConfig) -> SimulationReport {
    let instruments = engine.instrument_capacity();
    info!(
        brokers = config.brokers,
        orders_per_broker = config.orders_per_broker,
        instruments,
        seed = config.seed,
        "Starting simulation"
    );

    let started = Instant::now();
    let runs: Vec<BrokerRun> = thread::scope(|scope| {
        let handles: Vec<_> = (0..config.brokers)
            .map(|id| {
                let broker = Broker::new(
                    id,
                    config.broker.clone(),
                    instruments,
                    config.seed.wrapping_add(id as u64),
                );
                let orders = config.orders_per_broker;
                scope.spawn(move || run_broker(engine, broker, orders))
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    });
    let elapsed = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);

    let mut report = SimulationReport {
        submitted: Vec::new(),
        rejections: Vec::new(),
        metrics: SimMetrics::new(),
    };
    for run in runs {
        report.submitted.extend(run.submitted);
        report.rejections.extend(run.rejections);
        report.metrics.merge(&run.metrics);
    }
    report.metrics.set_elapsed(elapsed);

    info!(summary = %report.metrics.summary(), "Simulation finished");
    report
}

/// Build an engine with a trade log, run the simulation, collect trades.
pub fn simulate(config: &SimulationConfig) -> SimulationOutcome {
    let log = Arc::new(TradeLog::new());
    let engine = MatchingEngine::with_sink(EngineConfig::new(config.instrument_capacity), log.clone());

    let mut report = run_simulation(&engine, config);
    let trades = log.drain();
    report.metrics.ingest_trades(&trades);

    SimulationOutcome {
        engine,
        trades,
        report,
    }
}
