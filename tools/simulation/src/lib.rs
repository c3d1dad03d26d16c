//! Broker Simulation Framework
//!
//! Drives a shared [`matching_engine::MatchingEngine`] from many concurrent
//! broker threads with deterministic seeded order flow, then audits the
//! result for id uniqueness, quantity conservation and uncrossed books.
//!
//! # Modules
//! - `broker` — Seeded random limit-order generator
//! - `harness` — Concurrent driver, one thread per broker
//! - `metrics` — Order/trade counters and latency histograms
//! - `audit` — Post-run consistency checks
//! - `export` — Metrics and audit JSON export

pub mod broker;
pub mod harness;
pub mod metrics;
pub mod audit;
pub mod export;

pub use audit::{verify, AuditSummary, AuditViolation};
pub use broker::{Broker, BrokerConfig, OrderIntent};
pub use harness::{run_simulation, simulate, Rejection, SimulationConfig, SimulationOutcome, SimulationReport, SubmittedOrder};
pub use metrics::SimMetrics;

/// Crate version constant
pub const VERSION: &str = "1.0.0";
