//! Matching Engine Service
//!
//! Continuous double-auction matching engine for a fixed universe of
//! instruments, callable from many threads at once.
//!
//! **Key Invariants:**
//! - Price-time priority strictly enforced
//! - No book is left crossed after a submission returns
//! - Conservation of quantity: original = remaining + traded
//! - Submissions for one instrument are serialized; different instruments
//!   never share a lock

pub mod book;
pub mod matching;
pub mod engine;
pub mod config;
pub mod sink;

pub use book::{OrderBook, OrderBookSnapshot};
pub use config::EngineConfig;
pub use engine::{MatchingEngine, SubmitResult};
pub use sink::{NullSink, TracingSink, TradeLog, TradeSink};
pub use types::errors::{EngineError, OrderError};
