//! Matching engine core
//!
//! Routes orders to a fixed table of per-instrument books. Each book sits
//! behind its own mutex, so submissions for one instrument run insert-then-
//! match as a single unit while different instruments proceed in parallel.
//! Order ids come from a lock-free generator shared by all books.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info};
use types::errors::EngineError;
use types::ids::{IdGenerator, InstrumentId, OrderId};
use types::numeric::{Price, Quantity};
use types::order::{validate_limit, Order, Side};
use types::trade::Trade;

use crate::book::{OrderBook, OrderBookSnapshot};
use crate::config::EngineConfig;
use crate::sink::{NullSink, TradeSink};

/// Main matching engine
///
/// `submit` takes `&self`; share the engine between submitter threads with
/// an `Arc` or scoped threads.
pub struct MatchingEngine {
    config: EngineConfig,
    /// One book per instrument index
    books: Box<[Mutex<OrderBook>]>,
    ids: IdGenerator,
    sink: Arc<dyn TradeSink>,
    /// Set once the id space is exhausted; no order is accepted afterwards
    halted: AtomicBool,
}

/// Result of submitting an order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitResult {
    /// Order was added to book (no match)
    Resting { order_id: OrderId },
    /// Order traded and the remainder rests
    PartiallyFilled {
        order_id: OrderId,
        trades: Vec<Trade>,
        remaining: Quantity,
    },
    /// Order was completely filled
    Filled { order_id: OrderId, trades: Vec<Trade> },
}

impl SubmitResult {
    pub fn order_id(&self) -> OrderId {
        match self {
            SubmitResult::Resting { order_id }
            | SubmitResult::PartiallyFilled { order_id, .. }
            | SubmitResult::Filled { order_id, .. } => *order_id,
        }
    }

    /// Trades produced by this submission, in match order
    pub fn trades(&self) -> &[Trade] {
        match self {
            SubmitResult::Resting { .. } => &[],
            SubmitResult::PartiallyFilled { trades, .. } | SubmitResult::Filled { trades, .. } => {
                trades
            }
        }
    }
}

impl MatchingEngine {
    /// Create an engine for `instrument_capacity` instruments
    pub fn new(instrument_capacity: usize) -> Self {
        Self::with_config(EngineConfig::new(instrument_capacity))
    }

    /// Create an engine that discards trades
    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_sink(config, Arc::new(NullSink))
    }

    /// Create an engine that delivers trades to `sink`
    pub fn with_sink(config: EngineConfig, sink: Arc<dyn TradeSink>) -> Self {
        let books = (0..config.instrument_capacity)
            .map(|index| Mutex::new(OrderBook::new(InstrumentId::new(index))))
            .collect();

        info!(
            instrument_capacity = config.instrument_capacity,
            first_order_id = config.first_order_id,
            "MatchingEngine initialized"
        );

        Self {
            ids: IdGenerator::starting_at(config.first_order_id),
            config,
            books,
            sink,
            halted: AtomicBool::new(false),
        }
    }

    /// Submit a limit order and return its id
    pub fn submit(
        &self,
        side: Side,
        instrument: usize,
        quantity: u64,
        limit_price: u64,
    ) -> Result<OrderId, EngineError> {
        self.submit_order(side, instrument, quantity, limit_price)
            .map(|result| result.order_id())
    }

    /// Submit a limit order and return the detailed outcome
    ///
    /// Validation happens before an id is issued, so rejected input never
    /// consumes one. Trades reach the sink before the book lock is released.
    pub fn submit_order(
        &self,
        side: Side,
        instrument: usize,
        quantity: u64,
        limit_price: u64,
    ) -> Result<SubmitResult, EngineError> {
        let price = Price::from(limit_price);
        let quantity = Quantity::from(quantity);

        let slot = self.book(instrument).map_err(|err| self.rejected(err))?;
        validate_limit(price, quantity).map_err(|err| self.rejected(err.into()))?;
        if self.is_halted() {
            return Err(self.rejected(types::ids::IdExhausted.into()));
        }

        let order_id = match self.ids.next() {
            Ok(order_id) => order_id,
            Err(exhausted) => {
                self.halt();
                return Err(exhausted.into());
            }
        };

        let trades = {
            let mut book = slot.lock();
            let trades = book.place(order_id, side, price, quantity)?;
            for trade in &trades {
                self.sink.on_trade(trade);
            }
            trades
        };

        if trades.is_empty() {
            return Ok(SubmitResult::Resting { order_id });
        }

        let filled: u64 = trades
            .iter()
            .filter(|t| t.involves(order_id))
            .map(|t| t.quantity.as_u64())
            .sum();
        let remaining = quantity.checked_sub(Quantity::from(filled)).unwrap_or_default();

        debug!(
            %order_id,
            instrument,
            trades = trades.len(),
            filled,
            remaining = remaining.as_u64(),
            "Order traded on arrival"
        );

        if remaining.is_zero() {
            Ok(SubmitResult::Filled { order_id, trades })
        } else {
            Ok(SubmitResult::PartiallyFilled {
                order_id,
                trades,
                remaining,
            })
        }
    }

    fn book(&self, instrument: usize) -> Result<&Mutex<OrderBook>, EngineError> {
        self.books
            .get(instrument)
            .ok_or(EngineError::InvalidInstrument {
                index: instrument,
                capacity: self.books.len(),
            })
    }

    fn rejected(&self, err: EngineError) -> EngineError {
        debug!(error = %err, "Order rejected");
        err
    }

    fn halt(&self) {
        if !self.halted.swap(true, Ordering::AcqRel) {
            error!("Order id space exhausted; engine no longer accepts orders");
        }
    }

    /// Run `f` against one instrument's book under its lock
    pub fn with_book<R>(
        &self,
        instrument: usize,
        f: impl FnOnce(&OrderBook) -> R,
    ) -> Result<R, EngineError> {
        let slot = self.book(instrument)?;
        let book = slot.lock();
        Ok(f(&book))
    }

    /// Get order book snapshot
    pub fn snapshot(&self, instrument: usize, depth: usize) -> Result<OrderBookSnapshot, EngineError> {
        self.with_book(instrument, |book| book.snapshot(depth))
    }

    /// Best bid and best ask of one instrument
    pub fn best_bid_ask(
        &self,
        instrument: usize,
    ) -> Result<(Option<(Price, Quantity)>, Option<(Price, Quantity)>), EngineError> {
        self.with_book(instrument, |book| (book.best_bid(), book.best_ask()))
    }

    /// Copy of a resting order, if it is still in the book
    pub fn resting_order(&self, instrument: usize, order_id: OrderId) -> Result<Option<Order>, EngineError> {
        self.with_book(instrument, |book| book.resting_order(&order_id).cloned())
    }

    pub fn is_crossed(&self, instrument: usize) -> Result<bool, EngineError> {
        self.with_book(instrument, OrderBook::is_crossed)
    }

    pub fn instrument_capacity(&self) -> usize {
        self.books.len()
    }

    /// Whether the engine has stopped accepting orders
    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::Acquire)
    }

    /// Number of ids issued so far, one per accepted order
    pub fn orders_accepted(&self) -> u64 {
        let next = self.ids.peek().map_or(u64::MAX, |id| id.as_u64());
        next - self.config.first_order_id
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl fmt::Debug for MatchingEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchingEngine")
            .field("config", &self.config)
            .field("ids", &self.ids)
            .field("halted", &self.is_halted())
            .finish_non_exhaustive()
    }
}
