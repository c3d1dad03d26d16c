//! Single-instrument order book
//!
//! Insert-then-match continuous double auction. A call to [`OrderBook::submit`]
//! inserts the order at its price/time position and then matches the best bid
//! against the best ask until the book no longer crosses. Each iteration
//! exhausts at least one order, so the loop always terminates.
//!
//! The book is a plain `&mut self` structure; exclusive access across threads
//! is provided by the engine's per-instrument lock.

use serde::{Deserialize, Serialize};
use tracing::trace;
use types::errors::OrderError;
use types::ids::{InstrumentId, OrderId};
use types::numeric::{Price, Quantity};
use types::order::{validate_limit, Order, Side};
use types::trade::Trade;

use super::{AskBook, BidBook};
use crate::matching::{crossing, MatchExecutor};

/// Order book for a single instrument
#[derive(Debug, Clone)]
pub struct OrderBook {
    instrument: InstrumentId,
    bids: BidBook,
    asks: AskBook,
    /// Trade sequencing for this instrument
    executor: MatchExecutor,
    /// Arrival sequence handed to the next placed order
    next_arrival: u64,
}

/// Order book snapshot for market data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    pub instrument: InstrumentId,
    pub bids: Vec<(Price, Quantity)>,
    pub asks: Vec<(Price, Quantity)>,
}

impl OrderBook {
    /// Create an empty book for `instrument`
    pub fn new(instrument: InstrumentId) -> Self {
        Self {
            instrument,
            bids: BidBook::new(),
            asks: AskBook::new(),
            executor: MatchExecutor::default(),
            next_arrival: 1,
        }
    }

    pub fn instrument(&self) -> InstrumentId {
        self.instrument
    }

    /// Reserve the arrival sequence for the next order
    pub fn next_arrival_sequence(&mut self) -> u64 {
        let seq = self.next_arrival;
        self.next_arrival = self.next_arrival.saturating_add(1);
        seq
    }

    /// Build an order with the next arrival sequence and submit it
    pub fn place(
        &mut self,
        order_id: OrderId,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Result<Vec<Trade>, OrderError> {
        validate_limit(price, quantity)?;
        let arrival = self.next_arrival_sequence();
        let order = Order::new(order_id, side, self.instrument, price, quantity, arrival)?;
        self.submit(order)
    }

    /// Insert `order` and match until the book no longer crosses
    ///
    /// Returns the trades produced, in match order. A zero price, a zero
    /// quantity or an order that has already traded is rejected before the
    /// book is touched.
    pub fn submit(&mut self, order: Order) -> Result<Vec<Trade>, OrderError> {
        validate_limit(order.price, order.quantity)?;
        if order.remaining_quantity != order.quantity {
            return Err(OrderError::AlreadyTraded {
                quantity: order.quantity.as_u64(),
                remaining: order.remaining_quantity.as_u64(),
            });
        }
        debug_assert_eq!(order.instrument, self.instrument);

        self.next_arrival = self
            .next_arrival
            .max(order.arrival_sequence.saturating_add(1));

        // The book is uncrossed between submissions, so only an incoming
        // order that reaches the opposite best can start a match
        let crosses = self.would_cross(order.side, order.price);

        match order.side {
            Side::Buy => self.bids.insert(order),
            Side::Sell => self.asks.insert(order),
        }

        if !crosses {
            return Ok(Vec::new());
        }

        let trades = self.match_crossing();
        debug_assert!(!self.is_crossed());
        Ok(trades)
    }

    /// Match best bid against best ask while they cross
    fn match_crossing(&mut self) -> Vec<Trade> {
        let mut trades = Vec::new();

        loop {
            let (Some(bid), Some(ask)) = (self.bids.best_order(), self.asks.best_order()) else {
                break;
            };
            if !crossing::can_match(bid.price, ask.price) {
                break;
            }

            // The later arrival is the aggressor; the resting order sets the price
            let (aggressor_side, price) = if bid.arrival_sequence > ask.arrival_sequence {
                (Side::Buy, ask.price)
            } else {
                (Side::Sell, bid.price)
            };
            let quantity = bid.remaining_quantity.min(ask.remaining_quantity);
            let (buy_order_id, sell_order_id) = (bid.order_id, ask.order_id);

            self.bids.fill_best(quantity);
            self.asks.fill_best(quantity);

            let trade = self.executor.execute_trade(
                self.instrument,
                buy_order_id,
                sell_order_id,
                aggressor_side,
                price,
                quantity,
            );
            trace!(
                instrument = %self.instrument,
                sequence = trade.sequence,
                buy_order_id = %buy_order_id,
                sell_order_id = %sell_order_id,
                price = price.as_u64(),
                quantity = quantity.as_u64(),
                "Trade executed"
            );
            trades.push(trade);
        }

        trades
    }

    /// Whether an order on `side` at `price` would trade on arrival
    pub fn would_cross(&self, side: Side, price: Price) -> bool {
        let resting = match side {
            Side::Buy => self.asks.best_ask_price(),
            Side::Sell => self.bids.best_bid_price(),
        };
        resting.is_some_and(|resting| crossing::incoming_can_match(side, price, resting))
    }

    /// Whether best bid >= best ask; never true between submissions
    pub fn is_crossed(&self) -> bool {
        match (self.bids.best_bid_price(), self.asks.best_ask_price()) {
            (Some(bid), Some(ask)) => crossing::can_match(bid, ask),
            _ => false,
        }
    }

    pub fn best_bid(&self) -> Option<(Price, Quantity)> {
        self.bids.best_bid()
    }

    pub fn best_ask(&self) -> Option<(Price, Quantity)> {
        self.asks.best_ask()
    }

    /// Look up a resting order on either side
    pub fn resting_order(&self, order_id: &OrderId) -> Option<&Order> {
        self.bids.get(order_id).or_else(|| self.asks.get(order_id))
    }

    /// Resting orders of one side in matching priority
    pub fn resting_orders(&self, side: Side) -> Vec<&Order> {
        match side {
            Side::Buy => self.bids.orders().collect(),
            Side::Sell => self.asks.orders().collect(),
        }
    }

    /// Number of resting orders on both sides
    pub fn order_count(&self) -> usize {
        self.bids.order_count() + self.asks.order_count()
    }

    /// Trades produced by this book so far
    pub fn trade_count(&self) -> u64 {
        self.executor.trades_executed()
    }

    /// Aggregated depth, best levels first
    pub fn snapshot(&self, depth: usize) -> OrderBookSnapshot {
        OrderBookSnapshot {
            instrument: self.instrument,
            bids: self.bids.depth_snapshot(depth),
            asks: self.asks.depth_snapshot(depth),
        }
    }
}
