//! Trade execution logic
//!
//! Stamps sequence numbers and execution times on trades produced by a
//! book's match loop.

use chrono::Utc;
use types::ids::{InstrumentId, OrderId};
use types::numeric::{Price, Quantity};
use types::order::Side;
use types::trade::Trade;

/// Match executor for handling trade generation
///
/// One executor per order book, so sequences are per instrument and follow
/// match order.
#[derive(Debug, Clone)]
pub struct MatchExecutor {
    sequence_counter: u64,
    trades_executed: u64,
}

impl MatchExecutor {
    /// Create a new match executor with starting sequence number
    pub fn new(starting_sequence: u64) -> Self {
        Self {
            sequence_counter: starting_sequence,
            trades_executed: 0,
        }
    }

    /// Get next sequence number (monotonically increasing)
    fn next_sequence(&mut self) -> u64 {
        let seq = self.sequence_counter;
        self.sequence_counter += 1;
        seq
    }

    /// Execute a trade between a buy and a sell order
    ///
    /// `price` must already be the resting order's limit.
    pub fn execute_trade(
        &mut self,
        instrument: InstrumentId,
        buy_order_id: OrderId,
        sell_order_id: OrderId,
        aggressor_side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Trade {
        let sequence = self.next_sequence();
        self.trades_executed += 1;

        Trade::new(
            sequence,
            instrument,
            buy_order_id,
            sell_order_id,
            aggressor_side,
            price,
            quantity,
            Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX),
        )
    }

    /// Number of trades produced so far
    pub fn trades_executed(&self) -> u64 {
        self.trades_executed
    }
}

impl Default for MatchExecutor {
    fn default() -> Self {
        Self::new(1)
    }
}
