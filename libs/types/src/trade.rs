//! Trade execution types

use crate::ids::{InstrumentId, OrderId};
use crate::numeric::{Price, Quantity};
use crate::order::Side;
use serde::{Deserialize, Serialize};

/// A single execution between one buy and one sell order
///
/// `sequence` is per instrument and strictly increasing in match order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub sequence: u64,
    pub instrument: InstrumentId,

    // Order references
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,

    /// Side of the order that arrived last and crossed the book
    pub aggressor_side: Side,
    /// Execution price: the resting order's limit
    pub price: Price,
    pub quantity: Quantity,

    pub executed_at: i64, // Unix nanos
}

impl Trade {
    /// Create a new trade
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sequence: u64,
        instrument: InstrumentId,
        buy_order_id: OrderId,
        sell_order_id: OrderId,
        aggressor_side: Side,
        price: Price,
        quantity: Quantity,
        executed_at: i64,
    ) -> Self {
        Self {
            sequence,
            instrument,
            buy_order_id,
            sell_order_id,
            aggressor_side,
            price,
            quantity,
            executed_at,
        }
    }

    /// The order that was resting when the trade happened
    pub fn maker_order_id(&self) -> OrderId {
        match self.aggressor_side {
            Side::Buy => self.sell_order_id,
            Side::Sell => self.buy_order_id,
        }
    }

    /// The order whose arrival triggered the trade
    pub fn taker_order_id(&self) -> OrderId {
        match self.aggressor_side {
            Side::Buy => self.buy_order_id,
            Side::Sell => self.sell_order_id,
        }
    }

    /// Whether `order_id` is either side of this trade
    pub fn involves(&self, order_id: OrderId) -> bool {
        self.buy_order_id == order_id || self.sell_order_id == order_id
    }

    /// Calculate trade value (price × quantity)
    pub fn trade_value(&self) -> u128 {
        self.quantity.notional(self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_trade(aggressor_side: Side) -> Trade {
        Trade::new(
            1,
            InstrumentId::new(0),
            OrderId::new(1),
            OrderId::new(2),
            aggressor_side,
            Price::from_u64(100),
            Quantity::from_u64(4),
            1708123456789000000,
        )
    }

    #[test]
    fn test_maker_taker_from_aggressor() {
        let sell_aggressor = create_trade(Side::Sell);
        assert_eq!(sell_aggressor.maker_order_id(), OrderId::new(1));
        assert_eq!(sell_aggressor.taker_order_id(), OrderId::new(2));

        let buy_aggressor = create_trade(Side::Buy);
        assert_eq!(buy_aggressor.maker_order_id(), OrderId::new(2));
        assert_eq!(buy_aggressor.taker_order_id(), OrderId::new(1));
    }

    #[test]
    fn test_trade_value() {
        let trade = create_trade(Side::Sell);
        assert_eq!(trade.trade_value(), 400);
    }

    #[test]
    fn test_involves() {
        let trade = create_trade(Side::Buy);
        assert!(trade.involves(OrderId::new(1)));
        assert!(trade.involves(OrderId::new(2)));
        assert!(!trade.involves(OrderId::new(3)));
    }
}
