//! Trade delivery
//!
//! The engine hands every trade to a [`TradeSink`]. Sinks are called from
//! whichever thread ran the match, possibly from several instrument books
//! at once, so implementations must be `Send + Sync`.

use parking_lot::Mutex;
use tracing::info;
use types::ids::{InstrumentId, OrderId};
use types::numeric::Quantity;
use types::trade::Trade;

/// Receiver of trades produced by the matching engine
///
/// For one instrument, trades arrive in match order. No ordering holds
/// across instruments.
pub trait TradeSink: Send + Sync {
    fn on_trade(&self, trade: &Trade);
}

impl<F> TradeSink for F
where
    F: Fn(&Trade) + Send + Sync,
{
    fn on_trade(&self, trade: &Trade) {
        self(trade)
    }
}

/// Discards every trade
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TradeSink for NullSink {
    fn on_trade(&self, _trade: &Trade) {}
}

/// Logs each trade at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TradeSink for TracingSink {
    fn on_trade(&self, trade: &Trade) {
        info!(
            ticker = %trade.instrument,
            price = trade.price.as_u64(),
            quantity = trade.quantity.as_u64(),
            buy_order_id = %trade.buy_order_id,
            sell_order_id = %trade.sell_order_id,
            "Matched Order"
        );
    }
}

/// In-memory trade collector
#[derive(Debug, Default)]
pub struct TradeLog {
    trades: Mutex<Vec<Trade>>,
}

impl TradeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of trades recorded
    pub fn len(&self) -> usize {
        self.trades.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.lock().is_empty()
    }

    /// Copy of every trade recorded so far
    pub fn snapshot(&self) -> Vec<Trade> {
        self.trades.lock().clone()
    }

    /// Take every recorded trade, leaving the log empty
    pub fn drain(&self) -> Vec<Trade> {
        std::mem::take(&mut *self.trades.lock())
    }

    /// Trades of one instrument in delivery order
    pub fn for_instrument(&self, instrument: InstrumentId) -> Vec<Trade> {
        self.trades
            .lock()
            .iter()
            .filter(|t| t.instrument == instrument)
            .cloned()
            .collect()
    }

    /// Total quantity traded by `order_id` across all recorded trades
    pub fn quantity_for_order(&self, order_id: OrderId) -> Quantity {
        let total = self
            .trades
            .lock()
            .iter()
            .filter(|t| t.involves(order_id))
            .map(|t| t.quantity.as_u64())
            .sum();
        Quantity::from_u64(total)
    }
}

impl TradeSink for TradeLog {
    fn on_trade(&self, trade: &Trade) {
        self.trades.lock().push(trade.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use types::numeric::Price;
    use types::order::Side;

    fn trade(seq: u64, instrument: usize, buy: u64, sell: u64, qty: u64) -> Trade {
        Trade::new(
            seq,
            InstrumentId::new(instrument),
            OrderId::new(buy),
            OrderId::new(sell),
            Side::Sell,
            Price::from_u64(100),
            Quantity::from_u64(qty),
            0,
        )
    }

    #[test]
    fn test_closure_sink() {
        let count = AtomicUsize::new(0);
        let sink = |_: &Trade| {
            count.fetch_add(1, Ordering::Relaxed);
        };
        sink.on_trade(&trade(1, 0, 1, 2, 5));
        sink.on_trade(&trade(2, 0, 1, 3, 5));
        assert_eq!(count.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_trade_log_queries() {
        let log = TradeLog::new();
        log.on_trade(&trade(1, 0, 1, 2, 4));
        log.on_trade(&trade(1, 1, 5, 6, 7));
        log.on_trade(&trade(2, 0, 1, 3, 6));

        assert_eq!(log.len(), 3);
        assert_eq!(log.for_instrument(InstrumentId::new(0)).len(), 2);
        assert_eq!(log.quantity_for_order(OrderId::new(1)), Quantity::from_u64(10));
        assert_eq!(log.quantity_for_order(OrderId::new(6)), Quantity::from_u64(7));

        let drained = log.drain();
        assert_eq!(drained.len(), 3);
        assert!(log.is_empty());
    }

    #[test]
    fn test_null_and_tracing_sinks_accept_trades() {
        NullSink.on_trade(&trade(1, 0, 1, 2, 1));
        TracingSink.on_trade(&trade(1, 0, 1, 2, 1));
    }
}
