//! Post-run consistency audit
//!
//! Given every accepted order and every trade the engine emitted, checks that
//! the engine ended in a state the submissions can explain: unique ids, no
//! crossed book, each order's quantity split exactly between trades and its
//! resting remainder, and per-instrument trade sequences strictly increasing.

use std::collections::HashMap;

use matching_engine::MatchingEngine;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use types::ids::{InstrumentId, OrderId};
use types::trade::Trade;

use crate::harness::SubmittedOrder;

/// First inconsistency found by [`verify`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuditViolation {
    #[error("order id {0} issued more than once")]
    DuplicateOrderId(OrderId),

    #[error("trade {sequence} on {instrument} references unknown order {order_id}")]
    UnknownOrder {
        instrument: InstrumentId,
        sequence: u64,
        order_id: OrderId,
    },

    #[error("trade {sequence} on {instrument} matched an order from another instrument")]
    InstrumentMismatch { instrument: InstrumentId, sequence: u64 },

    #[error("book {0} is crossed")]
    CrossedBook(InstrumentId),

    #[error("order {order_id}: submitted {submitted}, traded {traded}, resting {resting}")]
    QuantityMismatch {
        order_id: OrderId,
        submitted: u64,
        traded: u64,
        resting: u64,
    },

    #[error("trade sequence on {instrument} went from {previous} to {found}")]
    SequenceOutOfOrder {
        instrument: InstrumentId,
        previous: u64,
        found: u64,
    },

    #[error("{found} orders resting in the engine, {expected} accounted for")]
    UntrackedRestingOrders { expected: usize, found: usize },
}

/// Totals of a clean audit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    pub orders: usize,
    pub trades: usize,
    pub filled_orders: usize,
    pub resting_orders: usize,
    pub traded_quantity: u64,
}

/// Audit `engine` against the orders submitted to it and the trades it
/// delivered, in delivery order.
pub fn verify(
    engine: &MatchingEngine,
    submitted: &[SubmittedOrder],
    trades: &[Trade],
) -> Result<AuditSummary, AuditViolation> {
    let mut orders: HashMap<OrderId, &SubmittedOrder> = HashMap::with_capacity(submitted.len());
    for order in submitted {
        if orders.insert(order.order_id, order).is_some() {
            return Err(AuditViolation::DuplicateOrderId(order.order_id));
        }
    }

    let mut traded: HashMap<OrderId, u64> = HashMap::new();
    let mut last_sequence: HashMap<InstrumentId, u64> = HashMap::new();
    let mut traded_quantity: u64 = 0;

    for trade in trades {
        for order_id in [trade.buy_order_id, trade.sell_order_id] {
            let order = orders.get(&order_id).ok_or(AuditViolation::UnknownOrder {
                instrument: trade.instrument,
                sequence: trade.sequence,
                order_id,
            })?;
            if order.instrument != trade.instrument.index() {
                return Err(AuditViolation::InstrumentMismatch {
                    instrument: trade.instrument,
                    sequence: trade.sequence,
                });
            }
            let total = traded.entry(order_id).or_default();
            *total = total.saturating_add(trade.quantity.as_u64());
        }

        let previous = last_sequence.entry(trade.instrument).or_default();
        if trade.sequence <= *previous {
            return Err(AuditViolation::SequenceOutOfOrder {
                instrument: trade.instrument,
                previous: *previous,
                found: trade.sequence,
            });
        }
        *previous = trade.sequence;
        traded_quantity = traded_quantity.saturating_add(trade.quantity.as_u64());
    }

    for instrument in 0..engine.instrument_capacity() {
        // Index is in range, so the lookup cannot fail
        if engine.is_crossed(instrument).unwrap_or(false) {
            return Err(AuditViolation::CrossedBook(InstrumentId::new(instrument)));
        }
    }

    let mut filled_orders = 0;
    let mut resting_orders = 0;
    for order in submitted {
        let resting = engine
            .resting_order(order.instrument, order.order_id)
            .ok()
            .flatten()
            .map_or(0, |o| o.remaining_quantity.as_u64());
        let traded = traded.get(&order.order_id).copied().unwrap_or(0);

        if resting.checked_add(traded) != Some(order.quantity) {
            return Err(AuditViolation::QuantityMismatch {
                order_id: order.order_id,
                submitted: order.quantity,
                traded,
                resting,
            });
        }
        if resting == 0 {
            filled_orders += 1;
        } else {
            resting_orders += 1;
        }
    }

    let found: usize = (0..engine.instrument_capacity())
        .filter_map(|instrument| engine.with_book(instrument, |book| book.order_count()).ok())
        .sum();
    if found != resting_orders {
        return Err(AuditViolation::UntrackedRestingOrders {
            expected: resting_orders,
            found,
        });
    }

    Ok(AuditSummary {
        orders: submitted.len(),
        trades: trades.len(),
        filled_orders,
        resting_orders,
        traded_quantity,
    })
}
