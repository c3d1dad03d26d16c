//! Bid (buy-side) order book
//!
//! Maintains buy orders sorted by price descending (best bid first).
//! Uses BTreeMap for deterministic iteration order.

use std::collections::BTreeMap;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::Order;

use super::price_level::PriceLevel;

/// Bid (buy) side order book
///
/// Orders are sorted by price descending, so the highest bid is first.
/// At each price level, orders are maintained in FIFO order.
#[derive(Debug, Clone, Default)]
pub struct BidBook {
    /// Price levels keyed ascending; the best bid is the last key
    levels: BTreeMap<Price, PriceLevel>,
}

impl BidBook {
    /// Create a new empty bid book
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Insert an order into the bid book
    pub fn insert(&mut self, order: Order) {
        self.levels.entry(order.price).or_default().insert(order);
    }

    /// Get the best bid (highest price) with the quantity resting there
    pub fn best_bid(&self) -> Option<(Price, Quantity)> {
        // BTreeMap iter is ascending, so we need last()
        self.levels
            .iter()
            .next_back()
            .map(|(price, level)| (*price, level.total_quantity()))
    }

    /// Get the best bid price
    pub fn best_bid_price(&self) -> Option<Price> {
        self.levels.keys().next_back().copied()
    }

    /// The order first in line: earliest arrival at the highest price
    pub fn best_order(&self) -> Option<&Order> {
        self.levels
            .values()
            .next_back()
            .and_then(PriceLevel::peek_front)
    }

    /// Fill the best order by `quantity`, dropping the level once empty
    ///
    /// Returns the order if the fill exhausted it.
    pub(crate) fn fill_best(&mut self, quantity: Quantity) -> Option<Order> {
        let mut entry = self.levels.last_entry()?;
        let exhausted = entry.get_mut().fill_front(quantity);
        if entry.get().is_empty() {
            entry.remove();
        }
        exhausted
    }

    /// Find a resting order by id
    pub fn get(&self, order_id: &OrderId) -> Option<&Order> {
        self.levels.values().find_map(|level| level.get(order_id))
    }

    /// All resting orders in matching priority
    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.levels.values().rev().flat_map(|level| level.iter())
    }

    /// Get depth snapshot (top N price levels)
    pub fn depth_snapshot(&self, depth: usize) -> Vec<(Price, Quantity)> {
        self.levels
            .iter()
            .rev() // Reverse to get highest prices first
            .take(depth)
            .map(|(price, level)| (*price, level.total_quantity()))
            .collect()
    }

    /// Check if the bid book is empty
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Get the total number of price levels
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Get the total number of resting orders
    pub fn order_count(&self) -> usize {
        self.levels.values().map(PriceLevel::order_count).sum()
    }
}
