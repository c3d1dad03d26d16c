//! Ask (sell-side) order book
//!
//! Maintains sell orders sorted by price ascending (best ask first).
//! Uses BTreeMap for deterministic iteration order.

use std::collections::BTreeMap;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::Order;

use super::price_level::PriceLevel;

/// Ask (sell) side order book
///
/// Orders are sorted by price ascending, so the lowest ask is first.
/// At each price level, orders are maintained in FIFO order.
#[derive(Debug, Clone, Default)]
pub struct AskBook {
    /// Price levels sorted ascending (lowest price first)
    levels: BTreeMap<Price, PriceLevel>,
}

impl AskBook {
    /// Create a new empty ask book
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Insert an order into the ask book
    pub fn insert(&mut self, order: Order) {
        self.levels.entry(order.price).or_default().insert(order);
    }

    /// Get the best ask (lowest price)
    pub fn best_ask(&self) -> Option<(Price, Quantity)> {
        // BTreeMap iter is ascending, so first() gives us lowest price
        self.levels
            .iter()
            .next()
            .map(|(price, level)| (*price, level.total_quantity()))
    }

    /// Get the best ask price
    pub fn best_ask_price(&self) -> Option<Price> {
        self.levels.keys().next().copied()
    }

    /// The order first in line: earliest arrival at the lowest price
    pub fn best_order(&self) -> Option<&Order> {
        self.levels.values().next().and_then(PriceLevel::peek_front)
    }

    /// Fill the best order by `quantity`, dropping the level once empty
    pub(crate) fn fill_best(&mut self, quantity: Quantity) -> Option<Order> {
        let mut entry = self.levels.first_entry()?;
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
        self.levels.values().flat_map(|level| level.iter())
    }

    /// Get depth snapshot (top N price levels)
    pub fn depth_snapshot(&self, depth: usize) -> Vec<(Price, Quantity)> {
        self.levels
            .iter()
            .take(depth)
            .map(|(price, level)| (*price, level.total_quantity()))
            .collect()
    }

    /// Check if the ask book is empty
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

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::InstrumentId;
    use types::order::Side;

    fn create_test_order(id: u64, price_val: u64, qty: u64) -> Order {
        Order::new(
            OrderId::new(id),
            Side::Sell,
            InstrumentId::new(0),
            Price::from_u64(price_val),
            Quantity::from_u64(qty),
            id,
        )
        .unwrap()
    }

    #[test]
    fn test_ask_book_best_ask() {
        let mut book = AskBook::new();

        book.insert(create_test_order(1, 100, 10));
        book.insert(create_test_order(2, 110, 20)); // Higher price
        book.insert(create_test_order(3, 90, 15)); // Lower price (best ask)

        let (best_price, best_qty) = book.best_ask().unwrap();
        assert_eq!(best_price, Price::from_u64(90)); // Lowest price
        assert_eq!(best_qty, Quantity::from_u64(15));
        assert_eq!(book.best_order().unwrap().order_id, OrderId::new(3));
    }

    #[test]
    fn test_ask_book_fill_best_advances_fifo() {
        let mut book = AskBook::new();
        book.insert(create_test_order(1, 100, 3));
        book.insert(create_test_order(2, 100, 3));

        let done = book.fill_best(Quantity::from_u64(3)).unwrap();
        assert_eq!(done.order_id, OrderId::new(1));
        assert_eq!(book.best_order().unwrap().order_id, OrderId::new(2));

        book.fill_best(Quantity::from_u64(3));
        assert!(book.is_empty());
        assert!(book.fill_best(Quantity::from_u64(1)).is_none());
    }

    #[test]
    fn test_ask_book_depth_snapshot() {
        let mut book = AskBook::new();

        book.insert(create_test_order(1, 100, 10));
        book.insert(create_test_order(2, 110, 20));
        book.insert(create_test_order(3, 90, 15));
        book.insert(create_test_order(4, 120, 5));

        let depth = book.depth_snapshot(2);

        // Should return top 2 levels (lowest prices first)
        assert_eq!(depth.len(), 2);
        assert_eq!(depth[0].0, Price::from_u64(90));
        assert_eq!(depth[1].0, Price::from_u64(100));
    }

    #[test]
    fn test_ask_book_orders_in_priority() {
        let mut book = AskBook::new();

        book.insert(create_test_order(1, 100, 10));
        book.insert(create_test_order(2, 100, 20)); // Same price
        book.insert(create_test_order(3, 95, 1));

        let ids: Vec<u64> = book.orders().map(|o| o.order_id.as_u64()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(book.order_count(), 3);
        assert_eq!(book.best_ask(), Some((Price::from_u64(95), Quantity::from_u64(1))));
    }
}
