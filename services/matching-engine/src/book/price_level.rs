//! Price level implementation with FIFO queue
//!
//! A price level contains all orders resting at one price point, kept in
//! ascending arrival-sequence order to enforce time priority.

use std::collections::VecDeque;
use types::ids::OrderId;
use types::numeric::Quantity;
use types::order::Order;

/// A price level containing orders at a specific price
///
/// The front of the queue is always the earliest arrival.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// Queue of orders at this price level (FIFO order)
    orders: VecDeque<Order>,
    /// Total remaining quantity at this level; wider than a single order's
    /// quantity so many large orders can share a price
    total_quantity: u128,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new() -> Self {
        Self {
            orders: VecDeque::new(),
            total_quantity: 0,
        }
    }

    /// Insert an order at its time-priority position
    ///
    /// Arrivals normally come in sequence order and are appended; an order
    /// carrying an earlier sequence than the tail is placed before every
    /// later arrival.
    pub fn insert(&mut self, order: Order) {
        self.total_quantity += u128::from(order.remaining_quantity.as_u64());

        match self.orders.back() {
            Some(last) if last.arrival_sequence > order.arrival_sequence => {
                let position = self
                    .orders
                    .partition_point(|o| o.arrival_sequence <= order.arrival_sequence);
                self.orders.insert(position, order);
            }
            _ => self.orders.push_back(order),
        }
    }

    /// Peek at the front order without removing it
    pub fn peek_front(&self) -> Option<&Order> {
        self.orders.front()
    }

    /// Fill the front order by `quantity`
    ///
    /// The order is removed once its remaining quantity reaches zero and is
    /// returned in that case.
    ///
    /// # Panics
    /// Panics if `quantity` exceeds the front order's remaining quantity
    pub fn fill_front(&mut self, quantity: Quantity) -> Option<Order> {
        let front = self.orders.front_mut()?;
        front.add_fill(quantity);
        self.total_quantity -= u128::from(quantity.as_u64());

        if front.is_filled() {
            self.orders.pop_front()
        } else {
            None
        }
    }

    /// Find a resting order by id
    pub fn get(&self, order_id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| &o.order_id == order_id)
    }

    /// Orders in time priority
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    /// Check if the price level is empty
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Get the total quantity at this price level
    ///
    /// Saturates at `u64::MAX` when the resting orders sum past it.
    pub fn total_quantity(&self) -> Quantity {
        Quantity::from_u64(u64::try_from(self.total_quantity).unwrap_or(u64::MAX))
    }

    /// Get the number of orders at this level
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }
}

impl Default for PriceLevel {
    fn default() -> Self {
        Self::new()
    }
}
