//! Order types
//!
//! An [`Order`] is a limit order as held by an order book: immutable identity
//! fields plus a remaining quantity that only fills decrement.

use crate::errors::OrderError;
use crate::ids::{InstrumentId, OrderId};
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Limit order
///
/// `remaining_quantity` starts equal to `quantity` and is reduced by fills
/// only; `quantity - remaining_quantity` is what has traded so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub side: Side,
    pub instrument: InstrumentId,
    pub price: Price,
    pub quantity: Quantity,
    pub remaining_quantity: Quantity,
    /// Position in the book's arrival order; lower arrived earlier
    pub arrival_sequence: u64,
}

impl Order {
    /// Create a new unfilled order
    ///
    /// Rejects a zero price or zero quantity.
    pub fn new(
        order_id: OrderId,
        side: Side,
        instrument: InstrumentId,
        price: Price,
        quantity: Quantity,
        arrival_sequence: u64,
    ) -> Result<Self, OrderError> {
        validate_limit(price, quantity)?;

        Ok(Self {
            order_id,
            side,
            instrument,
            price,
            quantity,
            remaining_quantity: quantity,
            arrival_sequence,
        })
    }

    /// Quantity traded so far
    pub fn filled_quantity(&self) -> Quantity {
        self.quantity
            .checked_sub(self.remaining_quantity)
            .unwrap_or_default()
    }

    /// Check quantity invariant: remaining never exceeds the original quantity
    pub fn check_invariant(&self) -> bool {
        self.remaining_quantity <= self.quantity
    }

    /// Check if order is completely filled
    pub fn is_filled(&self) -> bool {
        self.remaining_quantity.is_zero()
    }

    /// Check if order has any fills
    pub fn has_fills(&self) -> bool {
        self.remaining_quantity < self.quantity
    }

    /// Reduce the remaining quantity by a fill
    ///
    /// # Panics
    /// Panics if the fill exceeds the remaining quantity
    pub fn add_fill(&mut self, fill_quantity: Quantity) {
        self.remaining_quantity = self
            .remaining_quantity
            .checked_sub(fill_quantity)
            .unwrap_or_else(|| panic!("Fill would exceed order quantity"));
    }
}

/// Positivity check shared by order construction and request validation
pub fn validate_limit(price: Price, quantity: Quantity) -> Result<(), OrderError> {
    if price.is_zero() {
        return Err(OrderError::NonPositivePrice);
    }
    if quantity.is_zero() {
        return Err(OrderError::NonPositiveQuantity);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_order(side: Side, price: u64, qty: u64) -> Order {
        Order::new(
            OrderId::new(1),
            side,
            InstrumentId::new(0),
            Price::from_u64(price),
            Quantity::from_u64(qty),
            0,
        )
        .unwrap()
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }

    #[test]
    fn test_order_creation() {
        let order = create_order(Side::Buy, 100, 10);

        assert_eq!(order.remaining_quantity, Quantity::from_u64(10));
        assert!(order.check_invariant());
        assert!(!order.has_fills());
    }

    #[test]
    fn test_order_rejects_zero_price_and_quantity() {
        let zero_price = Order::new(
            OrderId::new(1),
            Side::Buy,
            InstrumentId::new(0),
            Price::from_u64(0),
            Quantity::from_u64(10),
            0,
        );
        assert_eq!(zero_price, Err(OrderError::NonPositivePrice));

        let zero_qty = Order::new(
            OrderId::new(1),
            Side::Sell,
            InstrumentId::new(0),
            Price::from_u64(100),
            Quantity::zero(),
            0,
        );
        assert_eq!(zero_qty, Err(OrderError::NonPositiveQuantity));
    }

    #[test]
    fn test_order_fill() {
        let mut order = create_order(Side::Buy, 100, 10);

        // Partial fill
        order.add_fill(Quantity::from_u64(4));
        assert!(order.has_fills());
        assert!(!order.is_filled());
        assert_eq!(order.filled_quantity(), Quantity::from_u64(4));
        assert!(order.check_invariant());

        // Complete fill
        order.add_fill(Quantity::from_u64(6));
        assert!(order.is_filled());
        assert_eq!(order.filled_quantity(), Quantity::from_u64(10));
    }

    #[test]
    fn test_invariant_rejects_remaining_above_quantity() {
        let mut order = create_order(Side::Buy, 100, 10);
        order.remaining_quantity = Quantity::from_u64(11);
        assert!(!order.check_invariant());

        order.remaining_quantity = Quantity::zero();
        assert!(order.check_invariant());
    }

    #[test]
    #[should_panic(expected = "Fill would exceed order quantity")]
    fn test_order_overfill_panics() {
        let mut order = create_order(Side::Sell, 100, 1);
        order.add_fill(Quantity::from_u64(2));
    }

    proptest::proptest! {
        #[test]
        fn prop_fills_conserve_quantity(qty in 1u64..10_000, cuts in proptest::collection::vec(1u64..500, 0..20)) {
            let mut order = create_order(Side::Buy, 100, qty);
            let mut traded = 0u64;
            for cut in cuts {
                let fill = cut.min(order.remaining_quantity.as_u64());
                if fill == 0 {
                    break;
                }
                order.add_fill(Quantity::from_u64(fill));
                traded += fill;
                proptest::prop_assert!(order.check_invariant());
                proptest::prop_assert_eq!(order.remaining_quantity.as_u64() + traded, qty);
            }
            proptest::prop_assert_eq!(order.filled_quantity().as_u64(), traded);
        }
    }

    #[test]
    fn test_order_serialization() {
        let order = create_order(Side::Sell, 200, 10);

        let json = serde_json::to_string(&order).unwrap();
        assert!(json.contains("\"SELL\""));
        let deserialized: Order = serde_json::from_str(&json).unwrap();

        assert_eq!(order, deserialized);
    }
}
