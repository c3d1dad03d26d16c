//! Crossing detection logic
//!
//! Determines when a bid and ask can match based on price compatibility

use types::numeric::Price;
use types::order::Side;

/// Check if a bid and ask can match at given prices
///
/// For a buy order to match with a sell order the buy price must be
/// greater than or equal to the sell price.
pub fn can_match(bid_price: Price, ask_price: Price) -> bool {
    bid_price >= ask_price
}

/// Check if an incoming order can match against resting order
///
/// Returns true if the incoming order price crosses the resting order price
pub fn incoming_can_match(incoming_side: Side, incoming_price: Price, resting_price: Price) -> bool {
    match incoming_side {
        Side::Buy => can_match(incoming_price, resting_price),
        Side::Sell => can_match(resting_price, incoming_price),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_match_crossing() {
        let bid = Price::from_u64(100);
        let ask = Price::from_u64(95);
        assert!(can_match(bid, ask), "Bid >= ask should match");
    }

    #[test]
    fn test_can_match_exact() {
        let price = Price::from_u64(100);
        assert!(can_match(price, price), "Equal prices should match");
    }

    #[test]
    fn test_can_match_no_cross() {
        let bid = Price::from_u64(150);
        let ask = Price::from_u64(200);
        assert!(!can_match(bid, ask), "Bid < ask should not match");
    }

    #[test]
    fn test_incoming_buy_can_match() {
        assert!(incoming_can_match(Side::Buy, Price::from_u64(100), Price::from_u64(95)));
        assert!(!incoming_can_match(Side::Buy, Price::from_u64(150), Price::from_u64(200)));
    }

    #[test]
    fn test_incoming_sell_can_match() {
        assert!(incoming_can_match(Side::Sell, Price::from_u64(95), Price::from_u64(100)));
        assert!(!incoming_can_match(Side::Sell, Price::from_u64(200), Price::from_u64(150)));
    }
}
