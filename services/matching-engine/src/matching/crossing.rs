//! Crossing detection logic
//!
//! Determines when an incoming order may consume the best opposite level.

use types::numeric::Price;
use types::order::{Order, OrderType, Side};

/// Check if a bid and ask can match at given prices
///
/// A buy matches a sell when the bid is at or above the ask.
pub fn can_match(bid_price: Price, ask_price: Price) -> bool {
    bid_price >= ask_price
}

/// Check if the best opposite price is acceptable to an incoming order
///
/// Market orders accept any price. A limit buy accepts asks at or below
/// its limit; a limit sell accepts bids at or above its limit.
pub fn price_acceptable(incoming: &Order, best_opposite: Price) -> bool {
    if incoming.order_type == OrderType::Market {
        return true;
    }
    match incoming.side {
        Side::Buy => can_match(incoming.price, best_opposite),
        Side::Sell => can_match(best_opposite, incoming.price),
    }
}
