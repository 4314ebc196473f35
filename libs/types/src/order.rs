//! Order lifecycle types
//!
//! An order moves Pending -> PartiallyFilled -> Filled, or is cancelled from
//! either non-terminal state. Filled and Cancelled are terminal.

use crate::errors::OrderError;
use crate::ids::{OrderId, Symbol};
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// Execute at any available price; never rests
    Market,
    /// Execute at the limit price or better; remainder rests
    Limit,
    /// Accepted syntactically; reduced to a limit at the carried price
    StopLoss,
}

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
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

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Accepted, no fills yet
    Pending,
    /// Some quantity filled, some remaining
    PartiallyFilled,
    /// Completely filled (terminal)
    Filled,
    /// Cancelled with unfilled remainder (terminal)
    Cancelled,
}

impl OrderStatus {
    /// Check if status is terminal (no further transitions possible)
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::PartiallyFilled => "partially_filled",
            OrderStatus::Filled => "filled",
            OrderStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

/// A submitted trading intent
///
/// Tracks identity, side, type, price, quantity, cumulative fill, and the
/// volume-weighted average fill price across all executions on this order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub symbol: Symbol,
    pub order_type: OrderType,
    pub side: Side,
    /// Limit price; zero for market orders
    pub price: Price,
    pub quantity: Quantity,
    pub filled_quantity: Quantity,
    /// Volume-weighted average price across fills; zero until the first fill
    pub avg_fill_price: Price,
    pub status: OrderStatus,
    /// Unix nanos, assigned by the engine at acceptance
    pub submitted_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filled_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<i64>,
}

impl Order {
    /// Create a new pending order with a fresh identity
    ///
    /// Quantity and price validity are enforced at the engine boundary;
    /// market orders record a zero price.
    pub fn new(
        symbol: Symbol,
        order_type: OrderType,
        side: Side,
        quantity: Quantity,
        price: Price,
        timestamp: i64,
    ) -> Self {
        Self {
            order_id: OrderId::new(),
            symbol,
            order_type,
            side,
            price,
            quantity,
            filled_quantity: Quantity::zero(),
            avg_fill_price: Price::zero(),
            status: OrderStatus::Pending,
            submitted_at: timestamp,
            filled_at: None,
            cancelled_at: None,
        }
    }

    /// The unfilled quantity
    pub fn remaining(&self) -> Quantity {
        self.quantity - self.filled_quantity
    }

    /// Check if order is completely filled
    pub fn is_filled(&self) -> bool {
        self.filled_quantity == self.quantity
    }

    /// Check if order has any fills
    pub fn has_fills(&self) -> bool {
        !self.filled_quantity.is_zero()
    }

    /// Apply a fill and adjust status
    ///
    /// Recomputes the volume-weighted average fill price over all fills so
    /// far. Transitions to Filled (stamping `filled_at`) when the order is
    /// fully executed, otherwise to PartiallyFilled.
    ///
    /// # Panics
    /// Panics if the order is terminal, the fill quantity is zero, or the
    /// fill would exceed the remaining quantity. The matching loop
    /// establishes these preconditions; a violation is a programming error.
    pub fn fill(&mut self, quantity: Quantity, price: Price, timestamp: i64) {
        assert!(
            !self.status.is_terminal(),
            "Cannot fill terminal order {}",
            self.order_id
        );
        assert!(!quantity.is_zero(), "Fill quantity must be positive");
        assert!(
            quantity <= self.remaining(),
            "Fill would exceed order quantity"
        );

        let filled_before = self.filled_quantity.as_decimal();
        let new_filled = self.filled_quantity + quantity;

        // Weighted average across all fills on this order
        let notional = self.avg_fill_price.as_decimal() * filled_before
            + price.as_decimal() * quantity.as_decimal();
        self.avg_fill_price = Price::new(notional / new_filled.as_decimal());
        self.filled_quantity = new_filled;

        if self.is_filled() {
            self.status = OrderStatus::Filled;
            self.filled_at = Some(timestamp);
        } else {
            self.status = OrderStatus::PartiallyFilled;
        }
    }

    /// Cancel the order
    ///
    /// Legal only from Pending or PartiallyFilled; cancelling a terminal
    /// order yields `OrderError::IllegalTransition`.
    pub fn cancel(&mut self, timestamp: i64) -> Result<(), OrderError> {
        if self.status.is_terminal() {
            return Err(OrderError::IllegalTransition {
                status: self.status.to_string(),
            });
        }

        self.status = OrderStatus::Cancelled;
        self.cancelled_at = Some(timestamp);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit_order(side: Side, quantity: u64, price: u64) -> Order {
        Order::new(
            Symbol::new("AAPL"),
            OrderType::Limit,
            side,
            Quantity::from_u64(quantity),
            Price::from_u64(price),
            1,
        )
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }

    #[test]
    fn test_order_creation() {
        let order = limit_order(Side::Buy, 100, 150);

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.remaining(), Quantity::from_u64(100));
        assert!(!order.has_fills());
        assert!(order.avg_fill_price.is_zero());
    }

    #[test]
    fn test_market_order_records_zero_price() {
        let order = Order::new(
            Symbol::new("AAPL"),
            OrderType::Market,
            Side::Buy,
            Quantity::from_u64(100),
            Price::zero(),
            1,
        );
        assert!(order.price.is_zero());
    }

    #[test]
    fn test_partial_then_full_fill() {
        let mut order = limit_order(Side::Buy, 100, 150);

        order.fill(Quantity::from_u64(30), Price::from_u64(150), 2);
        assert_eq!(order.status, OrderStatus::PartiallyFilled);
        assert_eq!(order.remaining(), Quantity::from_u64(70));
        assert!(order.filled_at.is_none());

        order.fill(Quantity::from_u64(70), Price::from_u64(150), 3);
        assert_eq!(order.status, OrderStatus::Filled);
        assert!(order.is_filled());
        assert_eq!(order.filled_at, Some(3));
    }

    #[test]
    fn test_vwap_across_fills() {
        let mut order = limit_order(Side::Buy, 100, 151);

        // 50 @ 150 then 50 @ 151 -> vwap 150.5
        order.fill(Quantity::from_u64(50), Price::from_u64(150), 2);
        assert_eq!(order.avg_fill_price, Price::from_u64(150));

        order.fill(Quantity::from_u64(50), Price::from_u64(151), 3);
        assert_eq!(order.avg_fill_price, Price::from_str("150.5").unwrap());
    }

    #[test]
    #[should_panic(expected = "Fill would exceed order quantity")]
    fn test_overfill_panics() {
        let mut order = limit_order(Side::Buy, 100, 150);
        order.fill(Quantity::from_u64(150), Price::from_u64(150), 2);
    }

    #[test]
    #[should_panic(expected = "Cannot fill terminal order")]
    fn test_fill_terminal_panics() {
        let mut order = limit_order(Side::Buy, 100, 150);
        order.fill(Quantity::from_u64(100), Price::from_u64(150), 2);
        order.fill(Quantity::from_u64(1), Price::from_u64(150), 3);
    }

    #[test]
    fn test_cancel_pending() {
        let mut order = limit_order(Side::Sell, 100, 150);

        order.cancel(5).unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(order.cancelled_at, Some(5));
    }

    #[test]
    fn test_cancel_partially_filled() {
        let mut order = limit_order(Side::Sell, 100, 150);
        order.fill(Quantity::from_u64(40), Price::from_u64(150), 2);

        order.cancel(5).unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(order.filled_quantity, Quantity::from_u64(40));
    }

    #[test]
    fn test_cancel_terminal_rejected() {
        let mut order = limit_order(Side::Sell, 100, 150);
        order.fill(Quantity::from_u64(100), Price::from_u64(150), 2);

        let err = order.cancel(5).unwrap_err();
        assert!(matches!(err, OrderError::IllegalTransition { .. }));

        // Cancelled is terminal too
        let mut order = limit_order(Side::Sell, 100, 150);
        order.cancel(5).unwrap();
        assert!(order.cancel(6).is_err());
    }

    #[test]
    fn test_order_serialization() {
        let order = limit_order(Side::Sell, 100, 150);

        let json = serde_json::to_string(&order).unwrap();
        assert!(json.contains("\"limit\""));
        assert!(json.contains("\"sell\""));
        assert!(json.contains("\"pending\""));

        let deserialized: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, deserialized);
    }
}
