//! Price level with FIFO queue
//!
//! A price level holds every resting order at one price, oldest at the
//! head. The matching loop consumes the head first, which is what enforces
//! time priority at equal prices.

use std::collections::VecDeque;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::Order;

/// All resting orders at a single price, in strict FIFO order
#[derive(Debug, Clone)]
pub struct PriceLevel {
    price: Price,
    orders: VecDeque<Order>,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new(price: Price) -> Self {
        Self {
            price,
            orders: VecDeque::new(),
        }
    }

    /// The price keying this level
    pub fn price(&self) -> Price {
        self.price
    }

    /// Append an order at the back of the queue (time priority)
    ///
    /// Queued orders must match the level price and have remaining
    /// quantity; both are established by the owning book.
    pub fn push_back(&mut self, order: Order) {
        debug_assert_eq!(order.price, self.price);
        debug_assert!(!order.remaining().is_zero());
        self.orders.push_back(order);
    }

    /// Peek at the front order without removing it
    pub fn front(&self) -> Option<&Order> {
        self.orders.front()
    }

    /// Mutable access to the front order (used by the matching loop)
    pub fn front_mut(&mut self) -> Option<&mut Order> {
        self.orders.front_mut()
    }

    /// Pop the front order from the queue
    pub fn pop_front(&mut self) -> Option<Order> {
        self.orders.pop_front()
    }

    /// Remove an order from the queue by identity
    pub fn remove(&mut self, order_id: &OrderId) -> Option<Order> {
        let position = self.orders.iter().position(|o| &o.order_id == order_id)?;
        self.orders.remove(position)
    }

    /// Find an order in the queue by identity
    pub fn get(&self, order_id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| &o.order_id == order_id)
    }

    /// Check if the price level is empty
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Number of orders resting at this level
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Sum of remaining quantity across all orders at this level
    pub fn total_quantity(&self) -> Quantity {
        self.orders
            .iter()
            .fold(Quantity::zero(), |acc, o| acc + o.remaining())
    }
}
