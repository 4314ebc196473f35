//! Point-in-time order book views
//!
//! Snapshots are taken atomically under the book's read lock and are
//! plain data: safe to serialize and hand to any consumer. Levels are
//! emitted best-at-head (bids descending, asks ascending).

use serde::{Deserialize, Serialize};
use types::ids::Symbol;
use types::numeric::{Price, Quantity};

/// Aggregate view of one price level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    /// The price of this level
    pub price: Price,
    /// Sum of remaining quantity across all resting orders at this level
    pub quantity: Quantity,
    /// Number of resting orders at this level
    pub orders: usize,
}

/// Read-only snapshot of one symbol's order book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub symbol: Symbol,
    /// Last traded price; zero before any trade
    pub last_price: Price,
    /// Unix nanos of the book's last update
    pub timestamp: i64,
    /// Bid levels, best (highest) first
    pub bids: Vec<LevelSnapshot>,
    /// Ask levels, best (lowest) first
    pub asks: Vec<LevelSnapshot>,
}

impl BookSnapshot {
    /// Total resting quantity on the bid side
    pub fn bid_quantity(&self) -> Quantity {
        self.bids
            .iter()
            .fold(Quantity::zero(), |acc, l| acc + l.quantity)
    }

    /// Total resting quantity on the ask side
    pub fn ask_quantity(&self) -> Quantity {
        self.asks
            .iter()
            .fold(Quantity::zero(), |acc, l| acc + l.quantity)
    }
}
