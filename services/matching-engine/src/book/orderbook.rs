//! Per-symbol order book
//!
//! Owns the two price ladders for one symbol plus an identity index over
//! every resting order, all behind a single reader/writer lock. A submit
//! holds the write lock for the full matching pass; snapshot and
//! best-price reads share the read lock.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockWriteGuard};

use rust_decimal::Decimal;
use types::ids::{OrderId, Symbol};
use types::numeric::Price;
use types::order::{Order, Side};
use types::trade::Trade;

use super::ask_book::AskBook;
use super::bid_book::BidBook;
use super::snapshot::{BookSnapshot, LevelSnapshot};

const LOCK_POISONED: &str = "order book lock poisoned";

/// Location of a resting order, kept in the identity index
#[derive(Debug, Clone, Copy)]
pub(crate) struct RestingRef {
    pub(crate) side: Side,
    pub(crate) price: Price,
}

/// Lock-protected book state: both ladders, the identity index, and the
/// last-trade markers
#[derive(Debug)]
pub(crate) struct BookInner {
    pub(crate) bids: BidBook,
    pub(crate) asks: AskBook,
    pub(crate) index: HashMap<OrderId, RestingRef>,
    pub(crate) last_price: Price,
    pub(crate) last_trade: Option<Trade>,
    pub(crate) updated_at: i64,
}

impl BookInner {
    /// Rest an order on its own side and index it
    ///
    /// Precondition: `remaining > 0`. Every resting order is indexed
    /// exactly once; a duplicate identity is a programming error.
    pub(crate) fn add_resting(&mut self, order: Order, timestamp: i64) {
        assert!(
            !order.remaining().is_zero(),
            "Resting order must have remaining quantity"
        );

        let previous = self.index.insert(
            order.order_id,
            RestingRef {
                side: order.side,
                price: order.price,
            },
        );
        assert!(previous.is_none(), "Order {} already resting", order.order_id);

        match order.side {
            Side::Buy => self.bids.insert(order),
            Side::Sell => self.asks.insert(order),
        }
        self.updated_at = timestamp;
    }

    /// Remove a resting order by identity
    pub(crate) fn remove_resting(&mut self, order_id: &OrderId) -> Option<Order> {
        let resting = self.index.remove(order_id)?;
        match resting.side {
            Side::Buy => self.bids.remove(order_id, resting.price),
            Side::Sell => self.asks.remove(order_id, resting.price),
        }
    }

    pub(crate) fn best_bid(&self) -> Price {
        self.bids.best_price().unwrap_or_else(Price::zero)
    }

    pub(crate) fn best_ask(&self) -> Price {
        self.asks.best_price().unwrap_or_else(Price::zero)
    }
}

/// Order book for a single symbol
///
/// Matching is the engine's responsibility; the book only stores resting
/// orders and serves market-data aggregates.
#[derive(Debug)]
pub struct OrderBook {
    symbol: Symbol,
    inner: RwLock<BookInner>,
}

impl OrderBook {
    /// Create an empty book for a symbol
    pub fn new(symbol: Symbol, timestamp: i64) -> Self {
        Self {
            symbol,
            inner: RwLock::new(BookInner {
                bids: BidBook::new(),
                asks: AskBook::new(),
                index: HashMap::new(),
                last_price: Price::zero(),
                last_trade: None,
                updated_at: timestamp,
            }),
        }
    }

    /// The symbol this book trades
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Write access for the matching loop
    ///
    /// The engine holds this guard for the full duration of matching plus
    /// post-match placement, which is what linearizes per-symbol submits.
    pub(crate) fn write_inner(&self) -> RwLockWriteGuard<'_, BookInner> {
        self.inner.write().expect(LOCK_POISONED)
    }

    /// Add a resting order to the correct side
    ///
    /// Does not match; precondition `remaining > 0`.
    pub fn add(&self, order: Order, timestamp: i64) {
        self.write_inner().add_resting(order, timestamp);
    }

    /// Remove a resting order by identity
    ///
    /// Returns the removed order, or None if the identity is not resting
    /// on this book.
    pub fn remove(&self, order_id: &OrderId, timestamp: i64) -> Option<Order> {
        let mut inner = self.write_inner();
        let removed = inner.remove_resting(order_id);
        if removed.is_some() {
            inner.updated_at = timestamp;
        }
        removed
    }

    /// Look up a resting order by identity
    pub fn get(&self, order_id: &OrderId) -> Option<Order> {
        let inner = self.inner.read().expect(LOCK_POISONED);
        let resting = inner.index.get(order_id)?;
        let level = match resting.side {
            Side::Buy => inner.bids.level(resting.price),
            Side::Sell => inner.asks.level(resting.price),
        }?;
        level.get(order_id).cloned()
    }

    /// The highest resting buy price; zero when the side is empty
    pub fn best_bid(&self) -> Price {
        self.inner.read().expect(LOCK_POISONED).best_bid()
    }

    /// The lowest resting sell price; zero when the side is empty
    pub fn best_ask(&self) -> Price {
        self.inner.read().expect(LOCK_POISONED).best_ask()
    }

    /// best_ask - best_bid when both sides rest; zero otherwise
    pub fn spread(&self) -> Price {
        let inner = self.inner.read().expect(LOCK_POISONED);
        match (inner.bids.best_price(), inner.asks.best_price()) {
            (Some(bid), Some(ask)) => ask - bid,
            _ => Price::zero(),
        }
    }

    /// Midpoint of the spread; falls back to the last traded price when a
    /// side is empty (zero before any trade)
    pub fn mid_price(&self) -> Price {
        let inner = self.inner.read().expect(LOCK_POISONED);
        match (inner.bids.best_price(), inner.asks.best_price()) {
            (Some(bid), Some(ask)) => (bid + ask) / Decimal::from(2),
            _ => inner.last_price,
        }
    }

    /// The last traded price; zero before any trade
    pub fn last_price(&self) -> Price {
        self.inner.read().expect(LOCK_POISONED).last_price
    }

    /// The most recent trade on this book
    pub fn last_trade(&self) -> Option<Trade> {
        self.inner.read().expect(LOCK_POISONED).last_trade.clone()
    }

    /// Number of resting orders across both sides
    pub fn order_count(&self) -> usize {
        self.inner.read().expect(LOCK_POISONED).index.len()
    }

    /// Check if no orders rest on either side
    pub fn is_empty(&self) -> bool {
        self.inner.read().expect(LOCK_POISONED).index.is_empty()
    }

    /// Point-in-time view of the book, atomic with respect to writers
    pub fn snapshot(&self) -> BookSnapshot {
        let inner = self.inner.read().expect(LOCK_POISONED);

        let level_view = |level: &super::price_level::PriceLevel| LevelSnapshot {
            price: level.price(),
            quantity: level.total_quantity(),
            orders: level.order_count(),
        };

        BookSnapshot {
            symbol: self.symbol.clone(),
            last_price: inner.last_price,
            timestamp: inner.updated_at,
            bids: inner.bids.levels().map(level_view).collect(),
            asks: inner.asks.levels().map(level_view).collect(),
        }
    }
}
