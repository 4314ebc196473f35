//! Matching engine core
//!
//! Owner of the per-symbol order books and the global trade log. The
//! engine validates submissions at the boundary, drives the matching loop
//! under the target book's write lock, and appends executed trades to the
//! log after the book lock is released.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use rust_decimal::Decimal;
use tracing::{debug, info};
use types::errors::EngineError;
use types::ids::{OrderId, Symbol};
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderType, Side};
use types::trade::Trade;

use crate::book::{BookSnapshot, OrderBook};
use crate::clock::Clock;
use crate::matching;

const LOCK_POISONED: &str = "engine lock poisoned";

/// Engine tuning knobs
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound applied to every `recent_trades` limit argument
    pub max_recent_trades: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_recent_trades: 500,
        }
    }
}

/// Result of submitting an order
///
/// Carries the order's final state after all fills from this call, plus
/// the trades it generated in match order.
#[derive(Debug, Clone)]
pub struct SubmitResult {
    pub order: Order,
    pub trades: Vec<Trade>,
}

/// Order matching engine across multiple order books
///
/// Books are created lazily on first submission per symbol and live for
/// the process lifetime. The symbol map and the trade log each have their
/// own reader/writer lock; per-symbol submits are linearized by the
/// book-level write lock.
pub struct MatchingEngine {
    books: RwLock<HashMap<String, Arc<OrderBook>>>,
    trades: RwLock<Vec<Trade>>,
    clock: Clock,
    config: EngineConfig,
}

impl MatchingEngine {
    /// Create an empty engine with default configuration
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an empty engine with explicit configuration
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            books: RwLock::new(HashMap::new()),
            trades: RwLock::new(Vec::new()),
            clock: Clock::new(),
            config,
        }
    }

    /// Validate and submit an order
    ///
    /// This is the boundary entry point: quantity must be positive, and
    /// limit/stop-loss orders need a positive price. Market orders ignore
    /// the given price and record zero. The submission timestamp comes
    /// from the engine clock.
    pub fn submit_order(
        &self,
        symbol: &str,
        order_type: OrderType,
        side: Side,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<SubmitResult, EngineError> {
        let symbol = Symbol::try_new(symbol).ok_or_else(|| EngineError::InvalidOrder {
            reason: "symbol must be non-empty".to_string(),
        })?;
        if quantity <= Decimal::ZERO {
            return Err(EngineError::InvalidOrder {
                reason: "quantity must be positive".to_string(),
            });
        }
        let price = match order_type {
            OrderType::Market => Price::zero(),
            OrderType::Limit | OrderType::StopLoss => {
                if price <= Decimal::ZERO {
                    return Err(EngineError::InvalidOrder {
                        reason: "price is required for limit and stop_loss orders".to_string(),
                    });
                }
                Price::new(price)
            }
        };

        let order = Order::new(
            symbol,
            order_type,
            side,
            Quantity::new(quantity),
            price,
            self.clock.now(),
        );
        Ok(self.submit(order))
    }

    /// Submit a pre-validated order
    ///
    /// Stop-loss orders are reduced to a limit at their carried price
    /// (there is no trigger subsystem). Returns the order's final state
    /// and the trades generated by this call.
    pub fn submit(&self, mut order: Order) -> SubmitResult {
        if order.order_type == OrderType::StopLoss {
            debug!(
                order_id = %order.order_id,
                price = %order.price,
                "stop-loss reduced to limit at carried price"
            );
            order.order_type = OrderType::Limit;
        }

        let book = self.get_or_create_book(order.symbol.as_str());

        let trades = {
            let mut inner = book.write_inner();
            let trades = matching::execute(&mut inner, &mut order, &self.clock);

            if !order.remaining().is_zero() {
                if order.order_type == OrderType::Market {
                    // Market orders never rest; the remainder is discarded
                    debug!(
                        order_id = %order.order_id,
                        remaining = %order.remaining(),
                        "market order remainder discarded"
                    );
                } else {
                    inner.add_resting(order.clone(), self.clock.now());
                }
            }
            trades
        };

        // The log is a global ordered history, appended after the book's
        // lock is released
        if !trades.is_empty() {
            self.trades
                .write()
                .expect(LOCK_POISONED)
                .extend(trades.iter().cloned());
        }

        info!(
            order_id = %order.order_id,
            symbol = %order.symbol,
            side = ?order.side,
            status = %order.status,
            trades = trades.len(),
            "order submitted"
        );

        SubmitResult { order, trades }
    }

    /// Get or create the order book for a symbol
    ///
    /// Repeat calls with the same symbol return the identical instance.
    pub fn get_or_create_book(&self, symbol: &str) -> Arc<OrderBook> {
        {
            let books = self.books.read().expect(LOCK_POISONED);
            if let Some(book) = books.get(symbol) {
                return Arc::clone(book);
            }
        }

        let mut books = self.books.write().expect(LOCK_POISONED);
        let book = books.entry(symbol.to_string()).or_insert_with(|| {
            info!(symbol, "creating order book");
            Arc::new(OrderBook::new(Symbol::new(symbol), self.clock.now()))
        });
        Arc::clone(book)
    }

    /// Look up the order book for a symbol without creating it
    pub fn get_book(&self, symbol: &str) -> Option<Arc<OrderBook>> {
        self.books
            .read()
            .expect(LOCK_POISONED)
            .get(symbol)
            .map(Arc::clone)
    }

    /// Cancel a resting order by identity
    ///
    /// Returns whether the order was resting on any book. The removed
    /// order is stamped Cancelled.
    pub fn cancel_order(&self, order_id: &OrderId) -> bool {
        let books: Vec<Arc<OrderBook>> = {
            let books = self.books.read().expect(LOCK_POISONED);
            books.values().map(Arc::clone).collect()
        };

        for book in books {
            let now = self.clock.now();
            if let Some(mut order) = book.remove(order_id, now) {
                order
                    .cancel(now)
                    .expect("resting orders are never terminal");
                info!(
                    order_id = %order_id,
                    symbol = %order.symbol,
                    remaining = %order.remaining(),
                    "order cancelled"
                );
                return true;
            }
        }
        false
    }

    /// Recent trades for a symbol, most recent first
    ///
    /// Scans the global log in reverse insertion order. The limit is
    /// clamped to `EngineConfig::max_recent_trades`.
    pub fn recent_trades(&self, symbol: &str, limit: usize) -> Vec<Trade> {
        let limit = limit.min(self.config.max_recent_trades);
        let trades = self.trades.read().expect(LOCK_POISONED);
        trades
            .iter()
            .rev()
            .filter(|t| t.symbol.as_str() == symbol)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Point-in-time book snapshot; None for never-seen symbols
    pub fn snapshot(&self, symbol: &str) -> Option<BookSnapshot> {
        self.get_book(symbol).map(|book| book.snapshot())
    }

    /// Best bid for a symbol; zero when the side is empty
    pub fn best_bid(&self, symbol: &str) -> Result<Price, EngineError> {
        Ok(self.lookup(symbol)?.best_bid())
    }

    /// Best ask for a symbol; zero when the side is empty
    pub fn best_ask(&self, symbol: &str) -> Result<Price, EngineError> {
        Ok(self.lookup(symbol)?.best_ask())
    }

    /// Spread for a symbol; zero unless both sides rest
    pub fn spread(&self, symbol: &str) -> Result<Price, EngineError> {
        Ok(self.lookup(symbol)?.spread())
    }

    /// Mid price for a symbol; last trade price when a side is empty
    pub fn mid_price(&self, symbol: &str) -> Result<Price, EngineError> {
        Ok(self.lookup(symbol)?.mid_price())
    }

    /// Total number of trades in the global log
    pub fn trade_count(&self) -> usize {
        self.trades.read().expect(LOCK_POISONED).len()
    }

    fn lookup(&self, symbol: &str) -> Result<Arc<OrderBook>, EngineError> {
        self.get_book(symbol).ok_or_else(|| EngineError::UnknownSymbol {
            symbol: symbol.to_string(),
        })
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}
