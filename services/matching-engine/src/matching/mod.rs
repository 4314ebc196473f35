//! Matching loop
//!
//! Consumes the side opposite an incoming order while its best level is
//! price-acceptable, strictly FIFO within each level. Every trade executes
//! at the resting order's price; the aggressor gets the improvement, the
//! resting side never does. Runs entirely under the book's write lock.

pub mod crossing;

use tracing::debug;
use types::order::{Order, Side};
use types::trade::Trade;

use crate::book::orderbook::BookInner;
use crate::clock::Clock;

/// Match an incoming order against the opposite side of the book
///
/// Returns the trades generated by this submission in match order (best
/// price first, FIFO within a level). The incoming order's fill state is
/// updated in place; placement of any remainder is the caller's job.
pub(crate) fn execute(inner: &mut BookInner, incoming: &mut Order, clock: &Clock) -> Vec<Trade> {
    match incoming.side {
        Side::Buy => consume_asks(inner, incoming, clock),
        Side::Sell => consume_bids(inner, incoming, clock),
    }
}

/// Match an incoming buy against the ask ladder, best (lowest) level first
fn consume_asks(inner: &mut BookInner, incoming: &mut Order, clock: &Clock) -> Vec<Trade> {
    let mut trades = Vec::new();

    while !incoming.remaining().is_zero() {
        let Some(best_price) = inner.asks.best_price() else {
            break;
        };
        if !crossing::price_acceptable(incoming, best_price) {
            break;
        }

        let level = inner
            .asks
            .level_mut(best_price)
            .expect("best ask level must exist");

        while !incoming.remaining().is_zero() {
            let Some(resting) = level.front_mut() else {
                break;
            };

            let quantity = incoming.remaining().min(resting.remaining());
            let price = resting.price;
            let executed_at = clock.now();

            incoming.fill(quantity, price, executed_at);
            resting.fill(quantity, price, executed_at);

            // Incoming buy is the aggressor; the resting ask sets the price
            let trade = Trade::new(
                incoming.symbol.clone(),
                incoming.order_id,
                resting.order_id,
                price,
                quantity,
                executed_at,
            );
            debug!(
                trade_id = %trade.trade_id,
                price = %price,
                quantity = %quantity,
                "buy matched resting ask"
            );

            inner.last_price = price;
            inner.last_trade = Some(trade.clone());
            inner.updated_at = executed_at;
            trades.push(trade);

            if resting.remaining().is_zero() {
                let filled = level.pop_front().expect("filled order at level head");
                inner.index.remove(&filled.order_id);
            }
        }

        if level.is_empty() {
            inner.asks.remove_level(best_price);
        }
    }

    trades
}

/// Match an incoming sell against the bid ladder, best (highest) level first
fn consume_bids(inner: &mut BookInner, incoming: &mut Order, clock: &Clock) -> Vec<Trade> {
    let mut trades = Vec::new();

    while !incoming.remaining().is_zero() {
        let Some(best_price) = inner.bids.best_price() else {
            break;
        };
        if !crossing::price_acceptable(incoming, best_price) {
            break;
        }

        let level = inner
            .bids
            .level_mut(best_price)
            .expect("best bid level must exist");

        while !incoming.remaining().is_zero() {
            let Some(resting) = level.front_mut() else {
                break;
            };

            let quantity = incoming.remaining().min(resting.remaining());
            let price = resting.price;
            let executed_at = clock.now();

            incoming.fill(quantity, price, executed_at);
            resting.fill(quantity, price, executed_at);

            // Incoming sell is the aggressor; the resting bid sets the price
            let trade = Trade::new(
                incoming.symbol.clone(),
                resting.order_id,
                incoming.order_id,
                price,
                quantity,
                executed_at,
            );
            debug!(
                trade_id = %trade.trade_id,
                price = %price,
                quantity = %quantity,
                "sell matched resting bid"
            );

            inner.last_price = price;
            inner.last_trade = Some(trade.clone());
            inner.updated_at = executed_at;
            trades.push(trade);

            if resting.remaining().is_zero() {
                let filled = level.pop_front().expect("filled order at level head");
                inner.index.remove(&filled.order_id);
            }
        }

        if level.is_empty() {
            inner.bids.remove_level(best_price);
        }
    }

    trades
}
