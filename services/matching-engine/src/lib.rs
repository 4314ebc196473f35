//! Matching engine for the exchange simulator
//!
//! Continuous double-auction matching under price-time priority. Each
//! symbol owns an order book of two price-level ladders (bids max-ordered,
//! asks min-ordered) with FIFO queues per level; the engine routes
//! submissions to the right book, drives the matching loop, and appends
//! executed trades to a global log.
//!
//! **Key invariants:**
//! - Price-time priority strictly enforced
//! - Trades execute at the resting order's price
//! - The book is never crossed after a submit returns
//! - Sum of trade quantities for a submission equals its filled quantity

pub mod book;
pub mod clock;
pub mod engine;
pub mod matching;

pub use book::{BookSnapshot, LevelSnapshot, OrderBook};
pub use engine::{EngineConfig, MatchingEngine, SubmitResult};
