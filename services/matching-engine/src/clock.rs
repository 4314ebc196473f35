//! Monotonic wall-clock timestamps
//!
//! Submission and execution timestamps are unix nanos, forced strictly
//! increasing across the whole engine so that FIFO ties at equal wall-clock
//! readings cannot occur and trades emitted in one submit are strictly
//! ordered by timestamp.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Strictly monotonic nanosecond clock
#[derive(Debug, Default)]
pub struct Clock {
    last: AtomicI64,
}

impl Clock {
    /// Create a new clock
    pub fn new() -> Self {
        Self {
            last: AtomicI64::new(0),
        }
    }

    /// Current unix nanos, strictly greater than every previous reading
    pub fn now(&self) -> i64 {
        let wall = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before unix epoch")
            .as_nanos() as i64;

        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let next = wall.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }
}
