//! Process-wide token bucket for `tools/call`.
//!
//! Holds `capacity` tokens and refills all of them once per interval.
//! State lives here in the adapter; the gateway itself stays
//! stateless.

use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Bucket {
    tokens: u32,
    last_refill: Instant,
}

#[derive(Debug)]
pub struct TokenBucket {
    capacity: u32,
    interval: Duration,
    bucket: Mutex<Bucket>,
}

impl TokenBucket {
    pub fn new(capacity: u32, interval: Duration) -> Self {
        Self {
            capacity,
            interval,
            bucket: Mutex::new(Bucket {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Take a token if one is available
    pub fn try_acquire(&self) -> bool {
        self.try_acquire_at(Instant::now())
    }

    fn try_acquire_at(&self, now: Instant) -> bool {
        // A poisoned lock only means another caller panicked mid-update;
        // the counters are still usable.
        let mut bucket = self.bucket.lock().unwrap_or_else(|e| e.into_inner());

        if now.saturating_duration_since(bucket.last_refill) >= self.interval {
            bucket.tokens = self.capacity;
            bucket.last_refill = now;
        }

        if bucket.tokens > 0 {
            bucket.tokens -= 1;
            true
        } else {
            false
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}
