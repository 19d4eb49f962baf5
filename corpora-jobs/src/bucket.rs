use chrono::{DateTime, Utc};
use std::time::Duration;

/// Token bucket gating worker throughput to a configured jobs-per-second
/// rate. Refills continuously based on elapsed wall-clock time rather than
/// a fixed tick, so a burst of short gaps between jobs doesn't starve later
/// throughput.
#[derive(Debug)]
pub struct TokenBucket {
    tokens: f64,
    capacity: f64,
    refill_rate: f64,
    last_refill: DateTime<Utc>,
}

impl TokenBucket {
    #[must_use]
    pub fn new(rate_per_second: f64) -> Self {
        Self {
            tokens: rate_per_second,
            capacity: rate_per_second,
            refill_rate: rate_per_second,
            last_refill: Utc::now(),
        }
    }

    fn refill(&mut self) {
        let now = Utc::now();
        let elapsed = now.signed_duration_since(self.last_refill);
        let elapsed_secs = elapsed.num_milliseconds().max(0) as f64 / 1000.0;
        if elapsed_secs > 0.0 {
            self.tokens = (self.tokens + elapsed_secs * self.refill_rate).min(self.capacity);
            self.last_refill = now;
        }
    }

    /// Attempt to take one token; on failure returns how long to wait before
    /// trying again.
    pub fn try_acquire(&mut self) -> Result<(), Duration> {
        self.refill();
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            Ok(())
        } else {
            let deficit = 1.0 - self.tokens;
            let wait_secs = deficit / self.refill_rate;
            Err(Duration::from_secs_f64(wait_secs.max(0.0)))
        }
    }
}
