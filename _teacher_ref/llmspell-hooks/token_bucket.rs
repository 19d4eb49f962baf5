// ABOUTME: Token bucket algorithm implementation for rate limiting with burst support
// ABOUTME: Provides precise rate limiting with configurable refill rates and burst capacity

use super::{BucketState, TokenBucketConfig};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Token bucket implementation
#[derive(Debug)]
pub struct TokenBucket {
    /// Current number of tokens
    tokens: f64,
    /// Configuration
    config: TokenBucketConfig,
    /// Last refill time
    last_refill: DateTime<Utc>,
    /// Statistics
    total_consumed: u64,
    total_refilled: u64,
    last_refill_amount: f64,
}

impl TokenBucket {
    /// Create a new token bucket
    pub fn new(config: TokenBucketConfig) -> Self {
        let total_capacity = config.capacity + config.burst_capacity;
        Self {
            tokens: total_capacity as f64,
            config,
            last_refill: Utc::now(),
            total_consumed: 0,
            total_refilled: 0,
            last_refill_amount: 0.0,
        }
    }

    /// Try to acquire tokens
    pub fn try_acquire(&mut self, requested: f64) -> (bool, f64) {
        // Refill tokens based on elapsed time
        self.refill();

        if self.tokens >= requested {
            self.tokens -= requested;
            self.total_consumed += requested as u64;
            (true, self.tokens)
        } else {
            (false, self.tokens)
        }
    }

    /// Force acquire tokens (may go negative)
    pub fn force_acquire(&mut self, requested: f64) -> f64 {
        self.refill();
        self.tokens -= requested;
        self.total_consumed += requested as u64;
        self.tokens
    }

    /// Get current token count
    pub fn get_tokens(&mut self) -> f64 {
        self.refill();
        self.tokens
    }

    /// Get bucket state
    pub fn get_state(&self) -> BucketState {
        let now = Utc::now();
        let elapsed = now.signed_duration_since(self.last_refill);
        let elapsed_seconds = elapsed.num_milliseconds() as f64 / 1000.0;

        // Calculate when next refill will happen
        let refill_interval_seconds = self.config.refill_interval.as_secs_f64();
        let time_until_next_refill =
            refill_interval_seconds - (elapsed_seconds % refill_interval_seconds);
        let next_refill =
            now + chrono::Duration::milliseconds((time_until_next_refill * 1000.0) as i64);

        BucketState {
            tokens: self.tokens,
            capacity: self.config.capacity,
            burst_capacity: self.config.burst_capacity,
            last_access: now,
            next_refill,
            total_consumed: self.total_consumed,
            total_refilled: self.total_refilled,
            last_refill_amount: self.last_refill_amount,
        }
    }

    /// Reset the bucket to full capacity
    pub fn reset(&mut self) {
        let total_capacity = self.config.capacity + self.config.burst_capacity;
        self.tokens = total_capacity as f64;
        self.last_refill = Utc::now();
        self.total_consumed = 0;
        self.total_refilled = 0;
        self.last_refill_amount = 0.0;
    }

    /// Refill tokens based on elapsed time
    fn refill(&mut self) {
        let now = Utc::now();
        let elapsed = now.signed_duration_since(self.last_refill);
        let elapsed_duration = elapsed.to_std().unwrap_or(Duration::ZERO);

        if elapsed_duration >= self.config.refill_interval {
            // Calculate how many refill intervals have passed
            let intervals =
                elapsed_duration.as_secs_f64() / self.config.refill_interval.as_secs_f64();
            let refill_amount = intervals * self.config.refill_rate;

            // Add tokens, capping at total capacity
            let total_capacity = (self.config.capacity + self.config.burst_capacity) as f64;
            let old_tokens = self.tokens;
            self.tokens = (self.tokens + refill_amount).min(total_capacity);

            // Update statistics
            let actual_refilled = self.tokens - old_tokens;
            if actual_refilled > 0.0 {
                self.total_refilled += actual_refilled as u64;
                self.last_refill_amount = actual_refilled;
            }

            // Update last refill time
            self.last_refill = now;
        }
    }
}
