//! Sliding-window per-tenant rate limiting and usage metric recording
//! (spec §4.9, C9).

pub mod limiter;
pub mod usage;

pub use limiter::{RateLimitDecision, RateLimiter, RateLimits};
pub use usage::UsageTracker;
