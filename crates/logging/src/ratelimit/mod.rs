//! crates/logging/src/ratelimit/mod.rs
//! Burst limiter shared by every non-hooked log call.

mod core;

pub use self::core::{RateDecision, RateLimitStats, RateLimiter, RateVerdict, SuppressionReport};

/// Window length applied when none is configured, in seconds.
pub const DEFAULT_INTERVAL_SECS: u32 = 10;

/// Messages allowed per window when none is configured.
pub const DEFAULT_BURST: u32 = 5000;
