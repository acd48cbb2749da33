//! crates/logging/src/config.rs
//! Startup configuration for a logging context.

use logging_sink::SyslogConfig;

use crate::dispatch::LogContext;
use crate::level::Level;
use crate::ratelimit::{DEFAULT_BURST, DEFAULT_INTERVAL_SECS};

/// Rate limiter settings.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RateLimitConfig {
    /// Window length in seconds. Zero suppresses all output.
    pub interval_secs: u32,
    /// Messages allowed per window.
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
            burst: DEFAULT_BURST,
        }
    }
}

/// Complete configuration of a logging context.
///
/// Passed to [`LogContextBuilder::config`](crate::LogContextBuilder::config)
/// at construction, or pushed into a live context with [`apply`](Self::apply).
/// Missing fields deserialize to their defaults.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LogConfig {
    /// System-log threshold.
    pub level: Level,
    /// Console threshold.
    pub print_level: Level,
    /// Rate limiter settings.
    pub ratelimit: RateLimitConfig,
    /// Whether console lines carry a timestamp prefix.
    pub timestamps: bool,
    /// System-log facility and ident. Only read when the default
    /// [`Syslog`](logging_sink::Syslog) sink is built.
    pub syslog: SyslogConfig,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::Error,
            print_level: Level::Error,
            ratelimit: RateLimitConfig::default(),
            timestamps: true,
            syslog: SyslogConfig::default(),
        }
    }
}

impl LogConfig {
    /// Pushes the runtime-settable values into `ctx`.
    ///
    /// The syslog settings are fixed once the context is built and are left
    /// untouched.
    pub fn apply(&self, ctx: &LogContext) {
        ctx.set_level(self.level);
        ctx.set_print_level(self.print_level);
        ctx.set_ratelimit_interval(self.ratelimit.interval_secs);
        ctx.set_ratelimit_burst(self.ratelimit.burst);
        ctx.enable_timestamps(self.timestamps);
    }
}
