//! crates/logging/src/dispatch/mod.rs
//! The log call path: hook override, level gate, rate gate, then both sinks.

mod record;
pub(crate) mod render;

pub use record::{HookError, Location, LogHook, Record};

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use logging_sink::{ConsoleSink, StderrConsole, Syslog, SystemLogSink};
use time::UtcOffset;

use crate::config::LogConfig;
use crate::dump::format_dump;
use crate::level::Level;
use crate::policy::LevelPolicy;
use crate::ratelimit::{RateLimitStats, RateLimiter};
use crate::timestamp::TimestampFormatter;

/// Process logging context shared by every call site.
///
/// A context owns the level thresholds, the rate limiter, the timestamp
/// switch, the optional [`LogHook`] and both sinks. The host process builds
/// one with [`LogContext::builder`], calls [`initialize`](Self::initialize)
/// during startup and [`shutdown`](Self::shutdown) during teardown, and hands
/// clones of the returned [`Arc`] to its threads. Independent contexts may
/// coexist, which keeps tests isolated.
///
/// # Examples
///
/// ```
/// use logging::{Level, LogContext, log_warn};
/// use logging_sink::{MemoryConsole, MemorySystemLog};
///
/// let console = MemoryConsole::new();
/// let ctx = LogContext::builder()
///     .console(console.clone())
///     .system_log(MemorySystemLog::new())
///     .build();
/// ctx.initialize();
/// ctx.enable_timestamps(false);
/// ctx.set_print_level(Level::Warn);
///
/// log_warn!(ctx, "queue depth {} exceeds limit", 130);
/// assert!(console.contents().ends_with(": *WARNING*: queue depth 130 exceeds limit\n"));
/// ctx.shutdown();
/// ```
pub struct LogContext {
    policy: LevelPolicy,
    limiter: RateLimiter,
    timestamps: TimestampFormatter,
    hook: OnceLock<Arc<dyn LogHook>>,
    console: Box<dyn ConsoleSink>,
    system_log: Box<dyn SystemLogSink>,
    opened: AtomicBool,
}

impl LogContext {
    /// Starts building a context with default configuration and sinks.
    #[must_use]
    pub fn builder() -> LogContextBuilder {
        LogContextBuilder::default()
    }

    /// Opens the system-log sink.
    ///
    /// Skipped when a hook owns dispatch. Calling it twice is harmless.
    pub fn initialize(&self) {
        if self.has_hook() {
            return;
        }
        if !self.opened.swap(true, Ordering::AcqRel) {
            self.system_log.open();
        }
    }

    /// Closes the system-log sink if [`initialize`](Self::initialize) opened it.
    pub fn shutdown(&self) {
        if self.opened.swap(false, Ordering::AcqRel) {
            self.system_log.close();
        }
    }

    /// Installs the dispatch override.
    ///
    /// Install it during startup, before logging threads run. A hook cannot be
    /// replaced or removed.
    pub fn install_hook(&self, hook: Arc<dyn LogHook>) -> Result<(), HookError> {
        self.hook.set(hook).map_err(|_| HookError::AlreadyInstalled)
    }

    /// Reports whether a hook owns dispatch.
    pub fn has_hook(&self) -> bool {
        self.hook.get().is_some()
    }

    /// Sets the system-log threshold.
    pub fn set_level(&self, level: Level) {
        self.policy.set_level(level);
    }

    /// Returns the system-log threshold.
    pub fn level(&self) -> Level {
        self.policy.level()
    }

    /// Sets the console threshold.
    pub fn set_print_level(&self, level: Level) {
        self.policy.set_print_level(level);
    }

    /// Returns the console threshold.
    pub fn print_level(&self) -> Level {
        self.policy.print_level()
    }

    /// Sets the rate-limit window in seconds. Zero suppresses all output.
    pub fn set_ratelimit_interval(&self, interval_secs: u32) {
        self.limiter.set_interval(interval_secs);
    }

    /// Returns the rate-limit window in seconds.
    pub fn ratelimit_interval(&self) -> u32 {
        self.limiter.interval()
    }

    /// Sets the number of messages allowed per window.
    pub fn set_ratelimit_burst(&self, burst: u32) {
        self.limiter.set_burst(burst);
    }

    /// Returns the number of messages allowed per window.
    pub fn ratelimit_burst(&self) -> u32 {
        self.limiter.burst()
    }

    /// Returns the rate limiter's current window counters.
    pub fn ratelimit_stats(&self) -> RateLimitStats {
        self.limiter.stats()
    }

    /// Turns console timestamp prefixes on or off.
    pub fn enable_timestamps(&self, enabled: bool) {
        self.timestamps.set_enabled(enabled);
    }

    /// Reports whether console lines carry a timestamp prefix.
    pub fn timestamps_enabled(&self) -> bool {
        self.timestamps.is_enabled()
    }

    /// The level thresholds.
    pub const fn policy(&self) -> &LevelPolicy {
        &self.policy
    }

    /// The shared rate limiter.
    pub const fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Dispatches one log call.
    ///
    /// Never fails and never panics on formatting problems: oversized
    /// messages are truncated and sink errors are ignored.
    pub fn log(&self, level: Level, location: Option<Location>, args: fmt::Arguments<'_>) {
        self.dispatch(Instant::now(), level, location, args);
    }

    pub(crate) fn dispatch(
        &self,
        now: Instant,
        level: Level,
        location: Option<Location>,
        args: fmt::Arguments<'_>,
    ) {
        if let Some(hook) = self.hook.get() {
            hook.log(&Record::new(level, location, args));
            return;
        }

        if !self.policy.admits(level) {
            return;
        }

        let Some(priority) = level.syslog_priority() else {
            return;
        };

        let verdict = self.limiter.check_at(now);
        if let Some(report) = verdict.report {
            let line = format!("{}: {report}", self.timestamps.prefix());
            let _ = self.console.write_line(&line);
        }
        if !verdict.decision.permits() {
            return;
        }

        let message = render::render_message(args);
        let body = render::format_body(level, location.as_ref(), &message);

        if self.policy.prints(level) {
            let line = format!("{}{body}", self.timestamps.prefix());
            let _ = self.console.write_line(&line);
        }

        if self.policy.logs(level) {
            self.system_log.write(priority, &body);
        }
    }

    /// Writes a hex dump of `bytes` to the console sink.
    ///
    /// Bypasses level and rate gating, like any direct write to the console.
    pub fn dump_to_console(&self, label: &str, bytes: &[u8]) {
        let _ = self.console.write_text(&format_dump(label, bytes));
        let _ = self.console.flush();
    }
}

impl fmt::Debug for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogContext")
            .field("policy", &self.policy)
            .field("limiter", &self.limiter)
            .field("timestamps", &self.timestamps)
            .field("hook", &self.has_hook())
            .field("opened", &self.opened.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Builder for [`LogContext`].
///
/// Defaults: [`LogConfig::default`], a [`StderrConsole`], a [`Syslog`] sink
/// opened with the configuration's syslog settings, no hook, and the local
/// UTC offset for timestamps.
#[derive(Default)]
pub struct LogContextBuilder {
    config: LogConfig,
    console: Option<Box<dyn ConsoleSink>>,
    system_log: Option<Box<dyn SystemLogSink>>,
    hook: Option<Arc<dyn LogHook>>,
    offset: Option<UtcOffset>,
}

impl LogContextBuilder {
    /// Uses `config` for thresholds, rate limits, timestamps and syslog.
    #[must_use]
    pub fn config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    /// Routes console output to `console`.
    #[must_use]
    pub fn console(mut self, console: impl ConsoleSink + 'static) -> Self {
        self.console = Some(Box::new(console));
        self
    }

    /// Routes system-log output to `system_log`.
    #[must_use]
    pub fn system_log(mut self, system_log: impl SystemLogSink + 'static) -> Self {
        self.system_log = Some(Box::new(system_log));
        self
    }

    /// Installs `hook` as the dispatch override from the start.
    #[must_use]
    pub fn hook(mut self, hook: Arc<dyn LogHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Renders timestamps at `offset` instead of the local offset.
    #[must_use]
    pub fn utc_offset(mut self, offset: UtcOffset) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Builds the context.
    #[must_use]
    pub fn build(self) -> Arc<LogContext> {
        let Self {
            config,
            console,
            system_log,
            hook,
            offset,
        } = self;

        let timestamps =
            offset.map_or_else(TimestampFormatter::new, TimestampFormatter::with_offset);
        timestamps.set_enabled(config.timestamps);

        let hook_slot = OnceLock::new();
        if let Some(hook) = hook {
            let _ = hook_slot.set(hook);
        }

        Arc::new(LogContext {
            policy: LevelPolicy::new(config.level, config.print_level),
            limiter: RateLimiter::new(config.ratelimit.interval_secs, config.ratelimit.burst),
            timestamps,
            hook: hook_slot,
            console: console.unwrap_or_else(|| Box::new(StderrConsole::new())),
            system_log: system_log.unwrap_or_else(|| Box::new(Syslog::new(config.syslog))),
            opened: AtomicBool::new(false),
        })
    }
}

impl fmt::Debug for LogContextBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogContextBuilder")
            .field("config", &self.config)
            .field("custom_console", &self.console.is_some())
            .field("custom_system_log", &self.system_log.is_some())
            .field("hook", &self.hook.is_some())
            .field("offset", &self.offset)
            .finish()
    }
}

#[cfg(test)]
mod tests;
