#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` is a process-wide logging facility for long-running native
//! services. Every log call is filtered by severity, passed through a shared
//! burst limiter, and then written to a console stream (standard error by
//! default) and to the system log. A custom [`LogHook`] can take over
//! dispatch entirely, and [`format_dump`] renders binary buffers in the usual
//! hex+ASCII layout.
//!
//! # Design
//!
//! - [`LogContext`] owns all state: two [`Level`] thresholds in a
//!   [`LevelPolicy`], a [`RateLimiter`], a [`TimestampFormatter`], an optional
//!   hook, and the sinks from the `logging-sink` crate. Contexts are built
//!   with [`LogContext::builder`] and shared as `Arc<LogContext>`.
//! - The dispatch path runs the hook if one is installed; otherwise it checks
//!   the thresholds, consults the limiter, renders the message once, and
//!   writes it to whichever sinks admit the level.
//! - Call sites use [`log_error!`], [`log_warn!`], [`log_notice!`],
//!   [`log_info!`] and [`log_debug!`], which capture file, line and module.
//! - With the `tracing` feature, [`DispatchLayer`] routes `tracing` events
//!   through the same path.
//!
//! # Invariants
//!
//! - Logging never fails and never blocks on the limiter: a contended limiter
//!   lets the message through uncounted.
//! - At most `burst` messages are counted as printed per window; the rest are
//!   counted as missed and summarised on the console when the window rolls.
//! - A rate-limit interval of zero suppresses every message.
//! - Console lines carry the timestamp prefix; system-log lines never do.
//!
//! # Examples
//!
//! ```
//! use logging::{Level, LogContext, log_error};
//! use logging_sink::{MemoryConsole, MemorySystemLog};
//!
//! let console = MemoryConsole::new();
//! let system_log = MemorySystemLog::new();
//! let ctx = LogContext::builder()
//!     .console(console.clone())
//!     .system_log(system_log.clone())
//!     .build();
//! ctx.initialize();
//! ctx.enable_timestamps(false);
//!
//! log_error!(ctx, "namespace {} offline", 2);
//! assert_eq!(console.lines().len(), 1);
//! assert_eq!(system_log.entries().len(), 1);
//!
//! ctx.shutdown();
//! ```

mod config;
mod dispatch;
mod dump;
mod level;
mod macros;
mod policy;
mod ratelimit;
mod timestamp;

#[cfg(feature = "tracing")]
mod tracing_bridge;

pub use config::{LogConfig, RateLimitConfig};
pub use dispatch::{HookError, Location, LogContext, LogContextBuilder, LogHook, Record};
pub use dump::{dump, format_dump, write_dump};
pub use level::{Level, ParseLevelError};
pub use policy::LevelPolicy;
pub use ratelimit::{
    DEFAULT_BURST, DEFAULT_INTERVAL_SECS, RateDecision, RateLimitStats, RateLimiter, RateVerdict,
    SuppressionReport,
};
pub use timestamp::TimestampFormatter;

#[cfg(feature = "tracing")]
pub use tracing_bridge::{DispatchLayer, init_tracing, init_tracing_with_filter};
