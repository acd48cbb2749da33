//! crates/logging/src/macros.rs
//! Call-site macros that capture the source location.
//!
//! Each macro takes a context (anything that derefs to
//! [`LogContext`](crate::LogContext)) followed by `format_args!` input, so
//! format strings are checked at compile time.

/// Logs at an explicit level with the caller's location.
///
/// ```
/// use logging::{Level, LogContext, log_at};
/// use logging_sink::{MemoryConsole, MemorySystemLog};
///
/// let console = MemoryConsole::new();
/// let ctx = LogContext::builder()
///     .console(console.clone())
///     .system_log(MemorySystemLog::new())
///     .build();
/// ctx.enable_timestamps(false);
/// log_at!(ctx, Level::Error, "code {}", 7);
/// assert!(console.contents().contains("*ERROR*: code 7"));
/// ```
#[macro_export]
macro_rules! log_at {
    ($ctx:expr, $level:expr, $($arg:tt)+) => {
        $ctx.log(
            $level,
            ::core::option::Option::Some($crate::Location::new(
                ::core::file!(),
                ::core::line!(),
                ::core::module_path!(),
            )),
            ::core::format_args!($($arg)+),
        )
    };
}

/// Logs an error.
#[macro_export]
macro_rules! log_error {
    ($ctx:expr, $($arg:tt)+) => {
        $crate::log_at!($ctx, $crate::Level::Error, $($arg)+)
    };
}

/// Logs a warning.
#[macro_export]
macro_rules! log_warn {
    ($ctx:expr, $($arg:tt)+) => {
        $crate::log_at!($ctx, $crate::Level::Warn, $($arg)+)
    };
}

/// Logs a notice.
#[macro_export]
macro_rules! log_notice {
    ($ctx:expr, $($arg:tt)+) => {
        $crate::log_at!($ctx, $crate::Level::Notice, $($arg)+)
    };
}

/// Logs an informational message.
#[macro_export]
macro_rules! log_info {
    ($ctx:expr, $($arg:tt)+) => {
        $crate::log_at!($ctx, $crate::Level::Info, $($arg)+)
    };
}

/// Logs a debug message.
#[macro_export]
macro_rules! log_debug {
    ($ctx:expr, $($arg:tt)+) => {
        $crate::log_at!($ctx, $crate::Level::Debug, $($arg)+)
    };
}

/// Logs without a location; the line carries only the message.
///
/// ```
/// use logging::{Level, LogContext, log_bare};
/// use logging_sink::{MemoryConsole, MemorySystemLog};
///
/// let console = MemoryConsole::new();
/// let ctx = LogContext::builder()
///     .console(console.clone())
///     .system_log(MemorySystemLog::new())
///     .build();
/// ctx.enable_timestamps(false);
/// log_bare!(ctx, Level::Error, "plain {}", "text");
/// assert_eq!(console.contents(), "plain text\n");
/// ```
#[macro_export]
macro_rules! log_bare {
    ($ctx:expr, $level:expr, $($arg:tt)+) => {
        $ctx.log($level, ::core::option::Option::None, ::core::format_args!($($arg)+))
    };
}
