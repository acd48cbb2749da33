use std::fmt;

use crate::level::Level;

/// Source location of a log call site.
///
/// The call-site macros fill `func` with `module_path!()`, the closest Rust
/// equivalent of an enclosing-function name.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Location {
    /// Source file.
    pub file: &'static str,
    /// Line within `file`.
    pub line: u32,
    /// Enclosing function or module.
    pub func: &'static str,
}

impl Location {
    /// Creates a location.
    #[must_use]
    pub const fn new(file: &'static str, line: u32, func: &'static str) -> Self {
        Self { file, line, func }
    }
}

impl fmt::Display for Location {
    /// Renders `file:line:func` with the line right-aligned to four columns.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:4}:{}", self.file, self.line, self.func)
    }
}

/// A log call as seen by a [`LogHook`]: unfiltered and unformatted.
#[derive(Clone, Copy, Debug)]
pub struct Record<'a> {
    level: Level,
    location: Option<Location>,
    args: fmt::Arguments<'a>,
}

impl<'a> Record<'a> {
    /// Bundles the parts of a log call.
    #[must_use]
    pub const fn new(level: Level, location: Option<Location>, args: fmt::Arguments<'a>) -> Self {
        Self {
            level,
            location,
            args,
        }
    }

    /// Severity of the call.
    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Call-site location, if the caller supplied one.
    #[must_use]
    pub const fn location(&self) -> Option<Location> {
        self.location
    }

    /// The unrendered message.
    #[must_use]
    pub const fn args(&self) -> fmt::Arguments<'a> {
        self.args
    }
}

/// Replacement for the default dispatch.
///
/// Once installed on a [`LogContext`](crate::LogContext), every log call is
/// handed to the hook verbatim: no level filtering, rate limiting or
/// timestamping is applied, and neither default sink is written.
pub trait LogHook: Send + Sync {
    /// Handles one log call.
    fn log(&self, record: &Record<'_>);
}

impl<F> LogHook for F
where
    F: Fn(&Record<'_>) + Send + Sync,
{
    fn log(&self, record: &Record<'_>) {
        self(record);
    }
}

/// Error returned by [`LogContext::install_hook`](crate::LogContext::install_hook).
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum HookError {
    /// A hook is already installed; hooks cannot be replaced.
    #[error("a log hook is already installed")]
    AlreadyInstalled,
}
