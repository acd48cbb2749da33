//! crates/logging/src/level.rs
//! Severity levels and their mapping onto syslog priorities.

use std::fmt;
use std::str::FromStr;

use logging_sink::SyslogPriority;

/// Severity of a log event, ordered from least to most verbose.
///
/// `Disabled < Error < Warn < Notice < Info < Debug`. A threshold admits an
/// event when `event <= threshold`, so a threshold of [`Level::Disabled`]
/// admits nothing and [`Level::Debug`] admits everything.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum Level {
    /// Never emitted; as a threshold, disables the sink.
    Disabled = 0,
    /// Error conditions.
    #[default]
    Error = 1,
    /// Warning conditions.
    #[cfg_attr(feature = "serde", serde(alias = "warning"))]
    Warn = 2,
    /// Normal but significant conditions.
    Notice = 3,
    /// Informational messages.
    Info = 4,
    /// Debug-level messages.
    Debug = 5,
}

impl Level {
    /// Every level in ascending verbosity.
    pub const ALL: [Self; 6] = [
        Self::Disabled,
        Self::Error,
        Self::Warn,
        Self::Notice,
        Self::Info,
        Self::Debug,
    ];

    /// Tag printed between asterisks in console and system-log lines.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Disabled => "DISABLED",
            Self::Error => "ERROR",
            Self::Warn => "WARNING",
            Self::Notice => "NOTICE",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }

    /// Maps the level to the syslog priority it is written with.
    ///
    /// Debug shares `LOG_INFO` with Info. [`Level::Disabled`] has no
    /// priority; the dispatch core drops such events.
    pub const fn syslog_priority(self) -> Option<SyslogPriority> {
        match self {
            Self::Debug | Self::Info => Some(SyslogPriority::Info),
            Self::Notice => Some(SyslogPriority::Notice),
            Self::Warn => Some(SyslogPriority::Warning),
            Self::Error => Some(SyslogPriority::Error),
            Self::Disabled => None,
        }
    }

    /// Native numeric value: `Disabled = -1`, `Error = 0` through `Debug = 4`.
    pub const fn raw(self) -> i32 {
        self as i32 - 1
    }

    /// Converts a native numeric value into a level.
    ///
    /// # Panics
    ///
    /// Panics when `raw` lies outside `-1..=4`. Passing such a value is a
    /// caller bug; use [`Level::try_from`] for untrusted input.
    pub fn from_raw(raw: i32) -> Self {
        assert!(
            (-1..=4).contains(&raw),
            "log level {raw} outside DISABLED..=DEBUG"
        );
        Self::ALL[(raw + 1) as usize]
    }

    pub(crate) const fn index(self) -> u8 {
        self as u8
    }

    pub(crate) fn from_index(index: u8) -> Self {
        debug_assert!(usize::from(index) < Self::ALL.len());
        Self::ALL[usize::from(index).min(Self::ALL.len() - 1)]
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a level name or number is not recognised.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ParseLevelError {
    /// The name is not one of the known level names.
    #[error("unknown log level: {0}")]
    UnknownName(String),
    /// The number lies outside `-1..=4`.
    #[error("log level {0} outside DISABLED..=DEBUG")]
    OutOfRange(i32),
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disabled" => Ok(Self::Disabled),
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "notice" => Ok(Self::Notice),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            _ => Err(ParseLevelError::UnknownName(s.to_owned())),
        }
    }
}

impl TryFrom<i32> for Level {
    type Error = ParseLevelError;

    fn try_from(raw: i32) -> Result<Self, ParseLevelError> {
        if (-1..=4).contains(&raw) {
            Ok(Self::from_raw(raw))
        } else {
            Err(ParseLevelError::OutOfRange(raw))
        }
    }
}
