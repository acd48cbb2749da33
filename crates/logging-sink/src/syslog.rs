//! Syslog backend for the system-log sink.
//!
//! Uses libc `openlog`/`syslog`/`closelog` directly rather than pulling in a
//! dedicated syslog crate. The connection is opened once at process start with
//! `LOG_PID`, the configured facility and ident, and closed at shutdown.
//!
//! The facility and priority enums carry the POSIX numeric values so they are
//! usable on every platform; only the libc calls are restricted to unix.
//!
//! ```no_run
//! use logging_sink::syslog::{SyslogConfig, SyslogGuard, SyslogPriority, syslog_message};
//!
//! let guard: SyslogGuard = SyslogConfig::default().open();
//! syslog_message(SyslogPriority::Notice, "started");
//! assert_eq!(guard.ident(), "spdk");
//! drop(guard);
//! ```

use std::ffi::CString;
use std::fmt;
use std::sync::{Mutex, MutexGuard};

/// Syslog facility codes matching the POSIX syslog(3) constants.
///
/// Each variant corresponds to a `LOG_*` facility from `<syslog.h>`.
/// Configuration maps string names (e.g., `"daemon"`, `"local7"`) to these
/// constants via [`SyslogFacility::from_name`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(i32)]
pub enum SyslogFacility {
    /// Kernel messages (LOG_KERN).
    Kern = 0,
    /// User-level messages (LOG_USER).
    User = 1 << 3,
    /// Mail system (LOG_MAIL).
    Mail = 2 << 3,
    /// System daemons (LOG_DAEMON).
    Daemon = 3 << 3,
    /// Security/authorization messages (LOG_AUTH).
    Auth = 4 << 3,
    /// Messages generated internally by syslogd (LOG_SYSLOG).
    Syslog = 5 << 3,
    /// Line printer subsystem (LOG_LPR).
    Lpr = 6 << 3,
    /// Network news subsystem (LOG_NEWS).
    News = 7 << 3,
    /// UUCP subsystem (LOG_UUCP).
    Uucp = 8 << 3,
    /// Clock daemon (LOG_CRON).
    Cron = 9 << 3,
    /// Reserved for local use (LOG_LOCAL0).
    Local0 = 16 << 3,
    /// Reserved for local use (LOG_LOCAL1).
    Local1 = 17 << 3,
    /// Reserved for local use (LOG_LOCAL2).
    Local2 = 18 << 3,
    /// Reserved for local use (LOG_LOCAL3).
    Local3 = 19 << 3,
    /// Reserved for local use (LOG_LOCAL4).
    Local4 = 20 << 3,
    /// Reserved for local use (LOG_LOCAL5).
    Local5 = 21 << 3,
    /// Reserved for local use (LOG_LOCAL6).
    Local6 = 22 << 3,
    /// Reserved for local use (LOG_LOCAL7), the default for the logger.
    Local7 = 23 << 3,
}

impl SyslogFacility {
    /// Returns the facility the logger opens syslog with when none is configured.
    pub const fn default_logger() -> Self {
        Self::Local7
    }

    /// Parses a facility name string into the corresponding constant.
    ///
    /// Recognised names are case-insensitive. Returns `None` for unrecognised
    /// names.
    ///
    /// # Examples
    ///
    /// ```
    /// use logging_sink::SyslogFacility;
    ///
    /// assert_eq!(
    ///     SyslogFacility::from_name("daemon"),
    ///     Some(SyslogFacility::Daemon)
    /// );
    /// assert_eq!(
    ///     SyslogFacility::from_name("LOCAL7"),
    ///     Some(SyslogFacility::Local7)
    /// );
    /// assert_eq!(SyslogFacility::from_name("unknown"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "kern" => Some(Self::Kern),
            "user" => Some(Self::User),
            "mail" => Some(Self::Mail),
            "daemon" => Some(Self::Daemon),
            "auth" => Some(Self::Auth),
            "syslog" => Some(Self::Syslog),
            "lpr" => Some(Self::Lpr),
            "news" => Some(Self::News),
            "uucp" => Some(Self::Uucp),
            "cron" => Some(Self::Cron),
            "local0" => Some(Self::Local0),
            "local1" => Some(Self::Local1),
            "local2" => Some(Self::Local2),
            "local3" => Some(Self::Local3),
            "local4" => Some(Self::Local4),
            "local5" => Some(Self::Local5),
            "local6" => Some(Self::Local6),
            "local7" => Some(Self::Local7),
            _ => None,
        }
    }

    /// Returns the lowercase facility name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kern => "kern",
            Self::User => "user",
            Self::Mail => "mail",
            Self::Daemon => "daemon",
            Self::Auth => "auth",
            Self::Syslog => "syslog",
            Self::Lpr => "lpr",
            Self::News => "news",
            Self::Uucp => "uucp",
            Self::Cron => "cron",
            Self::Local0 => "local0",
            Self::Local1 => "local1",
            Self::Local2 => "local2",
            Self::Local3 => "local3",
            Self::Local4 => "local4",
            Self::Local5 => "local5",
            Self::Local6 => "local6",
            Self::Local7 => "local7",
        }
    }
}

impl Default for SyslogFacility {
    fn default() -> Self {
        Self::default_logger()
    }
}

impl fmt::Display for SyslogFacility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default syslog ident for the logging facility.
pub const DEFAULT_SYSLOG_TAG: &str = "spdk";

/// Facility and ident used when opening the system log.
///
/// Constructing a [`SyslogConfig`] does not open the connection; call
/// [`open`](SyslogConfig::open) (or [`SystemLogSink::open`] on a [`Syslog`])
/// to begin routing messages.
///
/// # Examples
///
/// ```
/// use logging_sink::{SyslogConfig, SyslogFacility};
///
/// let config = SyslogConfig::new(SyslogFacility::Local5, "storage-node");
/// assert_eq!(config.facility(), SyslogFacility::Local5);
/// assert_eq!(config.tag(), "storage-node");
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SyslogConfig {
    facility: SyslogFacility,
    tag: String,
}

impl SyslogConfig {
    /// Creates a new syslog configuration with the given facility and tag.
    pub fn new(facility: SyslogFacility, tag: impl Into<String>) -> Self {
        Self {
            facility,
            tag: tag.into(),
        }
    }

    /// Returns the configured syslog facility.
    pub const fn facility(&self) -> SyslogFacility {
        self.facility
    }

    /// Returns the configured syslog tag (ident string).
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Opens the syslog connection with the configured facility and tag.
    ///
    /// Returns a [`SyslogGuard`] that closes the connection when dropped.
    /// Only one syslog connection is active per process; the caller opens it
    /// once at startup before logging threads are spawned.
    pub fn open(&self) -> SyslogGuard {
        // syslog(3) keeps the ident pointer until closelog(), so the guard
        // owns the string and releases it only after closing.
        let ident = CString::new(self.tag.as_str()).unwrap_or_else(|_| default_ident());

        #[cfg(unix)]
        // SAFETY: the ident pointer stays valid until the guard's Drop has
        // called closelog(); the guard owns the CString.
        unsafe {
            libc::openlog(ident.as_ptr(), libc::LOG_PID, self.facility as libc::c_int);
        }

        SyslogGuard { ident }
    }
}

impl Default for SyslogConfig {
    fn default() -> Self {
        Self::new(SyslogFacility::default_logger(), DEFAULT_SYSLOG_TAG)
    }
}

fn default_ident() -> CString {
    CString::new(DEFAULT_SYSLOG_TAG).unwrap_or_default()
}

/// Syslog priority levels matching POSIX syslog(3) severity constants.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(i32)]
pub enum SyslogPriority {
    /// System is unusable (LOG_EMERG).
    Emergency = 0,
    /// Action must be taken immediately (LOG_ALERT).
    Alert = 1,
    /// Critical conditions (LOG_CRIT).
    Critical = 2,
    /// Error conditions (LOG_ERR).
    Error = 3,
    /// Warning conditions (LOG_WARNING).
    Warning = 4,
    /// Normal but significant condition (LOG_NOTICE).
    Notice = 5,
    /// Informational messages (LOG_INFO).
    Info = 6,
    /// Debug-level messages (LOG_DEBUG).
    Debug = 7,
}

/// Sends a message to syslog(3) with the given priority.
///
/// The message goes to the facility configured by the most recent
/// [`SyslogConfig::open`] call. Messages containing an interior NUL byte are
/// dropped.
pub fn syslog_message(priority: SyslogPriority, message: &str) {
    let Ok(c_message) = CString::new(message) else {
        return;
    };

    #[cfg(unix)]
    // SAFETY: syslog is thread-safe; the format string is a static C literal
    // and `%s` keeps `%` in the message from being interpreted.
    unsafe {
        libc::syslog(priority as libc::c_int, c"%s".as_ptr(), c_message.as_ptr());
    }

    #[cfg(not(unix))]
    let _ = (priority, c_message);
}

/// RAII guard that closes the syslog connection when dropped.
///
/// Created by [`SyslogConfig::open`].
#[derive(Debug)]
pub struct SyslogGuard {
    ident: CString,
}

impl SyslogGuard {
    /// Returns the ident the connection was opened with.
    pub fn ident(&self) -> &str {
        self.ident.to_str().unwrap_or(DEFAULT_SYSLOG_TAG)
    }
}

impl Drop for SyslogGuard {
    fn drop(&mut self) {
        #[cfg(unix)]
        // SAFETY: closelog has no preconditions; openlog was called when the
        // guard was created.
        unsafe {
            libc::closelog();
        }
    }
}

/// Severity-tagged line destination with a process-wide lifecycle.
///
/// The logger calls [`open`](Self::open) once from its `initialize` step and
/// [`close`](Self::close) from `shutdown`. Writes between the two are routed
/// to the opened destination; implementations decide what writes outside that
/// window do.
pub trait SystemLogSink: Send + Sync {
    /// Opens the destination. Repeated calls are no-ops.
    fn open(&self);

    /// Closes the destination. Calling it when closed is a no-op.
    fn close(&self);

    /// Writes one line at the given priority.
    fn write(&self, priority: SyslogPriority, text: &str);
}

/// [`SystemLogSink`] backed by syslog(3).
///
/// # Examples
///
/// ```no_run
/// use logging_sink::{Syslog, SyslogConfig, SyslogPriority, SystemLogSink};
///
/// let syslog = Syslog::new(SyslogConfig::default());
/// syslog.open();
/// syslog.write(SyslogPriority::Info, "started");
/// syslog.close();
/// ```
#[derive(Debug, Default)]
pub struct Syslog {
    config: SyslogConfig,
    guard: Mutex<Option<SyslogGuard>>,
}

impl Syslog {
    /// Creates a closed syslog sink for `config`.
    pub const fn new(config: SyslogConfig) -> Self {
        Self {
            config,
            guard: Mutex::new(None),
        }
    }

    /// Returns the configuration the sink opens with.
    pub const fn config(&self) -> &SyslogConfig {
        &self.config
    }

    /// Reports whether the connection is currently open.
    pub fn is_open(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<SyslogGuard>> {
        self.guard
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}

impl SystemLogSink for Syslog {
    fn open(&self) {
        let mut guard = self.lock();
        if guard.is_none() {
            *guard = Some(self.config.open());
        }
    }

    fn close(&self) {
        drop(self.lock().take());
    }

    fn write(&self, priority: SyslogPriority, text: &str) {
        syslog_message(priority, text);
    }
}
