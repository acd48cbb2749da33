//! crates/logging/src/timestamp.rs
//! Bracketed wall-clock prefix for console lines.

use std::sync::atomic::{AtomicBool, Ordering};

use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

const TIMESTAMP_FORMAT: &[FormatItem<'static>] = format_description!(
    "[year]-[month padding:zero]-[day padding:zero] [hour padding:zero]:[minute padding:zero]:[second padding:zero].[subsecond digits:6]"
);

/// Renders `"[YYYY-MM-DD HH:MM:SS.ssssss] "` prefixes, or nothing when disabled.
///
/// The local UTC offset is resolved once at construction, which must happen
/// before logging threads start: the platform lookup is only sound while the
/// process is single-threaded. If the offset cannot be determined the
/// formatter falls back to UTC.
#[derive(Debug)]
pub struct TimestampFormatter {
    enabled: AtomicBool,
    offset: UtcOffset,
}

impl TimestampFormatter {
    /// Creates an enabled formatter using the local UTC offset.
    #[must_use]
    pub fn new() -> Self {
        Self::with_offset(UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC))
    }

    /// Creates an enabled formatter rendering times at `offset`.
    #[must_use]
    pub const fn with_offset(offset: UtcOffset) -> Self {
        Self {
            enabled: AtomicBool::new(true),
            offset,
        }
    }

    /// Turns timestamp prefixes on or off.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Reports whether prefixes are rendered.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Returns the offset times are rendered at.
    pub const fn offset(&self) -> UtcOffset {
        self.offset
    }

    /// Returns the prefix for the current time, or an empty string when disabled.
    pub fn prefix(&self) -> String {
        if !self.is_enabled() {
            return String::new();
        }
        render(OffsetDateTime::now_utc().to_offset(self.offset))
    }

    /// Returns the prefix for `when`, honouring the enable flag.
    pub fn prefix_at(&self, when: OffsetDateTime) -> String {
        if !self.is_enabled() {
            return String::new();
        }
        render(when)
    }
}

impl Default for TimestampFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn render(when: OffsetDateTime) -> String {
    match when.format(TIMESTAMP_FORMAT) {
        Ok(date) => format!("[{date}] "),
        Err(_) => format!("[unknown date.{:06}] ", when.microsecond()),
    }
}
