//! crates/logging/src/policy.rs
//! Console and system-log severity thresholds.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::level::Level;

/// The two independently configurable severity thresholds.
///
/// The print threshold gates the console sink and the log threshold gates the
/// system-log sink. Both are read on every log call without locking; a
/// concurrent update may be observed one call late, which is acceptable.
#[derive(Debug)]
pub struct LevelPolicy {
    log: AtomicU8,
    print: AtomicU8,
}

impl LevelPolicy {
    /// Creates a policy with explicit thresholds.
    #[must_use]
    pub const fn new(log: Level, print: Level) -> Self {
        Self {
            log: AtomicU8::new(log.index()),
            print: AtomicU8::new(print.index()),
        }
    }

    /// Sets the system-log threshold.
    pub fn set_level(&self, level: Level) {
        self.log.store(level.index(), Ordering::Relaxed);
    }

    /// Returns the system-log threshold.
    pub fn level(&self) -> Level {
        Level::from_index(self.log.load(Ordering::Relaxed))
    }

    /// Sets the console threshold.
    pub fn set_print_level(&self, level: Level) {
        self.print.store(level.index(), Ordering::Relaxed);
    }

    /// Returns the console threshold.
    pub fn print_level(&self) -> Level {
        Level::from_index(self.print.load(Ordering::Relaxed))
    }

    /// Reports whether `level` reaches the console sink.
    pub fn prints(&self, level: Level) -> bool {
        level <= self.print_level()
    }

    /// Reports whether `level` reaches the system-log sink.
    pub fn logs(&self, level: Level) -> bool {
        level <= self.level()
    }

    /// Reports whether `level` reaches at least one sink.
    pub fn admits(&self, level: Level) -> bool {
        self.prints(level) || self.logs(level)
    }
}

impl Default for LevelPolicy {
    fn default() -> Self {
        Self::new(Level::default(), Level::default())
    }
}
