use super::{DEFAULT_BURST, DEFAULT_INTERVAL_SECS};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard, TryLockError};
use std::time::{Duration, Instant};

/// Outcome of a single rate-limit check.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RateDecision {
    /// The window still had budget; the message counts as printed.
    Allowed,
    /// The message is dropped. Counted as missed unless limiting is switched
    /// off by a zero interval.
    Denied,
    /// Another thread held the limiter state. The message is printed without
    /// being counted: contention means that thread is already emitting.
    LockBusy,
}

impl RateDecision {
    /// Reports whether the message may be printed.
    #[must_use]
    pub const fn permits(self) -> bool {
        matches!(self, Self::Allowed | Self::LockBusy)
    }
}

/// Counters of a window that rolled over with suppressed messages.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SuppressionReport {
    /// Messages dropped during the closed window.
    pub missed: u32,
    /// Messages printed during the closed window.
    pub printed: u32,
}

impl fmt::Display for SuppressionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} log messages suppressed, {} printed",
            self.missed, self.printed
        )
    }
}

/// Full result of [`RateLimiter::check`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RateVerdict {
    /// Whether the message may be printed.
    pub decision: RateDecision,
    /// Present when this check closed a window in which messages were missed.
    /// The caller emits it before the gated message.
    pub report: Option<SuppressionReport>,
}

impl RateVerdict {
    const fn bare(decision: RateDecision) -> Self {
        Self {
            decision,
            report: None,
        }
    }
}

/// Snapshot of the current window's counters.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RateLimitStats {
    /// Messages printed in the current window.
    pub printed: u32,
    /// Messages dropped in the current window.
    pub missed: u32,
}

#[derive(Debug, Default)]
struct WindowState {
    printed: u32,
    missed: u32,
    window_start: Option<Instant>,
}

/// Fixed-window burst limiter.
///
/// At most `burst` messages pass per `interval` seconds; the rest are counted
/// as missed and summarised once the window rolls over. The window state sits
/// behind a mutex that log calls only ever *try* to take, so the limiter never
/// blocks a logging thread.
///
/// `interval` and `burst` are atomics: they are read without the lock and
/// written under it, so a reconfiguration never lands in the middle of a
/// window evaluation.
#[derive(Debug)]
pub struct RateLimiter {
    interval: AtomicU32,
    burst: AtomicU32,
    state: Mutex<WindowState>,
}

impl RateLimiter {
    /// Creates a limiter with the given window length and burst size.
    #[must_use]
    pub const fn new(interval_secs: u32, burst: u32) -> Self {
        Self {
            interval: AtomicU32::new(interval_secs),
            burst: AtomicU32::new(burst),
            state: Mutex::new(WindowState {
                printed: 0,
                missed: 0,
                window_start: None,
            }),
        }
    }

    /// Returns the window length in seconds. Zero suppresses every message.
    pub fn interval(&self) -> u32 {
        self.interval.load(Ordering::Relaxed)
    }

    /// Sets the window length in seconds.
    pub fn set_interval(&self, interval_secs: u32) {
        let _state = self.lock();
        self.interval.store(interval_secs, Ordering::Relaxed);
    }

    /// Returns the number of messages allowed per window.
    pub fn burst(&self) -> u32 {
        self.burst.load(Ordering::Relaxed)
    }

    /// Sets the number of messages allowed per window.
    pub fn set_burst(&self, burst: u32) {
        let _state = self.lock();
        self.burst.store(burst, Ordering::Relaxed);
    }

    /// Returns the current window's counters.
    ///
    /// Unlike [`check`](Self::check) this waits for the lock.
    pub fn stats(&self) -> RateLimitStats {
        let state = self.lock();
        RateLimitStats {
            printed: state.printed,
            missed: state.missed,
        }
    }

    /// Decides whether a message may be printed now.
    pub fn check(&self) -> RateVerdict {
        self.check_at(Instant::now())
    }

    /// Decides whether a message may be printed at `now`.
    ///
    /// A zero interval denies without touching the counters. When the state
    /// is locked by another thread the call returns [`RateDecision::LockBusy`]
    /// immediately.
    pub fn check_at(&self, now: Instant) -> RateVerdict {
        if self.interval() == 0 {
            return RateVerdict::bare(RateDecision::Denied);
        }

        let mut state = match self.state.try_lock() {
            Ok(state) => state,
            Err(TryLockError::Poisoned(poison)) => poison.into_inner(),
            Err(TryLockError::WouldBlock) => return RateVerdict::bare(RateDecision::LockBusy),
        };

        let interval = Duration::from_secs(u64::from(self.interval()));
        let window_start = *state.window_start.get_or_insert(now);

        let mut report = None;
        if now.saturating_duration_since(window_start) > interval {
            if state.missed > 0 {
                report = Some(SuppressionReport {
                    missed: state.missed,
                    printed: state.printed,
                });
                state.missed = 0;
            }
            state.window_start = Some(now);
            state.printed = 0;
        }

        let burst = self.burst();
        let decision = if burst > 0 && state.printed < burst {
            state.printed += 1;
            RateDecision::Allowed
        } else {
            state.missed = state.missed.saturating_add(1);
            RateDecision::Denied
        };

        RateVerdict { decision, report }
    }

    fn lock(&self) -> MutexGuard<'_, WindowState> {
        self.state
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }

    #[cfg(test)]
    pub(crate) fn hold_state_for_testing(&self) -> MutexGuard<'_, impl fmt::Debug> {
        self.lock()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL_SECS, DEFAULT_BURST)
    }
}
