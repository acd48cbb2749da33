use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::console::ConsoleSink;
use crate::syslog::{SyslogPriority, SystemLogSink};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poison| poison.into_inner())
}

/// Console sink that records every line in memory.
///
/// Clones share the same buffer, so a caller can hand one clone to the
/// logger and inspect the output through another.
#[derive(Clone, Debug, Default)]
pub struct MemoryConsole {
    buffer: Arc<Mutex<String>>,
}

impl MemoryConsole {
    /// Creates an empty capture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns everything written so far.
    #[must_use]
    pub fn contents(&self) -> String {
        lock(&self.buffer).clone()
    }

    /// Returns the captured output split into lines, without terminators.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        lock(&self.buffer).lines().map(str::to_owned).collect()
    }

    /// Clears the capture and returns what it held.
    pub fn take(&self) -> String {
        std::mem::take(&mut *lock(&self.buffer))
    }

    /// Reports whether nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.buffer).is_empty()
    }
}

impl ConsoleSink for MemoryConsole {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut buffer = lock(&self.buffer);
        buffer.push_str(line);
        buffer.push('\n');
        Ok(())
    }

    fn write_text(&self, text: &str) -> io::Result<()> {
        lock(&self.buffer).push_str(text);
        Ok(())
    }
}

/// One line recorded by [`MemorySystemLog`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SystemLogEntry {
    /// Priority the line was written with.
    pub priority: SyslogPriority,
    /// Line text.
    pub text: String,
}

#[derive(Debug, Default)]
struct SystemLogState {
    open: bool,
    opens: usize,
    closes: usize,
    entries: Vec<SystemLogEntry>,
}

/// System-log sink that records entries and lifecycle calls in memory.
///
/// Entries are recorded whether or not the sink is open, mirroring
/// syslog(3), which opens lazily on first write.
#[derive(Clone, Debug, Default)]
pub struct MemorySystemLog {
    state: Arc<Mutex<SystemLogState>>,
}

impl MemorySystemLog {
    /// Creates an empty, closed capture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded entries.
    #[must_use]
    pub fn entries(&self) -> Vec<SystemLogEntry> {
        lock(&self.state).entries.clone()
    }

    /// Returns only the recorded texts.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        lock(&self.state)
            .entries
            .iter()
            .map(|entry| entry.text.clone())
            .collect()
    }

    /// Reports whether the sink is currently open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        lock(&self.state).open
    }

    /// Number of times the sink transitioned from closed to open.
    #[must_use]
    pub fn open_count(&self) -> usize {
        lock(&self.state).opens
    }

    /// Number of times the sink transitioned from open to closed.
    #[must_use]
    pub fn close_count(&self) -> usize {
        lock(&self.state).closes
    }
}

impl SystemLogSink for MemorySystemLog {
    fn open(&self) {
        let mut state = lock(&self.state);
        if !state.open {
            state.open = true;
            state.opens += 1;
        }
    }

    fn close(&self) {
        let mut state = lock(&self.state);
        if state.open {
            state.open = false;
            state.closes += 1;
        }
    }

    fn write(&self, priority: SyslogPriority, text: &str) {
        lock(&self.state).entries.push(SystemLogEntry {
            priority,
            text: text.to_owned(),
        });
    }
}
