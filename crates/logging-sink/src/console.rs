use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};

/// Append-only text destination for console output.
///
/// Implementations must be usable from many threads at once; each call to
/// [`write_line`](Self::write_line) emits one complete line so concurrent
/// writers never interleave within a line.
pub trait ConsoleSink: Send + Sync {
    /// Writes `line` followed by a newline terminator.
    fn write_line(&self, line: &str) -> io::Result<()>;

    /// Writes raw text without appending a newline.
    ///
    /// Used by the hex dump helper, which renders several lines at once.
    fn write_text(&self, text: &str) -> io::Result<()>;

    /// Flushes any buffered output.
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Console sink that writes to the process's standard error stream.
#[derive(Clone, Copy, Debug, Default)]
pub struct StderrConsole;

impl StderrConsole {
    /// Creates a new standard-error console.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ConsoleSink for StderrConsole {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut stderr = io::stderr().lock();
        stderr.write_all(line.as_bytes())?;
        stderr.write_all(b"\n")
    }

    fn write_text(&self, text: &str) -> io::Result<()> {
        io::stderr().lock().write_all(text.as_bytes())
    }

    fn flush(&self) -> io::Result<()> {
        io::stderr().lock().flush()
    }
}

/// Console sink wrapping an arbitrary [`io::Write`] implementor.
///
/// The writer sits behind a mutex so the sink can be shared between threads.
/// A poisoned mutex is recovered rather than propagated; the writer holds no
/// invariants a panicking writer could have broken.
///
/// # Examples
///
/// ```
/// use logging_sink::{ConsoleSink, WriterConsole};
///
/// let console = WriterConsole::new(Vec::new());
/// console.write_line("first").unwrap();
/// console.write_line("second").unwrap();
/// assert_eq!(console.into_inner(), b"first\nsecond\n".to_vec());
/// ```
pub struct WriterConsole<W> {
    writer: Mutex<W>,
}

impl<W> WriterConsole<W> {
    /// Wraps `writer`.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the sink and returns the wrapped writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poison| poison.into_inner())
    }

    fn lock(&self) -> MutexGuard<'_, W> {
        self.writer
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}

impl<W> fmt::Debug for WriterConsole<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterConsole").finish_non_exhaustive()
    }
}

impl<W> ConsoleSink for WriterConsole<W>
where
    W: Write + Send,
{
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut writer = self.lock();
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")
    }

    fn write_text(&self, text: &str) -> io::Result<()> {
        self.lock().write_all(text.as_bytes())
    }

    fn flush(&self) -> io::Result<()> {
        self.lock().flush()
    }
}
