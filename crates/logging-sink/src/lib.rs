#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/logging-sink/src/lib.rs
//!
//! # Overview
//!
//! `logging-sink` provides the two destinations the logging facility writes
//! to: a console stream (standard error by default) and the system log.
//! Both are modelled as traits so the dispatch core in the `logging` crate
//! can be exercised against in-memory captures while production builds write
//! to `stderr` and `syslog(3)`.
//!
//! # Design
//!
//! - [`ConsoleSink`] is an append-only line writer. [`StderrConsole`] writes
//!   each line under the standard-error lock; [`WriterConsole`] wraps any
//!   [`std::io::Write`] implementor behind a mutex.
//! - [`SystemLogSink`] accepts severity-tagged lines and exposes the
//!   process-wide `open`/`close` lifecycle. [`Syslog`] is the `syslog(3)`
//!   backend and opens with the facility and ident from [`SyslogConfig`].
//! - [`MemoryConsole`] and [`MemorySystemLog`] record everything they receive
//!   and are cheap to clone, so a test can keep a handle while the logger owns
//!   another.
//!
//! # Invariants
//!
//! - Sinks take `&self`; every implementation is `Send + Sync` and performs
//!   its own synchronisation, because many threads log through one sink.
//! - Console lines are written with a trailing newline; system-log lines are
//!   passed to `syslog(3)` through a `"%s"` format so `%` in the text is never
//!   interpreted.
//!
//! # Errors
//!
//! Console sink methods return [`std::io::Error`] values from the underlying
//! writer. The dispatch core ignores them; direct users may not. The system
//! log is fire-and-forget, exactly like `syslog(3)`.
//!
//! # Examples
//!
//! ```
//! use logging_sink::{ConsoleSink, MemoryConsole};
//!
//! let console = MemoryConsole::new();
//! console.write_line("ready").unwrap();
//! assert_eq!(console.lines(), vec!["ready".to_string()]);
//! ```

mod capture;
mod console;
#[allow(unsafe_code)]
pub mod syslog;

pub use capture::{MemoryConsole, MemorySystemLog, SystemLogEntry};
pub use console::{ConsoleSink, StderrConsole, WriterConsole};
pub use syslog::{
    DEFAULT_SYSLOG_TAG, Syslog, SyslogConfig, SyslogFacility, SyslogPriority, SystemLogSink,
};
