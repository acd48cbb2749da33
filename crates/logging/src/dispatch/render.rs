use std::fmt::{self, Write as _};

use super::record::Location;
use crate::level::Level;

/// Size of the message buffer, including the slot the native layout reserves
/// for its terminator; rendered text is capped one byte short of this.
pub(crate) const MESSAGE_BUFFER_LEN: usize = 1024;

/// `fmt::Write` target that keeps at most `limit` bytes.
///
/// Once a piece has been cut, every later piece is dropped so the result is
/// always a prefix of the full message.
struct BoundedBuffer {
    text: String,
    limit: usize,
    truncated: bool,
}

impl BoundedBuffer {
    fn new(limit: usize) -> Self {
        Self {
            text: String::new(),
            limit,
            truncated: false,
        }
    }
}

impl fmt::Write for BoundedBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.truncated {
            return Ok(());
        }
        let remaining = self.limit - self.text.len();
        if s.len() <= remaining {
            self.text.push_str(s);
        } else {
            let mut end = remaining;
            while !s.is_char_boundary(end) {
                end -= 1;
            }
            self.text.push_str(&s[..end]);
            self.truncated = true;
        }
        Ok(())
    }
}

/// Renders `args` into at most `MESSAGE_BUFFER_LEN - 1` bytes.
///
/// Truncation happens on a character boundary. Formatting errors raised by
/// argument `Display` impls are absorbed; whatever was rendered before the
/// error is kept. One trailing newline is dropped because sinks terminate
/// lines themselves.
pub(crate) fn render_message(args: fmt::Arguments<'_>) -> String {
    let mut buffer = BoundedBuffer::new(MESSAGE_BUFFER_LEN - 1);
    match args.as_str() {
        Some(text) => {
            let _ = buffer.write_str(text);
        }
        None => {
            let _ = buffer.write_fmt(args);
        }
    }

    let mut text = buffer.text;
    if text.ends_with('\n') {
        text.pop();
    }
    text
}

/// Formats the sink-independent part of a line.
///
/// `<file>:<line>:<func>: *<LEVEL>*: <message>` with a location, the bare
/// message without one.
pub(crate) fn format_body(level: Level, location: Option<&Location>, message: &str) -> String {
    match location {
        Some(location) => format!("{location}: *{}*: {message}", level.name()),
        None => message.to_owned(),
    }
}
