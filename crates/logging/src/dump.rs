//! crates/logging/src/dump.rs
//! Canonical hex+ASCII dump of binary buffers.
//!
//! ```text
//! label
//! 00000000  30 31 32 33 34 35 36 37  38 39 61 62 63 64 65 66  0123456789abcdef
//! 00000010  67                                                g
//! ```
//!
//! The layout is byte-stable: no locale lookups, printable means `0x20..=0x7e`.

use std::fmt::{self, Write as _};
use std::io::{self, Write};

const ROW_BYTES: usize = 16;
const HALF_ROW: usize = ROW_BYTES / 2;

/// Width of one rendered row, excluding the newline.
const ROW_WIDTH: usize = 9 + 2 + ROW_BYTES * 3 + 1 + ROW_BYTES;

/// Writes `label` and the dump of `bytes` to `writer`, then flushes it.
///
/// # Errors
///
/// Returns the first error reported by `writer`.
pub fn write_dump<W: Write + ?Sized>(
    writer: &mut W,
    label: &str,
    bytes: &[u8],
) -> io::Result<()> {
    writeln!(writer, "{label}")?;
    let mut row = String::with_capacity(ROW_WIDTH);
    for (index, chunk) in bytes.chunks(ROW_BYTES).enumerate() {
        row.clear();
        let _ = render_row(&mut row, index * ROW_BYTES, chunk);
        writer.write_all(row.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Like [`write_dump`] but ignores write errors.
pub fn dump<W: Write + ?Sized>(writer: &mut W, label: &str, bytes: &[u8]) {
    let _ = write_dump(writer, label, bytes);
}

/// Renders the dump into a string, newline-terminated lines included.
#[must_use]
pub fn format_dump(label: &str, bytes: &[u8]) -> String {
    let rows = bytes.len().div_ceil(ROW_BYTES);
    let mut out = String::with_capacity(label.len() + 1 + rows * (ROW_WIDTH + 1));
    out.push_str(label);
    out.push('\n');
    for (index, chunk) in bytes.chunks(ROW_BYTES).enumerate() {
        let _ = render_row(&mut out, index * ROW_BYTES, chunk);
        out.push('\n');
    }
    out
}

fn render_row(out: &mut String, offset: usize, chunk: &[u8]) -> fmt::Result {
    write!(out, "{offset:08x} ")?;
    for column in 0..ROW_BYTES {
        if column % HALF_ROW == 0 {
            out.push(' ');
        }
        match chunk.get(column) {
            Some(byte) => write!(out, "{byte:02x} ")?,
            None => out.push_str("   "),
        }
    }
    out.push(' ');
    out.extend(chunk.iter().map(|&byte| printable(byte)));
    Ok(())
}

const fn printable(byte: u8) -> char {
    if matches!(byte, 0x20..=0x7e) {
        byte as char
    } else {
        '.'
    }
}
