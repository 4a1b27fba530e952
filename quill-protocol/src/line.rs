//! Line assembly for the serial record stream
//!
//! Bytes arrive one at a time from the UART. A line ends at `\n` or `\r`;
//! empty lines are skipped so `\r\n` endings behave like `\n`.

use heapless::{String, Vec};

/// Longest accepted line, excluding the terminator
pub const MAX_LINE_LEN: usize = 63;

/// Errors that can occur while assembling a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded `MAX_LINE_LEN`; the rest of it is discarded
    Overflow,
    /// Line is not valid UTF-8
    InvalidUtf8,
}

/// A complete line without its terminator
pub type Line = String<MAX_LINE_LEN>;

/// Byte-at-a-time line assembler
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    buffer: Vec<u8, MAX_LINE_LEN>,
    /// Set after an overflow until the next terminator
    discarding: bool,
}

impl LineBuffer {
    /// Create an empty line buffer
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            discarding: false,
        }
    }

    /// Drop any partially received line
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(line))` when a terminator completes a non-empty line,
    /// `Ok(None)` when more bytes are needed. An overflow is reported once,
    /// on the byte that overflowed.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Line>, LineError> {
        if byte == b'\n' || byte == b'\r' {
            if self.discarding {
                self.reset();
                return Ok(None);
            }
            if self.buffer.is_empty() {
                return Ok(None);
            }

            let result = core::str::from_utf8(&self.buffer)
                .map_err(|_| LineError::InvalidUtf8)
                .map(|s| {
                    let mut line = Line::new();
                    // Cannot fail: both buffers share MAX_LINE_LEN
                    let _ = line.push_str(s);
                    Some(line)
                });
            self.buffer.clear();
            return result;
        }

        if self.discarding {
            return Ok(None);
        }

        if self.buffer.push(byte).is_err() {
            self.buffer.clear();
            self.discarding = true;
            return Err(LineError::Overflow);
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(buf: &mut LineBuffer, bytes: &[u8]) -> Option<Line> {
        let mut last = None;
        for &b in bytes {
            if let Ok(Some(line)) = buf.feed(b) {
                last = Some(line);
            }
        }
        last
    }

    #[test]
    fn test_line_terminated_by_newline() {
        let mut buf = LineBuffer::new();
        let line = feed_all(&mut buf, b"x:1 y:2 z:0\n").unwrap();
        assert_eq!(line.as_str(), "x:1 y:2 z:0");
    }

    #[test]
    fn test_crlf_yields_single_line() {
        let mut buf = LineBuffer::new();
        let mut lines = 0;
        for &b in b"x:1 y:2 z:0\r\n" {
            if let Ok(Some(_)) = buf.feed(b) {
                lines += 1;
            }
        }
        assert_eq!(lines, 1);
    }

    #[test]
    fn test_empty_lines_skipped() {
        let mut buf = LineBuffer::new();
        assert_eq!(buf.feed(b'\n'), Ok(None));
        assert_eq!(buf.feed(b'\r'), Ok(None));
    }

    #[test]
    fn test_overflow_discards_until_terminator() {
        let mut buf = LineBuffer::new();
        let mut overflowed = 0;
        for _ in 0..(MAX_LINE_LEN + 10) {
            if buf.feed(b'a') == Err(LineError::Overflow) {
                overflowed += 1;
            }
        }
        assert_eq!(overflowed, 1);

        // Terminator ends the discarded line without producing it
        assert_eq!(buf.feed(b'\n'), Ok(None));

        // Next line is received normally
        let line = feed_all(&mut buf, b"x:5 y:5 z:1\n").unwrap();
        assert_eq!(line.as_str(), "x:5 y:5 z:1");
    }

    #[test]
    fn test_exactly_max_len_accepted() {
        let mut buf = LineBuffer::new();
        for _ in 0..MAX_LINE_LEN {
            assert_eq!(buf.feed(b'b'), Ok(None));
        }
        let line = buf.feed(b'\n').unwrap().unwrap();
        assert_eq!(line.len(), MAX_LINE_LEN);
    }

    #[test]
    fn test_invalid_utf8() {
        let mut buf = LineBuffer::new();
        buf.feed(0xFF).unwrap();
        assert_eq!(buf.feed(b'\n'), Err(LineError::InvalidUtf8));
        // Buffer is usable again
        let line = feed_all(&mut buf, b"ok\n").unwrap();
        assert_eq!(line.as_str(), "ok");
    }
}
