//! Line reader over an async byte stream.
//!
//! Lines end at `\n`; a `\r` before it is dropped so CRLF input never yields
//! blank lines. Invalid UTF-8 is decoded lossily. Lines longer than
//! [`MAX_LINE_BYTES`] are truncated at a character boundary; the excess is
//! skipped, not split into a new line.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Longest line kept in memory (1 MiB).
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

/// Length of the longest prefix of `bytes` that does not end inside a
/// multi-byte UTF-8 sequence.
fn trim_partial_char(bytes: &[u8]) -> usize {
    let len = bytes.len();
    let lead = bytes
        .iter()
        .rev()
        .take(4)
        .position(|&b| b & 0xC0 != 0x80)
        .map(|back| len - 1 - back);
    let Some(lead) = lead else {
        return len;
    };
    let width = match bytes[lead] {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return len,
    };
    if len - lead < width { lead } else { len }
}

pub struct LineReader<R> {
    reader: R,
    buf: Vec<u8>,
    max_line_bytes: usize,
}

impl<R: AsyncBufRead + Unpin> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_max_line_bytes(reader, MAX_LINE_BYTES)
    }

    pub fn with_max_line_bytes(reader: R, max_line_bytes: usize) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            max_line_bytes,
        }
    }

    /// Read the next line without its terminator.
    ///
    /// Returns `Ok(None)` at end of stream.
    pub async fn next_line(&mut self) -> io::Result<Option<String>> {
        self.buf.clear();
        let mut saw_bytes = false;
        let mut truncated = false;

        loop {
            let available = self.reader.fill_buf().await?;
            if available.is_empty() {
                break;
            }
            saw_bytes = true;

            let newline = available.iter().position(|&b| b == b'\n');
            let (chunk, used) = match newline {
                Some(i) => (&available[..i], i + 1),
                None => (available, available.len()),
            };
            let room = self.max_line_bytes.saturating_sub(self.buf.len());
            if chunk.len() > room {
                truncated = true;
            }
            self.buf.extend_from_slice(&chunk[..chunk.len().min(room)]);
            self.reader.consume(used);

            if newline.is_some() {
                break;
            }
        }

        if !saw_bytes {
            return Ok(None);
        }
        if truncated {
            let keep = trim_partial_char(&self.buf);
            self.buf.truncate(keep);
            tracing::debug!(max = self.max_line_bytes, "Truncated overlong log line");
        }
        if self.buf.last() == Some(&b'\r') {
            self.buf.pop();
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    async fn read_all(input: &[u8]) -> Vec<String> {
        let mut reader = LineReader::new(Cursor::new(input.to_vec()));
        let mut lines = Vec::new();
        while let Some(line) = reader.next_line().await.unwrap() {
            lines.push(line);
        }
        lines
    }

    #[tokio::test]
    async fn test_lf_lines() {
        assert_eq!(read_all(b"a\nb\nc").await, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_trailing_newline_adds_no_line() {
        assert_eq!(read_all(b"a\nb\n").await, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_crlf_normalized() {
        assert_eq!(read_all(b"a\r\nb\r\n\r\nc").await, vec!["a", "b", "", "c"]);
    }

    #[tokio::test]
    async fn test_empty_input() {
        assert!(read_all(b"").await.is_empty());
    }

    #[tokio::test]
    async fn test_blank_lines_preserved() {
        assert_eq!(read_all(b"\n\nx\n").await, vec!["", "", "x"]);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_lossy() {
        let lines = read_all(b"ERROR: caf\xe9\nok").await;
        assert_eq!(lines, vec!["ERROR: caf\u{fffd}", "ok"]);
    }

    #[tokio::test]
    async fn test_overlong_line_truncated() {
        let mut reader =
            LineReader::with_max_line_bytes(Cursor::new(b"abcdefgh\nxy\n".to_vec()), 4);
        assert_eq!(reader.next_line().await.unwrap().as_deref(), Some("abcd"));
        assert_eq!(reader.next_line().await.unwrap().as_deref(), Some("xy"));
        assert_eq!(reader.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_truncation_keeps_whole_characters() {
        // "é" is two bytes; the limit falls between them.
        let mut reader =
            LineReader::with_max_line_bytes(Cursor::new("abcé\nok\n".as_bytes().to_vec()), 4);
        assert_eq!(reader.next_line().await.unwrap().as_deref(), Some("abc"));
        assert_eq!(reader.next_line().await.unwrap().as_deref(), Some("ok"));

        // "€" is three bytes; only two fit.
        let mut reader =
            LineReader::with_max_line_bytes(Cursor::new("ab€x\n".as_bytes().to_vec()), 4);
        assert_eq!(reader.next_line().await.unwrap().as_deref(), Some("ab"));

        // A complete character at the limit is kept.
        let mut reader =
            LineReader::with_max_line_bytes(Cursor::new("abé!\n".as_bytes().to_vec()), 4);
        assert_eq!(reader.next_line().await.unwrap().as_deref(), Some("abé"));
    }

    #[test]
    fn test_trim_partial_char() {
        assert_eq!(trim_partial_char(b""), 0);
        assert_eq!(trim_partial_char(b"abc"), 3);
        assert_eq!(trim_partial_char(&[b'a', 0xF0, 0x9F, 0x98]), 1);
        assert_eq!(trim_partial_char(&[b'a', 0xF0, 0x9F, 0x98, 0x80]), 5);
        // Stray continuation bytes are left for lossy decoding.
        assert_eq!(trim_partial_char(&[0x80, 0x80]), 2);
    }

    #[tokio::test]
    async fn test_small_buffer_chunks() {
        let inner = tokio::io::BufReader::with_capacity(2, Cursor::new(b"hello\r\nworld".to_vec()));
        let mut reader = LineReader::new(inner);
        assert_eq!(reader.next_line().await.unwrap().as_deref(), Some("hello"));
        assert_eq!(reader.next_line().await.unwrap().as_deref(), Some("world"));
        assert_eq!(reader.next_line().await.unwrap(), None);
    }
}
