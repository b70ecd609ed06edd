//! Incremental line framing for the inbound byte stream.
//!
//! IRC requires `\r\n` line termination, but real servers sometimes emit
//! bare `\n`. Each framing pass therefore extracts every `\r\n`-terminated
//! line first, then re-scans whatever remains for bare `\n` terminators, so
//! a compliant stream is never mis-split by a spurious `\n` while
//! non-compliant residue is still recovered. Unterminated trailing bytes
//! stay buffered for the next feed.

use bytes::BytesMut;

/// Maximum accepted line length in bytes, delimiter included.
///
/// A buffer growing past this without a delimiter indicates a broken or
/// hostile peer.
pub const MAX_LINE_LEN: usize = 8191;

/// Find the earliest occurrence of `needle` in `haystack`.
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.len() == 1 {
        return haystack.iter().position(|&b| b == needle[0]);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Trim ASCII whitespace from both ends of a byte slice.
fn trim_ascii(mut bytes: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = bytes {
        if first.is_ascii_whitespace() {
            bytes = rest;
        } else {
            break;
        }
    }
    while let [rest @ .., last] = bytes {
        if last.is_ascii_whitespace() {
            bytes = rest;
        } else {
            break;
        }
    }
    bytes
}

/// Extract the next complete line from `buf`, preferring the earliest
/// `\r\n` delimiter and falling back to bare `\n` only when no `\r\n`
/// remains. Empty (all-whitespace) lines are consumed and skipped.
///
/// Draining this repeatedly until `None` is equivalent to the two-pass
/// policy applied to the whole accumulator.
pub(crate) fn take_line(buf: &mut BytesMut) -> Option<Vec<u8>> {
    loop {
        let (at, skip) = match find(buf, b"\r\n") {
            Some(i) => (i, 2),
            None => match find(buf, b"\n") {
                Some(i) => (i, 1),
                None => return None,
            },
        };
        let raw = buf.split_to(at + skip);
        let line = trim_ascii(&raw[..at]);
        if !line.is_empty() {
            return Some(line.to_vec());
        }
    }
}

/// Accumulates raw transport bytes and yields complete protocol lines.
#[derive(Debug, Default)]
pub struct LineFramer {
    buf: BytesMut,
}

impl LineFramer {
    /// Create an empty framer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `bytes` to the accumulator and drain every complete line.
    ///
    /// Returned lines are trimmed of ASCII whitespace and never empty.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Vec<u8>> {
        self.buf.extend_from_slice(bytes);
        let mut lines = Vec::new();
        while let Some(line) = take_line(&mut self.buf) {
            lines.push(line);
        }
        lines
    }

    /// Bytes currently buffered without a terminating delimiter.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_str(framer: &mut LineFramer, s: &str) -> Vec<String> {
        framer
            .feed(s.as_bytes())
            .into_iter()
            .map(|l| String::from_utf8(l).unwrap())
            .collect()
    }

    #[test]
    fn test_crlf_lines() {
        let mut f = LineFramer::new();
        let lines = feed_str(&mut f, "PING :abc\r\nPRIVMSG #a :hi\r\n");
        assert_eq!(lines, vec!["PING :abc", "PRIVMSG #a :hi"]);
        assert_eq!(f.pending(), 0);
    }

    #[test]
    fn test_bare_lf_fallback() {
        let mut f = LineFramer::new();
        let lines = feed_str(&mut f, "PING :abc\nPING :def\n");
        assert_eq!(lines, vec!["PING :abc", "PING :def"]);
    }

    #[test]
    fn test_partial_line_stays_buffered() {
        let mut f = LineFramer::new();
        assert!(feed_str(&mut f, "PRIVMSG #a :par").is_empty());
        assert_eq!(f.pending(), 15);
        let lines = feed_str(&mut f, "tial\r\n");
        assert_eq!(lines, vec!["PRIVMSG #a :partial"]);
        assert_eq!(f.pending(), 0);
    }

    #[test]
    fn test_split_delimiter_across_feeds() {
        let mut f = LineFramer::new();
        assert!(feed_str(&mut f, "PING :abc\r").is_empty());
        let lines = feed_str(&mut f, "\n");
        assert_eq!(lines, vec!["PING :abc"]);
    }

    #[test]
    fn test_empty_lines_skipped() {
        let mut f = LineFramer::new();
        let lines = feed_str(&mut f, "\r\n  \r\nPING :a\r\n\n");
        assert_eq!(lines, vec!["PING :a"]);
    }

    #[test]
    fn test_lines_are_trimmed() {
        let mut f = LineFramer::new();
        let lines = feed_str(&mut f, "  PING :abc  \r\n");
        assert_eq!(lines, vec!["PING :abc"]);
    }

    #[test]
    fn test_chunked_equals_whole() {
        let stream = ":s 001 me :Welcome\r\nPING :x\r\n:n!u@h PRIVMSG #c :hey there\r\n";
        let mut whole = LineFramer::new();
        let expect: Vec<_> = whole.feed(stream.as_bytes());

        for chunk in 1..stream.len() {
            let mut f = LineFramer::new();
            let mut got = Vec::new();
            for part in stream.as_bytes().chunks(chunk) {
                got.extend(f.feed(part));
            }
            assert_eq!(got, expect, "chunk size {}", chunk);
        }
    }
}
