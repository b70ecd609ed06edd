//! Tokio codec wrapping the line framer and the configured text encoding.
//!
//! Inbound bytes are framed by the [`framer`] extraction rules and decoded
//! through an [`encoding_rs`] encoding; decoding is lossy, so malformed
//! byte sequences degrade to replacement characters instead of aborting
//! the stream. Outbound lines are encoded the same way and terminated with
//! `\r\n`.
//!
//! [`framer`]: crate::framer

use bytes::{BufMut, BytesMut};
use encoding_rs::{Encoding, UTF_8};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::ProtocolError;
use crate::framer::{take_line, MAX_LINE_LEN};

/// Line-oriented codec with a configurable text encoding.
#[derive(Clone, Debug)]
pub struct LineCodec {
    encoding: &'static Encoding,
}

impl LineCodec {
    /// Create a codec using the given encoding.
    pub fn new(encoding: &'static Encoding) -> Self {
        Self { encoding }
    }

    /// Look up an encoding by WHATWG label (e.g. `"utf-8"`, `"latin1"`).
    pub fn for_label(label: &str) -> Option<Self> {
        Encoding::for_label(label.as_bytes()).map(Self::new)
    }

    /// The configured encoding.
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new(UTF_8)
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>, ProtocolError> {
        match take_line(src) {
            Some(line) => {
                let (text, _, _) = self.encoding.decode(&line);
                Ok(Some(text.into_owned()))
            }
            None => {
                if src.len() > MAX_LINE_LEN {
                    return Err(ProtocolError::LineTooLong(src.len()));
                }
                Ok(None)
            }
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> Result<(), ProtocolError> {
        let (bytes, _, _) = self.encoding.encode(&line);
        dst.reserve(bytes.len() + 2);
        dst.put_slice(&bytes);
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_lines() {
        let mut codec = LineCodec::default();
        let mut buf = BytesMut::from(&b"PING :abc\r\nPRIVMSG #a :hi\r\npart"[..]);

        assert_eq!(codec.decode(&mut buf).unwrap(), Some("PING :abc".into()));
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some("PRIVMSG #a :hi".into())
        );
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        assert_eq!(&buf[..], b"part");
    }

    #[test]
    fn test_decode_lossy() {
        let mut codec = LineCodec::default();
        let mut buf = BytesMut::from(&b"PING :a\xffb\r\n"[..]);
        let line = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(line, "PING :a\u{fffd}b");
    }

    #[test]
    fn test_decode_latin1() {
        let mut codec = LineCodec::for_label("latin1").unwrap();
        let mut buf = BytesMut::from(&b"PRIVMSG #a :caf\xe9\r\n"[..]);
        let line = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(line, "PRIVMSG #a :café");
    }

    #[test]
    fn test_encode_appends_crlf() {
        let mut codec = LineCodec::default();
        let mut buf = BytesMut::new();
        codec.encode("NICK alice".to_owned(), &mut buf).unwrap();
        assert_eq!(&buf[..], b"NICK alice\r\n");
    }

    #[test]
    fn test_oversized_buffer_rejected() {
        let mut codec = LineCodec::default();
        let mut buf = BytesMut::new();
        buf.extend_from_slice(&vec![b'a'; MAX_LINE_LEN + 1]);
        assert!(matches!(
            codec.decode(&mut buf),
            Err(ProtocolError::LineTooLong(_))
        ));
    }

    #[test]
    fn test_unknown_label() {
        assert!(LineCodec::for_label("no-such-encoding").is_none());
    }
}
