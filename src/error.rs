//! Error types for the session engine.
//!
//! Protocol-level problems (framing, serialization) and session lifecycle
//! problems (configuration, transport) are kept in separate enums so callers
//! can match on the level they care about.

use thiserror::Error;

/// Convenience type alias for Results using [`SessionError`].
pub type Result<T, E = SessionError> = std::result::Result<T, E>;

/// Protocol-level errors: framing and wire serialization.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Inbound data exceeded the line length cap without a delimiter.
    #[error("line too long: {0} bytes")]
    LineTooLong(usize),

    /// The message kind cannot be sent by a client.
    ///
    /// Numeric replies are inbound-only; attempting to serialize one for
    /// the wire is refused rather than silently emitting a bogus line.
    #[error("message kind is not serializable: {0}")]
    NotSerializable(&'static str),
}

/// Session lifecycle errors.
///
/// Configuration errors are reported synchronously by [`open`] before any
/// transport activity takes place.
///
/// [`open`]: crate::session::Session::open
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// `open()` was called without a nick name configured.
    #[error("nick name is empty")]
    MissingNickName,

    /// `open()` was called without a user name configured.
    #[error("user name is empty")]
    MissingUserName,

    /// `open()` was called without a real name configured.
    #[error("real name is empty")]
    MissingRealName,

    /// A send was attempted while no transport is open.
    #[error("not connected")]
    NotConnected,

    /// The server name was not valid for TLS certificate verification.
    #[error("invalid server name: {0}")]
    InvalidServerName(String),

    /// Underlying protocol or I/O failure.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        Self::Protocol(ProtocolError::Io(err))
    }
}
