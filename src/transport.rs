//! Socket transport: framed TCP with optional TLS.
//!
//! The session owns exactly one transport per connection attempt. TLS is an
//! optional capability selected at connect time; when chosen, the rustls
//! handshake is initiated as part of establishing the transport, before the
//! registration handshake runs on top of it.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;
use tokio_util::codec::Framed;
use tracing::warn;

use crate::codec::LineCodec;
use crate::error::{ProtocolError, SessionError};

/// Transport security selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Plain TCP.
    #[default]
    None,
    /// TLS with certificate verification against the webpki root store.
    Tls,
}

/// A connected, line-framed socket.
pub enum Transport {
    /// Plain TCP transport.
    Tcp {
        framed: Framed<TcpStream, LineCodec>,
    },
    /// TLS transport.
    Tls {
        framed: Framed<TlsStream<TcpStream>, LineCodec>,
    },
}

impl Transport {
    /// Establish a transport to `host:port`, completing the TLS handshake
    /// when [`TlsMode::Tls`] is selected.
    pub async fn connect(
        host: &str,
        port: u16,
        tls: TlsMode,
        codec: LineCodec,
    ) -> Result<Self, SessionError> {
        let stream = TcpStream::connect((host, port)).await?;
        if let Err(e) = enable_keepalive(&stream) {
            warn!("failed to enable TCP keepalive: {}", e);
        }

        match tls {
            TlsMode::None => Ok(Self::Tcp {
                framed: Framed::new(stream, codec),
            }),
            TlsMode::Tls => {
                let mut roots = RootCertStore::empty();
                roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
                let config = ClientConfig::builder()
                    .with_root_certificates(roots)
                    .with_no_client_auth();
                let connector = TlsConnector::from(Arc::new(config));
                let server_name = ServerName::try_from(host.to_owned())
                    .map_err(|_| SessionError::InvalidServerName(host.to_owned()))?;
                let stream = connector.connect(server_name, stream).await?;
                Ok(Self::Tls {
                    framed: Framed::new(stream, codec),
                })
            }
        }
    }

    /// Whether this transport is encrypted.
    pub fn is_tls(&self) -> bool {
        matches!(self, Self::Tls { .. })
    }

    /// Read the next framed line. `None` signals an orderly close.
    pub async fn read_line(&mut self) -> Option<Result<String, ProtocolError>> {
        match self {
            Self::Tcp { framed } => framed.next().await,
            Self::Tls { framed } => framed.next().await,
        }
    }

    /// Write one line (terminator appended by the codec).
    pub async fn write_line(&mut self, line: String) -> Result<(), ProtocolError> {
        match self {
            Self::Tcp { framed } => framed.send(line).await,
            Self::Tls { framed } => framed.send(line).await,
        }
    }
}

fn enable_keepalive(stream: &TcpStream) -> std::io::Result<()> {
    use socket2::{SockRef, TcpKeepalive};
    use std::time::Duration;

    let sock = SockRef::from(stream);
    let keepalive = TcpKeepalive::new()
        .with_time(Duration::from_secs(120))
        .with_interval(Duration::from_secs(30));
    sock.set_tcp_keepalive(&keepalive)
}
