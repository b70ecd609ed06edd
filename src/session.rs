//! The IRC client session: connection lifecycle, dispatch and buffers.
//!
//! A [`Session`] owns one transport at a time, performs the registration
//! handshake, answers keep-alives, classifies every inbound line and emits
//! [`SessionEvent`]s through an unbounded channel in line-arrival order.
//! All protocol processing happens inline in [`Session::poll`] on the
//! caller's task; only the transport boundary suspends. Outbound writes go
//! through an internal queue drained by a writer half of the connection
//! task, so sends are fire-and-forget: the return value only says whether
//! the write was accepted.
//!
//! There is no automatic reconnection. After a disconnect the session stays
//! in [`SessionState::Disconnected`] until the caller decides to call
//! [`Session::open`] again.

use encoding_rs::{Encoding, UTF_8};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::buffer::{Buffer, BufferRegistry, MAIN_BUFFER_PATTERN};
use crate::codec::LineCodec;
use crate::dispatch::{dispatch, Dispatched};
use crate::error::{ProtocolError, SessionError};
use crate::message::{is_channel_name, Message, MessageKind};
use crate::response::Response;
use crate::transport::{TlsMode, Transport};

/// Connection lifecycle states.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No transport activity yet.
    #[default]
    Idle,
    /// Transport handshake initiated.
    Connecting,
    /// Socket connected, registration sent, awaiting the welcome numeric.
    Registering,
    /// Welcome numeric observed; fully connected.
    Active,
    /// Transport closed. Terminal until the next `open()`.
    Disconnected,
}

/// Events surfaced to collaborators, in FIFO order.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum SessionEvent {
    /// The connection is being established.
    Connecting,
    /// The welcome numeric has been received; the session is registered.
    Connected,
    /// The transport has closed.
    Disconnected,
    /// One classified protocol message.
    Message(Message),
    /// A buffer was created for this pattern.
    BufferAdded(String),
    /// The buffer registered under this pattern was removed.
    BufferRemoved(String),
    /// A transport-level failure, reported as a diagnostic.
    TransportError(String),
}

/// Synchronous callback soliciting an optional connection password.
///
/// Fired once per connection attempt; a `None` or empty result skips the
/// `PASS` command.
pub type PasswordProvider = Box<dyn FnMut() -> Option<String> + Send>;

/// An IRC client session.
pub struct Session {
    host: String,
    port: u16,
    nick_name: String,
    user_name: String,
    real_name: String,
    encoding: &'static Encoding,
    tls: TlsMode,
    password_provider: Option<PasswordProvider>,

    state: SessionState,
    welcomed: bool,
    buffers: BufferRegistry,

    events: mpsc::UnboundedSender<SessionEvent>,
    inbound: Option<mpsc::UnboundedReceiver<Result<String, ProtocolError>>>,
    outbound: Option<mpsc::UnboundedSender<String>>,
    conn_task: Option<JoinHandle<()>>,
}

impl Session {
    /// Create a session and the receiving end of its event channel.
    pub fn new() -> (Session, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let session = Session {
            host: String::new(),
            port: 6667,
            nick_name: String::new(),
            user_name: String::new(),
            real_name: String::new(),
            encoding: UTF_8,
            tls: TlsMode::default(),
            password_provider: None,
            state: SessionState::default(),
            welcomed: false,
            buffers: BufferRegistry::new(),
            events,
            inbound: None,
            outbound: None,
            conn_task: None,
        };
        (session, rx)
    }

    // === Configuration ===

    /// The configured host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Set the host. Takes effect at the next `open()`.
    pub fn set_host(&mut self, host: &str) {
        if self.is_connected() {
            warn!("set_host() has no effect until re-connect");
        }
        self.host = host.to_owned();
    }

    /// The configured port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Set the port. Takes effect at the next `open()`.
    pub fn set_port(&mut self, port: u16) {
        if self.is_connected() {
            warn!("set_port() has no effect until re-connect");
        }
        self.port = port;
    }

    /// The desired nick name.
    pub fn nick_name(&self) -> &str {
        &self.nick_name
    }

    /// Set the desired nick name, used at the next registration.
    pub fn set_nick_name(&mut self, name: &str) {
        self.nick_name = name.to_owned();
    }

    /// The configured user (ident) name.
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Set the user name. Takes effect at the next `open()`.
    pub fn set_user_name(&mut self, name: &str) {
        if self.is_connected() {
            warn!("set_user_name() has no effect until re-connect");
        }
        self.user_name = name.to_owned();
    }

    /// The configured real name.
    pub fn real_name(&self) -> &str {
        &self.real_name
    }

    /// Set the real name. Takes effect at the next `open()`.
    pub fn set_real_name(&mut self, name: &str) {
        if self.is_connected() {
            warn!("set_real_name() has no effect until re-connect");
        }
        self.real_name = name.to_owned();
    }

    /// The configured text encoding.
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Set the wire text encoding by WHATWG label (e.g. `"utf-8"`,
    /// `"latin1"`). Returns false and leaves the encoding unchanged for an
    /// unknown label. Takes effect at the next `open()`.
    pub fn set_encoding(&mut self, label: &str) -> bool {
        match Encoding::for_label(label.as_bytes()) {
            Some(enc) => {
                self.encoding = enc;
                true
            }
            None => false,
        }
    }

    /// Select plain TCP or TLS for the next `open()`.
    pub fn set_tls(&mut self, tls: TlsMode) {
        self.tls = tls;
    }

    /// Install the synchronous password callback, consulted once per
    /// connection attempt.
    pub fn set_password_provider<F>(&mut self, provider: F)
    where
        F: FnMut() -> Option<String> + Send + 'static,
    {
        self.password_provider = Some(Box::new(provider));
    }

    // === Lifecycle ===

    /// Current connection state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    fn is_connected(&self) -> bool {
        matches!(
            self.state,
            SessionState::Connecting | SessionState::Registering | SessionState::Active
        )
    }

    /// Connect to the configured server and send the registration
    /// handshake.
    ///
    /// Refuses synchronously, without touching the transport, when the
    /// user name, nick name or real name is empty. Transport failures
    /// leave the session in [`SessionState::Disconnected`].
    pub async fn open(&mut self) -> Result<(), SessionError> {
        if self.is_connected() {
            warn!("open() ignored: session is already connected");
            return Ok(());
        }
        if self.user_name.is_empty() {
            return Err(SessionError::MissingUserName);
        }
        if self.nick_name.is_empty() {
            return Err(SessionError::MissingNickName);
        }
        if self.real_name.is_empty() {
            return Err(SessionError::MissingRealName);
        }

        self.state = SessionState::Connecting;
        self.emit(SessionEvent::Connecting);

        let codec = LineCodec::new(self.encoding);
        let mut transport =
            match Transport::connect(&self.host, self.port, self.tls, codec).await {
                Ok(t) => t,
                Err(e) => {
                    self.state = SessionState::Disconnected;
                    self.emit(SessionEvent::TransportError(e.to_string()));
                    self.emit(SessionEvent::Disconnected);
                    return Err(e);
                }
            };

        self.state = SessionState::Registering;
        if let Err(e) = self.register(&mut transport).await {
            self.state = SessionState::Disconnected;
            self.emit(SessionEvent::TransportError(e.to_string()));
            self.emit(SessionEvent::Disconnected);
            return Err(e.into());
        }

        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = mpsc::unbounded_channel();
        self.outbound = Some(out_tx);
        self.inbound = Some(in_rx);
        self.welcomed = false;
        self.conn_task = Some(tokio::spawn(run_connection(transport, out_rx, in_tx)));
        Ok(())
    }

    async fn register(&mut self, transport: &mut Transport) -> Result<(), ProtocolError> {
        let password = self.password_provider.as_mut().and_then(|provider| provider());
        if let Some(pass) = password.filter(|p| !p.is_empty()) {
            transport.write_line(format!("PASS {}", pass)).await?;
        }
        transport
            .write_line(format!("NICK {}", self.nick_name))
            .await?;
        // hostname and servername are ignored by servers for directly
        // connected clients, so send placeholders
        transport
            .write_line(format!(
                "USER {} unknown unknown :{}",
                self.user_name, self.real_name
            ))
            .await?;
        Ok(())
    }

    /// Close the transport. The only cancellation primitive: lines already
    /// queued inbound are still dispatched by subsequent `poll()` calls.
    pub fn close(&mut self) {
        self.outbound = None;
        if let Some(task) = self.conn_task.take() {
            task.abort();
        }
        if self.is_connected() {
            self.state = SessionState::Disconnected;
            self.emit(SessionEvent::Disconnected);
        }
    }

    /// Process the next inbound notification.
    ///
    /// Suspends until a line arrives or the transport closes. Returns true
    /// while the connection is live; false once disconnected (or when no
    /// connection is open).
    pub async fn poll(&mut self) -> bool {
        let Some(inbound) = self.inbound.as_mut() else {
            return false;
        };
        match inbound.recv().await {
            Some(Ok(line)) => {
                self.process_line(&line);
                true
            }
            Some(Err(e)) => {
                self.emit(SessionEvent::TransportError(e.to_string()));
                true
            }
            None => {
                self.inbound = None;
                self.outbound = None;
                self.conn_task = None;
                // close() may already have announced the disconnect
                if self.state != SessionState::Disconnected {
                    self.state = SessionState::Disconnected;
                    self.emit(SessionEvent::Disconnected);
                }
                false
            }
        }
    }

    /// Drive the session until the connection closes.
    pub async fn run(&mut self) {
        while self.poll().await {}
    }

    // === Sending ===

    /// Queue one raw protocol line for sending.
    ///
    /// Fire-and-forget: returns whether the write was accepted, nothing
    /// about its completion.
    pub fn send_raw(&self, line: &str) -> bool {
        match &self.outbound {
            Some(tx) => tx.send(line.to_owned()).is_ok(),
            None => false,
        }
    }

    /// Serialize and queue a typed message.
    ///
    /// Fails with [`ProtocolError::NotSerializable`] for inbound-only
    /// kinds and [`SessionError::NotConnected`] when the write is not
    /// accepted.
    pub fn send_message(&self, message: &Message) -> Result<(), SessionError> {
        let wire = message.to_wire()?;
        if self.send_raw(&wire) {
            Ok(())
        } else {
            Err(SessionError::NotConnected)
        }
    }

    // === Buffers ===

    /// Add a buffer for `pattern`, idempotently by case-insensitive key.
    ///
    /// Emits [`SessionEvent::BufferAdded`] only when the buffer is newly
    /// created.
    pub fn add_buffer(&mut self, pattern: &str) -> &Buffer {
        let created = self.buffers.add(pattern).1;
        if created {
            self.emit(SessionEvent::BufferAdded(pattern.to_owned()));
        }
        self.buffers.get(pattern).expect("buffer just ensured")
    }

    /// Remove the buffer registered under `pattern`.
    ///
    /// Emits [`SessionEvent::BufferRemoved`] only if a buffer was actually
    /// registered under that key.
    pub fn remove_buffer(&mut self, pattern: &str) -> Option<Buffer> {
        let removed = self.buffers.remove(pattern);
        if let Some(buffer) = &removed {
            self.emit(SessionEvent::BufferRemoved(buffer.pattern().to_owned()));
        }
        removed
    }

    /// The main (status) buffer, present once registration has succeeded.
    pub fn main_buffer(&self) -> Option<&Buffer> {
        self.buffers.get(MAIN_BUFFER_PATTERN)
    }

    /// Look up a buffer by pattern, case-insensitively.
    pub fn buffer(&self, pattern: &str) -> Option<&Buffer> {
        self.buffers.get(pattern)
    }

    /// Read access to the whole registry.
    pub fn buffers(&self) -> &BufferRegistry {
        &self.buffers
    }

    /// Mutable access to the registry, e.g. for nick re-keying.
    pub fn buffers_mut(&mut self) -> &mut BufferRegistry {
        &mut self.buffers
    }

    // === Processing ===

    fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }

    fn process_line(&mut self, line: &str) {
        debug!(line, "received");
        match dispatch(line) {
            Dispatched::Pong(arg) => {
                // responsive keep-alive; never surfaced as an event
                self.send_raw(&format!("PONG {}", arg));
            }
            Dispatched::Event(message) => {
                if let MessageKind::Numeric { code, params } = &message.kind {
                    let (code, params) = (*code, params.clone());
                    self.process_numeric(code, &params);
                } else {
                    self.track_message(&message);
                }
                self.emit(SessionEvent::Message(message));
            }
            Dispatched::Ignored => {}
        }
    }

    fn process_numeric(&mut self, code: u16, params: &[String]) {
        if code == Response::RPL_WELCOME.code() && !self.welcomed {
            self.welcomed = true;
            self.state = SessionState::Active;
            self.emit(SessionEvent::Connected);
            if self.buffers.get(MAIN_BUFFER_PATTERN).is_none() {
                self.add_buffer(MAIN_BUFFER_PATTERN);
            }
            return;
        }

        // state reports for targets that already have a buffer
        match Response::from_code(code) {
            Some(Response::RPL_TOPIC) => {
                if let (Some(channel), Some(topic)) = (params.get(1), params.get(2)) {
                    if let Some(buffer) = self.buffers.get_mut(channel) {
                        buffer.set_topic(topic);
                    }
                }
            }
            Some(Response::RPL_NOTOPIC) => {
                if let Some(channel) = params.get(1) {
                    if let Some(buffer) = self.buffers.get_mut(channel) {
                        buffer.set_topic("");
                    }
                }
            }
            Some(Response::RPL_NAMREPLY) => {
                if let (Some(channel), Some(names)) = (params.get(2), params.get(3)) {
                    if let Some(buffer) = self.buffers.get_mut(channel) {
                        for name in names.split_whitespace() {
                            buffer.add_name(name);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    /// Report message state into an existing buffer; never creates one.
    fn track_message(&mut self, message: &Message) {
        let Some(key) = buffer_key(message) else {
            return;
        };
        let key = key.to_owned();
        let nick = message.source_nick().map(str::to_owned);
        let Some(buffer) = self.buffers.get_mut(&key) else {
            return;
        };

        match &message.kind {
            MessageKind::Join { .. } => {
                if let Some(nick) = &nick {
                    buffer.add_name(nick);
                }
            }
            MessageKind::Part { .. } => {
                if let Some(nick) = &nick {
                    buffer.remove_name(nick);
                }
            }
            MessageKind::Kick { nick: kicked, .. } => {
                let kicked = kicked.clone();
                buffer.remove_name(&kicked);
            }
            MessageKind::Topic { topic, .. } => {
                let topic = topic.clone();
                buffer.set_topic(&topic);
            }
            _ => {}
        }
        buffer.push_message(message.clone());
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(task) = self.conn_task.take() {
            task.abort();
        }
    }
}

/// The buffer a message reports state into: its channel, or the sender for
/// direct messages addressed to us.
fn buffer_key(message: &Message) -> Option<&str> {
    let target = message.target()?;
    if is_channel_name(target) || target == MAIN_BUFFER_PATTERN {
        Some(target)
    } else {
        // direct message: the conversation is keyed by the peer nick
        message.source_nick().or(Some(target))
    }
}

async fn run_connection(
    mut transport: Transport,
    mut outbound: mpsc::UnboundedReceiver<String>,
    inbound: mpsc::UnboundedSender<Result<String, ProtocolError>>,
) {
    loop {
        tokio::select! {
            line = outbound.recv() => {
                match line {
                    Some(line) => {
                        if let Err(e) = transport.write_line(line).await {
                            let _ = inbound.send(Err(e));
                            break;
                        }
                    }
                    // the session dropped its send queue: close
                    None => break,
                }
            }
            read = transport.read_line() => {
                match read {
                    Some(Ok(line)) => {
                        if inbound.send(Ok(line)).is_err() {
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        let _ = inbound.send(Err(e));
                        break;
                    }
                    None => break,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let (session, _events) = Session::new();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.port(), 6667);
        assert!(session.main_buffer().is_none());
    }

    #[test]
    fn test_set_encoding() {
        let (mut session, _events) = Session::new();
        assert!(session.set_encoding("latin1"));
        assert!(!session.set_encoding("not-an-encoding"));
        assert_eq!(session.encoding().name(), "windows-1252");
    }

    #[test]
    fn test_send_refused_while_idle() {
        let (session, _events) = Session::new();
        assert!(!session.send_raw("PING :x"));
        assert!(matches!(
            session.send_message(&Message::privmsg("#a", "hi")),
            Err(SessionError::NotConnected)
        ));
    }

    #[test]
    fn test_add_buffer_emits_once() {
        let (mut session, mut events) = Session::new();
        session.add_buffer("#Foo");
        session.add_buffer("#foo");
        assert_eq!(session.buffers().len(), 1);
        assert!(matches!(
            events.try_recv(),
            Ok(SessionEvent::BufferAdded(p)) if p == "#Foo"
        ));
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_remove_buffer_emits_only_when_registered() {
        let (mut session, mut events) = Session::new();
        session.add_buffer("#chan");
        let _ = events.try_recv();
        assert!(session.remove_buffer("#CHAN").is_some());
        assert!(matches!(
            events.try_recv(),
            Ok(SessionEvent::BufferRemoved(p)) if p == "#chan"
        ));
        assert!(session.remove_buffer("#chan").is_none());
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_open_refuses_empty_config() {
        let (mut session, mut events) = Session::new();
        session.set_host("127.0.0.1");
        assert!(matches!(
            session.open().await,
            Err(SessionError::MissingUserName)
        ));
        session.set_user_name("user");
        assert!(matches!(
            session.open().await,
            Err(SessionError::MissingNickName)
        ));
        session.set_nick_name("nick");
        assert!(matches!(
            session.open().await,
            Err(SessionError::MissingRealName)
        ));
        // refusal is synchronous: no state change, no events
        assert_eq!(session.state(), SessionState::Idle);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_welcome_creates_main_buffer_once() {
        let (mut session, mut events) = Session::new();
        session.process_line(":server 001 nick :Welcome");
        assert_eq!(session.state(), SessionState::Active);
        assert!(session.main_buffer().is_some());

        // an erroneous second welcome neither re-emits nor re-creates
        session.process_line(":server 001 nick :Welcome again");

        let mut connected = 0;
        let mut added = 0;
        while let Ok(event) = events.try_recv() {
            match event {
                SessionEvent::Connected => connected += 1,
                SessionEvent::BufferAdded(_) => added += 1,
                _ => {}
            }
        }
        assert_eq!(connected, 1);
        assert_eq!(added, 1);
    }

    #[test]
    fn test_traffic_reports_into_existing_buffers_only() {
        let (mut session, _events) = Session::new();
        session.add_buffer("#chan");
        session.process_line(":alice!a@host JOIN #chan");
        session.process_line(":server 332 me #chan :the topic");
        session.process_line(":server 353 me = #chan :@op alice bob");
        assert_eq!(session.buffer("#chan").unwrap().topic(), Some("the topic"));
        assert_eq!(session.buffer("#chan").unwrap().names().len(), 3);

        session.process_line(":alice!a@host PART #chan :bye");
        assert_eq!(session.buffer("#chan").unwrap().names().len(), 2);

        // traffic for unknown targets creates nothing
        session.process_line(":bob!b@host PRIVMSG #other :hi");
        assert!(session.buffer("#other").is_none());
    }
}
