//! # ircore
//!
//! An async IRC client-protocol engine: line framing, a typed message
//! model, command dispatch, the connection state machine and per-target
//! buffers, built on [tokio].
//!
//! The crate deliberately stops at the protocol session. It has no UI, no
//! scripting, no server-side logic; a chat application drives a [`Session`]
//! and renders the [`SessionEvent`]s it emits.
//!
//! ## Quick start
//!
//! ```no_run
//! use ircore::{Message, Session, SessionEvent};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (mut session, mut events) = Session::new();
//!     session.set_host("irc.libera.chat");
//!     session.set_port(6667);
//!     session.set_nick_name("ircore");
//!     session.set_user_name("ircore");
//!     session.set_real_name("ircore example");
//!     session.open().await?;
//!
//!     tokio::spawn(async move {
//!         while let Some(event) = events.recv().await {
//!             if let SessionEvent::Connected = event {
//!                 println!("registered!");
//!             }
//!         }
//!     });
//!
//!     session.send_message(&Message::join("#ircore"))?;
//!     session.run().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Layout
//!
//! * [`framer`] / [`codec`]: byte-stream framing and text decoding
//! * [`line`] / [`prefix`] / [`ctcp`]: wire-format parsing primitives
//! * [`message`] / [`response`]: the typed message model and numerics
//! * [`dispatch`]: state-independent line classification
//! * [`session`]: the connection state machine and event emission
//! * [`buffer`]: conversational target buffers and their registry
//! * [`casemap`]: RFC 1459 case folding for identifier comparison
//!
//! [tokio]: https://tokio.rs

pub mod buffer;
pub mod casemap;
pub mod codec;
pub mod ctcp;
pub mod dispatch;
pub mod error;
pub mod framer;
pub mod line;
pub mod message;
pub mod prefix;
pub mod response;
pub mod session;
pub mod transport;

pub use buffer::{Buffer, BufferRegistry, LoggedMessage, MAIN_BUFFER_PATTERN};
pub use codec::LineCodec;
pub use error::{ProtocolError, Result, SessionError};
pub use message::{is_channel_name, Message, MessageKind};
pub use prefix::Prefix;
pub use response::Response;
pub use session::{PasswordProvider, Session, SessionEvent, SessionState};
pub use transport::{TlsMode, Transport};
