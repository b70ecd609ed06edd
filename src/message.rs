//! Typed IRC protocol messages.
//!
//! [`Message`] is the immutable value produced for every classified protocol
//! line: a source prefix plus a [`MessageKind`] tagged variant carrying only
//! the fields relevant to that kind. Parsing is total for every recognized
//! command: missing parameters default to the empty string, extra parameters
//! are retained positionally (numerics keep the whole parameter list).
//!
//! Serialization via [`Message::to_wire`] is outbound-only: it reconstructs
//! the space-joined wire form with the free-text final parameter prefixed by
//! `:`, and refuses numeric replies, which a client never sends.

use crate::ctcp;
use crate::error::ProtocolError;
use crate::prefix::Prefix;

/// Characters that introduce a channel name.
const CHANNEL_PREFIXES: [char; 4] = ['#', '&', '+', '!'];

/// Whether a target names a channel rather than a user.
pub fn is_channel_name(target: &str) -> bool {
    target.starts_with(CHANNEL_PREFIXES)
}

/// A typed protocol message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// The source prefix, present on server-originated lines.
    pub source: Option<Prefix>,
    /// The classified message kind and its fields.
    pub kind: MessageKind,
}

/// The fixed set of classified message kinds.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum MessageKind {
    /// A numeric server reply, kept generic with its full parameter list.
    Numeric {
        /// Three-digit reply code.
        code: u16,
        /// All parameters, positionally.
        params: Vec<String>,
    },
    /// `JOIN channel`
    Join { channel: String },
    /// `PART channel [:reason]`
    Part { channel: String, reason: String },
    /// `TOPIC channel [:topic]`
    Topic { channel: String, topic: String },
    /// `NAMES [channel]`
    Names { channel: String },
    /// `LIST [channels]`
    List { channels: String },
    /// `INVITE nick channel`
    Invite { nick: String, channel: String },
    /// `KICK channel nick [:reason]`
    Kick {
        channel: String,
        nick: String,
        reason: String,
    },
    /// `MODE channel modes [args...]`
    ChannelMode {
        channel: String,
        mode: String,
        args: Vec<String>,
    },
    /// `MODE nick modes`
    UserMode { nick: String, mode: String },
    /// `PRIVMSG target :text`
    Private { target: String, text: String },
    /// `NOTICE target :text`
    Notice { target: String, text: String },
    /// `PRIVMSG target :\x01ACTION text\x01`
    CtcpAction { target: String, action: String },
    /// `PRIVMSG target :\x01request\x01`
    CtcpRequest { target: String, request: String },
    /// `NOTICE target :\x01reply\x01`
    CtcpReply { target: String, reply: String },
    /// `WHO [mask]`
    Who { mask: String },
    /// `WHOIS nick`
    Whois { nick: String },
    /// `WHOWAS nick`
    Whowas { nick: String },
}

/// Positional parameter access with empty-string default.
fn param<'a>(params: &[&'a str], index: usize) -> &'a str {
    params.get(index).copied().unwrap_or("")
}

impl Message {
    /// Parse a `(prefix, command, params)` triple into a typed message.
    ///
    /// Numeric command tokens take priority over textual matching. Returns
    /// `None` for command tokens outside the classified set (including
    /// `PING`, which the dispatcher answers without surfacing an event).
    pub fn parse(prefix: Option<&str>, command: &str, params: &[&str]) -> Option<Message> {
        let source = prefix.map(Prefix::parse);

        if let Ok(code) = command.parse::<u16>() {
            return Some(Message {
                source,
                kind: MessageKind::Numeric {
                    code,
                    params: params.iter().map(|s| (*s).to_owned()).collect(),
                },
            });
        }

        let kind = match command.to_ascii_uppercase().as_str() {
            "JOIN" => MessageKind::Join {
                channel: param(params, 0).to_owned(),
            },
            "PART" => MessageKind::Part {
                channel: param(params, 0).to_owned(),
                reason: param(params, 1).to_owned(),
            },
            "TOPIC" => MessageKind::Topic {
                channel: param(params, 0).to_owned(),
                topic: param(params, 1).to_owned(),
            },
            "NAMES" => MessageKind::Names {
                channel: param(params, 0).to_owned(),
            },
            "LIST" => MessageKind::List {
                channels: param(params, 0).to_owned(),
            },
            "INVITE" => MessageKind::Invite {
                nick: param(params, 0).to_owned(),
                channel: param(params, 1).to_owned(),
            },
            "KICK" => MessageKind::Kick {
                channel: param(params, 0).to_owned(),
                nick: param(params, 1).to_owned(),
                reason: param(params, 2).to_owned(),
            },
            "MODE" => {
                let target = param(params, 0);
                let mode = param(params, 1);
                if is_channel_name(target) {
                    MessageKind::ChannelMode {
                        channel: target.to_owned(),
                        mode: mode.to_owned(),
                        args: params
                            .iter()
                            .skip(2)
                            .map(|s| (*s).to_owned())
                            .collect(),
                    }
                } else {
                    MessageKind::UserMode {
                        nick: target.to_owned(),
                        mode: mode.to_owned(),
                    }
                }
            }
            "PRIVMSG" => {
                let target = param(params, 0).to_owned();
                let text = param(params, 1);
                if ctcp::is_action(text) {
                    MessageKind::CtcpAction {
                        target,
                        action: ctcp::action_text(text).to_owned(),
                    }
                } else if ctcp::is_ctcp(text) {
                    MessageKind::CtcpRequest {
                        target,
                        request: ctcp::strip_delimiters(text).to_owned(),
                    }
                } else {
                    MessageKind::Private {
                        target,
                        text: text.to_owned(),
                    }
                }
            }
            "NOTICE" => {
                let target = param(params, 0).to_owned();
                let text = param(params, 1);
                if ctcp::is_ctcp(text) {
                    MessageKind::CtcpReply {
                        target,
                        reply: ctcp::strip_delimiters(text).to_owned(),
                    }
                } else {
                    MessageKind::Notice {
                        target,
                        text: text.to_owned(),
                    }
                }
            }
            "WHO" => MessageKind::Who {
                mask: param(params, 0).to_owned(),
            },
            "WHOIS" => MessageKind::Whois {
                nick: param(params, 0).to_owned(),
            },
            "WHOWAS" => MessageKind::Whowas {
                nick: param(params, 0).to_owned(),
            },
            _ => return None,
        };

        Some(Message { source, kind })
    }

    /// Serialize the message to its outbound wire form, without prefix and
    /// without the trailing `\r\n`.
    ///
    /// Numeric replies are inbound-only and are refused with
    /// [`ProtocolError::NotSerializable`].
    pub fn to_wire(&self) -> Result<String, ProtocolError> {
        let wire = match &self.kind {
            MessageKind::Numeric { .. } => {
                return Err(ProtocolError::NotSerializable("numeric reply"))
            }
            MessageKind::Join { channel } => format!("JOIN {}", channel),
            MessageKind::Part { channel, reason } => {
                if reason.is_empty() {
                    format!("PART {}", channel)
                } else {
                    format!("PART {} :{}", channel, reason)
                }
            }
            MessageKind::Topic { channel, topic } => {
                if topic.is_empty() {
                    format!("TOPIC {}", channel)
                } else {
                    format!("TOPIC {} :{}", channel, topic)
                }
            }
            MessageKind::Names { channel } => {
                if channel.is_empty() {
                    "NAMES".to_owned()
                } else {
                    format!("NAMES {}", channel)
                }
            }
            MessageKind::List { channels } => {
                if channels.is_empty() {
                    "LIST".to_owned()
                } else {
                    format!("LIST {}", channels)
                }
            }
            MessageKind::Invite { nick, channel } => format!("INVITE {} {}", nick, channel),
            MessageKind::Kick {
                channel,
                nick,
                reason,
            } => {
                if reason.is_empty() {
                    format!("KICK {} {}", channel, nick)
                } else {
                    format!("KICK {} {} :{}", channel, nick, reason)
                }
            }
            MessageKind::ChannelMode {
                channel,
                mode,
                args,
            } => {
                let mut wire = format!("MODE {}", channel);
                if !mode.is_empty() {
                    wire.push(' ');
                    wire.push_str(mode);
                }
                for arg in args {
                    wire.push(' ');
                    wire.push_str(arg);
                }
                wire
            }
            MessageKind::UserMode { nick, mode } => {
                if mode.is_empty() {
                    format!("MODE {}", nick)
                } else {
                    format!("MODE {} {}", nick, mode)
                }
            }
            MessageKind::Private { target, text } => format!("PRIVMSG {} :{}", target, text),
            MessageKind::Notice { target, text } => format!("NOTICE {} :{}", target, text),
            MessageKind::CtcpAction { target, action } => {
                format!(
                    "PRIVMSG {} :{}",
                    target,
                    ctcp::wrap(&format!("ACTION {}", action))
                )
            }
            MessageKind::CtcpRequest { target, request } => {
                format!("PRIVMSG {} :{}", target, ctcp::wrap(request))
            }
            MessageKind::CtcpReply { target, reply } => {
                format!("NOTICE {} :{}", target, ctcp::wrap(reply))
            }
            MessageKind::Who { mask } => format!("WHO {}", mask),
            MessageKind::Whois { nick } => format!("WHOIS {}", nick),
            MessageKind::Whowas { nick } => format!("WHOWAS {}", nick),
        };
        Ok(wire)
    }

    /// The actor nick carried by the source prefix, if any.
    pub fn source_nick(&self) -> Option<&str> {
        self.source.as_ref().map(Prefix::nick)
    }

    /// The conversational target this message is addressed to, if any.
    ///
    /// Channel operations yield their channel; messaging kinds yield their
    /// target parameter. Numerics and user queries have no single target.
    pub fn target(&self) -> Option<&str> {
        match &self.kind {
            MessageKind::Join { channel }
            | MessageKind::Part { channel, .. }
            | MessageKind::Topic { channel, .. }
            | MessageKind::Kick { channel, .. }
            | MessageKind::ChannelMode { channel, .. }
            | MessageKind::Invite { channel, .. } => Some(channel),
            MessageKind::Private { target, .. }
            | MessageKind::Notice { target, .. }
            | MessageKind::CtcpAction { target, .. }
            | MessageKind::CtcpRequest { target, .. }
            | MessageKind::CtcpReply { target, .. } => Some(target),
            _ => None,
        }
    }
}

/// Outbound construction helpers.
impl Message {
    fn outbound(kind: MessageKind) -> Message {
        Message { source: None, kind }
    }

    /// `PRIVMSG target :text`
    pub fn privmsg(target: &str, text: &str) -> Message {
        Self::outbound(MessageKind::Private {
            target: target.to_owned(),
            text: text.to_owned(),
        })
    }

    /// `NOTICE target :text`
    pub fn notice(target: &str, text: &str) -> Message {
        Self::outbound(MessageKind::Notice {
            target: target.to_owned(),
            text: text.to_owned(),
        })
    }

    /// `JOIN channel`
    pub fn join(channel: &str) -> Message {
        Self::outbound(MessageKind::Join {
            channel: channel.to_owned(),
        })
    }

    /// `PART channel [:reason]` — pass an empty reason to omit it.
    pub fn part(channel: &str, reason: &str) -> Message {
        Self::outbound(MessageKind::Part {
            channel: channel.to_owned(),
            reason: reason.to_owned(),
        })
    }

    /// `TOPIC channel [:topic]` — an empty topic queries the current one.
    pub fn topic(channel: &str, topic: &str) -> Message {
        Self::outbound(MessageKind::Topic {
            channel: channel.to_owned(),
            topic: topic.to_owned(),
        })
    }

    /// `INVITE nick channel`
    pub fn invite(nick: &str, channel: &str) -> Message {
        Self::outbound(MessageKind::Invite {
            nick: nick.to_owned(),
            channel: channel.to_owned(),
        })
    }

    /// `KICK channel nick [:reason]`
    pub fn kick(channel: &str, nick: &str, reason: &str) -> Message {
        Self::outbound(MessageKind::Kick {
            channel: channel.to_owned(),
            nick: nick.to_owned(),
            reason: reason.to_owned(),
        })
    }

    /// `MODE target modes`, sub-classified by the target's channel prefix.
    pub fn mode(target: &str, mode: &str) -> Message {
        if is_channel_name(target) {
            Self::outbound(MessageKind::ChannelMode {
                channel: target.to_owned(),
                mode: mode.to_owned(),
                args: Vec::new(),
            })
        } else {
            Self::outbound(MessageKind::UserMode {
                nick: target.to_owned(),
                mode: mode.to_owned(),
            })
        }
    }

    /// CTCP action (`/me`) towards a target.
    pub fn ctcp_action(target: &str, action: &str) -> Message {
        Self::outbound(MessageKind::CtcpAction {
            target: target.to_owned(),
            action: action.to_owned(),
        })
    }

    /// CTCP request towards a target (e.g. `VERSION`).
    pub fn ctcp_request(target: &str, request: &str) -> Message {
        Self::outbound(MessageKind::CtcpRequest {
            target: target.to_owned(),
            request: request.to_owned(),
        })
    }

    /// CTCP reply towards a target.
    pub fn ctcp_reply(target: &str, reply: &str) -> Message {
        Self::outbound(MessageKind::CtcpReply {
            target: target.to_owned(),
            reply: reply.to_owned(),
        })
    }

    /// `WHO mask`
    pub fn who(mask: &str) -> Message {
        Self::outbound(MessageKind::Who {
            mask: mask.to_owned(),
        })
    }

    /// `WHOIS nick`
    pub fn whois(nick: &str) -> Message {
        Self::outbound(MessageKind::Whois {
            nick: nick.to_owned(),
        })
    }

    /// `WHOWAS nick`
    pub fn whowas(nick: &str) -> Message {
        Self::outbound(MessageKind::Whowas {
            nick: nick.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric_priority() {
        let msg = Message::parse(Some("server"), "001", &["nick", "Welcome"]).unwrap();
        assert_eq!(
            msg.kind,
            MessageKind::Numeric {
                code: 1,
                params: vec!["nick".into(), "Welcome".into()],
            }
        );
    }

    #[test]
    fn test_parse_join() {
        let msg = Message::parse(Some("nick!user@host"), "JOIN", &["#rust"]).unwrap();
        assert_eq!(
            msg.kind,
            MessageKind::Join {
                channel: "#rust".into()
            }
        );
        assert_eq!(msg.source_nick(), Some("nick"));
    }

    #[test]
    fn test_parse_missing_params_default_empty() {
        let msg = Message::parse(None, "PART", &[]).unwrap();
        assert_eq!(
            msg.kind,
            MessageKind::Part {
                channel: String::new(),
                reason: String::new(),
            }
        );
    }

    #[test]
    fn test_parse_mode_subclassification() {
        let msg = Message::parse(None, "MODE", &["#chan", "+o", "other"]).unwrap();
        assert_eq!(
            msg.kind,
            MessageKind::ChannelMode {
                channel: "#chan".into(),
                mode: "+o".into(),
                args: vec!["other".into()],
            }
        );

        let msg = Message::parse(None, "MODE", &["nick", "+i"]).unwrap();
        assert_eq!(
            msg.kind,
            MessageKind::UserMode {
                nick: "nick".into(),
                mode: "+i".into(),
            }
        );
    }

    #[test]
    fn test_parse_ctcp_action() {
        let msg =
            Message::parse(Some("nick!u@h"), "PRIVMSG", &["#chan", "\u{1}ACTION waves\u{1}"])
                .unwrap();
        assert_eq!(
            msg.kind,
            MessageKind::CtcpAction {
                target: "#chan".into(),
                action: "waves".into(),
            }
        );
    }

    #[test]
    fn test_parse_ctcp_request_and_reply() {
        let msg = Message::parse(None, "PRIVMSG", &["nick", "\u{1}VERSION\u{1}"]).unwrap();
        assert!(matches!(msg.kind, MessageKind::CtcpRequest { .. }));

        let msg = Message::parse(None, "NOTICE", &["nick", "\u{1}VERSION ircore\u{1}"]).unwrap();
        assert!(matches!(msg.kind, MessageKind::CtcpReply { .. }));
    }

    #[test]
    fn test_parse_unknown_command() {
        assert!(Message::parse(None, "WALLOPS", &["text"]).is_none());
        assert!(Message::parse(None, "PING", &["abc"]).is_none());
    }

    #[test]
    fn test_wire_round_trip() {
        let msg = Message::parse(None, "PRIVMSG", &["#chan", "hello world"]).unwrap();
        assert_eq!(msg.to_wire().unwrap(), "PRIVMSG #chan :hello world");

        let msg = Message::parse(None, "JOIN", &["#chan"]).unwrap();
        assert_eq!(msg.to_wire().unwrap(), "JOIN #chan");
    }

    #[test]
    fn test_numeric_not_serializable() {
        let msg = Message::parse(None, "001", &["nick"]).unwrap();
        assert!(matches!(
            msg.to_wire(),
            Err(ProtocolError::NotSerializable(_))
        ));
    }

    #[test]
    fn test_ctcp_action_serialization() {
        let msg = Message::ctcp_action("#chan", "waves");
        assert_eq!(
            msg.to_wire().unwrap(),
            "PRIVMSG #chan :\u{1}ACTION waves\u{1}"
        );
    }

    #[test]
    fn test_target() {
        assert_eq!(Message::join("#a").target(), Some("#a"));
        assert_eq!(Message::privmsg("nick", "hi").target(), Some("nick"));
        assert_eq!(Message::whois("nick").target(), None);
    }
}
