//! State-independent classification of framed protocol lines.
//!
//! Each line is split into `(prefix, command, params)` and classified once:
//! numeric command tokens first, then the fixed textual command set. `PING`
//! is answered with a PONG directive and never surfaced as an event;
//! commands outside the set produce nothing. Nick-change, peer-quit and
//! KILL propagation are deliberately left to collaborators.

use tracing::trace;

use crate::line::ParsedLine;
use crate::message::Message;

/// The outcome of classifying one framed line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dispatched {
    /// A classified message to surface as a session event.
    Event(Message),
    /// A `PING` to answer immediately with `PONG <arg>`; no event.
    Pong(String),
    /// Unparsable or unclassified line; no event.
    Ignored,
}

/// Classify a single framed line.
pub fn dispatch(line: &str) -> Dispatched {
    let Some(parsed) = ParsedLine::parse(line) else {
        trace!(line, "ignoring unparsable line");
        return Dispatched::Ignored;
    };

    if parsed.command.eq_ignore_ascii_case("PING") {
        let arg = parsed.params.first().copied().unwrap_or("");
        return Dispatched::Pong(arg.to_owned());
    }

    match Message::parse(parsed.prefix, parsed.command, &parsed.params) {
        Some(msg) => Dispatched::Event(msg),
        None => {
            trace!(command = parsed.command, "ignoring unclassified command");
            Dispatched::Ignored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageKind;

    #[test]
    fn test_ping_yields_pong_not_event() {
        assert_eq!(dispatch("PING :abc"), Dispatched::Pong("abc".into()));
        assert_eq!(dispatch("PING"), Dispatched::Pong(String::new()));
    }

    #[test]
    fn test_numeric_dispatch() {
        let Dispatched::Event(msg) = dispatch(":server 372 nick :- motd line") else {
            panic!("expected event");
        };
        assert!(matches!(msg.kind, MessageKind::Numeric { code: 372, .. }));
    }

    #[test]
    fn test_ctcp_action_dispatch() {
        let Dispatched::Event(msg) =
            dispatch(":nick!user@host PRIVMSG #chan :\u{1}ACTION waves\u{1}")
        else {
            panic!("expected event");
        };
        assert_eq!(msg.source_nick(), Some("nick"));
        assert_eq!(
            msg.kind,
            MessageKind::CtcpAction {
                target: "#chan".into(),
                action: "waves".into(),
            }
        );
    }

    #[test]
    fn test_channel_mode_dispatch() {
        let Dispatched::Event(msg) = dispatch(":nick!user@host MODE #chan +o other") else {
            panic!("expected event");
        };
        assert!(matches!(msg.kind, MessageKind::ChannelMode { .. }));
    }

    #[test]
    fn test_unknown_command_ignored() {
        assert_eq!(dispatch(":nick!u@h WALLOPS :text"), Dispatched::Ignored);
        assert_eq!(dispatch(":nick!u@h NICK :newnick"), Dispatched::Ignored);
        assert_eq!(dispatch("not@a#line"), Dispatched::Ignored);
    }
}
