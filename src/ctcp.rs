//! CTCP (Client-To-Client Protocol) payload handling.
//!
//! CTCP messages travel inside PRIVMSG/NOTICE payloads, delimited by the
//! `\x01` control byte. An `ACTION` request is the `/me` emote; everything
//! else is treated as an opaque request (PRIVMSG) or reply (NOTICE).

/// The CTCP delimiter byte.
pub const CTCP_DELIM: char = '\u{1}';

/// The literal token introducing a CTCP action.
pub const ACTION_PREFIX: &str = "\u{1}ACTION ";

/// Whether a PRIVMSG/NOTICE payload is a CTCP-delimited message.
pub fn is_ctcp(text: &str) -> bool {
    text.starts_with(CTCP_DELIM)
}

/// Whether a PRIVMSG payload is a CTCP action.
pub fn is_action(text: &str) -> bool {
    text.starts_with(ACTION_PREFIX)
}

/// Strip the CTCP delimiters from a payload.
///
/// Accepts payloads missing the closing delimiter, which some clients omit.
pub fn strip_delimiters(text: &str) -> &str {
    text.trim_start_matches(CTCP_DELIM)
        .trim_end_matches(CTCP_DELIM)
}

/// Extract the action text from a `\x01ACTION ...\x01` payload.
pub fn action_text(text: &str) -> &str {
    strip_delimiters(text)
        .strip_prefix("ACTION ")
        .unwrap_or_default()
}

/// Wrap a payload in CTCP delimiters.
pub fn wrap(payload: &str) -> String {
    format!("{}{}{}", CTCP_DELIM, payload, CTCP_DELIM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_action() {
        assert!(is_action("\u{1}ACTION waves\u{1}"));
        assert!(!is_action("\u{1}VERSION\u{1}"));
        assert!(!is_action("plain text"));
    }

    #[test]
    fn test_action_text() {
        assert_eq!(action_text("\u{1}ACTION waves\u{1}"), "waves");
        // tolerate a missing closing delimiter
        assert_eq!(action_text("\u{1}ACTION waves"), "waves");
    }

    #[test]
    fn test_strip_delimiters() {
        assert_eq!(strip_delimiters("\u{1}VERSION\u{1}"), "VERSION");
        assert_eq!(strip_delimiters("\u{1}PING 12345"), "PING 12345");
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("ACTION waves"), "\u{1}ACTION waves\u{1}");
    }
}
