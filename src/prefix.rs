//! IRC message prefix (source) handling.
//!
//! A prefix is the `:nick!user@host` portion at the start of a server line.
//! Server-originated lines often carry a bare server name instead of the
//! full `nick!user@host` form; parsing degrades gracefully in that case.

/// The source of an IRC message.
///
/// For user-originated messages this is `nick!user@host`. For
/// server-originated messages only `nick` is populated (with the server
/// name) and `user`/`host` are empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prefix {
    /// The raw prefix text as received, without the leading `:`.
    pub raw: String,
    /// Nick name (or server name for server prefixes).
    pub nick: String,
    /// User (ident) portion, empty if absent.
    pub user: String,
    /// Host portion, empty if absent.
    pub host: String,
}

impl Prefix {
    /// Parse a prefix from its raw text (without the leading `:`).
    pub fn parse(raw: &str) -> Self {
        let (nick, rest) = match raw.split_once('!') {
            Some((n, r)) => (n, Some(r)),
            None => match raw.split_once('@') {
                // "name@host" without an ident still splits on host
                Some((n, h)) => {
                    return Self {
                        raw: raw.to_owned(),
                        nick: n.to_owned(),
                        user: String::new(),
                        host: h.to_owned(),
                    }
                }
                None => (raw, None),
            },
        };
        let (user, host) = match rest.and_then(|r| r.split_once('@')) {
            Some((u, h)) => (u.to_owned(), h.to_owned()),
            None => (rest.unwrap_or("").to_owned(), String::new()),
        };
        Self {
            raw: raw.to_owned(),
            nick: nick.to_owned(),
            user,
            host,
        }
    }

    /// The actor nick name carried by this prefix.
    pub fn nick(&self) -> &str {
        &self.nick
    }
}

impl std::fmt::Display for Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
