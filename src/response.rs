//! IRC numeric response codes.
//!
//! The subset of RFC 2812 numerics a client session routinely acts on.
//! Unlisted codes still reach consumers through the generic Numeric message
//! kind; this enum only names the ones the session itself interprets or
//! that collaborators commonly match on.
//!
//! # Reference
//! - RFC 2812: Internet Relay Chat: Client Protocol
//! - Modern IRC documentation: <https://modern.ircdocs.horse/>

#![allow(non_camel_case_types)]

/// IRC server response code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
#[non_exhaustive]
pub enum Response {
    // === Connection Registration (001-099) ===
    /// 001 - Welcome to the IRC network; registration is complete.
    RPL_WELCOME = 1,
    /// 002 - Your host is running version
    RPL_YOURHOST = 2,
    /// 003 - Server creation date
    RPL_CREATED = 3,
    /// 004 - Server info
    RPL_MYINFO = 4,
    /// 005 - Server supported features (ISUPPORT)
    RPL_ISUPPORT = 5,

    // === Command Replies (200-399) ===
    /// 301 - Away message
    RPL_AWAY = 301,
    /// 311 - WHOIS user info
    RPL_WHOISUSER = 311,
    /// 312 - WHOIS server info
    RPL_WHOISSERVER = 312,
    /// 313 - WHOIS operator
    RPL_WHOISOPERATOR = 313,
    /// 314 - WHOWAS user info
    RPL_WHOWASUSER = 314,
    /// 315 - End of WHO list
    RPL_ENDOFWHO = 315,
    /// 317 - WHOIS idle time
    RPL_WHOISIDLE = 317,
    /// 318 - End of WHOIS
    RPL_ENDOFWHOIS = 318,
    /// 321 - LIST start
    RPL_LISTSTART = 321,
    /// 322 - LIST entry
    RPL_LIST = 322,
    /// 323 - End of LIST
    RPL_LISTEND = 323,
    /// 324 - Channel mode is
    RPL_CHANNELMODEIS = 324,
    /// 331 - No topic set
    RPL_NOTOPIC = 331,
    /// 332 - Channel topic
    RPL_TOPIC = 332,
    /// 341 - INVITE confirmation
    RPL_INVITING = 341,
    /// 352 - WHO reply
    RPL_WHOREPLY = 352,
    /// 353 - NAMES reply
    RPL_NAMREPLY = 353,
    /// 366 - End of NAMES
    RPL_ENDOFNAMES = 366,
    /// 369 - End of WHOWAS
    RPL_ENDOFWHOWAS = 369,
    /// 372 - MOTD line
    RPL_MOTD = 372,
    /// 375 - MOTD start
    RPL_MOTDSTART = 375,
    /// 376 - End of MOTD
    RPL_ENDOFMOTD = 376,

    // === Error Replies (400-599) ===
    /// 401 - No such nick/channel
    ERR_NOSUCHNICK = 401,
    /// 403 - No such channel
    ERR_NOSUCHCHANNEL = 403,
    /// 404 - Cannot send to channel
    ERR_CANNOTSENDTOCHAN = 404,
    /// 421 - Unknown command
    ERR_UNKNOWNCOMMAND = 421,
    /// 422 - MOTD missing
    ERR_NOMOTD = 422,
    /// 432 - Erroneous nickname
    ERR_ERRONEUSNICKNAME = 432,
    /// 433 - Nickname in use
    ERR_NICKNAMEINUSE = 433,
    /// 442 - Not on that channel
    ERR_NOTONCHANNEL = 442,
    /// 461 - Not enough parameters
    ERR_NEEDMOREPARAMS = 461,
    /// 462 - Already registered
    ERR_ALREADYREGISTERED = 462,
    /// 464 - Password mismatch
    ERR_PASSWDMISMATCH = 464,
    /// 471 - Channel is full
    ERR_CHANNELISFULL = 471,
    /// 473 - Invite-only channel
    ERR_INVITEONLYCHAN = 473,
    /// 474 - Banned from channel
    ERR_BANNEDFROMCHAN = 474,
    /// 475 - Bad channel key
    ERR_BADCHANNELKEY = 475,
}

impl Response {
    /// Returns the numeric code as u16.
    #[inline]
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Creates a Response from a numeric code.
    pub fn from_code(code: u16) -> Option<Response> {
        Some(match code {
            1 => Response::RPL_WELCOME,
            2 => Response::RPL_YOURHOST,
            3 => Response::RPL_CREATED,
            4 => Response::RPL_MYINFO,
            5 => Response::RPL_ISUPPORT,
            301 => Response::RPL_AWAY,
            311 => Response::RPL_WHOISUSER,
            312 => Response::RPL_WHOISSERVER,
            313 => Response::RPL_WHOISOPERATOR,
            314 => Response::RPL_WHOWASUSER,
            315 => Response::RPL_ENDOFWHO,
            317 => Response::RPL_WHOISIDLE,
            318 => Response::RPL_ENDOFWHOIS,
            321 => Response::RPL_LISTSTART,
            322 => Response::RPL_LIST,
            323 => Response::RPL_LISTEND,
            324 => Response::RPL_CHANNELMODEIS,
            331 => Response::RPL_NOTOPIC,
            332 => Response::RPL_TOPIC,
            341 => Response::RPL_INVITING,
            352 => Response::RPL_WHOREPLY,
            353 => Response::RPL_NAMREPLY,
            366 => Response::RPL_ENDOFNAMES,
            369 => Response::RPL_ENDOFWHOWAS,
            372 => Response::RPL_MOTD,
            375 => Response::RPL_MOTDSTART,
            376 => Response::RPL_ENDOFMOTD,
            401 => Response::ERR_NOSUCHNICK,
            403 => Response::ERR_NOSUCHCHANNEL,
            404 => Response::ERR_CANNOTSENDTOCHAN,
            421 => Response::ERR_UNKNOWNCOMMAND,
            422 => Response::ERR_NOMOTD,
            432 => Response::ERR_ERRONEUSNICKNAME,
            433 => Response::ERR_NICKNAMEINUSE,
            442 => Response::ERR_NOTONCHANNEL,
            461 => Response::ERR_NEEDMOREPARAMS,
            462 => Response::ERR_ALREADYREGISTERED,
            464 => Response::ERR_PASSWDMISMATCH,
            471 => Response::ERR_CHANNELISFULL,
            473 => Response::ERR_INVITEONLYCHAN,
            474 => Response::ERR_BANNEDFROMCHAN,
            475 => Response::ERR_BADCHANNELKEY,
            _ => return None,
        })
    }

    /// Whether this code is an error reply (400-599 range).
    pub fn is_error(&self) -> bool {
        let code = self.code();
        (400..600).contains(&code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        assert_eq!(Response::RPL_WELCOME.code(), 1);
        assert_eq!(Response::from_code(1), Some(Response::RPL_WELCOME));
        assert_eq!(Response::from_code(353), Some(Response::RPL_NAMREPLY));
        assert_eq!(Response::from_code(999), None);
    }

    #[test]
    fn test_is_error() {
        assert!(Response::ERR_NICKNAMEINUSE.is_error());
        assert!(!Response::RPL_TOPIC.is_error());
    }
}
