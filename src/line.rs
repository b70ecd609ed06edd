//! Nom-based splitter for framed protocol lines.
//!
//! Splits one complete line into its `(prefix, command, params)` components.
//! The trailing parameter (introduced by `:`) is consumed verbatim to the
//! end of the line and may contain spaces.

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, space0},
    combinator::opt,
    sequence::preceded,
    IResult,
};

/// Parse the message prefix (the part after `:` and before the first space).
fn parse_prefix(input: &str) -> IResult<&str, &str> {
    preceded(char(':'), take_while1(|c| c != ' '))(input)
}

/// Parse the command token (alphanumeric characters).
fn parse_command(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric())(input)
}

fn parse_line(input: &str) -> IResult<&str, ParsedLine<'_>> {
    let (input, prefix) = opt(parse_prefix)(input)?;
    let (input, _) = space0(input)?;
    let (input, command) = parse_command(input)?;

    let mut params: Vec<&str> = Vec::new();
    let mut rest = input;

    while let Some(b' ') = rest.as_bytes().first().copied() {
        rest = &rest[1..];

        if let Some(b':') = rest.as_bytes().first().copied() {
            // Trailing parameter, verbatim to end of line.
            let after_colon = &rest[1..];
            let end = after_colon.find(['\r', '\n']).unwrap_or(after_colon.len());
            params.push(&after_colon[..end]);
            rest = &after_colon[end..];
            break;
        } else {
            let mut end = rest.len();
            if let Some(i) = rest.find(' ') {
                end = end.min(i);
            }
            if let Some(i) = rest.find('\r') {
                end = end.min(i);
            }
            if let Some(i) = rest.find('\n') {
                end = end.min(i);
            }
            let param = &rest[..end];
            if param.is_empty() {
                break;
            }
            params.push(param);
            rest = &rest[end..];
        }
    }

    Ok((
        rest,
        ParsedLine {
            prefix,
            command,
            params,
        },
    ))
}

/// A split protocol line with borrowed string slices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    /// Raw prefix (without the leading `:`), if present.
    pub prefix: Option<&'a str>,
    /// The command token.
    pub command: &'a str,
    /// Command parameters, including the trailing parameter.
    pub params: Vec<&'a str>,
}

impl<'a> ParsedLine<'a> {
    /// Split a complete protocol line. Returns `None` for lines with no
    /// recognizable command token.
    pub fn parse(input: &'a str) -> Option<Self> {
        match parse_line(input.trim_end_matches(['\r', '\n'])) {
            Ok((_rest, line)) => Some(line),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_command() {
        let line = ParsedLine::parse("PING").unwrap();
        assert_eq!(line.command, "PING");
        assert!(line.prefix.is_none());
        assert!(line.params.is_empty());
    }

    #[test]
    fn test_parse_command_with_params() {
        let line = ParsedLine::parse("PRIVMSG #channel :Hello, world!").unwrap();
        assert_eq!(line.command, "PRIVMSG");
        assert_eq!(line.params, vec!["#channel", "Hello, world!"]);
    }

    #[test]
    fn test_parse_with_prefix() {
        let line = ParsedLine::parse(":nick!user@host PRIVMSG #channel :Hello").unwrap();
        assert_eq!(line.prefix, Some("nick!user@host"));
        assert_eq!(line.command, "PRIVMSG");
        assert_eq!(line.params, vec!["#channel", "Hello"]);
    }

    #[test]
    fn test_parse_numeric_line() {
        let line = ParsedLine::parse(":server 001 nick :Welcome").unwrap();
        assert_eq!(line.prefix, Some("server"));
        assert_eq!(line.command, "001");
        assert_eq!(line.params, vec!["nick", "Welcome"]);
    }

    #[test]
    fn test_parse_multiple_params() {
        let line = ParsedLine::parse("USER guest unknown unknown :Real Name").unwrap();
        assert_eq!(line.command, "USER");
        assert_eq!(line.params, vec!["guest", "unknown", "unknown", "Real Name"]);
    }

    #[test]
    fn test_parse_empty_trailing() {
        let line = ParsedLine::parse("PRIVMSG #channel :").unwrap();
        assert_eq!(line.params, vec!["#channel", ""]);
    }

    #[test]
    fn test_parse_with_crlf() {
        let line = ParsedLine::parse("PING :server\r\n").unwrap();
        assert_eq!(line.command, "PING");
        assert_eq!(line.params, vec!["server"]);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(ParsedLine::parse(":prefix-only").is_none());
        assert!(ParsedLine::parse("").is_none());
    }
}
