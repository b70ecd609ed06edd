//! IRC case-mapping functions.
//!
//! IRC target names are case-insensitive under a wider mapping than ASCII:
//! RFC 1459 declares `[` ≡ `{`, `]` ≡ `}`, `\` ≡ `|` and `~` ≡ `^` in
//! addition to the usual letters. Buffer registry keys are normalized with
//! this mapping.

/// Convert a string to IRC lowercase using RFC 1459 case mapping.
pub fn irc_to_lower(s: &str) -> String {
    s.chars().map(fold).collect()
}

/// Compare two strings using IRC case-insensitive comparison.
pub fn irc_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.chars()
        .zip(b.chars())
        .all(|(ca, cb)| fold(ca) == fold(cb))
}

fn fold(c: char) -> char {
    match c {
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        '~' => '^',
        'A'..='Z' => c.to_ascii_lowercase(),
        _ => c,
    }
}
