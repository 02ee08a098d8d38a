//! Line grammar for section headers and key-value pairs.
//!
//! ```text
//! header    := WS* '[' WS* NAME WS* ']' WS* END
//! key-value := WS* KEY WS* '=' WS* VALUE WS* END
//! NAME      := [A-Za-z]+
//! KEY       := [A-Za-z0-9]+
//! VALUE     := (any non-WS byte)+
//! WS        := ' ' | '\t' | '\n' | '\v' | '\f' | '\r'
//! ```
//!
//! Lines that are empty after trimming, or whose first non-whitespace byte
//! is `#`, are [`Line::Blank`].  Everything else must match one of the two
//! productions exactly; there is no quoting or escaping, and a value ends at
//! the first whitespace byte.

/// A classified input line, borrowing from the raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Empty or comment line.
    Blank,
    /// A `[Name]` header.
    Section(&'a str),
    /// A `key=value` pair.
    Entry {
        /// Alphanumeric key.
        key: &'a str,
        /// Whitespace-free value.
        value: &'a str,
    },
}

/// Classify one raw line.
///
/// Returns `None` when the line is neither blank/comment nor a well-formed
/// header or key-value pair.  Lines starting with `[` are only ever tried
/// as headers.
///
/// # Examples
///
/// ```
/// use inicfg::grammar::{Line, classify};
///
/// assert_eq!(classify("  # note\n"), Some(Line::Blank));
/// assert_eq!(classify("[Network]"), Some(Line::Section("Network")));
/// assert_eq!(
///     classify("port = 8080\r\n"),
///     Some(Line::Entry { key: "port", value: "8080" })
/// );
/// assert_eq!(classify("[Net work]"), None);
/// ```
#[must_use]
pub fn classify(line: &str) -> Option<Line<'_>> {
    let mut cursor = Cursor::new(line);
    cursor.skip_ws();
    match cursor.peek() {
        None | Some(b'#') => Some(Line::Blank),
        Some(b'[') => parse_section_header(line).map(Line::Section),
        Some(_) => parse_key_value(line).map(|(key, value)| Line::Entry { key, value }),
    }
}

/// Parse a `[Name]` header, returning the name.
///
/// # Examples
///
/// ```
/// use inicfg::grammar::parse_section_header;
///
/// assert_eq!(parse_section_header(" [ Database ] \n"), Some("Database"));
/// assert_eq!(parse_section_header("[1Section]"), None);
/// assert_eq!(parse_section_header("[Sec]tion]"), None);
/// ```
#[must_use]
pub fn parse_section_header(line: &str) -> Option<&str> {
    let mut cursor = Cursor::new(line);
    cursor.skip_ws();
    cursor.expect(b'[')?;
    cursor.skip_ws();
    let name = cursor.take_while(|b| b.is_ascii_alphabetic())?;
    cursor.skip_ws();
    cursor.expect(b']')?;
    cursor.skip_ws();
    cursor.at_end().then_some(name)
}

/// Parse a `key=value` line, returning `(key, value)`.
///
/// # Examples
///
/// ```
/// use inicfg::grammar::parse_key_value;
///
/// assert_eq!(parse_key_value("host=localhost"), Some(("host", "localhost")));
/// assert_eq!(parse_key_value("  timeout =\t30  "), Some(("timeout", "30")));
/// assert_eq!(parse_key_value("key =value extra"), None);
/// assert_eq!(parse_key_value("my_key=1"), None);
/// ```
#[must_use]
pub fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let mut cursor = Cursor::new(line);
    cursor.skip_ws();
    let key = cursor.take_while(|b| b.is_ascii_alphanumeric())?;
    cursor.skip_ws();
    cursor.expect(b'=')?;
    cursor.skip_ws();
    let value = cursor.take_while(|b| !is_space(b))?;
    cursor.skip_ws();
    cursor.at_end().then_some((key, value))
}

/// Whitespace as the C locale defines it (`isspace`), which unlike
/// [`u8::is_ascii_whitespace`] includes vertical tab.
#[must_use]
pub const fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Whether `name` would be accepted as a section name on load.
#[must_use]
pub fn is_section_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphabetic())
}

/// Whether `key` would be accepted as a key on load.
#[must_use]
pub fn is_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Whether `value` would be accepted as a value on load.
#[must_use]
pub fn is_value(value: &str) -> bool {
    !value.is_empty() && !value.bytes().any(is_space)
}

/// Forward-only cursor over the bytes of one line.
///
/// Every delimiter the grammar inspects is ASCII, so slicing the original
/// `&str` at cursor positions always lands on a char boundary.
struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    const fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(is_space) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, want: u8) -> Option<()> {
        (self.peek() == Some(want)).then(|| self.pos += 1)
    }

    /// Consume one or more bytes matching `pred`; `None` if none matched.
    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> Option<&'a str> {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        if self.pos == start {
            return None;
        }
        self.text.get(start..self.pos)
    }

    const fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // classify
    // -----------------------------------------------------------------------

    #[test]
    fn empty_and_whitespace_lines_are_blank() {
        assert_eq!(classify(""), Some(Line::Blank));
        assert_eq!(classify("\n"), Some(Line::Blank));
        assert_eq!(classify(" \t\r\n"), Some(Line::Blank));
    }

    #[test]
    fn comment_lines_are_blank() {
        assert_eq!(classify("# comment"), Some(Line::Blank));
        assert_eq!(classify("   #[NotASection]"), Some(Line::Blank));
        assert_eq!(classify("#key=value"), Some(Line::Blank));
    }

    #[test]
    fn bracket_lines_are_only_tried_as_headers() {
        assert_eq!(classify("[Main]"), Some(Line::Section("Main")));
        assert_eq!(classify("[a=b]"), None);
    }

    #[test]
    fn other_lines_are_tried_as_entries() {
        assert_eq!(
            classify("a1=b"),
            Some(Line::Entry {
                key: "a1",
                value: "b"
            })
        );
        assert_eq!(classify("Main]"), None);
    }

    // -----------------------------------------------------------------------
    // parse_section_header
    // -----------------------------------------------------------------------

    #[test]
    fn header_simple() {
        assert_eq!(parse_section_header("[Network]"), Some("Network"));
    }

    #[test]
    fn header_whitespace_everywhere() {
        assert_eq!(parse_section_header("\t[\tNetwork \t]\r\n"), Some("Network"));
    }

    #[test]
    fn header_rejects_digit_in_name() {
        assert_eq!(parse_section_header("[1Section]"), None);
        assert_eq!(parse_section_header("[Section1]"), None);
    }

    #[test]
    fn header_rejects_internal_space() {
        assert_eq!(parse_section_header("[Sec tion]"), None);
    }

    #[test]
    fn header_rejects_trailing_garbage() {
        assert_eq!(parse_section_header("[Sec]tion]"), None);
        assert_eq!(parse_section_header("[Sec] # comment"), None);
    }

    #[test]
    fn header_rejects_empty_name() {
        assert_eq!(parse_section_header("[]"), None);
        assert_eq!(parse_section_header("[   ]"), None);
    }

    #[test]
    fn header_rejects_missing_brackets() {
        assert_eq!(parse_section_header("Section]"), None);
        assert_eq!(parse_section_header("[Section"), None);
        assert_eq!(parse_section_header("["), None);
    }

    #[test]
    fn header_rejects_punctuation_and_non_ascii() {
        assert_eq!(parse_section_header("[my_section]"), None);
        assert_eq!(parse_section_header("[Sektion\u{e4}]"), None);
    }

    // -----------------------------------------------------------------------
    // parse_key_value
    // -----------------------------------------------------------------------

    #[test]
    fn kv_simple() {
        assert_eq!(parse_key_value("host=localhost"), Some(("host", "localhost")));
    }

    #[test]
    fn kv_whitespace_around_operator() {
        assert_eq!(parse_key_value(" port \t= 8080 \r\n"), Some(("port", "8080")));
    }

    #[test]
    fn kv_value_may_hold_punctuation_and_equals() {
        assert_eq!(
            parse_key_value("url=http://host:80/a?b=c#d"),
            Some(("url", "http://host:80/a?b=c#d"))
        );
    }

    #[test]
    fn kv_value_may_hold_utf8() {
        assert_eq!(parse_key_value("name=Zo\u{eb}"), Some(("name", "Zo\u{eb}")));
    }

    #[test]
    fn kv_rejects_embedded_space_in_value() {
        assert_eq!(parse_key_value("key =value extra"), None);
        assert_eq!(parse_key_value("greeting=hello world"), None);
    }

    #[test]
    fn kv_rejects_empty_key_or_value() {
        assert_eq!(parse_key_value("=value"), None);
        assert_eq!(parse_key_value("key="), None);
        assert_eq!(parse_key_value("key=   \n"), None);
    }

    #[test]
    fn kv_rejects_non_alphanumeric_key() {
        assert_eq!(parse_key_value("my-key=1"), None);
        assert_eq!(parse_key_value("my key=1"), None);
    }

    #[test]
    fn kv_rejects_missing_operator() {
        assert_eq!(parse_key_value("key value"), None);
        assert_eq!(parse_key_value("key"), None);
    }

    #[test]
    fn vertical_tab_is_whitespace() {
        assert_eq!(parse_key_value("k=v\x0b"), Some(("k", "v")));
        assert_eq!(parse_section_header("\x0c[S]\x0b"), Some("S"));
    }

    // -----------------------------------------------------------------------
    // validators
    // -----------------------------------------------------------------------

    #[test]
    fn validators_match_grammar() {
        assert!(is_section_name("Network"));
        assert!(!is_section_name("Net1"));
        assert!(!is_section_name(""));
        assert!(is_key("port2"));
        assert!(!is_key("port_2"));
        assert!(is_value("a=b,c"));
        assert!(!is_value("a b"));
        assert!(!is_value(""));
    }
}
