//! Field and struct annotations.
//!
//! A [`Tag`] is an ordered map from tag key to the raw tag string. Tags are
//! written in the conventional space-separated `key:"value"` form:
//!
//! ```text
//! vm:"id" json:"identifier,omitempty"
//! ```
//!
//! Values are kept verbatim (after unquoting) and never coerced. A key present
//! with an empty value (`vm:""`) is distinct from an absent key.
//!
//! ## Examples
//!
//! ```rust
//! use structmeta::Tag;
//!
//! let tag = Tag::parse(r#"vm:"" json:"name,omitempty""#);
//! assert_eq!(tag.get("vm"), Some(""));
//! assert_eq!(tag.get("json"), Some("name,omitempty"));
//! assert_eq!(tag.get("db"), None);
//! ```

use indexmap::IndexMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

const LOG_TARGET: &str = "tag";

/// An ordered map of tag keys to raw tag values.
///
/// Lookups are total: an absent key yields `None`, never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag(IndexMap<String, String>);

impl Tag {
    /// Creates an empty `Tag`.
    #[must_use]
    pub fn new() -> Self {
        Tag(IndexMap::new())
    }

    /// Parses a `key:"value" key2:"value2"` annotation.
    ///
    /// Values are quoted strings with the usual escapes (`\n`, `\"`, `\x41`,
    /// `\u00e9`, octal `\101`, ...), decoded on parse. Parsing stops at the
    /// first malformed entry, including a value with an invalid escape; entries
    /// before it are kept. When a key repeats, the first occurrence wins.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use structmeta::Tag;
    ///
    /// let tag = Tag::parse(r#"vm:"true" vm:"false" broken"#);
    /// assert_eq!(tag.get("vm"), Some("true"));
    /// assert_eq!(tag.len(), 1);
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut tag = Tag::new();
        let mut rest = raw;

        loop {
            rest = rest.trim_start_matches(' ');
            if rest.is_empty() {
                break;
            }

            let key_len = rest
                .find(|c: char| c <= ' ' || c == ':' || c == '"' || c == '\u{7f}')
                .unwrap_or(rest.len());
            if key_len == 0 || !rest[key_len..].starts_with(":\"") {
                log::debug!(
                    target: LOG_TARGET,
                    "stopping tag parse at malformed entry: {:?}",
                    rest
                );
                break;
            }
            let key = &rest[..key_len];
            rest = &rest[key_len + 2..];

            let Some((value, remaining)) = unquote(rest) else {
                log::debug!(target: LOG_TARGET, "invalid value for tag key {:?}", key);
                break;
            };
            rest = remaining;

            tag.0.entry(key.to_string()).or_insert(value);
        }

        tag
    }

    /// Inserts a key-value pair, returning the previous value for that key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns the raw value stored under `key`, if the key is present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns the value under `key` only if it is present and non-empty.
    #[must_use]
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    /// Returns `true` if `key` is present, even with an empty value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns `true` if the value under `key` equals `expected` exactly.
    #[must_use]
    pub fn is(&self, key: &str, expected: &str) -> bool {
        self.get(key) == Some(expected)
    }

    /// Returns the first non-empty value among `keys`.
    pub fn first_non_empty<I>(&self, keys: I) -> Option<&str>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        keys.into_iter()
            .find_map(|key| self.get_non_empty(key.as_ref()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys, in declaration order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, String> {
        self.0.keys()
    }

    /// Returns an iterator over the key-value pairs, in declaration order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, String> {
        self.0.iter()
    }
}

// Reads a quoted value up to its closing quote and decodes escapes. Returns
// `None` for an unterminated value or an invalid escape.
fn unquote(input: &str) -> Option<(String, &str)> {
    let mut value = String::new();
    let mut chars = input.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Some((value, &input[i + 1..])),
            '\n' => return None,
            '\\' => {
                let (_, escaped) = chars.next()?;
                let decoded = match escaped {
                    'a' => '\u{7}',
                    'b' => '\u{8}',
                    'f' => '\u{c}',
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    'v' => '\u{b}',
                    '\\' | '"' | '\'' => escaped,
                    'x' => ascii(hex_digits(&mut chars, 2)?)?,
                    'u' => char::from_u32(hex_digits(&mut chars, 4)?)?,
                    'U' => char::from_u32(hex_digits(&mut chars, 8)?)?,
                    '0'..='7' => {
                        let mut code = escaped.to_digit(8)?;
                        for _ in 0..2 {
                            let (_, digit) = chars.next()?;
                            code = code * 8 + digit.to_digit(8)?;
                        }
                        ascii(code)?
                    }
                    _ => return None,
                };
                value.push(decoded);
            }
            other => value.push(other),
        }
    }

    None
}

fn hex_digits(chars: &mut std::str::CharIndices<'_>, count: usize) -> Option<u32> {
    let mut code = 0u32;
    for _ in 0..count {
        let (_, digit) = chars.next()?;
        code = code * 16 + digit.to_digit(16)?;
    }
    Some(code)
}

// Byte escapes must stay within ASCII so the value remains valid UTF-8.
fn ascii(code: u32) -> Option<char> {
    u8::try_from(code)
        .ok()
        .filter(u8::is_ascii)
        .map(char::from)
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}:\"", key)?;
            for c in value.chars() {
                match c {
                    '"' => f.write_str("\\\"")?,
                    '\\' => f.write_str("\\\\")?,
                    '\n' => f.write_str("\\n")?,
                    '\r' => f.write_str("\\r")?,
                    '\t' => f.write_str("\\t")?,
                    c if c.is_ascii_control() => write!(f, "\\x{:02x}", u32::from(c))?,
                    c => write!(f, "{}", c)?,
                }
            }
            f.write_str("\"")?;
        }
        Ok(())
    }
}

impl FromStr for Tag {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Tag::parse(s))
    }
}

impl From<&str> for Tag {
    fn from(raw: &str) -> Self {
        Tag::parse(raw)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tag {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut tag = Tag::new();
        for (key, value) in iter {
            tag.0.entry(key.into()).or_insert(value.into());
        }
        tag
    }
}

impl<'a> IntoIterator for &'a Tag {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multiple_keys() {
        let tag = Tag::parse(r#"vm:"true" json:"boolvalue""#);
        assert_eq!(tag.len(), 2);
        assert_eq!(tag.get("vm"), Some("true"));
        assert_eq!(tag.get("json"), Some("boolvalue"));
        let keys: Vec<_> = tag.keys().cloned().collect();
        assert_eq!(keys, vec!["vm", "json"]);
    }

    #[test]
    fn test_empty_value_is_present() {
        let tag = Tag::parse(r#"vm:"""#);
        assert!(tag.contains_key("vm"));
        assert_eq!(tag.get("vm"), Some(""));
        assert_eq!(tag.get_non_empty("vm"), None);
        assert!(!tag.contains_key("json"));
    }

    #[test]
    fn test_escapes_and_spacing() {
        let tag = Tag::parse(r#"  a:"x\"y"   b:"tab\there" "#);
        assert_eq!(tag.get("a"), Some("x\"y"));
        assert_eq!(tag.get("b"), Some("tab\there"));
    }

    #[test]
    fn test_numeric_escapes_are_decoded() {
        let tag = Tag::parse(r#"a:"a\x41b" b:"caf\u00e9" c:"\101\102" d:"\U0001F600""#);
        assert_eq!(tag.get("a"), Some("aAb"));
        assert_eq!(tag.get("b"), Some("café"));
        assert_eq!(tag.get("c"), Some("AB"));
        assert_eq!(tag.get("d"), Some("\u{1F600}"));
    }

    #[test]
    fn test_invalid_escape_stops_parse() {
        let tag = Tag::parse(r#"vm:"ok" json:"a\qb" db:"x""#);
        assert_eq!(tag.len(), 1);
        assert_eq!(tag.get("vm"), Some("ok"));
        assert!(!tag.contains_key("json"));

        assert!(Tag::parse(r#"vm:"\x4""#).is_empty());
        assert!(Tag::parse(r#"vm:"\xff""#).is_empty());
        assert!(Tag::parse(r#"vm:"\ud800""#).is_empty());
    }

    #[test]
    fn test_malformed_stops_parse() {
        assert!(Tag::parse("vm").is_empty());
        assert!(Tag::parse(r#":"x""#).is_empty());
        let tag = Tag::parse(r#"vm:"ok" json:"unterminated"#);
        assert_eq!(tag.len(), 1);
        assert_eq!(tag.get("vm"), Some("ok"));
    }

    #[test]
    fn test_first_non_empty_skips_empty_values() {
        let tag = Tag::parse(r#"vm:"" db:"" json:"name""#);
        assert_eq!(tag.first_non_empty(["vm", "db", "json"]), Some("name"));
        assert_eq!(tag.first_non_empty(["vm", "db"]), None);
        assert_eq!(tag.first_non_empty(Vec::<String>::new()), None);
    }

    #[test]
    fn test_display_reparses() {
        let tag: Tag = [("vm", "id"), ("json", "a,b")].into_iter().collect();
        assert_eq!(tag.to_string(), r#"vm:"id" json:"a,b""#);
        assert_eq!(Tag::parse(&tag.to_string()), tag);
    }

    #[test]
    fn test_display_escapes_reparse() {
        let tag: Tag = [("a", "q\"b\\c"), ("b", "line\nbell\u{7}"), ("c", "café")]
            .into_iter()
            .collect();
        assert_eq!(Tag::parse(&tag.to_string()), tag);
    }
}
