//! Field tag parsing.
//!
//! A tag is a comma separated list. The first token is always the name
//! override (empty for none, `-` to ignore the field). Every further token
//! is an option, either a bare flag or a `key:value` pair. Single quotes
//! protect commas and colons inside a value.
//!
//! ```text
//! name,required
//! ,unknown
//! -
//! 'users'
//! title,nowhere,note:'a, b'
//! ```

use std::collections::BTreeMap;

/// Marks a field as required in generated filters.
pub const OPT_REQUIRED: &str = "required";
/// Excludes a field from value decoding.
pub const OPT_NO_DECODE: &str = "nodecode";
/// Excludes a field from generated filters.
pub const OPT_NO_WHERE: &str = "nowhere";
/// Marks the catch-all field receiving unmatched keys.
pub const OPT_UNKNOWN: &str = "unknown";

/// Parsed form of a field tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagOptions {
    name: String,
    options: BTreeMap<String, String>,
}

impl TagOptions {
    /// Parses a tag string.
    pub fn parse(tag: &str) -> Self {
        let mut tokens = split_tokens(tag).into_iter();
        let name = tokens.next().unwrap_or_default();

        let options = tokens
            .filter(|token| !token.is_empty())
            .map(|token| {
                if let Some((key, value)) = split_unquoted(&token, ':') {
                    return (key.trim().to_string(), unquote(value.trim()).to_string());
                }
                (token, String::new())
            })
            .collect();

        TagOptions { name, options }
    }

    /// Returns the raw name token, quotes included.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name override, or `None` when the tag leaves the name empty.
    pub fn rename(&self) -> Option<&str> {
        if self.name.is_empty() {
            None
        } else {
            Some(&self.name)
        }
    }

    /// Returns `true` if the tag marks the field as ignored.
    pub fn is_ignored(&self) -> bool {
        self.name == "-"
    }

    /// Returns `true` if the option is present, with or without a value.
    pub fn has(&self, option: &str) -> bool {
        self.options.contains_key(option)
    }

    /// Returns the value of a `key:value` option.
    pub fn get(&self, option: &str) -> Option<&str> {
        self.options.get(option).map(String::as_str)
    }
}

/// Strips one pair of matching surrounding quotes (`'` or `"`).
pub fn unquote(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'\'' || first == b'"') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

fn split_tokens(tag: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in tag.chars() {
        match c {
            '\'' => {
                quoted = !quoted;
                current.push(c);
            }
            ',' if !quoted => tokens.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    tokens.push(current.trim().to_string());

    tokens
}

fn split_unquoted(token: &str, sep: char) -> Option<(&str, &str)> {
    let mut quoted = false;
    for (i, c) in token.char_indices() {
        match c {
            '\'' => quoted = !quoted,
            c if c == sep && !quoted => return Some((&token[..i], &token[i + c.len_utf8()..])),
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tag() {
        let tag = TagOptions::parse("");
        assert_eq!(tag.name(), "");
        assert_eq!(tag.rename(), None);
        assert!(!tag.is_ignored());
        assert!(!tag.has(OPT_REQUIRED));
    }

    #[test]
    fn name_only() {
        let tag = TagOptions::parse("name");
        assert_eq!(tag.rename(), Some("name"));
    }

    #[test]
    fn name_with_flags() {
        let tag = TagOptions::parse("name,required,nodecode");
        assert_eq!(tag.rename(), Some("name"));
        assert!(tag.has(OPT_REQUIRED));
        assert!(tag.has(OPT_NO_DECODE));
        assert!(!tag.has(OPT_NO_WHERE));
    }

    #[test]
    fn flags_without_name() {
        let tag = TagOptions::parse(",unknown");
        assert_eq!(tag.rename(), None);
        assert!(tag.has(OPT_UNKNOWN));
    }

    #[test]
    fn first_token_is_always_the_name() {
        let tag = TagOptions::parse("required");
        assert_eq!(tag.rename(), Some("required"));
        assert!(!tag.has(OPT_REQUIRED));
    }

    #[test]
    fn ignored_field() {
        assert!(TagOptions::parse("-").is_ignored());
        assert!(!TagOptions::parse("-x").is_ignored());
    }

    #[test]
    fn whitespace_is_trimmed() {
        let tag = TagOptions::parse(" name , nowhere ");
        assert_eq!(tag.rename(), Some("name"));
        assert!(tag.has(OPT_NO_WHERE));
    }

    #[test]
    fn key_value_options() {
        let tag = TagOptions::parse("title,note:'a, b',max:10");
        assert_eq!(tag.get("note"), Some("a, b"));
        assert_eq!(tag.get("max"), Some("10"));
        assert!(tag.has("max"));
        assert_eq!(tag.get("missing"), None);
    }

    #[test]
    fn quoted_name_keeps_quotes() {
        let tag = TagOptions::parse("'users'");
        assert_eq!(tag.name(), "'users'");
        assert_eq!(unquote(tag.name()), "users");
    }

    #[test]
    fn unquote_variants() {
        assert_eq!(unquote("'users'"), "users");
        assert_eq!(unquote("\"users\""), "users");
        assert_eq!(unquote("users"), "users");
        assert_eq!(unquote("'users\""), "'users\"");
        assert_eq!(unquote("'"), "'");
        assert_eq!(unquote(""), "");
    }
}
