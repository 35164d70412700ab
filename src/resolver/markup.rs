//! Minimal start-tag scanning for the embed page.
//!
//! The page is small and its markers are plain attributes, so tags are
//! matched with regexes rather than a full HTML parser.

use std::sync::LazyLock;

use regex::Regex;

/// Compiles a regex at static init; panics on invalid pattern.
fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

// Quoted attribute values may contain `>`; a stray quote falls back to a plain character.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(r#"(?is)<([a-z][a-z0-9-]*)((?:\s(?:"[^"]*"|'[^']*'|[^>])*)?)>"#)
});
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(
        r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#,
    )
});

/// A start tag with its attributes in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Tag {
    /// Lowercased element name.
    pub name: String,
    /// `(lowercased key, raw value)` pairs.
    pub attrs: Vec<(String, String)>,
}

impl Tag {
    /// Value of the first attribute named `key` (case-insensitive).
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// True if attribute `key` exists and equals `value` exactly.
    pub fn has_attr(&self, key: &str, value: &str) -> bool {
        self.attr(key) == Some(value)
    }
}

/// Collects all start tags of `html`.
pub(crate) fn collect_tags(html: &str) -> Vec<Tag> {
    TAG_RE
        .captures_iter(html)
        .map(|caps| {
            let name = caps
                .get(1)
                .map_or("", |m| m.as_str())
                .to_ascii_lowercase();
            let attrs = caps
                .get(2)
                .map(|m| parse_attrs(m.as_str()))
                .unwrap_or_default();
            Tag { name, attrs }
        })
        .collect()
}

fn parse_attrs(raw: &str) -> Vec<(String, String)> {
    ATTR_RE
        .captures_iter(raw)
        .map(|attr| {
            let key = attr
                .get(1)
                .map_or("", |m| m.as_str())
                .to_ascii_lowercase();
            let value = attr
                .get(2)
                .or_else(|| attr.get(3))
                .or_else(|| attr.get(4))
                .map_or("", |m| m.as_str())
                .to_string();
            (key, value)
        })
        .collect()
}

/// Decodes named and numeric character references once, then trims.
pub(crate) fn decode_entities(value: &str) -> String {
    html_escape::decode_html_entities(value).trim().to_string()
}
