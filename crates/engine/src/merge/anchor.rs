//! Insertion point search
//!
//! The anchor is the last entry currently decoded from the collection. Its
//! textual occurrence is located with a small set of candidate encodings,
//! tried in priority order; within the first encoding that matches at all, the
//! rightmost match wins.

use regex::Regex;
use std::fmt;

/// A textual form under which a decoded string can appear in source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorEncoding {
    /// Single- or double-quoted literal, one or two escape characters
    /// between namespace components
    Quoted,
    /// `Name::class` reference
    ClassConstant,
}

impl AnchorEncoding {
    /// Encodings in the order they are tried
    pub const PRIORITY: [AnchorEncoding; 2] = [AnchorEncoding::Quoted, AnchorEncoding::ClassConstant];

    /// Build the search pattern for `anchor`, if this encoding can express it
    fn pattern(self, anchor: &str) -> Option<String> {
        let components: Vec<&str> = anchor.split('\\').collect();

        match self {
            AnchorEncoding::Quoted => {
                let body = components
                    .iter()
                    .map(|c| regex::escape(c))
                    .collect::<Vec<_>>()
                    .join(r"\\{1,2}");
                // A quote matching the delimiter is written escaped
                let single = body.replace('\'', r"\\?'");
                let double = body.replace('"', r#"\\?""#);
                Some(format!(r#"(?P<lit>'{single}'|"{double}"){TAIL}"#))
            }
            AnchorEncoding::ClassConstant => {
                if !components.iter().all(|c| is_identifier(c)) {
                    return None;
                }
                let body = components.join(r"\\");
                Some(format!(
                    r"(?m)(?:^|[^\w\\$])(?P<lit>\\?{body}(?i:::class)){TAIL}"
                ))
            }
        }
    }
}

impl fmt::Display for AnchorEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorEncoding::Quoted => f.write_str("quoted"),
            AnchorEncoding::ClassConstant => f.write_str("class constant"),
        }
    }
}

/// Optional separator, horizontal whitespace, then at least one line break
const TAIL: &str = r"(?P<sep>[ \t]*,)?[ \t]*(?P<eol>\r?\n)(?:\r?\n)*";

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}

/// How namespace separators are escaped in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapeStyle {
    /// `'App\Foo'`
    #[default]
    Single,
    /// `'App\\Foo'`
    Double,
}

/// Where and how to insert new entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionPoint {
    /// Byte offset right after the anchor literal and its trailing separator
    pub offset: usize,
    /// Encoding that matched
    pub encoding: AnchorEncoding,
    /// Escape style observed on the anchor
    pub escape: EscapeStyle,
    /// Leading whitespace of the anchor's line
    pub indent: String,
    /// Line break following the anchor
    pub line_ending: &'static str,
}

/// Locate the insertion point for entries following `anchor`
///
/// Returns `None` when no encoding matches.
#[must_use]
pub fn find_insertion_point(
    anchor: &str,
    source: &str,
    encodings: &[AnchorEncoding],
) -> Option<InsertionPoint> {
    encodings
        .iter()
        .find_map(|&encoding| find_with(encoding, anchor, source))
}

fn find_with(encoding: AnchorEncoding, anchor: &str, source: &str) -> Option<InsertionPoint> {
    let pattern = encoding.pattern(anchor)?;
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            tracing::warn!(%encoding, error = %e, "Cannot build anchor pattern");
            return None;
        }
    };

    let caps = re.captures_iter(source).last()?;
    let lit = caps.name("lit")?;
    let offset = caps.name("sep").map_or(lit.end(), |m| m.end());
    let line_ending = match caps.name("eol") {
        Some(m) if m.as_str().starts_with('\r') => "\r\n",
        _ => "\n",
    };

    let escape = if encoding == AnchorEncoding::Quoted && lit.as_str().contains(r"\\") {
        EscapeStyle::Double
    } else {
        EscapeStyle::Single
    };

    Some(InsertionPoint {
        offset,
        encoding,
        escape,
        indent: line_indent(source, lit.start()),
        line_ending,
    })
}

fn line_indent(source: &str, at: usize) -> String {
    let line_start = source[..at].rfind('\n').map_or(0, |i| i + 1);
    source[line_start..]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect()
}
