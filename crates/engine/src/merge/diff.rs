//! Entry diff and rendering

use super::anchor::EscapeStyle;
use hookmerge_core::{Collection, Entry};

/// Entries of `requested` missing from `previous`, in request order
///
/// Positional entries are matched by value against every string value of
/// `previous`; keyed entries by key only, so an existing value is never
/// overwritten, even when it is `null`. A request repeated within
/// `requested` is appended once.
#[must_use]
pub fn compute_append(requested: &[Entry], previous: &Collection) -> Vec<Entry> {
    let mut append: Vec<Entry> = Vec::new();

    for entry in requested {
        let missing = match entry {
            Entry::Positional(value) => {
                !previous.contains_string(value)
                    && !append
                        .iter()
                        .any(|e| matches!(e, Entry::Positional(v) if v == value))
            }
            Entry::Keyed { key, .. } => {
                previous.get_str(key).is_none()
                    && !append.iter().any(|e| e.key() == Some(key.as_str()))
            }
        };

        if missing {
            append.push(entry.clone());
        }
    }

    append
}

/// Render an entry as source text
#[must_use]
pub fn render_entry(entry: &Entry, style: EscapeStyle) -> String {
    match entry {
        Entry::Positional(value) => quote(value, style),
        Entry::Keyed { key, value } => format!("{} => {}", quote(key, style), quote(value, style)),
    }
}

/// Quote a string as a single-quoted literal
///
/// In [`EscapeStyle::Single`] a lone backslash is kept as is where it cannot
/// start an escape sequence, so `App\Foo` stays `'App\Foo'`.
#[must_use]
pub fn quote(value: &str, style: EscapeStyle) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');

    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let mut run = 1;
                while chars.peek() == Some(&'\\') {
                    chars.next();
                    run += 1;
                }
                let escape = match style {
                    EscapeStyle::Double => true,
                    EscapeStyle::Single => {
                        run > 1 || matches!(chars.peek(), None | Some('\''))
                    }
                };
                let width = if escape { run * 2 } else { run };
                out.extend(std::iter::repeat_n('\\', width));
            }
            '\'' => out.push_str("\\'"),
            c => out.push(c),
        }
    }

    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use hookmerge_core::{ArrayKey, Value};

    fn list(values: &[&str]) -> Collection {
        let mut c = Collection::new();
        for v in values {
            c.push(Value::Str((*v).to_string()));
        }
        c
    }

    #[test]
    fn test_positional_diff() {
        let previous = list(&["App\\Foo", "App\\Bar"]);
        let requested = vec![Entry::positional("App\\Bar"), Entry::positional("App\\Baz")];
        assert_eq!(
            compute_append(&requested, &previous),
            vec![Entry::positional("App\\Baz")]
        );
    }

    #[test]
    fn test_keyed_diff_keeps_null_values() {
        let previous: Collection = [
            (ArrayKey::from("a"), Value::Null),
            (ArrayKey::from("b"), Value::Str("Y".into())),
        ]
        .into_iter()
        .collect();
        let requested = vec![Entry::keyed("a", "X"), Entry::keyed("c", "W")];
        assert_eq!(
            compute_append(&requested, &previous),
            vec![Entry::keyed("c", "W")]
        );
    }

    #[test]
    fn test_keyed_diff_does_not_overwrite() {
        let previous: Collection = [
            (ArrayKey::from("a"), Value::Str("X".into())),
            (ArrayKey::from("b"), Value::Str("Y".into())),
        ]
        .into_iter()
        .collect();
        let requested = vec![Entry::keyed("b", "Z"), Entry::keyed("c", "W")];
        assert_eq!(
            compute_append(&requested, &previous),
            vec![Entry::keyed("c", "W")]
        );
    }

    #[test]
    fn test_keyed_diff_normalises_numeric_keys() {
        let previous = list(&["zero"]);
        let requested = vec![Entry::keyed("0", "other"), Entry::keyed("1", "one")];
        assert_eq!(
            compute_append(&requested, &previous),
            vec![Entry::keyed("1", "one")]
        );
    }

    #[test]
    fn test_duplicates_appended_once() {
        let previous = list(&["A"]);
        let requested = vec![
            Entry::positional("B"),
            Entry::keyed("k", "1"),
            Entry::positional("B"),
            Entry::keyed("k", "2"),
        ];
        assert_eq!(
            compute_append(&requested, &previous),
            vec![Entry::positional("B"), Entry::keyed("k", "1")]
        );
    }

    #[test]
    fn test_order_follows_request() {
        let previous = list(&["A"]);
        let requested = vec![
            Entry::positional("C"),
            Entry::positional("A"),
            Entry::positional("B"),
        ];
        assert_eq!(
            compute_append(&requested, &previous),
            vec![Entry::positional("C"), Entry::positional("B")]
        );
    }

    #[test]
    fn test_quote_single_style() {
        assert_eq!(quote("App\\Baz", EscapeStyle::Single), "'App\\Baz'");
        assert_eq!(quote("a\\\\b", EscapeStyle::Single), "'a\\\\\\\\b'");
        assert_eq!(quote("trail\\", EscapeStyle::Single), "'trail\\\\'");
        assert_eq!(quote("it's", EscapeStyle::Single), "'it\\'s'");
        assert_eq!(quote("a\\'b", EscapeStyle::Single), "'a\\\\\\'b'");
    }

    #[test]
    fn test_quote_double_style() {
        assert_eq!(quote("App\\Baz", EscapeStyle::Double), "'App\\\\Baz'");
        assert_eq!(quote("plain", EscapeStyle::Double), "'plain'");
    }

    #[test]
    fn test_render_entry() {
        assert_eq!(
            render_entry(&Entry::positional("App\\Baz"), EscapeStyle::Double),
            "'App\\\\Baz'"
        );
        assert_eq!(
            render_entry(&Entry::keyed("c", "W"), EscapeStyle::Single),
            "'c' => 'W'"
        );
    }
}
