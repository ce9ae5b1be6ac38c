//! Decoded value model
//!
//! The structure loader evaluates a data-defining script into these types.
//! They mirror the host language's ordered arrays: a single ordered map whose
//! keys are either integers or strings, where positional values receive
//! auto-incremented integer keys.

use indexmap::IndexMap;
use std::fmt;

/// Key of an ordered array entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArrayKey {
    /// Integer key (also produced for positional entries)
    Int(i64),
    /// String key
    Str(String),
}

impl ArrayKey {
    /// Build a key from a string, normalising canonical decimal integers
    ///
    /// `"5"` and `"-12"` become integer keys, while `"05"`, `"+5"` and `"-0"`
    /// stay strings, matching how the host language stores array keys.
    #[must_use]
    pub fn from_string(key: &str) -> Self {
        if is_canonical_int(key)
            && let Ok(n) = key.parse::<i64>()
        {
            return ArrayKey::Int(n);
        }
        ArrayKey::Str(key.to_string())
    }
}

fn is_canonical_int(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    if digits == "0" {
        return !s.starts_with('-');
    }
    !digits.starts_with('0')
}

impl From<&str> for ArrayKey {
    fn from(key: &str) -> Self {
        Self::from_string(key)
    }
}

impl From<i64> for ArrayKey {
    fn from(key: i64) -> Self {
        ArrayKey::Int(key)
    }
}

impl fmt::Display for ArrayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayKey::Int(n) => write!(f, "{n}"),
            ArrayKey::Str(s) => f.write_str(s),
        }
    }
}

/// A decoded value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// String literal (escapes already decoded)
    Str(String),
    /// Array literal
    Array(Collection),
    /// Expression the loader does not evaluate, kept as raw source text
    Opaque(String),
}

impl Value {
    /// Borrow the string content, if this is a string
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the collection, if this is an array
    #[must_use]
    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Value::Array(c) => Some(c),
            _ => None,
        }
    }

    /// Short type name used in diagnostics
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Opaque(_) => "expression",
        }
    }

    /// Convert to JSON for display
    ///
    /// Arrays whose keys are exactly `0..n` become JSON arrays, every other
    /// array becomes an object. Opaque expressions render as their source text.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(n) => Json::from(*n),
            Value::Float(f) => serde_json::Number::from_f64(*f).map_or(Json::Null, Json::Number),
            Value::Str(s) | Value::Opaque(s) => Json::String(s.clone()),
            Value::Array(c) if c.is_list() => Json::Array(c.values().map(Value::to_json).collect()),
            Value::Array(c) => Json::Object(
                c.iter()
                    .map(|(k, v)| (k.to_string(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

/// An ordered array: the decoded form of an array literal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    entries: IndexMap<ArrayKey, Value>,
    next_index: i64,
}

impl Collection {
    /// Create an empty collection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional value under the next integer key
    pub fn push(&mut self, value: Value) {
        let index = self.next_index;
        self.entries.insert(ArrayKey::Int(index), value);
        self.next_index = index.saturating_add(1);
    }

    /// Insert a keyed value
    ///
    /// An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, key: ArrayKey, value: Value) {
        if let ArrayKey::Int(n) = key
            && n >= self.next_index
        {
            self.next_index = n.saturating_add(1);
        }
        self.entries.insert(key, value);
    }

    /// Look up a value by key
    #[must_use]
    pub fn get(&self, key: &ArrayKey) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Look up a value by a string key (numeric strings address integer keys)
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&Value> {
        self.get(&ArrayKey::from_string(key))
    }

    /// Whether any value of this collection is the string `needle`
    #[must_use]
    pub fn contains_string(&self, needle: &str) -> bool {
        self.entries.values().any(|v| v.as_str() == Some(needle))
    }

    /// The last entry in insertion order
    #[must_use]
    pub fn last(&self) -> Option<(&ArrayKey, &Value)> {
        self.entries.last()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&ArrayKey, &Value)> {
        self.entries.iter()
    }

    /// Iterate over values in insertion order
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }

    /// Whether the keys are exactly `0, 1, 2, ...` in order
    #[must_use]
    pub fn is_list(&self) -> bool {
        self.entries
            .keys()
            .zip(0_i64..)
            .all(|(k, i)| *k == ArrayKey::Int(i))
    }

    /// Resolve a dotted key path
    ///
    /// The whole path is first tried as a literal key (so `"app.providers"`
    /// can address a key that itself contains dots); otherwise each
    /// `.`-separated segment descends one level. Returns `None` on the first
    /// missing segment or when a segment would descend into a non-array.
    #[must_use]
    pub fn lookup(&self, key_path: &str) -> Option<&Value> {
        if let Some(value) = self.get_str(key_path)
            && *value != Value::Null
        {
            return Some(value);
        }

        let mut segments = key_path.split('.');
        let first = segments.next()?;
        let mut current = self.get_str(first)?;
        for segment in segments {
            current = current.as_collection()?.get_str(segment)?;
        }
        Some(current)
    }
}

impl FromIterator<(ArrayKey, Value)> for Collection {
    fn from_iter<I: IntoIterator<Item = (ArrayKey, Value)>>(iter: I) -> Self {
        let mut collection = Collection::new();
        for (key, value) in iter {
            collection.insert(key, value);
        }
        collection
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    fn strings(values: &[&str]) -> Collection {
        let mut c = Collection::new();
        for v in values {
            c.push(Value::Str((*v).to_string()));
        }
        c
    }

    #[test]
    fn test_array_key_normalisation() {
        assert_eq!(ArrayKey::from_string("5"), ArrayKey::Int(5));
        assert_eq!(ArrayKey::from_string("-12"), ArrayKey::Int(-12));
        assert_eq!(ArrayKey::from_string("0"), ArrayKey::Int(0));
        assert_eq!(ArrayKey::from_string("05"), ArrayKey::Str("05".into()));
        assert_eq!(ArrayKey::from_string("-0"), ArrayKey::Str("-0".into()));
        assert_eq!(ArrayKey::from_string("+5"), ArrayKey::Str("+5".into()));
        assert_eq!(ArrayKey::from_string("a"), ArrayKey::Str("a".into()));
        assert_eq!(
            ArrayKey::from_string("99999999999999999999"),
            ArrayKey::Str("99999999999999999999".into())
        );
    }

    #[test]
    fn test_push_continues_after_highest_int_key() {
        let mut c = Collection::new();
        c.insert(ArrayKey::Int(7), Value::Str("a".into()));
        c.push(Value::Str("b".into()));
        assert_eq!(c.get(&ArrayKey::Int(8)), Some(&Value::Str("b".into())));
    }

    #[test]
    fn test_insert_existing_key_keeps_position() {
        let mut c = Collection::new();
        c.insert(ArrayKey::from("a"), Value::Int(1));
        c.insert(ArrayKey::from("b"), Value::Int(2));
        c.insert(ArrayKey::from("a"), Value::Int(3));
        let keys: Vec<_> = c.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(c.get_str("a"), Some(&Value::Int(3)));
    }

    #[test]
    fn test_contains_string_and_last() {
        let c = strings(&["App\\Foo", "App\\Bar"]);
        assert!(c.contains_string("App\\Foo"));
        assert!(!c.contains_string("App\\Baz"));
        assert_eq!(c.last().unwrap().1.as_str(), Some("App\\Bar"));
    }

    #[test]
    fn test_lookup_nested_path() {
        let mut inner = Collection::new();
        inner.insert(ArrayKey::from("providers"), Value::Array(strings(&["A"])));
        let mut root = Collection::new();
        root.insert(ArrayKey::from("app"), Value::Array(inner));

        let found = root.lookup("app.providers").unwrap();
        assert_eq!(found.as_collection().unwrap().len(), 1);
        assert!(root.lookup("app.missing").is_none());
        assert!(root.lookup("app.providers.0.deeper").is_none());
    }

    #[test]
    fn test_lookup_prefers_literal_dotted_key() {
        let mut root = Collection::new();
        root.insert(ArrayKey::from("a.b"), Value::Str("literal".into()));
        let mut a = Collection::new();
        a.insert(ArrayKey::from("b"), Value::Str("nested".into()));
        root.insert(ArrayKey::from("a"), Value::Array(a));

        assert_eq!(root.lookup("a.b").unwrap().as_str(), Some("literal"));
    }

    #[test]
    fn test_to_json_list_and_map() {
        let list = Value::Array(strings(&["x", "y"]));
        assert_eq!(list.to_json(), serde_json::json!(["x", "y"]));

        let mut map = Collection::new();
        map.insert(ArrayKey::from("b"), Value::Int(1));
        map.insert(ArrayKey::from("a"), Value::Bool(true));
        let json = Value::Array(map).to_json();
        assert_eq!(json, serde_json::json!({"b": 1, "a": true}));
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }
}
