//! Text metadata model
//!
//! A keyword seen once holds a [`MetadataValue::Single`]; a keyword seen
//! again is promoted to [`MetadataValue::Multiple`] and keeps every text in
//! the order it was found. Entries iterate in the order their keyword first
//! appeared.

use std::collections::HashMap;
use std::fmt;

/// Text(s) recorded for one keyword
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataValue {
    /// Keyword appeared once
    Single(String),
    /// Keyword appeared two or more times, first to last
    Multiple(Vec<String>),
}

impl MetadataValue {
    /// Add another occurrence, promoting a single value to a sequence
    pub fn push(&mut self, text: String) {
        match self {
            Self::Single(first) => {
                let first = std::mem::take(first);
                *self = Self::Multiple(vec![first, text]);
            }
            Self::Multiple(values) => values.push(text),
        }
    }

    /// The value if the keyword appeared exactly once
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(text) => Some(text),
            Self::Multiple(_) => None,
        }
    }

    /// First recorded text
    pub fn first(&self) -> &str {
        match self {
            Self::Single(text) => text,
            Self::Multiple(values) => values.first().map(String::as_str).unwrap_or_default(),
        }
    }

    /// All recorded texts in encounter order
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Self::Single(text) => std::slice::from_ref(text),
            Self::Multiple(values) => values,
        };
        slice.iter().map(String::as_str)
    }

    /// Number of occurrences
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Multiple(values) => values.len(),
        }
    }

    /// Always false for values built through this API
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the keyword recurred
    pub fn is_multiple(&self) -> bool {
        matches!(self, Self::Multiple(_))
    }
}

/// Joins repeated values with `,`
impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(text) => f.write_str(text),
            Self::Multiple(values) => f.write_str(&values.join(",")),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(text: &str) -> Self {
        Self::Single(text.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(text: String) -> Self {
        Self::Single(text)
    }
}

impl From<Vec<&str>> for MetadataValue {
    /// Builds `Single` for one element and `Multiple` otherwise
    ///
    /// `texts` must not be empty.
    fn from(mut texts: Vec<&str>) -> Self {
        debug_assert!(!texts.is_empty(), "a metadata value holds at least one text");
        if texts.len() == 1 {
            Self::Single(texts.remove(0).to_string())
        } else {
            Self::Multiple(texts.into_iter().map(str::to_string).collect())
        }
    }
}

/// One keyword and its text(s)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    /// Keyword (text before the first NUL of a `tEXt` payload)
    pub key: String,
    /// Text(s) recorded for the keyword
    pub value: MetadataValue,
}

/// Ordered keyword to text(s) mapping
#[derive(Debug, Clone, Default)]
pub struct MetadataMap {
    entries: Vec<MetadataEntry>,
    index: HashMap<String, usize>,
}

impl MetadataMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one `keyword`/`text` pair
    ///
    /// A new keyword is appended; an existing one keeps its position and
    /// gains the text as a further occurrence.
    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        let key = key.into();
        let text = text.into();
        match self.index.get(&key) {
            Some(&idx) => self.entries[idx].value.push(text),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push(MetadataEntry {
                    key,
                    value: MetadataValue::Single(text),
                });
            }
        }
    }

    /// Look up a keyword
    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.index.get(key).map(|&idx| &self.entries[idx].value)
    }

    /// Check for a keyword
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Number of distinct keywords
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no text chunk was found
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-seen order
    pub fn entries(&self) -> &[MetadataEntry] {
        &self.entries
    }

    /// Iterate `(key, value)` pairs in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetadataValue)> {
        self.entries.iter().map(|e| (e.key.as_str(), &e.value))
    }

    /// Keywords in first-seen order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }
}

impl PartialEq for MetadataMap {
    fn eq(&self, other: &Self) -> bool {
        // The index is derived from the entries
        self.entries == other.entries
    }
}

impl Eq for MetadataMap {}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MetadataMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, text) in iter {
            map.insert(key, text);
        }
        map
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for MetadataMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, text) in iter {
            self.insert(key, text);
        }
    }
}

impl IntoIterator for MetadataMap {
    type Item = MetadataEntry;
    type IntoIter = std::vec::IntoIter<MetadataEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a MetadataMap {
    type Item = &'a MetadataEntry;
    type IntoIter = std::slice::Iter<'a, MetadataEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::{MetadataMap, MetadataValue};
    use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

    impl Serialize for MetadataValue {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Self::Single(text) => serializer.serialize_str(text),
                Self::Multiple(values) => {
                    let mut seq = serializer.serialize_seq(Some(values.len()))?;
                    for value in values {
                        seq.serialize_element(value)?;
                    }
                    seq.end()
                }
            }
        }
    }

    impl Serialize for MetadataMap {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (key, value) in self.iter() {
                map.serialize_entry(key, value)?;
            }
            map.end()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_occurrence() {
        let mut map = MetadataMap::new();
        map.insert("Author", "Alice");
        assert_eq!(map.get("Author"), Some(&MetadataValue::from("Alice")));
        assert_eq!(map.get("Author").unwrap().as_single(), Some("Alice"));
    }

    #[test]
    fn test_repeated_keys_promote_in_order() {
        let mut map = MetadataMap::new();
        map.insert("Lora", "X");
        map.insert("Lora", "Y");
        map.insert("Lora", "Z");

        assert_eq!(map.len(), 1);
        let value = map.get("Lora").unwrap();
        assert!(value.is_multiple());
        assert_eq!(value.values().collect::<Vec<_>>(), vec!["X", "Y", "Z"]);
        assert_eq!(value.first(), "X");
    }

    #[test]
    fn test_empty_first_value_is_not_overwritten() {
        let mut map = MetadataMap::new();
        map.insert("Comment", "");
        map.insert("Comment", "later");
        assert_eq!(
            map.get("Comment"),
            Some(&MetadataValue::Multiple(vec![String::new(), "later".into()]))
        );
    }

    #[test]
    fn test_keys_keep_first_seen_order() {
        let map: MetadataMap = [("b", "1"), ("a", "2"), ("b", "3"), ("c", "4")]
            .into_iter()
            .collect();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_display_joins_with_comma() {
        assert_eq!(MetadataValue::from(vec!["X", "Y"]).to_string(), "X,Y");
        assert_eq!(MetadataValue::from("X").to_string(), "X");
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "at least one text")]
    fn test_empty_vec_is_rejected() {
        let _ = MetadataValue::from(Vec::<&str>::new());
    }

    #[test]
    fn test_from_vec_sizes() {
        assert_eq!(MetadataValue::from(vec!["X"]), MetadataValue::from("X"));
        let value = MetadataValue::from(vec!["X", "Y"]);
        assert_eq!(value.len(), 2);
        assert!(!value.is_empty());
    }

    #[test]
    fn test_equality_ignores_index_layout() {
        let a: MetadataMap = [("k", "v")].into_iter().collect();
        let mut b = MetadataMap::new();
        b.extend([("k", "v")]);
        assert_eq!(a, b);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serializes_as_string_or_array() {
        let map: MetadataMap = [("Steps", "20"), ("Lora", "X"), ("Lora", "Y")]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"Steps":"20","Lora":["X","Y"]}"#);
    }
}
