//! Query maps built from key/value pairs or raw search strings.
//!
//! A [`Query`] is an explicit empty mapping: it has no entries beyond the
//! ones inserted, so keys such as `constructor` or `__proto__` are plain
//! data like any other.

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};

/// Value stored under a query key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Single(String),
    Multiple(Vec<String>),
}

impl QueryValue {
    /// First value, whether single or repeated.
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::Multiple(values) => values.first().map(String::as_str),
        }
    }

    fn append(&mut self, value: String) {
        match self {
            Self::Single(existing) => {
                let first = std::mem::take(existing);
                *self = Self::Multiple(vec![first, value]);
            }
            Self::Multiple(values) => values.push(value),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multiple(values)
    }
}

/// Ordered key/value mapping for query parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query {
    entries: BTreeMap<String, QueryValue>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw search string such as `?a=1&a=2&b`.
    ///
    /// Keys and values are percent-decoded with `+` read as a space.
    /// Repeated keys collect into [`QueryValue::Multiple`].
    pub fn from_search(search: &str) -> Self {
        let mut query = Self::new();
        let trimmed = search.strip_prefix('?').unwrap_or(search);
        for pair in trimmed.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            query.append(decode_component(key), decode_component(value));
        }
        query
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Add a value, turning an existing single value into a list.
    pub fn append(&mut self, key: String, value: String) {
        match self.entries.get_mut(&key) {
            Some(existing) => existing.append(value),
            None => {
                self.entries.insert(key, QueryValue::Single(value));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, QueryValue> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Query {
    type Item = (&'a String, &'a QueryValue);
    type IntoIter = btree_map::Iter<'a, String, QueryValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Build a [`Query`] from key/value pairs. Later duplicates overwrite.
pub fn create_query<K, V, I>(props: I) -> Query
where
    K: Into<String>,
    V: Into<QueryValue>,
    I: IntoIterator<Item = (K, V)>,
{
    let mut query = Query::new();
    for (key, value) in props {
        query.insert(key, value);
    }
    query
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_has_no_inherited_keys() {
        let query = create_query(Vec::<(String, String)>::new());
        assert!(query.is_empty());
        assert!(!query.contains_key("constructor"));
        assert!(!query.contains_key("__proto__"));
        assert!(query.get("toString").is_none());
    }

    #[test]
    fn dangerous_keys_are_plain_data() {
        let query = create_query([("__proto__", "x"), ("constructor", "y")]);
        assert_eq!(query.len(), 2);
        assert_eq!(query.get("__proto__").and_then(QueryValue::first), Some("x"));
        assert_eq!(query.get("constructor").and_then(QueryValue::first), Some("y"));
    }

    #[test]
    fn parses_search_strings() {
        let query = Query::from_search("?a=1&a=2&b=hello+world&c&d=%C3%A9");
        assert_eq!(
            query.get("a"),
            Some(&QueryValue::Multiple(vec!["1".into(), "2".into()]))
        );
        assert_eq!(query.get("b"), Some(&QueryValue::from("hello world")));
        assert_eq!(query.get("c"), Some(&QueryValue::from("")));
        assert_eq!(query.get("d"), Some(&QueryValue::from("é")));
    }

    #[test]
    fn empty_search_is_empty_query() {
        assert!(Query::from_search("").is_empty());
        assert!(Query::from_search("?").is_empty());
    }

    #[test]
    fn serializes_like_a_plain_object() {
        let query = Query::from_search("?a=1&a=2&b=3");
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json, serde_json::json!({ "a": ["1", "2"], "b": "3" }));
    }
}
