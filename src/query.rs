//! Query string parameters.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::error::{RestError, Result};

/// An ordered multi-map of query parameters.
///
/// Keys are kept sorted so the encoded query string is stable regardless of
/// the order parameters were added in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    values: BTreeMap<String, Vec<String>>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten any serializable value into query parameters.
    ///
    /// Accepts maps and structs whose values are strings, numbers, booleans,
    /// or arrays of those. `null` fields are skipped. A `null` or unit value
    /// yields an empty query.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidQuery`] for anything that does not flatten
    /// into key/value pairs, such as a bare string or a nested object.
    pub fn from_serialize<Q: Serialize + ?Sized>(query: &Q) -> Result<Self> {
        let value =
            serde_json::to_value(query).map_err(|e| RestError::InvalidQuery(e.to_string()))?;

        let map = match value {
            Value::Object(map) => map,
            Value::Null => return Ok(Self::new()),
            other => return Err(RestError::InvalidQuery(kind(&other).to_string())),
        };

        let mut out = Self::new();
        for (key, value) in map {
            match value {
                Value::Null => {}
                Value::Array(items) => {
                    let mut rendered = Vec::with_capacity(items.len());
                    for item in &items {
                        rendered.push(scalar(item).ok_or_else(|| {
                            RestError::InvalidQuery(format!("{} inside '{key}'", kind(item)))
                        })?);
                    }
                    out.values.insert(key, rendered);
                }
                other => {
                    let rendered = scalar(&other).ok_or_else(|| {
                        RestError::InvalidQuery(format!("{} for '{key}'", kind(&other)))
                    })?;
                    out.set(key, rendered);
                }
            }
        }
        Ok(out)
    }

    /// Replace all values of `key` with `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), vec![value.into()]);
    }

    /// Add `value` to the values of `key`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_default().push(value.into());
    }

    /// Merge `other` into `self`. Keys present in `other` replace ours.
    pub fn merge(&mut self, other: Query) {
        for (key, values) in other.values {
            self.values.insert(key, values);
        }
    }

    /// The first value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(|v| v.first()).map(String::as_str)
    }

    /// All values of `key`.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.values.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Encode as `application/x-www-form-urlencoded`.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.values {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Self::new();
        for (key, value) in iter {
            query.set(key, value);
        }
        query
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_encode_is_sorted() {
        let query: Query = [("key2", "value2"), ("key1", "value1")].into_iter().collect();
        assert_eq!(query.encode(), "key1=value1&key2=value2");
    }

    #[test]
    fn test_encode_escapes_reserved_characters() {
        let query: Query = [("q", "a b&c=d/é")].into_iter().collect();
        assert_eq!(query.encode(), "q=a+b%26c%3Dd%2F%C3%A9");
    }

    #[test]
    fn test_merge_last_write_wins() {
        let mut query: Query = [("a", "1")].into_iter().collect();
        query.merge([("b", "2")].into_iter().collect());
        assert_eq!(query.encode(), "a=1&b=2");

        query.merge([("a", "3")].into_iter().collect());
        assert_eq!(query.encode(), "a=3&b=2");
    }

    #[test]
    fn test_append_keeps_all_values() {
        let mut query = Query::new();
        query.append("tag", "x");
        query.append("tag", "y");
        assert_eq!(query.get("tag"), Some("x"));
        assert_eq!(query.get_all("tag"), ["x", "y"]);
        assert_eq!(query.encode(), "tag=x&tag=y");
    }

    #[test]
    fn test_from_serialize_map() {
        let map = HashMap::from([("page", "100"), ("per_page", "1000")]);
        let query = Query::from_serialize(&map).unwrap();
        assert_eq!(query.encode(), "page=100&per_page=1000");
    }

    #[test]
    fn test_from_serialize_struct() {
        #[derive(Serialize)]
        struct Filter {
            page: u32,
            active: bool,
            name: Option<String>,
            tags: Vec<&'static str>,
        }

        let query = Query::from_serialize(&Filter {
            page: 2,
            active: true,
            name: None,
            tags: vec!["a", "b"],
        })
        .unwrap();

        assert_eq!(query.encode(), "active=true&page=2&tags=a&tags=b");
    }

    #[test]
    fn test_from_serialize_unit_is_empty() {
        assert!(Query::from_serialize(&()).unwrap().is_empty());
    }

    #[test]
    fn test_from_serialize_rejects_non_maps() {
        let err = Query::from_serialize("page=1").unwrap_err();
        assert!(matches!(err, RestError::InvalidQuery(_)));

        let err = Query::from_serialize(&vec![1, 2]).unwrap_err();
        assert!(matches!(err, RestError::InvalidQuery(_)));
    }

    #[test]
    fn test_from_serialize_rejects_nested_objects() {
        let value = serde_json::json!({ "filter": { "name": "x" } });
        let err = Query::from_serialize(&value).unwrap_err();
        assert!(err.to_string().contains("filter"));
    }
}
