//! The key/value bag that every gateway payload is built from.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Field name carrying the request signature.
pub const SIGN_FIELD: &str = "sign";

/// Field name reserved for the merchant secret inside the signing string.
pub const KEY_FIELD: &str = "key";

/// Unordered mapping from field name to field value.
///
/// Iteration order is unspecified. The gateway only looks at which fields
/// are present, so nothing here (signing included) may depend on it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSet(HashMap<String, String>);

impl FieldSet {
    /// Create an empty field set.
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Insert or replace a field, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Fields that take part in signing: non-empty values, reserved keys excluded.
    pub fn signable(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter()
            .filter(|(k, v)| *k != SIGN_FIELD && *k != KEY_FIELD && !v.is_empty())
    }

    /// Consume the set, returning the underlying map.
    pub fn into_inner(self) -> HashMap<String, String> {
        self.0
    }
}

impl From<HashMap<String, String>> for FieldSet {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for FieldSet {
    type Item = (String, String);
    type IntoIter = std::collections::hash_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signable_skips_reserved_and_empty() {
        let fields = FieldSet::new()
            .with("appid", "wx123")
            .with("attach", "")
            .with("sign", "ABC")
            .with("key", "secret");

        let mut signable: Vec<_> = fields.signable().collect();
        signable.sort();
        assert_eq!(signable, vec![("appid", "wx123")]);
    }

    #[test]
    fn test_insert_replaces() {
        let mut fields = FieldSet::new();
        assert_eq!(fields.insert("a", "1"), None);
        assert_eq!(fields.insert("a", "2"), Some("1".to_string()));
        assert_eq!(fields.get("a"), Some("2"));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let fields: FieldSet = [("appId", "wx123"), ("signType", "MD5")]
            .into_iter()
            .collect();
        let value = serde_json::to_value(&fields).unwrap();
        assert_eq!(value["appId"], "wx123");
        assert_eq!(value["signType"], "MD5");
    }
}
