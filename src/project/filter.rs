//! Filter expressions for project listing
//!
//! Each `key -> value` pair becomes `key:value` and the pairs are joined with
//! spaces into the `filter` query parameter. The server matches values
//! case-insensitively; a value of `*` only requires the property to exist.
//! Nothing is filtered locally.

use std::collections::{BTreeMap, HashMap};

/// Value matching any value of an existing property
pub const MATCH_ANY: &str = "*";

/// Key/value match criteria for `list_projects`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    criteria: BTreeMap<String, String>,
}

impl ProjectFilter {
    /// Create an empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Match `key` against `value`
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Match `key` against `value`, replacing any previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.criteria.insert(key.into(), value.into());
    }

    /// Match the display name
    #[must_use]
    pub fn name(self, name: impl Into<String>) -> Self {
        self.with("name", name)
    }

    /// Match the project ID
    #[must_use]
    pub fn id(self, id: impl Into<String>) -> Self {
        self.with("id", id)
    }

    /// Match a label value
    #[must_use]
    pub fn label(self, key: &str, value: impl Into<String>) -> Self {
        self.with(format!("labels.{key}"), value)
    }

    /// Require a label to be present with any value
    #[must_use]
    pub fn has_label(self, key: &str) -> Self {
        self.label(key, MATCH_ANY)
    }

    /// Check if no criteria are set
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Number of criteria
    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    /// Value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.criteria.get(key).map(String::as_str)
    }

    /// Render the filter expression sent to the server
    pub fn to_query(&self) -> String {
        self.criteria
            .iter()
            .map(|(key, value)| format!("{key}:{value}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for ProjectFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_query())
    }
}

impl<K, V> FromIterator<(K, V)> for ProjectFilter
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filter = Self::new();
        for (key, value) in iter {
            filter.insert(key, value);
        }
        filter
    }
}

impl From<HashMap<String, String>> for ProjectFilter {
    fn from(map: HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<BTreeMap<String, String>> for ProjectFilter {
    fn from(criteria: BTreeMap<String, String>) -> Self {
        Self { criteria }
    }
}
