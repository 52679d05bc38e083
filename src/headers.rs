//! String-keyed string dictionary with typed accessors.
//!
//! Protocol dictionaries carry free-form `key=value` metadata (peer
//! headers, log attributes). Lookups take a default, and numeric values
//! are parsed on demand.

use std::collections::HashMap;

/// A protocol dictionary field.
///
/// Equality is order-independent; wire encoding order is unspecified.
///
/// # Example
///
/// ```
/// use zwire::Headers;
///
/// let mut headers = Headers::new();
/// headers.insert("x", "1");
/// assert_eq!(headers.get("x", "?"), "1");
/// assert_eq!(headers.get_number("x", 0), 1);
/// assert_eq!(headers.get_number("missing", 42), 42);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: HashMap<String, String>,
}

impl Headers {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value under a key, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Look up a value as a string, falling back to `default`.
    pub fn get<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.entries.get(key).map(String::as_str).unwrap_or(default)
    }

    /// Look up a value as a number, falling back to `default`.
    ///
    /// The stored string is parsed on demand; a missing key or an
    /// unparsable value both yield the default.
    pub fn get_number(&self, key: &str, default: u64) -> u64 {
        self.entries
            .get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Check whether a key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the dictionary is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.entries.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<HashMap<String, String>> for Headers {
    fn from(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }
}
