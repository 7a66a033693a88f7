//! Path parameters, query strings, and request path splitting.
//!
//! - [`RouteParams`]: values captured by `:name` segments of a route.
//! - [`QueryParams`]: the decoded `?key=value&...` part of a request path.
//!   Keys are unique; the last occurrence of a duplicate key wins, while the
//!   key keeps the position of its first occurrence.
//! - [`split_path`]: splits a full request path into clean path, query and
//!   fragment without consulting the route table.
//!
//! # Example
//!
//! ```
//! use spa_navigator::split_path;
//!
//! let split = split_path("/a?x=1&y=2#frag");
//! assert_eq!(split.clean_path, "/a");
//! assert_eq!(split.query.get("x"), Some("1"));
//! assert_eq!(split.query.get_as::<u32>("y"), Some(2));
//! assert_eq!(split.fragment.as_deref(), Some("frag"));
//! ```

use std::collections::HashMap;

// ============================================================================
// Route parameters
// ============================================================================

/// Route parameters extracted from path segments.
///
/// ```
/// use spa_navigator::RouteParams;
///
/// // Route pattern: /users/:id, matched path: /users/123
/// let mut params = RouteParams::new();
/// params.insert("id".to_string(), "123".to_string());
///
/// assert_eq!(params.get("id"), Some("123"));
/// assert_eq!(params.get_as::<i32>("id"), Some(123));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    params: HashMap<String, String>,
}

impl RouteParams {
    /// Create empty route parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from an existing `HashMap`.
    pub fn from_map(params: HashMap<String, String>) -> Self {
        Self { params }
    }

    /// Get a parameter value by name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Get a parameter and parse it as a specific type.
    ///
    /// Returns `None` if the parameter doesn't exist or cannot be parsed.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.params.get(key)?.parse().ok()
    }

    /// Insert or overwrite a parameter.
    pub fn insert(&mut self, key: String, value: String) {
        self.params.insert(key, value);
    }

    /// Return `true` if the given name is present.
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Get a reference to the underlying map.
    pub fn all(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Iterate over all `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.params.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }
}

// ============================================================================
// Query parameters
// ============================================================================

/// Decoded query string parameters, in first-seen key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Create empty query parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the part after `?` (without the `?` itself).
    ///
    /// Keys and values are percent-decoded. A pair without `=` has an empty
    /// value; empty pairs (`a=1&&b=2`) are skipped.
    pub fn from_query_string(query: &str) -> Self {
        let mut params = Self::new();

        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            params.insert(decode_uri_component(key), decode_uri_component(value));
        }

        params
    }

    /// Get the value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Get the value for a key, parsed as type `T`.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.get(key)?.parse().ok()
    }

    /// Set a value, replacing any previous value for the key.
    pub fn insert(&mut self, key: String, value: String) {
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Remove a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.pairs.iter().position(|(k, _)| k == key)?;
        Some(self.pairs.remove(index).1)
    }

    /// Return `true` if the given key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Iterate over `(key, value)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize back into a query string (without the leading `?`).
    ///
    /// Keys and values are percent-encoded, so parsing the result yields the
    /// same parameters.
    ///
    /// ```
    /// use spa_navigator::QueryParams;
    ///
    /// let mut query = QueryParams::new();
    /// query.insert("q".to_string(), "rust & wasm".to_string());
    /// query.insert("page".to_string(), "2".to_string());
    /// assert_eq!(query.to_query_string(), "q=rust%20%26%20wasm&page=2");
    /// ```
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    encode_uri_component(key),
                    encode_uri_component(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key.into(), value.into());
        }
        params
    }
}

// ============================================================================
// Path splitting
// ============================================================================

/// A request path split into its parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitPath {
    /// Everything before the first `?` or `#`.
    pub clean_path: String,
    /// Decoded query string; empty when there is no `?` before the `#`.
    pub query: QueryParams,
    /// Everything after the first `#`; `None` when absent or empty.
    pub fragment: Option<String>,
}

/// Split a full request path into clean path, query and fragment.
pub fn split_path(full_path: &str) -> SplitPath {
    let (before_fragment, fragment) = match full_path.split_once('#') {
        Some((before, fragment)) => (before, Some(fragment)),
        None => (full_path, None),
    };

    let (clean_path, query) = match before_fragment.split_once('?') {
        Some((path, query)) => (path, QueryParams::from_query_string(query)),
        None => (before_fragment, QueryParams::new()),
    };

    SplitPath {
        clean_path: clean_path.to_string(),
        query,
        fragment: fragment
            .filter(|fragment| !fragment.is_empty())
            .map(str::to_string),
    }
}

// ============================================================================
// Percent encoding
// ============================================================================

/// Percent-encode everything outside the `encodeURIComponent` unreserved set.
pub(crate) fn encode_uri_component(s: &str) -> String {
    let mut encoded = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => encoded.push(char::from(byte)),
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

/// Decode `%XX` sequences as UTF-8. Malformed escapes are kept verbatim.
pub(crate) fn decode_uri_component(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Some(byte) = decode_hex_pair(bytes[i + 1], bytes[i + 2]) {
                decoded.push(byte);
                i += 3;
                continue;
            }
        }
        decoded.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&decoded).into_owned()
}

fn decode_hex_pair(high: u8, low: u8) -> Option<u8> {
    let high = char::from(high).to_digit(16)?;
    let low = char::from(low).to_digit(16)?;
    u8::try_from(high * 16 + low).ok()
}

// ============================================================================
// Tests
// ============================================================================
