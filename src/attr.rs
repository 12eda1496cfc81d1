//! Attribute storage for element nodes.
//!
//! Attributes are plain key/value string pairs kept in insertion order.
//! Order does not affect equality or hashing: [`attrs_eq`] compares as an
//! unordered set, and [`sorted_pairs`] gives the canonical sorted-by-key
//! view that digesting iterates.

/// Element attributes as ordered key-value pairs.
///
/// A `Vec` beats a map here: attribute counts are tiny, linear scans win,
/// and insertion order makes patch emission deterministic.
pub type Attrs = Vec<(String, String)>;

/// Extension trait for attribute operations on [`Attrs`].
pub trait AttrsExt {
    /// Get an attribute value by key.
    fn get_attr(&self, key: &str) -> Option<&str>;

    /// Check whether an attribute exists.
    fn has_attr(&self, key: &str) -> bool;

    /// Set an attribute value, overwriting in place if the key exists.
    fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>);

    /// Remove an attribute by key, returning the old value if present.
    fn remove_attr(&mut self, key: &str) -> Option<String>;
}

impl AttrsExt for Attrs {
    fn get_attr(&self, key: &str) -> Option<&str> {
        self.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    fn has_attr(&self, key: &str) -> bool {
        self.iter().any(|(k, _)| k == key)
    }

    fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(attr) = self.iter_mut().find(|(k, _)| k == &key) {
            attr.1 = value;
        } else {
            self.push((key, value));
        }
    }

    fn remove_attr(&mut self, key: &str) -> Option<String> {
        self.iter()
            .position(|(k, _)| k == key)
            .map(|pos| self.remove(pos).1)
    }
}

/// Unordered equality: same key set, same value per key.
///
/// Duplicate keys cannot occur (`set_attr` overwrites in place), so equal
/// lengths plus one-directional containment is a full check.
pub fn attrs_eq(a: &Attrs, b: &Attrs) -> bool {
    a.len() == b.len() && a.iter().all(|(k, v)| b.get_attr(k) == Some(v.as_str()))
}

/// Pairs in sorted-by-key order, the canonical iteration for digesting.
pub(crate) fn sorted_pairs(attrs: &Attrs) -> Vec<(&str, &str)> {
    let mut pairs: Vec<(&str, &str)> = attrs
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    pairs.sort_unstable_by(|a, b| a.0.cmp(b.0));
    pairs
}

// =============================================================================
// Tests
// =============================================================================
