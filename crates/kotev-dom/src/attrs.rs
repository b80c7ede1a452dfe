//! Ordered attribute map.

/// Element attributes in document order.
///
/// Setting an existing name replaces its value in place, so the original
/// position is kept. Names are validated on insertion: anything that would
/// not survive as an HTML attribute name is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    items: Vec<(String, String)>,
}

impl Attributes {
    /// Create an empty attribute map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an attribute value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Check whether an attribute is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|(key, _)| key == name)
    }

    /// Set an attribute.
    ///
    /// Returns `false` (and leaves the map untouched) if `name` is not a
    /// valid attribute name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        if !is_valid_name(&name) {
            return false;
        }
        let value = value.into();
        if let Some(slot) = self.items.iter_mut().find(|(key, _)| *key == name) {
            slot.1 = value;
        } else {
            self.items.push((name, value));
        }
        true
    }

    /// Remove an attribute, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.items.iter().position(|(key, _)| key == name)?;
        Some(self.items.remove(pos).1)
    }

    /// Iterate over `(name, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for (name, value) in iter {
            attrs.set(name, value);
        }
        attrs
    }
}

/// Check that `name` is usable as an HTML attribute name.
///
/// Follows the XML `Name` production loosely: a letter, `_` or `:` first,
/// then letters, digits, `-`, `_`, `.` or `:`.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_' || first == ':')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut attrs = Attributes::new();
        assert!(attrs.set("class", "wide"));
        assert_eq!(attrs.get("class"), Some("wide"));
        assert_eq!(attrs.get("id"), None);
    }

    #[test]
    fn test_set_keeps_position() {
        let mut attrs: Attributes = [("id", "a"), ("class", "b")].into_iter().collect();
        attrs.set("id", "c");
        let pairs: Vec<_> = attrs.iter().collect();
        assert_eq!(pairs, vec![("id", "c"), ("class", "b")]);
    }

    #[test]
    fn test_invalid_name_rejected() {
        let mut attrs = Attributes::new();
        assert!(!attrs.set("foo\"bar", "x"));
        assert!(!attrs.set("1abc", "x"));
        assert!(!attrs.set("", "x"));
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_namespaced_and_data_names() {
        assert!(is_valid_name("xml:lang"));
        assert!(is_valid_name("data-role"));
        assert!(is_valid_name("_private"));
    }

    #[test]
    fn test_remove() {
        let mut attrs: Attributes = [("markdown", "1"), ("class", "box")].into_iter().collect();
        assert_eq!(attrs.remove("markdown"), Some("1".to_owned()));
        assert_eq!(attrs.remove("markdown"), None);
        assert_eq!(attrs.len(), 1);
    }
}
