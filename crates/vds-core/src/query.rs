//! Convenience builder for HTTP query parameters.
//!
//! Search requests are encoded as URL query pairs; this helper assembles them from
//! single and list-valued inputs.

use std::fmt::Display;

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append the values joined with `separator`, skipping the key when empty.
    pub fn push_joined<I, T>(&mut self, key: &'static str, values: I, separator: &str)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let joined = values
            .into_iter()
            .map(|value| value.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(separator);
        if !joined.is_empty() {
            self.pairs.push((key, joined));
        }
    }

    /// Append a required key/value pair.
    pub fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key, value.to_string()));
    }

    /// Borrow the collected key/value pairs.
    #[must_use]
    pub fn as_pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.pairs
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::QueryParams;

    #[test]
    fn push_joined_uses_separator() {
        let mut params = QueryParams::new();
        params.push_joined("attributes", ["cn", "mail", "uid"], ",");
        assert_eq!(
            params.into_pairs(),
            vec![("attributes", "cn,mail,uid".to_string())]
        );
    }

    #[test]
    fn push_joined_skips_empty_lists() {
        let mut params = QueryParams::new();
        params.push_joined("attributes", Vec::<String>::new(), ",");
        assert!(params.is_empty());
    }

    #[test]
    fn pairs_keep_insertion_order() {
        let mut params = QueryParams::new();
        params.push("base", "dc=example,dc=com");
        params.push("sizeLimit", 25);
        params.push_joined("attributes", ["cn"], ",");
        let keys: Vec<_> = params.as_pairs().iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec!["base", "sizeLimit", "attributes"]);
    }
}
