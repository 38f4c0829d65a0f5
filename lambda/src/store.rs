use std::collections::HashMap;

/// Named-term definitions, kept as source text and parsed again on every
/// expansion. A definition may mention names defined after it.
#[derive(Default, Debug)]
pub struct Store {
    terms: HashMap<String, String>,
}

impl Store {
    pub fn contains(&self, name: &str) -> bool {
        self.terms.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.terms.get(name).map(String::as_str)
    }

    /// Returns the previous definition, if any.
    pub fn insert(&mut self, name: impl Into<String>, definition: String) -> Option<String> {
        self.terms.insert(name.into(), definition)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Definitions sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut entries: Vec<_> = self
            .terms
            .iter()
            .map(|(name, definition)| (name.as_str(), definition.as_str()))
            .collect();
        entries.sort_unstable();
        entries.into_iter()
    }
}
