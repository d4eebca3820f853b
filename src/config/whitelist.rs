//! Field whitelist

use ahash::AHashSet;

/// Set of fact paths a rule condition may reference
///
/// Entries come in three shapes:
/// - `weight` admits exactly `weight`
/// - `pickup.city` admits `pickup.city` and any other `pickup.` path
/// - `pickup.*` admits any `pickup.` path
#[derive(Debug, Clone, Default)]
pub struct FieldWhitelist {
    exact: AHashSet<String>,
    families: AHashSet<String>,
}

impl FieldWhitelist {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut whitelist = Self::default();
        for entry in entries {
            whitelist.insert(entry.as_ref());
        }
        whitelist
    }

    pub fn insert(&mut self, entry: &str) {
        let entry = entry.trim();
        if entry.is_empty() {
            return;
        }

        if let Some(root) = entry.strip_suffix(".*") {
            self.families.insert(root.to_string());
            return;
        }

        self.exact.insert(entry.to_string());
        if let Some((root, _)) = entry.split_once('.') {
            self.families.insert(root.to_string());
        }
    }

    /// Whether a field path may be referenced
    pub fn permits(&self, path: &str) -> bool {
        if self.exact.contains(path) {
            return true;
        }
        match path.split_once('.') {
            Some((root, rest)) => !rest.is_empty() && self.families.contains(root),
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.families.is_empty()
    }
}
