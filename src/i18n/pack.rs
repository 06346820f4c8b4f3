use serde_json::Value;

/// One language's translation tree: an arbitrary nested JSON object whose
/// leaves are strings, addressed by dotted path ("nav.home").
///
/// Packs are immutable once loaded; a language switch replaces the whole pack.
#[derive(Debug, Clone, Default)]
pub struct LanguagePack {
    tree: Value,
}

impl LanguagePack {
    /// An empty pack. Every lookup misses, so `Localizer::get` echoes keys
    /// until the first successful load.
    pub fn empty() -> Self {
        Self { tree: Value::Null }
    }

    pub fn from_value(tree: Value) -> Self {
        Self { tree }
    }

    /// Resolve a dotted key to its string leaf.
    ///
    /// Returns `None` when any path segment is missing, an intermediate node
    /// is not an object, the leaf is not a string, or the leaf is empty. The
    /// caller turns `None` into a key-echo fallback.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        let mut node = &self.tree;
        for segment in key.split('.') {
            node = node.as_object()?.get(segment)?;
        }
        match node.as_str() {
            Some(leaf) if !leaf.is_empty() => Some(leaf),
            _ => None,
        }
    }
}
