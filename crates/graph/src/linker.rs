use crate::types::{definition_id, Node, ANONYMOUS};
use std::collections::{HashMap, HashSet};

/// Immutable snapshot: bare definition name -> definition ids sharing it.
///
/// Candidate order follows the order nodes were handed to [`NameIndex::from_nodes`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameIndex {
    by_name: HashMap<String, Vec<String>>,
}

impl NameIndex {
    /// Index every named function node. The anonymous sentinel is not a callable name.
    pub fn from_nodes<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Self {
        let mut by_name: HashMap<String, Vec<String>> = HashMap::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for node in nodes {
            if !node.is_function() || node.name == ANONYMOUS || !seen.insert(&node.id) {
                continue;
            }
            by_name
                .entry(node.name.clone())
                .or_default()
                .push(node.id.clone());
        }
        Self { by_name }
    }

    #[must_use]
    pub fn candidates(&self, name: &str) -> &[String] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct names
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Resolve a call site to the definition it most likely invokes.
///
/// Same-file definitions win; otherwise a sole candidate; otherwise the first
/// candidate in index order. Cross-file ambiguity is not disambiguated.
#[must_use]
pub fn resolve<'a>(caller_file: &str, callee_name: &str, index: &'a NameIndex) -> Option<&'a str> {
    let candidates = index.candidates(callee_name);
    if candidates.is_empty() {
        return None;
    }

    let local_id = definition_id(caller_file, callee_name);
    if let Some(local) = candidates.iter().find(|id| **id == local_id) {
        return Some(local.as_str());
    }

    candidates.first().map(String::as_str)
}
