use crate::ir::{ActorNode, ActorTree};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Ids of the group actors that are currently expanded.
///
/// The set is owned by whoever drives the diagram (an interactive controller, the CLI, a wasm
/// host); layout calls only read it. Ids that name leaves or unknown actors are allowed and
/// have no effect on layout.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpansionSet(BTreeSet<String>);

impl ExpansionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every group in the tree whose `default_expanded` resolves true, including groups nested
    /// under collapsed-by-default parents.
    pub fn default_for(actors: &[ActorNode], fallback: bool) -> Self {
        ActorTree::new(actors)
            .iter()
            .filter(|entry| entry.node.expands_by_default(fallback))
            .map(|entry| entry.node.actor_id.clone())
            .collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn expand(&mut self, id: &str) -> bool {
        self.0.insert(id.to_string())
    }

    pub fn collapse(&mut self, id: &str) -> bool {
        self.0.remove(id)
    }

    /// Flips membership of `id`. Returns the new state.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.0.remove(id) {
            false
        } else {
            self.0.insert(id.to_string());
            true
        }
    }

    pub fn replace<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0 = ids.into_iter().map(Into::into).collect();
    }

    pub fn expand_all(&mut self, actors: &[ActorNode]) {
        let tree = ActorTree::new(actors);
        for entry in tree.iter().filter(|entry| entry.node.has_children()) {
            self.0.insert(entry.node.actor_id.clone());
        }
    }

    pub fn collapse_all(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<String> for ExpansionSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for ExpansionSet {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        Self(iter.into_iter().map(str::to_string).collect())
    }
}

impl From<BTreeSet<String>> for ExpansionSet {
    fn from(value: BTreeSet<String>) -> Self {
        Self(value)
    }
}
