use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

/// One participant of the diagram. Groups carry their member actors in `children`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorNode {
    pub actor_id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ActorNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_expanded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_class_name: Option<String>,
}

impl ActorNode {
    pub fn leaf(id: &str, label: &str) -> Self {
        Self {
            actor_id: id.to_string(),
            label: label.to_string(),
            alignment: Alignment::Center,
            children: Vec::new(),
            default_expanded: None,
            class_name: None,
            region_class_name: None,
        }
    }

    pub fn group(id: &str, label: &str, children: Vec<ActorNode>) -> Self {
        Self {
            children,
            ..Self::leaf(id, label)
        }
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_default_expanded(mut self, expanded: bool) -> Self {
        self.default_expanded = Some(expanded);
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// An empty `children` list never expands, whatever `default_expanded` says.
    pub fn expands_by_default(&self, fallback: bool) -> bool {
        self.has_children() && self.default_expanded.unwrap_or(fallback)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub message_id: String,
    pub from_actor_id: String,
    pub to_actor_id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl Message {
    pub fn new(id: &str, from: &str, to: &str, label: &str) -> Self {
        Self {
            message_id: id.to_string(),
            from_actor_id: from.to_string(),
            to_actor_id: to.to_string(),
            label: label.to_string(),
            row_index: None,
            class_name: None,
            payload: serde_json::Map::new(),
        }
    }

    pub fn with_row(mut self, row_index: u32) -> Self {
        self.row_index = Some(row_index);
        self
    }

    pub fn is_self_message(&self) -> bool {
        self.from_actor_id == self.to_actor_id
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub actors: Vec<ActorNode>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

impl SequenceModel {
    pub fn new(actors: Vec<ActorNode>, messages: Vec<Message>) -> Self {
        Self {
            actors,
            messages,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActorEntry<'a> {
    pub node: &'a ActorNode,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub depth: usize,
}

/// Flat, pre-order view of an actor forest. Parent and child links are indices into
/// `entries`, so walking the tree never recurses.
#[derive(Debug, Clone)]
pub struct ActorTree<'a> {
    entries: Vec<ActorEntry<'a>>,
    roots: Vec<usize>,
    index: HashMap<&'a str, usize>,
}

impl<'a> ActorTree<'a> {
    pub fn new(actors: &'a [ActorNode]) -> Self {
        let mut entries: Vec<ActorEntry<'a>> = Vec::new();
        let mut roots = Vec::new();
        let mut index = HashMap::new();

        // (node, parent index, depth); pushed in reverse so pops follow document order.
        let mut stack: Vec<(&'a ActorNode, Option<usize>, usize)> =
            actors.iter().rev().map(|node| (node, None, 0)).collect();
        while let Some((node, parent, depth)) = stack.pop() {
            let idx = entries.len();
            entries.push(ActorEntry {
                node,
                parent,
                children: Vec::with_capacity(node.children.len()),
                depth,
            });
            match parent {
                Some(parent_idx) => entries[parent_idx].children.push(idx),
                None => roots.push(idx),
            }
            index.entry(node.actor_id.as_str()).or_insert(idx);
            for child in node.children.iter().rev() {
                stack.push((child, Some(idx), depth + 1));
            }
        }

        Self {
            entries,
            roots,
            index,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn entry(&self, idx: usize) -> &ActorEntry<'a> {
        &self.entries[idx]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActorEntry<'a>> {
        self.entries.iter()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&ActorEntry<'a>> {
        self.position(id).map(|idx| &self.entries[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Every actor id in document order, groups before their members.
    pub fn actor_ids(&self) -> Vec<&'a str> {
        self.entries
            .iter()
            .map(|entry| entry.node.actor_id.as_str())
            .collect()
    }

    /// Ancestors of `idx`, nearest first.
    pub fn ancestors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(self.entries[idx].parent, move |&parent| {
            self.entries[parent].parent
        })
    }
}
