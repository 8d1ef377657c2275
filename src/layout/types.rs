use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::ir::{Alignment, Message};

/// Half-open range of leaf columns, `start..end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn width(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibleNode {
    pub actor_id: String,
    pub label: String,
    pub depth: usize,
    pub parent_actor_id: Option<String>,
    pub alignment: Alignment,
    pub has_children: bool,
    pub expanded: bool,
    /// Inclusive leaf column range.
    pub leaf_start: usize,
    pub leaf_end: usize,
    pub leaf_span: usize,
    /// Lifeline position in column units.
    pub anchor: f32,
    /// Occupies exactly one column (a true leaf or a collapsed group).
    pub is_leaf: bool,
}

impl VisibleNode {
    pub fn span(&self) -> Span {
        Span {
            start: self.leaf_start,
            end: self.leaf_end + 1,
        }
    }

    pub fn is_expanded_group(&self) -> bool {
        self.has_children && self.expanded
    }
}

/// One header row: indices into [`VisibilityResult::visible_nodes`] for every visible node at
/// that depth, in document order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderRow {
    pub depth: usize,
    pub nodes: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibilityResult {
    /// Document (pre-order) order: a group precedes its members.
    pub visible_nodes: Vec<VisibleNode>,
    pub header_rows: Vec<HeaderRow>,
    /// Never zero; an empty actor list still reports one column.
    pub leaf_count: usize,
    pub anchors: BTreeMap<String, f32>,
    pub spans: BTreeMap<String, Span>,
    #[serde(skip)]
    pub(crate) index: BTreeMap<String, usize>,
    #[serde(skip)]
    pub(crate) leaf_by_start: BTreeMap<usize, usize>,
    #[serde(skip)]
    pub(crate) leaf_by_end: BTreeMap<usize, usize>,
}

impl VisibilityResult {
    pub fn node(&self, actor_id: &str) -> Option<&VisibleNode> {
        self.index.get(actor_id).map(|&idx| &self.visible_nodes[idx])
    }

    pub fn is_visible(&self, actor_id: &str) -> bool {
        self.index.contains_key(actor_id)
    }

    pub fn anchor(&self, actor_id: &str) -> Option<f32> {
        self.anchors.get(actor_id).copied()
    }

    pub fn span(&self, actor_id: &str) -> Option<Span> {
        self.spans.get(actor_id).copied()
    }

    /// Single-column node whose column is `column`.
    pub fn leaf_at_start(&self, column: usize) -> Option<&VisibleNode> {
        self.leaf_by_start
            .get(&column)
            .map(|&idx| &self.visible_nodes[idx])
    }

    pub fn leaf_at_end(&self, column: usize) -> Option<&VisibleNode> {
        self.leaf_by_end.get(&column).map(|&idx| &self.visible_nodes[idx])
    }

    /// Replaces the span drawn for `actor_id`. Endpoint resolution honours overridden spans
    /// wider than one column by attaching arrows to the facing span edge.
    pub fn override_span(&mut self, actor_id: &str, span: Span) -> bool {
        match self.spans.get_mut(actor_id) {
            Some(slot) => {
                *slot = span;
                true
            }
            None => false,
        }
    }

    pub fn top_level(&self) -> impl Iterator<Item = &VisibleNode> {
        self.visible_nodes
            .iter()
            .filter(|node| node.parent_actor_id.is_none())
    }

    pub fn header_nodes(&self, row: &HeaderRow) -> impl Iterator<Item = &VisibleNode> {
        row.nodes.iter().map(|&idx| &self.visible_nodes[idx])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedMessage {
    pub message: Message,
    /// Dense, zero-based row after hidden messages are removed.
    pub row_index: usize,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageKind {
    /// Both endpoints were drawn at their own lifelines.
    Direct,
    /// At least one endpoint was an expanded group and was replaced by a boundary leaf.
    RolledUp,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedEndpoint {
    /// Actor actually drawn: the boundary leaf for an expanded group, else the actor itself.
    pub actor_id: String,
    pub anchor: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedMessage {
    pub message: Message,
    pub row_index: usize,
    pub y: f32,
    pub from_resolved: ResolvedEndpoint,
    pub to_resolved: ResolvedEndpoint,
    /// Column units.
    pub from_x: f32,
    pub to_x: f32,
    /// `1` when the arrow points right (or is a self message), `-1` otherwise.
    pub direction: i8,
    pub kind: MessageKind,
}

impl ResolvedMessage {
    pub fn is_self_message(&self) -> bool {
        self.message.is_self_message()
    }

    /// Left edge and width in pixels, widened to `min_width` so short arrows stay visible.
    pub fn pixel_span(&self, column_width: f32, min_width: f32) -> (f32, f32) {
        let from = self.from_x * column_width;
        let to = self.to_x * column_width;
        (from.min(to), (to - from).abs().max(min_width))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequenceLayout {
    pub visibility: VisibilityResult,
    pub messages: Vec<ResolvedMessage>,
    pub leaf_count: usize,
    pub header_row_height: f32,
    pub message_area_height: f32,
}

impl SequenceLayout {
    /// Expanded groups, shallowest first, for drawing nested region boxes.
    pub fn regions(&self) -> Vec<&VisibleNode> {
        let mut regions: Vec<&VisibleNode> = self
            .visibility
            .visible_nodes
            .iter()
            .filter(|node| node.is_expanded_group())
            .collect();
        regions.sort_by_key(|node| node.depth);
        regions
    }

    /// One lifeline per visible column.
    pub fn rails(&self) -> impl Iterator<Item = &VisibleNode> {
        self.visibility
            .visible_nodes
            .iter()
            .filter(|node| node.is_leaf)
    }

    /// Actors touched by at least one drawn arrow.
    pub fn active_actors(&self) -> BTreeSet<&str> {
        let mut active = BTreeSet::new();
        for message in &self.messages {
            active.insert(message.from_resolved.actor_id.as_str());
            active.insert(message.to_resolved.actor_id.as_str());
        }
        active
    }

    pub fn canvas_width(&self, column_width: f32) -> f32 {
        self.leaf_count as f32 * column_width
    }

    pub fn header_height(&self) -> f32 {
        self.visibility.header_rows.len().max(1) as f32 * self.header_row_height
    }
}
