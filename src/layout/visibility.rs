use super::*;

enum Frame {
    Enter {
        tree_idx: usize,
        parent: Option<usize>,
    },
    Exit {
        visible_idx: usize,
        first_column: usize,
    },
}

/// Walks the actor tree once and assigns leaf columns to every visible actor.
///
/// Children of a group are visited only when the group itself is expanded, so a collapsed
/// ancestor hides its whole subtree regardless of what the expansion set says about the
/// descendants. Ids in `expanded` that name leaves or unknown actors are ignored.
///
/// Actor ids are expected to be unique; with duplicates the first occurrence owns the id in
/// the lookup maps.
pub fn resolve_visibility(actors: &[ActorNode], expanded: &ExpansionSet) -> VisibilityResult {
    let tree = ActorTree::new(actors);
    resolve_tree_visibility(&tree, expanded)
}

pub(crate) fn resolve_tree_visibility(
    tree: &ActorTree<'_>,
    expanded: &ExpansionSet,
) -> VisibilityResult {
    let mut visible_nodes: Vec<VisibleNode> = Vec::new();
    let mut header_rows: Vec<HeaderRow> = Vec::new();
    let mut column = 0usize;

    let mut stack: Vec<Frame> = tree
        .roots()
        .iter()
        .rev()
        .map(|&tree_idx| Frame::Enter {
            tree_idx,
            parent: None,
        })
        .collect();

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter { tree_idx, parent } => {
                let entry = tree.entry(tree_idx);
                let node = entry.node;
                let has_children = node.has_children();
                let is_expanded = has_children && expanded.contains(&node.actor_id);
                let visible_idx = visible_nodes.len();
                let parent_actor_id = parent.map(|idx| visible_nodes[idx].actor_id.clone());

                visible_nodes.push(VisibleNode {
                    actor_id: node.actor_id.clone(),
                    label: node.label.clone(),
                    depth: entry.depth,
                    parent_actor_id,
                    alignment: node.alignment,
                    has_children,
                    expanded: is_expanded,
                    leaf_start: column,
                    leaf_end: column,
                    leaf_span: 1,
                    anchor: 0.0,
                    is_leaf: !is_expanded,
                });

                if header_rows.len() <= entry.depth {
                    header_rows.push(HeaderRow {
                        depth: entry.depth,
                        nodes: Vec::new(),
                    });
                }
                header_rows[entry.depth].nodes.push(visible_idx);

                if is_expanded {
                    stack.push(Frame::Exit {
                        visible_idx,
                        first_column: column,
                    });
                    for &child in entry.children.iter().rev() {
                        stack.push(Frame::Enter {
                            tree_idx: child,
                            parent: Some(visible_idx),
                        });
                    }
                } else {
                    place(&mut visible_nodes[visible_idx], column, column);
                    column += 1;
                }
            }
            Frame::Exit {
                visible_idx,
                first_column,
            } => {
                // Members occupy consecutive columns, so the group spans exactly their union.
                place(&mut visible_nodes[visible_idx], first_column, column - 1);
            }
        }
    }

    let leaf_count = column.max(1);
    let mut anchors = BTreeMap::new();
    let mut spans = BTreeMap::new();
    let mut index = BTreeMap::new();
    let mut leaf_by_start = BTreeMap::new();
    let mut leaf_by_end = BTreeMap::new();
    for (idx, node) in visible_nodes.iter().enumerate() {
        if index.contains_key(&node.actor_id) {
            continue;
        }
        index.insert(node.actor_id.clone(), idx);
        anchors.insert(node.actor_id.clone(), node.anchor);
        spans.insert(node.actor_id.clone(), node.span());
        if node.is_leaf {
            leaf_by_start.insert(node.leaf_start, idx);
            leaf_by_end.insert(node.leaf_end, idx);
        }
    }

    tracing::debug!(
        leaf_count,
        visible = visible_nodes.len(),
        header_rows = header_rows.len(),
        "resolved actor visibility"
    );

    VisibilityResult {
        visible_nodes,
        header_rows,
        leaf_count,
        anchors,
        spans,
        index,
        leaf_by_start,
        leaf_by_end,
    }
}

fn place(node: &mut VisibleNode, leaf_start: usize, leaf_end: usize) {
    node.leaf_start = leaf_start;
    node.leaf_end = leaf_end;
    node.leaf_span = leaf_end - leaf_start + 1;
    node.anchor = anchor_for(node.alignment, leaf_start, leaf_end);
}

/// Left and right alignments put the lifeline on the node's outer edge, center on its middle.
pub fn anchor_for(alignment: Alignment, leaf_start: usize, leaf_end: usize) -> f32 {
    let left = leaf_start as f32;
    let right = (leaf_end + 1) as f32;
    match alignment {
        Alignment::Left => left,
        Alignment::Right => right,
        Alignment::Center => (left + right) / 2.0,
    }
}
