use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Turns projected messages into drawable arrows, in the order given (row order).
///
/// Endpoints that are expanded groups attach to the boundary leaf facing the other endpoint.
/// Each arrow starts where the previous arrow into its source actor landed, when there was one,
/// so consecutive messages through a group keep a single lifeline; the source endpoint then
/// names the leaf that arrow landed on. The landing points are tracked only for the duration of
/// this call.
pub fn resolve_endpoints(
    projected: &[ProjectedMessage],
    visibility: &VisibilityResult,
) -> Vec<ResolvedMessage> {
    let mut last_landing: HashMap<&str, ResolvedEndpoint> = HashMap::new();
    let mut resolved = Vec::with_capacity(projected.len());

    for entry in projected {
        let message = &entry.message;
        let (Some(from_node), Some(to_node)) = (
            visibility.node(&message.from_actor_id),
            visibility.node(&message.to_actor_id),
        ) else {
            tracing::trace!(
                message = %message.message_id,
                "skipping message projected against a different visibility"
            );
            continue;
        };

        let raw_from = visibility.anchor(&from_node.actor_id).unwrap_or(from_node.anchor);
        let raw_to = visibility.anchor(&to_node.actor_id).unwrap_or(to_node.anchor);
        let (from_side, to_side) = if raw_to >= raw_from {
            (Side::Right, Side::Left)
        } else {
            (Side::Left, Side::Right)
        };

        let landing = last_landing.get(message.from_actor_id.as_str());
        let (from_resolved, from_rolled) = match landing {
            Some(landing) => (landing.clone(), landing.actor_id != from_node.actor_id),
            None => resolve_endpoint(from_node, from_side, visibility),
        };
        let (to_resolved, to_rolled) = resolve_endpoint(to_node, to_side, visibility);

        let from_x = from_resolved.anchor;
        let to_x = to_resolved.anchor;
        last_landing.insert(message.to_actor_id.as_str(), to_resolved.clone());

        resolved.push(ResolvedMessage {
            message: message.clone(),
            row_index: entry.row_index,
            y: entry.y,
            from_resolved,
            to_resolved,
            from_x,
            to_x,
            direction: if to_x >= from_x { 1 } else { -1 },
            kind: if from_rolled || to_rolled {
                MessageKind::RolledUp
            } else {
                MessageKind::Direct
            },
        });
    }

    tracing::debug!(messages = resolved.len(), "resolved message endpoints");
    resolved
}

/// Returns the point an arrow attaches to on `side` of `node`, and whether a boundary leaf
/// was substituted for the node.
fn resolve_endpoint(
    node: &VisibleNode,
    side: Side,
    visibility: &VisibilityResult,
) -> (ResolvedEndpoint, bool) {
    if node.is_expanded_group() {
        let leaf = match side {
            Side::Right => visibility.leaf_at_end(node.leaf_end),
            Side::Left => visibility.leaf_at_start(node.leaf_start),
        };
        if let Some(leaf) = leaf {
            let anchor = visibility.anchor(&leaf.actor_id).unwrap_or(leaf.anchor);
            return (
                ResolvedEndpoint {
                    actor_id: leaf.actor_id.clone(),
                    anchor,
                },
                true,
            );
        }
    }

    let span = visibility.span(&node.actor_id).unwrap_or_else(|| node.span());
    let anchor = if span.width() > 1 {
        match side {
            Side::Right => span.end as f32,
            Side::Left => span.start as f32,
        }
    } else {
        visibility.anchor(&node.actor_id).unwrap_or(node.anchor)
    };
    (
        ResolvedEndpoint {
            actor_id: node.actor_id.clone(),
            anchor,
        },
        false,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resolve(
        actors: &[ActorNode],
        expanded: &ExpansionSet,
        messages: &[Message],
    ) -> Vec<ResolvedMessage> {
        let visibility = resolve_visibility(actors, expanded);
        let projected = project_messages(messages, &visibility, &LayoutConfig::default());
        resolve_endpoints(&projected, &visibility)
    }

    fn xs(resolved: &[ResolvedMessage]) -> Vec<(f32, f32, i8)> {
        resolved
            .iter()
            .map(|m| (m.from_x, m.to_x, m.direction))
            .collect()
    }

    /// a | G{x, y} | b, with G expanded.
    fn grouped() -> (Vec<ActorNode>, ExpansionSet) {
        let actors = vec![
            ActorNode::leaf("a", "A"),
            ActorNode::group(
                "g",
                "G",
                vec![ActorNode::leaf("x", "X"), ActorNode::leaf("y", "Y")],
            ),
            ActorNode::leaf("b", "B"),
        ];
        let expanded: ExpansionSet = ["g"].into_iter().collect();
        (actors, expanded)
    }

    #[test]
    fn plain_leaves_use_their_anchors() {
        let actors = vec![ActorNode::leaf("a", "A"), ActorNode::leaf("b", "B")];
        let messages = vec![
            Message::new("m1", "a", "b", ""),
            Message::new("m2", "b", "a", ""),
        ];
        let resolved = resolve(&actors, &ExpansionSet::new(), &messages);
        assert_eq!(xs(&resolved), vec![(0.5, 1.5, 1), (1.5, 0.5, -1)]);
        assert!(resolved.iter().all(|m| m.kind == MessageKind::Direct));
    }

    #[test]
    fn expanded_group_target_attaches_to_facing_leaf() {
        let (actors, expanded) = grouped();
        let messages = vec![Message::new("in", "a", "g", "")];
        let resolved = resolve(&actors, &expanded, &messages);
        assert_eq!(resolved[0].to_resolved.actor_id, "x");
        assert_eq!(resolved[0].to_x, 1.5);
        assert_eq!(resolved[0].kind, MessageKind::RolledUp);

        let messages = vec![Message::new("in", "b", "g", "")];
        let resolved = resolve(&actors, &expanded, &messages);
        assert_eq!(resolved[0].to_resolved.actor_id, "y");
        assert_eq!(xs(&resolved), vec![(3.5, 2.5, -1)]);
    }

    #[test]
    fn expanded_group_source_exits_toward_target() {
        let (actors, expanded) = grouped();
        let messages = vec![Message::new("out", "g", "b", "")];
        let resolved = resolve(&actors, &expanded, &messages);
        assert_eq!(resolved[0].from_resolved.actor_id, "y");
        assert_eq!(xs(&resolved), vec![(2.5, 3.5, 1)]);

        let messages = vec![Message::new("out", "g", "a", "")];
        let resolved = resolve(&actors, &expanded, &messages);
        assert_eq!(resolved[0].from_resolved.actor_id, "x");
        assert_eq!(xs(&resolved), vec![(1.5, 0.5, -1)]);
    }

    #[test]
    fn group_lifeline_continues_from_last_landing() {
        let (actors, expanded) = grouped();
        let messages = vec![
            Message::new("m1", "a", "g", ""),
            Message::new("m2", "g", "b", ""),
        ];
        let resolved = resolve(&actors, &expanded, &messages);
        // m2 would exit from y (2.5) on its own, but m1 landed on x.
        assert_eq!(resolved[1].from_resolved.actor_id, "x");
        assert_eq!(resolved[1].from_resolved.anchor, resolved[1].from_x);
        assert_eq!(resolved[1].kind, MessageKind::RolledUp);
        assert_eq!(xs(&resolved), vec![(0.5, 1.5, 1), (1.5, 3.5, 1)]);
    }

    #[test]
    fn continued_lifeline_leaves_unused_boundary_leaf_idle() {
        let (actors, expanded) = grouped();
        let model = SequenceModel::new(
            actors,
            vec![
                Message::new("m1", "a", "g", ""),
                Message::new("m2", "g", "b", ""),
            ],
        );
        let layout = compute_layout(&model, Some(&expanded), &LayoutConfig::default());
        let active: Vec<&str> = layout.active_actors().into_iter().collect();
        assert_eq!(active, vec!["a", "b", "x"]);
    }

    #[test]
    fn continuity_state_does_not_leak_between_calls() {
        let (actors, expanded) = grouped();
        let first = resolve(&actors, &expanded, &[Message::new("m1", "a", "g", "")]);
        assert_eq!(first[0].to_x, 1.5);
        let second = resolve(&actors, &expanded, &[Message::new("m2", "g", "b", "")]);
        assert_eq!(second[0].from_x, 2.5);
    }

    #[test]
    fn direction_follows_resolved_points() {
        let actors = vec![ActorNode::group(
            "g",
            "G",
            vec![ActorNode::leaf("x", "X"), ActorNode::leaf("y", "Y")],
        )
        .with_alignment(Alignment::Left)];
        let expanded: ExpansionSet = ["g"].into_iter().collect();
        let messages = vec![Message::new("m", "g", "x", "")];
        let resolved = resolve(&actors, &expanded, &messages);
        // Raw anchors say rightward (0.0 -> 0.5), but g exits from y at 1.5.
        assert_eq!(xs(&resolved), vec![(1.5, 0.5, -1)]);
    }

    #[test]
    fn self_message_points_right() {
        let actors = vec![ActorNode::leaf("a", "A"), ActorNode::leaf("b", "B")];
        let messages = vec![
            Message::new("m1", "a", "b", ""),
            Message::new("self", "b", "b", ""),
            Message::new("m2", "b", "a", ""),
        ];
        let resolved = resolve(&actors, &ExpansionSet::new(), &messages);
        assert!(resolved[1].is_self_message());
        assert_eq!(xs(&resolved), vec![(0.5, 1.5, 1), (1.5, 1.5, 1), (1.5, 0.5, -1)]);
    }

    #[test]
    fn wide_span_override_uses_facing_edge() {
        let actors = vec![
            ActorNode::leaf("a", "A"),
            ActorNode::leaf("b", "B"),
            ActorNode::leaf("c", "C"),
        ];
        let mut visibility = resolve_visibility(&actors, &ExpansionSet::new());
        assert!(visibility.override_span("b", Span { start: 1, end: 3 }));
        assert!(!visibility.override_span("ghost", Span { start: 0, end: 1 }));
        let messages = vec![
            Message::new("m1", "a", "b", ""),
            Message::new("m2", "c", "b", ""),
        ];
        let projected = project_messages(&messages, &visibility, &LayoutConfig::default());
        let resolved = resolve_endpoints(&projected, &visibility);
        assert_eq!(xs(&resolved), vec![(0.5, 1.0, 1), (2.5, 3.0, 1)]);
    }

    #[test]
    fn foreign_projection_is_skipped() {
        let actors = vec![ActorNode::leaf("a", "A")];
        let visibility = resolve_visibility(&actors, &ExpansionSet::new());
        let projected = vec![ProjectedMessage {
            message: Message::new("m", "a", "gone", ""),
            row_index: 0,
            y: 0.0,
        }];
        assert!(resolve_endpoints(&projected, &visibility).is_empty());
    }
}
