use std::path::Path;

use pretty_assertions::assert_eq;
use seqdia::layout::{MessageKind, SequenceLayout, VisibilityResult};
use seqdia::{
    ActorNode, Config, ExpansionSet, LayoutConfig, Message, SequenceModel, Theme, ValidationOptions,
    compute_layout, parse_model, project_messages, render_model, render_svg, resolve_endpoints,
    resolve_visibility, validate_model,
};

fn load_fixture(rel: &str) -> SequenceModel {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(rel);
    assert!(path.exists(), "fixture missing: {}", rel);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    parse_model(&input).expect("parse failed")
}

fn assert_tiles(visibility: &VisibilityResult, fixture: &str) {
    let mut next = 0;
    for node in visibility.top_level() {
        assert_eq!(node.leaf_start, next, "{fixture}: gap before {}", node.actor_id);
        assert_eq!(node.leaf_span, node.leaf_end - node.leaf_start + 1);
        next = node.leaf_end + 1;
    }
    assert_eq!(next.max(1), visibility.leaf_count, "{fixture}: columns not tiled");
}

fn message_ids(layout: &SequenceLayout) -> Vec<&str> {
    layout
        .messages
        .iter()
        .map(|m| m.message.message_id.as_str())
        .collect()
}

#[test]
fn lay_out_all_fixtures() {
    // Keep this list explicit so new fixtures must be added intentionally.
    let candidates = [
        "checkout.json5",
        "empty.json",
        "malformed.json5",
        "nested.json",
        "self_message.json",
    ];

    let config = LayoutConfig::default();
    for rel in candidates {
        let model = load_fixture(rel);
        for expanded in [
            None,
            Some(ExpansionSet::new()),
            Some({
                let mut all = ExpansionSet::new();
                all.expand_all(&model.actors);
                all
            }),
        ] {
            let layout = compute_layout(&model, expanded.as_ref(), &config);
            assert_tiles(&layout.visibility, rel);
            for (row, message) in layout.messages.iter().enumerate() {
                assert_eq!(message.row_index, row, "{rel}: rows not dense");
            }
            let svg = render_svg(&layout, &model, &Theme::modern(), &config);
            assert!(svg.contains("<svg"), "{rel}: missing <svg tag");
            assert!(svg.contains("</svg>"), "{rel}: missing </svg tag");
        }
    }
}

#[test]
fn nested_branch_scenario() {
    let model = load_fixture("nested.json");
    let config = LayoutConfig::default();

    let layout = compute_layout(&model, None, &config);
    assert_eq!(layout.leaf_count, 2);
    let visible: Vec<&str> = layout
        .rails()
        .map(|node| node.actor_id.as_str())
        .collect();
    assert_eq!(visible, vec!["leaf-a", "branch"]);
    assert_eq!(message_ids(&layout), vec!["m1"]);

    let mut expanded = ExpansionSet::default_for(&model.actors, true);
    expanded.expand("branch");
    let layout = compute_layout(&model, Some(&expanded), &config);
    assert_eq!(layout.leaf_count, 2);
    let rails: Vec<&str> = layout
        .rails()
        .map(|node| node.actor_id.as_str())
        .collect();
    assert_eq!(rails, vec!["leaf-a", "leaf-b"]);
    assert_eq!(message_ids(&layout), vec!["m1", "m2"]);
    assert_eq!(layout.messages[0].to_resolved.actor_id, "leaf-b");
    assert_eq!(layout.messages[0].kind, MessageKind::RolledUp);
}

#[test]
fn row_hints_reorder_flat_messages() {
    let actors = vec![
        ActorNode::leaf("a", "A"),
        ActorNode::leaf("b", "B"),
        ActorNode::leaf("c", "C"),
    ];
    let messages = vec![
        Message::new("m1", "a", "c", "").with_row(5),
        Message::new("m2", "a", "b", "").with_row(1),
    ];
    let visibility = resolve_visibility(&actors, &ExpansionSet::new());
    let projected = project_messages(&messages, &visibility, &LayoutConfig::default());
    let order: Vec<(&str, usize)> = projected
        .iter()
        .map(|p| (p.message.message_id.as_str(), p.row_index))
        .collect();
    assert_eq!(order, vec![("m2", 0), ("m1", 1)]);

    let resolved = resolve_endpoints(&projected, &visibility);
    assert_eq!(resolved[0].from_x, 0.5);
    assert_eq!(resolved[1].to_x, 2.5);
}

#[test]
fn checkout_expands_group_by_group() {
    let model = load_fixture("checkout.json5");
    let config = LayoutConfig::default();

    let collapsed = compute_layout(&model, None, &config);
    assert_eq!(collapsed.leaf_count, 5);
    assert!(!message_ids(&collapsed).contains(&"issue-session"));
    assert!(!message_ids(&collapsed).contains(&"stripe-call"));

    let mut expanded = ExpansionSet::default_for(&model.actors, true);
    expanded.expand("payments");
    let payments = compute_layout(&model, Some(&expanded), &config);
    assert_eq!(payments.leaf_count, 7);
    assert!(message_ids(&payments).contains(&"stripe-call"));
    assert!(!message_ids(&payments).contains(&"issue-session"));

    expanded.expand("auth");
    let all = compute_layout(&model, Some(&expanded), &config);
    assert_eq!(all.leaf_count, 8);
    assert_eq!(all.messages.len(), model.messages.len());

    // browser is left aligned, database right aligned.
    assert_eq!(all.visibility.anchor("browser"), Some(0.0));
    assert_eq!(all.visibility.anchor("database"), Some(8.0));

    expanded.collapse("auth");
    expanded.collapse("payments");
    assert_eq!(compute_layout(&model, Some(&expanded), &config), collapsed);
}

#[test]
fn payments_lifeline_stays_continuous() {
    let model = load_fixture("checkout.json5");
    let mut expanded = ExpansionSet::default_for(&model.actors, true);
    expanded.expand("payments");
    let layout = compute_layout(&model, Some(&expanded), &LayoutConfig::default());
    let by_id = |id: &str| {
        layout
            .messages
            .iter()
            .find(|m| m.message.message_id == id)
            .expect("message present")
    };

    // frontend -> payments lands on the orchestrator, the leaf facing frontend.
    let intent = by_id("intent");
    assert_eq!(intent.to_resolved.actor_id, "orchestrator");
    // The next arrow out of payments starts there instead of jumping to fraud.
    let persist = by_id("persist-intent");
    assert_eq!(persist.from_resolved.actor_id, "orchestrator");
    assert_eq!(persist.from_x, intent.to_x);
    for message in &layout.messages {
        assert_eq!(
            message.from_x, message.from_resolved.anchor,
            "{}",
            message.message.message_id
        );
    }
}

#[test]
fn self_messages_survive_layout() {
    let model = load_fixture("self_message.json");
    let layout = compute_layout(&model, None, &LayoutConfig::default());
    assert_eq!(message_ids(&layout), vec!["m1", "self", "m2"]);
    let self_message = &layout.messages[1];
    assert!(self_message.is_self_message());
    assert_eq!(self_message.from_x, self_message.to_x);
    assert_eq!(self_message.direction, 1);
}

#[test]
fn malformed_input_degrades_gracefully() {
    let model = load_fixture("malformed.json5");
    let layout = compute_layout(&model, None, &LayoutConfig::default());
    assert_eq!(layout.leaf_count, 3);
    assert_eq!(message_ids(&layout), vec!["ok", "ok"]);

    let issues = validate_model(&model, &ValidationOptions::default());
    let rendered: Vec<String> = issues.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec![
            "actor id `a` is used more than once",
            "message `lost` to actor `nobody` does not exist",
            "message id `ok` is used more than once",
        ]
    );
}

#[test]
fn empty_model_is_one_column() {
    let model = load_fixture("empty.json");
    let layout = compute_layout(&model, None, &LayoutConfig::default());
    assert_eq!(layout.leaf_count, 1);
    assert!(layout.messages.is_empty());
    assert!(layout.visibility.visible_nodes.is_empty());
}

#[test]
fn render_model_honours_expansion() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/nested.json");
    let input = std::fs::read_to_string(path).expect("fixture read failed");
    let config = Config::default();

    let collapsed = render_model(&input, None, &config).expect("render failed");
    assert!(collapsed.contains("data-message-id=\"m1\""));
    assert!(!collapsed.contains("data-message-id=\"m2\""));

    let expanded: ExpansionSet = ["root", "branch"].into_iter().collect();
    let svg = render_model(&input, Some(&expanded), &config).expect("render failed");
    assert!(svg.contains("data-message-id=\"m2\""));
    assert!(svg.contains("data-region-id=\"branch\""));

    assert!(render_model("{ actors: ", None, &config).is_err());
}
