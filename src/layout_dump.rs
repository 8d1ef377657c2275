use crate::config::LayoutConfig;
use crate::layout::{MessageKind, SequenceLayout};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub leaf_count: usize,
    pub column_width: f32,
    pub width: f32,
    pub header_height: f32,
    pub message_area_height: f32,
    pub actors: Vec<ActorDump>,
    pub header_rows: Vec<Vec<String>>,
    pub messages: Vec<MessageDump>,
    pub active_actors: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorDump {
    pub id: String,
    pub label: String,
    pub depth: usize,
    pub parent: Option<String>,
    pub leaf_start: usize,
    pub leaf_end: usize,
    pub leaf_span: usize,
    pub anchor: f32,
    pub expanded: bool,
    pub has_children: bool,
    pub is_leaf: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDump {
    pub id: String,
    pub from: String,
    pub to: String,
    pub drawn_from: String,
    pub drawn_to: String,
    pub row: usize,
    pub y: f32,
    pub from_x: f32,
    pub to_x: f32,
    pub direction: i8,
    pub kind: MessageKind,
}

impl LayoutDump {
    pub fn from_layout(layout: &SequenceLayout, config: &LayoutConfig) -> Self {
        let config = config.sanitized();
        let visibility = &layout.visibility;
        let actors = visibility
            .visible_nodes
            .iter()
            .map(|node| ActorDump {
                id: node.actor_id.clone(),
                label: node.label.clone(),
                depth: node.depth,
                parent: node.parent_actor_id.clone(),
                leaf_start: node.leaf_start,
                leaf_end: node.leaf_end,
                leaf_span: node.leaf_span,
                anchor: node.anchor,
                expanded: node.expanded,
                has_children: node.has_children,
                is_leaf: node.is_leaf,
            })
            .collect();

        let header_rows = visibility
            .header_rows
            .iter()
            .map(|row| {
                visibility
                    .header_nodes(row)
                    .map(|node| node.actor_id.clone())
                    .collect()
            })
            .collect();

        let messages = layout
            .messages
            .iter()
            .map(|message| MessageDump {
                id: message.message.message_id.clone(),
                from: message.message.from_actor_id.clone(),
                to: message.message.to_actor_id.clone(),
                drawn_from: message.from_resolved.actor_id.clone(),
                drawn_to: message.to_resolved.actor_id.clone(),
                row: message.row_index,
                y: message.y,
                from_x: message.from_x,
                to_x: message.to_x,
                direction: message.direction,
                kind: message.kind,
            })
            .collect();

        LayoutDump {
            leaf_count: layout.leaf_count,
            column_width: config.column_width,
            width: layout.canvas_width(config.column_width),
            header_height: layout.header_height(),
            message_area_height: layout.message_area_height,
            actors,
            header_rows,
            messages,
            active_actors: layout
                .active_actors()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn write_layout_dump(
    path: &Path,
    layout: &SequenceLayout,
    config: &LayoutConfig,
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, config);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expansion::ExpansionSet;
    use crate::ir::{ActorNode, Message, SequenceModel};
    use crate::layout::compute_layout;

    #[test]
    fn dump_serializes_camel_case() {
        let model = SequenceModel::new(
            vec![
                ActorNode::leaf("a", "A"),
                ActorNode::group("g", "G", vec![ActorNode::leaf("b", "B")]),
            ],
            vec![Message::new("m1", "a", "g", "hi")],
        );
        let expanded: ExpansionSet = ["g"].into_iter().collect();
        let config = LayoutConfig::default();
        let layout = compute_layout(&model, Some(&expanded), &config);
        let dump = LayoutDump::from_layout(&layout, &config);

        assert_eq!(dump.header_rows, vec![vec!["a", "g"], vec!["b"]]);
        assert_eq!(dump.messages[0].drawn_to, "b");
        assert_eq!(dump.width, 360.0);

        let json = dump.to_json().unwrap();
        assert!(json.contains("\"leafCount\": 2"));
        assert!(json.contains("\"kind\": \"rolledUp\""));
    }
}
