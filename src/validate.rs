//! Optional model checks run ahead of layout.
//!
//! Layout itself never rejects input: unknown endpoints are dropped and duplicate ids are an
//! unchecked precondition. Hosts that want to surface those problems run [`validate_model`]
//! separately and report the issues.

use crate::error::{Error, Result};
use crate::ir::{ActorTree, SequenceModel};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    From,
    To,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::From => f.write_str("from"),
            Endpoint::To => f.write_str("to"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationIssue {
    #[error("actor id `{actor_id}` is used more than once")]
    DuplicateActorId { actor_id: String },

    #[error("actor at `{path}` has an empty id")]
    EmptyActorId { path: String },

    #[error("message id `{message_id}` is used more than once")]
    DuplicateMessageId { message_id: String },

    #[error("message `{message_id}` {side} actor `{actor_id}` does not exist")]
    UnknownEndpoint {
        message_id: String,
        actor_id: String,
        side: Endpoint,
    },

    #[error("row index {row_index} is shared by messages {}", .message_ids.join(", "))]
    DuplicateRowIndex {
        row_index: u32,
        message_ids: Vec<String>,
    },

    #[error("message `{message_id}` starts at `{actual_from}` but the previous message ended at `{expected_from}`")]
    BrokenChain {
        message_id: String,
        expected_from: String,
        actual_from: String,
    },

    #[error("message `{message_id}` targets group `{actor_id}`; only leaf actors are allowed")]
    NonLeafEndpoint { message_id: String, actor_id: String },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationOptions {
    /// Each message must start where the previous one ended.
    pub linear: bool,
    /// Message endpoints must be actors without children.
    pub leaf_only: bool,
}

pub fn validate_model(model: &SequenceModel, options: &ValidationOptions) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let tree = ActorTree::new(&model.actors);

    let mut seen_actors = HashSet::new();
    let mut reported_actors = HashSet::new();
    for (idx, entry) in tree.iter().enumerate() {
        let id = entry.node.actor_id.as_str();
        if id.is_empty() {
            issues.push(ValidationIssue::EmptyActorId {
                path: label_path(&tree, idx),
            });
            continue;
        }
        if !seen_actors.insert(id) && reported_actors.insert(id) {
            issues.push(ValidationIssue::DuplicateActorId {
                actor_id: id.to_string(),
            });
        }
    }

    let mut seen_messages = HashSet::new();
    let mut reported_messages = HashSet::new();
    let mut rows: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    let mut previous_to: Option<&str> = None;
    for message in &model.messages {
        let id = message.message_id.as_str();
        if !seen_messages.insert(id) && reported_messages.insert(id) {
            issues.push(ValidationIssue::DuplicateMessageId {
                message_id: id.to_string(),
            });
        }

        for (side, actor_id) in [
            (Endpoint::From, &message.from_actor_id),
            (Endpoint::To, &message.to_actor_id),
        ] {
            match tree.get(actor_id) {
                None => issues.push(ValidationIssue::UnknownEndpoint {
                    message_id: id.to_string(),
                    actor_id: actor_id.clone(),
                    side,
                }),
                Some(entry) if options.leaf_only && entry.node.has_children() => {
                    issues.push(ValidationIssue::NonLeafEndpoint {
                        message_id: id.to_string(),
                        actor_id: actor_id.clone(),
                    })
                }
                Some(_) => {}
            }
        }

        if let Some(row) = message.row_index {
            rows.entry(row).or_default().push(id.to_string());
        }

        if options.linear {
            if let Some(expected) = previous_to {
                if expected != message.from_actor_id {
                    issues.push(ValidationIssue::BrokenChain {
                        message_id: id.to_string(),
                        expected_from: expected.to_string(),
                        actual_from: message.from_actor_id.clone(),
                    });
                }
            }
            previous_to = Some(message.to_actor_id.as_str());
        }
    }

    for (row_index, message_ids) in rows {
        if message_ids.len() > 1 {
            issues.push(ValidationIssue::DuplicateRowIndex {
                row_index,
                message_ids,
            });
        }
    }

    issues
}

pub fn validate_strict(model: &SequenceModel, options: &ValidationOptions) -> Result<()> {
    let issues = validate_model(model, options);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation { issues })
    }
}

fn label_path(tree: &ActorTree<'_>, idx: usize) -> String {
    let mut labels: Vec<&str> = tree
        .ancestors(idx)
        .map(|ancestor| tree.entry(ancestor).node.label.as_str())
        .collect();
    labels.reverse();
    labels.push(tree.entry(idx).node.label.as_str());
    labels.join(" / ")
}
