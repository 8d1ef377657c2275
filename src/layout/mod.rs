mod endpoints;
mod messages;
pub(crate) mod types;
mod visibility;
pub use endpoints::*;
pub use messages::*;
pub use types::*;
pub use visibility::*;

use crate::config::LayoutConfig;
use crate::expansion::ExpansionSet;
use crate::ir::{ActorNode, ActorTree, Alignment, Message, SequenceModel};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

/// Runs visibility, projection and endpoint resolution for one model snapshot.
///
/// `expanded` is the caller's current expansion state; `None` uses the groups that expand by
/// default. Nothing is cached: every call recomputes from its inputs.
pub fn compute_layout(
    model: &SequenceModel,
    expanded: Option<&ExpansionSet>,
    config: &LayoutConfig,
) -> SequenceLayout {
    let config = config.sanitized();
    let tree = ActorTree::new(&model.actors);
    let expanded = match expanded {
        Some(set) => Cow::Borrowed(set),
        None => Cow::Owned(ExpansionSet::default_for(
            &model.actors,
            config.default_expanded,
        )),
    };

    let visibility = resolve_tree_visibility(&tree, &expanded);
    let projected = project_messages(&model.messages, &visibility, &config);
    let messages = resolve_endpoints(&projected, &visibility);

    SequenceLayout {
        leaf_count: visibility.leaf_count,
        header_row_height: config.header_row_height,
        message_area_height: message_area_height(messages.len(), &config),
        visibility,
        messages,
    }
}
