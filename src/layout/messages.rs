use super::*;

/// Keeps the messages whose literal endpoints are both visible and gives them dense rows.
///
/// A message addressed to an actor hidden inside a collapsed group is dropped, not redirected
/// to the group; so is a message naming an actor that does not exist at all. Survivors are
/// ordered by `row_index` (falling back to input position) with input position breaking ties,
/// then renumbered from zero.
pub fn project_messages(
    messages: &[Message],
    visibility: &VisibilityResult,
    config: &LayoutConfig,
) -> Vec<ProjectedMessage> {
    let mut kept: Vec<(u64, usize, &Message)> = Vec::with_capacity(messages.len());
    for (position, message) in messages.iter().enumerate() {
        let from_visible = visibility.is_visible(&message.from_actor_id);
        let to_visible = visibility.is_visible(&message.to_actor_id);
        if !(from_visible && to_visible) {
            tracing::trace!(
                message = %message.message_id,
                from_visible,
                to_visible,
                "dropping message with hidden endpoint"
            );
            continue;
        }
        let hint = message
            .row_index
            .map(u64::from)
            .unwrap_or(position as u64);
        kept.push((hint, position, message));
    }
    kept.sort_by_key(|&(hint, position, _)| (hint, position));

    tracing::debug!(
        kept = kept.len(),
        dropped = messages.len() - kept.len(),
        "projected messages"
    );

    kept.into_iter()
        .enumerate()
        .map(|(row_index, (_, _, message))| ProjectedMessage {
            message: message.clone(),
            row_index,
            y: row_y(row_index, config),
        })
        .collect()
}

pub fn row_y(row_index: usize, config: &LayoutConfig) -> f32 {
    config.vertical_padding + row_index as f32 * config.row_height
}

/// Height of the message canvas for `rows` dense rows; never shorter than one row.
pub fn message_area_height(rows: usize, config: &LayoutConfig) -> f32 {
    config.vertical_padding * 2.0 + rows.max(1) as f32 * config.row_height
}
