use crate::config::LayoutConfig;
#[cfg(feature = "png")]
use crate::config::RenderConfig;
use crate::ir::{Alignment, SequenceModel};
use crate::layout::{ResolvedMessage, SequenceLayout, VisibleNode};
use crate::theme::{Theme, soft_color};
use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;

const CELL_INSET: f32 = 4.0;
const CELL_TEXT_PAD: f32 = 10.0;
const SELF_LOOP_HEIGHT: f32 = 14.0;
// Rough average glyph width as a fraction of the font size.
const LABEL_CHAR_WIDTH: f32 = 0.55;

pub fn render_svg(
    layout: &SequenceLayout,
    model: &SequenceModel,
    theme: &Theme,
    config: &LayoutConfig,
) -> String {
    let config = config.sanitized();
    let cw = config.column_width;
    let header_height = layout.header_height();
    let width = layout.canvas_width(cw);
    let height = header_height + layout.message_area_height;
    let colors = actor_colors(layout, theme);
    let active = layout.active_actors();

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    if let Some(title) = model.title.as_deref() {
        svg.push_str(&format!("<title>{}</title>", escape_xml(title)));
    }
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));
    svg.push_str("<defs>");
    svg.push_str(&format!(
        "<marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"6\" markerHeight=\"6\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker>",
        theme.line_color
    ));
    svg.push_str("</defs>");

    // Regions sit under everything else, outermost first.
    for region in layout.regions() {
        let span = layout
            .visibility
            .span(&region.actor_id)
            .unwrap_or_else(|| region.span());
        let base = colors
            .get(region.actor_id.as_str())
            .map(String::as_str)
            .unwrap_or(theme.region_color.as_str());
        svg.push_str(&format!(
            "<rect data-region-id=\"{}\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\"/>",
            escape_xml(&region.actor_id),
            span.start as f32 * cw,
            header_height,
            span.width() as f32 * cw,
            layout.message_area_height,
            soft_color(base, 97.5)
        ));
    }

    for node in &layout.visibility.visible_nodes {
        render_header_cell(&mut svg, node, colors.get(node.actor_id.as_str()), theme, &config);
    }

    for rail in layout.rails() {
        let x = rail.anchor * cw;
        let base = colors
            .get(rail.actor_id.as_str())
            .map(String::as_str)
            .unwrap_or(theme.rail_color.as_str());
        let stroke = if active.contains(rail.actor_id.as_str()) {
            base.to_string()
        } else {
            soft_color(&theme.rail_color, 70.0)
        };
        svg.push_str(&format!(
            "<line data-rail-id=\"{}\" x1=\"{x:.2}\" y1=\"{header_height:.2}\" x2=\"{x:.2}\" y2=\"{height:.2}\" stroke=\"{stroke}\" stroke-width=\"2\"/>",
            escape_xml(&rail.actor_id),
        ));
    }

    for message in &layout.messages {
        render_message(&mut svg, message, header_height, theme, &config);
    }

    svg.push_str("</svg>");
    svg
}

fn render_header_cell(
    svg: &mut String,
    node: &VisibleNode,
    color: Option<&String>,
    theme: &Theme,
    config: &LayoutConfig,
) {
    let cw = config.column_width;
    let x = node.leaf_start as f32 * cw + CELL_INSET;
    let y = node.depth as f32 * config.header_row_height + CELL_INSET;
    let width = (node.leaf_span as f32 * cw - CELL_INSET * 2.0).max(1.0);
    let height = (config.header_row_height - CELL_INSET * 2.0).max(1.0);
    let border = color.map(String::as_str).unwrap_or(theme.primary_border_color.as_str());
    let fill = color
        .map(|c| soft_color(c, 99.4))
        .unwrap_or_else(|| theme.primary_color.clone());

    svg.push_str(&format!(
        "<g data-actor-id=\"{}\"><rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{width:.2}\" height=\"{height:.2}\" rx=\"6\" ry=\"6\" fill=\"{fill}\" stroke=\"{border}\"/>",
        escape_xml(&node.actor_id),
    ));

    let (text_x, text_anchor) = match node.alignment {
        Alignment::Left => (x + CELL_TEXT_PAD, "start"),
        Alignment::Right => (x + width - CELL_TEXT_PAD, "end"),
        Alignment::Center => (x + width / 2.0, "middle"),
    };
    let marker = match (node.has_children, node.expanded) {
        (true, true) => "\u{25BE} ",
        (true, false) => "\u{25B8} ",
        _ => "",
    };
    svg.push_str(&format!(
        "<text x=\"{text_x:.2}\" y=\"{:.2}\" text-anchor=\"{text_anchor}\" dominant-baseline=\"middle\" font-family=\"{}\" font-size=\"{}\" font-weight=\"600\" fill=\"{}\">{}{}</text></g>",
        y + height / 2.0,
        escape_xml(&theme.font_family),
        theme.font_size,
        theme.primary_text_color,
        marker,
        escape_xml(&node.label)
    ));
}

fn render_message(
    svg: &mut String,
    message: &ResolvedMessage,
    header_height: f32,
    theme: &Theme,
    config: &LayoutConfig,
) {
    let cw = config.column_width;
    let y = header_height + message.y;
    let from = message.from_x * cw;
    let to = message.to_x * cw;
    let id = escape_xml(&message.message.message_id);

    let (path, label_x) = if message.is_self_message() || (to - from).abs() < f32::EPSILON {
        let loop_width = config.min_arrow_width();
        (
            format!(
                "M {from:.2} {y:.2} H {:.2} V {:.2} H {from:.2}",
                from + loop_width,
                y + SELF_LOOP_HEIGHT
            ),
            from + loop_width / 2.0,
        )
    } else {
        let (left, span) = message.pixel_span(cw, 0.0);
        (
            format!("M {from:.2} {y:.2} H {to:.2}"),
            left + span / 2.0,
        )
    };

    svg.push_str(&format!(
        "<g data-message-id=\"{id}\" data-direction=\"{}\"><path d=\"{path}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\" marker-end=\"url(#arrow)\"/>",
        message.direction, theme.line_color
    ));
    svg.push_str(&format!(
        "<circle cx=\"{from:.2}\" cy=\"{y:.2}\" r=\"3.5\" fill=\"{}\"/>",
        theme.line_color
    ));
    if !message.message.label.is_empty() {
        let font_size = theme.font_size * 0.9;
        let label_width = message.message.label.chars().count() as f32 * font_size * LABEL_CHAR_WIDTH
            + CELL_INSET * 2.0;
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{label_width:.2}\" height=\"{:.2}\" rx=\"3\" ry=\"3\" fill=\"{}\" fill-opacity=\"0.85\"/>",
            label_x - label_width / 2.0,
            y - 6.0 - font_size,
            font_size + CELL_INSET,
            theme.edge_label_background
        ));
        svg.push_str(&format!(
            "<text x=\"{label_x:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            y - 6.0,
            escape_xml(&theme.font_family),
            font_size,
            theme.primary_text_color,
            escape_xml(&message.message.label)
        ));
    }
    svg.push_str("</g>");
}

fn actor_colors<'a>(layout: &'a SequenceLayout, theme: &Theme) -> HashMap<&'a str, String> {
    layout
        .visibility
        .visible_nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.actor_id.as_str(), theme.actor_color(&node.actor_id, idx)))
        .collect()
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .unwrap_or(usvg::Size::from_wh(800.0, 600.0).unwrap());

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
