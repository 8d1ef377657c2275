use seqdia::layout_dump::LayoutDump;
use seqdia::{Config, ExpansionSet, SequenceLayout, SequenceModel, Theme, compute_layout};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SequenceRenderOptions {
    /// Expanded group ids. Absent means the groups that expand by default.
    expanded: Option<Vec<String>>,
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    column_width: Option<f32>,
    row_height: Option<f32>,
    vertical_padding: Option<f32>,
    header_row_height: Option<f32>,
    default_expanded: Option<bool>,
}

fn build_config(options: &SequenceRenderOptions) -> Config {
    let mut config = Config::default();
    if options.theme.as_deref() == Some("default") {
        config.theme = Theme::mermaid_default();
    }
    if let Some(font_family) = &options.font_family {
        config.theme.font_family = font_family.clone();
    }
    if let Some(font_size) = options.font_size {
        config.theme.font_size = font_size;
    }

    let layout = &mut config.layout;
    if let Some(column_width) = options.column_width {
        layout.column_width = column_width;
    }
    if let Some(row_height) = options.row_height {
        layout.row_height = row_height;
    }
    if let Some(vertical_padding) = options.vertical_padding {
        layout.vertical_padding = vertical_padding;
    }
    if let Some(header_row_height) = options.header_row_height {
        layout.header_row_height = header_row_height;
    }
    if let Some(default_expanded) = options.default_expanded {
        layout.default_expanded = default_expanded;
    }
    config
}

fn parse_options(options_json: Option<String>) -> Result<SequenceRenderOptions, String> {
    match options_json {
        Some(raw) => serde_json::from_str(&raw).map_err(|error| error.to_string()),
        None => Ok(SequenceRenderOptions::default()),
    }
}

fn lay_out(
    model_json: &str,
    options_json: Option<String>,
) -> Result<(SequenceModel, SequenceLayout, Config), String> {
    let options = parse_options(options_json)?;
    let model = seqdia::parse_model(model_json).map_err(|error| error.to_string())?;
    let config = build_config(&options);
    let expanded: Option<ExpansionSet> = options.expanded.map(|ids| ids.into_iter().collect());
    let layout = compute_layout(&model, expanded.as_ref(), &config.layout);
    Ok((model, layout, config))
}

fn layout_json(model_json: &str, options_json: Option<String>) -> Result<String, String> {
    let (_, layout, config) = lay_out(model_json, options_json)?;
    LayoutDump::from_layout(&layout, &config.layout)
        .to_json()
        .map_err(|error| error.to_string())
}

fn svg(model_json: &str, options_json: Option<String>) -> Result<String, String> {
    let (model, layout, config) = lay_out(model_json, options_json)?;
    Ok(seqdia::render_svg(&layout, &model, &config.theme, &config.layout))
}

/// Lays out a sequence model and returns the layout as JSON.
#[wasm_bindgen]
pub fn layout_sequence(model_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    layout_json(model_json, options_json).map_err(|error| JsValue::from_str(&error))
}

#[wasm_bindgen]
pub fn render_sequence_svg(
    model_json: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    svg(model_json, options_json).map_err(|error| JsValue::from_str(&error))
}
