use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub column_width: f32,
    pub row_height: f32,
    pub vertical_padding: f32,
    pub header_row_height: f32,
    pub min_arrow_width_ratio: f32,
    /// Used for groups that leave `default_expanded` unset.
    pub default_expanded: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            column_width: 180.0,
            row_height: 56.0,
            vertical_padding: 32.0,
            header_row_height: 52.0,
            min_arrow_width_ratio: 0.35,
            default_expanded: true,
        }
    }
}

impl LayoutConfig {
    pub fn sanitized(&self) -> Self {
        Self {
            column_width: finite_or(self.column_width, 180.0).max(1.0),
            row_height: finite_or(self.row_height, 56.0).max(1.0),
            vertical_padding: finite_or(self.vertical_padding, 32.0).max(0.0),
            header_row_height: finite_or(self.header_row_height, 52.0).max(1.0),
            min_arrow_width_ratio: finite_or(self.min_arrow_width_ratio, 0.35).max(0.0),
            default_expanded: self.default_expanded,
        }
    }

    pub fn min_arrow_width(&self) -> f32 {
        self.column_width * self.min_arrow_width_ratio
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::modern();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    primary_color: Option<String>,
    primary_text_color: Option<String>,
    primary_border_color: Option<String>,
    line_color: Option<String>,
    region_color: Option<String>,
    rail_color: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    column_width: Option<f32>,
    row_height: Option<f32>,
    vertical_padding: Option<f32>,
    header_row_height: Option<f32>,
    min_arrow_width_ratio: Option<f32>,
    default_expanded: Option<bool>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "modern" {
            config.theme = Theme::modern();
        } else if theme_name == "base" || theme_name == "default" || theme_name == "mermaid" {
            config.theme = Theme::mermaid_default();
        }
        config.render.background = config.theme.background.clone();
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.primary_color {
            config.theme.primary_color = v;
        }
        if let Some(v) = vars.primary_text_color {
            config.theme.primary_text_color = v;
        }
        if let Some(v) = vars.primary_border_color {
            config.theme.primary_border_color = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.region_color {
            config.theme.region_color = v;
        }
        if let Some(v) = vars.rail_color {
            config.theme.rail_color = v;
        }
        if let Some(v) = vars.background {
            config.render.background = v.clone();
            config.theme.background = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.column_width {
            config.layout.column_width = v;
        }
        if let Some(v) = layout.row_height {
            config.layout.row_height = v;
        }
        if let Some(v) = layout.vertical_padding {
            config.layout.vertical_padding = v;
        }
        if let Some(v) = layout.header_row_height {
            config.layout.header_row_height = v;
        }
        if let Some(v) = layout.min_arrow_width_ratio {
            config.layout.min_arrow_width_ratio = v;
        }
        if let Some(v) = layout.default_expanded {
            config.layout.default_expanded = v;
        }
    }

    Ok(config)
}
