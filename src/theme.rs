use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static HSL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"hsl\(\s*([-\d.]+)\s+([-\d.]+)%\s+([-\d.]+)%").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub primary_color: String,
    pub primary_text_color: String,
    pub primary_border_color: String,
    pub line_color: String,
    pub region_color: String,
    pub rail_color: String,
    pub edge_label_background: String,
    pub background: String,
}

impl Theme {
    pub fn mermaid_default() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_size: 16.0,
            primary_color: "#ECECFF".to_string(),
            primary_text_color: "#333333".to_string(),
            primary_border_color: "#9370DB".to_string(),
            line_color: "#333333".to_string(),
            region_color: "hsl(60 100% 96%)".to_string(),
            rail_color: "hsl(0 0% 60%)".to_string(),
            edge_label_background: "#E8E8E8".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            primary_color: "#F8FAFF".to_string(),
            primary_text_color: "#1C2430".to_string(),
            primary_border_color: "#C7D2E5".to_string(),
            line_color: "#111827".to_string(),
            region_color: "hsl(215 16% 70%)".to_string(),
            rail_color: "hsl(215 16% 70%)".to_string(),
            edge_label_background: "#FFFFFF".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    /// Stable per-actor accent color. `index` is the actor's position among visible nodes.
    pub fn actor_color(&self, actor_id: &str, index: usize) -> String {
        let hue = (hash_id(actor_id) + (index % 360) as u32 * 5) % 360;
        format!("hsl({hue}.0 72% 52%)")
    }
}

fn hash_id(id: &str) -> u32 {
    let mut hash: u32 = 0;
    for unit in id.encode_utf16() {
        hash = (hash * 31 + unit as u32) % 360;
    }
    hash
}

/// Returns `color` with its lightness replaced. Only `hsl(h s% l%)` colors are rewritten;
/// anything else comes back unchanged.
pub fn soft_color(color: &str, lightness: f32) -> String {
    let Some(caps) = HSL_RE.captures(color) else {
        return color.to_string();
    };
    let hue: f32 = caps[1].parse().unwrap_or(0.0);
    let saturation: f32 = caps[2].parse().unwrap_or(0.0);
    let saturation = saturation.clamp(0.0, 100.0);
    let lightness = lightness.clamp(0.0, 100.0);
    format!("hsl({hue} {saturation}% {lightness}%)")
}
