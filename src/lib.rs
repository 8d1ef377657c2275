#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod expansion;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod theme;
pub mod validate;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig};
pub use error::{Error, Result};
pub use expansion::ExpansionSet;
pub use ir::{ActorNode, Alignment, Message, SequenceModel};
pub use layout::{
    SequenceLayout, VisibilityResult, compute_layout, project_messages, resolve_endpoints,
    resolve_visibility,
};
pub use parser::parse_model;
pub use render::render_svg;
pub use theme::Theme;
pub use validate::{ValidationIssue, ValidationOptions, validate_model};

/// Parses a model and renders it as SVG with the given expansion state.
pub fn render_model(
    input: &str,
    expanded: Option<&ExpansionSet>,
    config: &Config,
) -> Result<String> {
    let model = parse_model(input)?;
    let layout = compute_layout(&model, expanded, &config.layout);
    Ok(render_svg(&layout, &model, &config.theme, &config.layout))
}
