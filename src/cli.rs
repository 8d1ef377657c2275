use crate::config::load_config;
use crate::error::Error;
use crate::expansion::ExpansionSet;
use crate::ir::{ActorTree, SequenceModel};
use crate::layout::compute_layout;
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::parser::parse_model;
#[cfg(feature = "png")]
use crate::render::write_output_png;
use crate::render::{render_svg, write_output_svg};
use crate::validate::{ValidationOptions, validate_model};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "seqdia",
    version,
    about = "Lay out sequence diagrams with collapsible actor groups"
)]
pub struct Args {
    /// Input model (.json / .json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for SVG and JSON.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme and layout metrics)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Expand a group on top of the default expansion state (repeatable)
    #[arg(long = "expand", value_name = "ACTOR_ID")]
    pub expand: Vec<String>,

    /// Collapse a group on top of the default expansion state (repeatable)
    #[arg(long = "collapse", value_name = "ACTOR_ID")]
    pub collapse: Vec<String>,

    /// Start from every group expanded
    #[arg(long = "expand-all", conflicts_with = "collapse_all")]
    pub expand_all: bool,

    /// Start from every group collapsed
    #[arg(long = "collapse-all")]
    pub collapse_all: bool,

    /// Report model issues on stderr before laying out
    #[arg(long = "validate")]
    pub validate: bool,

    /// Fail when validation reports any issue (implies --validate)
    #[arg(long = "strict")]
    pub strict: bool,

    /// Require each message to start where the previous one ended
    #[arg(long = "linear")]
    pub linear: bool,

    /// Require message endpoints to be leaf actors
    #[arg(long = "leaf-only")]
    pub leaf_only: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    let input = read_input(args.input.as_deref())?;
    let model = parse_model(&input)?;

    check_model(&args, &model)?;

    let expanded = expansion_from_args(&args, &model, config.layout.default_expanded);
    let layout = compute_layout(&model, Some(&expanded), &config.layout);

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(&layout, &model, &config.theme, &config.layout);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Json => match args.output.as_deref() {
            Some(path) => write_layout_dump(path, &layout, &config.layout)?,
            None => println!("{}", LayoutDump::from_layout(&layout, &config.layout).to_json()?),
        },
        #[cfg(feature = "png")]
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = render_svg(&layout, &model, &config.theme, &config.layout);
            write_output_png(&svg, &output, &config.render)?;
        }
        #[cfg(not(feature = "png"))]
        OutputFormat::Png => {
            return Err(anyhow::anyhow!(
                "PNG output requires the `png` feature"
            ));
        }
    }

    if let Some(path) = args.output.as_deref() {
        tracing::info!(path = %path.display(), "output written");
    }
    Ok(())
}

fn check_model(args: &Args, model: &SequenceModel) -> Result<()> {
    if !(args.validate || args.strict) {
        return Ok(());
    }
    let options = ValidationOptions {
        linear: args.linear,
        leaf_only: args.leaf_only,
    };
    let issues = validate_model(model, &options);
    for issue in &issues {
        tracing::warn!(%issue, "model validation");
    }
    if args.strict && !issues.is_empty() {
        return Err(Error::Validation { issues }.into());
    }
    Ok(())
}

fn expansion_from_args(args: &Args, model: &SequenceModel, fallback: bool) -> ExpansionSet {
    let mut expanded = if args.expand_all {
        let mut all = ExpansionSet::new();
        all.expand_all(&model.actors);
        all
    } else if args.collapse_all {
        ExpansionSet::new()
    } else {
        ExpansionSet::default_for(&model.actors, fallback)
    };

    let tree = ActorTree::new(&model.actors);
    for id in &args.expand {
        if !tree.contains(id) {
            tracing::warn!(actor = %id, "--expand names an unknown actor");
        }
        expanded.expand(id);
    }
    for id in &args.collapse {
        if !tree.contains(id) {
            tracing::warn!(actor = %id, "--collapse names an unknown actor");
        }
        expanded.collapse(id);
    }
    expanded
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

#[cfg(feature = "png")]
fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
