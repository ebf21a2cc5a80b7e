use crate::config::load_config;
use crate::ir::START_ID;
use crate::layout::compute_layout;
use crate::layout_dump::write_layout_dump;
use crate::parser::{InputSyntax, parse_process_with};
use crate::paths::{format_path, simple_paths};
use crate::render::{render_svg, write_output_svg};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "ptree", version, about = "Render a process/dialogue flow as an SVG tree")]
pub struct Args {
    /// Input file (.json/.json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme, themeVariables, layout, render)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Read the input as JSON5
    #[arg(long = "json5")]
    pub json5: bool,

    /// Print every simple path from the start node to this node instead of rendering
    #[arg(long = "paths-to", value_name = "ID")]
    pub paths_to: Option<String>,

    /// Also write the computed layout as JSON
    #[arg(long = "dumpLayout", value_name = "FILE")]
    pub dump_layout: Option<PathBuf>,

    /// Canvas width for PNG output
    #[arg(short = 'w', long = "width", default_value_t = 1200.0)]
    pub width: f32,

    /// Canvas height for PNG output
    #[arg(short = 'H', long = "height", default_value_t = 800.0)]
    pub height: f32,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())
        .with_context(|| format!("failed to read config {:?}", args.config))?;
    config.render.width = args.width;
    config.render.height = args.height;

    let (input, is_json5) = read_input(args.input.as_deref())?;
    let syntax = if args.json5 || is_json5 {
        InputSyntax::Json5
    } else {
        InputSyntax::Json
    };
    let doc = parse_process_with(&input, syntax).context("failed to load process definition")?;

    if let Some(target) = args.paths_to.as_deref() {
        for path in simple_paths(&doc.graph, START_ID, target)? {
            println!("{}", format_path(&path));
        }
        return Ok(());
    }

    let layout = compute_layout(&doc, &config.theme, &config.layout)?;
    if let Some(dump_path) = args.dump_layout.as_deref() {
        write_layout_dump(dump_path, &layout)
            .with_context(|| format!("failed to write layout dump to {}", dump_path.display()))?;
    }
    let svg = render_svg(&layout, &config.theme, &config.render)?;

    match args.output_format {
        OutputFormat::Svg => write_output_svg(&svg, args.output.as_deref())?,
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_png(&svg, &output, &config.render)?;
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, render: &crate::config::RenderConfig) -> Result<()> {
    crate::render::write_output_png(svg, output, render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _render: &crate::config::RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn read_input(path: Option<&Path>) -> Result<(String, bool)> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        return Ok((content, is_json5_path(path)));
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok((buf, false))
}

fn is_json5_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json5"))
        .unwrap_or(false)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
