#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod paths;
pub mod render;
pub mod svg;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig};
pub use ir::{PhraseTable, ProcessDocument, ProcessGraph, ProcessNode, TextRef};
pub use layout::{Layout, LayoutError, compute_layout};
pub use parser::{InputSyntax, ParseError, parse_process, parse_process_with};
pub use render::render_svg;
pub use theme::Theme;

use anyhow::Context;

/// Theme and layout settings for a single render.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl RenderOptions {
    pub fn classic() -> Self {
        Self::from(Config::default())
    }

    pub fn modern() -> Self {
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

impl Default for RenderOptions {
    fn default() -> Self {
        Self::classic()
    }
}

impl From<Config> for RenderOptions {
    fn from(config: Config) -> Self {
        Self {
            theme: config.theme,
            layout: config.layout,
            render: config.render,
        }
    }
}

/// Parses a JSON process document and renders it to SVG with default options.
pub fn render(input: &str) -> anyhow::Result<String> {
    render_with_options(input, RenderOptions::default())
}

pub fn render_with_options(input: &str, options: RenderOptions) -> anyhow::Result<String> {
    let doc = parse_process(input).context("failed to load process definition")?;
    render_document_with_options(&doc, &options)
}

pub fn render_document_with_options(
    doc: &ProcessDocument,
    options: &RenderOptions,
) -> anyhow::Result<String> {
    let layout = compute_layout(doc, &options.theme, &options.layout).context("layout failed")?;
    let svg = render_svg(&layout, &options.theme, &options.render)?;
    Ok(svg)
}
