use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Base slot size of the browser rendering; spacing constants derive from it.
const BASE_SPACING: f32 = 30.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Horizontal distance covered by one unit of subtree width.
    pub node_spacing: f32,
    /// Vertical distance between a node and its children.
    pub rank_spacing: f32,
    pub marker_radius: f32,
    /// Length of the vertical stub above a child before the connector turns.
    pub edge_jog: f32,
    pub padding: f32,
    /// Traversal depth beyond which layout aborts.
    pub max_depth: usize,
    pub label_line_height: f32,
    pub fast_text_metrics: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_spacing: BASE_SPACING * 1.1,
            rank_spacing: BASE_SPACING * 1.5,
            marker_radius: BASE_SPACING / 2.0,
            edge_jog: BASE_SPACING / 3.0,
            padding: BASE_SPACING / 2.0,
            max_depth: 50,
            label_line_height: 1.2,
            fast_text_metrics: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
    /// Embed a `<style>` block with the label/loop/answer classes.
    pub embed_styles: bool,
    /// Draw answer text next to answer edges, not only in their tooltips.
    pub show_answer_labels: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: "#FFFFFF".to_string(),
            embed_styles: true,
            show_answer_labels: true,
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
        let theme = Theme::classic();
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
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<NumberOrString>,
    background: Option<String>,
    text_color: Option<String>,
    line_color: Option<String>,
    marker_fill: Option<String>,
    marker_stroke: Option<String>,
    choice_fill: Option<String>,
    end_fill: Option<String>,
    loop_stroke: Option<String>,
    answer_color: Option<String>,
    highlight_color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f32),
    String(String),
}

impl NumberOrString {
    fn as_f32(&self) -> Option<f32> {
        match self {
            NumberOrString::Number(val) => Some(*val),
            NumberOrString::String(val) => val.trim().trim_end_matches("px").parse::<f32>().ok(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    node_spacing: Option<f32>,
    rank_spacing: Option<f32>,
    marker_radius: Option<f32>,
    edge_jog: Option<f32>,
    padding: Option<f32>,
    max_depth: Option<usize>,
    label_line_height: Option<f32>,
    fast_text_metrics: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    embed_styles: Option<bool>,
    show_answer_labels: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
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
        match theme_name {
            "modern" => config.theme = Theme::modern(),
            "classic" | "default" => config.theme = Theme::classic(),
            other => log::warn!("unknown theme \"{other}\", keeping the default"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size.as_ref().and_then(NumberOrString::as_f32) {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.marker_fill {
            config.theme.marker_fill = v;
        }
        if let Some(v) = vars.marker_stroke {
            config.theme.marker_stroke = v;
        }
        if let Some(v) = vars.choice_fill {
            config.theme.choice_fill = v;
        }
        if let Some(v) = vars.end_fill {
            config.theme.end_fill = v;
        }
        if let Some(v) = vars.loop_stroke {
            config.theme.loop_stroke = v;
        }
        if let Some(v) = vars.answer_color {
            config.theme.answer_color = v;
        }
        if let Some(v) = vars.highlight_color {
            config.theme.highlight_color = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.node_spacing {
            config.layout.node_spacing = v;
        }
        if let Some(v) = layout.rank_spacing {
            config.layout.rank_spacing = v;
        }
        if let Some(v) = layout.marker_radius {
            config.layout.marker_radius = v;
        }
        if let Some(v) = layout.edge_jog {
            config.layout.edge_jog = v;
        }
        if let Some(v) = layout.padding {
            config.layout.padding = v;
        }
        if let Some(v) = layout.max_depth {
            config.layout.max_depth = v;
        }
        if let Some(v) = layout.label_line_height {
            config.layout.label_line_height = v;
        }
        if let Some(v) = layout.fast_text_metrics {
            config.layout.fast_text_metrics = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.embed_styles {
            config.render.embed_styles = v;
        }
        if let Some(v) = render.show_answer_labels {
            config.render.show_answer_labels = v;
        }
    }

    config.render.background = config.theme.background.clone();

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_base_spacing() {
        let layout = LayoutConfig::default();
        assert!((layout.node_spacing - 33.0).abs() < 1e-4);
        assert!((layout.rank_spacing - 45.0).abs() < 1e-4);
        assert_eq!(layout.marker_radius, 15.0);
        assert_eq!(layout.max_depth, 50);
    }

    #[test]
    fn overlays_present_fields_only() {
        let config = parse_config(
            r##"{
                "theme": "modern",
                "themeVariables": {"fontSize": "14px", "loopStroke": "#FF0000", "background": "#101010"},
                "layout": {"nodeSpacing": 40, "maxDepth": 10},
                "render": {"embedStyles": false}
            }"##,
        )
        .unwrap();
        assert_eq!(config.theme.font_size, 14.0);
        assert_eq!(config.theme.loop_stroke, "#FF0000");
        assert_eq!(config.theme.line_color, Theme::modern().line_color);
        assert_eq!(config.layout.node_spacing, 40.0);
        assert_eq!(config.layout.max_depth, 10);
        assert_eq!(config.layout.marker_radius, 15.0);
        assert!(!config.render.embed_styles);
        assert!(config.render.show_answer_labels);
        assert_eq!(config.render.background, "#101010");
    }

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.theme.font_family, Theme::classic().font_family);
    }
}
