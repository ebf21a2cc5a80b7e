use process_tree_renderer::{RenderOptions, render_with_options};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProcessRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    show_answer_labels: Option<bool>,
    embed_styles: Option<bool>,
}

fn build_render_options(options: ProcessRenderOptions) -> RenderOptions {
    let mut render_options = if options.theme.as_deref() == Some("modern") {
        RenderOptions::modern()
    } else {
        RenderOptions::classic()
    };

    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        render_options.theme.font_size = font_size;
    }
    if let Some(show) = options.show_answer_labels {
        render_options.render.show_answer_labels = show;
    }
    if let Some(embed) = options.embed_styles {
        render_options.render.embed_styles = embed;
    }
    // No system fonts in the browser.
    render_options.layout.fast_text_metrics = true;

    render_options
}

#[wasm_bindgen]
pub fn render_process_svg(document_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<ProcessRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        ProcessRenderOptions::default()
    };

    let render_options = build_render_options(options);
    render_with_options(document_json, render_options)
        .map_err(|error| JsValue::from_str(&format!("{error:#}")))
}
