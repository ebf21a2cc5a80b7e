use crate::config::RenderConfig;
use crate::layout::{EdgeLayout, Layout, SlotLayout, TextBlock};
use crate::svg::{self, Canvas, DrawError, Element, GroupGuard, SvgDocument, fmt_num, points_to_path, translate};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

pub fn render_svg(layout: &Layout, theme: &Theme, config: &RenderConfig) -> Result<String, DrawError> {
    Ok(render_document(layout, theme, config)?.to_svg_string())
}

/// Builds the SVG tree: the slot hierarchy as nested groups, with the edge
/// group inserted as the root's first child so connectors sit beneath slots.
pub fn render_document(
    layout: &Layout,
    theme: &Theme,
    config: &RenderConfig,
) -> Result<SvgDocument, DrawError> {
    let mut doc = SvgDocument::new(layout.width, layout.height);
    doc.root_mut()
        .set_attr(
            "viewBox",
            format!(
                "{} {} {} {}",
                fmt_num(layout.view_origin.0),
                fmt_num(layout.view_origin.1),
                fmt_num(layout.width),
                fmt_num(layout.height)
            ),
        )
        .set_attr("style", format!("background-color: {}", config.background));

    if config.embed_styles {
        doc.add(style_element(theme));
    }

    if let Some(root) = layout.root() {
        let transform = translate(root.origin.0, root.origin.1);
        let mut tree = doc.group(&[
            "class",
            "tree",
            "fill",
            theme.marker_fill.as_str(),
            "transform",
            transform.as_str(),
        ])?;
        draw_slot(&mut tree, layout, root, theme)?;
    }

    let edges = edge_group(&layout.edges, theme, config)?;
    doc.prepend(edges);
    Ok(doc)
}

fn draw_slot(
    parent: &mut GroupGuard<'_>,
    layout: &Layout,
    slot: &SlotLayout,
    theme: &Theme,
) -> Result<(), DrawError> {
    let mut classes = format!("label {} id-{}", css_ident(&slot.role), css_ident(&slot.id));
    if slot.is_loop {
        classes.push_str(" loop");
    }
    let (cx, cy) = slot.center();
    let transform = translate(cx - slot.origin.0, cy - slot.origin.1);
    let text_ref = slot.text_ref.as_deref().unwrap_or_default();
    {
        let mut label = parent.group(&[
            "class",
            classes.as_str(),
            "data-id",
            slot.id.as_str(),
            "data-text",
            text_ref,
            "transform",
            transform.as_str(),
        ])?;

        let stroke = if slot.is_loop {
            theme.loop_stroke.as_str()
        } else {
            theme.marker_stroke.as_str()
        };
        let circle = label.circle(0.0, 0.0, slot.radius, None);
        circle
            .set_attr("fill", theme.fill_for_role(&slot.role))
            .set_attr("stroke", stroke);
        if let Some(ancestor) = &slot.ancestor_id {
            circle.set_attr("data-parent", ancestor.as_str());
        }
        if slot.is_loop {
            circle
                .set_attr("stroke-width", "2")
                .set_attr("stroke-dasharray", "3 2");
        }

        label
            .text(0.0, theme.font_size * 0.35, &slot.marker)
            .set_attr("text-anchor", "middle")
            .set_attr("fill", theme.text_color.as_str())
            .set_attr("font-family", theme.font_family.as_str())
            .set_attr("font-size", fmt_num(theme.font_size));

        if let Some(tooltip) = &slot.text {
            label.title(tooltip);
        }
    }

    for child in &slot.children {
        let child = &layout.slots[*child];
        let transform = translate(child.offset.0, child.offset.1);
        let mut outer = parent.group(&["class", "outer", "transform", transform.as_str()])?;
        draw_slot(&mut outer, layout, child, theme)?;
    }
    Ok(())
}

fn edge_group(edges: &[EdgeLayout], theme: &Theme, config: &RenderConfig) -> Result<Element, DrawError> {
    let mut group = Element::with_attrs(
        "g",
        &["class", "edge", "fill", "none", "stroke", theme.line_color.as_str()],
    )?;
    for edge in edges {
        let mut path = Element::new("path");
        path.set_attr("d", points_to_path(&edge.points))
            .set_attr("data-from", edge.from.as_str())
            .set_attr("data-to", edge.to.as_str());
        let Some(answer) = &edge.answer else {
            group.push(path);
            continue;
        };

        path.add_class("answer");
        path.set_attr("data-text", answer.raw.as_str())
            .set_attr("stroke", theme.answer_color.as_str());
        if let Some(text) = &answer.text {
            path.push(svg::title(text));
        }
        group.push(path);

        if config.show_answer_labels
            && let Some(block) = &answer.block
        {
            group.push(answer_text(block, answer.anchor, theme));
        }
    }
    Ok(group)
}

fn answer_text(block: &TextBlock, anchor: (f32, f32), theme: &Theme) -> Element {
    let (x, y) = anchor;
    let line_height = if block.lines.is_empty() {
        0.0
    } else {
        block.height / block.lines.len() as f32
    };
    let first_y = y - line_height * block.lines.len().saturating_sub(1) as f32;
    let mut text = Element::new("text");
    text.set_attr("class", "answer-label")
        .set_attr("x", fmt_num(x))
        .set_attr("y", fmt_num(first_y))
        .set_attr("text-anchor", "middle")
        .set_attr("fill", theme.answer_color.as_str())
        .set_attr("stroke", "none")
        .set_attr("font-family", theme.font_family.as_str())
        .set_attr("font-size", fmt_num(theme.font_size));
    for (idx, line) in block.lines.iter().enumerate() {
        let mut tspan = Element::new("tspan");
        tspan
            .set_attr("x", fmt_num(x))
            .set_attr("dy", if idx == 0 { "0".to_string() } else { fmt_num(line_height) });
        tspan.push_text(line);
        text.push(tspan);
    }
    text
}

fn style_element(theme: &Theme) -> Element {
    let mut style = Element::new("style");
    style.push_text(&format!(
        ".Choice circle {{ fill: {choice}; }} .End circle {{ fill: {end}; }} \
         .label:hover circle {{ fill: {hl}; }} .flash circle {{ fill: {hl}; }} \
         .loop {{ cursor: pointer; }} .edge .answer:hover {{ stroke-width: 2; }}",
        choice = theme.choice_fill,
        end = theme.end_fill,
        hl = theme.highlight_color
    ));
    style
}

/// Replaces characters that cannot appear in a class name.
fn css_ident(raw: &str) -> String {
    raw.chars()
        .map(|ch| {
            if ch.is_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
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
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("invalid canvas size"))?;
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;
    if let Some((r, g, b)) = parse_hex_color(&render_cfg.background) {
        pixmap.fill(resvg::tiny_skia::Color::from_rgba8(r, g, b, 255));
    }

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(feature = "png")]
fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        3 => {
            let expand = |idx: usize| channel(&hex[idx..idx + 1].repeat(2));
            Some((expand(0)?, expand(1)?, expand(2)?))
        }
        _ => None,
    }
}
