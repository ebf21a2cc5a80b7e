mod edges;
mod error;
mod text;
mod tree;
pub(crate) mod types;
pub use error::LayoutError;
pub use tree::{PathGuard, VisitedPath};
pub use types::*;
use edges::*;
use text::*;
use tree::*;

use crate::config::LayoutConfig;
use crate::ir::{END_ID, ProcessDocument, ProcessNode, START_ID};
use crate::theme::Theme;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Gap between an answer label's baseline and the connector below it.
pub const ANSWER_LABEL_GAP: f32 = 2.0;

pub fn compute_layout(
    doc: &ProcessDocument,
    theme: &Theme,
    config: &LayoutConfig,
) -> Result<Layout, LayoutError> {
    compute_layout_from(doc, START_ID, theme, config)
}

/// Lays out the tree reachable from `root`, then connects the placed slots.
pub fn compute_layout_from(
    doc: &ProcessDocument,
    root: &str,
    theme: &Theme,
    config: &LayoutConfig,
) -> Result<Layout, LayoutError> {
    let (slots, root_width) = TreeLayoutEngine::new(doc, theme, config).run(root)?;
    let edges = build_edges(&slots, doc, theme, config)?;
    let view = content_extent(&slots, &edges, root_width, config);
    log::debug!(
        "layout has {} slots, {} edges, root width {}",
        slots.len(),
        edges.len(),
        root_width
    );
    Ok(Layout {
        slots,
        edges,
        root_width,
        node_spacing: config.node_spacing,
        padding: config.padding,
        view_origin: (view.x, view.y),
        width: view.width,
        height: view.height,
    })
}

/// Bounding box of all slots and answer labels, grown by `padding` on every
/// side. Content left of or above the root (wide branching slots, labels on
/// the leftmost column) moves the origin negative instead of being clipped.
fn content_extent(
    slots: &[SlotLayout],
    edges: &[EdgeLayout],
    root_width: usize,
    config: &LayoutConfig,
) -> Bounds {
    let padding = config.padding;
    let tree_width = root_width as f32 * config.node_spacing;
    let mut bounds = Bounds::new(padding, padding, tree_width, 0.0);
    for slot in slots {
        bounds = bounds.union(&slot.bounds);
    }
    for edge in edges {
        if let Some(label) = edge.answer.as_ref().and_then(AnswerLabel::bounds) {
            bounds = bounds.union(&label);
        }
    }
    Bounds::new(
        bounds.x - padding,
        bounds.y - padding,
        bounds.width + padding * 2.0,
        bounds.height + padding * 2.0,
    )
}
