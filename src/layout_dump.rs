use crate::layout::Layout;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub view_x: f32,
    pub view_y: f32,
    pub width: f32,
    pub height: f32,
    pub root_width: usize,
    pub node_spacing: f32,
    pub slots: Vec<SlotDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
pub struct SlotDump {
    pub index: usize,
    pub id: String,
    pub ancestor: Option<usize>,
    pub ancestor_id: Option<String>,
    pub role: String,
    pub depth: usize,
    pub is_loop: bool,
    pub subtree_width: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub from: String,
    pub to: String,
    pub from_slot: usize,
    pub to_slot: usize,
    pub answer: Option<String>,
    pub points: Vec<[f32; 2]>,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let slots = layout
            .slots
            .iter()
            .map(|slot| SlotDump {
                index: slot.index,
                id: slot.id.clone(),
                ancestor: slot.ancestor,
                ancestor_id: slot.ancestor_id.clone(),
                role: slot.role.clone(),
                depth: slot.depth,
                is_loop: slot.is_loop,
                subtree_width: slot.subtree_width,
                x: slot.bounds.x,
                y: slot.bounds.y,
                width: slot.bounds.width,
                height: slot.bounds.height,
            })
            .collect();
        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                from: edge.from.clone(),
                to: edge.to.clone(),
                from_slot: edge.from_slot,
                to_slot: edge.to_slot,
                answer: edge
                    .answer
                    .as_ref()
                    .map(|answer| answer.text.clone().unwrap_or_else(|| answer.raw.clone())),
                points: edge.points.iter().map(|(x, y)| [*x, *y]).collect(),
            })
            .collect();
        Self {
            view_x: layout.view_origin.0,
            view_y: layout.view_origin.1,
            width: layout.width,
            height: layout.height,
            root_width: layout.root_width,
            node_spacing: layout.node_spacing,
            slots,
            edges,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(layout);
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
