#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Bounds::new(x, y, self.right().max(other.right()) - x, self.bottom().max(other.bottom()) - y)
    }
}

/// One rendered occurrence of a process node.
#[derive(Debug, Clone)]
pub struct SlotLayout {
    pub index: usize,
    pub id: String,
    /// Slot index of the node whose traversal placed this one.
    pub ancestor: Option<usize>,
    pub ancestor_id: Option<String>,
    /// Position of this node in the ancestor's `next` list.
    pub branch: Option<usize>,
    pub children: Vec<usize>,
    pub depth: usize,
    pub role: String,
    /// Short text drawn inside the marker.
    pub marker: String,
    pub marker_label: TextBlock,
    /// Resolved node text, shown as a tooltip.
    pub text: Option<String>,
    /// Node text as written in the document.
    pub text_ref: Option<String>,
    pub is_loop: bool,
    pub subtree_width: usize,
    /// Offset of this slot's coordinate group inside its ancestor's group.
    pub offset: (f32, f32),
    /// Horizontal shift of the slot inside its own group.
    pub shift_x: f32,
    /// Origin of this slot's coordinate group in root coordinates.
    pub origin: (f32, f32),
    pub radius: f32,
    pub bounds: Bounds,
}

impl SlotLayout {
    pub fn center(&self) -> (f32, f32) {
        (self.bounds.center_x(), self.bounds.y + self.bounds.height / 2.0)
    }
}

#[derive(Debug, Clone)]
pub struct AnswerLabel {
    /// Answer as written in the document (phrase id or inline text).
    pub raw: String,
    /// Display text, `None` when the phrase id is unknown.
    pub text: Option<String>,
    pub block: Option<TextBlock>,
    /// Centre of the last line's baseline.
    pub anchor: (f32, f32),
}

impl AnswerLabel {
    /// Area covered by the drawn text, `None` when there is no text.
    pub fn bounds(&self) -> Option<Bounds> {
        let block = self.block.as_ref()?;
        let (x, y) = self.anchor;
        Some(Bounds::new(
            x - block.width / 2.0,
            y - block.height,
            block.width,
            block.height,
        ))
    }
}

#[derive(Debug, Clone)]
pub struct EdgeLayout {
    pub from_slot: usize,
    pub to_slot: usize,
    pub from: String,
    pub to: String,
    pub points: Vec<(f32, f32)>,
    pub answer: Option<AnswerLabel>,
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub slots: Vec<SlotLayout>,
    pub edges: Vec<EdgeLayout>,
    /// Subtree width returned for the start node.
    pub root_width: usize,
    pub node_spacing: f32,
    pub padding: f32,
    /// Top-left corner of the canvas; negative when content extends past the root.
    pub view_origin: (f32, f32),
    pub width: f32,
    pub height: f32,
}

impl Layout {
    pub fn slots_for<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a SlotLayout> + 'a {
        self.slots.iter().filter(move |slot| slot.id == id)
    }

    pub fn root(&self) -> Option<&SlotLayout> {
        self.slots.first()
    }

    pub fn edge_between(&self, from: &str, to: &str) -> Option<&EdgeLayout> {
        self.edges
            .iter()
            .find(|edge| edge.from == from && edge.to == to)
    }

    pub fn loop_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_loop).count()
    }
}
