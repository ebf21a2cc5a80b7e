use super::*;
use std::ops::{Deref, DerefMut};

static IMPLICIT_END: Lazy<ProcessNode> = Lazy::new(ProcessNode::implicit_end);

/// Node ids on the path from the root to the slot being placed.
///
/// Entering a node returns a guard that removes it again when dropped, so
/// sibling branches never see each other's marks while descendants do.
#[derive(Debug, Default)]
pub struct VisitedPath {
    ids: HashSet<String>,
}

impl VisitedPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Marks `id` for the guard's lifetime. The terminal node is never marked
    /// so any number of branches may end in it.
    pub fn enter(&mut self, id: &str) -> PathGuard<'_> {
        let pushed = id != END_ID && self.ids.insert(id.to_string());
        PathGuard {
            path: self,
            id: pushed.then(|| id.to_string()),
        }
    }
}

pub struct PathGuard<'a> {
    path: &'a mut VisitedPath,
    id: Option<String>,
}

impl Deref for PathGuard<'_> {
    type Target = VisitedPath;

    fn deref(&self) -> &VisitedPath {
        self.path
    }
}

impl DerefMut for PathGuard<'_> {
    fn deref_mut(&mut self) -> &mut VisitedPath {
        self.path
    }
}

impl Drop for PathGuard<'_> {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.path.ids.remove(&id);
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Ancestor {
    slot: usize,
    branch: usize,
}

/// Depth-first placement of process nodes into subtree-width slots.
pub(super) struct TreeLayoutEngine<'a> {
    doc: &'a ProcessDocument,
    theme: &'a Theme,
    config: &'a LayoutConfig,
    slots: Vec<SlotLayout>,
}

impl<'a> TreeLayoutEngine<'a> {
    pub(super) fn new(doc: &'a ProcessDocument, theme: &'a Theme, config: &'a LayoutConfig) -> Self {
        Self {
            doc,
            theme,
            config,
            slots: Vec::new(),
        }
    }

    /// Lays out the tree hanging off `root` and returns its slots in
    /// pre-order together with the root's subtree width.
    pub(super) fn run(mut self, root: &str) -> Result<(Vec<SlotLayout>, usize), LayoutError> {
        let mut visited = VisitedPath::new();
        let width = self.layout(root, &mut visited, None, 0)?;
        self.resolve_positions();
        Ok((self.slots, width))
    }

    fn node(&self, id: &str) -> Result<&'a ProcessNode, LayoutError> {
        let doc = self.doc;
        match doc.graph.get(id) {
            Some(node) => Ok(node),
            None if id == END_ID => Ok(&*IMPLICIT_END),
            None => Err(LayoutError::UnknownNode { id: id.to_string() }),
        }
    }

    fn layout(
        &mut self,
        id: &str,
        visited: &mut VisitedPath,
        ancestor: Option<Ancestor>,
        depth: usize,
    ) -> Result<usize, LayoutError> {
        if depth > self.config.max_depth {
            return Err(LayoutError::DepthLimitExceeded {
                id: id.to_string(),
                limit: self.config.max_depth,
            });
        }
        let node = self.node(id)?;
        let slot = self.push_slot(id, node, ancestor, depth);

        if visited.contains(id) {
            self.slots[slot].is_loop = true;
            self.slots[slot].subtree_width = 1;
            log::debug!("loop back to \"{id}\" at depth {depth}");
            return Ok(1);
        }
        let mut visited = visited.enter(id);

        let spacing = self.config.node_spacing;
        let mut total = 0usize;
        for (branch, child_id) in node.next.iter().enumerate() {
            let child_slot = self.slots.len();
            let child_width = self.layout(
                child_id,
                &mut visited,
                Some(Ancestor { slot, branch }),
                depth + 1,
            )?;
            self.slots[child_slot].offset = (total as f32 * spacing, self.config.rank_spacing);
            self.slots[slot].children.push(child_slot);
            total += child_width;
        }

        let width = total.max(1);
        let current = &mut self.slots[slot];
        current.subtree_width = width;
        if node.next.len() > 1 && ancestor.is_some() {
            current.shift_x = (total as f32 * spacing - current.bounds.width) / 2.0;
        }
        log::debug!("placed \"{id}\" at depth {depth} with width {width}");
        Ok(width)
    }

    fn push_slot(
        &mut self,
        id: &str,
        node: &ProcessNode,
        ancestor: Option<Ancestor>,
        depth: usize,
    ) -> usize {
        let index = self.slots.len();
        let marker = marker_text(id);
        let marker_label = measure_label(&marker, self.theme, self.config);
        let radius = self.config.marker_radius;
        let size = (radius * 2.0).max(marker_label.width);
        let text = self.doc.node_text(node).map(str::to_string);
        if text.is_none() && node.text.is_some() {
            log::warn!("node \"{id}\" refers to an unknown phrase");
        }
        let ancestor_id = ancestor.map(|a| self.slots[a.slot].id.clone());
        self.slots.push(SlotLayout {
            index,
            id: id.to_string(),
            ancestor: ancestor.map(|a| a.slot),
            ancestor_id,
            branch: ancestor.map(|a| a.branch),
            children: Vec::new(),
            depth,
            role: node.role().to_string(),
            marker,
            marker_label,
            text,
            text_ref: node.text.as_ref().map(|text| text.raw().into_owned()),
            is_loop: false,
            subtree_width: 1,
            offset: (0.0, 0.0),
            shift_x: 0.0,
            origin: (0.0, 0.0),
            radius,
            bounds: Bounds::new(0.0, 0.0, size, radius * 2.0),
        });
        index
    }

    /// Converts group-relative offsets into root coordinates. Slots are in
    /// pre-order, so every ancestor is resolved before its descendants.
    fn resolve_positions(&mut self) {
        let padding = self.config.padding;
        for idx in 0..self.slots.len() {
            let origin = match self.slots[idx].ancestor {
                Some(parent) => {
                    let (px, py) = self.slots[parent].origin;
                    let (dx, dy) = self.slots[idx].offset;
                    (px + dx, py + dy)
                }
                None => (padding, padding),
            };
            let slot = &mut self.slots[idx];
            slot.origin = origin;
            slot.bounds.x = origin.0 + slot.shift_x;
            slot.bounds.y = origin.1;
        }
    }
}

fn marker_text(id: &str) -> String {
    match id {
        START_ID => "s".to_string(),
        END_ID => "e".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_removes_mark_on_drop() {
        let mut path = VisitedPath::new();
        {
            let mut outer = path.enter("a");
            assert!(outer.contains("a"));
            {
                let inner = outer.enter("b");
                assert!(inner.contains("a"));
                assert!(inner.contains("b"));
            }
            assert!(!outer.contains("b"));
        }
        assert!(path.is_empty());
    }

    #[test]
    fn end_is_never_marked() {
        let mut path = VisitedPath::new();
        let guard = path.enter(END_ID);
        assert!(!guard.contains(END_ID));
        assert_eq!(guard.len(), 0);
    }

    #[test]
    fn reentering_does_not_unmark_outer_entry() {
        let mut path = VisitedPath::new();
        let mut outer = path.enter("a");
        drop(outer.enter("a"));
        assert!(outer.contains("a"));
    }

    #[test]
    fn marker_text_abbreviates_endpoints() {
        assert_eq!(marker_text("start"), "s");
        assert_eq!(marker_text("end"), "e");
        assert_eq!(marker_text("17"), "17");
    }
}
