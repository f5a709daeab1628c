//! Retained scene graph of drawing primitives.
//!
//! Nodes live in an arena addressed by generational [`NodeId`]s, so a stale id
//! held after `destroy` never aliases a newer node. Every node carries a
//! [`NodeRole`] that says what it draws; pools and sweeps classify by role.

use crate::types::{Align, SortOrder, VerticalAlign};

/// Handle to a node in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

/// What a node draws. Used for pooling and for tests that inspect output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    Group,
    PlainCellRect,
    MergedCellRect,
    PlainCellText,
    MergedCellText,
    HeaderRect,
    HeaderText,
    SortIndicator(SortOrder),
    FilterIcon,
    ColumnResizer,
    ResizeIndicator,
    SummaryRect,
    SummaryText,
    ScrollTrack,
    ScrollThumb,
    Mask,
    Highlight,
}

impl NodeRole {
    /// Body cell rectangles recycled through the rect pool.
    pub fn is_cell_rect(self) -> bool {
        matches!(self, Self::PlainCellRect | Self::MergedCellRect)
    }

    /// Body cell texts recycled through the text pool.
    pub fn is_cell_text(self) -> bool {
        matches!(self, Self::PlainCellText | Self::MergedCellText)
    }
}

/// Rectangular clip in the owning group's coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Clip {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RectAttrs {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: f64,
    pub corner_radius: f64,
}

/// A single line of text laid out inside a box.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextAttrs {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub text: String,
    /// CSS font shorthand, e.g. `13px Arial, sans-serif`
    pub font: String,
    pub fill: String,
    pub align: Align,
    pub vertical_align: VerticalAlign,
    /// Horizontal inset on both sides of the box
    pub padding: f64,
}

impl TextAttrs {
    /// Anchor x for drawing with the matching canvas `textAlign`.
    pub fn anchor_x(&self) -> f64 {
        match self.align {
            Align::Left => self.x + self.padding,
            Align::Center => self.x + self.width / 2.0,
            Align::Right => self.x + self.width - self.padding,
        }
    }

    /// Anchor y for drawing with the matching canvas `textBaseline`.
    pub fn anchor_y(&self) -> f64 {
        match self.vertical_align {
            VerticalAlign::Top => self.y,
            VerticalAlign::Middle => self.y + self.height / 2.0,
            VerticalAlign::Bottom => self.y + self.height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolygonAttrs {
    pub points: Vec<(f64, f64)>,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupAttrs {
    pub x: f64,
    pub y: f64,
    pub clip: Option<Clip>,
}

/// Visual payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect(RectAttrs),
    Text(TextAttrs),
    Polygon(PolygonAttrs),
    Group(GroupAttrs),
}

/// A node in the scene.
#[derive(Debug, Clone)]
pub struct Node {
    pub role: NodeRole,
    pub shape: Shape,
    pub visible: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena of nodes.
#[derive(Default)]
pub struct Scene {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Allocate a detached node.
    pub fn create(&mut self, role: NodeRole, shape: Shape) -> NodeId {
        let node = Node {
            role,
            shape,
            visible: true,
            parent: None,
            children: Vec::new(),
        };
        self.live += 1;
        if let Some(index) = self.free.pop() {
            if let Some(slot) = self.slots.get_mut(index as usize) {
                slot.node = Some(node);
                return NodeId {
                    index,
                    generation: slot.generation,
                };
            }
        }
        #[allow(clippy::cast_possible_truncation)]
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    /// Create an empty group node.
    pub fn create_group(&mut self, x: f64, y: f64, clip: Option<Clip>) -> NodeId {
        self.create(NodeRole::Group, Shape::Group(GroupAttrs { x, y, clip }))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_mut())
    }

    pub fn role(&self, id: NodeId) -> Option<NodeRole> {
        self.get(id).map(|n| n.role)
    }

    pub fn shape(&self, id: NodeId) -> Option<&Shape> {
        self.get(id).map(|n| &n.shape)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or_default()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    /// Replace every visual attribute of a node, e.g. when reusing a pooled one.
    pub fn reset(&mut self, id: NodeId, role: NodeRole, shape: Shape) {
        if let Some(node) = self.get_mut(id) {
            node.role = role;
            node.shape = shape;
            node.visible = true;
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&TextAttrs> {
        match self.shape(id)? {
            Shape::Text(attrs) => Some(attrs),
            _ => None,
        }
    }

    /// Mutable text attributes of a text node.
    pub fn text_mut(&mut self, id: NodeId) -> Option<&mut TextAttrs> {
        match self.get_mut(id).map(|n| &mut n.shape) {
            Some(Shape::Text(attrs)) => Some(attrs),
            _ => None,
        }
    }

    /// Move a group (no-op for other shapes).
    pub fn set_position(&mut self, id: NodeId, x: f64, y: f64) {
        if let Some(Shape::Group(g)) = self.get_mut(id).map(|n| &mut n.shape) {
            g.x = x;
            g.y = y;
        }
    }

    pub fn position(&self, id: NodeId) -> Option<(f64, f64)> {
        match self.shape(id)? {
            Shape::Group(g) => Some((g.x, g.y)),
            Shape::Rect(r) => Some((r.x, r.y)),
            Shape::Text(t) => Some((t.x, t.y)),
            Shape::Polygon(p) => p.points.first().copied(),
        }
    }

    /// Append `child` as the topmost child of `parent`, detaching it first.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || !self.contains(parent) || !self.contains(child) {
            return;
        }
        self.detach(child);
        if let Some(p) = self.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    /// Remove `id` from its parent. The node stays alive.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.get_mut(id) {
            n.parent = None;
        }
    }

    /// Raise `id` to the top of its parent's paint order.
    pub fn move_to_top(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|c| *c != id);
            p.children.push(id);
        }
    }

    /// Take the child list of a group, leaving it empty. Children keep their
    /// parent link until the caller either re-adopts or releases them.
    pub(crate) fn take_children(&mut self, id: NodeId) -> Vec<NodeId> {
        self.get_mut(id)
            .map(|n| std::mem::take(&mut n.children))
            .unwrap_or_default()
    }

    pub(crate) fn set_children(&mut self, id: NodeId, children: Vec<NodeId>) {
        if let Some(n) = self.get_mut(id) {
            n.children = children;
        }
    }

    pub(crate) fn clear_parent(&mut self, id: NodeId) {
        if let Some(n) = self.get_mut(id) {
            n.parent = None;
        }
    }

    /// Free `id` and its whole subtree.
    pub fn destroy(&mut self, id: NodeId) {
        self.detach(id);
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(slot) = self.slots.get_mut(next.index as usize) else {
                continue;
            };
            if slot.generation != next.generation {
                continue;
            }
            if let Some(node) = slot.node.take() {
                stack.extend(node.children);
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(next.index);
                self.live -= 1;
            }
        }
    }

    /// Destroy every child of `id`, keeping `id` itself.
    pub fn destroy_children(&mut self, id: NodeId) {
        for child in self.take_children(id) {
            self.clear_parent(child);
            self.destroy(child);
        }
    }

    /// Depth-first walk of the subtree under `root` (inclusive), parents first.
    pub fn walk(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else {
                continue;
            };
            out.push(id);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Nodes under `root` with the given role.
    pub fn find_by_role(&self, root: NodeId, role: NodeRole) -> Vec<NodeId> {
        self.walk(root)
            .into_iter()
            .filter(|id| self.role(*id) == Some(role))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn rect() -> Shape {
        Shape::Rect(RectAttrs::default())
    }

    #[test]
    fn stale_ids_do_not_alias() {
        let mut scene = Scene::new();
        let a = scene.create(NodeRole::PlainCellRect, rect());
        scene.destroy(a);
        let b = scene.create(NodeRole::PlainCellRect, rect());
        assert!(!scene.contains(a));
        assert!(scene.contains(b));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn attach_moves_between_parents() {
        let mut scene = Scene::new();
        let g1 = scene.create_group(0.0, 0.0, None);
        let g2 = scene.create_group(0.0, 0.0, None);
        let n = scene.create(NodeRole::PlainCellRect, rect());
        scene.attach(g1, n);
        scene.attach(g2, n);
        assert!(scene.children(g1).is_empty());
        assert_eq!(scene.children(g2), [n]);
        assert_eq!(scene.parent(n), Some(g2));
    }

    #[test]
    fn move_to_top_reorders() {
        let mut scene = Scene::new();
        let g = scene.create_group(0.0, 0.0, None);
        let a = scene.create(NodeRole::Highlight, rect());
        let b = scene.create(NodeRole::PlainCellRect, rect());
        scene.attach(g, a);
        scene.attach(g, b);
        scene.move_to_top(a);
        assert_eq!(scene.children(g), [b, a]);
    }

    #[test]
    fn destroy_frees_subtree() {
        let mut scene = Scene::new();
        let g = scene.create_group(0.0, 0.0, None);
        let n = scene.create(NodeRole::PlainCellText, Shape::Text(TextAttrs::default()));
        scene.attach(g, n);
        scene.destroy(g);
        assert!(scene.is_empty());
        assert!(!scene.contains(n));
    }

    #[test]
    fn roles_key_a_set_by_sort_direction() {
        let roles: std::collections::HashSet<NodeRole> = [
            NodeRole::SortIndicator(SortOrder::Asc),
            NodeRole::SortIndicator(SortOrder::Desc),
            NodeRole::SortIndicator(SortOrder::Asc),
        ]
        .into_iter()
        .collect();
        assert_eq!(roles.len(), 2);
    }
}
