//! Object pools for body cell primitives.
//!
//! Each body region (left, center, right) owns a [`NodePool`]. A node is either
//! attached to a region group or sitting in its pool, never both.

use super::scene::{NodeId, Scene};

/// Which pool list a primitive belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolKind {
    CellRect,
    CellText,
}

/// Detached, reusable cell rectangles and texts.
#[derive(Debug, Default)]
pub struct NodePool {
    cell_rects: Vec<NodeId>,
    cell_texts: Vec<NodeId>,
}

impl NodePool {
    pub fn new() -> Self {
        Self::default()
    }

    fn list(&mut self, kind: PoolKind) -> &mut Vec<NodeId> {
        match kind {
            PoolKind::CellRect => &mut self.cell_rects,
            PoolKind::CellText => &mut self.cell_texts,
        }
    }

    /// Pop a pooled node, or build one with `factory` when the pool is empty.
    ///
    /// A reused node keeps whatever attributes it had; the caller must set all
    /// of them.
    pub fn acquire(&mut self, kind: PoolKind, factory: impl FnOnce() -> NodeId) -> NodeId {
        self.list(kind).pop().unwrap_or_else(factory)
    }

    /// Detach `id` and keep it for reuse.
    pub fn release(&mut self, scene: &mut Scene, kind: PoolKind, id: NodeId) {
        scene.detach(id);
        self.list(kind).push(id);
    }

    /// Release every cell primitive directly under `group` in a single pass over
    /// its children. Other children (highlight, masks) stay attached in order.
    ///
    /// Returns the number of nodes released.
    pub fn sweep_region(&mut self, scene: &mut Scene, group: NodeId) -> usize {
        let children = scene.take_children(group);
        let mut kept = Vec::new();
        let mut released = 0;
        for id in children {
            let kind = match scene.role(id) {
                Some(role) if role.is_cell_rect() => PoolKind::CellRect,
                Some(role) if role.is_cell_text() => PoolKind::CellText,
                Some(_) => {
                    kept.push(id);
                    continue;
                }
                None => continue,
            };
            scene.clear_parent(id);
            self.list(kind).push(id);
            released += 1;
        }
        scene.set_children(group, kept);
        released
    }

    /// Destroy every pooled node.
    pub fn clear(&mut self, scene: &mut Scene) {
        for id in self.cell_rects.drain(..).chain(self.cell_texts.drain(..)) {
            scene.destroy(id);
        }
    }

    pub fn len(&self, kind: PoolKind) -> usize {
        match kind {
            PoolKind::CellRect => self.cell_rects.len(),
            PoolKind::CellText => self.cell_texts.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cell_rects.is_empty() && self.cell_texts.is_empty()
    }
}

/// Horizontal band of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Left,
    Center,
    Right,
}

impl Region {
    pub const ALL: [Self; 3] = [Self::Left, Self::Center, Self::Right];
}

/// One pool per body region.
#[derive(Debug, Default)]
pub struct RegionPools {
    pub left: NodePool,
    pub center: NodePool,
    pub right: NodePool,
}

impl RegionPools {
    pub fn get_mut(&mut self, region: Region) -> &mut NodePool {
        match region {
            Region::Left => &mut self.left,
            Region::Center => &mut self.center,
            Region::Right => &mut self.right,
        }
    }

    pub fn get(&self, region: Region) -> &NodePool {
        match region {
            Region::Left => &self.left,
            Region::Center => &self.center,
            Region::Right => &self.right,
        }
    }

    pub fn clear(&mut self, scene: &mut Scene) {
        self.left.clear(scene);
        self.center.clear(scene);
        self.right.clear(scene);
    }
}
