//! Layer stack and batched redraw.
//!
//! Paint order is fixed: scrollable body, frozen body columns, header, summary,
//! scrollbars. Each layer is painted to its own surface, so a redraw request only
//! touches the layers it names.

use tracing::trace;

use super::backend::RenderBackend;
use super::scene::{NodeId, Scene};
use crate::error::Result;

/// An independently paintable surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Body,
    FixedBody,
    Header,
    Summary,
    Scrollbar,
}

/// Bottom to top.
pub const PAINT_ORDER: [LayerKind; 5] = [
    LayerKind::Body,
    LayerKind::FixedBody,
    LayerKind::Header,
    LayerKind::Summary,
    LayerKind::Scrollbar,
];

/// Layers touched by a vertical scroll.
pub const VERTICAL_SCROLL_LAYERS: [LayerKind; 4] = [
    LayerKind::Body,
    LayerKind::FixedBody,
    LayerKind::Scrollbar,
    LayerKind::Summary,
];

/// Layers touched by a horizontal scroll.
pub const HORIZONTAL_SCROLL_LAYERS: [LayerKind; 5] = PAINT_ORDER;

impl LayerKind {
    /// Stacking position, 0 = bottom.
    pub fn z_index(self) -> usize {
        match self {
            Self::Body => 0,
            Self::FixedBody => 1,
            Self::Header => 2,
            Self::Summary => 3,
            Self::Scrollbar => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::FixedBody => "fixed-body",
            Self::Header => "header",
            Self::Summary => "summary",
            Self::Scrollbar => "scrollbar",
        }
    }
}

/// Owns the root group of every layer and tracks which need repainting.
#[derive(Debug, Default)]
pub struct Compositor {
    roots: [Option<NodeId>; 5],
    dirty: [bool; 5],
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_root(&mut self, layer: LayerKind, root: NodeId) {
        if let Some(slot) = self.roots.get_mut(layer.z_index()) {
            *slot = Some(root);
        }
    }

    pub fn root(&self, layer: LayerKind) -> Option<NodeId> {
        self.roots.get(layer.z_index()).copied().flatten()
    }

    /// Forget all layer roots (the scene was cleared).
    pub fn reset(&mut self) {
        self.roots = [None; 5];
        self.dirty = [false; 5];
    }

    /// Mark `layers` for the next flush.
    pub fn request_redraw(&mut self, layers: &[LayerKind]) {
        for layer in layers {
            if let Some(flag) = self.dirty.get_mut(layer.z_index()) {
                *flag = true;
            }
        }
    }

    pub fn request_all(&mut self) {
        self.request_redraw(&PAINT_ORDER);
    }

    pub fn is_dirty(&self, layer: LayerKind) -> bool {
        self.dirty.get(layer.z_index()).copied().unwrap_or(false)
    }

    pub fn has_pending(&self) -> bool {
        self.dirty.iter().any(|d| *d)
    }

    /// Paint every dirty layer in paint order and return the layers painted.
    ///
    /// # Errors
    /// Returns the first backend error. Layers painted before it are clean;
    /// the failing layer and the rest stay dirty.
    pub fn flush(
        &mut self,
        scene: &Scene,
        backend: &mut dyn RenderBackend,
    ) -> Result<Vec<LayerKind>> {
        let mut painted = Vec::new();
        for layer in PAINT_ORDER {
            if !self.is_dirty(layer) {
                continue;
            }
            if let Some(root) = self.root(layer) {
                backend.paint_layer(layer, scene, root)?;
            }
            if let Some(flag) = self.dirty.get_mut(layer.z_index()) {
                *flag = false;
            }
            painted.push(layer);
        }
        if !painted.is_empty() {
            trace!(layers = ?painted, "flushed layers");
        }
        Ok(painted)
    }
}
