//! Render backend trait for pluggable drawing surfaces.
//!
//! The engine builds a retained [`Scene`] and the compositor hands each dirty
//! layer's subtree to a `RenderBackend`. The Canvas 2D backend draws it in the
//! browser; tests and the CLI use recording backends.

use super::compositor::LayerKind;
use super::scene::{NodeId, Scene};
use crate::error::Result;

/// Trait for render backends
pub trait RenderBackend {
    /// Resize every layer surface (logical size plus device pixel ratio)
    fn resize(&mut self, width: f64, height: f64, dpr: f64);

    /// Repaint one layer from its root group
    fn paint_layer(&mut self, layer: LayerKind, scene: &Scene, root: NodeId) -> Result<()>;

    /// Get the current logical width
    fn width(&self) -> f64;

    /// Get the current logical height
    fn height(&self) -> f64;
}

/// Backend that paints nothing and remembers which layers were asked for.
#[derive(Debug, Default)]
pub struct NullBackend {
    width: f64,
    height: f64,
    pub painted: Vec<LayerKind>,
}

impl RenderBackend for NullBackend {
    fn resize(&mut self, width: f64, height: f64, _dpr: f64) {
        self.width = width;
        self.height = height;
    }

    fn paint_layer(&mut self, layer: LayerKind, _scene: &Scene, _root: NodeId) -> Result<()> {
        self.painted.push(layer);
        Ok(())
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }
}
