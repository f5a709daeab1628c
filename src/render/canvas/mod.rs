//! Canvas 2D drawing surface.
//!
//! One `<canvas>` per compositor layer, stacked by z-index inside the host
//! container. Each layer repaints independently from its scene subtree.

mod measure;
mod painter;
mod surface;

pub use measure::CanvasTextMeasurer;
pub use surface::CanvasSurface;
