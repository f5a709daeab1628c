//! Retained-mode rendering.
//!
//! This module provides:
//! - A scene graph of rect/text/polygon primitives grouped per region
//! - Per-region object pools for body cells
//! - Region drawers for body, header, summary and scrollbars
//! - A layer compositor that flushes only dirty layers to a backend
//! - Canvas 2D backend (wasm32 only)

pub mod backend;
pub mod cache;
pub mod cells;
pub mod compositor;
pub mod header;
pub mod pool;
pub mod scene;
pub mod scrollbar;
pub mod summary_row;
pub mod text;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

// Re-export commonly used types
pub use backend::{NullBackend, RenderBackend};
pub use cells::{draw_body_part, render_row_cells, BodySource};
pub use compositor::{
    Compositor, LayerKind, HORIZONTAL_SCROLL_LAYERS, PAINT_ORDER, VERTICAL_SCROLL_LAYERS,
};
pub use header::{draw_header_part, header_hit, HeaderHit, HeaderSource};
pub use pool::{NodePool, PoolKind, Region, RegionPools};
pub use scene::{Clip, NodeId, NodeRole, RectAttrs, Scene, Shape, TextAttrs};
pub use scrollbar::{draw_scrollbars, BarGeometry, Bounds, ScrollbarGeometry, ThumbHover};
pub use summary_row::{draw_summary_part, patch_summary_text, SummaryCell};
pub use text::{truncate_text, EstimatedTextMeasurer, TextMeasurer};

#[cfg(target_arch = "wasm32")]
pub use canvas::{CanvasSurface, CanvasTextMeasurer};
