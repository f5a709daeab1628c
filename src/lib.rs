//! vgrid - virtualized data grid for the web
//!
//! Renders large tabular datasets in the browser via WebAssembly and Canvas 2D:
//! - Only the rows inside the viewport (plus a buffer) are materialized
//! - Left/right frozen columns and a horizontally scrolling center band
//! - Pooled cell primitives reused across scroll steps
//! - Merged cells through a span callback
//! - Multi-column sort, value filters, summary row with deferred aggregation
//! - Custom scrollbars with thumb dragging and column resize
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridView } from 'vgrid';
//! await init();
//! const grid = new GridView(container, JSON.stringify({ config, groupColumns, valueColumns, data }));
//! grid.set_span_method(({ rowIndex, colIndex }) => colIndex === 0 ? [1, 2] : undefined);
//! ```

pub mod engine;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod render;
pub mod summary;
pub mod types;

#[cfg(target_arch = "wasm32")]
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use engine::{FrameReport, GridEngine, HitTarget};
#[cfg(target_arch = "wasm32")]
pub use viewer::GridView;

pub use types::*;

/// Lay out a grid description against a viewport without drawing it and
/// return the frame report as a JSON string.
///
/// # Arguments
/// * `spec` - JSON with `config`, `groupColumns`, `valueColumns` and `data`
/// * `width`, `height` - viewport size in logical pixels
///
/// # Errors
/// Returns an error if the description is not valid JSON.
#[wasm_bindgen]
pub fn layout_report(spec: &str, width: f64, height: f64) -> Result<String, JsValue> {
    let spec = GridSpec::from_json(spec).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let mut engine = GridEngine::from_spec(spec);
    engine.attach(width, height);
    serde_json::to_string(&engine.frame_report())
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
