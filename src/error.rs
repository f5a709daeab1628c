//! Structured error types for vgrid.
//!
//! Geometry, pooling and scroll operations never fail; errors only surface at the
//! boundaries (configuration parsing, drawing surface setup, aggregation dispatch).

/// All errors that can occur at the edges of the grid engine.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Invalid configuration or column definition.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// JSON (de)serialization failure for configs and datasets.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Drawing surface error.
    #[error("Render error: {0}")]
    Render(String),

    /// Aggregation executor refused or lost a job.
    #[error("Aggregation failed: {0}")]
    Aggregation(String),

    /// I/O error (CLI only).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
