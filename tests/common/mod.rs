//! Common test utilities: dataset builders and a recording backend.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use vgrid::error::Result;
use vgrid::render::{LayerKind, NodeId, NodeRole, RenderBackend, Scene, Shape};
use vgrid::{ColumnDefinition, Fixed, GridConfig, GridEngine, Row};

/// Backend that records which layers were painted and how many primitives each
/// paint visited.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    width: f64,
    height: f64,
    pub frames: Vec<Vec<LayerKind>>,
    pub current: Vec<LayerKind>,
    pub primitives: Vec<(LayerKind, usize)>,
}

impl RecordingBackend {
    /// Layers painted since the last call.
    pub fn take(&mut self) -> Vec<LayerKind> {
        std::mem::take(&mut self.current)
    }
}

impl RenderBackend for RecordingBackend {
    fn resize(&mut self, width: f64, height: f64, _dpr: f64) {
        self.width = width;
        self.height = height;
    }

    fn paint_layer(&mut self, layer: LayerKind, scene: &Scene, root: NodeId) -> Result<()> {
        let count = scene
            .walk(root)
            .into_iter()
            .filter(|id| scene.role(*id) != Some(NodeRole::Group))
            .count();
        self.current.push(layer);
        self.primitives.push((layer, count));
        Ok(())
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }
}

/// Flush `engine` and return the layers painted.
pub fn flush(engine: &mut GridEngine) -> Vec<LayerKind> {
    let mut backend = RecordingBackend::default();
    engine.flush(&mut backend).unwrap()
}

/// `count` rows with an `id` column (0-based, as text) and a `value` column.
pub fn numbered_rows(count: usize) -> Vec<Row> {
    (0..count)
        .map(|i| {
            Row::new()
                .with("id", format!("{i}"))
                .with("name", format!("row {i}"))
                .with("value", i32::try_from(i % 97).unwrap())
        })
        .collect()
}

/// Left-fixed id, two center columns, right-fixed value.
pub fn standard_columns() -> Vec<ColumnDefinition> {
    vec![
        ColumnDefinition::new("id", 80.0).fixed(Fixed::Left),
        ColumnDefinition::new("name", 240.0).sortable().filterable(),
        ColumnDefinition::new("city", 240.0).filterable(),
        ColumnDefinition::new("value", 100.0)
            .fixed(Fixed::Right)
            .numeric()
            .sortable(),
    ]
}

pub fn config() -> GridConfig {
    GridConfig {
        buffer_rows: 5,
        ..GridConfig::default()
    }
}

/// Engine with the standard columns and `rows` numbered rows, attached at
/// `width` x `height` and flushed once.
pub fn engine(rows: usize, width: f64, height: f64) -> GridEngine {
    let mut engine = GridEngine::new(config());
    engine.set_columns(standard_columns());
    engine.set_data(numbered_rows(rows));
    engine.attach(width, height);
    flush(&mut engine);
    engine
}

/// Text of every body cell text node under `group`, in child order.
pub fn cell_texts(engine: &GridEngine, group: NodeId) -> Vec<String> {
    engine
        .scene()
        .children(group)
        .iter()
        .filter_map(|id| match engine.scene().shape(*id) {
            Some(Shape::Text(t)) if engine.scene().role(*id).is_some_and(|r| r.is_cell_text()) => {
                Some(t.text.clone())
            }
            _ => None,
        })
        .collect()
}

/// Rect attributes of every body cell rect under `group`, in child order, as
/// `(x, y, width, height)`.
pub fn cell_rects(engine: &GridEngine, group: NodeId) -> Vec<(f64, f64, f64, f64)> {
    engine
        .scene()
        .children(group)
        .iter()
        .filter_map(|id| match engine.scene().shape(*id) {
            Some(Shape::Rect(r)) if engine.scene().role(*id).is_some_and(|r| r.is_cell_rect()) => {
                Some((r.x, r.y, r.width, r.height))
            }
            _ => None,
        })
        .collect()
}
