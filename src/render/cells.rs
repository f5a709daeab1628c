//! Body cell drawing: virtual rows, span merging and pooled primitives.

use super::pool::{NodePool, PoolKind};
use super::scene::{NodeId, NodeRole, RectAttrs, Scene, Shape, TextAttrs};
use super::text::{font_string, truncate_text, TextMeasurer};
use crate::layout::{PartitionedColumn, VisibleRowRange};
use crate::types::{CellSpan, GridStyle, Row, SpanContext, SpanResolver, INDEX_COLUMN};

/// Horizontal text padding inside a cell.
pub const CELL_PADDING: f64 = 8.0;

/// Inputs the body drawer reads but never mutates.
pub struct BodySource<'a> {
    pub style: &'a GridStyle,
    /// Immutable source dataset
    pub rows: &'a [Row],
    /// Display order: indices into `rows`
    pub display: &'a [usize],
    pub spans: Option<&'a SpanResolver>,
}

impl BodySource<'_> {
    fn row(&self, row_index: usize) -> Option<&Row> {
        self.display
            .get(row_index)
            .and_then(|source| self.rows.get(*source))
    }

    fn span(&self, row: &Row, column: &PartitionedColumn, row_index: usize) -> CellSpan {
        let Some(resolver) = self.spans else {
            return CellSpan::SINGLE;
        };
        let ctx = SpanContext {
            row,
            column: &column.column,
            row_index,
            col_index: column.index,
        };
        CellSpan::normalize(&resolver(&ctx))
    }

    fn fill(&self, row_index: usize) -> &str {
        if row_index % 2 == 0 {
            &self.style.body_background
        } else {
            &self.style.body_background_alt
        }
    }
}

/// Text shown for `column` in display row `row_index`.
///
/// The index sentinel column shows the 1-based row number.
pub fn cell_display_value(column: &PartitionedColumn, row: &Row, row_index: usize) -> String {
    if column.column.column_name == INDEX_COLUMN {
        return (row_index + 1).to_string();
    }
    row.display_value(&column.column.column_name)
}

/// Sum of `col_span` consecutive column widths starting at `start`, clamped to
/// the band.
pub fn merged_width(columns: &[PartitionedColumn], start: usize, col_span: u32) -> f64 {
    let end = start.saturating_add(col_span as usize).min(columns.len());
    columns
        .get(start..end)
        .map(|span| span.iter().map(PartitionedColumn::width).sum())
        .unwrap_or(0.0)
}

/// Geometry of a single cell box in group coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Repaint one body region group.
///
/// Every cell primitive under `group` goes back to `pool` in one sweep, the rows
/// of `range` are drawn from pooled primitives, and `highlight` (when it lives in
/// this group) is raised back on top. Returns the number of cells drawn.
#[allow(clippy::too_many_arguments)]
pub fn draw_body_part(
    scene: &mut Scene,
    group: NodeId,
    pool: &mut NodePool,
    columns: &[PartitionedColumn],
    range: VisibleRowRange,
    source: &BodySource<'_>,
    measurer: &mut dyn TextMeasurer,
    highlight: Option<NodeId>,
) -> usize {
    pool.sweep_region(scene, group);

    let row_height = source.style.body_row_height;
    let mut drawn = 0;
    for row_index in range.rows() {
        let Some(row) = source.row(row_index) else {
            continue;
        };
        #[allow(clippy::cast_precision_loss)]
        let y = row_index as f64 * row_height;
        drawn += render_row_cells(
            scene, group, pool, columns, row, row_index, y, source, measurer,
        );
    }

    if let Some(highlight) = highlight {
        if scene.parent(highlight) == Some(group) {
            scene.move_to_top(highlight);
        }
    }
    drawn
}

/// Draw the cells of one row across a band, resolving spans.
///
/// Covered cells (a zero span) draw nothing but still advance the cursor by
/// their own width. A cell spanning several columns advances by the merged
/// width and swallows the next `col_span - 1` columns.
#[allow(clippy::too_many_arguments)]
pub fn render_row_cells(
    scene: &mut Scene,
    group: NodeId,
    pool: &mut NodePool,
    columns: &[PartitionedColumn],
    row: &Row,
    row_index: usize,
    y: f64,
    source: &BodySource<'_>,
    measurer: &mut dyn TextMeasurer,
) -> usize {
    let row_height = source.style.body_row_height;
    let mut x = 0.0;
    let mut skip = 0usize;
    let mut drawn = 0;

    for (pos, column) in columns.iter().enumerate() {
        let width = column.width();
        if skip > 0 {
            skip -= 1;
            continue;
        }
        if width <= 0.0 {
            x += width;
            continue;
        }

        let span = source.span(row, column, row_index);
        if span.is_covered() {
            x += width;
            continue;
        }

        let text = cell_display_value(column, row, row_index);
        if span.is_merged() {
            let cell = CellBox {
                x,
                y,
                width: merged_width(columns, pos, span.col_span),
                height: f64::from(span.row_span) * row_height,
            };
            draw_cell(scene, group, pool, column, cell, &text, true, row_index, source, measurer);
            if span.col_span > 1 {
                x += cell.width;
                skip = span.col_span as usize - 1;
            } else {
                x += width;
            }
        } else {
            let cell = CellBox {
                x,
                y,
                width,
                height: row_height,
            };
            draw_cell(scene, group, pool, column, cell, &text, false, row_index, source, measurer);
            x += width;
        }
        drawn += 1;
    }
    drawn
}

#[allow(clippy::too_many_arguments)]
fn draw_cell(
    scene: &mut Scene,
    group: NodeId,
    pool: &mut NodePool,
    column: &PartitionedColumn,
    cell: CellBox,
    text: &str,
    merged: bool,
    row_index: usize,
    source: &BodySource<'_>,
    measurer: &mut dyn TextMeasurer,
) {
    let style = source.style;
    let (rect_role, text_role) = if merged {
        (NodeRole::MergedCellRect, NodeRole::MergedCellText)
    } else {
        (NodeRole::PlainCellRect, NodeRole::PlainCellText)
    };

    let rect = Shape::Rect(RectAttrs {
        x: cell.x,
        y: cell.y,
        width: cell.width,
        height: cell.height,
        fill: Some(source.fill(row_index).to_string()),
        stroke: Some(style.border_color.clone()),
        stroke_width: 1.0,
        corner_radius: 0.0,
    });
    place(scene, group, pool, PoolKind::CellRect, rect_role, rect);

    let font = font_string(style.body_font_size, &style.body_font_family);
    let shown = truncate_text(measurer, text, cell.width, &font).into_owned();
    let label = Shape::Text(TextAttrs {
        x: cell.x,
        y: cell.y,
        width: cell.width,
        height: cell.height,
        text: shown,
        font,
        fill: style.body_text_color.clone(),
        align: column.column.align,
        vertical_align: column.column.vertical_align,
        padding: CELL_PADDING,
    });
    place(scene, group, pool, PoolKind::CellText, text_role, label);
}

/// Acquire a pooled primitive, overwrite all of its attributes and attach it.
fn place(
    scene: &mut Scene,
    group: NodeId,
    pool: &mut NodePool,
    kind: PoolKind,
    role: NodeRole,
    shape: Shape,
) -> NodeId {
    let id = pool.acquire(kind, || scene.create(role, shape.clone()));
    scene.reset(id, role, shape);
    scene.attach(group, id);
    id
}
