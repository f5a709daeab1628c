//! Summary band drawing.
//!
//! Each column gets a background cell and a text node. The text starts as
//! whatever the caller supplies (usually the "Calculating..." placeholder) and is
//! patched in place by [`patch_summary_text`] when an aggregate resolves.

use super::scene::{NodeId, NodeRole, RectAttrs, Scene, Shape, TextAttrs};
use super::text::{font_string, truncate_text, TextMeasurer, CELL_TEXT_INSET};
use crate::layout::PartitionedColumn;
use crate::types::{GridStyle, VerticalAlign};

/// A drawn summary text node and the column it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryCell {
    pub column: String,
    pub text: NodeId,
}

/// Rebuild one summary band group. `initial_text` supplies each column's first text.
pub fn draw_summary_part(
    scene: &mut Scene,
    group: NodeId,
    columns: &[PartitionedColumn],
    style: &GridStyle,
    initial_text: &mut dyn FnMut(&PartitionedColumn) -> String,
    measurer: &mut dyn TextMeasurer,
) -> Vec<SummaryCell> {
    scene.destroy_children(group);
    let height = style.summary_row_height;
    let font = font_string(style.summary_font_size, &style.summary_font_family);

    let mut cells = Vec::with_capacity(columns.len());
    let mut x = 0.0;
    for column in columns {
        let width = column.width();

        let rect = scene.create(
            NodeRole::SummaryRect,
            Shape::Rect(RectAttrs {
                x,
                y: 0.0,
                width,
                height,
                fill: Some(style.summary_background.clone()),
                stroke: Some(style.border_color.clone()),
                stroke_width: 1.0,
                corner_radius: 0.0,
            }),
        );
        scene.attach(group, rect);

        let raw = initial_text(column);
        let text = scene.create(
            NodeRole::SummaryText,
            Shape::Text(TextAttrs {
                x,
                y: 0.0,
                width,
                height,
                text: truncate_text(measurer, &raw, width, &font).into_owned(),
                font: font.clone(),
                fill: style.summary_text_color.clone(),
                align: column.column.align,
                vertical_align: VerticalAlign::Middle,
                padding: CELL_TEXT_INSET / 2.0,
            }),
        );
        scene.attach(group, text);
        cells.push(SummaryCell {
            column: column.column.column_name.clone(),
            text,
        });

        x += width;
    }
    cells
}

/// Replace the text of a summary node, truncated to its cell. Returns false when
/// the node no longer exists (the band was rebuilt meanwhile).
pub fn patch_summary_text(
    scene: &mut Scene,
    id: NodeId,
    text: &str,
    measurer: &mut dyn TextMeasurer,
) -> bool {
    let Some(attrs) = scene.text_mut(id) else {
        return false;
    };
    attrs.text = truncate_text(measurer, text, attrs.width, &attrs.font).into_owned();
    true
}
