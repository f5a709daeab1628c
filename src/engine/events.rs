//! Pointer interaction: hit testing, thumb drags, column resize and clicks.
//!
//! Coordinates are logical pixels relative to the grid's top-left corner. The
//! host forwards raw pointer events and repaints when [`GridEngine::needs_flush`]
//! reports dirty layers.

use tracing::debug;

use super::{band, GridEngine, Highlight};
use crate::layout::{ColumnPartition, PartitionedColumn};
use crate::render::{header_hit, HeaderHit, LayerKind, NodeRole, RectAttrs, Region, Shape};
use crate::types::SortOrder;

/// Narrowest width a column can be dragged to.
pub const MIN_COLUMN_WIDTH: f64 = 30.0;

const RESIZE_INDICATOR_WIDTH: f64 = 2.0;
const HIGHLIGHT_STROKE: f64 = 2.0;

/// What's under the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    VerticalThumb,
    HorizontalThumb,
    /// Sort arrow in a header cell
    SortArrow { column: String, order: SortOrder },
    /// Filter funnel in a header cell
    FilterIcon { column: String },
    /// Resize handle on the right edge of column `index`
    ColumnResizer { index: usize },
    HeaderCell { column: String },
    SummaryCell { column: String },
    /// Body cell at a display row and column index
    BodyCell { row: usize, col: usize },
    None,
}

/// In-progress pointer drag.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    VerticalThumb {
        start_pointer: f64,
        start_scroll: f64,
    },
    HorizontalThumb {
        start_pointer: f64,
        start_scroll: f64,
    },
    ResizingColumn {
        index: usize,
        start_x: f64,
        start_width: f64,
        width: f64,
    },
}

impl DragState {
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

impl GridEngine {
    /// Horizontal geometry of the three bands in stage coordinates:
    /// `(left band end, right band start, right band end)`.
    fn band_edges(&self) -> (f64, f64, f64) {
        let width = self.viewport.map_or(0.0, |v| v.width);
        let v_space = if self.scroll.limits().vertical_bar() {
            self.metrics.scrollbar_size
        } else {
            0.0
        };
        let right_end = width - v_space;
        (
            self.partition.left_width,
            right_end - self.partition.right_width,
            right_end,
        )
    }

    /// Band under stage `x` and the x coordinate inside that band's content.
    fn band_at(&self, x: f64) -> Option<(Region, f64)> {
        let (left_end, right_start, right_end) = self.band_edges();
        if x < 0.0 || x >= right_end {
            None
        } else if x < left_end {
            Some((Region::Left, x))
        } else if x >= right_start {
            Some((Region::Right, x - right_start))
        } else {
            Some((Region::Center, x - left_end + self.scroll.scroll_x()))
        }
    }

    /// Left edge of column `index` in stage coordinates.
    fn column_stage_x(&self, index: usize) -> Option<(Region, f64)> {
        let (left_end, right_start, _) = self.band_edges();
        for region in Region::ALL {
            let columns = band(&self.partition, region);
            let offsets = ColumnPartition::offsets(columns);
            let Some(offset) = columns
                .iter()
                .zip(offsets)
                .find_map(|(c, at)| (c.index == index).then_some(at))
            else {
                continue;
            };
            let x = match region {
                Region::Left => offset,
                Region::Center => left_end + offset - self.scroll.scroll_x(),
                Region::Right => right_start + offset,
            };
            return Some((region, x));
        }
        None
    }

    fn summary_top(&self) -> f64 {
        let height = self.viewport.map_or(0.0, |v| v.height);
        let h_space = if self.scroll.limits().horizontal_bar() {
            self.metrics.scrollbar_size
        } else {
            0.0
        };
        height - self.metrics.summary_height - h_space
    }

    /// Find the interactive element under a point.
    pub fn hit_test(&self, x: f64, y: f64) -> HitTarget {
        if self.viewport.is_none() {
            return HitTarget::None;
        }
        if self.scrollbars.vertical.is_some_and(|b| b.thumb.contains(x, y)) {
            return HitTarget::VerticalThumb;
        }
        if self.scrollbars.horizontal.is_some_and(|b| b.thumb.contains(x, y)) {
            return HitTarget::HorizontalThumb;
        }
        let Some((region, band_x)) = self.band_at(x) else {
            return HitTarget::None;
        };
        let columns = band(&self.partition, region);

        let header_h = self.metrics.header_height;
        if y >= 0.0 && y < header_h {
            return header_target(columns, band_x, y, header_h);
        }

        let summary_top = self.summary_top();
        if self.config.enable_summary && y >= summary_top {
            if y < summary_top + self.metrics.summary_height {
                if let Some((column, _)) = ColumnPartition::column_at(columns, band_x) {
                    return HitTarget::SummaryCell {
                        column: column.column.column_name.clone(),
                    };
                }
            }
            return HitTarget::None;
        }

        let body_bottom = header_h + self.body_height();
        if y >= body_bottom || self.metrics.row_height <= 0.0 {
            return HitTarget::None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let row = ((y - header_h + self.scroll.scroll_y()) / self.metrics.row_height).floor() as usize;
        if row >= self.display.len() {
            return HitTarget::None;
        }
        match ColumnPartition::column_at(columns, band_x) {
            Some((column, _)) => HitTarget::BodyCell {
                row,
                col: column.index,
            },
            None => HitTarget::None,
        }
    }

    /// CSS cursor for a point.
    pub fn cursor(&self, x: f64, y: f64) -> &'static str {
        match self.drag {
            DragState::VerticalThumb { .. } | DragState::HorizontalThumb { .. } => {
                return "grabbing"
            }
            DragState::ResizingColumn { .. } => return "col-resize",
            DragState::Idle => {}
        }
        match self.hit_test(x, y) {
            HitTarget::VerticalThumb | HitTarget::HorizontalThumb => "grab",
            HitTarget::ColumnResizer { .. } => "col-resize",
            HitTarget::SortArrow { .. } | HitTarget::FilterIcon { .. } => "pointer",
            _ => "default",
        }
    }

    /// Primary button pressed. Returns the target under the pointer.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> HitTarget {
        let target = self.hit_test(x, y);
        match &target {
            HitTarget::VerticalThumb => {
                self.drag = DragState::VerticalThumb {
                    start_pointer: y,
                    start_scroll: self.scroll.scroll_y(),
                };
                self.set_hover(true, self.hover.horizontal);
                debug!(y, "vertical thumb drag started");
            }
            HitTarget::HorizontalThumb => {
                self.drag = DragState::HorizontalThumb {
                    start_pointer: x,
                    start_scroll: self.scroll.scroll_x(),
                };
                self.set_hover(self.hover.vertical, true);
                debug!(x, "horizontal thumb drag started");
            }
            HitTarget::ColumnResizer { index } => {
                let start_width = self
                    .partition
                    .by_index(*index)
                    .map_or(0.0, PartitionedColumn::width);
                self.drag = DragState::ResizingColumn {
                    index: *index,
                    start_x: x,
                    start_width,
                    width: start_width,
                };
                self.draw_resize_indicator(*index, start_width);
                debug!(index, start_width, "column resize started");
            }
            _ => {}
        }
        self.pressed = Some(target.clone());
        target
    }

    /// Pointer moved (button held or not). Returns true when anything changed.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        match self.drag {
            DragState::VerticalThumb {
                start_pointer,
                start_scroll,
            } => {
                let Some(bar) = self.scrollbars.vertical else {
                    return false;
                };
                let target = bar.drag_target(start_scroll, y - start_pointer, self.scroll.max_scroll_y());
                self.update_vertical_scroll(target)
            }
            DragState::HorizontalThumb {
                start_pointer,
                start_scroll,
            } => {
                let Some(bar) = self.scrollbars.horizontal else {
                    return false;
                };
                let target = bar.drag_target(start_scroll, x - start_pointer, self.scroll.max_scroll_x());
                self.update_horizontal_scroll(target)
            }
            DragState::ResizingColumn {
                index,
                start_x,
                start_width,
                ..
            } => {
                let width = (start_width + x - start_x).max(MIN_COLUMN_WIDTH);
                self.drag = DragState::ResizingColumn {
                    index,
                    start_x,
                    start_width,
                    width,
                };
                self.draw_resize_indicator(index, width);
                true
            }
            DragState::Idle => {
                let vertical = self.scrollbars.vertical.is_some_and(|b| b.thumb.contains(x, y));
                let horizontal = self
                    .scrollbars
                    .horizontal
                    .is_some_and(|b| b.thumb.contains(x, y));
                self.set_hover(vertical, horizontal)
            }
        }
    }

    /// Primary button released. A click activates the target only when press
    /// and release land on the same element; the activated target is returned
    /// so the host can open filter or summary menus.
    pub fn pointer_up(&mut self, x: f64, y: f64) -> Option<HitTarget> {
        let drag = std::mem::take(&mut self.drag);
        let pressed = self.pressed.take();
        match drag {
            DragState::VerticalThumb { .. } | DragState::HorizontalThumb { .. } => {
                let vertical = self.scrollbars.vertical.is_some_and(|b| b.thumb.contains(x, y));
                let horizontal = self
                    .scrollbars
                    .horizontal
                    .is_some_and(|b| b.thumb.contains(x, y));
                self.set_hover(vertical, horizontal);
                return None;
            }
            DragState::ResizingColumn { index, width, .. } => {
                self.remove_resize_indicator();
                debug!(index, width, "column resized");
                self.set_column_width(index, width);
                return None;
            }
            DragState::Idle => {}
        }

        let target = self.hit_test(x, y);
        if pressed.as_ref() != Some(&target) {
            return None;
        }
        match &target {
            HitTarget::SortArrow { column, order } => {
                let column = column.clone();
                self.click_sort(&column, *order);
            }
            HitTarget::BodyCell { row, col } => {
                self.select_cell(*row, *col);
            }
            HitTarget::None => return None,
            _ => {}
        }
        Some(target)
    }

    /// Pointer left the grid.
    pub fn pointer_leave(&mut self) -> bool {
        if self.drag.is_active() {
            return false;
        }
        self.set_hover(false, false)
    }

    fn set_hover(&mut self, vertical: bool, horizontal: bool) -> bool {
        if self.hover.vertical == vertical && self.hover.horizontal == horizontal {
            return false;
        }
        self.hover.vertical = vertical;
        self.hover.horizontal = horizontal;
        self.draw_scrollbar_layer();
        self.compositor.request_redraw(&[LayerKind::Scrollbar]);
        true
    }

    fn draw_resize_indicator(&mut self, index: usize, width: f64) {
        let Some(root) = self.compositor.root(LayerKind::Scrollbar) else {
            return;
        };
        let Some((_, left)) = self.column_stage_x(index) else {
            return;
        };
        let height = self.viewport.map_or(0.0, |v| v.height);
        let shape = Shape::Rect(RectAttrs {
            x: left + width - RESIZE_INDICATOR_WIDTH / 2.0,
            y: 0.0,
            width: RESIZE_INDICATOR_WIDTH,
            height,
            fill: Some(self.config.style.sort_active_color.clone()),
            stroke: None,
            stroke_width: 0.0,
            corner_radius: 0.0,
        });
        match self.resize_indicator.filter(|id| self.scene.contains(*id)) {
            Some(id) => self.scene.reset(id, NodeRole::ResizeIndicator, shape),
            None => {
                let id = self.scene.create(NodeRole::ResizeIndicator, shape);
                self.scene.attach(root, id);
                self.resize_indicator = Some(id);
            }
        }
        self.compositor.request_redraw(&[LayerKind::Scrollbar]);
    }

    fn remove_resize_indicator(&mut self) {
        if let Some(id) = self.resize_indicator.take() {
            self.scene.destroy(id);
            self.compositor.request_redraw(&[LayerKind::Scrollbar]);
        }
    }

    /// Highlight the body cell at display row `row`, column index `col`.
    /// Returns false when the cell does not exist.
    pub fn select_cell(&mut self, row: usize, col: usize) -> bool {
        if row >= self.display.len() {
            return false;
        }
        let Some(groups) = self.groups else {
            return false;
        };
        let Some((region, x)) = self.locate_in_band(col) else {
            return false;
        };
        let Some(width) = self.partition.by_index(col).map(PartitionedColumn::width) else {
            return false;
        };

        self.clear_selection();
        let row_height = self.metrics.row_height;
        #[allow(clippy::cast_precision_loss)]
        let y = row as f64 * row_height;
        let id = self.scene.create(
            NodeRole::Highlight,
            Shape::Rect(RectAttrs {
                x,
                y,
                width,
                height: row_height,
                fill: None,
                stroke: Some(self.config.style.highlight_cell_background.clone()),
                stroke_width: HIGHLIGHT_STROKE,
                corner_radius: 0.0,
            }),
        );
        self.scene.attach(groups.body(region), id);
        self.scene.move_to_top(id);
        self.highlight = Some(Highlight {
            id,
            region,
            row,
            col,
        });
        self.compositor.request_redraw(&[layer_of(region)]);
        debug!(row, col, "cell selected");
        true
    }

    /// Remove the cell highlight, if any.
    pub fn clear_selection(&mut self) {
        if let Some(highlight) = self.highlight.take() {
            self.scene.destroy(highlight.id);
            self.compositor.request_redraw(&[layer_of(highlight.region)]);
        }
    }

    /// Region of column `index` and its left edge inside the band.
    fn locate_in_band(&self, index: usize) -> Option<(Region, f64)> {
        Region::ALL.into_iter().find_map(|region| {
            let columns = band(&self.partition, region);
            columns
                .iter()
                .zip(ColumnPartition::offsets(columns))
                .find_map(|(c, at)| (c.index == index).then_some((region, at)))
        })
    }
}

fn layer_of(region: Region) -> LayerKind {
    match region {
        Region::Center => LayerKind::Body,
        Region::Left | Region::Right => LayerKind::FixedBody,
    }
}

fn header_target(columns: &[PartitionedColumn], band_x: f64, y: f64, header_h: f64) -> HitTarget {
    let offsets = ColumnPartition::offsets(columns);
    for (column, left) in columns.iter().zip(offsets) {
        let name = || column.column.column_name.clone();
        match header_hit(&column.column, left, band_x, y, header_h) {
            Some(HeaderHit::Resize) => return HitTarget::ColumnResizer { index: column.index },
            Some(HeaderHit::Filter) => return HitTarget::FilterIcon { column: name() },
            Some(HeaderHit::Sort(order)) => {
                return HitTarget::SortArrow {
                    column: name(),
                    order,
                }
            }
            None => {}
        }
    }
    match ColumnPartition::column_at(columns, band_x) {
        Some((column, _)) => HitTarget::HeaderCell {
            column: column.column.column_name.clone(),
        },
        None => HitTarget::None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::types::{ColumnDefinition, Fixed, GridConfig, Row};

    fn engine() -> GridEngine {
        let mut engine = GridEngine::new(GridConfig {
            buffer_rows: 2,
            ..GridConfig::default()
        });
        engine.set_columns(vec![
            ColumnDefinition::new("id", 100.0).fixed(Fixed::Left),
            ColumnDefinition::new("name", 300.0).sortable().filterable(),
            ColumnDefinition::new("city", 300.0),
        ]);
        engine.set_data(
            (0..200)
                .map(|i| Row::new().with("id", format!("{i}")).with("name", format!("n{}", 200 - i)))
                .collect(),
        );
        engine.attach(500.0, 332.0);
        engine
    }

    #[test]
    fn hit_test_regions() {
        let engine = engine();
        assert_eq!(engine.hit_test(50.0, 10.0), HitTarget::HeaderCell { column: "id".into() });
        // name spans 100..400 in stage x; filter center at 388
        assert_eq!(
            engine.hit_test(388.0, 16.0),
            HitTarget::FilterIcon { column: "name".into() }
        );
        assert_eq!(engine.hit_test(99.0, 10.0), HitTarget::ColumnResizer { index: 0 });
        assert_eq!(engine.hit_test(150.0, 32.0 + 65.0), HitTarget::BodyCell { row: 2, col: 1 });
    }

    #[test]
    fn sort_arrow_click_sorts() {
        let mut engine = engine();
        // Arrows start 34px left of the right edge (400)
        let target = engine.pointer_down(370.0, 12.0);
        assert_eq!(
            target,
            HitTarget::SortArrow {
                column: "name".into(),
                order: SortOrder::Asc
            }
        );
        assert!(engine.pointer_up(370.0, 12.0).is_some());
        assert_eq!(engine.sort_columns().len(), 1);
        assert_eq!(engine.display_row(0).unwrap().display_value("name"), "n1");
    }

    #[test]
    fn release_elsewhere_cancels_click() {
        let mut engine = engine();
        engine.pointer_down(370.0, 12.0);
        assert!(engine.pointer_up(150.0, 100.0).is_none());
        assert!(engine.sort_columns().is_empty());
    }

    #[test]
    fn resize_drag_enforces_minimum() {
        let mut engine = engine();
        engine.pointer_down(99.0, 10.0);
        assert!(engine.drag_state().is_active());
        engine.pointer_move(0.0, 10.0);
        assert!(matches!(
            engine.drag_state(),
            DragState::ResizingColumn { width, .. } if width == MIN_COLUMN_WIDTH
        ));
        engine.pointer_up(0.0, 10.0);
        assert_eq!(engine.columns()[0].width, Some(MIN_COLUMN_WIDTH));
        assert_eq!(engine.partition().left_width, MIN_COLUMN_WIDTH);
    }

    #[test]
    fn thumb_drag_scrolls() {
        let mut engine = engine();
        let thumb = engine.scrollbar_geometry().vertical.unwrap().thumb;
        let (x, y) = (thumb.x + 1.0, thumb.y + 1.0);
        assert_eq!(engine.pointer_down(x, y), HitTarget::VerticalThumb);
        assert!(engine.pointer_move(x, y + 50.0));
        assert!(engine.scroll().scroll_y() > 0.0);
        assert_eq!(engine.cursor(x, y), "grabbing");
        engine.pointer_up(x, y + 50.0);
        assert!(!engine.drag_state().is_active());
    }

    #[test]
    fn clicking_a_cell_highlights_it() {
        let mut engine = engine();
        engine.pointer_down(150.0, 100.0);
        engine.pointer_up(150.0, 100.0);
        assert_eq!(engine.selected_cell(), Some((2, 1)));
        let group = engine.body_group(Region::Center).unwrap();
        let children = engine.scene().children(group);
        let top = *children.last().unwrap();
        assert_eq!(engine.scene().role(top), Some(NodeRole::Highlight));

        // Survives a row window change
        engine.update_vertical_scroll(900.0);
        let children = engine.scene().children(group);
        assert_eq!(engine.scene().role(*children.last().unwrap()), Some(NodeRole::Highlight));
    }
}
