//! Header band drawing and header hit geometry.
//!
//! Header groups are small (one row), so they are rebuilt from scratch on every
//! repaint instead of going through the cell pools.

use super::scene::{NodeId, NodeRole, PolygonAttrs, RectAttrs, Scene, Shape, TextAttrs};
use super::text::{font_string, truncate_text, TextMeasurer, CELL_TEXT_INSET};
use crate::layout::PartitionedColumn;
use crate::pipeline::SortState;
use crate::types::{ColumnDefinition, FilterSpec, GridStyle, SortOrder};

/// Distance from the right edge of a column to the left of the sort arrows.
pub const SORT_ARROW_OFFSET: f64 = 34.0;
/// Distance from the right edge of a column to the filter icon center.
pub const FILTER_ICON_OFFSET: f64 = 12.0;
pub const RESIZER_WIDTH: f64 = 6.0;
pub const ARROW_SIZE: f64 = 8.0;
pub const ARROW_GAP: f64 = 2.0;
pub const FILTER_ICON_SIZE: f64 = 16.0;
/// Color of sort arrows and filter icons that are not active.
pub const INACTIVE_COLOR: &str = "#d0d7de";

/// Extra text room reserved for the sort arrows when a column is sorted.
const SORTED_TEXT_RESERVE: f64 = 16.0;

/// Interactive part of a header cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderHit {
    Sort(SortOrder),
    Filter,
    Resize,
}

/// Triangle for one sort arrow of a column whose left edge is `x`.
pub fn sort_arrow_points(x: f64, width: f64, header_height: f64, order: SortOrder) -> Vec<(f64, f64)> {
    let arrow_x = x + width - SORT_ARROW_OFFSET;
    let center_y = header_height / 2.0;
    match order {
        SortOrder::Asc => {
            let top = center_y - ARROW_GAP / 2.0 - ARROW_SIZE;
            vec![
                (arrow_x, top + ARROW_SIZE),
                (arrow_x + ARROW_SIZE / 2.0, top),
                (arrow_x + ARROW_SIZE, top + ARROW_SIZE),
            ]
        }
        SortOrder::Desc => {
            let top = center_y + ARROW_GAP / 2.0;
            vec![
                (arrow_x, top),
                (arrow_x + ARROW_SIZE / 2.0, top + ARROW_SIZE),
                (arrow_x + ARROW_SIZE, top),
            ]
        }
    }
}

/// Funnel outline for the filter icon of a column whose left edge is `x`.
pub fn filter_icon_points(x: f64, width: f64, header_height: f64) -> Vec<(f64, f64)> {
    let left = x + width - FILTER_ICON_OFFSET - FILTER_ICON_SIZE / 2.0;
    let top = header_height / 2.0 - FILTER_ICON_SIZE / 2.0;
    let pad = 2.0;
    let top_width = FILTER_ICON_SIZE - pad * 2.0;
    let neck = FILTER_ICON_SIZE * 0.6;
    let bottom = FILTER_ICON_SIZE - pad;
    [
        (pad, pad + 1.0),
        (pad + top_width, pad + 1.0),
        (pad + top_width * 0.7, neck),
        (pad + top_width * 0.7, bottom),
        (pad + top_width * 0.3, bottom),
        (pad + top_width * 0.3, neck),
    ]
    .into_iter()
    .map(|(px, py)| (left + px, top + py))
    .collect()
}

/// Which header control of `column` (left edge `col_x`) lies under the point.
///
/// The resize handle wins over the icons; arrows split at the vertical center.
pub fn header_hit(
    column: &ColumnDefinition,
    col_x: f64,
    x: f64,
    y: f64,
    header_height: f64,
) -> Option<HeaderHit> {
    let width = column.width_or_zero();
    if width <= 0.0 || y < 0.0 || y > header_height {
        return None;
    }
    let right = col_x + width;
    if (x - right).abs() <= RESIZER_WIDTH / 2.0 {
        return Some(HeaderHit::Resize);
    }

    let center_y = header_height / 2.0;
    if column.filterable {
        let cx = right - FILTER_ICON_OFFSET;
        if (x - cx).abs() <= FILTER_ICON_SIZE / 2.0 && (y - center_y).abs() <= FILTER_ICON_SIZE / 2.0
        {
            return Some(HeaderHit::Filter);
        }
    }
    if column.sortable {
        let arrow_x = right - SORT_ARROW_OFFSET;
        let reach = ARROW_SIZE + ARROW_GAP / 2.0;
        if x >= arrow_x && x <= arrow_x + ARROW_SIZE && (y - center_y).abs() <= reach {
            let order = if y < center_y {
                SortOrder::Asc
            } else {
                SortOrder::Desc
            };
            return Some(HeaderHit::Sort(order));
        }
    }
    None
}

/// Inputs of the header drawer.
pub struct HeaderSource<'a> {
    pub style: &'a GridStyle,
    pub sort: &'a SortState,
    pub filter: &'a FilterSpec,
}

/// Rebuild one header band group. Returns the number of columns drawn.
pub fn draw_header_part(
    scene: &mut Scene,
    group: NodeId,
    columns: &[PartitionedColumn],
    source: &HeaderSource<'_>,
    measurer: &mut dyn TextMeasurer,
) -> usize {
    scene.destroy_children(group);
    let style = source.style;
    let height = style.header_row_height;
    let font = font_string(style.header_font_size, &style.header_font_family);

    let mut x = 0.0;
    let mut drawn = 0;
    for column in columns {
        let def = &column.column;
        let width = column.width();
        if width <= 0.0 {
            x += width;
            continue;
        }

        add(
            scene,
            group,
            NodeRole::HeaderRect,
            Shape::Rect(RectAttrs {
                x,
                y: 0.0,
                width,
                height,
                fill: Some(style.header_background.clone()),
                stroke: Some(style.border_color.clone()),
                stroke_width: 1.0,
                corner_radius: 0.0,
            }),
        );

        let sort_order = source.sort.order_of(&def.column_name);
        let room = if sort_order.is_some() {
            width - SORTED_TEXT_RESERVE
        } else {
            width
        };
        let caption = truncate_text(measurer, def.caption(), room, &font).into_owned();
        add(
            scene,
            group,
            NodeRole::HeaderText,
            Shape::Text(TextAttrs {
                x,
                y: 0.0,
                width,
                height,
                text: caption,
                font: font.clone(),
                fill: style.header_text_color.clone(),
                align: def.align,
                vertical_align: def.vertical_align,
                padding: CELL_TEXT_INSET / 2.0,
            }),
        );

        if def.sortable {
            for order in [SortOrder::Asc, SortOrder::Desc] {
                let color = if sort_order == Some(order) {
                    style.sort_active_color.clone()
                } else {
                    INACTIVE_COLOR.to_string()
                };
                add(
                    scene,
                    group,
                    NodeRole::SortIndicator(order),
                    Shape::Polygon(PolygonAttrs {
                        points: sort_arrow_points(x, width, height, order),
                        fill: Some(color),
                        stroke: None,
                        stroke_width: 0.0,
                    }),
                );
            }
        }

        if def.filterable {
            let active = source.filter.is_active(&def.column_name);
            let color = if active {
                style.sort_active_color.clone()
            } else {
                INACTIVE_COLOR.to_string()
            };
            add(
                scene,
                group,
                NodeRole::FilterIcon,
                Shape::Polygon(PolygonAttrs {
                    points: filter_icon_points(x, width, height),
                    fill: active.then(|| color.clone()),
                    stroke: Some(color),
                    stroke_width: 1.5,
                }),
            );
        }

        add(
            scene,
            group,
            NodeRole::ColumnResizer,
            Shape::Rect(RectAttrs {
                x: x + width - RESIZER_WIDTH / 2.0,
                y: 0.0,
                width: RESIZER_WIDTH,
                height,
                fill: Some(style.border_color.clone()),
                ..RectAttrs::default()
            }),
        );

        x += width;
        drawn += 1;
    }
    drawn
}

fn add(scene: &mut Scene, group: NodeId, role: NodeRole, shape: Shape) -> NodeId {
    let id = scene.create(role, shape);
    scene.attach(group, id);
    id
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::layout::partition_columns;
    use crate::render::text::EstimatedTextMeasurer;
    use crate::types::SortMode;

    fn column() -> ColumnDefinition {
        ColumnDefinition::new("name", 120.0).sortable().filterable()
    }

    #[test]
    fn hit_regions_do_not_overlap() {
        let col = column();
        // right edge at 120
        assert_eq!(header_hit(&col, 0.0, 119.0, 10.0, 32.0), Some(HeaderHit::Resize));
        assert_eq!(header_hit(&col, 0.0, 108.0, 16.0, 32.0), Some(HeaderHit::Filter));
        assert_eq!(
            header_hit(&col, 0.0, 90.0, 12.0, 32.0),
            Some(HeaderHit::Sort(SortOrder::Asc))
        );
        assert_eq!(
            header_hit(&col, 0.0, 90.0, 20.0, 32.0),
            Some(HeaderHit::Sort(SortOrder::Desc))
        );
        assert_eq!(header_hit(&col, 0.0, 30.0, 16.0, 32.0), None);
    }

    #[test]
    fn plain_columns_have_only_a_resizer() {
        let col = ColumnDefinition::new("x", 120.0);
        assert_eq!(header_hit(&col, 0.0, 90.0, 12.0, 32.0), None);
        assert_eq!(header_hit(&col, 0.0, 121.0, 12.0, 32.0), Some(HeaderHit::Resize));
    }

    #[test]
    fn active_sort_arrow_uses_active_color() {
        let style = GridStyle::default();
        let mut sort = SortState::new(SortMode::Multi);
        sort.click("name", SortOrder::Desc);
        let filter = FilterSpec::new();
        let source = HeaderSource {
            style: &style,
            sort: &sort,
            filter: &filter,
        };
        let partition = partition_columns(&[column()]);
        let mut scene = Scene::new();
        let group = scene.create_group(0.0, 0.0, None);

        let drawn = draw_header_part(
            &mut scene,
            group,
            &partition.center_columns,
            &source,
            &mut EstimatedTextMeasurer::new(),
        );
        assert_eq!(drawn, 1);

        let down = scene.find_by_role(group, NodeRole::SortIndicator(SortOrder::Desc));
        let up = scene.find_by_role(group, NodeRole::SortIndicator(SortOrder::Asc));
        let fill = |id: NodeId| match scene.shape(id) {
            Some(Shape::Polygon(p)) => p.fill.clone(),
            _ => None,
        };
        assert_eq!(fill(down[0]), Some(style.sort_active_color.clone()));
        assert_eq!(fill(up[0]), Some(INACTIVE_COLOR.to_string()));
        assert_eq!(scene.find_by_role(group, NodeRole::FilterIcon).len(), 1);
    }

    #[test]
    fn redraw_replaces_previous_children() {
        let style = GridStyle::default();
        let sort = SortState::new(SortMode::Multi);
        let filter = FilterSpec::new();
        let source = HeaderSource {
            style: &style,
            sort: &sort,
            filter: &filter,
        };
        let partition = partition_columns(&[ColumnDefinition::new("a", 50.0)]);
        let mut scene = Scene::new();
        let group = scene.create_group(0.0, 0.0, None);
        let mut measurer = EstimatedTextMeasurer::new();

        draw_header_part(&mut scene, group, &partition.center_columns, &source, &mut measurer);
        let first = scene.len();
        draw_header_part(&mut scene, group, &partition.center_columns, &source, &mut measurer);
        assert_eq!(scene.len(), first);
    }
}
