//! Scrollbar geometry and drawing.
//!
//! Geometry is computed once per frame from the layout and shared by drawing and
//! by pointer hit tests, so a thumb is grabbed exactly where it is painted.

use super::scene::{NodeId, NodeRole, RectAttrs, Scene, Shape};
use crate::layout::{thumb_length, thumb_offset, ColumnPartition, Metrics, ScrollState, Viewport};
use crate::types::GridStyle;

/// Inset of a thumb inside its track, on both sides of the cross axis.
const THUMB_INSET: f64 = 2.0;
const THUMB_RADIUS: f64 = 2.0;

/// Axis-aligned box in stage coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// One scrollbar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub track: Bounds,
    pub thumb: Bounds,
    /// Length the thumb travels along, plus the thumb length itself
    pub track_length: f64,
    pub thumb_length: f64,
}

impl BarGeometry {
    /// Scroll offset reached by dragging the thumb `delta` pixels from a drag
    /// that started at `start_scroll`. Unclamped.
    pub fn drag_target(&self, start_scroll: f64, delta: f64, max_scroll: f64) -> f64 {
        let travel = self.track_length - self.thumb_length;
        if travel <= 0.0 {
            return start_scroll;
        }
        start_scroll + delta / travel * max_scroll
    }
}

/// Both scrollbars plus the mask boxes that cover the header and summary bands
/// above and below the vertical track.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollbarGeometry {
    pub vertical: Option<BarGeometry>,
    pub horizontal: Option<BarGeometry>,
    pub header_mask: Option<Bounds>,
    pub summary_mask: Option<Bounds>,
}

impl ScrollbarGeometry {
    /// Lay out the scrollbars for the current frame. Bars only exist on axes that
    /// can scroll.
    pub fn compute(
        viewport: &Viewport,
        metrics: &Metrics,
        partition: &ColumnPartition,
        scroll: &ScrollState,
        row_count: usize,
    ) -> Self {
        let limits = scroll.limits();
        let vbar = limits.vertical_bar();
        let hbar = limits.horizontal_bar();
        let size = metrics.scrollbar_size;
        let h_space = if hbar { size } else { 0.0 };
        let v_space = if vbar { size } else { 0.0 };

        let mut geometry = Self::default();

        if vbar {
            let x = viewport.width - size;
            let track_len =
                viewport.height - metrics.header_height - metrics.summary_height - h_space;
            #[allow(clippy::cast_precision_loss)]
            let content = row_count as f64 * metrics.row_height;
            let thumb_len = thumb_length(track_len, content);
            let offset = thumb_offset(track_len, thumb_len, scroll.scroll_y(), limits.max_scroll_y);
            geometry.vertical = Some(BarGeometry {
                track: Bounds {
                    x,
                    y: metrics.header_height,
                    width: size,
                    height: track_len,
                },
                thumb: Bounds {
                    x: x + THUMB_INSET,
                    y: metrics.header_height + offset,
                    width: size - THUMB_INSET * 2.0,
                    height: thumb_len,
                },
                track_length: track_len,
                thumb_length: thumb_len,
            });
            geometry.header_mask = Some(Bounds {
                x,
                y: 0.0,
                width: size,
                height: metrics.header_height,
            });
            if metrics.summary_height > 0.0 {
                geometry.summary_mask = Some(Bounds {
                    x,
                    y: viewport.height - metrics.summary_height - h_space,
                    width: size,
                    height: metrics.summary_height,
                });
            }
        }

        if hbar {
            let y = viewport.height - size;
            let visible = viewport.width - partition.left_width - partition.right_width - v_space;
            let thumb_len = thumb_length(visible, partition.center_width);
            let offset = thumb_offset(visible, thumb_len, scroll.scroll_x(), limits.max_scroll_x);
            geometry.horizontal = Some(BarGeometry {
                track: Bounds {
                    x: 0.0,
                    y,
                    width: viewport.width - v_space,
                    height: size,
                },
                thumb: Bounds {
                    x: partition.left_width + offset,
                    y: y + THUMB_INSET,
                    width: thumb_len,
                    height: size - THUMB_INSET * 2.0,
                },
                track_length: visible,
                thumb_length: thumb_len,
            });
        }

        geometry
    }
}

/// Thumbs drawn with the hover color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThumbHover {
    pub vertical: bool,
    pub horizontal: bool,
}

/// Rebuild the scrollbar layer under `root`.
pub fn draw_scrollbars(
    scene: &mut Scene,
    root: NodeId,
    geometry: &ScrollbarGeometry,
    style: &GridStyle,
    hover: ThumbHover,
) {
    scene.destroy_children(root);

    if let Some(mask) = geometry.header_mask {
        add_rect(scene, root, NodeRole::Mask, mask, &style.header_background, Some(&style.border_color), 0.0);
    }
    if let Some(mask) = geometry.summary_mask {
        add_rect(scene, root, NodeRole::Mask, mask, &style.summary_background, Some(&style.border_color), 0.0);
    }

    let thumb_fill = |hovered: bool| {
        if hovered {
            &style.scrollbar_thumb_hover_background
        } else {
            &style.scrollbar_thumb_background
        }
    };
    for (bar, hovered) in [
        (geometry.vertical, hover.vertical),
        (geometry.horizontal, hover.horizontal),
    ] {
        let Some(bar) = bar else {
            continue;
        };
        add_rect(
            scene,
            root,
            NodeRole::ScrollTrack,
            bar.track,
            &style.scrollbar_background,
            Some(&style.border_color),
            0.0,
        );
        add_rect(scene, root, NodeRole::ScrollThumb, bar.thumb, thumb_fill(hovered), None, THUMB_RADIUS);
    }
}

fn add_rect(
    scene: &mut Scene,
    root: NodeId,
    role: NodeRole,
    bounds: Bounds,
    fill: &str,
    stroke: Option<&String>,
    corner_radius: f64,
) {
    let id = scene.create(
        role,
        Shape::Rect(RectAttrs {
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            fill: Some(fill.to_string()),
            stroke: stroke.cloned(),
            stroke_width: if stroke.is_some() { 1.0 } else { 0.0 },
            corner_radius,
        }),
    );
    scene.attach(root, id);
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::layout::{compute_scroll_limits, partition_columns};
    use crate::types::ColumnDefinition;

    fn setup(rows: usize, widths: &[f64]) -> (Viewport, Metrics, ColumnPartition, ScrollState) {
        let viewport = Viewport::new(500.0, 400.0);
        let metrics = Metrics {
            header_height: 32.0,
            summary_height: 0.0,
            row_height: 30.0,
            scrollbar_size: 16.0,
        };
        let columns: Vec<ColumnDefinition> = widths
            .iter()
            .enumerate()
            .map(|(i, w)| ColumnDefinition::new(format!("c{i}"), *w))
            .collect();
        let partition = partition_columns(&columns);
        let mut scroll = ScrollState::default();
        scroll.set_limits(compute_scroll_limits(Some(&viewport), &partition, rows, &metrics));
        (viewport, metrics, partition, scroll)
    }

    #[test]
    fn no_bars_when_content_fits() {
        let (viewport, metrics, partition, scroll) = setup(5, &[100.0]);
        let g = ScrollbarGeometry::compute(&viewport, &metrics, &partition, &scroll, 5);
        assert!(g.vertical.is_none());
        assert!(g.horizontal.is_none());
        assert!(g.header_mask.is_none());
    }

    #[test]
    fn vertical_thumb_tracks_scroll() {
        let (viewport, metrics, partition, mut scroll) = setup(1000, &[100.0]);
        let g = ScrollbarGeometry::compute(&viewport, &metrics, &partition, &scroll, 1000);
        let bar = g.vertical.unwrap();
        // 400 - 32 header, no horizontal bar
        assert_eq!(bar.track_length, 368.0);
        assert_eq!(bar.thumb_length, 20.0);
        assert_eq!(bar.thumb.y, 32.0);

        scroll.set_y(scroll.max_scroll_y());
        let g = ScrollbarGeometry::compute(&viewport, &metrics, &partition, &scroll, 1000);
        let bar = g.vertical.unwrap();
        assert_eq!(bar.thumb.y + bar.thumb.height, 32.0 + 368.0);
    }

    #[test]
    fn drag_maps_pixels_to_scroll() {
        let (viewport, metrics, partition, scroll) = setup(1000, &[100.0]);
        let g = ScrollbarGeometry::compute(&viewport, &metrics, &partition, &scroll, 1000);
        let bar = g.vertical.unwrap();
        let max = scroll.max_scroll_y();
        assert_eq!(bar.drag_target(0.0, 348.0, max), max);
        assert_eq!(bar.drag_target(0.0, 0.0, max), 0.0);
    }

    #[test]
    fn horizontal_thumb_starts_after_left_band() {
        let (viewport, metrics, partition, scroll) = setup(5, &[300.0, 400.0]);
        let g = ScrollbarGeometry::compute(&viewport, &metrics, &partition, &scroll, 5);
        let bar = g.horizontal.unwrap();
        assert_eq!(bar.thumb.x, 0.0);
        assert_eq!(bar.track.y, 384.0);
        assert!(bar.thumb.contains(10.0, 390.0));
    }
}
