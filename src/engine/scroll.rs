//! Scroll handling: wheel routing, offset updates and the redraws they imply.

use tracing::trace;

use super::GridEngine;
use crate::render::{
    draw_scrollbars, ScrollbarGeometry, HORIZONTAL_SCROLL_LAYERS, VERTICAL_SCROLL_LAYERS,
};

/// Which axis a wheel event scrolls, and by how much.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelAxis {
    Vertical(f64),
    Horizontal(f64),
}

/// Route a wheel delta to a single axis.
///
/// Shift with a purely vertical delta scrolls horizontally. Otherwise the
/// dominant axis wins; equal magnitudes go horizontal.
pub fn wheel_axis(dx: f64, dy: f64, shift: bool) -> Option<WheelAxis> {
    let has_x = dx.abs() > 0.0;
    let has_y = dy.abs() > 0.0;
    if shift && !has_x && has_y {
        return Some(WheelAxis::Horizontal(dy));
    }
    if dy.abs() > dx.abs() {
        has_y.then_some(WheelAxis::Vertical(dy))
    } else {
        has_x.then_some(WheelAxis::Horizontal(dx))
    }
}

impl GridEngine {
    /// Handle a wheel event. Returns true when the grid scrolled, so the host
    /// should suppress the page's default scrolling.
    pub fn wheel(&mut self, dx: f64, dy: f64, shift: bool) -> bool {
        match wheel_axis(dx, dy, shift) {
            Some(WheelAxis::Vertical(delta)) => {
                self.update_vertical_scroll(self.scroll.scroll_y() + delta)
            }
            Some(WheelAxis::Horizontal(delta)) => {
                self.update_horizontal_scroll(self.scroll.scroll_x() + delta)
            }
            None => false,
        }
    }

    /// Jump to an absolute position on both axes.
    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.update_horizontal_scroll(x);
        self.update_vertical_scroll(y);
    }

    /// Scroll vertically to `y` (clamped). Body bands are re-rendered only when
    /// the materialized row window changes. Returns true when the offset changed.
    pub fn update_vertical_scroll(&mut self, y: f64) -> bool {
        if !self.scroll.set_y(y) {
            return false;
        }
        let next = self.compute_visible();
        if next != self.visible {
            trace!(start = next.start, end = next.end, "row window moved");
            self.visible = next;
            self.draw_body();
        }
        self.position_groups();
        self.draw_scrollbar_layer();
        self.compositor.request_redraw(&VERTICAL_SCROLL_LAYERS);
        true
    }

    /// Scroll horizontally to `x` (clamped). Returns true when the offset changed.
    pub fn update_horizontal_scroll(&mut self, x: f64) -> bool {
        if !self.scroll.set_x(x) {
            return false;
        }
        self.position_groups();
        self.draw_scrollbar_layer();
        self.compositor.request_redraw(&HORIZONTAL_SCROLL_LAYERS);
        true
    }

    pub(crate) fn position_groups(&mut self) {
        if let Some(groups) = self.groups {
            groups.position(&mut self.scene, &self.scroll);
        }
    }

    /// Recompute scrollbar geometry and rebuild the bar primitives.
    pub(crate) fn draw_scrollbar_layer(&mut self) {
        let Some(viewport) = self.viewport else {
            self.scrollbars = ScrollbarGeometry::default();
            return;
        };
        self.scrollbars = ScrollbarGeometry::compute(
            &viewport,
            &self.metrics,
            &self.partition,
            &self.scroll,
            self.display.len(),
        );
        if let Some(groups) = self.groups {
            draw_scrollbars(
                &mut self.scene,
                groups.bars,
                &self.scrollbars,
                &self.config.style,
                self.hover,
            );
        }
    }
}
