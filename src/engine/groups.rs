//! Region group tree.
//!
//! Every layer root sits at the stage origin. Scrolled content lives in a child
//! group offset by the negated scroll position inside a clipping group, so a
//! scroll only moves a handful of group origins.

use crate::layout::{ColumnPartition, Metrics, ScrollLimits, ScrollState, Viewport};
use crate::render::{Clip, LayerKind, NodeId, Region, Scene};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RegionGroups {
    body_root: NodeId,
    center_body: NodeId,

    fixed_root: NodeId,
    left_body: NodeId,
    right_body: NodeId,

    header_root: NodeId,
    header_left: NodeId,
    header_center: NodeId,
    header_right: NodeId,

    summary_root: NodeId,
    summary_left: NodeId,
    summary_center: NodeId,
    summary_right: NodeId,

    scrollbar_root: NodeId,
    /// Track, thumb and mask primitives; rebuilt on every scrollbar redraw
    pub bars: NodeId,
}

fn clip(width: f64, height: f64) -> Option<Clip> {
    Some(Clip {
        x: 0.0,
        y: 0.0,
        width: width.max(0.0),
        height: height.max(0.0),
    })
}

impl RegionGroups {
    pub fn build(
        scene: &mut Scene,
        viewport: &Viewport,
        metrics: &Metrics,
        partition: &ColumnPartition,
        limits: ScrollLimits,
    ) -> Self {
        let vbar = limits.vertical_bar();
        let hbar = limits.horizontal_bar();
        let v_space = if vbar { metrics.scrollbar_size } else { 0.0 };
        let h_space = if hbar { metrics.scrollbar_size } else { 0.0 };

        let left_w = partition.left_width;
        let right_x = viewport.width - partition.right_width - v_space;
        let body_h = metrics.body_height(viewport, hbar);
        let center_w =
            metrics.center_view_width(viewport, left_w, partition.right_width, vbar);
        let header_h = metrics.header_height;

        // Body
        let body_root = scene.create_group(left_w, header_h, clip(center_w, body_h));
        let center_body = scene.create_group(0.0, 0.0, None);
        scene.attach(body_root, center_body);

        // Frozen body columns
        let fixed_root = scene.create_group(0.0, 0.0, None);
        let left_clip = scene.create_group(0.0, header_h, clip(left_w, body_h));
        let left_body = scene.create_group(0.0, 0.0, None);
        scene.attach(left_clip, left_body);
        scene.attach(fixed_root, left_clip);
        let right_clip =
            scene.create_group(right_x, header_h, clip(partition.right_width, body_h));
        let right_body = scene.create_group(0.0, 0.0, None);
        scene.attach(right_clip, right_body);
        scene.attach(fixed_root, right_clip);

        // Header
        let header_root = scene.create_group(0.0, 0.0, None);
        let header_left = scene.create_group(0.0, 0.0, None);
        scene.attach(header_root, header_left);
        let header_clip = scene.create_group(left_w, 0.0, clip(center_w, header_h));
        let header_center = scene.create_group(0.0, 0.0, None);
        scene.attach(header_clip, header_center);
        scene.attach(header_root, header_clip);
        let header_right = scene.create_group(right_x, 0.0, None);
        scene.attach(header_root, header_right);

        // Summary
        let summary_y = viewport.height - metrics.summary_height - h_space;
        let summary_root = scene.create_group(0.0, 0.0, None);
        let summary_left = scene.create_group(0.0, summary_y, None);
        scene.attach(summary_root, summary_left);
        let summary_clip =
            scene.create_group(left_w, summary_y, clip(center_w, metrics.summary_height));
        let summary_center = scene.create_group(0.0, 0.0, None);
        scene.attach(summary_clip, summary_center);
        scene.attach(summary_root, summary_clip);
        let summary_right = scene.create_group(right_x, summary_y, None);
        scene.attach(summary_root, summary_right);

        // Scrollbars
        let scrollbar_root = scene.create_group(0.0, 0.0, None);
        let bars = scene.create_group(0.0, 0.0, None);
        scene.attach(scrollbar_root, bars);

        Self {
            body_root,
            center_body,
            fixed_root,
            left_body,
            right_body,
            header_root,
            header_left,
            header_center,
            header_right,
            summary_root,
            summary_left,
            summary_center,
            summary_right,
            scrollbar_root,
            bars,
        }
    }

    pub fn root(&self, layer: LayerKind) -> NodeId {
        match layer {
            LayerKind::Body => self.body_root,
            LayerKind::FixedBody => self.fixed_root,
            LayerKind::Header => self.header_root,
            LayerKind::Summary => self.summary_root,
            LayerKind::Scrollbar => self.scrollbar_root,
        }
    }

    pub fn body(&self, region: Region) -> NodeId {
        match region {
            Region::Left => self.left_body,
            Region::Center => self.center_body,
            Region::Right => self.right_body,
        }
    }

    pub fn header(&self, region: Region) -> NodeId {
        match region {
            Region::Left => self.header_left,
            Region::Center => self.header_center,
            Region::Right => self.header_right,
        }
    }

    pub fn summary(&self, region: Region) -> NodeId {
        match region {
            Region::Left => self.summary_left,
            Region::Center => self.summary_center,
            Region::Right => self.summary_right,
        }
    }

    /// Offset the scrolled groups by the current scroll position.
    pub fn position(&self, scene: &mut Scene, scroll: &ScrollState) {
        let (sx, sy) = (scroll.scroll_x(), scroll.scroll_y());
        scene.set_position(self.center_body, -sx, -sy);
        scene.set_position(self.left_body, 0.0, -sy);
        scene.set_position(self.right_body, 0.0, -sy);
        scene.set_position(self.header_center, -sx, 0.0);
        scene.set_position(self.summary_center, -sx, 0.0);
    }
}
