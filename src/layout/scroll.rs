//! Scroll limits, clamped scroll offsets and scrollbar thumb geometry.

use super::{ColumnPartition, Metrics, Viewport};

/// Smallest thumb length in pixels.
pub const MIN_THUMB: f64 = 20.0;

/// Maximum scroll offsets and which scrollbars take up space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollLimits {
    pub max_scroll_x: f64,
    pub max_scroll_y: f64,
}

impl ScrollLimits {
    /// Whether a vertical scrollbar is shown (and reserves its thickness).
    pub fn vertical_bar(&self) -> bool {
        self.max_scroll_y > 0.0
    }

    /// Whether a horizontal scrollbar is shown (and reserves its thickness).
    pub fn horizontal_bar(&self) -> bool {
        self.max_scroll_x > 0.0
    }
}

/// Compute the maximum scroll offsets for the content.
///
/// Two passes: first with no scrollbars reserved, then reserving the thickness of
/// each scrollbar the first pass found necessary. Returns zero limits when no
/// viewport is attached.
pub fn compute_scroll_limits(
    viewport: Option<&Viewport>,
    partition: &ColumnPartition,
    row_count: usize,
    metrics: &Metrics,
) -> ScrollLimits {
    let Some(viewport) = viewport else {
        return ScrollLimits::default();
    };

    #[allow(clippy::cast_precision_loss)]
    let content_height = row_count as f64 * metrics.row_height;
    let content_width = partition.center_width;
    let fixed_width = partition.left_width + partition.right_width;
    let body_height = viewport.height - metrics.header_height - metrics.summary_height;

    let prelim_x = (content_width - (viewport.width - fixed_width)).max(0.0);
    let prelim_y = (content_height - body_height).max(0.0);
    let v_space = if prelim_y > 0.0 {
        metrics.scrollbar_size
    } else {
        0.0
    };
    let h_space = if prelim_x > 0.0 {
        metrics.scrollbar_size
    } else {
        0.0
    };

    ScrollLimits {
        max_scroll_x: (content_width - (viewport.width - fixed_width - v_space)).max(0.0),
        max_scroll_y: (content_height - (body_height - h_space)).max(0.0),
    }
}

/// Current scroll offsets together with the limits they are clamped to.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    scroll_x: f64,
    scroll_y: f64,
    limits: ScrollLimits,
}

fn clamp_offset(value: f64, max: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, max.max(0.0))
}

impl ScrollState {
    pub fn scroll_x(&self) -> f64 {
        self.scroll_x
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn limits(&self) -> ScrollLimits {
        self.limits
    }

    pub fn max_scroll_x(&self) -> f64 {
        self.limits.max_scroll_x
    }

    pub fn max_scroll_y(&self) -> f64 {
        self.limits.max_scroll_y
    }

    /// Install new limits and re-clamp the current offsets into them.
    pub fn set_limits(&mut self, limits: ScrollLimits) {
        self.limits = limits;
        self.scroll_x = clamp_offset(self.scroll_x, limits.max_scroll_x);
        self.scroll_y = clamp_offset(self.scroll_y, limits.max_scroll_y);
    }

    /// Set the horizontal offset, clamped. Returns true if it changed.
    pub fn set_x(&mut self, x: f64) -> bool {
        let next = clamp_offset(x, self.limits.max_scroll_x);
        let changed = (next - self.scroll_x).abs() > f64::EPSILON;
        self.scroll_x = next;
        changed
    }

    /// Set the vertical offset, clamped. Returns true if it changed.
    pub fn set_y(&mut self, y: f64) -> bool {
        let next = clamp_offset(y, self.limits.max_scroll_y);
        let changed = (next - self.scroll_y).abs() > f64::EPSILON;
        self.scroll_y = next;
        changed
    }

    pub fn reset(&mut self) {
        self.scroll_x = 0.0;
        self.scroll_y = 0.0;
    }
}

/// Thumb length for a track showing `content` pixels of content.
///
/// Returns the whole track when there is no content to scroll.
pub fn thumb_length(track: f64, content: f64) -> f64 {
    if content <= 0.0 {
        return track.max(0.0);
    }
    (track * track / content).max(MIN_THUMB)
}

/// Thumb offset from the start of the track for the given scroll offset.
pub fn thumb_offset(track: f64, thumb: f64, scroll: f64, max_scroll: f64) -> f64 {
    if max_scroll <= 0.0 {
        return 0.0;
    }
    (scroll / max_scroll) * (track - thumb)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn state_clamps_into_limits() {
        let mut state = ScrollState::default();
        state.set_limits(ScrollLimits {
            max_scroll_x: 100.0,
            max_scroll_y: 500.0,
        });
        assert!(state.set_y(10_000.0));
        assert_eq!(state.scroll_y(), 500.0);
        assert!(!state.set_x(-40.0));
        assert_eq!(state.scroll_x(), 0.0);

        state.set_limits(ScrollLimits {
            max_scroll_x: 0.0,
            max_scroll_y: 200.0,
        });
        assert_eq!(state.scroll_y(), 200.0);
    }

    #[test]
    fn thumb_never_below_minimum() {
        assert_eq!(thumb_length(300.0, 300_000.0), MIN_THUMB);
        assert_eq!(thumb_length(300.0, 600.0), 150.0);
        assert_eq!(thumb_length(300.0, 0.0), 300.0);
    }

    #[test]
    fn thumb_offset_guards_zero_max() {
        assert_eq!(thumb_offset(300.0, 20.0, 50.0, 0.0), 0.0);
        assert_eq!(thumb_offset(300.0, 20.0, 50.0, 100.0), 140.0);
    }

    #[test]
    fn detached_engine_has_zero_limits() {
        let limits =
            compute_scroll_limits(None, &ColumnPartition::default(), 1000, &Metrics::default());
        assert_eq!(limits, ScrollLimits::default());
    }
}
