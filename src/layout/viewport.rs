//! Attached surface size and the fixed band heights derived from configuration.

use crate::types::GridConfig;

/// Size of the attached drawing surface in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }
}

/// Fixed band sizes that every geometry computation needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub header_height: f64,
    /// 0 when the summary row is disabled
    pub summary_height: f64,
    pub row_height: f64,
    pub scrollbar_size: f64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::from_config(&GridConfig::default())
    }
}

impl Metrics {
    pub fn from_config(config: &GridConfig) -> Self {
        Self {
            header_height: config.style.header_row_height,
            summary_height: config.summary_height(),
            row_height: config.style.body_row_height,
            scrollbar_size: config.style.scrollbar_size,
        }
    }

    /// Height available to body rows: viewport minus header, summary and, when
    /// present, the horizontal scrollbar.
    pub fn body_height(&self, viewport: &Viewport, horizontal_bar: bool) -> f64 {
        let bar = if horizontal_bar {
            self.scrollbar_size
        } else {
            0.0
        };
        (viewport.height - self.header_height - self.summary_height - bar).max(0.0)
    }

    /// Width available to center columns.
    pub fn center_view_width(
        &self,
        viewport: &Viewport,
        left_width: f64,
        right_width: f64,
        vertical_bar: bool,
    ) -> f64 {
        let bar = if vertical_bar {
            self.scrollbar_size
        } else {
            0.0
        };
        (viewport.width - left_width - right_width - bar).max(0.0)
    }
}
