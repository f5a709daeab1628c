//! Pure geometry for the grid.
//!
//! This module handles:
//! - Splitting columns into left-fixed, center and right-fixed partitions
//! - Resolving auto column widths against the viewport
//! - Two-pass scroll limit computation and clamped scroll state
//! - The virtual row window materialized by the renderer
//! - Scrollbar thumb geometry

mod partition;
mod rows;
mod scroll;
mod viewport;

pub use partition::{partition_columns, resolve_auto_widths, ColumnPartition, PartitionedColumn};
pub use rows::{compute_visible_rows, VisibleRowRange};
pub use scroll::{
    compute_scroll_limits, thumb_length, thumb_offset, ScrollLimits, ScrollState, MIN_THUMB,
};
pub use viewport::{Metrics, Viewport};
