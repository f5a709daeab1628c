//! The grid engine: one explicit context object owning all region state.
//!
//! `GridEngine` holds the configuration, dataset, derived display order, scroll
//! and drag state, the retained scene with its per-region groups and pools, and
//! the summary bookkeeping. Every operation takes `&mut self`; there is no
//! shared global state, so several grids can live side by side.
//!
//! A frame flows one way: configuration and data go through layout, the row
//! window and the region drawers into the scene; the compositor then flushes
//! the layers an operation marked dirty to a [`RenderBackend`].

mod events;
mod groups;
mod scroll;
mod summary;

pub use events::{DragState, HitTarget, MIN_COLUMN_WIDTH};
pub use scroll::{wheel_axis, WheelAxis};

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::layout::{
    compute_scroll_limits, compute_visible_rows, partition_columns, resolve_auto_widths,
    ColumnPartition, Metrics, ScrollLimits, ScrollState, Viewport, VisibleRowRange,
};
use crate::pipeline::{derive_display_rows, distinct_values, SortState};
use crate::render::{
    draw_body_part, BodySource, Compositor, EstimatedTextMeasurer, LayerKind, NodeId, Region,
    RegionPools, RenderBackend, Scene, ScrollbarGeometry, SummaryCell, TextMeasurer, ThumbHover,
    PAINT_ORDER,
};
use crate::summary::{AggregationExecutor, InlineExecutor, SummaryTracker};
use crate::types::{
    ColumnDefinition, FilterSpec, GridConfig, GridSpec, Row, SortOrder, SortSpec, SpanResolver,
};

use groups::RegionGroups;

/// Selected body cell and the overlay drawn around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Highlight {
    pub id: NodeId,
    pub region: Region,
    pub row: usize,
    pub col: usize,
}

/// Virtualized grid state and operations.
pub struct GridEngine {
    config: GridConfig,
    metrics: Metrics,
    /// Columns as declared (width may be missing)
    declared: Vec<ColumnDefinition>,
    /// Columns with auto widths resolved against the viewport
    columns: Vec<ColumnDefinition>,
    partition: ColumnPartition,

    source: Vec<Row>,
    display: Vec<usize>,
    sort: SortState,
    filter: FilterSpec,
    spans: Option<SpanResolver>,

    viewport: Option<Viewport>,
    scroll: ScrollState,
    visible: VisibleRowRange,
    drag: DragState,
    pressed: Option<HitTarget>,
    hover: ThumbHover,
    scrollbars: ScrollbarGeometry,

    scene: Scene,
    compositor: Compositor,
    groups: Option<RegionGroups>,
    pools: RegionPools,
    highlight: Option<Highlight>,
    resize_indicator: Option<NodeId>,
    summary_cells: Vec<SummaryCell>,

    summaries: SummaryTracker,
    measurer: Box<dyn TextMeasurer>,
    executor: Box<dyn AggregationExecutor>,
}

impl Default for GridEngine {
    fn default() -> Self {
        Self::new(GridConfig::default())
    }
}

impl GridEngine {
    /// Create a detached engine with estimated text metrics and an inline
    /// aggregation executor.
    pub fn new(config: GridConfig) -> Self {
        Self {
            metrics: Metrics::from_config(&config),
            sort: SortState::new(config.sort_mode),
            config,
            declared: Vec::new(),
            columns: Vec::new(),
            partition: ColumnPartition::default(),
            source: Vec::new(),
            display: Vec::new(),
            filter: FilterSpec::new(),
            spans: None,
            viewport: None,
            scroll: ScrollState::default(),
            visible: VisibleRowRange::empty(0),
            drag: DragState::Idle,
            pressed: None,
            hover: ThumbHover::default(),
            scrollbars: ScrollbarGeometry::default(),
            scene: Scene::new(),
            compositor: Compositor::new(),
            groups: None,
            pools: RegionPools::default(),
            highlight: None,
            resize_indicator: None,
            summary_cells: Vec::new(),
            summaries: SummaryTracker::new(),
            measurer: Box::new(EstimatedTextMeasurer::new()),
            executor: Box::new(InlineExecutor::default()),
        }
    }

    /// Stand up an engine from a full grid description.
    pub fn from_spec(spec: GridSpec) -> Self {
        let columns = spec.columns();
        let mut engine = Self::new(spec.config);
        engine.declared = columns;
        engine.source = spec.data;
        engine.derive_rows();
        engine.relayout();
        engine
    }

    pub fn set_measurer(&mut self, measurer: Box<dyn TextMeasurer>) {
        self.measurer = measurer;
        self.rebuild();
    }

    pub fn set_executor(&mut self, executor: Box<dyn AggregationExecutor>) {
        self.summaries.cancel_all();
        self.executor = executor;
    }

    // ---- accessors ----

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Columns with widths resolved, in declaration order.
    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    pub fn partition(&self) -> &ColumnPartition {
        &self.partition
    }

    pub fn source_rows(&self) -> &[Row] {
        &self.source
    }

    /// Source indices in display order.
    pub fn display_order(&self) -> &[usize] {
        &self.display
    }

    pub fn row_count(&self) -> usize {
        self.display.len()
    }

    /// The row shown at display position `index`.
    pub fn display_row(&self, index: usize) -> Option<&Row> {
        self.display.get(index).and_then(|i| self.source.get(*i))
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn limits(&self) -> ScrollLimits {
        self.scroll.limits()
    }

    pub fn visible_rows(&self) -> VisibleRowRange {
        self.visible
    }

    pub fn sort_columns(&self) -> &[crate::types::SortColumn] {
        self.sort.columns()
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scrollbar_geometry(&self) -> &ScrollbarGeometry {
        &self.scrollbars
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    /// Root group of a layer, once attached.
    pub fn layer_root(&self, layer: LayerKind) -> Option<NodeId> {
        self.compositor.root(layer)
    }

    /// Body group that holds the cells of `region`.
    pub fn body_group(&self, region: Region) -> Option<NodeId> {
        self.groups.map(|g| g.body(region))
    }

    /// Header group that holds the header cells of `region`.
    pub fn header_group(&self, region: Region) -> Option<NodeId> {
        self.groups.map(|g| g.header(region))
    }

    pub fn pools(&self) -> &RegionPools {
        &self.pools
    }

    /// Selected body cell as `(display row, column index)`.
    pub fn selected_cell(&self) -> Option<(usize, usize)> {
        self.highlight.map(|h| (h.row, h.col))
    }

    pub fn needs_flush(&self) -> bool {
        self.compositor.has_pending()
    }

    // ---- lifecycle ----

    /// Attach to a drawing surface of the given logical size and build every
    /// region.
    pub fn attach(&mut self, width: f64, height: f64) {
        self.viewport = Some(Viewport::new(width, height));
        debug!(width, height, "grid attached");
        self.refresh(true);
    }

    /// The surface changed size. Scroll offsets are kept, clamped to the new
    /// limits.
    pub fn resize(&mut self, width: f64, height: f64) {
        let next = Viewport::new(width, height);
        if self.viewport == Some(next) {
            return;
        }
        self.viewport = Some(next);
        self.refresh(false);
    }

    /// Drop the surface. Geometry queries degrade to zero until the next attach.
    pub fn detach(&mut self) {
        self.clear_groups();
        self.viewport = None;
        self.relayout();
        debug!("grid detached");
    }

    /// Mark every layer dirty (the drawing surface lost its contents).
    pub fn invalidate(&mut self) {
        if self.groups.is_some() {
            self.compositor.request_all();
        }
    }

    /// Paint every dirty layer and return the layers painted.
    ///
    /// # Errors
    /// Returns the backend error of the first layer that failed to paint.
    pub fn flush(&mut self, backend: &mut dyn RenderBackend) -> Result<Vec<LayerKind>> {
        self.compositor.flush(&self.scene, backend)
    }

    // ---- data ----

    /// Swap the dataset. Scroll resets to the top-left.
    pub fn set_data(&mut self, rows: Vec<Row>) {
        self.source = rows;
        self.derive_rows();
        self.refresh(true);
    }

    /// Replace the column definitions. Scroll resets to the top-left.
    pub fn set_columns(&mut self, columns: Vec<ColumnDefinition>) {
        self.declared = columns;
        self.refresh(true);
    }

    /// Replace configuration (palette, heights, buffer, summary, sort mode).
    pub fn set_config(&mut self, config: GridConfig) {
        self.metrics = Metrics::from_config(&config);
        self.sort.set_mode(config.sort_mode);
        self.config = config;
        self.derive_rows();
        self.refresh(true);
    }

    /// Install or remove the merged-cell resolver.
    pub fn set_span_resolver(&mut self, resolver: Option<SpanResolver>) {
        self.spans = resolver;
        self.refresh(false);
    }

    /// Commit a new width for column `index` and lay out again.
    pub fn set_column_width(&mut self, index: usize, width: f64) {
        let Some(column) = self.declared.get_mut(index) else {
            return;
        };
        column.width = Some(width.max(0.0));
        self.refresh(false);
    }

    /// Apply a click on the `order` arrow of `column`'s header.
    pub fn click_sort(&mut self, column: &str, order: SortOrder) {
        self.sort.click(column, order);
        debug!(column, ?order, keys = self.sort.columns().len(), "sort changed");
        self.derive_rows();
        self.refresh(false);
    }

    /// Replace the sort keys wholesale.
    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort.set_columns(sort);
        self.derive_rows();
        self.refresh(false);
    }

    /// Restrict `column` to `values`; an empty set removes the filter.
    pub fn set_filter<I, S>(&mut self, column: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter.set(column, values);
        debug!(column, active = self.filter.is_active(column), "filter changed");
        self.derive_rows();
        self.refresh(false);
    }

    pub fn clear_filter(&mut self, column: &str) {
        self.filter.clear(column);
        self.derive_rows();
        self.refresh(false);
    }

    /// Options for a filter dropdown on `column`: distinct values of the displayed
    /// rows plus any currently selected values.
    pub fn distinct_values(&self, column: &str) -> Vec<String> {
        distinct_values(
            &self.source,
            &self.display,
            column,
            self.filter.allowed(column),
        )
    }

    fn derive_rows(&mut self) {
        self.display = derive_display_rows(&self.source, &self.filter, self.sort.columns());
    }

    // ---- layout and rebuild ----

    /// Recompute resolved widths, the partition and scroll limits.
    fn relayout(&mut self) {
        self.columns = match self.viewport {
            Some(viewport) => {
                #[allow(clippy::cast_precision_loss)]
                let content = self.display.len() as f64 * self.metrics.row_height;
                let body = viewport.height - self.metrics.header_height - self.metrics.summary_height;
                let v_reserve = if content > body {
                    self.metrics.scrollbar_size
                } else {
                    0.0
                };
                resolve_auto_widths(
                    &self.declared,
                    viewport.width,
                    v_reserve,
                    self.config.min_auto_col_width,
                )
            }
            None => self.declared.clone(),
        };
        self.partition = partition_columns(&self.columns);
        let limits = compute_scroll_limits(
            self.viewport.as_ref(),
            &self.partition,
            self.display.len(),
            &self.metrics,
        );
        self.scroll.set_limits(limits);
        self.visible = self.compute_visible();
    }

    pub(crate) fn body_height(&self) -> f64 {
        self.viewport
            .map(|v| {
                self.metrics
                    .body_height(&v, self.scroll.limits().horizontal_bar())
            })
            .unwrap_or(0.0)
    }

    fn compute_visible(&self) -> VisibleRowRange {
        if self.viewport.is_none() {
            return VisibleRowRange::empty(0);
        }
        compute_visible_rows(
            self.scroll.scroll_y(),
            self.body_height(),
            self.metrics.row_height,
            self.config.buffer_rows,
            self.display.len(),
        )
    }

    /// Re-layout and rebuild every region, either resetting scroll to the origin
    /// or clamping it into the new limits.
    pub fn refresh(&mut self, reset_scroll: bool) {
        if reset_scroll {
            self.scroll.reset();
        }
        self.clear_groups();
        self.relayout();
        self.rebuild();
    }

    /// Tear down every group, pooled primitive, highlight and summary text node.
    pub fn clear_groups(&mut self) {
        self.scene = Scene::new();
        self.pools = RegionPools::default();
        self.compositor.reset();
        self.groups = None;
        self.highlight = None;
        self.resize_indicator = None;
        self.summary_cells.clear();
        self.summaries.cancel_all();
        self.visible = VisibleRowRange::empty(0);
    }

    /// Build all layers from the current layout. No-op while detached.
    pub fn rebuild(&mut self) {
        let Some(viewport) = self.viewport else {
            return;
        };
        if self.groups.is_some() {
            self.clear_groups();
        }
        self.visible = self.compute_visible();

        let groups = RegionGroups::build(
            &mut self.scene,
            &viewport,
            &self.metrics,
            &self.partition,
            self.scroll.limits(),
        );
        for layer in PAINT_ORDER {
            self.compositor.set_root(layer, groups.root(layer));
        }
        self.groups = Some(groups);

        self.draw_headers();
        self.draw_body();
        self.draw_summary_bands();
        self.position_groups();
        self.draw_scrollbar_layer();
        self.compositor.request_all();

        debug!(
            rows = self.display.len(),
            start = self.visible.start,
            end = self.visible.end,
            nodes = self.scene.len(),
            "grid rebuilt"
        );
    }

    fn draw_headers(&mut self) {
        let Some(groups) = self.groups else {
            return;
        };
        let source = crate::render::HeaderSource {
            style: &self.config.style,
            sort: &self.sort,
            filter: &self.filter,
        };
        for region in Region::ALL {
            crate::render::draw_header_part(
                &mut self.scene,
                groups.header(region),
                band(&self.partition, region),
                &source,
                self.measurer.as_mut(),
            );
        }
    }

    /// Repaint the three body bands for the current row window.
    pub(crate) fn draw_body(&mut self) {
        let Some(groups) = self.groups else {
            return;
        };
        let source = BodySource {
            style: &self.config.style,
            rows: &self.source,
            display: &self.display,
            spans: self.spans.as_ref(),
        };
        let highlight = self.highlight.map(|h| h.id);
        for region in Region::ALL {
            draw_body_part(
                &mut self.scene,
                groups.body(region),
                self.pools.get_mut(region),
                band(&self.partition, region),
                self.visible,
                &source,
                self.measurer.as_mut(),
                highlight,
            );
        }
    }

    /// A summary of what the current frame contains.
    pub fn frame_report(&self) -> FrameReport {
        let limits = self.scroll.limits();
        let layers = PAINT_ORDER
            .iter()
            .map(|layer| LayerReport {
                layer: layer.name(),
                primitives: self
                    .compositor
                    .root(*layer)
                    .map(|root| {
                        self.scene
                            .walk(root)
                            .into_iter()
                            .filter(|id| {
                                self.scene.role(*id) != Some(crate::render::NodeRole::Group)
                            })
                            .count()
                    })
                    .unwrap_or(0),
            })
            .collect();
        FrameReport {
            viewport: self.viewport.map(|v| (v.width, v.height)),
            left_width: self.partition.left_width,
            center_width: self.partition.center_width,
            right_width: self.partition.right_width,
            total_width: self.partition.total_width,
            scroll_x: self.scroll.scroll_x(),
            scroll_y: self.scroll.scroll_y(),
            max_scroll_x: limits.max_scroll_x,
            max_scroll_y: limits.max_scroll_y,
            row_count: self.display.len(),
            visible_rows: (!self.visible.is_empty()).then_some((self.visible.start, self.visible.end)),
            visible_row_count: self.visible.visible_count,
            layers,
        }
    }
}

/// Columns of one band.
pub(crate) fn band(partition: &ColumnPartition, region: Region) -> &[crate::layout::PartitionedColumn] {
    match region {
        Region::Left => &partition.left_columns,
        Region::Center => &partition.center_columns,
        Region::Right => &partition.right_columns,
    }
}

/// Primitive count of one layer.
#[derive(Debug, Clone, Serialize)]
pub struct LayerReport {
    pub layer: &'static str,
    pub primitives: usize,
}

/// Snapshot of layout, scroll and scene sizes for diagnostics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameReport {
    pub viewport: Option<(f64, f64)>,
    pub left_width: f64,
    pub center_width: f64,
    pub right_width: f64,
    pub total_width: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub max_scroll_x: f64,
    pub max_scroll_y: f64,
    pub row_count: usize,
    /// Inclusive `(start, end)` of materialized rows
    pub visible_rows: Option<(usize, usize)>,
    pub visible_row_count: usize,
    pub layers: Vec<LayerReport>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::render::NullBackend;
    use crate::types::Fixed;

    fn engine(rows: usize) -> GridEngine {
        let mut engine = GridEngine::new(GridConfig {
            buffer_rows: 2,
            ..GridConfig::default()
        });
        engine.set_columns(vec![
            ColumnDefinition::new("id", 100.0).fixed(Fixed::Left),
            ColumnDefinition::new("name", 200.0),
            ColumnDefinition::new("qty", 100.0).fixed(Fixed::Right),
        ]);
        engine.set_data(
            (0..rows)
                .map(|i| Row::new().with("id", i.to_string()).with("name", format!("n{i}")))
                .collect(),
        );
        engine
    }

    #[test]
    fn detached_engine_reports_zero_limits() {
        let engine = engine(1000);
        assert_eq!(engine.limits(), ScrollLimits::default());
        assert!(engine.visible_rows().is_empty());
        assert!(engine.layer_root(LayerKind::Body).is_none());
    }

    #[test]
    fn attach_builds_every_layer() {
        let mut engine = engine(1000);
        engine.attach(500.0, 332.0);
        for layer in PAINT_ORDER {
            assert!(engine.layer_root(layer).is_some());
        }
        let mut backend = NullBackend::default();
        let painted = engine.flush(&mut backend).unwrap();
        assert_eq!(painted, PAINT_ORDER.to_vec());
        assert!(!engine.needs_flush());
    }

    #[test]
    fn fitting_columns_do_not_scroll_horizontally() {
        let mut engine = engine(5);
        engine.attach(400.0, 300.0);
        let report = engine.frame_report();
        assert_eq!(report.left_width, 100.0);
        assert_eq!(report.center_width, 200.0);
        assert_eq!(report.right_width, 100.0);
        assert_eq!(report.max_scroll_x, 0.0);
    }

    #[test]
    fn detach_degrades_to_zero() {
        let mut engine = engine(1000);
        engine.attach(500.0, 332.0);
        engine.detach();
        assert_eq!(engine.limits(), ScrollLimits::default());
        assert!(engine.scene().is_empty());
    }
}
