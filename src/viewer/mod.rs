//! `GridView`, the WASM-exported entry point.
//!
//! This module wires a [`GridEngine`] to the browser:
//! - Stacked layer canvases inside a host container
//! - Mouse and wheel listeners translated into engine pointer calls
//! - Summary aggregations run as deferred tasks on the event loop
//! - A host span callback adapted into a [`crate::types::SpanResolver`]
//!
//! Listeners are registered when the view is created and removed on `detach`.

mod events;
mod executor;
mod spans;

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Function;
use serde::Deserialize;
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{EventTarget, HtmlElement, MouseEvent, WheelEvent};

use crate::engine::GridEngine;
use crate::error::GridError;
use crate::render::{CanvasSurface, CanvasTextMeasurer, RenderBackend};
use crate::types::{
    ColumnDefinition, GridConfig, GridSpec, Row, SortColumn, SortOrder, SummaryRule,
};

use executor::PromiseExecutor;

/// Shared state that event handlers and deferred tasks reach through
/// `Rc<RefCell<_>>`.
pub(crate) struct SharedState {
    pub(crate) engine: GridEngine,
    pub(crate) surface: CanvasSurface,
    pub(crate) container: HtmlElement,
    pub(crate) render_callback: Option<Function>,
    pub(crate) interaction_callback: Option<Function>,
    pub(crate) cursor: &'static str,
}

type MouseListener = (EventTarget, &'static str, Closure<dyn FnMut(MouseEvent)>);

/// The grid view exported to JavaScript.
#[wasm_bindgen]
pub struct GridView {
    state: Rc<RefCell<SharedState>>,
    listeners: Vec<MouseListener>,
    wheel_closure: Option<Closure<dyn FnMut(WheelEvent)>>,
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn device_pixel_ratio() -> f64 {
    web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .filter(|dpr| *dpr > 0.0)
        .unwrap_or(1.0)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ColumnGroups {
    #[serde(default)]
    group_columns: Vec<ColumnDefinition>,
    #[serde(default)]
    value_columns: Vec<ColumnDefinition>,
}

#[wasm_bindgen]
impl GridView {
    /// Mount a grid into `container`. `spec` is a JSON string with `config`,
    /// `groupColumns`, `valueColumns` and `data`.
    #[wasm_bindgen(constructor)]
    pub fn new(container: HtmlElement, spec: &str) -> Result<GridView, JsValue> {
        console_error_panic_hook::set_once();

        let spec = GridSpec::from_json(spec)?;
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| to_js("No document available"))?;

        let mut surface = CanvasSurface::new(&document, container.clone())?;
        let rect = container.get_bounding_client_rect();
        let (width, height) = (rect.width(), rect.height());
        surface.resize(width, height, device_pixel_ratio());

        let mut engine = GridEngine::from_spec(spec);
        engine.set_measurer(Box::new(CanvasTextMeasurer::new(&document)?));

        let state = Rc::new(RefCell::new(SharedState {
            engine,
            surface,
            container: container.clone(),
            render_callback: None,
            interaction_callback: None,
            cursor: "default",
        }));

        let weak = Rc::downgrade(&state);
        let executor = PromiseExecutor::new(Rc::new(move || {
            if let Some(state) = weak.upgrade() {
                Self::request_render(&state);
            }
        }));
        {
            let mut s = state.borrow_mut();
            s.engine.set_executor(Box::new(executor));
            s.engine.attach(width, height);
        }

        let listeners = Self::install_mouse_listeners(&state, &container);
        let wheel_closure = Self::install_wheel_listener(&state, &container);

        Self::request_render(&state);
        Ok(GridView {
            state,
            listeners,
            wheel_closure,
        })
    }

    /// The container changed size. Call from a `ResizeObserver`.
    pub fn resize(&mut self, width: f64, height: f64) {
        {
            let mut s = self.state.borrow_mut();
            s.surface.resize(width, height, device_pixel_ratio());
            s.engine.resize(width, height);
            // A resized canvas is blank, so every layer repaints
            s.engine.invalidate();
        }
        Self::request_render(&self.state);
    }

    /// Replace the dataset with an array of row objects. Scroll resets.
    pub fn set_data(&mut self, rows: JsValue) -> Result<(), JsValue> {
        let rows: Vec<Row> = serde_wasm_bindgen::from_value(rows).map_err(to_js)?;
        self.state.borrow_mut().engine.set_data(rows);
        Self::request_render(&self.state);
        Ok(())
    }

    /// Replace the columns with `{ groupColumns, valueColumns }`. Scroll resets.
    pub fn set_columns(&mut self, columns: JsValue) -> Result<(), JsValue> {
        let groups: ColumnGroups = serde_wasm_bindgen::from_value(columns).map_err(to_js)?;
        let columns = groups
            .group_columns
            .into_iter()
            .chain(groups.value_columns)
            .collect();
        self.state.borrow_mut().engine.set_columns(columns);
        Self::request_render(&self.state);
        Ok(())
    }

    /// Replace the configuration object. Scroll resets.
    pub fn set_config(&mut self, config: JsValue) -> Result<(), JsValue> {
        let config: GridConfig = serde_wasm_bindgen::from_value(config).map_err(to_js)?;
        self.state.borrow_mut().engine.set_config(config);
        Self::request_render(&self.state);
        Ok(())
    }

    /// Install the merged-cell callback. It receives
    /// `{ row, column, rowIndex, colIndex }` and returns `[rowSpan, colSpan]`,
    /// `{ rowspan, colspan }` or nothing.
    pub fn set_span_method(&mut self, method: Option<Function>) {
        let resolver = method.map(spans::js_span_resolver);
        self.state.borrow_mut().engine.set_span_resolver(resolver);
        Self::request_render(&self.state);
    }

    /// Restrict `column` to the given values; an empty list clears the filter.
    pub fn set_filter(&mut self, column: &str, values: Vec<String>) {
        self.state.borrow_mut().engine.set_filter(column, values);
        Self::request_render(&self.state);
    }

    pub fn clear_filter(&mut self, column: &str) {
        self.state.borrow_mut().engine.clear_filter(column);
        Self::request_render(&self.state);
    }

    /// Distinct values for a filter dropdown on `column`.
    pub fn distinct_values(&self, column: &str) -> Vec<String> {
        self.state.borrow().engine.distinct_values(column)
    }

    /// Apply a sort arrow click: `order` is `"asc"` or `"desc"`.
    pub fn sort(&mut self, column: &str, order: &str) -> Result<(), JsValue> {
        let order = parse_order(order)?;
        self.state.borrow_mut().engine.click_sort(column, order);
        Self::request_render(&self.state);
        Ok(())
    }

    /// Replace all sort keys with an array of `{ columnName, order }`.
    pub fn set_sort(&mut self, sort: JsValue) -> Result<(), JsValue> {
        let sort: Vec<SortColumn> = serde_wasm_bindgen::from_value(sort).map_err(to_js)?;
        self.state.borrow_mut().engine.set_sort(sort);
        Self::request_render(&self.state);
        Ok(())
    }

    /// Select the summary rule of `column` (`"sum"`, `"avg"`, `"filled"`, ...).
    pub fn set_summary_rule(&mut self, column: &str, rule: &str) -> Result<(), JsValue> {
        let rule: SummaryRule =
            serde_json::from_value(serde_json::Value::String(rule.to_string()))
                .map_err(|e| to_js(GridError::Config(format!("summary rule {rule:?}: {e}"))))?;
        self.state.borrow_mut().engine.set_summary_rule(column, rule);
        Self::request_render(&self.state);
        Ok(())
    }

    /// Rules offered for `column`, as lowercase names.
    pub fn summary_rules(&self, column: &str) -> Result<JsValue, JsValue> {
        let s = self.state.borrow();
        let rules = s.engine.summary_rules_for(column);
        serde_wasm_bindgen::to_value(rules).map_err(to_js)
    }

    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.state.borrow_mut().engine.scroll_to(x, y);
        Self::request_render(&self.state);
    }

    pub fn scroll_x(&self) -> f64 {
        self.state.borrow().engine.scroll().scroll_x()
    }

    pub fn scroll_y(&self) -> f64 {
        self.state.borrow().engine.scroll().scroll_y()
    }

    /// Re-layout and rebuild every region.
    pub fn refresh(&mut self, reset_scroll: bool) {
        self.state.borrow_mut().engine.refresh(reset_scroll);
        Self::request_render(&self.state);
    }

    /// Paint every dirty layer now. Hosts that registered a render callback
    /// call this from `requestAnimationFrame`.
    pub fn render(&mut self) -> Result<(), JsValue> {
        let mut s = self.state.borrow_mut();
        Self::paint(&mut s).map_err(JsValue::from)
    }

    /// Register a callback that schedules [`GridView::render`]. Without one,
    /// every change paints synchronously.
    pub fn set_render_callback(&mut self, callback: Option<Function>) {
        self.state.borrow_mut().render_callback = callback;
    }

    /// Register a callback for clicks on filter icons and summary cells. It
    /// receives `{ kind, column, x, y }`.
    pub fn set_interaction_callback(&mut self, callback: Option<Function>) {
        self.state.borrow_mut().interaction_callback = callback;
    }

    /// Layout, scroll and per-layer primitive counts.
    pub fn frame_report(&self) -> Result<JsValue, JsValue> {
        let report = self.state.borrow().engine.frame_report();
        serde_wasm_bindgen::to_value(&report).map_err(to_js)
    }

    /// Remove listeners and canvases. The view is unusable afterwards.
    pub fn detach(&mut self) {
        for (target, event, closure) in self.listeners.drain(..) {
            let _ = target
                .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
        let mut s = self.state.borrow_mut();
        if let Some(closure) = self.wheel_closure.take() {
            let _ = s
                .container
                .remove_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
        }
        s.render_callback = None;
        s.interaction_callback = None;
        s.engine.detach();
        s.surface.detach();
    }
}

fn parse_order(order: &str) -> Result<SortOrder, JsValue> {
    match order.to_ascii_lowercase().as_str() {
        "asc" => Ok(SortOrder::Asc),
        "desc" => Ok(SortOrder::Desc),
        other => {
            warn!(order = other, "unknown sort order");
            Err(to_js(GridError::Config(format!("unknown sort order {other:?}"))))
        }
    }
}

impl GridView {
    /// Poll finished aggregations and flush dirty layers to the canvases.
    pub(crate) fn paint(s: &mut SharedState) -> crate::error::Result<()> {
        s.engine.poll_aggregations();
        let SharedState {
            engine, surface, ..
        } = s;
        engine.flush(surface)?;
        Ok(())
    }

    /// Ask for a repaint: through the host's render callback when registered,
    /// otherwise immediately. Skipped while a handler holds the state.
    pub(crate) fn request_render(state: &Rc<RefCell<SharedState>>) {
        let callback = {
            let Ok(mut s) = state.try_borrow_mut() else {
                return;
            };
            if !s.engine.needs_flush() && !s.engine.has_pending_summaries() {
                return;
            }
            match s.render_callback.clone() {
                Some(callback) => Some(callback),
                None => {
                    if let Err(e) = Self::paint(&mut s) {
                        warn!(error = %e, "paint failed");
                    }
                    None
                }
            }
        };
        Self::invoke_render_callback(callback);
    }

    pub(crate) fn invoke_render_callback(callback: Option<Function>) {
        if let Some(callback) = callback {
            let _ = callback.call0(&JsValue::NULL);
        }
    }
}
