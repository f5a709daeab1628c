//! Mouse and wheel listeners for `GridView`.
//!
//! Press, hover and leave are observed on the container; move and release are
//! observed on the window so a thumb or resize drag keeps tracking once the
//! pointer leaves the grid.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Object, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, EventTarget, HtmlElement, MouseEvent, WheelEvent};

use super::{GridView, MouseListener, SharedState};
use crate::engine::HitTarget;

/// Pointer position relative to the container's top-left corner.
fn local_point(container: &HtmlElement, event: &MouseEvent) -> (f64, f64) {
    let rect = container.get_bounding_client_rect();
    (
        f64::from(event.client_x()) - rect.left(),
        f64::from(event.client_y()) - rect.top(),
    )
}

/// Payload for the interaction callback.
fn interaction_payload(target: &HitTarget, x: f64, y: f64) -> Option<JsValue> {
    let (kind, column) = match target {
        HitTarget::FilterIcon { column } => ("filter", column),
        HitTarget::SummaryCell { column } => ("summary", column),
        _ => return None,
    };
    let obj = Object::new();
    let _ = Reflect::set(&obj, &"kind".into(), &kind.into());
    let _ = Reflect::set(&obj, &"column".into(), &column.as_str().into());
    let _ = Reflect::set(&obj, &"x".into(), &x.into());
    let _ = Reflect::set(&obj, &"y".into(), &y.into());
    Some(obj.into())
}

impl GridView {
    pub(crate) fn install_mouse_listeners(
        state: &Rc<RefCell<SharedState>>,
        container: &HtmlElement,
    ) -> Vec<MouseListener> {
        let mut listeners: Vec<MouseListener> = Vec::new();
        let container_target: EventTarget = container.clone().into();
        let window_target: Option<EventTarget> = web_sys::window().map(Into::into);

        let mut add = |target: &EventTarget,
                       event: &'static str,
                       closure: Closure<dyn FnMut(MouseEvent)>| {
            target
                .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
                .ok();
            listeners.push((target.clone(), event, closure));
        };

        {
            let state = Rc::clone(state);
            let container = container.clone();
            let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
                if event.button() != 0 {
                    return;
                }
                let (x, y) = local_point(&container, &event);
                Self::internal_mouse_down(&state, x, y);
            }) as Box<dyn FnMut(MouseEvent)>);
            add(&container_target, "mousedown", closure);
        }

        {
            let state = Rc::clone(state);
            let container = container.clone();
            let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
                let (x, y) = local_point(&container, &event);
                Self::internal_mouse_move(&state, x, y);
            }) as Box<dyn FnMut(MouseEvent)>);
            add(
                window_target.as_ref().unwrap_or(&container_target),
                "mousemove",
                closure,
            );
        }

        {
            let state = Rc::clone(state);
            let container = container.clone();
            let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
                if event.button() != 0 {
                    return;
                }
                let (x, y) = local_point(&container, &event);
                Self::internal_mouse_up(&state, x, y);
            }) as Box<dyn FnMut(MouseEvent)>);
            add(
                window_target.as_ref().unwrap_or(&container_target),
                "mouseup",
                closure,
            );
        }

        {
            let state = Rc::clone(state);
            let closure = Closure::wrap(Box::new(move |_event: MouseEvent| {
                Self::internal_mouse_leave(&state);
            }) as Box<dyn FnMut(MouseEvent)>);
            add(&container_target, "mouseleave", closure);
        }

        listeners
    }

    /// Wheel listener registered as non-passive so a consumed wheel can cancel
    /// page scrolling.
    pub(crate) fn install_wheel_listener(
        state: &Rc<RefCell<SharedState>>,
        container: &HtmlElement,
    ) -> Option<Closure<dyn FnMut(WheelEvent)>> {
        let state = Rc::clone(state);
        let closure = Closure::wrap(Box::new(move |event: WheelEvent| {
            if Self::internal_wheel(&state, event.delta_x(), event.delta_y(), event.shift_key()) {
                event.prevent_default();
            }
        }) as Box<dyn FnMut(WheelEvent)>);

        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        container
            .add_event_listener_with_callback_and_add_event_listener_options(
                "wheel",
                closure.as_ref().unchecked_ref(),
                &options,
            )
            .ok()?;
        Some(closure)
    }

    pub(crate) fn internal_mouse_down(state: &Rc<RefCell<SharedState>>, x: f64, y: f64) {
        {
            let Ok(mut s) = state.try_borrow_mut() else {
                return;
            };
            s.engine.pointer_down(x, y);
            Self::sync_cursor(&mut s, x, y);
        }
        Self::request_render(state);
    }

    pub(crate) fn internal_mouse_move(state: &Rc<RefCell<SharedState>>, x: f64, y: f64) {
        let changed = {
            let Ok(mut s) = state.try_borrow_mut() else {
                return;
            };
            let changed = s.engine.pointer_move(x, y);
            Self::sync_cursor(&mut s, x, y);
            changed
        };
        if changed {
            Self::request_render(state);
        }
    }

    pub(crate) fn internal_mouse_up(state: &Rc<RefCell<SharedState>>, x: f64, y: f64) {
        let notify = {
            let Ok(mut s) = state.try_borrow_mut() else {
                return;
            };
            let activated = s.engine.pointer_up(x, y);
            Self::sync_cursor(&mut s, x, y);
            activated
                .and_then(|target| interaction_payload(&target, x, y))
                .zip(s.interaction_callback.clone())
        };
        Self::request_render(state);
        // Called after the borrow is released; the host may call back into the view
        if let Some((payload, callback)) = notify {
            let _ = callback.call1(&JsValue::NULL, &payload);
        }
    }

    pub(crate) fn internal_mouse_leave(state: &Rc<RefCell<SharedState>>) {
        let changed = {
            let Ok(mut s) = state.try_borrow_mut() else {
                return;
            };
            if s.engine.drag_state().is_active() {
                return;
            }
            let changed = s.engine.pointer_leave();
            Self::set_cursor(&mut s, "default");
            changed
        };
        if changed {
            Self::request_render(state);
        }
    }

    pub(crate) fn internal_wheel(
        state: &Rc<RefCell<SharedState>>,
        dx: f64,
        dy: f64,
        shift: bool,
    ) -> bool {
        let scrolled = {
            let Ok(mut s) = state.try_borrow_mut() else {
                return false;
            };
            s.engine.wheel(dx, dy, shift)
        };
        if scrolled {
            Self::request_render(state);
        }
        scrolled
    }

    fn sync_cursor(s: &mut SharedState, x: f64, y: f64) {
        let cursor = s.engine.cursor(x, y);
        Self::set_cursor(s, cursor);
    }

    fn set_cursor(s: &mut SharedState, cursor: &'static str) {
        if s.cursor != cursor {
            let _ = s.container.style().set_property("cursor", cursor);
            s.cursor = cursor;
        }
    }
}
