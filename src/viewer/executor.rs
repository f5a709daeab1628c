//! Aggregation executor for the browser event loop.
//!
//! Each job is parked behind a zero-delay timeout so the "Calculating..."
//! placeholder gets painted first, then runs and queues its response. The
//! `notify` hook lets the view schedule a repaint.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Promise;
use wasm_bindgen_futures::{spawn_local, JsFuture};

use crate::error::{GridError, Result};
use crate::summary::{AggregationExecutor, AggregationJob, AggregationResponse};

pub(crate) struct PromiseExecutor {
    completed: Rc<RefCell<Vec<AggregationResponse>>>,
    notify: Rc<dyn Fn()>,
}

impl PromiseExecutor {
    pub(crate) fn new(notify: Rc<dyn Fn()>) -> Self {
        Self {
            completed: Rc::new(RefCell::new(Vec::new())),
            notify,
        }
    }
}

/// A promise resolved on the next macrotask.
fn next_task() -> Result<Promise> {
    let window =
        web_sys::window().ok_or_else(|| GridError::Aggregation("no window".to_string()))?;
    let mut failed = None;
    let promise = Promise::new(&mut |resolve, _reject| {
        if let Err(e) = window.set_timeout_with_callback(&resolve) {
            failed = Some(e);
        }
    });
    match failed {
        Some(e) => Err(GridError::Aggregation(format!("setTimeout: {e:?}"))),
        None => Ok(promise),
    }
}

impl AggregationExecutor for PromiseExecutor {
    fn dispatch(&mut self, job: AggregationJob) -> Result<()> {
        let wait = next_task()?;
        let completed = Rc::clone(&self.completed);
        let notify = Rc::clone(&self.notify);
        spawn_local(async move {
            let response = match JsFuture::from(wait).await {
                Ok(_) => job.run(),
                Err(_) => AggregationResponse {
                    column: job.column.clone(),
                    token: job.token,
                    success: false,
                    data: None,
                },
            };
            completed.borrow_mut().push(response);
            notify();
        });
        Ok(())
    }

    fn take_completed(&mut self) -> Vec<AggregationResponse> {
        std::mem::take(&mut *self.completed.borrow_mut())
    }
}
