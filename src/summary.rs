//! Summary-row aggregation.
//!
//! Each column with a [`SummaryRule`] turns into an [`AggregationJob`]: a closed
//! [`Reduction`] plus its numeric input. Jobs go to an [`AggregationExecutor`]
//! which may finish them on another thread or in a later event turn. Every
//! request carries a per-column token so that a result for a superseded request
//! is dropped instead of overwriting newer text. When dispatch fails or the
//! executor reports failure, the same reduction runs inline.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Result;
use crate::types::{format_number, CellValue, SummaryRule};

/// Placeholder drawn while a reduction is in flight.
pub const PLACEHOLDER: &str = "Calculating...";

/// Reductions the executor knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reduction {
    Sum,
    Avg,
    Max,
    Min,
    /// Count of non-blank values (input is 1.0 per filled row, 0.0 otherwise)
    Filled,
    /// Count of blank values (same input encoding as `Filled`)
    Unfilled,
}

impl Reduction {
    pub fn from_rule(rule: SummaryRule) -> Option<Self> {
        match rule {
            SummaryRule::None => None,
            SummaryRule::Max => Some(Self::Max),
            SummaryRule::Min => Some(Self::Min),
            SummaryRule::Avg => Some(Self::Avg),
            SummaryRule::Sum => Some(Self::Sum),
            SummaryRule::Filled => Some(Self::Filled),
            SummaryRule::Unfilled => Some(Self::Unfilled),
        }
    }

    /// Whether the reduction runs over numbers rather than fill flags.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Sum | Self::Avg | Self::Max | Self::Min)
    }

    /// Run the reduction. Numeric reductions over no values yield `None`.
    #[allow(clippy::cast_precision_loss)]
    pub fn apply(self, values: &[f64]) -> Option<f64> {
        let result = match self {
            Self::Sum => {
                if values.is_empty() {
                    return None;
                }
                values.iter().sum()
            }
            Self::Avg => {
                if values.is_empty() {
                    return None;
                }
                let avg = values.iter().sum::<f64>() / values.len() as f64;
                (avg * 10_000.0).round() / 10_000.0
            }
            Self::Max => values.iter().copied().reduce(f64::max)?,
            Self::Min => values.iter().copied().reduce(f64::min)?,
            Self::Filled => values.iter().filter(|v| **v > 0.0).count() as f64,
            Self::Unfilled => values.iter().filter(|v| **v <= 0.0).count() as f64,
        };
        result.is_finite().then_some(result)
    }
}

/// One unit of work for an executor.
#[derive(Debug, Clone)]
pub struct AggregationJob {
    pub column: String,
    pub token: u64,
    pub reduction: Reduction,
    pub values: Arc<[f64]>,
}

impl AggregationJob {
    /// Execute the job on the current thread.
    pub fn run(&self) -> AggregationResponse {
        let data = self.reduction.apply(&self.values);
        AggregationResponse {
            column: self.column.clone(),
            token: self.token,
            success: true,
            data,
        }
    }
}

/// Executor reply, mirroring `{ success, data? }`.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationResponse {
    pub column: String,
    pub token: u64,
    pub success: bool,
    pub data: Option<f64>,
}

/// An asynchronous reduction service.
pub trait AggregationExecutor {
    /// Queue a job. An error means the job will never complete.
    fn dispatch(&mut self, job: AggregationJob) -> Result<()>;

    /// Responses that arrived since the last call.
    fn take_completed(&mut self) -> Vec<AggregationResponse>;
}

/// Runs jobs at dispatch time; results surface on the next poll.
#[derive(Debug, Default)]
pub struct InlineExecutor {
    completed: Vec<AggregationResponse>,
}

impl AggregationExecutor for InlineExecutor {
    fn dispatch(&mut self, job: AggregationJob) -> Result<()> {
        self.completed.push(job.run());
        Ok(())
    }

    fn take_completed(&mut self) -> Vec<AggregationResponse> {
        std::mem::take(&mut self.completed)
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use worker::WorkerExecutor;

#[cfg(not(target_arch = "wasm32"))]
mod worker {
    use std::sync::mpsc::{self, Receiver, Sender};
    use std::thread::{self, JoinHandle};

    use super::{AggregationExecutor, AggregationJob, AggregationResponse};
    use crate::error::{GridError, Result};

    /// Runs jobs on a dedicated background thread.
    pub struct WorkerExecutor {
        jobs: Option<Sender<AggregationJob>>,
        results: Receiver<AggregationResponse>,
        handle: Option<JoinHandle<()>>,
    }

    impl WorkerExecutor {
        /// Spawn the worker thread.
        ///
        /// # Errors
        /// Returns an error if the thread cannot be spawned.
        pub fn spawn() -> Result<Self> {
            let (job_tx, job_rx) = mpsc::channel::<AggregationJob>();
            let (result_tx, result_rx) = mpsc::channel();
            let handle = thread::Builder::new()
                .name("vgrid-aggregation".to_string())
                .spawn(move || {
                    for job in job_rx {
                        if result_tx.send(job.run()).is_err() {
                            break;
                        }
                    }
                })?;
            Ok(Self {
                jobs: Some(job_tx),
                results: result_rx,
                handle: Some(handle),
            })
        }

        /// Block until `count` responses have arrived and return them.
        pub fn wait_for(&mut self, count: usize) -> Vec<AggregationResponse> {
            self.results.iter().take(count).collect()
        }
    }

    impl AggregationExecutor for WorkerExecutor {
        fn dispatch(&mut self, job: AggregationJob) -> Result<()> {
            let sender = self
                .jobs
                .as_ref()
                .ok_or_else(|| GridError::Aggregation("worker stopped".to_string()))?;
            sender
                .send(job)
                .map_err(|e| GridError::Aggregation(format!("worker unavailable: {e}")))
        }

        fn take_completed(&mut self) -> Vec<AggregationResponse> {
            self.results.try_iter().collect()
        }
    }

    impl Drop for WorkerExecutor {
        fn drop(&mut self) {
            // Closing the channel ends the worker loop.
            self.jobs.take();
            if let Some(handle) = self.handle.take() {
                let _ = handle.join();
            }
        }
    }
}

/// Build the reduction input for a column from its values in display order.
///
/// A column is numeric when any value is a number; text never makes it numeric.
/// Numeric reductions parse numeric text and skip blanks. Returns `None`
/// for [`SummaryRule::None`] and when the rule does not fit the column
/// (e.g. `Sum` over a text column).
pub fn collect_values<'a, I>(values: I, rule: SummaryRule) -> Option<(Reduction, Arc<[f64]>)>
where
    I: IntoIterator<Item = Option<&'a CellValue>>,
{
    let reduction = Reduction::from_rule(rule)?;
    let values: Vec<Option<&CellValue>> = values.into_iter().collect();
    let numeric = values.iter().flatten().any(|v| v.is_number());
    if !rule.applies_to(numeric) {
        return None;
    }
    let input: Vec<f64> = if reduction.is_numeric() {
        values
            .iter()
            .filter_map(|v| v.and_then(CellValue::as_number))
            .collect()
    } else {
        values
            .iter()
            .map(|v| if v.is_some_and(|v| !v.is_blank()) { 1.0 } else { 0.0 })
            .collect()
    };
    Some((reduction, input.into()))
}

/// Display text for a finished reduction: `"<Label>: <value>"`.
pub fn summary_text(rule: SummaryRule, value: Option<f64>) -> String {
    if rule == SummaryRule::None {
        return String::new();
    }
    let value = value.map(format_number).unwrap_or_default();
    format!("{}: {}", rule.label(), value)
}

struct Pending {
    token: u64,
    rule: SummaryRule,
    job: AggregationJob,
}

/// Outcome of requesting a summary for a column.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryRequest {
    /// Final text known right away
    Ready(String),
    /// Placeholder drawn; the final text arrives through [`SummaryTracker::resolve`]
    Pending(u64),
}

/// Per-column rules and in-flight request bookkeeping.
#[derive(Default)]
pub struct SummaryTracker {
    rules: HashMap<String, SummaryRule>,
    pending: HashMap<String, Pending>,
    next_token: u64,
}

impl SummaryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(&self, column: &str) -> SummaryRule {
        self.rules.get(column).copied().unwrap_or_default()
    }

    pub fn set_rule(&mut self, column: impl Into<String>, rule: SummaryRule) {
        let column = column.into();
        if rule == SummaryRule::None {
            self.rules.remove(&column);
            self.pending.remove(&column);
        } else {
            self.rules.insert(column, rule);
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drop all in-flight requests; late results will be discarded.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Start computing the summary of `column` over `values`.
    ///
    /// Supersedes any earlier request for the same column.
    pub fn request<'a, I>(
        &mut self,
        column: &str,
        values: I,
        executor: &mut dyn AggregationExecutor,
    ) -> SummaryRequest
    where
        I: IntoIterator<Item = Option<&'a CellValue>>,
    {
        let rule = self.rule(column);
        self.pending.remove(column);
        let Some((reduction, input)) = collect_values(values, rule) else {
            return SummaryRequest::Ready(String::new());
        };

        self.next_token += 1;
        let token = self.next_token;
        let job = AggregationJob {
            column: column.to_string(),
            token,
            reduction,
            values: input,
        };
        debug!(column, token, ?reduction, "dispatching summary aggregation");
        match executor.dispatch(job.clone()) {
            Ok(()) => {
                self.pending
                    .insert(column.to_string(), Pending { token, rule, job });
                SummaryRequest::Pending(token)
            }
            Err(e) => {
                warn!(column, error = %e, "aggregation dispatch failed, computing inline");
                SummaryRequest::Ready(summary_text(rule, job.reduction.apply(&job.values)))
            }
        }
    }

    /// Accept an executor response. Returns the column and its final text, or
    /// `None` when the response belongs to a superseded request.
    pub fn resolve(&mut self, response: AggregationResponse) -> Option<(String, String)> {
        let current = self
            .pending
            .get(&response.column)
            .is_some_and(|p| p.token == response.token);
        if !current {
            debug!(
                column = %response.column,
                token = response.token,
                "discarding stale aggregation result"
            );
            return None;
        }
        let pending = self.pending.remove(&response.column)?;
        let value = if response.success {
            response.data
        } else {
            warn!(column = %response.column, "aggregation failed, computing inline");
            pending.job.reduction.apply(&pending.job.values)
        };
        Some((response.column, summary_text(pending.rule, value)))
    }
}
