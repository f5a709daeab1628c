//! Summary row tests for vgrid
//!
//! Tests for deferred aggregation through real executors, the placeholder text,
//! stale result handling and the inline fallback.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use std::thread;
use std::time::{Duration, Instant};

use vgrid::error::{GridError, Result};
use vgrid::render::LayerKind;
use vgrid::summary::{
    AggregationExecutor, AggregationJob, AggregationResponse, InlineExecutor, SummaryRequest,
    SummaryTracker, WorkerExecutor, PLACEHOLDER,
};
use vgrid::{CellValue, GridConfig, GridEngine, Row, SummaryRule};

fn summary_engine(rows: usize) -> GridEngine {
    let mut engine = GridEngine::new(GridConfig {
        enable_summary: true,
        ..common::config()
    });
    engine.set_columns(common::standard_columns());
    engine.set_data(common::numbered_rows(rows));
    engine.attach(800.0, 400.0);
    engine
}

/// Poll until every aggregation has landed.
fn settle(engine: &mut GridEngine) {
    let started = Instant::now();
    while engine.has_pending_summaries() {
        assert!(started.elapsed() < Duration::from_secs(5), "aggregation timed out");
        if engine.poll_aggregations() == 0 {
            thread::sleep(Duration::from_millis(1));
        }
    }
}

#[test]
fn worker_results_replace_placeholder() {
    let mut engine = summary_engine(10);
    engine.set_executor(Box::new(WorkerExecutor::spawn().unwrap()));
    engine.set_summary_rule("name", SummaryRule::Filled);
    assert_eq!(engine.summary_text("name"), Some(PLACEHOLDER));

    settle(&mut engine);
    assert_eq!(engine.summary_text("name"), Some("Filled: 10"));
}

#[test]
fn numeric_rules_over_display_rows() {
    let mut engine = summary_engine(10);
    engine.set_executor(Box::new(WorkerExecutor::spawn().unwrap()));
    engine.set_summary_rule("value", SummaryRule::Sum);
    settle(&mut engine);
    assert_eq!(engine.summary_text("value"), Some("Sum: 45"));

    engine.set_summary_rule("value", SummaryRule::Avg);
    settle(&mut engine);
    assert_eq!(engine.summary_text("value"), Some("Avg: 4.5"));
}

#[test]
fn filter_change_supersedes_running_aggregation() {
    let mut engine = summary_engine(10);
    engine.set_executor(Box::new(WorkerExecutor::spawn().unwrap()));
    engine.set_summary_rule("value", SummaryRule::Sum);
    engine.set_filter("value", ["1", "2", "3"]);
    settle(&mut engine);
    assert_eq!(engine.summary_text("value"), Some("Sum: 6"));
}

#[test]
fn empty_column_counts_as_unfilled() {
    let mut engine = summary_engine(10);
    engine.set_summary_rule("city", SummaryRule::Unfilled);
    settle(&mut engine);
    assert_eq!(engine.summary_text("city"), Some("Unfilled: 10"));
}

#[test]
fn blank_text_is_skipped_by_numeric_rules() {
    let mut engine = summary_engine(0);
    engine.set_data(vec![
        Row::new().with("value", 2),
        Row::new().with("value", ""),
        Row::new().with("value", "  "),
        Row::new().with("value", 4),
    ]);
    engine.set_summary_rule("value", SummaryRule::Avg);
    engine.poll_aggregations();
    // Two values counted, not four
    assert_eq!(engine.summary_text("value"), Some("Avg: 3"));

    engine.set_summary_rule("value", SummaryRule::Min);
    engine.poll_aggregations();
    assert_eq!(engine.summary_text("value"), Some("Min: 2"));
}

#[test]
fn mismatched_rule_shows_nothing() {
    let mut engine = summary_engine(10);
    engine.set_summary_rule("name", SummaryRule::Sum);
    assert!(!engine.has_pending_summaries());
    assert_eq!(engine.summary_text("name"), Some(""));
}

#[test]
fn patched_result_repaints_summary_only() {
    let mut engine = summary_engine(10);
    engine.set_summary_rule("value", SummaryRule::Max);
    common::flush(&mut engine);
    assert_eq!(engine.poll_aggregations(), 1);
    assert_eq!(common::flush(&mut engine), [LayerKind::Summary]);
    assert_eq!(engine.summary_text("value"), Some("Max: 9"));
}

#[test]
fn disabled_summary_draws_no_cells() {
    let mut engine = common::engine(10, 800.0, 400.0);
    engine.set_summary_rule("value", SummaryRule::Sum);
    assert_eq!(engine.summary_text("value"), None);
    assert!(!engine.has_pending_summaries());
}

#[test]
fn tracker_drops_superseded_tokens() {
    let values = [CellValue::from(1.0), CellValue::from(2.0)];
    let mut tracker = SummaryTracker::new();
    let mut executor = InlineExecutor::default();
    tracker.set_rule("n", SummaryRule::Sum);

    let first = tracker.request("n", values.iter().map(Some), &mut executor);
    let second = tracker.request("n", values.iter().map(Some), &mut executor);
    assert_eq!(first, SummaryRequest::Pending(1));
    assert_eq!(second, SummaryRequest::Pending(2));

    let mut responses = executor.take_completed().into_iter();
    assert_eq!(tracker.resolve(responses.next().unwrap()), None);
    assert_eq!(
        tracker.resolve(responses.next().unwrap()),
        Some(("n".to_string(), "Sum: 3".to_string()))
    );
    assert!(!tracker.has_pending());
}

#[test]
fn failed_response_falls_back_to_inline() {
    let values = [CellValue::from(4.0), CellValue::from(8.0)];
    let mut tracker = SummaryTracker::new();
    let mut executor = InlineExecutor::default();
    tracker.set_rule("n", SummaryRule::Min);
    let SummaryRequest::Pending(token) =
        tracker.request("n", values.iter().map(Some), &mut executor)
    else {
        panic!("expected a pending request");
    };

    let failed = AggregationResponse {
        column: "n".into(),
        token,
        success: false,
        data: None,
    };
    assert_eq!(
        tracker.resolve(failed),
        Some(("n".to_string(), "Min: 4".to_string()))
    );
}

struct RefusingExecutor;

impl AggregationExecutor for RefusingExecutor {
    fn dispatch(&mut self, _job: AggregationJob) -> Result<()> {
        Err(GridError::Aggregation("no worker".into()))
    }

    fn take_completed(&mut self) -> Vec<AggregationResponse> {
        Vec::new()
    }
}

#[test]
fn dispatch_failure_computes_inline() {
    let mut engine = summary_engine(10);
    engine.set_executor(Box::new(RefusingExecutor));
    engine.set_summary_rule("value", SummaryRule::Max);
    assert!(!engine.has_pending_summaries());
    assert_eq!(engine.summary_text("value"), Some("Max: 9"));
}
