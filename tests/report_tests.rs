//! Grid description and frame report tests for vgrid
//!
//! Loads a JSON grid description the way the CLI and the browser viewer do and
//! checks the resulting layout, summaries and serialized frame report.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use serde_json::json;
use vgrid::render::{Region, Shape};
use vgrid::{Align, ColumnType, Fixed, GridEngine, GridSpec, SummaryRule};

const ORDERS: &str = include_str!("fixtures/orders.json");

fn orders() -> GridEngine {
    let spec = GridSpec::from_json(ORDERS).unwrap();
    let mut engine = GridEngine::from_spec(spec);
    engine.attach(500.0, 300.0);
    engine
}

#[test]
fn description_parses_with_defaults() {
    let spec = GridSpec::from_json(ORDERS).unwrap();
    assert_eq!(spec.config.buffer_rows, 3);
    assert!(spec.config.enable_summary);
    assert_eq!(spec.config.style.header_row_height, 40.0);
    // Untouched style keys keep their defaults
    assert_eq!(spec.config.style.body_row_height, 30.0);

    let columns = spec.columns();
    let names: Vec<&str> = columns.iter().map(|c| c.column_name.as_str()).collect();
    assert_eq!(names, ["region", "customer", "product", "qty", "price"]);
    assert_eq!(columns[0].fixed, Some(Fixed::Left));
    assert_eq!(columns[3].column_type, ColumnType::Number);
    assert_eq!(columns[4].align, Align::Right);
    assert_eq!(spec.data.len(), 6);
}

#[test]
fn malformed_description_is_an_error() {
    assert!(GridSpec::from_json("{\"data\": 5}").is_err());
    assert!(GridSpec::from_json("not json").is_err());
}

#[test]
fn frame_report_serializes_layout() {
    let engine = orders();
    let report = serde_json::to_value(engine.frame_report()).unwrap();
    assert_eq!(report["viewport"], json!([500.0, 300.0]));
    assert_eq!(report["leftWidth"], json!(90.0));
    assert_eq!(report["centerWidth"], json!(420.0));
    assert_eq!(report["rightWidth"], json!(100.0));
    assert_eq!(report["maxScrollX"], json!(110.0));
    assert_eq!(report["maxScrollY"], json!(0.0));
    assert_eq!(report["rowCount"], json!(6));
    assert_eq!(report["visibleRows"], json!([0, 5]));

    let layers: Vec<&str> = report["layers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["layer"].as_str().unwrap())
        .collect();
    assert_eq!(layers, ["body", "fixed-body", "header", "summary", "scrollbar"]);
    assert!(report["layers"][0]["primitives"].as_u64().unwrap() > 0);
}

#[test]
fn header_shows_display_name() {
    let engine = orders();
    let left = engine.header_group(Region::Left).unwrap();
    let captions: Vec<String> = engine
        .scene()
        .children(left)
        .iter()
        .filter_map(|id| match engine.scene().shape(*id) {
            Some(Shape::Text(t)) => Some(t.text.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(captions, ["Region"]);
}

#[test]
fn summaries_from_description() {
    let mut engine = orders();
    engine.set_summary_rule("qty", SummaryRule::Sum);
    engine.set_summary_rule("price", SummaryRule::Max);
    engine.set_summary_rule("product", SummaryRule::Unfilled);
    engine.poll_aggregations();

    // The row without a qty is skipped
    assert_eq!(engine.summary_text("qty"), Some("Sum: 17"));
    assert_eq!(engine.summary_text("price"), Some("Max: 240"));
    assert_eq!(engine.summary_text("product"), Some("Unfilled: 1"));
    assert_eq!(engine.summary_rules_for("price"), &SummaryRule::NUMERIC);
}

#[test]
fn detached_report_has_no_viewport() {
    let mut engine = orders();
    engine.detach();
    let report = engine.frame_report();
    assert!(report.viewport.is_none());
    assert!(report.visible_rows.is_none());
    assert_eq!(report.max_scroll_x, 0.0);
    assert!(report.layers.iter().all(|l| l.primitives == 0));
    assert!(common::flush(&mut engine).is_empty());
}
