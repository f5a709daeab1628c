//! Pointer interaction tests for vgrid
//!
//! Drives the engine with raw pointer coordinates the way the browser viewer
//! does and checks the resulting sort, resize, selection and menu targets.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use test_case::test_case;
use vgrid::render::LayerKind;
use vgrid::{GridConfig, GridEngine, HitTarget, SortOrder};

// 1000 rows at 800x400: vertical bar only. Bands: left 0..80, center 80..560,
// right 684..784.

fn click(engine: &mut GridEngine, x: f64, y: f64) -> Option<HitTarget> {
    engine.pointer_down(x, y);
    engine.pointer_up(x, y)
}

#[test_case(308.0, 16.0, HitTarget::FilterIcon { column: "name".into() } ; "filter funnel")]
#[test_case(290.0, 10.0, HitTarget::SortArrow { column: "name".into(), order: SortOrder::Asc } ; "upper arrow")]
#[test_case(754.0, 22.0, HitTarget::SortArrow { column: "value".into(), order: SortOrder::Desc } ; "right band arrow")]
#[test_case(320.0, 16.0, HitTarget::ColumnResizer { index: 1 } ; "resizer between center columns")]
#[test_case(150.0, 16.0, HitTarget::HeaderCell { column: "name".into() } ; "plain header")]
#[test_case(40.0, 32.0 + 65.0, HitTarget::BodyCell { row: 2, col: 0 } ; "left body")]
#[test_case(790.0, 200.0, HitTarget::None ; "scrollbar track below thumb")]
fn hit_regions(x: f64, y: f64, expected: HitTarget) {
    let engine = common::engine(1000, 800.0, 400.0);
    assert_eq!(engine.hit_test(x, y), expected);
}

#[test]
fn clicking_arrows_sorts_display_rows() {
    let mut engine = common::engine(1000, 800.0, 400.0);
    let target = click(&mut engine, 754.0, 22.0);
    assert!(matches!(target, Some(HitTarget::SortArrow { .. })));
    assert_eq!(engine.sort_columns().len(), 1);
    assert_eq!(engine.display_row(0).unwrap().display_value("value"), "96");

    // Arrow switches to the active color
    let flushed = common::flush(&mut engine);
    assert!(flushed.contains(&LayerKind::Header));
}

#[test]
fn filter_click_is_reported_to_host() {
    let mut engine = common::engine(1000, 800.0, 400.0);
    assert_eq!(
        click(&mut engine, 308.0, 16.0),
        Some(HitTarget::FilterIcon {
            column: "name".into()
        })
    );
    assert!(engine.sort_columns().is_empty());
}

#[test]
fn summary_click_is_reported_to_host() {
    let mut engine = GridEngine::new(GridConfig {
        enable_summary: true,
        ..common::config()
    });
    engine.set_columns(common::standard_columns());
    engine.set_data(common::numbered_rows(1000));
    engine.attach(800.0, 400.0);
    // Summary band spans 370..400
    assert_eq!(
        click(&mut engine, 400.0, 385.0),
        Some(HitTarget::SummaryCell {
            column: "city".into()
        })
    );
}

#[test]
fn dragging_resizer_commits_on_release() {
    let mut engine = common::engine(1000, 800.0, 400.0);
    assert_eq!(engine.pointer_down(320.0, 16.0), HitTarget::ColumnResizer { index: 1 });
    assert_eq!(engine.cursor(330.0, 100.0), "col-resize");
    assert!(engine.pointer_move(400.0, 16.0));
    // Width only changes on release
    assert_eq!(engine.partition().center_width, 480.0);

    engine.pointer_up(400.0, 16.0);
    assert_eq!(engine.columns()[1].width, Some(320.0));
    assert_eq!(engine.partition().center_width, 560.0);
    assert!(!engine.drag_state().is_active());
}

#[test]
fn clicking_body_selects_cell() {
    let mut engine = common::engine(1000, 800.0, 400.0);
    engine.update_vertical_scroll(300.0);
    let target = click(&mut engine, 100.0, 32.0 + 5.0);
    assert_eq!(target, Some(HitTarget::BodyCell { row: 10, col: 1 }));
    assert_eq!(engine.selected_cell(), Some((10, 1)));

    // Selection survives a scroll that redraws the body
    engine.update_vertical_scroll(3000.0);
    assert_eq!(engine.selected_cell(), Some((10, 1)));
}

#[test]
fn hovering_thumb_repaints_scrollbar_only() {
    let mut engine = common::engine(1000, 800.0, 400.0);
    let thumb = engine.scrollbar_geometry().vertical.unwrap().thumb;
    let (x, y) = (thumb.x + thumb.width / 2.0, thumb.y + thumb.height / 2.0);
    assert_eq!(engine.cursor(x, y), "grab");
    assert!(engine.pointer_move(x, y));
    assert_eq!(common::flush(&mut engine), [LayerKind::Scrollbar]);

    // Moving within the thumb changes nothing
    assert!(!engine.pointer_move(x, y + 1.0));
    assert!(engine.pointer_leave());
}

#[test]
fn dragging_thumb_to_bottom_reaches_max_scroll() {
    let mut engine = common::engine(1000, 800.0, 400.0);
    let thumb = engine.scrollbar_geometry().vertical.unwrap().thumb;
    let x = thumb.x + 1.0;
    engine.pointer_down(x, thumb.y + 1.0);
    assert_eq!(engine.cursor(0.0, 0.0), "grabbing");
    engine.pointer_move(x, 10_000.0);
    assert_eq!(engine.scroll().scroll_y(), engine.limits().max_scroll_y);
    assert_eq!(engine.pointer_up(x, 10_000.0), None);
}
