//! Row virtualization tests
//!
//! Tests for the buffered row window, scroll clamping, and the add-rows
//! trigger near the bottom of the content.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_precision_loss
)]

use sheetgrid::config::GridConfig;
use sheetgrid::layout::{GridLayout, HitTarget, RowWindow, Viewport};
use test_case::test_case;

fn viewport(scroll_top: f32, height: f32) -> Viewport {
    Viewport {
        scroll_top,
        height,
        ..Viewport::new()
    }
}

#[test]
fn window_invariants_hold_for_any_scroll() {
    let config = GridConfig::default();
    for row_count in [1, 2, 15, 1000, 100_000] {
        let mut top = 0.0_f32;
        while top < 2_500_000.0 {
            let vp = viewport(top, 600.0);
            let w = vp.row_window(&config, row_count).unwrap();
            assert!(w.start_row <= w.end_row, "{w:?} at {top}");
            assert!(w.end_row < row_count, "{w:?} past {row_count} rows");

            let (first, last) = vp.visible_rows(&config, row_count).unwrap();
            assert!(w.contains(first) && w.contains(last), "{w:?} misses {first}..{last}");
            top += 997.0;
        }
    }
}

#[test_case(0.0, 0, 45; "top")]
#[test_case(2400.0, 90, 135; "row 100 at top")]
#[test_case(23.9, 0, 45; "partial first row")]
fn window_bounds(scroll_top: f32, start: u32, end: u32) {
    let config = GridConfig::default();
    let w = viewport(scroll_top, 600.0)
        .row_window(&config, 1000)
        .unwrap();
    assert_eq!(w, RowWindow { start_row: start, end_row: end });
}

#[test]
fn window_for_empty_sheet_is_none() {
    let config = GridConfig::default();
    assert!(Viewport::new().row_window(&config, 0).is_none());
}

#[test]
fn window_past_the_end_stays_on_last_rows() {
    let config = GridConfig::default();
    let w = viewport(1_000_000.0, 600.0).row_window(&config, 50).unwrap();
    assert_eq!(w.end_row, 49);
    assert!(w.start_row <= 49);
}

#[test]
fn scroll_is_clamped_and_reports_applied_delta() {
    let config = GridConfig::default();
    let mut vp = viewport(0.0, 600.0);
    let (dx, dy) = vp.scroll_by(0.0, -50.0, &config, 1000, 26);
    assert_eq!((dx, dy), (0.0, 0.0));

    let (_, max_y) = vp.max_scroll(&config, 1000, 26);
    let (_, dy) = vp.scroll_by(0.0, 1e9, &config, 1000, 26);
    assert_eq!(dy, max_y);
    assert_eq!(vp.scroll_top, max_y);

    let (_, dy) = vp.scroll_by(0.0, 10.0, &config, 1000, 26);
    assert_eq!(dy, 0.0, "no further scroll at the bottom edge");
}

#[test]
fn horizontal_and_vertical_scroll_are_independent() {
    let config = GridConfig::default();
    let mut vp = Viewport::new();
    vp.scroll_by(120.0, 0.0, &config, 1000, 26);
    assert_eq!(vp.scroll_left, 120.0);
    assert_eq!(vp.scroll_top, 0.0);
    vp.scroll_by(0.0, 240.0, &config, 1000, 26);
    assert_eq!(vp.scroll_left, 120.0);
    assert_eq!(vp.scroll_top, 240.0);
}

#[test]
fn non_finite_scroll_is_ignored() {
    let config = GridConfig::default();
    let mut vp = Viewport::new();
    vp.scroll_by(f32::NAN, f32::INFINITY, &config, 1000, 26);
    assert_eq!((vp.scroll_left, vp.scroll_top), (0.0, 0.0));
}

#[test]
fn near_bottom_only_within_threshold() {
    let config = GridConfig::default();
    let total = config.header_height + config.content_height(1000);
    let mut vp = viewport(0.0, 600.0);
    assert!(!vp.near_bottom(&config, 1000));

    vp.scroll_top = total - 600.0 - config.add_rows_threshold - 1.0;
    assert!(!vp.near_bottom(&config, 1000));

    vp.scroll_top = total - 600.0 - config.add_rows_threshold + 1.0;
    assert!(vp.near_bottom(&config, 1000));
}

#[test]
fn hit_test_respects_sticky_headers() {
    let layout = GridLayout::new(GridConfig::default(), 1000, 26);
    let mut vp = Viewport::new();
    assert_eq!(layout.hit_test(10.0, 10.0, &vp), HitTarget::CornerHeader);
    assert_eq!(layout.hit_test(60.0, 10.0, &vp), HitTarget::ColumnHeader(0));
    assert_eq!(layout.hit_test(10.0, 40.0, &vp), HitTarget::RowHeader(0));

    vp.scroll_top = 240.0;
    vp.scroll_left = 100.0;
    let cell = layout.cell_at_point(60.0, 40.0, &vp).unwrap();
    assert_eq!(cell.to_id(), "B11");
    assert_eq!(layout.hit_test(10.0, 40.0, &vp), HitTarget::RowHeader(10));
}

#[test]
fn hit_test_past_last_column_is_none() {
    let layout = GridLayout::new(GridConfig::default(), 10, 3);
    let vp = Viewport::new();
    assert_eq!(layout.hit_test(50.0 + 350.0, 40.0, &vp), HitTarget::None);
}
