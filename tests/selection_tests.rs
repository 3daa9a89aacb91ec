//! Range selection engine tests.
//!
//! Covers range enumeration and every selection transition: click, shift+click,
//! drag, arrow keys with and without shift, escape and outside clicks.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::collections::HashSet;

use sheetgrid::selection::{range_between, Direction, DragState, Region, SelectionEngine};
use test_case::test_case;

fn engine() -> SelectionEngine {
    SelectionEngine::new(100, 26)
}

fn assert_no_duplicates(cells: &[String]) {
    let unique: HashSet<&String> = cells.iter().collect();
    assert_eq!(unique.len(), cells.len(), "duplicates in {cells:?}");
}

// ============================================================================
// Range enumeration
// ============================================================================

#[test]
fn range_is_row_major_rectangle() {
    assert_eq!(range_between("B2", "C3"), ["B2", "C2", "B3", "C3"]);
}

#[test_case("A1", "C3"; "forward")]
#[test_case("C3", "A1"; "backward")]
#[test_case("C1", "A3"; "anti-diagonal")]
fn range_size_is_area_for_any_corner_order(a: &str, b: &str) {
    let cells = range_between(a, b);
    assert_eq!(cells.len(), 9);
    assert_eq!(cells.first().unwrap(), "A1");
    assert_eq!(cells.last().unwrap(), "C3");
    assert_no_duplicates(&cells);
}

#[test]
fn range_of_one_cell() {
    assert_eq!(range_between("D7", "D7"), ["D7"]);
}

#[test]
fn range_with_malformed_endpoint_is_empty() {
    assert!(range_between("A1", "nope").is_empty());
    assert!(range_between("", "B2").is_empty());
}

// ============================================================================
// Pointer transitions
// ============================================================================

#[test]
fn click_selects_single_cell() {
    let mut sel = engine();
    assert!(sel.click("C5", false));
    assert_eq!(sel.cells(), ["C5"]);
    assert_eq!(sel.primary(), Some("C5"));
    assert!(!sel.click("C5", false), "same click is not a change");
}

#[test]
fn shift_click_extends_from_primary() {
    let mut sel = engine();
    sel.click("B2", false);
    assert!(sel.click("C4", true));
    assert_eq!(sel.cells(), ["B2", "C2", "B3", "C3", "B4", "C4"]);
    assert_eq!(sel.primary(), Some("B2"));
}

#[test]
fn shift_click_with_nothing_selected_is_plain_click() {
    let mut sel = engine();
    assert!(sel.click("E1", true));
    assert_eq!(sel.cells(), ["E1"]);
}

#[test]
fn click_outside_sheet_is_ignored() {
    let mut sel = engine();
    sel.click("A1", false);
    assert!(!sel.click("AA1", false));
    assert!(!sel.click("A101", false));
    assert_eq!(sel.cells(), ["A1"]);
}

#[test]
fn drag_selects_rectangle_and_keeps_it_on_release() {
    let mut sel = engine();
    assert!(sel.drag_start("D4"));
    assert!(sel.is_dragging());
    assert!(sel.drag_move("B3"));
    assert_eq!(sel.cells(), ["B3", "C3", "D3", "B4", "C4", "D4"]);
    sel.drag_end();
    assert_eq!(sel.drag_state(), &DragState::Idle);
    assert_eq!(sel.cells().len(), 6);
}

#[test]
fn drag_move_without_drag_does_nothing() {
    let mut sel = engine();
    sel.click("A1", false);
    assert!(!sel.drag_move("C3"));
    assert_eq!(sel.cells(), ["A1"]);
}

#[test]
fn drag_past_the_edge_is_clamped() {
    let mut sel = SelectionEngine::new(3, 3);
    sel.drag_start("B2");
    sel.drag_move("Z99");
    assert_eq!(sel.cells(), ["B2", "C2", "B3", "C3"]);
}

// ============================================================================
// Keyboard transitions
// ============================================================================

#[test]
fn arrow_moves_single_cell() {
    let mut sel = engine();
    sel.click("B2", false);
    assert!(sel.arrow(Direction::Right, false));
    assert_eq!(sel.cells(), ["C2"]);
    assert!(sel.arrow(Direction::Down, false));
    assert_eq!(sel.cells(), ["C3"]);
    assert_eq!(sel.anchor(), None);
}

#[test]
fn arrow_stops_at_sheet_edge() {
    let mut sel = engine();
    sel.click("A1", false);
    assert!(!sel.arrow(Direction::Up, false));
    assert!(!sel.arrow(Direction::Left, false));
    assert_eq!(sel.cells(), ["A1"]);

    sel.click("Z100", false);
    assert!(!sel.arrow(Direction::Right, false));
    assert!(!sel.arrow(Direction::Down, false));
}

#[test]
fn arrow_with_empty_selection_does_nothing() {
    let mut sel = engine();
    assert!(!sel.arrow(Direction::Down, false));
    assert!(!sel.arrow(Direction::Down, true));
    assert!(sel.cells().is_empty());
}

#[test]
fn shift_arrow_pins_anchor_and_grows() {
    let mut sel = engine();
    sel.click("B2", false);
    assert!(sel.arrow(Direction::Right, true));
    assert_eq!(sel.anchor(), Some("B2"));
    assert_eq!(sel.cells(), ["B2", "C2"]);

    assert!(sel.arrow(Direction::Down, true));
    assert_eq!(sel.cells(), ["B2", "C2", "B3", "C3"]);

    assert!(sel.arrow(Direction::Left, true));
    assert_eq!(sel.cells(), ["B2", "B3"]);
    assert_eq!(sel.anchor(), Some("B2"));
}

#[test]
fn shift_arrow_can_cross_the_anchor() {
    let mut sel = engine();
    sel.click("C3", false);
    sel.arrow(Direction::Left, true);
    sel.arrow(Direction::Left, true);
    assert_eq!(sel.cells(), ["A3", "B3", "C3"]);
    assert_eq!(sel.anchor(), Some("C3"));
}

#[test]
fn plain_arrow_after_extension_collapses() {
    let mut sel = engine();
    sel.click("B2", false);
    sel.arrow(Direction::Down, true);
    sel.arrow(Direction::Down, false);
    assert_eq!(sel.cells(), ["B3"]);
    assert_eq!(sel.anchor(), None);
}

#[test]
fn escape_clears_selection_and_anchor() {
    let mut sel = engine();
    sel.click("B2", false);
    sel.arrow(Direction::Right, true);
    assert!(sel.escape());
    assert!(sel.cells().is_empty());
    assert_eq!(sel.anchor(), None);
    assert!(!sel.escape(), "escape on nothing is not a change");
}

// ============================================================================
// Outside clicks
// ============================================================================

#[test_case(Region::Toolbar)]
#[test_case(Region::ColorPalette)]
#[test_case(Region::AiChat)]
fn exempt_regions_keep_selection(region: Region) {
    let mut sel = engine();
    sel.select_range("A1", "B2");
    assert!(!sel.click_outside(region));
    assert_eq!(sel.cells().len(), 4);
}

#[test]
fn outside_click_elsewhere_clears() {
    let mut sel = engine();
    sel.select_range("A1", "B2");
    sel.arrow(Direction::Down, true);
    assert!(sel.click_outside(Region::Elsewhere));
    assert!(sel.cells().is_empty());
    assert_eq!(sel.anchor(), None);
}

// ============================================================================
// Bounds
// ============================================================================

#[test]
fn shrinking_the_sheet_prunes_selection() {
    let mut sel = engine();
    sel.select_range("Y99", "Z100");
    assert!(sel.set_bounds(99, 26));
    assert_eq!(sel.cells(), ["Y99", "Z99"]);
    assert!(!sel.set_bounds(99, 26));
}

#[test]
fn selection_never_holds_duplicates_or_out_of_range_ids() {
    let mut sel = SelectionEngine::new(5, 5);
    sel.click("C3", false);
    for (dir, shift) in [
        (Direction::Right, true),
        (Direction::Right, true),
        (Direction::Right, true),
        (Direction::Down, true),
        (Direction::Down, true),
        (Direction::Down, true),
        (Direction::Left, false),
        (Direction::Up, true),
    ] {
        sel.arrow(dir, shift);
        assert_no_duplicates(sel.cells());
        for id in sel.cells() {
            let c = sheetgrid::cell_ref::decode(id).unwrap();
            assert!(c.within(5, 5), "{id} out of range");
        }
    }
}
