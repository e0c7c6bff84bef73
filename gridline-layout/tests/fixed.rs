use std::collections::HashMap;

use gridline_layout::{FixedInput, FixedLayout, FixedSide};

fn widths(entries: &[(&str, f64)]) -> HashMap<String, f64> {
    entries.iter().map(|(k, w)| (k.to_string(), *w)).collect()
}

// =============================================================================
// Offsets
// =============================================================================

#[test]
fn test_start_offsets_accumulate() {
    let w = widths(&[("__selection", 40.0), ("a", 100.0), ("b", 80.0), ("c", 120.0), ("x", 200.0)]);
    let order = ["__selection", "a", "b", "c", "x"];
    let start = ["__selection", "a", "b", "c"];
    let input = FixedInput {
        order: &order,
        start: &start,
        end: &[],
        scroll_left: 0.0,
        container_width: 300.0,
    };
    let layout = FixedLayout::compute(&input, |k| w.get(k).copied());

    let mut expected = 0.0;
    for key in start {
        let record = layout.get(key).unwrap();
        assert_eq!(record.side, FixedSide::Start);
        assert_eq!(record.offset, expected);
        expected += w[key];
    }
    assert_eq!(layout.start_width(), 340.0);
}

#[test]
fn test_end_offsets_accumulate_backwards() {
    let w = widths(&[("x", 300.0), ("y", 60.0), ("z", 90.0)]);
    let order = ["x", "y", "z"];
    let end = ["y", "z"];
    let input = FixedInput {
        order: &order,
        start: &[],
        end: &end,
        scroll_left: 0.0,
        container_width: 200.0,
    };
    let layout = FixedLayout::compute(&input, |k| w.get(k).copied());
    assert_eq!(layout.get("z").unwrap().offset, 0.0);
    assert_eq!(layout.get("y").unwrap().offset, 90.0);
    assert_eq!(layout.get("y").unwrap().side, FixedSide::End);
    assert_eq!(layout.end_width(), 150.0);
}

#[test]
fn test_unknown_key_has_no_record() {
    let order = ["a"];
    let input = FixedInput {
        order: &order,
        start: &order,
        end: &[],
        scroll_left: 0.0,
        container_width: 100.0,
    };
    let layout = FixedLayout::compute(&input, |_| Some(50.0));
    assert!(layout.get("missing").is_none());
    assert!(!layout.has_shadow("missing"));
}

// =============================================================================
// Shadows
// =============================================================================

#[test]
fn test_no_start_shadow_before_scrolling() {
    let order = ["a", "b", "x", "y"];
    let start = ["a", "b"];
    let input = FixedInput {
        order: &order,
        start: &start,
        end: &[],
        scroll_left: 0.0,
        container_width: 150.0,
    };
    let layout = FixedLayout::compute(&input, |_| Some(100.0));
    assert!(!layout.has_shadow("a"));
    assert!(!layout.has_shadow("b"));
}

#[test]
fn test_start_shadow_only_on_last_contiguous_column() {
    let order = ["a", "b", "x", "y"];
    let start = ["a", "b"];
    let input = FixedInput {
        order: &order,
        start: &start,
        end: &[],
        scroll_left: 10.0,
        container_width: 150.0,
    };
    let layout = FixedLayout::compute(&input, |_| Some(100.0));
    assert!(!layout.has_shadow("a"));
    assert!(layout.has_shadow("b"));
}

#[test]
fn test_start_shadow_moves_when_detached_column_sticks() {
    // "b" is pinned but declared after "x", so it only sticks once scrolled
    // past its natural position (100px from its sticky offset).
    let order = ["a", "x", "b", "y"];
    let start = ["a", "b"];
    let w = |_: &str| Some(100.0);

    let early = FixedInput {
        order: &order,
        start: &start,
        end: &[],
        scroll_left: 50.0,
        container_width: 250.0,
    };
    let layout = FixedLayout::compute(&early, w);
    assert!(layout.has_shadow("a"));
    assert!(!layout.has_shadow("b"));

    let late = FixedInput {
        scroll_left: 150.0,
        ..early
    };
    let layout = FixedLayout::compute(&late, w);
    assert!(!layout.has_shadow("a"));
    assert!(layout.has_shadow("b"));
}

#[test]
fn test_end_shadow_until_scrolled_to_the_end() {
    let order = ["x", "y", "z", "e1", "e2"];
    let end = ["e1", "e2"];
    let w = |_: &str| Some(100.0);
    // Content is 500 wide, container 300: max scroll 200.
    let start_of_scroll = FixedInput {
        order: &order,
        start: &[],
        end: &end,
        scroll_left: 0.0,
        container_width: 300.0,
    };
    let layout = FixedLayout::compute(&start_of_scroll, w);
    assert!(layout.has_shadow("e1"));
    assert!(!layout.has_shadow("e2"));

    let fully_scrolled = FixedInput {
        scroll_left: 200.0,
        ..start_of_scroll
    };
    let layout = FixedLayout::compute(&fully_scrolled, w);
    assert!(!layout.has_shadow("e1"));
    assert!(!layout.has_shadow("e2"));
}
