use std::collections::HashMap;

use gridline_layout::{available_width, resolve_widths, ActionColumns, Column};

fn no_resize() -> HashMap<String, f64> {
    HashMap::new()
}

// =============================================================================
// Flexible distribution
// =============================================================================

#[test]
fn test_even_split_without_constraints() {
    let columns = vec![Column::new("a"), Column::new("b"), Column::new("c"), Column::new("d")];
    let widths = resolve_widths(&columns, &no_resize(), 400.0);
    for key in ["a", "b", "c", "d"] {
        assert_eq!(widths.get(key), Some(100.0));
    }
    assert_eq!(widths.total(), 400.0);
}

#[test]
fn test_max_width_clamp_redistributes() {
    let columns = vec![
        Column::new("a").min_width(50.0),
        Column::new("b"),
        Column::new("c").max_width(80.0),
    ];
    let widths = resolve_widths(&columns, &no_resize(), 300.0);
    assert_eq!(widths.get("a"), Some(110.0));
    assert_eq!(widths.get("b"), Some(110.0));
    assert_eq!(widths.get("c"), Some(80.0));
    assert_eq!(widths.total(), 300.0);
}

#[test]
fn test_min_width_clamp_redistributes() {
    let columns = vec![
        Column::new("a").min_width(200.0),
        Column::new("b"),
        Column::new("c"),
    ];
    let widths = resolve_widths(&columns, &no_resize(), 300.0);
    assert_eq!(widths.get("a"), Some(200.0));
    assert_eq!(widths.get("b"), Some(50.0));
    assert_eq!(widths.get("c"), Some(50.0));
}

#[test]
fn test_cascading_clamps() {
    // 400 / 4 = 100 clamps "a"; 320 / 3 ≈ 106.7 then clamps "b"; the rest split 220.
    let columns = vec![
        Column::new("a").max_width(80.0),
        Column::new("b").max_width(100.0),
        Column::new("c"),
        Column::new("d"),
    ];
    let widths = resolve_widths(&columns, &no_resize(), 400.0);
    assert_eq!(widths.get("a"), Some(80.0));
    assert_eq!(widths.get("b"), Some(100.0));
    assert_eq!(widths.get("c"), Some(110.0));
    assert_eq!(widths.get("d"), Some(110.0));
    assert!((widths.total() - 400.0).abs() < 1e-9);
}

#[test]
fn test_all_clamped_at_once_sit_on_bounds() {
    let columns = vec![
        Column::new("a").min_width(60.0),
        Column::new("b").min_width(60.0),
    ];
    let widths = resolve_widths(&columns, &no_resize(), 100.0);
    assert_eq!(widths.get("a"), Some(60.0));
    assert_eq!(widths.get("b"), Some(60.0));
}

// =============================================================================
// Explicit widths
// =============================================================================

#[test]
fn test_declared_widths_take_space_first() {
    let columns = vec![Column::new("id").width(60.0), Column::new("name"), Column::new("email")];
    let widths = resolve_widths(&columns, &no_resize(), 360.0);
    assert_eq!(widths.get("id"), Some(60.0));
    assert_eq!(widths.get("name"), Some(150.0));
    assert_eq!(widths.get("email"), Some(150.0));
}

#[test]
fn test_resized_width_overrides_declared() {
    let columns = vec![Column::new("id").width(60.0).max_width(120.0), Column::new("name")];
    let mut resized = HashMap::new();
    resized.insert("id".to_string(), 500.0);
    let widths = resolve_widths(&columns, &resized, 300.0);
    assert_eq!(widths.get("id"), Some(120.0));
    assert_eq!(widths.get("name"), Some(180.0));
}

#[test]
fn test_resized_width_makes_flexible_column_explicit() {
    let columns = vec![Column::new("a"), Column::new("b")];
    let mut resized = HashMap::new();
    resized.insert("a".to_string(), 70.0);
    let widths = resolve_widths(&columns, &resized, 200.0);
    assert_eq!(widths.get("a"), Some(70.0));
    assert_eq!(widths.get("b"), Some(130.0));
}

#[test]
fn test_overflowing_explicit_widths_leave_flexible_at_zero() {
    let columns = vec![Column::new("a").width(300.0), Column::new("b")];
    let widths = resolve_widths(&columns, &no_resize(), 200.0);
    assert_eq!(widths.get("a"), Some(300.0));
    assert_eq!(widths.get("b"), Some(0.0));
}

// =============================================================================
// Edge cases
// =============================================================================

#[test]
fn test_non_positive_width_yields_empty_map() {
    let columns = vec![Column::new("a"), Column::new("b")];
    assert!(resolve_widths(&columns, &no_resize(), 0.0).is_empty());
    assert!(resolve_widths(&columns, &no_resize(), -10.0).is_empty());
    assert!(resolve_widths(&columns, &no_resize(), f64::NAN).is_empty());
}

#[test]
fn test_deterministic() {
    let columns = vec![
        Column::new("a").min_width(30.0),
        Column::new("b").max_width(45.0),
        Column::new("c").width(90.0),
        Column::new("d"),
    ];
    let first = resolve_widths(&columns, &no_resize(), 333.0);
    let second = resolve_widths(&columns, &no_resize(), 333.0);
    assert_eq!(first, second);
}

#[test]
fn test_sum_matches_available_for_many_containers() {
    let columns = vec![
        Column::new("a").min_width(40.0),
        Column::new("b").max_width(90.0),
        Column::new("c"),
        Column::new("d").width(75.0),
        Column::new("e").min_width(10.0).max_width(200.0),
    ];
    for container in [300.0, 420.0, 517.0, 800.0, 1234.5] {
        let widths = resolve_widths(&columns, &no_resize(), container);
        assert!(
            (widths.total() - container).abs() < 1e-6,
            "total {} for {container}",
            widths.total()
        );
        for column in &columns {
            let width = widths.get(&column.key).unwrap();
            assert_eq!(column.clamp(width), width, "{} out of bounds", column.key);
        }
    }
}

#[test]
fn test_available_width_subtracts_action_columns() {
    let actions = ActionColumns {
        drag_handle: Some(32.0),
        selection: Some(48.0),
        expansion: None,
    };
    assert_eq!(actions.total(), 80.0);
    assert_eq!(available_width(500.0, &actions), 420.0);
    assert_eq!(
        actions.entries(),
        vec![(ActionColumns::DRAG_KEY, 32.0), (ActionColumns::SELECTION_KEY, 48.0)]
    );
}
