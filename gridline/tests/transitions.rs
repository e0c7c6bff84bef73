use std::collections::HashSet;
use std::time::Duration;

use gridline::identity::RowIdentity;
use gridline::transition::{
    DataSourceHints, TransitionConfig, TransitionEffect, TransitionPhase, TransitionTracker,
};
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq)]
struct Row {
    id: &'static str,
    value: u32,
}

fn row(id: &'static str) -> Row {
    Row { id, value: 0 }
}

fn rows(ids: &[&'static str]) -> Vec<Row> {
    ids.iter().map(|&id| row(id)).collect()
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn tracker(rows: Vec<Row>, now: Instant) -> TransitionTracker<Row, &'static str> {
    let mut tracker = TransitionTracker::new(
        TransitionConfig::new(ms(1000), ms(300)),
        RowIdentity::new(|r: &Row| r.id),
    );
    tracker.update_data_source(rows, &DataSourceHints::new(), now);
    tracker
}

fn visible(tracker: &TransitionTracker<Row, &'static str>) -> Vec<&'static str> {
    tracker.visible().iter().map(|r| r.id).collect()
}

fn set(ids: &[&'static str]) -> HashSet<&'static str> {
    ids.iter().copied().collect()
}

// =============================================================================
// Removal lifecycle
// =============================================================================

#[test]
fn test_removed_row_stays_visible_until_faded() {
    let t0 = Instant::now();
    let mut tracker = tracker(rows(&["x", "y"]), t0);

    tracker.update_data_source(rows(&["y"]), &DataSourceHints::new().removed(["x"]), t0);
    assert_eq!(visible(&tracker), vec!["x", "y"]);
    assert_eq!(tracker.deleting(), set(&["x"]));
    assert!(tracker.fading_out().is_empty());

    let effects = tracker.tick(t0 + ms(999));
    assert!(effects.is_empty());

    let effects = tracker.tick(t0 + ms(1000));
    assert_eq!(effects, vec![TransitionEffect::FadeOutStarted("x")]);
    assert!(tracker.deleting().is_empty());
    assert_eq!(tracker.fading_out(), set(&["x"]));
    assert_eq!(visible(&tracker), vec!["x", "y"]);

    let effects = tracker.tick(t0 + ms(1300));
    assert_eq!(
        effects,
        vec![TransitionEffect::Removed {
            key: "x",
            row: row("x")
        }]
    );
    assert_eq!(visible(&tracker), vec!["y"]);
    assert!(tracker.deleting().is_empty());
    assert!(tracker.fading_out().is_empty());
    assert!(!tracker.has_pending());
    assert_eq!(tracker.next_deadline(), None);
}

#[test]
fn test_removal_of_row_still_in_data_removes_it_at_the_end() {
    let t0 = Instant::now();
    let mut tracker = tracker(rows(&["x", "y"]), t0);

    tracker.update_data_source(rows(&["x", "y"]), &DataSourceHints::new().removed(["x"]), t0);
    assert_eq!(visible(&tracker), vec!["x", "y"]);
    assert_eq!(tracker.phase_of(&"x"), Some(TransitionPhase::Deleting));

    tracker.tick(t0 + ms(1300));
    assert_eq!(visible(&tracker), vec!["y"]);
    assert_eq!(tracker.rows().len(), 1);
}

#[test]
fn test_late_tick_runs_both_phases() {
    let t0 = Instant::now();
    let mut tracker = tracker(rows(&["x", "y"]), t0);
    tracker.update_data_source(rows(&["y"]), &DataSourceHints::new().removed(["x"]), t0);

    let effects = tracker.tick(t0 + ms(5000));
    assert_eq!(effects.len(), 2);
    assert_eq!(effects[0], TransitionEffect::FadeOutStarted("x"));
    assert!(matches!(effects[1], TransitionEffect::Removed { key: "x", .. }));
}

#[test]
fn test_identical_updates_are_idempotent() {
    let t0 = Instant::now();
    let mut tracker = tracker(rows(&["x", "y", "z"]), t0);
    let hints = DataSourceHints::new().removed(["y"]).added(["z"]);

    tracker.update_data_source(rows(&["x", "z"]), &hints, t0);
    let first = (visible(&tracker), tracker.adding(), tracker.deleting(), tracker.next_deadline());

    tracker.update_data_source(rows(&["x", "z"]), &hints, t0);
    let second = (visible(&tracker), tracker.adding(), tracker.deleting(), tracker.next_deadline());

    assert_eq!(first, second);
    assert_eq!(first.0, vec!["x", "y", "z"]);
}

#[test]
fn test_overlapping_updates_keep_in_flight_removals() {
    let t0 = Instant::now();
    let mut tracker = tracker(rows(&["x", "y", "z"]), t0);

    tracker.update_data_source(rows(&["y", "z"]), &DataSourceHints::new().removed(["x"]), t0);
    tracker.update_data_source(
        rows(&["z"]),
        &DataSourceHints::new().removed(["y"]),
        t0 + ms(500),
    );
    assert_eq!(visible(&tracker), vec!["x", "y", "z"]);
    assert_eq!(tracker.deleting(), set(&["x", "y"]));

    tracker.tick(t0 + ms(1000));
    assert_eq!(tracker.fading_out(), set(&["x"]));
    assert_eq!(tracker.deleting(), set(&["y"]));

    tracker.tick(t0 + ms(1300));
    assert_eq!(visible(&tracker), vec!["y", "z"]);

    tracker.tick(t0 + ms(1500));
    assert_eq!(tracker.fading_out(), set(&["y"]));

    tracker.tick(t0 + ms(1800));
    assert_eq!(visible(&tracker), vec!["z"]);
    assert!(!tracker.has_pending());
}

#[test]
fn test_unhinted_update_keeps_removals_animating() {
    let t0 = Instant::now();
    let mut tracker = tracker(rows(&["a", "b", "c"]), t0);
    tracker.update_data_source(rows(&["a", "c"]), &DataSourceHints::new().removed(["b"]), t0);

    tracker.update_data_source(rows(&["a", "c", "d"]), &DataSourceHints::new(), t0 + ms(100));
    assert_eq!(visible(&tracker), vec!["a", "b", "c", "d"]);
    assert_eq!(tracker.deleting(), set(&["b"]));
}

#[test]
fn test_deleting_row_keeps_place_when_predecessor_leaves() {
    let t0 = Instant::now();
    let mut tracker = tracker(rows(&["a", "b", "c", "d"]), t0);
    tracker.update_data_source(
        rows(&["a", "c", "d"]),
        &DataSourceHints::new().removed(["b"]),
        t0,
    );

    tracker.update_data_source(rows(&["c", "d"]), &DataSourceHints::new(), t0 + ms(100));
    assert_eq!(visible(&tracker), vec!["b", "c", "d"]);
    assert_eq!(tracker.deleting(), set(&["b"]));
}

#[test]
fn test_adjacent_deleting_rows_keep_order_when_neighbours_leave() {
    let t0 = Instant::now();
    let mut tracker = tracker(rows(&["a", "b", "c", "d"]), t0);
    tracker.update_data_source(
        rows(&["a", "c", "d"]),
        &DataSourceHints::new().removed(["b"]),
        t0,
    );
    tracker.update_data_source(
        rows(&["a", "d"]),
        &DataSourceHints::new().removed(["c"]),
        t0 + ms(500),
    );
    assert_eq!(visible(&tracker), vec!["a", "b", "c", "d"]);

    tracker.update_data_source(rows(&["d"]), &DataSourceHints::new(), t0 + ms(600));
    assert_eq!(visible(&tracker), vec!["b", "c", "d"]);

    tracker.tick(t0 + ms(1300));
    assert_eq!(visible(&tracker), vec!["c", "d"]);
}

// =============================================================================
// Additions and restarts
// =============================================================================

#[test]
fn test_added_rows_highlight_then_settle() {
    let t0 = Instant::now();
    let mut tracker = tracker(rows(&["x"]), t0);

    tracker.update_data_source(rows(&["x", "y"]), &DataSourceHints::new().added(["y"]), t0);
    assert_eq!(tracker.adding(), set(&["y"]));
    assert_eq!(tracker.next_deadline(), Some(t0 + ms(1000)));

    assert_eq!(tracker.tick(t0 + ms(1000)), vec![TransitionEffect::AddSettled("y")]);
    assert!(tracker.adding().is_empty());
}

#[test]
fn test_adding_key_missing_from_next_update_is_dropped() {
    let t0 = Instant::now();
    let mut tracker = tracker(rows(&["x"]), t0);
    tracker.update_data_source(rows(&["x", "y"]), &DataSourceHints::new().added(["y"]), t0);

    tracker.update_data_source(rows(&["x"]), &DataSourceHints::new(), t0 + ms(200));
    assert!(tracker.adding().is_empty());
    assert_eq!(visible(&tracker), vec!["x"]);
}

#[test]
fn test_added_hint_for_absent_row_is_ignored() {
    let t0 = Instant::now();
    let mut tracker = tracker(rows(&["x"]), t0);
    tracker.update_data_source(rows(&["x"]), &DataSourceHints::new().added(["ghost"]), t0);
    assert!(tracker.adding().is_empty());
    assert_eq!(tracker.next_deadline(), None);
}

#[test]
fn test_re_adding_cancels_deletion() {
    let t0 = Instant::now();
    let mut tracker = tracker(rows(&["x", "y"]), t0);
    tracker.update_data_source(rows(&["y"]), &DataSourceHints::new().removed(["x"]), t0);

    tracker.update_data_source(
        rows(&["x", "y"]),
        &DataSourceHints::new().added(["x"]),
        t0 + ms(400),
    );
    assert!(tracker.deleting().is_empty());
    assert_eq!(tracker.adding(), set(&["x"]));
    assert_eq!(visible(&tracker), vec!["x", "y"]);
}

#[test]
fn test_rehint_restarts_only_that_key() {
    let t0 = Instant::now();
    let mut tracker = tracker(rows(&["x", "y", "z"]), t0);
    tracker.update_data_source(rows(&["z"]), &DataSourceHints::new().removed(["x", "y"]), t0);

    tracker.update_data_source(
        rows(&["z"]),
        &DataSourceHints::new().removed(["x"]),
        t0 + ms(600),
    );

    let effects = tracker.tick(t0 + ms(1000));
    assert_eq!(effects, vec![TransitionEffect::FadeOutStarted("y")]);
    assert_eq!(tracker.phase_of(&"x"), Some(TransitionPhase::Deleting));

    let effects = tracker.tick(t0 + ms(1600));
    assert!(effects.contains(&TransitionEffect::FadeOutStarted("x")));
}

#[test]
fn test_removed_row_updated_record_is_kept() {
    let t0 = Instant::now();
    let mut tracker = tracker(rows(&["x"]), t0);
    let updated = vec![Row { id: "x", value: 7 }];
    tracker.update_data_source(updated, &DataSourceHints::new().removed(["x"]), t0);
    assert_eq!(tracker.visible()[0].value, 7);
}

// =============================================================================
// Cancellation
// =============================================================================

#[test]
fn test_clear_cancels_everything() {
    let t0 = Instant::now();
    let mut tracker = tracker(rows(&["x", "y"]), t0);
    tracker.update_data_source(
        rows(&["y", "w"]),
        &DataSourceHints::new().removed(["x"]).added(["w"]),
        t0,
    );
    assert!(tracker.has_pending());

    tracker.clear();
    assert!(!tracker.has_pending());
    assert_eq!(visible(&tracker), vec!["y", "w"]);
    assert!(tracker.tick(t0 + ms(10_000)).is_empty());
}

#[test]
fn test_cancel_unknown_key_is_noop() {
    let t0 = Instant::now();
    let mut tracker = tracker(rows(&["x"]), t0);
    tracker.cancel(&"nope");
    tracker.update_data_source(rows(&["x"]), &DataSourceHints::new().removed(["nope"]), t0);
    assert_eq!(visible(&tracker), vec!["x"]);
    assert!(!tracker.has_pending());
}
