use std::time::Duration;

use gridline::prelude::*;
use gridline::ConfigError;

#[test]
fn test_defaults() {
    let config = GridConfig::default();
    assert_eq!(config.row_height, 48.0);
    assert_eq!(config.overscan, 5);
    assert_eq!(config.highlight_duration, DEFAULT_HIGHLIGHT_DURATION);
    assert_eq!(config.fade_out_duration, Duration::from_millis(300));
    assert_eq!(config.selection_mode, SelectionMode::None);
    assert!(config.validate().is_ok());
    assert_eq!(config.action_columns().total(), 0.0);
}

#[test]
fn test_parse_partial_json() {
    let config: GridConfig = serde_json::from_str(
        r#"{
            "virtualized": true,
            "row_height": 36,
            "highlight_ms": 600,
            "fade_out_ms": 150,
            "selection_mode": "multiple",
            "page_size": 25
        }"#,
    )
    .unwrap();

    assert!(config.virtualized);
    assert_eq!(config.row_height, 36.0);
    assert_eq!(config.highlight_duration, Duration::from_millis(600));
    assert_eq!(config.fade_out_duration, Duration::from_millis(150));
    assert_eq!(config.selection_mode, SelectionMode::Multiple);
    assert_eq!(config.page_size, Some(25));
    assert_eq!(config.overscan, 5);
}

#[test]
fn test_parse_rejects_unknown_mode() {
    let result: Result<GridConfig, _> = serde_json::from_str(r#"{"selection_mode": "some"}"#);
    assert!(result.is_err());
}

#[test]
fn test_validate() {
    assert_eq!(
        GridConfig::new().virtualized(-1.0).validate(),
        Err(ConfigError::InvalidRowHeight(-1.0))
    );
    assert_eq!(
        GridConfig::new().page_size(0).validate(),
        Err(ConfigError::ZeroPageSize)
    );

    let mut config = GridConfig::new();
    config.selection_column_width = f64::NAN;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidActionWidth {
            name: "selection_column_width",
            ..
        })
    ));
}

#[test]
fn test_action_columns_follow_features() {
    let config = GridConfig::new()
        .selection(SelectionMode::Single)
        .expandable()
        .drag_sort();
    let actions = config.action_columns();
    assert_eq!(actions.drag_handle, Some(32.0));
    assert_eq!(actions.selection, Some(48.0));
    assert_eq!(actions.expansion, Some(48.0));
    assert_eq!(actions.total(), 128.0);

    let virtualized = config.virtualized(40.0);
    assert_eq!(virtualized.action_columns().drag_handle, None);
}
