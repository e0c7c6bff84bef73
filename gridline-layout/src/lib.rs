pub mod column;
pub mod error;
pub mod fixed;
pub mod width;
pub mod window;

pub use column::{validate_columns, Column, ColumnGroups, FixedSide};
pub use error::LayoutError;
pub use fixed::{FixedInput, FixedLayout, FixedOffset};
pub use width::{available_width, resolve_widths, ActionColumns, WidthMap};
pub use window::{
    HeightCache, RowWindowing, ScrollAlign, Viewport, VirtualWindow, WindowConfig,
    DEFAULT_OVERSCAN, DEFAULT_ROW_HEIGHT,
};
