pub mod config;
pub mod controlled;
pub mod driver;
pub mod error;
pub mod events;
pub mod expansion;
pub mod gesture;
pub mod grid;
pub mod handle;
pub mod identity;
pub mod pagination;
pub mod render;
pub mod reorder;
pub mod resize;
pub mod selection;
pub mod sort;
pub mod transition;

pub use config::{ConfigError, GridConfig};
pub use error::GridError;
pub use grid::{Grid, GridBuilder, GridId};

pub use gridline_layout as layout;

pub mod prelude {
    pub use crate::config::{GridConfig, DEFAULT_FADE_OUT_DURATION, DEFAULT_HIGHLIGHT_DURATION};
    pub use crate::driver::TransitionDriver;
    pub use crate::error::GridError;
    pub use crate::events::{GridEvent, GridEventKind, SubscriptionId};
    pub use crate::gesture::{from_mouse, GestureEvent, HorizontalTrack};
    pub use crate::grid::{Grid, GridBuilder, GridId};
    pub use crate::handle::GridHandle;
    pub use crate::identity::{RowData, RowIdentity, RowKey};
    pub use crate::pagination::PageState;
    pub use crate::render::{HostRenderer, RenderColumn, RenderSnapshot, RenderedRow, RowFlags};
    pub use crate::selection::SelectionMode;
    pub use crate::sort::{SortDirection, SortMode, SortState};
    pub use crate::transition::{DataSourceHints, TransitionPhase};

    pub use gridline_layout::{Column, FixedSide, ScrollAlign, Viewport, VirtualWindow};
}
