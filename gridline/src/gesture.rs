//! Input the grid reacts to: drags, column-edge pointer sessions,
//! container resizes and scroll positions.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

/// A gesture reported by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureEvent<K> {
    /// A row drag began. `index` is relative to the rendered rows.
    DragStart { key: K, index: usize },
    /// A row drag ended. `destination` is `None` when dropped outside.
    DragEnd {
        source: usize,
        destination: Option<usize>,
    },
    /// Pointer pressed on the trailing edge of `column`.
    PointerDown { column: String, x: f64 },
    PointerMove { x: f64 },
    PointerUp,
    /// The container was resized to `width`.
    Resize { width: f64 },
    /// The scroll container moved.
    Scroll { top: f64, left: f64 },
}

/// Convert a terminal mouse event into a pointer gesture.
///
/// Columns are mapped to pixels with `cell_width`. `edge_at` resolves a
/// pixel position to the column whose resize edge lies under it.
pub fn from_mouse<K>(
    event: MouseEvent,
    cell_width: f64,
    edge_at: impl Fn(f64) -> Option<String>,
) -> Option<GestureEvent<K>> {
    let x = f64::from(event.column) * cell_width;
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            edge_at(x).map(|column| GestureEvent::PointerDown { column, x })
        }
        MouseEventKind::Drag(MouseButton::Left) => Some(GestureEvent::PointerMove { x }),
        MouseEventKind::Up(MouseButton::Left) => Some(GestureEvent::PointerUp),
        _ => None,
    }
}

/// Horizontal scrollbar track, in the same units as the pointer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HorizontalTrack {
    /// Left edge of the track.
    pub x: f64,
    /// Track length.
    pub width: f64,
    /// Handle start within the track.
    pub handle_pos: f64,
    pub handle_size: f64,
}

impl HorizontalTrack {
    /// Lay out a track for `content` wide content in a `viewport` wide
    /// container scrolled to `scroll_left`.
    pub fn new(x: f64, width: f64, content: f64, viewport: f64, scroll_left: f64) -> Self {
        if content <= viewport || content <= 0.0 {
            return Self {
                x,
                width,
                handle_pos: 0.0,
                handle_size: width,
            };
        }
        let handle_size = (width * viewport / content).max(1.0).min(width);
        let max_scroll = content - viewport;
        let ratio = (scroll_left / max_scroll).clamp(0.0, 1.0);
        Self {
            x,
            width,
            handle_pos: ratio * (width - handle_size),
            handle_size,
        }
    }

    pub fn handle_contains(&self, pointer_x: f64) -> bool {
        let rel = pointer_x - self.x;
        rel >= self.handle_pos && rel < self.handle_pos + self.handle_size
    }

    /// Where within the handle `pointer_x` grabbed it.
    pub fn grab_offset(&self, pointer_x: f64) -> f64 {
        (pointer_x - self.x - self.handle_pos).clamp(0.0, self.handle_size)
    }

    /// Scroll ratio (0.0 - 1.0) for a pointer at `pointer_x` holding the
    /// handle at `grab_offset`.
    pub fn ratio_at(&self, pointer_x: f64, grab_offset: f64) -> f64 {
        let track = self.width - self.handle_size;
        if track <= 0.0 {
            return 0.0;
        }
        ((pointer_x - self.x - grab_offset) / track).clamp(0.0, 1.0)
    }

    /// Translate a handle drag into a [`GestureEvent::Scroll`].
    pub fn drag_to<K>(
        &self,
        pointer_x: f64,
        grab_offset: f64,
        content: f64,
        viewport: f64,
        top: f64,
    ) -> GestureEvent<K> {
        let left = self.ratio_at(pointer_x, grab_offset) * (content - viewport).max(0.0);
        GestureEvent::Scroll { top, left }
    }
}
