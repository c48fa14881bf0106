//! Viewport offset supplied by the host on every scroll.

use serde::{Deserialize, Serialize};

use crate::types::{Point, Rect, Size};

/// Current scroll position in content coordinates.
///
/// Owned by the host and pushed into the engine; the engine only reads it
/// when re-pinning the frozen header row and leading column.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportOffset {
    /// Horizontal scroll position
    pub x: f32,
    /// Vertical scroll position
    pub y: f32,
}

impl ViewportOffset {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn as_point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Clamp the offset so the viewport never scrolls past the content.
    ///
    /// Minimum is the content origin; maximum lets the far edge of the
    /// content line up with the far edge of the viewport. Content smaller
    /// than the viewport cannot scroll at all on that axis.
    #[must_use]
    pub fn clamped(&self, content: Size, viewport: Size) -> Self {
        let max_x = (content.width - viewport.width).max(0.0);
        let max_y = (content.height - viewport.height).max(0.0);
        Self {
            x: self.x.clamp(0.0, max_x),
            y: self.y.clamp(0.0, max_y),
        }
    }

    /// Offset moved by a scroll delta, then clamped
    #[must_use]
    pub fn scrolled_by(&self, delta_x: f32, delta_y: f32, content: Size, viewport: Size) -> Self {
        Self::new(self.x + delta_x, self.y + delta_y).clamped(content, viewport)
    }

    /// Visible rectangle of a viewport of the given size at this offset
    pub fn visible_rect(&self, viewport: Size) -> Rect {
        Rect::from_origin_size(self.as_point(), viewport)
    }
}
