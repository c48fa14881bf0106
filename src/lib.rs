//! xlgrid - spreadsheet-style grid layout with frozen panes
//!
//! Computes cell frames for a `rows x columns` grid where the header row and
//! the leading column stay pinned while the body scrolls beneath them:
//! - Column widths come from a host delegate, queried once per structure
//! - Uniform row height, pixel-snapped frames
//! - Cheap re-pinning on scroll, full regeneration on structural change
//! - Viewport queries for virtualized rendering
//!
//! # Usage
//!
//! ```
//! use std::rc::Rc;
//! use xlgrid::layout::{FixedColumnWidths, GridLayoutEngine};
//! use xlgrid::types::Rect;
//!
//! let widths = Rc::new(FixedColumnWidths::new(vec![50.0, 60.0, 70.0, 80.0], 70.0));
//! let mut engine = GridLayoutEngine::default();
//! engine.set_delegate(&widths);
//! engine.set_grid_dimensions(3, 4);
//! engine.relayout()?;
//! assert_eq!(engine.frame_for_cell(1, 2)?, Rect::new(110.0, 70.0, 70.0, 70.0));
//!
//! engine.set_viewport_offset(15.0, 30.0);
//! engine.relayout()?;
//! assert_eq!(engine.frame_for_cell(0, 2)?, Rect::new(110.0, 30.0, 70.0, 70.0));
//! # Ok::<(), xlgrid::error::GridError>(())
//! ```

pub mod bindings;
pub mod error;
pub mod layout;
pub mod types;

use wasm_bindgen::prelude::*;

pub use bindings::GridLayoutHandle;
pub use error::{GridError, Result};
pub use layout::{GridLayoutConfig, GridLayoutEngine, SizingDelegate, ViewportOffset};
pub use types::*;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
