//! Layout engine for a spreadsheet-style grid with frozen panes.
//!
//! This module handles:
//! - Sizing columns through a host-supplied delegate (memoized)
//! - Computing every cell frame from column widths and a uniform row height
//! - Pinning the header row and leading column to the scroll offset
//! - Answering viewport queries for virtualized rendering

mod config;
mod grid_layout;
mod sizing;
mod viewport;

pub use config::{GridLayoutConfig, DEFAULT_CORNER_Z_INDEX, DEFAULT_EDGE_Z_INDEX};
pub use grid_layout::GridLayoutEngine;
pub use sizing::{FixedColumnWidths, LabelWidths, SizingDelegate, APPROX_CHAR_WIDTH};
pub use viewport::ViewportOffset;
