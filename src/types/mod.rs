//! Data types for the grid layout.

mod cell;
mod geometry;

pub use cell::*;
pub use geometry::*;
