//! Shared helpers for xlgrid integration tests.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    dead_code
)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use xlgrid::layout::{GridLayoutEngine, SizingDelegate};
use xlgrid::types::Size;

/// Widths used by the 3x4 reference grid
pub const WIDTHS_3X4: [f32; 4] = [50.0, 60.0, 70.0, 80.0];
pub const ROW_HEIGHT: f32 = 70.0;

/// Delegate that records every call it receives
pub struct CountingDelegate {
    widths: Vec<f32>,
    height: f32,
    calls: Cell<usize>,
    columns_seen: RefCell<Vec<usize>>,
}

impl CountingDelegate {
    pub fn new(widths: &[f32], height: f32) -> Rc<Self> {
        Rc::new(Self {
            widths: widths.to_vec(),
            height,
            calls: Cell::new(0),
            columns_seen: RefCell::new(Vec::new()),
        })
    }

    /// `n` columns, column `c` being `40 + 10 * (c % 4)` wide
    pub fn uniform(n: usize, height: f32) -> Rc<Self> {
        let widths: Vec<f32> = (0..n).map(|c| 40.0 + 10.0 * (c % 4) as f32).collect();
        Self::new(&widths, height)
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn columns_seen(&self) -> Vec<usize> {
        self.columns_seen.borrow().clone()
    }

    pub fn reset(&self) {
        self.calls.set(0);
        self.columns_seen.borrow_mut().clear();
    }
}

impl SizingDelegate for CountingDelegate {
    fn size_for_column(&self, column: usize) -> Size {
        self.calls.set(self.calls.get() + 1);
        self.columns_seen.borrow_mut().push(column);
        let width = self
            .widths
            .get(column)
            .or_else(|| self.widths.last())
            .copied()
            .unwrap_or(10.0);
        Size::new(width, self.height)
    }
}

/// Engine laid out with `delegate` at the given size and offset (0, 0)
pub fn built_engine(delegate: &Rc<CountingDelegate>, rows: usize, columns: usize) -> GridLayoutEngine {
    let mut engine = GridLayoutEngine::default();
    engine.set_delegate(delegate);
    engine.set_grid_dimensions(rows, columns);
    engine.relayout().expect("layout should succeed");
    engine
}

/// The 3x4 reference grid with widths [50, 60, 70, 80] and row height 70
pub fn reference_grid() -> (GridLayoutEngine, Rc<CountingDelegate>) {
    let delegate = CountingDelegate::new(&WIDTHS_3X4, ROW_HEIGHT);
    let engine = built_engine(&delegate, 3, 4);
    (engine, delegate)
}
