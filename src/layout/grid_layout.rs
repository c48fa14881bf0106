//! Frozen-pane grid layout.
//!
//! Lays out `rows x columns` cells from per-column widths and a uniform row
//! height, then re-anchors the header row and the leading column to the
//! current scroll offset so they stay on screen like Excel's frozen panes.
//!
//! Re-layout comes in two flavours:
//! - full regeneration when the structure changed (dimensions, explicit
//!   invalidation, first layout): every frame is rebuilt
//! - incremental pass on scroll: only the pinned cells move, O(rows + columns)

use std::rc::{Rc, Weak};

use super::config::GridLayoutConfig;
use super::sizing::SizingDelegate;
use super::viewport::ViewportOffset;
use crate::error::{GridError, Result};
use crate::types::{CellFrame, LayoutAttributes, Rect, Size, ZTier};

/// Layout engine for a grid with a frozen header row and leading column
pub struct GridLayoutEngine {
    config: GridLayoutConfig,
    /// Non-owning; the host keeps the delegate alive
    delegate: Option<Weak<dyn SizingDelegate>>,
    row_count: usize,
    column_count: usize,
    offset: ViewportOffset,
    /// Bumped on every structural change
    structure_version: u64,
    /// Version the current table was built for (`None` = unbuilt)
    built_version: Option<u64>,
    /// Memoized column widths, one per column
    column_widths: Vec<f32>,
    /// Set by `invalidate`; widths are replaced on the next successful sizing
    widths_stale: bool,
    /// Tallest height reported by the delegate in the last sizing pass
    natural_row_height: f32,
    /// Row-major cell table, `table_rows * table_columns` entries
    cells: Vec<CellFrame>,
    table_rows: usize,
    table_columns: usize,
    /// Indices into `cells` of the header row and leading column
    pinned: Vec<usize>,
    content: Size,
}

impl Default for GridLayoutEngine {
    fn default() -> Self {
        Self::new(GridLayoutConfig::default())
    }
}

impl std::fmt::Debug for GridLayoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridLayoutEngine")
            .field("row_count", &self.row_count)
            .field("column_count", &self.column_count)
            .field("offset", &self.offset)
            .field("structure_version", &self.structure_version)
            .field("built_version", &self.built_version)
            .field("content", &self.content)
            .finish_non_exhaustive()
    }
}

impl GridLayoutEngine {
    pub fn new(config: GridLayoutConfig) -> Self {
        Self {
            config,
            delegate: None,
            row_count: 0,
            column_count: 0,
            offset: ViewportOffset::default(),
            structure_version: 0,
            built_version: None,
            column_widths: Vec::new(),
            widths_stale: false,
            natural_row_height: 0.0,
            cells: Vec::new(),
            table_rows: 0,
            table_columns: 0,
            pinned: Vec::new(),
            content: Size::ZERO,
        }
    }

    pub fn config(&self) -> &GridLayoutConfig {
        &self.config
    }

    /// Attach the sizing delegate.
    ///
    /// Only a weak handle is kept: dropping the last `Rc` on the host side
    /// detaches the delegate. Already memoized widths stay valid; call
    /// [`invalidate`](Self::invalidate) to have a new delegate re-size columns.
    pub fn set_delegate<D: SizingDelegate + 'static>(&mut self, delegate: &Rc<D>) {
        let strong: Rc<D> = Rc::clone(delegate);
        let strong: Rc<dyn SizingDelegate> = strong;
        self.delegate = Some(Rc::downgrade(&strong));
    }

    pub fn clear_delegate(&mut self) {
        self.delegate = None;
    }

    /// True if a delegate is attached and still alive
    pub fn has_delegate(&self) -> bool {
        self.delegate
            .as_ref()
            .is_some_and(|weak| weak.strong_count() > 0)
    }

    /// Set the grid dimensions. Any change is a structural change.
    pub fn set_grid_dimensions(&mut self, row_count: usize, column_count: usize) {
        if row_count != self.row_count || column_count != self.column_count {
            self.row_count = row_count;
            self.column_count = column_count;
            self.structure_version += 1;
        }
    }

    /// Set dimensions from per-row item counts, rejecting ragged grids.
    ///
    /// The column count is taken from the first row and every other row must
    /// match it.
    ///
    /// # Errors
    /// Returns [`GridError::RaggedRows`] for the first row that deviates.
    /// Dimensions are left untouched in that case.
    pub fn set_grid_from_row_lengths(&mut self, row_lengths: &[usize]) -> Result<()> {
        let expected = row_lengths.first().copied().unwrap_or(0);
        if let Some((row, &found)) = row_lengths
            .iter()
            .enumerate()
            .find(|&(_, &len)| len != expected)
        {
            return Err(GridError::RaggedRows {
                row,
                expected,
                found,
            });
        }
        self.set_grid_dimensions(row_lengths.len(), expected);
        Ok(())
    }

    pub fn set_viewport_offset(&mut self, x: f32, y: f32) {
        self.offset = ViewportOffset::new(x, y);
    }

    pub fn viewport_offset(&self) -> ViewportOffset {
        self.offset
    }

    /// Force the next [`relayout`](Self::relayout) to regenerate everything,
    /// column widths included.
    ///
    /// The memoized widths stay readable until the delegate has produced a
    /// replacement, so a failed relayout leaves widths and table in step.
    pub fn invalidate(&mut self) {
        self.widths_stale = true;
        self.structure_version += 1;
    }

    /// Drop the table and memoized widths, returning to the unbuilt state
    pub fn teardown(&mut self) {
        self.column_widths.clear();
        self.widths_stale = false;
        self.natural_row_height = 0.0;
        self.clear_table();
        self.built_version = None;
    }

    /// Scrolling always requires re-pinning the frozen cells
    pub fn should_relayout_for_bounds_change(&self, _new_bounds: Rect) -> bool {
        true
    }

    /// Bring the layout up to date with the current dimensions and offset.
    ///
    /// Runs a full regeneration if the structure changed since the table was
    /// built, otherwise only re-pins the header row and leading column.
    ///
    /// # Errors
    /// Returns a precondition error if columns need sizing and no live
    /// delegate is attached, or if the delegate reports an unusable size. The
    /// previous table is kept and the next call retries the regeneration.
    pub fn relayout(&mut self) -> Result<()> {
        if self.built_version == Some(self.structure_version) {
            self.reposition_frozen();
            Ok(())
        } else {
            self.regenerate()
        }
    }

    pub fn is_built(&self) -> bool {
        self.built_version.is_some()
    }

    pub fn structure_version(&self) -> u64 {
        self.structure_version
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn column_widths(&self) -> &[f32] {
        &self.column_widths
    }

    /// Height used for every row, 0 until the first sizing pass
    pub fn row_height(&self) -> f32 {
        self.config.row_height.unwrap_or(self.natural_row_height)
    }

    /// Total scrollable size
    pub fn content_extent(&self) -> Size {
        self.content
    }

    /// Laid-out cell at (row, column)
    ///
    /// # Errors
    /// Returns [`GridError::OutOfRange`] if the cell is outside the current
    /// table or the grid has not been laid out at that size yet.
    pub fn cell_frame(&self, row: usize, column: usize) -> Result<CellFrame> {
        let rows = self.table_rows.min(self.row_count);
        let columns = self.table_columns.min(self.column_count);
        let out_of_range = GridError::OutOfRange {
            row,
            column,
            rows,
            columns,
        };
        if row >= rows || column >= columns {
            return Err(out_of_range);
        }
        self.cells
            .get(row * self.table_columns + column)
            .copied()
            .ok_or(out_of_range)
    }

    /// Frame of the cell at (row, column)
    ///
    /// # Errors
    /// See [`cell_frame`](Self::cell_frame).
    pub fn frame_for_cell(&self, row: usize, column: usize) -> Result<Rect> {
        self.cell_frame(row, column).map(|cell| cell.frame)
    }

    /// Frame and numeric z-index of the cell at (row, column)
    ///
    /// # Errors
    /// See [`cell_frame`](Self::cell_frame).
    pub fn layout_attributes_for_cell(&self, row: usize, column: usize) -> Result<LayoutAttributes> {
        self.cell_frame(row, column)
            .map(|cell| self.to_attributes(&cell))
    }

    /// Every cell whose frame overlaps `rect` with positive area, row-major.
    ///
    /// Bounded like [`cell_frame`](Self::cell_frame): cells of a stale table
    /// outside the current dimensions are never reported.
    pub fn cells_intersecting(&self, rect: &Rect) -> Vec<CellFrame> {
        let hits: Vec<CellFrame> = self
            .cells
            .iter()
            .filter(|cell| cell.row < self.row_count && cell.column < self.column_count)
            .filter(|cell| cell.frame.intersects(rect))
            .copied()
            .collect();
        tracing::trace!(?rect, hits = hits.len(), "cells intersecting");
        hits
    }

    /// [`cells_intersecting`](Self::cells_intersecting) as layout attributes
    pub fn attributes_intersecting(&self, rect: &Rect) -> Vec<LayoutAttributes> {
        self.cells_intersecting(rect)
            .iter()
            .map(|cell| self.to_attributes(cell))
            .collect()
    }

    /// Cells visible in a viewport of `size` at the current offset
    pub fn visible_cells(&self, size: Size) -> Vec<CellFrame> {
        self.cells_intersecting(&self.offset.visible_rect(size))
    }

    fn to_attributes(&self, cell: &CellFrame) -> LayoutAttributes {
        LayoutAttributes {
            row: cell.row,
            column: cell.column,
            frame: cell.frame,
            z_index: self.config.z_index(cell.tier),
        }
    }

    fn clear_table(&mut self) {
        self.cells.clear();
        self.pinned.clear();
        self.table_rows = 0;
        self.table_columns = 0;
        self.content = Size::ZERO;
    }

    fn regenerate(&mut self) -> Result<()> {
        self.config.validate()?;

        let rows = self.row_count;
        let columns = self.column_count;

        if rows == 0 || columns == 0 {
            self.clear_table();
            self.table_rows = rows;
            self.table_columns = columns;
            self.built_version = Some(self.structure_version);
            tracing::debug!(rows, columns, "grid is empty, nothing to lay out");
            return Ok(());
        }

        self.ensure_column_widths()?;
        let row_height = self.row_height();

        let mut cells = Vec::with_capacity(rows * columns);
        let mut pinned = Vec::with_capacity(rows + columns - 1);
        let mut y_offset = 0.0_f32;
        let mut content_width = 0.0_f32;

        for row in 0..rows {
            let mut x_offset = 0.0_f32;
            for (column, &width) in self.column_widths.iter().enumerate() {
                let mut frame = Rect::new(x_offset, y_offset, width, row_height);
                if self.config.round_to_pixels {
                    frame = frame.integral();
                }
                let mut cell = CellFrame {
                    row,
                    column,
                    frame,
                    tier: ZTier::for_cell(row, column),
                };
                if cell.index().is_frozen() {
                    pin(&mut cell, self.offset);
                    pinned.push(cells.len());
                }
                cells.push(cell);
                x_offset += width;
            }
            content_width = content_width.max(x_offset);
            y_offset += row_height;
        }

        self.cells = cells;
        self.pinned = pinned;
        self.table_rows = rows;
        self.table_columns = columns;
        self.content = Size::new(content_width, y_offset);
        self.built_version = Some(self.structure_version);

        tracing::debug!(
            rows,
            columns,
            version = self.structure_version,
            content_width,
            content_height = y_offset,
            "regenerated grid layout"
        );
        Ok(())
    }

    /// Query the delegate for every column unless the memoized widths still
    /// match the column count.
    fn ensure_column_widths(&mut self) -> Result<()> {
        if !self.widths_stale && self.column_widths.len() == self.column_count {
            return Ok(());
        }

        let Some(weak) = self.delegate.as_ref() else {
            return Err(GridError::MissingDelegate);
        };
        let Some(delegate) = weak.upgrade() else {
            tracing::warn!("sizing delegate was dropped before layout");
            return Err(GridError::MissingDelegate);
        };

        let mut widths = Vec::with_capacity(self.column_count);
        let mut tallest = 0.0_f32;
        for column in 0..self.column_count {
            let size = delegate.size_for_column(column);
            if !size.is_positive() {
                return Err(GridError::InvalidColumnSize {
                    column,
                    width: size.width,
                    height: size.height,
                });
            }
            widths.push(size.width);
            tallest = tallest.max(size.height);
        }

        tracing::debug!(columns = self.column_count, row_height = tallest, "sized columns");
        self.column_widths = widths;
        self.widths_stale = false;
        self.natural_row_height = tallest;
        Ok(())
    }

    fn reposition_frozen(&mut self) {
        let offset = self.offset;
        for &index in &self.pinned {
            if let Some(cell) = self.cells.get_mut(index) {
                pin(cell, offset);
            }
        }
        tracing::trace!(x = offset.x, y = offset.y, pinned = self.pinned.len(), "re-pinned frozen cells");
    }
}

/// Anchor header-row cells to the top of the viewport and leading-column
/// cells to its left edge. The corner gets both.
fn pin(cell: &mut CellFrame, offset: ViewportOffset) {
    if cell.row == 0 {
        cell.frame.y = offset.y;
    }
    if cell.column == 0 {
        cell.frame.x = offset.x;
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::layout::FixedColumnWidths;

    fn engine_3x4() -> (GridLayoutEngine, Rc<FixedColumnWidths>) {
        let delegate = Rc::new(FixedColumnWidths::new(vec![50.0, 60.0, 70.0, 80.0], 70.0));
        let mut engine = GridLayoutEngine::default();
        engine.set_delegate(&delegate);
        engine.set_grid_dimensions(3, 4);
        engine.relayout().unwrap();
        (engine, delegate)
    }

    #[test]
    fn test_unbuilt_engine() {
        let engine = GridLayoutEngine::default();
        assert!(!engine.is_built());
        assert_eq!(engine.content_extent(), Size::ZERO);
        assert!(engine.frame_for_cell(0, 0).is_err());
        assert!(engine.cells_intersecting(&Rect::new(0.0, 0.0, 1e6, 1e6)).is_empty());
    }

    #[test]
    fn test_basic_frames() {
        let (engine, _delegate) = engine_3x4();
        assert!(engine.is_built());
        assert_eq!(engine.frame_for_cell(1, 2).unwrap(), Rect::new(110.0, 70.0, 70.0, 70.0));
        assert_eq!(engine.frame_for_cell(2, 3).unwrap(), Rect::new(180.0, 140.0, 80.0, 70.0));
        assert_eq!(engine.content_extent(), Size::new(260.0, 210.0));
        assert_eq!(engine.row_height(), 70.0);
    }

    #[test]
    fn test_pinned_index_cache() {
        let (engine, _delegate) = engine_3x4();
        // Row 0 has 4 cells, rows 1 and 2 contribute their leading cell
        assert_eq!(engine.pinned, vec![0, 1, 2, 3, 4, 8]);
    }

    #[test]
    fn test_missing_delegate() {
        let mut engine = GridLayoutEngine::default();
        engine.set_grid_dimensions(2, 2);
        let err = engine.relayout().unwrap_err();
        assert_eq!(err, GridError::MissingDelegate);
        assert!(err.is_precondition());
        assert!(!engine.is_built());
    }

    #[test]
    fn test_dropped_delegate() {
        let mut engine = GridLayoutEngine::default();
        {
            let delegate = Rc::new(FixedColumnWidths::new(vec![10.0], 10.0));
            engine.set_delegate(&delegate);
            assert!(engine.has_delegate());
        }
        assert!(!engine.has_delegate());
        engine.set_grid_dimensions(1, 1);
        assert_eq!(engine.relayout(), Err(GridError::MissingDelegate));
    }

    #[test]
    fn test_invalid_column_size() {
        let delegate = Rc::new(|column: usize| Size::new(if column == 1 { 0.0 } else { 40.0 }, 20.0));
        let mut engine = GridLayoutEngine::default();
        engine.set_delegate(&delegate);
        engine.set_grid_dimensions(2, 3);
        let err = engine.relayout().unwrap_err();
        assert!(matches!(err, GridError::InvalidColumnSize { column: 1, .. }));
        assert!(engine.column_widths().is_empty());
    }

    #[test]
    fn test_failed_regeneration_keeps_previous_table() {
        let (mut engine, _delegate) = engine_3x4();
        engine.clear_delegate();
        engine.set_grid_dimensions(3, 5);
        assert!(engine.relayout().is_err());
        // Stale table still answers for cells inside both shapes
        assert_eq!(engine.frame_for_cell(1, 2).unwrap(), Rect::new(110.0, 70.0, 70.0, 70.0));
        assert!(engine.frame_for_cell(1, 4).is_err());
    }

    #[test]
    fn test_shrink_reports_out_of_range_before_relayout() {
        let (mut engine, _delegate) = engine_3x4();
        engine.set_grid_dimensions(2, 4);
        assert!(matches!(
            engine.frame_for_cell(2, 0),
            Err(GridError::OutOfRange { rows: 2, .. })
        ));
    }

    #[test]
    fn test_shrunk_grid_query_matches_frame_lookup() {
        let (mut engine, _delegate) = engine_3x4();
        engine.set_grid_dimensions(2, 4);
        let hits = engine.cells_intersecting(&Rect::new(0.0, 0.0, 1000.0, 1000.0));
        assert_eq!(hits.len(), 8);
        assert!(hits.iter().all(|cell| cell.row < 2));
        for cell in &hits {
            assert!(engine.frame_for_cell(cell.row, cell.column).is_ok());
        }
    }

    #[test]
    fn test_failed_regeneration_query_ignores_stale_columns() {
        let (mut engine, _delegate) = engine_3x4();
        engine.clear_delegate();
        engine.set_grid_dimensions(3, 3);
        assert!(engine.relayout().is_err());
        let hits = engine.cells_intersecting(&Rect::new(0.0, 0.0, 1000.0, 1000.0));
        assert_eq!(hits.len(), 9);
        assert!(hits.iter().all(|cell| cell.column < 3));
    }

    #[test]
    fn test_non_positive_row_height_override_rejected() {
        for height in [-10.0, 0.0, f32::NAN] {
            let delegate = Rc::new(FixedColumnWidths::new(vec![50.0, 60.0], 70.0));
            let config = GridLayoutConfig {
                row_height: Some(height),
                ..GridLayoutConfig::default()
            };
            let mut engine = GridLayoutEngine::new(config);
            engine.set_delegate(&delegate);
            engine.set_grid_dimensions(3, 2);
            assert!(matches!(engine.relayout(), Err(GridError::Config(_))));
            assert!(!engine.is_built());
            assert_eq!(engine.content_extent(), Size::ZERO);
            assert!(engine.frame_for_cell(2, 1).is_err());
        }
    }

    #[test]
    fn test_inverted_z_indices_rejected() {
        let delegate = Rc::new(FixedColumnWidths::new(vec![50.0, 60.0], 70.0));
        let config = GridLayoutConfig {
            corner_z_index: 0,
            edge_z_index: 1023,
            normal_z_index: 1024,
            ..GridLayoutConfig::default()
        };
        let mut engine = GridLayoutEngine::new(config);
        engine.set_delegate(&delegate);
        engine.set_grid_dimensions(2, 2);
        assert!(matches!(engine.relayout(), Err(GridError::Config(_))));
        assert!(engine.layout_attributes_for_cell(0, 0).is_err());
    }

    #[test]
    fn test_failed_invalidation_keeps_widths_with_table() {
        let (mut engine, delegate) = engine_3x4();
        engine.invalidate();
        drop(delegate);
        assert_eq!(engine.relayout(), Err(GridError::MissingDelegate));
        assert_eq!(engine.column_widths(), &[50.0, 60.0, 70.0, 80.0]);
        assert_eq!(engine.frame_for_cell(1, 2).unwrap(), Rect::new(110.0, 70.0, 70.0, 70.0));
    }

    #[test]
    fn test_invalidate_replaces_widths_once_sized() {
        let (mut engine, _delegate) = engine_3x4();
        let wider = Rc::new(FixedColumnWidths::new(vec![100.0; 4], 70.0));
        engine.set_delegate(&wider);
        engine.invalidate();
        engine.relayout().unwrap();
        assert_eq!(engine.column_widths(), &[100.0; 4]);
        engine.set_viewport_offset(5.0, 5.0);
        engine.relayout().unwrap();
        assert_eq!(engine.content_extent(), Size::new(400.0, 210.0));
    }

    #[test]
    fn test_config_row_height_override() {
        let delegate = Rc::new(FixedColumnWidths::new(vec![50.0, 60.0], 70.0));
        let config = GridLayoutConfig {
            row_height: Some(32.0),
            ..GridLayoutConfig::default()
        };
        let mut engine = GridLayoutEngine::new(config);
        engine.set_delegate(&delegate);
        engine.set_grid_dimensions(3, 2);
        engine.relayout().unwrap();
        assert_eq!(engine.frame_for_cell(2, 1).unwrap(), Rect::new(50.0, 64.0, 60.0, 32.0));
        assert_eq!(engine.content_extent(), Size::new(110.0, 96.0));
    }

    #[test]
    fn test_fractional_widths_round_without_seams() {
        let delegate = Rc::new(FixedColumnWidths::new(vec![10.5, 10.5, 10.5], 20.0));
        let mut engine = GridLayoutEngine::default();
        engine.set_delegate(&delegate);
        engine.set_grid_dimensions(2, 3);
        engine.relayout().unwrap();
        let first = engine.frame_for_cell(1, 1).unwrap();
        let second = engine.frame_for_cell(1, 2).unwrap();
        assert_eq!(first, Rect::new(10.0, 20.0, 11.0, 20.0));
        assert_eq!(second, Rect::new(21.0, 20.0, 11.0, 20.0));
        assert!(first.max_x() >= second.x);
    }

    #[test]
    fn test_unrounded_frames() {
        let delegate = Rc::new(FixedColumnWidths::new(vec![10.5, 10.5], 20.0));
        let config = GridLayoutConfig {
            round_to_pixels: false,
            ..GridLayoutConfig::default()
        };
        let mut engine = GridLayoutEngine::new(config);
        engine.set_delegate(&delegate);
        engine.set_grid_dimensions(2, 2);
        engine.relayout().unwrap();
        assert_eq!(engine.frame_for_cell(1, 1).unwrap(), Rect::new(10.5, 20.0, 10.5, 20.0));
    }

    #[test]
    fn test_layout_attributes_z_index() {
        let (engine, _delegate) = engine_3x4();
        assert_eq!(engine.layout_attributes_for_cell(0, 0).unwrap().z_index, 1024);
        assert_eq!(engine.layout_attributes_for_cell(0, 2).unwrap().z_index, 1023);
        assert_eq!(engine.layout_attributes_for_cell(2, 0).unwrap().z_index, 1023);
        assert_eq!(engine.layout_attributes_for_cell(1, 1).unwrap().z_index, 0);
    }

    #[test]
    fn test_teardown() {
        let (mut engine, _delegate) = engine_3x4();
        engine.teardown();
        assert!(!engine.is_built());
        assert!(engine.column_widths().is_empty());
        assert_eq!(engine.content_extent(), Size::ZERO);
        engine.relayout().unwrap();
        assert!(engine.is_built());
        assert_eq!(engine.content_extent(), Size::new(260.0, 210.0));
    }

    #[test]
    fn test_bounds_change_always_relayouts() {
        let (engine, _delegate) = engine_3x4();
        assert!(engine.should_relayout_for_bounds_change(Rect::new(15.0, 30.0, 320.0, 480.0)));
    }
}
