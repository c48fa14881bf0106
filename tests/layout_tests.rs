//! Frame generation and column sizing tests for xlgrid
//!
//! Tests frame positions, content extent, column-width memoization, delegate
//! call order, empty grids, and precondition failures.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_precision_loss
)]

mod common;

use common::{built_engine, reference_grid, CountingDelegate, ROW_HEIGHT, WIDTHS_3X4};
use test_case::test_case;
use xlgrid::layout::GridLayoutEngine;
use xlgrid::types::{Rect, Size};
use xlgrid::GridError;

// =============================================================================
// FRAME TESTS
// =============================================================================

#[test]
fn test_reference_frame() {
    let (engine, _delegate) = reference_grid();
    assert_eq!(
        engine.frame_for_cell(1, 2).unwrap(),
        Rect::new(110.0, 70.0, 70.0, 70.0)
    );
}

#[test_case(1, 1 => Rect::new(50.0, 70.0, 60.0, 70.0) ; "first body cell")]
#[test_case(1, 3 => Rect::new(180.0, 70.0, 80.0, 70.0) ; "last column")]
#[test_case(2, 2 => Rect::new(110.0, 140.0, 70.0, 70.0) ; "last row")]
#[test_case(0, 0 => Rect::new(0.0, 0.0, 50.0, 70.0) ; "corner at rest")]
#[test_case(2, 0 => Rect::new(0.0, 140.0, 50.0, 70.0) ; "leading column at rest")]
fn test_frames_at_rest(row: usize, column: usize) -> Rect {
    let (engine, _delegate) = reference_grid();
    engine.frame_for_cell(row, column).unwrap()
}

#[test]
fn test_rows_share_column_x_positions() {
    let (engine, _delegate) = reference_grid();
    for column in 1..4 {
        let x = engine.frame_for_cell(1, column).unwrap().x;
        for row in 2..3 {
            assert_eq!(engine.frame_for_cell(row, column).unwrap().x, x);
        }
    }
}

#[test]
fn test_frames_have_positive_size_and_non_negative_origin() {
    let delegate = CountingDelegate::uniform(7, 33.0);
    let engine = built_engine(&delegate, 9, 7);
    for row in 0..9 {
        for column in 0..7 {
            let frame = engine.frame_for_cell(row, column).unwrap();
            assert!(frame.x >= 0.0 && frame.y >= 0.0);
            assert!(frame.width > 0.0 && frame.height > 0.0);
        }
    }
}

#[test]
fn test_content_extent_matches_widths_and_rows() {
    let (engine, _delegate) = reference_grid();
    let sum: f32 = WIDTHS_3X4.iter().sum();
    assert_eq!(engine.content_extent(), Size::new(sum, 3.0 * ROW_HEIGHT));
}

#[test_case(1, 1)]
#[test_case(5, 3)]
#[test_case(40, 12)]
fn test_content_extent_property(rows: usize, columns: usize) {
    let delegate = CountingDelegate::uniform(columns, 25.0);
    let engine = built_engine(&delegate, rows, columns);
    let sum: f32 = engine.column_widths().iter().sum();
    assert_eq!(engine.content_extent().width, sum);
    assert_eq!(engine.content_extent().height, rows as f32 * 25.0);
}

#[test]
fn test_row_height_is_tallest_reported() {
    use std::rc::Rc;

    let delegate = Rc::new(|column: usize| Size::new(40.0, if column == 2 { 90.0 } else { 30.0 }));
    let mut engine = GridLayoutEngine::default();
    engine.set_delegate(&delegate);
    engine.set_grid_dimensions(2, 4);
    engine.relayout().unwrap();
    assert_eq!(engine.row_height(), 90.0);
    assert_eq!(engine.frame_for_cell(1, 1).unwrap().height, 90.0);
    assert_eq!(engine.content_extent().height, 180.0);
}

// =============================================================================
// SIZING DELEGATE TESTS
// =============================================================================

#[test]
fn test_delegate_called_once_per_column_in_order() {
    let (_engine, delegate) = reference_grid();
    assert_eq!(delegate.calls(), 4);
    assert_eq!(delegate.columns_seen(), vec![0, 1, 2, 3]);
}

#[test]
fn test_widths_stable_across_relayouts() {
    let (mut engine, delegate) = reference_grid();
    for i in 0..10 {
        engine.set_viewport_offset(i as f32 * 3.0, i as f32 * 5.0);
        engine.relayout().unwrap();
    }
    assert_eq!(delegate.calls(), 4);
    assert_eq!(engine.column_widths(), &WIDTHS_3X4);
}

#[test]
fn test_row_change_regenerates_without_resizing() {
    let (mut engine, delegate) = reference_grid();
    engine.set_grid_dimensions(6, 4);
    engine.relayout().unwrap();
    assert_eq!(delegate.calls(), 4);
    assert_eq!(
        engine.frame_for_cell(5, 3).unwrap(),
        Rect::new(180.0, 350.0, 80.0, 70.0)
    );
    assert_eq!(engine.content_extent().height, 420.0);
}

#[test]
fn test_column_change_resizes() {
    let (mut engine, delegate) = reference_grid();
    delegate.reset();
    engine.set_grid_dimensions(3, 3);
    engine.relayout().unwrap();
    assert_eq!(delegate.columns_seen(), vec![0, 1, 2]);
    assert_eq!(engine.content_extent().width, 180.0);
    assert!(engine.frame_for_cell(0, 3).is_err());
}

#[test]
fn test_same_dimensions_are_not_structural() {
    let (mut engine, delegate) = reference_grid();
    let version = engine.structure_version();
    engine.set_grid_dimensions(3, 4);
    engine.relayout().unwrap();
    assert_eq!(engine.structure_version(), version);
    assert_eq!(delegate.calls(), 4);
}

// =============================================================================
// EMPTY GRID TESTS
// =============================================================================

#[test]
fn test_zero_columns() {
    let delegate = CountingDelegate::new(&[], ROW_HEIGHT);
    let engine = built_engine(&delegate, 5, 0);
    assert_eq!(delegate.calls(), 0);
    assert_eq!(engine.content_extent(), Size::ZERO);
    assert!(engine
        .cells_intersecting(&Rect::new(-1000.0, -1000.0, 5000.0, 5000.0))
        .is_empty());
    assert!(matches!(
        engine.frame_for_cell(0, 0),
        Err(GridError::OutOfRange { .. })
    ));
}

#[test]
fn test_zero_columns_without_delegate() {
    let mut engine = GridLayoutEngine::default();
    engine.set_grid_dimensions(3, 0);
    assert!(engine.relayout().is_ok());
    assert!(engine.is_built());
    assert_eq!(engine.content_extent(), Size::ZERO);
}

#[test]
fn test_zero_rows() {
    let delegate = CountingDelegate::new(&WIDTHS_3X4, ROW_HEIGHT);
    let engine = built_engine(&delegate, 0, 4);
    assert_eq!(delegate.calls(), 0);
    assert_eq!(engine.content_extent(), Size::ZERO);
}

#[test]
fn test_growing_from_empty() {
    let delegate = CountingDelegate::new(&WIDTHS_3X4, ROW_HEIGHT);
    let mut engine = built_engine(&delegate, 3, 0);
    engine.set_grid_dimensions(3, 4);
    engine.relayout().unwrap();
    assert_eq!(delegate.calls(), 4);
    assert_eq!(engine.content_extent(), Size::new(260.0, 210.0));
}

// =============================================================================
// ERROR TESTS
// =============================================================================

#[test]
fn test_missing_delegate_is_precondition() {
    let mut engine = GridLayoutEngine::default();
    engine.set_grid_dimensions(3, 4);
    let err = engine.relayout().unwrap_err();
    assert_eq!(err, GridError::MissingDelegate);
    assert!(err.is_precondition());
}

#[test_case(3, 0 ; "row past end")]
#[test_case(0, 4 ; "column past end")]
#[test_case(99, 99 ; "both past end")]
fn test_out_of_range(row: usize, column: usize) {
    let (engine, _delegate) = reference_grid();
    let err = engine.frame_for_cell(row, column).unwrap_err();
    assert_eq!(
        err,
        GridError::OutOfRange {
            row,
            column,
            rows: 3,
            columns: 4
        }
    );
    assert!(!err.is_precondition());
}

#[test]
fn test_ragged_rows_rejected() {
    let mut engine = GridLayoutEngine::default();
    let err = engine.set_grid_from_row_lengths(&[4, 4, 3, 4]).unwrap_err();
    assert_eq!(
        err,
        GridError::RaggedRows {
            row: 2,
            expected: 4,
            found: 3
        }
    );
    assert!(err.is_precondition());
    assert_eq!(engine.row_count(), 0);
    assert_eq!(engine.column_count(), 0);
}

#[test]
fn test_uniform_row_lengths_accepted() {
    let delegate = CountingDelegate::new(&WIDTHS_3X4, ROW_HEIGHT);
    let mut engine = GridLayoutEngine::default();
    engine.set_delegate(&delegate);
    engine.set_grid_from_row_lengths(&[4, 4, 4]).unwrap();
    assert_eq!((engine.row_count(), engine.column_count()), (3, 4));
    engine.relayout().unwrap();
    assert_eq!(
        engine.frame_for_cell(1, 2).unwrap(),
        Rect::new(110.0, 70.0, 70.0, 70.0)
    );
}
