//! Column sizing delegates.
//!
//! The engine asks a [`SizingDelegate`] for each column's natural size once
//! per full regeneration. What a column's size should be (widest label,
//! fixed minimum, ...) is entirely the host's business.

use crate::types::Size;

/// Supplies the natural size of every column.
///
/// Called synchronously during layout, in ascending column order, with
/// `column` in `0..column_count`. Never called when the grid has no columns.
/// Implementations must not block.
pub trait SizingDelegate {
    fn size_for_column(&self, column: usize) -> Size;
}

impl<F> SizingDelegate for F
where
    F: Fn(usize) -> Size,
{
    fn size_for_column(&self, column: usize) -> Size {
        self(column)
    }
}

/// Delegate backed by a precomputed list of widths and a shared row height.
///
/// Columns past the end of the list reuse the last width.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedColumnWidths {
    widths: Vec<f32>,
    row_height: f32,
}

impl FixedColumnWidths {
    pub fn new(widths: Vec<f32>, row_height: f32) -> Self {
        Self { widths, row_height }
    }

    pub fn widths(&self) -> &[f32] {
        &self.widths
    }
}

impl SizingDelegate for FixedColumnWidths {
    fn size_for_column(&self, column: usize) -> Size {
        let width = self
            .widths
            .get(column)
            .or_else(|| self.widths.last())
            .copied()
            .unwrap_or(0.0);
        Size::new(width, self.row_height)
    }
}

/// Approximate glyph advance for proportional UI text at 17px
pub const APPROX_CHAR_WIDTH: f32 = 9.0;

/// Sizes each column to fit its longest label plus horizontal padding.
///
/// Text is measured by character count, which is enough for hosts that do
/// not have a font rasterizer at layout time.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelWidths {
    columns: Vec<Vec<String>>,
    char_width: f32,
    padding: f32,
    row_height: f32,
}

impl LabelWidths {
    /// `columns[c]` holds every label that will appear in column `c`.
    pub fn new(columns: Vec<Vec<String>>, padding: f32, row_height: f32) -> Self {
        Self {
            columns,
            char_width: APPROX_CHAR_WIDTH,
            padding,
            row_height,
        }
    }

    #[must_use]
    pub fn with_char_width(mut self, char_width: f32) -> Self {
        self.char_width = char_width;
        self
    }

    fn measure(&self, text: &str) -> f32 {
        let chars = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
        f32::from(chars) * self.char_width
    }
}

impl SizingDelegate for LabelWidths {
    fn size_for_column(&self, column: usize) -> Size {
        let widest = self
            .columns
            .get(column)
            .map(|labels| labels.iter().map(|l| self.measure(l)).fold(0.0, f32::max))
            .unwrap_or(0.0);
        Size::new(widest + self.padding, self.row_height)
    }
}
