use serde::{Deserialize, Serialize};

use super::Rect;

/// Row/column position of a cell (0-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellIndex {
    pub row: usize,
    pub column: usize,
}

impl CellIndex {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// True for cells in the header row or the leading column
    pub fn is_frozen(&self) -> bool {
        self.row == 0 || self.column == 0
    }
}

/// Draw-order tier of a cell.
///
/// Variants are declared lowest first so the derived `Ord` gives
/// `FrozenCorner > FrozenEdge > Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ZTier {
    /// Scrolling body cell
    #[default]
    Normal,
    /// Header row or leading column, but not both
    FrozenEdge,
    /// The top-left cell, pinned on both axes
    FrozenCorner,
}

impl ZTier {
    /// Tier for the cell at (row, column)
    pub fn for_cell(row: usize, column: usize) -> Self {
        match (row == 0, column == 0) {
            (true, true) => Self::FrozenCorner,
            (true, false) | (false, true) => Self::FrozenEdge,
            (false, false) => Self::Normal,
        }
    }
}

/// A laid-out cell: its position in the grid, its frame and its tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellFrame {
    pub row: usize,
    pub column: usize,
    /// Frame in content coordinates, already corrected for frozen panes
    pub frame: Rect,
    pub tier: ZTier,
}

impl CellFrame {
    pub fn index(&self) -> CellIndex {
        CellIndex::new(self.row, self.column)
    }
}

/// Frame plus numeric z-index, the shape a view system consumes directly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutAttributes {
    pub row: usize,
    pub column: usize,
    pub frame: Rect,
    pub z_index: i32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_for_cell() {
        assert_eq!(ZTier::for_cell(0, 0), ZTier::FrozenCorner);
        assert_eq!(ZTier::for_cell(0, 3), ZTier::FrozenEdge);
        assert_eq!(ZTier::for_cell(7, 0), ZTier::FrozenEdge);
        assert_eq!(ZTier::for_cell(2, 2), ZTier::Normal);
    }

    #[test]
    fn test_tier_ordering() {
        assert!(ZTier::FrozenCorner > ZTier::FrozenEdge);
        assert!(ZTier::FrozenEdge > ZTier::Normal);
    }

    #[test]
    fn test_cell_index_is_frozen() {
        assert!(CellIndex::new(0, 5).is_frozen());
        assert!(CellIndex::new(5, 0).is_frozen());
        assert!(!CellIndex::new(1, 1).is_frozen());
    }

    #[test]
    fn test_cell_frame_serializes_camel_case() {
        let cell = CellFrame {
            row: 0,
            column: 0,
            frame: Rect::new(0.0, 0.0, 50.0, 70.0),
            tier: ZTier::FrozenCorner,
        };
        let json = serde_json::to_string(&cell).unwrap();
        assert!(json.contains("\"tier\":\"frozenCorner\""));
    }
}
