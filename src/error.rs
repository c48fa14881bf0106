//! Structured error types for xlgrid.
//!
//! Two classes of failure exist. Precondition violations mean the host wired
//! the engine up wrong (no delegate, ragged rows, nonsense sizes) and are not
//! worth retrying. Out-of-range lookups are expected while the grid is in the
//! middle of a structural change and can be treated as "not laid out yet".

/// All errors that can occur while laying out or querying a grid.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// Sizing was required but no delegate is attached, or it has been dropped.
    #[error("sizing delegate must be attached before the grid can be laid out")]
    MissingDelegate,

    /// A row's item count does not match the grid's column count.
    #[error("row {row} has {found} items, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The delegate returned an unusable size for a column.
    #[error("invalid size {width}x{height} for column {column}")]
    InvalidColumnSize {
        column: usize,
        width: f32,
        height: f32,
    },

    /// The host's sizing callback failed while measuring a column.
    #[error("sizing callback failed for column {column}: {message}")]
    Delegate { column: usize, message: String },

    /// Cell lookup outside the current layout table.
    #[error("cell ({row}, {column}) is outside the {rows}x{columns} layout")]
    OutOfRange {
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },

    /// Configuration could not be parsed or failed validation.
    #[error("config: {0}")]
    Config(String),
}

impl GridError {
    /// True for errors caused by incorrect host integration.
    ///
    /// These are programming errors: repeating the call without changing the
    /// inputs will fail the same way.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::MissingDelegate
                | Self::RaggedRows { .. }
                | Self::InvalidColumnSize { .. }
                | Self::Delegate { .. }
        )
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<serde_json::Error> for GridError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
