//! Layout configuration.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::types::ZTier;

/// z-index of the top-left cell
pub const DEFAULT_CORNER_Z_INDEX: i32 = 1024;

/// z-index of the header row and leading column
pub const DEFAULT_EDGE_Z_INDEX: i32 = 1023;

/// Tunables for [`GridLayoutEngine`](super::GridLayoutEngine)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridLayoutConfig {
    /// Fixed row height. When unset, the tallest height the delegate
    /// reports across all columns is used for every row.
    pub row_height: Option<f32>,
    pub corner_z_index: i32,
    pub edge_z_index: i32,
    pub normal_z_index: i32,
    /// Snap frames to whole pixels
    pub round_to_pixels: bool,
}

impl Default for GridLayoutConfig {
    fn default() -> Self {
        Self {
            row_height: None,
            corner_z_index: DEFAULT_CORNER_Z_INDEX,
            edge_z_index: DEFAULT_EDGE_Z_INDEX,
            normal_z_index: 0,
            round_to_pixels: true,
        }
    }
}

impl GridLayoutConfig {
    /// Parse a JSON config. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns [`GridError::Config`] on malformed JSON or an invalid config.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the z-index ordering and the row height override.
    ///
    /// # Errors
    /// Returns [`GridError::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.corner_z_index <= self.edge_z_index || self.edge_z_index <= self.normal_z_index {
            return Err(GridError::Config(format!(
                "z-indices must satisfy corner > edge > normal, got {} / {} / {}",
                self.corner_z_index, self.edge_z_index, self.normal_z_index
            )));
        }
        if let Some(h) = self.row_height {
            if !h.is_finite() || h <= 0.0 {
                return Err(GridError::Config(format!(
                    "row height must be positive, got {h}"
                )));
            }
        }
        Ok(())
    }

    /// Numeric z-index for a tier
    pub fn z_index(&self, tier: ZTier) -> i32 {
        match tier {
            ZTier::FrozenCorner => self.corner_z_index,
            ZTier::FrozenEdge => self.edge_z_index,
            ZTier::Normal => self.normal_z_index,
        }
    }
}
