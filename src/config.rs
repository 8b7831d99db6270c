use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::MapError;

/// Order in which a layer's encoded values are laid onto its grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellOrder {
    /// For each x, for each y. This is how existing level assets were authored.
    ColumnMajor,
    /// For each y, for each x. The order Tiled itself writes.
    RowMajor,
}

/// Order used unless [`ImportSettings::cell_order`] overrides it.
pub const DEFAULT_CELL_ORDER: CellOrder = CellOrder::ColumnMajor;

impl Default for CellOrder {
    fn default() -> Self {
        DEFAULT_CELL_ORDER
    }
}

/// What to do with a `<property>` lacking a name or value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyPolicy {
    /// Abort the import.
    #[default]
    Strict,
    /// Log a warning and drop the declaration.
    SkipMalformed,
}

/// Knobs for [`crate::Map::load_with`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Malformed property handling
    pub property_policy: PropertyPolicy,
    /// Grid fill order for layer data
    pub cell_order: CellOrder,
    /// Read atlas pixel size from the image file when `<image>` omits it
    pub probe_image_size: bool,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            property_policy: PropertyPolicy::Strict,
            cell_order: DEFAULT_CELL_ORDER,
            probe_image_size: true,
        }
    }
}

impl ImportSettings {
    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let p = path.as_ref();
        let txt = std::fs::read_to_string(p).map_err(|source| MapError::Io {
            path: p.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&txt).map_err(|source| MapError::Json {
            path: p.to_path_buf(),
            source,
        })
    }
}
