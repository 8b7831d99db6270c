use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::ImportSettings;
use crate::error::MapError;
use crate::loader::tmx_loader::{decode_map_file, decode_map_str};
use crate::properties::Properties;
use crate::tile::{Cell, Tile};

/// A tile layer: one full grid of cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Name as written in the document, possibly empty
    pub name: String,
    /// Width in cells
    pub width: u32,
    /// Height in cells
    pub height: u32,
    /// Layer-level properties
    pub properties: Properties,
    /// Stored row by row, `y * width + x`, regardless of the order the data was encoded in.
    pub(crate) cells: Vec<Cell>,
}

impl Layer {
    /// Build a layer from row-major cells. Returns `None` if the count is not `width * height`.
    pub fn new(name: impl Into<String>, width: u32, height: u32, cells: Vec<Cell>) -> Option<Self> {
        if cells.len() != width as usize * height as usize {
            return None;
        }
        Some(Layer {
            name: name.into(),
            width,
            height,
            properties: Properties::new(),
            cells,
        })
    }

    /// Cell at column `x`, row `y`.
    #[inline]
    pub fn cell(&self, x: u32, y: u32) -> Option<&Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y as usize * self.width as usize + x as usize)
    }

    /// All cells, row by row.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate `(x, y, cell)` over non-empty cells.
    pub fn occupied(&self) -> impl Iterator<Item = (u32, u32, &Cell)> + '_ {
        let w = self.width.max(1) as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_empty())
            .map(move |(i, c)| ((i % w) as u32, (i / w) as u32, c))
    }
}

/// Summary of one `<tileset>` declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilesetInfo {
    /// Tileset name, possibly empty
    pub name: String,
    /// First global id as declared in the document
    pub first_gid: u32,
    /// Index into [`Map::atlases`]
    pub atlas: usize,
    /// Index of this tileset's first tile in [`Map::tiles`]
    pub first_tile: usize,
    /// Number of tiles this tileset added to the table
    pub tile_count: usize,
    /// Tiles per atlas row
    pub columns: u32,
    /// Tileset-level properties
    pub properties: Properties,
}

/// An imported tile map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Map {
    /// Width in tiles
    pub width: u32,
    /// Height in tiles
    pub height: u32,
    /// Tile width in pixels
    pub tile_width: u32,
    /// Tile height in pixels
    pub tile_height: u32,
    /// Map-level properties
    pub properties: Properties,
    /// Atlas image paths, resolved against the map's directory
    pub atlases: Vec<PathBuf>,
    /// Global tile table across every tileset, in declaration order
    pub tiles: Vec<Tile>,
    /// One entry per `<tileset>`, in declaration order
    pub tilesets: Vec<TilesetInfo>,
    /// Layers in document order
    pub layers: Vec<Layer>,
}

impl Map {
    /// Import a TMX file with default settings.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        Self::load_with(path, &ImportSettings::default())
    }

    /// Import a TMX file.
    pub fn load_with(path: impl AsRef<Path>, settings: &ImportSettings) -> Result<Self, MapError> {
        decode_map_file(path.as_ref(), settings)
    }

    /// Import TMX text. Relative paths inside it resolve against `base_dir`.
    pub fn load_from_str(xml: &str, base_dir: impl AsRef<Path>, settings: &ImportSettings) -> Result<Self, MapError> {
        decode_map_str(xml, base_dir.as_ref(), settings)
    }

    /// Tile by zero-based table index.
    #[inline]
    pub fn tile(&self, index: u32) -> Option<&Tile> {
        self.tiles.get(index as usize)
    }

    /// Tile by 1-based global id, flip bits ignored.
    pub fn tile_for_gid(&self, gid: u32) -> Option<&Tile> {
        let clean = gid & crate::tile::GID_MASK;
        self.tile(clean.checked_sub(1)?)
    }

    /// Atlas image a tile is cut from.
    pub fn atlas_path(&self, tile: &Tile) -> Option<&Path> {
        self.atlases.get(tile.atlas).map(PathBuf::as_path)
    }

    /// First layer with the given name.
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }
}
