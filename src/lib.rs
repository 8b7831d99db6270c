#![warn(missing_docs)]

//! TMX tile-map importer for the content pipeline.
//!
//! Parses a Tiled XML map (tilesets, Base64/CSV layer data, property tables)
//! into an engine-agnostic [`Map`] that the build step can serialize.
//!
//! ```no_run
//! let map = tmx_pipeline::Map::load("assets/levels/stage1.tmx")?;
//! println!("{} layers, {} tiles", map.layers.len(), map.tiles.len());
//! # Ok::<(), tmx_pipeline::MapError>(())
//! ```

mod atlas;
mod config;
mod error;
mod loader {
    pub mod layer_data;
    pub mod tmx_loader;
}
mod map;
mod properties;
mod tile;
pub mod writer;

pub use atlas::{grid_size, slice_atlas, AtlasGrid};
pub use config::{CellOrder, ImportSettings, PropertyPolicy, DEFAULT_CELL_ORDER};
pub use error::MapError;
pub use loader::layer_data::{decode_payload, Encoding};
pub use map::{Layer, Map, TilesetInfo};
pub use properties::Properties;
pub use tile::{decode_cell, encode_cell, Cell, FlipFlags, Rect, Tile, FLIP_D, FLIP_H, FLIP_V, GID_MASK};
