//! JSON content files for imported maps.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::MapError;
use crate::loader::tmx_loader::validate_tile_references;
use crate::map::Map;

/// Serialize an imported map as engine-loadable JSON content.
pub fn write_content(map: &Map, path: impl AsRef<Path>) -> Result<(), MapError> {
    let p = path.as_ref();
    let io_err = |source| MapError::Io {
        path: p.to_path_buf(),
        source,
    };
    let mut out = BufWriter::new(File::create(p).map_err(io_err)?);
    serde_json::to_writer_pretty(&mut out, map).map_err(|source| MapError::Json {
        path: p.to_path_buf(),
        source,
    })?;
    out.flush().map_err(io_err)?;
    log::info!("wrote {} ({} layers, {} tiles)", p.display(), map.layers.len(), map.tiles.len());
    Ok(())
}

/// Read content previously produced by [`write_content`].
///
/// Layer grids and tile references are checked the same way an import checks them.
pub fn read_content(path: impl AsRef<Path>) -> Result<Map, MapError> {
    let p = path.as_ref();
    let file = File::open(p).map_err(|source| MapError::Io {
        path: p.to_path_buf(),
        source,
    })?;
    let map: Map = serde_json::from_reader(BufReader::new(file)).map_err(|source| MapError::Json {
        path: p.to_path_buf(),
        source,
    })?;

    for layer in &map.layers {
        let expected = layer.width as usize * layer.height as usize;
        if layer.cells().len() != expected {
            return Err(MapError::CellCount {
                layer: layer.name.clone(),
                expected,
                found: layer.cells().len(),
            });
        }
    }
    validate_tile_references(&map.layers, map.tiles.len())?;
    Ok(map)
}
