use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::atlas::{grid_size, slice_atlas, AtlasGrid};
use crate::config::ImportSettings;
use crate::error::MapError;
use crate::loader::layer_data::decode_data_node;
use crate::map::{Layer, Map, TilesetInfo};
use crate::properties::{properties_from_xml, read_properties, Properties};
use crate::tile::Tile;

/// Accumulators for a single import. Every call to [`decode_map_str`] owns a fresh one.
struct ParseContext<'s> {
    settings: &'s ImportSettings,
    base_dir: PathBuf,
    tile_w: u32,
    tile_h: u32,
    atlases: Vec<PathBuf>,
    tiles: Vec<Tile>,
    tilesets: Vec<TilesetInfo>,
    layers: Vec<Layer>,
}

impl<'s> ParseContext<'s> {
    /// Register an atlas and append its tiles to the global table.
    fn add_atlas(&mut self, path: PathBuf, atlas_w: u32, atlas_h: u32, grid: AtlasGrid) -> (usize, usize, usize) {
        let atlas = self.atlases.len();
        let first_tile = self.tiles.len();
        let tiles = slice_atlas(atlas, atlas_w, atlas_h, grid);
        let count = tiles.len();
        log::debug!(
            "atlas {} ({}x{} px) -> tiles {}..{}",
            path.display(),
            atlas_w,
            atlas_h,
            first_tile,
            first_tile + count
        );
        self.atlases.push(path);
        self.tiles.extend(tiles);
        (atlas, first_tile, count)
    }
}

/// Required attribute parsed into `T`, reported as a format error otherwise.
fn attribute<T: FromStr>(node: roxmltree::Node<'_, '_>, name: &str) -> Result<T, MapError> {
    let element = node.tag_name().name();
    let text = node
        .attribute(name)
        .ok_or_else(|| MapError::format(element, format!("required attribute '{name}' missing")))?;
    text.trim()
        .parse()
        .map_err(|_| MapError::format(element, format!("attribute '{name}' is not a valid number: '{text}'")))
}

/// Optional attribute, `T::default()` when absent.
fn attribute_or_default<T: FromStr + Default>(node: roxmltree::Node<'_, '_>, name: &str) -> Result<T, MapError> {
    match node.attribute(name) {
        None => Ok(T::default()),
        Some(_) => attribute(node, name),
    }
}

fn positive(node: roxmltree::Node<'_, '_>, name: &str) -> Result<u32, MapError> {
    let v: u32 = attribute(node, name)?;
    if v == 0 {
        return Err(MapError::format(
            node.tag_name().name(),
            format!("attribute '{name}' must be positive"),
        ));
    }
    Ok(v)
}

/// Parse TMX/TSX text. Files from older Tiled releases carry a `<!DOCTYPE map ...>` line.
fn parse_document(text: &str) -> Result<roxmltree::Document<'_>, MapError> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    Ok(roxmltree::Document::parse_with_options(text, options)?)
}

fn read_text_file(path: &Path) -> Result<String, MapError> {
    std::fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Import the TMX file at `path`.
pub fn decode_map_file(path: &Path, settings: &ImportSettings) -> Result<Map, MapError> {
    let txt = read_text_file(path)?;
    let map_dir = path
        .parent()
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./"));
    log::debug!("importing {}", path.display());
    decode_map_str(&txt, &map_dir, settings)
}

/// Import TMX text, resolving relative references against `base_dir`.
pub fn decode_map_str(xml: &str, base_dir: &Path, settings: &ImportSettings) -> Result<Map, MapError> {
    let doc = parse_document(xml)?;
    let root = doc.root_element();

    // AwaitingRoot -> InMap
    if !root.has_tag_name("map") {
        return Err(MapError::format(
            root.tag_name().name(),
            "root element is not a <map> document",
        ));
    }
    if let Some(orientation) = root.attribute("orientation") {
        if orientation != "orthogonal" {
            return Err(MapError::NotImplemented(format!("'{orientation}' map orientation")));
        }
    }
    if root.attribute("infinite") == Some("1") {
        return Err(MapError::NotImplemented("infinite (chunked) maps".into()));
    }

    let width = positive(root, "width")?;
    let height = positive(root, "height")?;
    let tile_w = positive(root, "tilewidth")?;
    let tile_h = positive(root, "tileheight")?;

    let mut ctx = ParseContext {
        settings,
        base_dir: base_dir.to_path_buf(),
        tile_w,
        tile_h,
        atlases: Vec::new(),
        tiles: Vec::new(),
        tilesets: Vec::new(),
        layers: Vec::new(),
    };
    let mut properties = Properties::new();

    for child in root.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "properties" => read_properties(child, "map", settings.property_policy, &mut properties)?,
            "tileset" => parse_tileset(child, &mut ctx)?,
            "layer" => parse_layer(child, &mut ctx)?,
            other => log::trace!("ignoring <{other}> at map level"),
        }
    }

    validate_tile_references(&ctx.layers, ctx.tiles.len())?;

    log::debug!(
        "imported {}x{} map: {} atlases, {} tiles, {} layers",
        width,
        height,
        ctx.atlases.len(),
        ctx.tiles.len(),
        ctx.layers.len()
    );

    Ok(Map {
        width,
        height,
        tile_width: tile_w,
        tile_height: tile_h,
        properties,
        atlases: ctx.atlases,
        tiles: ctx.tiles,
        tilesets: ctx.tilesets,
        layers: ctx.layers,
    })
}

fn parse_tileset(node: roxmltree::Node<'_, '_>, ctx: &mut ParseContext<'_>) -> Result<(), MapError> {
    let first_gid: u32 = match node.attribute("firstgid") {
        Some(_) => attribute(node, "firstgid")?,
        None => ctx.tiles.len() as u32 + 1,
    };

    match node.attribute("source") {
        Some(source) => {
            let tsx_path = ctx.base_dir.join(source);
            let txt = read_text_file(&tsx_path)?;
            let doc = parse_document(&txt)?;
            let tsx_root = doc.root_element();
            if !tsx_root.has_tag_name("tileset") {
                return Err(MapError::format(
                    tsx_root.tag_name().name(),
                    format!("{} is not a <tileset> document", tsx_path.display()),
                ));
            }
            let tsx_dir = tsx_path
                .parent()
                .map(|d| d.to_path_buf())
                .unwrap_or_else(|| ctx.base_dir.clone());
            read_tileset_body(tsx_root, &tsx_dir, first_gid, ctx)
        }
        None => {
            let dir = ctx.base_dir.clone();
            read_tileset_body(node, &dir, first_gid, ctx)
        }
    }
}

fn read_tileset_body(
    node: roxmltree::Node<'_, '_>,
    image_dir: &Path,
    first_gid: u32,
    ctx: &mut ParseContext<'_>,
) -> Result<(), MapError> {
    let name = node.attribute("name").unwrap_or_default().to_owned();
    let scope = format!("tileset '{name}'");

    let image = node
        .children()
        .find(|n| n.has_tag_name("image"))
        .ok_or_else(|| MapError::NotImplemented(format!("{scope} without a single atlas <image>")))?;
    let source = image
        .attribute("source")
        .ok_or_else(|| MapError::format("image", format!("required attribute 'source' missing in {scope}")))?;
    let path = image_dir.join(source);
    let (atlas_w, atlas_h) = atlas_size(image, &path, ctx.settings)?;

    let tile_w = attribute_or_default::<u32>(node, "tilewidth")?;
    let tile_h = attribute_or_default::<u32>(node, "tileheight")?;
    if (tile_w != 0 && tile_w != ctx.tile_w) || (tile_h != 0 && tile_h != ctx.tile_h) {
        return Err(MapError::NotImplemented(format!(
            "{scope} uses {tile_w}x{tile_h} tiles on a map with {}x{} tiles",
            ctx.tile_w, ctx.tile_h
        )));
    }
    let grid = AtlasGrid {
        tile_w: ctx.tile_w,
        tile_h: ctx.tile_h,
        spacing: attribute_or_default(node, "spacing")?,
        margin: attribute_or_default(node, "margin")?,
    };

    let expected_gid = ctx.tiles.len() as u32 + 1;
    if first_gid != expected_gid {
        log::warn!("{scope} declares firstgid {first_gid} but its tiles start at global id {expected_gid}");
    }

    let properties = properties_from_xml(node, &scope, ctx.settings.property_policy)?;
    let (columns, _) = grid_size(atlas_w, atlas_h, grid);
    let (atlas, first_tile, tile_count) = ctx.add_atlas(path, atlas_w, atlas_h, grid);

    ctx.tilesets.push(TilesetInfo {
        name,
        first_gid,
        atlas,
        first_tile,
        tile_count,
        columns,
        properties,
    });
    Ok(())
}

fn atlas_size(image: roxmltree::Node<'_, '_>, path: &Path, settings: &ImportSettings) -> Result<(u32, u32), MapError> {
    match (image.attribute("width"), image.attribute("height")) {
        (Some(_), Some(_)) => Ok((positive(image, "width")?, positive(image, "height")?)),
        _ if settings.probe_image_size => {
            log::debug!("reading atlas size from {}", path.display());
            image::image_dimensions(path).map_err(|source| MapError::Image {
                path: path.to_path_buf(),
                source,
            })
        }
        (None, _) => Err(MapError::format("image", "required attribute 'width' missing")),
        (Some(_), None) => Err(MapError::format("image", "required attribute 'height' missing")),
    }
}

fn parse_layer(node: roxmltree::Node<'_, '_>, ctx: &mut ParseContext<'_>) -> Result<(), MapError> {
    let name = node.attribute("name").unwrap_or_default().to_owned();
    let width: u32 = attribute(node, "width")?;
    let height: u32 = attribute(node, "height")?;

    let data = node
        .children()
        .find(|n| n.has_tag_name("data"))
        .ok_or_else(|| MapError::format("layer", format!("'{name}' has no <data> element")))?;
    let cells = decode_data_node(data, &name, width, height, ctx.settings.cell_order)?;
    let properties = properties_from_xml(node, &format!("layer '{name}'"), ctx.settings.property_policy)?;

    log::debug!("layer '{name}' {width}x{height}");
    ctx.layers.push(Layer {
        name,
        width,
        height,
        properties,
        cells,
    });
    Ok(())
}

pub(crate) fn validate_tile_references(layers: &[Layer], tile_count: usize) -> Result<(), MapError> {
    for layer in layers {
        for (x, y, cell) in layer.occupied() {
            if let Some(index) = cell.tile {
                if index as usize >= tile_count {
                    return Err(MapError::InvalidTileReference {
                        layer: layer.name.clone(),
                        x,
                        y,
                        index,
                        tile_count,
                    });
                }
            }
        }
    }
    Ok(())
}
