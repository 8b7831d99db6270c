use crate::tile::{Rect, Tile};

/// How tiles are laid out inside an atlas image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AtlasGrid {
    /// Tile width in pixels
    pub tile_w: u32,
    /// Tile height in pixels
    pub tile_h: u32,
    /// Pixels between neighbouring tiles
    pub spacing: u32,
    /// Pixels around the outer edge of the image
    pub margin: u32,
}

impl AtlasGrid {
    /// Tightly packed grid with no spacing or margin.
    pub const fn packed(tile_w: u32, tile_h: u32) -> Self {
        AtlasGrid {
            tile_w,
            tile_h,
            spacing: 0,
            margin: 0,
        }
    }
}

fn whole_tiles(extent: u32, tile: u32, spacing: u32, margin: u32) -> u32 {
    if tile == 0 {
        return 0;
    }
    let usable = extent.saturating_sub(margin.saturating_mul(2));
    usable.saturating_add(spacing) / tile.saturating_add(spacing)
}

/// Number of whole tiles along each axis of an atlas. Trailing pixels that
/// do not fill a tile are dropped.
#[inline]
pub fn grid_size(atlas_w: u32, atlas_h: u32, grid: AtlasGrid) -> (u32, u32) {
    (
        whole_tiles(atlas_w, grid.tile_w, grid.spacing, grid.margin),
        whole_tiles(atlas_h, grid.tile_h, grid.spacing, grid.margin),
    )
}

/// Slice an atlas into tiles, row 0 left to right, then row 1, and so on.
pub fn slice_atlas(atlas: usize, atlas_w: u32, atlas_h: u32, grid: AtlasGrid) -> Vec<Tile> {
    let (cols, rows) = grid_size(atlas_w, atlas_h, grid);
    let step_x = grid.tile_w + grid.spacing;
    let step_y = grid.tile_h + grid.spacing;
    let mut tiles = Vec::with_capacity(cols as usize * rows as usize);
    for row in 0..rows {
        for col in 0..cols {
            tiles.push(Tile {
                atlas,
                source: Rect::new(
                    grid.margin + col * step_x,
                    grid.margin + row * step_y,
                    grid.tile_w,
                    grid.tile_h,
                ),
            });
        }
    }
    tiles
}
