use serde::{Deserialize, Serialize};

/// Horizontal flip, bit 31
pub const FLIP_H: u32 = 0x8000_0000;
/// Vertical flip, bit 30
pub const FLIP_V: u32 = 0x4000_0000;
/// Diagonal flip, bit 29
pub const FLIP_D: u32 = 0x2000_0000;
/// All flip bits
pub const FLIP_MASK: u32 = FLIP_H | FLIP_V | FLIP_D;
/// Bits left for the global tile id
pub const GID_MASK: u32 = !FLIP_MASK;

/// Pixel rectangle inside an atlas image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// Build a rectangle from its origin and size.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Rect { x, y, width, height }
    }
}

/// One entry of the global tile table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Index into [`crate::Map::atlases`]
    pub atlas: usize,
    /// Source rectangle within that atlas
    pub source: Rect,
}

/// Orientation of a placed tile.
///
/// A diagonal flip always carries both `horizontal` and `vertical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FlipFlags {
    /// Mirror along the vertical axis
    pub horizontal: bool,
    /// Mirror along the horizontal axis
    pub vertical: bool,
    /// Diagonal flip (implies the other two)
    pub diagonal: bool,
}

impl FlipFlags {
    /// No flip.
    pub const NONE: FlipFlags = FlipFlags {
        horizontal: false,
        vertical: false,
        diagonal: false,
    };

    /// Extract flags from the high bits of an encoded cell.
    pub fn from_raw(raw: u32) -> Self {
        let diagonal = raw & FLIP_D != 0;
        FlipFlags {
            horizontal: raw & FLIP_H != 0 || diagonal,
            vertical: raw & FLIP_V != 0 || diagonal,
            diagonal,
        }
    }

    /// The high bits these flags occupy in an encoded cell.
    pub fn to_bits(self) -> u32 {
        let mut bits = 0;
        if self.horizontal {
            bits |= FLIP_H;
        }
        if self.vertical {
            bits |= FLIP_V;
        }
        if self.diagonal {
            bits |= FLIP_D;
        }
        bits
    }

    /// True if any flip is set.
    pub fn any(self) -> bool {
        self.horizontal || self.vertical || self.diagonal
    }
}

/// One grid position of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    /// Zero-based index into the global tile table, `None` when the cell is empty
    pub tile: Option<u32>,
    /// Orientation of the tile
    pub flip: FlipFlags,
}

impl Cell {
    /// A cell with no tile.
    pub const EMPTY: Cell = Cell {
        tile: None,
        flip: FlipFlags::NONE,
    };

    /// True if no tile is placed here.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tile.is_none()
    }
}

/// Split an encoded 32-bit value into a cell.
///
/// Encoded ids are 1-based; 0 after masking means empty.
pub fn decode_cell(raw: u32) -> Cell {
    let gid = raw & GID_MASK;
    Cell {
        tile: gid.checked_sub(1),
        flip: FlipFlags::from_raw(raw),
    }
}

/// Inverse of [`decode_cell`].
///
/// Returns `None` when the tile index does not fit below the flip bits
/// (`tile >= GID_MASK`).
pub fn encode_cell(cell: Cell) -> Option<u32> {
    let gid = match cell.tile {
        None => 0,
        Some(t) if t < GID_MASK => t + 1,
        Some(_) => return None,
    };
    Some(gid | cell.flip.to_bits())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_empty_and_one_is_first_tile() {
        assert_eq!(decode_cell(0), Cell::EMPTY);
        assert_eq!(decode_cell(1).tile, Some(0));
        assert!(!decode_cell(1).is_empty());
    }

    #[test]
    fn flags_are_masked_out_of_the_index() {
        let c = decode_cell(FLIP_H | FLIP_V | 7);
        assert_eq!(c.tile, Some(6));
        assert!(c.flip.horizontal && c.flip.vertical && !c.flip.diagonal);
    }

    #[test]
    fn flags_without_index_are_still_empty() {
        let c = decode_cell(FLIP_H | FLIP_V);
        assert!(c.is_empty());
        assert!(c.flip.horizontal);
    }

    #[test]
    fn diagonal_implies_horizontal_and_vertical() {
        let f = FlipFlags::from_raw(FLIP_D | 3);
        assert!(f.diagonal);
        assert!(f.horizontal);
        assert!(f.vertical);
    }

    #[test]
    fn flag_extraction_round_trips_around_any_index() {
        let flag_sets = [
            FlipFlags::NONE,
            FlipFlags { horizontal: true, ..FlipFlags::NONE },
            FlipFlags { vertical: true, ..FlipFlags::NONE },
            FlipFlags { horizontal: true, vertical: true, diagonal: false },
            FlipFlags { horizontal: true, vertical: true, diagonal: true },
        ];
        for flip in flag_sets {
            for tile in [None, Some(0), Some(41), Some(GID_MASK - 1)] {
                let cell = Cell { tile, flip };
                assert_eq!(encode_cell(cell).map(decode_cell), Some(cell));
            }
        }
    }

    #[test]
    fn index_colliding_with_flip_bits_cannot_be_encoded() {
        for tile in [GID_MASK, GID_MASK + 1, u32::MAX] {
            let cell = Cell { tile: Some(tile), flip: FlipFlags::NONE };
            assert_eq!(encode_cell(cell), None, "tile {tile}");
        }
    }
}
