use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::config::CellOrder;
use crate::error::MapError;
use crate::tile::{decode_cell, Cell};

const BYTES_PER_CELL: usize = std::mem::size_of::<u32>();

/// Payload encodings a `<data>` element can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Little-endian u32 values, Base64 encoded
    Base64,
    /// Comma-separated decimal values
    Csv,
}

impl Encoding {
    fn from_attr(attr: Option<&str>) -> Result<Self, MapError> {
        match attr {
            Some("base64") => Ok(Encoding::Base64),
            Some("csv") => Ok(Encoding::Csv),
            Some(other) => Err(MapError::NotImplemented(format!("layer data encoding '{other}'"))),
            None => Err(MapError::NotImplemented(
                "layer data without an encoding attribute (XML tile elements)".into(),
            )),
        }
    }
}

/// Decode a layer's `<data>` element into row-major cells.
pub(crate) fn decode_data_node(
    data: roxmltree::Node<'_, '_>,
    layer: &str,
    width: u32,
    height: u32,
    order: CellOrder,
) -> Result<Vec<Cell>, MapError> {
    if let Some(compression) = data.attribute("compression") {
        return Err(MapError::NotImplemented(format!(
            "compressed layer data ('{compression}') in layer '{layer}'"
        )));
    }
    let encoding = Encoding::from_attr(data.attribute("encoding"))?;
    decode_payload(encoding, data.text().unwrap_or_default(), layer, width, height, order)
}

/// Decode a raw payload into exactly `width * height` cells, stored row-major.
///
/// Values are consumed in `order`.
pub fn decode_payload(
    encoding: Encoding,
    payload: &str,
    layer: &str,
    width: u32,
    height: u32,
    order: CellOrder,
) -> Result<Vec<Cell>, MapError> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| MapError::format("layer", format!("'{layer}' is too large: {width}x{height}")))?;

    let raw = match encoding {
        Encoding::Base64 => base64_values(payload, layer, expected)?,
        Encoding::Csv => csv_values(payload, layer, expected)?,
    };

    Ok(place_cells(&raw, width, height, order))
}

fn base64_values(payload: &str, layer: &str, expected: usize) -> Result<Vec<u32>, MapError> {
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|source| MapError::Base64 {
            layer: layer.to_owned(),
            source,
        })?;
    if bytes.len() != expected * BYTES_PER_CELL {
        return Err(MapError::CellCount {
            layer: layer.to_owned(),
            expected,
            found: bytes.len() / BYTES_PER_CELL,
        });
    }
    Ok(bytes
        .chunks_exact(BYTES_PER_CELL)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

fn csv_values(payload: &str, layer: &str, expected: usize) -> Result<Vec<u32>, MapError> {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return if expected == 0 {
            Ok(Vec::new())
        } else {
            Err(MapError::CellCount {
                layer: layer.to_owned(),
                expected,
                found: 0,
            })
        };
    }
    let values = trimmed
        .split(',')
        .map(|v| {
            let v = v.trim();
            v.parse::<u32>().map_err(|_| MapError::InvalidCellValue {
                layer: layer.to_owned(),
                value: v.to_owned(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    if values.len() != expected {
        return Err(MapError::CellCount {
            layer: layer.to_owned(),
            expected,
            found: values.len(),
        });
    }
    Ok(values)
}

/// Lay encoded values onto a row-major grid. `raw.len()` must be `width * height`.
fn place_cells(raw: &[u32], width: u32, height: u32, order: CellOrder) -> Vec<Cell> {
    let (w, h) = (width as usize, height as usize);
    let mut cells = vec![Cell::EMPTY; w * h];
    let mut values = raw.iter().copied();
    match order {
        CellOrder::ColumnMajor => {
            for x in 0..w {
                for y in 0..h {
                    if let Some(v) = values.next() {
                        cells[y * w + x] = decode_cell(v);
                    }
                }
            }
        }
        CellOrder::RowMajor => {
            for (cell, v) in cells.iter_mut().zip(values) {
                *cell = decode_cell(v);
            }
        }
    }
    cells
}
