use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for the TMX importer.
#[derive(Debug, Error)]
pub enum MapError {
    /// File I/O error
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// File that could not be read or written
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// The document is not well-formed XML
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The document is not a map, or a required attribute is missing or invalid
    #[error("invalid map: <{element}> {message}")]
    Format {
        /// Tag name of the offending element
        element: String,
        /// What is wrong with it
        message: String,
    },

    /// A syntactically valid but unsupported feature was requested
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// A `<property>` is missing its name or value
    #[error("malformed property in {scope}: missing '{missing}' attribute")]
    MalformedProperty {
        /// Where the property was declared (map, tileset or layer name)
        scope: String,
        /// Which attribute was absent
        missing: &'static str,
    },

    /// Layer data decoded to the wrong number of cells
    #[error("layer '{layer}' has {found} cell values, expected {expected}")]
    CellCount {
        /// Layer name
        layer: String,
        /// width * height of the layer
        expected: usize,
        /// Number of values present in the payload
        found: usize,
    },

    /// A CSV cell value is not an unsigned 32-bit integer
    #[error("layer '{layer}' has invalid cell value '{value}'")]
    InvalidCellValue {
        /// Layer name
        layer: String,
        /// Offending text
        value: String,
    },

    /// Base64 layer payload could not be decoded
    #[error("layer '{layer}' has invalid base64 data: {source}")]
    Base64 {
        /// Layer name
        layer: String,
        /// Underlying error
        source: base64::DecodeError,
    },

    /// A cell references a tile beyond the global tile table
    #[error("layer '{layer}' cell ({x}, {y}) references tile {index}, but the map only has {tile_count} tiles")]
    InvalidTileReference {
        /// Layer name
        layer: String,
        /// Cell column
        x: u32,
        /// Cell row
        y: u32,
        /// Zero-based tile index
        index: u32,
        /// Size of the global tile table
        tile_count: usize,
    },

    /// Atlas image header could not be read
    #[error("failed to read image size of {path}: {source}")]
    Image {
        /// Image file
        path: PathBuf,
        /// Underlying error
        source: image::ImageError,
    },

    /// Settings or content file JSON error
    #[error("JSON error in {path}: {source}")]
    Json {
        /// File being read or written
        path: PathBuf,
        /// Underlying error
        source: serde_json::Error,
    },
}

impl MapError {
    pub(crate) fn format(element: &str, message: impl Into<String>) -> Self {
        MapError::Format {
            element: element.to_owned(),
            message: message.into(),
        }
    }
}
