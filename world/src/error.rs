//! Errors raised while loading level configuration and maps.

use std::{io, path::PathBuf};

use screamporium_core::GridPos;
use thiserror::Error;

/// Failures raised while loading level configuration or map data.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A file could not be read.
    #[error("failed to read {}", .path.display())]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A file was not valid TOML for the expected schema.
    #[error("failed to parse {}", .path.display())]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: toml::de::Error,
    },
    /// A map row does not match the declared width.
    #[error("map row {row} is {found} tiles wide, expected {expected}")]
    RowWidth {
        /// Zero-based row index, top row first.
        row: usize,
        /// Declared width.
        expected: usize,
        /// Width found in the row.
        found: usize,
    },
    /// The map does not contain the declared number of rows.
    #[error("map has {found} rows, expected {expected}")]
    RowCount {
        /// Declared height.
        expected: usize,
        /// Rows present in the file.
        found: usize,
    },
    /// A legend key is not exactly one character.
    #[error("legend key `{symbol}` must be a single character")]
    InvalidSymbol {
        /// Offending key.
        symbol: String,
    },
    /// A map row uses a symbol missing from the legend.
    #[error("map uses unknown tile symbol `{symbol}`")]
    UnknownTile {
        /// Offending symbol.
        symbol: char,
    },
    /// A block footprint uses a symbol missing from its cell legend.
    #[error("block `{block}` uses unknown cell symbol `{symbol}`")]
    UnknownCell {
        /// Title of the block.
        block: String,
        /// Offending symbol.
        symbol: char,
    },
    /// A block declares no footprint variants.
    #[error("block `{block}` defines no variants")]
    NoVariants {
        /// Title of the block.
        block: String,
    },
    /// The catalog holds more blocks than ids can address.
    #[error("block catalog holds {count} blocks, more than ids can address")]
    TooManyBlocks {
        /// Number of blocks configured.
        count: usize,
    },
    /// A source or the sink lies outside the map.
    #[error("{what} {position} lies outside the {width}x{height} map")]
    OutOfBounds {
        /// Kind of cell, `source` or `sink`.
        what: &'static str,
        /// Configured position.
        position: GridPos,
        /// Map width in cells.
        width: i32,
        /// Map height in cells.
        height: i32,
    },
    /// The layout declares no spawn sources.
    #[error("level layout declares no spawn sources")]
    NoSources,
}
