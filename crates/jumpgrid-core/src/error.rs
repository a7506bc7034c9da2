use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors that can occur when reading or building a grid map.
#[derive(Debug)]
pub enum MapError {
    /// The map file could not be read.
    Io { path: PathBuf, source: io::Error },
    /// The header is incomplete or contains an unknown field.
    MalformedHeader(String),
    /// The header names a map type other than `octile`.
    UnknownMapType(String),
    /// A dimension is zero or not a number.
    InvalidDimension { field: &'static str, value: String },
    /// The `map` keyword does not follow the header.
    MissingMapKeyword,
    /// The tile block does not hold exactly width × height tiles.
    TileCountMismatch { expected: usize, found: usize },
    /// Rows given to [`GridMap::from_rows`](crate::GridMap::from_rows) have
    /// different widths.
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// The padded map does not fit in a 32-bit id space.
    TooLarge { width: u32, height: u32 },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "map: cannot read {}: {source}", path.display())
            }
            Self::MalformedHeader(s) => write!(f, "map: malformed header: {s}"),
            Self::UnknownMapType(t) => write!(f, "map: unknown map type \u{201c}{t}\u{201d}"),
            Self::InvalidDimension { field, value } => {
                write!(f, "map: invalid {field} \u{201c}{value}\u{201d}")
            }
            Self::MissingMapKeyword => write!(f, "map: expected keyword `map` after header"),
            Self::TileCountMismatch { expected, found } => {
                write!(f, "map: expected {expected} tiles, found {found}")
            }
            Self::RaggedRows {
                row,
                expected,
                found,
            } => write!(f, "map: row {row} has {found} tiles, expected {expected}"),
            Self::TooLarge { width, height } => {
                write!(f, "map: {width}x{height} is too large to address")
            }
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
