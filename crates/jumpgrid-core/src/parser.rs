//! Reader for the textual octile map format.
//!
//! ```text
//! type octile
//! height 3
//! width 4
//! map
//! ....
//! .@@.
//! ....
//! ```
//!
//! The three header fields may appear in any order. Whitespace separates
//! tokens and is otherwise ignored, so the tile block may be wrapped freely as
//! long as it holds exactly `width * height` characters.

use std::fs;
use std::path::Path;

use crate::error::MapError;

/// The only map type the reader accepts.
pub const MAP_TYPE_OCTILE: &str = "octile";

/// Parsed header of a map file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapHeader {
    pub kind: String,
    pub height: u32,
    pub width: u32,
}

/// A parsed map: header plus row-major tile characters.
#[derive(Clone, Debug)]
pub struct ParsedMap {
    pub header: MapHeader,
    pub tiles: Vec<u8>,
}

impl ParsedMap {
    /// The tile character at unpadded `(x, y)`.
    #[inline]
    pub fn tile(&self, x: u32, y: u32) -> u8 {
        self.tiles[(y * self.header.width + x) as usize]
    }
}

/// Parse map text.
pub fn parse_map(text: &str) -> Result<ParsedMap, MapError> {
    let mut tokens = text.split_ascii_whitespace();
    let mut kind = None;
    let mut height = None;
    let mut width = None;

    for _ in 0..3 {
        let field = tokens
            .next()
            .ok_or_else(|| MapError::MalformedHeader("unexpected end of header".into()))?;
        let value = tokens
            .next()
            .ok_or_else(|| MapError::MalformedHeader(format!("missing value for `{field}`")))?;
        match field {
            "type" => kind = Some(value),
            "height" => height = Some(parse_dimension("height", value)?),
            "width" => width = Some(parse_dimension("width", value)?),
            other => {
                return Err(MapError::MalformedHeader(format!(
                    "unknown field `{other}`"
                )));
            }
        }
    }

    let kind = kind.ok_or_else(|| MapError::MalformedHeader("missing `type`".into()))?;
    let height = height.ok_or_else(|| MapError::MalformedHeader("missing `height`".into()))?;
    let width = width.ok_or_else(|| MapError::MalformedHeader("missing `width`".into()))?;
    if kind != MAP_TYPE_OCTILE {
        return Err(MapError::UnknownMapType(kind.to_string()));
    }
    if tokens.next() != Some("map") {
        return Err(MapError::MissingMapKeyword);
    }

    let expected = (width as usize)
        .checked_mul(height as usize)
        .ok_or(MapError::TooLarge { width, height })?;
    let tiles: Vec<u8> = tokens.flat_map(str::bytes).collect();
    if tiles.len() != expected {
        return Err(MapError::TileCountMismatch {
            expected,
            found: tiles.len(),
        });
    }

    Ok(ParsedMap {
        header: MapHeader {
            kind: kind.to_string(),
            height,
            width,
        },
        tiles,
    })
}

/// Read and parse a map file.
pub fn load_map(path: &Path) -> Result<ParsedMap, MapError> {
    let text = fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_map(&text)
}

fn parse_dimension(field: &'static str, value: &str) -> Result<u32, MapError> {
    match value.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(MapError::InvalidDimension {
            field,
            value: value.to_string(),
        }),
    }
}
