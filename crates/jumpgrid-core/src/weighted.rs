//! Byte-per-cell grid with terrain costs.

use std::path::{Path, PathBuf};

use crate::constants::PaddedId;
use crate::error::MapError;
use crate::parser::{self, ParsedMap};
use crate::terrain::{TerrainClassifier, WeightedTerrain};

/// Blocked rows above and below a weighted map.
pub const WEIGHTED_PADDED_ROWS: u32 = 2;

/// A grid whose cells hold a traversal cost; 0 marks an obstacle.
///
/// One blocked column pads each row and two blocked rows pad the top and
/// bottom, so the eight neighbours of an interior cell always exist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeightedGridMap {
    width: u32,
    height: u32,
    padded_width: u32,
    padded_height: u32,
    cells: Vec<u8>,
    filename: Option<PathBuf>,
}

impl WeightedGridMap {
    /// A `width` × `height` grid with every cell blocked.
    pub fn new(width: u32, height: u32) -> Self {
        let padded_width = width + 1;
        let padded_height = height + 2 * WEIGHTED_PADDED_ROWS;
        Self {
            width,
            height,
            padded_width,
            padded_height,
            cells: vec![0; padded_width as usize * padded_height as usize],
            filename: None,
        }
    }

    /// Build from a parsed map with the given cost classifier.
    pub fn from_parsed(
        parsed: &ParsedMap,
        classifier: &impl TerrainClassifier,
    ) -> Result<Self, MapError> {
        let (w, h) = (parsed.header.width, parsed.header.height);
        let fits = (w as u64 + 1) * (h as u64 + 2 * WEIGHTED_PADDED_ROWS as u64)
            < PaddedId::MAX as u64 / 8;
        if !fits {
            return Err(MapError::TooLarge {
                width: w,
                height: h,
            });
        }
        let mut map = Self::new(w, h);
        for y in 0..h {
            for x in 0..w {
                let id = map.to_padded_id(x, y);
                map.set_label(id, classifier.classify(parsed.tile(x, y)));
            }
        }
        Ok(map)
    }

    /// Parse map text; `@` is an obstacle, any other tile costs its byte.
    pub fn parse(text: &str) -> Result<Self, MapError> {
        Self::from_parsed(&parser::parse_map(text)?, &WeightedTerrain)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let mut map = Self::from_parsed(&parser::load_map(path)?, &WeightedTerrain)?;
        map.filename = Some(path.to_path_buf());
        Ok(map)
    }

    /// Build from rows of tile characters, top row first.
    pub fn from_rows(rows: &[&str]) -> Result<Self, MapError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        let mut text = format!("type octile\nheight {height}\nwidth {width}\nmap\n");
        for (row, r) in rows.iter().enumerate() {
            if r.len() != width || r.bytes().any(|b| b.is_ascii_whitespace()) {
                return Err(MapError::RaggedRows {
                    row,
                    expected: width,
                    found: r.len(),
                });
            }
            text.push_str(r);
            text.push('\n');
        }
        Self::parse(&text)
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    #[inline]
    pub fn header_width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn header_height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn padded_width(&self) -> u32 {
        self.padded_width
    }

    #[inline]
    pub fn padded_size(&self) -> u32 {
        self.padded_width * self.padded_height
    }

    #[inline]
    pub fn to_padded_id(&self, x: u32, y: u32) -> PaddedId {
        (y + WEIGHTED_PADDED_ROWS) * self.padded_width + x
    }

    #[inline]
    pub fn to_unpadded_xy(&self, id: PaddedId) -> (u32, u32) {
        (
            id % self.padded_width,
            id / self.padded_width - WEIGHTED_PADDED_ROWS,
        )
    }

    /// Cost of entering `id`; 0 for obstacles, padding and ids past the end.
    #[inline]
    pub fn get_label(&self, id: PaddedId) -> u8 {
        self.cells.get(id as usize).copied().unwrap_or(0)
    }

    #[inline]
    pub fn set_label(&mut self, id: PaddedId, cost: u8) {
        if let Some(c) = self.cells.get_mut(id as usize) {
            *c = cost;
        }
    }

    #[inline]
    pub fn is_traversable(&self, id: PaddedId) -> bool {
        self.get_label(id) != 0
    }

    /// Ids and costs of the 3×3 window around `id`, row-major from the
    /// north-west corner: `[NW, N, NE, W, C, E, SW, S, SE]`.
    ///
    /// `id` must lie inside the map.
    pub fn neighbours(&self, id: PaddedId) -> ([PaddedId; 9], [u8; 9]) {
        let pw = self.padded_width;
        let ids = [
            id - pw - 1,
            id - pw,
            id - pw + 1,
            id - 1,
            id,
            id + 1,
            id + pw - 1,
            id + pw,
            id + pw + 1,
        ];
        (ids, ids.map(|i| self.get_label(i)))
    }
}
