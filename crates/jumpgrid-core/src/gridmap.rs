//! Padded, bit-packed occupancy grid.
//!
//! Every row is widened to a multiple of 32 cells with at least one blocked
//! padding column, and three blocked rows are added above and below the map.
//! Neighbour lookups and 32-cell scans therefore never bounds-check: any
//! window around an interior cell reads padding, never garbage.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::bitset::BitSet;
use crate::constants::PaddedId;
use crate::error::MapError;
use crate::geom::Point;
use crate::parser::{self, ParsedMap};
use crate::terrain::{OctileTerrain, TerrainClassifier};

/// Blocked rows above the map.
pub const PADDED_ROWS_BEFORE: u32 = 3;
/// Blocked rows below the map.
pub const PADDED_ROWS_AFTER: u32 = 3;

/// A uniform-cost grid with one bit per cell (1 = traversable).
#[derive(Clone, PartialEq, Eq)]
pub struct GridMap {
    width: u32,
    height: u32,
    padded_width: u32,
    padded_height: u32,
    bits: BitSet,
    filename: Option<PathBuf>,
}

/// Row width after padding: at least one extra column, rounded up to a
/// multiple of 32.
fn padded_width_for(width: u32) -> u32 {
    let pw = width + 1;
    if pw % 32 != 0 { (width / 32 + 1) * 32 } else { pw }
}

impl GridMap {
    /// A `width` × `height` grid with every cell blocked.
    ///
    /// # Panics
    ///
    /// If the padded grid does not fit in a 32-bit id space.
    pub fn new(width: u32, height: u32) -> Self {
        match Self::try_new(width, height) {
            Ok(m) => m,
            Err(e) => panic!("{e}"),
        }
    }

    fn try_new(width: u32, height: u32) -> Result<Self, MapError> {
        let too_large = || MapError::TooLarge { width, height };
        if width >= PaddedId::MAX / 2 {
            return Err(too_large());
        }
        let padded_width = padded_width_for(width);
        let padded_height = height
            .checked_add(PADDED_ROWS_BEFORE + PADDED_ROWS_AFTER)
            .ok_or_else(too_large)?;
        // leaves room for eight labels per cell and for INVALID_ID
        let size = padded_width
            .checked_mul(padded_height)
            .filter(|s| *s < PaddedId::MAX / 8)
            .ok_or_else(too_large)?;
        Ok(Self {
            width,
            height,
            padded_width,
            padded_height,
            bits: BitSet::new(size as usize),
            filename: None,
        })
    }

    /// Build a grid from a parsed map, classifying each tile: a non-zero
    /// class is traversable.
    pub fn from_parsed(
        parsed: &ParsedMap,
        classifier: &impl TerrainClassifier,
    ) -> Result<Self, MapError> {
        let (w, h) = (parsed.header.width, parsed.header.height);
        let mut map = Self::try_new(w, h)?;
        for y in 0..h {
            for x in 0..w {
                let id = map.to_padded_id(x, y);
                map.set_label(id, classifier.classify(parsed.tile(x, y)) != 0);
            }
        }
        Ok(map)
    }

    /// Parse octile map text.
    pub fn parse(text: &str) -> Result<Self, MapError> {
        Self::from_parsed(&parser::parse_map(text)?, &OctileTerrain)
    }

    /// Load an octile map file. The path is remembered so derived data (such
    /// as a jump point database) can be stored next to it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let mut map = Self::from_parsed(&parser::load_map(path)?, &OctileTerrain)?;
        log::debug!(
            "loaded map {}: {}x{}, {} traversable cells",
            path.display(),
            map.width,
            map.height,
            map.traversable_count()
        );
        map.filename = Some(path.to_path_buf());
        Ok(map)
    }

    /// Build a grid from rows of terrain characters, top row first.
    pub fn from_rows(rows: &[&str]) -> Result<Self, MapError> {
        let width = rows.first().map_or(0, |r| r.len());
        let mut tiles = Vec::with_capacity(width * rows.len());
        for (row, r) in rows.iter().enumerate() {
            if r.len() != width {
                return Err(MapError::RaggedRows {
                    row,
                    expected: width,
                    found: r.len(),
                });
            }
            tiles.extend_from_slice(r.as_bytes());
        }
        let too_large = || MapError::TooLarge {
            width: u32::MAX,
            height: u32::MAX,
        };
        let parsed = ParsedMap {
            header: parser::MapHeader {
                kind: parser::MAP_TYPE_OCTILE.to_string(),
                height: u32::try_from(rows.len()).map_err(|_| too_large())?,
                width: u32::try_from(width).map_err(|_| too_large())?,
            },
            tiles,
        };
        Self::from_parsed(&parsed, &OctileTerrain)
    }

    /// Path the map was loaded from, if any.
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// Remember `path` as the map's origin.
    pub fn set_filename(&mut self, path: impl Into<PathBuf>) {
        self.filename = Some(path.into());
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
    pub fn padded_height(&self) -> u32 {
        self.padded_height
    }

    /// Number of cells including padding; every id is below this.
    #[inline]
    pub fn padded_size(&self) -> u32 {
        self.padded_width * self.padded_height
    }

    /// Padded id of unpadded `(x, y)`. The caller guarantees `(x, y)` lies
    /// inside the map; see [`padded_id`](Self::padded_id) for a checked form.
    #[inline]
    pub fn to_padded_id(&self, x: u32, y: u32) -> PaddedId {
        (y + PADDED_ROWS_BEFORE) * self.padded_width + x
    }

    /// Padded id of a point, or `None` outside the map.
    pub fn padded_id(&self, p: Point) -> Option<PaddedId> {
        let x = u32::try_from(p.x).ok().filter(|x| *x < self.width)?;
        let y = u32::try_from(p.y).ok().filter(|y| *y < self.height)?;
        Some(self.to_padded_id(x, y))
    }

    /// Unpadded `(x, y)` of an id inside the map.
    #[inline]
    pub fn to_unpadded_xy(&self, id: PaddedId) -> (u32, u32) {
        (id % self.padded_width, id / self.padded_width - PADDED_ROWS_BEFORE)
    }

    /// Padded `(x, y)` of any id.
    #[inline]
    pub fn to_padded_xy(&self, id: PaddedId) -> (u32, u32) {
        (id % self.padded_width, id / self.padded_width)
    }

    /// Unpadded coordinates of an id inside the map, as a point.
    pub fn point(&self, id: PaddedId) -> Point {
        let (x, y) = self.to_unpadded_xy(id);
        Point::new(x as i32, y as i32)
    }

    #[inline]
    pub fn get_label(&self, id: PaddedId) -> bool {
        self.bits.get(id as usize)
    }

    #[inline]
    pub fn set_label(&mut self, id: PaddedId, traversable: bool) {
        self.bits.set(id as usize, traversable);
    }

    /// Whether `id` names an open cell. Padding and ids past the end are
    /// blocked.
    #[inline]
    pub fn is_traversable(&self, id: PaddedId) -> bool {
        self.get_label(id)
    }

    /// Number of open cells.
    pub fn traversable_count(&self) -> usize {
        self.bits.count_ones()
    }

    /// The 3×3 window around `id`, packed as described in
    /// [`tile`](crate::direction::tile).
    ///
    /// `id` must lie inside the map.
    #[inline]
    pub fn neighbours(&self, id: PaddedId) -> u32 {
        let id = id as usize;
        let pw = self.padded_width as usize;
        let above = self.bits.window32(id - pw - 1) & 7;
        let mid = self.bits.window32(id - 1) & 7;
        let below = self.bits.window32(id + pw - 1) & 7;
        above | mid << 8 | below << 16
    }

    /// 32 cells of the rows above, at and below `id`, with `id`'s column in
    /// the lowest bit of each word.
    #[inline]
    pub fn neighbours_32bit(&self, id: PaddedId) -> [u32; 3] {
        let id = id as usize;
        let pw = self.padded_width as usize;
        [
            self.bits.window32(id - pw),
            self.bits.window32(id),
            self.bits.window32(id + pw),
        ]
    }

    /// 32 cells of the rows above, at and below `id`, ending at `id`'s
    /// column, which lands in the highest bit of each word.
    #[inline]
    pub fn neighbours_upper_32bit(&self, id: PaddedId) -> [u32; 3] {
        let id = id as usize - 31;
        let pw = self.padded_width as usize;
        [
            self.bits.window32(id - pw),
            self.bits.window32(id),
            self.bits.window32(id + pw),
        ]
    }

    /// This map rotated 90° clockwise: a `height` × `width` map where
    /// unpadded `(x, y)` moves to `(height - 1 - y, x)`.
    ///
    /// Travelling north on this map is travelling east on the rotated one
    /// and south becomes west, so vertical scans can reuse the row scanner.
    pub fn rotate_cw(&self) -> GridMap {
        let mut r = GridMap::new(self.height, self.width);
        for y in 0..self.height {
            for x in 0..self.width {
                let id = self.to_padded_id(x, y);
                let rid = r.to_padded_id(self.height - 1 - y, x);
                r.set_label(rid, self.get_label(id));
            }
        }
        r
    }
}

impl fmt::Debug for GridMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridMap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("padded_width", &self.padded_width)
            .field("padded_height", &self.padded_height)
            .field("filename", &self.filename)
            .finish_non_exhaustive()
    }
}

/// Renders the unpadded map, `.` for open and `@` for blocked cells.
impl fmt::Display for GridMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let c = if self.get_label(self.to_padded_id(x, y)) { '.' } else { '@' };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
