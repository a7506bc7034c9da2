//! Precomputed jump distances.
//!
//! For every cell and direction the database stores what the online locator
//! finds when jumping with no goal: the number of steps to the next jump
//! point, or to the last open cell of a dead-end run, and a dead-end flag.
//!
//! ## File format
//!
//! ```text
//! [record_count: u32 LE]
//! record_count × [label: u16 LE]
//! ```
//!
//! Labels are ordered by padded id, then by [`Direction`] discriminant. The
//! file lives next to its map as `<map path>.jps+`.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;

use jumpgrid_core::gridmap::PADDED_ROWS_BEFORE;
use jumpgrid_core::{Direction, GridMap, INVALID_ID, ONE, PaddedId, ROOT_TWO};

use super::JumpLocator;
use super::online::OnlineJumpLocator;

/// Appended to a map's path to name its database file.
pub const JUMP_DB_SUFFIX: &str = ".jps+";

/// Label bit marking a run that ends against an obstacle.
pub const DEAD_END_FLAG: u16 = 0x8000;

/// Longest run a label can hold.
pub const MAX_JUMP_STEPS: u32 = (DEAD_END_FLAG - 1) as u32;

const DIRECTIONS: usize = Direction::ALL.len();

/// One stored jump.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct JumpLabel(u16);

impl JumpLabel {
    #[inline]
    pub fn steps(self) -> u32 {
        u32::from(self.0 & !DEAD_END_FLAG)
    }

    #[inline]
    pub fn is_dead_end(self) -> bool {
        self.0 & DEAD_END_FLAG != 0
    }

    #[inline]
    pub fn raw(self) -> u16 {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur when building, reading or writing a database.
#[derive(Debug)]
pub enum JumpDbError {
    /// The database file could not be read or written.
    Io { path: PathBuf, source: io::Error },
    /// A stream ended early or held the wrong number of records.
    Corrupt(String),
    /// A run is longer than a label can hold.
    Overflow {
        x: u32,
        y: u32,
        direction: Direction,
        steps: u32,
    },
}

impl fmt::Display for JumpDbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "jump database {}: {source}", path.display())
            }
            Self::Corrupt(s) => write!(f, "jump database corrupt: {s}"),
            Self::Overflow {
                x,
                y,
                direction,
                steps,
            } => write!(
                f,
                "jump from ({x}, {y}) towards {direction} takes {steps} steps, more than {MAX_JUMP_STEPS}"
            ),
        }
    }
}

impl std::error::Error for JumpDbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// JumpDatabase
// ---------------------------------------------------------------------------

/// Jump labels for every cell and direction of one map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JumpDatabase {
    labels: Vec<u16>,
}

impl JumpDatabase {
    /// Number of labels a database for `map` holds.
    pub fn records_for(map: &GridMap) -> usize {
        map.padded_size() as usize * DIRECTIONS
    }

    /// Database file of the map stored at `map_path`.
    pub fn path_for(map_path: &Path) -> PathBuf {
        let mut s = map_path.as_os_str().to_owned();
        s.push(JUMP_DB_SUFFIX);
        PathBuf::from(s)
    }

    /// Run the online locator from every cell in every direction. Rows are
    /// processed in parallel.
    pub fn build(map: &Arc<GridMap>) -> Result<Self, JumpDbError> {
        Self::build_with(&OnlineJumpLocator::new(map.clone()))
    }

    pub fn build_with(locator: &OnlineJumpLocator) -> Result<Self, JumpDbError> {
        let map = locator.map();
        let row_len = map.padded_width() as usize * DIRECTIONS;
        let mut labels = vec![DEAD_END_FLAG; Self::records_for(map)];
        let first_row = PADDED_ROWS_BEFORE as usize;
        let rows = first_row..first_row + map.header_height() as usize;

        labels
            .par_chunks_mut(row_len)
            .enumerate()
            .filter(|(py, _)| rows.contains(py))
            .try_for_each(|(py, row)| {
                let y = (py - first_row) as u32;
                for x in 0..map.header_width() {
                    let id = map.to_padded_id(x, y);
                    if !map.is_traversable(id) {
                        continue;
                    }
                    for d in Direction::ALL {
                        let label = encode(locator, d, id).map_err(|steps| JumpDbError::Overflow {
                            x,
                            y,
                            direction: d,
                            steps,
                        })?;
                        row[x as usize * DIRECTIONS + d.index()] = label;
                    }
                }
                Ok::<_, JumpDbError>(())
            })?;

        log::info!(
            "built jump database: {}x{} map, {} labels",
            map.header_width(),
            map.header_height(),
            labels.len()
        );
        Ok(Self { labels })
    }

    /// Load the database stored next to `map`, or build it and try to store
    /// it there. Maps without a file name are built in memory only.
    ///
    /// A stored file with the wrong record count is rebuilt and overwritten;
    /// a truncated or unreadable one is an error.
    pub fn load_or_build(map: &Arc<GridMap>) -> Result<Self, JumpDbError> {
        let Some(map_path) = map.filename() else {
            return Self::build(map);
        };
        let path = Self::path_for(map_path);
        if let Some(db) = Self::load(&path, Self::records_for(map))? {
            return Ok(db);
        }
        let db = Self::build(map)?;
        if let Err(e) = db.save(&path) {
            log::warn!("{e}; continuing with the in-memory database");
        }
        Ok(db)
    }

    /// Read a database file holding exactly `expected` records.
    ///
    /// Returns `Ok(None)` when the file is missing or its record count
    /// differs.
    pub fn load(path: &Path, expected: usize) -> Result<Option<Self>, JumpDbError> {
        let io_err = |source| JumpDbError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_err(e)),
        };
        let mut reader = BufReader::new(file);
        let count = read_count(&mut reader).map_err(io_err)?;
        if count != expected {
            log::warn!(
                "{} holds {count} labels, expected {expected}; rebuilding",
                path.display()
            );
            return Ok(None);
        }
        let labels = read_labels(&mut reader, count).map_err(io_err)?;
        log::info!("loaded jump database {} ({count} labels)", path.display());
        Ok(Some(Self { labels }))
    }

    pub fn save(&self, path: &Path) -> Result<(), JumpDbError> {
        let io_err = |source| JumpDbError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
        self.write_to(&mut writer).map_err(io_err)?;
        writer.flush().map_err(io_err)?;
        log::info!("saved jump database {} ({} labels)", path.display(), self.labels.len());
        Ok(())
    }

    /// Serialise to `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let count = u32::try_from(self.labels.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "too many labels"))?;
        writer.write_all(&count.to_le_bytes())?;
        for label in &self.labels {
            writer.write_all(&label.to_le_bytes())?;
        }
        Ok(())
    }

    /// Deserialise from `reader`.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self, JumpDbError> {
        let corrupt = |e: io::Error| JumpDbError::Corrupt(e.to_string());
        let count = read_count(&mut reader).map_err(corrupt)?;
        let labels = read_labels(&mut reader, count).map_err(corrupt)?;
        Ok(Self { labels })
    }

    #[inline]
    pub fn label(&self, id: PaddedId, d: Direction) -> JumpLabel {
        JumpLabel(self.labels[id as usize * DIRECTIONS + d.index()])
    }

    /// Number of stored labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Label for one jump, or the step count when it does not fit.
fn encode(locator: &OnlineJumpLocator, d: Direction, id: PaddedId) -> Result<u16, u32> {
    let jump = locator.jump(d, id, INVALID_ID);
    let unit = if d.is_diagonal() { ROOT_TWO } else { ONE };
    let steps = jump.cost / unit;
    if steps > MAX_JUMP_STEPS {
        return Err(steps);
    }
    let flag = if jump.node.is_none() { DEAD_END_FLAG } else { 0 };
    Ok(steps as u16 | flag)
}

fn read_count<R: Read>(reader: &mut R) -> io::Result<usize> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf) as usize)
}

/// Labels decoded per read. The count comes from the stream, so memory
/// grows with the data actually read.
const READ_CHUNK_LABELS: usize = 1 << 16;

fn read_labels<R: Read>(reader: &mut R, count: usize) -> io::Result<Vec<u16>> {
    let mut labels = Vec::with_capacity(count.min(READ_CHUNK_LABELS));
    let mut buf = vec![0u8; 2 * count.min(READ_CHUNK_LABELS)];
    while labels.len() < count {
        let n = (count - labels.len()).min(READ_CHUNK_LABELS);
        let chunk = &mut buf[..2 * n];
        reader.read_exact(chunk)?;
        labels.extend(chunk.chunks_exact(2).map(|b| u16::from_le_bytes([b[0], b[1]])));
    }
    Ok(labels)
}
