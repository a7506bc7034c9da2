//! **jumpgrid-core**: grid maps for 8-connected pathfinding.
//!
//! This crate provides the storage side of the workspace:
//!
//! - [`GridMap`]: padded, bit-packed uniform-cost grid with 3×3 and 32-cell
//!   neighbourhood reads
//! - [`WeightedGridMap`]: byte-per-cell terrain cost grid
//! - [`Direction`] and the jump point pruning rules in [`direction`]
//! - the octile map file reader in [`parser`]
//! - cost units in [`constants`]

pub mod bitset;
pub mod constants;
pub mod direction;
pub mod error;
pub mod geom;
pub mod gridmap;
pub mod parser;
pub mod terrain;
pub mod weighted;

pub use bitset::BitSet;
pub use constants::{Cost, INVALID_ID, ONE, PaddedId, ROOT_TWO, UNREACHABLE, cost_to_f64};
pub use direction::{
    Direction, DirectionSet, compute_forced, compute_natural, compute_successors, tile,
};
pub use error::MapError;
pub use geom::Point;
pub use gridmap::GridMap;
pub use parser::{MapHeader, ParsedMap};
pub use terrain::{OctileTerrain, Terrain, TerrainClassifier, WeightedTerrain};
pub use weighted::WeightedGridMap;
