//! Classification of map characters into traversal costs.

/// Terrain kinds of the octile map format.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Terrain {
    Ground,
    Swamp,
    Water,
    Tree,
    Obstacle,
    OutOfBounds,
    /// Any character the format does not name.
    Other(u8),
}

impl Terrain {
    /// Classify a map character.
    pub fn of(tile: u8) -> Self {
        match tile {
            b'.' | b'G' => Self::Ground,
            b'S' => Self::Swamp,
            b'W' => Self::Water,
            b'T' => Self::Tree,
            b'@' => Self::Obstacle,
            b'O' => Self::OutOfBounds,
            other => Self::Other(other),
        }
    }

    /// Whether a uniform-cost walker may enter this terrain.
    pub fn is_traversable(self) -> bool {
        !matches!(
            self,
            Self::Water | Self::Tree | Self::Obstacle | Self::OutOfBounds
        )
    }
}

/// Maps a tile character to a cost byte; 0 marks an obstacle.
pub trait TerrainClassifier {
    fn classify(&self, tile: u8) -> u8;
}

/// Uniform-cost classification: 1 for traversable terrain, 0 otherwise.
#[derive(Copy, Clone, Debug, Default)]
pub struct OctileTerrain;

impl TerrainClassifier for OctileTerrain {
    fn classify(&self, tile: u8) -> u8 {
        u8::from(Terrain::of(tile).is_traversable())
    }
}

/// Weighted classification: `@` is an obstacle, every other character costs
/// its byte value.
#[derive(Copy, Clone, Debug, Default)]
pub struct WeightedTerrain;

impl TerrainClassifier for WeightedTerrain {
    fn classify(&self, tile: u8) -> u8 {
        match Terrain::of(tile) {
            Terrain::Obstacle => 0,
            _ => tile,
        }
    }
}
