//! Distance estimates between padded ids.

use jumpgrid_core::{Cost, ONE, PaddedId, ROOT_TWO};

/// Lower bound on the cost from `id` to `goal`.
pub trait Heuristic {
    fn h(&self, id: PaddedId, goal: PaddedId) -> Cost;
}

/// Octile distance: diagonal steps as far as possible, then straight ones.
#[inline]
pub fn octile(dx: u32, dy: u32) -> Cost {
    let diagonal = dx.min(dy);
    diagonal * ROOT_TWO + (dx.max(dy) - diagonal) * ONE
}

/// Manhattan distance in cost units.
#[inline]
pub fn manhattan(dx: u32, dy: u32) -> Cost {
    (dx + dy) * ONE
}

#[inline]
fn deltas(width: u32, a: PaddedId, b: PaddedId) -> (u32, u32) {
    ((a % width).abs_diff(b % width), (a / width).abs_diff(b / width))
}

/// Exact on an open 8-connected grid without corner cutting.
#[derive(Copy, Clone, Debug)]
pub struct OctileHeuristic {
    width: u32,
}

impl OctileHeuristic {
    /// `padded_width` is the row stride of the ids being compared.
    pub fn new(padded_width: u32) -> Self {
        Self {
            width: padded_width,
        }
    }
}

impl Heuristic for OctileHeuristic {
    #[inline]
    fn h(&self, id: PaddedId, goal: PaddedId) -> Cost {
        let (dx, dy) = deltas(self.width, id, goal);
        octile(dx, dy)
    }
}

/// Admissible only for 4-connected movement; kept for comparison runs.
#[derive(Copy, Clone, Debug)]
pub struct ManhattanHeuristic {
    width: u32,
}

impl ManhattanHeuristic {
    pub fn new(padded_width: u32) -> Self {
        Self {
            width: padded_width,
        }
    }
}

impl Heuristic for ManhattanHeuristic {
    #[inline]
    fn h(&self, id: PaddedId, goal: PaddedId) -> Cost {
        let (dx, dy) = deltas(self.width, id, goal);
        manhattan(dx, dy)
    }
}

/// Always zero; turns A* into Dijkstra's algorithm.
#[derive(Copy, Clone, Debug, Default)]
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    #[inline]
    fn h(&self, _id: PaddedId, _goal: PaddedId) -> Cost {
        0
    }
}
