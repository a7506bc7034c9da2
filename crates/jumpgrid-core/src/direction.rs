//! Compass directions and the jump point pruning rules.
//!
//! The pruning functions read the packed 3×3 window produced by
//! [`GridMap::neighbours`](crate::GridMap::neighbours); see [`tile`] for the
//! bit layout. Corner cutting is never allowed: a diagonal move needs both
//! adjacent cardinal cells open, and only cardinal arrivals have forced
//! neighbours.

use std::fmt;

/// Bit positions of the cells of a packed 3×3 neighbourhood window.
///
/// The row above occupies bits 0–2, the centre row bits 8–10 and the row
/// below bits 16–18, each row ordered west to east.
pub mod tile {
    pub const NW: u32 = 1 << 0;
    pub const N: u32 = 1 << 1;
    pub const NE: u32 = 1 << 2;
    pub const W: u32 = 1 << 8;
    pub const C: u32 = 1 << 9;
    pub const E: u32 = 1 << 10;
    pub const SW: u32 = 1 << 16;
    pub const S: u32 = 1 << 17;
    pub const SE: u32 = 1 << 18;
}

/// One of the eight compass directions. Odd discriminants are diagonal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Direction {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

impl Direction {
    /// All directions in discriminant order.
    pub const ALL: [Direction; 8] = [
        Self::North,
        Self::NorthEast,
        Self::East,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
    ];

    /// The direction with discriminant `i mod 8`.
    #[inline]
    pub const fn from_index(i: u8) -> Self {
        Self::ALL[(i & 7) as usize]
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn is_diagonal(self) -> bool {
        (self as u8) & 1 == 1
    }

    /// The opposite direction.
    #[inline]
    pub const fn reverse(self) -> Self {
        Self::from_index(self as u8 + 4)
    }

    /// Rotate 45° clockwise.
    #[inline]
    pub const fn clockwise(self) -> Self {
        Self::from_index(self as u8 + 1)
    }

    /// Rotate 45° counter-clockwise.
    #[inline]
    pub const fn counter_clockwise(self) -> Self {
        Self::from_index(self as u8 + 7)
    }

    /// Unit step `(dx, dy)`, y growing south.
    #[inline]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::NorthEast => (1, -1),
            Self::East => (1, 0),
            Self::SouthEast => (1, 1),
            Self::South => (0, 1),
            Self::SouthWest => (-1, 1),
            Self::West => (-1, 0),
            Self::NorthWest => (-1, -1),
        }
    }

    /// The direction of a unit step, if `(dx, dy)` is one.
    pub fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.delta() == (dx, dy))
    }

    /// Tile bit of the neighbour this direction points at.
    #[inline]
    pub const fn tile(self) -> u32 {
        match self {
            Self::North => tile::N,
            Self::NorthEast => tile::NE,
            Self::East => tile::E,
            Self::SouthEast => tile::SE,
            Self::South => tile::S,
            Self::SouthWest => tile::SW,
            Self::West => tile::W,
            Self::NorthWest => tile::NW,
        }
    }

    /// Cells that must be open to take one step this way from the centre:
    /// the centre, the target and, for diagonals, both adjacent cardinals.
    #[inline]
    pub const fn step_mask(self) -> u32 {
        match self {
            Self::North => tile::C | tile::N,
            Self::NorthEast => tile::C | tile::N | tile::NE | tile::E,
            Self::East => tile::C | tile::E,
            Self::SouthEast => tile::C | tile::E | tile::SE | tile::S,
            Self::South => tile::C | tile::S,
            Self::SouthWest => tile::C | tile::W | tile::SW | tile::S,
            Self::West => tile::C | tile::W,
            Self::NorthWest => tile::C | tile::W | tile::NW | tile::N,
        }
    }

    /// Vertical and horizontal parts of a diagonal; `None` for cardinals.
    #[inline]
    pub const fn components(self) -> Option<(Direction, Direction)> {
        match self {
            Self::NorthEast => Some((Self::North, Self::East)),
            Self::SouthEast => Some((Self::South, Self::East)),
            Self::SouthWest => Some((Self::South, Self::West)),
            Self::NorthWest => Some((Self::North, Self::West)),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::North => "N",
            Self::NorthEast => "NE",
            Self::East => "E",
            Self::SouthEast => "SE",
            Self::South => "S",
            Self::SouthWest => "SW",
            Self::West => "W",
            Self::NorthWest => "NW",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// DirectionSet
// ---------------------------------------------------------------------------

/// A set of directions stored as one bit per discriminant.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DirectionSet(u8);

impl DirectionSet {
    pub const EMPTY: Self = Self(0);
    pub const ALL: Self = Self(0xff);

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn contains(self, d: Direction) -> bool {
        self.0 & (1 << d as u8) != 0
    }

    #[inline]
    pub fn insert(&mut self, d: Direction) {
        self.0 |= 1 << d as u8;
    }

    #[inline]
    pub const fn with(self, d: Direction) -> Self {
        Self(self.0 | 1 << d as u8)
    }

    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in discriminant order.
    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

impl FromIterator<Direction> for DirectionSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut s = Self::EMPTY;
        for d in iter {
            s.insert(d);
        }
        s
    }
}

impl std::ops::BitOr for DirectionSet {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

// ---------------------------------------------------------------------------
// Pruning rules
// ---------------------------------------------------------------------------

/// Neighbours reachable only through the current cell when arriving in
/// direction `d`.
///
/// Only cardinal arrivals produce forced neighbours; `None` (the start node)
/// has none.
pub fn compute_forced(d: Option<Direction>, tiles: u32) -> DirectionSet {
    use Direction::*;
    let mut ret = DirectionSet::EMPTY;
    match d {
        Some(North) => {
            if tiles & (tile::W | tile::SW) == tile::W {
                ret = ret.with(West).with(NorthWest);
            }
            if tiles & (tile::E | tile::SE) == tile::E {
                ret = ret.with(East).with(NorthEast);
            }
        }
        Some(South) => {
            if tiles & (tile::W | tile::NW) == tile::W {
                ret = ret.with(West).with(SouthWest);
            }
            if tiles & (tile::E | tile::NE) == tile::E {
                ret = ret.with(East).with(SouthEast);
            }
        }
        Some(East) => {
            if tiles & (tile::N | tile::NW) == tile::N {
                ret = ret.with(North).with(NorthEast);
            }
            if tiles & (tile::S | tile::SW) == tile::S {
                ret = ret.with(South).with(SouthEast);
            }
        }
        Some(West) => {
            if tiles & (tile::N | tile::NE) == tile::N {
                ret = ret.with(North).with(NorthWest);
            }
            if tiles & (tile::S | tile::SE) == tile::S {
                ret = ret.with(South).with(SouthWest);
            }
        }
        _ => {}
    }
    ret
}

/// Neighbours that continue travel in direction `d` without passing through
/// a forced turn. `None` yields every open neighbour.
pub fn compute_natural(d: Option<Direction>, tiles: u32) -> DirectionSet {
    use Direction::*;
    let open = |mask: u32| tiles & mask == mask;
    let mut ret = DirectionSet::EMPTY;
    let mut add = |dir: Direction, mask: u32| {
        if open(mask) {
            ret.insert(dir);
        }
    };
    let diag = |dir: Direction| dir.step_mask() & !tile::C;

    match d {
        Some(North) => add(North, tile::N),
        Some(South) => add(South, tile::S),
        Some(East) => add(East, tile::E),
        Some(West) => add(West, tile::W),
        Some(NorthWest) => {
            add(North, tile::N);
            add(West, tile::W);
            add(NorthWest, diag(NorthWest));
        }
        Some(NorthEast) => {
            add(North, tile::N);
            add(East, tile::E);
            add(NorthEast, diag(NorthEast));
        }
        Some(SouthWest) => {
            add(South, tile::S);
            add(West, tile::W);
            add(SouthWest, diag(SouthWest));
        }
        Some(SouthEast) => {
            add(South, tile::S);
            add(East, tile::E);
            add(SouthEast, diag(SouthEast));
        }
        None => {
            for dir in Direction::ALL {
                let mask = if dir.is_diagonal() { diag(dir) } else { dir.tile() };
                add(dir, mask);
            }
        }
    }
    ret
}

/// Directions worth jumping in after arriving in direction `d`.
#[inline]
pub fn compute_successors(d: Option<Direction>, tiles: u32) -> DirectionSet {
    compute_forced(d, tiles) | compute_natural(d, tiles)
}
