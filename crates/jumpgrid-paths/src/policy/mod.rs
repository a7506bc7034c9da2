//! Expansion policies: the successor generators the search driver runs on.
//!
//! | Policy | Map | Successors |
//! |---|---|---|
//! | [`GridExpansion`] | [`GridMap`](jumpgrid_core::GridMap) | every open neighbour |
//! | [`WeightedGridExpansion`] | [`WeightedGridMap`](jumpgrid_core::WeightedGridMap) | every open neighbour, terrain costs |
//! | [`JpsExpansion`] | `GridMap` | one jump point per pruned direction |
//! | [`JpsMultiExpansion`] | `GridMap` | every jump point a pruned direction leads to |

mod grid;
mod jps;
mod jps_multi;
mod weighted;

pub use grid::GridExpansion;
pub use jps::{Jps, JpsExpansion, JpsPlus};
pub use jps_multi::{Jps2, Jps2Plus, JpsMultiExpansion};
pub use weighted::WeightedGridExpansion;

use jumpgrid_core::{Direction, PaddedId};

/// The id one step from `id` in direction `d` on a grid with row stride
/// `padded_width`.
#[inline]
pub(crate) fn step(padded_width: u32, id: PaddedId, d: Direction) -> PaddedId {
    let (dx, dy) = d.delta();
    id.wrapping_add_signed(dy * padded_width as i32 + dx)
}
