//! Jump point locators.
//!
//! A locator answers "travelling from this cell in this direction, where is
//! the next cell worth expanding?" without generating the cells in between.
//! The online locators scan the grid at query time; the offline ones read a
//! precomputed [`JumpDatabase`].

mod database;
mod offline;
mod offline_multi;
mod online;
mod online_multi;

pub use database::{DEAD_END_FLAG, JUMP_DB_SUFFIX, JumpDatabase, JumpDbError, JumpLabel, MAX_JUMP_STEPS};
pub use offline::OfflineJumpLocator;
pub use offline_multi::OfflineMultiJumpLocator;
pub use online::OnlineJumpLocator;
pub use online_multi::OnlineMultiJumpLocator;

use jumpgrid_core::{Cost, Direction, PaddedId};

/// Outcome of a single jump.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Jump {
    /// The jump point, or `None` when the run ends against an obstacle.
    pub node: Option<PaddedId>,
    /// Cost to the jump point, or to the last open cell of a dead end.
    pub cost: Cost,
}

impl Jump {
    #[inline]
    pub const fn to(node: PaddedId, cost: Cost) -> Self {
        Self {
            node: Some(node),
            cost,
        }
    }

    #[inline]
    pub const fn dead_end(cost: Cost) -> Self {
        Self { node: None, cost }
    }
}

/// A jump point together with the direction of travel that reached it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct JumpPoint {
    pub id: PaddedId,
    pub cost: Cost,
    pub direction: Direction,
}

/// Finds the first jump point in one direction.
pub trait JumpLocator {
    /// Jump from `node` in direction `d`. Reaching `goal` ends the jump; pass
    /// [`INVALID_ID`](jumpgrid_core::INVALID_ID) for no goal.
    fn jump(&self, d: Direction, node: PaddedId, goal: PaddedId) -> Jump;
}

/// Finds every jump point a direction leads to.
///
/// Diagonal runs do not stop at their first jump point: the cardinal jump
/// points found from every diagonal jump point along the run are returned
/// instead, each tagged with its cardinal direction.
pub trait MultiJumpLocator {
    fn jump_all(&self, d: Direction, node: PaddedId, goal: PaddedId, out: &mut Vec<JumpPoint>);
}

/// Distance from `from` to `to` along increasing ids, or `u32::MAX` when
/// there is no goal.
#[inline]
pub(crate) fn forward_delta(from: PaddedId, to: PaddedId) -> u32 {
    if to == jumpgrid_core::INVALID_ID {
        u32::MAX
    } else {
        to.wrapping_sub(from)
    }
}

/// Distance from `from` to `to` along decreasing ids, or `u32::MAX` when
/// there is no goal.
#[inline]
pub(crate) fn backward_delta(from: PaddedId, to: PaddedId) -> u32 {
    if to == jumpgrid_core::INVALID_ID {
        u32::MAX
    } else {
        from.wrapping_sub(to)
    }
}
