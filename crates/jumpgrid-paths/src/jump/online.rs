//! Jump point location by scanning the grid at query time.
//!
//! Straight jumps test 32 cells per read: within one window, a forced
//! neighbour is an open cell in the row above or below that follows a
//! blocked one, and a dead end is a blocked cell in the travelled row.
//! Vertical jumps run the same row scan on a copy of the map rotated 90°
//! clockwise, where north becomes east and south becomes west.

use std::sync::Arc;

use jumpgrid_core::{Direction, GridMap, INVALID_ID, ONE, PaddedId, ROOT_TWO};

use super::{Jump, JumpLocator, backward_delta, forward_delta};

/// Scans the grid for each jump.
#[derive(Clone, Debug)]
pub struct OnlineJumpLocator {
    map: Arc<GridMap>,
    rmap: Arc<GridMap>,
}

/// Where a diagonal run stopped and what the two straight probes saw there.
#[derive(Copy, Clone, Debug)]
pub(crate) struct DiagonalStop {
    /// The diagonal jump point, `None` for a dead end.
    pub node: Option<PaddedId>,
    /// Diagonal steps taken.
    pub steps: u32,
    /// Vertical probe from the last cell, in map ids.
    pub vertical: Jump,
    /// Horizontal probe from the last cell.
    pub horizontal: Jump,
}

impl OnlineJumpLocator {
    pub fn new(map: Arc<GridMap>) -> Self {
        let rmap = Arc::new(map.rotate_cw());
        Self { map, rmap }
    }

    pub fn map(&self) -> &Arc<GridMap> {
        &self.map
    }

    /// The map rotated 90° clockwise.
    pub fn rotated_map(&self) -> &GridMap {
        &self.rmap
    }

    fn to_rmap_id(&self, id: PaddedId) -> PaddedId {
        if id == INVALID_ID {
            return INVALID_ID;
        }
        let (x, y) = self.map.to_unpadded_xy(id);
        self.rmap
            .to_padded_id(self.map.header_height() - y - 1, x)
    }

    fn from_rmap_id(&self, rid: PaddedId) -> PaddedId {
        let (rx, ry) = self.rmap.to_unpadded_xy(rid);
        self.map
            .to_padded_id(ry, self.rmap.header_width() - rx - 1)
    }

    fn unrotate(&self, j: Jump) -> Jump {
        Jump {
            node: j.node.map(|rid| self.from_rmap_id(rid)),
            cost: j.cost,
        }
    }

    pub fn jump_east(&self, node: PaddedId, goal: PaddedId) -> Jump {
        scan_forward(&self.map, node, goal)
    }

    pub fn jump_west(&self, node: PaddedId, goal: PaddedId) -> Jump {
        scan_backward(&self.map, node, goal)
    }

    pub fn jump_north(&self, node: PaddedId, goal: PaddedId) -> Jump {
        let j = scan_forward(&self.rmap, self.to_rmap_id(node), self.to_rmap_id(goal));
        self.unrotate(j)
    }

    pub fn jump_south(&self, node: PaddedId, goal: PaddedId) -> Jump {
        let j = scan_backward(&self.rmap, self.to_rmap_id(node), self.to_rmap_id(goal));
        self.unrotate(j)
    }

    /// Step diagonally from `node` until a straight probe from the current
    /// cell finds a jump point (or the goal), or until the next step would
    /// enter an obstacle or cut a corner.
    ///
    /// `d` must be diagonal.
    pub(crate) fn diagonal_stop(&self, d: Direction, node: PaddedId, goal: PaddedId) -> DiagonalStop {
        debug_assert!(d.is_diagonal());
        let blocked = Jump::dead_end(0);
        if self.map.neighbours(node) & d.step_mask() != d.step_mask() {
            return DiagonalStop {
                node: None,
                steps: 0,
                vertical: blocked,
                horizontal: blocked,
            };
        }

        let (dx, dy) = d.delta();
        let map_delta = dy * self.map.padded_width() as i32 + dx;
        // (x, y) -> (height - 1 - y, x)
        let rmap_delta = dx * self.rmap.padded_width() as i32 - dy;
        let (north, east) = (dy < 0, dx > 0);

        let rgoal = self.to_rmap_id(goal);
        let mut next = node;
        let mut rnext = self.to_rmap_id(node);
        let mut steps = 0;
        loop {
            steps += 1;
            next = next.wrapping_add_signed(map_delta);
            rnext = rnext.wrapping_add_signed(rmap_delta);
            let vertical = scan(&self.rmap, north, rnext, rgoal);
            let horizontal = scan(&self.map, east, next, goal);
            if vertical.node.is_some() || horizontal.node.is_some() {
                return DiagonalStop {
                    node: Some(next),
                    steps,
                    vertical: self.unrotate(vertical),
                    horizontal,
                };
            }
            if self.map.neighbours(next) & d.step_mask() != d.step_mask() {
                return DiagonalStop {
                    node: None,
                    steps,
                    vertical,
                    horizontal,
                };
            }
        }
    }
}

impl JumpLocator for OnlineJumpLocator {
    fn jump(&self, d: Direction, node: PaddedId, goal: PaddedId) -> Jump {
        match d {
            Direction::North => self.jump_north(node, goal),
            Direction::South => self.jump_south(node, goal),
            Direction::East => self.jump_east(node, goal),
            Direction::West => self.jump_west(node, goal),
            _ => {
                let stop = self.diagonal_stop(d, node, goal);
                let cost = stop.steps * ROOT_TWO;
                match stop.node {
                    Some(n) => Jump::to(n, cost),
                    None => Jump::dead_end(cost),
                }
            }
        }
    }
}

#[inline]
pub(crate) fn scan(map: &GridMap, forward: bool, node: PaddedId, goal: PaddedId) -> Jump {
    if forward {
        scan_forward(map, node, goal)
    } else {
        scan_backward(map, node, goal)
    }
}

/// Jump towards increasing ids along a row.
fn scan_forward(map: &GridMap, node: PaddedId, goal: PaddedId) -> Jump {
    let mut jump = node;
    let dead_end = loop {
        let [above, row, below] = map.neighbours_32bit(jump);
        let forced = ((!above << 1) & above) | ((!below << 1) & below);
        let blocked = !row;
        let stop = forced | blocked;
        if stop != 0 {
            let pos = stop.trailing_zeros();
            jump += pos;
            break blocked & (1 << pos) != 0;
        }
        // the last cell of this window starts the next one
        jump += 31;
    };
    finish(jump - node, forward_delta(node, goal), jump, goal, dead_end)
}

/// Jump towards decreasing ids along a row.
fn scan_backward(map: &GridMap, node: PaddedId, goal: PaddedId) -> Jump {
    let mut jump = node;
    let dead_end = loop {
        let [above, row, below] = map.neighbours_upper_32bit(jump);
        let forced = ((!above >> 1) & above) | ((!below >> 1) & below);
        let blocked = !row;
        let stop = forced | blocked;
        if stop != 0 {
            let pos = stop.leading_zeros();
            jump -= pos;
            break blocked & (0x8000_0000 >> pos) != 0;
        }
        jump -= 31;
    };
    finish(node - jump, backward_delta(node, goal), jump, goal, dead_end)
}

/// The goal wins when it lies strictly before the stopping cell; a dead end
/// reports the distance to its last open cell.
#[inline]
fn finish(steps: u32, goal_dist: u32, jump: PaddedId, goal: PaddedId, dead_end: bool) -> Jump {
    if steps > goal_dist {
        Jump::to(goal, goal_dist * ONE)
    } else if dead_end {
        Jump::dead_end(steps.saturating_sub(1) * ONE)
    } else {
        Jump::to(jump, steps * ONE)
    }
}
