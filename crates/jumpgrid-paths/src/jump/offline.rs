use std::sync::Arc;

use jumpgrid_core::{Direction, GridMap, INVALID_ID, ONE, PaddedId, ROOT_TWO};

use super::database::{JumpDatabase, JumpDbError};
use super::{Jump, JumpLocator, JumpPoint, backward_delta, forward_delta};

/// Answers jumps from a [`JumpDatabase`] in constant time.
///
/// Labels are built without a goal, so each query also checks whether the
/// goal lies on the run it reads.
#[derive(Clone, Debug)]
pub struct OfflineJumpLocator {
    map: Arc<GridMap>,
    db: Arc<JumpDatabase>,
}

impl OfflineJumpLocator {
    /// Fails with [`JumpDbError::Corrupt`] unless `db` holds one label per
    /// cell and direction of `map`.
    pub fn new(map: Arc<GridMap>, db: Arc<JumpDatabase>) -> Result<Self, JumpDbError> {
        let expected = JumpDatabase::records_for(&map);
        if db.len() != expected {
            return Err(JumpDbError::Corrupt(format!(
                "{} labels for a map that needs {expected}",
                db.len()
            )));
        }
        Ok(Self { map, db })
    }

    /// Use the database stored next to the map file, building it if needed.
    pub fn load_or_build(map: Arc<GridMap>) -> Result<Self, JumpDbError> {
        let db = JumpDatabase::load_or_build(&map)?;
        Self::new(map, Arc::new(db))
    }

    pub fn map(&self) -> &Arc<GridMap> {
        &self.map
    }

    pub fn database(&self) -> &Arc<JumpDatabase> {
        &self.db
    }

    /// The id `steps` cells from `node` in direction `d`.
    #[inline]
    pub(crate) fn offset(&self, d: Direction, node: PaddedId, steps: u32) -> PaddedId {
        let (dx, dy) = d.delta();
        let delta = dy * self.map.padded_width() as i32 + dx;
        node.wrapping_add_signed(delta * steps as i32)
    }

    /// `d` must be cardinal.
    pub(crate) fn straight(&self, d: Direction, node: PaddedId, goal: PaddedId) -> Jump {
        debug_assert!(!d.is_diagonal());
        let label = self.db.label(node, d);
        let steps = label.steps();
        let width = self.map.padded_width();
        let goal_dist = match d {
            Direction::East => Some(forward_delta(node, goal)),
            Direction::West => Some(backward_delta(node, goal)),
            _ if goal == INVALID_ID || goal % width != node % width => None,
            Direction::North => node.checked_sub(goal).map(|n| n / width),
            _ => goal.checked_sub(node).map(|n| n / width),
        };
        if let Some(k) = goal_dist.filter(|k| *k <= steps) {
            return Jump::to(goal, k * ONE);
        }
        let cost = steps * ONE;
        if label.is_dead_end() {
            Jump::dead_end(cost)
        } else {
            Jump::to(self.offset(d, node, steps), cost)
        }
    }

    /// Reach the goal from `node` by at most `max_steps` diagonal steps in
    /// `d` followed by one straight jump. The direction of the returned point
    /// is that of the straight leg.
    pub(crate) fn goal_via_diagonal(
        &self,
        d: Direction,
        node: PaddedId,
        goal: PaddedId,
        max_steps: u32,
    ) -> Option<JumpPoint> {
        let (vertical, horizontal) = d.components()?;
        if goal == INVALID_ID {
            return None;
        }
        let (nx, ny) = self.map.to_padded_xy(node);
        let (gx, gy) = self.map.to_padded_xy(goal);
        let (dx, dy) = d.delta();
        let xdelta = if dx > 0 { gx.checked_sub(nx) } else { nx.checked_sub(gx) }?;
        let ydelta = if dy > 0 { gy.checked_sub(ny) } else { ny.checked_sub(gy) }?;

        let (k, leg) = if ydelta < xdelta {
            (ydelta, horizontal)
        } else {
            (xdelta, vertical)
        };
        if k > max_steps {
            return None;
        }
        let j = self.straight(leg, self.offset(d, node, k), goal);
        (j.node == Some(goal)).then(|| JumpPoint {
            id: goal,
            cost: k * ROOT_TWO + j.cost,
            direction: leg,
        })
    }
}

impl JumpLocator for OfflineJumpLocator {
    fn jump(&self, d: Direction, node: PaddedId, goal: PaddedId) -> Jump {
        if !d.is_diagonal() {
            return self.straight(d, node, goal);
        }
        let label = self.db.label(node, d);
        let steps = label.steps();
        if let Some(jp) = self.goal_via_diagonal(d, node, goal, steps) {
            return Jump::to(jp.id, jp.cost);
        }
        let cost = steps * ROOT_TWO;
        if label.is_dead_end() {
            Jump::dead_end(cost)
        } else {
            Jump::to(self.offset(d, node, steps), cost)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jump::OnlineJumpLocator;
    use Direction::*;

    const ROWS: [&str; 6] = [
        "..........",
        "..@.......",
        "..@...@@..",
        "......@...",
        ".@@.......",
        "........@.",
    ];

    fn locators() -> (OnlineJumpLocator, OfflineJumpLocator) {
        let map = Arc::new(GridMap::from_rows(&ROWS).unwrap());
        let db = Arc::new(JumpDatabase::build(&map).unwrap());
        (
            OnlineJumpLocator::new(map.clone()),
            OfflineJumpLocator::new(map, db).unwrap(),
        )
    }

    fn open_cells(map: &GridMap) -> Vec<PaddedId> {
        (0..map.header_height())
            .flat_map(|y| (0..map.header_width()).map(move |x| (x, y)))
            .map(|(x, y)| map.to_padded_id(x, y))
            .filter(|id| map.is_traversable(*id))
            .collect()
    }

    #[test]
    fn agrees_with_online_without_goal() {
        let (online, offline) = locators();
        for id in open_cells(online.map()) {
            for d in Direction::ALL {
                assert_eq!(
                    online.jump(d, id, INVALID_ID),
                    offline.jump(d, id, INVALID_ID),
                    "{d} from {id}"
                );
            }
        }
    }

    #[test]
    fn straight_jumps_agree_with_online_for_every_goal() {
        let (online, offline) = locators();
        let cells = open_cells(online.map());
        for &id in &cells {
            for &goal in &cells {
                for d in [North, East, South, West] {
                    assert_eq!(
                        online.jump(d, id, goal),
                        offline.jump(d, id, goal),
                        "{d} from {id} towards {goal}"
                    );
                }
            }
        }
    }

    fn offline(rows: &[&str]) -> OfflineJumpLocator {
        let map = Arc::new(GridMap::from_rows(rows).unwrap());
        let db = Arc::new(JumpDatabase::build(&map).unwrap());
        OfflineJumpLocator::new(map, db).unwrap()
    }

    #[test]
    fn diagonal_intercepts_goal() {
        let l = offline(&[".....", ".....", ".....", ".....", "....."]);
        let m = l.map().clone();
        let start = m.to_padded_id(0, 0);

        let goal = m.to_padded_id(4, 2);
        assert_eq!(l.jump(SouthEast, start, goal), Jump::to(goal, 2 * ROOT_TWO + 2 * ONE));
        let goal = m.to_padded_id(1, 4);
        assert_eq!(l.jump(SouthEast, start, goal), Jump::to(goal, ROOT_TWO + 3 * ONE));
        let goal = m.to_padded_id(0, 3);
        assert_eq!(l.jump(SouthEast, start, goal), Jump::to(goal, 3 * ONE));
        // outside the quadrant the label is used as is
        let goal = m.to_padded_id(4, 4);
        assert_eq!(
            l.jump(SouthWest, m.to_padded_id(3, 0), goal),
            Jump::dead_end(3 * ROOT_TWO)
        );
    }

    #[test]
    fn blocked_leg_falls_back_to_label() {
        let l = offline(&["....", "....", "@@@.", "...."]);
        let m = l.map().clone();
        let goal = m.to_padded_id(1, 3);
        assert_eq!(
            l.jump(SouthEast, m.to_padded_id(0, 0), goal),
            Jump::to(m.to_padded_id(1, 1), ROOT_TWO)
        );
    }

    #[test]
    fn database_for_another_map_is_rejected() {
        let small = Arc::new(GridMap::from_rows(&["...", "...", "..."]).unwrap());
        let wide_row = ".".repeat(40);
        let wide = Arc::new(GridMap::from_rows(&[wide_row.as_str(), wide_row.as_str()]).unwrap());
        let db = Arc::new(JumpDatabase::build(&small).unwrap());
        assert!(matches!(
            OfflineJumpLocator::new(wide.clone(), db.clone()),
            Err(JumpDbError::Corrupt(_))
        ));
        assert!(matches!(
            crate::policy::JpsPlus::new(wide, db.clone()),
            Err(JumpDbError::Corrupt(_))
        ));
        assert!(OfflineJumpLocator::new(small, db).is_ok());
    }
}
