use std::sync::Arc;

use jumpgrid_core::{Direction, GridMap, PaddedId, ROOT_TWO};

use super::online::OnlineJumpLocator;
use super::{JumpLocator, JumpPoint, MultiJumpLocator};

/// Online locator that skips diagonal jump points.
///
/// A diagonal jump point only leads on to its two straight neighbours' jump
/// points, so instead of returning it this locator keeps walking the
/// diagonal and returns those straight jump points directly.
#[derive(Clone, Debug)]
pub struct OnlineMultiJumpLocator {
    inner: OnlineJumpLocator,
}

impl OnlineMultiJumpLocator {
    pub fn new(map: Arc<GridMap>) -> Self {
        Self {
            inner: OnlineJumpLocator::new(map),
        }
    }

    pub fn map(&self) -> &Arc<GridMap> {
        self.inner.map()
    }
}

impl From<OnlineJumpLocator> for OnlineMultiJumpLocator {
    fn from(inner: OnlineJumpLocator) -> Self {
        Self { inner }
    }
}

impl MultiJumpLocator for OnlineMultiJumpLocator {
    fn jump_all(&self, d: Direction, node: PaddedId, goal: PaddedId, out: &mut Vec<JumpPoint>) {
        let Some((vertical, horizontal)) = d.components() else {
            let j = self.inner.jump(d, node, goal);
            if let Some(id) = j.node {
                out.push(JumpPoint {
                    id,
                    cost: j.cost,
                    direction: d,
                });
            }
            return;
        };

        let mut from = node;
        let mut cost_to_node = 0;
        loop {
            let stop = self.inner.diagonal_stop(d, from, goal);
            let Some(jp) = stop.node else {
                return;
            };
            let run = cost_to_node + stop.steps * ROOT_TWO;
            if let Some(id) = stop.vertical.node {
                out.push(JumpPoint {
                    id,
                    cost: run + stop.vertical.cost,
                    direction: vertical,
                });
            }
            if let Some(id) = stop.horizontal.node.filter(|id| stop.vertical.node != Some(*id)) {
                out.push(JumpPoint {
                    id,
                    cost: run + stop.horizontal.cost,
                    direction: horizontal,
                });
            }
            cost_to_node = run;
            from = jp;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jumpgrid_core::{INVALID_ID, ONE};
    use Direction::*;

    fn locator(rows: &[&str]) -> (OnlineMultiJumpLocator, Arc<GridMap>) {
        let map = Arc::new(GridMap::from_rows(rows).unwrap());
        (OnlineMultiJumpLocator::new(map.clone()), map)
    }

    #[test]
    fn straight_returns_single_point() {
        let (l, m) = locator(&[".@....", "......"]);
        let mut out = Vec::new();
        l.jump_all(East, m.to_padded_id(0, 1), INVALID_ID, &mut out);
        assert_eq!(
            out,
            vec![JumpPoint {
                id: m.to_padded_id(2, 1),
                cost: 2 * ONE,
                direction: East
            }]
        );
        out.clear();
        l.jump_all(West, m.to_padded_id(0, 1), INVALID_ID, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn diagonal_returns_straight_jump_points() {
        let (l, m) = locator(&["......", "......", "...@..", "......"]);
        let mut out = Vec::new();
        l.jump_all(SouthEast, m.to_padded_id(0, 0), INVALID_ID, &mut out);
        // (1,1) is a diagonal jump point: its east probe meets the wall's
        // forced neighbour. The walk continues to (2,2), whose south probe
        // finds (2,3) and whose east neighbour is the wall.
        assert_eq!(
            out,
            vec![
                JumpPoint {
                    id: m.to_padded_id(4, 1),
                    cost: ROOT_TWO + 3 * ONE,
                    direction: East
                },
                JumpPoint {
                    id: m.to_padded_id(2, 3),
                    cost: 2 * ROOT_TWO + ONE,
                    direction: South
                },
            ]
        );
    }

    #[test]
    fn diagonal_reaches_goal() {
        let (l, m) = locator(&["....", "....", "....", "...."]);
        let mut out = Vec::new();
        let goal = m.to_padded_id(3, 3);
        l.jump_all(SouthEast, m.to_padded_id(0, 0), goal, &mut out);
        assert_eq!(
            out,
            vec![JumpPoint {
                id: goal,
                cost: 3 * ROOT_TWO,
                direction: South
            }]
        );
        out.clear();
        let goal = m.to_padded_id(3, 1);
        l.jump_all(SouthEast, m.to_padded_id(0, 0), goal, &mut out);
        assert_eq!(
            out,
            vec![JumpPoint {
                id: goal,
                cost: ROOT_TWO + 2 * ONE,
                direction: East
            }]
        );
    }
}
