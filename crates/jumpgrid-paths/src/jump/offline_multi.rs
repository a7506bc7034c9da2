use std::sync::Arc;

use jumpgrid_core::{Direction, GridMap, PaddedId, ROOT_TWO};

use super::database::{JumpDatabase, JumpDbError};
use super::offline::OfflineJumpLocator;
use super::{JumpPoint, MultiJumpLocator};

/// Database-backed counterpart of
/// [`OnlineMultiJumpLocator`](super::OnlineMultiJumpLocator).
///
/// Diagonal runs are followed label by label. Once the goal can be reached
/// from the current stretch of the run, it is returned and the run ends.
#[derive(Clone, Debug)]
pub struct OfflineMultiJumpLocator {
    inner: OfflineJumpLocator,
}

impl OfflineMultiJumpLocator {
    pub fn new(map: Arc<GridMap>, db: Arc<JumpDatabase>) -> Result<Self, JumpDbError> {
        OfflineJumpLocator::new(map, db).map(Self::from)
    }

    pub fn load_or_build(map: Arc<GridMap>) -> Result<Self, JumpDbError> {
        OfflineJumpLocator::load_or_build(map).map(Self::from)
    }

    pub fn map(&self) -> &Arc<GridMap> {
        self.inner.map()
    }
}

impl From<OfflineJumpLocator> for OfflineMultiJumpLocator {
    fn from(inner: OfflineJumpLocator) -> Self {
        Self { inner }
    }
}

impl MultiJumpLocator for OfflineMultiJumpLocator {
    fn jump_all(&self, d: Direction, node: PaddedId, goal: PaddedId, out: &mut Vec<JumpPoint>) {
        let Some((vertical, horizontal)) = d.components() else {
            let j = self.inner.straight(d, node, goal);
            if let Some(id) = j.node {
                out.push(JumpPoint {
                    id,
                    cost: j.cost,
                    direction: d,
                });
            }
            return;
        };

        let db = self.inner.database();
        let mut from = node;
        let mut cost_to_node = 0;
        loop {
            let label = db.label(from, d);
            let steps = label.steps();
            if let Some(jp) = self.inner.goal_via_diagonal(d, from, goal, steps) {
                out.push(JumpPoint {
                    cost: cost_to_node + jp.cost,
                    ..jp
                });
                return;
            }
            if label.is_dead_end() {
                return;
            }
            from = self.inner.offset(d, from, steps);
            cost_to_node += steps * ROOT_TWO;
            for leg in [vertical, horizontal] {
                let j = self.inner.straight(leg, from, goal);
                if let Some(id) = j.node {
                    out.push(JumpPoint {
                        id,
                        cost: cost_to_node + j.cost,
                        direction: leg,
                    });
                }
            }
        }
    }
}
