use std::sync::Arc;

use jumpgrid_core::{GridMap, PaddedId, compute_successors};

use crate::expansion::{ExpansionPolicy, ProblemInstance, Successor};
use crate::jump::{
    JumpDatabase, JumpDbError, JumpPoint, MultiJumpLocator, OfflineMultiJumpLocator,
    OnlineMultiJumpLocator,
};
use crate::node::SearchNode;

/// Jump point search that never expands diagonal jump points.
///
/// Each pruned direction may contribute several successors. Their arrival
/// direction is the straight direction of their last leg, which is what the
/// next expansion prunes by.
#[derive(Clone, Debug)]
pub struct JpsMultiExpansion<L> {
    map: Arc<GridMap>,
    locator: L,
    points: Vec<JumpPoint>,
}

/// Online variant.
pub type Jps2 = JpsMultiExpansion<OnlineMultiJumpLocator>;

/// Variant over a precomputed jump database.
pub type Jps2Plus = JpsMultiExpansion<OfflineMultiJumpLocator>;

impl<L: MultiJumpLocator> JpsMultiExpansion<L> {
    pub fn with_locator(map: Arc<GridMap>, locator: L) -> Self {
        Self {
            map,
            locator,
            points: Vec::new(),
        }
    }

    pub fn map(&self) -> &Arc<GridMap> {
        &self.map
    }
}

impl Jps2 {
    pub fn new(map: Arc<GridMap>) -> Self {
        let locator = OnlineMultiJumpLocator::new(map.clone());
        Self::with_locator(map, locator)
    }
}

impl Jps2Plus {
    pub fn new(map: Arc<GridMap>, db: Arc<JumpDatabase>) -> Result<Self, JumpDbError> {
        let locator = OfflineMultiJumpLocator::new(map.clone(), db)?;
        Ok(Self::with_locator(map, locator))
    }

    pub fn load_or_build(map: Arc<GridMap>) -> Result<Self, JumpDbError> {
        let locator = OfflineMultiJumpLocator::load_or_build(map.clone())?;
        Ok(Self::with_locator(map, locator))
    }
}

impl<L: MultiJumpLocator> ExpansionPolicy for JpsMultiExpansion<L> {
    fn id_space(&self) -> u32 {
        self.map.padded_size()
    }

    fn is_traversable(&self, id: PaddedId) -> bool {
        id < self.map.padded_size() && self.map.is_traversable(id)
    }

    fn expand(&mut self, node: &SearchNode, problem: &ProblemInstance, out: &mut Vec<Successor>) {
        let tiles = self.map.neighbours(node.id());
        self.points.clear();
        for d in compute_successors(node.pdir(), tiles).iter() {
            self.locator.jump_all(d, node.id(), problem.goal, &mut self.points);
        }
        out.extend(self.points.iter().map(|jp| Successor {
            id: jp.id,
            cost: jp.cost,
            direction: Some(jp.direction),
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jumpgrid_core::{Direction, ONE, ROOT_TWO};

    #[test]
    fn diagonal_jump_points_are_skipped() {
        let map = Arc::new(GridMap::from_rows(&["......", "......", "...@..", "......"]).unwrap());
        let start = map.to_padded_id(0, 0);
        let problem = ProblemInstance {
            start,
            goal: map.to_padded_id(5, 3),
            search_id: 1,
        };
        let mut out = Vec::new();
        Jps2::new(map.clone()).expand(&SearchNode::new(start), &problem, &mut out);
        assert!(out.contains(&Successor {
            id: map.to_padded_id(4, 1),
            cost: ROOT_TWO + 3 * ONE,
            direction: Some(Direction::East)
        }));
        assert!(out.iter().all(|s| s.id != map.to_padded_id(1, 1)));
    }
}
