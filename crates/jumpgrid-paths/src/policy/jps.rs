use std::sync::Arc;

use jumpgrid_core::{GridMap, PaddedId, compute_successors};

use crate::expansion::{ExpansionPolicy, ProblemInstance, Successor};
use crate::jump::{JumpDatabase, JumpDbError, JumpLocator, OfflineJumpLocator, OnlineJumpLocator};
use crate::node::SearchNode;

/// Jump point search over a [`GridMap`].
///
/// Directions are pruned by the arrival direction of the node being
/// expanded; each surviving direction contributes at most one jump point.
#[derive(Clone, Debug)]
pub struct JpsExpansion<L> {
    map: Arc<GridMap>,
    locator: L,
}

/// Online jump point search.
pub type Jps = JpsExpansion<OnlineJumpLocator>;

/// Jump point search over a precomputed jump database.
pub type JpsPlus = JpsExpansion<OfflineJumpLocator>;

impl<L: JumpLocator> JpsExpansion<L> {
    /// `locator` must answer jumps over `map`.
    pub fn with_locator(map: Arc<GridMap>, locator: L) -> Self {
        Self { map, locator }
    }

    pub fn map(&self) -> &Arc<GridMap> {
        &self.map
    }

    pub fn locator(&self) -> &L {
        &self.locator
    }
}

impl Jps {
    pub fn new(map: Arc<GridMap>) -> Self {
        let locator = OnlineJumpLocator::new(map.clone());
        Self::with_locator(map, locator)
    }
}

impl JpsPlus {
    /// Fails when `db` was built for a map of another size.
    pub fn new(map: Arc<GridMap>, db: Arc<JumpDatabase>) -> Result<Self, JumpDbError> {
        let locator = OfflineJumpLocator::new(map.clone(), db)?;
        Ok(Self::with_locator(map, locator))
    }

    /// Use the database stored next to the map file, building it if needed.
    pub fn load_or_build(map: Arc<GridMap>) -> Result<Self, JumpDbError> {
        let locator = OfflineJumpLocator::load_or_build(map.clone())?;
        Ok(Self::with_locator(map, locator))
    }
}

impl<L: JumpLocator> ExpansionPolicy for JpsExpansion<L> {
    fn id_space(&self) -> u32 {
        self.map.padded_size()
    }

    fn is_traversable(&self, id: PaddedId) -> bool {
        id < self.map.padded_size() && self.map.is_traversable(id)
    }

    fn expand(&mut self, node: &SearchNode, problem: &ProblemInstance, out: &mut Vec<Successor>) {
        let tiles = self.map.neighbours(node.id());
        for d in compute_successors(node.pdir(), tiles).iter() {
            let jump = self.locator.jump(d, node.id(), problem.goal);
            if let Some(id) = jump.node {
                out.push(Successor {
                    id,
                    cost: jump.cost,
                    direction: Some(d),
                });
            }
        }
    }
}
