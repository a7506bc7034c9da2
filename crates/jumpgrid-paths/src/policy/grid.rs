use std::sync::Arc;

use jumpgrid_core::{Cost, Direction, GridMap, ONE, PaddedId, ROOT_TWO, compute_natural};

use super::step;
use crate::expansion::{ExpansionPolicy, ProblemInstance, Successor};
use crate::node::SearchNode;

/// Plain 8-connected expansion without corner cutting.
///
/// Every open neighbour is a successor; a diagonal move also needs both
/// cells it passes between to be open.
#[derive(Clone, Debug)]
pub struct GridExpansion {
    map: Arc<GridMap>,
}

impl GridExpansion {
    pub fn new(map: Arc<GridMap>) -> Self {
        Self { map }
    }

    pub fn map(&self) -> &Arc<GridMap> {
        &self.map
    }
}

impl ExpansionPolicy for GridExpansion {
    fn id_space(&self) -> u32 {
        self.map.padded_size()
    }

    fn is_traversable(&self, id: PaddedId) -> bool {
        id < self.map.padded_size() && self.map.is_traversable(id)
    }

    fn expand(&mut self, node: &SearchNode, _problem: &ProblemInstance, out: &mut Vec<Successor>) {
        let tiles = self.map.neighbours(node.id());
        for d in compute_natural(None, tiles).iter() {
            out.push(Successor {
                id: step(self.map.padded_width(), node.id(), d),
                cost: edge_cost(d),
                direction: Some(d),
            });
        }
    }
}

#[inline]
fn edge_cost(d: Direction) -> Cost {
    if d.is_diagonal() { ROOT_TWO } else { ONE }
}
