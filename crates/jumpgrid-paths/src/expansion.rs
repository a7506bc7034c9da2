use jumpgrid_core::{Cost, Direction, PaddedId};

use crate::node::SearchNode;

/// Start, goal and search id of one query.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ProblemInstance {
    pub start: PaddedId,
    pub goal: PaddedId,
    pub search_id: u32,
}

/// A neighbour produced by an [`ExpansionPolicy`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Successor {
    pub id: PaddedId,
    /// Cost of the edge from the expanded node.
    pub cost: Cost,
    /// Direction of travel on arrival, recorded on the node when this edge
    /// becomes its best parent link.
    pub direction: Option<Direction>,
}

/// Generates the successors of a node; the search driver is generic over it.
pub trait ExpansionPolicy {
    /// Every id the policy can produce is below this bound.
    fn id_space(&self) -> u32;

    /// Whether `id` is an open cell that may start or end a search.
    fn is_traversable(&self, id: PaddedId) -> bool;

    /// Append the successors of `node` to `out`.
    fn expand(&mut self, node: &SearchNode, problem: &ProblemInstance, out: &mut Vec<Successor>);
}
