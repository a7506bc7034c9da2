use jumpgrid_core::{Cost, GridMap, PaddedId, Point, cost_to_f64};

/// Result of a successful search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    nodes: Vec<PaddedId>,
    cost: Cost,
}

impl Path {
    pub(crate) fn new(nodes: Vec<PaddedId>, cost: Cost) -> Self {
        Self { nodes, cost }
    }

    /// Ids the search visited along the path, start first. For jump point
    /// policies these are jump points, not every cell.
    pub fn nodes(&self) -> &[PaddedId] {
        &self.nodes
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }

    /// Path length in grid units.
    pub fn length(&self) -> f64 {
        cost_to_f64(self.cost)
    }

    /// Every cell along the path, start first. Each segment between two
    /// nodes is walked diagonally first, then straight, which is the shape of
    /// every jump.
    pub fn steps(&self, map: &GridMap) -> Vec<Point> {
        let mut out = Vec::new();
        let mut nodes = self.nodes.iter().map(|id| map.point(*id));
        let Some(first) = nodes.next() else {
            return out;
        };
        out.push(first);
        let mut cur = first;
        for next in nodes {
            while cur != next {
                let step = (next - cur).signum();
                cur = cur + step;
                out.push(cur);
            }
        }
        out
    }
}
