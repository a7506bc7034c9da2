use std::sync::Arc;

use jumpgrid_core::{Cost, Direction, ONE, PaddedId, ROOT_TWO, WeightedGridMap};

use crate::expansion::{ExpansionPolicy, ProblemInstance, Successor};
use crate::node::SearchNode;

// Slots of the 3×3 window returned by `WeightedGridMap::neighbours`.
const NW: usize = 0;
const N: usize = 1;
const NE: usize = 2;
const W: usize = 3;
const C: usize = 4;
const E: usize = 5;
const SW: usize = 6;
const S: usize = 7;
const SE: usize = 8;

const CARDINAL: [(Direction, usize); 4] = [
    (Direction::North, N),
    (Direction::East, E),
    (Direction::South, S),
    (Direction::West, W),
];

/// Diagonal slot and the two cardinal slots it passes between.
const DIAGONAL: [(Direction, usize, usize, usize); 4] = [
    (Direction::NorthEast, NE, N, E),
    (Direction::SouthEast, SE, S, E),
    (Direction::SouthWest, SW, S, W),
    (Direction::NorthWest, NW, N, W),
];

/// 8-connected expansion over terrain costs.
///
/// A cardinal step costs the mean of the two cells it touches, in units of
/// [`ONE`]. A diagonal step costs the mean of the four cells of its 2×2
/// square in units of [`ROOT_TWO`] and needs all of them open.
#[derive(Clone, Debug)]
pub struct WeightedGridExpansion {
    map: Arc<WeightedGridMap>,
}

impl WeightedGridExpansion {
    pub fn new(map: Arc<WeightedGridMap>) -> Self {
        Self { map }
    }

    pub fn map(&self) -> &Arc<WeightedGridMap> {
        &self.map
    }
}

impl ExpansionPolicy for WeightedGridExpansion {
    fn id_space(&self) -> u32 {
        self.map.padded_size()
    }

    fn is_traversable(&self, id: PaddedId) -> bool {
        self.map.is_traversable(id)
    }

    fn expand(&mut self, node: &SearchNode, _problem: &ProblemInstance, out: &mut Vec<Successor>) {
        let (ids, costs) = self.map.neighbours(node.id());
        let c = Cost::from(costs[C]);

        for (d, slot) in CARDINAL {
            if costs[slot] != 0 {
                out.push(Successor {
                    id: ids[slot],
                    cost: (c + Cost::from(costs[slot])) * ONE >> 1,
                    direction: Some(d),
                });
            }
        }
        for (d, slot, a, b) in DIAGONAL {
            if costs[slot] != 0 && costs[a] != 0 && costs[b] != 0 {
                let sum = c + Cost::from(costs[slot]) + Cost::from(costs[a]) + Cost::from(costs[b]);
                out.push(Successor {
                    id: ids[slot],
                    cost: sum * ROOT_TWO >> 2,
                    direction: Some(d),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(rows: &[&str], x: u32, y: u32) -> (Arc<WeightedGridMap>, Vec<Successor>) {
        let map = Arc::new(WeightedGridMap::from_rows(rows).unwrap());
        let mut policy = WeightedGridExpansion::new(map.clone());
        let id = map.to_padded_id(x, y);
        let problem = ProblemInstance {
            start: id,
            goal: id,
            search_id: 1,
        };
        let mut out = Vec::new();
        policy.expand(&SearchNode::new(id), &problem, &mut out);
        (map, out)
    }

    #[test]
    fn mean_terrain_costs() {
        // '(' is 40, '2' is 50, 'F' is 70
        let (map, out) = expand(&["((", "2F"], 0, 0);
        assert_eq!(
            out,
            vec![
                Successor {
                    id: map.to_padded_id(1, 0),
                    cost: 40 * ONE,
                    direction: Some(Direction::East)
                },
                Successor {
                    id: map.to_padded_id(0, 1),
                    cost: 45 * ONE,
                    direction: Some(Direction::South)
                },
                Successor {
                    id: map.to_padded_id(1, 1),
                    cost: 50 * ROOT_TWO,
                    direction: Some(Direction::SouthEast)
                },
            ]
        );
    }

    #[test]
    fn diagonals_need_open_square() {
        let (_, out) = expand(&["..", ".@"], 0, 0);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|s| !s.direction.is_some_and(Direction::is_diagonal)));
        let (_, out) = expand(&["..", "@."], 0, 0);
        assert_eq!(out.len(), 1);
    }
}
