use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Arc;

use jumpgrid_core::{Cost, GridMap, ONE, PaddedId, ROOT_TWO, UNREACHABLE, WeightedGridMap};
use jumpgrid_paths::{
    FlexibleAstar, GridExpansion, Jps, Jps2, Jps2Plus, JpsPlus, JumpDatabase, OctileHeuristic,
    WeightedGridExpansion, ZeroHeuristic,
};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

fn random_rows(rng: &mut StdRng, width: usize, height: usize, density: f64) -> Vec<String> {
    (0..height)
        .map(|_| {
            (0..width)
                .map(|_| if rng.random_bool(density) { '@' } else { '.' })
                .collect()
        })
        .collect()
}

fn grid(rows: &[String]) -> Arc<GridMap> {
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    Arc::new(GridMap::from_rows(&rows).unwrap())
}

fn open_cells(map: &GridMap) -> Vec<(u32, u32)> {
    (0..map.header_height())
        .flat_map(|y| (0..map.header_width()).map(move |x| (x, y)))
        .filter(|&(x, y)| map.is_traversable(map.to_padded_id(x, y)))
        .collect()
}

/// Textbook Dijkstra over unpadded coordinates, no corner cutting.
fn reference_cost(map: &GridMap, start: (u32, u32), goal: (u32, u32)) -> Cost {
    let (w, h) = (map.header_width() as i64, map.header_height() as i64);
    let open = |x: i64, y: i64| {
        x >= 0 && y >= 0 && x < w && y < h && map.is_traversable(map.to_padded_id(x as u32, y as u32))
    };
    let idx = |x: i64, y: i64| (y * w + x) as usize;
    let mut dist = vec![UNREACHABLE; (w * h) as usize];
    let mut heap = BinaryHeap::new();
    dist[idx(start.0 as i64, start.1 as i64)] = 0;
    heap.push(Reverse((0, start.0 as i64, start.1 as i64)));
    while let Some(Reverse((d, x, y))) = heap.pop() {
        if (x as u32, y as u32) == goal {
            return d;
        }
        if d > dist[idx(x, y)] {
            continue;
        }
        for dy in -1..=1 {
            for dx in -1..=1 {
                if (dx, dy) == (0, 0) || !open(x + dx, y + dy) {
                    continue;
                }
                if dx != 0 && dy != 0 && !(open(x + dx, y) && open(x, y + dy)) {
                    continue;
                }
                let nd = d + if dx != 0 && dy != 0 { ROOT_TWO } else { ONE };
                if nd < dist[idx(x + dx, y + dy)] {
                    dist[idx(x + dx, y + dy)] = nd;
                    heap.push(Reverse((nd, x + dx, y + dy)));
                }
            }
        }
    }
    UNREACHABLE
}

#[test]
fn open_grid_single_diagonal_jump() {
    let map = grid(&["....".into(), "....".into(), "....".into(), "....".into()]);
    let start = map.to_padded_id(0, 0);
    let goal = map.to_padded_id(3, 3);
    let h = OctileHeuristic::new(map.padded_width());
    let db = Arc::new(JumpDatabase::build(&map).unwrap());

    let mut jps = FlexibleAstar::new(h, Jps::new(map.clone()));
    let path = jps.find_path(start, goal).unwrap();
    assert_eq!(path.cost(), 3 * ROOT_TWO);
    assert_eq!(path.nodes(), &[start, goal]);

    let mut plus = FlexibleAstar::new(h, JpsPlus::new(map.clone(), db.clone()).unwrap());
    assert_eq!(plus.find_path(start, goal).unwrap().nodes(), &[start, goal]);
    let mut jps2 = FlexibleAstar::new(h, Jps2::new(map.clone()));
    assert_eq!(jps2.path_cost(start, goal), 3 * ROOT_TWO);
    let mut jps2plus = FlexibleAstar::new(h, Jps2Plus::new(map.clone(), db).unwrap());
    assert_eq!(jps2plus.path_cost(start, goal), 3 * ROOT_TWO);
}

#[test]
fn wall_with_one_opening() {
    let rows: Vec<String> = ["..........", "..........", "@@@@@@@.@@", "..........", ".........."]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let map = grid(&rows);
    let h = OctileHeuristic::new(map.padded_width());
    let mut jps = FlexibleAstar::new(h, Jps::new(map.clone()));
    let mut plus = FlexibleAstar::new(h, JpsPlus::new(map.clone(), Arc::new(JumpDatabase::build(&map).unwrap())).unwrap());

    for (start, goal) in [((0, 0), (0, 4)), ((9, 4), (1, 0)), ((3, 1), (5, 3))] {
        let expected = reference_cost(&map, start, goal);
        let (s, g) = (map.to_padded_id(start.0, start.1), map.to_padded_id(goal.0, goal.1));
        assert_eq!(jps.path_cost(s, g), expected, "{start:?} -> {goal:?}");
        assert_eq!(plus.path_cost(s, g), expected, "{start:?} -> {goal:?}");
    }
    // the gap can only be entered straight, from (7, 1) or (7, 3)
    assert_eq!(reference_cost(&map, (0, 0), (0, 4)), 14 * ONE + 2 * ROOT_TWO);
}

#[test]
fn disconnected_regions() {
    let rows: Vec<String> = ["...@...", "...@...", "...@..."].iter().map(|s| s.to_string()).collect();
    let map = grid(&rows);
    let (s, g) = (map.to_padded_id(0, 1), map.to_padded_id(6, 1));
    let h = OctileHeuristic::new(map.padded_width());

    let mut astar = FlexibleAstar::new(h, Jps::new(map.clone()));
    assert!(astar.find_path(s, g).is_none());
    assert_eq!(astar.path_cost(s, g), UNREACHABLE);
    let mut grid_astar = FlexibleAstar::new(h, GridExpansion::new(map.clone()));
    assert_eq!(grid_astar.path_cost(s, g), UNREACHABLE);
    assert_eq!(grid_astar.stats().nodes_expanded, 9);
}

#[test]
fn all_policies_agree_on_random_maps() {
    let mut rng = StdRng::seed_from_u64(0x6a70_7321);
    for (width, height, density) in [(20, 20, 0.2), (45, 12, 0.3), (70, 9, 0.15), (33, 33, 0.35)] {
        let rows = random_rows(&mut rng, width, height, density);
        let map = grid(&rows);
        let cells = open_cells(&map);
        if cells.len() < 2 {
            continue;
        }
        let db = Arc::new(JumpDatabase::build(&map).unwrap());
        let h = OctileHeuristic::new(map.padded_width());
        let mut reference = FlexibleAstar::new(ZeroHeuristic, GridExpansion::new(map.clone()));
        let mut astar = FlexibleAstar::new(h, GridExpansion::new(map.clone()));
        let mut jps = FlexibleAstar::new(h, Jps::new(map.clone()));
        let mut plus = FlexibleAstar::new(h, JpsPlus::new(map.clone(), db.clone()).unwrap());
        let mut jps2 = FlexibleAstar::new(h, Jps2::new(map.clone()));
        let mut jps2plus = FlexibleAstar::new(h, Jps2Plus::new(map.clone(), db).unwrap());

        for _ in 0..150 {
            let a = cells[rng.random_range(0..cells.len())];
            let b = cells[rng.random_range(0..cells.len())];
            if a == b {
                continue;
            }
            let (s, g) = (map.to_padded_id(a.0, a.1), map.to_padded_id(b.0, b.1));
            let expected = reference.path_cost(s, g);
            assert_eq!(expected, reference_cost(&map, a, b), "{width}x{height} {a:?} -> {b:?}");
            assert_eq!(astar.path_cost(s, g), expected, "grid {a:?} -> {b:?}");
            assert_eq!(jps.path_cost(s, g), expected, "jps {a:?} -> {b:?}");
            assert_eq!(plus.path_cost(s, g), expected, "jps+ {a:?} -> {b:?}");
            assert_eq!(jps2.path_cost(s, g), expected, "jps2 {a:?} -> {b:?}");
            assert_eq!(jps2plus.path_cost(s, g), expected, "jps2+ {a:?} -> {b:?}");
        }
    }
}

#[test]
fn jump_point_paths_expand_to_connected_steps() {
    let mut rng = StdRng::seed_from_u64(7);
    let rows = random_rows(&mut rng, 30, 30, 0.25);
    let map = grid(&rows);
    let cells = open_cells(&map);
    let mut jps = FlexibleAstar::new(OctileHeuristic::new(map.padded_width()), Jps::new(map.clone()));
    for _ in 0..50 {
        let a = cells[rng.random_range(0..cells.len())];
        let b = cells[rng.random_range(0..cells.len())];
        let Some(path) = jps.find_path(map.to_padded_id(a.0, a.1), map.to_padded_id(b.0, b.1)) else {
            continue;
        };
        let steps = path.steps(&map);
        let mut cost = 0;
        for pair in steps.windows(2) {
            let d = pair[1] - pair[0];
            assert_eq!(pair[0].chebyshev(pair[1]), 1);
            let id: PaddedId = map.padded_id(pair[1]).unwrap();
            assert!(map.is_traversable(id));
            cost += if d.x != 0 && d.y != 0 { ROOT_TWO } else { ONE };
        }
        assert_eq!(cost, path.cost());
    }
}

#[test]
fn uniform_weights_scale_grid_costs() {
    let mut rng = StdRng::seed_from_u64(11);
    let rows = random_rows(&mut rng, 16, 16, 0.25);
    let map = grid(&rows);
    let text_rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let weighted = Arc::new(WeightedGridMap::from_rows(&text_rows).unwrap());
    let cells = open_cells(&map);

    let mut jps = FlexibleAstar::new(OctileHeuristic::new(map.padded_width()), Jps::new(map.clone()));
    let mut terrain = FlexibleAstar::new(
        OctileHeuristic::new(weighted.padded_width()),
        WeightedGridExpansion::new(weighted.clone()),
    );
    let unit = Cost::from(b'.');
    for _ in 0..60 {
        let a = cells[rng.random_range(0..cells.len())];
        let b = cells[rng.random_range(0..cells.len())];
        if a == b {
            continue;
        }
        let expected = jps.path_cost(map.to_padded_id(a.0, a.1), map.to_padded_id(b.0, b.1));
        let cost = terrain.path_cost(weighted.to_padded_id(a.0, a.1), weighted.to_padded_id(b.0, b.1));
        if expected == UNREACHABLE {
            assert_eq!(cost, UNREACHABLE);
        } else {
            assert_eq!(cost, expected * unit, "{a:?} -> {b:?}");
        }
    }
}
