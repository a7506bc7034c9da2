//! Parallel execution of scenario experiments.

use std::time::Instant;

use rayon::prelude::*;

use jumpgrid_core::{Cost, GridMap, UNREACHABLE, cost_to_f64};

use crate::astar::{FlexibleAstar, SearchStats};
use crate::expansion::ExpansionPolicy;
use crate::heuristic::Heuristic;
use crate::scenario::{Experiment, OptimalityError, check_optimality};

/// Outcome of one experiment.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchResult {
    pub cost: Cost,
    /// `cost` in grid units; infinite when no path exists.
    pub length: f64,
    pub stats: SearchStats,
}

impl BatchResult {
    fn unreachable() -> Self {
        Self {
            cost: UNREACHABLE,
            length: cost_to_f64(UNREACHABLE),
            stats: SearchStats::default(),
        }
    }
}

/// Solve every experiment on `map`, one driver per worker thread.
///
/// Results are in input order. Experiments whose endpoints fall outside the
/// map are unreachable.
pub fn run_batch<H, E, F>(map: &GridMap, experiments: &[Experiment], make_driver: F) -> Vec<BatchResult>
where
    H: Heuristic,
    E: ExpansionPolicy,
    F: Fn() -> FlexibleAstar<H, E> + Sync + Send,
{
    let timer = Instant::now();
    let results: Vec<BatchResult> = experiments
        .par_iter()
        .map_init(make_driver, |driver, exp| {
            let (Some(start), Some(goal)) = (map.padded_id(exp.start()), map.padded_id(exp.goal())) else {
                return BatchResult::unreachable();
            };
            let cost = driver.path_cost(start, goal);
            BatchResult {
                cost,
                length: cost_to_f64(cost),
                stats: *driver.stats(),
            }
        })
        .collect();

    let expanded: u64 = results.iter().map(|r| u64::from(r.stats.nodes_expanded)).sum();
    log::info!(
        "solved {} experiments in {:?} ({expanded} nodes expanded)",
        results.len(),
        timer.elapsed()
    );
    results
}

/// Compare every result with its experiment's recorded optimum.
pub fn check_batch(experiments: &[Experiment], results: &[BatchResult]) -> Result<(), OptimalityError> {
    experiments
        .iter()
        .zip(results)
        .try_for_each(|(e, r)| check_optimality(r.length, e))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::heuristic::OctileHeuristic;
    use crate::policy::Jps;
    use crate::scenario::Scenario;
    use jumpgrid_core::{ONE, ROOT_TWO};

    #[test]
    fn results_keep_input_order() {
        let map = Arc::new(GridMap::from_rows(&["....", "....", "....", "...."]).unwrap());
        let scen = Scenario::parse(
            "version 1\n\
             0 t.map 4 4 0 0 3 3 4.24264069\n\
             0 t.map 4 4 0 0 3 0 3\n\
             0 t.map 4 4 0 0 9 9 0\n\
             0 t.map 4 4 0 0 0 2 2\n",
        )
        .unwrap();
        let results = run_batch(&map, scen.experiments(), || {
            FlexibleAstar::new(OctileHeuristic::new(map.padded_width()), Jps::new(map.clone()))
        });
        let costs: Vec<Cost> = results.iter().map(|r| r.cost).collect();
        assert_eq!(costs, vec![3 * ROOT_TWO, 3 * ONE, UNREACHABLE, 2 * ONE]);
        assert!(results[2].length.is_infinite());

        assert!(check_batch(&scen.experiments()[..2], &results[..2]).is_ok());
        let err = check_batch(scen.experiments(), &results).unwrap_err();
        assert_eq!(err.experiment.goal_x, 9);
    }
}
