//! Best-first search generic over heuristic and expansion policy.

use std::time::{Duration, Instant};

use jumpgrid_core::{Cost, PaddedId, UNREACHABLE};

use crate::expansion::{ExpansionPolicy, ProblemInstance, Successor};
use crate::heuristic::Heuristic;
use crate::node::NodeRef;
use crate::path::Path;
use crate::pool::NodePool;
use crate::pqueue::PriorityQueue;

/// Driver settings.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    /// Heuristic weight. Values above 1 trade optimality for speed; 0 gives
    /// Dijkstra's algorithm.
    pub hscale: f64,
    /// Log every expansion, generation and update at trace level.
    pub verbose: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            hscale: 1.0,
            verbose: false,
        }
    }
}

/// Counters for the most recent query.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    pub nodes_expanded: u32,
    pub nodes_generated: u32,
    /// Nodes initialised for this query.
    pub nodes_touched: u32,
    pub search_time: Duration,
}

/// A* over any [`ExpansionPolicy`].
///
/// The driver owns its node pool and open list, so one driver answers one
/// query at a time; run several drivers to search in parallel.
#[derive(Debug)]
pub struct FlexibleAstar<H, E> {
    heuristic: H,
    expander: E,
    pool: NodePool,
    open: PriorityQueue,
    config: SearchConfig,
    stats: SearchStats,
    search_id: u32,
    successors: Vec<Successor>,
}

impl<H: Heuristic, E: ExpansionPolicy> FlexibleAstar<H, E> {
    pub fn new(heuristic: H, expander: E) -> Self {
        Self::with_config(heuristic, expander, SearchConfig::default())
    }

    pub fn with_config(heuristic: H, expander: E, config: SearchConfig) -> Self {
        let pool = NodePool::new(expander.id_space());
        Self {
            heuristic,
            expander,
            pool,
            open: PriorityQueue::default(),
            config,
            stats: SearchStats::default(),
            search_id: 0,
            successors: Vec::with_capacity(8),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn set_hscale(&mut self, hscale: f64) {
        self.config.hscale = hscale;
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.config.verbose = verbose;
    }

    /// Counters of the last query.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn expander(&self) -> &E {
        &self.expander
    }

    /// Bytes held by the node pool and the open list.
    pub fn mem(&self) -> usize {
        self.pool.mem() + self.open.len() * std::mem::size_of::<NodeRef>()
    }

    /// Cost of an optimal path, or [`UNREACHABLE`].
    pub fn path_cost(&mut self, start: PaddedId, goal: PaddedId) -> Cost {
        self.find_path(start, goal).map_or(UNREACHABLE, |p| p.cost())
    }

    /// Search from `start` to `goal`.
    ///
    /// Returns `None` when the goal cannot be reached, when either endpoint
    /// is blocked or outside the map, and when `start == goal`.
    pub fn find_path(&mut self, start: PaddedId, goal: PaddedId) -> Option<Path> {
        let timer = Instant::now();
        self.stats = SearchStats::default();
        self.pool.clear();
        self.open.clear();

        if start == goal
            || !self.expander.is_traversable(start)
            || !self.expander.is_traversable(goal)
        {
            log::debug!("search {start} -> {goal}: invalid endpoints");
            return None;
        }

        self.search_id = self.search_id.wrapping_add(1).max(1);
        let problem = ProblemInstance {
            start,
            goal,
            search_id: self.search_id,
        };

        let s = self.generate(start);
        let h = self.estimate(start, goal);
        self.pool[s].g = 0;
        self.pool[s].f = h;
        self.open.push(s, &mut self.pool);

        let mut successors = std::mem::take(&mut self.successors);
        let found = loop {
            let Some(top) = self.open.peek() else {
                break None;
            };
            if self.pool[top].id == goal {
                break Some(top);
            }
            let Some(current) = self.open.pop(&mut self.pool) else {
                break None;
            };
            self.pool[current].expanded = true;
            self.stats.nodes_expanded += 1;
            if self.config.verbose {
                let n = &self.pool[current];
                log::trace!("expand {} g={} f={}", n.id, n.g, n.f);
            }

            successors.clear();
            self.expander.expand(&self.pool[current], &problem, &mut successors);
            let g = self.pool[current].g;
            for succ in &successors {
                self.relax(current, g, succ, goal);
            }
            if self.config.verbose {
                log::trace!("close {}", self.pool[current].id);
            }
        };
        self.successors = successors;

        self.stats.search_time = timer.elapsed();
        log::debug!(
            "search {start} -> {goal}: {} expanded, {} generated, {} touched in {:?}",
            self.stats.nodes_expanded,
            self.stats.nodes_generated,
            self.stats.nodes_touched,
            self.stats.search_time
        );
        found.map(|n| self.reconstruct(n))
    }

    fn relax(&mut self, parent: NodeRef, parent_g: Cost, succ: &Successor, goal: PaddedId) {
        let n = self.generate(succ.id);
        self.stats.nodes_generated += 1;
        if self.pool[n].expanded {
            return;
        }
        let g = parent_g.saturating_add(succ.cost);
        if self.open.contains(n, &self.pool) {
            if g < self.pool[n].g {
                self.pool[n].relax(g, parent, succ.direction);
                self.open.decrease_key(n, &mut self.pool);
                if self.config.verbose {
                    log::trace!("update {} g={}", succ.id, g);
                }
            }
            return;
        }
        let h = self.estimate(succ.id, goal);
        let node = &mut self.pool[n];
        node.g = g;
        node.f = g.saturating_add(h);
        node.parent = Some(parent);
        node.pdir = succ.direction;
        self.open.push(n, &mut self.pool);
        if self.config.verbose {
            log::trace!("generate {} g={} h={}", succ.id, g, h);
        }
    }

    /// The live node for `id`, reset if it was last touched by an earlier
    /// query.
    fn generate(&mut self, id: PaddedId) -> NodeRef {
        let n = self.pool.generate(id);
        if self.pool[n].search_id != self.search_id {
            self.pool[n].reset(self.search_id);
            self.stats.nodes_touched += 1;
        }
        n
    }

    #[inline]
    fn estimate(&self, id: PaddedId, goal: PaddedId) -> Cost {
        let h = self.heuristic.h(id, goal);
        if self.config.hscale == 1.0 {
            h
        } else {
            (f64::from(h) * self.config.hscale) as Cost
        }
    }

    fn reconstruct(&self, goal: NodeRef) -> Path {
        let cost = self.pool[goal].g;
        let mut nodes = Vec::new();
        let mut cur = Some(goal);
        while let Some(n) = cur {
            nodes.push(self.pool[n].id);
            cur = self.pool[n].parent;
        }
        nodes.reverse();
        Path::new(nodes, cost)
    }
}
