//! Jump point search and best-first search over 8-connected grid maps.
//!
//! The search driver, [`FlexibleAstar`], is generic over a [`Heuristic`] and
//! an [`ExpansionPolicy`]. The policies in [`policy`] cover plain grid
//! expansion and four flavours of jump point search:
//!
//! | Policy | Jump points from |
//! |---|---|
//! | [`Jps`] | [`OnlineJumpLocator`], scanning 32 cells at a time |
//! | [`JpsPlus`] | [`OfflineJumpLocator`], reading a [`JumpDatabase`] |
//! | [`Jps2`] | [`OnlineMultiJumpLocator`], skipping diagonal jump points |
//! | [`Jps2Plus`] | [`OfflineMultiJumpLocator`] |
//!
//! All of them return optimal paths with identical costs. Maps, rotated maps
//! and jump databases are shared through `Arc`; each driver owns its node
//! pool and open list, and [`run_batch`] runs one driver per worker thread.
//!
//! ```no_run
//! use std::sync::Arc;
//! use jumpgrid_core::GridMap;
//! use jumpgrid_paths::{FlexibleAstar, Jps, OctileHeuristic};
//!
//! let map = Arc::new(GridMap::load("arena.map")?);
//! let mut astar = FlexibleAstar::new(OctileHeuristic::new(map.padded_width()), Jps::new(map.clone()));
//! let path = astar.find_path(map.to_padded_id(1, 11), map.to_padded_id(1, 12));
//! # Ok::<(), jumpgrid_core::MapError>(())
//! ```

mod astar;
mod batch;
mod expansion;
mod heuristic;
pub mod jump;
mod node;
mod path;
pub mod policy;
mod pool;
mod pqueue;
pub mod scenario;

pub use astar::{FlexibleAstar, SearchConfig, SearchStats};
pub use batch::{BatchResult, check_batch, run_batch};
pub use expansion::{ExpansionPolicy, ProblemInstance, Successor};
pub use heuristic::{Heuristic, ManhattanHeuristic, OctileHeuristic, ZeroHeuristic, manhattan, octile};
pub use jump::{
    JumpDatabase, JumpDbError, JumpLocator, MultiJumpLocator, OfflineJumpLocator, OfflineMultiJumpLocator,
    OnlineJumpLocator, OnlineMultiJumpLocator,
};
pub use node::{NodeRef, SearchNode};
pub use path::Path;
pub use policy::{GridExpansion, Jps, Jps2, Jps2Plus, JpsExpansion, JpsMultiExpansion, JpsPlus, WeightedGridExpansion};
pub use pool::{NODE_BLOCK_SIZE, NodePool};
pub use pqueue::{DEFAULT_QUEUE_CAPACITY, PriorityQueue};
pub use scenario::{Experiment, OptimalityError, Scenario, ScenarioError, check_optimality};
