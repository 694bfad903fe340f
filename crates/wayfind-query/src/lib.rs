//! Shortest path queries over the walkable navigation mesh
//!
//! [`PathPlanner`] answers route queries with A* over face adjacency followed by
//! funnel smoothing. Callers that only need routes should depend on the
//! [`PathProvider`] trait.

mod path_error;
mod path_planner;
mod path_provider;


pub use path_error::{PathError, PathResult};
pub use path_planner::PathPlanner;
pub use path_provider::PathProvider;
