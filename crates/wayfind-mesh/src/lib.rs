//! Floor plan model and walkable navigation mesh construction
//!
//! Rooms of a [`FloorPlan`] are welded into a shared vertex pool, split where one
//! room's corner lies on another room's wall, triangulated, and linked across
//! shared edges into a [`NavMesh`] with connectivity groups.

mod config;
mod context;
mod floor_plan;
mod nav_mesh;
mod nav_mesh_builder;
mod triangulate;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_plan_helpers;


pub use config::NavMeshConfig;
pub use context::{BuildContext, BuildPhase, LogEntry, LogLevel, TimerEntry, TimerGuard};
pub use floor_plan::{FloorPlan, PlanSize, Reference, Room, Wall};
pub use nav_mesh::{Face, FaceRef, GroupId, NavMesh};
pub use nav_mesh_builder::NavMeshBuilder;
pub use triangulate::triangulate;
