use glam::Vec3;
use wayfind_mesh::GroupId;

use crate::PathResult;

/// Source of walking routes between two floor positions
///
/// Implementations must be deterministic: identical inputs on unchanged data
/// give identical routes.
pub trait PathProvider {
    /// Finds a route from `start` to `destination`
    ///
    /// A successful route begins exactly at `start` and ends exactly at
    /// `destination`. A start equal to the destination yields a single point.
    fn find_path(&self, start: Vec3, destination: Vec3) -> PathResult<Vec<Vec3>>;

    /// Connectivity group of a position, `None` when it is not walkable
    fn group_of(&self, pos: Vec3) -> Option<GroupId>;
}
