//! Conversion of a waypoint path into oriented segments for display

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// One straight leg of a route, drawn as an arrow
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathSegment {
    pub start: Vec3,
    /// Unit direction, or zero for a zero-length leg
    pub direction: Vec3,
    pub length: f32,
}

impl PathSegment {
    /// End point of the leg
    pub fn end(&self) -> Vec3 {
        self.start + self.direction * self.length
    }
}

/// Emits one segment per consecutive pair of waypoints
///
/// Paths with fewer than two points produce nothing.
pub fn to_directives(path: &[Vec3]) -> Vec<PathSegment> {
    path.windows(2)
        .map(|pair| {
            let delta = pair[1] - pair[0];
            let length = delta.length();
            PathSegment {
                start: pair[0],
                direction: delta.normalize_or_zero(),
                length,
            }
        })
        .collect()
}
