//! Static scene geometry and per-frame render snapshots
//!
//! Everything here is in model space; the renderer places the whole scene with
//! the frame's [`ModelTransform`].

use glam::Vec3;
use serde::{Deserialize, Serialize};
use wayfind_align::ModelTransform;
use wayfind_mesh::FloorPlan;

use crate::{PathSegment, SessionConfig};

/// Arrow appearance for route segments
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArrowStyle {
    /// RGB color as `0xRRGGBB`
    pub color: u32,
    pub head_length: f32,
    pub head_width: f32,
}

impl Default for ArrowStyle {
    fn default() -> Self {
        Self {
            color: 0x00ff00,
            head_length: 0.5,
            head_width: 0.3,
        }
    }
}

/// A wall segment extruded into a box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallBox {
    pub center: Vec3,
    /// Length, height and thickness
    pub size: Vec3,
    /// Rotation about +Y in radians, `atan2(dy, dx)` of the wall direction
    pub yaw: f32,
}

/// Room name placed above the room center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomLabel {
    pub text: String,
    pub position: Vec3,
}

/// Room outline on the floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorPolygon {
    pub room: String,
    pub points: Vec<Vec3>,
}

/// Static geometry of the building model
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneDescription {
    pub walls: Vec<WallBox>,
    pub labels: Vec<RoomLabel>,
    pub floors: Vec<FloorPolygon>,
}

impl SceneDescription {
    pub fn from_floor_plan(plan: &FloorPlan, config: &SessionConfig) -> Self {
        let floor = config.floor_height;

        let walls = plan
            .walls
            .iter()
            .map(|wall| {
                let dx = wall.p2[0] - wall.p1[0];
                let dy = wall.p2[1] - wall.p1[1];
                WallBox {
                    center: Vec3::new(
                        (wall.p1[0] + wall.p2[0]) / 2.0,
                        floor + plan.wall_height / 2.0,
                        (wall.p1[1] + wall.p2[1]) / 2.0,
                    ),
                    size: Vec3::new(wall.length(), plan.wall_height, plan.wall_thickness),
                    yaw: dy.atan2(dx),
                }
            })
            .collect();

        let labels = plan
            .rooms
            .iter()
            .map(|room| {
                let center = room.center(floor);
                RoomLabel {
                    text: room.name.clone(),
                    position: Vec3::new(center.x, floor + config.label_height, center.z),
                }
            })
            .collect();

        let floors = plan
            .rooms
            .iter()
            .map(|room| FloorPolygon {
                room: room.name.clone(),
                points: room.model_points(floor),
            })
            .collect();

        Self {
            walls,
            labels,
            floors,
        }
    }
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub transform: ModelTransform,
    /// Route arrows in model space; empty when not navigating
    pub segments: Vec<PathSegment>,
    pub arrow_style: ArrowStyle,
    /// Tracked user position in model space
    pub user_position: Vec3,
}
