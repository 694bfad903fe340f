//! Static floor plan data
//!
//! A floor plan is authored in 2D plan coordinates: rooms are named polygons and
//! walls are segments. The plan point `(x, y)` lives at `(x, floor_height, y)` in
//! model space. The plan is loaded once, validated, and never mutated afterwards.

use std::collections::HashSet;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use wayfind_common::{plan_to_model, polygon_area2_2d, polygon_center, Error, Result};

/// A named walkable polygon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Room name, used as the destination key (may contain line breaks for labels)
    pub name: String,
    /// Polygon outline in plan coordinates, closed implicitly
    pub points: Vec<[f32; 2]>,
}

impl Room {
    /// Creates a room from a name and an outline
    pub fn new(name: impl Into<String>, points: Vec<[f32; 2]>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    /// Name with line breaks replaced by spaces, suitable for pickers
    pub fn display_name(&self) -> String {
        self.name.replace('\n', " ")
    }

    /// Outline lifted to model space
    pub fn model_points(&self, floor_height: f32) -> Vec<Vec3> {
        self.points
            .iter()
            .map(|p| plan_to_model(*p, floor_height))
            .collect()
    }

    /// Center of the room (vertex average) in model space
    pub fn center(&self, floor_height: f32) -> Vec3 {
        polygon_center(&self.model_points(floor_height))
    }

    fn validate(&self) -> Result<()> {
        if self.points.len() < 3 {
            return Err(Error::InvalidFloorPlan(format!(
                "room {:?} has {} points, at least 3 are required",
                self.name,
                self.points.len()
            )));
        }
        if self.points.iter().flatten().any(|c| !c.is_finite()) {
            return Err(Error::InvalidFloorPlan(format!(
                "room {:?} has a non-finite coordinate",
                self.name
            )));
        }
        if polygon_area2_2d(&self.model_points(0.0)).abs() <= f32::EPSILON {
            return Err(Error::InvalidFloorPlan(format!(
                "room {:?} has zero area",
                self.name
            )));
        }
        Ok(())
    }
}

/// A wall segment; height and thickness come from the plan constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub p1: [f32; 2],
    pub p2: [f32; 2],
}

impl Wall {
    /// Wall length in plan units
    pub fn length(&self) -> f32 {
        let dx = self.p2[0] - self.p1[0];
        let dy = self.p2[1] - self.p1[1];
        (dx * dx + dy * dy).sqrt()
    }
}

/// Overall plan extents
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanSize {
    pub width: f32,
    pub height: f32,
}

fn default_forward() -> [f32; 2] {
    [0.0, 1.0]
}

/// Reference pose used when recalibrating
///
/// The user is expected to stand at the center of `start_room` facing `forward`
/// when pressing recalibrate. `forward` is in plan coordinates and defaults to
/// `[0, 1]`, the model's +Z axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// Name of the start room; the first room is used when absent
    #[serde(default)]
    pub start_room: Option<String>,
    /// Model forward direction at the start point
    #[serde(default = "default_forward")]
    pub forward: [f32; 2],
}

impl Default for Reference {
    fn default() -> Self {
        Self {
            start_room: None,
            forward: default_forward(),
        }
    }
}

/// The complete static floor plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorPlan {
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub walls: Vec<Wall>,
    pub wall_height: f32,
    pub wall_thickness: f32,
    #[serde(default)]
    pub plan_size: PlanSize,
    #[serde(default)]
    pub reference: Reference,
}

impl FloorPlan {
    /// Parses and validates a floor plan from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let plan: FloorPlan = serde_json::from_str(json)?;
        plan.validate()?;
        Ok(plan)
    }

    /// Loads and validates a floor plan from a JSON file
    pub fn load_from_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serializes the plan as pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validates the plan
    ///
    /// Every room needs at least three finite points and a non-zero area, room names
    /// must be unique, the wall constants must be positive, and the reference block
    /// must name an existing room and a usable forward direction.
    pub fn validate(&self) -> Result<()> {
        if self.rooms.is_empty() {
            return Err(Error::InvalidFloorPlan("floor plan has no rooms".to_string()));
        }

        let mut names = HashSet::new();
        for room in &self.rooms {
            room.validate()?;
            if !names.insert(room.name.as_str()) {
                return Err(Error::InvalidFloorPlan(format!(
                    "duplicate room name {:?}",
                    room.name
                )));
            }
        }

        for (i, wall) in self.walls.iter().enumerate() {
            if wall.p1.iter().chain(wall.p2.iter()).any(|c| !c.is_finite()) {
                return Err(Error::InvalidFloorPlan(format!(
                    "wall {} has a non-finite endpoint",
                    i
                )));
            }
        }

        if !(self.wall_height > 0.0) || !(self.wall_thickness > 0.0) {
            return Err(Error::InvalidFloorPlan(
                "wall height and thickness must be positive".to_string(),
            ));
        }

        if let Some(name) = &self.reference.start_room {
            if self.room(name).is_none() {
                return Err(Error::InvalidFloorPlan(format!(
                    "reference start room {:?} does not exist",
                    name
                )));
            }
        }

        let [fx, fy] = self.reference.forward;
        if !fx.is_finite() || !fy.is_finite() || fx * fx + fy * fy <= f32::EPSILON {
            return Err(Error::InvalidFloorPlan(
                "reference forward direction must be a finite non-zero vector".to_string(),
            ));
        }

        Ok(())
    }

    /// Finds a room by exact name
    pub fn room(&self, name: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.name == name)
    }

    /// Center of the named room in model space
    pub fn room_center(&self, name: &str, floor_height: f32) -> Option<Vec3> {
        self.room(name).map(|r| r.center(floor_height))
    }

    /// Room names in plan order
    pub fn destinations(&self) -> impl Iterator<Item = &str> {
        self.rooms.iter().map(|r| r.name.as_str())
    }

    /// The reference start room
    pub fn start_room(&self) -> Option<&Room> {
        match &self.reference.start_room {
            Some(name) => self.room(name),
            None => self.rooms.first(),
        }
    }

    /// The reference start point in model space
    pub fn start_point(&self, floor_height: f32) -> Option<Vec3> {
        self.start_room().map(|r| r.center(floor_height))
    }

    /// Unit model forward direction at the start point
    pub fn forward_direction(&self) -> Vec3 {
        let [x, y] = self.reference.forward;
        Vec3::new(x, 0.0, y).normalize_or_zero()
    }
}
