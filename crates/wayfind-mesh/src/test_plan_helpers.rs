//! Floor plan fixtures shared by tests across the workspace
//!
//! All plans use a 3.0 wall height and 0.2 wall thickness.

use crate::{BuildContext, FloorPlan, NavMesh, NavMeshBuilder, NavMeshConfig, Reference, Room, Wall};
use wayfind_common::Result;

/// Axis aligned square outline with its minimum corner at `(x, y)`
pub fn square(x: f32, y: f32, size: f32) -> Vec<[f32; 2]> {
    rect(x, y, x + size, y + size)
}

/// Axis aligned rectangle outline, counter-clockwise
pub fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<[f32; 2]> {
    vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1]]
}

/// Creates a plan from rooms with default constants and no walls
pub fn create_plan(rooms: Vec<Room>) -> FloorPlan {
    FloorPlan {
        rooms,
        walls: Vec::new(),
        wall_height: 3.0,
        wall_thickness: 0.2,
        plan_size: Default::default(),
        reference: Reference::default(),
    }
}

/// Two 10x10 rooms "A" and "B" sharing the edge x = 10
pub fn create_two_room_plan() -> FloorPlan {
    create_plan(vec![
        Room::new("A", square(0.0, 0.0, 10.0)),
        Room::new("B", square(10.0, 0.0, 10.0)),
    ])
}

/// Two 10x10 rooms, one at the origin and one at x = 100
pub fn create_disjoint_plan() -> FloorPlan {
    create_plan(vec![
        Room::new("NEAR", square(0.0, 0.0, 10.0)),
        Room::new("FAR", square(100.0, 0.0, 10.0)),
    ])
}

/// Two squares touching only at the corner (10, 10)
pub fn create_corner_touch_plan() -> FloorPlan {
    create_plan(vec![
        Room::new("SW", square(0.0, 0.0, 10.0)),
        Room::new("NE", square(10.0, 10.0, 10.0)),
    ])
}

/// A single L-shaped room whose notch blocks the straight line between its arms
pub fn create_l_shape_plan() -> FloorPlan {
    create_plan(vec![Room::new(
        "L",
        vec![
            [0.0, 0.0],
            [10.0, 0.0],
            [10.0, 2.0],
            [2.0, 2.0],
            [2.0, 10.0],
            [0.0, 10.0],
        ],
    )])
}

/// A single room shaped like a comb: a strip along y = 0..2 with three teeth
/// rising to y = 10 over x in [0, 2], [4, 6] and [8, 10]
pub fn create_comb_plan() -> FloorPlan {
    create_plan(vec![Room::new(
        "COMB",
        vec![
            [0.0, 0.0],
            [10.0, 0.0],
            [10.0, 10.0],
            [8.0, 10.0],
            [8.0, 2.0],
            [6.0, 2.0],
            [6.0, 10.0],
            [4.0, 10.0],
            [4.0, 2.0],
            [2.0, 2.0],
            [2.0, 10.0],
            [0.0, 10.0],
        ],
    )])
}

/// A long hall with a smaller room attached to half of its north wall
///
/// The rooms only share the stretch from x = 4 to x = 8; the hall outline
/// does not contain the room's corners, so the build has to split the edge.
pub fn create_t_junction_plan() -> FloorPlan {
    create_plan(vec![
        Room::new("HALL", rect(0.0, 0.0, 12.0, 4.0)),
        Room::new("OFFICE", rect(4.0, 4.0, 8.0, 8.0)),
    ])
}

/// A small building: lobby, corridor and three rooms, plus a detached storage room
pub fn create_demo_plan() -> FloorPlan {
    let mut plan = create_plan(vec![
        Room::new("ENTRANCE\nLOBBY", rect(0.0, 0.0, 10.0, 8.0)),
        Room::new("CORRIDOR", rect(10.0, 2.0, 30.0, 6.0)),
        Room::new("LAB 1", rect(14.0, 6.0, 22.0, 14.0)),
        Room::new("LAB 2", rect(22.0, 6.0, 30.0, 14.0)),
        Room::new("OFFICE", rect(18.0, -6.0, 30.0, 2.0)),
        Room::new("STORAGE", rect(40.0, 0.0, 44.0, 4.0)),
    ]);
    plan.walls = vec![
        Wall {
            p1: [0.0, 0.0],
            p2: [10.0, 0.0],
        },
        Wall {
            p1: [10.0, 6.0],
            p2: [14.0, 6.0],
        },
    ];
    plan.plan_size.width = 44.0;
    plan.plan_size.height = 20.0;
    plan.reference.start_room = Some("ENTRANCE\nLOBBY".to_string());
    plan
}

/// Builds a navigation mesh with the default configuration
pub fn build_nav_mesh(plan: &FloorPlan) -> Result<NavMesh> {
    let mut ctx = BuildContext::new();
    NavMeshBuilder::new(NavMeshConfig::default()).build(plan, &mut ctx)
}
