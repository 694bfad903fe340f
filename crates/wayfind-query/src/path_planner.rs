//! Path planning over the navigation mesh
//!
//! A query first locates the start and destination faces, then runs A* over face
//! adjacency and finally pulls the face corridor taut with the funnel algorithm.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use glam::Vec3;
use wayfind_common::{dist_2d, dist_point_segment_sqr_2d, tri_area_2d, v_equal_2d};
use wayfind_mesh::{FaceRef, GroupId, NavMesh};

use crate::{PathError, PathProvider, PathResult};

/// Horizontal distance below which two path points are the same
const POINT_EPSILON: f32 = 0.001;

/// Node in the A* search
#[derive(Debug, Clone)]
struct Node {
    /// Parent face in the search tree
    parent: Option<FaceRef>,
    /// Cost from start to this node
    g: f32,
    /// State of the node in the search
    state: NodeState,
}

/// State of a node in the search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeState {
    /// Node hasn't been reached yet
    New,
    /// Node is in the open list
    Open,
    /// Node is in the closed list
    Closed,
}

/// Node wrapper for the binary heap (priority queue)
#[derive(Debug, Clone, Copy)]
struct HeapNode {
    face: FaceRef,
    /// Total cost (f value)
    f: f32,
}

impl PartialEq for HeapNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapNode {}

impl PartialOrd for HeapNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for a min-heap; equal costs pop the lower face index first
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.face.cmp(&self.face))
    }
}

/// Built-in [`PathProvider`] over a [`NavMesh`]
#[derive(Debug, Clone)]
pub struct PathPlanner {
    nav_mesh: NavMesh,
}

impl PathPlanner {
    /// Creates a planner owning the navigation mesh
    pub fn new(nav_mesh: NavMesh) -> Self {
        Self { nav_mesh }
    }

    /// Gets the navigation mesh
    pub fn nav_mesh(&self) -> &NavMesh {
        &self.nav_mesh
    }

    /// Finds the face corridor from `start` to `end` with A*
    ///
    /// Edge costs and the heuristic are distances between face centroids.
    /// Returns `None` when the faces are not connected.
    pub fn find_corridor(&self, start: FaceRef, end: FaceRef) -> Option<Vec<FaceRef>> {
        let mesh = &self.nav_mesh;
        mesh.face(start)?;
        let goal_center = mesh.face(end)?.center;

        if start == end {
            return Some(vec![start]);
        }

        let mut nodes = vec![
            Node {
                parent: None,
                g: 0.0,
                state: NodeState::New,
            };
            mesh.face_count()
        ];
        let mut open_list = BinaryHeap::new();

        let heuristic = |face: FaceRef| {
            mesh.face(face)
                .map(|f| dist_2d(&f.center, &goal_center))
                .unwrap_or(f32::MAX)
        };

        nodes[start.index()].state = NodeState::Open;
        open_list.push(HeapNode {
            face: start,
            f: heuristic(start),
        });

        let mut found = false;
        while let Some(HeapNode { face: current, .. }) = open_list.pop() {
            if nodes[current.index()].state == NodeState::Closed {
                continue;
            }
            nodes[current.index()].state = NodeState::Closed;

            if current == end {
                found = true;
                break;
            }

            let current_g = nodes[current.index()].g;
            let current_center = match mesh.face(current) {
                Some(f) => f.center,
                None => continue,
            };

            for neighbor in mesh.neighbors(current) {
                let Some(neighbor_face) = mesh.face(neighbor) else {
                    continue;
                };
                let node = &mut nodes[neighbor.index()];
                if node.state == NodeState::Closed {
                    continue;
                }

                let g = current_g + dist_2d(&current_center, &neighbor_face.center);
                if node.state == NodeState::Open && g >= node.g {
                    continue;
                }

                node.parent = Some(current);
                node.g = g;
                node.state = NodeState::Open;
                open_list.push(HeapNode {
                    face: neighbor,
                    f: g + heuristic(neighbor),
                });
            }
        }

        if !found {
            return None;
        }

        // Reconstruct the corridor
        let mut corridor = vec![end];
        let mut current = end;
        while let Some(parent) = nodes[current.index()].parent {
            corridor.push(parent);
            current = parent;
        }
        corridor.reverse();

        Some(corridor)
    }

    /// Pulls a straight path through the portals of a face corridor
    ///
    /// The result starts at `start`, ends at `end`, and bends only at portal
    /// vertices.
    pub fn find_straight_path(&self, start: Vec3, end: Vec3, corridor: &[FaceRef]) -> Vec<Vec3> {
        let mut portals = Vec::with_capacity(corridor.len() + 1);
        portals.push((start, start));
        for pair in corridor.windows(2) {
            match self.nav_mesh.portal(pair[0], pair[1]) {
                Some(portal) => portals.push(portal),
                None => log::warn!(
                    "Faces {:?} and {:?} in corridor are not adjacent",
                    pair[0],
                    pair[1]
                ),
            }
        }
        portals.push((end, end));

        string_pull(&portals, start, end)
    }
}

impl PathProvider for PathPlanner {
    fn find_path(&self, start: Vec3, destination: Vec3) -> PathResult<Vec<Vec3>> {
        let mesh = &self.nav_mesh;

        let start_face = mesh.find_face(&start).ok_or(PathError::StartNotNavigable)?;
        let end_face = mesh
            .find_face(&destination)
            .ok_or(PathError::DestinationNotNavigable)?;

        let start_group = mesh.face(start_face).map(|f| f.group);
        let end_group = mesh.face(end_face).map(|f| f.group);
        if start_group != end_group {
            log::debug!(
                "No path: start group {:?} differs from destination group {:?}",
                start_group,
                end_group
            );
            return Err(PathError::Unreachable);
        }

        if v_equal_2d(&start, &destination, POINT_EPSILON) {
            return Ok(vec![start]);
        }

        if start_face == end_face {
            return Ok(vec![start, destination]);
        }

        let corridor = self
            .find_corridor(start_face, end_face)
            .ok_or(PathError::Unreachable)?;
        let path = self.find_straight_path(start, destination, &corridor);

        log::debug!(
            "Path through {} faces with {} waypoints",
            corridor.len(),
            path.len()
        );

        Ok(path)
    }

    fn group_of(&self, pos: Vec3) -> Option<GroupId> {
        self.nav_mesh.group_at(&pos)
    }
}

/// Funnel algorithm over `(left, right)` portals
///
/// The first portal must be `(start, start)` and the last `(end, end)`. Portals
/// passing through the current apex are skipped, both for the start and after
/// every restart of the funnel.
fn string_pull(portals: &[(Vec3, Vec3)], start: Vec3, end: Vec3) -> Vec<Vec3> {
    let mut path = vec![start];

    let mut portal_apex = start;
    let mut portal_left = start;
    let mut portal_right = start;
    let mut apex_index = 0;
    let mut left_index = 0;
    let mut right_index = 0;

    let mut i = 1;
    while i < portals.len() {
        let (left, right) = portals[i];

        // An apex lying on the portal opens the funnel to a half plane
        let (apex_dist_sqr, _) = dist_point_segment_sqr_2d(&portal_apex, &left, &right);
        if apex_dist_sqr < POINT_EPSILON * POINT_EPSILON {
            i += 1;
            continue;
        }

        // Right vertex
        if tri_area_2d(&portal_apex, &portal_right, &right) <= 0.0 {
            if v_equal_2d(&portal_apex, &portal_right, POINT_EPSILON)
                || tri_area_2d(&portal_apex, &portal_left, &right) > 0.0
            {
                portal_right = right;
                right_index = i;
            } else {
                // Left becomes the new apex
                push_point(&mut path, portal_left);

                // Restart funnel
                portal_apex = portal_left;
                apex_index = left_index;
                portal_left = portal_apex;
                portal_right = portal_apex;
                left_index = apex_index;
                right_index = apex_index;
                i = apex_index + 1;
                continue;
            }
        }

        // Left vertex
        if tri_area_2d(&portal_apex, &portal_left, &left) >= 0.0 {
            if v_equal_2d(&portal_apex, &portal_left, POINT_EPSILON)
                || tri_area_2d(&portal_apex, &portal_right, &left) < 0.0
            {
                portal_left = left;
                left_index = i;
            } else {
                // Right becomes the new apex
                push_point(&mut path, portal_right);

                // Restart funnel
                portal_apex = portal_right;
                apex_index = right_index;
                portal_left = portal_apex;
                portal_right = portal_apex;
                left_index = apex_index;
                right_index = apex_index;
                i = apex_index + 1;
                continue;
            }
        }

        i += 1;
    }

    // The last point is always exactly the destination
    let reached = path.len() > 1
        && path
            .last()
            .map(|last| v_equal_2d(last, &end, POINT_EPSILON))
            .unwrap_or(false);
    if reached {
        path.pop();
    }
    path.push(end);

    path
}

/// Appends a corner unless it repeats the previous point
fn push_point(path: &mut Vec<Vec3>, point: Vec3) {
    let is_duplicate = path
        .last()
        .map(|last| v_equal_2d(last, &point, POINT_EPSILON))
        .unwrap_or(false);
    if !is_duplicate {
        path.push(point);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32, z: f32) -> Vec3 {
        Vec3::new(x, 0.0, z)
    }

    #[test]
    fn test_heap_pops_lowest_cost_then_lowest_face() {
        let mut heap = BinaryHeap::new();
        heap.push(HeapNode {
            face: FaceRef(3),
            f: 2.0,
        });
        heap.push(HeapNode {
            face: FaceRef(5),
            f: 1.0,
        });
        heap.push(HeapNode {
            face: FaceRef(1),
            f: 1.0,
        });
        assert_eq!(heap.pop().map(|n| n.face), Some(FaceRef(1)));
        assert_eq!(heap.pop().map(|n| n.face), Some(FaceRef(5)));
        assert_eq!(heap.pop().map(|n| n.face), Some(FaceRef(3)));
    }

    #[test]
    fn test_string_pull_straight_corridor() {
        // Two wide portals straight ahead: no corners
        let start = p(0.0, 0.0);
        let end = p(0.0, 10.0);
        let portals = vec![
            (start, start),
            (p(-5.0, 3.0), p(5.0, 3.0)),
            (p(-5.0, 6.0), p(5.0, 6.0)),
            (end, end),
        ];
        assert_eq!(string_pull(&portals, start, end), vec![start, end]);
    }

    #[test]
    fn test_string_pull_bends_at_corner() {
        // Walking +Z the left side is -X; the corridor turns left after a narrow gap
        let start = p(4.0, 0.0);
        let end = p(-10.0, 8.0);
        let portals = vec![
            (start, start),
            (p(0.0, 4.0), p(10.0, 4.0)),
            (end, end),
        ];
        let path = string_pull(&portals, start, end);
        assert_eq!(path, vec![start, p(0.0, 4.0), end]);
    }

    #[test]
    fn test_string_pull_skips_portal_through_apex() {
        // The start lies on the first portal; a later portal must not bend the
        // path around the far end of it
        let start = p(5.0, 5.0);
        let end = p(5.0, 20.0);
        let portals = vec![
            (start, start),
            (p(0.0, 0.0), p(10.0, 10.0)),
            (p(0.0, 10.0), p(10.0, 10.0)),
            (end, end),
        ];
        assert_eq!(string_pull(&portals, start, end), vec![start, end]);
    }

    #[test]
    fn test_push_point_skips_duplicates() {
        let mut path = vec![p(1.0, 1.0)];
        push_point(&mut path, p(1.0, 1.0005));
        push_point(&mut path, p(2.0, 1.0));
        assert_eq!(path.len(), 2);
    }
}
