//! Navigation mesh construction from floor plan rooms

use std::collections::{HashMap, VecDeque};

use glam::Vec3;
use wayfind_common::{
    dist_point_segment_sqr_2d, plan_to_model, point_on_segment_interior_2d, polygon_area2_2d,
    Error, Result,
};

use crate::context::{BuildContext, BuildPhase, TimerGuard};
use crate::nav_mesh::{Face, FaceRef, GroupId, NavMesh};
use crate::triangulate::triangulate;
use crate::{FloorPlan, NavMeshConfig};

/// Builder turning floor plan rooms into a [`NavMesh`]
#[derive(Debug, Clone, Default)]
pub struct NavMeshBuilder {
    config: NavMeshConfig,
}

impl NavMeshBuilder {
    /// Creates a new builder with the specified configuration
    pub fn new(config: NavMeshConfig) -> Self {
        Self { config }
    }

    /// Gets a reference to the configuration
    pub fn config(&self) -> &NavMeshConfig {
        &self.config
    }

    /// Builds the navigation mesh for every room of the plan
    pub fn build(&self, plan: &FloorPlan, ctx: &mut BuildContext) -> Result<NavMesh> {
        self.config.validate()?;
        plan.validate()?;

        ctx.start_timer(BuildPhase::Total);
        let result = self.build_internal(plan, ctx);
        ctx.stop_timer(BuildPhase::Total);

        match &result {
            Ok(mesh) => ctx.log_info(format!(
                "NavMesh built: {} rooms, {} vertices, {} faces, {} groups",
                plan.rooms.len(),
                mesh.verts().len(),
                mesh.face_count(),
                mesh.group_count()
            )),
            Err(e) => ctx.log_error(format!("NavMesh build failed: {}", e)),
        }

        result
    }

    fn build_internal(&self, plan: &FloorPlan, ctx: &mut BuildContext) -> Result<NavMesh> {
        let eps = self.config.weld_tolerance;

        // Weld room outlines into one shared vertex pool
        let timer = TimerGuard::new(ctx, BuildPhase::Weld);
        let mut welder = VertexWelder::new(eps);
        let mut polygons = Vec::with_capacity(plan.rooms.len());
        for room in &plan.rooms {
            let mut polygon: Vec<u32> = room
                .points
                .iter()
                .map(|p| welder.add(plan_to_model(*p, self.config.floor_height)))
                .collect();
            polygon.dedup();
            while polygon.len() > 1 && polygon.first() == polygon.last() {
                polygon.pop();
            }
            if polygon.len() < 3 {
                return Err(Error::InvalidFloorPlan(format!(
                    "room {:?} collapses to {} vertices after welding",
                    room.name,
                    polygon.len()
                )));
            }
            polygons.push(polygon);
        }
        let verts = welder.into_verts();
        timer.stop(ctx);
        ctx.log_debug(format!(
            "Welded {} room points into {} vertices",
            plan.rooms.iter().map(|r| r.points.len()).sum::<usize>(),
            verts.len()
        ));

        if self.config.split_collinear_edges {
            let timer = TimerGuard::new(ctx, BuildPhase::SplitEdges);
            let inserted = split_collinear_edges(&verts, &mut polygons, eps);
            timer.stop(ctx);
            if inserted > 0 {
                ctx.log_debug(format!("Inserted {} T-junction vertices", inserted));
            }
        }

        // Triangulate every room with counter-clockwise winding
        let timer = TimerGuard::new(ctx, BuildPhase::Triangulate);
        let mut faces = Vec::new();
        for (room_index, polygon) in polygons.iter_mut().enumerate() {
            let outline: Vec<Vec3> = polygon.iter().map(|&v| verts[v as usize]).collect();
            if polygon_area2_2d(&outline) < 0.0 {
                polygon.reverse();
            }

            let tris = match triangulate(&verts, polygon) {
                Ok(tris) => tris,
                Err(e) => {
                    timer.stop(ctx);
                    ctx.log_error(format!(
                        "Room {:?} could not be triangulated",
                        plan.rooms[room_index].name
                    ));
                    return Err(e);
                }
            };

            for tri in tris {
                let [a, b, c] = tri.map(|v| verts[v as usize]);
                faces.push(Face {
                    verts: tri,
                    neighbors: [None; 3],
                    room: room_index as u32,
                    group: GroupId(0),
                    center: (a + b + c) / 3.0,
                });
            }
        }
        timer.stop(ctx);

        let timer = TimerGuard::new(ctx, BuildPhase::Adjacency);
        let overlaps = build_adjacency(&mut faces);
        timer.stop(ctx);
        for (a, b) in overlaps {
            ctx.log_warning(format!(
                "Edge {}-{} is shared by overlapping faces and is not walkable across",
                a, b
            ));
        }

        let timer = TimerGuard::new(ctx, BuildPhase::Groups);
        let group_count = assign_groups(&mut faces);
        timer.stop(ctx);

        let room_names = plan.rooms.iter().map(|r| r.name.clone()).collect();
        Ok(NavMesh::from_parts(verts, faces, group_count, room_names, eps))
    }
}

/// Spatial hash merging points closer than a tolerance
struct VertexWelder {
    tolerance: f32,
    verts: Vec<Vec3>,
    buckets: HashMap<(i64, i64), Vec<u32>>,
}

impl VertexWelder {
    fn new(tolerance: f32) -> Self {
        Self {
            tolerance,
            verts: Vec::new(),
            buckets: HashMap::new(),
        }
    }

    fn cell(&self, p: &Vec3) -> (i64, i64) {
        (
            (p.x / self.tolerance).floor() as i64,
            (p.z / self.tolerance).floor() as i64,
        )
    }

    /// Returns the index of an existing vertex within tolerance, or adds `p`
    fn add(&mut self, p: Vec3) -> u32 {
        let (cx, cz) = self.cell(&p);
        let tol_sqr = self.tolerance * self.tolerance;

        for dx in -1..=1 {
            for dz in -1..=1 {
                if let Some(bucket) = self.buckets.get(&(cx + dx, cz + dz)) {
                    for &i in bucket {
                        let v = self.verts[i as usize];
                        let ex = v.x - p.x;
                        let ez = v.z - p.z;
                        if ex * ex + ez * ez <= tol_sqr {
                            return i;
                        }
                    }
                }
            }
        }

        let i = self.verts.len() as u32;
        self.verts.push(p);
        self.buckets.entry((cx, cz)).or_default().push(i);
        i
    }

    fn into_verts(self) -> Vec<Vec3> {
        self.verts
    }
}

/// Inserts vertices of other rooms that lie inside a room edge into that edge
///
/// Returns the number of inserted vertices.
fn split_collinear_edges(verts: &[Vec3], polygons: &mut [Vec<u32>], eps: f32) -> usize {
    let mut inserted = 0;

    for polygon in polygons.iter_mut() {
        let n = polygon.len();
        let mut split = Vec::with_capacity(n);

        for i in 0..n {
            let va = polygon[i];
            let vb = polygon[(i + 1) % n];
            let a = verts[va as usize];
            let b = verts[vb as usize];

            split.push(va);

            let mut on_edge: Vec<(f32, u32)> = (0..verts.len() as u32)
                .filter(|v| !polygon.contains(v))
                .filter(|&v| point_on_segment_interior_2d(&verts[v as usize], &a, &b, eps))
                .map(|v| (dist_point_segment_sqr_2d(&verts[v as usize], &a, &b).1, v))
                .collect();
            on_edge.sort_by(|x, y| x.0.total_cmp(&y.0).then(x.1.cmp(&y.1)));

            inserted += on_edge.len();
            split.extend(on_edge.into_iter().map(|(_, v)| v));
        }

        *polygon = split;
    }

    inserted
}

/// Links faces sharing an edge in opposite directions
///
/// Returns edges shared by faces that cannot be linked (more than two faces, or two
/// faces with the same winding across the edge).
fn build_adjacency(faces: &mut [Face]) -> Vec<(u32, u32)> {
    let mut edges: HashMap<(u32, u32), Vec<(usize, usize)>> = HashMap::new();
    for (fi, face) in faces.iter().enumerate() {
        for j in 0..3 {
            let a = face.verts[j];
            let b = face.verts[(j + 1) % 3];
            edges.entry((a.min(b), a.max(b))).or_default().push((fi, j));
        }
    }

    let mut overlaps = Vec::new();
    for fi in 0..faces.len() {
        for j in 0..3 {
            let a = faces[fi].verts[j];
            let b = faces[fi].verts[(j + 1) % 3];
            let Some(shared) = edges.get(&(a.min(b), a.max(b))) else {
                continue;
            };
            if shared.len() == 1 {
                continue;
            }

            let linked = match shared.as_slice() {
                [x, y] => {
                    let (other, oj) = if x.0 == fi { *y } else { *x };
                    // The neighbour must walk the edge from b to a
                    let ov = faces[other].verts;
                    if ov[oj] == b && ov[(oj + 1) % 3] == a {
                        Some(FaceRef(other as u32))
                    } else {
                        None
                    }
                }
                _ => None,
            };

            match linked {
                Some(other) => faces[fi].neighbors[j] = Some(other),
                None => {
                    // Report each edge once, from its lowest face
                    if shared.iter().all(|&(f, _)| f >= fi) {
                        overlaps.push((a.min(b), a.max(b)));
                    }
                }
            }
        }
    }

    overlaps
}

/// Flood fills connectivity groups in face order, returning the group count
fn assign_groups(faces: &mut [Face]) -> u32 {
    let mut visited = vec![false; faces.len()];
    let mut group_count = 0;
    let mut queue = VecDeque::new();

    for seed in 0..faces.len() {
        if visited[seed] {
            continue;
        }
        let group = GroupId(group_count);
        group_count += 1;

        visited[seed] = true;
        queue.push_back(seed);
        while let Some(fi) = queue.pop_front() {
            faces[fi].group = group;
            for neighbor in faces[fi].neighbors.into_iter().flatten() {
                let ni = neighbor.index();
                if !visited[ni] {
                    visited[ni] = true;
                    queue.push_back(ni);
                }
            }
        }
    }

    group_count
}
