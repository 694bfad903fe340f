//! Walkable navigation mesh built from floor plan rooms
//!
//! The mesh is a set of welded vertices and counter-clockwise triangles on the
//! floor plane. Each face records its neighbour across every edge and the
//! connectivity group it belongs to.

use glam::Vec3;
use wayfind_common::point_in_triangle_2d;

/// Reference to a face in a [`NavMesh`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct FaceRef(pub u32);

impl FaceRef {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Connected component of walkable faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct GroupId(pub u32);

/// A triangular walkable face
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Face {
    /// Vertex indices, counter-clockwise on the floor plane
    pub verts: [u32; 3],
    /// Neighbour across edge `i` (from `verts[i]` to `verts[(i + 1) % 3]`)
    pub neighbors: [Option<FaceRef>; 3],
    /// Index of the room this face was cut from
    pub room: u32,
    /// Connectivity group
    pub group: GroupId,
    /// Centroid of the triangle
    pub center: Vec3,
}

/// The walkable navigation mesh
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct NavMesh {
    pub(crate) verts: Vec<Vec3>,
    pub(crate) faces: Vec<Face>,
    pub(crate) group_count: u32,
    pub(crate) room_names: Vec<String>,
    /// Boundary tolerance for point location
    pub(crate) tolerance: f32,
}

impl NavMesh {
    pub(crate) fn from_parts(
        verts: Vec<Vec3>,
        faces: Vec<Face>,
        group_count: u32,
        room_names: Vec<String>,
        tolerance: f32,
    ) -> Self {
        Self {
            verts,
            faces,
            group_count,
            room_names,
            tolerance,
        }
    }

    /// Welded vertices
    pub fn verts(&self) -> &[Vec3] {
        &self.verts
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of connectivity groups
    pub fn group_count(&self) -> u32 {
        self.group_count
    }

    pub fn face(&self, face: FaceRef) -> Option<&Face> {
        self.faces.get(face.index())
    }

    /// The three corners of a face
    pub fn face_vertices(&self, face: FaceRef) -> Option<[Vec3; 3]> {
        self.face(face)
            .map(|f| f.verts.map(|v| self.verts[v as usize]))
    }

    /// Name of the room a face was cut from
    pub fn face_room(&self, face: FaceRef) -> Option<&str> {
        self.face(face)
            .and_then(|f| self.room_names.get(f.room as usize))
            .map(String::as_str)
    }

    /// Iterates the neighbours of a face
    pub fn neighbors(&self, face: FaceRef) -> impl Iterator<Item = FaceRef> + '_ {
        self.face(face)
            .into_iter()
            .flat_map(|f| f.neighbors.iter().flatten().copied())
    }

    /// Finds the first face, by index, containing `pos` on the floor plane
    ///
    /// The vertical coordinate is ignored; boundaries count as inside.
    pub fn find_face(&self, pos: &Vec3) -> Option<FaceRef> {
        self.faces
            .iter()
            .position(|f| {
                let [a, b, c] = f.verts.map(|v| self.verts[v as usize]);
                point_in_triangle_2d(pos, &a, &b, &c, self.tolerance)
            })
            .map(|i| FaceRef(i as u32))
    }

    /// Group of the face containing `pos`, `None` when the point is not walkable
    pub fn group_at(&self, pos: &Vec3) -> Option<GroupId> {
        self.find_face(pos)
            .and_then(|f| self.face(f))
            .map(|f| f.group)
    }

    /// Gets the portal edge between two adjacent faces
    ///
    /// Returns `(left, right)` as seen when walking from `from` into `to`.
    pub fn portal(&self, from: FaceRef, to: FaceRef) -> Option<(Vec3, Vec3)> {
        let face = self.face(from)?;
        let edge = face.neighbors.iter().position(|n| *n == Some(to))?;
        let right = self.verts[face.verts[edge] as usize];
        let left = self.verts[face.verts[(edge + 1) % 3] as usize];
        Some((left, right))
    }

    /// Saves the navigation mesh to a file in JSON format
    #[cfg(feature = "serialization")]
    pub fn save_to_json<P: AsRef<std::path::Path>>(&self, path: P) -> wayfind_common::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads a navigation mesh from a JSON file
    #[cfg(feature = "serialization")]
    pub fn load_from_json<P: AsRef<std::path::Path>>(path: P) -> wayfind_common::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let nav_mesh = serde_json::from_str(&json)?;
        Ok(nav_mesh)
    }
}
