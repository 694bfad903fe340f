//! Ear clipping triangulation of simple room polygons
//!
//! Each round clips the ear with the shortest closing diagonal. When no strict ear
//! exists a second pass accepts diagonals that touch the outline; ears with zero
//! area are never emitted.

use glam::Vec3;
use wayfind_common::{cross_2d, left, left_on, Error, Result};

/// Ears with less than this doubled area are treated as degenerate
const DEGENERATE_AREA: f32 = 1e-6;

/// Triangulates a counter-clockwise polygon given as indices into `verts`
///
/// Returned triangles reference the same vertex indices and keep the
/// counter-clockwise winding.
pub fn triangulate(verts: &[Vec3], polygon: &[u32]) -> Result<Vec<[u32; 3]>> {
    let n = polygon.len();
    if n < 3 {
        return Err(Error::NavMeshGeneration(format!(
            "cannot triangulate a polygon with {} vertices",
            n
        )));
    }

    let mut indices: Vec<u32> = polygon.to_vec();
    let mut tris = Vec::with_capacity(n - 2);

    // ears[i1] is set when the diagonal closing the ear at i1 is valid
    let mut ears: Vec<bool> = (0..n)
        .map(|i| {
            let i1 = next(i, n);
            let i2 = next(i1, n);
            diagonal(i, i2, verts, &indices)
        })
        .collect();
    ears.rotate_right(1);

    while indices.len() > 3 {
        let n = indices.len();

        let mini = shortest_ear(verts, &indices, |i, _| ears[next(i, n)])
            .or_else(|| {
                log::debug!("No strict ear left in {} vertex outline, trying loose diagonals", n);
                shortest_ear(verts, &indices, |i, i2| {
                    diagonal_loose(i, i2, verts, &indices)
                })
            })
            .ok_or_else(|| {
                Error::NavMeshGeneration(format!(
                    "failed to triangulate polygon: no ear found with {} vertices left",
                    n
                ))
            })?;

        let i = mini;
        let i1 = next(i, n);
        let i2 = next(i1, n);
        tris.push([indices[i], indices[i1], indices[i2]]);

        // Remove P[i1]
        indices.remove(i1);
        ears.remove(i1);
        let n = indices.len();

        let i1 = if i1 >= n { 0 } else { i1 };
        let i = prev(i1, n);

        // Update the ear flags of the two vertices adjacent to the clipped one
        ears[i] = diagonal(prev(i, n), i1, verts, &indices);
        ears[i1] = diagonal(i, next(i1, n), verts, &indices);
    }

    let last = [indices[0], indices[1], indices[2]];
    if area2(verts, last) > DEGENERATE_AREA {
        tris.push(last);
    } else {
        log::debug!("Dropping degenerate closing triangle {:?}", last);
    }

    Ok(tris)
}

/// Finds the candidate ear with the shortest closing diagonal
fn shortest_ear<F>(verts: &[Vec3], indices: &[u32], mut is_candidate: F) -> Option<usize>
where
    F: FnMut(usize, usize) -> bool,
{
    let n = indices.len();
    let mut min_len = f32::MAX;
    let mut mini = None;

    for i in 0..n {
        let i1 = next(i, n);
        let i2 = next(i1, n);
        if !is_candidate(i, i2) {
            continue;
        }
        if area2(verts, [indices[i], indices[i1], indices[i2]]) <= DEGENERATE_AREA {
            continue;
        }

        let p0 = vert(verts, indices, i);
        let p2 = vert(verts, indices, i2);
        let dx = p2.x - p0.x;
        let dz = p2.z - p0.z;
        let len = dx * dx + dz * dz;

        if len < min_len {
            min_len = len;
            mini = Some(i);
        }
    }

    mini
}

#[inline]
fn prev(i: usize, n: usize) -> usize {
    if i >= 1 {
        i - 1
    } else {
        n - 1
    }
}

#[inline]
fn next(i: usize, n: usize) -> usize {
    if i + 1 < n {
        i + 1
    } else {
        0
    }
}

#[inline]
fn vert(verts: &[Vec3], indices: &[u32], i: usize) -> Vec3 {
    verts[indices[i] as usize]
}

fn area2(verts: &[Vec3], tri: [u32; 3]) -> f32 {
    cross_2d(
        &verts[tri[0] as usize],
        &verts[tri[1] as usize],
        &verts[tri[2] as usize],
    )
}

fn collinear(a: &Vec3, b: &Vec3, c: &Vec3) -> bool {
    cross_2d(a, b, c) == 0.0
}

fn diagonal(i: usize, j: usize, verts: &[Vec3], indices: &[u32]) -> bool {
    in_cone(i, j, verts, indices, false) && diagonalie(i, j, verts, indices, false)
}

fn diagonal_loose(i: usize, j: usize, verts: &[Vec3], indices: &[u32]) -> bool {
    in_cone(i, j, verts, indices, true) && diagonalie(i, j, verts, indices, true)
}

/// Checks whether the diagonal from `i` to `j` leaves `i` into the polygon interior
fn in_cone(i: usize, j: usize, verts: &[Vec3], indices: &[u32], loose: bool) -> bool {
    let n = indices.len();
    let pi = vert(verts, indices, i);
    let pj = vert(verts, indices, j);
    let pi1 = vert(verts, indices, next(i, n));
    let pin1 = vert(verts, indices, prev(i, n));

    // If P[i] is a convex vertex [ i+1 left or on (i-1,i) ]
    if left_on(&pin1, &pi, &pi1) {
        if loose {
            left_on(&pi, &pj, &pin1) && left_on(&pj, &pi, &pi1)
        } else {
            left(&pi, &pj, &pin1) && left(&pj, &pi, &pi1)
        }
    } else {
        // else P[i] is reflex
        !(left_on(&pi, &pj, &pi1) && left_on(&pj, &pi, &pin1))
    }
}

/// Checks that the diagonal from `i` to `j` crosses no polygon edge
fn diagonalie(i: usize, j: usize, verts: &[Vec3], indices: &[u32], loose: bool) -> bool {
    let n = indices.len();
    let d0 = vert(verts, indices, i);
    let d1 = vert(verts, indices, j);

    for k in 0..n {
        let k1 = next(k, n);
        // Skip edges incident to i or j
        if k == i || k1 == i || k == j || k1 == j {
            continue;
        }
        // Welded vertices share an index
        if indices[k] == indices[i]
            || indices[k] == indices[j]
            || indices[k1] == indices[i]
            || indices[k1] == indices[j]
        {
            continue;
        }

        let p0 = vert(verts, indices, k);
        let p1 = vert(verts, indices, k1);
        let hit = if loose {
            intersect_prop(&d0, &d1, &p0, &p1)
        } else {
            intersect(&d0, &d1, &p0, &p1)
        };
        if hit {
            return false;
        }
    }
    true
}

fn intersect_prop(a: &Vec3, b: &Vec3, c: &Vec3, d: &Vec3) -> bool {
    // Eliminate improper cases
    if collinear(a, b, c) || collinear(a, b, d) || collinear(c, d, a) || collinear(c, d, b) {
        return false;
    }

    (left(a, b, c) ^ left(a, b, d)) && (left(c, d, a) ^ left(c, d, b))
}

fn between(a: &Vec3, b: &Vec3, c: &Vec3) -> bool {
    if !collinear(a, b, c) {
        return false;
    }
    // If ab not vertical, check betweenness on x; else on z
    if a.x != b.x {
        (a.x <= c.x && c.x <= b.x) || (a.x >= c.x && c.x >= b.x)
    } else {
        (a.z <= c.z && c.z <= b.z) || (a.z >= c.z && c.z >= b.z)
    }
}

fn intersect(a: &Vec3, b: &Vec3, c: &Vec3, d: &Vec3) -> bool {
    if intersect_prop(a, b, c, d) {
        return true;
    }

    between(a, b, c) || between(a, b, d) || between(c, d, a) || between(c, d, b)
}
