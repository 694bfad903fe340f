//! 2D geometry operations on the floor plane
//!
//! All operations work on the XZ plane of a Y-up coordinate system; the Y component
//! of every input is ignored. Floor-plan coordinates `(x, y)` live at `(x, 0, y)`.
//!
//! Orientation convention: `cross_2d(a, b, c) > 0` means `a -> b -> c` turns
//! counter-clockwise when X points right and Z points up. `tri_area_2d` is the
//! negation of `cross_2d`, kept in the form the funnel algorithm is usually written in.

use glam::Vec3;

/// Lifts a floor-plan point `[x, y]` to model space at the given floor height.
#[inline]
pub fn plan_to_model(p: [f32; 2], floor_height: f32) -> Vec3 {
    Vec3::new(p[0], floor_height, p[1])
}

/// Calculate twice the signed area of a triangle on the XZ plane.
///
/// The sign indicates the winding order:
/// - Positive: clockwise
/// - Negative: counter-clockwise
/// - Zero: degenerate (collinear points)
#[inline]
pub fn tri_area_2d(a: &Vec3, b: &Vec3, c: &Vec3) -> f32 {
    let abx = b.x - a.x;
    let abz = b.z - a.z;
    let acx = c.x - a.x;
    let acz = c.z - a.z;
    acx * abz - abx * acz
}

/// 2D cross product of `b - a` and `c - a` on the XZ plane.
///
/// Positive when `c` lies counter-clockwise (left) of the directed line `a -> b`.
#[inline]
pub fn cross_2d(a: &Vec3, b: &Vec3, c: &Vec3) -> f32 {
    -tri_area_2d(a, b, c)
}

/// Check if point c is left of the line from a to b (on XZ plane).
#[inline]
pub fn left(a: &Vec3, b: &Vec3, c: &Vec3) -> bool {
    cross_2d(a, b, c) > 0.0
}

/// Check if point c is left of or on the line from a to b (on XZ plane).
#[inline]
pub fn left_on(a: &Vec3, b: &Vec3, c: &Vec3) -> bool {
    cross_2d(a, b, c) >= 0.0
}

/// Calculate squared distance between two points on the XZ plane.
#[inline]
pub fn dist_sqr_2d(a: &Vec3, b: &Vec3) -> f32 {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    dx * dx + dz * dz
}

/// Calculate distance between two points on the XZ plane.
#[inline]
pub fn dist_2d(a: &Vec3, b: &Vec3) -> f32 {
    dist_sqr_2d(a, b).sqrt()
}

/// Checks if two positions coincide on the XZ plane within `eps`.
#[inline]
pub fn v_equal_2d(a: &Vec3, b: &Vec3, eps: f32) -> bool {
    dist_sqr_2d(a, b) <= eps * eps
}

/// Calculate distance squared from a point to a segment on the XZ plane,
/// returning the clamped segment parameter as well.
pub fn dist_point_segment_sqr_2d(p: &Vec3, a: &Vec3, b: &Vec3) -> (f32, f32) {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    let dpx = p.x - a.x;
    let dpz = p.z - a.z;

    let d = dx * dx + dz * dz;
    let t = if d > 0.0 {
        ((dpx * dx + dpz * dz) / d).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let qx = a.x + t * dx;
    let qz = a.z + t * dz;
    let ex = p.x - qx;
    let ez = p.z - qz;

    (ex * ex + ez * ez, t)
}

/// Checks if `p` lies on segment `a-b` strictly between its endpoints.
///
/// Points within `eps` of either endpoint are not considered interior.
pub fn point_on_segment_interior_2d(p: &Vec3, a: &Vec3, b: &Vec3, eps: f32) -> bool {
    if v_equal_2d(p, a, eps) || v_equal_2d(p, b, eps) {
        return false;
    }
    let (d_sqr, t) = dist_point_segment_sqr_2d(p, a, b);
    d_sqr <= eps * eps && t > 0.0 && t < 1.0
}

/// Twice the signed area of a polygon on the XZ plane.
///
/// Positive for counter-clockwise winding.
pub fn polygon_area2_2d(verts: &[Vec3]) -> f32 {
    let n = verts.len();
    let mut area = 0.0;
    for i in 0..n {
        let a = &verts[i];
        let b = &verts[(i + 1) % n];
        area += a.x * b.z - b.x * a.z;
    }
    area
}

/// Arithmetic mean of the polygon vertices.
pub fn polygon_center(verts: &[Vec3]) -> Vec3 {
    if verts.is_empty() {
        return Vec3::ZERO;
    }
    let sum = verts.iter().fold(Vec3::ZERO, |acc, v| acc + *v);
    sum / verts.len() as f32
}

/// Checks if a point lies inside or on the boundary of a triangle (on XZ plane).
///
/// Works for either winding. `eps` is a distance tolerance applied to each edge.
pub fn point_in_triangle_2d(p: &Vec3, a: &Vec3, b: &Vec3, c: &Vec3, eps: f32) -> bool {
    let area = cross_2d(a, b, c);
    if area == 0.0 {
        return false;
    }
    let sign = area.signum();

    for (u, v) in [(a, b), (b, c), (c, a)] {
        let len = dist_2d(u, v);
        if sign * cross_2d(u, v, p) < -eps * len {
            return false;
        }
    }
    true
}
