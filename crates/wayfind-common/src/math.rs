//! Angle and scalar math utilities

use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Converts degrees to radians
#[inline]
pub fn deg_to_rad(deg: f32) -> f32 {
    deg * PI / 180.0
}

/// Converts radians to degrees
#[inline]
pub fn rad_to_deg(rad: f32) -> f32 {
    rad * 180.0 / PI
}

/// Wraps an angle in degrees into `[0, 360)`
#[inline]
pub fn wrap_degrees(deg: f32) -> f32 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Wraps an angle in radians into `(-PI, PI]`
#[inline]
pub fn wrap_angle(rad: f32) -> f32 {
    let wrapped = (rad + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Yaw of a direction about the Y axis, measured from +Z towards +X.
///
/// A rotation of `yaw_of(d)` about Y maps `(0, 0, 1)` onto the horizontal part of `d`.
#[inline]
pub fn yaw_of(dir: &Vec3) -> f32 {
    dir.x.atan2(dir.z)
}
