//! Model placement in the world frame

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use wayfind_common::{dist_sqr_2d, wrap_angle};

/// Camera world position and viewing direction for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    /// World-space forward direction; only its horizontal part is used
    pub forward: Vec3,
}

impl CameraPose {
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self { position, forward }
    }
}

/// Yaw rotation plus translation placing the building model in the world
///
/// A model point `p` appears in the world at `R(rotation_y) * p + translation`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelTransform {
    /// Rotation about +Y in radians
    pub rotation_y: f32,
    pub translation: Vec3,
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ModelTransform {
    pub const IDENTITY: Self = Self {
        rotation_y: 0.0,
        translation: Vec3::ZERO,
    };

    pub fn new(rotation_y: f32, translation: Vec3) -> Self {
        Self {
            rotation_y,
            translation,
        }
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.rotation_y)
    }

    /// Model-to-world matrix
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation(), self.translation)
    }

    /// Maps a model-space point into the world
    pub fn apply(&self, model: Vec3) -> Vec3 {
        self.rotation() * model + self.translation
    }

    /// Maps a world-space point back into the model
    pub fn inverse_apply(&self, world: Vec3) -> Vec3 {
        self.rotation().inverse() * (world - self.translation)
    }

    /// Rotates a model-space direction into the world
    pub fn apply_direction(&self, dir: Vec3) -> Vec3 {
        self.rotation() * dir
    }

    /// Compares two transforms, treating angles modulo a full turn
    pub fn approx_eq(&self, other: &Self, eps: f32) -> bool {
        wrap_angle(self.rotation_y - other.rotation_y).abs() <= eps
            && dist_sqr_2d(&self.translation, &other.translation) <= eps * eps
            && (self.translation.y - other.translation.y).abs() <= eps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn assert_vec_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-5, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_rotation_convention() {
        // A quarter turn maps +Z onto +X
        let t = ModelTransform::new(FRAC_PI_2, Vec3::ZERO);
        assert_vec_close(t.apply_direction(Vec3::Z), Vec3::X);
        assert_vec_close(t.apply(Vec3::Z), Vec3::X);
    }

    #[test]
    fn test_inverse_round_trip() {
        let t = ModelTransform::new(0.7, Vec3::new(3.0, 0.5, -2.0));
        let p = Vec3::new(1.0, 0.0, 4.0);
        assert_vec_close(t.inverse_apply(t.apply(p)), p);
        assert_vec_close(t.matrix().transform_point3(p), t.apply(p));
    }

    #[test]
    fn test_identity() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(ModelTransform::default().apply(p), p);
        assert_eq!(ModelTransform::IDENTITY.inverse_apply(p), p);
    }

    #[test]
    fn test_approx_eq_wraps_angles() {
        let a = ModelTransform::new(PI - 1e-6, Vec3::ZERO);
        let b = ModelTransform::new(-PI + 1e-6, Vec3::ZERO);
        assert!(a.approx_eq(&b, 1e-5));
        assert!(!a.approx_eq(&ModelTransform::new(0.0, Vec3::ZERO), 1e-5));
        assert!(!a.approx_eq(&ModelTransform::new(a.rotation_y, Vec3::Y), 1e-5));
    }
}
