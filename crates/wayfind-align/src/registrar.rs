//! Registration of the model frame against the device heading and camera pose
//!
//! The alignment steps are pure functions from the latest inputs and the prior
//! transform to a new transform. [`PoseRegistrar`] keeps the single current
//! transform and the latest heading between calls.

use glam::Vec3;
use wayfind_common::{wrap_angle, yaw_of};

use crate::{CameraPose, HeadingSample, ModelTransform};

/// Result of an alignment request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlignOutcome {
    /// The transform was replaced
    Aligned(ModelTransform),
    /// No heading has been received; the transform is unchanged
    NoHeading,
}

impl AlignOutcome {
    pub fn is_aligned(&self) -> bool {
        matches!(self, AlignOutcome::Aligned(_))
    }
}

/// Rotates the model to the compass heading, keeping the prior translation
pub fn initial_alignment(heading: HeadingSample, prior: &ModelTransform) -> ModelTransform {
    ModelTransform::new(wrap_angle(heading.radians()), prior.translation)
}

/// Re-anchors the model so its start point sits under the camera
///
/// The rotation is the heading corrected by the yaw difference between the camera
/// forward and the model forward direction. The start point is mapped through the
/// new rotation with the prior translation, and the translation is shifted
/// horizontally so it lands on the camera position. Vertical translation is kept.
///
/// Calling this again with the same inputs and its own output yields the same
/// transform.
pub fn recalibrate(
    heading: HeadingSample,
    camera: &CameraPose,
    model_start: Vec3,
    model_forward: Vec3,
    prior: &ModelTransform,
) -> ModelTransform {
    let offset = yaw_of(&camera.forward) - yaw_of(&model_forward);
    let rotation_y = wrap_angle(heading.radians() - offset);

    let proposed = ModelTransform::new(rotation_y, prior.translation);
    let start_world = proposed.apply(model_start);
    let delta = camera.position - start_world;

    ModelTransform::new(
        rotation_y,
        prior.translation + Vec3::new(delta.x, 0.0, delta.z),
    )
}

/// Owner of the current model transform
#[derive(Debug, Clone)]
pub struct PoseRegistrar {
    model_start: Vec3,
    model_forward: Vec3,
    transform: ModelTransform,
    heading: Option<HeadingSample>,
    aligned: bool,
    last_user_position: Vec3,
}

impl PoseRegistrar {
    /// Creates a registrar for a model whose reference pose is `model_start`
    /// facing `model_forward`
    pub fn new(model_start: Vec3, model_forward: Vec3) -> Self {
        Self {
            model_start,
            model_forward,
            transform: ModelTransform::IDENTITY,
            heading: None,
            aligned: false,
            last_user_position: model_start,
        }
    }

    /// Overrides the user position reported before the first tracked frame
    pub fn with_user_position(mut self, position: Vec3) -> Self {
        self.last_user_position = position;
        self
    }

    pub fn transform(&self) -> &ModelTransform {
        &self.transform
    }

    /// Latest heading, `None` until a sample arrives
    pub fn heading(&self) -> Option<HeadingSample> {
        self.heading
    }

    /// Whether the initial alignment has been applied in this session
    pub fn is_aligned(&self) -> bool {
        self.aligned
    }

    /// User position in model space from the latest tracked frame
    pub fn last_user_position(&self) -> Vec3 {
        self.last_user_position
    }

    pub fn model_start(&self) -> Vec3 {
        self.model_start
    }

    /// Resets the transform and heading for a new AR session
    ///
    /// The last user position is kept.
    pub fn begin_session(&mut self) {
        self.transform = ModelTransform::IDENTITY;
        self.heading = None;
        self.aligned = false;
    }

    /// Records a heading sample
    ///
    /// The first sample of a session rotates the model to the heading.
    pub fn on_heading(&mut self, sample: HeadingSample) -> AlignOutcome {
        self.heading = Some(sample);
        if self.aligned {
            return AlignOutcome::Aligned(self.transform);
        }

        self.transform = initial_alignment(sample, &self.transform);
        self.aligned = true;
        log::debug!(
            "Initial alignment to heading {:.1} deg: rotation {:.4} rad",
            sample.degrees(),
            self.transform.rotation_y
        );
        AlignOutcome::Aligned(self.transform)
    }

    /// Re-anchors the model at the camera using the latest heading
    pub fn recalibrate(&mut self, camera: &CameraPose) -> AlignOutcome {
        let Some(heading) = self.heading else {
            log::debug!("Recalibration skipped: no heading received");
            return AlignOutcome::NoHeading;
        };

        self.transform = recalibrate(
            heading,
            camera,
            self.model_start,
            self.model_forward,
            &self.transform,
        );
        log::info!(
            "Recalibrated: rotation {:.4} rad, translation {:?}",
            self.transform.rotation_y,
            self.transform.translation
        );
        AlignOutcome::Aligned(self.transform)
    }

    /// Maps the camera position into model space and records it
    pub fn track(&mut self, camera: &CameraPose) -> Vec3 {
        self.last_user_position = self.transform.inverse_apply(camera.position);
        self.last_user_position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn heading(deg: f32) -> HeadingSample {
        HeadingSample::new(deg).unwrap()
    }

    fn assert_vec_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-4, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_initial_alignment_keeps_translation() {
        let prior = ModelTransform::new(0.3, Vec3::new(1.0, 2.0, 3.0));
        let t = initial_alignment(heading(90.0), &prior);
        assert!((t.rotation_y - FRAC_PI_2).abs() < 1e-6);
        assert_eq!(t.translation, prior.translation);

        // Headings past 180 degrees wrap into (-PI, PI]
        let t = initial_alignment(heading(270.0), &prior);
        assert!((t.rotation_y + FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_recalibrate_places_start_under_camera() {
        let start = Vec3::new(5.0, 0.0, 4.0);
        let camera = CameraPose::new(Vec3::new(-2.0, 1.6, 7.0), Vec3::new(0.0, -0.2, 1.0));
        let prior = ModelTransform::new(0.0, Vec3::new(0.0, -1.0, 0.0));

        let t = recalibrate(heading(90.0), &camera, start, Vec3::Z, &prior);

        // Camera looks along +Z like the model forward, so rotation is the heading
        assert!((t.rotation_y - FRAC_PI_2).abs() < 1e-5);
        let start_world = t.apply(start);
        assert!((start_world.x - camera.position.x).abs() < 1e-4);
        assert!((start_world.z - camera.position.z).abs() < 1e-4);
        // Vertical translation is never adjusted
        assert_eq!(t.translation.y, -1.0);
    }

    #[test]
    fn test_recalibrate_subtracts_camera_yaw_offset() {
        let camera = CameraPose::new(Vec3::ZERO, Vec3::X);
        let t = recalibrate(
            heading(0.0),
            &camera,
            Vec3::ZERO,
            Vec3::Z,
            &ModelTransform::IDENTITY,
        );
        assert!((t.rotation_y + FRAC_PI_2).abs() < 1e-5);

        // Model forward facing the same way as the camera cancels the offset
        let t = recalibrate(
            heading(180.0),
            &camera,
            Vec3::ZERO,
            Vec3::X,
            &ModelTransform::IDENTITY,
        );
        assert!((t.rotation_y.abs() - PI).abs() < 1e-5);
    }

    #[test]
    fn test_recalibrate_is_idempotent() {
        let start = Vec3::new(5.0, 0.0, 4.0);
        let forward = Vec3::new(1.0, 0.0, 1.0).normalize();
        let camera = CameraPose::new(Vec3::new(12.0, 1.5, -3.0), Vec3::new(0.3, 0.1, -0.9));
        let h = heading(213.0);

        let prior = ModelTransform::new(1.1, Vec3::new(4.0, 0.25, 9.0));
        let first = recalibrate(h, &camera, start, forward, &prior);
        let second = recalibrate(h, &camera, start, forward, &first);
        let third = recalibrate(h, &camera, start, forward, &second);

        assert!(first.approx_eq(&second, 1e-5), "{:?} vs {:?}", first, second);
        assert!(second.approx_eq(&third, 1e-5));
    }

    #[test]
    fn test_registrar_without_heading_is_inert() {
        let mut registrar = PoseRegistrar::new(Vec3::new(5.0, 0.0, 5.0), Vec3::Z);
        let camera = CameraPose::new(Vec3::new(1.0, 1.5, 1.0), Vec3::Z);

        assert_eq!(registrar.recalibrate(&camera), AlignOutcome::NoHeading);
        assert_eq!(*registrar.transform(), ModelTransform::IDENTITY);
        assert!(!registrar.is_aligned());
        assert_eq!(registrar.last_user_position(), Vec3::new(5.0, 0.0, 5.0));
    }

    #[test]
    fn test_initial_alignment_happens_once() {
        let mut registrar = PoseRegistrar::new(Vec3::ZERO, Vec3::Z);

        assert!(registrar.on_heading(heading(90.0)).is_aligned());
        let aligned = *registrar.transform();
        assert!((aligned.rotation_y - FRAC_PI_2).abs() < 1e-6);

        // Later samples only update the stored heading
        registrar.on_heading(heading(10.0));
        assert_eq!(*registrar.transform(), aligned);
        assert_eq!(registrar.heading().map(|h| h.degrees()), Some(10.0));

        // A new session aligns again
        registrar.begin_session();
        assert_eq!(*registrar.transform(), ModelTransform::IDENTITY);
        assert_eq!(registrar.heading(), None);
        registrar.on_heading(heading(10.0));
        assert!((registrar.transform().rotation_y - 10f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_tracking_after_recalibration_reports_start() {
        let start = Vec3::new(5.0, 0.0, 4.0);
        let mut registrar = PoseRegistrar::new(start, Vec3::Z);
        registrar.on_heading(heading(135.0));

        let camera = CameraPose::new(Vec3::new(-7.0, 1.6, 2.0), Vec3::new(-1.0, 0.0, 0.2));
        assert!(registrar.recalibrate(&camera).is_aligned());

        // Standing where we recalibrated puts the user on the start point
        let user = registrar.track(&camera);
        assert_vec_close(Vec3::new(user.x, 0.0, user.z), start);
        assert_eq!(registrar.last_user_position(), user);

        // Walking one metre along the camera's world X moves the user in the model
        let moved = CameraPose::new(camera.position + Vec3::X, camera.forward);
        let user_moved = registrar.track(&moved);
        assert!(((user_moved - user).length() - 1.0).abs() < 1e-4);
    }
}
