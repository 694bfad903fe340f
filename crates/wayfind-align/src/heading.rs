use serde::{Deserialize, Serialize};
use wayfind_common::{deg_to_rad, wrap_degrees};

/// A compass heading in degrees, normalised into `[0, 360)`
///
/// An unknown heading is represented by the absence of a sample, never by 0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeadingSample(f32);

impl HeadingSample {
    /// Creates a sample from degrees; non-finite input is not a heading
    pub fn new(degrees: f32) -> Option<Self> {
        degrees
            .is_finite()
            .then(|| HeadingSample(wrap_degrees(degrees)))
    }

    /// Builds a sample from a device orientation event
    ///
    /// The platform compass heading is preferred. Without it the heading is
    /// derived from the event's `alpha` angle as `360 - alpha`.
    pub fn from_device_orientation(
        compass_heading: Option<f32>,
        alpha: Option<f32>,
    ) -> Option<Self> {
        compass_heading
            .and_then(Self::new)
            .or_else(|| alpha.and_then(|a| Self::new(360.0 - a)))
    }

    pub fn degrees(&self) -> f32 {
        self.0
    }

    pub fn radians(&self) -> f32 {
        deg_to_rad(self.0)
    }
}
