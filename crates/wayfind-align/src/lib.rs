//! Registration of the building model frame against the device pose
//!
//! Model space is Y-up and rotations are about +Y: a rotation by `θ` maps `+Z`
//! onto `(sin θ, 0, cos θ)`. Compass headings follow the same sense.

mod heading;
mod registrar;
mod transform;

pub use heading::HeadingSample;
pub use registrar::{initial_alignment, recalibrate, AlignOutcome, PoseRegistrar};
pub use transform::{CameraPose, ModelTransform};
