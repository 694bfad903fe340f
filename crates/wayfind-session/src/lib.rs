//! Navigation session glue between sensors, the route planner and the renderer
//!
//! A [`SessionCoordinator`] owns the navigation state and the model transform.
//! Sensor and UI code feed it through the [`EventSender`] queue, and each frame
//! produces a [`RenderFrame`] with the transform and the route arrows.

mod config;
mod coordinator;
mod directives;
mod error;
mod events;
mod scene;
mod sensor;
mod session;

#[cfg(test)]
mod coordinator_tests;

pub use config::SessionConfig;
pub use coordinator::{Destination, SessionCoordinator};
pub use directives::{to_directives, PathSegment};
pub use error::{SessionError, SessionResult};
pub use events::{event_channel, Command, EventReceiver, EventSender, SessionEvent};
pub use scene::{ArrowStyle, FloorPolygon, RenderFrame, RoomLabel, SceneDescription, WallBox};
pub use sensor::{ArSession, OrientationSource};
pub use session::NavigationSession;
