//! Scoped orientation sensor subscription

use crate::{EventSender, SessionError, SessionResult};

/// Platform orientation sensor
///
/// Once attached, the source pushes [`HeadingSample`](wayfind_align::HeadingSample)
/// events into the sender until it is detached.
pub trait OrientationSource {
    /// Asks the platform for sensor access; `false` when the user declines
    fn request_permission(&mut self) -> bool;

    fn attach(&mut self, events: EventSender);

    fn detach(&mut self);
}

/// An active AR session holding the sensor subscription
///
/// The source is attached when the session is entered and detached when it is
/// exited or dropped.
pub struct ArSession {
    source: Box<dyn OrientationSource>,
}

impl ArSession {
    /// Requests permission and attaches the source
    ///
    /// No session exists when permission is denied.
    pub fn enter(mut source: Box<dyn OrientationSource>, events: EventSender) -> SessionResult<Self> {
        if !source.request_permission() {
            log::warn!("Orientation sensor permission denied");
            return Err(SessionError::SensorPermissionDenied);
        }

        source.attach(events);
        log::info!("AR session started");
        Ok(Self { source })
    }

    /// Ends the session and detaches the source
    pub fn exit(self) {
        drop(self);
    }
}

impl Drop for ArSession {
    fn drop(&mut self) {
        self.source.detach();
        log::info!("AR session ended");
    }
}

impl std::fmt::Debug for ArSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArSession").finish_non_exhaustive()
    }
}
