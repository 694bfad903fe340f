use glam::Vec3;

use crate::{to_directives, PathSegment};

/// Destination choice and the active route
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigationSession {
    destination: Option<String>,
    path: Option<Vec<Vec3>>,
    segments: Vec<PathSegment>,
}

impl NavigationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    /// Active route waypoints, `None` when not navigating
    pub fn path(&self) -> Option<&[Vec3]> {
        self.path.as_deref()
    }

    /// Arrows for the active route
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_navigating(&self) -> bool {
        self.path.is_some()
    }

    pub(crate) fn select(&mut self, destination: impl Into<String>) {
        self.destination = Some(destination.into());
    }

    /// Replaces any active route
    pub(crate) fn begin(&mut self, path: Vec<Vec3>) {
        self.segments = to_directives(&path);
        self.path = Some(path);
    }

    /// Drops the route; the destination stays selected
    pub(crate) fn stop(&mut self) {
        self.path = None;
        self.segments.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_lifecycle() {
        let mut session = NavigationSession::new();
        assert!(!session.is_navigating());
        assert_eq!(session.destination(), None);

        session.select("LAB");
        session.begin(vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 0.0, 1.0)]);
        assert!(session.is_navigating());
        assert_eq!(session.segments().len(), 2);

        // A new route replaces the old one
        session.begin(vec![Vec3::ZERO, Vec3::Z]);
        assert_eq!(session.path().map(|p| p.len()), Some(2));
        assert_eq!(session.segments().len(), 1);

        session.stop();
        assert!(!session.is_navigating());
        assert!(session.segments().is_empty());
        assert_eq!(session.destination(), Some("LAB"));
    }
}
