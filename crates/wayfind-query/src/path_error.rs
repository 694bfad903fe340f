//! Failure reasons for path queries

/// Result type for path queries
pub type PathResult<T> = std::result::Result<T, PathError>;

/// Reason a path query produced no route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathError {
    /// The start position is outside every walkable face
    StartNotNavigable,
    /// The destination is outside every walkable face
    DestinationNotNavigable,
    /// Start and destination lie in different connected areas
    Unreachable,
}

impl PathError {
    /// Whether the failure concerns the start position rather than the target
    pub fn is_start_error(&self) -> bool {
        *self == PathError::StartNotNavigable
    }
}

impl std::error::Error for PathError {}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::StartNotNavigable => write!(f, "Start position is not on the navigation mesh"),
            PathError::DestinationNotNavigable => {
                write!(f, "Destination is not on the navigation mesh")
            }
            PathError::Unreachable => write!(f, "Destination is not reachable from the start"),
        }
    }
}
