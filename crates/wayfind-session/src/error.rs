use wayfind_query::PathError;

/// Errors surfaced to the user interface
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("orientation sensor permission was denied")]
    SensorPermissionDenied,

    #[error("unknown destination {0:?}")]
    InvalidDestination(String),

    #[error("no destination selected")]
    NoDestination,

    #[error("destination cannot change while navigating")]
    DestinationLocked,

    #[error("no route: {0}")]
    Path(#[from] PathError),
}

/// Result type for session operations
pub type SessionResult<T> = std::result::Result<T, SessionError>;
