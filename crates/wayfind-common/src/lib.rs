//! Common utilities and data structures shared by the wayfind crates

mod geometry;
mod math;

pub use geometry::*;
pub use math::*;

/// Represents a 3D position in model or world space (Y up)
pub type Vec3 = glam::Vec3;

/// Error types for the library
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid floor plan: {0}")]
    InvalidFloorPlan(String),

    #[error("navigation mesh generation failed: {0}")]
    NavMeshGeneration(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for wayfind operations
pub type Result<T> = std::result::Result<T, Error>;
