//! Configuration for navigation mesh construction

use serde::{Deserialize, Serialize};
use wayfind_common::{Error, Result};

/// Configuration parameters for building a navigation mesh from a floor plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavMeshConfig {
    /// Distance below which two room vertices are welded into one
    pub weld_tolerance: f32,
    /// Height of the walkable floor in model space
    pub floor_height: f32,
    /// Split room edges at vertices of neighbouring rooms lying on them
    pub split_collinear_edges: bool,
}

impl Default for NavMeshConfig {
    fn default() -> Self {
        Self {
            weld_tolerance: 1e-3,
            floor_height: 0.0,
            split_collinear_edges: true,
        }
    }
}

impl NavMeshConfig {
    /// Creates a new NavMeshConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the weld tolerance
    pub fn with_weld_tolerance(mut self, tolerance: f32) -> Self {
        self.weld_tolerance = tolerance;
        self
    }

    /// Sets the floor height
    pub fn with_floor_height(mut self, height: f32) -> Self {
        self.floor_height = height;
        self
    }

    /// Enables or disables T-junction splitting
    pub fn with_split_collinear_edges(mut self, split: bool) -> Self {
        self.split_collinear_edges = split;
        self
    }

    /// Validates the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !(self.weld_tolerance > 0.0) || !self.weld_tolerance.is_finite() {
            return Err(Error::InvalidConfig(
                "Weld tolerance must be a positive finite number".to_string(),
            ));
        }

        if !self.floor_height.is_finite() {
            return Err(Error::InvalidConfig(
                "Floor height must be finite".to_string(),
            ));
        }

        Ok(())
    }
}
