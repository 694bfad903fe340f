//! Session configuration

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::ArrowStyle;

/// Configuration for a navigation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    /// Height of room labels above the floor
    pub label_height: f32,
    /// Height of the walkable floor in model space
    pub floor_height: f32,
    pub arrow_style: ArrowStyle,
    /// User position before any frame is tracked; the start room center when unset
    pub start_position: Option<Vec3>,
    /// Capacity of the heading queue and of the command queue shared with
    /// sensor and UI producers
    pub event_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            label_height: 2.5,
            floor_height: 0.0,
            arrow_style: ArrowStyle::default(),
            start_position: None,
            event_capacity: 256,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label_height(mut self, height: f32) -> Self {
        self.label_height = height;
        self
    }

    pub fn with_floor_height(mut self, height: f32) -> Self {
        self.floor_height = height;
        self
    }

    pub fn with_arrow_style(mut self, style: ArrowStyle) -> Self {
        self.arrow_style = style;
        self
    }

    pub fn with_start_position(mut self, position: Vec3) -> Self {
        self.start_position = Some(position);
        self
    }
}
