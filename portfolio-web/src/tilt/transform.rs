//! Tilt transform - pure function of pointer position and element size

use crate::config::TiltConfig;

/// Perspective + scale + X/Y rotation applied to a hovered card
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltTransform {
    pub perspective_px: f32,
    pub scale: f32,
    pub rotate_x_deg: f32,
    pub rotate_y_deg: f32,
}

impl TiltTransform {
    /// Rotation for a pointer at (`x`, `y`) relative to the element's top-left
    /// corner.
    ///
    /// Horizontal offset from center tilts around Y, vertical offset tilts
    /// around X in the opposite sense so the card leans toward the pointer.
    pub fn from_pointer(x: f32, y: f32, width: f32, height: f32, config: &TiltConfig) -> Self {
        if width <= 0.0 || height <= 0.0 {
            return Self::resting(config);
        }

        let rotate_y_deg = config.max_rotation_deg * ((x - width / 2.0) / width);
        let rotate_x_deg = -config.max_rotation_deg * ((y - height / 2.0) / height);

        Self {
            perspective_px: config.perspective_px,
            scale: config.hover_scale,
            rotate_x_deg,
            rotate_y_deg,
        }
    }

    /// Transform restored when the pointer leaves
    pub fn resting(config: &TiltConfig) -> Self {
        Self {
            perspective_px: config.perspective_px,
            scale: 1.0,
            rotate_x_deg: 0.0,
            rotate_y_deg: 0.0,
        }
    }

    /// CSS `transform` value
    pub fn to_css(&self) -> String {
        format!(
            "perspective({}px) scale({}) rotateX({}deg) rotateY({}deg)",
            self.perspective_px, self.scale, self.rotate_x_deg, self.rotate_y_deg
        )
    }
}
