//! Normalized pointer position shared by the pointer listener and the frame loop

/// Pointer position relative to the viewport center, each axis in [-0.5, 0.5]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerPosition {
    pub x: f32,
    pub y: f32,
}

impl PointerPosition {
    pub const CENTER: PointerPosition = PointerPosition { x: 0.0, y: 0.0 };

    /// Normalize client coordinates against the viewport size
    pub fn from_client(client_x: f32, client_y: f32, viewport_width: f32, viewport_height: f32) -> Self {
        if viewport_width <= 0.0 || viewport_height <= 0.0 {
            return Self::CENTER;
        }
        Self {
            x: (client_x / viewport_width - 0.5).clamp(-0.5, 0.5),
            y: (client_y / viewport_height - 0.5).clamp(-0.5, 0.5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        let p = PointerPosition::from_client(0.0, 0.0, 800.0, 600.0);
        assert_eq!(p, PointerPosition { x: -0.5, y: -0.5 });

        let p = PointerPosition::from_client(400.0, 300.0, 800.0, 600.0);
        assert_eq!(p, PointerPosition::CENTER);

        let p = PointerPosition::from_client(800.0, 450.0, 800.0, 600.0);
        assert_eq!(p, PointerPosition { x: 0.5, y: 0.25 });
    }

    #[test]
    fn test_out_of_viewport_is_clamped() {
        let p = PointerPosition::from_client(-50.0, 2000.0, 800.0, 600.0);
        assert_eq!(p, PointerPosition { x: -0.5, y: 0.5 });
    }

    #[test]
    fn test_degenerate_viewport() {
        assert_eq!(PointerPosition::from_client(10.0, 10.0, 0.0, 0.0), PointerPosition::CENTER);
    }
}
