//! Parallax camera
//!
//! Eases toward a target derived from the pointer with `v += (target - v) * k`.
//! For 0 < k <= 1 this is a contraction: each frame removes the same fraction
//! of the remaining distance, so a held target is approached monotonically
//! and never overshot.

use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Vector3};

use super::pointer::PointerPosition;
use crate::config::SceneConfig;

pub struct ParallaxCamera {
    pub position: Point3<f32>,
    fov_y: f32,
    near: f32,
    far: f32,
    aspect: f32,
    smoothing: f32,
    strength: f32,
}

impl ParallaxCamera {
    pub fn new(config: &SceneConfig, aspect: f32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, config.camera_z),
            fov_y: config.fov_deg.to_radians(),
            near: config.near,
            far: config.far,
            aspect,
            smoothing: config.smoothing,
            strength: config.parallax_strength,
        }
    }

    /// Where the camera settles for a pointer held still
    pub fn target_for(&self, pointer: PointerPosition) -> (f32, f32) {
        (pointer.x * self.strength, -pointer.y * self.strength)
    }

    /// One smoothing step toward the pointer target. Depth is untouched.
    pub fn follow(&mut self, pointer: PointerPosition) {
        let (tx, ty) = self.target_for(pointer);
        self.position.x += (tx - self.position.x) * self.smoothing;
        self.position.y += (ty - self.position.y) * self.smoothing;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// World-to-view transform looking at the origin
    pub fn view(&self) -> Isometry3<f32> {
        Isometry3::look_at_rh(&self.position, &Point3::origin(), &Vector3::y())
    }

    pub fn projection(&self) -> Perspective3<f32> {
        Perspective3::new(self.aspect, self.fov_y, self.near, self.far)
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection().as_matrix() * self.view().to_homogeneous()
    }

    /// World-space sprite side for a point `size`.
    ///
    /// Size-attenuated points cover `size * (H / 2) / depth` pixels on a
    /// viewport `H` pixels tall; a world quad covers `side * (H / 2) /
    /// (depth * tan(fov / 2))`, so the side carries the `tan(fov / 2)` factor.
    pub fn world_point_size(&self, size: f32) -> f32 {
        size * (self.fov_y * 0.5).tan()
    }

    /// Camera right and up axes in world space, used to billboard points
    pub fn billboard_axes(&self) -> (Vector3<f32>, Vector3<f32>) {
        let to_world = self.view().rotation.inverse();
        (to_world * Vector3::x(), to_world * Vector3::y())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> ParallaxCamera {
        ParallaxCamera::new(&SceneConfig::default(), 16.0 / 9.0)
    }

    #[test]
    fn test_starts_on_axis() {
        let cam = camera();
        assert_eq!(cam.position, Point3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn test_converges_without_overshoot() {
        let mut cam = camera();
        let pointer = PointerPosition { x: 0.4, y: -0.3 };
        let (tx, ty) = cam.target_for(pointer);
        assert!((tx - 0.8).abs() < 1e-6);
        assert!((ty - 0.6).abs() < 1e-6);

        let mut prev_dx = (tx - cam.position.x).abs();
        let mut prev_dy = (ty - cam.position.y).abs();
        for _ in 0..400 {
            cam.follow(pointer);
            assert!(cam.position.x <= tx + 1e-6);
            assert!(cam.position.y <= ty + 1e-6);

            let dx = (tx - cam.position.x).abs();
            let dy = (ty - cam.position.y).abs();
            assert!(dx <= prev_dx);
            assert!(dy <= prev_dy);
            prev_dx = dx;
            prev_dy = dy;
        }
        assert!(prev_dx < 1e-4);
        assert!(prev_dy < 1e-4);
        assert_eq!(cam.position.z, 5.0);
    }

    #[test]
    fn test_single_step_is_five_percent() {
        let mut cam = camera();
        cam.follow(PointerPosition { x: 0.5, y: 0.0 });
        assert!((cam.position.x - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_view_faces_origin() {
        let mut cam = camera();
        cam.position = Point3::new(1.0, -0.5, 5.0);
        let origin_in_view = cam.view() * Point3::origin();
        assert!(origin_in_view.x.abs() < 1e-5);
        assert!(origin_in_view.y.abs() < 1e-5);
        assert!(origin_in_view.z < 0.0);
    }

    #[test]
    fn test_point_size_matches_attenuated_points() {
        let cam = ParallaxCamera::new(&SceneConfig::default(), 1.0);
        let size = 0.035;
        let side = cam.world_point_size(size);

        let project = |y: f32| {
            let clip = cam.view_projection() * nalgebra::Vector4::new(0.0, y, 0.0, 1.0);
            clip.y / clip.w
        };
        // Height in NDC units (2 per viewport) equals 2 * pixels / H
        let ndc_height = project(side / 2.0) - project(-side / 2.0);
        assert!((ndc_height - size / 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_point_size_unscaled_at_ninety_degrees() {
        let config = SceneConfig {
            fov_deg: 90.0,
            ..SceneConfig::default()
        };
        let cam = ParallaxCamera::new(&config, 1.0);
        assert!((cam.world_point_size(0.035) - 0.035).abs() < 1e-6);
    }
}
