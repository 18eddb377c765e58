//! Ambient scene state and per-frame update

use nalgebra::Matrix4;
use rand::Rng;

use super::camera::ParallaxCamera;
use super::particles::ParticleCloud;
use super::pointer::PointerPosition;
use crate::config::SceneConfig;

/// Render surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }
}

/// Rotating point cloud viewed by a pointer-driven camera
pub struct AmbientScene {
    cloud: ParticleCloud,
    camera: ParallaxCamera,
    /// Latest pointer sample, written by the pointer listener
    pointer: PointerPosition,
    viewport: Viewport,
    yaw_step: f32,
    pitch_step: f32,
    frames: u64,
}

impl AmbientScene {
    pub fn new<R: Rng + ?Sized>(config: &SceneConfig, viewport: Viewport, rng: &mut R) -> Self {
        Self {
            cloud: ParticleCloud::generate(config.particle_count, config.spread, rng),
            camera: ParallaxCamera::new(config, viewport.aspect()),
            pointer: PointerPosition::CENTER,
            viewport,
            yaw_step: config.yaw_step,
            pitch_step: config.pitch_step,
            frames: 0,
        }
    }

    pub fn set_pointer(&mut self, pointer: PointerPosition) {
        self.pointer = pointer;
    }

    /// Drift the cloud, ease the camera toward the pointer target
    pub fn advance_frame(&mut self) {
        self.cloud.rotation.yaw += self.yaw_step;
        self.cloud.rotation.pitch += self.pitch_step;
        self.camera.follow(self.pointer);
        self.frames += 1;
    }

    /// Apply a new viewport immediately; the next frame projects with it
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.set_aspect(viewport.aspect());
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        self.cloud.rotation.matrix()
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.camera.view_projection()
    }

    pub fn cloud(&self) -> &ParticleCloud {
        &self.cloud
    }

    pub fn camera(&self) -> &ParallaxCamera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn scene() -> AmbientScene {
        let mut rng = StdRng::seed_from_u64(1);
        AmbientScene::new(&SceneConfig::default(), Viewport::new(1280, 720), &mut rng)
    }

    #[test]
    fn test_rotation_drifts_independent_of_pointer() {
        let mut s = scene();
        s.set_pointer(PointerPosition { x: 0.5, y: 0.5 });
        for _ in 0..100 {
            s.advance_frame();
        }
        let r = s.cloud().rotation;
        assert!((r.yaw - 0.15).abs() < 1e-4);
        assert!((r.pitch - 0.05).abs() < 1e-4);
        assert_eq!(s.frames(), 100);
    }

    #[test]
    fn test_camera_follows_pointer() {
        let mut s = scene();
        s.set_pointer(PointerPosition { x: -0.5, y: 0.25 });
        for _ in 0..300 {
            s.advance_frame();
        }
        let pos = s.camera().position;
        assert!((pos.x + 1.0).abs() < 1e-3);
        assert!((pos.y + 0.5).abs() < 1e-3);
        assert_eq!(pos.z, 5.0);
    }

    #[test]
    fn test_resize_is_synchronous() {
        let mut s = scene();
        assert!((s.camera().aspect() - 1280.0 / 720.0).abs() < 1e-6);

        s.resize(Viewport::new(500, 1000));
        assert_eq!(s.viewport(), Viewport::new(500, 1000));
        assert_eq!(s.camera().aspect(), 0.5);
    }

    #[test]
    fn test_zero_height_viewport_has_finite_aspect() {
        assert_eq!(Viewport::new(300, 0).aspect(), 300.0);
    }

    #[test]
    fn test_cloud_uses_configured_count() {
        let s = scene();
        assert_eq!(s.cloud().positions().len(), 540);
    }
}
