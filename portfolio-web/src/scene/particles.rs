//! Particle cloud - fixed random points, only the enclosing rotation changes

use nalgebra::{Matrix4, Rotation3, Vector3};
use rand::Rng;

/// Euler rotation of the whole cloud, applied X then Y
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CloudRotation {
    /// Rotation about Y (radians)
    pub yaw: f32,
    /// Rotation about X (radians)
    pub pitch: f32,
}

impl CloudRotation {
    pub fn matrix(&self) -> Matrix4<f32> {
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), self.pitch);
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), self.yaw);
        (rx * ry).to_homogeneous()
    }
}

pub struct ParticleCloud {
    /// Flat xyz triples
    positions: Vec<f32>,
    pub rotation: CloudRotation,
}

impl ParticleCloud {
    /// Scatter `count` points uniformly in a cube of side `spread` centered on the origin
    pub fn generate<R: Rng + ?Sized>(count: usize, spread: f32, rng: &mut R) -> Self {
        let positions = (0..count * 3)
            .map(|_| (rng.gen::<f32>() - 0.5) * spread)
            .collect();

        Self {
            positions,
            rotation: CloudRotation::default(),
        }
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.positions.chunks_exact(3).map(|p| [p[0], p[1], p[2]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_buffer_shape_and_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let cloud = ParticleCloud::generate(180, 15.0, &mut rng);
        assert_eq!(cloud.positions().len(), 180 * 3);
        assert_eq!(cloud.len(), 180);
        assert!(cloud.positions().iter().all(|v| (-7.5..=7.5).contains(v)));
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = ParticleCloud::generate(50, 15.0, &mut StdRng::seed_from_u64(42));
        let b = ParticleCloud::generate(50, 15.0, &mut StdRng::seed_from_u64(42));
        assert_eq!(a.positions(), b.positions());
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        assert_eq!(CloudRotation::default().matrix(), Matrix4::identity());
    }
}
