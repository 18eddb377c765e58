//! Shape primitives - camera-facing quads for point sprites

use crate::scene::ParticleCloud;

/// One corner of a point sprite
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointVertex {
    /// Point center in model space
    pub center: [f32; 3],
    /// Corner offset in sprite units (-0.5..0.5), expanded along camera axes in the shader
    pub corner: [f32; 2],
}

impl PointVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x2
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Two triangles covering one sprite
const QUAD_CORNERS: [[f32; 2]; 6] = [
    [-0.5, -0.5],
    [0.5, -0.5],
    [0.5, 0.5],
    [-0.5, -0.5],
    [0.5, 0.5],
    [-0.5, 0.5],
];

pub const VERTICES_PER_POINT: usize = QUAD_CORNERS.len();

/// Generate the six vertices of a sprite centered on `center`
pub fn create_point_vertices(center: [f32; 3]) -> [PointVertex; VERTICES_PER_POINT] {
    QUAD_CORNERS.map(|corner| PointVertex { center, corner })
}

/// Sprites for the whole cloud. Positions never change, so this is built once.
pub fn build_cloud_vertices(cloud: &ParticleCloud) -> Vec<PointVertex> {
    let mut vertices = Vec::with_capacity(cloud.len() * VERTICES_PER_POINT);
    for point in cloud.points() {
        vertices.extend(create_point_vertices(point));
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sprite_is_centered() {
        let vertices = create_point_vertices([1.0, 2.0, 3.0]);
        let sum = vertices.iter().fold([0.0f32; 2], |acc, v| {
            [acc[0] + v.corner[0], acc[1] + v.corner[1]]
        });
        assert_eq!(sum, [0.0, 0.0]);
        assert!(vertices.iter().all(|v| v.center == [1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_cloud_vertex_count() {
        let cloud = ParticleCloud::generate(180, 15.0, &mut StdRng::seed_from_u64(3));
        let vertices = build_cloud_vertices(&cloud);
        assert_eq!(vertices.len(), 180 * VERTICES_PER_POINT);
        assert_eq!(vertices[6].center, [
            cloud.positions()[3],
            cloud.positions()[4],
            cloud.positions()[5],
        ]);
    }
}
