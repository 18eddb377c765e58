//! Point-cloud rendering - one frame of the ambient background

use super::state::{GpuState, PointUniforms};
use crate::scene::AmbientScene;

/// Render one frame of `scene`.
///
/// Lost or outdated surfaces are reconfigured and the frame is skipped; the
/// next animation frame draws normally.
pub(crate) fn render_frame(state: &GpuState, scene: &AmbientScene) {
    let uniforms = PointUniforms::for_scene(scene, state.color, state.point_size);
    state
        .queue
        .write_buffer(&state.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

    let output = match state.surface.get_current_texture() {
        Ok(t) => t,
        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
            state.surface.configure(&state.device, &state.config);
            return;
        }
        Err(e) => {
            log::warn!("skipping frame: {:?}", e);
            return;
        }
    };

    let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
    let mut encoder = state.device.create_command_encoder(
        &wgpu::CommandEncoderDescriptor { label: Some("Render Encoder") }
    );

    {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Point Cloud Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if state.vertex_count > 0 {
            pass.set_pipeline(&state.render_pipeline);
            pass.set_bind_group(0, &state.bind_group, &[]);
            pass.set_vertex_buffer(0, state.vertex_buffer.slice(..));
            pass.draw(0..state.vertex_count, 0..1);
        }
    }

    state.queue.submit(std::iter::once(encoder.finish()));
    output.present();
}
