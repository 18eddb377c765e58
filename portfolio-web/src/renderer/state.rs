//! GPU state management - device, queue, surface and point-sprite pipeline

use nalgebra::Matrix4;
use wgpu::util::DeviceExt;

use super::shapes::{build_cloud_vertices, PointVertex};
use crate::config::SceneConfig;
use crate::error::PortfolioError;
use crate::scene::{AmbientScene, Viewport};

/// nalgebra projects depth to -1..1, wgpu clips to 0..1
#[rustfmt::skip]
fn opengl_to_wgpu() -> Matrix4<f32> {
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.5, 0.5,
        0.0, 0.0, 0.0, 1.0,
    )
}

#[cfg(target_arch = "wasm32")]
fn canvas_target(canvas: web_sys::HtmlCanvasElement) -> Result<wgpu::SurfaceTarget<'static>, PortfolioError> {
    Ok(wgpu::SurfaceTarget::Canvas(canvas))
}

#[cfg(not(target_arch = "wasm32"))]
fn canvas_target(_canvas: web_sys::HtmlCanvasElement) -> Result<wgpu::SurfaceTarget<'static>, PortfolioError> {
    Err(PortfolioError::SurfaceCreationFailed(
        "canvas surfaces need a wasm32 target".to_string(),
    ))
}

/// The canvas is composited over the page with premultiplied alpha, so the
/// shader output must land unchanged: an sRGB format would gamma-encode the
/// color channels but not alpha and break premultiplication.
fn transparent_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .find(|f| !f.is_srgb())
        .or_else(|| formats.first())
        .copied()
}

fn transparent_alpha_mode(modes: &[wgpu::CompositeAlphaMode]) -> wgpu::CompositeAlphaMode {
    modes
        .iter()
        .find(|m| **m == wgpu::CompositeAlphaMode::PreMultiplied)
        .or_else(|| modes.first())
        .copied()
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Per-frame uniforms, layout matches `points.wgsl`
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PointUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub camera_right: [f32; 4],
    pub camera_up: [f32; 4],
    pub color: [f32; 4],
    pub params: [f32; 4],
}

impl PointUniforms {
    pub fn for_scene(scene: &AmbientScene, color: [f32; 4], point_size: f32) -> Self {
        let view_proj = opengl_to_wgpu() * scene.view_projection();
        let (right, up) = scene.camera().billboard_axes();
        Self {
            view_proj: view_proj.into(),
            model: scene.model_matrix().into(),
            camera_right: [right.x, right.y, right.z, 0.0],
            camera_up: [up.x, up.y, up.z, 0.0],
            color,
            params: [scene.camera().world_point_size(point_size), 0.0, 0.0, 0.0],
        }
    }
}

/// Holds all wgpu state for the background canvas
pub(crate) struct GpuState {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub config: wgpu::SurfaceConfiguration,
    pub render_pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub color: [f32; 4],
    pub point_size: f32,
}

impl GpuState {
    /// Initialize wgpu on `canvas`: adapter, device, surface, pipeline, cloud buffer
    pub async fn new(
        canvas: web_sys::HtmlCanvasElement,
        scene: &AmbientScene,
        scene_config: &SceneConfig,
    ) -> Result<Self, PortfolioError> {
        let viewport = scene.viewport();
        canvas.set_width(viewport.width.max(1));
        canvas.set_height(viewport.height.max(1));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(canvas_target(canvas)?)
            .map_err(|e| PortfolioError::SurfaceCreationFailed(format!("{:?}", e)))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(PortfolioError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Ambient Scene Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await
            .map_err(|e| PortfolioError::DeviceCreationFailed(format!("{:?}", e)))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = transparent_surface_format(&surface_caps.formats)
            .ok_or_else(|| PortfolioError::SurfaceCreationFailed("no surface formats".to_string()))?;
        let alpha_mode = transparent_alpha_mode(&surface_caps.alpha_modes);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: viewport.width.max(1),
            height: viewport.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Point Sprite Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../points.wgsl").into()),
        });

        let color = scene_config.point_rgba();
        let uniforms = PointUniforms::for_scene(scene, color, scene_config.point_size);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Point Uniforms"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Point Uniform Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Point Uniform Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Point Sprite Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[PointVertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let vertices = build_cloud_vertices(scene.cloud());
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Point Cloud Vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        log::info!(
            "GPU ready: {:?} {}x{}, {} points",
            surface_format,
            config.width,
            config.height,
            scene.cloud().len()
        );

        Ok(Self {
            device,
            queue,
            surface,
            config,
            render_pipeline,
            vertex_buffer,
            vertex_count: vertices.len() as u32,
            uniform_buffer,
            bind_group,
            color,
            point_size: scene_config.point_size,
        })
    }

    /// Reconfigure the surface for a new viewport
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport.width == 0 || viewport.height == 0 {
            return;
        }
        self.config.width = viewport.width;
        self.config.height = viewport.height;
        self.surface.configure(&self.device, &self.config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::PointerPosition;
    use nalgebra::Vector4;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_uniform_layout_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<PointUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<PointUniforms>(), 192);
    }

    #[test]
    fn test_origin_projects_to_center_inside_depth_range() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut scene = AmbientScene::new(&SceneConfig::default(), Viewport::new(800, 600), &mut rng);
        scene.set_pointer(PointerPosition { x: 0.3, y: 0.1 });
        scene.advance_frame();

        let clip = opengl_to_wgpu() * scene.view_projection() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_transparent_surface_prefers_linear_format() {
        let formats = [
            wgpu::TextureFormat::Rgba8UnormSrgb,
            wgpu::TextureFormat::Rgba8Unorm,
        ];
        assert_eq!(
            transparent_surface_format(&formats),
            Some(wgpu::TextureFormat::Rgba8Unorm)
        );
    }

    #[test]
    fn test_transparent_surface_falls_back_to_srgb() {
        let formats = [wgpu::TextureFormat::Bgra8UnormSrgb];
        assert_eq!(
            transparent_surface_format(&formats),
            Some(wgpu::TextureFormat::Bgra8UnormSrgb)
        );
        assert_eq!(transparent_surface_format(&[]), None);
    }

    #[test]
    fn test_alpha_mode_prefers_premultiplied() {
        let modes = [wgpu::CompositeAlphaMode::Opaque, wgpu::CompositeAlphaMode::PreMultiplied];
        assert_eq!(transparent_alpha_mode(&modes), wgpu::CompositeAlphaMode::PreMultiplied);
        assert_eq!(transparent_alpha_mode(&[]), wgpu::CompositeAlphaMode::Auto);
    }

    #[test]
    fn test_uniforms_carry_srgb_color_and_scaled_size() {
        let mut rng = StdRng::seed_from_u64(2);
        let config = SceneConfig::default();
        let scene = AmbientScene::new(&config, Viewport::new(800, 600), &mut rng);
        let uniforms = PointUniforms::for_scene(&scene, config.point_rgba(), config.point_size);

        assert_eq!(uniforms.color, [0.0, 247.0 / 255.0, 1.0, 0.8]);
        let expected = config.point_size * (config.fov_deg.to_radians() / 2.0).tan();
        assert!((uniforms.params[0] - expected).abs() < 1e-7);
    }
}
