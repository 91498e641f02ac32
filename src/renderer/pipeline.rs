use crate::geometry::vertex::Vertex;

pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Loads the shader module data from the `wgsl` file.
pub fn load_shader_module(device: &wgpu::Device) -> wgpu::ShaderModule
{
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Turntable Shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        })
}

/// Builds the one render pipeline the job needs: textured triangle list
/// into the offscreen color target, depth tested, back faces culled.
pub fn build_render_pipeline(
        device: &wgpu::Device,
        bind_groups: &[&wgpu::BindGroupLayout],
) -> wgpu::RenderPipeline
{
        let shader = load_shader_module(device);

        let render_pipeline_layout =
                device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                        label: Some("Turntable Pipeline Layout"),
                        bind_group_layouts: bind_groups,
                        push_constant_ranges: &[],
                });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Turntable Pipeline"),
                layout: Some(&render_pipeline_layout),
                vertex: wgpu::VertexState {
                        module: &shader,
                        entry_point: Some("vs_main"),
                        buffers: &[Vertex::desc()],
                        compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                        module: &shader,
                        entry_point: Some("fs_main"),
                        targets: &[Some(wgpu::ColorTargetState {
                                format: COLOR_FORMAT,
                                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                                write_mask: wgpu::ColorWrites::ALL,
                        })],
                        compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                        topology: wgpu::PrimitiveTopology::TriangleList,
                        strip_index_format: None,
                        front_face: wgpu::FrontFace::Ccw,
                        cull_mode: Some(wgpu::Face::Back),
                        polygon_mode: wgpu::PolygonMode::Fill,
                        conservative: false,
                        unclipped_depth: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                        format: DEPTH_FORMAT,
                        depth_write_enabled: true,
                        depth_compare: wgpu::CompareFunction::Less,
                        stencil: wgpu::StencilState::default(),
                        bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
        })
}
