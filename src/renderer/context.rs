use cgmath::{Matrix4, SquareMatrix};
use image::RgbaImage;
use wgpu::util::{BufferInitDescriptor, DeviceExt};

use crate::error::RenderError;
use crate::geometry::mesh::Mesh;
use crate::geometry::vertex::Vertex;
use crate::renderer::pipeline;
use crate::texture::Texture;

/// Uniform block shared by every draw: projection, view and model, in the
/// order the shader multiplies them.
// We need this for Rust to store our data correctly for the shaders.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms
{
        // cgmath matrices can't go through bytemuck directly, so each
        // Matrix4 is converted to a 4x4 f32 array.
        projection: [[f32; 4]; 4],
        view: [[f32; 4]; 4],
        model: [[f32; 4]; 4],
}

impl Uniforms
{
        fn new() -> Self
        {
                Self {
                        projection: Matrix4::identity().into(),
                        view: Matrix4::identity().into(),
                        model: Matrix4::identity().into(),
                }
        }
}

#[derive(Debug)]
struct GeometryBuffers
{
        vertex_buffer: wgpu::Buffer,
        index_buffer: wgpu::Buffer,
        index_count: u32,
}

/// Headless GPU context that renders one frame at a time into an
/// offscreen color target and reads it back as pixels.
///
/// One render job owns exactly one context; it is not safe to share
/// (uniform writes and texture binds race) and all calls against it are
/// strictly sequential. Construction puts the context into its configured
/// state; [`RenderContext::release`] is terminal and also runs on drop, so
/// GPU resources are returned on every exit path.
#[derive(Debug)]
pub struct RenderContext
{
        width: u32,
        height: u32,

        device: wgpu::Device,
        queue: wgpu::Queue,

        render_pipeline: wgpu::RenderPipeline,

        uniforms: Uniforms,
        uniform_buffer: wgpu::Buffer,
        uniform_bind_group: wgpu::BindGroup,
        texture_bind_group_layout: wgpu::BindGroupLayout,

        color_target: wgpu::Texture,
        color_view: wgpu::TextureView,
        depth_view: wgpu::TextureView,

        /// Color rows are padded to `COPY_BYTES_PER_ROW_ALIGNMENT` when
        /// copied into this buffer; readback strips the padding again.
        readback_buffer: wgpu::Buffer,
        padded_bytes_per_row: u32,

        geometry: Option<GeometryBuffers>,
        released: bool,
}

impl RenderContext
{
        /// Creates the headless device, the offscreen color and depth
        /// targets and the render pipeline.
        ///
        /// Fails with [`RenderError::ContextInit`] when no adapter or
        /// device is available; that failure is environment-level and not
        /// retried.
        pub fn new(
                width: u32,
                height: u32,
        ) -> Result<Self, RenderError>
        {
                let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                        backends: wgpu::Backends::PRIMARY,
                        ..Default::default()
                });

                let adapter = pollster::block_on(instance.request_adapter(
                        &wgpu::RequestAdapterOptions {
                                power_preference: wgpu::PowerPreference::HighPerformance,

                                // Offscreen rendering: no surface to present to.
                                compatible_surface: None,

                                force_fallback_adapter: false,
                        },
                ))
                .map_err(|e| RenderError::ContextInit(format!("no suitable adapter: {e}")))?;

                let info = adapter.get_info();
                log::info!(
                        "using adapter '{}' ({:?}, {:?})",
                        info.name,
                        info.device_type,
                        info.backend
                );

                let (device, queue) = pollster::block_on(adapter.request_device(
                        &wgpu::DeviceDescriptor {
                                label: None,
                                required_features: wgpu::Features::empty(),
                                required_limits: wgpu::Limits::default(),
                                memory_hints: Default::default(),
                                trace: wgpu::Trace::Off,
                        },
                ))
                .map_err(|e| RenderError::ContextInit(format!("device request failed: {e}")))?;

                let color_target = device.create_texture(&wgpu::TextureDescriptor {
                        label: Some("Offscreen Color Target"),
                        size: wgpu::Extent3d {
                                width,
                                height,
                                depth_or_array_layers: 1,
                        },
                        mip_level_count: 1,
                        sample_count: 1,
                        dimension: wgpu::TextureDimension::D2,
                        format: pipeline::COLOR_FORMAT,
                        usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                                | wgpu::TextureUsages::COPY_SRC,
                        view_formats: &[],
                });
                let color_view = color_target.create_view(&wgpu::TextureViewDescriptor::default());

                let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
                        label: Some("Depth Texture"),
                        size: wgpu::Extent3d {
                                width,
                                height,
                                depth_or_array_layers: 1,
                        },
                        mip_level_count: 1,
                        sample_count: 1,
                        dimension: wgpu::TextureDimension::D2,
                        format: pipeline::DEPTH_FORMAT,
                        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                        view_formats: &[],
                });
                let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());

                let uniforms = Uniforms::new();

                let uniform_buffer = device.create_buffer_init(&BufferInitDescriptor {
                        label: Some("Uniform Buffer"),
                        contents: bytemuck::cast_slice(&[uniforms]),
                        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });

                let uniform_bind_group_layout =
                        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                                entries: &[wgpu::BindGroupLayoutEntry {
                                        binding: 0,
                                        visibility: wgpu::ShaderStages::VERTEX,
                                        ty: wgpu::BindingType::Buffer {
                                                ty: wgpu::BufferBindingType::Uniform,
                                                has_dynamic_offset: false,
                                                min_binding_size: None,
                                        },
                                        count: None,
                                }],
                                label: Some("uniform_bind_group_layout"),
                        });

                let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                        layout: &uniform_bind_group_layout,
                        entries: &[wgpu::BindGroupEntry {
                                binding: 0,
                                resource: uniform_buffer.as_entire_binding(),
                        }],
                        label: Some("uniform_bind_group"),
                });

                let texture_bind_group_layout = Texture::bind_group_layout(&device);

                let render_pipeline = pipeline::build_render_pipeline(
                        &device,
                        &[&uniform_bind_group_layout, &texture_bind_group_layout],
                );

                // Buffer-to-texture copies require row pitches aligned to
                // COPY_BYTES_PER_ROW_ALIGNMENT.
                let unpadded_bytes_per_row = 4 * width;
                let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
                let padded_bytes_per_row = unpadded_bytes_per_row.div_ceil(align) * align;

                let readback_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                        label: Some("Frame Readback Buffer"),
                        size: (padded_bytes_per_row * height) as wgpu::BufferAddress,
                        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
                        mapped_at_creation: false,
                });

                Ok(Self {
                        width,
                        height,
                        device,
                        queue,
                        render_pipeline,
                        uniforms,
                        uniform_buffer,
                        uniform_bind_group,
                        texture_bind_group_layout,
                        color_target,
                        color_view,
                        depth_view,
                        readback_buffer,
                        padded_bytes_per_row,
                        geometry: None,
                        released: false,
                })
        }

        pub fn width(&self) -> u32
        {
                self.width
        }

        pub fn height(&self) -> u32
        {
                self.height
        }

        pub fn device(&self) -> &wgpu::Device
        {
                &self.device
        }

        pub fn queue(&self) -> &wgpu::Queue
        {
                &self.queue
        }

        /// Layout textures must be created against to be drawable by this
        /// context's pipeline.
        pub fn texture_layout(&self) -> &wgpu::BindGroupLayout
        {
                &self.texture_bind_group_layout
        }

        /// Caches the view and projection matrices; they are uploaded with
        /// each frame's model matrix.
        pub fn set_camera(
                &mut self,
                view: Matrix4<f32>,
                projection: Matrix4<f32>,
        ) -> Result<(), RenderError>
        {
                self.ensure_configured()?;

                self.uniforms.view = view.into();
                self.uniforms.projection = projection.into();

                Ok(())
        }

        /// Uploads the mesh's vertex and index buffers, replacing (and
        /// freeing) any previously loaded geometry.
        pub fn load_geometry(
                &mut self,
                mesh: &Mesh,
        ) -> Result<(), RenderError>
        {
                self.ensure_configured()?;

                if let Some(old) = self.geometry.take()
                {
                        old.vertex_buffer.destroy();
                        old.index_buffer.destroy();
                }

                let vertex_buffer = self.device.create_buffer_init(&BufferInitDescriptor {
                        label: Some("Mesh Vertex Buffer"),
                        contents: bytemuck::cast_slice::<Vertex, u8>(mesh.vertices()),
                        usage: wgpu::BufferUsages::VERTEX,
                });

                let index_buffer = self.device.create_buffer_init(&BufferInitDescriptor {
                        label: Some("Mesh Index Buffer"),
                        contents: bytemuck::cast_slice::<u32, u8>(mesh.indices()),
                        usage: wgpu::BufferUsages::INDEX,
                });

                self.geometry = Some(GeometryBuffers {
                        vertex_buffer,
                        index_buffer,
                        index_count: mesh.index_count(),
                });

                log::debug!(
                        "geometry uploaded: {} vertices, {} indices",
                        mesh.vertex_count(),
                        mesh.index_count()
                );

                Ok(())
        }

        /// Renders one frame with the given model matrix and texture and
        /// reads the color target back as an RGBA image.
        ///
        /// The GPU pipeline is drained before the readback: the copy is
        /// submitted together with the draw, and the buffer map blocks
        /// until the device signals completion. Reading earlier would
        /// return torn frames.
        pub fn render_frame(
                &mut self,
                model: Matrix4<f32>,
                texture: &Texture,
        ) -> Result<RgbaImage, RenderError>
        {
                self.ensure_configured()?;

                let geometry = self.geometry.as_ref().ok_or(RenderError::GeometryMissing)?;

                self.uniforms.model = model.into();
                self.queue.write_buffer(
                        &self.uniform_buffer,
                        0,
                        bytemuck::cast_slice(&[self.uniforms]),
                );

                let mut encoder =
                        self.device
                                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                                        label: Some("Frame Encoder"),
                                });

                {
                        let mut render_pass =
                                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                                        label: Some("Frame Render Pass"),
                                        color_attachments: &[Some(
                                                wgpu::RenderPassColorAttachment {
                                                        view: &self.color_view,
                                                        resolve_target: None,
                                                        ops: wgpu::Operations {
                                                                // Transparent background; only the
                                                                // solid's silhouette is opaque.
                                                                load: wgpu::LoadOp::Clear(
                                                                        wgpu::Color::TRANSPARENT,
                                                                ),
                                                                store: wgpu::StoreOp::Store,
                                                        },
                                                },
                                        )],
                                        depth_stencil_attachment: Some(
                                                wgpu::RenderPassDepthStencilAttachment {
                                                        view: &self.depth_view,
                                                        depth_ops: Some(wgpu::Operations {
                                                                load: wgpu::LoadOp::Clear(1.0),
                                                                store: wgpu::StoreOp::Discard,
                                                        }),
                                                        stencil_ops: None,
                                                },
                                        ),
                                        timestamp_writes: None,
                                        occlusion_query_set: None,
                                });

                        render_pass.set_pipeline(&self.render_pipeline);
                        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                        render_pass.set_bind_group(1, &texture.bind_group, &[]);
                        render_pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
                        render_pass.set_index_buffer(
                                geometry.index_buffer.slice(..),
                                wgpu::IndexFormat::Uint32,
                        );
                        render_pass.draw_indexed(0..geometry.index_count, 0, 0..1);
                }

                encoder.copy_texture_to_buffer(
                        self.color_target.as_image_copy(),
                        wgpu::TexelCopyBufferInfo {
                                buffer: &self.readback_buffer,
                                layout: wgpu::TexelCopyBufferLayout {
                                        offset: 0,
                                        bytes_per_row: Some(self.padded_bytes_per_row),
                                        rows_per_image: Some(self.height),
                                },
                        },
                        wgpu::Extent3d {
                                width: self.width,
                                height: self.height,
                                depth_or_array_layers: 1,
                        },
                );

                self.queue.submit(std::iter::once(encoder.finish()));

                self.read_back_frame()
        }

        /// Blocks until the submitted work finishes, then copies the
        /// readback buffer into an image, stripping the row padding.
        fn read_back_frame(&self) -> Result<RgbaImage, RenderError>
        {
                let buffer_slice = self.readback_buffer.slice(..);

                let (sender, receiver) = std::sync::mpsc::channel();
                buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
                        let _ = sender.send(result);
                });

                // The explicit sync point: wait for the draw and the copy to
                // drain before touching the mapped memory.
                self.device
                        .poll(wgpu::PollType::Wait)
                        .map_err(|e| RenderError::Readback(format!("device poll failed: {e}")))?;

                receiver
                        .recv()
                        .map_err(|_| RenderError::Readback("map callback dropped".into()))?
                        .map_err(|e| RenderError::Readback(format!("buffer map failed: {e}")))?;

                let unpadded_bytes_per_row = (4 * self.width) as usize;
                let padded_bytes_per_row = self.padded_bytes_per_row as usize;

                let mut pixels =
                        Vec::with_capacity(unpadded_bytes_per_row * self.height as usize);
                {
                        let data = buffer_slice.get_mapped_range();
                        for row in data.chunks_exact(padded_bytes_per_row)
                        {
                                pixels.extend_from_slice(&row[..unpadded_bytes_per_row]);
                        }
                }
                self.readback_buffer.unmap();

                RgbaImage::from_raw(self.width, self.height, pixels)
                        .ok_or_else(|| RenderError::Readback("frame size mismatch".into()))
        }

        /// Frees the job's GPU resources: geometry buffers first, then the
        /// readback buffer and the offscreen target. Idempotent, and also
        /// invoked from `Drop` so error paths cannot leak.
        pub fn release(&mut self)
        {
                if self.released
                {
                        return;
                }

                if let Some(geometry) = self.geometry.take()
                {
                        geometry.vertex_buffer.destroy();
                        geometry.index_buffer.destroy();
                }

                self.readback_buffer.destroy();
                self.color_target.destroy();

                self.released = true;
                log::debug!("render context released");
        }

        fn ensure_configured(&self) -> Result<(), RenderError>
        {
                if self.released
                {
                        return Err(RenderError::ContextReleased);
                }
                Ok(())
        }
}

impl Drop for RenderContext
{
        fn drop(&mut self)
        {
                self.release();
        }
}
