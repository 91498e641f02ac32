use image::RgbaImage;

/// A GPU texture plus the sampler and bind group needed to draw with it.
///
/// Owned by the render job that uploaded it; wgpu frees the GPU copies
/// when the value is dropped at job end.
#[derive(Debug)]
pub struct Texture
{
        pub texture: wgpu::Texture,
        pub view: wgpu::TextureView,
        pub sampler: wgpu::Sampler,
        pub bind_group: wgpu::BindGroup,
}

impl Texture
{
        /// Uploads a decoded RGBA image as a sampled 2D texture.
        pub fn from_image(
                device: &wgpu::Device,
                queue: &wgpu::Queue,
                layout: &wgpu::BindGroupLayout,
                img: &RgbaImage,
                label: &str,
        ) -> Self
        {
                let (width, height) = img.dimensions();

                let size = wgpu::Extent3d {
                        width,
                        height,
                        depth_or_array_layers: 1,
                };

                let texture = device.create_texture(&wgpu::TextureDescriptor {
                        label: Some(label),
                        size,
                        mip_level_count: 1,
                        sample_count: 1,
                        dimension: wgpu::TextureDimension::D2,
                        format: wgpu::TextureFormat::Rgba8UnormSrgb,
                        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                        view_formats: &[],
                });

                queue.write_texture(
                        texture.as_image_copy(),
                        img.as_raw(),
                        wgpu::TexelCopyBufferLayout {
                                offset: 0,
                                bytes_per_row: Some(4 * width),
                                rows_per_image: Some(height),
                        },
                        size,
                );

                let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

                let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
                        label: Some("Texture Sampler"),
                        address_mode_u: wgpu::AddressMode::Repeat,
                        address_mode_v: wgpu::AddressMode::Repeat,
                        address_mode_w: wgpu::AddressMode::Repeat,
                        mag_filter: wgpu::FilterMode::Linear,
                        min_filter: wgpu::FilterMode::Linear,
                        mipmap_filter: wgpu::FilterMode::Linear,
                        ..Default::default()
                });

                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                        layout,
                        entries: &[
                                wgpu::BindGroupEntry {
                                        binding: 0,
                                        resource: wgpu::BindingResource::TextureView(&view),
                                },
                                wgpu::BindGroupEntry {
                                        binding: 1,
                                        resource: wgpu::BindingResource::Sampler(&sampler),
                                },
                        ],
                        label: Some(&format!("{label} Bind Group")),
                });

                Self {
                        texture,
                        view,
                        sampler,
                        bind_group,
                }
        }

        /// Bind group layout shared by every texture: one sampled 2D texture
        /// and one filtering sampler, fragment-stage only.
        pub fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout
        {
                device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                        entries: &[
                                wgpu::BindGroupLayoutEntry {
                                        binding: 0,
                                        visibility: wgpu::ShaderStages::FRAGMENT,
                                        ty: wgpu::BindingType::Texture {
                                                multisampled: false,
                                                view_dimension: wgpu::TextureViewDimension::D2,
                                                sample_type: wgpu::TextureSampleType::Float {
                                                        filterable: true,
                                                },
                                        },
                                        count: None,
                                },
                                wgpu::BindGroupLayoutEntry {
                                        binding: 1,
                                        visibility: wgpu::ShaderStages::FRAGMENT,
                                        // Must match the filterable field of the
                                        // texture entry above.
                                        ty: wgpu::BindingType::Sampler(
                                                wgpu::SamplerBindingType::Filtering,
                                        ),
                                        count: None,
                                },
                        ],
                        label: Some("texture_bind_group_layout"),
                })
        }
}

/// A single opaque magenta pixel, substituted for any input image that
/// fails to decode so one bad upload never kills the job.
pub fn magenta_placeholder() -> RgbaImage
{
        RgbaImage::from_pixel(1, 1, image::Rgba([255, 0, 255, 255]))
}

/// A single opaque white pixel, used when a job's resolved texture list
/// would otherwise be empty.
pub fn white_placeholder() -> RgbaImage
{
        RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255]))
}
