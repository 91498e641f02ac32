//! The animation driver: turns a shape and a list of image byte sources
//! into an ordered frame sequence by rendering one full turntable
//! revolution about the vertical axis.

use cgmath::{Point3, Vector3};
use image::RgbaImage;

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::geometry::shapes::Shape;
use crate::renderer::RenderContext;
use crate::texture::{self, Texture};
use crate::transform;

/// Rotation angle in degrees for one frame of the sequence.
///
/// A single revolution is spread evenly across all frames: frame 0 sits at
/// 0° and the last frame stops just short of 360°, so the looped sequence
/// has no duplicate-looking seam frame.
pub fn frame_angle(
        frame_index: u32,
        total_frames: u32,
) -> f32
{
        frame_index as f32 / total_frames as f32 * 360.0
}

/// Decodes the input byte sources into the job's resolved texture list.
///
/// Pure CPU stage, separated from the GPU upload so it can be exercised
/// without an adapter. Per-slot decode failures substitute a magenta
/// placeholder and are logged, never fatal. An empty result gets a white
/// placeholder, and a cube list is cyclically repeated then truncated to
/// six entries, one per face. Only the first entry is sampled today; the
/// full list is resolved anyway as the extension point for per-face
/// texturing.
pub fn resolve_images(
        shape: Shape,
        sources: &[Vec<u8>],
) -> Vec<RgbaImage>
{
        let mut resolved: Vec<RgbaImage> = Vec::with_capacity(sources.len());

        for (index, bytes) in sources.iter().enumerate()
        {
                match image::load_from_memory(bytes)
                {
                        Ok(img) => resolved.push(img.to_rgba8()),
                        Err(source) =>
                        {
                                let err = RenderError::TextureDecode {
                                        index,
                                        source,
                                };
                                log::warn!("{err}; substituting placeholder");
                                resolved.push(texture::magenta_placeholder());
                        }
                }
        }

        if resolved.is_empty()
        {
                resolved.push(texture::white_placeholder());
        }

        if shape == Shape::Cube
        {
                let supplied = resolved.len();
                while resolved.len() < Shape::CUBE_FACES
                {
                        let next = resolved[resolved.len() % supplied].clone();
                        resolved.push(next);
                }
                resolved.truncate(Shape::CUBE_FACES);
        }

        resolved
}

/// Renders the full turntable sequence for one job.
///
/// Owns a fresh [`RenderContext`] for the job's duration and runs the
/// whole loop synchronously; callers with latency-sensitive control paths
/// run this off them. The context is released on every exit path.
pub fn render_turntable(
        shape: Shape,
        sources: &[Vec<u8>],
        config: &RenderConfig,
) -> Result<Vec<RgbaImage>, RenderError>
{
        let total_frames = config.total_frames();

        log::info!(
                "rendering {total_frames} frames of a spinning {shape} at {}x{}",
                config.width,
                config.height
        );

        let mut context = RenderContext::new(config.width, config.height)?;

        let view = transform::look_at(
                Point3::new(0.0, 0.0, 3.0),
                Point3::new(0.0, 0.0, 0.0),
                Vector3::unit_y(),
        );
        let projection = transform::perspective(45.0, config.aspect(), 0.1, 100.0);
        context.set_camera(view, projection)?;

        context.load_geometry(&shape.mesh())?;

        let images = resolve_images(shape, sources);
        let textures: Vec<Texture> = images
                .iter()
                .enumerate()
                .map(|(index, img)| {
                        Texture::from_image(
                                context.device(),
                                context.queue(),
                                context.texture_layout(),
                                img,
                                &format!("Input Texture {index}"),
                        )
                })
                .collect();

        let mut frames = Vec::with_capacity(total_frames as usize);

        for frame_index in 0..total_frames
        {
                let angle = frame_angle(frame_index, total_frames);
                let model = transform::rotate(angle, Vector3::unit_y())?;

                // Every shape currently samples the first resolved texture
                // on every frame; see resolve_images for the list kept
                // around for per-face texturing.
                let frame = context.render_frame(model, &textures[0])?;

                log::trace!("frame {frame_index} rendered at {angle:.2} degrees");
                frames.push(frame);
        }

        context.release();

        log::info!("turntable sequence complete: {} frames", frames.len());

        Ok(frames)
}

#[cfg(test)]
mod tests
{
        use super::*;

        fn png_bytes(color: [u8; 4]) -> Vec<u8>
        {
                let img = RgbaImage::from_pixel(2, 2, image::Rgba(color));
                let mut bytes = std::io::Cursor::new(Vec::new());
                img.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
                bytes.into_inner()
        }

        #[test]
        fn angles_start_at_zero_and_stay_under_a_full_turn()
        {
                let total = 150;

                assert_eq!(frame_angle(0, total), 0.0);

                let mut previous = -1.0;
                for i in 0..total
                {
                        let angle = frame_angle(i, total);
                        assert!(angle > previous);
                        assert!(angle < 360.0);
                        previous = angle;
                }

                let last = frame_angle(total - 1, total);
                assert!((last - 357.6).abs() < 1e-4);
        }

        #[test]
        fn cube_list_is_repeated_to_six_entries()
        {
                let sources = vec![
                        png_bytes([255, 0, 0, 255]),
                        png_bytes([0, 255, 0, 255]),
                        png_bytes([0, 0, 255, 255]),
                ];

                let resolved = resolve_images(Shape::Cube, &sources);

                assert_eq!(resolved.len(), 6);
                for face in 0..3
                {
                        assert_eq!(resolved[face], resolved[face + 3]);
                }
        }

        #[test]
        fn empty_coin_list_gets_the_white_placeholder()
        {
                let resolved = resolve_images(Shape::Coin, &[]);

                assert_eq!(resolved.len(), 1);
                assert_eq!(resolved[0].dimensions(), (1, 1));
                assert_eq!(resolved[0].get_pixel(0, 0).0, [255, 255, 255, 255]);
        }

        #[test]
        fn undecodable_source_becomes_magenta()
        {
                let sources = vec![b"not an image at all".to_vec()];

                let resolved = resolve_images(Shape::Pyramid, &sources);

                assert_eq!(resolved.len(), 1);
                assert_eq!(resolved[0].get_pixel(0, 0).0, [255, 0, 255, 255]);
        }

        #[test]
        fn decoded_images_keep_their_pixels()
        {
                let sources = vec![png_bytes([12, 34, 56, 255])];

                let resolved = resolve_images(Shape::Pyramid, &sources);

                assert_eq!(resolved.len(), 1);
                assert_eq!(resolved[0].dimensions(), (2, 2));
                assert_eq!(resolved[0].get_pixel(0, 0).0, [12, 34, 56, 255]);
        }
}
