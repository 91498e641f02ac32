//! End-to-end pipeline test. Needs a working GPU adapter, so it is
//! ignored by default; run with `cargo test -- --ignored` on a machine
//! with one.

use image::AnimationDecoder;
use image::codecs::gif::GifDecoder;
use turntable::{RenderConfig, Shape};

fn png_bytes(color: [u8; 4]) -> Vec<u8>
{
        let img = image::RgbaImage::from_pixel(8, 8, image::Rgba(color));
        let mut bytes = std::io::Cursor::new(Vec::new());
        img.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
        bytes.into_inner()
}

#[test]
#[ignore = "requires a GPU adapter"]
fn pyramid_job_renders_and_round_trips_through_gif()
{
        let sources = vec![
                png_bytes([200, 40, 40, 255]),
                png_bytes([40, 200, 40, 255]),
                png_bytes([40, 40, 200, 255]),
                png_bytes([200, 200, 40, 255]),
        ];

        let config = RenderConfig {
                width: 64,
                height: 64,
                fps: 30,
                duration_secs: 5,
        };

        let frames = turntable::render_animation(Shape::Pyramid, &sources, &config).unwrap();

        assert_eq!(frames.len(), 150);
        for frame in &frames
        {
                assert_eq!(frame.dimensions(), (64, 64));
        }

        // The solid's silhouette covers a point between base and apex;
        // the corners stay transparent background.
        let first = &frames[0];
        assert_eq!(first.get_pixel(32, 20).0[3], 255);
        assert_eq!(first.get_pixel(0, 0).0[3], 0);
        assert_eq!(first.get_pixel(63, 63).0[3], 0);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pyramid.gif");
        turntable::encoder::write_gif(&frames, config.fps, &path).unwrap();

        let file = std::fs::File::open(&path).unwrap();
        let decoder = GifDecoder::new(std::io::BufReader::new(file)).unwrap();
        let decoded = decoder.into_frames().collect_frames().unwrap();
        assert_eq!(decoded.len(), 150);
}
