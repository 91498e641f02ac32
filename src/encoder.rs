//! Frame-sequence encoding: GIF in-process, MP4 through an `ffmpeg`
//! child process. Artifacts are fully produced before anything lands at
//! the final path, so a failed encode never leaves a partial file behind.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use image::RgbaImage;
use image::codecs::gif::{GifEncoder, Repeat};

use crate::error::RenderError;

/// Container the frame sequence is encoded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat
{
        Gif,
        Mp4,
}

impl OutputFormat
{
        /// Picks the format from the output path's extension; defaults to
        /// GIF for anything unrecognized.
        pub fn from_path(path: &Path) -> Self
        {
                match path.extension().and_then(|ext| ext.to_str())
                {
                        Some("mp4") => OutputFormat::Mp4,
                        _ => OutputFormat::Gif,
                }
        }
}

/// Encodes the sequence into `path` in the given format.
pub fn write_animation(
        frames: &[RgbaImage],
        fps: u32,
        format: OutputFormat,
        path: &Path,
) -> Result<(), RenderError>
{
        match format
        {
                OutputFormat::Gif => write_gif(frames, fps, path),
                OutputFormat::Mp4 => write_mp4(frames, fps, path),
        }
}

/// Writes an infinitely looping GIF with a per-frame delay of `1000/fps`
/// milliseconds. The artifact is encoded fully in memory and written with
/// a single filesystem call.
pub fn write_gif(
        frames: &[RgbaImage],
        fps: u32,
        path: &Path,
) -> Result<(), RenderError>
{
        check_sequence(frames, fps)?;

        let delay = image::Delay::from_numer_denom_ms(1000, fps);

        let mut bytes = Vec::new();
        {
                let mut encoder = GifEncoder::new(&mut bytes);
                encoder.set_repeat(Repeat::Infinite)
                        .map_err(|e| RenderError::Encode(e.to_string()))?;

                for frame in frames
                {
                        encoder.encode_frame(image::Frame::from_parts(
                                frame.clone(),
                                0,
                                0,
                                delay,
                        ))
                        .map_err(|e| RenderError::Encode(e.to_string()))?;
                }
        }

        std::fs::write(path, bytes)?;

        log::info!("wrote GIF artifact to {}", path.display());

        Ok(())
}

/// Writes an H.264 MP4 at a constant `fps` by piping raw RGBA frames into
/// `ffmpeg`. Encodes into a temporary sibling file and renames it into
/// place only on success.
pub fn write_mp4(
        frames: &[RgbaImage],
        fps: u32,
        path: &Path,
) -> Result<(), RenderError>
{
        check_sequence(frames, fps)?;

        let (width, height) = frames[0].dimensions();
        for frame in frames
        {
                if frame.dimensions() != (width, height)
                {
                        return Err(RenderError::Encode(
                                "frames in a sequence must share one resolution".into(),
                        ));
                }
        }

        let staging = staging_path(path);

        let mut child = Command::new("ffmpeg")
                .args(ffmpeg_args(width, height, fps, &staging))
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::piped())
                .spawn()
                .map_err(|e| RenderError::Encode(format!("failed to spawn ffmpeg: {e}")))?;

        {
                use std::io::Write;

                let mut stdin = child
                        .stdin
                        .take()
                        .ok_or_else(|| RenderError::Encode("ffmpeg stdin unavailable".into()))?;

                for frame in frames
                {
                        stdin.write_all(frame.as_raw())?;
                }
                // Dropping stdin closes the pipe and lets ffmpeg finalize.
        }

        let output = child
                .wait_with_output()
                .map_err(|e| RenderError::Encode(format!("ffmpeg did not finish: {e}")))?;

        if !output.status.success()
        {
                let _ = std::fs::remove_file(&staging);
                let stderr = String::from_utf8_lossy(&output.stderr);
                let tail: Vec<&str> = stderr.lines().rev().take(5).collect();
                return Err(RenderError::Encode(format!(
                        "ffmpeg exited with {}: {}",
                        output.status,
                        tail.into_iter().rev().collect::<Vec<_>>().join(" | ")
                )));
        }

        std::fs::rename(&staging, path)?;

        log::info!("wrote MP4 artifact to {}", path.display());

        Ok(())
}

fn check_sequence(
        frames: &[RgbaImage],
        fps: u32,
) -> Result<(), RenderError>
{
        if frames.is_empty()
        {
                return Err(RenderError::Encode("empty frame sequence".into()));
        }
        if fps == 0
        {
                return Err(RenderError::Encode("frame rate must be positive".into()));
        }
        Ok(())
}

fn staging_path(path: &Path) -> PathBuf
{
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(".part");
        path.with_file_name(name)
}

fn ffmpeg_args(
        width: u32,
        height: u32,
        fps: u32,
        output: &Path,
) -> Vec<String>
{
        vec![
                "-y".into(),
                "-f".into(),
                "rawvideo".into(),
                "-pix_fmt".into(),
                "rgba".into(),
                "-s".into(),
                format!("{width}x{height}"),
                "-r".into(),
                fps.to_string(),
                "-i".into(),
                "-".into(),
                "-c:v".into(),
                "libx264".into(),
                // 8-bit 4:2:0 chroma for broad player compatibility.
                "-pix_fmt".into(),
                "yuv420p".into(),
                "-crf".into(),
                "23".into(),
                "-movflags".into(),
                "+faststart".into(),
                output.display().to_string(),
        ]
}

#[cfg(test)]
mod tests
{
        use super::*;
        use image::AnimationDecoder;
        use image::codecs::gif::GifDecoder;

        fn solid_frames(count: usize) -> Vec<RgbaImage>
        {
                (0..count)
                        .map(|i| {
                                RgbaImage::from_pixel(
                                        4,
                                        4,
                                        image::Rgba([(i * 40) as u8, 0, 0, 255]),
                                )
                        })
                        .collect()
        }

        #[test]
        fn gif_round_trips_frame_count_and_delay()
        {
                let dir = tempfile::tempdir().unwrap();
                let path = dir.path().join("spin.gif");

                write_gif(&solid_frames(3), 30, &path).unwrap();

                let file = std::fs::File::open(&path).unwrap();
                let decoder = GifDecoder::new(std::io::BufReader::new(file)).unwrap();
                let decoded = decoder.into_frames().collect_frames().unwrap();

                assert_eq!(decoded.len(), 3);

                // GIF stores delays in centiseconds, so 1000/30 ms lands on
                // a value near 33 ms.
                let (numer, denom) = decoded[0].delay().numer_denom_ms();
                let ms = numer as f64 / denom as f64;
                assert!((29.0..=35.0).contains(&ms), "unexpected delay {ms} ms");
        }

        #[test]
        fn empty_sequence_is_rejected()
        {
                let dir = tempfile::tempdir().unwrap();
                let path = dir.path().join("spin.gif");

                let err = write_gif(&[], 30, &path).unwrap_err();
                assert!(matches!(err, RenderError::Encode(_)));
                assert!(!path.exists());
        }

        #[test]
        fn format_follows_the_extension()
        {
                assert_eq!(OutputFormat::from_path(Path::new("a/spin.mp4")), OutputFormat::Mp4);
                assert_eq!(OutputFormat::from_path(Path::new("a/spin.gif")), OutputFormat::Gif);
                assert_eq!(OutputFormat::from_path(Path::new("a/spin")), OutputFormat::Gif);
        }

        #[test]
        fn ffmpeg_gets_the_compatibility_pixel_format()
        {
                let args = ffmpeg_args(512, 512, 30, Path::new("out.mp4"));

                assert!(args.contains(&"libx264".to_string()));
                assert!(args.contains(&"yuv420p".to_string()));
                assert!(args.contains(&"512x512".to_string()));

                let r = args.iter().position(|a| a == "-r").unwrap();
                assert_eq!(args[r + 1], "30");
        }

        #[test]
        fn staging_path_stays_in_the_target_directory()
        {
                let staged = staging_path(Path::new("/tmp/out/spin.mp4"));
                assert_eq!(staged, Path::new("/tmp/out/spin.mp4.part"));
        }
}
