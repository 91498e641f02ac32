//! Turntable — textured-solid animation renderer
//!
//! This crate turns a small set of user-supplied 2D images into a short
//! looping animation of a textured 3D solid (a cube, a coin-like cylinder
//! or a square pyramid) spinning in place, rendered offscreen and encoded
//! as a GIF or MP4.
//!
//! # Pipeline
//!
//! A render job runs these stages in order, with data flowing one way:
//!
//! 1. [`geometry`] builds the mesh for the chosen [`Shape`] (vertex and
//!    index buffers with per-face texture coordinates).
//! 2. [`transform`] supplies the projection, view and per-frame model
//!    matrices (cgmath, column vectors, `M = T * R * S`).
//! 3. [`renderer`] owns the headless GPU context: it uploads the mesh and
//!    textures, renders each frame into an offscreen color target and
//!    reads the pixels back.
//! 4. [`animation`] drives the loop: one full revolution about the
//!    vertical axis spread evenly over `fps x duration` frames.
//! 5. [`encoder`] packs the ordered frame sequence into the artifact.
//!
//! # Ownership and concurrency
//!
//! Each job constructs and exclusively owns one
//! [`renderer::RenderContext`]; contexts are never shared and every call
//! against one is strictly sequential. Independent jobs can run in
//! parallel by creating their own contexts. The whole job blocks its
//! thread for seconds, so callers keep it off latency-sensitive paths.
//!
//! # Failure model
//!
//! A bad input image never kills a job (a placeholder texture is
//! substituted); everything else — unknown shape, no GPU adapter,
//! degenerate transforms — aborts before any artifact reaches its final
//! path. See [`error::RenderError`].
//!
//! # Example
//!
//! ```no_run
//! use turntable::{RenderConfig, Shape};
//!
//! let sources: Vec<Vec<u8>> = vec![/* raw PNG/JPEG bytes */];
//! let config = RenderConfig::default();
//! let path = turntable::render_to_file(
//!         Shape::Coin,
//!         &sources,
//!         &config,
//!         std::path::Path::new("spin.gif"),
//! )
//! .unwrap();
//! println!("wrote {}", path.display());
//! ```

pub mod animation;
pub mod config;
pub mod encoder;
pub mod error;
pub mod geometry;
pub mod renderer;
pub mod texture;
pub mod transform;

use std::path::{Path, PathBuf};

use image::RgbaImage;

pub use crate::config::RenderConfig;
pub use crate::encoder::OutputFormat;
pub use crate::error::RenderError;
pub use crate::geometry::shapes::Shape;

/// Pure-rendering entry point: produces the ordered frame sequence
/// without touching the filesystem.
pub fn render_animation(
        shape: Shape,
        sources: &[Vec<u8>],
        config: &RenderConfig,
) -> Result<Vec<RgbaImage>, RenderError>
{
        animation::render_turntable(shape, sources, config)
}

/// Full pipeline entry point: renders the sequence and encodes it into
/// `path`, choosing the container from the path's extension.
///
/// The artifact is written only after the complete frame sequence exists;
/// a job that fails mid-render leaves nothing at `path`.
pub fn render_to_file(
        shape: Shape,
        sources: &[Vec<u8>],
        config: &RenderConfig,
        path: &Path,
) -> Result<PathBuf, RenderError>
{
        let frames = animation::render_turntable(shape, sources, config)?;

        let format = OutputFormat::from_path(path);
        encoder::write_animation(&frames, config.fps, format, path)?;

        Ok(path.to_path_buf())
}
