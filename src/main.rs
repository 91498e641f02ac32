use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use turntable::{RenderConfig, Shape};

/// Renders a spinning textured solid from a handful of images.
#[derive(Debug, Parser)]
#[command(name = "turntable", version, about)]
struct Args
{
        /// Solid to render: cube, coin or pyramid.
        #[arg(long)]
        shape: Shape,

        /// Output artifact; the extension picks the container (.gif or
        /// .mp4).
        #[arg(long, default_value = "spin.gif")]
        output: PathBuf,

        /// Input images used as textures, in order.
        #[arg(required = true)]
        images: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()>
{
        env_logger::init();

        let args = Args::parse();

        if !(3..=6).contains(&args.images.len())
        {
                log::warn!(
                        "{} images supplied; jobs normally carry between 3 and 6",
                        args.images.len()
                );
        }

        let mut sources = Vec::with_capacity(args.images.len());
        for path in &args.images
        {
                let bytes = std::fs::read(path)
                        .with_context(|| format!("failed to read image {}", path.display()))?;
                sources.push(bytes);
        }

        let config = RenderConfig::load_or_default();

        let artifact = turntable::render_to_file(args.shape, &sources, &config, &args.output)
                .context("render job failed")?;

        log::info!("animation ready at {}", artifact.display());

        Ok(())
}
