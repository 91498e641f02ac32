/// Error taxonomy for the render pipeline.
///
/// Only `TextureDecode` is recoverable: the animation driver substitutes a
/// placeholder texture and keeps going. Everything else aborts the job
/// before any artifact is written.
#[derive(Debug, thiserror::Error)]
pub enum RenderError
{
        /// The shape identifier did not name one of the supported solids.
        #[error("unknown shape '{0}' (expected 'cube', 'coin' or 'pyramid')")]
        UnknownShape(String),

        /// The headless GPU context could not be created. Fatal and
        /// environment-level; not retried.
        #[error("failed to initialize GPU context: {0}")]
        ContextInit(String),

        /// An input image could not be decoded. Recovered locally with a
        /// placeholder texture.
        #[error("failed to decode input image {index}: {source}")]
        TextureDecode
        {
                index: usize,
                #[source]
                source: image::ImageError,
        },

        /// A rotation axis of zero length was supplied.
        #[error("rotation axis has zero length")]
        InvalidAxis,

        /// `render_frame` was called before `load_geometry`.
        #[error("no geometry loaded into the render context")]
        GeometryMissing,

        /// The context was used after `release()`.
        #[error("render context has been released")]
        ContextReleased,

        /// Reading the color target back from the GPU failed.
        #[error("frame readback failed: {0}")]
        Readback(String),

        /// The frame encoder rejected the sequence or the external encoder
        /// process failed.
        #[error("encoding failed: {0}")]
        Encode(String),

        #[error(transparent)]
        Io(#[from] std::io::Error),
}
