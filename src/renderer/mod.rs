pub mod context;
pub mod pipeline;

pub use context::RenderContext;
