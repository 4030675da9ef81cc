//! Render backend contract and the layer/scissor bookkeeping built on top of it.

pub mod interface;
pub mod manager;
pub mod recording;

pub use interface::{
    BlendMode, CompiledFilterHandle, CompiledGeometryHandle, FilterParameters, LayerHandle, Mesh,
    RenderInterface, TextureHandle, Vertex,
};
pub use manager::RenderManager;
pub use recording::{RecordingRenderInterface, RenderCall, RenderLog};
