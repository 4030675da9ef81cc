use std::collections::BTreeMap;

use crate::data::variant::Variant;
use crate::foundation::core::{Colourb, Rect, Rectanglei, Vec2};

/// Opaque handle returned by [`RenderInterface::compile_geometry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompiledGeometryHandle(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u64);

/// Compositing layer. The base layer pushed at the start of a frame is a layer like any other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerHandle(pub u64);

/// Compiled filter or saved mask image, consumed by [`RenderInterface::composite_layers`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompiledFilterHandle(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    #[default]
    Blend,
    Replace,
}

/// Named filter parameters, e.g. `{"sigma": 4.0}` for `blur`.
pub type FilterParameters = BTreeMap<String, Variant>;

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Vertex {
    pub position: Vec2,
    /// Premultiplied.
    pub colour: Colourb,
    pub tex_coord: Vec2,
}

/// Indexed triangle list.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Appends an axis-aligned quad as two triangles.
    pub fn push_rect(&mut self, rect: Rect, colour: Colourb) {
        let base = self.vertices.len() as u32;
        let corners = [
            (rect.x0, rect.y0, 0.0, 0.0),
            (rect.x1, rect.y0, 1.0, 0.0),
            (rect.x1, rect.y1, 1.0, 1.0),
            (rect.x0, rect.y1, 0.0, 1.0),
        ];
        self.vertices
            .extend(corners.iter().map(|&(x, y, u, v)| Vertex {
                position: Vec2::new(x, y),
                colour,
                tex_coord: Vec2::new(u, v),
            }));
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

/// Backend supplied by the embedding application.
///
/// Only [`RenderManager`](crate::render::RenderManager) talks to the backend directly; it keeps
/// track of scissor and layer state so backends can stay stateless about nesting.
pub trait RenderInterface {
    /// `None` when the backend cannot compile the mesh; nothing is drawn for it.
    fn compile_geometry(&mut self, mesh: &Mesh) -> Option<CompiledGeometryHandle>;

    fn render_geometry(
        &mut self,
        geometry: CompiledGeometryHandle,
        translation: Vec2,
        texture: Option<TextureHandle>,
    );

    fn release_geometry(&mut self, geometry: CompiledGeometryHandle);

    /// `source` is premultiplied RGBA8, tightly packed.
    fn generate_texture(&mut self, source: &[u8], width: u32, height: u32)
    -> Option<TextureHandle>;

    fn release_texture(&mut self, texture: TextureHandle);

    fn enable_scissor_region(&mut self, enable: bool);

    fn set_scissor_region(&mut self, region: Rectanglei);

    /// Pushes a new transparent layer and makes it the render target.
    fn push_layer(&mut self) -> LayerHandle;

    /// Pops the top layer; the layer below becomes the render target again.
    fn pop_layer(&mut self);

    /// Composites `source` into `destination` through `filters`, in order, clipped to the
    /// current scissor region.
    fn composite_layers(
        &mut self,
        source: LayerHandle,
        destination: LayerHandle,
        blend_mode: BlendMode,
        filters: &[CompiledFilterHandle],
    );

    /// Captures the top layer as a mask usable in a filter list, then clears it.
    fn save_layer_as_mask_image(&mut self) -> Option<CompiledFilterHandle>;

    fn compile_filter(
        &mut self,
        name: &str,
        parameters: &FilterParameters,
    ) -> Option<CompiledFilterHandle>;

    fn release_filter(&mut self, filter: CompiledFilterHandle);
}
