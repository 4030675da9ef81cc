use crate::foundation::core::{Rectanglei, Vec2};
use crate::foundation::error::{StyleError, StyleResult};
use crate::render::interface::{
    BlendMode, CompiledFilterHandle, CompiledGeometryHandle, FilterParameters, LayerHandle, Mesh,
    RenderInterface, TextureHandle,
};

/// Stateful front for a [`RenderInterface`].
///
/// Tracks the scissor region and the layer stack so nested elements can save and restore them,
/// and filters out redundant backend calls.
pub struct RenderManager {
    interface: Box<dyn RenderInterface>,
    viewport: (i32, i32),
    scissor: Option<Rectanglei>,
    layers: Vec<LayerHandle>,
}

impl std::fmt::Debug for RenderManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderManager")
            .field("viewport", &self.viewport)
            .field("scissor", &self.scissor)
            .field("layers", &self.layers)
            .finish_non_exhaustive()
    }
}

impl RenderManager {
    pub fn new(interface: Box<dyn RenderInterface>) -> Self {
        Self {
            interface,
            viewport: (0, 0),
            scissor: None,
            layers: Vec::new(),
        }
    }

    pub fn interface_mut(&mut self) -> &mut dyn RenderInterface {
        self.interface.as_mut()
    }

    pub fn into_interface(self) -> Box<dyn RenderInterface> {
        self.interface
    }

    pub fn set_viewport(&mut self, width: i32, height: i32) {
        self.viewport = (width, height);
    }

    pub fn viewport(&self) -> (i32, i32) {
        self.viewport
    }

    /// Pushes the base layer for a frame.
    pub fn begin_render(&mut self) {
        debug_assert!(self.layers.is_empty(), "begin_render called twice");
        if !self.layers.is_empty() {
            tracing::error!(
                depth = self.layers.len(),
                "layer stack not empty at begin_render"
            );
        }
        let base = self.interface.push_layer();
        self.layers.push(base);
    }

    /// Pops the base layer and resets the scissor. Fails when nested layers were left behind.
    pub fn end_render(&mut self) -> StyleResult<()> {
        self.disable_scissor_region();
        let depth = self.layers.len();
        while !self.layers.is_empty() {
            self.interface.pop_layer();
            self.layers.pop();
        }
        if depth != 1 {
            return Err(StyleError::evaluation(format!(
                "expected only the base layer at end_render, found {depth}"
            )));
        }
        Ok(())
    }

    pub fn scissor_region(&self) -> Option<Rectanglei> {
        self.scissor
    }

    pub fn disable_scissor_region(&mut self) {
        self.set_scissor_region(None);
    }

    /// `None` disables scissoring. An enabled region is clamped to the viewport.
    pub fn set_scissor_region(&mut self, region: Option<Rectanglei>) {
        let was_enabled = self.scissor.is_some();
        let enable = region.is_some();
        if enable != was_enabled {
            self.interface.enable_scissor_region(enable);
        }

        let (width, height) = self.viewport;
        let viewport = Rectanglei::from_position_size(0, 0, width, height);
        let region = region.map(|r| r.intersect(viewport));
        if let Some(r) = region
            && region != self.scissor
        {
            self.interface.set_scissor_region(r);
        }
        self.scissor = region;
    }

    pub fn push_layer(&mut self) -> LayerHandle {
        let layer = self.interface.push_layer();
        self.layers.push(layer);
        layer
    }

    pub fn pop_layer(&mut self) {
        if self.layers.len() <= 1 {
            tracing::error!("attempted to pop the base layer");
            return;
        }
        self.interface.pop_layer();
        self.layers.pop();
    }

    pub fn top_layer(&self) -> Option<LayerHandle> {
        self.layers.last().copied()
    }

    /// Layer directly below the top one.
    pub fn next_layer(&self) -> Option<LayerHandle> {
        self.layers.iter().rev().nth(1).copied()
    }

    pub fn layer_depth(&self) -> usize {
        self.layers.len()
    }

    pub fn composite_layers(
        &mut self,
        source: LayerHandle,
        destination: LayerHandle,
        blend_mode: BlendMode,
        filters: &[CompiledFilterHandle],
    ) {
        self.interface
            .composite_layers(source, destination, blend_mode, filters);
    }

    pub fn save_layer_as_mask_image(&mut self) -> Option<CompiledFilterHandle> {
        self.interface.save_layer_as_mask_image()
    }

    pub fn compile_filter(
        &mut self,
        name: &str,
        parameters: &FilterParameters,
    ) -> Option<CompiledFilterHandle> {
        self.interface.compile_filter(name, parameters)
    }

    pub fn release_filter(&mut self, filter: CompiledFilterHandle) {
        self.interface.release_filter(filter);
    }

    pub fn compile_geometry(&mut self, mesh: &Mesh) -> Option<CompiledGeometryHandle> {
        if mesh.is_empty() {
            return None;
        }
        self.interface.compile_geometry(mesh)
    }

    pub fn render_geometry(
        &mut self,
        geometry: CompiledGeometryHandle,
        translation: Vec2,
        texture: Option<TextureHandle>,
    ) {
        self.interface
            .render_geometry(geometry, translation, texture);
    }

    pub fn release_geometry(&mut self, geometry: CompiledGeometryHandle) {
        self.interface.release_geometry(geometry);
    }

    pub fn generate_texture(
        &mut self,
        source: &[u8],
        width: u32,
        height: u32,
    ) -> Option<TextureHandle> {
        let expected = (width as usize) * (height as usize) * 4;
        if source.len() != expected {
            tracing::warn!(
                len = source.len(),
                expected,
                "texture data does not match its dimensions"
            );
            return None;
        }
        self.interface.generate_texture(source, width, height)
    }

    pub fn release_texture(&mut self, texture: TextureHandle) {
        self.interface.release_texture(texture);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/manager.rs"]
mod tests;
