use std::sync::{Arc, Mutex, MutexGuard};

use crate::foundation::core::{Rectanglei, Vec2};
use crate::render::interface::{
    BlendMode, CompiledFilterHandle, CompiledGeometryHandle, FilterParameters, LayerHandle, Mesh,
    RenderInterface, TextureHandle,
};

/// One backend call as seen by [`RecordingRenderInterface`].
#[derive(Clone, Debug, PartialEq)]
pub enum RenderCall {
    CompileGeometry {
        handle: CompiledGeometryHandle,
        vertices: usize,
        indices: usize,
    },
    RenderGeometry {
        handle: CompiledGeometryHandle,
        translation: Vec2,
        texture: Option<TextureHandle>,
    },
    ReleaseGeometry(CompiledGeometryHandle),
    GenerateTexture {
        handle: TextureHandle,
        width: u32,
        height: u32,
    },
    ReleaseTexture(TextureHandle),
    EnableScissor(bool),
    SetScissor(Rectanglei),
    PushLayer(LayerHandle),
    PopLayer,
    CompositeLayers {
        source: LayerHandle,
        destination: LayerHandle,
        blend_mode: BlendMode,
        filters: Vec<CompiledFilterHandle>,
    },
    SaveLayerAsMaskImage(CompiledFilterHandle),
    CompileFilter {
        handle: CompiledFilterHandle,
        name: String,
        parameters: FilterParameters,
    },
    ReleaseFilter(CompiledFilterHandle),
}

/// Shared view of the calls made to a [`RecordingRenderInterface`].
#[derive(Clone, Debug, Default)]
pub struct RenderLog {
    calls: Arc<Mutex<Vec<RenderCall>>>,
}

impl RenderLog {
    fn lock(&self) -> MutexGuard<'_, Vec<RenderCall>> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push(&self, call: RenderCall) {
        self.lock().push(call);
    }

    pub fn calls(&self) -> Vec<RenderCall> {
        self.lock().clone()
    }

    /// Returns the recorded calls and empties the log.
    pub fn take(&self) -> Vec<RenderCall> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Backend that draws nothing and records every call, for headless runs and diagnostics.
///
/// Handles are allocated from one counter starting at 1, so every handle in a log is unique.
#[derive(Debug, Default)]
pub struct RecordingRenderInterface {
    log: RenderLog,
    next_handle: u64,
    fail_filters: bool,
}

impl RecordingRenderInterface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> RenderLog {
        self.log.clone()
    }

    /// Makes every `compile_filter` call fail.
    pub fn with_failing_filters(mut self) -> Self {
        self.fail_filters = true;
        self
    }

    fn next(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl RenderInterface for RecordingRenderInterface {
    fn compile_geometry(&mut self, mesh: &Mesh) -> Option<CompiledGeometryHandle> {
        let handle = CompiledGeometryHandle(self.next());
        self.log.push(RenderCall::CompileGeometry {
            handle,
            vertices: mesh.vertices.len(),
            indices: mesh.indices.len(),
        });
        Some(handle)
    }

    fn render_geometry(
        &mut self,
        handle: CompiledGeometryHandle,
        translation: Vec2,
        texture: Option<TextureHandle>,
    ) {
        self.log.push(RenderCall::RenderGeometry {
            handle,
            translation,
            texture,
        });
    }

    fn release_geometry(&mut self, geometry: CompiledGeometryHandle) {
        self.log.push(RenderCall::ReleaseGeometry(geometry));
    }

    fn generate_texture(
        &mut self,
        _source: &[u8],
        width: u32,
        height: u32,
    ) -> Option<TextureHandle> {
        let handle = TextureHandle(self.next());
        self.log.push(RenderCall::GenerateTexture {
            handle,
            width,
            height,
        });
        Some(handle)
    }

    fn release_texture(&mut self, texture: TextureHandle) {
        self.log.push(RenderCall::ReleaseTexture(texture));
    }

    fn enable_scissor_region(&mut self, enable: bool) {
        self.log.push(RenderCall::EnableScissor(enable));
    }

    fn set_scissor_region(&mut self, region: Rectanglei) {
        self.log.push(RenderCall::SetScissor(region));
    }

    fn push_layer(&mut self) -> LayerHandle {
        let layer = LayerHandle(self.next());
        self.log.push(RenderCall::PushLayer(layer));
        layer
    }

    fn pop_layer(&mut self) {
        self.log.push(RenderCall::PopLayer);
    }

    fn composite_layers(
        &mut self,
        source: LayerHandle,
        destination: LayerHandle,
        blend_mode: BlendMode,
        filters: &[CompiledFilterHandle],
    ) {
        self.log.push(RenderCall::CompositeLayers {
            source,
            destination,
            blend_mode,
            filters: filters.to_vec(),
        });
    }

    fn save_layer_as_mask_image(&mut self) -> Option<CompiledFilterHandle> {
        let handle = CompiledFilterHandle(self.next());
        self.log.push(RenderCall::SaveLayerAsMaskImage(handle));
        Some(handle)
    }

    fn compile_filter(
        &mut self,
        name: &str,
        parameters: &FilterParameters,
    ) -> Option<CompiledFilterHandle> {
        if self.fail_filters {
            return None;
        }
        let handle = CompiledFilterHandle(self.next());
        self.log.push(RenderCall::CompileFilter {
            handle,
            name: name.to_owned(),
            parameters: parameters.clone(),
        });
        Some(handle)
    }

    fn release_filter(&mut self, filter: CompiledFilterHandle) {
        self.log.push(RenderCall::ReleaseFilter(filter));
    }
}
