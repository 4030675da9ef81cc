use std::sync::Arc;

use crate::effects::decl::{BoxArea, EffectDeclarationList};
use crate::effects::instancer::{
    Decorator, DecoratorData, EffectInstancers, EffectsElement, Filter,
};
use crate::foundation::core::{Rect, Rectanglei};
use crate::foundation::ids::PropertyId;
use crate::render::interface::{BlendMode, CompiledFilterHandle};
use crate::render::manager::RenderManager;
use crate::style::dirty::PropertyIdSet;

/// Point in an element's render pass at which [`ElementEffects::render_effects`] is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStage {
    /// Before the element's own content and children.
    Enter,
    /// After the background, before content.
    Decoration,
    /// After the element's children.
    Exit,
}

#[derive(Debug)]
struct DecoratorEntry {
    decorator: Arc<dyn Decorator>,
    data: Option<DecoratorData>,
    paint_area: BoxArea,
}

#[derive(Debug)]
struct FilterEntry {
    filter: Arc<dyn Filter>,
    compiled: Option<CompiledFilterHandle>,
}

/// Effect properties whose change requires re-instancing.
pub const EFFECT_PROPERTIES: [PropertyId; 4] = [
    PropertyId::DECORATOR,
    PropertyId::MASK_IMAGE,
    PropertyId::FILTER,
    PropertyId::BACKDROP_FILTER,
];

/// Decorators, mask images, filters and backdrop filters of one element.
///
/// Instancing and per-element data are rebuilt lazily, driven by two flags: `effects_dirty`
/// (the effect properties changed) and `effects_data_dirty` (the element's boxes changed).
#[derive(Debug)]
pub struct ElementEffects {
    decorators: Vec<DecoratorEntry>,
    mask_images: Vec<DecoratorEntry>,
    filters: Vec<FilterEntry>,
    backdrop_filters: Vec<FilterEntry>,
    effects_dirty: bool,
    effects_data_dirty: bool,
}

impl Default for ElementEffects {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementEffects {
    pub fn new() -> Self {
        Self {
            decorators: Vec::new(),
            mask_images: Vec::new(),
            filters: Vec::new(),
            backdrop_filters: Vec::new(),
            effects_dirty: true,
            effects_data_dirty: true,
        }
    }

    pub fn dirty_effects(&mut self) {
        self.effects_dirty = true;
    }

    pub fn dirty_effects_data(&mut self) {
        self.effects_data_dirty = true;
    }

    pub fn is_effects_dirty(&self) -> bool {
        self.effects_dirty
    }

    pub fn is_effects_data_dirty(&self) -> bool {
        self.effects_data_dirty
    }

    /// Marks effects dirty when any effect property is among `changed`; opacity changes only
    /// need the per-element data rebuilt.
    pub fn dirty_from_properties(&mut self, changed: &PropertyIdSet) {
        if EFFECT_PROPERTIES.iter().any(|&id| changed.contains(id)) {
            self.dirty_effects();
        } else if changed.contains(PropertyId::OPACITY) {
            self.dirty_effects_data();
        }
    }

    pub fn decorator_count(&self) -> usize {
        self.decorators.len()
    }

    pub fn mask_image_count(&self) -> usize {
        self.mask_images.len()
    }

    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    pub fn backdrop_filter_count(&self) -> usize {
        self.backdrop_filters.len()
    }

    /// Rebuilds the four effect lists from the element's effect properties if they are dirty.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn instance_effects(
        &mut self,
        element: &dyn EffectsElement,
        instancers: &mut EffectInstancers,
        render: &mut RenderManager,
    ) {
        if !self.effects_dirty {
            return;
        }
        self.effects_dirty = false;
        self.effects_data_dirty = true;

        self.release_effects(render);

        for id in [PropertyId::DECORATOR, PropertyId::MASK_IMAGE] {
            let Some(list) = effect_list(element, id) else {
                continue;
            };
            let fallback = if id == PropertyId::DECORATOR {
                BoxArea::Padding
            } else {
                BoxArea::Border
            };
            let target = if id == PropertyId::DECORATOR {
                &mut self.decorators
            } else {
                &mut self.mask_images
            };
            target.reserve(list.list.len());

            for declaration in &list.list {
                match instancers.instance_decorator(declaration) {
                    Ok(decorator) => target.push(DecoratorEntry {
                        decorator,
                        data: None,
                        paint_area: declaration.paint_area.resolve(fallback),
                    }),
                    Err(err) => tracing::warn!(
                        decorator = %declaration.name,
                        value = %list.value,
                        element = %element.address(),
                        %err,
                        "decorator could not be instanced"
                    ),
                }
            }
        }

        for id in [PropertyId::FILTER, PropertyId::BACKDROP_FILTER] {
            let Some(list) = effect_list(element, id) else {
                continue;
            };
            let target = if id == PropertyId::FILTER {
                &mut self.filters
            } else {
                &mut self.backdrop_filters
            };
            target.reserve(list.list.len());

            for declaration in &list.list {
                match instancers.instance_filter(declaration) {
                    Ok(filter) => target.push(FilterEntry {
                        filter,
                        compiled: None,
                    }),
                    Err(err) => tracing::warn!(
                        filter = %declaration.name,
                        value = %list.value,
                        element = %element.address(),
                        %err,
                        "filter could not be instanced"
                    ),
                }
            }
        }
    }

    /// Regenerates decorator data and recompiles filters if the element's data is dirty.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn reload_effects_data(
        &mut self,
        element: &dyn EffectsElement,
        render: &mut RenderManager,
    ) {
        if !self.effects_data_dirty {
            return;
        }
        self.effects_data_dirty = false;

        let mut decorator_failed = false;
        for entry in self
            .decorators
            .iter_mut()
            .chain(self.mask_images.iter_mut())
        {
            if let Some(old) = entry.data.take() {
                entry.decorator.release_element_data(old, render);
            }
            entry.data = entry
                .decorator
                .generate_element_data(element, entry.paint_area, render);
            decorator_failed |= entry.data.is_none();
        }
        if decorator_failed {
            tracing::warn!(
                element = %element.address(),
                "could not generate decorator element data"
            );
        }

        let mut filter_failed = false;
        for entry in self
            .filters
            .iter_mut()
            .chain(self.backdrop_filters.iter_mut())
        {
            if let Some(old) = entry.compiled.take() {
                render.release_filter(old);
            }
            entry.compiled = entry.filter.compile(element, render);
            filter_failed |= entry.compiled.is_none();
        }
        if filter_failed {
            tracing::warn!(element = %element.address(), "could not compile filter on element");
        }
    }

    /// Releases every instanced effect and its backend resources.
    pub fn release_effects(&mut self, render: &mut RenderManager) {
        for entry in self.decorators.drain(..).chain(self.mask_images.drain(..)) {
            if let Some(data) = entry.data {
                entry.decorator.release_element_data(data, render);
            }
        }
        for entry in self
            .filters
            .drain(..)
            .chain(self.backdrop_filters.drain(..))
        {
            if let Some(compiled) = entry.compiled {
                render.release_filter(compiled);
            }
        }
    }

    /// Runs one stage of the element's effect rendering, instancing and reloading data first.
    ///
    /// Enter and Exit must be paired for every element; the scissor region in place before
    /// Enter is in place again after either returns.
    pub fn render_effects(
        &mut self,
        stage: RenderStage,
        element: &dyn EffectsElement,
        instancers: &mut EffectInstancers,
        render: &mut RenderManager,
    ) {
        self.instance_effects(element, instancers, render);
        self.reload_effects_data(element, render);

        if stage == RenderStage::Decoration {
            // Back to front: later declarations are painted on top.
            for entry in self.decorators.iter().rev() {
                if let Some(data) = &entry.data {
                    entry.decorator.render_element(element, data, render);
                }
            }
        }

        if self.filters.is_empty()
            && self.backdrop_filters.is_empty()
            && self.mask_images.is_empty()
        {
            return;
        }

        let initial_scissor = render.scissor_region();
        let has_layer_effects = !self.filters.is_empty() || !self.mask_images.is_empty();

        match stage {
            RenderStage::Enter => {
                let Some(backdrop_source) = render.top_layer() else {
                    tracing::error!("effects rendered outside begin_render/end_render");
                    return;
                };

                if has_layer_effects {
                    render.push_layer();
                }

                if !self.backdrop_filters.is_empty() {
                    let Some(backdrop_destination) = render.top_layer() else {
                        return;
                    };

                    render.set_scissor_region(Some(self.backdrop_read_region(element)));
                    let backdrop_temp = render.push_layer();

                    let handles = compiled_handles(&self.backdrop_filters);
                    render.composite_layers(
                        backdrop_source,
                        backdrop_temp,
                        BlendMode::Blend,
                        &handles,
                    );

                    self.apply_clipping_region(element, render, true);
                    render.composite_layers(
                        backdrop_temp,
                        backdrop_destination,
                        BlendMode::Blend,
                        &[],
                    );
                    render.pop_layer();
                    render.set_scissor_region(initial_scissor);
                }
            }
            RenderStage::Exit => {
                if !has_layer_effects {
                    return;
                }
                self.apply_clipping_region(element, render, false);

                let mut handles = compiled_handles(&self.filters);
                if !self.mask_images.is_empty() {
                    render.push_layer();
                    for entry in self.mask_images.iter().rev() {
                        if let Some(data) = &entry.data {
                            entry.decorator.render_element(element, data, render);
                        }
                    }
                    match render.save_layer_as_mask_image() {
                        Some(mask) => handles.push(mask),
                        None => tracing::warn!(
                            element = %element.address(),
                            "could not save mask image"
                        ),
                    }
                    render.pop_layer();
                }

                if let (Some(top), Some(next)) = (render.top_layer(), render.next_layer()) {
                    render.composite_layers(top, next, BlendMode::Blend, &handles);
                }
                render.pop_layer();
                render.set_scissor_region(initial_scissor);
            }
            RenderStage::Decoration => {}
        }
    }

    /// Clips to the element's region: ancestors' clip, then the filter region (border box plus
    /// ink overflow of regular filters) snapped outward to whole pixels.
    fn apply_clipping_region(
        &self,
        element: &dyn EffectsElement,
        render: &mut RenderManager,
        backdrop: bool,
    ) {
        render.set_scissor_region(element.clipping_region(backdrop));

        let mut region = element.border_box();
        if !backdrop {
            for entry in &self.filters {
                entry.filter.extend_ink_overflow(element, &mut region);
            }
        }
        let region = Rectanglei::from_rect_outward(region);
        let scissor = match render.scissor_region() {
            Some(current) => region.intersect(current),
            None => region,
        };
        render.set_scissor_region(Some(scissor));
    }

    /// Border box plus everything the backdrop filters may read from, such as a blur radius.
    fn backdrop_read_region(&self, element: &dyn EffectsElement) -> Rectanglei {
        let mut region: Rect = element.border_box();
        for entry in &self.backdrop_filters {
            entry.filter.extend_ink_overflow(element, &mut region);
        }
        Rectanglei::from_rect_outward(region)
    }
}

fn compiled_handles(entries: &[FilterEntry]) -> Vec<CompiledFilterHandle> {
    entries.iter().filter_map(|e| e.compiled).collect()
}

fn effect_list(element: &dyn EffectsElement, id: PropertyId) -> Option<Arc<EffectDeclarationList>> {
    element
        .property(id)
        .and_then(|p| p.as_effects())
        .filter(|list| !list.is_empty())
        .cloned()
}

#[cfg(test)]
#[path = "../../tests/unit/effects/element_effects.rs"]
mod tests;
