use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::effects::decl::{BoxArea, EffectDeclaration};
use crate::foundation::core::{Rect, Rectanglei, Vec2};
use crate::foundation::error::{StyleError, StyleResult};
use crate::foundation::ids::PropertyId;
use crate::render::interface::CompiledFilterHandle;
use crate::render::manager::RenderManager;
use crate::style::property::Property;

/// What effects need to know about the element they decorate.
///
/// Implemented by the embedder's element type; layout and clipping live outside this crate.
pub trait EffectsElement {
    /// Computed value of `id`, if any.
    fn property(&self, id: PropertyId) -> Option<&Property>;

    /// Box of `area` relative to the element's border-box origin.
    fn box_rect(&self, area: BoxArea) -> Rect;

    /// Position of the border-box origin in window coordinates.
    fn absolute_offset(&self) -> Vec2;

    /// Scissor imposed by ancestors, `None` for unclipped. With `clip_to_self` the element's own
    /// border box is intersected in as well.
    fn clipping_region(&self, clip_to_self: bool) -> Option<Rectanglei>;

    /// Human readable path for diagnostics.
    fn address(&self) -> String {
        String::from("<element>")
    }

    /// Border box in window coordinates.
    fn border_box(&self) -> Rect {
        self.box_rect(BoxArea::Border) + self.absolute_offset()
    }
}

/// Per-element state produced by [`Decorator::generate_element_data`].
pub type DecoratorData = Box<dyn Any + Send>;

/// Paints into an element's box, sharing one instance between elements with equal declarations.
pub trait Decorator: fmt::Debug + Send + Sync {
    fn generate_element_data(
        &self,
        element: &dyn EffectsElement,
        paint_area: BoxArea,
        render: &mut RenderManager,
    ) -> Option<DecoratorData>;

    fn render_element(
        &self,
        element: &dyn EffectsElement,
        data: &DecoratorData,
        render: &mut RenderManager,
    );

    fn release_element_data(&self, data: DecoratorData, render: &mut RenderManager);
}

/// Post-processing applied when an element's layer is composited.
pub trait Filter: fmt::Debug + Send + Sync {
    fn compile(
        &self,
        element: &dyn EffectsElement,
        render: &mut RenderManager,
    ) -> Option<CompiledFilterHandle>;

    /// Grows `region` (window coordinates) by how far the filter paints outside it.
    fn extend_ink_overflow(&self, _element: &dyn EffectsElement, _region: &mut Rect) {}
}

pub type DecoratorFactory =
    dyn Fn(&EffectDeclaration) -> StyleResult<Arc<dyn Decorator>> + Send + Sync;
pub type FilterFactory = dyn Fn(&EffectDeclaration) -> StyleResult<Arc<dyn Filter>> + Send + Sync;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct InstanceKey {
    name: String,
    args: Vec<String>,
}

impl InstanceKey {
    fn of(declaration: &EffectDeclaration) -> Self {
        Self {
            name: declaration.name.clone(),
            args: declaration.args.clone(),
        }
    }
}

/// Name -> factory registry for decorators and filters, with a per-declaration instance cache.
#[derive(Default)]
pub struct EffectInstancers {
    decorator_factories: HashMap<String, Arc<DecoratorFactory>>,
    filter_factories: HashMap<String, Arc<FilterFactory>>,
    decorators: HashMap<InstanceKey, Arc<dyn Decorator>>,
    filters: HashMap<InstanceKey, Arc<dyn Filter>>,
}

impl fmt::Debug for EffectInstancers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut decorators: Vec<_> = self.decorator_factories.keys().collect();
        let mut filters: Vec<_> = self.filter_factories.keys().collect();
        decorators.sort();
        filters.sort();
        f.debug_struct("EffectInstancers")
            .field("decorators", &decorators)
            .field("filters", &filters)
            .field("cached", &(self.decorators.len() + self.filters.len()))
            .finish()
    }
}

impl EffectInstancers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `solid`, `opacity`, `blur` and `drop-shadow` installed.
    pub fn with_builtins() -> Self {
        let mut r = Self::new();
        crate::effects::builtin::register_builtins(&mut r);
        r
    }

    /// Registers or replaces a decorator factory. Cached instances of the old factory are dropped.
    pub fn register_decorator<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(&EffectDeclaration) -> StyleResult<Arc<dyn Decorator>> + Send + Sync + 'static,
    {
        let name = name.to_ascii_lowercase();
        self.decorators.retain(|k, _| k.name != name);
        self.decorator_factories.insert(name, Arc::new(factory));
    }

    pub fn register_filter<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(&EffectDeclaration) -> StyleResult<Arc<dyn Filter>> + Send + Sync + 'static,
    {
        let name = name.to_ascii_lowercase();
        self.filters.retain(|k, _| k.name != name);
        self.filter_factories.insert(name, Arc::new(factory));
    }

    pub fn has_decorator(&self, name: &str) -> bool {
        self.decorator_factories
            .contains_key(&name.to_ascii_lowercase())
    }

    pub fn has_filter(&self, name: &str) -> bool {
        self.filter_factories
            .contains_key(&name.to_ascii_lowercase())
    }

    pub fn instance_decorator(
        &mut self,
        declaration: &EffectDeclaration,
    ) -> StyleResult<Arc<dyn Decorator>> {
        let key = InstanceKey::of(declaration);
        if let Some(cached) = self.decorators.get(&key) {
            return Ok(Arc::clone(cached));
        }
        let factory = self
            .decorator_factories
            .get(&declaration.name)
            .ok_or_else(|| {
                StyleError::instancing(format!("no decorator named '{}'", declaration.name))
            })?;
        let decorator = factory(declaration)?;
        self.decorators.insert(key, Arc::clone(&decorator));
        Ok(decorator)
    }

    pub fn instance_filter(
        &mut self,
        declaration: &EffectDeclaration,
    ) -> StyleResult<Arc<dyn Filter>> {
        let key = InstanceKey::of(declaration);
        if let Some(cached) = self.filters.get(&key) {
            return Ok(Arc::clone(cached));
        }
        let factory = self
            .filter_factories
            .get(&declaration.name)
            .ok_or_else(|| {
                StyleError::instancing(format!("no filter named '{}'", declaration.name))
            })?;
        let filter = factory(declaration)?;
        self.filters.insert(key, Arc::clone(&filter));
        Ok(filter)
    }

    /// Drops cached instances no element holds any more. Returns how many were dropped.
    pub fn release_unused(&mut self) -> usize {
        let before = self.decorators.len() + self.filters.len();
        self.decorators.retain(|_, d| Arc::strong_count(d) > 1);
        self.filters.retain(|_, f| Arc::strong_count(f) > 1);
        before - (self.decorators.len() + self.filters.len())
    }

    pub fn cached_instances(&self) -> usize {
        self.decorators.len() + self.filters.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/instancer.rs"]
mod tests;
