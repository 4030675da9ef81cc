//! Decorators, mask images, filters and backdrop filters.

pub mod builtin;
pub mod decl;
pub mod element_effects;
pub mod instancer;

pub use builtin::{BlurFilter, DropShadowFilter, OpacityFilter, SolidDecorator};
pub use decl::{BoxArea, EffectDeclaration, EffectDeclarationList, EffectListKind};
pub use element_effects::{EFFECT_PROPERTIES, ElementEffects, RenderStage};
pub use instancer::{Decorator, DecoratorData, EffectInstancers, EffectsElement, Filter};
