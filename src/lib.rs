//! Stylebind is the style-resolution and data-binding core of a retained-mode UI engine.
//!
//! The crate is table driven:
//!
//! - a [`StyleSheetSpecification`] names every property and shorthand and parses declarations
//! - [`ElementStyle`] tracks dirty properties per element and recomputes only what changed
//! - [`DataExpression`] compiles `{{ a ? b : c | filter }}` style expressions to bytecode that
//!   runs against any [`DataModel`]
//! - [`ElementEffects`] instances decorators and filters and drives a [`RenderInterface`]
//! - [`SpriteSet`] packs glyphs and other small images into texture pages
//!
//! Registries live in a [`Core`], either owned by the embedder or installed process-wide with
//! [`initialise`].
#![forbid(unsafe_code)]

/// Glyph and sprite texture atlas.
pub mod atlas;
/// Process-wide registry lifecycle.
pub mod context;
/// Data binding values, models, filters and expressions.
pub mod data;
/// Decorators, filters and their per-element state.
pub mod effects;
/// Event type registry.
pub mod event;
/// Ids, errors and geometry shared by every subsystem.
pub mod foundation;
/// Render backend contract.
pub mod render;
/// Property registry and per-element cascade.
pub mod style;
/// Host services.
pub mod system;

pub use foundation::core::{Colourb, Insets, Point, Rect, Rectanglei, Vec2};
pub use foundation::error::{StyleError, StyleResult};
pub use foundation::ids::{EventId, PropertyId, ShorthandId};

pub use atlas::{SpriteHandle, SpriteSet, SpriteSetOpts};
pub use context::{Core, initialise, shutdown, with_core, with_core_mut};
pub use data::{DataExpression, DataModel, DataStore, FilterRegistry, TextBinding, Variant};
pub use effects::{EffectInstancers, EffectsElement, ElementEffects, RenderStage};
pub use event::EventSpecificationTable;
pub use render::{RenderInterface, RenderManager};
pub use style::element_style::{ElementDefinition, ElementStyle};
pub use style::property::{Property, PropertyDictionary, PropertyValue, Unit};
pub use style::sheet_spec::StyleSheetSpecification;
pub use system::{DefaultSystem, LogLevel, SystemInterface};
