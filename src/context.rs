//! Process-wide registries and their explicit lifecycle.
//!
//! Everything that the engine looks names up in lives in one [`Core`]. Embedders either own a
//! `Core` directly and pass it down, or install one process-wide with [`initialise`] and reach it
//! through [`with_core`] / [`with_core_mut`] until [`shutdown`].

use std::fmt;
use std::sync::{OnceLock, RwLock};

use crate::data::filters::FilterRegistry;
use crate::effects::instancer::EffectInstancers;
use crate::event::specification::EventSpecificationTable;
use crate::foundation::error::{StyleError, StyleResult};
use crate::style::sheet_spec::StyleSheetSpecification;
use crate::system::{DefaultSystem, SystemInterface};

/// Owner of every registry: properties, events, data filters and effect factories.
pub struct Core {
    pub style: StyleSheetSpecification,
    pub events: EventSpecificationTable,
    pub filters: FilterRegistry,
    pub effects: EffectInstancers,
    pub system: Box<dyn SystemInterface>,
}

impl fmt::Debug for Core {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Core")
            .field("style", &self.style)
            .field("events", &self.events)
            .field("filters", &self.filters)
            .field("effects", &self.effects)
            .finish_non_exhaustive()
    }
}

impl Default for Core {
    fn default() -> Self {
        Self::new(Box::new(DefaultSystem::new()))
    }
}

impl Core {
    /// Registries preloaded with the built-in properties, events, filters and effects.
    pub fn new(system: Box<dyn SystemInterface>) -> Self {
        Self {
            style: StyleSheetSpecification::new(),
            events: EventSpecificationTable::new(),
            filters: FilterRegistry::with_builtins(),
            effects: EffectInstancers::with_builtins(),
            system,
        }
    }
}

static CORE: OnceLock<RwLock<Option<Core>>> = OnceLock::new();

fn slot() -> &'static RwLock<Option<Core>> {
    CORE.get_or_init(|| RwLock::new(None))
}

/// Installs the process-wide [`Core`]. Fails if one is already installed.
pub fn initialise(system: Box<dyn SystemInterface>) -> StyleResult<()> {
    let mut guard = slot()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if guard.is_some() {
        tracing::error!("stylebind initialised twice");
        return Err(StyleError::registration("core is already initialised"));
    }
    *guard = Some(Core::new(system));
    tracing::debug!("stylebind core initialised");
    Ok(())
}

/// Drops the process-wide [`Core`]. Returns `false` if nothing was installed.
pub fn shutdown() -> bool {
    let mut guard = slot()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let was_installed = guard.take().is_some();
    if was_installed {
        tracing::debug!("stylebind core shut down");
    }
    was_installed
}

pub fn is_initialised() -> bool {
    slot()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .is_some()
}

/// Runs `f` with shared access to the installed core.
pub fn with_core<R>(f: impl FnOnce(&Core) -> R) -> StyleResult<R> {
    let guard = slot()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    match guard.as_ref() {
        Some(core) => Ok(f(core)),
        None => Err(not_initialised()),
    }
}

/// Runs `f` with exclusive access to the installed core.
pub fn with_core_mut<R>(f: impl FnOnce(&mut Core) -> R) -> StyleResult<R> {
    let mut guard = slot()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    match guard.as_mut() {
        Some(core) => Ok(f(core)),
        None => Err(not_initialised()),
    }
}

fn not_initialised() -> StyleError {
    StyleError::Other(anyhow::anyhow!(
        "stylebind core is not initialised (call initialise first)"
    ))
}

#[cfg(test)]
#[path = "../tests/unit/context.rs"]
mod tests;
