use std::collections::HashMap;

use crate::foundation::ids::{EventId, FIRST_CUSTOM_EVENT_ID, NUM_DEFINED_EVENT_IDS};

/// Upper bound on event ids, custom ones included.
pub const MAX_EVENT_IDS: u32 = u16::MAX as u32;

/// When an element's default action runs for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DefaultActionPhase {
    #[default]
    None,
    Target,
    TargetAndBubble,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSpecification {
    pub id: EventId,
    pub name: String,
    pub interruptible: bool,
    pub bubbles: bool,
    pub default_action_phase: DefaultActionPhase,
}

/// Dense table of event behaviour, indexed by [`EventId`].
#[derive(Debug, Clone)]
pub struct EventSpecificationTable {
    specifications: Vec<EventSpecification>,
    lookup: HashMap<String, EventId>,
}

impl Default for EventSpecificationTable {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSpecificationTable {
    pub fn new() -> Self {
        use DefaultActionPhase::{None as N, Target as T, TargetAndBubble as TB};

        let builtins: &[(EventId, &str, bool, bool, DefaultActionPhase)] = &[
            (EventId::INVALID, "invalid", false, false, N),
            (EventId::MOUSEDOWN, "mousedown", true, true, TB),
            (EventId::MOUSESCROLL, "mousescroll", true, true, N),
            (EventId::MOUSEOVER, "mouseover", true, true, T),
            (EventId::MOUSEOUT, "mouseout", true, true, T),
            (EventId::FOCUS, "focus", false, false, T),
            (EventId::BLUR, "blur", false, false, T),
            (EventId::KEYDOWN, "keydown", true, true, TB),
            (EventId::KEYUP, "keyup", true, true, TB),
            (EventId::TEXTINPUT, "textinput", true, true, TB),
            (EventId::MOUSEUP, "mouseup", true, true, TB),
            (EventId::CLICK, "click", true, true, TB),
            (EventId::DBLCLICK, "dblclick", true, true, TB),
            (EventId::LOAD, "load", false, false, N),
            (EventId::UNLOAD, "unload", false, false, N),
            (EventId::SHOW, "show", false, false, N),
            (EventId::HIDE, "hide", false, false, N),
            (EventId::MOUSEMOVE, "mousemove", true, true, N),
            (EventId::DRAGMOVE, "dragmove", true, true, N),
            (EventId::DRAG, "drag", false, true, T),
            (EventId::DRAGSTART, "dragstart", false, true, T),
            (EventId::DRAGOVER, "dragover", true, true, N),
            (EventId::DRAGDROP, "dragdrop", true, true, N),
            (EventId::DRAGOUT, "dragout", true, true, N),
            (EventId::DRAGEND, "dragend", true, true, N),
            (EventId::HANDLEDRAG, "handledrag", false, true, N),
            (EventId::RESIZE, "resize", false, false, N),
            (EventId::SCROLL, "scroll", false, true, N),
            (EventId::ANIMATIONEND, "animationend", false, true, N),
            (EventId::TRANSITIONEND, "transitionend", false, true, N),
            (EventId::CHANGE, "change", false, true, N),
            (EventId::SUBMIT, "submit", true, true, N),
            (EventId::TABCHANGE, "tabchange", false, true, N),
        ];
        debug_assert_eq!(builtins.len(), NUM_DEFINED_EVENT_IDS as usize);

        let mut table = Self {
            specifications: Vec::with_capacity(builtins.len()),
            lookup: HashMap::with_capacity(builtins.len()),
        };
        for (i, &(id, name, interruptible, bubbles, phase)) in builtins.iter().enumerate() {
            debug_assert_eq!(id.0 as usize, i, "event table out of order at '{name}'");
            table.specifications.push(EventSpecification {
                id,
                name: name.to_owned(),
                interruptible,
                bubbles,
                default_action_phase: phase,
            });
            table.lookup.insert(name.to_owned(), id);
        }
        table
    }

    /// Out-of-range ids resolve to the `invalid` entry.
    pub fn get(&self, id: EventId) -> &EventSpecification {
        self.specifications
            .get(id.0 as usize)
            .unwrap_or(&self.specifications[0])
    }

    pub fn get_id(&self, name: &str) -> EventId {
        self.lookup
            .get(&name.to_ascii_lowercase())
            .copied()
            .unwrap_or(EventId::INVALID)
    }

    /// Looks up `name`, registering it as an interruptible bubbling event without a default
    /// action if it is new.
    pub fn get_or_insert(&mut self, name: &str) -> &EventSpecification {
        let index = self.find_or_insert(name, true, true, DefaultActionPhase::None).0;
        &self.specifications[index]
    }

    pub fn get_id_or_insert(&mut self, name: &str) -> EventId {
        self.get_or_insert(name).id
    }

    /// Registers or updates a custom event type. Built-in entries are never modified.
    pub fn insert_or_replace_custom(
        &mut self,
        name: &str,
        interruptible: bool,
        bubbles: bool,
        default_action_phase: DefaultActionPhase,
    ) -> EventId {
        let (index, existed) =
            self.find_or_insert(name, interruptible, bubbles, default_action_phase);
        let spec = &mut self.specifications[index];
        if existed && spec.id.0 >= FIRST_CUSTOM_EVENT_ID {
            spec.interruptible = interruptible;
            spec.bubbles = bubbles;
            spec.default_action_phase = default_action_phase;
        } else if existed {
            tracing::debug!(name, "built-in event specification left unchanged");
        }
        spec.id
    }

    pub fn len(&self) -> usize {
        self.specifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specifications.is_empty()
    }

    fn find_or_insert(
        &mut self,
        name: &str,
        interruptible: bool,
        bubbles: bool,
        default_action_phase: DefaultActionPhase,
    ) -> (usize, bool) {
        let name = name.to_ascii_lowercase();
        if let Some(id) = self.lookup.get(&name) {
            return (id.0 as usize, true);
        }

        let next = self.specifications.len() as u32;
        if next >= MAX_EVENT_IDS {
            tracing::error!(%name, "maximum number of event types exceeded");
            return (0, true);
        }

        let id = EventId(next);
        tracing::trace!(%name, id = id.0, "registered custom event type");
        self.specifications.push(EventSpecification {
            id,
            name: name.clone(),
            interruptible,
            bubbles,
            default_action_phase,
        });
        self.lookup.insert(name, id);
        (next as usize, false)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/event/specification.rs"]
mod tests;
