use std::collections::{HashMap, HashSet};

use crate::data::address::{AddressEntry, DataAddress, RESERVED_NAMES, is_valid_name};
use crate::data::variant::Variant;
use crate::foundation::error::{StyleError, StyleResult};

/// Live data that compiled expressions read and assign through.
///
/// Addresses are resolved on every call, so one compiled program can run against any model.
pub trait DataModel {
    fn get(&self, address: &DataAddress) -> StyleResult<Variant>;

    fn set(&mut self, address: &DataAddress, value: Variant) -> StyleResult<()>;

    /// Invokes a bound event callback.
    fn call(&mut self, name: &str, args: &[Variant]) -> StyleResult<()>;

    fn dirty_variable(&mut self, name: &str);

    fn is_variable_dirty(&self, name: &str) -> bool;
}

/// Bound root variables plus the names touched since the last [`Variables::clear_dirty`].
#[derive(Debug, Clone, Default)]
pub struct Variables {
    values: HashMap<String, Variant>,
    dirty: HashSet<String>,
}

impl Variables {
    pub fn get(&self, address: &DataAddress) -> StyleResult<Variant> {
        let mut entries = address.entries().iter();
        let root = address.root_name();
        entries.next();
        let mut current = self
            .values
            .get(root)
            .ok_or_else(|| StyleError::evaluation(format!("no variable named '{root}'")))?;

        for entry in entries {
            current = match (entry, current) {
                (AddressEntry::Name(n), Variant::Array(items)) if n == "size" => {
                    return Ok(Variant::Int(items.len() as i64));
                }
                (AddressEntry::Name(n), Variant::Object(map)) => map.get(n).ok_or_else(|| {
                    StyleError::evaluation(format!("'{address}' has no member '{n}'"))
                })?,
                (AddressEntry::Index(i), Variant::Array(items)) => {
                    items.get(*i).ok_or_else(|| {
                        StyleError::evaluation(format!(
                            "index {i} out of range in '{address}' (size {})",
                            items.len()
                        ))
                    })?
                }
                (_, other) => {
                    return Err(StyleError::evaluation(format!(
                        "cannot index into {} while resolving '{address}'",
                        other.type_name()
                    )));
                }
            };
        }
        Ok(current.clone())
    }

    /// Assigns through an existing root variable and marks it dirty.
    pub fn set(&mut self, address: &DataAddress, value: Variant) -> StyleResult<()> {
        let root = address.root_name();
        let mut current = self
            .values
            .get_mut(root)
            .ok_or_else(|| StyleError::evaluation(format!("no variable named '{root}'")))?;

        for entry in &address.entries()[1..] {
            current = match (entry, current) {
                (AddressEntry::Name(n), Variant::Object(map)) => {
                    map.entry(n.clone()).or_default()
                }
                (AddressEntry::Index(i), Variant::Array(items)) => {
                    let len = items.len();
                    items.get_mut(*i).ok_or_else(|| {
                        StyleError::evaluation(format!(
                            "index {i} out of range in '{address}' (size {len})"
                        ))
                    })?
                }
                (_, other) => {
                    return Err(StyleError::evaluation(format!(
                        "cannot assign into {} at '{address}'",
                        other.type_name()
                    )));
                }
            };
        }

        *current = value;
        self.dirty.insert(root.to_owned());
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn dirty(&mut self, name: &str) {
        self.dirty.insert(name.to_owned());
    }

    pub fn is_dirty(&self, name: &str) -> bool {
        self.dirty.contains(name)
    }

    pub fn clear_dirty(&mut self) {
        self.dirty.clear();
    }
}

pub type EventCallback =
    Box<dyn FnMut(&mut Variables, &[Variant]) -> anyhow::Result<()> + Send + 'static>;

/// In-crate [`DataModel`]: named variables and event callbacks.
#[derive(Default)]
pub struct DataStore {
    variables: Variables,
    events: HashMap<String, EventCallback>,
}

impl std::fmt::Debug for DataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataStore")
            .field("variables", &self.variables)
            .field("events", &self.events.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds each top-level member of a JSON object as a variable.
    pub fn from_json(seed: serde_json::Value) -> StyleResult<Self> {
        let serde_json::Value::Object(members) = seed else {
            return Err(StyleError::parse("data model seed must be a JSON object"));
        };
        let mut store = Self::new();
        for (name, value) in members {
            let value: Variant =
                serde_json::from_value(value).map_err(|e| StyleError::Other(e.into()))?;
            store.bind(&name, value)?;
        }
        Ok(store)
    }

    pub fn bind(&mut self, name: &str, value: impl Into<Variant>) -> StyleResult<()> {
        check_bindable(name)?;
        if self.variables.values.contains_key(name) || self.events.contains_key(name) {
            return Err(StyleError::registration(format!(
                "data model name '{name}' is already bound"
            )));
        }
        self.variables.values.insert(name.to_owned(), value.into());
        self.variables.dirty(name);
        Ok(())
    }

    pub fn bind_event(
        &mut self,
        name: &str,
        callback: impl FnMut(&mut Variables, &[Variant]) -> anyhow::Result<()> + Send + 'static,
    ) -> StyleResult<()> {
        check_bindable(name)?;
        if self.variables.values.contains_key(name) || self.events.contains_key(name) {
            return Err(StyleError::registration(format!(
                "data model name '{name}' is already bound"
            )));
        }
        self.events.insert(name.to_owned(), Box::new(callback));
        Ok(())
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut Variables {
        &mut self.variables
    }

    pub fn clear_dirty(&mut self) {
        self.variables.clear_dirty();
    }
}

fn check_bindable(name: &str) -> StyleResult<()> {
    if RESERVED_NAMES.contains(&name) {
        return Err(StyleError::registration(format!(
            "'{name}' is a reserved name and cannot be bound"
        )));
    }
    if !is_valid_name(name) {
        return Err(StyleError::registration(format!(
            "'{name}' is not a valid data model name"
        )));
    }
    Ok(())
}

impl DataModel for DataStore {
    fn get(&self, address: &DataAddress) -> StyleResult<Variant> {
        self.variables.get(address)
    }

    fn set(&mut self, address: &DataAddress, value: Variant) -> StyleResult<()> {
        self.variables.set(address, value)
    }

    fn call(&mut self, name: &str, args: &[Variant]) -> StyleResult<()> {
        let callback = self
            .events
            .get_mut(name)
            .ok_or_else(|| StyleError::evaluation(format!("no event callback named '{name}'")))?;
        callback(&mut self.variables, args).map_err(StyleError::Other)
    }

    fn dirty_variable(&mut self, name: &str) {
        self.variables.dirty(name);
    }

    fn is_variable_dirty(&self, name: &str) -> bool {
        self.variables.is_dirty(name)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/data/model.rs"]
mod tests;
