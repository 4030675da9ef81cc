use std::collections::HashMap;
use std::sync::Arc;

use crate::data::address::{RESERVED_NAMES, is_valid_name};
use crate::data::variant::{Variant, format_float};
use crate::foundation::error::{StyleError, StyleResult};

/// A filter receives the piped value first, followed by any call arguments.
pub type FilterFn = dyn Fn(&[Variant]) -> Variant + Send + Sync;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterId(pub u32);

/// Named transform functions usable as `value | name(args)` or `name(value, args)`.
#[derive(Clone, Default)]
pub struct FilterRegistry {
    ids: HashMap<String, FilterId>,
    filters: Vec<(String, Arc<FilterFn>)>,
}

impl std::fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.filters.iter().map(|(name, _)| name))
            .finish()
    }
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut r = Self::new();
        let builtins: [(&str, Arc<FilterFn>); 7] = [
            ("to_upper", Arc::new(|args: &[Variant]| map_string(args, str::to_uppercase))),
            ("to_lower", Arc::new(|args: &[Variant]| map_string(args, str::to_lowercase))),
            ("round", Arc::new(|args: &[Variant]| map_number(args, f64::round))),
            ("floor", Arc::new(|args: &[Variant]| map_number(args, f64::floor))),
            ("ceil", Arc::new(|args: &[Variant]| map_number(args, f64::ceil))),
            ("abs", Arc::new(|args: &[Variant]| map_number(args, f64::abs))),
            ("format", Arc::new(format_filter)),
        ];
        for (name, f) in builtins {
            r.insert(name, f);
        }
        r
    }

    /// Registers a filter; re-registering a name replaces it and keeps its id.
    pub fn register(
        &mut self,
        name: &str,
        filter: impl Fn(&[Variant]) -> Variant + Send + Sync + 'static,
    ) -> StyleResult<FilterId> {
        if !is_valid_name(name) || RESERVED_NAMES.contains(&name) {
            return Err(StyleError::registration(format!(
                "'{name}' cannot be used as a filter name"
            )));
        }
        Ok(self.insert(name, Arc::new(filter)))
    }

    fn insert(&mut self, name: &str, filter: Arc<FilterFn>) -> FilterId {
        if let Some(&id) = self.ids.get(name) {
            tracing::warn!(name, "replacing data filter");
            self.filters[id.0 as usize].1 = filter;
            return id;
        }
        let id = FilterId(self.filters.len() as u32);
        self.filters.push((name.to_owned(), filter));
        self.ids.insert(name.to_owned(), id);
        id
    }

    pub fn get_id(&self, name: &str) -> Option<FilterId> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, id: FilterId) -> Option<&str> {
        self.filters.get(id.0 as usize).map(|(n, _)| n.as_str())
    }

    pub fn call(&self, id: FilterId, args: &[Variant]) -> StyleResult<Variant> {
        let (_, f) = self
            .filters
            .get(id.0 as usize)
            .ok_or_else(|| StyleError::evaluation(format!("unknown filter id {}", id.0)))?;
        Ok(f(args))
    }
}

fn map_string(args: &[Variant], f: impl Fn(&str) -> String) -> Variant {
    match args.first() {
        Some(v) => Variant::String(f(&v.to_string())),
        None => Variant::Empty,
    }
}

fn map_number(args: &[Variant], f: impl Fn(f64) -> f64) -> Variant {
    match args.first() {
        Some(v) => Variant::Float(f(v.to_f64())),
        None => Variant::Empty,
    }
}

/// `value | format(precision = 0, trim_trailing_zeros = false)`.
fn format_filter(args: &[Variant]) -> Variant {
    let Some(value) = args.first() else {
        return Variant::Empty;
    };
    let precision = args.get(1).map_or(0, |p| p.to_i64().clamp(0, 32) as usize);
    let trim = args.get(2).is_some_and(Variant::to_bool);
    Variant::String(format_float(value.to_f64(), precision, trim))
}

#[cfg(test)]
#[path = "../../tests/unit/data/filters.rs"]
mod tests;
