use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Dense integer id with a reserved `INVALID` value at index 0.
pub trait Identifier: Copy + Eq + Hash + Debug {
    const INVALID: Self;

    fn from_index(index: u32) -> Self;

    fn index(self) -> u32;
}

const INVALID_NAME: &str = "invalid";

/// Bidirectional name <-> id map for one identifier space.
///
/// Names are lower-cased on the way in, so lookups are case-insensitive. Ids are never
/// reclaimed; every id in `[0, len())` has exactly one name.
#[derive(Debug, Clone)]
pub struct IdNameMap<Id: Identifier> {
    ids_by_name: HashMap<String, Id>,
    names_by_id: Vec<String>,
}

impl<Id: Identifier> IdNameMap<Id> {
    /// Builds a map seeded with the statically known ids.
    ///
    /// Slots in `[1, first_custom)` that the table does not cover keep an empty name until
    /// filled by [`add_pair`](Self::add_pair).
    pub fn with_builtins(builtins: &[(&str, Id)], first_custom: u32) -> Self {
        let mut map = Self {
            ids_by_name: HashMap::with_capacity(builtins.len()),
            names_by_id: vec![String::new(); first_custom.max(1) as usize],
        };
        map.names_by_id[0] = INVALID_NAME.to_owned();
        for &(name, id) in builtins {
            map.add_pair(id, name);
        }
        map
    }

    pub fn add_pair(&mut self, id: Id, name: &str) {
        let name = name.to_ascii_lowercase();
        let index = id.index() as usize;
        if index >= self.names_by_id.len() {
            self.names_by_id.resize(index + 1, String::new());
        }
        self.names_by_id[index] = name.clone();
        self.ids_by_name.insert(name, id);
    }

    /// Returns `INVALID` for names that were never registered.
    pub fn get_id(&self, name: &str) -> Id {
        self.ids_by_name
            .get(&name.to_ascii_lowercase())
            .copied()
            .unwrap_or(Id::INVALID)
    }

    pub fn get_or_create_id(&mut self, name: &str) -> Id {
        let name = name.to_ascii_lowercase();
        if let Some(&id) = self.ids_by_name.get(&name) {
            return id;
        }
        let next = u32::try_from(self.names_by_id.len()).unwrap_or(u32::MAX);
        let id = Id::from_index(next);
        tracing::trace!(name = %name, id = next, "registered custom id");
        self.names_by_id.push(name.clone());
        self.ids_by_name.insert(name, id);
        id
    }

    /// Out-of-range ids resolve to the name of `INVALID`.
    pub fn get_name(&self, id: Id) -> &str {
        self.names_by_id
            .get(id.index() as usize)
            .unwrap_or(&self.names_by_id[0])
    }

    /// Next id `get_or_create_id` would hand out.
    pub fn len(&self) -> usize {
        self.names_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names_by_id.len() <= 1
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/id_name_map.rs"]
mod tests;
