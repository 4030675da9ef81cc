use std::collections::HashSet;

use crate::foundation::ids::{NUM_DEFINED_PROPERTY_IDS, PropertyId};

const WORDS: usize = (NUM_DEFINED_PROPERTY_IDS as usize).div_ceil(64);

/// Set of property ids: an inline bitset for built-in ids plus a hash set for custom ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyIdSet {
    defined: [u64; WORDS],
    custom: HashSet<PropertyId>,
}

impl PropertyIdSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: PropertyId) {
        if id.is_builtin() {
            let i = id.0 as usize;
            self.defined[i / 64] |= 1 << (i % 64);
        } else {
            self.custom.insert(id);
        }
    }

    pub fn remove(&mut self, id: PropertyId) {
        if id.is_builtin() {
            let i = id.0 as usize;
            self.defined[i / 64] &= !(1 << (i % 64));
        } else {
            self.custom.remove(&id);
        }
    }

    pub fn contains(&self, id: PropertyId) -> bool {
        if id.is_builtin() {
            let i = id.0 as usize;
            self.defined[i / 64] & (1 << (i % 64)) != 0
        } else {
            self.custom.contains(&id)
        }
    }

    pub fn clear(&mut self) {
        self.defined = [0; WORDS];
        self.custom.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.defined.iter().all(|w| *w == 0) && self.custom.is_empty()
    }

    pub fn len(&self) -> usize {
        self.defined
            .iter()
            .map(|w| w.count_ones() as usize)
            .sum::<usize>()
            + self.custom.len()
    }

    pub fn union_with(&mut self, other: &PropertyIdSet) {
        for (a, b) in self.defined.iter_mut().zip(other.defined.iter()) {
            *a |= *b;
        }
        self.custom.extend(other.custom.iter().copied());
    }

    pub fn intersection(&self, other: &PropertyIdSet) -> PropertyIdSet {
        let mut out = PropertyIdSet::new();
        for (o, (a, b)) in out
            .defined
            .iter_mut()
            .zip(self.defined.iter().zip(other.defined.iter()))
        {
            *o = *a & *b;
        }
        out.custom = self.custom.intersection(&other.custom).copied().collect();
        out
    }

    /// Built-in ids in ascending order, then custom ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = PropertyId> + '_ {
        let defined = (0..NUM_DEFINED_PROPERTY_IDS)
            .map(PropertyId)
            .filter(|id| self.contains(*id));
        let mut custom: Vec<PropertyId> = self.custom.iter().copied().collect();
        custom.sort_unstable();
        defined.chain(custom)
    }

    pub(crate) fn fill_defined(&mut self) {
        let n = NUM_DEFINED_PROPERTY_IDS as usize;
        for (w, word) in self.defined.iter_mut().enumerate() {
            let bits = n.saturating_sub(w * 64).min(64);
            *word = if bits == 64 { u64::MAX } else { (1u64 << bits) - 1 };
        }
    }
}

impl FromIterator<PropertyId> for PropertyIdSet {
    fn from_iter<T: IntoIterator<Item = PropertyId>>(iter: T) -> Self {
        let mut set = PropertyIdSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

/// Properties awaiting recomputation, accumulated between style passes.
///
/// Bit 0 (the `INVALID` id) doubles as the "everything is dirty" flag so a structural change
/// does not have to enumerate every registered property.
#[derive(Debug, Clone, Default)]
pub struct DirtyPropertyList {
    dirty: PropertyIdSet,
}

impl DirtyPropertyList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: PropertyId) {
        if self.is_all_dirty() {
            return;
        }
        self.dirty.insert(id);
    }

    pub fn insert_set(&mut self, ids: &PropertyIdSet) {
        if self.is_all_dirty() {
            return;
        }
        self.dirty.union_with(ids);
    }

    pub fn dirty_all(&mut self) {
        self.dirty.fill_defined();
    }

    pub fn is_all_dirty(&self) -> bool {
        self.dirty.contains(PropertyId::INVALID)
    }

    /// Always true while the all-dirty flag is set, including for ids registered afterwards.
    pub fn contains(&self, id: PropertyId) -> bool {
        self.is_all_dirty() || self.dirty.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.dirty.is_empty()
    }

    pub fn clear(&mut self) {
        self.dirty.clear();
    }

    /// Materializes the dirty ids; the all-dirty case yields every id in `registered`.
    pub fn to_property_list(&self, registered: &PropertyIdSet) -> PropertyIdSet {
        if self.is_all_dirty() {
            return registered.clone();
        }
        self.dirty.clone()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/dirty.rs"]
mod tests;
