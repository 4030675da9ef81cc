use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::foundation::error::StyleResult;
use crate::foundation::ids::PropertyId;
use crate::style::dirty::{DirtyPropertyList, PropertyIdSet};
use crate::style::iterator::{
    PropertiesIterator, PseudoClassList, PseudoClassPropertyMap, PseudoClassRule,
    first_applicable_rule,
};
use crate::style::property::{Property, PropertyDictionary};
use crate::style::specification::PropertySpecification;

/// Style sheet rules matched to one kind of element, shared between elements.
#[derive(Debug, Clone, Default)]
pub struct ElementDefinition {
    properties: PropertyDictionary,
    pseudo_class_properties: PseudoClassPropertyMap,
}

impl ElementDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule. Rules without pseudo-classes merge into the base properties; gated rules
    /// are kept per property, most specific first.
    pub fn add_rule(
        &mut self,
        pseudo_classes: &[&str],
        properties: &PropertyDictionary,
        specificity: i32,
    ) {
        if pseudo_classes.is_empty() {
            let mut weighted = PropertyDictionary::new();
            for (&id, property) in properties {
                weighted.set_property(id, property.clone().with_specificity(specificity));
            }
            self.properties.import(&weighted);
            return;
        }

        let classes: PseudoClassList = pseudo_classes.iter().map(|s| (*s).to_owned()).collect();
        for (&id, property) in properties {
            let rules = self.pseudo_class_properties.entry(id).or_default();
            rules.push(PseudoClassRule {
                pseudo_classes: classes.clone(),
                property: property.clone().with_specificity(specificity),
            });
            rules.sort_by(|a, b| b.property.specificity.cmp(&a.property.specificity));
        }
    }

    pub fn properties(&self) -> &PropertyDictionary {
        &self.properties
    }

    pub fn pseudo_class_properties(&self) -> &PseudoClassPropertyMap {
        &self.pseudo_class_properties
    }

    /// Best matching rule value for `id` under the given pseudo-classes.
    pub fn property(&self, id: PropertyId, active: &HashSet<String>) -> Option<&Property> {
        if !active.is_empty()
            && let Some(rules) = self.pseudo_class_properties.get(&id)
            && let Some(rule) = first_applicable_rule(rules, active)
        {
            return Some(&rule.property);
        }
        self.properties.property(id)
    }

    /// Every property id this definition can supply.
    pub fn defined_ids(&self) -> PropertyIdSet {
        self.properties
            .ids()
            .chain(self.pseudo_class_properties.keys().copied())
            .collect()
    }

    /// Properties whose value may depend on `pseudo_class`.
    pub fn ids_gated_by(&self, pseudo_class: &str) -> PropertyIdSet {
        self.pseudo_class_properties
            .iter()
            .filter(|(_, rules)| {
                rules
                    .iter()
                    .any(|r| r.pseudo_classes.iter().any(|pc| pc == pseudo_class))
            })
            .map(|(&id, _)| id)
            .collect()
    }
}

/// Per-element cascade state: inline declarations, active pseudo-classes, the shared
/// definition, and the computed values produced by the last pass.
#[derive(Debug, Clone)]
pub struct ElementStyle {
    inline: PropertyDictionary,
    definition: Option<Arc<ElementDefinition>>,
    pseudo_classes: HashSet<String>,
    dirty: DirtyPropertyList,
    computed: HashMap<PropertyId, Property>,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementStyle {
    /// A fresh element has nothing computed yet, so everything starts dirty.
    pub fn new() -> Self {
        let mut dirty = DirtyPropertyList::new();
        dirty.dirty_all();
        Self {
            inline: PropertyDictionary::new(),
            definition: None,
            pseudo_classes: HashSet::new(),
            dirty,
            computed: HashMap::new(),
        }
    }

    pub fn set_property(&mut self, id: PropertyId, property: Property) {
        if id == PropertyId::INVALID {
            tracing::warn!("ignoring inline property with an invalid id");
            return;
        }
        self.inline.set_property(id, property);
        self.dirty.insert(id);
    }

    /// Parses a declaration (property or shorthand) into the inline style.
    pub fn set_property_text(
        &mut self,
        spec: &PropertySpecification,
        name: &str,
        value: &str,
    ) -> StyleResult<()> {
        let mut parsed = PropertyDictionary::new();
        spec.parse_property_declaration(&mut parsed, name, value)
            .inspect_err(|err| tracing::warn!(%err, name, value, "inline declaration rejected"))?;
        for (&id, property) in &parsed {
            self.set_property(id, property.clone());
        }
        Ok(())
    }

    pub fn remove_property(&mut self, id: PropertyId) {
        if self.inline.remove_property(id).is_some() {
            self.dirty.insert(id);
        }
    }

    pub fn inline_properties(&self) -> &PropertyDictionary {
        &self.inline
    }

    /// Swaps the matched definition, dirtying every property either one could supply.
    pub fn set_definition(&mut self, definition: Option<Arc<ElementDefinition>>) {
        let unchanged = match (&self.definition, &definition) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }

        if let Some(old) = &self.definition {
            self.dirty.insert_set(&old.defined_ids());
        }
        if let Some(new) = &definition {
            self.dirty.insert_set(&new.defined_ids());
        }
        self.definition = definition;
    }

    pub fn definition(&self) -> Option<&Arc<ElementDefinition>> {
        self.definition.as_ref()
    }

    /// Returns `true` if the pseudo-class state changed.
    pub fn set_pseudo_class(&mut self, pseudo_class: &str, active: bool) -> bool {
        let changed = if active {
            self.pseudo_classes.insert(pseudo_class.to_owned())
        } else {
            self.pseudo_classes.remove(pseudo_class)
        };
        if changed && let Some(definition) = &self.definition {
            let gated = definition.ids_gated_by(pseudo_class);
            self.dirty.insert_set(&gated);
        }
        changed
    }

    pub fn is_pseudo_class_set(&self, pseudo_class: &str) -> bool {
        self.pseudo_classes.contains(pseudo_class)
    }

    pub fn active_pseudo_classes(&self) -> &HashSet<String> {
        &self.pseudo_classes
    }

    /// Inline value, else the best matching definition value.
    pub fn local_property(&self, id: PropertyId) -> Option<&Property> {
        self.inline.property(id).or_else(|| {
            self.definition
                .as_deref()
                .and_then(|d| d.property(id, &self.pseudo_classes))
        })
    }

    pub fn iterate(&self) -> PropertiesIterator<'_> {
        let definition = self.definition.as_deref();
        PropertiesIterator::new(
            Some(&self.inline),
            definition.map(ElementDefinition::pseudo_class_properties),
            definition.map(ElementDefinition::properties),
            &self.pseudo_classes,
        )
    }

    pub fn dirty_property(&mut self, id: PropertyId) {
        self.dirty.insert(id);
    }

    pub fn dirty_properties(&mut self, ids: &PropertyIdSet) {
        self.dirty.insert_set(ids);
    }

    /// Called when the parent's inherited values may have changed wholesale.
    pub fn dirty_inherited_properties(&mut self, spec: &PropertySpecification) {
        self.dirty.insert_set(spec.inherited_properties());
    }

    pub fn dirty_all(&mut self) {
        self.dirty.dirty_all();
    }

    pub fn any_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn is_dirty(&self, id: PropertyId) -> bool {
        self.dirty.contains(id)
    }

    pub fn computed(&self, id: PropertyId) -> Option<&Property> {
        self.computed.get(&id)
    }

    /// Resolves every dirty property and clears the dirty list.
    ///
    /// Resolution order is local value, then the parent's computed value for inherited
    /// properties, then the registered default. Returns the ids whose computed value changed;
    /// intersect with the inherited set to find what children must recompute.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn compute_values(
        &mut self,
        spec: &PropertySpecification,
        parent: Option<&ElementStyle>,
    ) -> PropertyIdSet {
        let mut changed = PropertyIdSet::new();
        if self.dirty.is_empty() {
            return changed;
        }

        let mut ids = self.dirty.to_property_list(spec.registered_properties());
        if self.dirty.is_all_dirty() {
            // Custom ids set inline but never registered still resolve from their local value.
            ids.union_with(&self.inline.ids().collect());
        }

        let mut local: HashMap<PropertyId, Property> = HashMap::new();
        for entry in self.iterate() {
            if ids.contains(entry.id) {
                local.insert(entry.id, entry.property.clone());
            }
        }

        for id in ids.iter() {
            let definition = spec.property(id);
            let resolved = local.remove(&id).or_else(|| {
                let definition = definition?;
                let inherited = definition
                    .is_inherited()
                    .then(|| parent.and_then(|p| p.computed(id)).cloned())
                    .flatten();
                inherited.or_else(|| definition.default_value().cloned())
            });

            match resolved {
                Some(value) => {
                    if self.computed.get(&id) != Some(&value) {
                        changed.insert(id);
                    }
                    self.computed.insert(id, value);
                }
                None => {
                    if self.computed.remove(&id).is_some() {
                        changed.insert(id);
                    }
                }
            }
        }

        self.dirty.clear();
        tracing::trace!(changed = changed.len(), "computed style values");
        changed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/element_style.rs"]
mod tests;
