use std::collections::{HashMap, HashSet, hash_map};

use smallvec::SmallVec;

use crate::foundation::ids::PropertyId;
use crate::style::dirty::PropertyIdSet;
use crate::style::property::{Property, PropertyDictionary};

pub type PseudoClassList = SmallVec<[String; 2]>;

/// A declaration gated by a set of pseudo-classes that must all be active.
#[derive(Debug, Clone, PartialEq)]
pub struct PseudoClassRule {
    pub pseudo_classes: PseudoClassList,
    pub property: Property,
}

/// Per-property pseudo-class rules, each list ordered by descending specificity.
pub type PseudoClassPropertyMap = HashMap<PropertyId, Vec<PseudoClassRule>>;

/// A rule applies when every pseudo-class it names is currently active.
pub fn is_pseudo_class_rule_applicable(rule: &[String], active: &HashSet<String>) -> bool {
    rule.iter().all(|pc| active.contains(pc))
}

/// Most specific rule in `rules` that applies under `active`.
pub fn first_applicable_rule<'r>(
    rules: &'r [PseudoClassRule],
    active: &HashSet<String>,
) -> Option<&'r PseudoClassRule> {
    rules
        .iter()
        .find(|r| is_pseudo_class_rule_applicable(&r.pseudo_classes, active))
}

#[derive(Debug, Clone, Copy)]
pub struct PropertyEntry<'a> {
    pub id: PropertyId,
    pub property: &'a Property,
    /// Pseudo-classes of the rule that supplied the value, if it came from one.
    pub pseudo_classes: Option<&'a [String]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Style,
    Pseudo,
    Base,
    Done,
}

/// Walks inline style, matching pseudo-class rules and base rules in that priority order,
/// yielding each property id once from the highest-priority source that declares it.
pub struct PropertiesIterator<'a> {
    style: Option<hash_map::Iter<'a, PropertyId, Property>>,
    pseudo: Option<hash_map::Iter<'a, PropertyId, Vec<PseudoClassRule>>>,
    base: Option<hash_map::Iter<'a, PropertyId, Property>>,
    active: &'a HashSet<String>,
    phase: Phase,
    seen: PropertyIdSet,
    current: Option<PropertyEntry<'a>>,
}

impl<'a> PropertiesIterator<'a> {
    pub fn new(
        style: Option<&'a PropertyDictionary>,
        pseudo: Option<&'a PseudoClassPropertyMap>,
        base: Option<&'a PropertyDictionary>,
        active: &'a HashSet<String>,
    ) -> Self {
        // No rule can match without an active pseudo-class.
        let pseudo = pseudo.filter(|_| !active.is_empty());

        let mut it = Self {
            style: style.map(PropertyDictionary::iter),
            pseudo: pseudo.map(HashMap::iter),
            base: base.map(PropertyDictionary::iter),
            active,
            phase: Phase::Style,
            seen: PropertyIdSet::new(),
            current: None,
        };
        it.current = it.advance();
        it
    }

    pub fn at_end(&self) -> bool {
        self.current.is_none()
    }

    pub fn peek(&self) -> Option<&PropertyEntry<'a>> {
        self.current.as_ref()
    }

    fn advance(&mut self) -> Option<PropertyEntry<'a>> {
        loop {
            let candidate = match self.phase {
                Phase::Style => next_plain_entry(&mut self.style),
                Phase::Pseudo => self.next_pseudo_entry(),
                Phase::Base => next_plain_entry(&mut self.base),
                Phase::Done => return None,
            };

            match candidate {
                Some(entry) if self.seen.contains(entry.id) => continue,
                Some(entry) => {
                    self.seen.insert(entry.id);
                    return Some(entry);
                }
                None => {
                    self.phase = match self.phase {
                        Phase::Style => Phase::Pseudo,
                        Phase::Pseudo => Phase::Base,
                        Phase::Base | Phase::Done => Phase::Done,
                    };
                }
            }
        }
    }

    fn next_pseudo_entry(&mut self) -> Option<PropertyEntry<'a>> {
        let active = self.active;
        self.pseudo.as_mut()?.find_map(|(&id, rules)| {
            let rule = first_applicable_rule(rules, active)?;
            Some(PropertyEntry {
                id,
                property: &rule.property,
                pseudo_classes: Some(&rule.pseudo_classes[..]),
            })
        })
    }
}

fn next_plain_entry<'a>(
    it: &mut Option<hash_map::Iter<'a, PropertyId, Property>>,
) -> Option<PropertyEntry<'a>> {
    let (&id, property) = it.as_mut()?.next()?;
    Some(PropertyEntry {
        id,
        property,
        pseudo_classes: None,
    })
}

impl<'a> Iterator for PropertiesIterator<'a> {
    type Item = PropertyEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let out = self.current.take()?;
        self.current = self.advance();
        Some(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/iterator.rs"]
mod tests;
