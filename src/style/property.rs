use std::collections::HashMap;
use std::collections::hash_map;
use std::fmt;
use std::sync::Arc;

use crate::effects::decl::EffectDeclarationList;
use crate::foundation::core::Colourb;
use crate::foundation::ids::PropertyId;

bitflags::bitflags! {
    /// Unit tag of a parsed value; composite masks describe what a parser accepts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Unit: u32 {
        const NUMBER = 1 << 0;
        const PX = 1 << 1;
        const PERCENT = 1 << 2;
        const EM = 1 << 3;
        const REM = 1 << 4;
        const VW = 1 << 5;
        const VH = 1 << 6;
        const DP = 1 << 7;
        const DEG = 1 << 8;
        const RAD = 1 << 9;
        const KEYWORD = 1 << 10;
        const STRING = 1 << 11;
        const COLOUR = 1 << 12;
        const EFFECTS = 1 << 13;

        const LENGTH = Self::PX.bits() | Self::EM.bits() | Self::REM.bits()
            | Self::VW.bits() | Self::VH.bits() | Self::DP.bits();
        const LENGTH_PERCENT = Self::LENGTH.bits() | Self::PERCENT.bits();
        const NUMBER_LENGTH_PERCENT = Self::NUMBER.bits() | Self::LENGTH_PERCENT.bits();
        const ANGLE = Self::DEG.bits() | Self::RAD.bits();
    }
}

impl Unit {
    /// CSS suffix of a single numeric unit; empty for plain numbers.
    pub fn suffix(self) -> &'static str {
        const SUFFIXES: &[(Unit, &str)] = &[
            (Unit::PX, "px"),
            (Unit::PERCENT, "%"),
            (Unit::EM, "em"),
            (Unit::REM, "rem"),
            (Unit::VW, "vw"),
            (Unit::VH, "vh"),
            (Unit::DP, "dp"),
            (Unit::DEG, "deg"),
            (Unit::RAD, "rad"),
        ];
        SUFFIXES
            .iter()
            .find(|(u, _)| *u == self)
            .map(|(_, s)| *s)
            .unwrap_or("")
    }

    pub(crate) fn from_suffix(suffix: &str) -> Option<Unit> {
        Some(match suffix.to_ascii_lowercase().as_str() {
            "" => Unit::NUMBER,
            "px" => Unit::PX,
            "%" => Unit::PERCENT,
            "em" => Unit::EM,
            "rem" => Unit::REM,
            "vw" => Unit::VW,
            "vh" => Unit::VH,
            "dp" => Unit::DP,
            "deg" => Unit::DEG,
            "rad" => Unit::RAD,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Number(f32),
    /// Index into the keyword list of the parser that produced it.
    Keyword(usize),
    String(String),
    Colour(Colourb),
    Effects(Arc<EffectDeclarationList>),
}

/// Where a declaration came from, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySource {
    pub path: String,
    pub line: u32,
    pub rule_name: String,
}

/// A parsed property value together with its cascade metadata.
///
/// Equality only compares the value and unit; specificity and source do not change what an
/// element renders.
#[derive(Debug, Clone)]
pub struct Property {
    pub value: PropertyValue,
    pub unit: Unit,
    pub specificity: i32,
    pub source: Option<Arc<PropertySource>>,
}

impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.unit == other.unit && self.value == other.value
    }
}

impl Property {
    pub fn new(value: PropertyValue, unit: Unit) -> Self {
        Self {
            value,
            unit,
            specificity: -1,
            source: None,
        }
    }

    pub fn number(value: f32, unit: Unit) -> Self {
        Self::new(PropertyValue::Number(value), unit)
    }

    pub fn keyword(index: usize) -> Self {
        Self::new(PropertyValue::Keyword(index), Unit::KEYWORD)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(PropertyValue::String(value.into()), Unit::STRING)
    }

    pub fn colour(value: Colourb) -> Self {
        Self::new(PropertyValue::Colour(value), Unit::COLOUR)
    }

    pub fn effects(list: EffectDeclarationList) -> Self {
        Self::new(PropertyValue::Effects(Arc::new(list)), Unit::EFFECTS)
    }

    pub fn with_specificity(mut self, specificity: i32) -> Self {
        self.specificity = specificity;
        self
    }

    pub fn as_number(&self) -> Option<f32> {
        match self.value {
            PropertyValue::Number(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_keyword(&self) -> Option<usize> {
        match self.value {
            PropertyValue::Keyword(k) => Some(k),
            _ => None,
        }
    }

    pub fn as_colour(&self) -> Option<Colourb> {
        match self.value {
            PropertyValue::Colour(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_effects(&self) -> Option<&Arc<EffectDeclarationList>> {
        match &self.value {
            PropertyValue::Effects(list) => Some(list),
            _ => None,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            PropertyValue::Number(v) => write!(f, "{v}{}", self.unit.suffix()),
            PropertyValue::Keyword(k) => write!(f, "keyword#{k}"),
            PropertyValue::String(s) => f.write_str(s),
            PropertyValue::Colour(c) => write!(f, "rgba({},{},{},{})", c.r, c.g, c.b, c.a),
            PropertyValue::Effects(list) => f.write_str(&list.value),
        }
    }
}

/// Declared properties of one rule or one element's inline style.
#[derive(Debug, Clone, Default)]
pub struct PropertyDictionary {
    properties: HashMap<PropertyId, Property>,
}

impl PropertyDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_property(&mut self, id: PropertyId, property: Property) {
        self.properties.insert(id, property);
    }

    pub fn remove_property(&mut self, id: PropertyId) -> Option<Property> {
        self.properties.remove(&id)
    }

    pub fn property(&self, id: PropertyId) -> Option<&Property> {
        self.properties.get(&id)
    }

    pub fn contains(&self, id: PropertyId) -> bool {
        self.properties.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, PropertyId, Property> {
        self.properties.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = PropertyId> + '_ {
        self.properties.keys().copied()
    }

    /// Merges `other` into `self`; an incoming property replaces an existing one unless the
    /// existing one has strictly higher specificity.
    pub fn import(&mut self, other: &PropertyDictionary) {
        for (&id, property) in &other.properties {
            match self.properties.get(&id) {
                Some(existing) if existing.specificity > property.specificity => {}
                _ => {
                    self.properties.insert(id, property.clone());
                }
            }
        }
    }

    pub fn set_source(&mut self, source: &Arc<PropertySource>) {
        for property in self.properties.values_mut() {
            property.source = Some(Arc::clone(source));
        }
    }
}

impl<'a> IntoIterator for &'a PropertyDictionary {
    type Item = (&'a PropertyId, &'a Property);
    type IntoIter = hash_map::Iter<'a, PropertyId, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/property.rs"]
mod tests;
