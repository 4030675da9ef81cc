use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use crate::effects::decl::{EffectDeclarationList, EffectListKind};
use crate::style::color::parse_colour;
use crate::style::property::{Property, Unit};

/// Keyword name -> keyword index, built from a parser's parameter string.
pub type ParameterMap = HashMap<String, usize>;

/// Plug-in contract for turning one declaration token into a [`Property`].
pub trait PropertyParser: Debug + Send + Sync {
    fn parse_value(&self, value: &str, parameters: &ParameterMap) -> Option<Property>;
}

/// Builds a keyword table from `"auto, scroll, hidden"`.
pub fn parse_parameters(parameters: &str) -> ParameterMap {
    parameters
        .split(',')
        .map(|p| p.trim().to_ascii_lowercase())
        .filter(|p| !p.is_empty())
        .enumerate()
        .map(|(i, p)| (p, i))
        .collect()
}

/// Numbers with an optional unit suffix, restricted to `units`.
#[derive(Debug, Clone, Copy)]
pub struct NumberParser {
    pub units: Unit,
    /// Unit given to a bare `0` when plain numbers are not accepted.
    pub zero_unit: Unit,
}

impl NumberParser {
    pub const fn new(units: Unit, zero_unit: Unit) -> Self {
        Self { units, zero_unit }
    }
}

impl PropertyParser for NumberParser {
    fn parse_value(&self, value: &str, _parameters: &ParameterMap) -> Option<Property> {
        let value = value.trim();
        let split = numeric_prefix_len(value)?;
        let number: f32 = value[..split].parse().ok()?;
        let mut unit = Unit::from_suffix(&value[split..])?;

        if unit == Unit::NUMBER && !self.units.contains(Unit::NUMBER) {
            if number == 0.0 && !self.zero_unit.is_empty() {
                unit = self.zero_unit;
            } else {
                return None;
            }
        }

        self.units
            .contains(unit)
            .then(|| Property::number(number, unit))
    }
}

fn numeric_prefix_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let digits_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
    }
    let has_digits = bytes[digits_start..i].iter().any(u8::is_ascii_digit);
    has_digits.then_some(i)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordParser;

impl PropertyParser for KeywordParser {
    fn parse_value(&self, value: &str, parameters: &ParameterMap) -> Option<Property> {
        parameters
            .get(&value.trim().to_ascii_lowercase())
            .map(|&index| Property::keyword(index))
    }
}

/// Accepts any text; surrounding quotes are stripped.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringParser;

impl PropertyParser for StringParser {
    fn parse_value(&self, value: &str, _parameters: &ParameterMap) -> Option<Property> {
        let v = value.trim();
        let unquoted = v
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .or_else(|| v.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
            .unwrap_or(v);
        Some(Property::string(unquoted))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ColourParser;

impl PropertyParser for ColourParser {
    fn parse_value(&self, value: &str, _parameters: &ParameterMap) -> Option<Property> {
        parse_colour(value).ok().map(Property::colour)
    }
}

/// Lists of named effects (`decorator`, `mask-image`, `filter`, `backdrop-filter`).
#[derive(Debug, Clone, Copy)]
pub struct EffectsParser {
    pub kind: EffectListKind,
}

impl PropertyParser for EffectsParser {
    fn parse_value(&self, value: &str, _parameters: &ParameterMap) -> Option<Property> {
        EffectDeclarationList::parse(value, self.kind).map(Property::effects)
    }
}

/// Named parsers available to property registrations.
#[derive(Debug, Clone, Default)]
pub struct ParserRegistry {
    parsers: HashMap<String, Arc<dyn PropertyParser>>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the stock parsers installed.
    pub fn with_defaults() -> Self {
        let mut r = Self::new();
        let numbers = [
            ("number", Unit::NUMBER, Unit::empty()),
            ("length", Unit::LENGTH, Unit::PX),
            ("length_percent", Unit::LENGTH_PERCENT, Unit::PX),
            ("number_length_percent", Unit::NUMBER_LENGTH_PERCENT, Unit::empty()),
            ("angle", Unit::ANGLE, Unit::RAD),
        ];
        for (name, units, zero_unit) in numbers {
            r.register(name, Arc::new(NumberParser::new(units, zero_unit)));
        }
        r.register("keyword", Arc::new(KeywordParser));
        r.register("string", Arc::new(StringParser));
        r.register("color", Arc::new(ColourParser));
        r.register(
            "decorator",
            Arc::new(EffectsParser {
                kind: EffectListKind::Decorator,
            }),
        );
        r.register(
            "filter",
            Arc::new(EffectsParser {
                kind: EffectListKind::Filter,
            }),
        );
        r
    }

    /// Replaces any parser already registered under `name`.
    pub fn register(&mut self, name: &str, parser: Arc<dyn PropertyParser>) {
        self.parsers.insert(name.to_ascii_lowercase(), parser);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn PropertyParser>> {
        self.parsers.get(&name.to_ascii_lowercase()).cloned()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/parsers.rs"]
mod tests;
