use std::sync::Arc;

use crate::foundation::ids::{PropertyId, ShorthandId};
use crate::style::parsers::{ParameterMap, PropertyParser, parse_parameters};
use crate::style::property::Property;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PropertyFlags: u8 {
        /// Children take the parent's computed value when they declare nothing.
        const INHERITED = 1 << 0;
        /// A change requires the element to be laid out again.
        const FORCES_LAYOUT = 1 << 1;
    }
}

#[derive(Debug, Clone)]
struct ParserEntry {
    parser: Arc<dyn PropertyParser>,
    parameters: ParameterMap,
}

/// Registered property: default, flags and the ordered parsers its values go through.
#[derive(Debug, Clone)]
pub struct PropertyDefinition {
    id: PropertyId,
    default_text: String,
    default_value: Option<Property>,
    flags: PropertyFlags,
    parsers: Vec<ParserEntry>,
}

impl PropertyDefinition {
    pub(crate) fn new(id: PropertyId, default_text: &str, flags: PropertyFlags) -> Self {
        Self {
            id,
            default_text: default_text.to_owned(),
            default_value: None,
            flags,
            parsers: Vec::new(),
        }
    }

    /// Appends a parser. The default value is (re)parsed until one of the parsers accepts it.
    pub fn add_parser(&mut self, parser: Arc<dyn PropertyParser>, parameters: &str) -> &mut Self {
        self.parsers.push(ParserEntry {
            parser,
            parameters: parse_parameters(parameters),
        });

        if self.default_value.is_none() {
            self.default_value = self.parse_value(&self.default_text);
        }
        self
    }

    /// First parser to accept `value` wins.
    pub fn parse_value(&self, value: &str) -> Option<Property> {
        self.parsers
            .iter()
            .find_map(|entry| entry.parser.parse_value(value, &entry.parameters))
    }

    pub fn id(&self) -> PropertyId {
        self.id
    }

    pub fn default_value(&self) -> Option<&Property> {
        self.default_value.as_ref()
    }

    pub fn default_text(&self) -> &str {
        &self.default_text
    }

    pub fn is_inherited(&self) -> bool {
        self.flags.contains(PropertyFlags::INHERITED)
    }

    pub fn is_layout_forcing(&self) -> bool {
        self.flags.contains(PropertyFlags::FORCES_LAYOUT)
    }

    pub fn flags(&self) -> PropertyFlags {
        self.flags
    }
}

/// Expansion strategy of a shorthand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShorthandType {
    /// Each value goes to the first remaining item that parses it; unmatched items stay unset.
    FallThrough,
    /// Values are assigned in order; trailing items repeat the last value.
    Replicate,
    /// CSS top/right/bottom/left expansion of 1 to 4 values.
    Box,
    /// Every item parses the full value; may contain shorthands.
    Recursive,
    /// Comma groups are assigned to items in order; may contain shorthands.
    RecursiveCommaSeparated,
    /// `flex: <grow> <shrink> <basis>` with `none` and omitted-value defaults.
    Flex,
}

impl ShorthandType {
    pub fn allows_nested_shorthands(self) -> bool {
        matches!(self, Self::Recursive | Self::RecursiveCommaSeparated)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShorthandTarget {
    Property(PropertyId),
    Shorthand(ShorthandId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShorthandItem {
    pub target: ShorthandTarget,
    /// Declared with a `?` suffix.
    pub optional: bool,
    /// Declared with a `#` suffix; swallows every remaining value.
    pub repeats: bool,
}

#[derive(Debug, Clone)]
pub struct ShorthandDefinition {
    pub id: ShorthandId,
    pub items: Vec<ShorthandItem>,
    pub ty: ShorthandType,
}
