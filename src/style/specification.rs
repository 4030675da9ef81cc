use crate::foundation::error::{StyleError, StyleResult};
use crate::foundation::id_name_map::IdNameMap;
use crate::foundation::ids::{
    BUILTIN_PROPERTIES, BUILTIN_SHORTHANDS, FIRST_CUSTOM_PROPERTY_ID, FIRST_CUSTOM_SHORTHAND_ID,
    PropertyId, ShorthandId,
};
use crate::style::definition::{
    PropertyDefinition, PropertyFlags, ShorthandDefinition, ShorthandItem, ShorthandTarget,
    ShorthandType,
};
use crate::style::dirty::PropertyIdSet;
use crate::style::property::PropertyDictionary;

/// How [`split_property_values`] breaks a declaration apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitOption {
    /// Keep the value whole (a `;` still terminates it).
    None,
    Whitespace,
    Comma,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum SplitState {
    Value,
    Parenthesis,
    Quote,
    QuoteEscapeNext,
}

/// Tokenizes a declaration value.
///
/// Parenthesized groups and double-quoted strings are never split. Quotes delimit tokens when
/// splitting on whitespace and are kept when splitting on commas. A value left inside an
/// unclosed group or quote is dropped.
pub fn split_property_values(values: &str, split: SplitOption) -> Vec<String> {
    let mut out = Vec::new();
    let mut value = String::new();
    let mut state = SplitState::Value;
    let mut open_parentheses = 0u32;

    fn submit(out: &mut Vec<String>, value: &mut String) {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            out.push(trimmed.to_owned());
        }
        value.clear();
    }

    for c in values.chars() {
        match state {
            SplitState::Value => {
                let is_separator = match split {
                    SplitOption::Comma => c == ',',
                    SplitOption::Whitespace | SplitOption::None => c.is_whitespace(),
                };
                if c == ';' {
                    submit(&mut out, &mut value);
                } else if is_separator {
                    if split == SplitOption::None {
                        value.push(c);
                    } else {
                        submit(&mut out, &mut value);
                    }
                } else if c == '"' {
                    state = SplitState::Quote;
                    match split {
                        SplitOption::Whitespace => submit(&mut out, &mut value),
                        SplitOption::Comma => value.push('"'),
                        SplitOption::None => value.push(' '),
                    }
                } else if c == '(' {
                    open_parentheses = 1;
                    value.push(c);
                    state = SplitState::Parenthesis;
                } else {
                    value.push(c);
                }
            }
            SplitState::Parenthesis => {
                if c == '(' {
                    open_parentheses += 1;
                } else if c == ')' {
                    open_parentheses -= 1;
                    if open_parentheses == 0 {
                        state = SplitState::Value;
                    }
                } else if c == '"' {
                    state = SplitState::Quote;
                }
                value.push(c);
            }
            SplitState::Quote => {
                if c == '"' {
                    if open_parentheses == 0 {
                        state = SplitState::Value;
                        match split {
                            SplitOption::Whitespace => submit(&mut out, &mut value),
                            SplitOption::Comma => value.push('"'),
                            SplitOption::None => value.push(' '),
                        }
                    } else {
                        state = SplitState::Parenthesis;
                        value.push(c);
                    }
                } else if c == '\\' {
                    state = SplitState::QuoteEscapeNext;
                } else {
                    value.push(c);
                }
            }
            SplitState::QuoteEscapeNext => {
                if c != '"' && c != '\\' {
                    value.push('\\');
                }
                value.push(c);
                state = SplitState::Quote;
            }
        }
    }

    if state == SplitState::Value {
        submit(&mut out, &mut value);
    }
    out
}

/// Registry of property and shorthand definitions plus the declaration parsers built on them.
#[derive(Debug, Clone)]
pub struct PropertySpecification {
    property_map: IdNameMap<PropertyId>,
    shorthand_map: IdNameMap<ShorthandId>,
    properties: Vec<Option<PropertyDefinition>>,
    shorthands: Vec<Option<ShorthandDefinition>>,
    property_ids: PropertyIdSet,
    inherited_ids: PropertyIdSet,
    layout_forcing_ids: PropertyIdSet,
}

impl Default for PropertySpecification {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertySpecification {
    /// Empty specification whose name maps already know the built-in ids.
    pub fn new() -> Self {
        Self {
            property_map: IdNameMap::with_builtins(BUILTIN_PROPERTIES, FIRST_CUSTOM_PROPERTY_ID),
            shorthand_map: IdNameMap::with_builtins(BUILTIN_SHORTHANDS, FIRST_CUSTOM_SHORTHAND_ID),
            properties: Vec::new(),
            shorthands: Vec::new(),
            property_ids: PropertyIdSet::new(),
            inherited_ids: PropertyIdSet::new(),
            layout_forcing_ids: PropertyIdSet::new(),
        }
    }

    /// Registers a property. With `id == INVALID` the id comes from the name map, creating a
    /// custom id for unknown names.
    pub fn register_property(
        &mut self,
        name: &str,
        default_value: &str,
        flags: PropertyFlags,
        id: PropertyId,
    ) -> StyleResult<&mut PropertyDefinition> {
        let id = if id == PropertyId::INVALID {
            self.property_map.get_or_create_id(name)
        } else {
            self.property_map.add_pair(id, name);
            id
        };

        let index = id.0 as usize;
        if index >= self.properties.len() {
            self.properties.resize_with((index * 3) / 2 + 1, || None);
        }
        if self.properties[index].is_some() {
            tracing::error!(property = name, "property is already registered");
            return Err(StyleError::registration(format!(
                "property '{name}' is already registered"
            )));
        }

        self.property_ids.insert(id);
        if flags.contains(PropertyFlags::INHERITED) {
            self.inherited_ids.insert(id);
        }
        if flags.contains(PropertyFlags::FORCES_LAYOUT) {
            self.layout_forcing_ids.insert(id);
        }

        let definition = PropertyDefinition::new(id, default_value, flags);
        Ok(self.properties[index].insert(definition))
    }

    pub fn property(&self, id: PropertyId) -> Option<&PropertyDefinition> {
        if id == PropertyId::INVALID {
            return None;
        }
        self.properties.get(id.0 as usize)?.as_ref()
    }

    pub fn property_by_name(&self, name: &str) -> Option<&PropertyDefinition> {
        self.property(self.property_map.get_id(name))
    }

    /// Registers a shorthand over a comma separated list of property or shorthand names.
    ///
    /// A name may carry a `?` (optional) or `#` (repeats) suffix. Only the recursive types may
    /// reference other shorthands.
    pub fn register_shorthand(
        &mut self,
        name: &str,
        property_names: &str,
        ty: ShorthandType,
        id: ShorthandId,
    ) -> StyleResult<ShorthandId> {
        let mut items = Vec::new();
        for raw in property_names
            .split(',')
            .map(|s| s.trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
        {
            let mut item_name = raw.as_str();
            let optional = item_name.ends_with('?');
            if optional {
                item_name = &item_name[..item_name.len() - 1];
            }
            let repeats = item_name.ends_with('#');
            if repeats {
                item_name = &item_name[..item_name.len() - 1];
            }

            let property_id = self.property_map.get_id(item_name);
            let target = if self.property(property_id).is_some() {
                Some(ShorthandTarget::Property(property_id))
            } else {
                let shorthand_id = self.shorthand_map.get_id(item_name);
                (ty.allows_nested_shorthands() && self.shorthand(shorthand_id).is_some())
                    .then_some(ShorthandTarget::Shorthand(shorthand_id))
            };

            let Some(target) = target else {
                tracing::error!(
                    shorthand = name,
                    item = item_name,
                    "shorthand registered with invalid property"
                );
                return Err(StyleError::registration(format!(
                    "shorthand '{name}' was registered with invalid property '{item_name}'"
                )));
            };
            items.push(ShorthandItem {
                target,
                optional,
                repeats,
            });
        }

        if ty == ShorthandType::Flex && items.len() != 3 {
            return Err(StyleError::registration(format!(
                "flex shorthand '{name}' must list exactly three properties"
            )));
        }
        if ty == ShorthandType::Box && items.len() != 4 {
            return Err(StyleError::registration(format!(
                "box shorthand '{name}' must list exactly four properties"
            )));
        }

        let id = if id == ShorthandId::INVALID {
            self.shorthand_map.get_or_create_id(name)
        } else {
            self.shorthand_map.add_pair(id, name);
            id
        };

        let index = id.0 as usize;
        if index >= self.shorthands.len() {
            self.shorthands.resize_with((index * 3) / 2 + 1, || None);
        }
        if self.shorthands[index].is_some() {
            tracing::error!(shorthand = name, "shorthand already exists");
            return Err(StyleError::registration(format!(
                "shorthand '{name}' already exists"
            )));
        }
        self.shorthands[index] = Some(ShorthandDefinition { id, items, ty });
        Ok(id)
    }

    pub fn shorthand(&self, id: ShorthandId) -> Option<&ShorthandDefinition> {
        if id == ShorthandId::INVALID {
            return None;
        }
        self.shorthands.get(id.0 as usize)?.as_ref()
    }

    pub fn shorthand_by_name(&self, name: &str) -> Option<&ShorthandDefinition> {
        self.shorthand(self.shorthand_map.get_id(name))
    }

    /// Parses `name: value` into `dictionary`, trying properties before shorthands.
    pub fn parse_property_declaration(
        &self,
        dictionary: &mut PropertyDictionary,
        name: &str,
        value: &str,
    ) -> StyleResult<()> {
        let property_id = self.property_map.get_id(name);
        if property_id != PropertyId::INVALID {
            return self.parse_property_value(dictionary, property_id, value);
        }

        let shorthand_id = self.shorthand_map.get_id(name);
        if shorthand_id != ShorthandId::INVALID {
            return self.parse_shorthand_declaration(dictionary, shorthand_id, value);
        }

        Err(StyleError::parse(format!("unknown property '{name}'")))
    }

    pub fn parse_property_value(
        &self,
        dictionary: &mut PropertyDictionary,
        id: PropertyId,
        value: &str,
    ) -> StyleResult<()> {
        let definition = self.property(id).ok_or_else(|| {
            StyleError::parse(format!("property id {} is not registered", id.0))
        })?;

        let values = split_property_values(value, SplitOption::None);
        let property = values
            .first()
            .and_then(|v| definition.parse_value(v))
            .ok_or_else(|| {
                StyleError::parse(format!(
                    "invalid value '{value}' for property '{}'",
                    self.property_map.get_name(id)
                ))
            })?;

        dictionary.set_property(id, property);
        Ok(())
    }

    /// Expands a shorthand. Nothing is written to `dictionary` unless the whole value parses.
    #[tracing::instrument(level = "trace", skip(self, dictionary))]
    pub fn parse_shorthand_declaration(
        &self,
        dictionary: &mut PropertyDictionary,
        id: ShorthandId,
        value: &str,
    ) -> StyleResult<()> {
        let mut staged = PropertyDictionary::new();
        self.expand_shorthand(&mut staged, id, value)?;
        for (&pid, property) in &staged {
            dictionary.set_property(pid, property.clone());
        }
        Ok(())
    }

    fn expand_shorthand(
        &self,
        out: &mut PropertyDictionary,
        id: ShorthandId,
        value: &str,
    ) -> StyleResult<()> {
        let definition = self.shorthand(id).ok_or_else(|| {
            StyleError::parse(format!("shorthand id {} is not registered", id.0))
        })?;
        let name = self.shorthand_map.get_name(id);
        let fail = || StyleError::parse(format!("invalid value '{value}' for shorthand '{name}'"));

        let split = match definition.ty {
            ShorthandType::RecursiveCommaSeparated => SplitOption::Comma,
            _ => SplitOption::Whitespace,
        };
        let mut values = split_property_values(value, split);
        if values.is_empty() {
            return Err(fail());
        }

        match definition.ty {
            ShorthandType::Box if values.len() < 4 => {
                let side_to_value: [usize; 4] = match values.len() {
                    1 => [0, 0, 0, 0],
                    2 => [0, 1, 0, 1],
                    _ => [0, 1, 2, 1],
                };
                for (item, &vi) in definition.items.iter().zip(side_to_value.iter()) {
                    self.parse_item_value(out, item, &values[vi])
                        .ok_or_else(fail)?;
                }
                Ok(())
            }
            ShorthandType::Recursive => {
                for item in &definition.items {
                    self.parse_item_declaration(out, item, value)
                        .map_err(|_| fail())?;
                }
                Ok(())
            }
            ShorthandType::RecursiveCommaSeparated => {
                let num_optional = definition.items.iter().filter(|i| i.optional).count();
                if values.len() + num_optional < definition.items.len() {
                    return Err(fail());
                }

                let mut vi = 0;
                let mut tail_consumed = false;
                for item in &definition.items {
                    if vi >= values.len() {
                        break;
                    }
                    let joined;
                    let subvalue = if item.repeats {
                        joined = values[vi..].join(", ");
                        joined.as_str()
                    } else {
                        values[vi].as_str()
                    };

                    if self.parse_item_declaration(out, item, subvalue).is_ok() {
                        vi += 1;
                    } else if item.repeats || !item.optional {
                        return Err(fail());
                    }
                    if item.repeats {
                        tail_consumed = true;
                        break;
                    }
                }
                // Every comma group must land on an item.
                if vi < values.len() && !tail_consumed {
                    return Err(fail());
                }
                Ok(())
            }
            ShorthandType::FallThrough
            | ShorthandType::Replicate
            | ShorthandType::Box
            | ShorthandType::Flex => {
                if definition.ty == ShorthandType::Flex {
                    if values[0].eq_ignore_ascii_case("none") {
                        values = vec!["0".to_owned(), "0".to_owned(), "auto".to_owned()];
                    } else {
                        // Omitted flex values default to grow 1, shrink 1, basis 0.
                        for (item, omitted) in definition.items.iter().zip(["1", "1", "0"]) {
                            self.parse_item_value(out, item, omitted).ok_or_else(fail)?;
                        }
                    }
                }
                self.expand_positional(out, definition, &values)
                    .then_some(())
                    .ok_or_else(fail)
            }
        }
    }

    /// Shared value loop of the fall-through, replicate, box and flex types.
    fn expand_positional(
        &self,
        out: &mut PropertyDictionary,
        definition: &ShorthandDefinition,
        values: &[String],
    ) -> bool {
        let items = &definition.items;
        if values.len() > items.len() {
            return false;
        }

        let falls_through = matches!(
            definition.ty,
            ShorthandType::FallThrough | ShorthandType::Flex
        );
        let replicates = definition.ty == ShorthandType::Replicate;

        let mut vi = 0;
        let mut pi = 0;
        while vi < values.len() && pi < items.len() {
            let parsed = self.parse_item_value(out, &items[pi], &values[vi]);
            if parsed.is_none() {
                if falls_through && pi + 1 < items.len() {
                    pi += 1;
                    continue;
                }
                return false;
            }

            if !replicates || vi + 1 < values.len() {
                vi += 1;
            }
            pi += 1;
        }

        replicates || vi >= values.len() || pi < items.len()
    }

    fn parse_item_value(
        &self,
        out: &mut PropertyDictionary,
        item: &ShorthandItem,
        value: &str,
    ) -> Option<()> {
        let ShorthandTarget::Property(pid) = item.target else {
            return None;
        };
        let property = self.property(pid)?.parse_value(value)?;
        out.set_property(pid, property);
        Some(())
    }

    fn parse_item_declaration(
        &self,
        out: &mut PropertyDictionary,
        item: &ShorthandItem,
        value: &str,
    ) -> StyleResult<()> {
        match item.target {
            ShorthandTarget::Property(pid) => self.parse_property_value(out, pid, value),
            ShorthandTarget::Shorthand(sid) => self.expand_shorthand(out, sid, value),
        }
    }

    /// Fills every registered property missing from `dictionary` with its default.
    pub fn set_property_defaults(&self, dictionary: &mut PropertyDictionary) {
        for definition in self.properties.iter().flatten() {
            if dictionary.contains(definition.id()) {
                continue;
            }
            if let Some(default) = definition.default_value() {
                dictionary.set_property(definition.id(), default.clone());
            }
        }
    }

    /// Every registered property whose default text no parser accepts.
    pub fn unparsed_defaults(&self) -> Vec<PropertyId> {
        self.properties
            .iter()
            .flatten()
            .filter(|d| d.default_value().is_none())
            .map(PropertyDefinition::id)
            .collect()
    }

    pub fn registered_properties(&self) -> &PropertyIdSet {
        &self.property_ids
    }

    pub fn inherited_properties(&self) -> &PropertyIdSet {
        &self.inherited_ids
    }

    pub fn layout_forcing_properties(&self) -> &PropertyIdSet {
        &self.layout_forcing_ids
    }

    pub fn property_map(&self) -> &IdNameMap<PropertyId> {
        &self.property_map
    }

    pub fn shorthand_map(&self) -> &IdNameMap<ShorthandId> {
        &self.shorthand_map
    }

    pub fn property_name(&self, id: PropertyId) -> &str {
        self.property_map.get_name(id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/specification.rs"]
mod tests;
