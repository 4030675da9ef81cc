use std::sync::Arc;

use crate::foundation::error::{StyleError, StyleResult};
use crate::foundation::ids::{PropertyId, ShorthandId};
use crate::style::definition::{PropertyDefinition, PropertyFlags, ShorthandType};
use crate::style::parsers::{ParserRegistry, PropertyParser};
use crate::style::property::PropertyDictionary;
use crate::style::specification::PropertySpecification;

const DISPLAY_KEYWORDS: &str =
    "none, block, inline, inline-block, flex, inline-flex, table, table-row, table-cell";

/// Chained parser attachment for a freshly registered property.
///
/// A failed registration yields a builder that ignores further calls.
pub struct PropertyBuilder<'a> {
    definition: Option<&'a mut PropertyDefinition>,
    parsers: &'a ParserRegistry,
}

impl PropertyBuilder<'_> {
    pub fn add_parser(mut self, parser_name: &str, parameters: &str) -> Self {
        if let Some(definition) = self.definition.as_deref_mut() {
            match self.parsers.get(parser_name) {
                Some(parser) => {
                    definition.add_parser(parser, parameters);
                }
                None => tracing::error!(parser = parser_name, "property parser not found"),
            }
        }
        self
    }

    /// Finishes the registration, failing if registration failed or no parser accepts the
    /// default value.
    pub fn build(self) -> StyleResult<PropertyId> {
        let definition = self
            .definition
            .ok_or_else(|| StyleError::registration("property registration failed"))?;
        if definition.default_value().is_none() {
            tracing::error!(
                default = definition.default_text(),
                "property default value is not parseable"
            );
            return Err(StyleError::registration(format!(
                "default value '{}' does not parse",
                definition.default_text()
            )));
        }
        Ok(definition.id())
    }
}

/// Property specification preloaded with the built-in table and parser registry.
#[derive(Debug, Clone)]
pub struct StyleSheetSpecification {
    parsers: ParserRegistry,
    properties: PropertySpecification,
}

impl Default for StyleSheetSpecification {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleSheetSpecification {
    pub fn new() -> Self {
        let mut spec = Self {
            parsers: ParserRegistry::with_defaults(),
            properties: PropertySpecification::new(),
        };
        spec.register_default_properties();

        let unparsed = spec.properties.unparsed_defaults();
        debug_assert!(
            unparsed.is_empty(),
            "built-in properties with unparsable defaults: {unparsed:?}"
        );
        spec
    }

    pub fn register_parser(&mut self, name: &str, parser: Arc<dyn PropertyParser>) {
        self.parsers.register(name, parser);
    }

    pub fn parser(&self, name: &str) -> Option<Arc<dyn PropertyParser>> {
        self.parsers.get(name)
    }

    pub fn register_property(
        &mut self,
        name: &str,
        default_value: &str,
        flags: PropertyFlags,
    ) -> PropertyBuilder<'_> {
        let definition = self
            .properties
            .register_property(name, default_value, flags, PropertyId::INVALID)
            .ok();
        PropertyBuilder {
            definition,
            parsers: &self.parsers,
        }
    }

    pub fn register_shorthand(
        &mut self,
        name: &str,
        property_names: &str,
        ty: ShorthandType,
    ) -> StyleResult<ShorthandId> {
        self.properties
            .register_shorthand(name, property_names, ty, ShorthandId::INVALID)
    }

    pub fn properties(&self) -> &PropertySpecification {
        &self.properties
    }

    pub fn property_id(&self, name: &str) -> PropertyId {
        self.properties.property_map().get_id(name)
    }

    pub fn shorthand_id(&self, name: &str) -> ShorthandId {
        self.properties.shorthand_map().get_id(name)
    }

    pub fn property_name(&self, id: PropertyId) -> &str {
        self.properties.property_name(id)
    }

    pub fn parse_property_declaration(
        &self,
        dictionary: &mut PropertyDictionary,
        name: &str,
        value: &str,
    ) -> StyleResult<()> {
        self.properties
            .parse_property_declaration(dictionary, name, value)
    }

    /// Parses a `name: value; name: value` block, skipping (and logging) bad declarations.
    /// Returns the number of declarations that failed.
    pub fn parse_declaration_block(
        &self,
        dictionary: &mut PropertyDictionary,
        block: &str,
    ) -> usize {
        let mut failures = 0;
        for declaration in block.split(';').map(str::trim).filter(|d| !d.is_empty()) {
            let Some((name, value)) = declaration.split_once(':') else {
                tracing::warn!(declaration, "declaration is missing ':'");
                failures += 1;
                continue;
            };
            if let Err(err) = self.parse_property_declaration(dictionary, name.trim(), value.trim())
            {
                tracing::warn!(%err, declaration, "skipping declaration");
                failures += 1;
            }
        }
        failures
    }

    fn shorthand(&mut self, name: &str, items: &str, ty: ShorthandType) {
        if let Err(err) = self.register_shorthand(name, items, ty) {
            tracing::error!(%err, "built-in shorthand registration failed");
        }
    }

    fn register_default_properties(&mut self) {
        use PropertyFlags as F;
        let layout = F::FORCES_LAYOUT;
        let inherited = F::INHERITED;
        let both = F::INHERITED | F::FORCES_LAYOUT;
        let none = F::empty();

        for side in ["top", "right", "bottom", "left"] {
            self.register_property(&format!("margin-{side}"), "0px", layout)
                .add_parser("keyword", "auto")
                .add_parser("length_percent", "");
        }
        self.shorthand(
            "margin",
            "margin-top, margin-right, margin-bottom, margin-left",
            ShorthandType::Box,
        );

        for side in ["top", "right", "bottom", "left"] {
            self.register_property(&format!("padding-{side}"), "0px", layout)
                .add_parser("length_percent", "");
        }
        self.shorthand(
            "padding",
            "padding-top, padding-right, padding-bottom, padding-left",
            ShorthandType::Box,
        );

        for side in ["top", "right", "bottom", "left"] {
            self.register_property(&format!("border-{side}-width"), "0px", layout)
                .add_parser("length", "");
        }
        self.shorthand(
            "border-width",
            "border-top-width, border-right-width, border-bottom-width, border-left-width",
            ShorthandType::Box,
        );

        for side in ["top", "right", "bottom", "left"] {
            self.register_property(&format!("border-{side}-color"), "black", none)
                .add_parser("color", "");
        }
        self.shorthand(
            "border-color",
            "border-top-color, border-right-color, border-bottom-color, border-left-color",
            ShorthandType::Box,
        );

        for side in ["top", "right", "bottom", "left"] {
            self.shorthand(
                &format!("border-{side}"),
                &format!("border-{side}-width, border-{side}-color"),
                ShorthandType::FallThrough,
            );
        }
        self.shorthand(
            "border",
            "border-top, border-right, border-bottom, border-left",
            ShorthandType::Recursive,
        );

        let corners = ["top-left", "top-right", "bottom-right", "bottom-left"];
        for corner in corners {
            self.register_property(&format!("border-{corner}-radius"), "0px", none)
                .add_parser("length", "");
        }
        let radii = corners.map(|corner| format!("border-{corner}-radius"));
        self.shorthand("border-radius", &radii.join(", "), ShorthandType::Box);

        self.register_property("display", "inline", layout)
            .add_parser("keyword", DISPLAY_KEYWORDS);
        self.register_property("position", "static", layout)
            .add_parser("keyword", "static, relative, absolute, fixed");
        for offset in ["top", "right", "bottom", "left"] {
            self.register_property(offset, "auto", none)
                .add_parser("keyword", "auto")
                .add_parser("length_percent", "");
        }
        self.register_property("float", "none", layout)
            .add_parser("keyword", "none, left, right");
        self.register_property("clear", "none", layout)
            .add_parser("keyword", "none, left, right, both");
        self.register_property("box-sizing", "content-box", layout)
            .add_parser("keyword", "content-box, border-box");
        self.register_property("z-index", "auto", none)
            .add_parser("keyword", "auto")
            .add_parser("number", "");

        for (name, default) in [
            ("width", "auto"),
            ("min-width", "0px"),
            ("max-width", "-1px"),
            ("height", "auto"),
            ("min-height", "0px"),
            ("max-height", "-1px"),
        ] {
            self.register_property(name, default, layout)
                .add_parser("keyword", "auto")
                .add_parser("length_percent", "");
        }

        self.register_property("line-height", "1.2", both)
            .add_parser("number_length_percent", "");
        self.register_property("vertical-align", "baseline", layout)
            .add_parser(
                "keyword",
                "baseline, middle, sub, super, text-top, text-bottom, top, bottom",
            )
            .add_parser("length_percent", "");

        for axis in ["x", "y"] {
            self.register_property(&format!("overflow-{axis}"), "visible", layout)
                .add_parser("keyword", "visible, hidden, auto, scroll");
        }
        self.shorthand(
            "overflow",
            "overflow-x, overflow-y",
            ShorthandType::Replicate,
        );
        self.register_property("clip", "auto", inherited)
            .add_parser("keyword", "auto, none")
            .add_parser("number", "");
        self.register_property("visibility", "visible", none)
            .add_parser("keyword", "visible, hidden");

        self.register_property("background-color", "transparent", none)
            .add_parser("color", "");
        self.shorthand("background", "background-color", ShorthandType::FallThrough);
        self.register_property("color", "white", inherited)
            .add_parser("color", "");
        self.register_property("caret-color", "auto", inherited)
            .add_parser("keyword", "auto")
            .add_parser("color", "");
        self.register_property("image-color", "white", none)
            .add_parser("color", "");
        self.register_property("opacity", "1", inherited)
            .add_parser("number", "");

        self.register_property("font-family", "", both)
            .add_parser("string", "");
        self.register_property("font-style", "normal", both)
            .add_parser("keyword", "normal, italic");
        self.register_property("font-weight", "normal", both)
            .add_parser("keyword", "normal, bold");
        self.register_property("font-size", "12px", both)
            .add_parser("length_percent", "");
        self.shorthand(
            "font",
            "font-style, font-weight, font-size, font-family",
            ShorthandType::FallThrough,
        );
        self.register_property("letter-spacing", "0px", both)
            .add_parser("keyword", "normal")
            .add_parser("length", "");

        self.register_property("text-align", "left", both)
            .add_parser("keyword", "left, right, center, justify");
        self.register_property("text-decoration", "none", inherited)
            .add_parser("keyword", "none, underline, overline, line-through");
        self.register_property("text-transform", "none", both)
            .add_parser("keyword", "none, capitalize, uppercase, lowercase");
        self.register_property("white-space", "normal", both)
            .add_parser("keyword", "normal, pre, nowrap, pre-wrap, pre-line");
        self.register_property("word-break", "normal", both)
            .add_parser("keyword", "normal, break-all, break-word");

        self.register_property("row-gap", "0px", layout)
            .add_parser("length_percent", "");
        self.register_property("column-gap", "0px", layout)
            .add_parser("length_percent", "");
        self.shorthand("gap", "row-gap, column-gap", ShorthandType::Replicate);

        self.register_property("cursor", "", inherited)
            .add_parser("string", "");
        self.register_property("pointer-events", "auto", inherited)
            .add_parser("keyword", "none, auto");
        self.register_property("focus", "auto", inherited)
            .add_parser("keyword", "none, auto");
        self.register_property("tab-index", "none", none)
            .add_parser("keyword", "none, auto");
        self.register_property("perspective", "none", none)
            .add_parser("keyword", "none")
            .add_parser("length", "");

        self.register_property("decorator", "none", none)
            .add_parser("decorator", "");
        self.register_property("mask-image", "none", none)
            .add_parser("decorator", "");
        self.register_property("filter", "none", none)
            .add_parser("filter", "");
        self.register_property("backdrop-filter", "none", none)
            .add_parser("filter", "");
        self.register_property("box-shadow", "none", none)
            .add_parser("keyword", "none")
            .add_parser("string", "");

        self.register_property("flex-direction", "row", layout)
            .add_parser("keyword", "row, row-reverse, column, column-reverse");
        self.register_property("flex-wrap", "nowrap", layout)
            .add_parser("keyword", "nowrap, wrap, wrap-reverse");
        self.register_property("flex-grow", "0", layout)
            .add_parser("number", "");
        self.register_property("flex-shrink", "1", layout)
            .add_parser("number", "");
        self.register_property("flex-basis", "auto", layout)
            .add_parser("keyword", "auto")
            .add_parser("length_percent", "");
        self.shorthand(
            "flex",
            "flex-grow, flex-shrink, flex-basis",
            ShorthandType::Flex,
        );
        self.shorthand(
            "flex-flow",
            "flex-direction, flex-wrap",
            ShorthandType::FallThrough,
        );
        self.register_property("align-items", "stretch", layout)
            .add_parser("keyword", "flex-start, flex-end, center, baseline, stretch");
        self.register_property("justify-content", "flex-start", layout)
            .add_parser(
                "keyword",
                "flex-start, flex-end, center, space-between, space-around",
            );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/sheet_spec.rs"]
mod tests;
