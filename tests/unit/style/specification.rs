use super::*;
use crate::style::parsers::ParserRegistry;
use crate::style::property::{Property, Unit};

fn register<'a>(
    s: &'a mut PropertySpecification,
    name: &str,
    default: &str,
    flags: PropertyFlags,
) -> &'a mut PropertyDefinition {
    s.register_property(name, default, flags, PropertyId::INVALID)
        .unwrap()
}

fn spec() -> PropertySpecification {
    let parsers = ParserRegistry::with_defaults();
    let length = || parsers.get("length_percent").unwrap();
    let keyword = || parsers.get("keyword").unwrap();
    let color = || parsers.get("color").unwrap();

    let mut s = PropertySpecification::new();
    for name in ["padding-top", "padding-right", "padding-bottom", "padding-left"] {
        register(&mut s, name, "0px", PropertyFlags::FORCES_LAYOUT).add_parser(length(), "");
    }
    s.register_shorthand(
        "padding",
        "padding-top, padding-right, padding-bottom, padding-left",
        ShorthandType::Box,
        ShorthandId::INVALID,
    )
    .unwrap();

    for name in ["overflow-x", "overflow-y"] {
        register(&mut s, name, "visible", PropertyFlags::empty())
            .add_parser(keyword(), "visible, hidden, auto, scroll");
    }
    s.register_shorthand(
        "overflow",
        "overflow-x, overflow-y",
        ShorthandType::Replicate,
        ShorthandId::INVALID,
    )
    .unwrap();

    register(&mut s, "border-top-width", "0px", PropertyFlags::empty()).add_parser(length(), "");
    register(&mut s, "border-top-color", "black", PropertyFlags::empty()).add_parser(color(), "");
    s.register_shorthand(
        "border-top",
        "border-top-width, border-top-color",
        ShorthandType::FallThrough,
        ShorthandId::INVALID,
    )
    .unwrap();
    s.register_shorthand(
        "border",
        "border-top",
        ShorthandType::Recursive,
        ShorthandId::INVALID,
    )
    .unwrap();
    s.register_shorthand(
        "edges",
        "padding-top, padding-left?, padding-bottom#",
        ShorthandType::RecursiveCommaSeparated,
        ShorthandId::INVALID,
    )
    .unwrap();
    s
}

fn px(v: f32) -> Property {
    Property::number(v, Unit::PX)
}

fn id(s: &PropertySpecification, name: &str) -> PropertyId {
    s.property_map().get_id(name)
}

fn declare(s: &PropertySpecification, name: &str, v: &str) -> StyleResult<PropertyDictionary> {
    let mut d = PropertyDictionary::new();
    s.parse_property_declaration(&mut d, name, v)?;
    Ok(d)
}

fn padding(s: &PropertySpecification, value: &str) -> [Property; 4] {
    let d = declare(s, "padding", value).unwrap();
    ["padding-top", "padding-right", "padding-bottom", "padding-left"].map(|n| {
        d.property(id(s, n))
            .cloned()
            .unwrap_or_else(|| panic!("{n} not set"))
    })
}

#[test]
fn box_single_value_sets_all_sides() {
    let s = spec();
    assert_eq!(
        padding(&s, "10px"),
        [px(10.0), px(10.0), px(10.0), px(10.0)]
    );
}

#[test]
fn box_two_values_are_vertical_then_horizontal() {
    let s = spec();
    assert_eq!(
        padding(&s, "10px 5px"),
        [px(10.0), px(5.0), px(10.0), px(5.0)]
    );
}

#[test]
fn box_three_values_mirror_horizontal() {
    let s = spec();
    assert_eq!(
        padding(&s, "1px 2px 3px"),
        [px(1.0), px(2.0), px(3.0), px(2.0)]
    );
}

#[test]
fn box_four_values_are_positional() {
    let s = spec();
    assert_eq!(
        padding(&s, "1px 2px 3px 4px"),
        [px(1.0), px(2.0), px(3.0), px(4.0)]
    );
}

#[test]
fn box_rejects_over_specified_and_bad_values() {
    let s = spec();
    let mut d = PropertyDictionary::new();
    let over = s.parse_property_declaration(&mut d, "padding", "1px 2px 3px 4px 5px");
    assert!(over.is_err());
    let bad = s.parse_property_declaration(&mut d, "padding", "1px red");
    assert!(bad.is_err());
    assert!(d.is_empty(), "failed shorthands must not write anything");
}

#[test]
fn replicate_repeats_last_value() {
    let s = spec();
    let x = id(&s, "overflow-x");
    let y = id(&s, "overflow-y");

    let d = declare(&s, "overflow", "hidden").unwrap();
    assert_eq!(d.property(x), Some(&Property::keyword(1)));
    assert_eq!(d.property(y), Some(&Property::keyword(1)));

    let d = declare(&s, "overflow", "auto scroll").unwrap();
    assert_eq!(d.property(x), Some(&Property::keyword(2)));
    assert_eq!(d.property(y), Some(&Property::keyword(3)));
}

#[test]
fn replicate_aborts_without_partial_application() {
    let s = spec();
    let mut d = PropertyDictionary::new();
    let result = s.parse_property_declaration(&mut d, "overflow", "auto bogus");
    assert!(result.is_err());
    assert!(d.is_empty());
}

#[test]
fn fall_through_leaves_unmatched_items_unset() {
    let s = spec();
    let d = declare(&s, "border-top", "red").unwrap();
    assert_eq!(d.len(), 1);
    assert!(d.contains(id(&s, "border-top-color")));

    let d = declare(&s, "border-top", "2px #00f").unwrap();
    assert_eq!(d.len(), 2);
}

#[test]
fn recursive_passes_full_value_to_nested_shorthands() {
    let s = spec();
    let d = declare(&s, "border", "3px red").unwrap();
    assert_eq!(d.property(id(&s, "border-top-width")), Some(&px(3.0)));
    assert!(d.contains(id(&s, "border-top-color")));
}

#[test]
fn comma_separated_honours_optional_and_repeating_items() {
    let s = spec();
    let top = id(&s, "padding-top");
    let left = id(&s, "padding-left");
    let bottom = id(&s, "padding-bottom");

    let d = declare(&s, "edges", "1px, 2px, 3px").unwrap();
    assert_eq!(d.property(top), Some(&px(1.0)));
    assert_eq!(d.property(left), Some(&px(2.0)));
    assert_eq!(d.property(bottom), Some(&px(3.0)));

    // One optional item lets the declaration stop short of the repeating tail.
    let d = declare(&s, "edges", "1px, 4px").unwrap();
    assert_eq!(d.property(left), Some(&px(4.0)));
    assert_eq!(d.property(bottom), None);

    // Too few groups for the required items.
    assert!(declare(&s, "edges", "1px").is_err());
}

#[test]
fn comma_separated_rejects_surplus_groups() {
    let mut s = spec();
    s.register_shorthand(
        "pair",
        "padding-top, padding-left",
        ShorthandType::RecursiveCommaSeparated,
        ShorthandId::INVALID,
    )
    .unwrap();

    let d = declare(&s, "pair", "1px, 2px").unwrap();
    assert_eq!(d.len(), 2);

    assert!(declare(&s, "pair", "1px, 2px, 3px").is_err());
}

#[test]
fn registration_rejects_duplicates_and_unknown_items() {
    let mut s = spec();
    let flags = PropertyFlags::empty();
    let duplicate = s.register_property("padding-top", "0px", flags, PropertyId::INVALID);
    assert!(duplicate.is_err());

    let unknown_item = s.register_shorthand(
        "broken",
        "padding-top, nope",
        ShorthandType::FallThrough,
        ShorthandId::INVALID,
    );
    assert!(unknown_item.is_err());

    // Only recursive types may nest shorthands.
    let nested = s.register_shorthand(
        "nested",
        "padding",
        ShorthandType::FallThrough,
        ShorthandId::INVALID,
    );
    assert!(nested.is_err());
}

#[test]
fn defaults_fill_missing_properties_only() {
    let s = spec();
    let mut d = PropertyDictionary::new();
    let top = id(&s, "padding-top");
    d.set_property(top, px(7.0));
    s.set_property_defaults(&mut d);
    assert_eq!(d.property(top), Some(&px(7.0)));
    assert_eq!(d.property(id(&s, "padding-left")), Some(&px(0.0)));
    assert_eq!(d.len(), s.registered_properties().len());
}

#[test]
fn unparsable_default_is_reported() {
    let parsers = ParserRegistry::with_defaults();
    let mut s = PropertySpecification::new();
    let id = register(&mut s, "my-length", "wide", PropertyFlags::empty())
        .add_parser(parsers.get("length").unwrap(), "")
        .id();
    assert_eq!(s.unparsed_defaults(), vec![id]);
}

#[test]
fn registered_flag_sets() {
    let parsers = ParserRegistry::with_defaults();
    let mut s = PropertySpecification::new();
    register(&mut s, "color", "white", PropertyFlags::INHERITED)
        .add_parser(parsers.get("color").unwrap(), "");
    assert!(s.inherited_properties().contains(PropertyId::COLOR));
    assert!(!s.layout_forcing_properties().contains(PropertyId::COLOR));
    assert!(s.registered_properties().contains(PropertyId::COLOR));
}

#[test]
fn splitter_respects_groups_and_quotes() {
    assert_eq!(
        split_property_values("1px  rgba(0, 0, 0, 1) \"a b\"", SplitOption::Whitespace),
        vec!["1px", "rgba(0, 0, 0, 1)", "a b"]
    );
    assert_eq!(
        split_property_values("a(1, 2), b , c", SplitOption::Comma),
        vec!["a(1, 2)", "b", "c"]
    );
    assert_eq!(
        split_property_values("  10px 5px ; ignored", SplitOption::None),
        vec!["10px 5px", "ignored"]
    );
    assert_eq!(
        split_property_values(r#""say \"hi\"""#, SplitOption::Whitespace),
        vec![r#"say "hi""#]
    );
    let unbalanced = split_property_values("f(1, 2", SplitOption::Whitespace);
    assert!(unbalanced.is_empty());
}
