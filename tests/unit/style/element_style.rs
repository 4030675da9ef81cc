use super::*;
use crate::foundation::core::Colourb;
use crate::style::property::Unit;
use crate::style::sheet_spec::StyleSheetSpecification;

fn px(v: f32) -> Property {
    Property::number(v, Unit::PX)
}

fn dict(entries: &[(PropertyId, Property)]) -> PropertyDictionary {
    let mut d = PropertyDictionary::new();
    for (id, p) in entries {
        d.set_property(*id, p.clone());
    }
    d
}

fn hover_definition() -> Arc<ElementDefinition> {
    let mut def = ElementDefinition::new();
    def.add_rule(&[], &dict(&[(PropertyId::WIDTH, px(10.0))]), 10);
    def.add_rule(&["hover"], &dict(&[(PropertyId::WIDTH, px(20.0))]), 20);
    def.add_rule(
        &["hover", "active"],
        &dict(&[(PropertyId::WIDTH, px(30.0))]),
        30,
    );
    Arc::new(def)
}

#[test]
fn definition_prefers_most_specific_matching_rule() {
    let def = hover_definition();
    let none = HashSet::new();
    let hover: HashSet<String> = ["hover".to_owned()].into();
    let both: HashSet<String> = ["hover".to_owned(), "active".to_owned()].into();

    assert_eq!(def.property(PropertyId::WIDTH, &none), Some(&px(10.0)));
    assert_eq!(def.property(PropertyId::WIDTH, &hover), Some(&px(20.0)));
    assert_eq!(def.property(PropertyId::WIDTH, &both), Some(&px(30.0)));
    assert!(def.ids_gated_by("active").contains(PropertyId::WIDTH));
    assert!(def.ids_gated_by("focus").is_empty());
}

#[test]
fn base_rules_keep_the_higher_specificity_value() {
    let mut def = ElementDefinition::new();
    def.add_rule(&[], &dict(&[(PropertyId::HEIGHT, px(5.0))]), 50);
    def.add_rule(&[], &dict(&[(PropertyId::HEIGHT, px(6.0))]), 10);
    assert_eq!(
        def.property(PropertyId::HEIGHT, &HashSet::new()),
        Some(&px(5.0))
    );
}

#[test]
fn inline_beats_pseudo_beats_base() {
    let mut style = ElementStyle::new();
    style.set_definition(Some(hover_definition()));
    assert_eq!(style.local_property(PropertyId::WIDTH), Some(&px(10.0)));

    assert!(style.set_pseudo_class("hover", true));
    assert!(!style.set_pseudo_class("hover", true));
    assert_eq!(style.local_property(PropertyId::WIDTH), Some(&px(20.0)));

    style.set_property(PropertyId::WIDTH, px(99.0));
    assert_eq!(style.local_property(PropertyId::WIDTH), Some(&px(99.0)));

    style.remove_property(PropertyId::WIDTH);
    assert_eq!(style.local_property(PropertyId::WIDTH), Some(&px(20.0)));
}

#[test]
fn first_pass_computes_defaults_and_clears_dirty() {
    let sheet = StyleSheetSpecification::new();
    let spec = sheet.properties();

    let mut style = ElementStyle::new();
    assert!(style.any_dirty());
    let changed = style.compute_values(spec, None);

    assert!(!style.any_dirty());
    assert_eq!(changed.len(), spec.registered_properties().len());
    assert_eq!(
        style.computed(PropertyId::OPACITY),
        Some(&Property::number(1.0, Unit::NUMBER))
    );

    assert!(style.compute_values(spec, None).is_empty());
}

#[test]
fn pseudo_class_toggle_dirties_only_gated_properties() {
    let sheet = StyleSheetSpecification::new();
    let spec = sheet.properties();

    let mut style = ElementStyle::new();
    style.set_definition(Some(hover_definition()));
    style.compute_values(spec, None);
    assert_eq!(style.computed(PropertyId::WIDTH), Some(&px(10.0)));

    style.set_pseudo_class("hover", true);
    assert!(style.is_dirty(PropertyId::WIDTH));
    assert!(!style.is_dirty(PropertyId::HEIGHT));

    let changed = style.compute_values(spec, None);
    assert_eq!(changed.iter().collect::<Vec<_>>(), vec![PropertyId::WIDTH]);
    assert_eq!(style.computed(PropertyId::WIDTH), Some(&px(20.0)));
}

#[test]
fn inherited_properties_come_from_the_parent() {
    let sheet = StyleSheetSpecification::new();
    let spec = sheet.properties();

    let mut parent = ElementStyle::new();
    parent.set_property_text(spec, "color", "#ff0000").unwrap();
    parent.set_property(PropertyId::WIDTH, px(300.0));
    parent.compute_values(spec, None);

    let mut child = ElementStyle::new();
    child.compute_values(spec, Some(&parent));
    assert_eq!(
        child
            .computed(PropertyId::COLOR)
            .and_then(Property::as_colour),
        Some(Colourb::new(255, 0, 0, 255))
    );
    // Width is not inherited.
    assert_eq!(
        child.computed(PropertyId::WIDTH),
        Some(&Property::keyword(0))
    );

    parent.set_property_text(spec, "color", "blue").unwrap();
    let changed = parent.compute_values(spec, None);
    let inherited_changes = changed.intersection(spec.inherited_properties());
    assert!(inherited_changes.contains(PropertyId::COLOR));

    child.dirty_inherited_properties(spec);
    let child_changed = child.compute_values(spec, Some(&parent));
    assert_eq!(
        child_changed.iter().collect::<Vec<_>>(),
        vec![PropertyId::COLOR]
    );
}

#[test]
fn definition_swap_dirties_old_and_new_ids() {
    let sheet = StyleSheetSpecification::new();
    let spec = sheet.properties();

    let mut a = ElementDefinition::new();
    a.add_rule(&[], &dict(&[(PropertyId::HEIGHT, px(1.0))]), 0);
    let mut b = ElementDefinition::new();
    b.add_rule(&[], &dict(&[(PropertyId::TOP, px(2.0))]), 0);

    let mut style = ElementStyle::new();
    style.set_definition(Some(Arc::new(a)));
    style.compute_values(spec, None);

    let b = Arc::new(b);
    style.set_definition(Some(Arc::clone(&b)));
    assert!(style.is_dirty(PropertyId::HEIGHT));
    assert!(style.is_dirty(PropertyId::TOP));
    assert!(!style.is_dirty(PropertyId::WIDTH));

    let changed = style.compute_values(spec, None);
    assert!(changed.contains(PropertyId::HEIGHT));
    assert!(changed.contains(PropertyId::TOP));

    // Same definition again is a no-op.
    style.set_definition(Some(b));
    assert!(!style.any_dirty());
}

#[test]
fn rejected_inline_text_leaves_style_untouched() {
    let sheet = StyleSheetSpecification::new();
    let spec = sheet.properties();

    let mut style = ElementStyle::new();
    style.compute_values(spec, None);
    let rejected = style.set_property_text(spec, "margin", "1px 2px 3px 4px 5px");
    assert!(rejected.is_err());
    assert!(style.inline_properties().is_empty());
    assert!(!style.any_dirty());
}

#[test]
fn invalid_inline_id_is_ignored() {
    let sheet = StyleSheetSpecification::new();
    let spec = sheet.properties();

    let mut style = ElementStyle::new();
    style.compute_values(spec, None);
    style.set_property(PropertyId::INVALID, px(3.0));
    assert!(style.inline_properties().is_empty());
    assert!(!style.any_dirty());

    style.set_property(PropertyId::WIDTH, px(3.0));
    style.compute_values(spec, None);
    assert_eq!(style.computed(PropertyId::WIDTH), Some(&px(3.0)));
}
