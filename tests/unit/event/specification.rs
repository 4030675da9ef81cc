use super::*;

#[test]
fn builtins_are_indexed_by_id() {
    let table = EventSpecificationTable::new();
    assert_eq!(table.len(), NUM_DEFINED_EVENT_IDS as usize);

    let click = table.get(EventId::CLICK);
    assert_eq!(click.name, "click");
    assert!(click.interruptible && click.bubbles);
    assert_eq!(
        click.default_action_phase,
        DefaultActionPhase::TargetAndBubble
    );

    let focus = table.get(table.get_id("FOCUS"));
    assert_eq!(focus.id, EventId::FOCUS);
    assert!(!focus.bubbles);
    assert_eq!(focus.default_action_phase, DefaultActionPhase::Target);
}

#[test]
fn unknown_lookups_resolve_to_invalid() {
    let table = EventSpecificationTable::new();
    assert_eq!(table.get_id("not-an-event"), EventId::INVALID);
    assert_eq!(table.get(EventId(9_999)).name, "invalid");
}

#[test]
fn get_or_insert_registers_with_defaults_once() {
    let mut table = EventSpecificationTable::new();
    let spec = table.get_or_insert("Swipe").clone();
    assert_eq!(spec.id, EventId(FIRST_CUSTOM_EVENT_ID));
    assert_eq!(spec.name, "swipe");
    assert!(spec.interruptible && spec.bubbles);
    assert_eq!(spec.default_action_phase, DefaultActionPhase::None);

    assert_eq!(table.get_id_or_insert("swipe"), spec.id);
    assert_eq!(
        table.get_id_or_insert("pinch"),
        EventId(FIRST_CUSTOM_EVENT_ID + 1)
    );
    assert_eq!(table.get_id_or_insert("click"), EventId::CLICK);
}

#[test]
fn replace_only_touches_custom_entries() {
    let mut table = EventSpecificationTable::new();

    let id = table.insert_or_replace_custom("swipe", false, false, DefaultActionPhase::Target);
    assert!(!table.get(id).bubbles);
    let again = table.insert_or_replace_custom("swipe", true, true, DefaultActionPhase::None);
    assert_eq!(again, id);
    assert!(table.get(id).bubbles);

    let click = table.insert_or_replace_custom("click", false, false, DefaultActionPhase::None);
    assert_eq!(click, EventId::CLICK);
    assert!(table.get(EventId::CLICK).bubbles);
    assert_eq!(
        table.get(EventId::CLICK).default_action_phase,
        DefaultActionPhase::TargetAndBubble
    );
}
