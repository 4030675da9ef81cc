use super::*;
use crate::foundation::ids::FIRST_CUSTOM_PROPERTY_ID;

fn custom(n: u32) -> PropertyId {
    PropertyId(FIRST_CUSTOM_PROPERTY_ID + n)
}

#[test]
fn set_tracks_builtin_and_custom_ids() {
    let mut s = PropertyIdSet::new();
    s.insert(PropertyId::WIDTH);
    s.insert(custom(3));
    assert!(s.contains(PropertyId::WIDTH));
    assert!(s.contains(custom(3)));
    assert!(!s.contains(PropertyId::HEIGHT));
    assert!(!s.contains(custom(4)));
    assert_eq!(s.len(), 2);

    s.remove(PropertyId::WIDTH);
    assert!(!s.contains(PropertyId::WIDTH));
    s.clear();
    assert!(s.is_empty());
}

#[test]
fn iteration_is_ordered() {
    let s: PropertyIdSet = [custom(2), PropertyId::HEIGHT, custom(0), PropertyId::WIDTH]
        .into_iter()
        .collect();
    let ids: Vec<_> = s.iter().collect();
    assert_eq!(
        ids,
        vec![PropertyId::WIDTH, PropertyId::HEIGHT, custom(0), custom(2)]
    );
}

#[test]
fn union_and_intersection() {
    let a: PropertyIdSet = [PropertyId::WIDTH, custom(1)].into_iter().collect();
    let b: PropertyIdSet = [PropertyId::WIDTH, PropertyId::COLOR].into_iter().collect();
    let i = a.intersection(&b);
    assert_eq!(i.iter().collect::<Vec<_>>(), vec![PropertyId::WIDTH]);

    let mut u = a.clone();
    u.union_with(&b);
    assert_eq!(u.len(), 3);
}

#[test]
fn all_dirty_covers_ids_registered_later() {
    let mut d = DirtyPropertyList::new();
    assert!(!d.contains(PropertyId::COLOR));

    d.dirty_all();
    assert!(d.is_all_dirty());
    assert!(d.contains(PropertyId::COLOR));
    assert!(d.contains(PropertyId::INVALID));
    // Never registered when dirty_all ran.
    assert!(d.contains(custom(500)));

    d.insert(custom(7));
    assert!(d.contains(custom(501)));

    d.clear();
    assert!(!d.contains(custom(500)));
    assert!(!d.contains(PropertyId::COLOR));
    assert!(d.is_empty());
}

#[test]
fn to_property_list_expands_all_dirty() {
    let registered: PropertyIdSet = [PropertyId::WIDTH, PropertyId::COLOR, custom(0)]
        .into_iter()
        .collect();

    let mut d = DirtyPropertyList::new();
    d.insert(PropertyId::WIDTH);
    assert_eq!(
        d.to_property_list(&registered).iter().collect::<Vec<_>>(),
        vec![PropertyId::WIDTH]
    );

    d.dirty_all();
    assert_eq!(d.to_property_list(&registered), registered);
}
