use super::*;

fn addr(s: &str) -> DataAddress {
    DataAddress::parse(s).unwrap()
}

fn seeded() -> DataStore {
    DataStore::from_json(serde_json::json!({
        "radius": 8.7,
        "rows": [{"title": "a"}, {"title": "b"}],
        "names": ["left", "right"],
    }))
    .unwrap()
}

#[test]
fn resolves_nested_addresses_and_size() {
    let store = seeded();
    assert_eq!(
        store.get(&addr("rows[1].title")).unwrap(),
        Variant::from("b")
    );
    assert_eq!(store.get(&addr("names.size")).unwrap(), Variant::Int(2));
    assert!(store.get(&addr("names[999]")).is_err());
    assert!(store.get(&addr("missing")).is_err());
    assert!(store.get(&addr("radius.x")).is_err());
}

#[test]
fn assignment_marks_root_dirty() {
    let mut store = seeded();
    store.clear_dirty();

    store
        .set(&addr("rows[0].title"), Variant::from("z"))
        .unwrap();
    assert!(store.is_variable_dirty("rows"));
    assert!(!store.is_variable_dirty("radius"));
    assert_eq!(
        store.get(&addr("rows[0].title")).unwrap(),
        Variant::from("z")
    );

    assert!(store.set(&addr("nope"), Variant::Int(1)).is_err());
    assert!(store.set(&addr("names[5]"), Variant::Int(1)).is_err());
}

#[test]
fn reserved_and_duplicate_names_are_rejected() {
    let mut store = DataStore::new();
    for name in RESERVED_NAMES {
        assert!(store.bind(name, 1).is_err());
    }
    store.bind("count", 1).unwrap();
    assert!(store.bind("count", 2).is_err());
    assert!(store.bind_event("count", |_, _| Ok(())).is_err());
    assert!(store.bind("9lives", 1).is_err());
}

#[test]
fn events_mutate_variables() {
    let mut store = DataStore::new();
    store.bind("count", 0).unwrap();
    store
        .bind_event("add", |vars, args| {
            let count = DataAddress::root("count");
            let current = vars.get(&count)?.to_i64();
            let step = args.first().map(Variant::to_i64).unwrap_or(1);
            vars.set(&count, Variant::Int(current + step))?;
            Ok(())
        })
        .unwrap();
    store.clear_dirty();

    store.call("add", &[Variant::Int(5)]).unwrap();
    assert_eq!(store.get(&addr("count")).unwrap(), Variant::Int(5));
    assert!(store.is_variable_dirty("count"));
    assert!(store.call("missing", &[]).is_err());
}

#[test]
fn seed_must_be_an_object() {
    assert!(DataStore::from_json(serde_json::json!([1, 2])).is_err());
}
