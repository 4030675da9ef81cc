use std::sync::Mutex;

use super::*;
use crate::data::variant::Variant;
use crate::foundation::ids::PropertyId;

// The installed core is process-wide; tests touching it take this lock.
static SERIAL: Mutex<()> = Mutex::new(());

#[test]
fn owned_core_carries_builtins() {
    let core = Core::default();
    assert_ne!(core.style.property_id("color"), PropertyId::INVALID);
    assert!(core.filters.get_id("to_upper").is_some());
    assert!(core.effects.has_decorator("solid"));
    assert!(core.effects.has_filter("blur"));
    assert!(!core.events.is_empty());
}

#[test]
fn lifecycle_rejects_double_initialise_and_use_after_shutdown() {
    let _serial = SERIAL.lock().unwrap_or_else(|p| p.into_inner());
    shutdown();

    assert!(with_core(|_| ()).is_err());
    initialise(Box::new(DefaultSystem::new())).unwrap();
    assert!(is_initialised());

    let err = initialise(Box::new(DefaultSystem::new())).unwrap_err();
    assert!(matches!(err, StyleError::Registration(_)));

    let id = with_core_mut(|core| {
        core.filters
            .register("shout", |args: &[Variant]| Variant::from(format!("{}!", args[0])))
            .unwrap()
    })
    .unwrap();
    let shout = with_core(|core| core.filters.get_id("shout")).unwrap();
    assert_eq!(shout, Some(id));

    assert!(shutdown());
    assert!(!shutdown());
    assert!(with_core(|_| ()).is_err());
    assert!(with_core_mut(|_| ()).is_err());

    // A fresh core starts from the built-ins again.
    initialise(Box::new(DefaultSystem::new())).unwrap();
    let shout = with_core(|core| core.filters.get_id("shout")).unwrap();
    assert_eq!(shout, None);
    assert!(shutdown());
}
