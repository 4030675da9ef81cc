use super::*;

fn call(r: &FilterRegistry, name: &str, args: &[Variant]) -> Variant {
    r.call(r.get_id(name).unwrap(), args).unwrap()
}

#[test]
fn builtins_transform_the_piped_value() {
    let r = FilterRegistry::with_builtins();
    assert_eq!(call(&r, "to_upper", &["abc".into()]), Variant::from("ABC"));
    assert_eq!(call(&r, "to_lower", &["AbC".into()]), Variant::from("abc"));
    assert_eq!(call(&r, "round", &[3.62345.into()]), Variant::Float(4.0));
    assert_eq!(call(&r, "floor", &[(-1.5).into()]), Variant::Float(-2.0));
    assert_eq!(call(&r, "ceil", &[1.2.into()]), Variant::Float(2.0));
    assert_eq!(call(&r, "abs", &[(-7).into()]), Variant::Float(7.0));
    assert_eq!(call(&r, "to_upper", &[]), Variant::Empty);
}

#[test]
fn format_takes_precision_and_trim() {
    let r = FilterRegistry::with_builtins();
    assert_eq!(call(&r, "format", &[3.62345.into()]), Variant::from("4"));
    assert_eq!(
        call(&r, "format", &[3.62345.into(), 2.into()]),
        Variant::from("3.62")
    );
    assert_eq!(
        call(&r, "format", &[3.0001.into(), 2.into(), true.into()]),
        Variant::from("3")
    );
    assert_eq!(
        call(&r, "format", &[3.0001.into(), 2.into(), false.into()]),
        Variant::from("3.00")
    );
}

#[test]
fn custom_filters_replace_in_place() {
    let mut r = FilterRegistry::with_builtins();
    let id = r.register("twice", |args| {
        Variant::Float(args.first().map_or(0.0, Variant::to_f64) * 2.0)
    });
    let id = id.unwrap();
    assert_eq!(r.call(id, &[2.into()]).unwrap(), Variant::Float(4.0));

    let again = r.register("twice", |_| Variant::from("replaced")).unwrap();
    assert_eq!(again, id);
    assert_eq!(r.call(id, &[]).unwrap(), Variant::from("replaced"));
    assert_eq!(r.name(id), Some("twice"));

    assert!(r.register("size", |_| Variant::Empty).is_err());
    assert!(r.register("bad name", |_| Variant::Empty).is_err());
    assert!(r.get_id("missing").is_none());
}
