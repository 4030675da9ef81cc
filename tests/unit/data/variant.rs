use super::*;

#[test]
fn string_to_bool_accepts_only_one_and_true() {
    assert!(Variant::from("1").to_bool());
    assert!(Variant::from("true").to_bool());
    assert!(!Variant::from("false").to_bool());
    assert!(!Variant::from("foxdog").to_bool());
    assert!(!Variant::from("TRUE").to_bool());
    assert!(!Variant::Empty.to_bool());
}

#[test]
fn floats_print_with_three_trimmed_decimals() {
    assert_eq!(Variant::from(50000.0 / 1500.0).to_string(), "33.333");
    assert_eq!(Variant::from(4.0).to_string(), "4");
    assert_eq!(Variant::from(24.2).to_string(), "24.2");
    assert_eq!(Variant::from(-0.0001).to_string(), "0");
    assert_eq!(Variant::from(true).to_string(), "1");
    assert_eq!(Variant::from(vec!["a", "b"]).to_string(), "a,b");
}

#[test]
fn format_float_trims_on_request() {
    assert_eq!(format_float(3.62345, 2, false), "3.62");
    assert_eq!(format_float(3.62345, 10, false), "3.6234500000");
    assert_eq!(format_float(3.62345, 10, true), "3.62345");
    assert_eq!(format_float(3.0001, 2, true), "3");
    assert_eq!(format_float(3.62345, 0, true), "4");
    assert_eq!(format_float(150.0, 0, true), "150");
}

#[test]
fn numeric_coercions() {
    assert_eq!(Variant::from(" 2.5 ").to_f64(), 2.5);
    assert_eq!(Variant::from("abc").to_f64(), 0.0);
    assert_eq!(Variant::from(true).to_f64(), 1.0);
    assert_eq!(Variant::from(7.9).to_i64(), 7);
}

#[test]
fn json_maps_onto_variants() {
    let v: Variant = serde_json::from_value(serde_json::json!({
        "n": 3,
        "x": 1.5,
        "s": "hi",
        "list": [1, null, true],
    }))
    .unwrap();
    let Variant::Object(map) = v else {
        panic!("expected object");
    };
    assert_eq!(map["n"], Variant::Int(3));
    assert_eq!(map["x"], Variant::Float(1.5));
    assert_eq!(map["s"], Variant::from("hi"));
    assert_eq!(
        map["list"],
        Variant::Array(vec![Variant::Int(1), Variant::Empty, Variant::Bool(true)])
    );
}
