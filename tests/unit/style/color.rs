use super::*;

#[test]
fn parses_hex_forms() {
    assert_eq!(parse_colour("#f00").unwrap(), Colourb::new(255, 0, 0, 255));
    assert_eq!(parse_colour("#f008").unwrap(), Colourb::new(255, 0, 0, 136));
    assert_eq!(
        parse_colour("#0000FF80").unwrap(),
        Colourb::new(0, 0, 255, 128)
    );
    assert!(parse_colour("#12345").is_err());
    assert!(parse_colour("#zzz").is_err());
}

#[test]
fn parses_rgb_functions() {
    assert_eq!(
        parse_colour("rgb(10, 20, 30)").unwrap(),
        Colourb::new(10, 20, 30, 255)
    );
    assert_eq!(
        parse_colour("rgba(10, 20, 30, 40)").unwrap(),
        Colourb::new(10, 20, 30, 40)
    );
    assert_eq!(
        parse_colour("rgb(100%, 0%, 300, 1)").ok(),
        None,
        "rgb takes exactly three components"
    );
}

#[test]
fn parses_hsl_red() {
    assert_eq!(
        parse_colour("hsl(0, 100%, 50%)").unwrap(),
        Colourb::new(255, 0, 0, 255)
    );
}

#[test]
fn named_colours_are_case_insensitive() {
    assert_eq!(parse_colour("Transparent").unwrap(), Colourb::transparent());
    assert_eq!(parse_colour("navy").unwrap(), Colourb::new(0, 0, 128, 255));
    assert!(parse_colour("not-a-colour").is_err());
}
