use super::*;

#[test]
fn parses_members_and_indices() {
    let a = DataAddress::parse("rows[2].cells[0].title").unwrap();
    assert_eq!(
        a.entries(),
        &[
            AddressEntry::Name("rows".into()),
            AddressEntry::Index(2),
            AddressEntry::Name("cells".into()),
            AddressEntry::Index(0),
            AddressEntry::Name("title".into()),
        ]
    );
    assert_eq!(a.root_name(), "rows");
    assert_eq!(a.to_string(), "rows[2].cells[0].title");
}

#[test]
fn rejects_malformed_addresses() {
    for bad in ["", "a.", "a[", "a[x]", "1abc", "a..b", "a[1]b"] {
        assert!(DataAddress::parse(bad).is_err(), "{bad} should be rejected");
    }
}
