use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        StyleError::registration("x")
            .to_string()
            .contains("registration error:")
    );
    assert!(StyleError::parse("x").to_string().contains("parse error:"));
    assert!(
        StyleError::instancing("x")
            .to_string()
            .contains("instancing error:")
    );
    assert!(
        StyleError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = StyleError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
