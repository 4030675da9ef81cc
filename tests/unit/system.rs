use super::*;

#[test]
fn normalize_collapses_parent_segments() {
    let cases = [
        ("blue.png", "blue.png"),
        ("/data/blue.png", "/data/blue.png"),
        (
            "/data/gui/../../data/images/icons/blue.png",
            "/data/images/icons/blue.png",
        ),
        ("../data/blue.png", "../data/blue.png"),
        ("data/../blue.png", "blue.png"),
        ("x./data/../blue.png", "x./blue.png"),
        ("/data/../blue.png", "/blue.png"),
        ("data/gui/images/../../blue.png", "data/blue.png"),
        ("file://data/blue.png", "file://data/blue.png"),
        ("./data/blue.png", "data/blue.png"),
        ("data/../../blue.png", "../blue.png"),
    ];
    for (input, expected) in cases {
        assert_eq!(normalize_path(input), expected, "normalize({input:?})");
    }
}

#[test]
fn normalize_keeps_degenerate_paths() {
    for path in ["", "./", "../", "/", "/../"] {
        assert_eq!(normalize_path(path), path);
    }
}

#[test]
fn join_resolves_against_the_document_directory() {
    let cases = [
        ("data/gui/d.rml", "blue.png", "data/gui/blue.png"),
        (
            "data/gui/d.rml",
            "../../data/images/icons/blue.png",
            "data/images/icons/blue.png",
        ),
        ("/data/d.rml", "../images/icons/blue.png", "/images/icons/blue.png"),
        (r"C:\data\d.rml", "blue.png", "C:/data/blue.png"),
        (r"C:\data\d.rml", r"..\blue.png", "C:/blue.png"),
        ("file://C:/data/d.rml", "img/blue.png", "file://C:/data/img/blue.png"),
        ("file://data/d.rml", "img/../../blue.png", "file://blue.png"),
        ("file://data/d.rml", "file://C:/data/blue.png", "file://C:/data/blue.png"),
        ("file:///data/d.rml", "../blue.png", "file:///blue.png"),
        ("file:///data/d.rml", "img/../blue.png", "file:///data/blue.png"),
        ("/d.rml", "../data/blue.png", "/../data/blue.png"),
        ("data/gui/d.rml", "/images/icons/blue.png", "/images/icons/blue.png"),
    ];
    for (document, path, expected) in cases {
        assert_eq!(
            join_path(document, path),
            expected,
            "join({document:?}, {path:?})"
        );
    }
}

#[test]
fn default_system_keeps_clipboard_and_cursor() {
    let system = DefaultSystem::new();
    assert_eq!(system.clipboard_text(), "");
    system.set_clipboard_text("copied");
    assert_eq!(system.clipboard_text(), "copied");

    system.set_mouse_cursor("text");
    assert_eq!(system.mouse_cursor(), "text");

    let t0 = system.elapsed_time();
    assert!(t0 >= 0.0);
    assert!(system.elapsed_time() >= t0);
    assert!(system.log_message(LogLevel::Warning, "routed to tracing"));
}

#[test]
fn trait_defaults_are_inert() {
    struct Bare;
    impl SystemInterface for Bare {}

    let bare = Bare;
    bare.set_clipboard_text("lost");
    assert_eq!(bare.clipboard_text(), "");
    assert_eq!(bare.elapsed_time(), 0.0);
    assert_eq!(bare.join_path("a/b.rml", "c.png"), "a/c.png");
}
