use super::*;

fn decorators(text: &str) -> Option<EffectDeclarationList> {
    EffectDeclarationList::parse(text, EffectListKind::Decorator)
}

fn filters(text: &str) -> Option<EffectDeclarationList> {
    EffectDeclarationList::parse(text, EffectListKind::Filter)
}

#[test]
fn decorator_lists_split_on_commas_and_keep_paint_area() {
    let list = decorators("solid(#ff0000) border-box, solid(rgba(0, 0, 255, 128))").unwrap();
    assert_eq!(list.list.len(), 2);
    assert_eq!(list.list[0].name, "solid");
    assert_eq!(list.list[0].args, vec!["#ff0000".to_owned()]);
    assert_eq!(list.list[0].paint_area, BoxArea::Border);
    assert_eq!(list.list[1].args, vec!["rgba(0, 0, 255, 128)".to_owned()]);
    assert_eq!(list.list[1].paint_area, BoxArea::Auto);
}

#[test]
fn filter_lists_split_on_whitespace() {
    let list = filters("blur(4px) opacity(0.5)").unwrap();
    let names: Vec<_> = list.list.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["blur", "opacity"]);
    assert_eq!(list.list[0].args, vec!["4px".to_owned()]);
}

#[test]
fn none_is_an_empty_list() {
    assert!(filters("none").unwrap().is_empty());
}

#[test]
fn malformed_entries_are_rejected() {
    assert!(filters("blur(4px").is_none());
    assert!(decorators("so!id(red)").is_none());
    assert!(decorators("solid(red) sideways").is_none());
}
