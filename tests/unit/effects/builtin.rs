use super::*;
use crate::effects::decl::{EffectDeclarationList, EffectListKind};

struct Nothing;

impl EffectsElement for Nothing {
    fn property(&self, _id: PropertyId) -> Option<&crate::style::property::Property> {
        None
    }
    fn box_rect(&self, _area: BoxArea) -> Rect {
        Rect::ZERO
    }
    fn absolute_offset(&self) -> Vec2 {
        Vec2::ZERO
    }
    fn clipping_region(&self, _clip_to_self: bool) -> Option<crate::foundation::core::Rectanglei> {
        None
    }
}

fn filter_decl(text: &str) -> EffectDeclaration {
    EffectDeclarationList::parse(text, EffectListKind::Filter)
        .unwrap()
        .list
        .remove(0)
}

#[test]
fn solid_needs_exactly_one_valid_colour() {
    let ok = EffectDeclarationList::parse("solid(#00ff00)", EffectListKind::Decorator).unwrap();
    let solid = SolidDecorator::from_declaration(&ok.list[0]).unwrap();
    assert_eq!(solid.colour, Colourb::new(0, 255, 0, 255));

    let bad = EffectDeclarationList::parse("solid(nope)", EffectListKind::Decorator).unwrap();
    assert!(SolidDecorator::from_declaration(&bad.list[0]).is_err());
    let empty = EffectDeclarationList::parse("solid", EffectListKind::Decorator).unwrap();
    assert!(SolidDecorator::from_declaration(&empty.list[0]).is_err());
}

fn opacity(text: &str) -> StyleResult<OpacityFilter> {
    OpacityFilter::from_declaration(&filter_decl(text))
}

fn blur(text: &str) -> StyleResult<BlurFilter> {
    BlurFilter::from_declaration(&filter_decl(text))
}

fn drop_shadow(text: &str) -> StyleResult<DropShadowFilter> {
    DropShadowFilter::from_declaration(&filter_decl(text))
}

#[test]
fn opacity_accepts_numbers_and_percentages() {
    assert_eq!(opacity("opacity(0.25)").unwrap().value, 0.25);
    assert_eq!(opacity("opacity(50%)").unwrap().value, 0.5);
    assert_eq!(opacity("opacity(3)").unwrap().value, 1.0);
    assert!(opacity("opacity(4px)").is_err());
}

#[test]
fn blur_extends_ink_overflow_by_three_sigma() {
    let blur_2px = blur("blur(2px)").unwrap();
    let mut region = Rect::new(0.0, 0.0, 10.0, 10.0);
    blur_2px.extend_ink_overflow(&Nothing, &mut region);
    assert_eq!(region, Rect::new(-6.0, -6.0, 16.0, 16.0));

    assert!(blur("blur(-1px)").is_err());
    assert!(blur("blur(red)").is_err());
}

#[test]
fn drop_shadow_takes_colour_first_or_last() {
    let a = drop_shadow("drop-shadow(#ff0000 2px 3px 4px)").unwrap();
    let b = drop_shadow("drop-shadow(2px 3px 4px #ff0000)").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.offset, Vec2::new(2.0, 3.0));
    assert_eq!(a.sigma, 2.0);

    let plain = drop_shadow("drop-shadow(1px 1px)").unwrap();
    assert_eq!(plain.colour, Colourb::black());
    assert_eq!(plain.sigma, 0.0);

    assert!(drop_shadow("drop-shadow(1px)").is_err());
    assert!(drop_shadow("drop-shadow(1px #fff 1px)").is_err());
}

#[test]
fn drop_shadow_overflow_covers_the_offset_shadow() {
    let shadow = DropShadowFilter {
        colour: Colourb::black(),
        offset: Vec2::new(10.0, 0.0),
        sigma: 0.0,
    };
    let mut region = Rect::new(0.0, 0.0, 5.0, 5.0);
    shadow.extend_ink_overflow(&Nothing, &mut region);
    assert_eq!(region, Rect::new(0.0, 0.0, 15.0, 5.0));
}
