use super::*;

#[test]
fn premultiply_rounds_to_nearest() {
    let c = Colourb::new(255, 128, 0, 128).to_premultiplied();
    assert_eq!(c, Colourb::new(128, 64, 0, 128));
    assert_eq!(Colourb::white().to_premultiplied(), Colourb::white());
}

#[test]
fn outward_snapping_covers_fractional_rect() {
    let r = Rectanglei::from_rect_outward(Rect::new(0.5, 1.2, 10.1, 9.9));
    assert_eq!(r, Rectanglei::from_corners(0, 1, 11, 10));
}

#[test]
fn intersect_and_join() {
    let a = Rectanglei::from_position_size(0, 0, 10, 10);
    let b = Rectanglei::from_position_size(5, 5, 10, 10);
    assert_eq!(a.intersect(b), Rectanglei::from_corners(5, 5, 10, 10));
    assert_eq!(a.join(b), Rectanglei::from_corners(0, 0, 15, 15));

    let far = Rectanglei::from_position_size(50, 50, 1, 1);
    assert!(a.intersect(far).is_empty());
    assert_eq!(a.intersect(far).area(), 0);
    assert_eq!(Rectanglei::default().join(a), a);
}

#[test]
fn extend_grows_each_edge() {
    let a = Rectanglei::from_position_size(10, 10, 10, 10);
    let e = a.extend(Insets::uniform(2.5));
    assert_eq!(e, Rectanglei::from_corners(7, 7, 23, 23));
    assert!(e.contains(a));
}
