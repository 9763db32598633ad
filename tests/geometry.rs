use affirmation_adventures::geometry::Rect;
use glam::Vec2;

#[test]
fn test_edges() {
    let r = Rect::new(1.0, 2.0, 3.0, 4.0);
    assert_eq!(r.right(), 4.0);
    assert_eq!(r.top(), 6.0);
    assert_eq!(r.origin(), Vec2::new(1.0, 2.0));
    assert_eq!(r.size(), Vec2::new(3.0, 4.0));
}

#[test]
fn test_overlap_is_symmetric_and_strict() {
    let a = Rect::new(0.0, 0.0, 1.0, 1.0);
    let cases = [
        (Rect::new(0.5, 0.5, 1.0, 1.0), true),
        (Rect::new(0.0, 0.0, 1.0, 1.0), true),
        (Rect::new(-1.0, -1.0, 3.0, 3.0), true),
        (Rect::new(1.0, 0.0, 1.0, 1.0), false),
        (Rect::new(0.0, 1.0, 1.0, 1.0), false),
        (Rect::new(1.0, 1.0, 1.0, 1.0), false),
        (Rect::new(5.0, 5.0, 1.0, 1.0), false),
    ];
    for (b, expected) in cases {
        assert_eq!(a.overlaps(&b), expected, "{b:?}");
        assert_eq!(b.overlaps(&a), expected, "{b:?}");
    }
}
