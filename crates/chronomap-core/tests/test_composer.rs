use image::{Rgba, RgbaImage};

use chronomap_core::render::{DrawRequest, FrameComposer};
use chronomap_core::view::ScreenRect;

fn damage(x: f64, y: f64, w: f64, h: f64) -> DrawRequest {
    DrawRequest::Damage(vec![ScreenRect::new(x, y, w, h)])
}

#[test]
fn test_full_request_detection() {
    assert!(DrawRequest::Full.is_full(200, 100));
    assert!(damage(0.0, 0.0, 200.0, 100.0).is_full(200, 100));
    assert!(damage(-5.0, -5.0, 300.0, 300.0).is_full(200, 100));
    assert!(!damage(10.0, 10.0, 20.0, 20.0).is_full(200, 100));
    assert!(!DrawRequest::Damage(Vec::new()).is_full(200, 100));
}

#[test]
fn test_recomposite_unless_clean_animation_frame() {
    let mut composer = FrameComposer::new();
    let small = damage(10.0, 10.0, 5.0, 5.0);
    assert!(composer.needs_recomposite(&small, 200, 100));

    composer.mark_animation_frame();
    // Nothing stored yet.
    assert!(composer.needs_recomposite(&small, 200, 100));

    composer.store_base(Some(&RgbaImage::new(200, 100)));
    composer.finish_frame();
    composer.mark_animation_frame();
    assert!(composer.is_animation_frame());
    assert!(!composer.needs_recomposite(&small, 200, 100));
    assert!(composer.needs_recomposite(&DrawRequest::Full, 200, 100));
    assert!(composer.needs_recomposite(&small, 300, 100));

    composer.mark_invalidated();
    assert!(composer.needs_recomposite(&small, 200, 100));

    composer.finish_frame();
    assert!(!composer.is_animation_frame());
    assert!(composer.needs_recomposite(&small, 200, 100));
}

#[test]
fn test_store_and_restore_base() {
    let mut composer = FrameComposer::new();
    let base = RgbaImage::from_pixel(4, 3, Rgba([1, 2, 3, 255]));
    composer.store_base(Some(&base));

    let mut dst = RgbaImage::new(4, 3);
    assert!(composer.restore_base(&mut dst));
    assert_eq!(dst, base);

    let mut wrong = RgbaImage::new(5, 3);
    assert!(!composer.restore_base(&mut wrong));

    composer.store_base(None);
    assert!(!composer.restore_base(&mut dst));
}
