use tessera_core::{Rectangle, Size, StyleSpec, media_url, style_url};
use tessera_error::ValidationErrorKind;

#[test]
fn rectangle_inside_bounds() {
    let rect = Rectangle::new(0, 0, 100, 100);
    assert!(rect.validate_within("original", 100, 100).is_ok());
}

#[test]
fn rectangle_past_right_edge_is_rejected() {
    let rect = Rectangle::new(150, 0, 100, 100);
    let err = rect.validate_within("original", 200, 200).unwrap_err();
    assert!(matches!(err.kind, ValidationErrorKind::CropOutOfBounds { .. }));
}

#[test]
fn degenerate_rectangle_is_rejected() {
    let rect = Rectangle::new(0, 0, 0, 10);
    let err = rect.validate_within("thumb", 200, 200).unwrap_err();
    assert!(matches!(err.kind, ValidationErrorKind::InvalidRectangle { .. }));
}

#[test]
fn persisted_geometry_uses_pascal_case() {
    let json = serde_json::to_string(&Rectangle::new(1, 2, 3, 4)).unwrap();
    assert_eq!(json, r#"{"X":1,"Y":2,"Width":3,"Height":4}"#);

    let size: Size = serde_json::from_str(r#"{"Width":50,"Height":40}"#).unwrap();
    assert_eq!(size, Size::new(50, 40));
}

#[test]
fn style_urls() {
    assert_eq!(style_url("a/b.png", "thumb"), "a/b.thumb.png");
    assert_eq!(style_url("/system/x.y/file.tar.gz", "s"), "/system/x.y/file.tar.s.gz");
}

#[test]
fn media_urls_are_protocol_relative() {
    assert_eq!(media_url("https://cdn.test", &["a", "/b/"]), "//cdn.test/a/b");
    assert_eq!(media_url("", &[]), "//");
}

#[test]
fn style_with_crop_is_active() {
    let style = StyleSpec::new("thumb").with_crop(Rectangle::new(0, 0, 5, 5));
    assert!(style.is_active());
    assert_eq!(style.name(), "thumb");
    assert_eq!(*style.size(), None);
}
