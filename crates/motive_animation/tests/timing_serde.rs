//! Timing functions as configuration values (feature `serde`)

#![cfg(feature = "serde")]

use motive_animation::{Timing, Vec2};

#[test]
fn test_unit_variants_are_plain_strings() {
    let timing: Timing = serde_json::from_str("\"smooth_start\"").unwrap();
    assert!(matches!(timing, Timing::SmoothStart));
    assert_eq!(serde_json::to_string(&Timing::Bounce).unwrap(), "\"bounce\"");
}

#[test]
fn test_combinators_nest() {
    let timing: Timing = serde_json::from_str(r#"{"ease_out": {"pow": 3.0}}"#).unwrap();
    assert_eq!(format!("{:?}", timing), "EaseOut(Pow(3.0))");
    assert_eq!(timing.apply(1.0), 1.0);
}

#[test]
fn test_poly_and_bezier() {
    let poly: Timing = serde_json::from_str(r#"{"poly": [1.0, 0.0, 0.0]}"#).unwrap();
    assert_eq!(poly.apply(0.5), 0.25);

    let bezier: Timing =
        serde_json::from_str(r#"{"cubic_bezier": [0.25, 0.1, 0.25, 1.0]}"#).unwrap();
    assert!(matches!(bezier, Timing::CubicBezier(..)));
}

#[test]
fn test_custom_cannot_be_serialized() {
    assert!(serde_json::to_string(&Timing::custom(|p| p)).is_err());
}

#[test]
fn test_vec2_fields() {
    let v: Vec2 = serde_json::from_str(r#"{"x": 1.5, "y": -2.0}"#).unwrap();
    assert_eq!(v, Vec2::new(1.5, -2.0));
}
