//! Tests for region bounding boxes.

use atlas_common::bbox::{BboxParseError, BoundingBox};

// ============================================================================
// Constructor tests
// ============================================================================

#[test]
fn test_bbox_new() {
    let bbox = BoundingBox::new(-180.0, -90.0, 180.0, 90.0);
    assert_eq!(bbox, BoundingBox::WORLD);
    assert_eq!(BoundingBox::default(), BoundingBox::WORLD);
}

// ============================================================================
// parse tests
// ============================================================================

#[test]
fn test_parse_with_whitespace() {
    let bbox = BoundingBox::parse(" 124.5, 33.25 ,131.75,38.5").unwrap();
    assert!((bbox.min_x - 124.5).abs() < 1e-9);
    assert!((bbox.min_y - 33.25).abs() < 1e-9);
    assert!((bbox.max_x - 131.75).abs() < 1e-9);
    assert!((bbox.max_y - 38.5).abs() < 1e-9);
}

#[test]
fn test_parse_negative() {
    let bbox = BoundingBox::parse("-180,-90,180,90").unwrap();
    assert_eq!(bbox, BoundingBox::WORLD);
}

#[test]
fn test_parse_too_few_parts() {
    let result = BoundingBox::parse("0,0,100");
    assert!(matches!(result, Err(BboxParseError::InvalidFormat(_))));
}

#[test]
fn test_parse_too_many_parts() {
    let result = BoundingBox::parse("0,0,10,10,20");
    assert!(matches!(result, Err(BboxParseError::InvalidFormat(_))));
}

#[test]
fn test_parse_invalid_number() {
    let result = BoundingBox::parse("0,abc,10,10");
    assert!(matches!(result, Err(BboxParseError::InvalidNumber(ref s)) if s == "abc"));
}

#[test]
fn test_parse_inverted() {
    let result = BoundingBox::parse("10,10,5,5");
    assert!(matches!(result, Err(BboxParseError::Inverted(_))));
}

#[test]
fn test_parse_outside_world() {
    let result = BoundingBox::parse("0,0,200,10");
    assert!(matches!(result, Err(BboxParseError::OutsideWorld(_))));
}

// ============================================================================
// contains_point tests
// ============================================================================

#[test]
fn test_contains_point_inside_and_edges() {
    let korea = BoundingBox::new(124.0, 33.0, 132.0, 39.0);
    assert!(korea.contains_point(126.97, 37.56));
    assert!(korea.contains_point(124.0, 33.0));
    assert!(korea.contains_point(132.0, 39.0));
}

#[test]
fn test_contains_point_outside() {
    let korea = BoundingBox::new(124.0, 33.0, 132.0, 39.0);
    // Tokyo
    assert!(!korea.contains_point(139.69, 35.68));
    // lat/lon swapped
    assert!(!korea.contains_point(37.56, 126.97));
}

#[test]
fn test_leaflet_corners() {
    let bbox = BoundingBox::new(124.0, 33.0, 132.0, 39.0);
    assert_eq!(bbox.to_lat_lon_corners(), [[33.0, 124.0], [39.0, 132.0]]);
}
