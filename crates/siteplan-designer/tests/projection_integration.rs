//! Parcel import, coordinate-space detection, projection and grid snapping.

use proptest::prelude::*;
use siteplan_core::GeometryError;
use siteplan_designer::{
    parse_parcel_str, CoordinateSpace, Element, ElementSource, ElementType, GeometryProjector,
    GridSnapper, LonLat, Point, Ring,
};

fn ring(points: &[(f64, f64)]) -> Ring {
    Ring::new(points.iter().map(|&(x, y)| Point::new(x, y)).collect()).expect("ring")
}

#[test]
fn test_projection_known_values() {
    let origin = GeometryProjector::to_projected(LonLat::new(0.0, 0.0));
    assert!(origin.approx_eq(&Point::new(0.0, 0.0), 1e-9));

    let p = GeometryProjector::to_projected(LonLat::new(180.0, 0.0));
    assert!((p.x - 20_037_508.342_789_244).abs() < 1e-6);

    let geo = GeometryProjector::to_geographic(Point::new(0.0, 0.0));
    assert!(geo.lon.abs() < 1e-12 && geo.lat.abs() < 1e-12);
}

#[test]
fn test_detects_coordinate_space() {
    let projector = GeometryProjector::new();
    assert_eq!(
        projector.detect_space(Point::new(-122.4, 37.8)),
        CoordinateSpace::Geographic
    );
    assert_eq!(
        projector.detect_space(Point::new(-13_627_000.0, 4_548_000.0)),
        CoordinateSpace::Projected
    );
    assert_eq!(
        projector.detect_space(Point::new(12.0, 1000.5)),
        CoordinateSpace::Projected
    );
}

#[test]
fn test_normalize_moves_min_corner_to_origin() {
    let raw = ring(&[(100.0, 200.0), (160.0, 200.0), (160.0, 240.0), (100.0, 240.0)]);
    let normalized = GeometryProjector::normalize(&raw).expect("normalized");
    assert_eq!(normalized.bounds.min_x, 0.0);
    assert_eq!(normalized.bounds.min_y, 0.0);
    assert_eq!(normalized.bounds.width(), 60.0);
    assert_eq!(normalized.original_bounds.min_x, 100.0);
    assert_eq!(normalized.ring.vertex(0), Some(Point::new(0.0, 0.0)));
}

#[test]
fn test_process_projected_metres_to_feet() {
    let raw = ring(&[
        (500_000.0, 4_000_000.0),
        (500_100.0, 4_000_000.0),
        (500_100.0, 4_000_050.0),
        (500_000.0, 4_000_050.0),
    ]);
    let processed = GeometryProjector::new().try_process(&raw).expect("processed");
    assert_eq!(processed.source_space, CoordinateSpace::Projected);
    assert!((processed.bounds.width() - 328.084).abs() < 1e-6);
    assert!((processed.bounds.height() - 164.042).abs() < 1e-6);
    assert_eq!(processed.bounds.min_x, 0.0);

    let corner = processed.local_to_projected(Point::new(328.084, 164.042));
    assert!(corner.approx_eq(&Point::new(500_100.0, 4_000_050.0), 1e-6));
}

#[test]
fn test_process_geographic_parcel() {
    let raw = ring(&[
        (-122.4010, 37.7900),
        (-122.4000, 37.7900),
        (-122.4000, 37.7908),
        (-122.4010, 37.7908),
    ]);
    let processed = GeometryProjector::new().process(&raw).expect("processed");
    assert_eq!(processed.source_space, CoordinateSpace::Geographic);
    // 0.001 deg of longitude is ~111 m on the Mercator plane.
    assert!((processed.bounds.width() - 365.2).abs() < 1.0);
    assert!(processed.bounds.height() > 0.0);

    let back = processed.local_to_geographic(Point::new(0.0, 0.0));
    assert!((back.lon + 122.4010).abs() < 1e-9);
    assert!((back.lat - 37.7900).abs() < 1e-9);
}

#[test]
fn test_process_rejects_collinear_parcel() {
    let raw = Ring::from(vec![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [0.0, 0.0]]);
    let err = GeometryProjector::new().try_process(&raw).unwrap_err();
    assert!(matches!(err, GeometryError::ZeroExtent { .. }));
    assert!(GeometryProjector::new().process(&raw).is_none());
}

#[test]
fn test_parse_feature_collection_picks_largest() {
    let json = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {}, "geometry": {
                "type": "Polygon",
                "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]]
            }},
            {"type": "Feature", "properties": {}, "geometry": {
                "type": "MultiPolygon",
                "coordinates": [
                    [[[0,0],[5,0],[5,5],[0,5],[0,0]]],
                    [[[10,10],[30,10],[30,30],[10,30],[10,10]], [[12,12],[13,12],[13,13],[12,12]]]
                ]
            }}
        ]
    }"#;
    let parcel = parse_parcel_str(json).expect("parcel");
    let b = parcel.bounds().expect("bounds");
    assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (10.0, 10.0, 30.0, 30.0));
    assert!(parcel.is_closed());
}

#[test]
fn test_parse_rejects_point_geometry() {
    let err = parse_parcel_str(r#"{"type": "Point", "coordinates": [1, 2]}"#).unwrap_err();
    assert!(matches!(err, GeometryError::UnsupportedShape { .. }));
    assert!(parse_parcel_str("not json").is_err());
}

#[test]
fn test_grid_snap_scenario() {
    let grid = GridSnapper::new(true, 10.0);
    let snapped = grid.snap(Point::new(13.0, 27.0));
    assert!(snapped.approx_eq(&Point::new(10.0, 30.0), 1e-9));

    let disabled = GridSnapper::new(false, 10.0);
    assert_eq!(disabled.snap(Point::new(13.0, 27.0)), Point::new(13.0, 27.0));
}

proptest! {
    #[test]
    fn prop_projection_round_trip(lon in -180.0..180.0f64, lat in -85.0..85.0f64) {
        let projected = GeometryProjector::to_projected(LonLat::new(lon, lat));
        let back = GeometryProjector::to_geographic(projected);
        prop_assert!((back.lon - lon).abs() < 1e-6);
        prop_assert!((back.lat - lat).abs() < 1e-6);
    }

    #[test]
    fn prop_normalized_min_is_zero(
        ox in -1.0e6..1.0e6f64,
        oy in -1.0e6..1.0e6f64,
        w in 1.0..500.0f64,
        h in 1.0..500.0f64,
    ) {
        let raw = ring(&[(ox, oy), (ox + w, oy), (ox + w, oy + h), (ox, oy + h)]);
        let normalized = GeometryProjector::normalize(&raw).expect("normalized");
        let b = normalized.ring.bounds().expect("bounds");
        prop_assert!(b.min_x.abs() < 1e-6);
        prop_assert!(b.min_y.abs() < 1e-6);
    }

    #[test]
    fn prop_grid_snap_is_idempotent(x in -1.0e4..1.0e4f64, y in -1.0e4..1.0e4f64, pitch in 1.0..50.0f64) {
        let grid = GridSnapper::new(true, pitch);
        let once = grid.snap(Point::new(x, y));
        let twice = grid.snap(once);
        prop_assert!(once.approx_eq(&twice, 1e-6));
    }
}

#[test]
fn test_triangular_parcel_is_processed_but_not_an_element() {
    let triangle = ring(&[(0.0, 0.0), (100.0, 0.0), (50.0, 80.0)]);
    let processed = GeometryProjector::new()
        .try_process(&triangle)
        .expect("triangular parcel");
    assert_eq!(processed.bounds.min_x, 0.0);
    assert_eq!(processed.bounds.min_y, 0.0);

    let err = Element::new("t", ElementType::Building, triangle, ElementSource::UserDrawn)
        .expect_err("elements need four corners");
    assert!(matches!(
        err,
        GeometryError::DegenerateRing {
            distinct: 3,
            required: 4
        }
    ));
}

#[test]
fn test_two_point_parcel_is_rejected() {
    let err = Ring::new(vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)]).expect_err("degenerate");
    assert!(matches!(err, GeometryError::DegenerateRing { distinct: 2, .. }));
}
