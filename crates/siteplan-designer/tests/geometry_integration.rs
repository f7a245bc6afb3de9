//! Element geometry operations: hit-testing, move, rotate, vertex edits,
//! alignment, copy and delete.

use proptest::prelude::*;
use siteplan_designer::geometry::{
    align_elements, bounds_of, centroid, copy_elements, delete_elements, move_by,
    nearest_vertex, point_in_ring, rotate, rotation_handle_position, topmost_element_at,
    update_vertex,
};
use siteplan_designer::{AlignMode, Element, ElementSource, ElementType, Point, Ring};
use siteplan_settings::YAxis;
use std::collections::BTreeSet;

fn rect(id: &str, kind: ElementType, min: (f64, f64), size: (f64, f64)) -> Element {
    let center = Point::new(min.0 + size.0 / 2.0, min.1 + size.1 / 2.0);
    Element::new(id, kind, Ring::rectangle(center, size.0, size.1), ElementSource::Generated)
        .expect("element")
}

fn ids(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_move_scenario() {
    let element = rect("b", ElementType::Building, (0.0, 0.0), (60.0, 40.0));
    let moved = move_by(&element, 10.0, 5.0, &element.geometry);
    let b = bounds_of(&moved).expect("bounds");
    assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (10.0, 5.0, 70.0, 45.0));
    assert_eq!(moved.id, element.id);
    assert!(moved.geometry.is_closed());
}

#[test]
fn test_move_uses_captured_source() {
    let element = rect("b", ElementType::Building, (0.0, 0.0), (60.0, 40.0));
    let source = element.geometry.clone();
    let mut current = element.clone();
    for step in 1..=100 {
        let total = step as f64 * 0.1;
        current = move_by(&current, total, 0.0, &source);
    }
    let b = bounds_of(&current).expect("bounds");
    assert!((b.min_x - 10.0).abs() < 1e-9);
}

#[test]
fn test_rotate_full_turn_is_identity() {
    let element = rect("b", ElementType::Building, (0.0, 0.0), (60.0, 40.0));
    let rotated = rotate(&element, 360.0, None, &element.geometry);
    assert!(rotated.geometry.approx_eq(&element.geometry, 1e-9));
    assert_eq!(rotated.rotation_degrees(), 360.0);
}

#[test]
fn test_rotate_quarter_turn_about_centroid() {
    let element = rect("b", ElementType::Building, (0.0, 0.0), (60.0, 40.0));
    let quarter = rotate(&element, 90.0, None, &element.geometry);
    let first = quarter.geometry.vertex(0).expect("vertex");
    assert!(first.approx_eq(&Point::new(50.0, -10.0), 1e-9));

    let half = rotate(&element, 180.0, None, &element.geometry);
    let first = half.geometry.vertex(0).expect("vertex");
    assert!(first.approx_eq(&Point::new(60.0, 40.0), 1e-9));

    let c = centroid(&quarter).expect("centroid");
    assert!(c.approx_eq(&Point::new(30.0, 20.0), 1e-9));
    assert!(quarter.geometry.is_closed());
}

#[test]
fn test_rotation_accumulates_on_element() {
    let element = rect("b", ElementType::Building, (0.0, 0.0), (10.0, 10.0)).with_rotation(30.0);
    let rotated = rotate(&element, 45.0, Some(Point::new(0.0, 0.0)), &element.geometry);
    assert_eq!(rotated.rotation_degrees(), 75.0);
}

#[test]
fn test_point_in_ring() {
    let ring = Ring::new(vec![
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(10.0, 10.0),
        Point::new(5.0, 3.0),
        Point::new(0.0, 10.0),
    ])
    .expect("ring");
    assert!(point_in_ring(2.0, 2.0, &ring));
    assert!(point_in_ring(9.0, 8.0, &ring));
    // Inside the notch.
    assert!(!point_in_ring(5.0, 8.0, &ring));
    assert!(!point_in_ring(-1.0, 5.0, &ring));
    assert!(!point_in_ring(15.0, 5.0, &ring));
}

#[test]
fn test_topmost_precedence() {
    let elements = vec![
        rect("b", ElementType::Building, (0.0, 0.0), (50.0, 50.0)),
        rect("g", ElementType::Greenspace, (0.0, 0.0), (100.0, 100.0)),
        rect("a", ElementType::ParkingAisle, (0.0, 0.0), (80.0, 80.0)),
        rect("p", ElementType::Parking, (0.0, 0.0), (60.0, 60.0)),
    ];
    let hit = |x, y| topmost_element_at(&elements, x, y).map(|e| e.id.as_str());
    assert_eq!(hit(10.0, 10.0), Some("b"));
    assert_eq!(hit(55.0, 55.0), Some("p"));
    assert_eq!(hit(70.0, 70.0), Some("a"));
    assert_eq!(hit(90.0, 90.0), Some("g"));
    assert_eq!(hit(200.0, 200.0), None);
}

#[test]
fn test_later_element_wins_within_rank() {
    let elements = vec![
        rect("first", ElementType::Building, (0.0, 0.0), (50.0, 50.0)),
        rect("second", ElementType::Building, (10.0, 10.0), (50.0, 50.0)),
    ];
    let hit = topmost_element_at(&elements, 20.0, 20.0).map(|e| e.id.as_str());
    assert_eq!(hit, Some("second"));
}

#[test]
fn test_nearest_vertex_threshold() {
    let element = rect("b", ElementType::Building, (0.0, 0.0), (60.0, 40.0));
    assert_eq!(nearest_vertex(&element, 59.0, 39.0, 5.0), Some(2));
    assert_eq!(nearest_vertex(&element, 30.0, 20.0, 5.0), None);
    // Strictly less than the threshold.
    assert_eq!(nearest_vertex(&element, 65.0, 40.0, 5.0), None);
}

#[test]
fn test_update_vertex() {
    let element = rect("b", ElementType::Building, (0.0, 0.0), (60.0, 40.0));
    let edited = update_vertex(&element, 1, 70.0, -5.0).expect("in range");
    assert_eq!(edited.geometry.vertex(1), Some(Point::new(70.0, -5.0)));
    assert_eq!(edited.geometry.vertex(0), element.geometry.vertex(0));

    let last = element.geometry.len() - 1;
    let edited = update_vertex(&element, last, -1.0, -1.0).expect("closing");
    assert!(edited.geometry.is_closed());
    assert_eq!(edited.geometry.vertex(0), Some(Point::new(-1.0, -1.0)));

    assert!(update_vertex(&element, 99, 0.0, 0.0).is_none());
}

#[test]
fn test_align_left() {
    let elements = vec![
        rect("a", ElementType::Building, (10.0, 0.0), (20.0, 20.0)),
        rect("b", ElementType::Building, (40.0, 50.0), (30.0, 10.0)),
        rect("c", ElementType::Parking, (90.0, 0.0), (10.0, 10.0)),
    ];
    let aligned = align_elements(&elements, &ids(&["a", "b"]), AlignMode::Left);
    let min_x: Vec<f64> = aligned
        .iter()
        .map(|e| bounds_of(e).expect("bounds").min_x)
        .collect();
    assert_eq!(min_x, vec![10.0, 10.0, 90.0]);
    // Only the aligned axis moves.
    assert_eq!(bounds_of(&aligned[1]).expect("bounds").min_y, 50.0);
}

#[test]
fn test_align_top_and_middle() {
    let elements = vec![
        rect("a", ElementType::Building, (0.0, 0.0), (10.0, 20.0)),
        rect("b", ElementType::Building, (20.0, 50.0), (10.0, 10.0)),
    ];
    let top = align_elements(&elements, &ids(&["a", "b"]), AlignMode::Top);
    assert!(top.iter().all(|e| bounds_of(e).expect("b").max_y == 60.0));

    let middle = align_elements(&elements, &ids(&["a", "b"]), AlignMode::Middle);
    for e in &middle {
        assert!((bounds_of(e).expect("b").center().y - 30.0).abs() < 1e-9);
    }
}

#[test]
fn test_copy_offsets_and_renames() {
    let elements = vec![
        rect("a", ElementType::Building, (0.0, 0.0), (20.0, 20.0))
            .with_property("name", "Block A"),
        rect("b", ElementType::Greenspace, (50.0, 0.0), (20.0, 20.0)),
    ];
    let mut n = 0;
    let copies = copy_elements(&elements, &ids(&["a", "b"]), (20.0, 20.0), || {
        n += 1;
        format!("copy-{}", n)
    });
    assert_eq!(copies.len(), 2);
    assert_eq!(copies[0].id, "copy-1");
    assert_eq!(copies[0].name(), Some("Block A (copy)"));
    assert_eq!(copies[1].name(), Some("greenspace (copy)"));
    let b = bounds_of(&copies[1]).expect("bounds");
    assert_eq!((b.min_x, b.min_y), (70.0, 20.0));
    assert_eq!(copies[1].element_type, ElementType::Greenspace);
}

#[test]
fn test_delete_keeps_others_in_order() {
    let elements = vec![
        rect("a", ElementType::Building, (0.0, 0.0), (20.0, 20.0)),
        rect("b", ElementType::Building, (30.0, 0.0), (20.0, 20.0)),
        rect("c", ElementType::Building, (60.0, 0.0), (20.0, 20.0)),
    ];
    let remaining = delete_elements(&elements, &ids(&["b", "missing"]));
    let left: Vec<&str> = remaining.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(left, vec!["a", "c"]);
}

#[test]
fn test_rotation_handle_follows_axis() {
    let element = rect("b", ElementType::Building, (0.0, 0.0), (60.0, 40.0));
    let up = rotation_handle_position(&element, 2.0, 30.0, YAxis::Up).expect("handle");
    assert!(up.approx_eq(&Point::new(30.0, 55.0), 1e-9));
    let down = rotation_handle_position(&element, 2.0, 30.0, YAxis::Down).expect("handle");
    assert!(down.approx_eq(&Point::new(30.0, -15.0), 1e-9));
}

proptest! {
    #[test]
    fn prop_move_then_inverse_restores(
        dx in -1.0e4..1.0e4f64,
        dy in -1.0e4..1.0e4f64,
    ) {
        let element = rect("b", ElementType::Building, (3.0, 7.0), (60.0, 40.0));
        let moved = move_by(&element, dx, dy, &element.geometry);
        let back = move_by(&moved, -dx, -dy, &moved.geometry);
        prop_assert!(back.geometry.approx_eq(&element.geometry, 1e-6));
    }

    #[test]
    fn prop_rotate_then_inverse_restores(angle in -720.0..720.0f64) {
        let element = rect("b", ElementType::Building, (3.0, 7.0), (60.0, 40.0));
        let pivot = centroid(&element);
        let rotated = rotate(&element, angle, pivot, &element.geometry);
        let back = rotate(&rotated, -angle, pivot, &rotated.geometry);
        prop_assert!(back.geometry.approx_eq(&element.geometry, 1e-6));
        prop_assert!(back.rotation_degrees().abs() < 1e-9);
    }
}
