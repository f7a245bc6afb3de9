//! Site-plan data model: points, bounds, rings and elements.
//!
//! All coordinates are local site-plan feet unless a type says otherwise.

use serde::{Deserialize, Serialize};
use siteplan_core::constants::EPSILON;
use siteplan_core::GeometryError;

mod element;

pub use element::{
    Element, ElementMetadata, ElementSource, ElementType, Properties, PropertyValue,
    PROP_AREA, PROP_NAME, PROP_ROTATION, PROP_STORIES,
};

/// Minimum number of distinct vertices for any ring. Triangular parcels
/// are legal input; elements raise this to
/// `MIN_ELEMENT_VERTICES`.
pub const MIN_RING_VERTICES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn approx_eq(&self, other: &Point, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// Axis-aligned bounding box.
///
/// An empty set of points has no bounds; functions that may see empty input
/// return `Option<Bounds>` instead of a sentinel box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Creates bounds from two corners in any order.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            min_x: x1.min(x2),
            min_y: y1.min(y2),
            max_x: x1.max(x2),
            max_y: y1.max(y2),
        }
    }

    /// Bounds of a set of points, or `None` when the set is empty.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Bounds::new(first.x, first.y, first.x, first.y);
        for p in iter {
            bounds.min_x = bounds.min_x.min(p.x);
            bounds.min_y = bounds.min_y.min(p.y);
            bounds.max_x = bounds.max_x.max(p.x);
            bounds.max_y = bounds.max_y.max(p.y);
        }
        Some(bounds)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// True when either side has no length.
    pub fn is_degenerate(&self) -> bool {
        self.width() <= EPSILON || self.height() <= EPSILON
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

/// Closed polygon boundary: the first point is repeated as the last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<[f64; 2]>", into = "Vec<[f64; 2]>")]
pub struct Ring {
    points: Vec<Point>,
}

impl Ring {
    /// Builds a validated ring, closing it if the input is open.
    pub fn new(points: Vec<Point>) -> Result<Self, GeometryError> {
        if points.is_empty() {
            return Err(GeometryError::EmptyCoordinates);
        }
        if let Some(bad) = points.iter().find(|p| !p.is_finite()) {
            return Err(GeometryError::InvalidCoordinate {
                reason: format!("non-finite vertex ({}, {})", bad.x, bad.y),
            });
        }
        let ring = Self::closing(points);
        let distinct = ring.distinct_count();
        if distinct < MIN_RING_VERTICES {
            return Err(GeometryError::DegenerateRing {
                distinct,
                required: MIN_RING_VERTICES,
            });
        }
        Ok(ring)
    }

    /// Closes the point list without validating it.
    fn closing(mut points: Vec<Point>) -> Self {
        if let (Some(first), Some(last)) = (points.first().copied(), points.last().copied()) {
            if points.len() == 1 || !first.approx_eq(&last, EPSILON) {
                points.push(first);
            } else if let Some(end) = points.last_mut() {
                *end = first;
            }
        }
        Self { points }
    }

    /// Axis-aligned rectangle centred on `center`, wound counter-clockwise
    /// starting at the minimum corner.
    pub fn rectangle(center: Point, width: f64, depth: f64) -> Self {
        let hw = width / 2.0;
        let hd = depth / 2.0;
        Self::closing(vec![
            Point::new(center.x - hw, center.y - hd),
            Point::new(center.x + hw, center.y - hd),
            Point::new(center.x + hw, center.y + hd),
            Point::new(center.x - hw, center.y + hd),
        ])
    }

    /// All points including the closing duplicate.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Distinct vertices: every point except the closing duplicate.
    pub fn vertices(&self) -> &[Point] {
        match self.points.len() {
            0 => &[],
            n => &self.points[..n - 1],
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn distinct_count(&self) -> usize {
        self.vertices().len()
    }

    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => self.points.len() > 1 && first == last,
            _ => false,
        }
    }

    pub fn vertex(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.points)
    }

    /// Length of edge `index` (from vertex `index` to `index + 1`).
    pub fn edge_length(&self, index: usize) -> Option<f64> {
        let a = self.points.get(index)?;
        let b = self.points.get(index + 1)?;
        Some(a.distance_to(b))
    }

    /// Applies `f` to every point, preserving closure.
    pub fn map<F>(&self, f: F) -> Ring
    where
        F: Fn(&Point) -> Point,
    {
        Ring {
            points: self.points.iter().map(f).collect(),
        }
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Ring {
        self.map(|p| p.offset(dx, dy))
    }

    /// Replaces one point; callers keep the closure invariant.
    pub(crate) fn with_point(&self, index: usize, point: Point) -> Ring {
        let mut points = self.points.clone();
        if let Some(slot) = points.get_mut(index) {
            *slot = point;
        }
        Ring { points }
    }

    pub fn approx_eq(&self, other: &Ring, tolerance: f64) -> bool {
        self.points.len() == other.points.len()
            && self
                .points
                .iter()
                .zip(&other.points)
                .all(|(a, b)| a.approx_eq(b, tolerance))
    }
}

impl From<Vec<[f64; 2]>> for Ring {
    fn from(coords: Vec<[f64; 2]>) -> Self {
        Self::closing(coords.into_iter().map(Point::from).collect())
    }
}

impl From<Ring> for Vec<[f64; 2]> {
    fn from(ring: Ring) -> Self {
        ring.points.into_iter().map(<[f64; 2]>::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_closes_open_input() {
        let ring = Ring::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ])
        .expect("valid ring");
        assert_eq!(ring.len(), 4);
        assert!(ring.is_closed());
        assert_eq!(ring.distinct_count(), 3);
    }

    #[test]
    fn test_ring_rejects_degenerate() {
        let err = Ring::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]).unwrap_err();
        assert!(matches!(err, GeometryError::DegenerateRing { distinct: 2, .. }));
        assert_eq!(Ring::new(Vec::new()), Err(GeometryError::EmptyCoordinates));
    }

    #[test]
    fn test_ring_rejects_nan() {
        let err = Ring::new(vec![
            Point::new(0.0, 0.0),
            Point::new(f64::NAN, 0.0),
            Point::new(1.0, 1.0),
        ])
        .unwrap_err();
        assert!(matches!(err, GeometryError::InvalidCoordinate { .. }));
    }

    #[test]
    fn test_rectangle_ring_layout() {
        let ring = Ring::rectangle(Point::new(30.0, 20.0), 60.0, 40.0);
        let coords: Vec<[f64; 2]> = ring.into();
        assert_eq!(
            coords,
            vec![[0.0, 0.0], [60.0, 0.0], [60.0, 40.0], [0.0, 40.0], [0.0, 0.0]]
        );
    }

    #[test]
    fn test_ring_serde_as_coordinate_pairs() {
        let ring: Ring = serde_json::from_str("[[0,0],[4,0],[4,3],[0,3]]").expect("parse");
        assert!(ring.is_closed());
        assert_eq!(ring.edge_length(0), Some(4.0));
        assert_eq!(ring.edge_length(1), Some(3.0));
    }

    #[test]
    fn test_bounds_from_empty_is_none() {
        assert!(Bounds::from_points(&[]).is_none());
        let b = Bounds::new(10.0, 5.0, 0.0, 0.0);
        assert_eq!(b.min_x, 0.0);
        assert_eq!(b.max_x, 10.0);
        assert_eq!(b.center(), Point::new(5.0, 2.5));
    }
}
