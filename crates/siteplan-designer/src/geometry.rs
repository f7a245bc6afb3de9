//! Element geometry operations.
//!
//! Pure functions over [`Element`] values: hit-testing, bounds, centroid,
//! rotation, translation, vertex edits, alignment, copy and delete. Nothing
//! here mutates its input; edits return replacement elements with the same
//! id for the store to apply.
//!
//! Gesture code must always pass the ring captured at gesture start as the
//! `source` of [`move_by`] and [`rotate`] together with the total delta
//! since the gesture began. Applying small per-frame deltas to the previous
//! frame's output accumulates floating-point drift.

use nalgebra::{Point2, Rotation2, Vector2};
use serde::{Deserialize, Serialize};
use siteplan_settings::YAxis;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::model::{Bounds, Element, Point, Ring, PROP_NAME};

/// Ray-casting point-in-polygon test.
///
/// Points exactly on an edge may fall either way.
pub fn point_in_ring(x: f64, y: f64, ring: &Ring) -> bool {
    let pts = ring.vertices();
    let n = pts.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (pts[i], pts[j]);
        if (pi.y > y) != (pj.y > y) && x < (pj.x - pi.x) * (y - pi.y) / (pj.y - pi.y) + pi.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Elements in paint order: by category rank, then insertion order.
pub fn paint_order(elements: &[Element]) -> Vec<&Element> {
    let mut ordered: Vec<&Element> = elements.iter().collect();
    ordered.sort_by_key(|e| e.element_type.paint_rank());
    ordered
}

/// The element drawn on top at (x, y), if any.
pub fn topmost_element_at(elements: &[Element], x: f64, y: f64) -> Option<&Element> {
    paint_order(elements)
        .into_iter()
        .rev()
        .find(|e| point_in_ring(x, y, &e.geometry))
}

/// Vertex average of the ring's distinct vertices. Not area-weighted, so it
/// is biased toward dense runs of vertices on irregular shapes.
pub fn ring_centroid(ring: &Ring) -> Option<Point> {
    let verts = ring.vertices();
    if verts.is_empty() {
        return None;
    }
    let n = verts.len() as f64;
    let (sx, sy) = verts
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sx / n, sy / n))
}

pub fn centroid(element: &Element) -> Option<Point> {
    ring_centroid(&element.geometry)
}

pub fn bounds_of(element: &Element) -> Option<Bounds> {
    element.geometry.bounds()
}

/// Combined bounds of several elements.
pub fn bounds_of_all<'a, I>(elements: I) -> Option<Bounds>
where
    I: IntoIterator<Item = &'a Element>,
{
    elements
        .into_iter()
        .filter_map(bounds_of)
        .reduce(|a, b| a.union(&b))
}

/// Lowest-index vertex strictly within `threshold` of (x, y).
pub fn nearest_vertex(element: &Element, x: f64, y: f64, threshold: f64) -> Option<usize> {
    let target = Point::new(x, y);
    element
        .geometry
        .vertices()
        .iter()
        .position(|v| v.distance_to(&target) < threshold)
}

/// Rotates `source` counter-clockwise (in a Y-up world) by `angle_deg`
/// about `pivot`.
pub fn rotate_ring(source: &Ring, angle_deg: f64, pivot: Point) -> Ring {
    let rotation = Rotation2::new(angle_deg.to_radians());
    let center = Point2::new(pivot.x, pivot.y);
    source.map(|p| {
        let offset: Vector2<f64> = Point2::new(p.x, p.y) - center;
        let rotated = center + rotation * offset;
        Point::new(rotated.x, rotated.y)
    })
}

/// Rotates the captured `source` ring by `angle_deg` about `pivot`
/// (default: the element's centroid) and adds the angle to the element's
/// stored rotation. The stored rotation is not wrapped to [0, 360).
pub fn rotate(element: &Element, angle_deg: f64, pivot: Option<Point>, source: &Ring) -> Element {
    let pivot = pivot
        .or_else(|| centroid(element))
        .unwrap_or_default();
    element
        .with_geometry(rotate_ring(source, angle_deg, pivot))
        .with_rotation(element.rotation_degrees() + angle_deg)
}

/// Translates the captured `source` ring by the total delta (dx, dy).
pub fn move_by(element: &Element, dx: f64, dy: f64, source: &Ring) -> Element {
    element.with_geometry(source.translated(dx, dy))
}

/// Replaces vertex `index`. Editing the first or closing vertex moves both
/// so the ring stays closed. Returns `None` for an out-of-range index.
pub fn update_vertex(element: &Element, index: usize, x: f64, y: f64) -> Option<Element> {
    let ring = &element.geometry;
    let last = ring.len().checked_sub(1)?;
    if index > last {
        return None;
    }
    let p = Point::new(x, y);
    let mut next = ring.with_point(index, p);
    if index == 0 || index == last {
        next = next.with_point(0, p).with_point(last, p);
    }
    Some(element.with_geometry(next))
}

/// Alignment target for [`align_elements`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignMode {
    Left,
    Right,
    /// Horizontal center.
    Center,
    Top,
    /// Vertical center.
    Middle,
    Bottom,
}

impl AlignMode {
    fn is_horizontal(self) -> bool {
        matches!(self, AlignMode::Left | AlignMode::Right | AlignMode::Center)
    }

    /// The value this mode reads from a bounding box. "Top" is the larger
    /// world Y, which is up the screen in the default axis convention.
    fn reference(self, b: &Bounds) -> f64 {
        match self {
            AlignMode::Left => b.min_x,
            AlignMode::Right => b.max_x,
            AlignMode::Center => (b.min_x + b.max_x) / 2.0,
            AlignMode::Top => b.max_y,
            AlignMode::Middle => (b.min_y + b.max_y) / 2.0,
            AlignMode::Bottom => b.min_y,
        }
    }
}

impl fmt::Display for AlignMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AlignMode::Left => "left",
            AlignMode::Right => "right",
            AlignMode::Center => "center",
            AlignMode::Top => "top",
            AlignMode::Middle => "middle",
            AlignMode::Bottom => "bottom",
        };
        f.write_str(s)
    }
}

impl FromStr for AlignMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(AlignMode::Left),
            "right" => Ok(AlignMode::Right),
            "center" => Ok(AlignMode::Center),
            "top" => Ok(AlignMode::Top),
            "middle" => Ok(AlignMode::Middle),
            "bottom" => Ok(AlignMode::Bottom),
            other => Err(format!("unknown align mode: {}", other)),
        }
    }
}

/// Aligns every selected element to one reference taken from the combined
/// bounds of the selection. Unselected elements are returned unchanged.
pub fn align_elements(elements: &[Element], ids: &BTreeSet<String>, mode: AlignMode) -> Vec<Element> {
    let selected = elements.iter().filter(|e| ids.contains(&e.id));
    let Some(combined) = bounds_of_all(selected) else {
        return elements.to_vec();
    };
    let target = mode.reference(&combined);

    elements
        .iter()
        .map(|e| {
            if !ids.contains(&e.id) {
                return e.clone();
            }
            let Some(own) = bounds_of(e) else {
                return e.clone();
            };
            let shift = target - mode.reference(&own);
            let (dx, dy) = if mode.is_horizontal() {
                (shift, 0.0)
            } else {
                (0.0, shift)
            };
            move_by(e, dx, dy, &e.geometry)
        })
        .collect()
}

/// Duplicates the selected elements under fresh ids, offset by `offset` and
/// renamed with a copy suffix. Returns only the copies, in collection order.
pub fn copy_elements<F>(
    elements: &[Element],
    ids: &BTreeSet<String>,
    offset: (f64, f64),
    mut next_id: F,
) -> Vec<Element>
where
    F: FnMut() -> String,
{
    elements
        .iter()
        .filter(|e| ids.contains(&e.id))
        .map(|e| {
            let name = match e.name() {
                Some(name) => format!("{} (copy)", name),
                None => format!("{} (copy)", e.element_type),
            };
            e.with_id(next_id())
                .with_geometry(e.geometry.translated(offset.0, offset.1))
                .with_property(PROP_NAME, name)
        })
        .collect()
}

/// The collection without the listed ids.
pub fn delete_elements(elements: &[Element], ids: &BTreeSet<String>) -> Vec<Element> {
    elements
        .iter()
        .filter(|e| !ids.contains(&e.id))
        .cloned()
        .collect()
}

/// World position of an element's rotation handle: above the centroid,
/// `offset_px` screen pixels beyond the bounds edge that is up on screen.
pub fn rotation_handle_position(
    element: &Element,
    zoom: f64,
    offset_px: f64,
    y_axis: YAxis,
) -> Option<Point> {
    let c = centroid(element)?;
    let b = bounds_of(element)?;
    let offset = offset_px / zoom;
    let y = match y_axis {
        YAxis::Up => b.max_y + offset,
        YAxis::Down => b.min_y - offset,
    };
    Some(Point::new(c.x, y))
}
