//! Parcel geometry import from GeoJSON.
//!
//! Accepts `Polygon`, `MultiPolygon`, `Feature` and `FeatureCollection`
//! objects. Only exterior rings are kept; when several polygons are present
//! the one with the largest bounding box wins.

use serde_json::Value;
use siteplan_core::GeometryError;
use tracing::warn;

use crate::model::{Point, Ring};

/// Parses a GeoJSON document into the parcel's exterior ring.
pub fn parse_parcel_str(input: &str) -> Result<Ring, GeometryError> {
    let value: Value = serde_json::from_str(input).map_err(|e| GeometryError::InvalidCoordinate {
        reason: format!("invalid GeoJSON: {}", e),
    })?;
    parse_parcel(&value)
}

/// Fail-soft variant of [`parse_parcel`].
pub fn read_parcel(value: &Value) -> Option<Ring> {
    match parse_parcel(value) {
        Ok(ring) => Some(ring),
        Err(e) => {
            warn!("Ignoring parcel geometry: {}", e);
            None
        }
    }
}

/// Extracts the exterior ring of a GeoJSON geometry, feature or collection.
pub fn parse_parcel(value: &Value) -> Result<Ring, GeometryError> {
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| GeometryError::UnsupportedShape {
            kind: "<missing type>".to_string(),
        })?;

    match kind {
        "Polygon" => polygon_exterior(coordinates(value)?),
        "MultiPolygon" => {
            let polygons = coordinates(value)?
                .as_array()
                .ok_or(GeometryError::EmptyCoordinates)?;
            largest(polygons.iter().map(polygon_exterior))
        }
        "Feature" => {
            let geometry = value.get("geometry").filter(|g| !g.is_null()).ok_or(
                GeometryError::UnsupportedShape {
                    kind: "Feature without geometry".to_string(),
                },
            )?;
            parse_parcel(geometry)
        }
        "FeatureCollection" => {
            let features = value
                .get("features")
                .and_then(Value::as_array)
                .ok_or(GeometryError::EmptyCoordinates)?;
            largest(features.iter().map(parse_parcel))
        }
        other => Err(GeometryError::UnsupportedShape {
            kind: other.to_string(),
        }),
    }
}

fn coordinates(value: &Value) -> Result<&Value, GeometryError> {
    value
        .get("coordinates")
        .ok_or(GeometryError::EmptyCoordinates)
}

fn polygon_exterior(coords: &Value) -> Result<Ring, GeometryError> {
    let exterior = coords
        .as_array()
        .and_then(|rings| rings.first())
        .ok_or(GeometryError::EmptyCoordinates)?;
    let positions = exterior.as_array().ok_or(GeometryError::EmptyCoordinates)?;
    let points = positions
        .iter()
        .map(position)
        .collect::<Result<Vec<_>, _>>()?;
    Ring::new(points)
}

fn position(value: &Value) -> Result<Point, GeometryError> {
    let pair = value.as_array().ok_or_else(|| GeometryError::InvalidCoordinate {
        reason: format!("expected [x, y], found {}", value),
    })?;
    match (
        pair.first().and_then(Value::as_f64),
        pair.get(1).and_then(Value::as_f64),
    ) {
        (Some(x), Some(y)) => Ok(Point::new(x, y)),
        _ => Err(GeometryError::InvalidCoordinate {
            reason: format!("expected [x, y], found {}", value),
        }),
    }
}

/// Keeps the valid ring with the largest bounding-box area. When nothing is
/// valid the first error is returned.
fn largest<I>(rings: I) -> Result<Ring, GeometryError>
where
    I: Iterator<Item = Result<Ring, GeometryError>>,
{
    let mut best: Option<(f64, Ring)> = None;
    let mut first_err = None;
    for result in rings {
        match result {
            Ok(ring) => {
                let area = ring.bounds().map(|b| b.width() * b.height()).unwrap_or(0.0);
                if best.as_ref().is_none_or(|(a, _)| area > *a) {
                    best = Some((area, ring));
                }
            }
            Err(e) => {
                first_err.get_or_insert(e);
            }
        }
    }
    match best {
        Some((_, ring)) => Ok(ring),
        None => Err(first_err.unwrap_or(GeometryError::EmptyCoordinates)),
    }
}
