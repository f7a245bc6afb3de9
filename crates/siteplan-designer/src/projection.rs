//! Geometry projection
//!
//! Reconciles geographic degrees, Web-Mercator metres and local site-plan
//! feet. Parcel polygons arrive in either geographic or projected space; the
//! projector converts them to feet and moves the bounding-box minimum corner
//! to the origin so the editor always works in small local numbers.
//!
//! The space of an input is guessed from coordinate magnitude, which is
//! ambiguous for values near the threshold. No CRS tag travels with the
//! input, so the guess is accepted as-is.

use serde::{Deserialize, Serialize};
use siteplan_core::constants::{EARTH_RADIUS_M, PROJECTED_MAGNITUDE_THRESHOLD};
use siteplan_core::{feet_to_meters, meters_to_feet, GeometryError};
use std::f64::consts::FRAC_PI_4;
use tracing::{debug, warn};

use crate::model::{Bounds, Point, Ring};

/// Geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// Coordinate space of raw input geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateSpace {
    /// Longitude/latitude in degrees.
    Geographic,
    /// Web-Mercator metres.
    Projected,
}

/// Result of [`GeometryProjector::normalize`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRing {
    pub ring: Ring,
    /// Always `(0, 0, w, h)`.
    pub bounds: Bounds,
    /// Bounds of the ring before translation.
    pub original_bounds: Bounds,
}

/// A parcel ready for editing: local feet with its minimum corner at (0, 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedGeometry {
    pub geometry: Ring,
    pub bounds: Bounds,
    pub source_space: CoordinateSpace,
    /// Bounds of the input in its own space (degrees or metres).
    pub original_bounds: Bounds,
    /// Projected-metre position of the local origin.
    pub origin_m: Point,
}

impl ProcessedGeometry {
    /// Maps a local feet point back to projected metres.
    pub fn local_to_projected(&self, p: Point) -> Point {
        Point::new(
            self.origin_m.x + feet_to_meters(p.x),
            self.origin_m.y + feet_to_meters(p.y),
        )
    }

    /// Maps a local feet point back to geographic degrees.
    pub fn local_to_geographic(&self, p: Point) -> LonLat {
        GeometryProjector::to_geographic(self.local_to_projected(p))
    }
}

/// Converts between coordinate spaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryProjector {
    threshold: f64,
}

impl Default for GeometryProjector {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryProjector {
    pub fn new() -> Self {
        Self {
            threshold: PROJECTED_MAGNITUDE_THRESHOLD,
        }
    }

    /// Spherical Web-Mercator forward projection.
    pub fn to_projected(geo: LonLat) -> Point {
        let lambda = geo.lon.to_radians();
        let phi = geo.lat.to_radians();
        Point::new(
            EARTH_RADIUS_M * lambda,
            EARTH_RADIUS_M * (FRAC_PI_4 + phi / 2.0).tan().ln(),
        )
    }

    /// Spherical Web-Mercator inverse projection.
    pub fn to_geographic(p: Point) -> LonLat {
        let lambda = p.x / EARTH_RADIUS_M;
        let phi = 2.0 * (p.y / EARTH_RADIUS_M).exp().atan() - 2.0 * FRAC_PI_4;
        LonLat::new(lambda.to_degrees(), phi.to_degrees())
    }

    /// Magnitude above the threshold on either axis means projected metres.
    pub fn detect_space(&self, sample: Point) -> CoordinateSpace {
        if sample.x.abs() > self.threshold || sample.y.abs() > self.threshold {
            CoordinateSpace::Projected
        } else {
            CoordinateSpace::Geographic
        }
    }

    /// Translates `ring` so its bounding-box minimum corner sits at (0, 0).
    pub fn normalize(ring: &Ring) -> Option<NormalizedRing> {
        let original_bounds = ring.bounds()?;
        let moved = ring.translated(-original_bounds.min_x, -original_bounds.min_y);
        Some(NormalizedRing {
            ring: moved,
            bounds: Bounds::new(0.0, 0.0, original_bounds.width(), original_bounds.height()),
            original_bounds,
        })
    }

    /// Runs the full pipeline, or returns `None` after logging why the input
    /// was skipped.
    pub fn process(&self, raw: &Ring) -> Option<ProcessedGeometry> {
        match self.try_process(raw) {
            Ok(processed) => Some(processed),
            Err(e) => {
                warn!("Skipping parcel geometry: {}", e);
                None
            }
        }
    }

    /// Detect space, project if geographic, convert metres to feet, normalize.
    pub fn try_process(&self, raw: &Ring) -> Result<ProcessedGeometry, GeometryError> {
        let sample = raw.vertex(0).ok_or(GeometryError::EmptyCoordinates)?;
        let space = self.detect_space(sample);
        let original_bounds = raw.bounds().ok_or(GeometryError::EmptyCoordinates)?;

        let metres = match space {
            CoordinateSpace::Geographic => {
                raw.map(|p| Self::to_projected(LonLat::new(p.x, p.y)))
            }
            CoordinateSpace::Projected => raw.clone(),
        };
        if metres.points().iter().any(|p| !p.is_finite()) {
            return Err(GeometryError::InvalidCoordinate {
                reason: "projection produced a non-finite coordinate".to_string(),
            });
        }
        let metre_bounds = metres.bounds().ok_or(GeometryError::EmptyCoordinates)?;

        let feet = metres.map(|p| Point::new(meters_to_feet(p.x), meters_to_feet(p.y)));
        let normalized = Self::normalize(&feet).ok_or(GeometryError::EmptyCoordinates)?;
        if normalized.bounds.is_degenerate() {
            return Err(GeometryError::ZeroExtent {
                width: normalized.bounds.width(),
                height: normalized.bounds.height(),
            });
        }

        debug!(
            "Processed {:?} parcel: {} vertices, {:.1} x {:.1} ft",
            space,
            normalized.ring.distinct_count(),
            normalized.bounds.width(),
            normalized.bounds.height()
        );

        Ok(ProcessedGeometry {
            geometry: normalized.ring,
            bounds: normalized.bounds,
            source_space: space,
            original_bounds,
            origin_m: Point::new(metre_bounds.min_x, metre_bounds.min_y),
        })
    }
}
