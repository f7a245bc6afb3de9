//! Error handling for SitePlan
//!
//! Provides error types for the layers of the engine:
//! - Geometry errors (parsing, validation, degenerate input)
//! - Viewport errors (fitting, rendering-surface readiness)
//!
//! All error types use `thiserror` for ergonomic error handling. Pointer-event
//! paths never surface these to the caller; they are logged and the dependent
//! step is skipped.

use thiserror::Error;

/// Geometry error type
///
/// Represents failures while reading or validating polygon input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Shape type is not a polygon or multi-polygon
    #[error("Unsupported geometry type: {kind}")]
    UnsupportedShape {
        /// The geometry type that was supplied.
        kind: String,
    },

    /// No coordinates were supplied
    #[error("Geometry has no coordinates")]
    EmptyCoordinates,

    /// Ring has too few distinct vertices to form a polygon
    #[error("Degenerate ring: {distinct} distinct vertices, need at least {required}")]
    DegenerateRing {
        /// Number of distinct vertices found.
        distinct: usize,
        /// Minimum number of distinct vertices required.
        required: usize,
    },

    /// Bounds have zero width or height
    #[error("Geometry has zero extent ({width} x {height})")]
    ZeroExtent {
        /// Width of the bounds.
        width: f64,
        /// Height of the bounds.
        height: f64,
    },

    /// A coordinate was NaN, infinite, or not a number pair
    #[error("Invalid coordinate: {reason}")]
    InvalidCoordinate {
        /// Why the coordinate was rejected.
        reason: String,
    },
}

/// Viewport error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewportError {
    /// The rendering surface never reported nonzero dimensions
    #[error("Rendering surface not ready after {attempts} attempts")]
    SurfaceNotReady {
        /// Number of polls made before giving up.
        attempts: u32,
    },

    /// Bounds to fit have zero width or height
    #[error("Cannot fit zero-extent bounds ({width} x {height})")]
    ZeroExtent {
        /// Width of the bounds.
        width: f64,
        /// Height of the bounds.
        height: f64,
    },
}

/// Main error type for SitePlan
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Viewport error
    #[error(transparent)]
    Viewport(#[from] ViewportError),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }

    /// Check if this is a viewport error
    pub fn is_viewport_error(&self) -> bool {
        matches!(self, Error::Viewport(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
