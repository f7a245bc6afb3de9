//! Shared constants for the site-plan engine.
//!
//! Screen-space quantities are expressed in pixels and divided by the current
//! zoom wherever they are compared against world (feet) coordinates.

/// Spherical Web-Mercator earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Feet per metre.
pub const FEET_PER_METER: f64 = 3.28084;

/// Coordinates with a magnitude above this are treated as projected metres.
pub const PROJECTED_MAGNITUDE_THRESHOLD: f64 = 1000.0;

/// Minimum zoom accepted by zoom operations.
pub const MIN_ZOOM: f64 = 0.1;

/// Maximum zoom accepted by zoom operations.
pub const MAX_ZOOM: f64 = 10.0;

/// Default padding (pixels per edge) used when fitting content into view.
pub const VIEW_PADDING_PX: f64 = 40.0;

/// Distance of the rotation handle above the element, in screen pixels.
pub const ROTATION_HANDLE_OFFSET_PX: f64 = 30.0;

/// Hit radius for the rotation handle, in screen pixels.
pub const HANDLE_HIT_RADIUS_PX: f64 = 15.0;

/// Hit radius for vertex handles, in screen pixels.
pub const VERTEX_HIT_RADIUS_PX: f64 = 15.0;

/// Rotation increment used while the snap modifier is held, in degrees.
pub const ROTATION_SNAP_DEG: f64 = 15.0;

/// Default grid pitch in feet.
pub const DEFAULT_GRID_PITCH_FT: f64 = 10.0;

/// Offset applied to duplicated elements, in feet.
pub const COPY_OFFSET_FT: (f64, f64) = (20.0, 20.0);

/// Debounce window for building update notifications, in milliseconds.
pub const BUILDING_UPDATE_DEBOUNCE_MS: u64 = 80;

/// Interval between rendering-surface readiness polls, in milliseconds.
pub const SURFACE_POLL_INTERVAL_MS: u64 = 50;

/// Default footprints (width, depth) in feet for draw tools.
pub const BUILDING_FOOTPRINT_FT: (f64, f64) = (60.0, 40.0);
pub const PARKING_FOOTPRINT_FT: (f64, f64) = (120.0, 80.0);
pub const GREENSPACE_FOOTPRINT_FT: (f64, f64) = (60.0, 60.0);

/// Tolerance used when comparing floating point coordinates.
pub const EPSILON: f64 = 1e-9;
