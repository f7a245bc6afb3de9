//! # SitePlan
//!
//! Interactive 2D site-plan editing engine. A parcel boundary arrives as
//! GeoJSON in geographic degrees or projected metres and is turned into a
//! local frame in feet; buildings, parking, circulation and greenspace are
//! then placed, moved, rotated and reshaped on top of it.
//!
//! ## Architecture
//!
//! SitePlan is organized as a workspace with multiple crates:
//!
//! 1. **siteplan-core** - Units, constants, error hierarchy, event bus
//! 2. **siteplan-settings** - Editor configuration (TOML/JSON)
//! 3. **siteplan-designer** - Projection, viewport, element geometry, interaction
//! 4. **siteplan** - This crate: logging setup and the command-line entry point
//!
//! ## Features
//!
//! - **Coordinate handling**: Web Mercator projection, space detection, normalization
//! - **Viewport**: Zoom about a pivot, pan, fit-to-bounds, a single axis flip
//! - **Editing**: Select, drag, rotate with snapping, vertex editing, align, copy, delete
//! - **Tools**: Measure and one-click footprint drawing
//! - **Notifications**: Debounced building updates with a guaranteed final record

pub use siteplan_core as core;
pub use siteplan_designer as designer;
pub use siteplan_settings as settings;

pub use siteplan_core::{
    BuildingUpdate, Error, EventBus, GeometryError, Result, SitePlanEvent, ViewportError,
};
pub use siteplan_designer::{
    Bounds, Canvas, EditorEvent, Effect, Element, ElementType, GeometryProjector,
    InteractionController, PlanResult, Point, ProcessedGeometry, RenderFrame, Renderer, Ring,
    SitePlanEditor, SvgRenderer, Tool, Viewport,
};
pub use siteplan_settings::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Pretty console output on stderr, so stdout stays clean for data
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
