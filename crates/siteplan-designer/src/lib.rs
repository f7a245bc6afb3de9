//! # SitePlan Designer
//!
//! This crate is the interactive editing engine behind the site-plan canvas.
//! It turns a raw parcel boundary into a local working frame, keeps the
//! element collection and selection, maps between world feet and screen
//! pixels, and drives tools and pointer gestures.
//!
//! ## Core Components
//!
//! ### Geometry
//! - **Projection**: Web Mercator forward/inverse and parcel normalization to local feet
//! - **Grid**: Optional snapping of world points to a foot pitch
//! - **Element geometry**: Hit-testing, move, rotate, vertex edit, align, copy, delete
//!
//! ### Editing
//! - **Canvas**: Element store, selection and viewport in one place
//! - **Viewport**: Zoom, pan, fit-to-bounds and the world/screen transform
//! - **Interaction**: Event-driven state machine for select, pan, drag, rotate,
//!   vertex edit, measure and draw
//! - **Building updates**: Debounced intermediate records plus one final record
//!
//! ### Boundaries
//! - **Import**: GeoJSON parcel parsing
//! - **Plan**: Request/response shapes for an external layout solver
//! - **Renderer**: Frame snapshot contract and an SVG reference renderer
//! - **Surface**: Waiting for a render surface to report its size
//!
//! ## Architecture
//!
//! ```text
//! SitePlanEditor
//!   ├── GeometryProjector (raw parcel -> local feet)
//!   ├── Canvas
//!   │     ├── ElementStore
//!   │     ├── SelectionSet
//!   │     └── Viewport (world <-> screen)
//!   ├── InteractionController
//!   │     ├── GridSnapper
//!   │     └── BuildingUpdateDebouncer -> BuildingUpdateSink
//!   └── RenderFrame -> Renderer
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use siteplan_designer::{EditorEvent, RecordingSink, SitePlanEditor};
//! use std::sync::Arc;
//! use std::time::Instant;
//!
//! let mut editor = SitePlanEditor::new(Config::default(), Arc::new(RecordingSink::new()));
//! editor.load_parcel_geojson(&geojson)?;
//! let effects = editor.handle(EditorEvent::Tick, Instant::now());
//! ```

pub mod building_updates;
pub mod canvas;
pub mod editor;
pub mod element_store;
pub mod geometry;
pub mod grid;
pub mod import;
pub mod interaction;
pub mod model;
pub mod plan;
pub mod projection;
pub mod renderer;
pub mod selection_manager;
pub mod surface;
pub mod templates;
pub mod viewport;

pub use building_updates::{
    building_update, BuildingUpdateDebouncer, BuildingUpdateSink, EventBusSink, RecordingSink,
};
pub use canvas::Canvas;
pub use editor::SitePlanEditor;
pub use element_store::ElementStore;
pub use geometry::AlignMode;
pub use grid::GridSnapper;
pub use import::{parse_parcel, parse_parcel_str, read_parcel};
pub use interaction::{
    EditorEvent, Effect, InteractionController, KeyCommand, Mode, ModeKind, Modifiers,
    PointerButton, Tool,
};
pub use model::{
    Bounds, Element, ElementMetadata, ElementSource, ElementType, Point, Properties,
    PropertyValue, Ring,
};
pub use plan::{PlanConfig, PlanError, PlanGenerator, PlanMetrics, PlanRequest, PlanResult};
pub use projection::{CoordinateSpace, GeometryProjector, LonLat, NormalizedRing, ProcessedGeometry};
pub use renderer::{MeasurementPreview, RenderFrame, Renderer, SvgRenderer};
pub use selection_manager::SelectionSet;
pub use surface::{fit_when_ready, wait_for_surface, RenderSurface, RetryPolicy};
pub use templates::DrawTool;
pub use viewport::{Viewport, ViewportState};
