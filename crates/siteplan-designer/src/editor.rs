//! Editor facade.
//!
//! [`SitePlanEditor`] owns the canvas (and through it the only element
//! store), the interaction controller and the loaded parcel. Collaborators
//! such as the event bus and the building-update sink are passed in when it
//! is built.

use siteplan_core::{EventBus, SitePlanEvent, ViewportError};
use siteplan_settings::Config;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, trace};

use crate::building_updates::{BuildingUpdateSink, EventBusSink};
use crate::canvas::Canvas;
use crate::geometry::AlignMode;
use crate::import::parse_parcel_str;
use crate::interaction::{EditorEvent, Effect, InteractionController, KeyCommand, Tool};
use crate::model::{Bounds, Ring};
use crate::plan::{PlanConfig, PlanError, PlanGenerator, PlanRequest, PlanResult};
use crate::projection::{GeometryProjector, ProcessedGeometry};
use crate::renderer::{RenderFrame, Renderer};
use crate::surface::{fit_when_ready, RenderSurface, RetryPolicy};
use crate::viewport::Viewport;

/// Default canvas size until the rendering surface reports its own.
const INITIAL_CANVAS: (f64, f64) = (800.0, 600.0);

pub struct SitePlanEditor {
    config: Config,
    canvas: Canvas,
    controller: InteractionController,
    projector: GeometryProjector,
    parcel: Option<ProcessedGeometry>,
    bus: Option<Arc<EventBus>>,
}

impl SitePlanEditor {
    pub fn new(config: Config, sink: Arc<dyn BuildingUpdateSink>) -> Self {
        let viewport =
            Viewport::with_settings(INITIAL_CANVAS.0, INITIAL_CANVAS.1, config.viewport.clone());
        Self {
            controller: InteractionController::new(&config, sink),
            canvas: Canvas::new(viewport),
            projector: GeometryProjector::new(),
            parcel: None,
            bus: None,
            config,
        }
    }

    /// Editor whose building updates and notifications go to `bus`.
    pub fn with_event_bus(config: Config, bus: Arc<EventBus>) -> Self {
        let sink = Arc::new(EventBusSink::new(Arc::clone(&bus)));
        let mut editor = Self::new(config, sink);
        editor.bus = Some(bus);
        editor
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn parcel(&self) -> Option<&ProcessedGeometry> {
        self.parcel.as_ref()
    }

    pub fn tool(&self) -> Tool {
        self.controller.tool()
    }

    /// Feeds one event through the interaction controller.
    pub fn handle(&mut self, event: EditorEvent, now: Instant) -> Vec<Effect> {
        let effects = self.controller.handle(event, now, &mut self.canvas);
        self.publish_effects(&effects);
        effects
    }

    pub fn set_tool(&mut self, tool: Tool, now: Instant) -> Vec<Effect> {
        self.handle(EditorEvent::SetTool(tool), now)
    }

    pub fn align_selected(&mut self, mode: AlignMode, now: Instant) -> Vec<Effect> {
        self.handle(EditorEvent::Key(KeyCommand::Align(mode)), now)
    }

    pub fn copy_selected(&mut self, now: Instant) -> Vec<Effect> {
        self.handle(EditorEvent::Key(KeyCommand::Copy), now)
    }

    pub fn delete_selected(&mut self, now: Instant) -> Vec<Effect> {
        self.handle(EditorEvent::Key(KeyCommand::Delete), now)
    }

    /// Resizes the canvas without changing zoom or pan.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.canvas.viewport_mut().set_canvas_size(width, height);
    }

    /// Projects and normalizes a raw parcel ring and fits the view to it.
    /// Unusable geometry is logged and skipped.
    pub fn load_parcel(&mut self, raw: &Ring) -> Option<&ProcessedGeometry> {
        let processed = self.projector.process(raw)?;
        self.install_parcel(processed);
        self.parcel.as_ref()
    }

    /// Parses a GeoJSON parcel, projects it and fits the view to it.
    pub fn load_parcel_geojson(&mut self, input: &str) -> siteplan_core::Result<&ProcessedGeometry> {
        let raw = parse_parcel_str(input)?;
        let processed = self.projector.try_process(&raw)?;
        self.install_parcel(processed);
        self.parcel
            .as_ref()
            .ok_or_else(|| siteplan_core::Error::other("parcel was not stored"))
    }

    fn install_parcel(&mut self, processed: ProcessedGeometry) {
        info!(
            "Loaded parcel: {:.1} x {:.1} ft ({:?} input)",
            processed.bounds.width(),
            processed.bounds.height(),
            processed.source_space
        );
        self.parcel = Some(processed);
        self.fit();
    }

    /// Bounds to frame: the parcel plus every element.
    pub fn view_bounds(&self) -> Option<Bounds> {
        let parcel = self.parcel.as_ref().map(|p| p.bounds);
        match (parcel, self.canvas.content_bounds()) {
            (Some(a), Some(b)) => Some(a.union(&b)),
            (a, b) => a.or(b),
        }
    }

    /// Fits the viewport to [`Self::view_bounds`]. Returns whether the view
    /// changed.
    pub fn fit(&mut self) -> bool {
        let Some(bounds) = self.view_bounds() else {
            return false;
        };
        let fitted = self.canvas.viewport_mut().fit(&bounds);
        if fitted {
            let state = self.canvas.viewport().state();
            self.publish_effects(&[Effect::ViewportChanged(state)]);
        }
        fitted
    }

    /// Waits for `surface` to report a size, then fits the view into it.
    pub async fn fit_when_ready<S>(&mut self, surface: &S) -> Result<(), ViewportError>
    where
        S: RenderSurface + ?Sized,
    {
        let bounds = self.view_bounds().ok_or(ViewportError::ZeroExtent {
            width: 0.0,
            height: 0.0,
        })?;
        let policy = RetryPolicy::from_settings(&self.config.surface);
        fit_when_ready(self.canvas.viewport_mut(), surface, &bounds, &policy).await?;
        let state = self.canvas.viewport().state();
        self.publish_effects(&[Effect::ViewportChanged(state)]);
        Ok(())
    }

    /// Replaces the whole collection with a generated plan. Any gesture is
    /// abandoned, the selection is cleared and the view is refitted.
    pub fn apply_plan(&mut self, result: PlanResult) -> Vec<Effect> {
        let mut effects = self.controller.reset(&mut self.canvas);
        self.canvas.element_store.replace_all(result.elements);
        if self.canvas.selection.clear() {
            effects.push(Effect::SelectionChanged { ids: Vec::new() });
        }
        let count = self.canvas.element_count();
        info!(
            "Applied plan: {} elements, FAR {:.2}, compliant: {}",
            count, result.metrics.achieved_far, result.metrics.zoning_compliant
        );
        self.publish(SitePlanEvent::PlanReplaced {
            element_count: count,
        });
        self.publish_effects(&effects);
        if self.fit() {
            effects.push(Effect::ViewportChanged(self.canvas.viewport().state()));
        }
        effects
    }

    /// Requests a layout for the raw `parcel` geometry and applies it.
    pub fn generate_plan(
        &mut self,
        generator: &dyn PlanGenerator,
        parcel: Ring,
        config: PlanConfig,
    ) -> Result<Vec<Effect>, PlanError> {
        let request = PlanRequest { parcel, config };
        let result = generator.generate(&request)?;
        Ok(self.apply_plan(result))
    }

    pub fn frame(&self) -> RenderFrame {
        RenderFrame::capture(&self.canvas, &self.controller)
    }

    pub fn render(&self, renderer: &mut dyn Renderer) -> anyhow::Result<()> {
        renderer.render(&self.frame())
    }

    fn publish(&self, event: SitePlanEvent) {
        let Some(bus) = &self.bus else {
            return;
        };
        if let Err(e) = bus.publish(event) {
            trace!("{}", e);
        }
    }

    fn publish_effects(&self, effects: &[Effect]) {
        if self.bus.is_none() {
            return;
        }
        for effect in effects {
            let event = match effect {
                Effect::SelectionChanged { ids } => SitePlanEvent::SelectionChanged { ids: ids.clone() },
                Effect::ViewportChanged(state) => SitePlanEvent::ViewportChanged {
                    zoom: state.zoom,
                    pan: (state.pan_x, state.pan_y),
                },
                Effect::MeasurementCompleted { distance_ft, .. } => {
                    SitePlanEvent::MeasurementCompleted {
                        distance_ft: *distance_ft,
                    }
                }
                _ => continue,
            };
            trace!("Forwarding {} event", event.category());
            self.publish(event);
        }
    }
}
