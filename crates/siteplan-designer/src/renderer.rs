//! Renderer contract.
//!
//! Painting is done by an external collaborator. It receives a
//! [`RenderFrame`] snapshot and must place everything through
//! [`RenderFrame::world_to_screen`], which delegates to the same
//! [`Viewport`] used for hit-testing. A renderer that re-derives the
//! transform (and its axis flip) on its own will draw elements where clicks
//! do not land.
//!
//! [`SvgRenderer`] is a small reference implementation that emits an SVG
//! document in screen space.

use serde::Serialize;
use siteplan_settings::YAxis;
use std::fmt::Write as _;

use crate::canvas::Canvas;
use crate::geometry::paint_order;
use crate::interaction::{InteractionController, Mode, ModeKind, Tool};
use crate::model::{Element, ElementType, Point};
use crate::viewport::{Viewport, ViewportState};

/// Live two-click measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementPreview {
    pub from: Point,
    pub to: Option<Point>,
    pub distance_ft: Option<f64>,
}

/// Everything a renderer needs for one paint.
#[derive(Debug, Clone)]
pub struct RenderFrame {
    viewport: Viewport,
    /// Elements in paint order, bottom first.
    pub elements: Vec<Element>,
    pub selection: Vec<String>,
    pub tool: Tool,
    pub mode: ModeKind,
    pub measurement: Option<MeasurementPreview>,
    /// World position of the rotation handle when one element is selected.
    pub rotation_handle: Option<Point>,
    pub vertex_editing: Option<String>,
}

impl RenderFrame {
    /// Snapshots the canvas and the controller's transient state.
    pub fn capture(canvas: &Canvas, controller: &InteractionController) -> Self {
        let measurement = match controller.mode() {
            Mode::Measuring(m) => Some(MeasurementPreview {
                from: m.anchor,
                to: m.preview,
                distance_ft: m.preview_distance(),
            }),
            _ => None,
        };
        Self {
            viewport: canvas.viewport().clone(),
            elements: paint_order(canvas.elements()).into_iter().cloned().collect(),
            selection: canvas.selection.to_vec(),
            tool: controller.tool(),
            mode: controller.mode().kind(),
            measurement,
            rotation_handle: controller.rotation_handle(canvas),
            vertex_editing: controller.vertex_editing().map(String::from),
        }
    }

    pub fn viewport_state(&self) -> ViewportState {
        self.viewport.state()
    }

    pub fn canvas_size(&self) -> (f64, f64) {
        (self.viewport.canvas_width(), self.viewport.canvas_height())
    }

    pub fn y_axis(&self) -> YAxis {
        self.viewport.y_axis()
    }

    /// The one world-to-screen mapping renderers may use.
    pub fn world_to_screen(&self, world: Point) -> Point {
        self.viewport.world_to_screen(world)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.iter().any(|s| s == id)
    }
}

/// Paints frames.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> anyhow::Result<()>;
}

fn fill_color(kind: ElementType) -> &'static str {
    match kind {
        ElementType::Building => "#5d6d7e",
        ElementType::Parking | ElementType::ParkingBay => "#aab7b8",
        ElementType::ParkingAisle => "#d5dbdb",
        ElementType::Circulation => "#f0e6c8",
        ElementType::Greenspace => "#7dcea0",
    }
}

/// Renders frames to an SVG document string.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    output: String,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// SVG from the most recent frame.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_output(self) -> String {
        self.output
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, frame: &RenderFrame) -> anyhow::Result<()> {
        let (w, h) = frame.canvas_size();
        let mut svg = String::new();
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        )?;

        for element in &frame.elements {
            let mut path = String::new();
            for (i, p) in element.geometry.points().iter().enumerate() {
                let s = frame.world_to_screen(*p);
                let cmd = if i == 0 { 'M' } else { 'L' };
                write!(path, "{} {:.2} {:.2} ", cmd, s.x, s.y)?;
            }
            path.push('Z');
            let stroke = if frame.is_selected(&element.id) {
                r##"stroke="#f1c40f" stroke-width="2""##
            } else {
                r##"stroke="#2c3e50" stroke-width="1""##
            };
            writeln!(
                svg,
                r#"  <path id="{}" d="{}" fill="{}" {}/>"#,
                element.id,
                path,
                fill_color(element.element_type),
                stroke
            )?;
        }

        if let Some(handle) = frame.rotation_handle {
            let s = frame.world_to_screen(handle);
            writeln!(
                svg,
                r##"  <circle class="rotation-handle" cx="{:.2}" cy="{:.2}" r="6" fill="#f1c40f"/>"##,
                s.x, s.y
            )?;
        }

        if let Some(MeasurementPreview {
            from,
            to: Some(to),
            ..
        }) = frame.measurement
        {
            let a = frame.world_to_screen(from);
            let b = frame.world_to_screen(to);
            writeln!(
                svg,
                r##"  <line class="measurement" x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="#e74c3c"/>"##,
                a.x, a.y, b.x, b.y
            )?;
        }

        svg.push_str("</svg>\n");
        self.output = svg;
        Ok(())
    }
}
