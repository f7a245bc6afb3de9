//! Pointer-down resolution and per-mode pointer-move handling.

use std::time::Instant;
use tracing::{debug, info, warn};

use super::{
    selection_changed, DragState, Effect, InteractionController, MeasurementState, Mode,
    ModeKind, Modifiers, PointerButton, RotationState, Tool, VertexEditState,
};
use crate::canvas::Canvas;
use crate::element_store::ElementStore;
use crate::geometry;
use crate::model::Point;
use crate::templates::DrawTool;

/// Pointer angle around `center`, degrees counter-clockwise from +X.
fn angle_deg(center: Point, p: Point) -> f64 {
    (p.y - center.y).atan2(p.x - center.x).to_degrees()
}

/// Wraps an angle difference into (-180, 180].
fn normalize_delta_deg(delta: f64) -> f64 {
    let wrapped = delta.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

impl InteractionController {
    pub(super) fn pointer_down(
        &mut self,
        position: Point,
        button: PointerButton,
        modifiers: Modifiers,
        canvas: &mut Canvas,
        effects: &mut Vec<Effect>,
    ) {
        // A missed pointer-up leaves a gesture running; commit it first.
        if self.mode.is_gesture() {
            self.finish_gesture(canvas, effects);
        }

        let pan_requested = button == PointerButton::Middle
            || (button == PointerButton::Left && (modifiers.pan() || self.tool == Tool::Pan));
        if pan_requested {
            self.enter(Mode::Panning { last: position }, effects);
            return;
        }
        if button != PointerButton::Left {
            return;
        }

        let world = canvas.viewport().screen_to_world(position);
        match self.tool {
            Tool::Measure => {
                self.measure_click(world, effects);
                return;
            }
            Tool::Draw(kind) => {
                self.draw_at(kind, world, canvas, effects);
                return;
            }
            Tool::Select | Tool::Pan => {}
        }

        if let Some(rotation) = self.rotation_handle_hit(world, canvas) {
            self.enter(Mode::Rotating(rotation), effects);
            return;
        }

        if let Some(id) = canvas.selection.single() {
            if self.vertex_editing.as_deref() == Some(id) {
                if let Some(edit) = self.vertex_hit(id, world, canvas) {
                    self.enter(Mode::VertexEditing(edit), effects);
                    return;
                }
            }
        }

        let hit = geometry::topmost_element_at(canvas.elements(), world.x, world.y)
            .map(|e| e.id.clone());
        let Some(hit_id) = hit else {
            if !modifiers.toggle() {
                self.clear_selection(canvas, effects);
            }
            return;
        };

        if canvas.selection.contains(&hit_id) && self.vertex_editing.as_deref() == Some(hit_id.as_str()) {
            if let Some(edit) = self.vertex_hit(&hit_id, world, canvas) {
                self.enter(Mode::VertexEditing(edit), effects);
                return;
            }
        }

        if modifiers.toggle() {
            let now_selected = canvas.selection.toggle(&hit_id);
            effects.push(selection_changed(canvas));
            if !now_selected && self.vertex_editing.as_deref() == Some(hit_id.as_str()) {
                self.disarm_vertex_editing(effects);
            }
            return;
        }

        // Clicking inside an existing multi-selection drags all of it.
        if !canvas.selection.contains(&hit_id) {
            canvas.selection.replace(&hit_id);
            effects.push(selection_changed(canvas));
            if self.vertex_editing.is_some() && self.vertex_editing.as_deref() != Some(hit_id.as_str()) {
                self.disarm_vertex_editing(effects);
            }
        }

        let originals = canvas.selected_elements().into_iter().cloned().collect();
        let drag = DragState {
            anchor: self.grid.snap(world),
            originals,
            delta: (0.0, 0.0),
            changed: false,
        };
        debug!("Drag start at ({:.2}, {:.2})", world.x, world.y);
        self.enter(Mode::Dragging(drag), effects);
    }

    pub(super) fn pointer_move(
        &mut self,
        position: Point,
        modifiers: Modifiers,
        now: Instant,
        canvas: &mut Canvas,
        effects: &mut Vec<Effect>,
    ) {
        let mut mode = std::mem::take(&mut self.mode);
        match &mut mode {
            Mode::Select => {}
            Mode::Panning { last } => {
                let (dx, dy) = (position.x - last.x, position.y - last.y);
                *last = position;
                let viewport = canvas.viewport_mut();
                viewport.pan(dx, dy);
                effects.push(Effect::ViewportChanged(viewport.state()));
            }
            Mode::Dragging(drag) => {
                let snapped = self.grid.snap(canvas.viewport().screen_to_world(position));
                let delta = (snapped.x - drag.anchor.x, snapped.y - drag.anchor.y);
                if delta != drag.delta {
                    drag.delta = delta;
                    drag.changed |= delta != (0.0, 0.0);
                    let mut ids = Vec::with_capacity(drag.originals.len());
                    for original in &drag.originals {
                        let moved = geometry::move_by(original, delta.0, delta.1, &original.geometry);
                        self.schedule(&moved, now);
                        ids.push(moved.id.clone());
                        canvas.element_store.replace(moved);
                    }
                    effects.push(Effect::ElementsChanged { ids });
                }
            }
            Mode::Rotating(rotation) => {
                let world = canvas.viewport().screen_to_world(position);
                let mut delta =
                    normalize_delta_deg(angle_deg(rotation.center, world) - rotation.start_angle);
                let step = self.settings.rotation_snap_deg;
                if modifiers.rotation_snap() && step > 0.0 {
                    delta = normalize_delta_deg((delta / step).round() * step);
                }
                if delta != rotation.delta_deg {
                    rotation.delta_deg = delta;
                    rotation.changed |= delta != 0.0;
                    let original = &rotation.original;
                    let rotated =
                        geometry::rotate(original, delta, Some(rotation.center), &original.geometry);
                    self.schedule(&rotated, now);
                    effects.push(Effect::ElementsChanged {
                        ids: vec![rotated.id.clone()],
                    });
                    canvas.element_store.replace(rotated);
                }
            }
            Mode::VertexEditing(edit) => {
                let p = self.grid.snap(canvas.viewport().screen_to_world(position));
                if let Some(updated) =
                    geometry::update_vertex(&edit.original, edit.vertex_index, p.x, p.y)
                {
                    edit.changed = true;
                    effects.push(Effect::ElementsChanged {
                        ids: vec![updated.id.clone()],
                    });
                    canvas.element_store.replace(updated);
                }
            }
            Mode::Measuring(measure) => {
                let world = canvas.viewport().screen_to_world(position);
                measure.preview = Some(world);
                effects.push(Effect::MeasurementPreview {
                    from: measure.anchor,
                    to: world,
                    distance_ft: measure.anchor.distance_to(&world),
                });
            }
        }
        self.mode = mode;
    }

    fn measure_click(&mut self, world: Point, effects: &mut Vec<Effect>) {
        match std::mem::take(&mut self.mode) {
            Mode::Measuring(measure) => {
                let distance_ft = measure.anchor.distance_to(&world);
                info!("Measured {:.2} ft", distance_ft);
                effects.push(Effect::MeasurementCompleted {
                    from: measure.anchor,
                    to: world,
                    distance_ft,
                });
                effects.push(Effect::ModeChanged(ModeKind::Select));
                self.revert_tool(effects);
            }
            _ => {
                let measure = MeasurementState {
                    anchor: world,
                    preview: None,
                };
                self.enter(Mode::Measuring(measure), effects);
            }
        }
    }

    fn draw_at(&mut self, kind: DrawTool, world: Point, canvas: &mut Canvas, effects: &mut Vec<Effect>) {
        let center = self.grid.snap(world);
        match kind.instantiate(ElementStore::generate_id(), center, &self.footprints) {
            Ok(element) => {
                let id = element.id.clone();
                info!("Drew {} {} at ({:.1}, {:.1})", kind.as_str(), id, center.x, center.y);
                canvas.element_store.insert(element);
                effects.push(Effect::ElementCreated { id: id.clone() });
                canvas.selection.replace(&id);
                effects.push(selection_changed(canvas));
                self.disarm_vertex_editing(effects);
            }
            Err(e) => warn!("Draw {} skipped: {}", kind.as_str(), e),
        }
        self.revert_tool(effects);
    }

    fn rotation_handle_hit(&self, world: Point, canvas: &Canvas) -> Option<RotationState> {
        let handle = self.rotation_handle(canvas)?;
        let radius = canvas
            .viewport()
            .pixels_to_world(self.settings.handle_hit_radius_px);
        if world.distance_to(&handle) > radius {
            return None;
        }
        let element = canvas.get_element(canvas.selection.single()?)?;
        let center = geometry::centroid(element)?;
        Some(RotationState {
            original: element.clone(),
            center,
            start_angle: angle_deg(center, world),
            delta_deg: 0.0,
            changed: false,
        })
    }

    fn vertex_hit(&self, id: &str, world: Point, canvas: &Canvas) -> Option<VertexEditState> {
        let element = canvas.get_element(id)?;
        let threshold = canvas
            .viewport()
            .pixels_to_world(self.settings.vertex_hit_radius_px);
        let vertex_index = geometry::nearest_vertex(element, world.x, world.y, threshold)?;
        Some(VertexEditState {
            original: element.clone(),
            vertex_index,
            changed: false,
        })
    }
}
