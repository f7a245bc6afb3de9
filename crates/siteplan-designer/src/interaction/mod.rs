//! Pointer interaction state machine.
//!
//! [`InteractionController::handle`] takes one [`EditorEvent`], updates the
//! [`Canvas`] it is given, and returns the list of [`Effect`]s describing
//! what changed. There are no callbacks. Time is an explicit argument so
//! debouncing is deterministic under test.
//!
//! Pointer-down resolves in a fixed priority order:
//!
//! 1. middle button, left button with the pan modifier, or the pan tool: pan
//! 2. measure tool: first click anchors, second click completes
//! 3. draw tool: drop a default footprint at the snapped point
//! 4. the single selected element's rotation handle: rotate
//! 5. a vertex of the armed, selected element: vertex edit
//! 6. hit-test; an armed, selected hit retries step 5
//! 7. on a hit: toggle with the modifier, otherwise select and drag
//! 8. on empty space without the modifier: clear the selection

mod pointer;
mod types;

pub use types::{
    DragState, EditorEvent, Effect, KeyCommand, MeasurementState, Mode, ModeKind, Modifiers,
    PointerButton, RotationState, Tool, VertexEditState,
};

use siteplan_settings::{Config, FootprintSettings, InteractionSettings};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::building_updates::{building_update, BuildingUpdateDebouncer, BuildingUpdateSink};
use crate::canvas::Canvas;
use crate::element_store::ElementStore;
use crate::geometry::{self, AlignMode};
use crate::grid::GridSnapper;
use crate::model::{Element, Point};

/// Drives tools and gestures over a [`Canvas`].
pub struct InteractionController {
    tool: Tool,
    mode: Mode,
    vertex_editing: Option<String>,
    grid: GridSnapper,
    settings: InteractionSettings,
    footprints: FootprintSettings,
    debouncer: BuildingUpdateDebouncer,
    sink: Arc<dyn BuildingUpdateSink>,
    /// Ids whose debounced record already reached the sink this gesture.
    delivered: BTreeSet<String>,
}

impl InteractionController {
    pub fn new(config: &Config, sink: Arc<dyn BuildingUpdateSink>) -> Self {
        Self {
            tool: Tool::Select,
            mode: Mode::Select,
            vertex_editing: None,
            grid: GridSnapper::from_settings(&config.grid),
            settings: config.interaction.clone(),
            footprints: config.footprints.clone(),
            debouncer: BuildingUpdateDebouncer::new(Duration::from_millis(
                config.notifications.building_update_debounce_ms,
            )),
            sink,
            delivered: BTreeSet::new(),
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Element id vertex editing is armed for.
    pub fn vertex_editing(&self) -> Option<&str> {
        self.vertex_editing.as_deref()
    }

    pub fn grid(&self) -> GridSnapper {
        self.grid
    }

    pub fn set_grid(&mut self, grid: GridSnapper) {
        self.grid = grid;
    }

    pub fn settings(&self) -> &InteractionSettings {
        &self.settings
    }

    pub fn pending_updates(&self) -> usize {
        self.debouncer.pending_count()
    }

    /// When the next debounced record comes due, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.next_deadline()
    }

    /// World position of the rotation handle, shown only while exactly one
    /// element is selected.
    pub fn rotation_handle(&self, canvas: &Canvas) -> Option<Point> {
        let id = canvas.selection.single()?;
        let element = canvas.get_element(id)?;
        let vp = canvas.viewport();
        geometry::rotation_handle_position(
            element,
            vp.zoom(),
            self.settings.rotation_handle_offset_px,
            vp.y_axis(),
        )
    }

    /// Processes one event and reports what changed.
    pub fn handle(&mut self, event: EditorEvent, now: Instant, canvas: &mut Canvas) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.flush_due(now, &mut effects);
        match event {
            EditorEvent::PointerDown {
                position,
                button,
                modifiers,
            } => self.pointer_down(position, button, modifiers, canvas, &mut effects),
            EditorEvent::PointerMove {
                position,
                modifiers,
            } => self.pointer_move(position, modifiers, now, canvas, &mut effects),
            EditorEvent::PointerUp { .. } => self.finish_gesture(canvas, &mut effects),
            EditorEvent::Wheel { position, delta_y } => {
                self.wheel(position, delta_y, canvas, &mut effects)
            }
            EditorEvent::Key(command) => self.key(command, canvas, &mut effects),
            EditorEvent::SetTool(tool) => self.set_tool(tool, canvas, &mut effects),
            EditorEvent::Tick => {}
        }
        effects
    }

    /// Abandons any gesture, restoring what it changed, and returns to the
    /// select tool with vertex editing disarmed.
    pub fn reset(&mut self, canvas: &mut Canvas) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.abort(canvas, &mut effects);
        self.debouncer.cancel_all();
        if self.tool != Tool::Select {
            self.tool = Tool::Select;
            effects.push(Effect::ToolChanged(Tool::Select));
        }
        self.disarm_vertex_editing(&mut effects);
        effects
    }

    fn set_tool(&mut self, tool: Tool, canvas: &mut Canvas, effects: &mut Vec<Effect>) {
        self.abort(canvas, effects);
        if tool != self.tool {
            debug!("Tool {} -> {}", self.tool, tool);
            self.tool = tool;
            effects.push(Effect::ToolChanged(tool));
        }
    }

    fn revert_tool(&mut self, effects: &mut Vec<Effect>) {
        if self.settings.single_shot_tools && self.tool.is_single_shot() {
            self.tool = Tool::Select;
            effects.push(Effect::ToolChanged(Tool::Select));
        }
    }

    fn enter(&mut self, mode: Mode, effects: &mut Vec<Effect>) {
        let kind = mode.kind();
        self.mode = mode;
        self.delivered.clear();
        debug!("Mode -> {:?}", kind);
        effects.push(Effect::ModeChanged(kind));
    }

    /// Ends the current pointer gesture, committing its result. Building
    /// elements that actually moved get one final record. Measuring spans
    /// two clicks and is left alone.
    fn finish_gesture(&mut self, canvas: &mut Canvas, effects: &mut Vec<Effect>) {
        let finished: Vec<String> = match std::mem::take(&mut self.mode) {
            Mode::Select => return,
            Mode::Measuring(state) => {
                self.mode = Mode::Measuring(state);
                return;
            }
            Mode::Dragging(drag) if drag.changed => {
                drag.originals.iter().map(|e| e.id.clone()).collect()
            }
            Mode::Rotating(rotation) if rotation.changed => vec![rotation.original.id],
            _ => Vec::new(),
        };
        for id in &finished {
            self.send_final(id, canvas, effects);
        }
        self.delivered.clear();
        effects.push(Effect::ModeChanged(ModeKind::Select));
    }

    /// Cancels the current gesture or measurement. Elements go back to
    /// their captured state and their pending records are dropped; any
    /// element whose intermediate record already went out gets a final
    /// record for the restored state.
    fn abort(&mut self, canvas: &mut Canvas, effects: &mut Vec<Effect>) {
        let restored: Vec<Element> = match std::mem::take(&mut self.mode) {
            Mode::Select => return,
            Mode::Dragging(drag) => drag.originals,
            Mode::Rotating(rotation) => vec![rotation.original],
            Mode::VertexEditing(edit) => vec![edit.original],
            Mode::Panning { .. } | Mode::Measuring(_) => Vec::new(),
        };
        if !restored.is_empty() {
            let ids: Vec<String> = restored.iter().map(|e| e.id.clone()).collect();
            for original in restored {
                self.debouncer.cancel(&original.id);
                if self.delivered.contains(&original.id) {
                    if let Some(update) = building_update(&original, true) {
                        self.debouncer.finalize(update, &*self.sink);
                        effects.push(Effect::BuildingUpdateSent {
                            id: original.id.clone(),
                            is_final: true,
                        });
                    }
                }
                canvas.element_store.replace(original);
            }
            debug!("Gesture aborted, {} elements restored", ids.len());
            effects.push(Effect::ElementsChanged { ids });
        }
        self.delivered.clear();
        effects.push(Effect::ModeChanged(ModeKind::Select));
    }

    fn schedule(&mut self, element: &Element, now: Instant) {
        if let Some(update) = building_update(element, false) {
            self.debouncer.schedule(update, now);
        }
    }

    fn send_final(&mut self, id: &str, canvas: &Canvas, effects: &mut Vec<Effect>) {
        let update = canvas
            .get_element(id)
            .and_then(|element| building_update(element, true));
        match update {
            Some(update) => {
                self.debouncer.finalize(update, &*self.sink);
                effects.push(Effect::BuildingUpdateSent {
                    id: id.to_string(),
                    is_final: true,
                });
            }
            None => {
                self.debouncer.cancel(id);
            }
        }
    }

    fn flush_due(&mut self, now: Instant, effects: &mut Vec<Effect>) {
        for id in self.debouncer.flush_due(now, &*self.sink) {
            effects.push(Effect::BuildingUpdateSent {
                id: id.clone(),
                is_final: false,
            });
            self.delivered.insert(id);
        }
    }

    fn wheel(&mut self, position: Point, delta_y: f64, canvas: &mut Canvas, effects: &mut Vec<Effect>) {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return;
        }
        let viewport = canvas.viewport_mut();
        if delta_y < 0.0 {
            viewport.zoom_in_at(position);
        } else {
            viewport.zoom_out_at(position);
        }
        effects.push(Effect::ViewportChanged(viewport.state()));
    }

    fn key(&mut self, command: KeyCommand, canvas: &mut Canvas, effects: &mut Vec<Effect>) {
        if command == KeyCommand::Escape {
            if self.mode != Mode::Select {
                self.abort(canvas, effects);
            } else {
                self.clear_selection(canvas, effects);
            }
            return;
        }

        self.abort(canvas, effects);
        match command {
            KeyCommand::Escape => {}
            KeyCommand::Delete => self.delete_selected(canvas, effects),
            KeyCommand::SelectAll => {
                let ids: Vec<String> = canvas.element_store.ids().map(String::from).collect();
                if canvas.selection.set_all(ids) {
                    effects.push(selection_changed(canvas));
                }
            }
            KeyCommand::Copy => self.copy_selected(canvas, effects),
            KeyCommand::Align(mode) => align_selected(mode, canvas, effects),
            KeyCommand::ToggleVertexEditing => self.toggle_vertex_editing(canvas, effects),
        }
    }

    fn clear_selection(&mut self, canvas: &mut Canvas, effects: &mut Vec<Effect>) {
        if canvas.selection.clear() {
            effects.push(selection_changed(canvas));
        }
        self.disarm_vertex_editing(effects);
    }

    fn delete_selected(&mut self, canvas: &mut Canvas, effects: &mut Vec<Effect>) {
        if canvas.selection.is_empty() {
            return;
        }
        let ids = canvas.selection.to_vec();
        for id in &ids {
            self.debouncer.cancel(id);
        }
        let remaining = geometry::delete_elements(canvas.elements(), canvas.selection.ids());
        canvas.element_store.replace_all(remaining);
        info!("Deleted {} elements", ids.len());
        effects.push(Effect::ElementsDeleted { ids });
        if canvas.prune_selection() {
            effects.push(selection_changed(canvas));
        }
        self.disarm_vertex_editing(effects);
    }

    fn copy_selected(&mut self, canvas: &mut Canvas, effects: &mut Vec<Effect>) {
        if canvas.selection.is_empty() {
            return;
        }
        let copies = geometry::copy_elements(
            canvas.elements(),
            canvas.selection.ids(),
            self.settings.copy_offset_ft,
            ElementStore::generate_id,
        );
        let ids: Vec<String> = copies.iter().map(|e| e.id.clone()).collect();
        for copy in copies {
            effects.push(Effect::ElementCreated {
                id: copy.id.clone(),
            });
            canvas.element_store.insert(copy);
        }
        canvas.selection.set_all(ids);
        effects.push(selection_changed(canvas));
        self.disarm_vertex_editing(effects);
    }

    fn toggle_vertex_editing(&mut self, canvas: &Canvas, effects: &mut Vec<Effect>) {
        let next = match canvas.selection.single() {
            Some(id) if self.vertex_editing.as_deref() != Some(id) => Some(id.to_string()),
            _ => None,
        };
        if next != self.vertex_editing {
            self.vertex_editing = next.clone();
            effects.push(Effect::VertexEditingChanged { element_id: next });
        }
    }

    fn disarm_vertex_editing(&mut self, effects: &mut Vec<Effect>) {
        if self.vertex_editing.take().is_some() {
            effects.push(Effect::VertexEditingChanged { element_id: None });
        }
    }
}

fn selection_changed(canvas: &Canvas) -> Effect {
    Effect::SelectionChanged {
        ids: canvas.selection.to_vec(),
    }
}

fn align_selected(mode: AlignMode, canvas: &mut Canvas, effects: &mut Vec<Effect>) {
    if canvas.selection.len() < 2 {
        return;
    }
    let aligned = geometry::align_elements(canvas.elements(), canvas.selection.ids(), mode);
    let ids = canvas.selection.to_vec();
    for element in aligned {
        if canvas.selection.contains(&element.id) {
            canvas.element_store.replace(element);
        }
    }
    debug!("Aligned {} elements ({})", ids.len(), mode);
    effects.push(Effect::ElementsChanged { ids });
}
