//! Interaction type definitions: tools, modifiers, events, modes and effects.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::AlignMode;
use crate::model::{Element, Point};
use crate::templates::DrawTool;
use crate::viewport::ViewportState;

/// Active tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Select,
    /// Left-drag pans the view. Stays active until another tool is chosen.
    Pan,
    Measure,
    Draw(DrawTool),
}

impl Tool {
    /// Tools that revert to `Select` after one use when single-shot tools
    /// are enabled.
    pub fn is_single_shot(self) -> bool {
        matches!(self, Tool::Measure | Tool::Draw(_))
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tool::Select => write!(f, "select"),
            Tool::Pan => write!(f, "pan"),
            Tool::Measure => write!(f, "measure"),
            Tool::Draw(t) => write!(f, "draw:{}", t.as_str()),
        }
    }
}

/// Keyboard modifier state at the time of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
    /// Space bar held.
    pub space: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
        space: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Self::NONE
        }
    }

    /// Left button plus this starts a pan.
    pub fn pan(&self) -> bool {
        self.alt || self.space
    }

    /// Click toggles selection membership instead of replacing it.
    pub fn toggle(&self) -> bool {
        self.shift || self.ctrl || self.meta
    }

    /// Rotation snaps to fixed increments.
    pub fn rotation_snap(&self) -> bool {
        self.shift
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

/// Keyboard commands understood by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyCommand {
    Delete,
    Escape,
    SelectAll,
    /// Duplicate the selection with the configured offset.
    Copy,
    Align(AlignMode),
    /// Arm or disarm vertex editing for the single selected element.
    ToggleVertexEditing,
}

/// Input to [`super::InteractionController::handle`]. Positions are screen
/// pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorEvent {
    PointerDown {
        position: Point,
        button: PointerButton,
        modifiers: Modifiers,
    },
    PointerMove {
        position: Point,
        modifiers: Modifiers,
    },
    PointerUp {
        position: Point,
        button: PointerButton,
    },
    /// Negative `delta_y` zooms in.
    Wheel { position: Point, delta_y: f64 },
    Key(KeyCommand),
    SetTool(Tool),
    /// Lets due debounced notifications go out.
    Tick,
}

/// Captured at drag start.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    /// Grid-snapped world point under the pointer at gesture start.
    pub anchor: Point,
    /// Every dragged element as it was at gesture start.
    pub originals: Vec<Element>,
    /// Total delta applied by the latest move.
    pub delta: (f64, f64),
    pub changed: bool,
}

/// Captured at rotation start.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationState {
    /// The element, ring and stored rotation included, at gesture start.
    pub original: Element,
    pub center: Point,
    /// Pointer angle at gesture start, degrees.
    pub start_angle: f64,
    /// Delta applied by the latest move, degrees.
    pub delta_deg: f64,
    pub changed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VertexEditState {
    pub original: Element,
    pub vertex_index: usize,
    pub changed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementState {
    pub anchor: Point,
    pub preview: Option<Point>,
}

impl MeasurementState {
    pub fn preview_distance(&self) -> Option<f64> {
        self.preview.map(|p| self.anchor.distance_to(&p))
    }
}

/// The transient interaction mode. At most one is active.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Mode {
    #[default]
    Select,
    Panning { last: Point },
    Dragging(DragState),
    Rotating(RotationState),
    VertexEditing(VertexEditState),
    Measuring(MeasurementState),
}

impl Mode {
    pub fn kind(&self) -> ModeKind {
        match self {
            Mode::Select => ModeKind::Select,
            Mode::Panning { .. } => ModeKind::Panning,
            Mode::Dragging(_) => ModeKind::Dragging,
            Mode::Rotating(_) => ModeKind::Rotating,
            Mode::VertexEditing(_) => ModeKind::VertexEditing,
            Mode::Measuring(_) => ModeKind::Measuring,
        }
    }

    /// True while a pointer-held gesture is in progress.
    pub fn is_gesture(&self) -> bool {
        matches!(
            self,
            Mode::Panning { .. } | Mode::Dragging(_) | Mode::Rotating(_) | Mode::VertexEditing(_)
        )
    }
}

/// Mode discriminant, cheap to copy into effects and render frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModeKind {
    Select,
    Panning,
    Dragging,
    Rotating,
    VertexEditing,
    Measuring,
}

/// What a handled event changed.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ElementsChanged { ids: Vec<String> },
    ElementCreated { id: String },
    ElementsDeleted { ids: Vec<String> },
    SelectionChanged { ids: Vec<String> },
    ViewportChanged(ViewportState),
    ModeChanged(ModeKind),
    ToolChanged(Tool),
    VertexEditingChanged { element_id: Option<String> },
    MeasurementPreview { from: Point, to: Point, distance_ft: f64 },
    MeasurementCompleted { from: Point, to: Point, distance_ft: f64 },
    BuildingUpdateSent { id: String, is_final: bool },
}
