//! Event type definitions for the event bus.
//!
//! Events are cloneable and serializable so they can be logged or forwarded
//! across a process boundary unchanged.

use serde::{Deserialize, Serialize};

/// Update record for a building footprint, emitted after drags and rotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingUpdate {
    /// Element id of the building.
    pub id: String,
    /// New centroid of the footprint, in local feet.
    pub anchor: (f64, f64),
    /// Accumulated rotation in radians.
    pub rotation_radians: f64,
    /// Length of the first ring edge, in feet.
    pub width_ft: f64,
    /// Length of the second ring edge, in feet.
    pub depth_ft: f64,
    /// Number of floors, when the element carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floors: Option<u32>,
    /// True for the un-debounced record sent once at gesture end.
    #[serde(rename = "final")]
    pub is_final: bool,
}

/// Root event enum for all editor events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SitePlanEvent {
    /// A building footprint changed through a drag or rotation.
    BuildingUpdated(BuildingUpdate),
    /// Selection membership changed.
    SelectionChanged {
        /// Ids now selected, sorted.
        ids: Vec<String>,
    },
    /// Zoom or pan changed.
    ViewportChanged {
        /// New zoom factor.
        zoom: f64,
        /// New pan offset in screen pixels.
        pan: (f64, f64),
    },
    /// The whole element collection was replaced.
    PlanReplaced {
        /// Number of elements in the new plan.
        element_count: usize,
    },
    /// A two-click measurement completed.
    MeasurementCompleted {
        /// Measured distance in feet.
        distance_ft: f64,
    },
}

impl SitePlanEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            SitePlanEvent::BuildingUpdated(_) => EventCategory::Building,
            SitePlanEvent::SelectionChanged { .. } => EventCategory::Selection,
            SitePlanEvent::ViewportChanged { .. } => EventCategory::Viewport,
            SitePlanEvent::PlanReplaced { .. } => EventCategory::Plan,
            SitePlanEvent::MeasurementCompleted { .. } => EventCategory::Measurement,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            SitePlanEvent::BuildingUpdated(update) => format!(
                "Building {} at ({:.1}, {:.1}){}",
                update.id,
                update.anchor.0,
                update.anchor.1,
                if update.is_final { " [final]" } else { "" }
            ),
            SitePlanEvent::SelectionChanged { ids } => {
                format!("Selection changed ({} selected)", ids.len())
            }
            SitePlanEvent::ViewportChanged { zoom, pan } => {
                format!("Viewport zoom {:.2} pan ({:.1}, {:.1})", zoom, pan.0, pan.1)
            }
            SitePlanEvent::PlanReplaced { element_count } => {
                format!("Plan replaced with {} elements", element_count)
            }
            SitePlanEvent::MeasurementCompleted { distance_ft } => {
                format!("Measured {:.2} ft", distance_ft)
            }
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Building footprint updates.
    Building,
    /// Selection changes.
    Selection,
    /// Zoom and pan changes.
    Viewport,
    /// Whole-plan replacement.
    Plan,
    /// Measurement results.
    Measurement,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Building => write!(f, "Building"),
            EventCategory::Selection => write!(f, "Selection"),
            EventCategory::Viewport => write!(f, "Viewport"),
            EventCategory::Plan => write!(f, "Plan"),
            EventCategory::Measurement => write!(f, "Measurement"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_building_update_serializes_final_flag() {
        let update = BuildingUpdate {
            id: "b1".to_string(),
            anchor: (30.0, 20.0),
            rotation_radians: 0.0,
            width_ft: 60.0,
            depth_ft: 40.0,
            floors: None,
            is_final: true,
        };
        let json = serde_json::to_value(&update).expect("serialize");
        assert_eq!(json["final"], serde_json::json!(true));
        assert_eq!(json["widthFt"], serde_json::json!(60.0));
        assert!(json.get("floors").is_none());
    }

    #[test]
    fn test_event_category() {
        let event = SitePlanEvent::PlanReplaced { element_count: 3 };
        assert_eq!(event.category(), EventCategory::Plan);
        assert_eq!(event.description(), "Plan replaced with 3 elements");
    }
}
