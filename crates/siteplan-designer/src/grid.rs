//! Grid snapping.

use siteplan_core::{feet_to_meters, meters_to_feet};
use siteplan_settings::GridSettings;

use crate::model::Point;

/// Quantizes world points to a square grid.
///
/// Rounding happens in metres so a pitch entered in feet lands on the same
/// lines as the metric site grid. Ties round away from zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSnapper {
    pub enabled: bool,
    pub pitch_ft: f64,
}

impl Default for GridSnapper {
    fn default() -> Self {
        Self::from_settings(&GridSettings::default())
    }
}

impl GridSnapper {
    pub fn new(enabled: bool, pitch_ft: f64) -> Self {
        Self { enabled, pitch_ft }
    }

    pub fn from_settings(settings: &GridSettings) -> Self {
        Self::new(settings.enabled, settings.pitch_ft)
    }

    pub fn is_active(&self) -> bool {
        self.enabled && self.pitch_ft.is_finite() && self.pitch_ft > 0.0
    }

    pub fn snap(&self, p: Point) -> Point {
        if !self.is_active() || !p.is_finite() {
            return p;
        }
        Point::new(self.snap_value(p.x), self.snap_value(p.y))
    }

    fn snap_value(&self, feet: f64) -> f64 {
        let pitch_m = feet_to_meters(self.pitch_ft);
        let steps = (feet_to_meters(feet) / pitch_m).round();
        meters_to_feet(steps * pitch_m)
    }
}
