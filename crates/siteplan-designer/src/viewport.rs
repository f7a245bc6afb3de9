//! Viewport and coordinate transformation for canvas rendering.
//!
//! Handles conversion between pixel coordinates (screen space) and world
//! coordinates (site-plan feet). Manages zoom and pan with proper coordinate
//! mapping.
//!
//! The transform is `screen = world * zoom + pan`, followed by an optional
//! vertical flip. The flip lives in exactly one place, [`Viewport::flip_y`],
//! and every conversion in both directions goes through it, so painting and
//! hit-testing cannot disagree about which way is up.

use serde::{Deserialize, Serialize};
use siteplan_core::ViewportError;
use siteplan_settings::{ViewportSettings, YAxis};
use std::fmt;
use tracing::debug;

use crate::model::{Bounds, Point};

/// Zoom and pan snapshot handed to renderers and collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportState {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

/// Represents the viewport transformation state (zoom and pan).
#[derive(Debug, Clone)]
pub struct Viewport {
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
    canvas_width: f64,
    canvas_height: f64,
    settings: ViewportSettings,
}

impl Viewport {
    /// Creates a viewport at 1:1 with the world origin at the canvas corner.
    pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
        Self::with_settings(canvas_width, canvas_height, ViewportSettings::default())
    }

    pub fn with_settings(canvas_width: f64, canvas_height: f64, settings: ViewportSettings) -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            canvas_width,
            canvas_height,
            settings,
        }
    }

    pub fn canvas_width(&self) -> f64 {
        self.canvas_width
    }

    pub fn canvas_height(&self) -> f64 {
        self.canvas_height
    }

    /// Sets the canvas dimensions (typically called when the window resizes).
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas_width = width;
        self.canvas_height = height;
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan_x(&self) -> f64 {
        self.pan_x
    }

    pub fn pan_y(&self) -> f64 {
        self.pan_y
    }

    pub fn y_axis(&self) -> YAxis {
        self.settings.y_axis
    }

    pub fn settings(&self) -> &ViewportSettings {
        &self.settings
    }

    pub fn state(&self) -> ViewportState {
        ViewportState {
            zoom: self.zoom,
            pan_x: self.pan_x,
            pan_y: self.pan_y,
        }
    }

    /// Restores a snapshot. Non-positive or non-finite zoom is ignored.
    pub fn set_state(&mut self, state: ViewportState) {
        if state.zoom.is_finite() && state.zoom > 0.0 {
            self.zoom = state.zoom;
        }
        if state.pan_x.is_finite() && state.pan_y.is_finite() {
            self.pan_x = state.pan_x;
            self.pan_y = state.pan_y;
        }
    }

    /// Sets the pan offset directly.
    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.pan_x = x;
        self.pan_y = y;
    }

    /// Maps the pre-flip vertical coordinate to screen rows and back.
    ///
    /// The mapping is an involution, so the same function serves both
    /// directions.
    fn flip_y(&self, v: f64) -> f64 {
        match self.settings.y_axis {
            YAxis::Up => self.canvas_height - v,
            YAxis::Down => v,
        }
    }

    /// Converts world coordinates to screen pixels.
    ///
    /// ```text
    /// screen_x = world_x * zoom + pan_x
    /// screen_y = flip(world_y * zoom + pan_y)
    /// ```
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point::new(
            world.x * self.zoom + self.pan_x,
            self.flip_y(world.y * self.zoom + self.pan_y),
        )
    }

    /// Converts screen pixels to world coordinates. Exact inverse of
    /// [`Viewport::world_to_screen`].
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan_x) / self.zoom,
            (self.flip_y(screen.y) - self.pan_y) / self.zoom,
        )
    }

    /// World length covered by `pixels` at the current zoom.
    pub fn pixels_to_world(&self, pixels: f64) -> f64 {
        pixels / self.zoom
    }

    /// Pans by a screen-space delta: content follows the pointer.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += self.flip_y(dy) - self.flip_y(0.0);
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.settings.min_zoom, self.settings.max_zoom)
    }

    /// Sets the zoom, clamped to the configured range. With a pivot, the
    /// world point under the pivot stays under it.
    pub fn zoom_to(&mut self, new_zoom: f64, pivot: Option<Point>) {
        if !new_zoom.is_finite() || new_zoom <= 0.0 {
            return;
        }
        let zoom = self.clamp_zoom(new_zoom);
        self.apply_zoom(zoom, pivot);
    }

    fn apply_zoom(&mut self, zoom: f64, pivot: Option<Point>) {
        match pivot {
            Some(pivot) => {
                let anchor = self.screen_to_world(pivot);
                self.zoom = zoom;
                self.pan_x = pivot.x - anchor.x * zoom;
                self.pan_y = self.flip_y(pivot.y) - anchor.y * zoom;
            }
            None => self.zoom = zoom,
        }
    }

    /// Wheel step by `factor`. A fit may leave the zoom outside the
    /// configured range, so the range is widened to the current zoom: a step
    /// in never lowers the zoom and a step out never raises it.
    fn step_zoom(&mut self, factor: f64, pivot: Point) {
        let lo = self.settings.min_zoom.min(self.zoom);
        let hi = self.settings.max_zoom.max(self.zoom);
        let zoom = (self.zoom * factor).clamp(lo, hi);
        self.apply_zoom(zoom, Some(pivot));
    }

    /// One wheel step in, about a screen point.
    pub fn zoom_in_at(&mut self, screen: Point) {
        self.step_zoom(self.settings.wheel_zoom_factor, screen);
    }

    /// One wheel step out, about a screen point.
    pub fn zoom_out_at(&mut self, screen: Point) {
        self.step_zoom(1.0 / self.settings.wheel_zoom_factor, screen);
    }

    /// Centers the viewport on a world coordinate.
    pub fn center_on(&mut self, world: Point) {
        let center = Point::new(self.canvas_width / 2.0, self.canvas_height / 2.0);
        self.pan_x = center.x - world.x * self.zoom;
        self.pan_y = self.flip_y(center.y) - world.y * self.zoom;
    }

    /// Fits `bounds` into a `canvas_width` x `canvas_height` canvas, keeping
    /// `padding` pixels free on every edge.
    ///
    /// ```text
    /// zoom = min((W - 2p) / w, (H - 2p) / h [, fit_zoom_cap])
    /// ```
    ///
    /// The bounds' center lands on the canvas center. Zero-extent bounds or a
    /// canvas with no room left after padding leave the viewport unchanged;
    /// the return value says whether anything was applied.
    pub fn fit_to_bounds(
        &mut self,
        bounds: &Bounds,
        canvas_width: f64,
        canvas_height: f64,
        padding: f64,
    ) -> bool {
        match self.try_fit_to_bounds(bounds, canvas_width, canvas_height, padding) {
            Ok(()) => true,
            Err(e) => {
                debug!("Fit skipped: {}", e);
                false
            }
        }
    }

    pub fn try_fit_to_bounds(
        &mut self,
        bounds: &Bounds,
        canvas_width: f64,
        canvas_height: f64,
        padding: f64,
    ) -> Result<(), ViewportError> {
        let width = bounds.width();
        let height = bounds.height();
        if !(width > 0.0 && height > 0.0) {
            return Err(ViewportError::ZeroExtent { width, height });
        }
        let usable_w = canvas_width - 2.0 * padding;
        let usable_h = canvas_height - 2.0 * padding;
        if !(usable_w > 0.0 && usable_h > 0.0) {
            return Err(ViewportError::SurfaceNotReady { attempts: 0 });
        }

        let mut zoom = (usable_w / width).min(usable_h / height);
        if let Some(cap) = self.settings.fit_zoom_cap {
            zoom = zoom.min(cap);
        }

        self.canvas_width = canvas_width;
        self.canvas_height = canvas_height;
        self.zoom = zoom;
        self.center_on(bounds.center());
        debug!("Fitted viewport: {}", self);
        Ok(())
    }

    /// Fits `bounds` to the current canvas with the configured padding.
    pub fn fit(&mut self, bounds: &Bounds) -> bool {
        self.fit_to_bounds(
            bounds,
            self.canvas_width,
            self.canvas_height,
            self.settings.fit_padding_px,
        )
    }

    /// Resets to 1:1 with no pan.
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Zoom: {:.2}x | Pan: ({:.1}, {:.1})",
            self.zoom, self.pan_x, self.pan_y
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}
