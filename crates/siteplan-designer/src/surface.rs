//! Initial viewport fit against a rendering surface that may not be laid
//! out yet.
//!
//! A freshly created surface often reports 0 x 0 until the first layout
//! pass. [`fit_when_ready`] polls it with a bounded, backed-off retry and
//! fits once real dimensions appear.

use siteplan_core::ViewportError;
use siteplan_settings::SurfaceSettings;
use std::time::Duration;
use tracing::{debug, warn};

use crate::model::Bounds;
use crate::viewport::Viewport;

/// Something that can report its current drawable size in pixels.
pub trait RenderSurface {
    fn size(&self) -> (f64, f64);
}

impl<F> RenderSurface for F
where
    F: Fn() -> (f64, f64),
{
    fn size(&self) -> (f64, f64) {
        self()
    }
}

/// Polling schedule for [`fit_when_ready`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub initial_interval: Duration,
    pub max_attempts: u32,
    pub backoff_factor: f64,
    pub max_interval: Duration,
}

impl RetryPolicy {
    pub fn from_settings(settings: &SurfaceSettings) -> Self {
        Self {
            initial_interval: Duration::from_millis(settings.poll_interval_ms),
            max_attempts: settings.max_attempts.max(1),
            backoff_factor: settings.backoff_factor.max(1.0),
            max_interval: Duration::from_millis(settings.max_interval_ms),
        }
    }

    /// Interval to wait after a failed poll that waited `current`.
    pub fn next_interval(&self, current: Duration) -> Duration {
        current.mul_f64(self.backoff_factor).min(self.max_interval)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_settings(&SurfaceSettings::default())
    }
}

/// Waits until `surface` reports nonzero dimensions and returns them.
pub async fn wait_for_surface<S>(surface: &S, policy: &RetryPolicy) -> Result<(f64, f64), ViewportError>
where
    S: RenderSurface + ?Sized,
{
    let mut interval = policy.initial_interval;
    for attempt in 1..=policy.max_attempts {
        let (w, h) = surface.size();
        if w > 0.0 && h > 0.0 {
            debug!("Surface ready after {} polls: {} x {}", attempt, w, h);
            return Ok((w, h));
        }
        if attempt < policy.max_attempts {
            tokio::time::sleep(interval).await;
            interval = policy.next_interval(interval);
        }
    }
    warn!("Surface not ready after {} polls", policy.max_attempts);
    Err(ViewportError::SurfaceNotReady {
        attempts: policy.max_attempts,
    })
}

/// Polls `surface` until it has a size, then fits `bounds` into it.
pub async fn fit_when_ready<S>(
    viewport: &mut Viewport,
    surface: &S,
    bounds: &Bounds,
    policy: &RetryPolicy,
) -> Result<(), ViewportError>
where
    S: RenderSurface + ?Sized,
{
    let (w, h) = wait_for_surface(surface, policy).await?;
    let padding = viewport.settings().fit_padding_px;
    viewport.try_fit_to_bounds(bounds, w, h, padding)
}
