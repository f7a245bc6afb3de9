//! Building update notifications.
//!
//! Drags and rotations of building elements are reported to an external
//! sink. While a gesture runs, records are debounced per element with
//! cancel-and-reschedule semantics; when it ends, one un-debounced record
//! marked final is sent so the last value is never lost to a pending timer.
//!
//! Time is passed in explicitly. The interaction loop feeds `Tick` events
//! and the debouncer flushes whatever has come due.

use parking_lot::Mutex;
use siteplan_core::{BuildingUpdate, EventBus, EventBusError, SitePlanEvent};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::trace;

use crate::geometry::centroid;
use crate::model::Element;

/// Receives building update records.
pub trait BuildingUpdateSink: Send + Sync {
    fn emit(&self, update: BuildingUpdate);
}

impl<T: BuildingUpdateSink + ?Sized> BuildingUpdateSink for Arc<T> {
    fn emit(&self, update: BuildingUpdate) {
        (**self).emit(update)
    }
}

/// Publishes records on an explicitly constructed [`EventBus`].
#[derive(Clone)]
pub struct EventBusSink {
    bus: Arc<EventBus>,
}

impl EventBusSink {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self { bus }
    }
}

impl BuildingUpdateSink for EventBusSink {
    fn emit(&self, update: BuildingUpdate) {
        match self.bus.publish(SitePlanEvent::BuildingUpdated(update)) {
            Ok(n) => trace!("Building update delivered to {} receivers", n),
            Err(EventBusError::NoSubscribers) => trace!("Building update had no listeners"),
        }
    }
}

/// Keeps every record in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    updates: Mutex<Vec<BuildingUpdate>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<BuildingUpdate> {
        self.updates.lock().clone()
    }

    pub fn finals(&self) -> Vec<BuildingUpdate> {
        self.updates
            .lock()
            .iter()
            .filter(|u| u.is_final)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.updates.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.lock().is_empty()
    }

    pub fn clear(&self) {
        self.updates.lock().clear();
    }
}

impl BuildingUpdateSink for RecordingSink {
    fn emit(&self, update: BuildingUpdate) {
        self.updates.lock().push(update);
    }
}

/// Builds the update record for a building element. Width and depth are the
/// lengths of the first two ring edges. Non-buildings yield `None`.
pub fn building_update(element: &Element, is_final: bool) -> Option<BuildingUpdate> {
    if !element.is_building() {
        return None;
    }
    let anchor = centroid(element)?;
    Some(BuildingUpdate {
        id: element.id.clone(),
        anchor: (anchor.x, anchor.y),
        rotation_radians: element.rotation_degrees().to_radians(),
        width_ft: element.geometry.edge_length(0)?,
        depth_ft: element.geometry.edge_length(1)?,
        floors: element.stories(),
        is_final,
    })
}

#[derive(Debug, Clone)]
struct Pending {
    update: BuildingUpdate,
    due: Instant,
}

/// One pending record per element id.
#[derive(Debug, Clone)]
pub struct BuildingUpdateDebouncer {
    delay: Duration,
    pending: BTreeMap<String, Pending>,
}

impl BuildingUpdateDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: BTreeMap::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Stores `update`, replacing any pending record for the same id and
    /// pushing its deadline to `now + delay`.
    pub fn schedule(&mut self, update: BuildingUpdate, now: Instant) {
        let due = now + self.delay;
        self.pending.insert(update.id.clone(), Pending { update, due });
    }

    /// Emits every record whose deadline has passed. Returns the ids sent.
    pub fn flush_due(&mut self, now: Instant, sink: &dyn BuildingUpdateSink) -> Vec<String> {
        let due: Vec<String> = self
            .pending
            .iter()
            .filter(|(_, p)| p.due <= now)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &due {
            if let Some(p) = self.pending.remove(id) {
                sink.emit(p.update);
            }
        }
        due
    }

    /// Drops the pending record for `id`. Safe to call when nothing is
    /// pending.
    pub fn cancel(&mut self, id: &str) -> bool {
        self.pending.remove(id).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Cancels anything pending for the record's id and emits it at once,
    /// marked final.
    pub fn finalize(&mut self, mut update: BuildingUpdate, sink: &dyn BuildingUpdateSink) {
        self.cancel(&update.id);
        update.is_final = true;
        sink.emit(update);
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.pending.contains_key(id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.due).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, x: f64) -> BuildingUpdate {
        BuildingUpdate {
            id: id.to_string(),
            anchor: (x, 0.0),
            rotation_radians: 0.0,
            width_ft: 60.0,
            depth_ft: 40.0,
            floors: None,
            is_final: false,
        }
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut d = BuildingUpdateDebouncer::new(Duration::from_millis(80));
        assert!(!d.cancel("missing"));
        d.schedule(record("a", 1.0), Instant::now());
        assert!(d.cancel("a"));
        assert!(!d.cancel("a"));
    }

    #[test]
    fn test_reschedule_keeps_latest() {
        let sink = RecordingSink::new();
        let mut d = BuildingUpdateDebouncer::new(Duration::from_millis(80));
        let t0 = Instant::now();
        d.schedule(record("a", 1.0), t0);
        d.schedule(record("a", 2.0), t0 + Duration::from_millis(50));
        assert!(d.flush_due(t0 + Duration::from_millis(100), &sink).is_empty());
        let sent = d.flush_due(t0 + Duration::from_millis(130), &sink);
        assert_eq!(sent, vec!["a".to_string()]);
        assert_eq!(sink.updates().len(), 1);
        assert_eq!(sink.updates()[0].anchor.0, 2.0);
    }
}
