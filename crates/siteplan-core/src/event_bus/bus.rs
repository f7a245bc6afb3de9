//! Event bus for editor notifications.
//!
//! Two delivery paths share one publish call: synchronous listeners run on
//! the publishing thread in subscription order, and a tokio broadcast
//! channel serves async consumers that poll at their own pace. A bounded
//! backlog of recent events lets a consumer that attaches late catch up.

use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

use super::events::{EventCategory, SitePlanEvent};

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Which events a listener wants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EventFilter {
    #[default]
    All,
    /// Any of the listed categories.
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    pub fn only(category: EventCategory) -> Self {
        EventFilter::Categories(vec![category])
    }

    pub fn matches(&self, event: &SitePlanEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Broadcast channel capacity. Slow receivers that fall further behind
    /// than this lose the oldest events.
    pub channel_capacity: usize,
    /// Number of recent events kept for [`EventBus::recent`]. Zero disables
    /// the backlog.
    pub backlog_size: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            backlog_size: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventBusError {
    /// Neither listeners nor receivers were attached.
    #[error("No active subscribers")]
    NoSubscribers,
}

type Listener = Box<dyn Fn(&SitePlanEvent) + Send + Sync>;

struct Subscription {
    id: SubscriptionId,
    filter: EventFilter,
    listener: Listener,
}

/// Fan-out of [`SitePlanEvent`]s to listeners and async receivers.
///
/// Constructed by the application and passed to collaborators; there is no
/// global instance.
pub struct EventBus {
    sender: broadcast::Sender<SitePlanEvent>,
    listeners: RwLock<Vec<Subscription>>,
    backlog: Mutex<VecDeque<SitePlanEvent>>,
    next_id: AtomicU64,
    published: AtomicU64,
    config: EventBusConfig,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    pub fn with_config(config: EventBusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            sender,
            listeners: RwLock::new(Vec::new()),
            backlog: Mutex::new(VecDeque::with_capacity(config.backlog_size)),
            next_id: AtomicU64::new(1),
            published: AtomicU64::new(0),
            config,
        }
    }

    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }

    /// Delivers `event` to matching listeners, then to broadcast receivers.
    ///
    /// Returns how many parties saw it. With nobody attached the event is
    /// still recorded in the backlog and `NoSubscribers` is returned.
    pub fn publish(&self, event: SitePlanEvent) -> Result<usize, EventBusError> {
        tracing::trace!("publish: {}", event.description());
        self.published.fetch_add(1, Ordering::Relaxed);
        self.remember(&event);

        let mut delivered = 0;
        {
            let listeners = self.listeners.read();
            for sub in listeners.iter().filter(|s| s.filter.matches(&event)) {
                (sub.listener)(&event);
                delivered += 1;
            }
        }
        // `send` fails only when no receiver exists.
        delivered += self.sender.send(event).unwrap_or(0);

        if delivered == 0 && self.is_idle() {
            Err(EventBusError::NoSubscribers)
        } else {
            Ok(delivered)
        }
    }

    /// Registers a synchronous listener. It runs on the publishing thread
    /// and must not publish on the same bus.
    pub fn subscribe<F>(&self, filter: EventFilter, listener: F) -> SubscriptionId
    where
        F: Fn(&SitePlanEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push(Subscription {
            id,
            filter,
            listener: Box::new(listener),
        });
        tracing::debug!("Listener {} added", id);
        id
    }

    /// Returns whether `id` was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|s| s.id != id);
        let removed = listeners.len() != before;
        if removed {
            tracing::debug!("Listener {} removed", id);
        }
        removed
    }

    /// A new broadcast receiver; it sees events published from now on.
    pub fn receiver(&self) -> broadcast::Receiver<SitePlanEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Total events published over the bus lifetime.
    pub fn published_count(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    /// Up to `limit` most recent events, oldest first.
    pub fn recent(&self, limit: usize) -> Vec<SitePlanEvent> {
        let backlog = self.backlog.lock();
        let skip = backlog.len().saturating_sub(limit);
        backlog.iter().skip(skip).cloned().collect()
    }

    pub fn clear_backlog(&self) {
        self.backlog.lock().clear();
    }

    fn is_idle(&self) -> bool {
        self.subscriber_count() == 0 && self.receiver_count() == 0
    }

    fn remember(&self, event: &SitePlanEvent) {
        let cap = self.config.backlog_size;
        if cap == 0 {
            return;
        }
        let mut backlog = self.backlog.lock();
        while backlog.len() >= cap {
            backlog.pop_front();
        }
        backlog.push_back(event.clone());
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.subscriber_count())
            .field("receivers", &self.receiver_count())
            .field("published", &self.published_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_bus::events::BuildingUpdate;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    fn moved(x: f64, is_final: bool) -> SitePlanEvent {
        SitePlanEvent::BuildingUpdated(BuildingUpdate {
            id: "b1".to_string(),
            anchor: (x, 0.0),
            rotation_radians: 0.0,
            width_ft: 60.0,
            depth_ft: 40.0,
            floors: Some(2),
            is_final,
        })
    }

    fn zoomed(zoom: f64) -> SitePlanEvent {
        SitePlanEvent::ViewportChanged {
            zoom,
            pan: (0.0, 0.0),
        }
    }

    #[test]
    fn test_idle_bus_reports_no_subscribers() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(moved(1.0, false)), Err(EventBusError::NoSubscribers));
        assert_eq!(bus.published_count(), 1);
    }

    #[test]
    fn test_listener_lifecycle() {
        let bus = EventBus::new();
        let first = bus.subscribe(EventFilter::All, |_| {});
        let second = bus.subscribe(EventFilter::All, |_| {});
        assert_ne!(first, second);
        assert_eq!(bus.subscriber_count(), 2);

        assert!(bus.unsubscribe(first));
        assert!(!bus.unsubscribe(first));
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn test_listeners_only_see_their_categories() {
        let bus = EventBus::new();
        let buildings = Arc::new(AtomicUsize::new(0));
        let finals = Arc::new(AtomicUsize::new(0));

        let b = Arc::clone(&buildings);
        let f = Arc::clone(&finals);
        bus.subscribe(EventFilter::only(EventCategory::Building), move |event| {
            b.fetch_add(1, Ordering::SeqCst);
            if let SitePlanEvent::BuildingUpdated(update) = event {
                if update.is_final {
                    f.fetch_add(1, Ordering::SeqCst);
                }
            }
        });

        assert_eq!(bus.publish(moved(1.0, false)), Ok(1));
        // Nobody wants viewport events, but a listener exists.
        assert_eq!(bus.publish(zoomed(2.0)), Ok(0));
        bus.publish(moved(2.0, true)).ok();

        assert_eq!(buildings.load(Ordering::SeqCst), 2);
        assert_eq!(finals.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_backlog_keeps_most_recent() {
        let bus = EventBus::with_config(EventBusConfig {
            backlog_size: 3,
            ..Default::default()
        });
        for i in 0..5 {
            bus.publish(zoomed(i as f64)).ok();
        }
        let recent = bus.recent(10);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0], zoomed(2.0));
        assert_eq!(bus.recent(1), vec![zoomed(4.0)]);

        bus.clear_backlog();
        assert!(bus.recent(10).is_empty());
    }

    #[test]
    fn test_backlog_disabled_by_default() {
        let bus = EventBus::new();
        bus.publish(zoomed(1.0)).ok();
        assert!(bus.recent(10).is_empty());
    }

    #[tokio::test]
    async fn test_receiver_gets_events_in_order() {
        let bus = EventBus::new();
        let mut rx = bus.receiver();

        assert_eq!(bus.publish(moved(1.0, false)), Ok(1));
        bus.publish(moved(2.0, true)).ok();

        assert_eq!(rx.recv().await.ok(), Some(moved(1.0, false)));
        assert_eq!(rx.recv().await.ok(), Some(moved(2.0, true)));
    }
}
