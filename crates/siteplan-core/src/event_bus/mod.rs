//! # Event Bus
//!
//! Carries editor notifications (building updates, selection and viewport
//! changes, plan replacement, finished measurements) to whoever listens.
//!
//! - Synchronous listeners are filtered by [`EventCategory`]
//! - Async consumers take a tokio broadcast receiver
//! - An optional backlog keeps the most recent events for late joiners
//!
//! The bus is constructed explicitly and handed to whoever needs it; there is
//! no process-wide instance.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use siteplan_core::event_bus::{EventBus, EventCategory, EventFilter, SitePlanEvent};
//!
//! let bus = Arc::new(EventBus::new());
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Building]),
//!     |event| {
//!         if let SitePlanEvent::BuildingUpdated(update) = event {
//!             println!("building {} moved", update.id);
//!         }
//!     },
//! );
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
