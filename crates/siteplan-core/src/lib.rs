//! # SitePlan Core
//!
//! Core types, constants, and utilities for SitePlan.
//! Provides unit conversion, the error hierarchy, and the event bus used to
//! carry building updates and editor notifications to external collaborators.

pub mod constants;
pub mod error;
pub mod event_bus;
pub mod units;

pub use error::{Error, GeometryError, Result, ViewportError};

pub use event_bus::{
    BuildingUpdate, EventBus, EventBusConfig, EventBusError, EventCategory, EventFilter,
    SitePlanEvent, SubscriptionId,
};

pub use units::{feet_to_meters, meters_to_feet, LengthUnit};
